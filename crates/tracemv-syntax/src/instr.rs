//! Instruction grammar for cycle body lines.
//!
//! A non-comment body line parses to exactly one of three shapes:
//!
//! - gate definition: `#define t<N> _<op>(<a>[, <b>])` with
//!   `op ∈ {xor, and, or, not}` and operands `t<M>` or `s[<M>]`;
//! - state assignment: `s[<N>] = t<M>;`
//! - state rename: `#define t<N> s[<M>]` (no operator call).
//!
//! The shapes are mutually exclusive by construction (a gate definition's
//! value starts with `_`, a rename's with `s[`), so matching is exhaustive
//! rather than first-regex-wins. Anything else is a named error.

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// The closed gate-operator set.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum GateOp {
    /// Field addition.
    Xor,
    /// Field multiplication.
    And,
    /// Field multiplication as well; the upstream model folds `or` onto
    /// `and` and this translation preserves that verbatim.
    Or,
    /// Pass-through; the complement is not represented symbolically.
    Not,
}

impl GateOp {
    /// Operand count this operator requires.
    #[must_use]
    pub fn arity(self) -> usize {
        match self {
            Self::Not => 1,
            Self::Xor | Self::And | Self::Or => 2,
        }
    }

    fn from_token(token: &str) -> Option<Self> {
        match token {
            "_xor" => Some(Self::Xor),
            "_and" => Some(Self::And),
            "_or" => Some(Self::Or),
            "_not" => Some(Self::Not),
            _ => None,
        }
    }
}

/// A gate operand: a prior temporary or a state slot.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum Operand {
    /// `t<N>` — temporary number `N`.
    Temp(u32),
    /// `s[<N>]` — state slot `N`.
    State(u32),
}

/// One parsed instruction.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum Instr {
    /// `#define t<target> _<op>(args...)`.
    Gate {
        /// Temporary number being defined.
        target: u32,
        /// Gate operator.
        op: GateOp,
        /// Operands, length equal to `op.arity()`.
        args: Vec<Operand>,
    },
    /// `s[<state>] = t<temp>;`.
    Assign {
        /// State slot written.
        state: u32,
        /// Temporary read.
        temp: u32,
    },
    /// `#define t<temp> s[<state>]`.
    Rename {
        /// Temporary being defined.
        temp: u32,
        /// State slot referenced.
        state: u32,
    },
}

/// Whether the evaluator should skip this line.
#[must_use]
pub fn is_comment(line: &str) -> bool {
    line.starts_with("//")
}

/// Parse one trimmed, non-comment body line.
///
/// # Errors
/// `UnmatchedInstruction` when no shape fits, `UnsupportedOperator` for an
/// operator outside the fixed set, `OperatorArity` on operand-count
/// mismatch.
pub fn parse_line(line: &str) -> Result<Instr, ParseError> {
    let unmatched = || ParseError::UnmatchedInstruction { line: line.to_owned() };

    if let Some(rest) = line.strip_prefix("#define") {
        let rest = rest.trim_start();
        let (target_tok, value) = split_token(rest);
        let target = parse_temp(target_tok).ok_or_else(unmatched)?;
        let value = value.trim();

        if value.starts_with('_') {
            return parse_gate_value(line, target, value);
        }
        let state = parse_state(value).ok_or_else(unmatched)?;
        return Ok(Instr::Rename { temp: target, state });
    }

    if let Some((lhs, rhs)) = line.split_once('=') {
        let rhs = rhs.trim().strip_suffix(';').map(str::trim_end).ok_or_else(unmatched)?;
        let state = parse_state(lhs.trim()).ok_or_else(unmatched)?;
        let temp = parse_temp(rhs).ok_or_else(unmatched)?;
        return Ok(Instr::Assign { state, temp });
    }

    Err(unmatched())
}

fn parse_gate_value(line: &str, target: u32, value: &str) -> Result<Instr, ParseError> {
    let unmatched = || ParseError::UnmatchedInstruction { line: line.to_owned() };

    let op_len = value
        .bytes()
        .take_while(|b| *b == b'_' || b.is_ascii_alphabetic())
        .count();
    let op_tok = &value[..op_len];
    let rest = value[op_len..].trim_start();
    let rest = rest.strip_prefix('(').ok_or_else(unmatched)?;
    let close = rest.find(')').ok_or_else(unmatched)?;
    if !rest[close + 1..].trim().is_empty() {
        return Err(unmatched());
    }

    let op = GateOp::from_token(op_tok)
        .ok_or_else(|| ParseError::UnsupportedOperator { op: op_tok.to_owned() })?;

    let mut args = Vec::with_capacity(2);
    for tok in rest[..close].split(',') {
        args.push(parse_operand(tok.trim()).ok_or_else(unmatched)?);
    }
    if args.len() != op.arity() {
        return Err(ParseError::OperatorArity {
            op: op_tok.to_owned(),
            expected: op.arity(),
            found: args.len(),
        });
    }
    Ok(Instr::Gate { target, op, args })
}

fn parse_operand(token: &str) -> Option<Operand> {
    parse_temp(token)
        .map(Operand::Temp)
        .or_else(|| parse_state(token).map(Operand::State))
}

/// `t<digits>`, full token.
fn parse_temp(token: &str) -> Option<u32> {
    token.strip_prefix('t')?.parse().ok()
}

/// `s[<digits>]`, full token.
fn parse_state(token: &str) -> Option<u32> {
    token.strip_prefix("s[")?.strip_suffix(']')?.trim().parse().ok()
}

/// Split off the first whitespace-delimited token.
fn split_token(s: &str) -> (&str, &str) {
    match s.find(char::is_whitespace) {
        Some(at) => (&s[..at], &s[at..]),
        None => (s, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_binary_gate() {
        assert_eq!(
            parse_line("#define t4 _xor(s[0], t2)").unwrap(),
            Instr::Gate {
                target: 4,
                op: GateOp::Xor,
                args: vec![Operand::State(0), Operand::Temp(2)],
            }
        );
    }

    #[test]
    fn parses_unary_gate() {
        assert_eq!(
            parse_line("#define t7 _not(t3)").unwrap(),
            Instr::Gate { target: 7, op: GateOp::Not, args: vec![Operand::Temp(3)] }
        );
    }

    #[test]
    fn parses_assignment() {
        assert_eq!(parse_line("s[12] = t7;").unwrap(), Instr::Assign { state: 12, temp: 7 });
    }

    #[test]
    fn parses_rename() {
        assert_eq!(parse_line("#define t9 s[3]").unwrap(), Instr::Rename { temp: 9, state: 3 });
    }

    #[test]
    fn rejects_unknown_operator() {
        let err = parse_line("#define t1 _nand(t0, t2)").unwrap_err();
        assert_eq!(err, ParseError::UnsupportedOperator { op: "_nand".into() });
    }

    #[test]
    fn rejects_wrong_arity() {
        let err = parse_line("#define t1 _not(t0, t2)").unwrap_err();
        assert_eq!(err, ParseError::OperatorArity { op: "_not".into(), expected: 1, found: 2 });
        let err = parse_line("#define t1 _xor(t0)").unwrap_err();
        assert_eq!(err, ParseError::OperatorArity { op: "_xor".into(), expected: 2, found: 1 });
    }

    #[test]
    fn rejects_shapeless_lines() {
        for line in ["#define t1 42", "s[0] = s[1];", "t0 = t1;", "frobnicate", "#define x0 _xor(t0, t1)"] {
            assert!(
                matches!(parse_line(line), Err(ParseError::UnmatchedInstruction { .. })),
                "line should not parse: {line}"
            );
        }
    }

    #[test]
    fn comment_detection() {
        assert!(is_comment("// cycle boundary"));
        assert!(!is_comment("s[0] = t1;"));
    }
}
