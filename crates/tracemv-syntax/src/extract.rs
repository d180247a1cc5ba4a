//! Raw extraction of cycle blocks and the debug table.
//!
//! The extractor is a single forward scan over the input text. It recognizes
//! two constructs and nothing else:
//!
//! - `run_circuit_cycle_<N>(<params>) { <body> }` — one block per cycle,
//!   keyed by `<N>`; the body ends at the first `}` (the generator never
//!   nests braces inside a cycle function).
//! - `DEBUG_INFO[<size>] = { "<entry>", ... };` — the static debug table;
//!   the declared `<size>` must equal the number of extracted entries.
//!
//! Body lines are trimmed and blanks dropped; no other normalization
//! happens here. Interpretation of lines and entries is left to `instr`
//! and `debug`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

const CYCLE_MARKER: &str = "run_circuit_cycle_";
const DEBUG_MARKER: &str = "DEBUG_INFO";

/// Raw extraction result: cycle-indexed body lines plus debug entries in
/// table order.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RawTrace {
    /// Body lines per cycle, trimmed and with blanks removed.
    pub cycles: BTreeMap<u32, Vec<String>>,
    /// Debug-table entry strings (quote contents), in declaration order.
    pub debug_entries: Vec<String>,
}

impl RawTrace {
    /// Largest cycle index present, if any block was found.
    #[must_use]
    pub fn max_cycle(&self) -> Option<u32> {
        self.cycles.keys().next_back().copied()
    }
}

/// Scan the full input text for cycle blocks and the debug table.
///
/// # Errors
/// Fails if the debug table is missing, has a size/entry-count mismatch,
/// or contains a line that is not a quoted string literal.
pub fn extract_trace(text: &str) -> Result<RawTrace, ParseError> {
    let cycles = extract_cycles(text);
    let debug_entries = extract_debug_entries(text)?;
    Ok(RawTrace { cycles, debug_entries })
}

fn extract_cycles(text: &str) -> BTreeMap<u32, Vec<String>> {
    let mut cycles = BTreeMap::new();
    let mut pos = 0;
    while let Some(off) = text[pos..].find(CYCLE_MARKER) {
        let start = pos + off + CYCLE_MARKER.len();
        // Resume after the marker either way; a conforming block never
        // contains the marker inside its body.
        pos = start;

        let rest = &text[start..];
        let digits = leading_digits(rest);
        if digits.is_empty() {
            continue;
        }
        let Ok(index) = digits.parse::<u32>() else {
            continue;
        };

        let sig = rest[digits.len()..].trim_start();
        let Some(sig) = sig.strip_prefix('(') else {
            continue;
        };
        let Some(close) = sig.find(')') else {
            continue;
        };
        let after = sig[close + 1..].trim_start();
        let Some(body) = after.strip_prefix('{') else {
            continue;
        };
        let Some(end) = body.find('}') else {
            continue;
        };

        let lines = body[..end]
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(ToOwned::to_owned)
            .collect();
        cycles.insert(index, lines);
    }
    cycles
}

fn extract_debug_entries(text: &str) -> Result<Vec<String>, ParseError> {
    let (declared, body) = find_debug_table(text).ok_or(ParseError::MissingDebugTable)?;

    let mut entries = Vec::new();
    for line in body.lines().map(str::trim).filter(|l| !l.is_empty()) {
        entries.push(unquote_entry(entries.len(), line)?);
    }

    if entries.len() != declared {
        return Err(ParseError::DebugTableSize { declared, found: entries.len() });
    }
    Ok(entries)
}

/// Locate `DEBUG_INFO[<size>] = { <body> }` and return the declared size
/// and the initializer body. The first conforming occurrence wins.
fn find_debug_table(text: &str) -> Option<(usize, &str)> {
    let mut pos = 0;
    while let Some(off) = text[pos..].find(DEBUG_MARKER) {
        let start = pos + off + DEBUG_MARKER.len();
        pos = start;

        let rest = text[start..].trim_start();
        let Some(rest) = rest.strip_prefix('[') else {
            continue;
        };
        let rest = rest.trim_start();
        let digits = leading_digits(rest);
        let Ok(declared) = digits.parse::<usize>() else {
            continue;
        };
        let rest = rest[digits.len()..].trim_start();
        let Some(rest) = rest.strip_prefix(']') else {
            continue;
        };
        let rest = rest.trim_start();
        let Some(rest) = rest.strip_prefix('=') else {
            continue;
        };
        let rest = rest.trim_start();
        let Some(body) = rest.strip_prefix('{') else {
            continue;
        };
        let Some(end) = body.find('}') else {
            continue;
        };
        return Some((declared, &body[..end]));
    }
    None
}

/// Strip the quotes (and optional trailing comma) from one table line.
fn unquote_entry(index: usize, line: &str) -> Result<String, ParseError> {
    let malformed = || ParseError::MalformedDebugEntry { index, text: line.to_owned() };

    let rest = line.strip_prefix('"').ok_or_else(malformed)?;
    let close = rest.find('"').ok_or_else(malformed)?;
    let tail = rest[close + 1..].trim_start();
    if !(tail.is_empty() || tail == ",") {
        return Err(malformed());
    }
    Ok(rest[..close].to_owned())
}

fn leading_digits(s: &str) -> &str {
    let len = s.bytes().take_while(u8::is_ascii_digit).count();
    &s[..len]
}

#[cfg(test)]
mod tests {
    use super::*;

    const INPUT: &str = r#"
static void run_circuit_cycle_0(wtype_t* s)
{
    #define t0 _xor(s[0], s[1])

    s[3] = t0;
}

static void run_circuit_cycle_1(wtype_t* s)
{
    #define t1 s[3]
}

const char* DEBUG_INFO[2] = {
    "secret 0 share 0",
    "secret 0 share 1",
};
"#;

    #[test]
    fn extracts_cycle_blocks_in_order() {
        let raw = extract_trace(INPUT).unwrap();
        assert_eq!(raw.cycles.len(), 2);
        assert_eq!(
            raw.cycles[&0],
            vec!["#define t0 _xor(s[0], s[1])".to_owned(), "s[3] = t0;".to_owned()]
        );
        assert_eq!(raw.cycles[&1], vec!["#define t1 s[3]".to_owned()]);
        assert_eq!(raw.max_cycle(), Some(1));
    }

    #[test]
    fn extracts_debug_entries() {
        let raw = extract_trace(INPUT).unwrap();
        assert_eq!(raw.debug_entries, vec!["secret 0 share 0", "secret 0 share 1"]);
    }

    #[test]
    fn inline_initializer_is_rejected() {
        // Both entries share one line; the line-based grammar rejects the
        // trailing second literal.
        let text = r#"const char* DEBUG_INFO[3] = { "mask 0", "mask 1" };"#;
        let err = extract_trace(text).unwrap_err();
        assert!(matches!(err, ParseError::MalformedDebugEntry { index: 0, .. }));
    }

    #[test]
    fn debug_size_mismatch_multiline() {
        let text = "const char* DEBUG_INFO[3] = {\n\"mask 0\",\n\"mask 1\"\n};";
        let err = extract_trace(text).unwrap_err();
        assert_eq!(err, ParseError::DebugTableSize { declared: 3, found: 2 });
    }

    #[test]
    fn missing_debug_table_is_fatal() {
        let err = extract_trace("run_circuit_cycle_0(wtype_t* s) { }").unwrap_err();
        assert_eq!(err, ParseError::MissingDebugTable);
    }

    #[test]
    fn unquoted_entry_is_fatal() {
        let text = "const char* DEBUG_INFO[1] = {\nmask 0\n};";
        let err = extract_trace(text).unwrap_err();
        assert!(matches!(err, ParseError::MalformedDebugEntry { index: 0, .. }));
    }

    #[test]
    fn empty_cycle_body_keeps_no_lines() {
        let text = "run_circuit_cycle_4(wtype_t* s) {\n\n}\nconst char* DEBUG_INFO[0] = {};";
        let raw = extract_trace(text).unwrap();
        assert_eq!(raw.cycles[&4], Vec::<String>::new());
        assert!(raw.debug_entries.is_empty());
    }
}
