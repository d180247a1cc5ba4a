//! Named parse-failure kinds for the trace front end.
//!
//! Every variant identifies the offending entry or line so the operator can
//! fix the input; the transpiler is a one-shot batch tool and never emits
//! partial output after any of these.

use thiserror::Error;

/// Fatal front-end failures.
///
/// Structural variants come from `extract`, classification variants from
/// `debug`, and the instruction-shape variants from `instr` (the evaluator
/// wraps those with the cycle index).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// No `DEBUG_INFO[...] = { ... };` table was found in the input.
    #[error("no DEBUG_INFO table found in input")]
    MissingDebugTable,

    /// The table's declared size differs from the number of entries found.
    #[error("DEBUG_INFO declares {declared} entries but {found} were found")]
    DebugTableSize {
        /// Size in the array declaration.
        declared: usize,
        /// Entries actually present in the initializer.
        found: usize,
    },

    /// A debug-table line is not a quoted string literal.
    #[error("DEBUG_INFO entry {index} is not a quoted string: `{text}`")]
    MalformedDebugEntry {
        /// Zero-based position within the table.
        index: usize,
        /// Offending line, trimmed.
        text: String,
    },

    /// A debug entry matches none of `share` / `unmasked` / `mask`.
    #[error("DEBUG_INFO entry {index} matches no known shape: `{entry}`")]
    UnmatchedDebugEntry {
        /// Zero-based position within the table.
        index: usize,
        /// Entry text.
        entry: String,
    },

    /// A signal identifier cannot be mangled into a valid output identifier.
    #[error("DEBUG_INFO entry {index}: `{id}` cannot be mangled into a valid identifier")]
    InvalidIdentifier {
        /// Zero-based position within the table.
        index: usize,
        /// Raw identifier from the entry.
        id: String,
    },

    /// A cycle body line matches none of the three instruction shapes.
    #[error("instruction matches no known shape: `{line}`")]
    UnmatchedInstruction {
        /// Offending line, trimmed.
        line: String,
    },

    /// A gate definition names an operator outside `{xor, and, or, not}`.
    #[error("unsupported gate operator `{op}`")]
    UnsupportedOperator {
        /// Operator token as written, including the leading underscore.
        op: String,
    },

    /// A gate definition has the wrong number of operands for its operator.
    #[error("operator `{op}` takes {expected} operand(s), found {found}")]
    OperatorArity {
        /// Operator name.
        op: String,
        /// Required operand count.
        expected: usize,
        /// Operand count in the line.
        found: usize,
    },
}
