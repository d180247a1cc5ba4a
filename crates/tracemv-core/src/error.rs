//! Transpiler failure taxonomy.
//!
//! Three families, all fatal: structural parse errors (front end), semantic
//! inconsistencies (undefined symbols, missing cycles), and unsupported
//! operators (carried inside the wrapped [`ParseError`]). The pipeline has
//! no partial-progress contract, so nothing here is recoverable.

use thiserror::Error;
use tracemv_syntax::ParseError;

/// Fatal transpilation failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TranspileError {
    /// Front-end failure outside any cycle (extraction, debug table).
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// A cycle body line failed to parse.
    #[error("cycle {cycle}: {source}")]
    Instruction {
        /// Cycle the line belongs to.
        cycle: u32,
        /// Underlying grammar failure.
        #[source]
        source: ParseError,
    },

    /// A cycle below the configured cycle count has no block in the trace.
    #[error("cycle {cycle} is missing from the trace")]
    MissingCycle {
        /// Absent cycle index.
        cycle: u32,
    },

    /// No cycle blocks were found and no explicit cycle count was given,
    /// so the count cannot be inferred.
    #[error("trace contains no cycle blocks and no explicit cycle count was given")]
    EmptyTrace,

    /// An instruction references a symbol that was never defined, aliased,
    /// or deleted.
    #[error("cycle {cycle}: reference to undefined symbol `{symbol}`")]
    UndefinedSymbol {
        /// Cycle of the offending instruction.
        cycle: u32,
        /// Symbol as written in the trace (`t<N>` or `s[<N>]`).
        symbol: String,
    },
}
