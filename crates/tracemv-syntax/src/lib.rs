//! Front end for masked-circuit cycle traces.
//!
//! The upstream circuit generator emits a C-shaped text artifact: one
//! `run_circuit_cycle_<N>(wtype_t* s) { ... }` block per clock cycle plus a
//! single `DEBUG_INFO` string table describing the initial state slots
//! (shares of secrets, unmasked signals, and fresh masks). This crate turns
//! that text into a structured [`ParsedTrace`] without interpreting it:
//!
//! - `extract`: locate cycle blocks and the debug table (raw lines only).
//! - `debug`: classify debug entries into shares / unmasked signals / masks.
//! - `instr`: the closed instruction grammar for individual body lines.
//! - `io`: JSON dump helpers for the parsed intermediate form.
//!
//! Symbolic evaluation and code generation live downstream in
//! `tracemv-core`; nothing here is specific to the output dialect except
//! the identifier-mangling rule in [`debug::mangled_id`].

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![deny(missing_docs)]
#![warn(clippy::all)]

/// Classification of `DEBUG_INFO` entries into shares, unmasked signals, masks.
pub mod debug;
/// Named parse-failure kinds shared by the front-end stages.
pub mod error;
/// Raw extraction of cycle blocks and the debug table from input text.
pub mod extract;
/// Tokenizer and instruction-shape grammar for cycle body lines.
pub mod instr;
/// JSON dump helpers for the parsed intermediate form.
pub mod io;

use serde::{Deserialize, Serialize};

pub use debug::{DebugSummary, ShareGroup};
pub use error::ParseError;
pub use extract::RawTrace;
pub use instr::{GateOp, Instr, Operand};

/// Fully parsed front-end output: raw cycle bodies plus the classified
/// debug table. Instruction lines stay unparsed here; the evaluator walks
/// them in cycle order and consults [`instr::parse_line`] per line.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ParsedTrace {
    /// Cycle-indexed raw body lines (trimmed, blanks removed).
    pub raw: RawTrace,
    /// Classified debug table: share groups, masks, seed aliases/deletions.
    pub debug: DebugSummary,
}

/// Run the whole front end over the input text.
///
/// # Errors
/// Any structural defect is fatal: a missing or size-mismatched debug
/// table, or a debug entry matching none of the three known shapes.
pub fn parse(text: &str) -> Result<ParsedTrace, ParseError> {
    let raw = extract::extract_trace(text)?;
    let debug = debug::classify_entries(&raw.debug_entries)?;
    Ok(ParsedTrace { raw, debug })
}
