//! tracemv-core — symbolic evaluation and code generation for the
//! trace-to-maskVerif transpiler.
//!
//! The pipeline is a single synchronous pass, leaves first:
//!
//! 1. front end (`tracemv-syntax`): extract cycle blocks and the debug
//!    table, classify debug entries;
//! 2. [`eval`]: walk cycles in order, apply field semantics, fold
//!    identities into the alias table, propagate taint;
//! 3. [`emit`]: render the surviving instruction list, share groups, and
//!    masks into the verification DSL.
//!
//! [`transpile`] wires the stages together for callers that already hold a
//! parsed trace; [`transpile_str`] starts from raw input text. Everything
//! is deterministic: identical input and options yield byte-identical
//! output. Parallelizing across cycles would be unsound — temporary and
//! state numbering is trace-wide, so aliasing outcomes depend on strict
//! cross-cycle order.

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![deny(missing_docs)]
#![warn(clippy::all)]

/// maskVerif rendering of an evaluated program.
pub mod emit;
/// Fatal failure taxonomy for the whole pipeline.
pub mod error;
/// Cycle walk, alias table, deletion set, instruction list.
pub mod eval;
/// Operator-tagged expression trees over `{0, 1}`.
pub mod expr;

pub use error::TranspileError;
pub use eval::{Options, Program};
pub use expr::Expr;

use tracemv_syntax::ParsedTrace;

/// Evaluate a parsed trace and render the verification-DSL document.
///
/// # Errors
/// Propagates any fatal evaluation failure; no output is produced then.
pub fn transpile(parsed: &ParsedTrace, opts: &Options) -> Result<String, TranspileError> {
    let program = eval::evaluate(parsed, opts)?;
    Ok(emit::render_program(&program))
}

/// Parse raw input text and transpile it in one shot.
///
/// # Errors
/// Propagates front-end and evaluation failures alike.
pub fn transpile_str(text: &str, opts: &Options) -> Result<String, TranspileError> {
    let parsed = tracemv_syntax::parse(text)?;
    transpile(&parsed, opts)
}
