//! JSON dump helpers for the parsed intermediate form.
//!
//! These exist for inspection and debugging of the front end (the CLI's
//! `--dump-ir`); the transpiler itself never reads the dump back on the
//! hot path.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use crate::ParsedTrace;

/// Write a [`ParsedTrace`] as pretty-printed JSON.
///
/// # Errors
/// File creation, serialization, or flush failures.
pub fn write_trace_json<P: AsRef<Path>>(path: P, trace: &ParsedTrace) -> Result<()> {
    let path = path.as_ref();
    let f = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let mut w = BufWriter::new(f);
    serde_json::to_writer_pretty(&mut w, trace).context("serialize parsed trace")?;
    w.flush().context("flush parsed-trace writer")?;
    Ok(())
}

/// Read a [`ParsedTrace`] back from JSON (round-trip of [`write_trace_json`]).
///
/// # Errors
/// File open or deserialization failures.
pub fn read_trace_json<P: AsRef<Path>>(path: P) -> Result<ParsedTrace> {
    let path = path.as_ref();
    let f = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let rdr = BufReader::new(f);
    let v: ParsedTrace = serde_json::from_reader(rdr).context("deserialize parsed trace")?;
    Ok(v)
}
