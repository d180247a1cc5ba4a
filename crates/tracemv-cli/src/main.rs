// crates/tracemv-cli/src/main.rs

#![forbid(unsafe_code)]
#![deny(
    rust_2018_idioms,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo
)]

use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tracemv_core::Options;

#[derive(Parser, Debug)]
#[command(
    name = "tracemv",
    about = "Transpile a masked-circuit cycle trace to maskVerif input",
    long_about = "Transpile a masked-circuit cycle trace to maskVerif input.\n\nReads the C-shaped trace emitted by the circuit generator, evaluates it symbolically, and writes a `proc design` block for the leakage verifier.",
    version = env!("CARGO_PKG_VERSION"),
    disable_help_subcommand = true
)]
struct Cli {
    /// Input trace file (cycle functions plus DEBUG_INFO table)
    input: PathBuf,

    /// Output path for the maskVerif procedure
    output: PathBuf,

    /// Explicit cycle count; default is max observed cycle index + 1
    #[arg(long)]
    cycles: Option<u32>,

    /// Keep the legacy state-assignment aliasing (internal-state parity
    /// with older toolchains; emitted output is unaffected)
    #[arg(long)]
    legacy_state_alias: bool,

    /// Also write the parsed intermediate form as JSON to this path
    #[arg(long, value_name = "PATH")]
    dump_ir: Option<PathBuf>,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let text = fs::read_to_string(&cli.input)
        .with_context(|| format!("read {}", cli.input.display()))?;
    let parsed = tracemv_syntax::parse(&text)
        .with_context(|| format!("parse trace {}", cli.input.display()))?;

    if let Some(path) = &cli.dump_ir {
        tracemv_syntax::io::write_trace_json(path, &parsed)?;
        info!(path = %path.display(), "wrote parsed-trace dump");
    }

    let opts = Options { cycles: cli.cycles, legacy_state_alias: cli.legacy_state_alias };
    let rendered = tracemv_core::transpile(&parsed, &opts).context("transpile trace")?;

    // The whole document is rendered before the file is touched; a failed
    // run never leaves a partial artifact behind.
    fs::write(&cli.output, rendered)
        .with_context(|| format!("write {}", cli.output.display()))?;
    info!(
        input = %cli.input.display(),
        output = %cli.output.display(),
        "transpilation complete"
    );
    Ok(())
}

/// Initialize tracing with an env-driven filter (default INFO).
fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = fmt::layer().with_target(false).with_level(true).compact();

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
