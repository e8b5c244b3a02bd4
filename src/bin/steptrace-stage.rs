//! Post-build hook: preserve an instrumentation index and convert it.
//!
//! # Usage
//!
//! ```bash
//! # Register as the build's instrumentation callback, then after a build:
//! steptrace-stage build/.cmake/instrumentation/v1/data/index/index-1.json
//!
//! # Produces build/instrumentation/index-1/trace.json next to copies of
//! # the index and every snippet it lists
//! ```

use std::path::PathBuf;
use std::process;

use anyhow::Context;
use clap::Parser;
use steptrace::config::SteptraceConfig;
use steptrace::stage::stage_index;
use steptrace::styling::{SUCCESS_EMOJI, eprintln, println};
use steptrace::trace::Trim;

/// Copy an instrumentation index into the build tree and convert it
#[derive(Parser)]
#[command(name = "steptrace-stage")]
#[command(about = "Stage an instrumentation index and write its Chrome trace", long_about = None)]
#[command(version)]
struct Args {
    /// Path to the instrumentation index
    index: PathBuf,

    /// Report every step, not just those of the latest build
    #[arg(short = 'a', long)]
    show_all: bool,

    /// Show debug logs on stderr
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn run(args: &Args) -> anyhow::Result<()> {
    let config = SteptraceConfig::load().context("Failed to load config")?;
    let mut options = config.convert_options();
    if args.show_all {
        options.trim = Trim::ShowAll;
    }

    let staged = stage_index(&args.index, &options, config.pretty)
        .with_context(|| format!("Failed to stage {}", args.index.display()))?;

    println!(
        "{}",
        color_print::cformat!(
            "{SUCCESS_EMOJI} <green>Staged {} snippets, wrote <bold>{}</></>",
            staged.snippets,
            staged.trace_path.display()
        )
    );
    Ok(())
}

fn main() {
    let args = Args::parse();
    steptrace::init_logging(args.verbose);

    if let Err(e) = run(&args) {
        eprintln!("{e:#}");
        process::exit(1);
    }
}
