use anyhow::Context;
use clap::{CommandFactory, Parser};
use std::process;
use steptrace::config::SteptraceConfig;
use steptrace::styling::{ERROR_EMOJI, HINT_EMOJI, eprintln};
use steptrace::trace::{self, ConvertOptions, Micros, Trim};

mod cli;

use cli::Cli;

/// Merge command-line flags over the loaded configuration.
///
/// A flag can only turn a setting on; granularity replaces the configured one.
fn convert_options(cli: &Cli, config: &SteptraceConfig) -> ConvertOptions {
    let mut options = config.convert_options();
    if cli.show_all {
        options.trim = Trim::ShowAll;
    }
    if let Some(granularity) = cli.granularity {
        options.granularity = Micros(granularity);
    }
    options.embed_time_trace |= cli.embed_time_trace;
    options
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = SteptraceConfig::load().context("Failed to load config")?;
    let options = convert_options(cli, &config);
    log::debug!("Converting {} sources with {options:?}", cli.sources.len());

    // Collected in full first so a failing source leaves no partial output
    let events = trace::convert(&cli.sources, &options)?;
    trace::write_trace(&events, cli.output.as_deref(), cli.pretty || config.pretty)?;
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    steptrace::init_logging(cli.verbose);

    if cli.sources.is_empty() {
        eprintln!("{}", color_print::cformat!("{ERROR_EMOJI} <red>No sources given</>"));
        eprintln!(
            "{}",
            color_print::cformat!(
                "{HINT_EMOJI} <dim>Pass at least one index, record list, or ninja log</>\n"
            )
        );
        eprintln!("{}", Cli::command().render_help().ansi());
        process::exit(1);
    }

    if let Err(e) = run(&cli) {
        eprintln!("{e:#}");
        process::exit(1);
    }
}
