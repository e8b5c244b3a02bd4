use clap::Parser;
use clap::builder::styling::{AnsiColor, Color, Styles};
use std::path::PathBuf;

/// Custom styles for help output
fn help_styles() -> Styles {
    Styles::styled()
        .header(
            anstyle::Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Green))),
        )
        .usage(
            anstyle::Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Green))),
        )
        .literal(
            anstyle::Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Cyan))),
        )
        .placeholder(anstyle::Style::new().fg_color(Some(Color::Ansi(AnsiColor::Cyan))))
        .error(
            anstyle::Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Red))),
        )
        .valid(
            anstyle::Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Green))),
        )
        .invalid(
            anstyle::Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Yellow))),
        )
}

/// Help template shared by both binaries
pub const HELP_TEMPLATE: &str = "\
{before-help}{name} - {about-with-newline}\
Usage: {usage}

{all-args}{after-help}";

#[derive(Parser)]
#[command(name = "steptrace")]
#[command(about = "Convert build instrumentation logs to Chrome Trace Format", long_about = None)]
#[command(version)]
#[command(styles = help_styles())]
#[command(help_template = HELP_TEMPLATE)]
#[command(after_long_help = r#"SOURCES:
  An instrumentation index (an object listing `snippets`), a JSON list of step
  records, or a ninja log (`.ninja_log`, v5 or later). Each source becomes its
  own process in the trace.

CONFIGURATION:
  Defaults are read from ~/.config/steptrace/config.toml (or the file named by
  STEPTRACE_CONFIG_PATH) and STEPTRACE_* environment variables:

    granularity = 50000
    show-all = false
    embed-time-trace = false
    pretty = false

EXAMPLES:
  steptrace .cmake/instrumentation/v1/data/index/index-1.json > trace.json
  steptrace -e out/.ninja_log -o trace.json

  Open trace.json in chrome://tracing or https://ui.perfetto.dev
"#)]
pub struct Cli {
    /// Index files, step record lists, or ninja logs
    #[arg(value_name = "SOURCES")]
    pub sources: Vec<PathBuf>,

    /// Report every step, not just those of the latest build
    #[arg(short = 'a', long)]
    pub show_all: bool,

    /// Shortest -ftime-trace span to embed, in microseconds
    #[arg(short = 'g', long, value_name = "MICROS", value_parser = clap::value_parser!(u64).range(1..))]
    pub granularity: Option<u64>,

    /// Embed clang -ftime-trace files found next to step outputs
    #[arg(short = 'e', long)]
    pub embed_time_trace: bool,

    /// Write the trace to FILE instead of stdout
    #[arg(short = 'o', long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Indent the JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Show debug logs on stderr
    #[arg(short = 'v', long)]
    pub verbose: bool,
}
