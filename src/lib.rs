//! Convert build instrumentation records into Chrome Trace Format.
//!
//! Build systems record steps as a flat, time-ordered log: a start time and a
//! duration per step, but no notion of which worker ran it. steptrace packs
//! those steps into virtual lanes to recover the parallelism, and can splice in
//! clang `-ftime-trace` data found next to each output.
//!
//! See [`trace`] for the conversion pipeline and [`stage`] for the
//! instrumentation hook that copies an index before converting it.

pub mod config;
pub mod error;
pub mod stage;
pub mod styling;
pub mod trace;

pub use error::TraceError;

/// Configure logging from `RUST_LOG`, defaulting to `debug` when verbose and off otherwise.
pub fn init_logging(verbose: bool) {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if verbose { "debug" } else { "off" }),
    )
    .format(|buf, record| {
        use std::io::Write;

        let dim = anstyle::Style::new().dimmed();
        writeln!(
            buf,
            "{dim}[{}]{dim:#} {}",
            record.level().as_str().to_ascii_lowercase(),
            record.args()
        )
    })
    .init();
}
