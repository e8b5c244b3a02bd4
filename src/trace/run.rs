//! Convert one or more sources into a single list of trace events.

use std::path::{Path, PathBuf};

use super::{
    DEFAULT_GRANULARITY, Micros, TraceEvent, Trim, assign_lanes, embed_time_traces, read_steps,
};
use crate::error::TraceError;

/// Options for a conversion run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvertOptions {
    pub trim: Trim,
    /// Shortest time-trace span to embed.
    pub granularity: Micros,
    /// Embed clang `-ftime-trace` files found next to step outputs.
    pub embed_time_trace: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            trim: Trim::default(),
            granularity: DEFAULT_GRANULARITY,
            embed_time_trace: false,
        }
    }
}

/// Events for one source, all under process id `pid`.
///
/// Each step yields its own event followed, when embedding, by its time-trace
/// spans. Steps are emitted latest end first.
pub fn source_to_events(
    source: &Path,
    pid: u32,
    options: &ConvertOptions,
) -> Result<Vec<TraceEvent>, TraceError> {
    let steps = read_steps(source, options.trim)?;
    let dir = source.parent().unwrap_or_else(|| Path::new(""));

    let mut events = Vec::with_capacity(steps.len());
    for (step, tid) in assign_lanes(steps) {
        events.push(TraceEvent::from_step(&step, pid, tid));
        if options.embed_time_trace {
            events.extend(embed_time_traces(dir, &step, pid, tid, options.granularity)?);
        }
    }

    log::info!("{}: {} events", source.display(), events.len());
    Ok(events)
}

/// Convert every source in order; source `i` gets process id `i`.
///
/// Stops at the first error, so nothing is returned for a partially
/// consistent run.
pub fn convert(sources: &[PathBuf], options: &ConvertOptions) -> Result<Vec<TraceEvent>, TraceError> {
    let mut events = Vec::new();
    for (pid, source) in (0u32..).zip(sources) {
        events.extend(source_to_events(source, pid, options)?);
    }
    Ok(events)
}
