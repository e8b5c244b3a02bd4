//! Chrome Trace Format output.
//!
//! Produces a flat JSON array of complete events, which chrome://tracing and
//! <https://ui.perfetto.dev> both accept.
//!
//! # Event Types
//!
//! - **Step events** (`cat: "targets"`): one per build step, on its lane
//! - **Time-trace events**: compiler phases embedded under their step, same lane
//!
//! # Format Reference
//!
//! - [Trace Event Format](https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU/)
//! - [Perfetto UI](https://ui.perfetto.dev)

use std::io::Write;
use std::path::Path;

use serde::Serialize;

use super::{COMPLETE_PHASE, Micros, Step};
use crate::error::TraceError;

/// Category of step events.
pub const STEP_CATEGORY: &str = "targets";

/// A Chrome Trace Event in the Trace Event Format.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraceEvent {
    /// Event name (displayed in the UI)
    pub name: String,
    /// Category (for filtering in the UI)
    pub cat: String,
    /// Phase: always "X" (complete event)
    pub ph: &'static str,
    /// Timestamp in microseconds
    pub ts: Micros,
    /// Duration in microseconds
    pub dur: Micros,
    /// Process ID: the index of the source the event came from
    pub pid: u32,
    /// Thread ID: the lane the step was packed into
    pub tid: usize,
    /// Custom arguments (shown when event is selected in UI)
    pub args: serde_json::Value,
}

impl TraceEvent {
    /// The event representing a whole build step.
    pub fn from_step(step: &Step, pid: u32, tid: usize) -> Self {
        Self {
            name: step.display_name(),
            cat: STEP_CATEGORY.to_string(),
            ph: COMPLETE_PHASE,
            ts: step.start.to_micros(),
            dur: step.duration().to_micros(),
            pid,
            tid,
            args: serde_json::Value::Object(Default::default()),
        }
    }
}

/// Serialize events as a JSON array.
pub fn write_events(
    writer: impl Write,
    events: &[TraceEvent],
    pretty: bool,
) -> std::io::Result<()> {
    let mut writer = std::io::BufWriter::new(writer);
    if pretty {
        serde_json::to_writer_pretty(&mut writer, events)?;
    } else {
        serde_json::to_writer(&mut writer, events)?;
    }
    writeln!(writer)?;
    writer.flush()
}

/// Write the trace to `destination`, or to stdout when `None`.
///
/// Any failure, including a missing parent directory, is reported as
/// [`TraceError::Io`].
pub fn write_trace(
    events: &[TraceEvent],
    destination: Option<&Path>,
    pretty: bool,
) -> Result<(), TraceError> {
    match destination {
        Some(path) => {
            let write_error = |e: std::io::Error| TraceError::Io {
                path: path.to_path_buf(),
                message: e.to_string(),
            };
            let file = std::fs::File::create(path).map_err(write_error)?;
            write_events(file, events, pretty).map_err(write_error)?;
            log::debug!("Wrote {} events to {}", events.len(), path.display());
        }
        None => {
            let stdout = std::io::stdout().lock();
            write_events(stdout, events, pretty).map_err(|e| TraceError::Io {
                path: "<stdout>".into(),
                message: e.to_string(),
            })?;
        }
    }
    Ok(())
}
