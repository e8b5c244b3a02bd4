//! Place time-trace spans on the build's timeline.
//!
//! A span's `ts` counts from the start of the compiler invocation, so adding
//! the step's start (in microseconds) puts it in the same clock as the step
//! events. A span that doesn't fit inside its step means the time trace and the
//! build log came from different builds, and the whole conversion is aborted.

use std::path::Path;

use super::{COMPLETE_PHASE, Micros, Span, Step, TraceEvent, read_spans, time_trace_path};
use crate::error::TraceError;

/// Category for spans whose time trace doesn't set one.
pub const SPAN_CATEGORY: &str = "time-trace";

/// Rebase `span` onto `step`, keeping it on the step's lane.
///
/// `source` is the time-trace file, for diagnostics.
pub fn rebase(
    step: &Step,
    span: Span,
    pid: u32,
    tid: usize,
    source: &Path,
) -> Result<TraceEvent, TraceError> {
    let step_dur = step.duration().to_micros();
    // Also rejects any span longer than the step itself
    let span_end = span.end();
    if span_end > step_dur {
        return Err(TraceError::Inconsistent {
            path: source.to_path_buf(),
            step: step.display_name(),
            span: span.name,
            span_end,
            step_dur,
        });
    }

    Ok(TraceEvent {
        name: span.name,
        cat: span.cat.unwrap_or_else(|| SPAN_CATEGORY.to_string()),
        ph: COMPLETE_PHASE,
        ts: span.ts + step.start.to_micros(),
        dur: span.dur,
        pid,
        tid,
        args: span
            .args
            .unwrap_or_else(|| serde_json::Value::Object(Default::default())),
    })
}

/// Events for the time traces of every output of `step`.
///
/// Time traces are looked up relative to `dir`, the directory of the source
/// the step was read from.
pub fn embed_time_traces(
    dir: &Path,
    step: &Step,
    pid: u32,
    tid: usize,
    granularity: Micros,
) -> Result<Vec<TraceEvent>, TraceError> {
    let mut events = Vec::new();
    for label in &step.labels {
        let spans = read_spans(&time_trace_path(dir, label), granularity)?;
        let source = spans.path().to_path_buf();
        for span in spans {
            events.push(rebase(step, span?, pid, tid, &source)?);
        }
    }
    Ok(events)
}
