//! Read clang `-ftime-trace` files that sit next to build outputs.
//!
//! Clang writes `foo.cpp.json` alongside `foo.cpp.o`. The file is itself in
//! Chrome Trace Format, with timestamps relative to the compiler's own start:
//! ```text
//! {"traceEvents": [
//!   {"pid": 1, "tid": 0, "ph": "X", "ts": 1200, "dur": 84000, "name": "Source", "args": {"detail": "foo.h"}},
//!   {"pid": 1, "tid": 0, "ph": "X", "ts": 0, "dur": 310000, "name": "Total Frontend"},
//!   {"pid": 1, "tid": 0, "ph": "M", "name": "process_name", "args": {"name": "clang"}}
//! ]}
//! ```
//!
//! Only complete events (`"ph": "X"`) are used. `Total …` events are rollups
//! of the others and would double-count.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::Micros;
use crate::error::TraceError;

/// Default minimum span duration.
pub const DEFAULT_GRANULARITY: Micros = Micros(50_000);

/// Phase of a complete event (one with a start and a duration).
pub const COMPLETE_PHASE: &str = "X";

const TOTAL_PREFIX: &str = "Total";

/// A time-trace event, not yet placed on the build's timeline.
#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub name: String,
    /// Offset from the start of the compiler invocation.
    pub ts: Micros,
    pub dur: Micros,
    pub cat: Option<String>,
    pub args: Option<serde_json::Value>,
}

impl Span {
    /// Offset at which the span finishes.
    pub fn end(&self) -> Micros {
        self.ts + self.dur
    }
}

#[derive(Debug, Deserialize)]
struct RawEvent {
    ph: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    ts: Option<Micros>,
    #[serde(default)]
    dur: Option<Micros>,
    #[serde(default)]
    cat: Option<String>,
    #[serde(default)]
    args: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct TimeTrace {
    #[serde(rename = "traceEvents")]
    trace_events: Vec<RawEvent>,
}

/// Where the time trace for a step output named `label` would be.
///
/// `obj/foo.cpp.o` → `<dir>/obj/foo.cpp.json`.
pub fn time_trace_path(dir: &Path, label: &str) -> PathBuf {
    dir.join(label).with_extension("json")
}

/// Eligible spans of one time-trace file, yielded lazily.
///
/// A complete event without `ts` or `dur` yields an error.
#[derive(Debug)]
pub struct Spans {
    path: PathBuf,
    events: std::vec::IntoIter<RawEvent>,
    granularity: Micros,
}

impl Spans {
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn empty(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            events: Vec::new().into_iter(),
            granularity: DEFAULT_GRANULARITY,
        }
    }
}

impl Iterator for Spans {
    type Item = Result<Span, TraceError>;

    fn next(&mut self) -> Option<Self::Item> {
        for event in self.events.by_ref() {
            if event.ph != COMPLETE_PHASE {
                continue;
            }
            let Some(name) = event.name else {
                return Some(Err(TraceError::malformed(
                    &self.path,
                    "complete event lacks `name`",
                )));
            };
            let (Some(ts), Some(dur)) = (event.ts, event.dur) else {
                return Some(Err(TraceError::malformed(
                    &self.path,
                    format!("complete event `{name}` lacks `ts` or `dur`"),
                )));
            };
            if dur < self.granularity || name.starts_with(TOTAL_PREFIX) {
                continue;
            }
            return Some(Ok(Span {
                name,
                ts,
                dur,
                cat: event.cat,
                args: event.args,
            }));
        }
        None
    }
}

/// Open the time trace at `path`, keeping spans of at least `granularity`.
///
/// A missing file is not an error: time traces are optional, and the result
/// simply yields nothing.
pub fn read_spans(path: &Path, granularity: Micros) -> Result<Spans, TraceError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            log::debug!("No time trace at {}", path.display());
            return Ok(Spans::empty(path));
        }
        Err(e) => return Err(TraceError::io(path, e)),
    };

    let trace: TimeTrace =
        serde_json::from_str(&content).map_err(|e| TraceError::malformed(path, e))?;
    log::debug!(
        "Read {} time trace events from {}",
        trace.trace_events.len(),
        path.display()
    );

    Ok(Spans {
        path: path.to_path_buf(),
        events: trace.trace_events.into_iter(),
        granularity,
    })
}
