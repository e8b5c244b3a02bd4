//! Build log conversion to Chrome Trace Format.
//!
//! The pipeline, per source:
//!
//! - **Steps** ([`step`]): read an index, record list, or ninja log into
//!   [`Step`]s, merging records of the same invocation
//! - **Lanes** ([`lanes`]): pack steps into lanes to recover parallelism
//! - **Spans** ([`span`]): read clang `-ftime-trace` files next to outputs
//! - **Merge** ([`merge`]): rebase spans onto their step's timeline
//! - **Output** ([`chrome`]): write everything as trace events
//!
//! # Usage
//!
//! ```bash
//! # Convert a CMake instrumentation index
//! steptrace .cmake/instrumentation/v1/data/index/index-1.json > trace.json
//!
//! # Convert a ninja log, embedding -ftime-trace data
//! steptrace -e out/.ninja_log -o trace.json
//!
//! # Visualize: open trace.json in chrome://tracing or https://ui.perfetto.dev
//!
//! # Analyze with SQL (requires: curl -LO https://get.perfetto.dev/trace_processor)
//! trace_processor trace.json -Q 'SELECT name, dur/1e6 as ms FROM slice ORDER BY dur DESC LIMIT 20'
//! ```

pub mod chrome;
pub mod lanes;
pub mod merge;
pub mod run;
pub mod span;
pub mod step;
pub mod units;

// Re-export main types for convenience
pub use chrome::{TraceEvent, write_events, write_trace};
pub use lanes::{LaneAllocator, assign_lanes};
pub use merge::{embed_time_traces, rebase};
pub use run::{ConvertOptions, convert, source_to_events};
pub use span::{COMPLETE_PHASE, DEFAULT_GRANULARITY, Span, Spans, read_spans, time_trace_path};
pub use step::{Index, Step, StepKey, StepRecord, Trim, read_index, read_steps};
pub use units::{MICROS_PER_MILLI, Micros, Millis};
