//! linelog — syslog-severity line logger and wire-format stream parser.
//!
//! Two halves share one fixed eight-level severity scale:
//!
//! - [`Logger`] writes `[<timestamp>] <LEVELNAME> <message>` lines to a
//!   [`LogSink`], gated by a severity threshold.
//! - [`Reader`] consumes text chunks from a readable source, buffers partial
//!   lines, and parses completed lines back into [`Record`] values, yielded
//!   as a stream of [`Event`]s.
//!
//! Both halves are synchronous and single-sink. This is not a structured
//! logging framework: no transports, no formatter registry, no child
//! loggers.

pub mod level;
pub mod logger;
pub mod reader;

pub use level::Level;
pub use logger::{
    BufferSink, Config, LogSink, Logger, NullSink, StderrSink, StdoutSink,
    DEFAULT_DATETIME_FORMAT,
};
pub use reader::{Event, Events, Reader, Record};
