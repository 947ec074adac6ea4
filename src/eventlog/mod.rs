//! Keystroke log model, reader and writer

mod event;
mod store;
mod writer;

pub use event::{EventKind, LogEvent};
pub use store::{EventLogStore, SESSION_GAP_SECS};
pub use writer::LogWriter;

use thiserror::Error;

/// Error type for log reading and writing
#[derive(Debug, Error)]
pub enum LogError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("log format error: {0}")]
    Csv(#[from] csv::Error),
    /// A data row carried a field that cannot be interpreted
    #[error("malformed {field} field {value:?} on line {line}")]
    MalformedField {
        line: u64,
        field: &'static str,
        value: String,
    },
}
