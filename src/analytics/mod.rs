//! Timing and transition statistics derived from a cleaned event stream

mod timing;
mod transitions;

pub use timing::{ButtonTiming, ChronEvent, Chronology, TimingExtractor, TimingTable};
pub use transitions::TransitionStats;

use thiserror::Error;

/// Error type for analytics queries
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// A derived chronological list was not ascending in time, which
    /// means the upstream log violates its ordering guarantee; the
    /// query fails rather than silently re-sorting
    #[error(
        "{list} list is not ascending in time at index {index}: \
         {time} follows {previous}"
    )]
    OutOfOrder {
        list: &'static str,
        index: usize,
        time: f64,
        previous: f64,
    },
}
