//! Button-to-button transition statistics

use super::ChronEvent;
use std::collections::HashMap;

/// Count, mean and sample variance of the transition time between
/// every ordered pair of buttons.
///
/// Matrices are square over the requested button list. Cells are
/// addressed as `(following, preceding)`: the value at
/// `(indexOf(B), indexOf(A))` describes transitions where pressing `A`
/// was immediately followed by pressing `B`. Empty cells report a
/// count of zero and `None` statistics rather than an error.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionStats {
    buttons: Vec<String>,
    count: Vec<u64>,
    mean: Vec<Option<f64>>,
    variance: Vec<Option<f64>>,
}

impl TransitionStats {
    /// Accumulate transition samples from a chronological press list.
    ///
    /// The walk keeps the immediately preceding in-set event. A gap
    /// larger than `time_limit` seconds is treated as a thinking pause:
    /// the sample is discarded, but the event still becomes the new
    /// "previous" so adjacency stays truthful. The cursor is seeded
    /// with the first list element, which therefore contributes a
    /// zero-length self-transition, matching the logs this crate's
    /// statistics are compared against.
    pub fn correlate(events: &[ChronEvent<'_>], time_limit: f64, buttons: &[String]) -> Self {
        let size = buttons.len();
        let index: HashMap<&str, usize> = buttons
            .iter()
            .enumerate()
            .map(|(i, button)| (button.as_str(), i))
            .collect();

        let mut samples: Vec<Vec<f64>> = vec![Vec::new(); size * size];
        if let Some(first) = events.first() {
            let mut previous = first;
            for event in events {
                let Some(&following) = index.get(event.button) else {
                    continue;
                };
                if let Some(&preceding) = index.get(previous.button) {
                    let delta = event.time - previous.time;
                    if delta <= time_limit {
                        samples[following * size + preceding].push(delta);
                    }
                }
                previous = event;
            }
        }

        let mut count = vec![0u64; size * size];
        let mut mean = vec![None; size * size];
        let mut variance = vec![None; size * size];
        for (cell, bucket) in samples.iter().enumerate() {
            let n = bucket.len();
            count[cell] = n as u64;
            if n == 0 {
                continue;
            }
            let avg = bucket.iter().sum::<f64>() / n as f64;
            mean[cell] = Some(avg);
            if n >= 2 {
                let squared = bucket.iter().map(|x| (x - avg) * (x - avg)).sum::<f64>();
                variance[cell] = Some(squared / (n - 1) as f64);
            }
        }

        Self {
            buttons: buttons.to_vec(),
            count,
            mean,
            variance,
        }
    }

    /// Buttons indexing the matrix axes
    pub fn buttons(&self) -> &[String] {
        &self.buttons
    }

    /// Side length of the matrices
    pub fn size(&self) -> usize {
        self.buttons.len()
    }

    pub fn index_of(&self, button: &str) -> Option<usize> {
        self.buttons.iter().position(|b| b == button)
    }

    pub fn count_at(&self, following: usize, preceding: usize) -> u64 {
        self.count[following * self.size() + preceding]
    }

    pub fn mean_at(&self, following: usize, preceding: usize) -> Option<f64> {
        self.mean[following * self.size() + preceding]
    }

    pub fn variance_at(&self, following: usize, preceding: usize) -> Option<f64> {
        self.variance[following * self.size() + preceding]
    }

    /// Sample count for a named `preceding -> following` pair; `None`
    /// when either button is not part of the matrix
    pub fn count_between(&self, preceding: &str, following: &str) -> Option<u64> {
        let (f, p) = (self.index_of(following)?, self.index_of(preceding)?);
        Some(self.count_at(f, p))
    }

    /// Mean transition time for a named pair, `None` when the cell is
    /// empty or a button is unknown
    pub fn mean_between(&self, preceding: &str, following: &str) -> Option<f64> {
        let (f, p) = (self.index_of(following)?, self.index_of(preceding)?);
        self.mean_at(f, p)
    }

    /// Sample variance for a named pair, `None` below two samples
    pub fn variance_between(&self, preceding: &str, following: &str) -> Option<f64> {
        let (f, p) = (self.index_of(following)?, self.index_of(preceding)?);
        self.variance_at(f, p)
    }

    /// Total number of retained samples
    pub fn total_samples(&self) -> u64 {
        self.count.iter().sum()
    }

    /// Count matrix as rows; `rows[following][preceding]`
    pub fn count_rows(&self) -> Vec<Vec<u64>> {
        self.count.chunks(self.size().max(1)).map(Vec::from).collect()
    }

    /// Mean matrix as rows; `rows[following][preceding]`
    pub fn mean_rows(&self) -> Vec<Vec<Option<f64>>> {
        self.mean.chunks(self.size().max(1)).map(Vec::from).collect()
    }

    /// Variance matrix as rows; `rows[following][preceding]`
    pub fn variance_rows(&self) -> Vec<Vec<Option<f64>>> {
        self.variance
            .chunks(self.size().max(1))
            .map(Vec::from)
            .collect()
    }
}
