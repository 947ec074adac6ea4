//! Analysis report and export functionality

use crate::analytics::{TimingTable, TransitionStats};
use crate::eventlog::EventLogStore;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Complete analysis report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Report metadata
    pub metadata: ReportMetadata,
    /// Press duration aggregates per button
    pub durations: Vec<DurationEntry>,
    /// Button-to-button transition statistics
    pub transitions: TransitionSection,
}

/// Report metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Report generation timestamp
    pub generated_at: String,
    /// Application version
    pub version: String,
    /// Log file the analysis was computed from
    pub log_path: String,
    /// Number of logging sessions stitched together
    pub sessions: usize,
    /// Total events in the reconstructed stream
    pub total_events: usize,
}

/// Press duration aggregate of one button
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DurationEntry {
    pub button: String,
    /// Presses observed in the log
    pub presses: usize,
    /// Press/release pairs with both sides present
    pub complete_pairs: usize,
    /// Mean press duration over complete pairs; `null` when none
    pub mean_duration_secs: Option<f64>,
}

/// Transition matrices over the analyzed button list.
///
/// Matrix rows are indexed by the following button and columns by the
/// preceding one: `mean_secs[i][j]` is the mean time from pressing
/// `buttons[j]` to pressing `buttons[i]`. Cells without samples carry
/// `null` statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionSection {
    /// Outlier limit applied while accumulating samples
    pub time_limit_secs: f64,
    pub buttons: Vec<String>,
    pub count: Vec<Vec<u64>>,
    pub mean_secs: Vec<Vec<Option<f64>>>,
    pub variance_secs2: Vec<Vec<Option<f64>>>,
}

impl AnalysisReport {
    /// Assemble a report from computed analytics
    pub fn new(
        store: &EventLogStore,
        log_path: &Path,
        timing: &TimingTable,
        transitions: &TransitionStats,
        time_limit_secs: f64,
    ) -> Self {
        let now: DateTime<Utc> = Utc::now();

        let durations = timing
            .iter()
            .map(|(button, entry)| DurationEntry {
                button: button.clone(),
                presses: entry.press_count(),
                complete_pairs: entry.complete_pairs(),
                mean_duration_secs: entry.mean_duration(),
            })
            .collect();

        Self {
            metadata: ReportMetadata {
                generated_at: now.to_rfc3339(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                log_path: log_path.display().to_string(),
                sessions: store.sessions(),
                total_events: store.len(),
            },
            durations,
            transitions: TransitionSection {
                time_limit_secs,
                buttons: transitions.buttons().to_vec(),
                count: transitions.count_rows(),
                mean_secs: transitions.mean_rows(),
                variance_secs2: transitions.variance_rows(),
            },
        }
    }

    /// Export report to JSON file
    pub fn export_json(&self, path: &Path) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }

    /// Export report to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
