//! Keystroke log writing in the boundary format

use super::LogError;
use log::warn;
use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

/// Width of the padded `Time`, `Key` and `Button` columns
const FIELD_WIDTH: usize = 15;

/// Writes keystroke rows in the tab-separated log format and assigns
/// per-button occurrence counters.
///
/// Each press increments the button's counter and is written as
/// `+NNNNNNN`; the matching release re-uses the counter as `-NNNNNNN`.
/// The column header is (re-)emitted whenever a writer is opened, also
/// when appending to an existing file; that repeated header line is
/// exactly the session marker the reader reconstructs from.
///
/// Timestamps are caller-supplied seconds; the writer has no clock and
/// performs no input capture of its own.
pub struct LogWriter<W: Write> {
    wtr: csv::Writer<W>,
    counters: HashMap<String, u32>,
}

impl LogWriter<File> {
    /// Start a fresh log file, truncating any existing content
    pub fn create(path: impl AsRef<Path>) -> Result<Self, LogError> {
        Self::from_writer(File::create(path)?)
    }

    /// Append a new session to a log file (created when missing)
    pub fn append(path: impl AsRef<Path>) -> Result<Self, LogError> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Self::from_writer(file)
    }
}

impl<W: Write> LogWriter<W> {
    /// Wrap a writer and emit the column header
    pub fn from_writer(inner: W) -> Result<Self, LogError> {
        let mut wtr = csv::WriterBuilder::new()
            .delimiter(b'\t')
            .quote_style(csv::QuoteStyle::Never)
            .from_writer(inner);
        wtr.write_record(["Time", "Key", "Button", "Event"])?;
        Ok(Self {
            wtr,
            counters: HashMap::new(),
        })
    }

    /// Record a key press, advancing the button's occurrence counter
    pub fn log_press(&mut self, time: f64, symbol: &str, button: &str) -> Result<(), LogError> {
        let counter = self.counters.entry(button.to_string()).or_insert(0);
        *counter += 1;
        let event = format!("+{:07}", *counter);
        self.write_row(time, symbol, button, &event)
    }

    /// Record a key release, pairing it with the latest press.
    ///
    /// A release with no prior press cannot be paired by any reader,
    /// so it is skipped with a warning instead of being written.
    pub fn log_release(&mut self, time: f64, symbol: &str, button: &str) -> Result<(), LogError> {
        match self.counters.get(button) {
            Some(&counter) if counter > 0 => {
                let event = format!("-{counter:07}");
                self.write_row(time, symbol, button, &event)
            }
            _ => {
                warn!("release of {button:?} without a logged press, skipping");
                Ok(())
            }
        }
    }

    pub fn flush(&mut self) -> Result<(), LogError> {
        self.wtr.flush()?;
        Ok(())
    }

    fn write_row(
        &mut self,
        time: f64,
        symbol: &str,
        button: &str,
        event: &str,
    ) -> Result<(), LogError> {
        self.wtr.write_record([
            format!("{:<width$}", format!("{time:.6}"), width = FIELD_WIDTH),
            format!("{symbol:<width$}", width = FIELD_WIDTH),
            format!("{button:<width$}", width = FIELD_WIDTH),
            event.to_string(),
        ])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eventlog::{EventKind, EventLogStore};

    fn written(writer: LogWriter<Vec<u8>>) -> String {
        String::from_utf8(writer.wtr.into_inner().unwrap()).unwrap()
    }

    #[test]
    fn rows_use_the_fixed_width_format() {
        let mut writer = LogWriter::from_writer(Vec::new()).unwrap();
        writer.log_press(1.5, "a", "A").unwrap();
        writer.log_release(1.75, "a", "A").unwrap();

        let text = written(writer);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Time\tKey\tButton\tEvent");
        assert_eq!(lines[1], "1.500000       \ta              \tA              \t+0000001");
        assert_eq!(lines[2], "1.750000       \ta              \tA              \t-0000001");
    }

    #[test]
    fn presses_advance_per_button_counters() {
        let mut writer = LogWriter::from_writer(Vec::new()).unwrap();
        writer.log_press(0.0, "a", "A").unwrap();
        writer.log_press(0.1, "b", "B").unwrap();
        writer.log_press(0.2, "a", "A").unwrap();

        let text = written(writer);
        assert!(text.contains("A              \t+0000002"));
        assert!(text.contains("B              \t+0000001"));
    }

    #[test]
    fn unmatched_release_is_skipped() {
        let mut writer = LogWriter::from_writer(Vec::new()).unwrap();
        writer.log_release(0.0, "a", "A").unwrap();
        let text = written(writer);
        assert_eq!(text.lines().count(), 1); // header only
    }

    #[test]
    fn round_trips_through_the_store() {
        let mut writer = LogWriter::from_writer(Vec::new()).unwrap();
        writer.log_press(0.0, "q", "Q").unwrap();
        writer.log_release(0.125, "q", "Q").unwrap();
        writer.log_press(0.5, "w", "W").unwrap();
        writer.log_release(0.625, "w", "W").unwrap();
        let text = written(writer);

        let store = EventLogStore::from_reader(text.as_bytes()).unwrap();
        assert_eq!(store.len(), 4);
        assert_eq!(store.events()[0].kind(), EventKind::Press);
        assert_eq!(store.events()[0].occurrence(), 1);
        assert_eq!(store.events()[1].kind(), EventKind::Release);
        assert_eq!(store.events()[3].time, 0.625);
    }

    #[test]
    fn append_to_file_creates_a_session_marker() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("typing.log");

        let mut first = LogWriter::create(&path).unwrap();
        first.log_press(0.0, "a", "A").unwrap();
        first.log_release(5.0, "a", "A").unwrap();
        first.flush().unwrap();
        drop(first);

        let mut second = LogWriter::append(&path).unwrap();
        second.log_press(0.0, "b", "B").unwrap();
        second.log_release(3.0, "b", "B").unwrap();
        second.flush().unwrap();
        drop(second);

        let store = EventLogStore::from_path(&path).unwrap();
        assert_eq!(store.sessions(), 2);
        let times: Vec<f64> = store.events().iter().map(|e| e.time).collect();
        assert_eq!(times, [0.0, 5.0, 65.0, 68.0]);
    }
}
