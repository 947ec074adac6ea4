//! Log file reading and session reconstruction

use super::{LogError, LogEvent};
use log::debug;
use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Grace gap inserted between appended logging sessions, so a session
/// boundary never looks like a fast key-to-key transition
pub const SESSION_GAP_SECS: f64 = 60.0;

/// First column label; a data row starting with it marks the point
/// where a new session was appended and the header was re-emitted
const HEADER_TOKEN: &str = "Time";

/// A cleaned, time-ordered view over a keystroke log.
///
/// A log file written across several sessions contains the column
/// header once per session, and each session's clock restarts at zero.
/// The store detects the re-emitted header rows, shifts every
/// subsequent session forward by the end of the previous one plus
/// [`SESSION_GAP_SECS`], and drops the marker rows, yielding one
/// logically continuous stream. The store is immutable once built.
#[derive(Debug, Clone)]
pub struct EventLogStore {
    events: Vec<LogEvent>,
    sessions: usize,
}

impl EventLogStore {
    /// Read and reconstruct a log file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, LogError> {
        let store = Self::from_reader(File::open(path.as_ref())?)?;
        debug!(
            "loaded {} events ({} session(s)) from {}",
            store.len(),
            store.sessions(),
            path.as_ref().display()
        );
        Ok(store)
    }

    /// Read and reconstruct a log from any reader.
    ///
    /// The input must start with the `Time/Key/Button/Event` header
    /// line. Fields are whitespace-trimmed; `Time` must parse as a
    /// float and `Event` as a signed integer with nonzero magnitude.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, LogError> {
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut events = Vec::new();
        let mut markers = 0usize;
        let mut shift = 0.0f64;
        // Time of the previous raw row after adjustment. Marker rows
        // carry no event time, so they reset this to zero; an appended
        // session that logged nothing therefore restarts the clock.
        let mut prev_row_time = 0.0f64;

        for result in rdr.records() {
            let record = result?;
            let line = record.position().map_or(0, |p| p.line());
            let time_field = record.get(0).unwrap_or_default();

            if time_field == HEADER_TOKEN {
                markers += 1;
                shift = prev_row_time + SESSION_GAP_SECS;
                prev_row_time = 0.0;
                continue;
            }

            let time: f64 = time_field.parse().map_err(|_| LogError::MalformedField {
                line,
                field: "Time",
                value: time_field.to_string(),
            })?;
            let symbol = record.get(1).unwrap_or_default();
            let button = record.get(2).unwrap_or_default();
            let event_field = record.get(3).unwrap_or_default();
            let code: i64 = event_field
                .parse()
                .ok()
                .filter(|code| *code != 0)
                .ok_or_else(|| LogError::MalformedField {
                    line,
                    field: "Event",
                    value: event_field.to_string(),
                })?;

            let time = time + shift;
            prev_row_time = time;
            events.push(LogEvent::new(time, symbol, button, code));
        }

        Ok(Self {
            events,
            sessions: markers + 1,
        })
    }

    /// Wrap an already-clean event sequence (the boundary used by a
    /// live capture collaborator)
    pub fn from_events(events: Vec<LogEvent>) -> Self {
        Self {
            events,
            sessions: 1,
        }
    }

    /// The reconstructed, marker-free event stream
    pub fn events(&self) -> &[LogEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of logging sessions the file was written across
    pub fn sessions(&self) -> usize {
        self.sessions
    }

    /// Distinct buttons in first-seen order
    pub fn buttons(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut buttons = Vec::new();
        for event in &self.events {
            if seen.insert(event.button.as_str()) {
                buttons.push(event.button.clone());
            }
        }
        buttons
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Time\tKey\tButton\tEvent\n";

    fn row(time: f64, symbol: &str, button: &str, code: i64) -> String {
        let sign = if code >= 0 { '+' } else { '-' };
        format!(
            "{:<15}\t{:<15}\t{:<15}\t{}{:07}\n",
            format!("{time:.6}"),
            symbol,
            button,
            sign,
            code.unsigned_abs()
        )
    }

    fn store_from(content: &str) -> EventLogStore {
        EventLogStore::from_reader(content.as_bytes()).unwrap()
    }

    #[test]
    fn single_session_passes_through() {
        let content = format!(
            "{HEADER}{}{}",
            row(0.0, "a", "A", 1),
            row(0.25, "a", "A", -1)
        );
        let store = store_from(&content);

        assert_eq!(store.len(), 2);
        assert_eq!(store.sessions(), 1);
        let times: Vec<f64> = store.events().iter().map(|e| e.time).collect();
        assert_eq!(times, [0.0, 0.25]);
        assert_eq!(store.events()[0].button, "A");
        assert_eq!(store.events()[1].code, -1);
    }

    #[test]
    fn appended_session_is_shifted_by_gap() {
        let content = format!(
            "{HEADER}{}{}{HEADER}{}{}",
            row(0.0, "a", "A", 1),
            row(5.0, "a", "A", -1),
            row(0.0, "b", "B", 1),
            row(3.0, "b", "B", -1)
        );
        let store = store_from(&content);

        assert_eq!(store.sessions(), 2);
        let times: Vec<f64> = store.events().iter().map(|e| e.time).collect();
        assert_eq!(times, [0.0, 5.0, 65.0, 68.0]);
    }

    #[test]
    fn offsets_accumulate_across_multiple_appends() {
        let content = format!(
            "{HEADER}{}{HEADER}{}{HEADER}{}",
            row(0.0, "a", "A", 1),
            row(2.0, "b", "B", 1),
            row(1.0, "c", "C", 1)
        );
        let store = store_from(&content);

        assert_eq!(store.sessions(), 3);
        let times: Vec<f64> = store.events().iter().map(|e| e.time).collect();
        // 2.0 + 60 = 62.0 for the second session, 62.0 + 60 + 1.0 for the third.
        assert_eq!(times, [0.0, 62.0, 123.0]);
    }

    #[test]
    fn marker_as_first_data_row_uses_zero_base() {
        let content = format!("{HEADER}{HEADER}{}", row(1.0, "a", "A", 1));
        let store = store_from(&content);

        assert_eq!(store.sessions(), 2);
        assert_eq!(store.events()[0].time, 61.0);
    }

    #[test]
    fn padded_fields_are_trimmed() {
        let content = format!("{HEADER}{}", row(0.5, "shift", "Shift_l", 1));
        let store = store_from(&content);
        assert_eq!(store.events()[0].symbol, "shift");
        assert_eq!(store.events()[0].button, "Shift_l");
    }

    #[test]
    fn unparsable_time_is_an_error() {
        let content = format!("{HEADER}oops\ta\tA\t+0000001\n");
        let err = EventLogStore::from_reader(content.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            LogError::MalformedField { field: "Time", .. }
        ));
    }

    #[test]
    fn zero_occurrence_code_is_an_error() {
        let content = format!("{HEADER}0.1\ta\tA\t+0000000\n");
        let err = EventLogStore::from_reader(content.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            LogError::MalformedField { field: "Event", .. }
        ));
    }

    #[test]
    fn empty_log_has_no_events() {
        let store = store_from(HEADER);
        assert!(store.is_empty());
        assert_eq!(store.sessions(), 1);
        assert!(store.buttons().is_empty());
    }

    #[test]
    fn buttons_are_listed_in_first_seen_order() {
        let content = format!(
            "{HEADER}{}{}{}{}",
            row(0.0, "b", "B", 1),
            row(0.1, "a", "A", 1),
            row(0.2, "b", "B", -1),
            row(0.3, "a", "A", -1)
        );
        let store = store_from(&content);
        assert_eq!(store.buttons(), ["B", "A"]);
    }
}
