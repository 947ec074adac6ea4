//! Log event types

/// Polarity of a keystroke event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// Key was pressed down
    Press,
    /// Key was released
    Release,
}

/// One keystroke log entry.
///
/// `code` carries both the polarity and the pairing information: the
/// sign encodes press (>= 0) versus release (< 0), and the magnitude is
/// the 1-based per-button occurrence counter that pairs the Nth press
/// of a button with its Nth release. A magnitude of zero never appears
/// in a well-formed log.
#[derive(Debug, Clone, PartialEq)]
pub struct LogEvent {
    /// Seconds since the start of the (reconstructed) log
    pub time: f64,
    /// The logical symbol the key produced (e.g. `"a"`, `"@"`, `"f1"`)
    pub symbol: String,
    /// The physical button the symbol resolved to
    pub button: String,
    /// Signed occurrence code as stored in the log
    pub code: i64,
}

impl LogEvent {
    pub fn new(time: f64, symbol: impl Into<String>, button: impl Into<String>, code: i64) -> Self {
        Self {
            time,
            symbol: symbol.into(),
            button: button.into(),
            code,
        }
    }

    /// A press event with a 1-based occurrence counter
    pub fn press(
        time: f64,
        symbol: impl Into<String>,
        button: impl Into<String>,
        occurrence: u32,
    ) -> Self {
        Self::new(time, symbol, button, i64::from(occurrence))
    }

    /// A release event with a 1-based occurrence counter
    pub fn release(
        time: f64,
        symbol: impl Into<String>,
        button: impl Into<String>,
        occurrence: u32,
    ) -> Self {
        Self::new(time, symbol, button, -i64::from(occurrence))
    }

    pub fn kind(&self) -> EventKind {
        if self.code >= 0 {
            EventKind::Press
        } else {
            EventKind::Release
        }
    }

    /// 1-based per-button occurrence counter
    pub fn occurrence(&self) -> u64 {
        self.code.unsigned_abs()
    }

    /// 0-based array index derived from the occurrence counter
    pub fn slot(&self) -> usize {
        self.occurrence().saturating_sub(1) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_sign_encodes_polarity() {
        assert_eq!(LogEvent::press(0.0, "a", "A", 1).kind(), EventKind::Press);
        assert_eq!(
            LogEvent::release(0.1, "a", "A", 1).kind(),
            EventKind::Release
        );
    }

    #[test]
    fn slot_is_zero_based() {
        let event = LogEvent::release(0.5, "b", "B", 3);
        assert_eq!(event.occurrence(), 3);
        assert_eq!(event.slot(), 2);
    }
}
