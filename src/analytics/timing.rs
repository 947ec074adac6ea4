//! Per-button press/release timing extraction

use super::AnalyticsError;
use crate::eventlog::{EventKind, EventLogStore, LogEvent};
use crate::layout::ButtonMap;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Press and release timestamps of one button, indexed by occurrence
/// slot (the occurrence counter minus one).
///
/// Arrays are sized to the highest occurrence counter seen for the
/// button; entries that never appeared in the log stay `None`. The
/// duration array subtracts press from release elementwise, so an
/// unmatched press or release yields a `None` duration instead of a
/// bogus number.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ButtonTiming {
    pub press: Vec<Option<f64>>,
    pub release: Vec<Option<f64>>,
    pub duration: Vec<Option<f64>>,
}

impl ButtonTiming {
    /// Mean press duration over the complete pairs, ignoring missing
    /// entries; `None` when no pair is complete
    pub fn mean_duration(&self) -> Option<f64> {
        let mut sum = 0.0;
        let mut count = 0usize;
        for duration in self.duration.iter().flatten() {
            sum += duration;
            count += 1;
        }
        (count > 0).then(|| sum / count as f64)
    }

    /// Number of presses observed
    pub fn press_count(&self) -> usize {
        self.press.iter().flatten().count()
    }

    /// Number of press/release pairs with both sides present
    pub fn complete_pairs(&self) -> usize {
        self.duration.iter().flatten().count()
    }
}

/// Timing arrays per button, ordered by button name
#[derive(Debug, Clone, Default)]
pub struct TimingTable {
    entries: BTreeMap<String, ButtonTiming>,
}

impl TimingTable {
    pub fn get(&self, button: &str) -> Option<&ButtonTiming> {
        self.entries.get(button)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ButtonTiming)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One event of a chronological press or release list
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChronEvent<'a> {
    pub time: f64,
    pub symbol: &'a str,
    pub button: &'a str,
    /// 0-based occurrence slot
    pub slot: usize,
}

/// Chronological press and release lists, in source order
#[derive(Debug, Clone, Default)]
pub struct Chronology<'a> {
    pub presses: Vec<ChronEvent<'a>>,
    pub releases: Vec<ChronEvent<'a>>,
}

/// Projects a cleaned event stream into per-button timing arrays and
/// chronological event lists, restricted to a button subset.
///
/// The extractor holds no state beyond its inputs; every query is
/// recomputed from the stream.
pub struct TimingExtractor<'a> {
    events: &'a [LogEvent],
    buttons: Vec<String>,
}

impl<'a> TimingExtractor<'a> {
    /// Extractor over an explicit button universe
    pub fn new(store: &'a EventLogStore, buttons: Vec<String>) -> Self {
        Self {
            events: store.events(),
            buttons,
        }
    }

    /// Extractor defaulting to every button the layout map knows
    pub fn with_layout(store: &'a EventLogStore, map: &ButtonMap) -> Self {
        Self::new(store, map.buttons().to_vec())
    }

    /// The default button universe of this extractor
    pub fn buttons(&self) -> &[String] {
        &self.buttons
    }

    /// Timing arrays for the full button universe
    pub fn timing(&self) -> TimingTable {
        self.timing_for(&self.buttons)
    }

    /// Timing arrays for an explicit button subset
    pub fn timing_for(&self, buttons: &[String]) -> TimingTable {
        let requested: HashSet<&str> = buttons.iter().map(String::as_str).collect();

        // Size each button's arrays to the highest occurrence counter.
        let mut max_occurrence: HashMap<&str, u64> = HashMap::new();
        for event in self.events {
            if requested.contains(event.button.as_str()) {
                let max = max_occurrence.entry(event.button.as_str()).or_insert(0);
                *max = (*max).max(event.occurrence());
            }
        }

        let mut entries = BTreeMap::new();
        for button in buttons {
            let slots = max_occurrence.get(button.as_str()).copied().unwrap_or(0) as usize;
            entries.insert(
                button.clone(),
                ButtonTiming {
                    press: vec![None; slots],
                    release: vec![None; slots],
                    duration: vec![None; slots],
                },
            );
        }

        for event in self.events {
            let Some(timing) = entries.get_mut(&event.button) else {
                continue;
            };
            let cell = match event.kind() {
                EventKind::Press => timing.press.get_mut(event.slot()),
                EventKind::Release => timing.release.get_mut(event.slot()),
            };
            if let Some(cell) = cell {
                *cell = Some(event.time);
            }
        }

        for timing in entries.values_mut() {
            for slot in 0..timing.duration.len() {
                timing.duration[slot] = match (timing.press[slot], timing.release[slot]) {
                    (Some(pressed), Some(released)) => Some(released - pressed),
                    _ => None,
                };
            }
        }

        TimingTable { entries }
    }

    /// Chronological press/release lists for the full button universe
    pub fn chronological(&self) -> Result<Chronology<'a>, AnalyticsError> {
        self.chronological_for(&self.buttons)
    }

    /// Chronological press/release lists for an explicit subset.
    ///
    /// Both lists preserve source order and are verified to be
    /// ascending in time; a violation fails the query.
    pub fn chronological_for(&self, buttons: &[String]) -> Result<Chronology<'a>, AnalyticsError> {
        let requested: HashSet<&str> = buttons.iter().map(String::as_str).collect();
        let mut presses = Vec::new();
        let mut releases = Vec::new();

        for event in self.events {
            if !requested.contains(event.button.as_str()) {
                continue;
            }
            let entry = ChronEvent {
                time: event.time,
                symbol: &event.symbol,
                button: &event.button,
                slot: event.slot(),
            };
            match event.kind() {
                EventKind::Press => presses.push(entry),
                EventKind::Release => releases.push(entry),
            }
        }

        ensure_ascending(&presses, "press")?;
        ensure_ascending(&releases, "release")?;
        Ok(Chronology { presses, releases })
    }
}

fn ensure_ascending(events: &[ChronEvent<'_>], list: &'static str) -> Result<(), AnalyticsError> {
    for (index, pair) in events.windows(2).enumerate() {
        if pair[1].time < pair[0].time {
            return Err(AnalyticsError::OutOfOrder {
                list,
                index: index + 1,
                time: pair[1].time,
                previous: pair[0].time,
            });
        }
    }
    Ok(())
}
