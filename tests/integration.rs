//! Integration tests for Typemetry
//!
//! These tests exercise the full pipeline: layout construction, log
//! writing across sessions, reconstruction, timing extraction,
//! transition statistics and report generation.

use std::path::PathBuf;
use typemetry::analytics::{TimingExtractor, TransitionStats};
use typemetry::eventlog::{EventLogStore, LogWriter};
use typemetry::layout::{standard_layout, LayoutOptions, StandardLayout};
use typemetry::report::AnalysisReport;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn default_layout() -> StandardLayout {
    standard_layout(&LayoutOptions::default()).expect("standard layout builds")
}

/// Write one press/release pair, resolving the symbol like a capture
/// collaborator would
fn tap(
    writer: &mut LogWriter<std::fs::File>,
    layout: &StandardLayout,
    symbol: &str,
    pressed_at: f64,
    released_at: f64,
) {
    let button = layout
        .map
        .resolve(symbol)
        .expect("symbol bound in layout")
        .to_string();
    writer.log_press(pressed_at, symbol, &button).unwrap();
    writer.log_release(released_at, symbol, &button).unwrap();
}

fn close(mut writer: LogWriter<std::fs::File>) {
    writer.flush().unwrap();
}

/// Two-session log: "aba" typed in the first session, "cd" in a second
/// one appended later
fn two_session_log(dir: &tempfile::TempDir) -> PathBuf {
    let layout = default_layout();
    let path = dir.path().join("loggedData.txt");

    let mut first = LogWriter::create(&path).unwrap();
    let button_a = layout.map.resolve("a").unwrap().to_string();
    first.log_press(0.0, "a", &button_a).unwrap();
    first.log_release(0.12, "a", &button_a).unwrap();
    tap(&mut first, &layout, "b", 0.3, 0.42);
    first.log_press(0.6, "a", &button_a).unwrap();
    first.log_release(0.72, "a", &button_a).unwrap();
    close(first);

    let mut second = LogWriter::append(&path).unwrap();
    tap(&mut second, &layout, "c", 0.0, 0.15);
    tap(&mut second, &layout, "d", 0.3, 0.45);
    close(second);

    path
}

fn approx(actual: f64, expected: f64) -> bool {
    (actual - expected).abs() < 1e-9
}

// ---------------------------------------------------------------------------
// Full pipeline
// ---------------------------------------------------------------------------

#[test]
fn two_session_log_is_stitched_into_one_stream() {
    let dir = tempfile::tempdir().unwrap();
    let path = two_session_log(&dir);

    let store = EventLogStore::from_path(&path).unwrap();
    assert_eq!(store.sessions(), 2);
    assert_eq!(store.len(), 10);

    // The second session starts 60s after the first one's last event.
    let times: Vec<f64> = store.events().iter().map(|e| e.time).collect();
    assert!(approx(times[5], 0.72));
    assert!(approx(times[6], 60.72));
    assert!(approx(times[9], 61.17));

    // Stream is monotonic after reconstruction.
    assert!(times.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn timing_pipeline_produces_per_button_durations() {
    let dir = tempfile::tempdir().unwrap();
    let path = two_session_log(&dir);
    let layout = default_layout();

    let store = EventLogStore::from_path(&path).unwrap();
    let extractor = TimingExtractor::with_layout(&store, &layout.map);
    let timing = extractor.timing();

    let a = timing.get("A").unwrap();
    assert_eq!(a.press_count(), 2);
    assert_eq!(a.complete_pairs(), 2);
    assert!(approx(a.mean_duration().unwrap(), 0.12));

    let c = timing.get("C").unwrap();
    assert!(approx(c.duration[0].unwrap(), 0.15));

    // Known to the layout but never typed.
    let q = timing.get("Q").unwrap();
    assert!(q.press.is_empty());
    assert_eq!(q.mean_duration(), None);
}

#[test]
fn transition_pipeline_excludes_the_session_gap() {
    let dir = tempfile::tempdir().unwrap();
    let path = two_session_log(&dir);
    let layout = default_layout();

    let store = EventLogStore::from_path(&path).unwrap();
    let extractor = TimingExtractor::with_layout(&store, &layout.map);
    let chronology = extractor.chronological().unwrap();
    assert_eq!(chronology.presses.len(), 5);
    assert_eq!(chronology.releases.len(), 5);

    let stats = TransitionStats::correlate(&chronology.presses, 1.5, extractor.buttons());

    // In-session transitions are counted...
    assert_eq!(stats.count_between("A", "B"), Some(1));
    assert!(approx(stats.mean_between("A", "B").unwrap(), 0.3));
    assert_eq!(stats.count_between("B", "A"), Some(1));
    assert_eq!(stats.count_between("C", "D"), Some(1));

    // ...but the 60s grace gap keeps the A -> C boundary out.
    assert_eq!(stats.count_between("A", "C"), Some(0));
    assert_eq!(stats.mean_between("A", "C"), None);

    assert_eq!(stats.total_samples(), 4);
}

#[test]
fn pipeline_is_deterministic() {
    let dir = tempfile::tempdir().unwrap();
    let path = two_session_log(&dir);
    let layout = default_layout();

    let run = || {
        let store = EventLogStore::from_path(&path).unwrap();
        let extractor = TimingExtractor::with_layout(&store, &layout.map);
        let chronology = extractor.chronological().unwrap();
        TransitionStats::correlate(&chronology.presses, 1.5, extractor.buttons())
    };
    assert_eq!(run(), run());
}

// ---------------------------------------------------------------------------
// Report generation & export
// ---------------------------------------------------------------------------

#[test]
fn report_export_covers_the_whole_analysis() {
    let dir = tempfile::tempdir().unwrap();
    let path = two_session_log(&dir);
    let layout = default_layout();

    let store = EventLogStore::from_path(&path).unwrap();
    let subset = layout.groups.alphabet.clone();
    let extractor = TimingExtractor::new(&store, subset);
    let timing = extractor.timing();
    let chronology = extractor.chronological().unwrap();
    let stats = TransitionStats::correlate(&chronology.presses, 1.5, extractor.buttons());

    let report = AnalysisReport::new(&store, &path, &timing, &stats, 1.5);
    assert_eq!(report.metadata.sessions, 2);
    assert_eq!(report.metadata.total_events, 10);
    assert_eq!(report.transitions.buttons.len(), 26);

    let out = dir.path().join("report.json");
    report.export_json(&out).unwrap();
    let contents = std::fs::read_to_string(&out).unwrap();
    assert!(contents.contains("\"sessions\": 2"));
    assert!(contents.contains("\"mean_secs\""));

    let parsed: AnalysisReport = serde_json::from_str(&contents).unwrap();
    assert_eq!(parsed.durations.len(), 26);
}

// ---------------------------------------------------------------------------
// Layout consultation at the capture boundary
// ---------------------------------------------------------------------------

#[test]
fn unbound_symbols_resolve_to_none_and_stay_unlogged() {
    let layout = default_layout();
    assert_eq!(layout.map.resolve("💥"), None);

    // A capture collaborator drops unresolvable symbols; the analysis
    // side never sees them.
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("loggedData.txt");
    let mut writer = LogWriter::create(&path).unwrap();
    for (symbol, pressed_at) in [("💥", 0.0), ("a", 0.5)] {
        if let Some(button) = layout.map.resolve(symbol) {
            let button = button.to_string();
            writer.log_press(pressed_at, symbol, &button).unwrap();
            writer.log_release(pressed_at + 0.1, symbol, &button).unwrap();
        }
    }
    close(writer);

    let store = EventLogStore::from_path(&path).unwrap();
    assert_eq!(store.len(), 2);
    assert_eq!(store.buttons(), ["A"]);
}

#[test]
fn analysis_subset_can_differ_from_log_content() {
    let dir = tempfile::tempdir().unwrap();
    let path = two_session_log(&dir);
    let layout = default_layout();

    let store = EventLogStore::from_path(&path).unwrap();
    let extractor = TimingExtractor::with_layout(&store, &layout.map);

    // Restrict to the numeric group, which never appears in the log.
    let numeric = layout.groups.numeric.clone();
    let chronology = extractor.chronological_for(&numeric).unwrap();
    assert!(chronology.presses.is_empty());

    let stats = TransitionStats::correlate(&chronology.presses, 1.5, &numeric);
    assert_eq!(stats.total_samples(), 0);
    assert_eq!(stats.mean_between("1", "2"), None);
}
