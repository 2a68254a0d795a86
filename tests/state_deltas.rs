use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use fpl_leagues::model::Dataset;
use fpl_leagues::palette::DEFAULT_LEAGUE_COLORS;
use fpl_leagues::source::parse_dataset_json;
use fpl_leagues::state::{AppState, Delta, ExportFormat, Focus, apply_delta};

fn read_fixture(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    fs::read_to_string(path).expect("fixture read")
}

fn loaded_state() -> AppState {
    let mut state = AppState::new(DEFAULT_LEAGUE_COLORS.to_vec(), Duration::from_millis(500));
    let dataset = parse_dataset_json(&read_fixture("scores.json")).expect("fixture parses");
    apply_delta(&mut state, Delta::DatasetLoaded(dataset));
    state
}

fn visible_ids(state: &AppState) -> Vec<u32> {
    state.visible().iter().map(|m| m.id).collect()
}

#[test]
fn dataset_delta_finishes_loading() {
    let state = loaded_state();
    assert!(!state.loading);
    assert!(state.config_error.is_none());
    assert_eq!(state.visible().len(), 4);
    assert!(
        state
            .logs
            .back()
            .is_some_and(|l| l.starts_with("[INFO] Loaded 4 managers"))
    );
}

#[test]
fn empty_dataset_is_a_warning() {
    let mut state = AppState::new(DEFAULT_LEAGUE_COLORS.to_vec(), Duration::ZERO);
    apply_delta(&mut state, Delta::DatasetLoaded(Dataset::empty()));
    assert!(!state.loading);
    assert!(state.visible().is_empty());
    assert!(state.selected_manager().is_none());
    assert!(state.logs.back().is_some_and(|l| l.starts_with("[WARN]")));
}

#[test]
fn unmapped_league_surfaces_config_error() {
    let mut state = AppState::new(Vec::new(), Duration::ZERO);
    let dataset = parse_dataset_json(&read_fixture("scores.json")).expect("fixture parses");
    apply_delta(&mut state, Delta::DatasetLoaded(dataset));
    let err = state.config_error.as_deref().expect("config error set");
    assert!(err.contains("no color"), "{err}");
    assert!(state.visible().is_empty());
}

#[test]
fn log_ring_is_bounded() {
    let mut state = AppState::new(Vec::new(), Duration::ZERO);
    for idx in 0..250 {
        apply_delta(&mut state, Delta::Log(format!("[INFO] line {idx}")));
    }
    assert_eq!(state.logs.len(), 200);
    assert_eq!(state.logs.front().map(String::as_str), Some("[INFO] line 50"));
}

#[test]
fn search_waits_for_quiet_window() {
    let mut state = loaded_state();
    let start = Instant::now();
    for (offset, c) in "liam".chars().enumerate() {
        state.search_push(c, start + Duration::from_millis(offset as u64 * 100));
    }
    assert_eq!(state.search_input, "liam");

    assert!(!state.tick(start + Duration::from_millis(400)));
    assert_eq!(state.visible().len(), 4);

    assert!(state.tick(start + Duration::from_millis(800)));
    assert_eq!(visible_ids(&state), vec![77]);
}

#[test]
fn enter_commits_search_immediately() {
    let mut state = loaded_state();
    let now = Instant::now();
    state.search_push('b', now);
    state.search_push('e', now);
    state.commit_search();
    assert_eq!(visible_ids(&state), vec![1187]);

    state.search_clear(now);
    state.commit_search();
    assert_eq!(state.visible().len(), 4);
}

#[test]
fn selection_follows_manager_across_resort() {
    let mut state = loaded_state();
    state.select_next();
    state.select_next();
    assert_eq!(state.selected_manager().map(|m| m.id), Some(77));

    state.click_column(fpl_leagues::sort::SortKey::Fpl);
    assert_eq!(state.selected_manager().map(|m| m.id), Some(77));
    assert_eq!(state.selected, 2);
}

#[test]
fn hiding_selected_manager_clamps_selection() {
    let mut state = loaded_state();
    state.select_prev();
    assert_eq!(state.selected_manager().map(|m| m.id), Some(9302));

    // Cursor on 24490 (third league in the roster).
    state.league_cursor_next();
    state.league_cursor_next();
    state.toggle_league_at_cursor();
    assert!(!state.view.is_active(24490));
    assert_eq!(visible_ids(&state), vec![1187, 4021, 77]);
    assert_eq!(state.selected, 2);
}

#[test]
fn toggle_all_hides_then_shows_everything() {
    let mut state = loaded_state();
    state.toggle_all_leagues();
    assert!(state.visible().is_empty());
    state.toggle_all_leagues();
    assert_eq!(state.visible().len(), 4);
}

#[test]
fn focus_cycles_through_panels() {
    let mut state = loaded_state();
    assert_eq!(state.focus, Focus::Table);
    state.cycle_focus();
    assert_eq!(state.focus, Focus::Search);
    state.cycle_focus();
    assert_eq!(state.focus, Focus::Leagues);
    state.cycle_focus();
    assert_eq!(state.focus, Focus::Table);
}

#[test]
fn export_notice_expires() {
    let mut state = loaded_state();
    let dir = std::env::temp_dir().join(format!("fpl_leagues_state_{}", std::process::id()));
    let now = Instant::now();
    state.export_visible(&dir, ExportFormat::Csv, now);
    assert_eq!(state.export.rows, 4);
    assert!(state.export.error.is_none());
    assert!(state.export.is_shown());

    state.maybe_clear_export(now + Duration::from_secs(3));
    assert!(state.export.is_shown());
    state.maybe_clear_export(now + Duration::from_secs(9));
    assert!(!state.export.is_shown());
    let _ = fs::remove_dir_all(&dir);
}
