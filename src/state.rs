use std::collections::VecDeque;
use std::path::Path;
use std::time::{Duration, Instant};

use crate::debounce::Debouncer;
use crate::export;
use crate::model::{Dataset, League, Manager};
use crate::palette::LeagueColor;
use crate::sort::SortKey;
use crate::view::ViewState;

const MAX_LOGS: usize = 200;
const EXPORT_NOTICE_SECS: u64 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Table,
    Search,
    Leagues,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Workbook,
}

#[derive(Debug, Clone)]
pub enum Delta {
    DatasetLoaded(Dataset),
    Log(String),
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub view: ViewState,
    pub league_colors: Vec<(u32, LeagueColor)>,
    pub loading: bool,
    pub source_label: String,
    pub config_error: Option<String>,
    pub focus: Focus,
    pub selected: usize,
    pub league_cursor: usize,
    pub search_input: String,
    pub search_debounce: Debouncer<String>,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
    pub export: ExportState,
}

impl AppState {
    pub fn new(league_colors: Vec<(u32, LeagueColor)>, filter_debounce: Duration) -> Self {
        Self {
            view: ViewState::empty(),
            league_colors,
            loading: true,
            source_label: String::new(),
            config_error: None,
            focus: Focus::Table,
            selected: 0,
            league_cursor: 0,
            search_input: String::new(),
            search_debounce: Debouncer::new(filter_debounce),
            logs: VecDeque::with_capacity(MAX_LOGS),
            help_overlay: false,
            export: ExportState::new(),
        }
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }

    pub fn leagues(&self) -> &[League] {
        &self.view.dataset().leagues
    }

    pub fn visible(&self) -> &[Manager] {
        self.view.visible()
    }

    pub fn selected_manager(&self) -> Option<&Manager> {
        self.view.visible().get(self.selected)
    }

    /// Replaces the dataset and resets every view setting to its default.
    pub fn set_dataset(&mut self, dataset: Dataset) {
        self.loading = false;
        let managers = dataset.managers.len();
        let leagues = dataset.leagues.len();
        match ViewState::new(dataset, self.league_colors.iter().copied()) {
            Ok(view) => {
                self.view = view;
                self.config_error = None;
                self.selected = 0;
                self.league_cursor = 0;
                self.search_input.clear();
                self.search_debounce.cancel();
                if managers == 0 {
                    self.push_log("[WARN] No managers in dataset");
                } else {
                    self.push_log(format!(
                        "[INFO] Loaded {managers} managers in {leagues} leagues"
                    ));
                }
            }
            Err(err) => {
                self.push_log(format!("[ERROR] {err}"));
                self.config_error = Some(err.to_string());
            }
        }
    }

    pub fn cycle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Table => Focus::Search,
            Focus::Search => Focus::Leagues,
            Focus::Leagues => Focus::Table,
        };
    }

    pub fn click_column(&mut self, key: SortKey) {
        self.keep_selection(|view| view.click_column(key));
        let sort = self.view.sort();
        self.push_log(format!(
            "[INFO] Sort: {} {}",
            sort.key.field_name(),
            sort.direction.arrow()
        ));
    }

    pub fn toggle_league_at_cursor(&mut self) {
        let Some(league) = self.leagues().get(self.league_cursor).cloned() else {
            return;
        };
        let checked = !self.view.is_active(league.id);
        let mut result = Ok(());
        self.keep_selection(|view| result = view.toggle_league(league.id, checked));
        match result {
            Ok(()) => self.push_log(format!(
                "[INFO] {} {}",
                league.name,
                if checked { "shown" } else { "hidden" }
            )),
            Err(err) => self.push_log(format!("[ERROR] {err}")),
        }
    }

    /// Shows every league, or hides all when they are all shown already.
    pub fn toggle_all_leagues(&mut self) {
        let all = self.view.dataset().league_ids();
        let next = if self.view.active() == &all {
            Default::default()
        } else {
            all
        };
        let mut result = Ok(());
        self.keep_selection(|view| result = view.set_active(next));
        if let Err(err) = result {
            self.push_log(format!("[ERROR] {err}"));
        }
    }

    pub fn league_cursor_next(&mut self) {
        let total = self.leagues().len();
        if total == 0 {
            self.league_cursor = 0;
            return;
        }
        self.league_cursor = (self.league_cursor + 1) % total;
    }

    pub fn league_cursor_prev(&mut self) {
        let total = self.leagues().len();
        if total == 0 {
            self.league_cursor = 0;
            return;
        }
        if self.league_cursor == 0 {
            self.league_cursor = total - 1;
        } else {
            self.league_cursor -= 1;
        }
    }

    pub fn search_push(&mut self, c: char, now: Instant) {
        self.search_input.push(c);
        self.search_debounce.push(self.search_input.clone(), now);
    }

    pub fn search_backspace(&mut self, now: Instant) {
        if self.search_input.pop().is_some() {
            self.search_debounce.push(self.search_input.clone(), now);
        }
    }

    pub fn search_clear(&mut self, now: Instant) {
        self.search_input.clear();
        self.search_debounce.push(String::new(), now);
    }

    /// Applies the typed query now instead of waiting for the quiet window.
    pub fn commit_search(&mut self) {
        if let Some(query) = self.search_debounce.flush() {
            self.apply_query(&query);
        }
    }

    /// Applies a debounced query once typing has paused. Returns true when the view changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.maybe_clear_export(now);
        match self.search_debounce.poll(now) {
            Some(query) => {
                self.apply_query(&query);
                true
            }
            None => false,
        }
    }

    fn apply_query(&mut self, query: &str) {
        if self.view.matcher().raw() == query {
            return;
        }
        self.keep_selection(|view| view.set_query(query));
    }

    pub fn select_next(&mut self) {
        let total = self.visible().len();
        if total == 0 {
            self.selected = 0;
            return;
        }
        self.selected = (self.selected + 1) % total;
    }

    pub fn select_prev(&mut self) {
        let total = self.visible().len();
        if total == 0 {
            self.selected = 0;
            return;
        }
        if self.selected == 0 {
            self.selected = total - 1;
        } else {
            self.selected -= 1;
        }
    }

    pub fn clamp_selection(&mut self) {
        let total = self.visible().len();
        if total == 0 {
            self.selected = 0;
        } else if self.selected >= total {
            self.selected = total - 1;
        }
    }

    pub fn export_visible(&mut self, dir: &Path, format: ExportFormat, now: Instant) {
        let rows = self.visible().len();
        let result = match format {
            ExportFormat::Csv => export::write_csv(dir, self.view.visible()),
            ExportFormat::Workbook => export::write_workbook(dir, self.view.visible()),
        };
        match result {
            Ok(path) => {
                let path = path.display().to_string();
                self.push_log(format!("[INFO] Exported {rows} rows to {path}"));
                self.export = ExportState {
                    path: Some(path),
                    rows,
                    error: None,
                    last_updated: Some(now),
                };
            }
            Err(err) => {
                let msg = format!("{err:#}");
                self.push_log(format!("[ERROR] Export failed: {msg}"));
                self.export = ExportState {
                    path: None,
                    rows: 0,
                    error: Some(msg),
                    last_updated: Some(now),
                };
            }
        }
    }

    pub fn maybe_clear_export(&mut self, now: Instant) {
        self.export.clear_if_done_for(now, EXPORT_NOTICE_SECS);
    }

    // Keeps the highlighted manager selected when it survives the recompute.
    fn keep_selection(&mut self, change: impl FnOnce(&mut ViewState)) {
        let selected_id = self.selected_manager().map(|m| m.id);
        change(&mut self.view);
        if let Some(pos) = selected_id.and_then(|id| self.view.position_of(id)) {
            self.selected = pos;
        } else {
            self.clamp_selection();
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ExportState {
    pub path: Option<String>,
    pub rows: usize,
    pub error: Option<String>,
    pub last_updated: Option<Instant>,
}

impl ExportState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_shown(&self) -> bool {
        self.last_updated.is_some()
    }

    pub fn clear_if_done_for(&mut self, now: Instant, keep_secs: u64) {
        let Some(last) = self.last_updated else {
            return;
        };
        if now.saturating_duration_since(last).as_secs() >= keep_secs {
            *self = Self::new();
        }
    }
}

pub fn apply_delta(state: &mut AppState, delta: Delta) {
    match delta {
        Delta::DatasetLoaded(dataset) => state.set_dataset(dataset),
        Delta::Log(msg) => state.push_log(msg),
    }
}
