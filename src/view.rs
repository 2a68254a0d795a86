use std::collections::BTreeSet;

use crate::error::ConfigError;
use crate::export;
use crate::filter::{TextMatcher, filter_managers};
use crate::model::{Dataset, Manager};
use crate::palette::{LeagueBadge, LeagueColor, LeaguePalette, RowPaint, resolve_badge};
use crate::sort::{SortKey, SortSpec, sort_in_place};

/// `sort(filter(managers))` under the given view settings.
pub fn compute_visible(
    dataset: &Dataset,
    sort: SortSpec,
    active: &BTreeSet<u32>,
    matcher: &TextMatcher,
) -> Vec<Manager> {
    let mut visible = filter_managers(&dataset.managers, active, matcher);
    sort_in_place(&mut visible, sort);
    visible
}

/// Session view state. The visible rows are rebuilt from the full dataset
/// on every setter call and never patched in place.
#[derive(Debug, Clone)]
pub struct ViewState {
    dataset: Dataset,
    palette: LeaguePalette,
    sort: SortSpec,
    active: BTreeSet<u32>,
    matcher: TextMatcher,
    visible: Vec<Manager>,
}

impl ViewState {
    /// Every league in the dataset must have a color in `colors`.
    pub fn new(
        dataset: Dataset,
        colors: impl IntoIterator<Item = (u32, LeagueColor)>,
    ) -> Result<Self, ConfigError> {
        let palette = LeaguePalette::new(colors, &dataset.leagues)?;
        let active = dataset.league_ids();
        let mut view = Self {
            dataset,
            palette,
            sort: SortSpec::default(),
            active,
            matcher: TextMatcher::match_all(),
            visible: Vec::new(),
        };
        view.recompute();
        Ok(view)
    }

    pub fn empty() -> Self {
        Self {
            dataset: Dataset::empty(),
            palette: LeaguePalette::empty(),
            sort: SortSpec::default(),
            active: BTreeSet::new(),
            matcher: TextMatcher::match_all(),
            visible: Vec::new(),
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn palette(&self) -> &LeaguePalette {
        &self.palette
    }

    pub fn sort(&self) -> SortSpec {
        self.sort
    }

    pub fn active(&self) -> &BTreeSet<u32> {
        &self.active
    }

    pub fn matcher(&self) -> &TextMatcher {
        &self.matcher
    }

    pub fn visible(&self) -> &[Manager] {
        &self.visible
    }

    pub fn is_active(&self, league_id: u32) -> bool {
        self.active.contains(&league_id)
    }

    pub fn set_sort(&mut self, sort: SortSpec) {
        self.sort = sort;
        self.recompute();
    }

    /// Header click on `key`.
    pub fn click_column(&mut self, key: SortKey) {
        self.set_sort(self.sort.clicked(key));
    }

    /// Header click carrying the raw field name.
    pub fn click_field(&mut self, field: &str) -> Result<(), ConfigError> {
        let key = SortKey::parse(field)?;
        self.click_column(key);
        Ok(())
    }

    /// Checkbox event for one league.
    pub fn toggle_league(&mut self, league_id: u32, checked: bool) -> Result<(), ConfigError> {
        if !self.dataset.leagues.iter().any(|l| l.id == league_id) {
            return Err(ConfigError::UnknownLeague(league_id));
        }
        if checked {
            self.active.insert(league_id);
        } else {
            self.active.remove(&league_id);
        }
        self.recompute();
        Ok(())
    }

    pub fn set_active(&mut self, active: BTreeSet<u32>) -> Result<(), ConfigError> {
        let roster = self.dataset.league_ids();
        if let Some(unknown) = active.iter().find(|id| !roster.contains(id)) {
            return Err(ConfigError::UnknownLeague(*unknown));
        }
        self.active = active;
        self.recompute();
        Ok(())
    }

    /// Text input event; the raw string is matched literally.
    pub fn set_query(&mut self, raw: &str) {
        self.set_matcher(TextMatcher::compile(raw));
    }

    pub fn set_matcher(&mut self, matcher: TextMatcher) {
        self.matcher = matcher;
        self.recompute();
    }

    pub fn badge(&self, manager: &Manager) -> LeagueBadge {
        resolve_badge(&manager.leagues, &self.active)
    }

    pub fn paint(&self, manager: &Manager) -> Result<RowPaint, ConfigError> {
        self.palette.paint(&manager.leagues, &self.active)
    }

    pub fn visible_csv(&self) -> String {
        export::to_csv(&self.visible)
    }

    pub fn position_of(&self, manager_id: u32) -> Option<usize> {
        self.visible.iter().position(|m| m.id == manager_id)
    }

    fn recompute(&mut self) {
        self.visible = compute_visible(&self.dataset, self.sort, &self.active, &self.matcher);
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::empty()
    }
}
