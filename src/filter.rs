use std::collections::BTreeSet;

use regex::{Regex, RegexBuilder};

use crate::model::Manager;

/// Case-insensitive literal substring matcher over manager names.
///
/// The raw input is escaped before compilation, so metacharacters such as
/// `.` or `(` match themselves. Compiling never fails: input too large for
/// the regex engine falls back to a lowercase `contains` check.
#[derive(Debug, Clone)]
pub struct TextMatcher {
    raw: String,
    pattern: Pattern,
}

#[derive(Debug, Clone)]
enum Pattern {
    All,
    Regex(Regex),
    Folded(String),
}

impl TextMatcher {
    pub fn match_all() -> Self {
        Self {
            raw: String::new(),
            pattern: Pattern::All,
        }
    }

    pub fn compile(raw: &str) -> Self {
        if raw.is_empty() {
            return Self::match_all();
        }
        let pattern = match RegexBuilder::new(&regex::escape(raw))
            .case_insensitive(true)
            .unicode(true)
            .build()
        {
            Ok(re) => Pattern::Regex(re),
            Err(_) => Pattern::Folded(raw.to_lowercase()),
        };
        Self {
            raw: raw.to_string(),
            pattern,
        }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn is_match_all(&self) -> bool {
        matches!(self.pattern, Pattern::All)
    }

    pub fn matches(&self, name: &str) -> bool {
        match &self.pattern {
            Pattern::All => true,
            Pattern::Regex(re) => re.is_match(name),
            Pattern::Folded(needle) => name.to_lowercase().contains(needle.as_str()),
        }
    }
}

impl Default for TextMatcher {
    fn default() -> Self {
        Self::match_all()
    }
}

pub fn is_visible(manager: &Manager, active: &BTreeSet<u32>, matcher: &TextMatcher) -> bool {
    manager.in_any(active) && matcher.matches(&manager.player_name)
}

/// Keeps managers in at least one active league whose name matches, in input order.
pub fn filter_managers(
    managers: &[Manager],
    active: &BTreeSet<u32>,
    matcher: &TextMatcher,
) -> Vec<Manager> {
    if active.is_empty() {
        return Vec::new();
    }
    managers
        .iter()
        .filter(|m| is_visible(m, active, matcher))
        .cloned()
        .collect()
}
