use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;
use crate::model::{Manager, Scores};

/// Where a sortable field lives on a manager record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Namespace {
    Manager,
    Scores,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortKey {
    Id,
    PlayerName,
    Fpl,
    Md,
    XG,
    Odds,
    Variance,
}

impl SortKey {
    /// Columns in table order.
    pub const ALL: [SortKey; 7] = [
        SortKey::Id,
        SortKey::PlayerName,
        SortKey::Fpl,
        SortKey::Md,
        SortKey::Odds,
        SortKey::XG,
        SortKey::Variance,
    ];

    pub fn field_name(self) -> &'static str {
        match self {
            SortKey::Id => "id",
            SortKey::PlayerName => "player_name",
            SortKey::Fpl => "fpl",
            SortKey::Md => "md",
            SortKey::XG => "xG",
            SortKey::Odds => "odds",
            SortKey::Variance => "variance",
        }
    }

    pub fn namespace(self) -> Namespace {
        match self {
            SortKey::Id | SortKey::PlayerName => Namespace::Manager,
            SortKey::Fpl | SortKey::Md | SortKey::XG | SortKey::Odds | SortKey::Variance => {
                Namespace::Scores
            }
        }
    }

    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let key = raw.trim();
        SortKey::ALL
            .into_iter()
            .find(|k| k.field_name() == key)
            .ok_or_else(|| ConfigError::UnknownSortKey(raw.to_string()))
    }

    fn score(self, scores: &Scores) -> Option<f64> {
        match self {
            SortKey::Fpl => Some(scores.fpl),
            SortKey::Md => Some(scores.md),
            SortKey::XG => Some(scores.xg),
            SortKey::Odds => Some(scores.odds),
            SortKey::Variance => Some(scores.variance),
            SortKey::Id | SortKey::PlayerName => None,
        }
    }

    /// Ascending comparison of two managers on this field.
    ///
    /// Scores use `f64::total_cmp`; names compare by UTF-8 bytes.
    pub fn compare(self, a: &Manager, b: &Manager) -> Ordering {
        match self.namespace() {
            Namespace::Scores => {
                let (Some(x), Some(y)) = (self.score(&a.scores), self.score(&b.scores)) else {
                    return Ordering::Equal;
                };
                x.total_cmp(&y)
            }
            Namespace::Manager => match self {
                SortKey::Id => a.id.cmp(&b.id),
                _ => a.player_name.as_str().cmp(b.player_name.as_str()),
            },
        }
    }
}

impl FromStr for SortKey {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortKey::parse(s)
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field_name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

impl Direction {
    /// Direction a column starts in the first time it is selected.
    pub const FIRST: Direction = Direction::Descending;

    pub fn flipped(self) -> Self {
        match self {
            Direction::Ascending => Direction::Descending,
            Direction::Descending => Direction::Ascending,
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            Direction::Ascending => "▲",
            Direction::Descending => "▼",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub key: SortKey,
    pub direction: Direction,
}

impl SortSpec {
    pub fn new(key: SortKey, direction: Direction) -> Self {
        Self { key, direction }
    }

    /// Column click: the active column flips, a new column starts at `Direction::FIRST`.
    pub fn clicked(self, key: SortKey) -> Self {
        if key == self.key {
            Self::new(key, self.direction.flipped())
        } else {
            Self::new(key, Direction::FIRST)
        }
    }

    pub fn compare(&self, a: &Manager, b: &Manager) -> Ordering {
        let ord = self.key.compare(a, b);
        match self.direction {
            Direction::Ascending => ord,
            Direction::Descending => ord.reverse(),
        }
    }
}

impl Default for SortSpec {
    fn default() -> Self {
        Self::new(SortKey::Fpl, Direction::Descending)
    }
}

/// Returns a new, stably sorted copy: tied managers keep their input order
/// in both directions.
pub fn sort_managers(managers: &[Manager], spec: SortSpec) -> Vec<Manager> {
    let mut sorted = managers.to_vec();
    sort_in_place(&mut sorted, spec);
    sorted
}

pub fn sort_in_place(managers: &mut [Manager], spec: SortSpec) {
    managers.sort_by(|a, b| spec.compare(a, b));
}

/// Sort by a field name as it appears in the data (e.g. `"xG"`).
pub fn sort_by_field(
    managers: &[Manager],
    field: &str,
    direction: Direction,
) -> Result<Vec<Manager>, ConfigError> {
    let key = SortKey::parse(field)?;
    Ok(sort_managers(managers, SortSpec::new(key, direction)))
}
