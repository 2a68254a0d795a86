use std::collections::{BTreeMap, BTreeSet};

use crate::error::ConfigError;
use crate::model::League;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LeagueColor {
    Indigo,
    Fuchsia,
    Teal,
    Amber,
    Rose,
    Sky,
    Lime,
    Orange,
    Emerald,
    Violet,
    Slate,
}

impl LeagueColor {
    pub const ALL: [LeagueColor; 11] = [
        LeagueColor::Indigo,
        LeagueColor::Fuchsia,
        LeagueColor::Teal,
        LeagueColor::Amber,
        LeagueColor::Rose,
        LeagueColor::Sky,
        LeagueColor::Lime,
        LeagueColor::Orange,
        LeagueColor::Emerald,
        LeagueColor::Violet,
        LeagueColor::Slate,
    ];

    pub fn name(self) -> &'static str {
        match self {
            LeagueColor::Indigo => "indigo",
            LeagueColor::Fuchsia => "fuchsia",
            LeagueColor::Teal => "teal",
            LeagueColor::Amber => "amber",
            LeagueColor::Rose => "rose",
            LeagueColor::Sky => "sky",
            LeagueColor::Lime => "lime",
            LeagueColor::Orange => "orange",
            LeagueColor::Emerald => "emerald",
            LeagueColor::Violet => "violet",
            LeagueColor::Slate => "slate",
        }
    }

    pub fn from_name(raw: &str) -> Result<Self, ConfigError> {
        let name = raw.trim().to_lowercase();
        LeagueColor::ALL
            .into_iter()
            .find(|c| c.name() == name)
            .ok_or_else(|| ConfigError::UnknownColor(raw.to_string()))
    }

    /// 24-bit RGB close to the 800 shade of the web palette.
    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            LeagueColor::Indigo => (55, 48, 163),
            LeagueColor::Fuchsia => (134, 25, 143),
            LeagueColor::Teal => (17, 94, 89),
            LeagueColor::Amber => (146, 64, 14),
            LeagueColor::Rose => (159, 18, 57),
            LeagueColor::Sky => (7, 89, 133),
            LeagueColor::Lime => (63, 98, 18),
            LeagueColor::Orange => (154, 52, 18),
            LeagueColor::Emerald => (6, 95, 70),
            LeagueColor::Violet => (91, 33, 182),
            LeagueColor::Slate => (30, 41, 59),
        }
    }
}

/// Built-in league colors.
pub const DEFAULT_LEAGUE_COLORS: &[(u32, LeagueColor)] = &[
    (935263, LeagueColor::Indigo),
    (937008, LeagueColor::Fuchsia),
    (24490, LeagueColor::Teal),
    (171269, LeagueColor::Amber),
];

/// Primary league (row color) and the other active leagues (markers) of one manager.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LeagueBadge {
    pub primary: Option<u32>,
    pub secondary: Vec<u32>,
}

impl LeagueBadge {
    pub fn is_empty(&self) -> bool {
        self.primary.is_none()
    }

    /// Primary first, then secondary.
    pub fn ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.primary.into_iter().chain(self.secondary.iter().copied())
    }
}

/// Picks the highest active league id as primary; the rest follow in
/// descending id order. Independent of set iteration order.
pub fn resolve_badge(manager_leagues: &BTreeSet<u32>, active: &BTreeSet<u32>) -> LeagueBadge {
    let mut relevant: Vec<u32> = manager_leagues.intersection(active).copied().collect();
    relevant.reverse();
    let mut relevant = relevant.into_iter();
    let primary = relevant.next();
    LeagueBadge {
        primary,
        secondary: relevant.collect(),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RowPaint {
    pub primary: Option<LeagueColor>,
    pub markers: Vec<(u32, LeagueColor)>,
}

/// League id to color mapping, checked against the league roster when built.
#[derive(Debug, Clone, PartialEq)]
pub struct LeaguePalette {
    colors: BTreeMap<u32, LeagueColor>,
}

impl LeaguePalette {
    /// Fails with `UnmappedLeague` for the first roster league without a color.
    pub fn new(
        colors: impl IntoIterator<Item = (u32, LeagueColor)>,
        roster: &[League],
    ) -> Result<Self, ConfigError> {
        let colors: BTreeMap<u32, LeagueColor> = colors.into_iter().collect();
        if let Some(missing) = roster.iter().find(|l| !colors.contains_key(&l.id)) {
            return Err(ConfigError::UnmappedLeague(missing.id));
        }
        Ok(Self { colors })
    }

    pub fn empty() -> Self {
        Self {
            colors: BTreeMap::new(),
        }
    }

    pub fn color(&self, league_id: u32) -> Result<LeagueColor, ConfigError> {
        self.colors
            .get(&league_id)
            .copied()
            .ok_or(ConfigError::UnmappedLeague(league_id))
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn paint(
        &self,
        manager_leagues: &BTreeSet<u32>,
        active: &BTreeSet<u32>,
    ) -> Result<RowPaint, ConfigError> {
        let badge = resolve_badge(manager_leagues, active);
        let primary = badge.primary.map(|id| self.color(id)).transpose()?;
        let markers = badge
            .secondary
            .iter()
            .map(|id| self.color(*id).map(|c| (*id, c)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(RowPaint { primary, markers })
    }
}

/// Parses `id=color` pairs separated by `,`, `;` or whitespace.
pub fn parse_color_overrides(raw: &str) -> Result<Vec<(u32, LeagueColor)>, ConfigError> {
    raw.split([',', ';', ' ', '\n'])
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            let (id, color) = part
                .split_once('=')
                .ok_or_else(|| ConfigError::UnknownColor(part.to_string()))?;
            let id = id
                .trim()
                .parse::<u32>()
                .map_err(|_| ConfigError::UnknownColor(part.to_string()))?;
            Ok((id, LeagueColor::from_name(color)?))
        })
        .collect()
}
