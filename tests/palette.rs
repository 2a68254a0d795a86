use std::collections::BTreeSet;

use fpl_leagues::error::ConfigError;
use fpl_leagues::model::League;
use fpl_leagues::palette::{
    DEFAULT_LEAGUE_COLORS, LeagueBadge, LeagueColor, LeaguePalette, parse_color_overrides,
    resolve_badge,
};

fn set(ids: &[u32]) -> BTreeSet<u32> {
    ids.iter().copied().collect()
}

fn roster(ids: &[u32]) -> Vec<League> {
    ids.iter()
        .map(|id| League {
            id: *id,
            name: format!("League {id}"),
        })
        .collect()
}

#[test]
fn highest_active_league_is_primary() {
    let badge = resolve_badge(&set(&[24490, 935263, 171269]), &set(&[24490, 171269, 935263]));
    assert_eq!(
        badge,
        LeagueBadge {
            primary: Some(935263),
            secondary: vec![171269, 24490],
        }
    );
}

#[test]
fn inactive_leagues_are_ignored() {
    let badge = resolve_badge(&set(&[1, 2, 3]), &set(&[1, 3]));
    assert_eq!(badge.primary, Some(3));
    assert_eq!(badge.secondary, vec![1]);

    let hidden = resolve_badge(&set(&[1, 2]), &set(&[5]));
    assert!(hidden.is_empty());
    assert!(hidden.secondary.is_empty());
}

#[test]
fn badge_covers_exactly_the_active_memberships() {
    let memberships = set(&[4, 9, 2, 7]);
    for active in [set(&[2]), set(&[2, 7]), set(&[9, 4, 7, 2]), set(&[1, 7, 9])] {
        let badge = resolve_badge(&memberships, &active);
        let expected: BTreeSet<u32> = memberships.intersection(&active).copied().collect();
        let primary = badge.primary.expect("manager is visible");
        assert!(expected.contains(&primary));
        let got: Vec<u32> = badge.ids().collect();
        let unique: BTreeSet<u32> = got.iter().copied().collect();
        assert_eq!(got.len(), unique.len(), "no duplicates");
        assert_eq!(unique, expected);
    }
}

#[test]
fn resolution_does_not_depend_on_insertion_order() {
    let a: BTreeSet<u32> = [3, 1, 2].into_iter().collect();
    let b: BTreeSet<u32> = [2, 3, 1].into_iter().collect();
    let active: BTreeSet<u32> = [1, 2, 3].into_iter().collect();
    assert_eq!(resolve_badge(&a, &active), resolve_badge(&b, &active));
}

#[test]
fn palette_must_cover_the_roster() {
    let err = LeaguePalette::new(DEFAULT_LEAGUE_COLORS.iter().copied(), &roster(&[24490, 42]))
        .expect_err("42 has no color");
    assert!(matches!(err, ConfigError::UnmappedLeague(42)));
}

#[test]
fn paint_maps_primary_and_markers() {
    let palette = LeaguePalette::new(
        DEFAULT_LEAGUE_COLORS.iter().copied(),
        &roster(&[935263, 937008, 24490, 171269]),
    )
    .expect("defaults cover the roster");

    let paint = palette
        .paint(&set(&[24490, 937008]), &set(&[935263, 937008, 24490]))
        .expect("all ids are mapped");
    assert_eq!(paint.primary, Some(LeagueColor::Fuchsia));
    assert_eq!(paint.markers, vec![(24490, LeagueColor::Teal)]);

    assert!(matches!(
        palette.color(5),
        Err(ConfigError::UnmappedLeague(5))
    ));
}

#[test]
fn color_overrides_parse() {
    let parsed = parse_color_overrides("1=rose, 2=Sky;3=slate").expect("valid pairs");
    assert_eq!(
        parsed,
        vec![
            (1, LeagueColor::Rose),
            (2, LeagueColor::Sky),
            (3, LeagueColor::Slate)
        ]
    );
    assert!(parse_color_overrides("1:rose").is_err());
    assert!(parse_color_overrides("x=rose").is_err());
}
