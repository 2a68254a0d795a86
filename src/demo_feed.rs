use std::collections::BTreeSet;

use chrono::Utc;
use rand::Rng;
use rand::seq::SliceRandom;

use crate::model::{Dataset, League, Manager, Scores, Timestamp, Variability};

const DEMO_LEAGUES: &[(u32, &str)] = &[
    (935263, "Draft Division 1"),
    (937008, "Draft Division 2"),
    (24490, "Old Boys Classic"),
    (171269, "Office League"),
];

const FIRST_NAMES: &[&str] = &[
    "José", "Ana", "Björn", "Chloé", "Dmitri", "Eilidh", "Farah", "Gonçalo", "Hana", "Ivan",
    "Jürgen", "Kasia", "Liam", "Mårten", "Noor", "Oisín", "Priya", "Quentin", "Rúben", "Sofía",
];

const LAST_NAMES: &[&str] = &[
    "Álvarez", "Berg", "Costa", "Dubois", "Eriksen", "Fernández", "García", "Hughes", "Ivanova",
    "Jensen", "Kowalski", "López", "Müller", "Nakamura", "O'Brien", "Petrov", "Quinn", "Rossi",
];

/// Synthetic dataset over the built-in leagues; every manager is in at least one league.
pub fn generate(count: usize, rng: &mut impl Rng) -> Dataset {
    let leagues: Vec<League> = DEMO_LEAGUES
        .iter()
        .map(|(id, name)| League {
            id: *id,
            name: name.to_string(),
        })
        .collect();

    let managers = (0..count)
        .map(|idx| {
            let first = FIRST_NAMES.choose(rng).copied().unwrap_or("Manager");
            let last = LAST_NAMES.choose(rng).copied().unwrap_or("Demo");
            Manager {
                id: 100_000 + idx as u32 * 37,
                player_name: format!("{first} {last}"),
                leagues: demo_memberships(rng),
                scores: demo_scores(rng),
            }
        })
        .collect();

    Dataset {
        managers,
        leagues,
        timestamp: Some(Timestamp::Unix(Utc::now().timestamp() as f64)),
    }
}

fn demo_memberships(rng: &mut impl Rng) -> BTreeSet<u32> {
    let mut ids: Vec<u32> = DEMO_LEAGUES.iter().map(|(id, _)| *id).collect();
    ids.shuffle(rng);
    let take = match rng.gen_range(0..10) {
        0..=5 => 1,
        6..=8 => 2,
        _ => 3,
    };
    ids.into_iter().take(take).collect()
}

fn demo_scores(rng: &mut impl Rng) -> Scores {
    let fpl = rng.gen_range(900..2400) as f64;
    let sd = round1(rng.gen_range(8.0..30.0));
    Scores {
        fpl,
        md: rng.gen_range(20..110) as f64,
        xg: round1(fpl * rng.gen_range(0.85..1.15)),
        odds: round1(rng.gen_range(1.5..60.0)),
        variance: round1(sd * sd),
        variability: Variability {
            sd,
            perc: (sd / 100.0 * rng.gen_range(0.5..1.5) * 1e4).round() / 1e4,
            abs_sd: round1(sd * rng.gen_range(0.6..1.0)),
        },
    }
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}
