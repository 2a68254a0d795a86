use criterion::{Criterion, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::hint::black_box;

use fpl_leagues::demo_feed;
use fpl_leagues::export::to_csv;
use fpl_leagues::filter::TextMatcher;
use fpl_leagues::palette::DEFAULT_LEAGUE_COLORS;
use fpl_leagues::sort::{SortKey, SortSpec};
use fpl_leagues::source::parse_dataset_json;
use fpl_leagues::view::{ViewState, compute_visible};

const MANAGERS: usize = 5000;

fn bench_compute_visible(c: &mut Criterion) {
    let dataset = demo_feed::generate(MANAGERS, &mut StdRng::seed_from_u64(7));
    let active = dataset.league_ids();
    let matcher = TextMatcher::compile("an");
    c.bench_function("compute_visible_5000", |b| {
        b.iter(|| {
            let rows = compute_visible(
                black_box(&dataset),
                SortSpec::default(),
                &active,
                &matcher,
            );
            black_box(rows.len());
        })
    });
}

fn bench_click_column(c: &mut Criterion) {
    let dataset = demo_feed::generate(MANAGERS, &mut StdRng::seed_from_u64(11));
    let mut view =
        ViewState::new(dataset, DEFAULT_LEAGUE_COLORS.iter().copied()).expect("demo leagues mapped");
    c.bench_function("click_column_xg", |b| {
        b.iter(|| {
            view.click_column(black_box(SortKey::XG));
            black_box(view.visible().len());
        })
    });
}

fn bench_to_csv(c: &mut Criterion) {
    let dataset = demo_feed::generate(MANAGERS, &mut StdRng::seed_from_u64(3));
    c.bench_function("to_csv_5000", |b| {
        b.iter(|| {
            let csv = to_csv(black_box(&dataset.managers));
            black_box(csv.len());
        })
    });
}

fn bench_scores_parse(c: &mut Criterion) {
    c.bench_function("scores_parse", |b| {
        b.iter(|| {
            let dataset = parse_dataset_json(black_box(SCORES_JSON)).unwrap();
            black_box(dataset.managers.len());
        })
    });
}

criterion_group!(
    perf,
    bench_scores_parse,
    bench_compute_visible,
    bench_click_column,
    bench_to_csv
);
criterion_main!(perf);

static SCORES_JSON: &str = include_str!("../tests/fixtures/scores.json");
