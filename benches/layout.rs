use calsig::config::{Config, GridConfig};
use calsig::ir::{CalendarSignal, Side};
use calsig::layout::{compute_layout, connector_path};
use calsig::parser::parse_signals;
use calsig::render::render_svg;
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;

fn dense_month(count: i32) -> Vec<CalendarSignal> {
    (0..count)
        .map(|idx| {
            let day = idx % 28 + 1;
            let side = match idx % 3 {
                0 => Some(Side::Left),
                1 => Some(Side::Right),
                _ => None,
            };
            let mut signal = CalendarSignal::new(day, format!("Merchant {idx}"), "$9.99")
                .with_bias((idx % 7) as f32 * 3.0, (idx % 5) as f32 - 2.0);
            signal.side = side;
            signal
        })
        .collect()
}

fn fixture() -> &'static str {
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/benches/fixtures/track.json5"))
}

fn bench_parse(c: &mut Criterion) {
    c.bench_function("parse_track_fixture", |b| {
        b.iter(|| parse_signals(black_box(fixture())).expect("parse failed"))
    });
}

fn bench_layout(c: &mut Criterion) {
    let grid = GridConfig::track();
    let mut group = c.benchmark_group("layout");
    for count in [3, 28, 280] {
        let signals = dense_month(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &signals, |b, signals| {
            b.iter(|| compute_layout(black_box(signals), black_box(&grid)))
        });
    }
    group.finish();
}

fn bench_connector(c: &mut Criterion) {
    let config = GridConfig::track().connector;
    c.bench_function("connector_path", |b| {
        b.iter(|| {
            connector_path(
                black_box(calsig::layout::Point::new(98.64, 106.0)),
                black_box(calsig::layout::Point::new(346.0, 106.0)),
                &config,
            )
        })
    });
}

fn bench_render(c: &mut Criterion) {
    let mut config = Config::default();
    config.render.measure_text = false;
    let document = parse_signals(fixture()).expect("parse failed");
    let layout = compute_layout(&document.months[0].signals, &config.grid);
    c.bench_function("render_svg_track", |b| {
        b.iter(|| render_svg(black_box(&layout), black_box(&config)))
    });
}

criterion_group!(benches, bench_parse, bench_layout, bench_connector, bench_render);
criterion_main!(benches);
