use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

use fxmirror::chart::{ChartRenderer, FrameRecorder};
use fxmirror::config::AppConfig;
use fxmirror::sim::{NullSink, SimClock, Simulation};
use fxmirror::types::Viewport;

fn bench_render(c: &mut Criterion) {
    let config = AppConfig::default();
    let mut sim = Simulation::new(&config, 1_700_000_000, StdRng::seed_from_u64(1));
    let mut clock = SimClock::new(&config.schedule);
    // fill the marker store a little
    sim.advance(&mut clock, 600_000, &mut NullSink);

    let renderer = ChartRenderer::new(config.chart.style.clone());
    let mut canvas = FrameRecorder::default();
    let viewport = Viewport::new(1280.0, 520.0);

    c.bench_function("render_140_bars", |b| {
        b.iter(|| renderer.render(&mut canvas, black_box(&sim.chart_frame(viewport))))
    });
}

fn bench_advance(c: &mut Criterion) {
    let config = AppConfig::default();
    let mut sim = Simulation::new(&config, 1_700_000_000, StdRng::seed_from_u64(2));
    let mut clock = SimClock::new(&config.schedule);

    c.bench_function("advance_one_second", |b| {
        b.iter(|| sim.advance(&mut clock, black_box(1_000), &mut NullSink))
    });
}

criterion_group!(benches, bench_render, bench_advance);
criterion_main!(benches);
