//! Headless Runner
//!
//! Drives a [`Simulation`] from wall time: every frame interval the elapsed
//! time (scaled by `runtime.speed`) is fed to the sim clock, and the chart is
//! re-rendered into a [`FrameRecorder`] whenever the series changed or the
//! viewport was resized. Sinks get a [`Snapshot`](crate::sim::Snapshot) after
//! every step.

use std::future::Future;
use std::time::Duration;

use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::chart::{ChartRenderer, FrameRecorder, FrameSummary};
use crate::config::{AppConfig, RuntimeConfig};
use crate::random::RandomSource;
use crate::sim::{EventSink, SimClock, Simulation, StepReport};
use crate::types::Viewport;

/// Totals reported when the runner stops
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub sim_ms: u64,
    pub frames: u64,
    pub jobs: u64,
}

pub struct Runner<R: RandomSource, S: EventSink> {
    sim: Simulation<R>,
    clock: SimClock,
    sink: S,
    renderer: ChartRenderer,
    canvas: FrameRecorder,
    viewport: Viewport,
    runtime: RuntimeConfig,
    frames: u64,
    jobs: u64,
    carry_ms: f64,
}

impl<R: RandomSource, S: EventSink> Runner<R, S> {
    pub fn new(config: &AppConfig, sim: Simulation<R>, sink: S) -> Self {
        Self {
            sim,
            clock: SimClock::new(&config.schedule),
            sink,
            renderer: ChartRenderer::new(config.chart.style.clone()),
            canvas: FrameRecorder::default(),
            viewport: config.viewport(),
            runtime: config.runtime.clone(),
            frames: 0,
            jobs: 0,
            carry_ms: 0.0,
        }
    }

    pub fn sim(&self) -> &Simulation<R> {
        &self.sim
    }

    pub fn sim_mut(&mut self) -> &mut Simulation<R> {
        &mut self.sim
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Commands of the most recent frame
    pub fn canvas(&self) -> &FrameRecorder {
        &self.canvas
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Redraws at the new size straight away, paused or not
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.render();
    }

    pub fn render(&mut self) -> FrameSummary {
        let frame = self.sim.chart_frame(self.viewport);
        let summary = self.renderer.render(&mut self.canvas, &frame);
        self.frames += 1;

        let every = self.runtime.log_every_frames;
        if every > 0 && self.frames % every == 0 {
            info!(
                frames = self.frames,
                sim_ms = self.sim.now_ms(),
                candles = summary.candles,
                markers = summary.markers_drawn,
                min = summary.range.min,
                max = summary.range.max,
                "[CHART] Frame stats"
            );
        }
        summary
    }

    /// Feed `wall_ms` of elapsed wall time into the sim clock
    pub fn step(&mut self, wall_ms: u64) -> StepReport {
        let scaled = wall_ms as f64 * self.runtime.speed + self.carry_ms;
        let delta = scaled.floor().max(0.0);
        self.carry_ms = scaled - delta;

        let report = self.sim.advance(&mut self.clock, delta as u64, &mut self.sink);
        self.jobs += report.fired.len() as u64;
        if report.redraw {
            self.render();
        }
        let snapshot = self.sim.snapshot();
        self.sink.on_step(self.clock.now_ms(), &snapshot);
        if !report.fired.is_empty() {
            debug!(
                jobs = report.fired.len(),
                redraw = report.redraw,
                leaderboard_changed = report.leaderboard_changed,
                "[RUNNER] Step"
            );
        }
        report
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            sim_ms: self.clock.now_ms(),
            frames: self.frames,
            jobs: self.jobs,
        }
    }

    /// Run until `shutdown` resolves or `runtime.max_runtime_secs` elapses
    pub async fn run<F>(&mut self, shutdown: F) -> RunSummary
    where
        F: Future<Output = ()>,
    {
        let max_runtime = self.runtime.max_runtime_secs;
        let deadline = async move {
            if max_runtime > 0 {
                tokio::time::sleep(Duration::from_secs(max_runtime)).await;
            } else {
                std::future::pending::<()>().await;
            }
        };
        tokio::pin!(deadline);
        tokio::pin!(shutdown);

        let mut interval =
            tokio::time::interval(Duration::from_millis(self.runtime.frame_interval_ms.max(1)));
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            instrument = %self.sim.instrument(),
            frame_interval_ms = self.runtime.frame_interval_ms,
            speed = self.runtime.speed,
            max_runtime_secs = max_runtime,
            "[RUNNER] Starting"
        );
        self.render();

        let mut last = Instant::now();
        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("[RUNNER] Shutdown signal received");
                    break;
                }
                _ = &mut deadline => {
                    info!(max_runtime_secs = max_runtime, "[RUNNER] Max runtime reached");
                    break;
                }
                now = interval.tick() => {
                    let elapsed = now.saturating_duration_since(last);
                    last = now;
                    self.step(elapsed.as_millis() as u64);
                }
            }
        }

        let summary = self.summary();
        info!(
            sim_ms = summary.sim_ms,
            frames = summary.frames,
            jobs = summary.jobs,
            bars = self.sim.series().len(),
            markers = self.sim.markers().len(),
            "[RUNNER] Stopped"
        );
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::DrawCommand;
    use crate::market::Instrument;
    use crate::notify::Dashboard;
    use crate::random::ScriptedRandom;
    use crate::sim::EventLog;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn runner(config: &AppConfig) -> Runner<StdRng, EventLog> {
        let sim = Simulation::new(config, 1_700_000_000, StdRng::seed_from_u64(9));
        Runner::new(config, sim, EventLog::default())
    }

    #[test]
    fn test_step_renders_on_change() {
        let config = AppConfig::default();
        let mut r = runner(&config);

        let report = r.step(100);
        assert!(report.fired.is_empty());
        assert_eq!(r.frames(), 0);

        let report = r.step(150);
        assert_eq!(report.fired.len(), 1);
        assert_eq!(r.frames(), 1);
        assert!(matches!(r.canvas().commands()[0], DrawCommand::Clear { .. }));
    }

    #[test]
    fn test_speed_scales_and_carries_fractions() {
        let mut config = AppConfig::default();
        config.runtime.speed = 0.5;
        let mut r = runner(&config);
        for _ in 0..3 {
            r.step(1);
        }
        // 1.5 ms of sim time, fraction carried
        assert_eq!(r.summary().sim_ms, 1);
        r.step(1);
        assert_eq!(r.summary().sim_ms, 2);
    }

    #[test]
    fn test_paused_sim_stops_redraws() {
        let config = AppConfig::default();
        let mut r = runner(&config);
        let mut log = EventLog::default();
        r.sim_mut().set_paused(true, &mut log);
        let report = r.step(10_000);
        assert!(!report.fired.is_empty());
        assert!(!report.redraw);
        assert_eq!(r.frames(), 0);
        assert!(r.sink().count("activity") >= 1);
    }

    #[test]
    fn test_resize_redraws_while_paused() {
        let config = AppConfig::default();
        let mut r = runner(&config);
        let mut log = EventLog::default();
        r.sim_mut().set_paused(true, &mut log);

        r.resize(Viewport::new(400.0, 300.0));
        let report = r.step(10_000);
        assert!(!report.redraw);
        assert_eq!(r.frames(), 1);
        match &r.canvas().commands()[0] {
            DrawCommand::Clear { width, height, .. } => {
                assert_eq!(*width, 400.0);
                assert_eq!(*height, 300.0);
            }
            other => panic!("expected clear, got {:?}", other),
        }
    }

    #[test]
    fn test_step_expires_dashboard_toasts() {
        let config = AppConfig::default();
        let sim = Simulation::new(&config, 1_700_000_000, StdRng::seed_from_u64(9));
        let instrument = Instrument::from_key(&config.sim.instrument);
        let dashboard = Dashboard::new(
            &config.notifications,
            &instrument,
            ScriptedRandom::constant(0.5),
        );
        let mut r = Runner::new(&config, sim, dashboard);
        let mut log = EventLog::default();
        r.sim_mut().set_paused(true, &mut log);
        r.sink_mut().push_toast("Feed paused", "Live updates paused", true, 0);

        // scoring fires at 3500 but posts no toast; the notify job is not due yet
        r.step(4300);
        assert!(r.sink().toasts().is_empty());
        assert_eq!(r.sink().feed().total(), 0);
    }

    #[test]
    fn test_run_stops_on_shutdown() {
        let mut config = AppConfig::default();
        config.runtime.frame_interval_ms = 5;
        config.runtime.speed = 50.0;
        let mut r = runner(&config);

        let summary = tokio_test::block_on(async {
            r.run(tokio::time::sleep(Duration::from_millis(40))).await
        });
        assert!(summary.frames >= 1);
        assert_eq!(summary.sim_ms, r.summary().sim_ms);
    }

    #[test]
    fn test_run_stops_at_max_runtime() {
        let mut config = AppConfig::default();
        config.runtime.max_runtime_secs = 1;
        config.runtime.frame_interval_ms = 100;
        let mut r = runner(&config);

        let summary = tokio_test::block_on(r.run(std::future::pending::<()>()));
        assert!(summary.sim_ms >= 500);
    }
}
