//! Simulation Context
//!
//! Owns the series, markers, leaderboard, quote, pause flag and random
//! source for one dashboard session. Timer jobs from [`SimClock`] are
//! dispatched through [`Simulation::run_job`]; everything a UI should show
//! is published to an [`EventSink`].

mod clock;
mod events;

pub use clock::{Job, SimClock};
pub use events::{EventLog, EventSink, NullSink, SimEvent};

#[cfg(test)]
pub use events::MockEventSink;

use serde::Serialize;
use tracing::{debug, info};

use crate::chart::ChartFrame;
use crate::config::{AppConfig, SimConfig};
use crate::leaderboard::{Leaderboard, RankDiff, Trader};
use crate::market::{Instrument, MarkerStore, PriceGenerator, Quote, Series};
use crate::random::RandomSource;
use crate::types::{Bar, Viewport};

/// Outcome of one [`Simulation::advance`] call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepReport {
    pub fired: Vec<(u64, Job)>,
    /// Series or markers changed; the chart needs a new frame
    pub redraw: bool,
    pub leaderboard_changed: bool,
}

/// Serializable view of the session, handed to sinks after every runner step
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub now_ms: u64,
    pub instrument: String,
    pub title: String,
    pub paused: bool,
    pub live: Option<Bar>,
    pub quote: Quote,
    pub bars: usize,
    pub markers: usize,
    pub traders: Vec<Trader>,
}

impl Snapshot {
    /// Equal apart from the timestamp
    pub fn same_state(&self, other: &Snapshot) -> bool {
        self.instrument == other.instrument
            && self.paused == other.paused
            && self.live == other.live
            && self.quote == other.quote
            && self.bars == other.bars
            && self.markers == other.markers
            && self.traders == other.traders
    }
}

pub struct Simulation<R: RandomSource> {
    config: SimConfig,
    instrument: Instrument,
    generator: PriceGenerator,
    series: Series,
    markers: MarkerStore,
    leaderboard: Leaderboard,
    quote: Quote,
    paused: bool,
    /// Leaderboard stats changed since the last `advance`
    leaderboard_dirty: bool,
    now_ms: u64,
    epoch_secs: i64,
    rng: R,
}

impl<R: RandomSource> Simulation<R> {
    /// Seed the leaderboard and build the configured instrument's history
    /// ending at `epoch_secs`.
    pub fn new(config: &AppConfig, epoch_secs: i64, mut rng: R) -> Self {
        let sim = config.sim.clone();
        let instrument = Instrument::from_key(&sim.instrument);
        let generator = PriceGenerator::new(&instrument, sim.retention());
        let leaderboard = Leaderboard::seed(config.leaderboard.size, &mut rng);
        let series = generator.init_history(sim.visible_bars, epoch_secs, &mut rng);
        let quote = sample_quote(&series, &instrument, &mut rng);

        info!(
            instrument = %instrument,
            bars = series.len(),
            traders = leaderboard.len(),
            "[SIM] Simulation initialized"
        );

        Self {
            markers: MarkerStore::new(sim.marker_capacity),
            config: sim,
            instrument,
            generator,
            series,
            leaderboard,
            quote,
            paused: false,
            leaderboard_dirty: false,
            now_ms: 0,
            epoch_secs,
            rng,
        }
    }

    pub fn instrument(&self) -> &Instrument {
        &self.instrument
    }

    pub fn series(&self) -> &Series {
        &self.series
    }

    pub fn markers(&self) -> &MarkerStore {
        &self.markers
    }

    pub fn leaderboard(&self) -> &Leaderboard {
        &self.leaderboard
    }

    pub fn quote(&self) -> &Quote {
        &self.quote
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Wall-clock seconds corresponding to the current sim time
    pub fn now_secs(&self) -> i64 {
        self.epoch_secs + (self.now_ms / 1000) as i64
    }

    /// Switch instruments: fresh history ending now, markers cleared
    pub fn select_instrument<S: EventSink + ?Sized>(&mut self, key: &str, sink: &mut S) {
        let instrument = Instrument::from_key(key);
        self.generator = PriceGenerator::new(&instrument, self.config.retention());
        self.series = self
            .generator
            .init_history(self.config.visible_bars, self.now_secs(), &mut self.rng);
        self.markers.clear();
        self.quote = sample_quote(&self.series, &instrument, &mut self.rng);

        info!(
            instrument = %instrument,
            known = instrument.is_known(),
            bars = self.series.len(),
            "[SIM] Instrument selected"
        );
        sink.publish(
            self.now_ms,
            &SimEvent::InstrumentChanged {
                key: instrument.key().to_string(),
                decimals: instrument.profile().decimals,
            },
        );
        self.instrument = instrument;
    }

    /// Set the pause flag; publishes only when it actually changes
    pub fn set_paused<S: EventSink + ?Sized>(&mut self, paused: bool, sink: &mut S) {
        if self.paused == paused {
            return;
        }
        self.paused = paused;
        info!(paused, "[SIM] Feed {}", if paused { "paused" } else { "resumed" });
        sink.publish(self.now_ms, &SimEvent::PauseToggled { paused });
    }

    pub fn toggle_pause<S: EventSink + ?Sized>(&mut self, sink: &mut S) -> bool {
        self.set_paused(!self.paused, sink);
        self.paused
    }

    /// Live tick: nudge the last close. No-op while paused.
    pub fn tick(&mut self) -> Option<f64> {
        if self.paused {
            return None;
        }
        let close = self.generator.tick_update(&mut self.series, &mut self.rng)?;
        self.quote = sample_quote(&self.series, &self.instrument, &mut self.rng);
        debug!(close, "[SIM] Tick");
        Some(close)
    }

    /// Bar completion. The live bar may produce an execution (which rewards a
    /// trader) and an activity notice before the next bar opens at its close.
    /// No-op while paused.
    pub fn finalize_bar<S: EventSink + ?Sized>(&mut self, sink: &mut S) -> Option<Bar> {
        if self.paused {
            return None;
        }
        let live = *self.series.last()?;

        if let Some(marker) =
            self.markers
                .maybe_emit(&live, self.config.marker_probability, &mut self.rng)
        {
            info!(
                instrument = %self.instrument,
                side = %marker.side,
                price = marker.price,
                "[SIM] Execution"
            );
            sink.publish(
                self.now_ms,
                &SimEvent::Execution {
                    side: marker.side,
                    price: marker.price,
                    time: marker.time,
                },
            );

            if let Some(outcome) = self.leaderboard.reward_trader(marker.price, &mut self.rng) {
                self.leaderboard_dirty = true;
                debug!(
                    handle = %outcome.handle,
                    bump = outcome.bump,
                    trades_added = outcome.trades_added,
                    "[LB] Trader rewarded"
                );
                sink.publish(
                    self.now_ms,
                    &SimEvent::Reward {
                        trader_id: outcome.trader_id,
                        handle: outcome.handle.clone(),
                        price: outcome.trigger_price,
                        bump: outcome.bump,
                    },
                );
                self.publish_reorder(&outcome.diff, sink);
            }
        }

        if self.rng.chance(self.config.activity_probability) {
            sink.publish(self.now_ms, &SimEvent::Activity);
        }

        let bar = self.generator.finalize_bar(&mut self.series, &mut self.rng)?;
        self.quote = sample_quote(&self.series, &self.instrument, &mut self.rng);
        debug!(time = bar.time, open = bar.open, close = bar.close, "[SIM] Bar opened");
        Some(bar)
    }

    /// Leaderboard re-score; keeps running while paused
    pub fn scoring_tick<S: EventSink + ?Sized>(&mut self, sink: &mut S) -> RankDiff {
        let diff = self.leaderboard.scoring_tick(&mut self.rng);
        self.leaderboard_dirty = true;
        self.publish_reorder(&diff, sink);
        diff
    }

    /// Periodic ambient notice; keeps running while paused
    pub fn ambient_activity<S: EventSink + ?Sized>(&mut self, sink: &mut S) {
        sink.publish(self.now_ms, &SimEvent::Activity);
    }

    /// Mirror button: `Some(handle)` from a leaderboard row, `None` from the
    /// global button
    pub fn mirror<S: EventSink + ?Sized>(&mut self, handle: Option<&str>, sink: &mut S) {
        info!(handle = ?handle, "[SIM] Manual mirror");
        sink.publish(
            self.now_ms,
            &SimEvent::ManualMirror {
                handle: handle.map(str::to_string),
            },
        );
    }

    /// Run one job at sim time `at_ms`. Returns true when the chart changed.
    pub fn run_job<S: EventSink + ?Sized>(&mut self, at_ms: u64, job: Job, sink: &mut S) -> bool {
        self.now_ms = self.now_ms.max(at_ms);
        match job {
            Job::Tick => self.tick().is_some(),
            Job::FinalizeBar => self.finalize_bar(sink).is_some(),
            Job::Scoring => {
                self.scoring_tick(sink);
                false
            }
            Job::Notify => {
                self.ambient_activity(sink);
                false
            }
        }
    }

    /// Advance `clock` by `delta_ms` and run every job that came due
    pub fn advance<S: EventSink + ?Sized>(
        &mut self,
        clock: &mut SimClock,
        delta_ms: u64,
        sink: &mut S,
    ) -> StepReport {
        let mut report = StepReport::default();
        self.leaderboard_dirty = false;
        for (at, job) in clock.advance(delta_ms) {
            report.redraw |= self.run_job(at, job, sink);
            report.fired.push((at, job));
        }
        report.leaderboard_changed = self.leaderboard_dirty;
        self.now_ms = self.now_ms.max(clock.now_ms());
        report
    }

    /// Inputs for one chart frame over the visible window
    pub fn chart_frame(&self, viewport: Viewport) -> ChartFrame<'_> {
        ChartFrame {
            bars: self.series.visible(self.config.visible_bars),
            markers: &self.markers,
            profile: self.instrument.profile(),
            viewport,
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            now_ms: self.now_ms,
            instrument: self.instrument.key().to_string(),
            title: self.instrument.title(),
            paused: self.paused,
            live: self.series.last().copied(),
            quote: self.quote,
            bars: self.series.len(),
            markers: self.markers.len(),
            traders: self.leaderboard.traders().to_vec(),
        }
    }

    fn publish_reorder<S: EventSink + ?Sized>(&self, diff: &RankDiff, sink: &mut S) {
        if diff.is_unchanged() {
            return;
        }
        let moves: Vec<_> = diff.movers().cloned().collect();
        debug!(movers = moves.len(), "[LB] Leaderboard reordered");
        sink.publish(self.now_ms, &SimEvent::LeaderboardReordered { moves });
    }
}

fn sample_quote<R: RandomSource>(series: &Series, instrument: &Instrument, rng: &mut R) -> Quote {
    let mid = series
        .last()
        .map(|b| b.close)
        .unwrap_or(instrument.profile().seed_price);
    Quote::sample(mid, instrument.profile(), rng)
}
