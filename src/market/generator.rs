//! Price Series Generator - Random-walk OHLC bars
//!
//! Builds the initial history, moves the live bar on every tick and seals it
//! into a fresh bar when the bar period completes. All prices are rounded to
//! the instrument precision and floored at its smallest positive quote.

use crate::market::{Instrument, InstrumentProfile, Series};
use crate::random::RandomSource;
use crate::types::{Bar, BAR_STEP_SECS};

/// Wick length relative to the body change
const WICK_REACH: f64 = 1.1;

/// Generator bound to one instrument profile
#[derive(Debug, Clone)]
pub struct PriceGenerator {
    profile: InstrumentProfile,
    retention: usize,
}

impl PriceGenerator {
    pub fn new(instrument: &Instrument, retention: usize) -> Self {
        Self {
            profile: *instrument.profile(),
            retention,
        }
    }

    pub fn profile(&self) -> &InstrumentProfile {
        &self.profile
    }

    /// `length` bars ending at `now_secs`, the first opening at the seed price
    pub fn init_history<R: RandomSource>(
        &self,
        length: usize,
        now_secs: i64,
        rng: &mut R,
    ) -> Series {
        let mut series = Series::new(self.retention);
        let mut time = now_secs - length as i64 * BAR_STEP_SECS;
        let mut open = self.profile.round(self.profile.seed_price.max(self.profile.min_price()));

        for _ in 0..length {
            let bar = self.sample_bar(time, open, self.profile.history_volatility, rng);
            open = bar.close;
            time += BAR_STEP_SECS;
            series.push(bar);
        }
        series
    }

    /// Move the live bar's close; the high/low envelope only ever widens.
    /// Returns the new close, or `None` on an empty series.
    pub fn tick_update<R: RandomSource>(&self, series: &mut Series, rng: &mut R) -> Option<f64> {
        let profile = self.profile;
        let live = series.last_mut()?;
        let delta = rng.centered(profile.tick_width());
        live.close = profile.round((live.close + delta).max(profile.min_price()));
        live.high = live.high.max(live.close);
        live.low = live.low.min(live.close);
        Some(live.close)
    }

    /// Seal the live bar and open the next one at its close
    pub fn finalize_bar<R: RandomSource>(&self, series: &mut Series, rng: &mut R) -> Option<Bar> {
        let last = *series.last()?;
        let bar = self.sample_bar(
            last.time + BAR_STEP_SECS,
            last.close,
            self.profile.live_volatility,
            rng,
        );
        series.push(bar);
        Some(bar)
    }

    fn sample_bar<R: RandomSource>(
        &self,
        time: i64,
        open: f64,
        volatility: f64,
        rng: &mut R,
    ) -> Bar {
        let p = &self.profile;
        let floor = p.min_price();
        let change = rng.centered(volatility);
        let close = (open + change).max(floor);
        let reach = change.abs() * WICK_REACH;
        let high = open.max(close) + rng.next_unit() * reach + p.wick;
        let low = (open.min(close) - rng.next_unit() * reach - p.wick).max(floor);

        Bar {
            time,
            open,
            high: p.round(high),
            low: p.round(low),
            close: p.round(close),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::ScriptedRandom;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const NOW: i64 = 1_700_000_000;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn test_history_shape() {
        let inst = Instrument::from_key("EURUSD");
        let gen = PriceGenerator::new(&inst, 160);
        let mut rng = StdRng::seed_from_u64(1);
        let series = gen.init_history(140, NOW, &mut rng);

        assert_eq!(series.len(), 140);
        let bars = series.bars();
        assert!(approx(bars[0].open, 1.075));
        assert_eq!(bars[0].time, NOW - 140 * 60);
        for pair in bars.windows(2) {
            assert_eq!(pair[1].time - pair[0].time, 60);
            assert_eq!(pair[1].open, pair[0].close);
        }
        assert!(bars.iter().all(|b| b.is_well_formed()));
    }

    #[test]
    fn test_scripted_bar_values() {
        let inst = Instrument::from_key("EURUSD");
        let gen = PriceGenerator::new(&inst, 10);
        // change = (0.75 - 0.5) * 0.0018 = 0.00045, no random wick reach
        let mut rng = ScriptedRandom::new(vec![0.75, 0.0, 0.0]);
        let series = gen.init_history(1, NOW, &mut rng);
        let bar = series.bars()[0];
        assert!(approx(bar.open, 1.075));
        assert!(approx(bar.close, 1.07545));
        assert!(approx(bar.high, 1.07605));
        assert!(approx(bar.low, 1.0744));
    }

    #[test]
    fn test_close_never_crosses_zero() {
        let inst = Instrument::from_key("USDJPY");
        let gen = PriceGenerator::new(&inst, 500);
        // Always draw the most negative change; 3000 * 0.06 walks past zero
        let mut rng = ScriptedRandom::constant(0.0);
        let mut series = gen.init_history(3_000, NOW, &mut rng);
        for _ in 0..200 {
            gen.tick_update(&mut series, &mut rng);
            gen.finalize_bar(&mut series, &mut rng);
        }
        for bar in series.bars() {
            assert!(bar.close > 0.0);
            assert!(bar.low > 0.0);
            assert!(bar.is_well_formed());
        }
    }

    #[test]
    fn test_tick_only_widens_envelope() {
        let inst = Instrument::from_key("GBPUSD");
        let gen = PriceGenerator::new(&inst, 160);
        let mut rng = StdRng::seed_from_u64(99);
        let mut series = gen.init_history(20, NOW, &mut rng);
        let len = series.len();

        for _ in 0..500 {
            let before = *series.last().unwrap();
            let close = gen.tick_update(&mut series, &mut rng).unwrap();
            let after = *series.last().unwrap();
            assert_eq!(after.open, before.open);
            assert_eq!(after.time, before.time);
            assert_eq!(after.close, close);
            assert!(after.high >= before.high && after.high >= close);
            assert!(after.low <= before.low && after.low <= close);
        }
        assert_eq!(series.len(), len);
    }

    #[test]
    fn test_finalize_respects_retention() {
        let inst = Instrument::from_key("AUDUSD");
        let gen = PriceGenerator::new(&inst, 160);
        let mut rng = StdRng::seed_from_u64(5);
        let mut series = gen.init_history(140, NOW, &mut rng);

        for _ in 0..300 {
            let prev = *series.last().unwrap();
            let bar = gen.finalize_bar(&mut series, &mut rng).unwrap();
            assert_eq!(bar.open, prev.close);
            assert_eq!(bar.time, prev.time + 60);
            assert!(series.len() <= 160);
        }
        assert_eq!(series.len(), 160);
    }

    #[test]
    fn test_empty_series_is_noop() {
        let gen = PriceGenerator::new(&Instrument::default(), 10);
        let mut series = Series::new(10);
        let mut rng = ScriptedRandom::constant(0.3);
        assert!(gen.tick_update(&mut series, &mut rng).is_none());
        assert!(gen.finalize_bar(&mut series, &mut rng).is_none());
        assert!(series.is_empty());
    }
}
