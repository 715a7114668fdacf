//! Cosmetic bid/ask panel sampled around the live close

use serde::{Deserialize, Serialize};

use crate::market::{round_dp, InstrumentProfile};
use crate::random::RandomSource;

const VOLUME_MIN: f64 = 200.0;
const VOLUME_SPAN: f64 = 1200.0;

/// Top-of-book snapshot shown next to the chart
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub bid: f64,
    pub ask: f64,
    pub spread: f64,
    pub volume: u32,
}

impl Quote {
    pub fn sample<R: RandomSource>(mid: f64, profile: &InstrumentProfile, rng: &mut R) -> Self {
        let (lo, hi) = profile.spread_range;
        let spread = round_dp(rng.uniform(lo, hi), profile.spread_decimals);
        let bid = profile.round(mid - spread / 2.0);
        let ask = profile.round(mid + spread / 2.0);
        let volume = (rng.next_unit() * VOLUME_SPAN + VOLUME_MIN).floor() as u32;

        Self {
            bid,
            ask,
            spread: profile.round(ask - bid),
            volume,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::Instrument;
    use crate::random::ScriptedRandom;

    #[test]
    fn test_quote_brackets_mid() {
        let inst = Instrument::from_key("EURUSD");
        let mut rng = ScriptedRandom::new(vec![0.5, 0.0]);
        let q = Quote::sample(1.1, inst.profile(), &mut rng);
        assert!(q.bid < 1.1 && q.ask > 1.1);
        assert!(q.spread > 0.0);
        assert_eq!(q.volume, 200);
    }

    #[test]
    fn test_yen_spread_range() {
        let inst = Instrument::from_key("USDJPY");
        let mut rng = ScriptedRandom::new(vec![0.999, 0.999]);
        let q = Quote::sample(150.0, inst.profile(), &mut rng);
        assert!(q.spread <= 0.121);
        assert!(q.volume < 1400);
    }
}
