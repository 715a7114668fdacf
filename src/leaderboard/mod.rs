//! Leaderboard Model - Synthetic trader ranking
//!
//! Implements:
//! - Seeding from a fixed handle pool
//! - Random-walk scoring ticks (profit, trade count, win rate)
//! - Reward bumps correlated with simulated executions
//! - Rank diffs so a UI can animate rows moving up or down

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;

use crate::market::round_dp;
use crate::random::RandomSource;

/// Handles reused cyclically when seeding
pub const NAME_POOL: [&str; 10] = [
    "FXTitan",
    "PipHunter",
    "LunaTradez",
    "ForexBoss",
    "CryptoKnight",
    "SatoshiPro",
    "PipQueen",
    "MacroWave",
    "GridMaster",
    "AlphaRex",
];

pub const PROFIT_FLOOR_PCT: f64 = -50.0;
pub const WIN_RATE_MIN: u8 = 40;
pub const WIN_RATE_MAX: u8 = 99;

/// Smallest reward bump, so a reward always moves the trader up
const MIN_REWARD_BUMP: f64 = 0.01;

/// One synthetic trader row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trader {
    pub id: u32,
    pub handle: String,
    pub profit_pct: f64,
    pub win_rate: u8,
    pub trades: u32,
    /// 1-based position after the last sort
    pub rank: u32,
}

/// Direction a row moved in the last re-sort
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Movement {
    Up,
    Down,
    Unchanged,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankMove {
    pub id: u32,
    pub handle: String,
    /// 0-based row before the sort
    pub previous: usize,
    /// 0-based row after the sort
    pub current: usize,
    pub movement: Movement,
}

/// Previous vs. new order, one entry per trader in new order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankDiff {
    pub moves: Vec<RankMove>,
}

impl RankDiff {
    /// Rows whose position changed
    pub fn movers(&self) -> impl Iterator<Item = &RankMove> {
        self.moves.iter().filter(|m| m.movement != Movement::Unchanged)
    }

    pub fn is_unchanged(&self) -> bool {
        self.movers().next().is_none()
    }
}

/// Result of a reward event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardOutcome {
    pub trader_id: u32,
    pub handle: String,
    pub bump: f64,
    pub trades_added: u32,
    pub trigger_price: f64,
    pub diff: RankDiff,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Leaderboard {
    traders: Vec<Trader>,
}

impl Leaderboard {
    /// `n` traders with randomized stats, already ranked
    pub fn seed<R: RandomSource>(n: usize, rng: &mut R) -> Self {
        let traders = (0..n)
            .map(|i| {
                let profit_pct = round_dp(rng.uniform(50.0, 230.0), 2);
                let win_rate = rng.uniform(60.0, 95.0).floor() as u8;
                let trades = rng.uniform(40.0, 240.0).floor() as u32;
                Trader {
                    id: i as u32 + 1,
                    handle: format!("@{}", NAME_POOL[i % NAME_POOL.len()]),
                    profit_pct,
                    win_rate,
                    trades,
                    rank: 0,
                }
            })
            .collect();

        let mut board = Self { traders };
        board.rerank();
        board
    }

    /// Traders in rank order
    pub fn traders(&self) -> &[Trader] {
        &self.traders
    }

    pub fn len(&self) -> usize {
        self.traders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.traders.is_empty()
    }

    pub fn get(&self, id: u32) -> Option<&Trader> {
        self.traders.iter().find(|t| t.id == id)
    }

    pub fn leader(&self) -> Option<&Trader> {
        self.traders.first()
    }

    /// Nudge every trader, then re-sort
    pub fn scoring_tick<R: RandomSource>(&mut self, rng: &mut R) -> RankDiff {
        for t in &mut self.traders {
            let change = (rng.next_unit() - 0.5) * (rng.next_unit() * 4.0);
            t.profit_pct = round_dp(t.profit_pct + change, 2).max(PROFIT_FLOOR_PCT);

            if rng.next_unit() > 0.45 {
                t.trades += (rng.next_unit() * 3.0).floor() as u32;
            }
            if rng.next_unit() < 0.12 {
                let nudged = if rng.next_unit() > 0.5 {
                    t.win_rate.saturating_add(1)
                } else {
                    t.win_rate.saturating_sub(1)
                };
                t.win_rate = nudged.clamp(WIN_RATE_MIN, WIN_RATE_MAX);
            }
        }
        self.rerank()
    }

    /// Bump one uniformly chosen trader. Selection ignores the trade itself.
    pub fn reward_trader<R: RandomSource>(
        &mut self,
        trigger_price: f64,
        rng: &mut R,
    ) -> Option<RewardOutcome> {
        if self.traders.is_empty() {
            return None;
        }
        let idx = rng.index(self.traders.len());
        let extra = if rng.next_unit() > 0.6 { 2.0 } else { 0.0 };
        let bump = round_dp(rng.next_unit() * 3.0 + extra, 2).max(MIN_REWARD_BUMP);
        let trades_added = (1.0 + rng.next_unit() * 4.0).floor() as u32;

        let trader = &mut self.traders[idx];
        trader.profit_pct = round_dp(trader.profit_pct + bump, 2);
        trader.trades += trades_added;
        let trader_id = trader.id;
        let handle = trader.handle.clone();

        let diff = self.rerank();
        Some(RewardOutcome {
            trader_id,
            handle,
            bump,
            trades_added,
            trigger_price,
            diff,
        })
    }

    /// Sort by profit descending (ties by seed order) and reassign ranks
    fn rerank(&mut self) -> RankDiff {
        let previous: HashMap<u32, usize> = self
            .traders
            .iter()
            .enumerate()
            .map(|(pos, t)| (t.id, pos))
            .collect();

        self.traders.sort_by(|a, b| {
            b.profit_pct
                .partial_cmp(&a.profit_pct)
                .unwrap_or(Ordering::Equal)
                .then(a.id.cmp(&b.id))
        });

        let moves = self
            .traders
            .iter_mut()
            .enumerate()
            .map(|(pos, t)| {
                t.rank = pos as u32 + 1;
                let prev = previous.get(&t.id).copied().unwrap_or(pos);
                let movement = match prev.cmp(&pos) {
                    Ordering::Greater => Movement::Up,
                    Ordering::Less => Movement::Down,
                    Ordering::Equal => Movement::Unchanged,
                };
                RankMove {
                    id: t.id,
                    handle: t.handle.clone(),
                    previous: prev,
                    current: pos,
                    movement,
                }
            })
            .collect();

        RankDiff { moves }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::ScriptedRandom;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn assert_ranked(board: &Leaderboard) {
        let mut ranks: Vec<u32> = board.traders().iter().map(|t| t.rank).collect();
        ranks.sort_unstable();
        let expected: Vec<u32> = (1..=board.len() as u32).collect();
        assert_eq!(ranks, expected);

        let max = board
            .traders()
            .iter()
            .map(|t| t.profit_pct)
            .fold(f64::NEG_INFINITY, f64::max);
        assert_eq!(board.leader().unwrap().profit_pct, max);
        assert_eq!(board.leader().unwrap().rank, 1);
    }

    #[test]
    fn test_seed_ranges_and_handles() {
        let mut rng = StdRng::seed_from_u64(3);
        let board = Leaderboard::seed(12, &mut rng);
        assert_eq!(board.len(), 12);
        assert_ranked(&board);

        for t in board.traders() {
            assert!((50.0..=230.0).contains(&t.profit_pct));
            assert!((60..=94).contains(&t.win_rate));
            assert!((40..240).contains(&t.trades));
        }
        // pool wraps after ten names
        assert_eq!(board.get(11).unwrap().handle, "@FXTitan");
        assert_eq!(board.get(12).unwrap().handle, "@PipHunter");
    }

    #[test]
    fn test_ties_keep_seed_order() {
        let mut rng = ScriptedRandom::constant(0.5);
        let board = Leaderboard::seed(5, &mut rng);
        let ids: Vec<u32> = board.traders().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
        assert_eq!(board.get(3).unwrap().rank, 3);
    }

    #[test]
    fn test_scoring_invariants_hold() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut board = Leaderboard::seed(8, &mut rng);
        for _ in 0..5_000 {
            board.scoring_tick(&mut rng);
            assert_ranked(&board);
            for t in board.traders() {
                assert!((WIN_RATE_MIN..=WIN_RATE_MAX).contains(&t.win_rate));
                assert!(t.profit_pct >= PROFIT_FLOOR_PCT);
            }
        }
    }

    #[test]
    fn test_profit_floor_clamps() {
        // (0.0 - 0.5) * (0.99 * 4) = -1.98 every tick
        let mut rng = ScriptedRandom::constant(0.0);
        let mut board = Leaderboard::seed(3, &mut rng);
        // change, magnitude, no trade draw, no win-rate nudge: four draws per trader
        let mut down = ScriptedRandom::new(vec![0.0, 0.99, 0.0, 0.5]);
        for _ in 0..400 {
            board.scoring_tick(&mut down);
        }
        assert!(board.traders().iter().all(|t| t.profit_pct == PROFIT_FLOOR_PCT));
        assert!(board.traders().iter().all(|t| t.win_rate >= WIN_RATE_MIN));
        assert_eq!(down.draws(), 400 * 3 * 4);
    }

    #[test]
    fn test_reward_changes_exactly_one_trader() {
        let mut rng = StdRng::seed_from_u64(21);
        let mut board = Leaderboard::seed(8, &mut rng);
        let before: HashMap<u32, Trader> =
            board.traders().iter().map(|t| (t.id, t.clone())).collect();

        let outcome = board.reward_trader(1.07512, &mut rng).unwrap();
        assert!(outcome.bump >= 0.01);
        assert!(outcome.trades_added >= 1);
        assert_eq!(outcome.trigger_price, 1.07512);

        let mut changed = 0;
        for t in board.traders() {
            let old = &before[&t.id];
            if t.id == outcome.trader_id {
                changed += 1;
                assert!(t.profit_pct > old.profit_pct);
                assert!(t.trades > old.trades);
            } else {
                assert_eq!(t.profit_pct, old.profit_pct);
                assert_eq!(t.trades, old.trades);
                assert_eq!(t.win_rate, old.win_rate);
            }
        }
        assert_eq!(changed, 1);
        assert_ranked(&board);
    }

    #[test]
    fn test_reward_diff_reports_climb() {
        // all tied at 140.0; trader picked at index 4 (0.5 * 8) climbs to first
        let mut rng = ScriptedRandom::constant(0.5);
        let mut board = Leaderboard::seed(8, &mut rng);
        let outcome = board.reward_trader(1.1, &mut rng).unwrap();

        assert_eq!(outcome.trader_id, 5);
        assert_eq!(board.leader().unwrap().id, 5);
        let climb = outcome.diff.moves.iter().find(|m| m.id == 5).unwrap();
        assert_eq!(climb.previous, 4);
        assert_eq!(climb.current, 0);
        assert_eq!(climb.movement, Movement::Up);
        assert_eq!(outcome.diff.movers().count(), 5);
    }

    #[test]
    fn test_empty_board_reward_is_none() {
        let mut rng = ScriptedRandom::constant(0.1);
        let mut board = Leaderboard::seed(0, &mut rng);
        assert!(board.reward_trader(1.0, &mut rng).is_none());
        assert!(board.scoring_tick(&mut rng).moves.is_empty());
    }
}
