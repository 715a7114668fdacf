//! Simulation Clock
//!
//! Discrete millisecond clock standing in for interval timers. Each job fires
//! at every multiple of its period; jobs due at the same instant fire in
//! [`Job`] declaration order.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::ScheduleConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Job {
    /// Move the live bar's close
    Tick,
    /// Seal the live bar and start the next one
    FinalizeBar,
    /// Re-score the leaderboard
    Scoring,
    /// Ambient activity notice
    Notify,
}

impl Job {
    pub const ALL: [Job; 4] = [Job::Tick, Job::FinalizeBar, Job::Scoring, Job::Notify];

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "tick" => Some(Job::Tick),
            "finalize_bar" | "finalize" => Some(Job::FinalizeBar),
            "scoring" => Some(Job::Scoring),
            "notify" => Some(Job::Notify),
            _ => None,
        }
    }
}

impl fmt::Display for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Job::Tick => write!(f, "tick"),
            Job::FinalizeBar => write!(f, "finalize_bar"),
            Job::Scoring => write!(f, "scoring"),
            Job::Notify => write!(f, "notify"),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Slot {
    job: Job,
    period: u64,
    next_due: u64,
}

#[derive(Debug, Clone)]
pub struct SimClock {
    now_ms: u64,
    slots: Vec<Slot>,
}

impl SimClock {
    pub fn new(schedule: &ScheduleConfig) -> Self {
        let periods = [
            (Job::Tick, schedule.tick_ms),
            (Job::FinalizeBar, schedule.candle_ms),
            (Job::Scoring, schedule.leaderboard_ms),
            (Job::Notify, schedule.notify_ms),
        ];
        let slots = periods
            .into_iter()
            .map(|(job, period)| {
                let period = period.max(1);
                Slot {
                    job,
                    period,
                    next_due: period,
                }
            })
            .collect();
        Self { now_ms: 0, slots }
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Earliest pending firing
    pub fn next_due(&self) -> Option<(u64, Job)> {
        self.slots.iter().map(|s| (s.next_due, s.job)).min()
    }

    /// Move time forward and return every firing in `(now, now + delta]`,
    /// ordered by time, then by job.
    pub fn advance(&mut self, delta_ms: u64) -> Vec<(u64, Job)> {
        let target = self.now_ms.saturating_add(delta_ms);
        let mut fired = Vec::new();

        while let Some((due, job)) = self.next_due() {
            if due > target {
                break;
            }
            fired.push((due, job));
            if let Some(slot) = self.slots.iter_mut().find(|s| s.job == job) {
                slot.next_due = due + slot.period;
            }
        }

        self.now_ms = target;
        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jobs_fire_at_their_periods() {
        let mut clock = SimClock::new(&ScheduleConfig::default());
        let fired = clock.advance(2200);

        let ticks = fired.iter().filter(|(_, j)| *j == Job::Tick).count();
        assert_eq!(ticks, 10);
        assert_eq!(fired.last(), Some(&(2200, Job::FinalizeBar)));
        assert_eq!(clock.now_ms(), 2200);
        assert_eq!(clock.next_due(), Some((2420, Job::Tick)));
    }

    #[test]
    fn test_same_instant_order_is_fixed() {
        let schedule = ScheduleConfig {
            tick_ms: 100,
            candle_ms: 100,
            leaderboard_ms: 50,
            notify_ms: 100,
        };
        let mut clock = SimClock::new(&schedule);
        let fired = clock.advance(100);
        assert_eq!(
            fired,
            vec![
                (50, Job::Scoring),
                (100, Job::Tick),
                (100, Job::FinalizeBar),
                (100, Job::Scoring),
                (100, Job::Notify),
            ]
        );
    }

    #[test]
    fn test_split_advances_match_one_advance() {
        let schedule = ScheduleConfig::default();
        let mut whole = SimClock::new(&schedule);
        let mut split = SimClock::new(&schedule);

        let expected = whole.advance(10_000);
        let mut got = Vec::new();
        for _ in 0..100 {
            got.extend(split.advance(100));
        }
        assert_eq!(got, expected);
    }

    #[test]
    fn test_job_names() {
        for job in Job::ALL {
            assert_eq!(Job::from_str(&job.to_string()), Some(job));
        }
        assert_eq!(Job::from_str("bogus"), None);
    }
}
