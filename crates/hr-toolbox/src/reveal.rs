//! Timed reveal for lottery draws.
//!
//! The reveal cycles a random display candidate on a fixed interval, then
//! commits exactly one `draw()`. The candidates are cosmetic; only the final
//! draw touches the pool or the history.

use std::time::Duration;

use draw_engine::{DrawError, LotteryEngine, Participant};
use rand::Rng;
use tokio::time::{self, Instant, MissedTickBehavior};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealTiming {
    pub duration: Duration,
    pub interval: Duration,
}

impl RevealTiming {
    /// No cycling phase; the draw is committed immediately.
    pub fn instant() -> Self {
        Self {
            duration: Duration::ZERO,
            interval: Duration::ZERO,
        }
    }

    pub fn is_instant(&self) -> bool {
        self.duration.is_zero() || self.interval.is_zero()
    }
}

impl Default for RevealTiming {
    fn default() -> Self {
        Self {
            duration: Duration::from_millis(2000),
            interval: Duration::from_millis(80),
        }
    }
}

/// Cycle candidates through `on_tick` for `timing.duration`, then draw once.
///
/// An exhausted pool fails before any cycling starts.
pub async fn reveal_draw<R, F>(
    lottery: &mut LotteryEngine<R>,
    prize_label: &str,
    timing: RevealTiming,
    mut on_tick: F,
) -> Result<Participant, DrawError>
where
    R: Rng,
    F: FnMut(&str),
{
    if lottery.is_exhausted() || timing.is_instant() {
        return lottery.draw(prize_label);
    }

    let start = Instant::now();
    // An interval longer than the reveal would delay the commit past `duration`.
    let mut ticker = time::interval(timing.interval.min(timing.duration));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;
        if start.elapsed() >= timing.duration {
            break;
        }
        if let Some(candidate) = lottery.random_candidate() {
            on_tick(&candidate.name);
        }
    }

    lottery.draw(prize_label)
}
