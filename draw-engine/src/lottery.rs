//! Lottery Engine: sequential prize draws over a depleting pool.
//!
//! The engine keeps a snapshot of the canonical roster and a working pool
//! derived from it. Each `draw()` picks one participant uniformly from the
//! pool, records a `WinRecord` at the front of the history, and (unless
//! duplicates are allowed) removes the winner from the pool by id.
//!
//! ```text
//! initialize(roster) ──► pool = roster, history = []
//!        │
//!        ├─ draw(prize) ──► pick uniform, push_front(record), pool -= winner?
//!        │                  (EmptyPool when pool is empty, nothing changes)
//!        └─ reset()     ──► pool = roster, history = []
//! ```

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::DrawError;
use crate::roster::{Participant, ParticipantId};

/// Prize label used when a draw is started without one.
pub const DEFAULT_PRIZE_LABEL: &str = "Mystery Prize";

/// One committed draw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinRecord {
    pub participant_id: ParticipantId,
    pub winner_name: String,
    pub drawn_at: DateTime<Utc>,
    pub prize_label: String,
}

/// Prize draw state for one roster snapshot.
pub struct LotteryEngine<R = StdRng> {
    canonical: Vec<Participant>,
    pool: Vec<Participant>,
    history: Vec<WinRecord>,
    allow_duplicate: bool,
    current_winner: Option<Participant>,
    prize_fallback: String,
    rng: R,
}

impl LotteryEngine<StdRng> {
    /// Create an engine seeded from OS entropy.
    pub fn new(participants: &[Participant]) -> Self {
        Self::with_rng(participants, StdRng::from_entropy())
    }
}

impl<R: Rng> LotteryEngine<R> {
    pub fn with_rng(participants: &[Participant], rng: R) -> Self {
        Self {
            canonical: participants.to_vec(),
            pool: participants.to_vec(),
            history: Vec::new(),
            allow_duplicate: false,
            current_winner: None,
            prize_fallback: DEFAULT_PRIZE_LABEL.to_string(),
            rng,
        }
    }

    /// Override the label recorded for draws started without a prize name.
    pub fn with_prize_fallback(mut self, label: impl Into<String>) -> Self {
        self.prize_fallback = label.into();
        self
    }

    /// Take a fresh snapshot of the roster, discarding pool and history.
    pub fn initialize(&mut self, participants: &[Participant]) {
        self.canonical = participants.to_vec();
        self.pool = participants.to_vec();
        self.history.clear();
        self.current_winner = None;
        info!(participants = participants.len(), "Lottery initialized");
    }

    /// Draw one winner uniformly from the current pool.
    pub fn draw(&mut self, prize_label: &str) -> Result<Participant, DrawError> {
        if self.pool.is_empty() {
            warn!(
                total = self.canonical.len(),
                draws = self.history.len(),
                "Draw rejected: pool is empty"
            );
            return Err(DrawError::EmptyPool);
        }

        let idx = self.rng.gen_range(0..self.pool.len());
        let winner = self.pool[idx].clone();

        let label = match prize_label.trim() {
            "" => self.prize_fallback.clone(),
            l => l.to_string(),
        };

        self.history.insert(
            0,
            WinRecord {
                participant_id: winner.id,
                winner_name: winner.name.clone(),
                drawn_at: Utc::now(),
                prize_label: label.clone(),
            },
        );

        if !self.allow_duplicate {
            self.pool.retain(|p| p.id != winner.id);
        }

        info!(
            winner = %winner.name,
            prize = %label,
            remaining = self.pool.len(),
            "Prize drawn"
        );

        self.current_winner = Some(winner.clone());
        Ok(winner)
    }

    /// Restore the pool from the last snapshot and clear the history.
    pub fn reset(&mut self) {
        self.pool = self.canonical.clone();
        self.history.clear();
        self.current_winner = None;
        info!(participants = self.pool.len(), "Lottery reset");
    }

    /// Toggle whether winners stay in the pool. Only affects future draws.
    pub fn set_allow_duplicate(&mut self, allow: bool) {
        self.allow_duplicate = allow;
    }

    pub fn allow_duplicate(&self) -> bool {
        self.allow_duplicate
    }

    /// Pick a display candidate for the reveal animation.
    ///
    /// Does not touch pool, history or current winner.
    pub fn random_candidate(&mut self) -> Option<&Participant> {
        if self.pool.is_empty() {
            return None;
        }
        let idx = self.rng.gen_range(0..self.pool.len());
        self.pool.get(idx)
    }

    pub fn pool(&self) -> &[Participant] {
        &self.pool
    }

    /// Draw history, newest first.
    pub fn history(&self) -> &[WinRecord] {
        &self.history
    }

    pub fn current_winner(&self) -> Option<&Participant> {
        self.current_winner.as_ref()
    }

    pub fn remaining(&self) -> usize {
        self.pool.len()
    }

    /// Size of the roster snapshot the pool was built from.
    pub fn total(&self) -> usize {
        self.canonical.len()
    }

    pub fn is_exhausted(&self) -> bool {
        self.pool.is_empty()
    }
}
