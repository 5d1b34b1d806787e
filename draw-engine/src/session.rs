//! Session controller.
//!
//! Owns everything one operator works with during an event: the roster, the
//! active view, the lottery and grouping engines, and the settings that the
//! views toggle. Any roster change reinitializes the lottery and drops the
//! last grouping; neither is patched incrementally.

use std::fmt;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::DrawError;
use crate::export::{self, ExportFormat};
use crate::grouping::{clamp_group_size, planned_group_count, Group, GroupingEngine};
use crate::import::{import_into, ImportError, ImportSource};
use crate::lottery::{LotteryEngine, DEFAULT_PRIZE_LABEL};
use crate::naming::{FallbackNamer, GroupNamer};
use crate::roster::{Participant, Roster};

/// Which screen the operator is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    Names,
    Lottery,
    Grouping,
}

impl View {
    /// Lottery and grouping need someone to draw from.
    pub fn requires_participants(self) -> bool {
        !matches!(self, Self::Names)
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Names => write!(f, "names"),
            Self::Lottery => write!(f, "lottery"),
            Self::Grouping => write!(f, "grouping"),
        }
    }
}

/// Operator-facing toggles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSettings {
    /// Ask the naming collaborator for creative team names.
    pub use_ai_names: bool,
    /// Requested group size; clamped against the roster on every use.
    pub group_size: usize,
    /// Prize label recorded for draws started without one.
    pub prize_fallback: String,
    /// How long the grouping engine waits for team names before falling back.
    pub naming_timeout: Duration,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            use_ai_names: true,
            group_size: 2,
            prize_fallback: DEFAULT_PRIZE_LABEL.to_string(),
            naming_timeout: Duration::from_secs(30),
        }
    }
}

pub struct Session {
    roster: Roster,
    view: View,
    settings: SessionSettings,
    lottery: LotteryEngine<StdRng>,
    grouping: GroupingEngine<StdRng>,
}

impl Session {
    pub fn new(settings: SessionSettings) -> Self {
        Self::from_rngs(settings, StdRng::from_entropy(), StdRng::from_entropy())
    }

    /// Reproducible session, for rehearsals and tests.
    pub fn seeded(settings: SessionSettings, seed: u64) -> Self {
        Self::from_rngs(
            settings,
            StdRng::seed_from_u64(seed),
            StdRng::seed_from_u64(seed.wrapping_add(1)),
        )
    }

    fn from_rngs(settings: SessionSettings, lottery_rng: StdRng, grouping_rng: StdRng) -> Self {
        let lottery = LotteryEngine::with_rng(&[], lottery_rng)
            .with_prize_fallback(settings.prize_fallback.clone());
        let grouping =
            GroupingEngine::with_rng(grouping_rng).with_naming_timeout(settings.naming_timeout);
        Self {
            roster: Roster::new(),
            view: View::Names,
            settings,
            lottery,
            grouping,
        }
    }

    // ── Roster ───────────────────────────────────────────────────────────

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn import(&mut self, source: &ImportSource) -> Result<usize, ImportError> {
        let added = import_into(&mut self.roster, source)?;
        self.roster_changed();
        Ok(added)
    }

    /// Replace the roster wholesale.
    pub fn set_names<I, S>(&mut self, names: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let added = self.roster.replace_names(names);
        self.roster_changed();
        added
    }

    /// Collapse duplicate names. Returns how many participants were removed.
    pub fn dedup_roster(&mut self) -> usize {
        let removed = self.roster.dedup_by_name();
        if removed > 0 {
            self.roster_changed();
        }
        removed
    }

    pub fn clear_roster(&mut self) {
        self.roster.clear();
        self.roster_changed();
    }

    fn roster_changed(&mut self) {
        self.lottery.initialize(self.roster.participants());
        self.grouping.clear();
        if self.roster.is_empty() && self.view.requires_participants() {
            debug!(from = %self.view, "Roster emptied, returning to names view");
            self.view = View::Names;
        }
    }

    // ── Views & settings ─────────────────────────────────────────────────

    pub fn view(&self) -> View {
        self.view
    }

    pub fn switch_view(&mut self, view: View) -> Result<(), DrawError> {
        if view.requires_participants() && self.roster.is_empty() {
            return Err(DrawError::ViewUnavailable(view));
        }
        debug!(from = %self.view, to = %view, "View switched");
        self.view = view;
        Ok(())
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    pub fn set_use_ai_names(&mut self, enabled: bool) {
        self.settings.use_ai_names = enabled;
    }

    /// Store the requested group size and return it clamped to the current roster.
    ///
    /// The request itself is kept, so a later import can grow into it.
    pub fn set_group_size(&mut self, requested: usize) -> usize {
        self.settings.group_size = requested;
        self.effective_group_size()
    }

    /// The requested group size clamped to the current roster.
    pub fn effective_group_size(&self) -> usize {
        clamp_group_size(self.settings.group_size, self.roster.len())
    }

    // ── Lottery ──────────────────────────────────────────────────────────

    pub fn lottery(&self) -> &LotteryEngine<StdRng> {
        &self.lottery
    }

    pub fn lottery_mut(&mut self) -> &mut LotteryEngine<StdRng> {
        &mut self.lottery
    }

    pub fn draw(&mut self, prize_label: &str) -> Result<Participant, DrawError> {
        self.lottery.draw(prize_label)
    }

    pub fn reset_lottery(&mut self) {
        self.lottery.reset();
    }

    pub fn set_allow_duplicate(&mut self, allow: bool) {
        self.lottery.set_allow_duplicate(allow);
    }

    pub fn history_text(&self) -> String {
        export::history_to_text(self.lottery.history())
    }

    // ── Grouping ─────────────────────────────────────────────────────────

    /// Groups the current roster would split into at the configured size.
    pub fn planned_groups(&self) -> usize {
        planned_group_count(self.roster.len(), self.effective_group_size())
    }

    /// Build groups from the roster. Uses `namer` only when AI names are on.
    pub async fn generate_groups<N>(&mut self, namer: &N) -> Result<Vec<Group>, DrawError>
    where
        N: GroupNamer + ?Sized,
    {
        let size = self.effective_group_size();
        let names = self.roster.names();
        if self.settings.use_ai_names {
            self.grouping.generate_groups(&names, size, namer).await
        } else {
            self.grouping
                .generate_groups(&names, size, &FallbackNamer)
                .await
        }
    }

    pub fn groups(&self) -> &[Group] {
        self.grouping.groups()
    }

    pub fn export_groups(&self, format: ExportFormat) -> String {
        export::render(self.grouping.groups(), format)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(SessionSettings::default())
    }
}
