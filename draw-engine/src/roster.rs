//! Canonical participant list.
//!
//! The roster owns the ordered sequence of participants. Every participant
//! receives a `ParticipantId` once, when it enters the roster; names may
//! repeat and are flagged, never merged, unless `dedup_by_name` is called.

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque, stable participant identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(Uuid);

impl ParticipantId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ParticipantId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single person on the roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
}

impl Participant {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ParticipantId::new(),
            name: name.into(),
        }
    }
}

/// Ordered participant list with duplicate detection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Roster {
    participants: Vec<Participant>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a roster from raw names. Names are trimmed; blank ones dropped.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut roster = Self::new();
        roster.append_names(names);
        roster
    }

    /// Append names to the end of the roster, returning how many were added.
    ///
    /// Existing participants keep their ids.
    pub fn append_names<I, S>(&mut self, names: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let before = self.participants.len();
        self.participants.extend(
            names
                .into_iter()
                .map(|n| n.as_ref().trim().to_string())
                .filter(|n| !n.is_empty())
                .map(Participant::new),
        );
        self.participants.len() - before
    }

    /// Replace the whole roster with fresh participants.
    pub fn replace_names<I, S>(&mut self, names: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.participants.clear();
        self.append_names(names)
    }

    pub fn clear(&mut self) {
        self.participants.clear();
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn names(&self) -> Vec<String> {
        self.participants.iter().map(|p| p.name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    /// Names that occur more than once, in order of first appearance.
    pub fn duplicate_names(&self) -> Vec<String> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for p in &self.participants {
            *counts.entry(p.name.as_str()).or_default() += 1;
        }

        let mut seen = HashSet::new();
        self.participants
            .iter()
            .filter(|p| counts[p.name.as_str()] > 1 && seen.insert(p.name.as_str()))
            .map(|p| p.name.clone())
            .collect()
    }

    pub fn is_duplicate(&self, name: &str) -> bool {
        self.participants.iter().filter(|p| p.name == name).count() > 1
    }

    /// Collapse participants sharing a name, keeping the first occurrence.
    ///
    /// Unlike lottery removal, which keys by id, this keys by name.
    /// Returns the number of participants removed.
    pub fn dedup_by_name(&mut self) -> usize {
        let before = self.participants.len();
        let mut seen = HashSet::new();
        self.participants.retain(|p| seen.insert(p.name.clone()));
        before - self.participants.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_names_trims_and_drops_blanks() {
        let roster = Roster::from_names(["  Ada ", "", "   ", "Grace"]);
        assert_eq!(roster.names(), vec!["Ada", "Grace"]);
    }

    #[test]
    fn ids_are_unique_even_for_equal_names() {
        let roster = Roster::from_names(["Sam", "Sam"]);
        let ps = roster.participants();
        assert_eq!(ps[0].name, ps[1].name);
        assert_ne!(ps[0].id, ps[1].id);
    }

    #[test]
    fn append_keeps_existing_ids() {
        let mut roster = Roster::from_names(["Ada"]);
        let ada = roster.participants()[0].id;
        assert_eq!(roster.append_names(["Grace", "Linus"]), 2);
        assert_eq!(roster.participants()[0].id, ada);
        assert_eq!(roster.len(), 3);
    }

    #[test]
    fn duplicates_are_flagged_in_first_seen_order() {
        let roster = Roster::from_names(["Bo", "Al", "Bo", "Cy", "Al", "Al"]);
        assert_eq!(roster.duplicate_names(), vec!["Bo", "Al"]);
        assert!(roster.is_duplicate("Al"));
        assert!(!roster.is_duplicate("Cy"));
    }

    #[test]
    fn dedup_collapses_by_name_keeping_first() {
        let mut roster = Roster::from_names(["Bo", "Al", "Bo", "Cy", "Al"]);
        let first_bo = roster.participants()[0].id;
        assert_eq!(roster.dedup_by_name(), 2);
        assert_eq!(roster.names(), vec!["Bo", "Al", "Cy"]);
        assert_eq!(roster.participants()[0].id, first_bo);
        assert!(roster.duplicate_names().is_empty());
    }

    #[test]
    fn replace_discards_previous_participants() {
        let mut roster = Roster::from_names(["Ada", "Grace"]);
        roster.replace_names(["Ken"]);
        assert_eq!(roster.names(), vec!["Ken"]);
    }
}
