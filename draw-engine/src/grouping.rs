//! Grouping Engine: uniform shuffle, fixed-size partition, team labels.
//!
//! ```text
//! names ──► Fisher–Yates shuffle ──► chunks of `group_size` ──► label each chunk
//!                                     (last chunk may be short)   (namer, else "Team N")
//! ```
//!
//! The stored result is replaced only once shuffle, partition and labelling
//! have all completed, so callers never observe a half-built grouping.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::DrawError;
use crate::naming::{fallback_label, GroupNamer};

/// Smallest meaningful group.
pub const MIN_GROUP_SIZE: usize = 2;

/// One labelled chunk of the shuffled roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    pub label: String,
    pub members: Vec<String>,
}

/// Clamp a requested size into `[2, max(2, participant_count)]`.
pub fn clamp_group_size(requested: usize, participant_count: usize) -> usize {
    requested.clamp(MIN_GROUP_SIZE, MIN_GROUP_SIZE.max(participant_count))
}

/// Number of groups `participant_count` people split into at `group_size`.
pub fn planned_group_count(participant_count: usize, group_size: usize) -> usize {
    if group_size == 0 {
        return 0;
    }
    participant_count.div_ceil(group_size)
}

/// In-place Fisher–Yates shuffle. Every permutation is equally likely.
pub fn shuffle<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.gen_range(0..=i);
        items.swap(i, j);
    }
}

fn validate_group_size(size: usize, participants: usize) -> Result<(), DrawError> {
    if size < MIN_GROUP_SIZE || size > MIN_GROUP_SIZE.max(participants) {
        return Err(DrawError::InvalidGroupSize { size, participants });
    }
    Ok(())
}

/// Random team builder.
pub struct GroupingEngine<R = StdRng> {
    groups: Vec<Group>,
    group_size: Option<usize>,
    naming_timeout: Duration,
    rng: R,
}

impl GroupingEngine<StdRng> {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }
}

impl Default for GroupingEngine<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng + Send> GroupingEngine<R> {
    pub fn with_rng(rng: R) -> Self {
        Self {
            groups: Vec::new(),
            group_size: None,
            naming_timeout: Duration::from_secs(30),
            rng,
        }
    }

    /// Upper bound on how long the namer may take before fallback labels are used.
    pub fn with_naming_timeout(mut self, timeout: Duration) -> Self {
        self.naming_timeout = timeout;
        self
    }

    /// Shuffle `names`, split them into groups of `group_size`, and label each group.
    ///
    /// `group_size` must already be clamped with [`clamp_group_size`].
    pub async fn generate_groups<N>(
        &mut self,
        names: &[String],
        group_size: usize,
        namer: &N,
    ) -> Result<Vec<Group>, DrawError>
    where
        N: GroupNamer + ?Sized,
    {
        validate_group_size(group_size, names.len())?;

        let mut shuffled = names.to_vec();
        shuffle(&mut shuffled, &mut self.rng);

        let total_groups = planned_group_count(shuffled.len(), group_size);
        let labels = if total_groups == 0 {
            Vec::new()
        } else {
            self.resolve_labels(namer, total_groups).await
        };

        let groups: Vec<Group> = shuffled
            .chunks(group_size)
            .zip(labels)
            .enumerate()
            .map(|(i, (members, label))| Group {
                id: format!("group-{i}"),
                label,
                members: members.to_vec(),
            })
            .collect();

        info!(
            participants = names.len(),
            group_size,
            groups = groups.len(),
            "Groups generated"
        );

        self.groups = groups.clone();
        self.group_size = Some(group_size);
        Ok(groups)
    }

    /// Ask the namer for `count` labels and fill every gap with the fallback.
    async fn resolve_labels<N>(&self, namer: &N, count: usize) -> Vec<String>
    where
        N: GroupNamer + ?Sized,
    {
        let provided = match tokio::time::timeout(self.naming_timeout, namer.names(count)).await {
            Ok(Ok(labels)) => labels,
            Ok(Err(e)) => {
                warn!(provider = namer.provider(), error = %e, "Namer failed, using fallback labels");
                Vec::new()
            }
            Err(_) => {
                warn!(
                    provider = namer.provider(),
                    timeout_ms = self.naming_timeout.as_millis() as u64,
                    "Namer timed out, using fallback labels"
                );
                Vec::new()
            }
        };

        if !provided.is_empty() && provided.len() < count {
            warn!(
                provider = namer.provider(),
                requested = count,
                received = provided.len(),
                "Namer returned too few labels"
            );
        }

        (0..count)
            .map(|i| match provided.get(i).map(|l| l.trim()) {
                Some(label) if !label.is_empty() => label.to_string(),
                _ => fallback_label(i),
            })
            .collect()
    }

    /// The most recent grouping result.
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Group size used for the most recent result.
    pub fn group_size(&self) -> Option<usize> {
        self.group_size
    }

    /// Forget the last result, e.g. when the roster changes.
    pub fn clear(&mut self) {
        self.groups.clear();
        self.group_size = None;
    }
}
