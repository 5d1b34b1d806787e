//! Engine error taxonomy.
//!
//! | Variant            | Audience | Meaning                                   |
//! |--------------------|----------|-------------------------------------------|
//! | EmptyPool          | user     | every eligible participant already won    |
//! | InvalidGroupSize   | caller   | group size was not clamped before calling |
//! | ViewUnavailable    | user     | lottery/grouping opened with empty roster |
//!
//! Naming faults have their own type (`naming::NamingError`) because the
//! grouping engine always absorbs them.

use thiserror::Error;

use crate::session::View;

/// Errors surfaced by the lottery, grouping and session layers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DrawError {
    /// A draw was attempted against an exhausted pool.
    #[error("Everyone in the pool has already won a prize")]
    EmptyPool,

    /// The group size was outside `[2, max(2, participants)]`.
    #[error("Invalid group size {size} for {participants} participants")]
    InvalidGroupSize { size: usize, participants: usize },

    /// The requested view needs a non-empty roster.
    #[error("The {0} view needs at least one participant")]
    ViewUnavailable(View),
}

impl DrawError {
    /// Whether the front-end should show this as a notice rather than a bug.
    ///
    /// `InvalidGroupSize` is a caller contract violation and should never
    /// reach a user when the front-end clamps correctly.
    pub fn is_user_notice(&self) -> bool {
        matches!(self, Self::EmptyPool | Self::ViewUnavailable(_))
    }
}
