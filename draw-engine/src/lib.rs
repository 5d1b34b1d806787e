//! Draw Engine
//!
//! Randomized selection and partitioning for HR events:
//! - `roster`: the canonical participant list (stable ids, duplicate detection)
//! - `import`: splitting pasted text / file content / the sample list into names
//! - `lottery`: sequential prize draws with pool depletion and win history
//! - `grouping`: uniform shuffle + fixed-size partition with team labels
//! - `naming`: team-label providers (Gemini-backed or deterministic fallback)
//! - `export`: plain-text and CSV renderings of a grouping result
//! - `session`: session-scoped controller tying the pieces together
//!
//! # Usage
//!
//! ```rust,ignore
//! use draw_engine::{FallbackNamer, GroupingEngine, LotteryEngine, Roster};
//!
//! let roster = Roster::from_names(["Ada", "Grace", "Linus", "Ken", "Barbara"]);
//!
//! let mut lottery = LotteryEngine::new(roster.participants());
//! let winner = lottery.draw("Grand Prize")?;
//!
//! let mut grouping = GroupingEngine::new();
//! let groups = grouping
//!     .generate_groups(&roster.names(), 2, &FallbackNamer)
//!     .await?;
//! ```

pub mod error;
pub mod export;
pub mod grouping;
pub mod import;
pub mod lottery;
pub mod naming;
pub mod roster;
pub mod session;

pub use error::DrawError;
pub use export::{groups_to_csv, groups_to_text, history_to_text, ExportError, ExportFormat};
pub use grouping::{clamp_group_size, planned_group_count, Group, GroupingEngine};
pub use import::{import_into, split_names, ImportError, ImportSource, SAMPLE_NAMES};
pub use lottery::{LotteryEngine, WinRecord, DEFAULT_PRIZE_LABEL};
pub use naming::{
    fallback_labels, FallbackNamer, GeminiNamer, GeminiSettings, GroupNamer, NamingError,
};
pub use roster::{Participant, ParticipantId, Roster};
pub use session::{Session, SessionSettings, View};
