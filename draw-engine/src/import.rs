//! Name import: file content, pasted text, or the built-in sample list.
//!
//! Text is split on newlines, commas and semicolons; entries are trimmed and
//! blank ones discarded. Pasted text and files append to the roster, the
//! sample list replaces it.

use std::path::PathBuf;
use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;
use tracing::info;

use crate::roster::Roster;

/// Errors from reading an import source.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Sample roster for demos and dry runs.
pub const SAMPLE_NAMES: [&str; 20] = [
    "陳小明", "林美玲", "王大為", "張淑芬", "李建國", "吳志強", "劉秀英", "蔡嘉豪", "楊雅婷",
    "許哲瑋", "鄭家齊", "謝宜君", "黃柏翰", "郭芯妤", "曾冠宇", "彭思嘉", "詹子晴", "徐俊宏",
    "羅宇軒", "宋曉薇",
];

/// Where a batch of names comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportSource {
    /// Text pasted by the user.
    Text(String),
    /// A `.txt` / `.csv` file on disk.
    File(PathBuf),
    /// The built-in sample list.
    Sample,
}

impl ImportSource {
    /// Whether importing this source replaces the roster instead of appending.
    pub fn replaces_roster(&self) -> bool {
        matches!(self, Self::Sample)
    }

    /// Resolve the source into a list of names.
    pub fn read_names(&self) -> Result<Vec<String>, ImportError> {
        match self {
            Self::Text(text) => Ok(split_names(text)),
            Self::File(path) => {
                let content = std::fs::read_to_string(path).map_err(|source| ImportError::Read {
                    path: path.clone(),
                    source,
                })?;
                Ok(split_names(strip_bom(&content)))
            }
            Self::Sample => Ok(SAMPLE_NAMES.iter().map(|s| s.to_string()).collect()),
        }
    }
}

fn delimiters() -> &'static Regex {
    static DELIMITERS: OnceLock<Regex> = OnceLock::new();
    DELIMITERS.get_or_init(|| Regex::new(r"[\r\n,;]+").expect("delimiter pattern is valid"))
}

fn strip_bom(content: &str) -> &str {
    content.strip_prefix('\u{feff}').unwrap_or(content)
}

/// Split free text into trimmed, non-blank names.
pub fn split_names(text: &str) -> Vec<String> {
    delimiters()
        .split(text)
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(String::from)
        .collect()
}

/// Read `source` and merge it into `roster`. Returns the number of names added.
pub fn import_into(roster: &mut Roster, source: &ImportSource) -> Result<usize, ImportError> {
    let names = source.read_names()?;
    let added = if source.replaces_roster() {
        roster.replace_names(&names)
    } else {
        roster.append_names(&names)
    };
    info!(
        added,
        total = roster.len(),
        duplicates = roster.duplicate_names().len(),
        "Imported names"
    );
    Ok(added)
}
