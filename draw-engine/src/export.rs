//! Text and CSV renderings of grouping results and draw history.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use chrono::Local;
use thiserror::Error;
use tracing::info;

use crate::grouping::Group;
use crate::lottery::WinRecord;

/// Byte-order mark prepended to CSV output so spreadsheets detect UTF-8.
pub const UTF8_BOM: &str = "\u{feff}";
pub const CSV_HEADER: &str = "group_name,members";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Unknown export format '{0}' (expected 'text' or 'csv')")]
    UnknownFormat(String),

    #[error("Failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Text,
    Csv,
}

impl ExportFormat {
    /// File name used when the caller does not pick one.
    pub fn default_file_name(self) -> &'static str {
        match self {
            Self::Text => "grouping-results.txt",
            Self::Csv => "grouping-results.csv",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Csv => write!(f, "csv"),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(Self::Text),
            "csv" => Ok(Self::Csv),
            other => Err(ExportError::UnknownFormat(other.to_string())),
        }
    }
}

/// `label:\nmember, member` blocks separated by a blank line.
pub fn groups_to_text(groups: &[Group]) -> String {
    groups
        .iter()
        .map(|g| format!("{}:\n{}", g.label, g.members.join(", ")))
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

fn csv_label(label: &str) -> String {
    if label.contains(&[',', '"', '\n', '\r'][..]) {
        quote(label)
    } else {
        label.to_string()
    }
}

/// BOM-prefixed CSV with one row per group; the member list is always quoted.
pub fn groups_to_csv(groups: &[Group]) -> String {
    let mut out = String::from(UTF8_BOM);
    out.push_str(CSV_HEADER);
    out.push('\n');
    for g in groups {
        out.push_str(&csv_label(&g.label));
        out.push(',');
        out.push_str(&quote(&g.members.join(", ")));
        out.push('\n');
    }
    out
}

pub fn render(groups: &[Group], format: ExportFormat) -> String {
    match format {
        ExportFormat::Text => groups_to_text(groups),
        ExportFormat::Csv => groups_to_csv(groups),
    }
}

/// Render `groups` and write them to `path`.
pub fn write_export(path: &Path, groups: &[Group], format: ExportFormat) -> Result<(), ExportError> {
    std::fs::write(path, render(groups, format)).map_err(|source| ExportError::Write {
        path: path.display().to_string(),
        source,
    })?;
    info!(path = %path.display(), %format, groups = groups.len(), "Exported groups");
    Ok(())
}

/// One line per win, newest first, with local wall-clock time.
pub fn history_to_text(history: &[WinRecord]) -> String {
    history
        .iter()
        .map(|r| {
            format!(
                "{}  {}  -  {}",
                r.drawn_at.with_timezone(&Local).format("%H:%M"),
                r.winner_name,
                r.prize_label
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::ParticipantId;
    use chrono::Utc;

    fn group(label: &str, members: &[&str]) -> Group {
        Group {
            id: "group-0".into(),
            label: label.into(),
            members: members.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn text_blocks_are_blank_line_separated() {
        let groups = vec![group("Rockets", &["Ada", "Ken"]), group("Team 2", &["Bo"])];
        assert_eq!(groups_to_text(&groups), "Rockets:\nAda, Ken\n\nTeam 2:\nBo");
    }

    #[test]
    fn csv_has_bom_header_and_quoted_members() {
        let groups = vec![group("Rockets", &["Ada", "Ken"]), group("Team 2", &["Bo"])];
        assert_eq!(
            groups_to_csv(&groups),
            "\u{feff}group_name,members\nRockets,\"Ada, Ken\"\nTeam 2,\"Bo\"\n"
        );
    }

    #[test]
    fn csv_escapes_awkward_labels_and_members() {
        let groups = vec![group("Fast, Furious", &["Dwayne \"Rock\" J"])];
        let csv = groups_to_csv(&groups);
        assert!(csv.ends_with("\"Fast, Furious\",\"Dwayne \"\"Rock\"\" J\"\n"));
    }

    #[test]
    fn empty_result_exports_header_only() {
        assert_eq!(groups_to_csv(&[]), "\u{feff}group_name,members\n");
        assert_eq!(groups_to_text(&[]), "");
    }

    #[test]
    fn format_parsing() {
        assert_eq!("CSV".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!("txt".parse::<ExportFormat>().unwrap(), ExportFormat::Text);
        assert!("xlsx".parse::<ExportFormat>().is_err());
        assert_eq!(ExportFormat::Csv.default_file_name(), "grouping-results.csv");
    }

    #[test]
    fn write_export_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        write_export(&path, &[group("A", &["x"])], ExportFormat::Csv).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with(UTF8_BOM));
    }

    #[test]
    fn write_export_reports_bad_path() {
        let err = write_export(
            Path::new("/no/such/dir/out.txt"),
            &[],
            ExportFormat::Text,
        )
        .unwrap_err();
        assert!(matches!(err, ExportError::Write { .. }));
    }

    #[test]
    fn history_lines_follow_history_order() {
        let record = |name: &str, prize: &str| WinRecord {
            participant_id: ParticipantId::new(),
            winner_name: name.into(),
            drawn_at: Utc::now(),
            prize_label: prize.into(),
        };
        let text = history_to_text(&[record("Ken", "Laptop"), record("Ada", "Mug")]);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("Ken  -  Laptop"));
        assert!(lines[1].ends_with("Ada  -  Mug"));
    }
}
