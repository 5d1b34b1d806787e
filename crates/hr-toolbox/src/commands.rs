//! Subcommand runners shared by the one-shot CLI and the interactive session.

use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use draw_engine::export::{self, ExportFormat};
use draw_engine::{
    DrawError, FallbackNamer, GeminiNamer, GroupNamer, ImportSource, Participant, Session,
};
use tracing::{info, warn};

use crate::cli::RosterArgs;
use crate::config::ToolboxConfig;
use crate::reveal::{reveal_draw, RevealTiming};

/// Create a session and load the roster described by `args`.
///
/// The sample list goes in first (it replaces), then files and inline names
/// are appended in that order.
pub fn build_session(config: &ToolboxConfig, args: &RosterArgs, seed: Option<u64>) -> Result<Session> {
    let settings = config.session_settings();
    let mut session = match seed {
        Some(seed) => Session::seeded(settings, seed),
        None => Session::new(settings),
    };

    if args.sample {
        session.import(&ImportSource::Sample)?;
    }
    for path in &args.files {
        session
            .import(&ImportSource::File(path.clone()))
            .with_context(|| format!("Failed to import names from {}", path.display()))?;
    }
    if let Some(text) = &args.names {
        session.import(&ImportSource::Text(text.clone()))?;
    }
    if args.dedup {
        let removed = session.dedup_roster();
        info!(removed, "Removed duplicate names");
    }

    Ok(session)
}

/// The Gemini namer when AI names are enabled, otherwise the offline one.
pub fn build_namer(config: &ToolboxConfig, use_ai: bool) -> Result<Box<dyn GroupNamer>> {
    if !use_ai {
        return Ok(Box::new(FallbackNamer));
    }
    if !config.has_api_key() {
        warn!("No GEMINI_API_KEY/API_KEY set, team names will use the Team N fallback");
    }
    let namer = GeminiNamer::new(config.gemini_settings())
        .context("Failed to build HTTP client for team naming")?;
    Ok(Box::new(namer))
}

pub fn print_roster<W: Write>(session: &Session, json: bool, out: &mut W) -> Result<()> {
    let roster = session.roster();
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(roster.participants())?)?;
        return Ok(());
    }

    writeln!(out, "Roster ({})", roster.len())?;
    for (i, p) in roster.participants().iter().enumerate() {
        let marker = if roster.is_duplicate(&p.name) {
            "  [duplicate]"
        } else {
            ""
        };
        writeln!(out, "{:>3}. {}{}", i + 1, p.name, marker)?;
    }

    let duplicates = roster.duplicate_names();
    if !duplicates.is_empty() {
        writeln!(
            out,
            "{} duplicated name(s): {} (use --dedup to collapse)",
            duplicates.len(),
            duplicates.join(", ")
        )?;
    }
    Ok(())
}

/// Run one draw with the reveal, echoing candidates and the result to `out`.
///
/// Returns `Ok(None)` when the pool is exhausted; that is a notice, not a failure.
pub async fn present_draw<W: Write>(
    session: &mut Session,
    prize_label: &str,
    timing: RevealTiming,
    out: &mut W,
) -> Result<Option<Participant>> {
    let mut tick_error: Option<io::Error> = None;
    let result = reveal_draw(session.lottery_mut(), prize_label, timing, |name| {
        if tick_error.is_none() {
            if let Err(e) = write!(out, "\r  {name:<24}").and_then(|()| out.flush()) {
                tick_error = Some(e);
            }
        }
    })
    .await;

    // The draw is committed even when the ticker output failed.
    if let Some(e) = tick_error {
        return Err(anyhow::Error::new(e).context("Failed to write reveal output"));
    }

    if !timing.is_instant() {
        write!(out, "\r{:<26}\r", "")?;
    }

    match result {
        Ok(winner) => {
            let lottery = session.lottery();
            let prize = lottery
                .history()
                .first()
                .map(|r| r.prize_label.as_str())
                .unwrap_or_default();
            writeln!(
                out,
                "{prize}: {}  ({} / {} left)",
                winner.name,
                lottery.remaining(),
                lottery.total()
            )?;
            Ok(Some(winner))
        }
        Err(DrawError::EmptyPool) => {
            writeln!(out, "{}", DrawError::EmptyPool)?;
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn run_draw<W: Write>(
    session: &mut Session,
    count: usize,
    prizes: &[String],
    allow_duplicate: bool,
    timing: RevealTiming,
    json: bool,
    out: &mut W,
) -> Result<()> {
    session.set_allow_duplicate(allow_duplicate);

    for i in 0..count {
        let prize = prizes.get(i).map(String::as_str).unwrap_or("");
        if present_draw(session, prize, timing, out).await?.is_none() {
            break;
        }
    }

    if json {
        writeln!(
            out,
            "{}",
            serde_json::to_string_pretty(session.lottery().history())?
        )?;
    }
    Ok(())
}

pub async fn run_group<W: Write>(
    session: &mut Session,
    namer: &dyn GroupNamer,
    size: Option<usize>,
    format: ExportFormat,
    output: Option<&Path>,
    json: bool,
    out: &mut W,
) -> Result<()> {
    if let Some(size) = size {
        session.set_group_size(size);
    }
    let groups = session.generate_groups(namer).await?;

    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&groups)?)?;
    } else if let Some(path) = output {
        export::write_export(path, &groups, format)?;
        writeln!(out, "Wrote {} group(s) to {}", groups.len(), path.display())?;
    } else {
        writeln!(out, "{}", export::render(&groups, format))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use draw_engine::SAMPLE_NAMES;

    fn args(names: &str) -> RosterArgs {
        RosterArgs {
            names: Some(names.into()),
            ..Default::default()
        }
    }

    fn output(buf: Vec<u8>) -> String {
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn sample_then_inline_names_append() {
        let args = RosterArgs {
            sample: true,
            names: Some("Ada".into()),
            ..Default::default()
        };
        let session = build_session(&ToolboxConfig::default(), &args, Some(1)).unwrap();
        assert_eq!(session.roster().len(), SAMPLE_NAMES.len() + 1);
    }

    #[test]
    fn missing_file_names_the_path() {
        let args = RosterArgs {
            files: vec!["/no/such/names.txt".into()],
            ..Default::default()
        };
        let err = build_session(&ToolboxConfig::default(), &args, None).err().expect("expected an error");
        assert!(format!("{err:#}").contains("/no/such/names.txt"));
    }

    #[test]
    fn roster_marks_duplicates() {
        let session = build_session(&ToolboxConfig::default(), &args("Sam, Sam, Jo"), None).unwrap();
        let mut buf = Vec::new();
        print_roster(&session, false, &mut buf).unwrap();
        let text = output(buf);
        assert!(text.contains("Roster (3)"));
        assert_eq!(text.matches("[duplicate]").count(), 2);
        assert!(text.contains("1 duplicated name(s): Sam"));
    }

    #[test]
    fn dedup_flag_collapses_names() {
        let args = RosterArgs {
            dedup: true,
            ..args("Sam, Sam, Jo")
        };
        let session = build_session(&ToolboxConfig::default(), &args, None).unwrap();
        assert_eq!(session.roster().names(), vec!["Sam", "Jo"]);
    }

    #[tokio::test]
    async fn draws_stop_at_exhaustion() {
        let mut session =
            build_session(&ToolboxConfig::default(), &args("Ada, Ken"), Some(4)).unwrap();
        let mut buf = Vec::new();
        run_draw(
            &mut session,
            5,
            &["Laptop".to_string()],
            false,
            RevealTiming::instant(),
            false,
            &mut buf,
        )
        .await
        .unwrap();

        let text = output(buf);
        assert!(text.contains("Laptop: "));
        assert!(text.contains("Mystery Prize: "));
        assert!(text.contains("(0 / 2 left)"));
        assert!(text.contains("Everyone in the pool has already won a prize"));
        assert_eq!(session.lottery().history().len(), 2);
    }

    #[tokio::test]
    async fn group_writes_csv_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("groups.csv");
        let mut session =
            build_session(&ToolboxConfig::default(), &args("A;B;C;D;E"), Some(2)).unwrap();
        let mut buf = Vec::new();

        run_group(
            &mut session,
            &FallbackNamer,
            Some(2),
            ExportFormat::Csv,
            Some(&path),
            false,
            &mut buf,
        )
        .await
        .unwrap();

        assert!(output(buf).contains("Wrote 3 group(s)"));
        let csv = std::fs::read_to_string(&path).unwrap();
        assert_eq!(csv.lines().count(), 4);
    }

    #[tokio::test]
    async fn group_json_lists_every_member() {
        let mut session =
            build_session(&ToolboxConfig::default(), &args("A;B;C"), Some(2)).unwrap();
        let mut buf = Vec::new();
        run_group(
            &mut session,
            &FallbackNamer,
            None,
            ExportFormat::Text,
            None,
            true,
            &mut buf,
        )
        .await
        .unwrap();

        let groups: Vec<draw_engine::Group> = serde_json::from_slice(&buf).unwrap();
        let total: usize = groups.iter().map(|g| g.members.len()).sum();
        assert_eq!(total, 3);
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn reveal_write_failure_is_reported() {
        let mut session =
            build_session(&ToolboxConfig::default(), &args("Ada, Ken"), Some(5)).unwrap();
        let err = present_draw(&mut session, "Mug", RevealTiming::default(), &mut BrokenPipe)
            .await
            .unwrap_err();

        assert!(format!("{err:#}").contains("Failed to write reveal output"));
        assert_eq!(session.lottery().history().len(), 1);
    }

    #[test]
    fn namer_selection() {
        let config = ToolboxConfig::default();
        assert_eq!(build_namer(&config, false).unwrap().provider(), "fallback");
        assert_eq!(build_namer(&config, true).unwrap().provider(), "gemini");
    }
}
