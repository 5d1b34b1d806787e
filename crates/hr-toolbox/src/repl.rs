//! Interactive session: one command per line, tokenized shell-style.
//!
//! ```text
//! > sample
//! > view lottery
//! > draw "iPhone 16"
//! > group 4
//! > export csv teams.csv
//! ```

use std::io::Write;
use std::path::PathBuf;

use anyhow::{anyhow, bail, Result};
use draw_engine::export::{self, ExportFormat};
use draw_engine::{DrawError, GroupNamer, ImportSource, Session, View};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

use crate::commands::{present_draw, print_roster};
use crate::reveal::RevealTiming;

pub const HELP: &str = "\
commands:
  import <path>            append names from a text/CSV file
  paste <text>             append names from text (quote it)
  sample                   replace the roster with the sample list
  roster                   list participants
  dedup                    collapse duplicate names
  clear                    empty the roster
  view names|lottery|grouping
  draw [prize]             draw one winner
  reset                    put everyone back in the pool
  allow-dup on|off         let winners win again
  history                  list winners, newest first
  ai on|off                creative team names
  group [size]             build random groups
  export text|csv [path]   print or save the last groups
  save text|csv [path]     save the last groups (default grouping-results.*)
  status                   roster, pool and settings summary
  help | quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Import(PathBuf),
    Paste(String),
    Sample,
    Roster,
    Dedup,
    Clear,
    View(View),
    Draw(String),
    Reset,
    AllowDuplicate(bool),
    History,
    Ai(bool),
    Group(Option<usize>),
    Export(ExportFormat, Option<PathBuf>),
    Save(ExportFormat, PathBuf),
    Status,
    Help,
    Quit,
}

fn parse_switch(arg: Option<&str>) -> Result<bool> {
    match arg {
        Some("on") | Some("true") | Some("yes") => Ok(true),
        Some("off") | Some("false") | Some("no") => Ok(false),
        other => bail!("expected on|off, got {}", other.unwrap_or("nothing")),
    }
}

fn parse_view(arg: Option<&str>) -> Result<View> {
    match arg {
        Some("names") => Ok(View::Names),
        Some("lottery") => Ok(View::Lottery),
        Some("grouping") => Ok(View::Grouping),
        other => bail!(
            "expected names|lottery|grouping, got {}",
            other.unwrap_or("nothing")
        ),
    }
}

/// Parse one input line. Blank lines yield `None`.
pub fn parse_command(line: &str) -> Result<Option<ReplCommand>> {
    let tokens = shlex::split(line).ok_or_else(|| anyhow!("unbalanced quotes"))?;
    let Some((head, rest)) = tokens.split_first() else {
        return Ok(None);
    };
    let arg = rest.first().map(String::as_str);

    let cmd = match head.as_str() {
        "import" => ReplCommand::Import(
            arg.map(PathBuf::from)
                .ok_or_else(|| anyhow!("import needs a file path"))?,
        ),
        "paste" => {
            if rest.is_empty() {
                bail!("paste needs some names");
            }
            ReplCommand::Paste(rest.join(" "))
        }
        "sample" => ReplCommand::Sample,
        "roster" | "list" => ReplCommand::Roster,
        "dedup" => ReplCommand::Dedup,
        "clear" => ReplCommand::Clear,
        "view" => ReplCommand::View(parse_view(arg)?),
        "draw" => ReplCommand::Draw(rest.join(" ")),
        "reset" => ReplCommand::Reset,
        "allow-dup" => ReplCommand::AllowDuplicate(parse_switch(arg)?),
        "history" => ReplCommand::History,
        "ai" => ReplCommand::Ai(parse_switch(arg)?),
        "group" => ReplCommand::Group(
            arg.map(|s| s.parse::<usize>())
                .transpose()
                .map_err(|_| anyhow!("group size must be a number"))?,
        ),
        "export" => {
            let format = arg.unwrap_or("text").parse::<ExportFormat>()?;
            ReplCommand::Export(format, rest.get(1).map(PathBuf::from))
        }
        "save" => {
            let format = arg.unwrap_or("text").parse::<ExportFormat>()?;
            let path = rest
                .get(1)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(format.default_file_name()));
            ReplCommand::Save(format, path)
        }
        "status" => ReplCommand::Status,
        "help" | "?" => ReplCommand::Help,
        "quit" | "exit" => ReplCommand::Quit,
        other => bail!("unknown command '{other}' (try 'help')"),
    };
    Ok(Some(cmd))
}

/// Whether the loop keeps going after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Repl {
    session: Session,
    namer: Box<dyn GroupNamer>,
    timing: RevealTiming,
}

impl Repl {
    pub fn new(session: Session, namer: Box<dyn GroupNamer>, timing: RevealTiming) -> Self {
        Self {
            session,
            namer,
            timing,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Execute one command. Engine notices are printed, not returned as errors.
    pub async fn execute<W: Write>(&mut self, cmd: ReplCommand, out: &mut W) -> Result<Flow> {
        debug!(?cmd, view = %self.session.view(), "Executing command");

        match cmd {
            ReplCommand::Import(path) => {
                let added = self.session.import(&ImportSource::File(path))?;
                writeln!(out, "Added {added}, roster now {}", self.session.roster().len())?;
            }
            ReplCommand::Paste(text) => {
                let added = self.session.import(&ImportSource::Text(text))?;
                writeln!(out, "Added {added}, roster now {}", self.session.roster().len())?;
            }
            ReplCommand::Sample => {
                let added = self.session.import(&ImportSource::Sample)?;
                writeln!(out, "Loaded {added} sample names")?;
            }
            ReplCommand::Roster => print_roster(&self.session, false, out)?,
            ReplCommand::Dedup => {
                let removed = self.session.dedup_roster();
                writeln!(out, "Removed {removed} duplicate(s)")?;
            }
            ReplCommand::Clear => {
                self.session.clear_roster();
                writeln!(out, "Roster cleared")?;
            }
            ReplCommand::View(view) => match self.session.switch_view(view) {
                Ok(()) => writeln!(out, "Now in {view} view")?,
                Err(e) => writeln!(out, "{e}")?,
            },
            ReplCommand::Draw(prize) => {
                present_draw(&mut self.session, &prize, self.timing, out).await?;
            }
            ReplCommand::Reset => {
                self.session.reset_lottery();
                writeln!(out, "Pool restored to {}", self.session.lottery().total())?;
            }
            ReplCommand::AllowDuplicate(allow) => {
                self.session.set_allow_duplicate(allow);
                writeln!(out, "Repeat winners {}", if allow { "allowed" } else { "not allowed" })?;
            }
            ReplCommand::History => {
                if self.session.lottery().history().is_empty() {
                    writeln!(out, "No winners yet")?;
                } else {
                    writeln!(out, "{}", self.session.history_text())?;
                }
            }
            ReplCommand::Ai(enabled) => {
                self.session.set_use_ai_names(enabled);
                writeln!(out, "AI team names {}", if enabled { "on" } else { "off" })?;
            }
            ReplCommand::Group(size) => {
                if let Some(size) = size {
                    self.session.set_group_size(size);
                }
                let groups = self.session.generate_groups(self.namer.as_ref()).await?;
                writeln!(out, "{}", export::groups_to_text(&groups))?;
            }
            ReplCommand::Export(format, None) => {
                writeln!(out, "{}", self.session.export_groups(format))?
            }
            ReplCommand::Export(format, Some(path)) | ReplCommand::Save(format, path) => {
                export::write_export(&path, self.session.groups(), format)?;
                writeln!(out, "Wrote {}", path.display())?;
            }
            ReplCommand::Status => {
                let s = &self.session;
                writeln!(
                    out,
                    "view: {}  roster: {}  pool: {} / {}  repeat winners: {}  group size: {} ({} groups)  ai names: {}",
                    s.view(),
                    s.roster().len(),
                    s.lottery().remaining(),
                    s.lottery().total(),
                    s.lottery().allow_duplicate(),
                    s.effective_group_size(),
                    s.planned_groups(),
                    s.settings().use_ai_names,
                )?;
            }
            ReplCommand::Help => writeln!(out, "{HELP}")?,
            ReplCommand::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    /// Read commands from `input` until EOF or `quit`.
    pub async fn run<I, W>(&mut self, input: I, out: &mut W) -> Result<()>
    where
        I: AsyncBufRead + Unpin,
        W: Write,
    {
        let mut lines = input.lines();
        loop {
            write!(out, "> ")?;
            out.flush()?;

            let Some(line) = lines.next_line().await? else {
                break;
            };

            let cmd = match parse_command(&line) {
                Ok(Some(cmd)) => cmd,
                Ok(None) => continue,
                Err(e) => {
                    writeln!(out, "error: {e}")?;
                    continue;
                }
            };

            match self.execute(cmd, out).await {
                Ok(Flow::Quit) => break,
                Ok(Flow::Continue) => {}
                Err(e) => match e.downcast_ref::<DrawError>() {
                    Some(notice) if notice.is_user_notice() => writeln!(out, "{notice}")?,
                    _ => writeln!(out, "error: {e:#}")?,
                },
            }
        }
        Ok(())
    }
}
