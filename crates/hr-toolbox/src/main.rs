use std::io::{self, Write};

use anyhow::Result;
use clap::Parser;
use hr_toolbox::cli::{Cli, Command};
use hr_toolbox::commands::{build_namer, build_session, print_roster, run_draw, run_group};
use hr_toolbox::config::{check_endpoint, ToolboxConfig};
use hr_toolbox::repl::{Repl, HELP};
use hr_toolbox::reveal::RevealTiming;
use tokio::io::BufReader;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = ToolboxConfig::load(cli.config.as_deref())?;
    info!(
        model = %config.naming.model,
        ai_names = config.use_ai_names,
        has_key = config.has_api_key(),
        "HR toolbox starting"
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Command::Roster { json } => {
            let session = build_session(&config, &cli.roster, None)?;
            print_roster(&session, json, &mut out)?;
        }
        Command::Draw {
            count,
            prizes,
            allow_duplicate,
            no_reveal,
            seed,
            json,
        } => {
            let mut session = build_session(&config, &cli.roster, seed)?;
            let timing = if no_reveal || json {
                RevealTiming::instant()
            } else {
                config.reveal_timing()
            };
            run_draw(
                &mut session,
                count,
                &prizes,
                allow_duplicate,
                timing,
                json,
                &mut out,
            )
            .await?;
        }
        Command::Group {
            size,
            no_ai,
            format,
            output,
            seed,
            json,
        } => {
            let mut session = build_session(&config, &cli.roster, seed)?;
            let use_ai = config.use_ai_names && !no_ai;
            session.set_use_ai_names(use_ai);
            let namer = build_namer(&config, use_ai)?;
            run_group(
                &mut session,
                namer.as_ref(),
                size,
                format.into(),
                output.as_deref(),
                json,
                &mut out,
            )
            .await?;
        }
        Command::Session { seed } => {
            let session = build_session(&config, &cli.roster, seed)?;
            let key = config.naming.api_key.as_deref();
            if config.use_ai_names && config.has_api_key() && !check_endpoint(&config.naming.url, key).await {
                warn!(url = %config.naming.url, "Naming endpoint unreachable, team names may fall back to Team N");
            }
            let namer = build_namer(&config, true)?;
            writeln!(out, "{HELP}")?;
            let mut repl = Repl::new(session, namer, config.reveal_timing());
            repl.run(BufReader::new(tokio::io::stdin()), &mut out).await?;
        }
    }

    Ok(())
}
