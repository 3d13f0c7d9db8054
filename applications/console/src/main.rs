/// Encore - headless audio player console
use clap::Parser;
use encore_console::{Command, ConsoleConfig, Flow, Session};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "encore")]
#[command(about = "Encore audio player console", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "ENCORE_CONFIG")]
    config: Option<PathBuf>,

    /// State file (overrides the configured one)
    #[arg(short, long)]
    state_file: Option<PathBuf>,

    /// Do not read or write the state file
    #[arg(long)]
    no_persist: bool,
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "encore=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = ConsoleConfig::load(cli.config.as_deref())?;
    if let Some(state_file) = cli.state_file {
        config.storage.state_file = state_file;
    }
    if cli.no_persist {
        config.player.persist = false;
    }

    tracing::info!("Starting Encore console");
    tracing::info!("State file: {}", config.storage.state_file.display());

    let mut session = Session::open(&config)?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    for line in session.restore() {
        writeln!(out, "{}", line)?;
    }
    writeln!(out, "Type 'help' for commands")?;

    for line in std::io::stdin().lock().lines() {
        let line = line?;
        let command = match Command::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                writeln!(out, "{}", e)?;
                continue;
            }
        };

        let (flow, lines) = session.execute(command);
        for line in lines {
            writeln!(out, "{}", line)?;
        }
        out.flush()?;

        if flow == Flow::Quit {
            break;
        }
    }

    tracing::info!("Console closed");
    Ok(())
}
