//! Narrator CLI
//!
//! Reads text aloud through the cloud or the local speaker.

#![allow(clippy::print_stdout)]

mod repl;
mod session;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use ai_speech::PlaybackDevice;
use anyhow::{Context, bail};
use application::{PlaybackCoordinator, RuleSet, SpeakerConfigPort, TextReducer};
use clap::{Parser, Subcommand};
use domain::{PlayerState, ReportedState, SpeakerId};
use infrastructure::{
    AppConfig, LogFormat, ProcessPlaybackDevice, RegexTextParser, TelemetryConfig, init_tracing,
};
use tokio::io::AsyncReadExt;
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};

/// Narrator CLI
#[derive(Debug, Parser)]
#[command(name = "narrator")]
#[command(author, version, about = "Read text aloud with a cloud or local speaker", long_about = None)]
struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Log line format (text or json)
    #[arg(long, default_value = "text")]
    log_format: LogFormat,

    /// Configuration file (default: ./narrator.toml if present)
    #[arg(short, long, env = "NARRATOR_CONFIG_FILE")]
    config: Option<PathBuf>,

    /// Speaker to start with, overriding the configuration
    #[arg(short, long)]
    speaker: Option<SpeakerId>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Speak a file and wait until playback finishes
    ///
    /// Reads stdin when FILE is missing or "-".
    /// Example: narrator speak chapter1.txt
    Speak {
        /// Text file
        file: Option<PathBuf>,
    },

    /// Interactive session driven by line commands
    Session,

    /// List languages and voices per speaker
    Voices,

    /// Clean text with a rule set and print it
    ///
    /// Example: narrator clean --rules wiki article.txt
    Clean {
        /// Rule set: reduce, wiki or cite
        #[arg(short, long, default_value = "reduce")]
        rules: RuleSet,

        /// Text file (stdin when missing or "-")
        file: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(&TelemetryConfig::from_verbosity(cli.verbose, cli.log_format))?;

    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(speaker) = cli.speaker {
        config.speaker = speaker;
    }

    match cli.command {
        Commands::Speak { file } => {
            let text = read_input(file.as_deref()).await?;
            let (coordinator, _) = build_coordinator(&config)?;
            speak(coordinator, &text).await?;
        },
        Commands::Session => {
            let (coordinator, reducer) = build_coordinator(&config)?;
            session::run(coordinator, reducer).await?;
        },
        Commands::Voices => print_voices(&config)?,
        Commands::Clean { rules, file } => {
            let text = read_input(file.as_deref()).await?;
            let reducer = RegexTextParser::load(config.rules_path.as_deref())?;
            println!("{}", reducer.reduce(&text, rules));
        },
    }

    Ok(())
}

/// Wire the playback device, text rules and speakers from configuration
fn build_coordinator(
    config: &AppConfig,
) -> anyhow::Result<(PlaybackCoordinator, Arc<dyn TextReducer>)> {
    let device: Arc<dyn PlaybackDevice> = ProcessPlaybackDevice::shared(config.player.clone())?;
    let reducer: Arc<dyn TextReducer> =
        Arc::new(RegexTextParser::load(config.rules_path.as_deref())?);

    let coordinator = PlaybackCoordinator::new(
        config.speaker_registry(),
        device,
        Arc::new(config.clone()),
        config.speaker_options(),
    )?
    .with_reducer(Arc::clone(&reducer))
    .with_synthesis_timeout(config.synthesis_timeout());

    Ok((coordinator, reducer))
}

/// Read a file, or stdin for `None` and `-`
async fn read_input(file: Option<&Path>) -> anyhow::Result<String> {
    match file {
        Some(path) if path != Path::new("-") => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read {}", path.display())),
        _ => {
            let mut text = String::new();
            tokio::io::stdin()
                .read_to_string(&mut text)
                .await
                .context("failed to read stdin")?;
            Ok(text)
        },
    }
}

async fn speak(mut coordinator: PlaybackCoordinator, text: &str) -> anyhow::Result<()> {
    if text.trim().is_empty() {
        bail!("nothing to speak, the input is empty");
    }

    let mut notifications = coordinator.subscribe();
    let request = coordinator.read(text).await?;
    info!(
        request_id = %request.id,
        speaker = %request.speaker,
        chars = request.chars,
        "Speaking"
    );

    let stopped = ReportedState::from(PlayerState::Stopped);
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                coordinator.stop();
                break;
            },
            received = notifications.recv() => match received {
                Ok(state) if state == stopped => break,
                Ok(_) => {},
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Missed player notifications");
                    if coordinator.player_state() == PlayerState::Stopped {
                        break;
                    }
                },
                Err(RecvError::Closed) => break,
            },
        }
    }

    coordinator.shutdown();
    Ok(())
}

fn print_voices(config: &AppConfig) -> anyhow::Result<()> {
    for speaker in SpeakerId::all() {
        let defaults = config.load_config(speaker)?;
        let marker = if speaker == config.speaker { " (default)" } else { "" };
        println!("{speaker}{marker}");
        for language in defaults.voices.languages() {
            let voices = defaults.voices.voices(language)?;
            let star = if language == defaults.language { "*" } else { " " };
            println!("  {star}{language}: {}", voices.join(", "));
        }
    }
    Ok(())
}
