//! Interactive session on stdin/stdout

use std::sync::Arc;

use anyhow::Context;
use application::{
    PlaybackCoordinator, ReadingSession, SessionHandle, SessionUpdate, TextReducer, UiEvent,
};
use domain::SpeechSettings;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::debug;

use crate::repl::{HELP, ReplCommand, TextBuffer, parse_line};

/// Capacity of the event and update channels
const CHANNEL_CAPACITY: usize = 32;

/// Run the line-driven session until `:quit` or end of input
pub async fn run(
    coordinator: PlaybackCoordinator,
    reducer: Arc<dyn TextReducer>,
) -> anyhow::Result<()> {
    let SessionHandle {
        events,
        mut updates,
        task,
    } = ReadingSession::spawn(coordinator, CHANNEL_CAPACITY);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut buffer = TextBuffer::default();
    let mut input_open = true;

    println!("Type text to fill the buffer, :read to speak it, :help for commands.");

    loop {
        tokio::select! {
            line = lines.next_line(), if input_open => {
                match line.context("failed to read from stdin")? {
                    Some(line) => {
                        input_open =
                            handle_line(&line, &mut buffer, reducer.as_ref(), &events).await;
                    },
                    None => {
                        debug!("End of input");
                        input_open = false;
                        // The session may already be gone
                        let _ = events.send(UiEvent::Quit).await;
                    },
                }
            },
            update = updates.recv() => match update {
                Some(SessionUpdate::Closed) | None => break,
                Some(update) => print_update(&update),
            },
        }
    }

    task.await.context("session task failed")?;
    Ok(())
}

/// Handle one input line; returns `false` once no more input is wanted
async fn handle_line(
    line: &str,
    buffer: &mut TextBuffer,
    reducer: &dyn TextReducer,
    events: &mpsc::Sender<UiEvent>,
) -> bool {
    let command = match parse_line(line) {
        Ok(command) => command,
        Err(e) => {
            println!("{e}");
            return true;
        },
    };

    match command {
        ReplCommand::Append(text) => {
            if !text.trim().is_empty() {
                buffer.append(&text);
            }
        },
        ReplCommand::ReadBuffer => {
            if buffer.is_empty() {
                println!("Nothing to read, the buffer is empty.");
            } else {
                return send(events, UiEvent::Read(buffer.text().to_string())).await;
            }
        },
        ReplCommand::Clean(rules) => {
            buffer.clean(reducer, rules);
            println!("{}", buffer.text());
        },
        ReplCommand::Load(path) => match tokio::fs::read_to_string(&path).await {
            Ok(text) => {
                buffer.replace(text);
                println!("Loaded {} characters from {}", buffer.text().chars().count(), path.display());
            },
            Err(e) => println!("Cannot read {}: {e}", path.display()),
        },
        ReplCommand::Show => println!("{}", buffer.text()),
        ReplCommand::Clear => buffer.clear(),
        ReplCommand::Help => println!("{HELP}"),
        ReplCommand::Event(event) => {
            let quit = event == UiEvent::Quit;
            return send(events, event).await && !quit;
        },
    }
    true
}

async fn send(events: &mpsc::Sender<UiEvent>, event: UiEvent) -> bool {
    events.send(event).await.is_ok()
}

fn describe_settings(settings: &SpeechSettings) -> String {
    format!(
        "rate {}, volume {}, language {}, voice {}",
        settings.rate.value(),
        settings.volume.value(),
        settings.language,
        settings.voice
    )
}

fn print_update(update: &SessionUpdate) {
    match update {
        SessionUpdate::ToggleChanged(view) => {
            if view.enabled {
                println!("[{}]", view.label);
            } else {
                println!("[{}] (idle)", view.label);
            }
        },
        SessionUpdate::ReadStarted(request) => println!(
            "Speaking {} characters with {} ({})",
            request.chars, request.speaker, request.voice
        ),
        SessionUpdate::SpeakerChanged { speaker, settings } => {
            println!("Speaker {speaker}: {}", describe_settings(settings));
        },
        SessionUpdate::SettingsChanged(settings) => println!("{}", describe_settings(settings)),
        SessionUpdate::Failed(e) => println!("Error: {e}"),
        SessionUpdate::Closed => {},
    }
}
