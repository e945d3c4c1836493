//! Line commands for the interactive session
//!
//! Lines starting with `:` are commands; anything else is text appended to
//! the buffer.

use std::path::PathBuf;
use std::str::FromStr;

use application::{RuleSet, TextReducer, UiEvent};
use domain::SpeakerId;
use thiserror::Error;

/// Errors from parsing a line command
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReplError {
    /// The command name is not known
    #[error("Unknown command ':{0}' (try :help)")]
    UnknownCommand(String),

    /// A required argument is missing
    #[error("':{0}' needs an argument")]
    MissingArgument(&'static str),

    /// An argument could not be parsed
    #[error("Invalid argument for ':{command}': {message}")]
    InvalidArgument {
        /// The command
        command: &'static str,
        /// What was wrong
        message: String,
    },
}

/// One parsed input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    /// Forward to the reading session
    Event(UiEvent),
    /// Speak the buffer
    ReadBuffer,
    /// Clean the buffer with a rule set
    Clean(RuleSet),
    /// Replace the buffer with a file's content
    Load(PathBuf),
    /// Print the buffer
    Show,
    /// Empty the buffer
    Clear,
    /// Print the command list
    Help,
    /// Add a line of text to the buffer
    Append(String),
}

/// Command list shown by `:help`
pub const HELP: &str = "\
:read                 speak the buffer
:stop                 stop playback
:toggle               pause or resume
:speaker NAME         switch speaker (cloud, local)
:rate N               speaking rate 1-5
:volume N             volume 0-100
:voice NAME           voice for the current language
:language CODE        language, selects its first voice
:reduce :wiki :cite   clean the buffer
:load PATH            replace the buffer with a file
:show :clear          print or empty the buffer
:quit                 leave
anything else         appended to the buffer";

/// Parse one input line
pub fn parse_line(line: &str) -> Result<ReplCommand, ReplError> {
    let Some(command) = line.trim_start().strip_prefix(':') else {
        return Ok(ReplCommand::Append(line.to_string()));
    };

    let (name, arg) = match command.trim().split_once(char::is_whitespace) {
        Some((name, arg)) => (name, Some(arg.trim()).filter(|a| !a.is_empty())),
        None => (command.trim(), None),
    };

    let parsed = match name {
        "read" => ReplCommand::ReadBuffer,
        "stop" => ReplCommand::Event(UiEvent::Stop),
        "toggle" => ReplCommand::Event(UiEvent::Toggle),
        "quit" | "q" => ReplCommand::Event(UiEvent::Quit),
        "speaker" => {
            let arg = arg.ok_or(ReplError::MissingArgument("speaker"))?;
            ReplCommand::Event(UiEvent::ChangeSpeaker(parse_arg("speaker", arg)?))
        },
        "rate" => {
            let arg = arg.ok_or(ReplError::MissingArgument("rate"))?;
            ReplCommand::Event(UiEvent::ChangeRate(parse_arg("rate", arg)?))
        },
        "volume" => {
            let arg = arg.ok_or(ReplError::MissingArgument("volume"))?;
            ReplCommand::Event(UiEvent::ChangeVolume(parse_arg("volume", arg)?))
        },
        "voice" => {
            let arg = arg.ok_or(ReplError::MissingArgument("voice"))?;
            ReplCommand::Event(UiEvent::ChangeVoice(arg.to_string()))
        },
        "language" | "lang" => {
            let arg = arg.ok_or(ReplError::MissingArgument("language"))?;
            ReplCommand::Event(UiEvent::ChangeLanguage(arg.to_string()))
        },
        "reduce" => ReplCommand::Clean(RuleSet::Reduce),
        "wiki" => ReplCommand::Clean(RuleSet::Wiki),
        "cite" => ReplCommand::Clean(RuleSet::Cite),
        "load" => {
            let arg = arg.ok_or(ReplError::MissingArgument("load"))?;
            ReplCommand::Load(PathBuf::from(arg))
        },
        "show" => ReplCommand::Show,
        "clear" => ReplCommand::Clear,
        "help" | "h" => ReplCommand::Help,
        other => return Err(ReplError::UnknownCommand(other.to_string())),
    };
    Ok(parsed)
}

fn parse_arg<T>(command: &'static str, arg: &str) -> Result<T, ReplError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    arg.parse().map_err(|e: T::Err| ReplError::InvalidArgument {
        command,
        message: e.to_string(),
    })
}

/// Text waiting to be read
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TextBuffer {
    text: String,
}

impl TextBuffer {
    /// Add a line
    pub fn append(&mut self, line: &str) {
        if !self.text.is_empty() {
            self.text.push('\n');
        }
        self.text.push_str(line);
    }

    /// Replace the content
    pub fn replace(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Empty the buffer
    pub fn clear(&mut self) {
        self.text.clear();
    }

    /// Run the buffer through a rule set
    pub fn clean(&mut self, reducer: &dyn TextReducer, rules: RuleSet) {
        self.text = reducer.reduce(&self.text, rules);
    }

    /// Current content
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether nothing has been entered
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_lines_are_appended() {
        assert_eq!(
            parse_line("Hello there").unwrap(),
            ReplCommand::Append("Hello there".to_string())
        );
    }

    #[test]
    fn playback_commands_map_to_events() {
        assert_eq!(parse_line(":stop").unwrap(), ReplCommand::Event(UiEvent::Stop));
        assert_eq!(parse_line(":toggle").unwrap(), ReplCommand::Event(UiEvent::Toggle));
        assert_eq!(parse_line(" :quit ").unwrap(), ReplCommand::Event(UiEvent::Quit));
        assert_eq!(parse_line(":read").unwrap(), ReplCommand::ReadBuffer);
    }

    #[test]
    fn setting_commands_parse_arguments() {
        assert_eq!(
            parse_line(":speaker cloud").unwrap(),
            ReplCommand::Event(UiEvent::ChangeSpeaker(SpeakerId::Cloud))
        );
        assert_eq!(
            parse_line(":rate 4").unwrap(),
            ReplCommand::Event(UiEvent::ChangeRate(4))
        );
        assert_eq!(
            parse_line(":volume  80").unwrap(),
            ReplCommand::Event(UiEvent::ChangeVolume(80))
        );
        assert_eq!(
            parse_line(":voice en-gb").unwrap(),
            ReplCommand::Event(UiEvent::ChangeVoice("en-gb".to_string()))
        );
        assert_eq!(
            parse_line(":language de").unwrap(),
            ReplCommand::Event(UiEvent::ChangeLanguage("de".to_string()))
        );
    }

    #[test]
    fn buffer_commands_parse() {
        assert_eq!(parse_line(":wiki").unwrap(), ReplCommand::Clean(RuleSet::Wiki));
        assert_eq!(parse_line(":cite").unwrap(), ReplCommand::Clean(RuleSet::Cite));
        assert_eq!(parse_line(":reduce").unwrap(), ReplCommand::Clean(RuleSet::Reduce));
        assert_eq!(
            parse_line(":load notes/chapter 1.txt").unwrap(),
            ReplCommand::Load(PathBuf::from("notes/chapter 1.txt"))
        );
        assert_eq!(parse_line(":show").unwrap(), ReplCommand::Show);
        assert_eq!(parse_line(":clear").unwrap(), ReplCommand::Clear);
    }

    #[test]
    fn missing_and_invalid_arguments_are_reported() {
        assert_eq!(
            parse_line(":rate").unwrap_err(),
            ReplError::MissingArgument("rate")
        );
        assert!(matches!(
            parse_line(":rate fast"),
            Err(ReplError::InvalidArgument { command: "rate", .. })
        ));
        assert!(matches!(
            parse_line(":speaker festival"),
            Err(ReplError::InvalidArgument { command: "speaker", .. })
        ));
    }

    #[test]
    fn unknown_command_is_rejected() {
        assert_eq!(
            parse_line(":play").unwrap_err(),
            ReplError::UnknownCommand("play".to_string())
        );
    }

    #[test]
    fn buffer_joins_lines() {
        let mut buffer = TextBuffer::default();
        assert!(buffer.is_empty());
        buffer.append("one");
        buffer.append("two");
        assert_eq!(buffer.text(), "one\ntwo");
        buffer.clear();
        assert!(buffer.is_empty());
    }
}
