//! External audio player configuration.

use serde::{Deserialize, Serialize};

/// Placeholder replaced with the path of the loaded audio file
pub const FILE_PLACEHOLDER: &str = "{file}";
/// Placeholder replaced with the resume position in seconds
pub const OFFSET_PLACEHOLDER: &str = "{offset}";
/// Placeholder replaced with the gain percentage (0-100)
pub const VOLUME_PLACEHOLDER: &str = "{volume}";

/// How the playback device launches the audio player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// Player executable
    #[serde(default = "default_program")]
    pub program: String,

    /// Arguments; may contain `{file}`, `{offset}` and `{volume}`
    #[serde(default = "default_args")]
    pub args: Vec<String>,
}

fn default_program() -> String {
    "ffplay".to_string()
}

fn default_args() -> Vec<String> {
    [
        "-nodisp",
        "-autoexit",
        "-loglevel",
        "quiet",
        "-ss",
        OFFSET_PLACEHOLDER,
        "-volume",
        VOLUME_PLACEHOLDER,
        FILE_PLACEHOLDER,
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            args: default_args(),
        }
    }
}

impl PlayerConfig {
    /// Arguments with placeholders filled in
    pub fn render_args(&self, file: &str, offset_secs: f64, volume: u32) -> Vec<String> {
        let offset = format!("{offset_secs:.3}");
        let volume = volume.to_string();
        self.args
            .iter()
            .map(|arg| {
                arg.replace(FILE_PLACEHOLDER, file)
                    .replace(OFFSET_PLACEHOLDER, &offset)
                    .replace(VOLUME_PLACEHOLDER, &volume)
            })
            .collect()
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the program is empty or no argument names the
    /// audio file.
    pub fn validate(&self) -> Result<(), String> {
        if self.program.trim().is_empty() {
            return Err("player.program must not be empty".to_string());
        }
        if !self.args.iter().any(|arg| arg.contains(FILE_PLACEHOLDER)) {
            return Err(format!(
                "player.args must contain the {FILE_PLACEHOLDER} placeholder"
            ));
        }
        Ok(())
    }
}
