use std::{fs, path::Path};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::audio::synth::SynthConfig;
use crate::chart::PitchRange;
use crate::gameplay::judge::JudgeWindows;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid config json: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Every tunable of a session. Missing sections and fields in a config file
/// keep their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub session: SessionConfig,
    pub judge: JudgeWindows,
    pub playfield: PlayfieldConfig,
    pub synth: SynthConfig,
}

impl GameConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&json)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Silence before the first note.
    pub lead_in_seconds: f64,
    pub session_length_seconds: f64,
    pub pitch_range: Option<PitchRange>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            lead_in_seconds: 2.0,
            session_length_seconds: 30.0,
            pitch_range: None,
        }
    }
}

/// Screen geometry of the note highway. Y grows downwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayfieldConfig {
    pub hit_line_y: f32,
    /// Pixels per second.
    pub note_speed: f32,
    pub screen_height: f32,
    pub offscreen_margin: f32,
}

impl Default for PlayfieldConfig {
    fn default() -> Self {
        Self {
            hit_line_y: 500.0,
            note_speed: 200.0,
            screen_height: 600.0,
            offscreen_margin: 50.0,
        }
    }
}

impl PlayfieldConfig {
    /// Position of a note's head: on the hit line at its start time, above it
    /// before, below it after.
    pub fn screen_y(&self, start_time: f64, now: f64) -> f32 {
        self.hit_line_y - (start_time - now) as f32 * self.note_speed
    }

    pub fn tail_length(&self, duration: f64) -> f32 {
        duration as f32 * self.note_speed
    }

    pub fn visible_bottom(&self) -> f32 {
        self.screen_height + self.offscreen_margin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = GameConfig::from_json_str(
            r#"{ "session": { "session_length_seconds": 12.5 }, "judge": { "perfect": 0.03 } }"#,
        )
        .unwrap();

        assert_eq!(config.session.session_length_seconds, 12.5);
        assert_eq!(config.session.lead_in_seconds, 2.0);
        assert_eq!(config.judge.perfect, 0.03);
        assert_eq!(config.judge.good, 0.10);
        assert_eq!(config.playfield, PlayfieldConfig::default());
    }

    #[test]
    fn pitch_range_from_json() {
        let config =
            GameConfig::from_json_str(r#"{ "session": { "pitch_range": { "low": 40, "high": 84 } } }"#)
                .unwrap();
        assert_eq!(config.session.pitch_range, Some(PitchRange::GUITAR));
    }

    #[test]
    fn invalid_json_is_parse_error() {
        let err = GameConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn screen_y_is_linear_in_time() {
        let playfield = PlayfieldConfig::default();
        assert_eq!(playfield.screen_y(5.0, 5.0), 500.0);
        assert_eq!(playfield.screen_y(5.0, 4.0), 300.0);
        assert_eq!(playfield.screen_y(5.0, 5.5), 600.0);
    }
}
