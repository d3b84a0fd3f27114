//! Crate-wide error type

use std::fmt;
use std::io;

use crate::sim::GamePhase;

#[derive(Debug)]
pub enum Error {
    /// Reading or writing a settings/tuning/leaderboard file failed
    Io(io::Error),
    /// A settings/tuning/leaderboard file was not valid JSON
    Json(serde_json::Error),
    /// A tuning value is outside its allowed range
    InvalidTuning { field: &'static str, reason: String },
    /// A command arrived in a phase that does not accept it
    WrongPhase {
        expected: GamePhase,
        actual: GamePhase,
    },
    /// A high-score submission had a blank player name
    EmptyName,
    /// The high-score backend rejected or could not serve a request
    Store(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "i/o error: {err}"),
            Self::Json(err) => write!(f, "json error: {err}"),
            Self::InvalidTuning { field, reason } => {
                write!(f, "invalid tuning value `{field}`: {reason}")
            }
            Self::WrongPhase { expected, actual } => {
                write!(f, "wrong game phase: expected {expected:?}, got {actual:?}")
            }
            Self::EmptyName => write!(f, "player name must not be blank"),
            Self::Store(msg) => write!(f, "high-score store error: {msg}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_wrong_phase() {
        let err = Error::WrongPhase {
            expected: GamePhase::HighScoreCapture,
            actual: GamePhase::Playing,
        };
        assert_eq!(
            err.to_string(),
            "wrong game phase: expected HighScoreCapture, got Playing"
        );
    }

    #[test]
    fn test_json_error_has_source() {
        let json_err = serde_json::from_str::<u32>("nope").unwrap_err();
        let err: Error = json_err.into();
        assert!(std::error::Error::source(&err).is_some());
    }
}
