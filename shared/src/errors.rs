//! Error types for the FlowFit domain core

use thiserror::Error;
use uuid::Uuid;

/// Errors from session composition and submission validation.
///
/// All variants are caller-recoverable: the caller re-prompts the user and
/// resubmits. `IndexOutOfRange` is the exception: it indicates a caller bug
/// (the UI allowed an invalid index), not bad user input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ComposerError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("A session must contain at least one exercise")]
    EmptyExerciseList,

    #[error("Invalid rest time: {0}s (allowed: 5, 10, 15 or 20)")]
    InvalidRestTime(u32),

    #[error("Exercise {0} is already in the session")]
    DuplicateExercise(Uuid),

    #[error("Entry index {index} out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },
}

impl ComposerError {
    /// The form field this error relates to, if any
    pub fn field(&self) -> Option<&'static str> {
        match self {
            ComposerError::MissingField(field) => Some(field),
            ComposerError::InvalidRestTime(_) => Some("rest_time_secs"),
            ComposerError::EmptyExerciseList => Some("entries"),
            _ => None,
        }
    }
}

/// Errors from playback engine construction.
///
/// Construction is the only fallible operation: once built, every tick
/// transition is a total function over the engine's state space.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlaybackError {
    #[error("Cannot start playback with no exercises")]
    EmptyPlaybackList,
}
