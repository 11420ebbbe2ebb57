//! FlowFit Shared Library
//!
//! This crate contains the domain core shared across the backend and any
//! client-side code: the session data model, the session composer, the
//! playback engine, input validation and the API types.
//!
//! Everything here is pure and synchronous: no I/O, no clocks, no
//! persistence. The backend drives the composer when sessions are created
//! or updated; the client drives the playback engine with a one-second
//! timer callback.

pub mod composer;
pub mod errors;
pub mod models;
pub mod playback;
pub mod types;
pub mod validation;

// Re-export commonly used items
pub use composer::{compute_total_duration, MoveDirection};
pub use errors::{ComposerError, PlaybackError};
pub use models::{
    Category, Difficulty, Exercise, SessionDraft, SessionExerciseEntry, User, ValidSession,
    ALLOWED_REST_TIMES_SECS, DEFAULT_EXERCISE_DURATION_SECS,
};
pub use playback::{
    ExitDecision, Phase, PlaybackConfig, PlaybackEngine, PlaybackEntry, PlaybackSnapshot,
    COUNTDOWN_SECS,
};
