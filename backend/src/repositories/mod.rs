//! Database repositories
//!
//! Provides data access layer for database operations.

pub mod exercise;
pub mod favorite;
pub mod rating;
pub mod session;
pub mod user;

pub use exercise::{ExerciseRecord, ExerciseRepository};
pub use favorite::FavoriteRepository;
pub use rating::RatingRepository;
pub use session::{
    CreateSession, CreateSessionEntry, SessionEntryRecord, SessionRecord, SessionRepository,
    UpdateSession,
};
pub use user::{UserRecord, UserRepository};
