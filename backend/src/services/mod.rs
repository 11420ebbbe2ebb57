//! Business logic services
//!
//! Services encapsulate business logic and coordinate between
//! repositories and the shared domain core.

pub mod exercise;
pub mod favorite;
pub mod rating;
pub mod session;
pub mod user;

pub use exercise::ExerciseService;
pub use favorite::FavoriteService;
pub use rating::RatingService;
pub use session::SessionService;
pub use user::UserService;
