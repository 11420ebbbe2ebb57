//! Data models for the FlowFit application

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Default duration assigned to an exercise when it is added to a draft
pub const DEFAULT_EXERCISE_DURATION_SECS: u32 = 30;

/// Rest time between exercises must be one of these values (seconds)
pub const ALLOWED_REST_TIMES_SECS: &[u32] = &[5, 10, 15, 20];

/// Session and exercise category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Musculation,
    Yoga,
    Mobilite,
    Mixte,
}

impl Category {
    /// Canonical storage/wire token (matches the serde representation)
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Musculation => "musculation",
            Category::Yoga => "yoga",
            Category::Mobilite => "mobilite",
            Category::Mixte => "mixte",
        }
    }

    /// Get the display label
    pub fn label(&self) -> &'static str {
        match self {
            Category::Musculation => "Musculation",
            Category::Yoga => "Yoga",
            Category::Mobilite => "Mobilité",
            Category::Mixte => "Mixte",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "musculation" => Ok(Category::Musculation),
            "yoga" => Ok(Category::Yoga),
            "mobilite" | "mobilité" => Ok(Category::Mobilite),
            "mixte" => Ok(Category::Mixte),
            _ => Err(format!("Unknown category: {}", s)),
        }
    }
}

/// Session difficulty level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Facile,
    Moyen,
    Difficile,
}

impl Difficulty {
    /// Canonical storage/wire token (matches the serde representation)
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Facile => "facile",
            Difficulty::Moyen => "moyen",
            Difficulty::Difficile => "difficile",
        }
    }

    /// Get the display label
    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Facile => "Facile",
            Difficulty::Moyen => "Moyen",
            Difficulty::Difficile => "Difficile",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "facile" => Ok(Difficulty::Facile),
            "moyen" => Ok(Difficulty::Moyen),
            "difficile" => Ok(Difficulty::Difficile),
            _ => Err(format!("Unknown difficulty: {}", s)),
        }
    }
}

/// User account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Catalog exercise. Read-only to the composition and playback core:
/// drafts and playback entries reference exercises by id, they never copy
/// exercise data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exercise {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub category: Category,
    pub subcategory: String,
    /// Reference to a stored image, not the image itself
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// One exercise's placement inside a session.
///
/// `order` is 1-based and contiguous: after any composer operation the order
/// values of a draft with N entries are exactly `{1..N}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionExerciseEntry {
    pub exercise_id: Uuid,
    pub order: u32,
    pub duration_secs: u32,
}

/// An in-progress session composition, not yet validated or persisted.
///
/// Optional fields model "not yet filled in"; `validate_for_submission`
/// rejects a draft with any of them still absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionDraft {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub category: Option<Category>,
    pub difficulty: Option<Difficulty>,
    pub rest_time_secs: Option<u32>,
    #[serde(default)]
    pub entries: Vec<SessionExerciseEntry>,
}

/// A draft that passed submission validation, plus its computed duration.
/// This is the only shape the session store accepts for persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidSession {
    pub name: String,
    pub description: Option<String>,
    pub category: Category,
    pub difficulty: Difficulty,
    pub rest_time_secs: u32,
    pub entries: Vec<SessionExerciseEntry>,
    pub duration_secs: u32,
}
