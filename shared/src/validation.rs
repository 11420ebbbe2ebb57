//! Input validation functions
//!
//! Validation utilities for user input, shared between the backend and any
//! client-side preview code.

use crate::models::ALLOWED_REST_TIMES_SECS;

/// Validate email format
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email cannot be empty".to_string());
    }
    if email.len() > 255 {
        return Err("Email too long".to_string());
    }
    let email_regex = regex_lite::Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
    if !email_regex.is_match(email) {
        return Err("Invalid email format".to_string());
    }
    Ok(())
}

/// Validate password strength
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.len() < 8 {
        return Err("Password must be at least 8 characters".to_string());
    }
    if password.len() > 128 {
        return Err("Password too long".to_string());
    }
    Ok(())
}

/// Validate a session name
pub fn validate_session_name(name: &str) -> Result<(), String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err("Session name cannot be empty".to_string());
    }
    if trimmed.len() > 100 {
        return Err("Session name must be at most 100 characters".to_string());
    }
    Ok(())
}

/// Validate a per-exercise duration in seconds
pub fn validate_exercise_duration(duration_secs: u32) -> Result<(), String> {
    if duration_secs == 0 {
        return Err("Duration must be positive".to_string());
    }
    if duration_secs > 3600 {
        // 1 hour per exercise
        return Err("Duration cannot exceed 1 hour".to_string());
    }
    Ok(())
}

/// Validate the rest time between exercises
pub fn validate_rest_time(rest_time_secs: u32) -> Result<(), String> {
    if ALLOWED_REST_TIMES_SECS.contains(&rest_time_secs) {
        Ok(())
    } else {
        Err(format!(
            "Rest time must be one of: {} seconds",
            ALLOWED_REST_TIMES_SECS
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        ))
    }
}

/// Validate a session rating (1-5 stars)
pub fn validate_rating(rating: u8) -> Result<(), String> {
    if (1..=5).contains(&rating) {
        Ok(())
    } else {
        Err("Rating must be between 1 and 5".to_string())
    }
}

// ============================================================================
// User-Friendly Field Labels
// ============================================================================

/// Map technical field names to user-friendly display labels
pub fn get_field_display_label(field_name: &str) -> &str {
    match field_name {
        "name" => "Session Name",
        "description" => "Description",
        "category" => "Category",
        "difficulty" => "Difficulty",
        "rest_time_secs" => "Rest Time",
        "duration_secs" => "Duration",
        "entries" => "Exercises",
        "rating" => "Rating",
        "email" => "Email",
        "password" => "Password",
        _ => field_name,
    }
}

/// Validation error with field context
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
    pub display_label: String,
}

impl ValidationError {
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
            display_label: get_field_display_label(field).to_string(),
        }
    }

    /// Format as user-friendly error message
    pub fn user_message(&self) -> String {
        format!("{}: {}", self.display_label, self.message)
    }
}
