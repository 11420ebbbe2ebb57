//! Session composition
//!
//! Operations for assembling a `SessionDraft` into a form suitable for
//! persistence or a playback preview: adding, removing and reordering
//! entries, computing the total estimated duration, and submission
//! validation.
//!
//! Every code path that can change a session's exercises or rest time
//! (creation, update, client-side preview) goes through the same
//! `compute_total_duration`, so the stored duration always matches what the
//! composer previews.

use crate::errors::ComposerError;
use crate::models::{
    SessionDraft, SessionExerciseEntry, ValidSession, ALLOWED_REST_TIMES_SECS,
    DEFAULT_EXERCISE_DURATION_SECS,
};
use uuid::Uuid;

/// Direction for a single-step reorder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Up,
    Down,
}

/// Total estimated duration in seconds for an ordered list of exercise
/// durations and a rest time.
///
/// Rest is inserted only *between* exercises, never before the first or
/// after the last: a single-exercise session's total equals that exercise's
/// duration alone, and an empty list yields 0. Pure: identical inputs
/// always produce identical output, whether called at creation time or at
/// playback-preview time.
pub fn compute_total_duration(durations: &[u32], rest_time_secs: u32) -> u32 {
    let exercise_total: u32 = durations.iter().sum();
    let rest_count = durations.len().saturating_sub(1) as u32;
    exercise_total + rest_count * rest_time_secs
}

impl SessionDraft {
    /// Append an exercise to the draft with the default duration.
    ///
    /// The new entry gets `order = current_count + 1`. An exercise can
    /// appear at most once per session; a duplicate id is rejected without
    /// mutating the draft.
    pub fn add_exercise(&mut self, exercise_id: Uuid) -> Result<(), ComposerError> {
        if self.entries.iter().any(|e| e.exercise_id == exercise_id) {
            return Err(ComposerError::DuplicateExercise(exercise_id));
        }
        self.entries.push(SessionExerciseEntry {
            exercise_id,
            order: self.entries.len() as u32 + 1,
            duration_secs: DEFAULT_EXERCISE_DURATION_SECS,
        });
        Ok(())
    }

    /// Remove the entry at `index` and renumber the remaining entries so
    /// order values stay contiguous from 1, preserving relative order.
    pub fn remove_exercise(
        &mut self,
        index: usize,
    ) -> Result<SessionExerciseEntry, ComposerError> {
        if index >= self.entries.len() {
            return Err(ComposerError::IndexOutOfRange {
                index,
                len: self.entries.len(),
            });
        }
        let removed = self.entries.remove(index);
        self.renumber();
        Ok(removed)
    }

    /// Swap the entry at `index` with its neighbor in `direction`.
    ///
    /// Moving the first entry up or the last entry down is a defined no-op,
    /// not an error. An index past the end is a caller bug.
    pub fn move_exercise(
        &mut self,
        index: usize,
        direction: MoveDirection,
    ) -> Result<(), ComposerError> {
        let len = self.entries.len();
        if index >= len {
            return Err(ComposerError::IndexOutOfRange { index, len });
        }
        let neighbor = match direction {
            MoveDirection::Up if index == 0 => return Ok(()),
            MoveDirection::Down if index == len - 1 => return Ok(()),
            MoveDirection::Up => index - 1,
            MoveDirection::Down => index + 1,
        };
        self.entries.swap(index, neighbor);
        self.renumber();
        Ok(())
    }

    /// Set the duration of the entry at `index`
    pub fn set_exercise_duration(
        &mut self,
        index: usize,
        duration_secs: u32,
    ) -> Result<(), ComposerError> {
        let len = self.entries.len();
        let entry = self
            .entries
            .get_mut(index)
            .ok_or(ComposerError::IndexOutOfRange { index, len })?;
        entry.duration_secs = duration_secs;
        Ok(())
    }

    /// Total estimated duration of the draft, using the draft's rest time
    /// (0 if not yet chosen)
    pub fn total_duration_secs(&self) -> u32 {
        let durations: Vec<u32> = self.entries.iter().map(|e| e.duration_secs).collect();
        compute_total_duration(&durations, self.rest_time_secs.unwrap_or(0))
    }

    /// Validate the draft for submission.
    ///
    /// Checks that name, category, difficulty and rest time are present,
    /// that the rest time is one of the allowed values, and that the draft
    /// holds at least one entry. On success returns the draft together with
    /// its computed total duration, ready for persistence.
    pub fn validate_for_submission(&self) -> Result<ValidSession, ComposerError> {
        if self.name.trim().is_empty() {
            return Err(ComposerError::MissingField("name"));
        }
        let category = self.category.ok_or(ComposerError::MissingField("category"))?;
        let difficulty = self
            .difficulty
            .ok_or(ComposerError::MissingField("difficulty"))?;
        let rest_time_secs = self
            .rest_time_secs
            .ok_or(ComposerError::MissingField("rest_time_secs"))?;
        if self.entries.is_empty() {
            return Err(ComposerError::EmptyExerciseList);
        }
        if !ALLOWED_REST_TIMES_SECS.contains(&rest_time_secs) {
            return Err(ComposerError::InvalidRestTime(rest_time_secs));
        }

        let durations: Vec<u32> = self.entries.iter().map(|e| e.duration_secs).collect();
        Ok(ValidSession {
            name: self.name.trim().to_string(),
            description: self.description.clone(),
            category,
            difficulty,
            rest_time_secs,
            entries: self.entries.clone(),
            duration_secs: compute_total_duration(&durations, rest_time_secs),
        })
    }

    /// Rewrite order values to `{1..N}` following current list positions
    fn renumber(&mut self) {
        for (position, entry) in self.entries.iter_mut().enumerate() {
            entry.order = position as u32 + 1;
        }
    }
}
