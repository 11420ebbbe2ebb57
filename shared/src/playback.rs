//! Playback engine
//!
//! A tick-driven state machine that sequences one playback attempt through
//! its phases: a fixed countdown, then each exercise/rest pair in order,
//! down to a terminal `Completed` state.
//!
//! The engine holds no wall clock and spawns no threads; the caller drives
//! it by invoking `tick()` once per elapsed logical second (in the app, a
//! recurring one-second callback; in tests, a plain loop). Pause is a
//! logical suspension: the callback keeps firing, and a tick taken while
//! paused consumes no time and performs no transition.
//!
//! ## Phase transitions
//!
//! ```text
//! Countdown -> Exercise -> Rest -> Exercise -> ... -> Exercise -> Completed
//! ```
//!
//! Rest is only entered between exercises, never after the last one.
//! `Completed` has no outgoing transitions; the engine is discarded and
//! rebuilt to play again.

use crate::errors::PlaybackError;
use crate::models::SessionExerciseEntry;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Fixed countdown length before the first exercise (seconds)
pub const COUNTDOWN_SECS: u32 = 5;

/// Current stage of playback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Countdown,
    Exercise,
    Rest,
    Completed,
}

/// Playback-time overrides, constructed fresh for each playback attempt.
///
/// Overrides customize a single run; they never mutate the stored session.
/// Exercise ids absent from `duration_overrides` fall back to the entry's
/// stored duration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlaybackConfig {
    pub rest_time_secs: u32,
    #[serde(default)]
    pub duration_overrides: HashMap<Uuid, u32>,
}

impl PlaybackConfig {
    pub fn new(rest_time_secs: u32) -> Self {
        Self {
            rest_time_secs,
            duration_overrides: HashMap::new(),
        }
    }

    /// Override the duration of one exercise for this run only
    pub fn override_duration(mut self, exercise_id: Uuid, duration_secs: u32) -> Self {
        self.duration_overrides.insert(exercise_id, duration_secs);
        self
    }
}

/// One playable step: an exercise reference plus its stored duration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackEntry {
    pub exercise_id: Uuid,
    pub duration_secs: u32,
}

impl From<&SessionExerciseEntry> for PlaybackEntry {
    fn from(entry: &SessionExerciseEntry) -> Self {
        Self {
            exercise_id: entry.exercise_id,
            duration_secs: entry.duration_secs,
        }
    }
}

/// The state view handed to the presentation layer after every tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackSnapshot {
    pub phase: Phase,
    pub current_exercise_index: usize,
    pub time_remaining_secs: u32,
    pub is_paused: bool,
}

/// A phase-completion transition observed during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseTransition {
    pub from: Phase,
    pub to: Phase,
    /// Index of the current exercise after the transition
    pub exercise_index: usize,
}

/// Outcome of asking to leave playback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitDecision {
    /// Playback already completed; exit without confirmation
    Immediate,
    /// Progress would be lost; the caller must confirm before discarding
    /// the engine
    ConfirmationRequired,
}

/// Single playback attempt state machine.
///
/// Owned by exactly one caller; a second concurrent playback of the same
/// session builds its own engine from a fresh snapshot.
#[derive(Debug, Clone)]
pub struct PlaybackEngine {
    entries: Vec<PlaybackEntry>,
    config: PlaybackConfig,
    phase: Phase,
    current_exercise_index: usize,
    time_remaining_secs: u32,
    is_paused: bool,
}

impl PlaybackEngine {
    /// Build an engine for one playback attempt.
    ///
    /// Starts in `Countdown` with the fixed countdown remaining and the
    /// first exercise up next. The entry list must be non-empty.
    pub fn new(
        entries: Vec<PlaybackEntry>,
        config: PlaybackConfig,
    ) -> Result<Self, PlaybackError> {
        if entries.is_empty() {
            return Err(PlaybackError::EmptyPlaybackList);
        }
        Ok(Self {
            entries,
            config,
            phase: Phase::Countdown,
            current_exercise_index: 0,
            time_remaining_secs: COUNTDOWN_SECS,
            is_paused: false,
        })
    }

    /// Build an engine directly from session entries
    pub fn from_entries(
        entries: &[SessionExerciseEntry],
        config: PlaybackConfig,
    ) -> Result<Self, PlaybackError> {
        Self::new(entries.iter().map(PlaybackEntry::from).collect(), config)
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn current_exercise_index(&self) -> usize {
        self.current_exercise_index
    }

    pub fn time_remaining_secs(&self) -> u32 {
        self.time_remaining_secs
    }

    pub fn is_paused(&self) -> bool {
        self.is_paused
    }

    pub fn exercise_count(&self) -> usize {
        self.entries.len()
    }

    /// The exercise currently playing (or up next during countdown)
    pub fn current_entry(&self) -> &PlaybackEntry {
        // current_exercise_index stays in [0, N) in every phase
        &self.entries[self.current_exercise_index]
    }

    /// Effective duration of the exercise at `index`: the per-run override
    /// if present, else the stored duration
    pub fn effective_duration(&self, index: usize) -> u32 {
        let entry = &self.entries[index];
        self.config
            .duration_overrides
            .get(&entry.exercise_id)
            .copied()
            .unwrap_or(entry.duration_secs)
    }

    /// Current state view for the presentation layer
    pub fn snapshot(&self) -> PlaybackSnapshot {
        PlaybackSnapshot {
            phase: self.phase,
            current_exercise_index: self.current_exercise_index,
            time_remaining_secs: self.time_remaining_secs,
            is_paused: self.is_paused,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Advance one logical second.
    ///
    /// No-op while paused or completed: no time is consumed and no
    /// transition occurs, however many ticks arrive. Otherwise decrements
    /// the remaining time; when it reaches 0, performs exactly one
    /// phase-completion transition and returns it.
    pub fn tick(&mut self) -> Option<PhaseTransition> {
        if self.is_paused || self.phase == Phase::Completed {
            return None;
        }
        self.time_remaining_secs = self.time_remaining_secs.saturating_sub(1);
        if self.time_remaining_secs > 0 {
            return None;
        }
        Some(self.complete_phase())
    }

    /// Flip the paused flag. Touches nothing else; permitted in any phase.
    pub fn toggle_pause(&mut self) {
        self.is_paused = !self.is_paused;
    }

    /// Ask to leave playback.
    ///
    /// After `Completed` the exit is immediate. Before that, playback state
    /// is never persisted, so leaving loses progress: the caller presents a
    /// confirmation and then drops the engine, which itself holds no
    /// resources needing cleanup.
    pub fn request_exit(&self) -> ExitDecision {
        if self.phase == Phase::Completed {
            ExitDecision::Immediate
        } else {
            ExitDecision::ConfirmationRequired
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// The single phase-completion transition, run when remaining time
    /// hits 0. Total over every non-terminal state.
    fn complete_phase(&mut self) -> PhaseTransition {
        let from = self.phase;
        match self.phase {
            Phase::Countdown => {
                self.phase = Phase::Exercise;
                self.time_remaining_secs = self.effective_duration(0);
            }
            Phase::Exercise => {
                if self.current_exercise_index < self.entries.len() - 1 {
                    self.phase = Phase::Rest;
                    self.time_remaining_secs = self.config.rest_time_secs;
                } else {
                    self.phase = Phase::Completed;
                    self.time_remaining_secs = 0;
                }
            }
            Phase::Rest => {
                self.current_exercise_index += 1;
                self.phase = Phase::Exercise;
                self.time_remaining_secs = self.effective_duration(self.current_exercise_index);
            }
            // Guarded by tick(); Completed never reaches here
            Phase::Completed => unreachable!("tick on completed engine"),
        }
        PhaseTransition {
            from,
            to: self.phase,
            exercise_index: self.current_exercise_index,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composer::compute_total_duration;
    use proptest::prelude::*;

    fn entries(durations: &[u32]) -> Vec<PlaybackEntry> {
        durations
            .iter()
            .map(|&duration_secs| PlaybackEntry {
                exercise_id: Uuid::new_v4(),
                duration_secs,
            })
            .collect()
    }

    fn engine(durations: &[u32], rest: u32) -> PlaybackEngine {
        PlaybackEngine::new(entries(durations), PlaybackConfig::new(rest)).unwrap()
    }

    #[test]
    fn test_empty_list_rejected() {
        let result = PlaybackEngine::new(vec![], PlaybackConfig::new(10));
        assert_eq!(result.unwrap_err(), PlaybackError::EmptyPlaybackList);
    }

    #[test]
    fn test_initial_state() {
        let engine = engine(&[20, 30], 10);
        assert_eq!(engine.phase(), Phase::Countdown);
        assert_eq!(engine.current_exercise_index(), 0);
        assert_eq!(engine.time_remaining_secs(), COUNTDOWN_SECS);
        assert!(!engine.is_paused());
        assert_eq!(engine.exercise_count(), 2);
        // The first exercise is up next during the countdown
        assert_eq!(engine.current_entry().duration_secs, 20);
    }

    #[test]
    fn test_concrete_phase_sequence() {
        // 2 exercises [20, 30], rest 10, countdown 5:
        // Countdown(5) -> Exercise#0(20) -> Rest(10) -> Exercise#1(30) -> Completed
        let mut engine = engine(&[20, 30], 10);
        let mut transitions = Vec::new();
        let mut ticks = 0;
        while engine.phase() != Phase::Completed {
            ticks += 1;
            assert!(ticks <= 1000, "engine never completed");
            if let Some(transition) = engine.tick() {
                transitions.push((transition.from, transition.to, transition.exercise_index));
            }
        }
        assert_eq!(ticks, 65);
        assert_eq!(
            transitions,
            vec![
                (Phase::Countdown, Phase::Exercise, 0),
                (Phase::Exercise, Phase::Rest, 0),
                (Phase::Rest, Phase::Exercise, 1),
                (Phase::Exercise, Phase::Completed, 1),
            ]
        );
    }

    #[test]
    fn test_no_rest_after_last_exercise() {
        let mut engine = engine(&[3], 10);
        for _ in 0..COUNTDOWN_SECS + 2 {
            engine.tick();
        }
        assert_eq!(engine.phase(), Phase::Exercise);
        engine.tick();
        assert_eq!(engine.phase(), Phase::Completed);
    }

    #[test]
    fn test_pause_is_noop_ticking() {
        let mut engine = engine(&[20, 30], 10);
        engine.tick();
        engine.toggle_pause();
        let before = engine.snapshot();
        for _ in 0..100 {
            assert_eq!(engine.tick(), None);
        }
        let after = engine.snapshot();
        assert_eq!(before, after);
        engine.toggle_pause();
        assert!(engine.tick().is_none());
        assert_eq!(engine.time_remaining_secs(), COUNTDOWN_SECS - 2);
    }

    #[test]
    fn test_override_precedence() {
        let list = entries(&[20, 30]);
        let first = list[0].exercise_id;
        let config = PlaybackConfig::new(10).override_duration(first, 7);
        let mut engine = PlaybackEngine::new(list, config).unwrap();
        for _ in 0..COUNTDOWN_SECS {
            engine.tick();
        }
        // Exercise 0 uses the override, exercise 1 falls back to stored
        assert_eq!(engine.phase(), Phase::Exercise);
        assert_eq!(engine.time_remaining_secs(), 7);
        for _ in 0..7 + 10 {
            engine.tick();
        }
        assert_eq!(engine.phase(), Phase::Exercise);
        assert_eq!(engine.current_exercise_index(), 1);
        assert_eq!(engine.time_remaining_secs(), 30);
    }

    #[test]
    fn test_completed_is_terminal() {
        let mut engine = engine(&[2], 5);
        while engine.phase() != Phase::Completed {
            engine.tick();
        }
        let terminal = engine.snapshot();
        for _ in 0..50 {
            assert_eq!(engine.tick(), None);
        }
        assert_eq!(engine.snapshot(), terminal);
    }

    #[test]
    fn test_exit_decision() {
        let mut engine = engine(&[2], 5);
        assert_eq!(engine.request_exit(), ExitDecision::ConfirmationRequired);
        while engine.phase() != Phase::Completed {
            engine.tick();
        }
        assert_eq!(engine.request_exit(), ExitDecision::Immediate);
    }

    #[test]
    fn test_pause_allowed_when_completed() {
        let mut engine = engine(&[1], 5);
        while engine.phase() != Phase::Completed {
            engine.tick();
        }
        engine.toggle_pause();
        assert!(engine.is_paused());
        assert_eq!(engine.tick(), None);
        assert_eq!(engine.phase(), Phase::Completed);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Ticks to completion equal countdown + total session duration
        #[test]
        fn prop_total_ticks_match_duration(
            durations in prop::collection::vec(1u32..90, 1..8),
            rest in prop::sample::select(vec![5u32, 10, 15, 20])
        ) {
            let mut engine = engine(&durations, rest);
            let mut ticks: u32 = 0;
            while engine.phase() != Phase::Completed {
                ticks += 1;
                engine.tick();
            }
            let expected = COUNTDOWN_SECS + compute_total_duration(&durations, rest);
            prop_assert_eq!(ticks, expected);
        }

        /// The exercise index never decreases and stays in range
        #[test]
        fn prop_index_monotonic(
            durations in prop::collection::vec(1u32..30, 1..8),
            rest in prop::sample::select(vec![5u32, 10, 15, 20])
        ) {
            let count = durations.len();
            let mut engine = engine(&durations, rest);
            let mut last_index = 0;
            while engine.phase() != Phase::Completed {
                engine.tick();
                let index = engine.current_exercise_index();
                prop_assert!(index >= last_index);
                prop_assert!(index < count);
                last_index = index;
            }
        }

        /// Pausing at an arbitrary point freezes the full state
        #[test]
        fn prop_pause_freezes_state(
            durations in prop::collection::vec(1u32..30, 1..6),
            rest in prop::sample::select(vec![5u32, 10, 15, 20]),
            run_ticks in 0u32..120,
            paused_ticks in 1u32..60
        ) {
            let mut engine = engine(&durations, rest);
            for _ in 0..run_ticks {
                engine.tick();
            }
            engine.toggle_pause();
            let frozen = engine.snapshot();
            for _ in 0..paused_ticks {
                prop_assert_eq!(engine.tick(), None);
            }
            prop_assert_eq!(engine.snapshot(), frozen);
        }
    }
}
