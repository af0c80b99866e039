//! Level progression state machine
//!
//! Owns the current level, the completed set and the in-flight transition.
//! State changes only through `advance` (completing on a later frame) and
//! `reset`. Per-level status is always derived, never stored.
//!
//! Every transition carries the generation it was started in. `reset` bumps
//! the generation, so a completion belonging to an older run is discarded
//! instead of touching state.

use std::collections::BTreeSet;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::catalog::{self, Level};
use super::motion::{Motion, ease_out_cubic};
use crate::consts::{LEVEL_COUNT, MOVE_DURATION_MS};
use crate::persistence::{self, KeyValueStore};

/// Derived status of a level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelStatus {
    Locked,
    Unlocked,
    Current,
    Completed,
}

impl LevelStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LevelStatus::Locked => "locked",
            LevelStatus::Unlocked => "unlocked",
            LevelStatus::Current => "current",
            LevelStatus::Completed => "completed",
        }
    }
}

/// Status of level `id` given the current level and completed set
pub fn status(id: u32, current_level: u32, completed: &BTreeSet<u32>) -> LevelStatus {
    if completed.contains(&id) {
        LevelStatus::Completed
    } else if id == current_level {
        LevelStatus::Current
    } else if id <= current_level {
        LevelStatus::Unlocked
    } else {
        LevelStatus::Locked
    }
}

/// One-shot notifications, each returned by exactly one `drain_events` call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProgressEvent {
    LevelCompleted(u32),
    LevelUnlocked(u32),
}

/// Identifies one transition run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionToken {
    generation: u64,
    from_level: u32,
}

#[derive(Debug, Clone)]
struct Transition {
    token: TransitionToken,
    motion: Motion,
    position: Vec2,
}

/// Serializable view of the progression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    pub current_level: u32,
    pub completed_levels: Vec<u32>,
    pub is_moving: bool,
    pub partial_progress: f32,
}

#[derive(Debug, Clone)]
pub struct Progression {
    current_level: u32,
    completed: BTreeSet<u32>,
    transition: Option<Transition>,
    partial_progress: f32,
    generation: u64,
    /// Transition duration in milliseconds
    move_duration: f64,
    events: Vec<ProgressEvent>,
}

impl Default for Progression {
    fn default() -> Self {
        Self::new()
    }
}

impl Progression {
    /// Fresh progression at level 1
    pub fn new() -> Self {
        Self {
            current_level: 1,
            completed: BTreeSet::new(),
            transition: None,
            partial_progress: 0.0,
            generation: 0,
            move_duration: MOVE_DURATION_MS,
            events: Vec::new(),
        }
    }

    /// Build from per-level completion flags
    ///
    /// The current level is the number of completed levels plus one. This
    /// assumes completions form a prefix 1..=k; sparse flags are taken as-is.
    pub fn from_flags<I>(flags: I) -> Self
    where
        I: IntoIterator<Item = (u32, bool)>,
    {
        let completed: BTreeSet<u32> = flags
            .into_iter()
            .filter(|&(id, done)| done && (1..=LEVEL_COUNT).contains(&id))
            .map(|(id, _)| id)
            .collect();
        let current_level = completed.len() as u32 + 1;

        Self {
            current_level,
            completed,
            ..Self::new()
        }
    }

    /// Restore from the persisted `level<N>Completed` flags
    pub fn restore(store: &impl KeyValueStore) -> Self {
        let progression = Self::from_flags(persistence::load_completion_flags(store));
        log::info!(
            "Restored progress: {} of {} levels completed, current level {}",
            progression.completed.len(),
            LEVEL_COUNT,
            progression.current_level
        );
        progression
    }

    /// Override the transition duration (milliseconds)
    pub fn with_move_duration(mut self, duration: f64) -> Self {
        self.set_move_duration(duration);
        self
    }

    pub fn set_move_duration(&mut self, duration: f64) {
        self.move_duration = duration.max(0.0);
    }

    pub fn current_level(&self) -> u32 {
        self.current_level
    }

    pub fn completed_levels(&self) -> &BTreeSet<u32> {
        &self.completed
    }

    pub fn completed_count(&self) -> usize {
        self.completed.len()
    }

    pub fn all_completed(&self) -> bool {
        self.completed.len() == LEVEL_COUNT as usize
    }

    pub fn is_moving(&self) -> bool {
        self.transition.is_some()
    }

    /// Fraction of the current segment travelled, 0 when idle
    pub fn partial_progress(&self) -> f32 {
        self.partial_progress
    }

    pub fn status(&self, id: u32) -> LevelStatus {
        status(id, self.current_level, &self.completed)
    }

    /// Every catalog level with its derived status
    pub fn levels_with_status(&self) -> Vec<(&'static Level, LevelStatus)> {
        catalog::all()
            .iter()
            .map(|level| (level, self.status(level.id)))
            .collect()
    }

    /// Where the marker should be drawn
    pub fn marker_position(&self) -> Vec2 {
        if let Some(transition) = &self.transition {
            return transition.position;
        }
        resting_position(self.current_level)
    }

    /// Whether `advance` would start a transition
    pub fn can_advance(&self) -> bool {
        self.current_level <= LEVEL_COUNT && self.transition.is_none()
    }

    /// Start moving to the next level
    ///
    /// No-op past the last level or while a transition is running.
    pub fn advance(&mut self) -> Option<TransitionToken> {
        if !self.can_advance() {
            log::debug!(
                "Advance ignored (level {}, moving: {})",
                self.current_level,
                self.is_moving()
            );
            return None;
        }

        let from = resting_position(self.current_level);
        let to = resting_position(self.current_level + 1);
        let token = TransitionToken {
            generation: self.generation,
            from_level: self.current_level,
        };
        self.transition = Some(Transition {
            token,
            motion: Motion::new(from, to, self.move_duration, ease_out_cubic),
            position: from,
        });
        self.partial_progress = 0.0;

        log::info!(
            "Moving from level {} to level {}",
            self.current_level,
            self.current_level + 1
        );
        Some(token)
    }

    /// Step the running transition for the display frame at `now` (ms)
    ///
    /// Returns true if the transition completed on this frame.
    pub fn frame(&mut self, now: f64) -> bool {
        let Some(transition) = self.transition.as_mut() else {
            return false;
        };
        let Some(sample) = transition.motion.sample(now) else {
            return false;
        };

        transition.position = sample.position;
        self.partial_progress = sample.progress;

        if sample.done {
            let token = transition.token;
            return self.complete_transition(token);
        }
        false
    }

    /// Apply the completion step for `token`
    ///
    /// Stale tokens (from before a reset, or already completed) are ignored,
    /// as is a transition whose motion has not reached its end yet.
    fn complete_transition(&mut self, token: TransitionToken) -> bool {
        let Some(transition) = self.transition.as_ref() else {
            log::debug!("Discarding stale transition from level {}", token.from_level);
            return false;
        };
        if transition.token != token || token.generation != self.generation {
            log::debug!("Discarding stale transition from level {}", token.from_level);
            return false;
        }
        if !transition.motion.is_finished() {
            log::debug!("Transition from level {} still running", token.from_level);
            return false;
        }

        let finished = self.current_level;
        self.completed.insert(finished);
        self.current_level += 1;
        self.transition = None;
        self.partial_progress = 0.0;

        self.events.push(ProgressEvent::LevelCompleted(finished));
        if self.current_level <= LEVEL_COUNT {
            self.events.push(ProgressEvent::LevelUnlocked(self.current_level));
        }

        log::info!("Level {} completed", finished);
        true
    }

    /// Back to level 1, cancelling any transition and clearing stored flags
    pub fn reset(&mut self, store: &mut impl KeyValueStore) {
        if let Some(transition) = self.transition.take() {
            log::debug!(
                "Cancelling transition from level {}",
                transition.token.from_level
            );
        }
        self.generation += 1;
        self.current_level = 1;
        self.completed.clear();
        self.partial_progress = 0.0;
        persistence::clear_completion_flags(store);
        log::info!("Progress reset");
    }

    /// Whether level `id` may be opened
    ///
    /// Only unlocked levels that are not yet completed are selectable.
    pub fn select_level(&self, id: u32) -> bool {
        let selectable = catalog::get(id).is_some()
            && id <= self.current_level
            && !self.completed.contains(&id);
        if !selectable {
            log::debug!("Level {} is not selectable", id);
        }
        selectable
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<ProgressEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            current_level: self.current_level,
            completed_levels: self.completed.iter().copied().collect(),
            is_moving: self.is_moving(),
            partial_progress: self.partial_progress,
        }
    }
}

/// Marker position for a level id, clamped to the catalog
fn resting_position(level: u32) -> Vec2 {
    let clamped = level.clamp(1, LEVEL_COUNT);
    catalog::position(clamped).unwrap_or(Vec2::ZERO)
}
