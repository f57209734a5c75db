//! Spaced-repetition scheduling.
//!
//! An SM-2 style scheduler with four coarse grades. The scheduler is a pure
//! function of the previous review state, the grade and the review time so
//! the API layer can persist the result however it likes.
//!
//! Guarantee relied on by the review endpoint: for a fixed prior state and
//! review time, the next due date never decreases as the grade increases,
//! and strictly increases until [`MAX_INTERVAL_DAYS`] is reached.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Timestamp;

/// Ease factor assigned to a card the first time it is seen.
pub const DEFAULT_EASE: f64 = 2.5;
/// Lower bound for the ease factor.
pub const MIN_EASE: f64 = 1.3;
/// Upper bound for any interval.
pub const MAX_INTERVAL_DAYS: i64 = 3650;
/// Delay before a lapsed card is shown again.
pub const RELEARN_MINUTES: i64 = 10;
/// Interval at which a card counts as learned in deck statistics.
pub const MATURE_INTERVAL_DAYS: i64 = 21;

const HARD_FACTOR: f64 = 1.2;
const EASY_BONUS: f64 = 1.3;
/// First intervals (hard, good, easy) for a card with no successful reviews.
const FIRST_INTERVALS: (i64, i64, i64) = (1, 3, 5);

const EASE_PENALTY_AGAIN: f64 = 0.20;
const EASE_PENALTY_HARD: f64 = 0.15;
const EASE_BONUS_EASY: f64 = 0.15;

pub const GRADE_AGAIN: &str = "again";
pub const GRADE_HARD: &str = "hard";
pub const GRADE_GOOD: &str = "good";
pub const GRADE_EASY: &str = "easy";

/// All valid grade strings, lowest recall first.
pub const VALID_GRADES: &[&str] = &[GRADE_AGAIN, GRADE_HARD, GRADE_GOOD, GRADE_EASY];

/// Recall grade submitted for a single review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Grade {
    Again,
    Hard,
    Good,
    Easy,
}

impl Grade {
    /// Return the database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Again => GRADE_AGAIN,
            Self::Hard => GRADE_HARD,
            Self::Good => GRADE_GOOD,
            Self::Easy => GRADE_EASY,
        }
    }

    /// Parse from a string, returning an error for unknown grades.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            GRADE_AGAIN => Ok(Self::Again),
            GRADE_HARD => Ok(Self::Hard),
            GRADE_GOOD => Ok(Self::Good),
            GRADE_EASY => Ok(Self::Easy),
            other => Err(CoreError::Validation(format!(
                "Unknown grade: '{other}'. Valid grades: {}",
                VALID_GRADES.join(", ")
            ))),
        }
    }
}

/// Scheduling state of one card for one user.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReviewState {
    pub ease_factor: f64,
    pub interval_days: i64,
    /// Consecutive successful reviews since the last lapse.
    pub repetitions: i64,
}

impl ReviewState {
    /// State of a card the user has never reviewed.
    pub fn new_card() -> Self {
        Self {
            ease_factor: DEFAULT_EASE,
            interval_days: 0,
            repetitions: 0,
        }
    }
}

/// Output of [`schedule`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduledReview {
    pub state: ReviewState,
    pub due_at: Timestamp,
}

/// Compute the next state and due date after reviewing a card.
pub fn schedule(prev: &ReviewState, grade: Grade, now: Timestamp) -> ScheduledReview {
    let (hard, good, easy) = next_intervals(prev);
    let (interval_days, ease_factor) = match grade {
        Grade::Again => {
            return ScheduledReview {
                state: ReviewState {
                    ease_factor: clamp_ease(prev.ease_factor - EASE_PENALTY_AGAIN),
                    interval_days: 0,
                    repetitions: 0,
                },
                due_at: now + Duration::minutes(RELEARN_MINUTES),
            };
        }
        Grade::Hard => (hard, prev.ease_factor - EASE_PENALTY_HARD),
        Grade::Good => (good, prev.ease_factor),
        Grade::Easy => (easy, prev.ease_factor + EASE_BONUS_EASY),
    };

    ScheduledReview {
        state: ReviewState {
            ease_factor: clamp_ease(ease_factor),
            interval_days,
            repetitions: prev.repetitions + 1,
        },
        due_at: now + Duration::days(interval_days),
    }
}

/// Candidate intervals for hard, good and easy, each strictly greater than
/// the one before (until the cap).
fn next_intervals(prev: &ReviewState) -> (i64, i64, i64) {
    if prev.repetitions == 0 || prev.interval_days <= 0 {
        return FIRST_INTERVALS;
    }

    let base = prev.interval_days as f64;
    let ease = prev.ease_factor.max(MIN_EASE);

    let hard = ((base * HARD_FACTOR).ceil() as i64).max(prev.interval_days + 1);
    let good = ((base * ease).ceil() as i64).max(hard + 1);
    let easy = ((base * ease * EASY_BONUS).ceil() as i64).max(good + 1);

    (
        hard.min(MAX_INTERVAL_DAYS),
        good.min(MAX_INTERVAL_DAYS),
        easy.min(MAX_INTERVAL_DAYS),
    )
}

fn clamp_ease(ease: f64) -> f64 {
    ease.max(MIN_EASE)
}
