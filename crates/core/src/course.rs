//! Course content rules: difficulty levels, question shape and quiz scoring.

use crate::error::CoreError;

pub const DIFFICULTY_BEGINNER: &str = "beginner";
pub const DIFFICULTY_INTERMEDIATE: &str = "intermediate";
pub const DIFFICULTY_ADVANCED: &str = "advanced";

/// All valid track difficulty levels.
pub const VALID_DIFFICULTIES: &[&str] = &[
    DIFFICULTY_BEGINNER,
    DIFFICULTY_INTERMEDIATE,
    DIFFICULTY_ADVANCED,
];

/// Minimum number of answer options on a question.
pub const MIN_OPTIONS: usize = 2;

/// Default pass mark for new quizzes.
pub const DEFAULT_PASS_MARK_PERCENT: i64 = 70;

pub fn validate_difficulty(difficulty: &str) -> Result<(), CoreError> {
    crate::error::require_one_of("difficulty", difficulty, VALID_DIFFICULTIES)
}

pub fn validate_pass_mark(percent: i64) -> Result<(), CoreError> {
    if !(0..=100).contains(&percent) {
        return Err(CoreError::Validation(format!(
            "pass_mark_percent must be between 0 and 100, got {percent}"
        )));
    }
    Ok(())
}

/// Check that a question has enough non-blank options and that the correct
/// index points at one of them.
pub fn validate_question(options: &[String], correct_index: i64) -> Result<(), CoreError> {
    if options.len() < MIN_OPTIONS {
        return Err(CoreError::Validation(format!(
            "A question needs at least {MIN_OPTIONS} options"
        )));
    }
    if options.iter().any(|o| o.trim().is_empty()) {
        return Err(CoreError::Validation("Question options must not be blank".into()));
    }
    if correct_index < 0 || correct_index as usize >= options.len() {
        return Err(CoreError::Validation(format!(
            "correct_index {correct_index} is outside the {} options",
            options.len()
        )));
    }
    Ok(())
}

/// Outcome of scoring a quiz attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizScore {
    pub correct: i64,
    pub total: i64,
    pub score_percent: i64,
    pub passed: bool,
}

/// Score submitted answers against the correct indices, question by
/// question. Missing answers count as wrong; surplus answers are ignored.
/// A quiz without questions scores 0 and never passes.
pub fn score_attempt(correct_indices: &[i64], answers: &[i64], pass_mark_percent: i64) -> QuizScore {
    let total = correct_indices.len() as i64;
    let correct = correct_indices
        .iter()
        .zip(answers.iter())
        .filter(|(expected, given)| expected == given)
        .count() as i64;

    let score_percent = if total == 0 { 0 } else { correct * 100 / total };
    QuizScore {
        correct,
        total,
        score_percent,
        passed: total > 0 && score_percent >= pass_mark_percent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("Option {i}")).collect()
    }

    #[test]
    fn question_validation() {
        assert!(validate_question(&opts(4), 3).is_ok());
        assert!(validate_question(&opts(1), 0).is_err());
        assert!(validate_question(&opts(3), 3).is_err());
        assert!(validate_question(&opts(3), -1).is_err());
        assert!(validate_question(&["a".into(), " ".into()], 0).is_err());
    }

    #[test]
    fn difficulty_and_pass_mark() {
        assert!(validate_difficulty("advanced").is_ok());
        assert!(validate_difficulty("expert").is_err());
        assert!(validate_pass_mark(0).is_ok());
        assert!(validate_pass_mark(101).is_err());
    }

    #[test]
    fn scoring_rounds_down_and_applies_pass_mark() {
        let score = score_attempt(&[0, 1, 2], &[0, 1, 0], 70);
        assert_eq!(score.correct, 2);
        assert_eq!(score.score_percent, 66);
        assert!(!score.passed);

        let score = score_attempt(&[0, 1, 2], &[0, 1, 2], 70);
        assert_eq!(score.score_percent, 100);
        assert!(score.passed);
    }

    #[test]
    fn missing_answers_count_as_wrong() {
        let score = score_attempt(&[1, 1, 1, 1], &[1, 1], 50);
        assert_eq!(score.correct, 2);
        assert_eq!(score.score_percent, 50);
        assert!(score.passed);
    }

    #[test]
    fn empty_quiz_never_passes() {
        let score = score_attempt(&[], &[], 0);
        assert_eq!(score.total, 0);
        assert!(!score.passed);
    }
}
