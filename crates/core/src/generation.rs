//! Lesson media generation: kinds, status machine and progress messages.
//!
//! A generation job walks
//! `initializing -> extracting -> generating -> polling -> downloading -> complete`
//! and may drop to `error` from any non-terminal step. Progress events are
//! pushed to WebSocket subscribers of the job's generation id.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Wire message types
// ---------------------------------------------------------------------------

/// Server push carrying a [`GenerationStatus`] change.
pub const MSG_TYPE_GENERATION_PROGRESS: &str = "generation-progress";

// ---------------------------------------------------------------------------
// Kind
// ---------------------------------------------------------------------------

pub const KIND_PDF: &str = "pdf";
pub const KIND_PODCAST: &str = "podcast";

/// All valid generation kinds.
pub const VALID_KINDS: &[&str] = &[KIND_PDF, KIND_PODCAST];

/// What is being generated for a lesson.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationKind {
    Pdf,
    Podcast,
}

impl GenerationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => KIND_PDF,
            Self::Podcast => KIND_PODCAST,
        }
    }

    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            KIND_PDF => Ok(Self::Pdf),
            KIND_PODCAST => Ok(Self::Podcast),
            other => Err(CoreError::Validation(format!(
                "Unknown generation kind: '{other}'. Valid kinds: {}",
                VALID_KINDS.join(", ")
            ))),
        }
    }

    /// File extension of the produced artifact.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Podcast => "mp3",
        }
    }

    /// Path of the artifact relative to the media root.
    pub fn media_path(&self, lesson_id: DbId) -> String {
        format!("lessons/{lesson_id}/{}.{}", self.as_str(), self.extension())
    }

    /// Public URL under which the artifact is served.
    pub fn media_url(&self, lesson_id: DbId) -> String {
        format!("/media/{}", self.media_path(lesson_id))
    }
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Step of a generation job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationStatus {
    Initializing,
    Extracting,
    Generating,
    Polling,
    Downloading,
    Complete,
    Error,
}

impl GenerationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Initializing => "initializing",
            Self::Extracting => "extracting",
            Self::Generating => "generating",
            Self::Polling => "polling",
            Self::Downloading => "downloading",
            Self::Complete => "complete",
            Self::Error => "error",
        }
    }

    /// Nominal completion percentage shown to clients.
    pub fn progress_percent(&self) -> u8 {
        match self {
            Self::Initializing => 0,
            Self::Extracting => 10,
            Self::Generating => 30,
            Self::Polling => 60,
            Self::Downloading => 90,
            Self::Complete => 100,
            Self::Error => 0,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete | Self::Error)
    }

    fn ordinal(&self) -> u8 {
        match self {
            Self::Initializing => 0,
            Self::Extracting => 1,
            Self::Generating => 2,
            Self::Polling => 3,
            Self::Downloading => 4,
            Self::Complete => 5,
            Self::Error => u8::MAX,
        }
    }
}

/// Whether a job may move from `from` to `to`.
///
/// Forward moves only (steps may be skipped); repeating `polling` is
/// allowed; `error` is reachable from every non-terminal step.
pub fn can_transition(from: GenerationStatus, to: GenerationStatus) -> bool {
    if from.is_terminal() {
        return false;
    }
    if to == GenerationStatus::Error {
        return true;
    }
    if from == GenerationStatus::Polling && to == GenerationStatus::Polling {
        return true;
    }
    to.ordinal() > from.ordinal()
}

// ---------------------------------------------------------------------------
// Progress event
// ---------------------------------------------------------------------------

/// Payload pushed to subscribers on every status change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationProgress {
    pub generation_id: String,
    pub status: GenerationStatus,
    pub progress: u8,
    pub message: Option<String>,
    pub timestamp: Timestamp,
}

impl GenerationProgress {
    pub fn new(generation_id: impl Into<String>, status: GenerationStatus) -> Self {
        Self {
            generation_id: generation_id.into(),
            status,
            progress: status.progress_percent(),
            message: None,
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// Build the plain text sent to the generation service from a lesson.
///
/// Blank lines are collapsed so the service receives compact paragraphs.
pub fn extract_lesson_text(title: &str, content: &str) -> String {
    let mut text = String::with_capacity(title.len() + content.len() + 2);
    text.push_str(title.trim());
    for line in content.lines().map(str::trim).filter(|l| !l.is_empty()) {
        text.push('\n');
        text.push_str(line);
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    use GenerationStatus::*;

    #[test]
    fn kind_parsing_and_paths() {
        assert_eq!(GenerationKind::parse("pdf").unwrap(), GenerationKind::Pdf);
        assert!(GenerationKind::parse("docx").is_err());
        assert_eq!(GenerationKind::Podcast.media_path(4), "lessons/4/podcast.mp3");
        assert_eq!(GenerationKind::Pdf.media_url(4), "/media/lessons/4/pdf.pdf");
    }

    #[test]
    fn happy_path_transitions_allowed() {
        let path = [Initializing, Extracting, Generating, Polling, Downloading, Complete];
        for pair in path.windows(2) {
            assert!(can_transition(pair[0], pair[1]), "{pair:?}");
        }
        assert!(can_transition(Polling, Polling));
    }

    #[test]
    fn backwards_and_post_terminal_moves_rejected() {
        assert!(!can_transition(Generating, Extracting));
        assert!(!can_transition(Complete, Error));
        assert!(!can_transition(Error, Initializing));
        assert!(!can_transition(Extracting, Extracting));
    }

    #[test]
    fn error_reachable_from_any_live_step() {
        for s in [Initializing, Extracting, Generating, Polling, Downloading] {
            assert!(can_transition(s, Error));
        }
    }

    #[test]
    fn progress_serializes_camel_case() {
        let p = GenerationProgress::new("gen-1", Complete);
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["generationId"], "gen-1");
        assert_eq!(json["status"], "complete");
        assert_eq!(json["progress"], 100);
    }

    #[test]
    fn lesson_text_drops_blank_lines() {
        let text = extract_lesson_text(" Decompression ", "Line one\n\n   \n  Line two  ");
        assert_eq!(text, "Decompression\nLine one\nLine two");
    }
}
