//! Content-integrity audit rules.
//!
//! The audit walks tracks, lessons, quizzes and questions and reports
//! structural gaps (empty tracks, lessons without quizzes, malformed
//! questions) and missing generated media. Media issues can be repaired by
//! regenerating the artifact; structural issues need an author.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::generation::GenerationKind;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Health status constants
// ---------------------------------------------------------------------------

/// No unresolved issues.
pub const HEALTH_HEALTHY: &str = "healthy";
/// Unresolved issues, none of which break quizzes.
pub const HEALTH_WARNING: &str = "warning";
/// At least one question cannot be answered correctly.
pub const HEALTH_CRITICAL: &str = "critical";

/// URL prefix under which generated media is served.
pub const MEDIA_URL_PREFIX: &str = "/media/";

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct TrackFacts {
    pub id: DbId,
    pub title: String,
    pub lesson_count: i64,
}

#[derive(Debug, Clone)]
pub struct LessonFacts {
    pub id: DbId,
    pub track_id: DbId,
    pub title: String,
    pub has_content: bool,
    pub quiz_count: i64,
    pub pdf_url: Option<String>,
    pub podcast_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct QuizFacts {
    pub id: DbId,
    pub lesson_id: DbId,
    pub question_count: i64,
}

#[derive(Debug, Clone)]
pub struct QuestionFacts {
    pub id: DbId,
    pub quiz_id: DbId,
    pub option_count: i64,
    pub correct_index: i64,
}

/// Everything the audit looks at, loaded up front.
#[derive(Debug, Clone, Default)]
pub struct AuditInput {
    pub tracks: Vec<TrackFacts>,
    pub lessons: Vec<LessonFacts>,
    pub quizzes: Vec<QuizFacts>,
    pub questions: Vec<QuestionFacts>,
}

// ---------------------------------------------------------------------------
// Issues
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    EmptyTrack,
    EmptyLesson,
    MissingQuiz,
    EmptyQuiz,
    InvalidQuestion,
    MissingPdf,
    MissingPdfFile,
    MissingPodcast,
    MissingPodcastFile,
}

impl IssueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EmptyTrack => "empty_track",
            Self::EmptyLesson => "empty_lesson",
            Self::MissingQuiz => "missing_quiz",
            Self::EmptyQuiz => "empty_quiz",
            Self::InvalidQuestion => "invalid_question",
            Self::MissingPdf => "missing_pdf",
            Self::MissingPdfFile => "missing_pdf_file",
            Self::MissingPodcast => "missing_podcast",
            Self::MissingPodcastFile => "missing_podcast_file",
        }
    }

    /// The artifact to regenerate for this issue, if it is a media issue.
    pub fn regenerates(&self) -> Option<GenerationKind> {
        match self {
            Self::MissingPdf | Self::MissingPdfFile => Some(GenerationKind::Pdf),
            Self::MissingPodcast | Self::MissingPodcastFile => Some(GenerationKind::Podcast),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentIssue {
    pub kind: IssueKind,
    pub entity: &'static str,
    pub entity_id: DbId,
    pub detail: String,
}

/// Map a `/media/...` URL to a path relative to the media root.
///
/// Returns `None` for foreign URLs and for paths that try to escape the
/// media root.
pub fn media_relative_path(url: &str) -> Option<&str> {
    let rel = url.strip_prefix(MEDIA_URL_PREFIX)?;
    if rel.is_empty() || rel.split('/').any(|seg| seg.is_empty() || seg == "." || seg == "..") {
        return None;
    }
    Some(rel)
}

/// Run every rule over `input`.
///
/// `media_exists` receives a path relative to the media root and reports
/// whether the file is present. URLs outside `/media/` are treated as
/// externally hosted and are not checked.
pub fn audit<F>(input: &AuditInput, media_exists: F) -> Vec<ContentIssue>
where
    F: Fn(&str) -> bool,
{
    let mut issues = Vec::new();

    for track in &input.tracks {
        if track.lesson_count == 0 {
            issues.push(ContentIssue {
                kind: IssueKind::EmptyTrack,
                entity: "track",
                entity_id: track.id,
                detail: format!("Track '{}' has no lessons", track.title),
            });
        }
    }

    for lesson in &input.lessons {
        if !lesson.has_content {
            issues.push(lesson_issue(IssueKind::EmptyLesson, lesson, "has no content"));
        }
        if lesson.quiz_count == 0 {
            issues.push(lesson_issue(IssueKind::MissingQuiz, lesson, "has no quiz"));
        }
        check_media(
            &mut issues,
            lesson,
            lesson.pdf_url.as_deref(),
            (IssueKind::MissingPdf, IssueKind::MissingPdfFile),
            &media_exists,
        );
        check_media(
            &mut issues,
            lesson,
            lesson.podcast_url.as_deref(),
            (IssueKind::MissingPodcast, IssueKind::MissingPodcastFile),
            &media_exists,
        );
    }

    for quiz in &input.quizzes {
        if quiz.question_count == 0 {
            issues.push(ContentIssue {
                kind: IssueKind::EmptyQuiz,
                entity: "quiz",
                entity_id: quiz.id,
                detail: format!("Quiz {} on lesson {} has no questions", quiz.id, quiz.lesson_id),
            });
        }
    }

    for question in &input.questions {
        let bad_options = question.option_count < crate::course::MIN_OPTIONS as i64;
        let bad_index = question.correct_index < 0 || question.correct_index >= question.option_count;
        if bad_options || bad_index {
            issues.push(ContentIssue {
                kind: IssueKind::InvalidQuestion,
                entity: "question",
                entity_id: question.id,
                detail: format!(
                    "Question {} in quiz {} has {} options and correct index {}",
                    question.id, question.quiz_id, question.option_count, question.correct_index
                ),
            });
        }
    }

    issues
}

fn lesson_issue(kind: IssueKind, lesson: &LessonFacts, what: &str) -> ContentIssue {
    ContentIssue {
        kind,
        entity: "lesson",
        entity_id: lesson.id,
        detail: format!("Lesson '{}' (track {}) {what}", lesson.title, lesson.track_id),
    }
}

fn check_media<F>(
    issues: &mut Vec<ContentIssue>,
    lesson: &LessonFacts,
    url: Option<&str>,
    (unset, absent): (IssueKind, IssueKind),
    media_exists: &F,
) where
    F: Fn(&str) -> bool,
{
    match url.filter(|u| !u.trim().is_empty()) {
        None => issues.push(lesson_issue(unset, lesson, "has no generated media URL")),
        Some(url) => {
            if url.starts_with(MEDIA_URL_PREFIX) {
                let present = media_relative_path(url).is_some_and(media_exists);
                if !present {
                    issues.push(lesson_issue(
                        absent,
                        lesson,
                        &format!("points at missing file {url}"),
                    ));
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanCounts {
    pub tracks: usize,
    pub lessons: usize,
    pub quizzes: usize,
    pub questions: usize,
}

impl ScanCounts {
    pub fn of(input: &AuditInput) -> Self {
        Self {
            tracks: input.tracks.len(),
            lessons: input.lessons.len(),
            quizzes: input.quizzes.len(),
            questions: input.questions.len(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AuditReport {
    pub scanned: ScanCounts,
    pub issues: Vec<ContentIssue>,
    /// Issue count per kind (kind name -> count).
    pub counts: BTreeMap<&'static str, usize>,
    pub regenerated: usize,
    pub regeneration_failed: usize,
    pub health: &'static str,
}

impl AuditReport {
    pub fn new(scanned: ScanCounts, issues: Vec<ContentIssue>) -> Self {
        let mut counts = BTreeMap::new();
        for issue in &issues {
            *counts.entry(issue.kind.as_str()).or_insert(0) += 1;
        }
        let mut report = Self {
            scanned,
            issues,
            counts,
            regenerated: 0,
            regeneration_failed: 0,
            health: HEALTH_HEALTHY,
        };
        report.health = report.assess_health();
        report
    }

    /// Issues that a regeneration pass could fix.
    pub fn regenerable(&self) -> impl Iterator<Item = &ContentIssue> {
        self.issues.iter().filter(|i| i.kind.regenerates().is_some())
    }

    pub fn record_regeneration(&mut self, succeeded: bool) {
        if succeeded {
            self.regenerated += 1;
        } else {
            self.regeneration_failed += 1;
        }
        self.health = self.assess_health();
    }

    /// Issues still outstanding after regeneration.
    pub fn unresolved(&self) -> usize {
        self.issues.len().saturating_sub(self.regenerated)
    }

    fn assess_health(&self) -> &'static str {
        if self.issues.iter().any(|i| i.kind == IssueKind::InvalidQuestion) {
            HEALTH_CRITICAL
        } else if self.unresolved() > 0 {
            HEALTH_WARNING
        } else {
            HEALTH_HEALTHY
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lesson(id: DbId, pdf: Option<&str>, podcast: Option<&str>) -> LessonFacts {
        LessonFacts {
            id,
            track_id: 1,
            title: format!("Lesson {id}"),
            has_content: true,
            quiz_count: 1,
            pdf_url: pdf.map(String::from),
            podcast_url: podcast.map(String::from),
        }
    }

    fn kinds(issues: &[ContentIssue]) -> Vec<IssueKind> {
        issues.iter().map(|i| i.kind).collect()
    }

    #[test]
    fn clean_content_has_no_issues() {
        let input = AuditInput {
            tracks: vec![TrackFacts { id: 1, title: "Air".into(), lesson_count: 1 }],
            lessons: vec![lesson(1, Some("/media/lessons/1/pdf.pdf"), Some("https://cdn.example/p.mp3"))],
            quizzes: vec![QuizFacts { id: 1, lesson_id: 1, question_count: 3 }],
            questions: vec![QuestionFacts { id: 1, quiz_id: 1, option_count: 4, correct_index: 2 }],
        };
        let issues = audit(&input, |_| true);
        assert!(issues.is_empty(), "{issues:?}");
        let report = AuditReport::new(ScanCounts::of(&input), issues);
        assert_eq!(report.health, HEALTH_HEALTHY);
        assert_eq!(report.scanned.lessons, 1);
    }

    #[test]
    fn structural_issues_detected() {
        let mut l = lesson(2, Some("https://x/p.pdf"), Some("https://x/p.mp3"));
        l.has_content = false;
        l.quiz_count = 0;
        let input = AuditInput {
            tracks: vec![TrackFacts { id: 9, title: "Empty".into(), lesson_count: 0 }],
            lessons: vec![l],
            quizzes: vec![QuizFacts { id: 3, lesson_id: 2, question_count: 0 }],
            questions: vec![QuestionFacts { id: 4, quiz_id: 3, option_count: 2, correct_index: 2 }],
        };
        let issues = audit(&input, |_| true);
        assert_eq!(
            kinds(&issues),
            vec![
                IssueKind::EmptyTrack,
                IssueKind::EmptyLesson,
                IssueKind::MissingQuiz,
                IssueKind::EmptyQuiz,
                IssueKind::InvalidQuestion,
            ]
        );
        let report = AuditReport::new(ScanCounts::of(&input), issues);
        assert_eq!(report.health, HEALTH_CRITICAL);
        assert_eq!(report.counts["empty_track"], 1);
    }

    #[test]
    fn media_issues_distinguish_unset_and_missing_files() {
        let input = AuditInput {
            lessons: vec![lesson(5, None, Some("/media/lessons/5/podcast.mp3"))],
            ..Default::default()
        };
        let issues = audit(&input, |_| false);
        assert_eq!(kinds(&issues), vec![IssueKind::MissingPdf, IssueKind::MissingPodcastFile]);
        assert!(issues.iter().all(|i| i.kind.regenerates().is_some()));
    }

    #[test]
    fn media_lookup_receives_relative_path() {
        let input = AuditInput {
            lessons: vec![lesson(5, Some("/media/lessons/5/pdf.pdf"), Some("/media/lessons/5/podcast.mp3"))],
            ..Default::default()
        };
        let issues = audit(&input, |p| p == "lessons/5/pdf.pdf");
        assert_eq!(kinds(&issues), vec![IssueKind::MissingPodcastFile]);
    }

    #[test]
    fn traversal_urls_count_as_missing() {
        assert_eq!(media_relative_path("/media/../etc/passwd"), None);
        assert_eq!(media_relative_path("/media/"), None);
        assert_eq!(media_relative_path("/static/a.pdf"), None);
        assert_eq!(media_relative_path("/media/lessons/1/pdf.pdf"), Some("lessons/1/pdf.pdf"));
    }

    #[test]
    fn regeneration_updates_health() {
        let input = AuditInput {
            lessons: vec![lesson(5, None, None)],
            ..Default::default()
        };
        let issues = audit(&input, |_| true);
        let mut report = AuditReport::new(ScanCounts::of(&input), issues);
        assert_eq!(report.health, HEALTH_WARNING);
        assert_eq!(report.regenerable().count(), 2);

        report.record_regeneration(true);
        assert_eq!(report.health, HEALTH_WARNING);
        report.record_regeneration(true);
        assert_eq!(report.health, HEALTH_HEALTHY);
        assert_eq!(report.unresolved(), 0);
    }

    #[test]
    fn failed_regeneration_keeps_warning() {
        let input = AuditInput {
            lessons: vec![lesson(5, None, Some("https://cdn/p.mp3"))],
            ..Default::default()
        };
        let mut report = AuditReport::new(ScanCounts::of(&input), audit(&input, |_| true));
        report.record_regeneration(false);
        assert_eq!(report.regeneration_failed, 1);
        assert_eq!(report.unresolved(), 1);
        assert_eq!(report.health, HEALTH_WARNING);
    }
}
