//! Read-only snapshot of course content for the integrity audit.

use fathom_core::integrity::{AuditInput, LessonFacts, QuestionFacts, QuizFacts, TrackFacts};
use fathom_core::types::DbId;
use sqlx::SqlitePool;

/// Loads the facts the content audit inspects.
pub struct AuditRepo;

impl AuditRepo {
    /// Snapshot every track, lesson, quiz, and question in id order.
    pub async fn load_input(pool: &SqlitePool) -> Result<AuditInput, sqlx::Error> {
        let tracks: Vec<(DbId, String, i64)> = sqlx::query_as(
            "SELECT t.id, t.title,
                    (SELECT COUNT(*) FROM lessons l WHERE l.track_id = t.id)
             FROM tracks t ORDER BY t.id",
        )
        .fetch_all(pool)
        .await?;

        let lessons: Vec<(DbId, DbId, String, i64, i64, Option<String>, Option<String>)> =
            sqlx::query_as(
                "SELECT l.id, l.track_id, l.title,
                        LENGTH(TRIM(l.content, ' ' || char(9) || char(10) || char(13))),
                        (SELECT COUNT(*) FROM quizzes q WHERE q.lesson_id = l.id),
                        l.pdf_url, l.podcast_url
                 FROM lessons l ORDER BY l.id",
            )
            .fetch_all(pool)
            .await?;

        let quizzes: Vec<(DbId, DbId, i64)> = sqlx::query_as(
            "SELECT q.id, q.lesson_id,
                    (SELECT COUNT(*) FROM questions x WHERE x.quiz_id = q.id)
             FROM quizzes q ORDER BY q.id",
        )
        .fetch_all(pool)
        .await?;

        let questions: Vec<(DbId, DbId, i64, i64)> = sqlx::query_as(
            "SELECT id, quiz_id, json_array_length(options), correct_index
             FROM questions ORDER BY id",
        )
        .fetch_all(pool)
        .await?;

        Ok(AuditInput {
            tracks: tracks
                .into_iter()
                .map(|(id, title, lesson_count)| TrackFacts {
                    id,
                    title,
                    lesson_count,
                })
                .collect(),
            lessons: lessons
                .into_iter()
                .map(
                    |(id, track_id, title, content_len, quiz_count, pdf_url, podcast_url)| {
                        LessonFacts {
                            id,
                            track_id,
                            title,
                            has_content: content_len > 0,
                            quiz_count,
                            pdf_url,
                            podcast_url,
                        }
                    },
                )
                .collect(),
            quizzes: quizzes
                .into_iter()
                .map(|(id, lesson_id, question_count)| QuizFacts {
                    id,
                    lesson_id,
                    question_count,
                })
                .collect(),
            questions: questions
                .into_iter()
                .map(|(id, quiz_id, option_count, correct_index)| QuestionFacts {
                    id,
                    quiz_id,
                    option_count,
                    correct_index,
                })
                .collect(),
        })
    }
}
