//! Repository tests for tracks, lessons, quizzes, questions, and attempts.

use fathom_core::course::score_attempt;
use fathom_db::models::lesson::{CreateLesson, UpdateLesson};
use fathom_db::models::quiz::{CreateQuestion, CreateQuiz, UpdateQuestion};
use fathom_db::models::track::{CreateTrack, UpdateTrack};
use fathom_db::models::user::CreateUser;
use fathom_db::repositories::{
    LessonRepo, QuestionRepo, QuizAttemptRepo, QuizRepo, TrackRepo, UserRepo,
};
use sqlx::SqlitePool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_track(title: &str) -> CreateTrack {
    CreateTrack {
        title: title.to_string(),
        slug: None,
        description: None,
        difficulty: None,
        is_published: None,
        ai_tutor: None,
        sort_order: None,
    }
}

fn new_lesson(title: &str) -> CreateLesson {
    CreateLesson {
        title: title.to_string(),
        position: None,
        content: Some("Check the umbilical before every dive.".to_string()),
    }
}

fn new_question(prompt: &str, correct_index: i64) -> CreateQuestion {
    CreateQuestion {
        prompt: prompt.to_string(),
        options: vec!["Yes".to_string(), "No".to_string()],
        correct_index,
        explanation: None,
        position: None,
    }
}

// ---------------------------------------------------------------------------
// Tracks
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_track_defaults(pool: SqlitePool) {
    let track = TrackRepo::create(&pool, &new_track("Surface Supply"), "surface-supply")
        .await
        .unwrap();
    assert_eq!(track.slug, "surface-supply");
    assert_eq!(track.difficulty, "beginner");
    assert!(!track.is_published);
    assert_eq!(track.sort_order, 0);

    let by_slug = TrackRepo::find_by_slug(&pool, "surface-supply")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_slug.id, track.id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_slug_rejected(pool: SqlitePool) {
    TrackRepo::create(&pool, &new_track("A"), "hyperbaric")
        .await
        .unwrap();
    let err = TrackRepo::create(&pool, &new_track("B"), "hyperbaric")
        .await
        .unwrap_err();
    let db_err = err.as_database_error().expect("database error");
    assert!(db_err.is_unique_violation());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_hides_drafts_unless_requested(pool: SqlitePool) {
    let draft = TrackRepo::create(&pool, &new_track("Draft"), "draft")
        .await
        .unwrap();
    let published = TrackRepo::create(
        &pool,
        &CreateTrack {
            is_published: Some(true),
            ..new_track("Live")
        },
        "live",
    )
    .await
    .unwrap();

    let public = TrackRepo::list(&pool, false).await.unwrap();
    assert_eq!(public.len(), 1);
    assert_eq!(public[0].id, published.id);

    let all = TrackRepo::list(&pool, true).await.unwrap();
    assert_eq!(all.len(), 2);
    assert!(all.iter().any(|t| t.id == draft.id));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_track_update_coalesces(pool: SqlitePool) {
    let track = TrackRepo::create(
        &pool,
        &CreateTrack {
            description: Some("Original".to_string()),
            ..new_track("Rigging")
        },
        "rigging",
    )
    .await
    .unwrap();

    let updated = TrackRepo::update(
        &pool,
        track.id,
        &UpdateTrack {
            is_published: Some(true),
            ai_tutor: Some("captain-nemo".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(updated.title, "Rigging");
    assert_eq!(updated.description.as_deref(), Some("Original"));
    assert!(updated.is_published);
    assert_eq!(updated.ai_tutor.as_deref(), Some("captain-nemo"));
    assert_eq!(updated.slug, "rigging");

    assert!(TrackRepo::update(&pool, 999, &UpdateTrack::default())
        .await
        .unwrap()
        .is_none());
}

// ---------------------------------------------------------------------------
// Lessons
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_lesson_positions_append(pool: SqlitePool) {
    let track = TrackRepo::create(&pool, &new_track("Air Diving"), "air-diving")
        .await
        .unwrap();
    let first = LessonRepo::create(&pool, track.id, &new_lesson("Gas laws"))
        .await
        .unwrap();
    let second = LessonRepo::create(&pool, track.id, &new_lesson("Decompression"))
        .await
        .unwrap();
    assert_eq!(first.position, 1);
    assert_eq!(second.position, 2);

    LessonRepo::update(
        &pool,
        first.id,
        &UpdateLesson {
            position: Some(5),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let ordered = LessonRepo::list_by_track(&pool, track.id).await.unwrap();
    let titles: Vec<_> = ordered.iter().map(|l| l.title.as_str()).collect();
    assert_eq!(titles, ["Decompression", "Gas laws"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_set_media_url(pool: SqlitePool) {
    use fathom_core::generation::GenerationKind;

    let track = TrackRepo::create(&pool, &new_track("Wet Bell"), "wet-bell")
        .await
        .unwrap();
    let lesson = LessonRepo::create(&pool, track.id, &new_lesson("Launch"))
        .await
        .unwrap();

    let url = GenerationKind::Podcast.media_url(lesson.id);
    assert!(LessonRepo::set_media_url(&pool, lesson.id, GenerationKind::Podcast, &url)
        .await
        .unwrap());
    let lesson = LessonRepo::find_by_id(&pool, lesson.id).await.unwrap().unwrap();
    assert_eq!(lesson.podcast_url.as_deref(), Some(url.as_str()));
    assert!(lesson.pdf_url.is_none());

    assert!(!LessonRepo::set_media_url(&pool, 999, GenerationKind::Pdf, "/media/x.pdf")
        .await
        .unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_cascade_delete_track(pool: SqlitePool) {
    let track = TrackRepo::create(&pool, &new_track("Cascade"), "cascade")
        .await
        .unwrap();
    let lesson = LessonRepo::create(&pool, track.id, &new_lesson("One"))
        .await
        .unwrap();
    let quiz = QuizRepo::create(
        &pool,
        lesson.id,
        &CreateQuiz {
            title: "Check".to_string(),
            pass_mark_percent: None,
        },
    )
    .await
    .unwrap();
    let question = QuestionRepo::create(&pool, quiz.id, &new_question("Q?", 0))
        .await
        .unwrap();

    assert!(TrackRepo::delete(&pool, track.id).await.unwrap());

    assert!(LessonRepo::find_by_id(&pool, lesson.id).await.unwrap().is_none());
    assert!(QuizRepo::find_by_id(&pool, quiz.id).await.unwrap().is_none());
    assert!(QuestionRepo::find_by_id(&pool, question.id)
        .await
        .unwrap()
        .is_none());
    assert!(!TrackRepo::delete(&pool, track.id).await.unwrap());
}

// ---------------------------------------------------------------------------
// Quizzes, questions, attempts
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_questions_and_attempts(pool: SqlitePool) {
    let track = TrackRepo::create(&pool, &new_track("Safety"), "safety")
        .await
        .unwrap();
    let lesson = LessonRepo::create(&pool, track.id, &new_lesson("Lockout"))
        .await
        .unwrap();
    let quiz = QuizRepo::create(
        &pool,
        lesson.id,
        &CreateQuiz {
            title: "Lockout quiz".to_string(),
            pass_mark_percent: Some(50),
        },
    )
    .await
    .unwrap();
    assert_eq!(quiz.pass_mark_percent, 50);

    let q1 = QuestionRepo::create(&pool, quiz.id, &new_question("Tag out?", 0))
        .await
        .unwrap();
    let q2 = QuestionRepo::create(&pool, quiz.id, &new_question("Skip brief?", 1))
        .await
        .unwrap();
    assert_eq!(q1.position, 1);
    assert_eq!(q2.position, 2);
    assert_eq!(q1.options.0, vec!["Yes", "No"]);

    let updated = QuestionRepo::update(
        &pool,
        q2.id,
        &UpdateQuestion {
            options: Some(vec!["Yes".into(), "No".into(), "Maybe".into()]),
            correct_index: Some(2),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(updated.options.0.len(), 3);
    assert_eq!(updated.correct_index, 2);

    let user = UserRepo::create(
        &pool,
        &CreateUser {
            email: "diver@example.com".to_string(),
            display_name: "Diver".to_string(),
            password_hash: "x".to_string(),
            role: "student".to_string(),
        },
    )
    .await
    .unwrap();

    let questions = QuestionRepo::list_by_quiz(&pool, quiz.id).await.unwrap();
    let correct: Vec<i64> = questions.iter().map(|q| q.correct_index).collect();
    let answers = [0, 1];
    let score = score_attempt(&correct, &answers, quiz.pass_mark_percent);
    assert_eq!(score.score_percent, 50);
    assert!(score.passed);

    let attempt = QuizAttemptRepo::create(&pool, quiz.id, user.id, &answers, &score)
        .await
        .unwrap();
    assert_eq!(attempt.answers.0, vec![0, 1]);
    assert!(attempt.passed);

    let attempts = QuizAttemptRepo::list_for_user(&pool, quiz.id, user.id)
        .await
        .unwrap();
    assert_eq!(attempts.len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_email_lookup_case_insensitive(pool: SqlitePool) {
    let created = UserRepo::create(
        &pool,
        &CreateUser {
            email: "Tender@Example.com".to_string(),
            display_name: "Tender".to_string(),
            password_hash: "x".to_string(),
            role: "student".to_string(),
        },
    )
    .await
    .unwrap();

    let found = UserRepo::find_by_email(&pool, "tender@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id, created.id);

    let dup = UserRepo::create(
        &pool,
        &CreateUser {
            email: "TENDER@example.com".to_string(),
            display_name: "Other".to_string(),
            password_hash: "x".to_string(),
            role: "student".to_string(),
        },
    )
    .await;
    assert!(dup.is_err(), "Emails are unique regardless of case");

    let promoted = UserRepo::update_role(&pool, created.id, "instructor")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(promoted.role, "instructor");
}
