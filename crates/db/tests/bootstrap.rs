use sqlx::SqlitePool;

/// Full bootstrap test: migrate, health check, verify schema.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_full_bootstrap(pool: SqlitePool) {
    fathom_db::health_check(&pool).await.unwrap();

    let tables = [
        "users",
        "tracks",
        "lessons",
        "quizzes",
        "questions",
        "quiz_attempts",
        "srs_decks",
        "srs_cards",
        "srs_review_states",
        "srs_review_logs",
        "equipment_items",
        "maintenance_tasks",
        "equipment_use_logs",
        "sponsors",
        "sponsor_placements",
        "affiliates",
        "affiliate_referrals",
        "payment_events",
    ];

    for table in tables {
        let count: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&pool)
            .await
            .unwrap_or_else(|e| panic!("{table} query failed: {e}"));
        assert_eq!(count.0, 0, "{table} should start empty");
    }
}

/// Foreign keys must be enforced for cascades to work.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_foreign_keys_enforced(pool: SqlitePool) {
    let result = sqlx::query("INSERT INTO lessons (track_id, title, position) VALUES (999, 'x', 1)")
        .execute(&pool)
        .await;
    assert!(result.is_err(), "Orphan lesson should violate the foreign key");
}

/// `create_pool` creates the database file on first use.
#[tokio::test]
async fn test_create_pool_creates_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fresh.db");
    let url = format!("sqlite://{}", path.display());

    let pool = fathom_db::create_pool(&url).await.unwrap();
    fathom_db::run_migrations(&pool).await.unwrap();
    fathom_db::health_check(&pool).await.unwrap();

    assert!(path.exists());
}

/// Only SQLite URLs are accepted; anything else fails before touching disk.
#[tokio::test]
async fn test_create_pool_rejects_other_schemes() {
    let result = fathom_db::create_pool("postgres://fathom@localhost/fathom").await;
    assert_matches::assert_matches!(result, Err(sqlx::Error::Configuration(_)));
}
