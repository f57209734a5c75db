//! Content-integrity audit service shared by the admin endpoint and the
//! `fathom-audit` binary.

use std::collections::HashSet;
use std::path::Path;

use fathom_core::integrity::{audit, media_relative_path, AuditReport, ScanCounts};
use fathom_db::repositories::AuditRepo;
use fathom_db::DbPool;

use crate::generation::GenerationRunner;

/// Scan course content and, when `runner` is given, regenerate missing
/// lesson media one job at a time.
///
/// Regeneration failures are counted in the report and never abort the
/// audit. Only a database failure while loading the content does.
pub async fn run_content_audit(
    pool: &DbPool,
    media_dir: &Path,
    runner: Option<&GenerationRunner>,
) -> Result<AuditReport, sqlx::Error> {
    let input = AuditRepo::load_input(pool).await?;

    let mut present = HashSet::new();
    for lesson in &input.lessons {
        for url in [&lesson.pdf_url, &lesson.podcast_url].into_iter().flatten() {
            if let Some(rel) = media_relative_path(url) {
                if tokio::fs::try_exists(media_dir.join(rel)).await.unwrap_or(false) {
                    present.insert(rel.to_string());
                }
            }
        }
    }

    let issues = audit(&input, |rel| present.contains(rel));
    let mut report = AuditReport::new(ScanCounts::of(&input), issues);
    tracing::info!(
        issues = report.issues.len(),
        health = report.health,
        "Content audit scanned"
    );

    let Some(runner) = runner else {
        return Ok(report);
    };

    let jobs: Vec<_> = report
        .regenerable()
        .filter_map(|issue| issue.kind.regenerates().map(|kind| (issue.entity_id, kind)))
        .collect();

    for (lesson_id, kind) in jobs {
        let generation_id = uuid::Uuid::new_v4().to_string();
        let ok = runner.run(lesson_id, kind, &generation_id).await.is_ok();
        report.record_regeneration(ok);
    }

    tracing::info!(
        regenerated = report.regenerated,
        failed = report.regeneration_failed,
        unresolved = report.unresolved(),
        health = report.health,
        "Content audit finished"
    );
    Ok(report)
}
