use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use fathom_core::generation::{
    can_transition, extract_lesson_text, GenerationKind, GenerationProgress, GenerationStatus,
};
use fathom_core::types::DbId;
use fathom_db::repositories::LessonRepo;
use fathom_db::DbPool;

use super::client::{ContentGenerator, JobRequest, JobStatus};
use super::GenerationError;
use crate::ws::WsManager;

/// Drives lesson media generation jobs and reports their progress.
pub struct GenerationRunner {
    pool: DbPool,
    ws_manager: Arc<WsManager>,
    generator: Arc<dyn ContentGenerator>,
    media_dir: PathBuf,
    poll_interval: Duration,
    timeout: Duration,
}

impl GenerationRunner {
    pub fn new(
        pool: DbPool,
        ws_manager: Arc<WsManager>,
        generator: Arc<dyn ContentGenerator>,
        media_dir: PathBuf,
        poll_interval: Duration,
        timeout: Duration,
    ) -> Self {
        Self {
            pool,
            ws_manager,
            generator,
            media_dir,
            poll_interval,
            timeout,
        }
    }

    /// Start a job in the background and return its generation id.
    pub fn spawn(self: &Arc<Self>, lesson_id: DbId, kind: GenerationKind) -> String {
        let generation_id = uuid::Uuid::new_v4().to_string();
        let runner = Arc::clone(self);
        let id = generation_id.clone();
        tokio::spawn(async move {
            // Failures are already logged and published by `run`.
            let _ = runner.run(lesson_id, kind, &id).await;
        });
        generation_id
    }

    /// Run one job to completion, returning the stored media URL.
    ///
    /// Every step is published under `generation_id`. A failure is logged,
    /// published as an `error` event, and returned.
    pub async fn run(
        &self,
        lesson_id: DbId,
        kind: GenerationKind,
        generation_id: &str,
    ) -> Result<String, GenerationError> {
        tracing::info!(lesson_id, kind = kind.as_str(), generation_id, "Generation started");
        let mut progress = JobProgress::new(&self.ws_manager, generation_id);

        match self.execute(lesson_id, kind, &mut progress).await {
            Ok(url) => {
                progress
                    .report(
                        GenerationProgress::new(generation_id, GenerationStatus::Complete)
                            .with_message(url.clone()),
                    )
                    .await;
                tracing::info!(lesson_id, kind = kind.as_str(), generation_id, url = %url, "Generation complete");
                Ok(url)
            }
            Err(e) => {
                tracing::warn!(lesson_id, kind = kind.as_str(), generation_id, error = %e, "Generation failed");
                progress
                    .report(
                        GenerationProgress::new(generation_id, GenerationStatus::Error)
                            .with_message(e.to_string()),
                    )
                    .await;
                Err(e)
            }
        }
    }

    async fn execute(
        &self,
        lesson_id: DbId,
        kind: GenerationKind,
        progress: &mut JobProgress<'_>,
    ) -> Result<String, GenerationError> {
        let generation_id = progress.generation_id;
        progress.step(GenerationStatus::Initializing).await;
        let lesson = LessonRepo::find_by_id(&self.pool, lesson_id)
            .await?
            .ok_or(GenerationError::LessonNotFound(lesson_id))?;

        progress.step(GenerationStatus::Extracting).await;
        if lesson.content.trim().is_empty() {
            return Err(GenerationError::EmptyContent(lesson_id));
        }
        let job = JobRequest {
            kind,
            title: lesson.title.clone(),
            text: extract_lesson_text(&lesson.title, &lesson.content),
        };

        progress.step(GenerationStatus::Generating).await;
        let job_id = self.generator.submit(&job).await?;
        tracing::debug!(generation_id, job_id = %job_id, "Generation job submitted");

        let result_url = tokio::time::timeout(self.timeout, self.wait_for(&job_id, progress))
            .await
            .map_err(|_| GenerationError::Timeout {
                job_id: job_id.clone(),
                secs: self.timeout.as_secs(),
            })??;

        progress.step(GenerationStatus::Downloading).await;
        let bytes = self.generator.download(&result_url).await?;

        let path = self.media_dir.join(kind.media_path(lesson_id));
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, &bytes).await?;
        tracing::debug!(generation_id, path = %path.display(), bytes = bytes.len(), "Media written");

        let url = kind.media_url(lesson_id);
        if !LessonRepo::set_media_url(&self.pool, lesson_id, kind, &url).await? {
            return Err(GenerationError::LessonNotFound(lesson_id));
        }
        Ok(url)
    }

    /// Poll until the job finishes, publishing a `polling` event per round.
    async fn wait_for(
        &self,
        job_id: &str,
        progress: &mut JobProgress<'_>,
    ) -> Result<String, GenerationError> {
        loop {
            match self.generator.poll(job_id).await? {
                JobStatus::Done { result_url } => return Ok(result_url),
                JobStatus::Failed { error } => {
                    return Err(GenerationError::JobFailed {
                        job_id: job_id.to_string(),
                        reason: error,
                    })
                }
                JobStatus::Pending | JobStatus::Running => {
                    progress.step(GenerationStatus::Polling).await;
                    tokio::time::sleep(self.poll_interval).await;
                }
            }
        }
    }

}

/// Progress publisher for a single job.
///
/// Events the status machine does not allow after the last published one
/// (anything after a terminal event, or a step backwards) are dropped.
struct JobProgress<'a> {
    ws_manager: &'a WsManager,
    generation_id: &'a str,
    last: Option<GenerationStatus>,
}

impl<'a> JobProgress<'a> {
    fn new(ws_manager: &'a WsManager, generation_id: &'a str) -> Self {
        Self {
            ws_manager,
            generation_id,
            last: None,
        }
    }

    async fn step(&mut self, status: GenerationStatus) -> bool {
        self.report(GenerationProgress::new(self.generation_id, status)).await
    }

    /// Publish `progress`. Returns `false` if it was dropped.
    async fn report(&mut self, progress: GenerationProgress) -> bool {
        if let Some(last) = self.last {
            if !can_transition(last, progress.status) {
                tracing::warn!(
                    generation_id = self.generation_id,
                    from = last.as_str(),
                    to = progress.status.as_str(),
                    "Dropping out-of-order generation progress",
                );
                return false;
            }
        }
        self.last = Some(progress.status);
        self.ws_manager.publish(&progress).await;
        true
    }
}
