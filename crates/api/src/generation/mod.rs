//! Lesson media generation through an external HTTP service.
//!
//! [`client::ContentGenerator`] is the seam to the service;
//! [`runner::GenerationRunner`] drives one job end to end and reports each
//! step to WebSocket subscribers.

pub mod client;
pub mod runner;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use fathom_core::types::DbId;
use fathom_db::DbPool;

pub use client::{ContentGenerator, HttpContentGenerator, JobRequest, JobStatus};
pub use runner::GenerationRunner;

use crate::config::GenerationConfig;
use crate::ws::WsManager;

/// Upper bound for a single HTTP call to the generation service.
const SERVICE_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors from a generation job.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// The HTTP request itself failed (network, DNS, TLS, decode).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service returned a non-2xx status code.
    #[error("Generation service error ({status}): {body}")]
    Service { status: u16, body: String },

    /// The service reported the job as failed.
    #[error("Generation job {job_id} failed: {reason}")]
    JobFailed { job_id: String, reason: String },

    #[error("Generation job {job_id} did not finish within {secs}s")]
    Timeout { job_id: String, secs: u64 },

    #[error("Failed to write media file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Lesson {0} not found")]
    LessonNotFound(DbId),

    #[error("Lesson {0} has no content to generate from")]
    EmptyContent(DbId),
}

/// Build a runner backed by the HTTP service in `config`.
///
/// Returns `Ok(None)` when no service URL is configured.
pub fn runner_from_config(
    pool: DbPool,
    ws_manager: Arc<WsManager>,
    config: &GenerationConfig,
    media_dir: PathBuf,
) -> Result<Option<GenerationRunner>, GenerationError> {
    let Some(url) = &config.service_url else {
        return Ok(None);
    };
    let generator = HttpContentGenerator::new(
        url.trim_end_matches('/').to_string(),
        config.api_key.clone(),
        SERVICE_REQUEST_TIMEOUT,
    )?;
    Ok(Some(GenerationRunner::new(
        pool,
        ws_manager,
        Arc::new(generator),
        media_dir,
        config.poll_interval,
        config.timeout,
    )))
}
