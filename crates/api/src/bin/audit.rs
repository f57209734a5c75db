//! Content-integrity audit CLI.
//!
//! Scans tracks, lessons, quizzes and questions for structural problems and
//! missing lesson media, optionally regenerating the media through the
//! generation service.
//!
//! ```bash
//! fathom-audit [--regenerate] [--json] [--database-url <URL>] [--media-dir <DIR>]
//! ```
//!
//! Exits with status 1 when issues remain unresolved, 2 on a fatal error.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use fathom_api::audit::run_content_audit;
use fathom_api::config::GenerationConfig;
use fathom_api::generation::runner_from_config;
use fathom_api::telemetry;
use fathom_api::ws::WsManager;
use fathom_core::integrity::AuditReport;

/// Audit course content and lesson media
#[derive(Parser, Debug)]
#[command(name = "fathom-audit")]
#[command(about = "Audit course content integrity and regenerate missing lesson media")]
struct Args {
    /// SQLite database URL
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite://fathom.db")]
    database_url: String,

    /// Root directory served under /media
    #[arg(long, env = "MEDIA_DIR", default_value = "./media")]
    media_dir: PathBuf,

    /// Regenerate missing PDFs and podcasts
    #[arg(long)]
    regenerate: bool,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Generation service base URL (required with --regenerate)
    #[arg(long, env = "GENERATION_SERVICE_URL")]
    generation_url: Option<String>,

    /// Generation service API key
    #[arg(long, env = "GENERATION_API_KEY", hide_env_values = true)]
    generation_api_key: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    telemetry::init_tracing("fathom_api=info");

    let args = Args::parse();
    match run(args).await {
        Ok(report) if report.unresolved() == 0 => ExitCode::SUCCESS,
        Ok(_) => ExitCode::from(1),
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "Content audit failed");
            ExitCode::from(2)
        }
    }
}

async fn run(args: Args) -> anyhow::Result<AuditReport> {
    let pool = fathom_db::create_pool(&args.database_url)
        .await
        .with_context(|| format!("connecting to {}", args.database_url))?;
    fathom_db::run_migrations(&pool)
        .await
        .context("applying migrations")?;

    let runner = if args.regenerate {
        let config = GenerationConfig {
            service_url: args.generation_url.clone(),
            api_key: args.generation_api_key.clone(),
            ..GenerationConfig::default()
        };
        let runner = runner_from_config(
            pool.clone(),
            Arc::new(WsManager::new()),
            &config,
            args.media_dir.clone(),
        )
        .context("building generation client")?
        .context("--regenerate needs GENERATION_SERVICE_URL")?;
        tokio::fs::create_dir_all(&args.media_dir)
            .await
            .with_context(|| format!("creating {}", args.media_dir.display()))?;
        Some(runner)
    } else {
        None
    };

    let report = run_content_audit(&pool, &args.media_dir, runner.as_ref())
        .await
        .context("loading course content")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&report);
    }
    Ok(report)
}

fn print_summary(report: &AuditReport) {
    let s = &report.scanned;
    println!(
        "Scanned {} tracks, {} lessons, {} quizzes, {} questions",
        s.tracks, s.lessons, s.quizzes, s.questions
    );
    if report.issues.is_empty() {
        println!("No issues found");
    } else {
        for issue in &report.issues {
            println!(
                "  [{}] {} {}: {}",
                issue.kind.as_str(),
                issue.entity,
                issue.entity_id,
                issue.detail
            );
        }
        println!();
        for (kind, count) in &report.counts {
            println!("  {kind:<22} {count}");
        }
    }
    if report.regenerated + report.regeneration_failed > 0 {
        println!(
            "Regenerated {} media files, {} failed",
            report.regenerated, report.regeneration_failed
        );
    }
    println!("Health: {} ({} unresolved)", report.health, report.unresolved());
}
