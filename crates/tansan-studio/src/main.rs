//! Studio demo binary.
//!
//! Runs one session against the simulated backend: submits a batch of
//! jobs, cancels one, waits for the rest and prints the resulting history
//! and timeline as JSON.

use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use tansan_models::params::{DURATION_MIN, GENRE, MOOD, SCRIPT, TEXT, VOICE, VOICE_NAME};
use tansan_models::{JobKind, JobParams};
use tansan_studio::{StudioConfig, StudioSession};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Load environment variables
    dotenvy::dotenv().ok();

    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let mut env_filter = EnvFilter::from_default_env();
    match "tansan=info".parse() {
        Ok(directive) => env_filter = env_filter.add_directive(directive),
        Err(e) => eprintln!("Invalid log directive: {}", e),
    }

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }

    info!("Starting tansan-studio");

    let config = StudioConfig::from_env();
    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        std::process::exit(1);
    }
    info!("Studio config: {:?}", config);

    let session = StudioSession::new(config);

    let mut notifications = session.subscribe();
    let printer = tokio::spawn(async move {
        while let Ok(notification) = notifications.recv().await {
            info!(
                level = notification.level.as_str(),
                job_id = ?notification.job_id.as_ref().map(|id| id.to_string()),
                "{}", notification.message
            );
        }
    });

    let requests = [
        (
            JobKind::Tts,
            JobParams::new()
                .with(TEXT, "Welcome to the studio. This line is read by an AI voice.")
                .with(VOICE, "sarah"),
        ),
        (
            JobKind::Music,
            JobParams::new()
                .with(GENRE, "Jazz")
                .with(MOOD, "Calm")
                .with(DURATION_MIN, 2),
        ),
        (
            JobKind::Voiceover,
            JobParams::new()
                .with(SCRIPT, "Every great story starts with a single voice. ".repeat(6))
                .with(VOICE, "warm-female"),
        ),
        (
            JobKind::VoiceCloneTraining,
            JobParams::new().with(VOICE_NAME, "Demo Voice"),
        ),
    ];

    let mut handles = Vec::new();
    for (kind, params) in requests {
        match session.submit_checked(kind, params).await {
            Ok(handle) => handles.push(handle),
            Err(e) => warn!("Rejected {} request: {}", kind, e),
        }
    }

    // Cancel the clone training to show a cancellation winning
    if let Some(handle) = handles.iter().find(|h| h.kind == JobKind::VoiceCloneTraining) {
        match session.cancel(&handle.id).await {
            Ok(status) => info!(job_id = %handle.id, "Cancel requested, status now {}", status),
            Err(e) => warn!("Cancel failed: {}", e),
        }
    }

    for handle in handles.iter_mut() {
        let status = handle.wait().await;
        info!(job_id = %handle.id, kind = %handle.kind, "Job finished as {}", status);
    }

    let artifacts = session.artifacts().await;
    if let Some(latest) = artifacts.first() {
        match session.play(&latest.id).await {
            Ok(_) => info!(artifact_id = %latest.id, "Playing {}", latest.title),
            Err(e) => warn!("Playback failed: {}", e),
        }
    }

    match serde_json::to_string_pretty(&artifacts) {
        Ok(json) => println!("{}", json),
        Err(e) => error!("Failed to serialize history: {}", e),
    }
    match serde_json::to_string_pretty(&session.tracks().await) {
        Ok(json) => println!("{}", json),
        Err(e) => error!("Failed to serialize timeline: {}", e),
    }

    drop(session);
    printer.await.ok();

    info!("Studio demo complete");
}
