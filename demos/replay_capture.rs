//! Replay Capture Example
//!
//! Feeds a recorded JSONL sample file straight through the motion engine
//! and prints every session it finalizes. Pacing is skipped; the engine is
//! timestamp-driven, so every measured result matches a live run of the
//! same data (session ids carry a fresh run tag).
//!
//! Run with: cargo run --bin replay_capture -- <samples.jsonl>

use contracts::EngineConfig;
use ingestion::load_samples;
use motion_engine::MotionEngine;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let path = match std::env::args().nth(1) {
        Some(path) => path,
        None => {
            eprintln!("usage: replay_capture <samples.jsonl> [accel_rate_hz]");
            std::process::exit(2);
        }
    };
    let accel_rate_hz: f64 = std::env::args()
        .nth(2)
        .map(|s| s.parse())
        .transpose()?
        .unwrap_or(100.0);

    let samples = load_samples(std::path::Path::new(&path))?;
    tracing::info!(count = samples.len(), path = %path, "Loaded recorded samples");

    let mut engine = MotionEngine::new(EngineConfig::default(), accel_rate_hz);
    engine.start()?;

    let mut sessions = Vec::new();
    for sample in &samples {
        let outcome = engine.push(sample);
        if let Some(e) = outcome.error {
            tracing::warn!("Engine error: {e}");
            break;
        }
        if let Some(session) = outcome.completed_session {
            sessions.push(session);
        }
    }

    // A burst still in flight at end of file is finalized by stop()
    if let Some(session) = engine.stop() {
        sessions.push(session);
    }

    for session in &sessions {
        tracing::info!(
            session_id = %session.id,
            start = format!("{:.2}", session.start_time),
            duration = format!("{:.2}", session.duration()),
            samples = session.sample_count,
            max_speed = format!("{:.2}", session.max_speed_mps),
            avg_speed = format!("{:.2}", session.avg_speed_mps),
            max_rpm = format!("{:.0}", session.max_rpm),
            "Session"
        );
    }

    tracing::info!(
        sessions = sessions.len(),
        dropped = engine.dropped_samples(),
        "Replay complete"
    );

    Ok(())
}
