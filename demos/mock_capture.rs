//! Mock Capture Example
//!
//! Demonstrates the full capture chain with the synthetic throw feed.
//! This example runs without requiring a real IMU device.
//!
//! Run with: cargo run --bin mock_capture

use std::time::Duration;

use config_loader::ConfigLoader;
use contracts::{SamplePayload, SampleSource};
use ingestion::{IngestionPipeline, MockFeedConfig, ThrowProfileSource};
use motion_engine::MotionEngine;
use tokio::sync::mpsc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    tracing::info!("Starting Mock Capture Demo");

    // ==== Stage 1: Use default config or load from file ====
    let blueprint = if let Some(path) = std::env::args().nth(1) {
        tracing::info!(path = %path, "Loading blueprint config");
        ConfigLoader::load_from_path(std::path::Path::new(&path))?
    } else {
        // Create a minimal test blueprint
        create_test_blueprint()
    };

    // ==== Stage 2: Setup Ingestion Pipeline (Mock Feed) ====
    tracing::info!("Setting up ingestion pipeline...");
    let mut ingestion = IngestionPipeline::new(256);

    let feed_id = blueprint.feed.id.to_string();
    let source: Box<dyn SampleSource> = Box::new(ThrowProfileSource::new(MockFeedConfig {
        feed_id: feed_id.clone(),
        accel_rate_hz: blueprint.feed.accel_rate_hz,
        gyro_rate_hz: blueprint.feed.gyro_rate_hz,
        ..Default::default()
    }));
    ingestion.register_feed(feed_id.clone(), source, None);

    tracing::info!(feed = %feed_id, "Ingestion pipeline configured");

    // ==== Stage 3: Setup Motion Engine ====
    tracing::info!("Configuring motion engine...");
    let engine_config = blueprint.to_engine_config();
    let mut engine = MotionEngine::new(engine_config, blueprint.feed.accel_rate_hz);
    engine.start()?;

    // ==== Stage 4: Setup Store Dispatcher ====
    let (session_tx, session_rx) = mpsc::channel(16);
    let dispatcher = session_store::create_dispatcher(blueprint.stores.clone(), session_rx)?;
    let dispatcher_handle = dispatcher.spawn();

    // ==== Stage 5: Start Pipeline ====
    tracing::info!("Starting pipeline...");
    ingestion.start_all();
    let ingestion_rx = ingestion.take_receiver().unwrap();

    let target_sessions = 2u64;

    tracing::info!("Running pipeline, target: {} sessions", target_sessions);

    let pipeline_handle = tokio::spawn(async move {
        let mut session_count = 0u64;

        while let Ok(sample) = ingestion_rx.recv().await {
            let channel = match sample.payload {
                SamplePayload::Accel(_) => "accel",
                SamplePayload::Gyro(_) => "gyro",
            };
            tracing::debug!(
                feed_id = %sample.feed_id,
                channel,
                timestamp = sample.timestamp,
                "Received sample"
            );

            let outcome = engine.push(&sample);
            if let Some(e) = outcome.error {
                tracing::warn!("Engine error: {e}");
                break;
            }

            if let Some(session) = outcome.completed_session {
                session_count += 1;
                tracing::info!(
                    session_id = %session.id,
                    duration = format!("{:.2}", session.duration()),
                    max_speed = format!("{:.2}", session.max_speed_mps),
                    max_rpm = format!("{:.0}", session.max_rpm),
                    "Session finalized"
                );
                if session_tx.send(session).await.is_err() {
                    break;
                }

                if session_count >= target_sessions {
                    break;
                }
            }
        }
        session_count
    });

    // Wait for pipeline or timeout
    let result = tokio::time::timeout(Duration::from_secs(30), pipeline_handle).await;

    // ==== Stage 6: Cleanup ====
    tracing::info!("Shutting down and cleaning up...");
    ingestion.stop_all();
    let _ = tokio::time::timeout(Duration::from_secs(5), dispatcher_handle).await;

    match result {
        Ok(Ok(count)) => tracing::info!(sessions = count, "Pipeline completed successfully"),
        Ok(Err(e)) => tracing::warn!("Pipeline error: {:?}", e),
        Err(_) => tracing::warn!("Pipeline timed out"),
    }

    Ok(())
}

fn create_test_blueprint() -> contracts::CaptureBlueprint {
    use contracts::*;

    CaptureBlueprint {
        version: ConfigVersion::V1,
        feed: FeedConfig {
            id: "mock_imu".into(),
            accel_rate_hz: 100.0,
            gyro_rate_hz: 200.0,
            queue_capacity: 1024,
            drop_policy: DropPolicy::DropNewest,
        },
        engine: EngineOverrides::default(),
        stores: vec![StoreConfig {
            name: "console".to_string(),
            store_type: StoreType::Log,
            queue_capacity: 16,
            params: Default::default(),
        }],
    }
}
