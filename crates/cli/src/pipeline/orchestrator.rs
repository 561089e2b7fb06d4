//! Pipeline orchestrator - coordinates all components.
//!
//! Wires the ingestion pipeline into the motion engine and hands
//! finalized sessions to the store dispatcher.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use contracts::{CaptureBlueprint, SamplePayload, SampleSource};
use ingestion::{BackpressureConfig, IngestionPipeline, MockFeedConfig, ReplayFeedSource, ThrowProfileSource};
use motion_engine::MotionEngine;
use observability::{record_sample_received, record_session_completed, record_snapshot};
use tokio::sync::mpsc;
use tracing::{info, warn};

use super::PipelineStats;

/// Pipeline configuration
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// The capture blueprint configuration
    pub blueprint: CaptureBlueprint,

    /// Maximum number of sessions to capture (None = unlimited)
    pub max_sessions: Option<u64>,

    /// Pipeline timeout (None = no timeout)
    pub timeout: Option<Duration>,

    /// Channel buffer size
    pub buffer_size: usize,

    /// Metrics server port (None = disabled)
    pub metrics_port: Option<u16>,

    /// Replay recorded data path (None = mock feed)
    pub replay_path: Option<PathBuf>,

    /// Replay speed multiplier (1.0 = original speed)
    pub replay_speed: f64,
}

/// Main pipeline orchestrator
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    /// Create a new pipeline with the given configuration
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Run the pipeline to completion
    pub async fn run(self) -> Result<PipelineStats> {
        let start_time = Instant::now();
        let blueprint = &self.config.blueprint;

        // Initialize Metrics (optional)
        if let Some(port) = self.config.metrics_port {
            observability::init_metrics_only(port)?;
            info!("Metrics endpoint available on port {}", port);
        }

        // Setup Ingestion Pipeline
        info!("Setting up ingestion pipeline...");
        let mut ingestion = IngestionPipeline::new(self.config.buffer_size);

        let feed_id = blueprint.feed.id.to_string();
        let source: Box<dyn SampleSource> = match &self.config.replay_path {
            Some(path) => {
                info!(path = %path.display(), speed = self.config.replay_speed, "Running in REPLAY mode");
                Box::new(ReplayFeedSource::new(
                    &feed_id,
                    path.clone(),
                    self.config.replay_speed,
                ))
            }
            None => {
                info!("Running in MOCK mode (no device required)");
                Box::new(ThrowProfileSource::new(MockFeedConfig {
                    feed_id: feed_id.clone(),
                    accel_rate_hz: blueprint.feed.accel_rate_hz,
                    gyro_rate_hz: blueprint.feed.gyro_rate_hz,
                    ..Default::default()
                }))
            }
        };

        let backpressure = BackpressureConfig::new(
            blueprint.feed.queue_capacity,
            blueprint.feed.drop_policy,
        );
        ingestion.register_feed(feed_id.clone(), source, Some(backpressure));

        info!(feed = %feed_id, "Ingestion pipeline configured");

        // Setup Motion Engine
        info!("Configuring motion engine...");
        let engine_config = blueprint.to_engine_config();
        let mut engine = MotionEngine::new(engine_config, blueprint.feed.accel_rate_hz);
        engine.start().context("Failed to start motion engine")?;

        // Setup Store Dispatcher
        info!("Setting up store dispatcher...");
        let (session_tx, session_rx) = mpsc::channel(self.config.buffer_size);

        if blueprint.stores.is_empty() {
            warn!("No stores configured - finalized sessions will be dropped");
        }

        let dispatcher = session_store::create_dispatcher(blueprint.stores.clone(), session_rx)
            .context("Failed to create store dispatcher")?;

        let active_stores = blueprint.stores.len();
        let dispatcher_handle = dispatcher.spawn();

        info!(active_stores, "Store dispatcher started");

        // Start Pipeline
        info!("Starting sample ingestion...");
        ingestion.start_all();
        let ingestion_rx = ingestion
            .take_receiver()
            .context("Failed to get ingestion receiver")?;
        let ingestion_metrics = ingestion.metrics();

        let max_sessions = self.config.max_sessions;

        info!(max_sessions = ?max_sessions, "Pipeline running");

        // Pipeline processing task
        let pipeline_task = async move {
            let mut stats = PipelineStats {
                active_feeds: 1,
                active_stores,
                ..Default::default()
            };

            while let Ok(sample) = ingestion_rx.recv().await {
                let channel = match sample.payload {
                    SamplePayload::Accel(_) => "accel",
                    SamplePayload::Gyro(_) => "gyro",
                };
                record_sample_received(sample.feed_id.as_str(), channel);
                stats.samples_processed += 1;

                let outcome = engine.push(&sample);
                record_snapshot(&outcome.snapshot);

                if let Some(e) = outcome.error {
                    warn!(error = %e, "Engine error, restarting capture");
                    if let Err(e) = engine.start() {
                        warn!(error = %e, "Engine restart failed, stopping pipeline");
                        break;
                    }
                }

                if let Some(session) = outcome.completed_session {
                    stats.sessions_completed += 1;
                    let summary = session.summary();
                    record_session_completed(&summary);
                    stats.capture_metrics.update(&summary);

                    info!(
                        session_id = %session.id,
                        duration_s = format!("{:.2}", session.duration()),
                        max_speed_mps = format!("{:.2}", session.max_speed_mps),
                        max_rpm = format!("{:.0}", session.max_rpm),
                        samples = session.sample_count,
                        "Session finalized"
                    );

                    if session_tx.send(session).await.is_err() {
                        warn!("Store dispatcher channel closed");
                        break;
                    }

                    // Check max sessions limit
                    if let Some(max) = max_sessions {
                        if stats.sessions_completed >= max {
                            info!(sessions = stats.sessions_completed, "Reached max sessions limit");
                            break;
                        }
                    }
                }
            }

            // Finalize an in-flight capture on the way out
            if let Some(session) = engine.stop() {
                stats.sessions_completed += 1;
                let summary = session.summary();
                record_session_completed(&summary);
                stats.capture_metrics.update(&summary);
                let _ = session_tx.send(session).await;
            }

            stats
        };

        // Run with optional timeout
        let stats = if let Some(timeout) = self.config.timeout {
            match tokio::time::timeout(timeout, pipeline_task).await {
                Ok(stats) => stats,
                Err(_) => {
                    warn!(timeout_secs = timeout.as_secs(), "Pipeline timed out");
                    PipelineStats::default()
                }
            }
        } else {
            pipeline_task.await
        };

        // Shutdown
        info!("Shutting down pipeline...");
        ingestion.stop_all();

        // Wait for the dispatcher to flush
        let _ = tokio::time::timeout(Duration::from_secs(5), dispatcher_handle).await;

        let mut final_stats = stats;
        final_stats.samples_dropped = ingestion_metrics.snapshot().samples_dropped;
        final_stats.duration = start_time.elapsed();

        info!(
            duration_secs = final_stats.duration.as_secs_f64(),
            sample_rate = format!("{:.1}", final_stats.sample_rate()),
            "Pipeline shutdown complete"
        );

        Ok(final_stats)
    }
}
