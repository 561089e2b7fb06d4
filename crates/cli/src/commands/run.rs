//! `run` command implementation.

use anyhow::{Context, Result};
use std::time::Duration;
use tracing::{info, warn};

use crate::cli::RunArgs;
use crate::pipeline::{Pipeline, PipelineConfig};

/// Execute the `run` command
pub async fn run_pipeline(args: &RunArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration");

    // Validate config path
    if !args.config.exists() {
        anyhow::bail!("Configuration file not found: {}", args.config.display());
    }

    // Load and parse configuration
    let blueprint = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    info!(
        feed = %blueprint.feed.id,
        accel_rate_hz = blueprint.feed.accel_rate_hz,
        gyro_rate_hz = blueprint.feed.gyro_rate_hz,
        stores = blueprint.stores.len(),
        "Configuration loaded"
    );

    // Dry run - just validate and exit
    if args.dry_run {
        info!("Dry run mode - configuration is valid, exiting");
        print_config_summary(&blueprint);
        return Ok(());
    }

    // Build pipeline configuration
    let pipeline_config = PipelineConfig {
        blueprint,
        max_sessions: if args.max_sessions == 0 {
            None
        } else {
            Some(args.max_sessions)
        },
        timeout: if args.timeout == 0 {
            None
        } else {
            Some(Duration::from_secs(args.timeout))
        },
        buffer_size: args.buffer_size,
        metrics_port: if args.metrics_port == 0 {
            None
        } else {
            Some(args.metrics_port)
        },
        replay_path: args.replay.clone(),
        replay_speed: args.replay_speed,
    };

    // Create and run pipeline
    let pipeline = Pipeline::new(pipeline_config);

    // Setup graceful shutdown handler
    let shutdown_signal = setup_shutdown_signal();

    info!("Starting pipeline...");

    // Run pipeline with shutdown signal
    tokio::select! {
        result = pipeline.run() => {
            match result {
                Ok(stats) => {
                    info!(
                        sessions_completed = stats.sessions_completed,
                        samples_processed = stats.samples_processed,
                        duration_secs = stats.duration.as_secs_f64(),
                        "Pipeline completed successfully"
                    );

                    // Print detailed statistics
                    stats.print_summary();
                }
                Err(e) => {
                    return Err(e).context("Pipeline execution failed");
                }
            }
        }
        _ = shutdown_signal => {
            warn!("Received shutdown signal, stopping pipeline...");
        }
    }

    info!("Motion Capture finished");
    Ok(())
}

/// Setup Ctrl+C and SIGTERM signal handlers
async fn setup_shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Print configuration summary for dry-run mode
fn print_config_summary(blueprint: &contracts::CaptureBlueprint) {
    let engine = blueprint.to_engine_config();

    println!("\n=== Configuration Summary ===\n");
    println!("Feed:");
    println!("  Id: {}", blueprint.feed.id);
    println!(
        "  Rates: accel {} Hz, gyro {} Hz",
        blueprint.feed.accel_rate_hz, blueprint.feed.gyro_rate_hz
    );
    println!("  Drop policy: {:?}", blueprint.feed.drop_policy);

    println!("\nEngine:");
    println!(
        "  Detection margins: start {:.3} m/s², stop {:.3} m/s²",
        engine.detector.start_margin, engine.detector.stop_margin
    );
    println!(
        "  Debounce: start {:.2}s, stop {:.2}s",
        engine.detector.start_min_duration, engine.detector.stop_min_duration
    );
    println!("  Calibration warm-up: {:.1}s", engine.calibration.warmup_sec);
    println!(
        "  Continuous mode: {}",
        if engine.orchestrator.continuous { "on" } else { "off" }
    );

    if !blueprint.stores.is_empty() {
        println!("\nStores ({}):", blueprint.stores.len());
        for store in &blueprint.stores {
            println!("  - {} ({:?})", store.name, store.store_type);
        }
    }

    println!();
}
