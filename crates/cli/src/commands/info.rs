//! `info` command implementation.

use anyhow::{Context, Result};
use contracts::{EngineConfig, SessionSummary, SessionStore, StoreType};
use serde::Serialize;
use session_store::FileStore;
use tracing::{info, warn};

use crate::cli::InfoArgs;

/// Configuration info for JSON output
#[derive(Serialize)]
struct ConfigInfo {
    version: String,
    feed: FeedInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    engine: Option<EngineConfig>,
    stores: Vec<StoreInfo>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    sessions: Vec<SessionSummary>,
}

#[derive(Serialize)]
struct FeedInfo {
    id: String,
    accel_rate_hz: f64,
    gyro_rate_hz: f64,
    queue_capacity: usize,
}

#[derive(Serialize)]
struct StoreInfo {
    name: String,
    store_type: String,
}

/// Execute the `info` command
pub async fn run_info(args: &InfoArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration info");

    if !args.config.exists() {
        anyhow::bail!("Configuration file not found: {}", args.config.display());
    }

    let blueprint = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    let sessions = if args.sessions {
        list_stored_sessions(&blueprint).await
    } else {
        Vec::new()
    };

    if args.json {
        let config_info = build_config_info(&blueprint, args, sessions);
        let json =
            serde_json::to_string_pretty(&config_info).context("Failed to serialize config info")?;
        println!("{}", json);
    } else {
        print_config_info(&blueprint, args, &sessions);
    }

    Ok(())
}

/// Enumerate sessions from every configured file store
async fn list_stored_sessions(blueprint: &contracts::CaptureBlueprint) -> Vec<SessionSummary> {
    let mut sessions = Vec::new();

    for store_config in &blueprint.stores {
        if store_config.store_type != StoreType::File {
            continue;
        }

        match FileStore::from_params(&store_config.name, &store_config.params) {
            Ok(mut store) => match store.list().await {
                Ok(mut summaries) => sessions.append(&mut summaries),
                Err(e) => {
                    warn!(store = %store_config.name, error = %e, "Failed to list sessions");
                }
            },
            Err(e) => {
                warn!(store = %store_config.name, error = %e, "Failed to open store");
            }
        }
    }

    sessions.sort_by(|a, b| a.id.cmp(&b.id));
    sessions
}

fn build_config_info(
    blueprint: &contracts::CaptureBlueprint,
    args: &InfoArgs,
    sessions: Vec<SessionSummary>,
) -> ConfigInfo {
    let stores = blueprint
        .stores
        .iter()
        .map(|s| StoreInfo {
            name: s.name.clone(),
            store_type: format!("{:?}", s.store_type),
        })
        .collect();

    ConfigInfo {
        version: format!("{:?}", blueprint.version),
        feed: FeedInfo {
            id: blueprint.feed.id.to_string(),
            accel_rate_hz: blueprint.feed.accel_rate_hz,
            gyro_rate_hz: blueprint.feed.gyro_rate_hz,
            queue_capacity: blueprint.feed.queue_capacity,
        },
        engine: if args.engine {
            Some(blueprint.to_engine_config())
        } else {
            None
        },
        stores,
        sessions,
    }
}

fn print_config_info(
    blueprint: &contracts::CaptureBlueprint,
    args: &InfoArgs,
    sessions: &[SessionSummary],
) {
    println!("=== Motion Capture Configuration ===\n");

    println!("Feed");
    println!("  Id: {}", blueprint.feed.id);
    println!(
        "  Rates: accel {} Hz, gyro {} Hz",
        blueprint.feed.accel_rate_hz, blueprint.feed.gyro_rate_hz
    );
    println!("  Queue capacity: {}", blueprint.feed.queue_capacity);

    if args.engine {
        let engine = blueprint.to_engine_config();
        println!("\nEngine (effective)");
        println!("  Detector:");
        println!("    Window: {:.3}s", engine.detector.window_sec);
        println!(
            "    Margins: start {:.3} m/s², stop {:.3} m/s²",
            engine.detector.start_margin, engine.detector.stop_margin
        );
        println!(
            "    Debounce: start {:.2}s, stop {:.2}s",
            engine.detector.start_min_duration, engine.detector.stop_min_duration
        );
        println!("  Integrator:");
        println!("    Decay tau: {:.2}s", engine.integrator.decay_tau_sec);
        println!("    Bias retain: {:.3}", engine.integrator.bias_retain);
        println!("  Spin:");
        println!(
            "    Smoothing: {} samples, axis threshold {:.1} deg/s",
            engine.spin.smoothing_samples, engine.spin.axis_significance_dps
        );
        println!("  Orchestrator:");
        println!(
            "    Settle delay: {:.2}s, min logging: {:.2}s, continuous: {}",
            engine.orchestrator.settle_delay_sec,
            engine.orchestrator.min_logging_sec,
            engine.orchestrator.continuous
        );
    }

    println!("\nStores ({})", blueprint.stores.len());
    for store in &blueprint.stores {
        println!("  - {} ({:?})", store.name, store.store_type);
    }

    if args.sessions {
        println!("\nStored sessions ({})", sessions.len());
        for summary in sessions {
            println!(
                "  - {} start={:.2}s duration={:.2}s max_speed={:.2} m/s max_rpm={:.0}",
                summary.id, summary.start_time, summary.duration, summary.max_speed_mps,
                summary.max_rpm
            );
        }
    }

    println!();
}
