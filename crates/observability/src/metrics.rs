//! Capture pipeline metrics collection
//!
//! Records engine snapshots and finalized sessions, and aggregates them in
//! memory for end-of-run summaries.

use contracts::{EngineSnapshot, SessionSummary};
use metrics::{counter, gauge, histogram};

/// Record one finalized session.
///
/// Call this whenever the engine hands out a completed session.
///
/// # Example
///
/// ```ignore
/// use observability::metrics::record_session_completed;
///
/// if let Some(session) = outcome.completed_session {
///     record_session_completed(&session.summary());
/// }
/// ```
pub fn record_session_completed(summary: &SessionSummary) {
    counter!("motion_capture_sessions_total").increment(1);

    histogram!("motion_capture_session_duration_s").record(summary.duration);
    histogram!("motion_capture_session_max_speed_mps").record(summary.max_speed_mps);
    histogram!("motion_capture_session_max_rpm").record(summary.max_rpm);

    gauge!("motion_capture_last_session_samples").set(summary.sample_count as f64);
}

/// Record one engine snapshot (per processed event).
pub fn record_snapshot(snapshot: &EngineSnapshot) {
    gauge!("motion_capture_speed_mps").set(snapshot.speed_mps);
    gauge!("motion_capture_rpm").set(snapshot.rpm);
    gauge!("motion_capture_motion_detected").set(if snapshot.motion_detected { 1.0 } else { 0.0 });
}

/// Record one received sample on a feed channel ("accel" or "gyro").
pub fn record_sample_received(feed_id: &str, channel: &str) {
    counter!(
        "motion_capture_samples_received_total",
        "feed_id" => feed_id.to_string(),
        "channel" => channel.to_string()
    )
    .increment(1);
}

/// Record a session persist attempt per store.
pub fn record_session_stored(store_name: &str, success: bool) {
    let status = if success { "success" } else { "failure" };
    counter!(
        "motion_capture_sessions_stored_total",
        "store" => store_name.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// Capture metrics aggregator
///
/// Aggregates metrics in memory for statistics and summary output.
#[derive(Debug, Clone, Default)]
pub struct CaptureMetricsAggregator {
    /// Total finalized sessions
    pub total_sessions: u64,

    /// Total samples captured across sessions
    pub total_samples: u64,

    /// Per-session peak speed statistics (m/s)
    pub peak_speed_stats: RunningStats,

    /// Per-session peak spin statistics (RPM)
    pub peak_rpm_stats: RunningStats,

    /// Session duration statistics (seconds)
    pub duration_stats: RunningStats,
}

impl CaptureMetricsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one finalized session into the aggregate.
    pub fn update(&mut self, summary: &SessionSummary) {
        self.total_sessions += 1;
        self.total_samples += summary.sample_count;
        self.peak_speed_stats.push(summary.max_speed_mps);
        self.peak_rpm_stats.push(summary.max_rpm);
        self.duration_stats.push(summary.duration);
    }

    /// Produce a summary report.
    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            total_sessions: self.total_sessions,
            total_samples: self.total_samples,
            peak_speed_mps: StatsSummary::from(&self.peak_speed_stats),
            peak_rpm: StatsSummary::from(&self.peak_rpm_stats),
            duration_s: StatsSummary::from(&self.duration_stats),
        }
    }

    /// Reset all statistics.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Metrics summary
#[derive(Debug, Clone, Default)]
pub struct MetricsSummary {
    pub total_sessions: u64,
    pub total_samples: u64,
    pub peak_speed_mps: StatsSummary,
    pub peak_rpm: StatsSummary,
    pub duration_s: StatsSummary,
}

impl std::fmt::Display for MetricsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Capture Metrics Summary ===")?;
        writeln!(f, "Total sessions: {}", self.total_sessions)?;
        writeln!(f, "Total samples: {}", self.total_samples)?;
        writeln!(f, "Peak speed (m/s): {}", self.peak_speed_mps)?;
        writeln!(f, "Peak spin (RPM): {}", self.peak_rpm)?;
        writeln!(f, "Duration (s): {}", self.duration_s)?;
        Ok(())
    }
}

/// Statistics summary
#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count(),
            min: stats.min(),
            max: stats.max(),
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.3}, max={:.3}, mean={:.3}, std={:.3} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// Online statistics calculator (Welford's algorithm)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a new value
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);

            let delta = value - self.mean;
            self.mean += delta / self.count as f64;
            let delta2 = value - self.mean;
            self.m2 += delta * delta2;
        }
    }

    /// Sample count
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Mean, 0 when empty
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// Sample variance
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    /// Standard deviation
    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    /// Minimum, 0 when empty
    pub fn min(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.min
        }
    }

    /// Maximum, 0 when empty
    pub fn max(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.max
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_running_stats() {
        let mut stats = RunningStats::default();

        stats.push(1.0);
        stats.push(2.0);
        stats.push(3.0);
        stats.push(4.0);
        stats.push(5.0);

        assert_eq!(stats.count(), 5);
        assert!((stats.mean() - 3.0).abs() < 1e-10);
        assert!((stats.min() - 1.0).abs() < 1e-10);
        assert!((stats.max() - 5.0).abs() < 1e-10);
        assert!((stats.variance() - 2.5).abs() < 1e-10);
    }

    #[test]
    fn test_empty_stats_are_zero() {
        let stats = RunningStats::new();
        assert_eq!(stats.mean(), 0.0);
        assert_eq!(stats.min(), 0.0);
        assert_eq!(stats.max(), 0.0);
    }

    #[test]
    fn test_aggregator_update() {
        let mut aggregator = CaptureMetricsAggregator::new();

        let summary = SessionSummary {
            id: "session-00001".to_string(),
            start_time: 3.2,
            duration: 1.4,
            sample_count: 140,
            max_speed_mps: 2.1,
            avg_speed_mps: 0.9,
            max_rpm: 250.0,
            avg_rpm: 110.0,
        };

        aggregator.update(&summary);

        assert_eq!(aggregator.total_sessions, 1);
        assert_eq!(aggregator.total_samples, 140);
        assert!((aggregator.peak_speed_stats.max() - 2.1).abs() < 1e-10);
        assert!((aggregator.duration_stats.mean() - 1.4).abs() < 1e-10);
    }

    #[test]
    fn test_summary_display() {
        let mut aggregator = CaptureMetricsAggregator::new();
        aggregator.update(&SessionSummary {
            id: "s".to_string(),
            start_time: 0.0,
            duration: 1.0,
            sample_count: 10,
            max_speed_mps: 1.0,
            avg_speed_mps: 0.5,
            max_rpm: 60.0,
            avg_rpm: 30.0,
        });

        let output = format!("{}", aggregator.summary());
        assert!(output.contains("Total sessions: 1"));
        assert!(output.contains("Peak speed"));
    }
}
