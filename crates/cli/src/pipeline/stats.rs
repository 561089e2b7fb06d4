//! Pipeline statistics and metrics.

use std::time::Duration;

use observability::CaptureMetricsAggregator;

/// Statistics from a pipeline run
#[derive(Debug, Clone, Default)]
pub struct PipelineStats {
    /// Total sessions finalized
    pub sessions_completed: u64,

    /// Total samples pushed through the engine
    pub samples_processed: u64,

    /// Total samples dropped by ingestion backpressure
    pub samples_dropped: u64,

    /// Total duration of the pipeline run
    pub duration: Duration,

    /// Number of feeds that were active
    pub active_feeds: usize,

    /// Number of stores that received sessions
    pub active_stores: usize,

    /// Capture metrics aggregator
    pub capture_metrics: CaptureMetricsAggregator,
}

impl PipelineStats {
    /// Samples per second throughput
    pub fn sample_rate(&self) -> f64 {
        if self.duration.as_secs_f64() > 0.0 {
            self.samples_processed as f64 / self.duration.as_secs_f64()
        } else {
            0.0
        }
    }

    /// Drop rate as percentage of all received samples
    #[allow(dead_code)]
    pub fn drop_rate(&self) -> f64 {
        let total = self.samples_processed + self.samples_dropped;
        if total > 0 {
            (self.samples_dropped as f64 / total as f64) * 100.0
        } else {
            0.0
        }
    }

    /// Print detailed summary
    pub fn print_summary(&self) {
        println!("\n=== Pipeline Statistics ===\n");

        println!("Overview");
        println!("  Duration: {:.2}s", self.duration.as_secs_f64());
        println!("  Sessions completed: {}", self.sessions_completed);
        println!("  Samples processed: {}", self.samples_processed);
        println!("  Samples dropped: {}", self.samples_dropped);
        println!("  Sample rate: {:.1} Hz", self.sample_rate());
        println!("  Active feeds: {}", self.active_feeds);
        println!("  Active stores: {}", self.active_stores);

        println!();
        print!("{}", self.capture_metrics.summary());
        println!();
    }
}
