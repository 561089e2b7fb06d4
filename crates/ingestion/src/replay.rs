//! Replay feed source
//!
//! Replays a recorded JSONL capture (one `ImuSample` per line) through
//! the `SampleSource` interface. Pacing follows the recorded timestamps
//! scaled by a speed factor, so the engine sees the same dt sequence it
//! saw live.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use contracts::{ImuSample, SampleCallback, SampleSource};
use tracing::{debug, warn};

use crate::error::{IngestionError, Result};

/// Load all samples from a JSONL replay file.
///
/// Blank lines are skipped. A malformed line fails the whole load with
/// its 1-based line number.
pub fn load_samples(path: &Path) -> Result<Vec<ImuSample>> {
    let content = std::fs::read_to_string(path)?;
    let mut samples = Vec::new();

    for (idx, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let sample: ImuSample =
            serde_json::from_str(line).map_err(|e| IngestionError::ReplayParse {
                line: idx + 1,
                message: e.to_string(),
            })?;
        samples.push(sample);
    }

    Ok(samples)
}

/// Replay feed
///
/// `speed` scales playback pacing: 2.0 plays twice as fast, 0.0 plays
/// as fast as the consumer accepts. Sample timestamps are forwarded
/// unchanged either way.
pub struct ReplayFeedSource {
    feed_id: String,
    path: PathBuf,
    speed: f64,
    listening: Arc<AtomicBool>,
}

impl ReplayFeedSource {
    /// Create a new replay feed
    pub fn new(feed_id: &str, path: impl Into<PathBuf>, speed: f64) -> Self {
        Self {
            feed_id: feed_id.to_string(),
            path: path.into(),
            speed,
            listening: Arc::new(AtomicBool::new(false)),
        }
    }
}

impl SampleSource for ReplayFeedSource {
    fn feed_id(&self) -> &str {
        &self.feed_id
    }

    fn listen(&self, callback: SampleCallback) {
        if self.listening.swap(true, Ordering::SeqCst) {
            return;
        }

        let feed_id = self.feed_id.clone();
        let path = self.path.clone();
        let speed = self.speed;
        let listening = self.listening.clone();

        std::thread::spawn(move || {
            let samples = match load_samples(&path) {
                Ok(samples) => samples,
                Err(e) => {
                    warn!(feed_id = %feed_id, error = %e, "replay load failed");
                    listening.store(false, Ordering::SeqCst);
                    return;
                }
            };

            debug!(
                feed_id = %feed_id,
                count = samples.len(),
                speed,
                "replay started"
            );

            let mut last_ts: Option<f64> = None;
            for sample in samples {
                if !listening.load(Ordering::Relaxed) {
                    break;
                }

                if speed > 0.0 {
                    if let Some(prev) = last_ts {
                        let gap = (sample.timestamp - prev).max(0.0) / speed;
                        if gap > 0.0 {
                            std::thread::sleep(Duration::from_secs_f64(gap));
                        }
                    }
                    last_ts = Some(sample.timestamp);
                }

                callback(sample);
            }

            debug!(feed_id = %feed_id, "replay finished");
            listening.store(false, Ordering::SeqCst);
        });
    }

    fn stop(&self) {
        self.listening.store(false, Ordering::SeqCst);
    }

    fn is_listening(&self) -> bool {
        self.listening.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::SamplePayload;
    use std::io::Write;
    use std::sync::Mutex;

    fn write_replay_file(lines: &[&str]) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".jsonl")
            .tempfile()
            .unwrap();
        for line in lines {
            writeln!(file, "{line}").unwrap();
        }
        file.flush().unwrap();
        file
    }

    fn accel_line(ts: f64) -> String {
        let sample = ImuSample::accel("wrist_imu", ts, 0.01, 0.0, 1.0);
        serde_json::to_string(&sample).unwrap()
    }

    #[test]
    fn test_load_samples() {
        let lines = [accel_line(0.01), accel_line(0.02)];
        let file = write_replay_file(&[&lines[0], "", &lines[1]]);

        let samples = load_samples(file.path()).unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].timestamp, 0.01);
        assert!(matches!(samples[1].payload, SamplePayload::Accel(_)));
    }

    #[test]
    fn test_load_preserves_exact_timestamps() {
        // 100 Hz timestamps like 41 * 0.01 are not exactly representable;
        // the parsed value must be bit-identical to the written one or a
        // replayed capture diverges from the live run
        let lines: Vec<String> = (1..=100).map(|i| accel_line(i as f64 * 0.01)).collect();
        let refs: Vec<&str> = lines.iter().map(|s| s.as_str()).collect();
        let file = write_replay_file(&refs);

        let samples = load_samples(file.path()).unwrap();
        assert_eq!(samples.len(), 100);
        for (i, sample) in samples.iter().enumerate() {
            let want = (i + 1) as f64 * 0.01;
            assert_eq!(
                sample.timestamp.to_bits(),
                want.to_bits(),
                "timestamp drifted at line {}: {} vs {}",
                i + 1,
                sample.timestamp,
                want
            );
        }
    }

    #[test]
    fn test_load_reports_line_number() {
        let good = accel_line(0.01);
        let file = write_replay_file(&[&good, "not json"]);

        let err = load_samples(file.path()).unwrap_err();
        match err {
            IngestionError::ReplayParse { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_replay_forwards_all_samples() {
        let lines: Vec<String> = (1..=5).map(|i| accel_line(i as f64 * 0.01)).collect();
        let refs: Vec<&str> = lines.iter().map(|s| s.as_str()).collect();
        let file = write_replay_file(&refs);

        let source = ReplayFeedSource::new("replay", file.path(), 0.0);
        let collected = Arc::new(Mutex::new(Vec::new()));
        let sink = collected.clone();

        source.listen(Arc::new(move |sample| {
            sink.lock().unwrap().push(sample.timestamp);
        }));

        // As-fast-as-possible replay of 5 samples finishes well within this.
        std::thread::sleep(Duration::from_millis(200));
        assert!(!source.is_listening());

        let timestamps = collected.lock().unwrap();
        assert_eq!(timestamps.len(), 5);
        assert_eq!(timestamps[4], 0.05);
    }

    #[test]
    fn test_missing_file_stops_listening() {
        let source = ReplayFeedSource::new("replay", "/nonexistent/capture.jsonl", 1.0);
        source.listen(Arc::new(|_| {}));
        std::thread::sleep(Duration::from_millis(100));
        assert!(!source.is_listening());
    }
}
