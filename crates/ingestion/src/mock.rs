//! Mock feed source
//!
//! Generates a synthetic wrist-IMU stream for development without a
//! device. The stream cycles through a rest phase (long enough for
//! calibration) and a short throw burst with horizontal acceleration
//! and spin around one axis.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use contracts::{ImuSample, SampleCallback, SampleSource};
use rand::Rng;
use tracing::debug;

/// Mock feed configuration
#[derive(Debug, Clone)]
pub struct MockFeedConfig {
    /// Feed ID
    pub feed_id: String,

    /// Accelerometer rate (Hz)
    pub accel_rate_hz: f64,

    /// Gyroscope rate (Hz)
    pub gyro_rate_hz: f64,

    /// Rest phase duration before and after each burst (seconds)
    pub rest_sec: f64,

    /// Burst duration (seconds)
    pub burst_sec: f64,

    /// Peak burst acceleration on the x axis (g)
    pub burst_accel_g: f64,

    /// Peak burst angular rate around the z axis (deg/s)
    pub burst_spin_dps: f64,

    /// Accelerometer noise amplitude (g)
    pub noise_g: f64,

    /// Gyroscope noise amplitude (deg/s)
    pub noise_dps: f64,
}

impl Default for MockFeedConfig {
    fn default() -> Self {
        Self {
            feed_id: "mock_imu".to_string(),
            accel_rate_hz: 100.0,
            gyro_rate_hz: 200.0,
            rest_sec: 3.0,
            burst_sec: 0.5,
            burst_accel_g: 0.25,
            burst_spin_dps: 600.0,
            noise_g: 0.005,
            noise_dps: 2.0,
        }
    }
}

/// Throw profile feed
///
/// Emits accel samples in g (gravity included on z) and gyro samples in
/// deg/s, with timestamps derived from the sample counter so replayed
/// runs are deterministic up to noise.
pub struct ThrowProfileSource {
    config: MockFeedConfig,
    listening: Arc<AtomicBool>,
}

impl ThrowProfileSource {
    /// Create a new mock feed
    pub fn new(config: MockFeedConfig) -> Self {
        Self {
            config,
            listening: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Create with default profile and the given feed ID
    pub fn with_feed_id(feed_id: &str) -> Self {
        Self::new(MockFeedConfig {
            feed_id: feed_id.to_string(),
            ..Default::default()
        })
    }

    /// Burst envelope at time `t` within the cycle, in [0, 1].
    ///
    /// Half-sine over the burst window, zero during rest.
    fn envelope(config: &MockFeedConfig, t: f64) -> f64 {
        let cycle = config.rest_sec + config.burst_sec;
        let t_c = t % cycle;
        if t_c < config.rest_sec {
            0.0
        } else {
            let frac = (t_c - config.rest_sec) / config.burst_sec;
            (std::f64::consts::PI * frac).sin()
        }
    }
}

impl SampleSource for ThrowProfileSource {
    fn feed_id(&self) -> &str {
        &self.config.feed_id
    }

    fn listen(&self, callback: SampleCallback) {
        if self.listening.swap(true, Ordering::SeqCst) {
            return;
        }

        let config = self.config.clone();
        let listening = self.listening.clone();

        debug!(
            feed_id = %config.feed_id,
            accel_rate_hz = config.accel_rate_hz,
            gyro_rate_hz = config.gyro_rate_hz,
            "mock feed started"
        );

        std::thread::spawn(move || {
            let accel_dt = 1.0 / config.accel_rate_hz;
            let gyro_per_tick = (config.gyro_rate_hz / config.accel_rate_hz).round().max(1.0) as u32;
            let gyro_dt = accel_dt / gyro_per_tick as f64;
            let mut rng = rand::rng();
            let mut tick: u64 = 0;

            while listening.load(Ordering::Relaxed) {
                let ts = tick as f64 * accel_dt;
                let env = Self::envelope(&config, ts);

                let ax = env * config.burst_accel_g
                    + rng.random_range(-config.noise_g..=config.noise_g);
                let ay = rng.random_range(-config.noise_g..=config.noise_g);
                let az = 1.0 + rng.random_range(-config.noise_g..=config.noise_g);
                callback(ImuSample::accel(config.feed_id.as_str(), ts, ax, ay, az));

                for k in 0..gyro_per_tick {
                    let gts = ts + k as f64 * gyro_dt;
                    let genv = Self::envelope(&config, gts);
                    let gx = rng.random_range(-config.noise_dps..=config.noise_dps);
                    let gy = rng.random_range(-config.noise_dps..=config.noise_dps);
                    let gz = genv * config.burst_spin_dps
                        + rng.random_range(-config.noise_dps..=config.noise_dps);
                    callback(ImuSample::gyro(config.feed_id.as_str(), gts, gx, gy, gz));
                }

                tick += 1;
                std::thread::sleep(Duration::from_secs_f64(accel_dt));
            }

            debug!(feed_id = %config.feed_id, "mock feed stopped");
        });
    }

    fn stop(&self) {
        self.listening.store(false, Ordering::SeqCst);
    }

    fn is_listening(&self) -> bool {
        self.listening.load(Ordering::Relaxed)
    }
}
