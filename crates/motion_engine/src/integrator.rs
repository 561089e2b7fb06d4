//! Dead-reckoning velocity integrator
//!
//! Integrates bias-corrected, low-pass-filtered acceleration into a velocity
//! vector. Drift is bounded two ways: continuous exponential decay
//! (`v *= exp(-dt/tau)`, rate-independent) and hard zero-velocity resets on
//! ZUPT events from the detector's stationary timer.

use contracts::{clamp_dt, IntegratorConfig, Vector3};
use nalgebra::Vector3 as NaVector3;

/// Velocity state owned exclusively by the integrator.
///
/// All math is in SI units; callers convert g → m/s² once at ingestion.
pub struct VelocityIntegrator {
    config: IntegratorConfig,
    velocity: NaVector3<f64>,
    bias: NaVector3<f64>,
    filtered: NaVector3<f64>,
    seeded: bool,
}

impl VelocityIntegrator {
    pub fn new(config: IntegratorConfig) -> Self {
        Self {
            config,
            velocity: NaVector3::zeros(),
            bias: NaVector3::zeros(),
            filtered: NaVector3::zeros(),
            seeded: false,
        }
    }

    /// Process one acceleration sample (m/s²) and return the speed estimate.
    ///
    /// While `moving` is false the velocity only decays and the reported
    /// speed is forced to zero.
    pub fn on_sample(&mut self, accel: Vector3, dt: f64, moving: bool) -> f64 {
        let dt = clamp_dt(dt);
        let raw = NaVector3::new(accel.x, accel.y, accel.z);

        if !self.seeded {
            self.filtered = raw;
            self.seeded = true;
        } else {
            let a = self.config.lp_alpha;
            self.filtered = self.filtered * (1.0 - a) + raw * a;
        }

        let decay = (-dt / self.config.decay_tau_sec).exp();

        if !moving {
            self.velocity *= decay;
            return 0.0;
        }

        let corrected = self.filtered - self.bias;
        self.velocity += corrected * dt;
        self.velocity *= decay;

        self.speed()
    }

    /// Horizontal-plane speed (m/s), matching the detector's energy
    /// convention.
    pub fn speed(&self) -> f64 {
        self.velocity.xy().norm()
    }

    pub fn velocity(&self) -> Vector3 {
        Vector3::new(self.velocity.x, self.velocity.y, self.velocity.z)
    }

    /// Zero-velocity update: hard-reset velocity and fold the current
    /// filtered acceleration into the bias estimate.
    pub fn zupt(&mut self) {
        let retain = self.config.bias_retain;
        self.bias = self.bias * retain + self.filtered * (1.0 - retain);
        self.velocity = NaVector3::zeros();
    }

    /// Session start: zero velocity, keep the learned bias.
    pub fn reset_cycle(&mut self) {
        self.velocity = NaVector3::zeros();
    }

    /// Full reset, dropping the bias estimate too.
    pub fn reset(&mut self) {
        self.velocity = NaVector3::zeros();
        self.bias = NaVector3::zeros();
        self.filtered = NaVector3::zeros();
        self.seeded = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// No input smoothing and an effectively infinite decay constant, so
    /// integration can be checked against v = a*t directly.
    fn make_undamped() -> VelocityIntegrator {
        VelocityIntegrator::new(IntegratorConfig {
            lp_alpha: 1.0,
            decay_tau_sec: 1e12,
            bias_retain: 0.95,
        })
    }

    #[test]
    fn test_step_response_matches_a_times_t() {
        let mut integrator = make_undamped();
        let accel = Vector3::new(2.0, 0.0, 0.0);
        // 0.5s at 100 Hz
        let mut speed = 0.0;
        for _ in 0..50 {
            speed = integrator.on_sample(accel, 0.01, true);
        }
        assert!((speed - 1.0).abs() < 1e-6, "got {speed}");
    }

    #[test]
    fn test_decay_matches_closed_form() {
        let config = IntegratorConfig {
            lp_alpha: 1.0,
            decay_tau_sec: 0.5,
            bias_retain: 0.95,
        };
        let mut integrator = VelocityIntegrator::new(config);
        let a = 2.0;
        let dt = 0.01;
        let n = 50;
        let mut speed = 0.0;
        for _ in 0..n {
            speed = integrator.on_sample(Vector3::new(a, 0.0, 0.0), dt, true);
        }

        // Discrete recurrence v_{k+1} = (v_k + a*dt) * d with d = exp(-dt/tau)
        // has the closed form v_n = a*dt*d*(1 - d^n)/(1 - d).
        let d = (-dt / 0.5_f64).exp();
        let expected = a * dt * d * (1.0 - d.powi(n)) / (1.0 - d);
        assert!((speed - expected).abs() < 1e-9, "got {speed}, expected {expected}");
    }

    #[test]
    fn test_zupt_forces_exact_zero() {
        let mut integrator = make_undamped();
        for _ in 0..100 {
            integrator.on_sample(Vector3::new(3.0, 1.0, 0.0), 0.01, true);
        }
        assert!(integrator.speed() > 0.0);

        integrator.zupt();
        assert_eq!(integrator.speed(), 0.0);
        assert_eq!(integrator.velocity(), Vector3::ZERO);
    }

    #[test]
    fn test_zupt_learns_bias() {
        let mut integrator = make_undamped();
        let residual = Vector3::new(0.2, 0.0, 0.0);

        // Repeated stationary intervals with a constant residual converge
        // the bias toward it, shrinking drift between ZUPTs.
        let mut drifts = Vec::new();
        for _ in 0..40 {
            for _ in 0..20 {
                integrator.on_sample(residual, 0.01, true);
            }
            drifts.push(integrator.speed());
            integrator.zupt();
        }
        assert!(
            drifts.last().unwrap() < &(drifts[0] * 0.2),
            "drift did not shrink: first {} last {}",
            drifts[0],
            drifts.last().unwrap()
        );
    }

    #[test]
    fn test_not_moving_forces_zero_speed() {
        let mut integrator = make_undamped();
        for _ in 0..50 {
            integrator.on_sample(Vector3::new(2.0, 0.0, 0.0), 0.01, true);
        }
        let speed = integrator.on_sample(Vector3::new(2.0, 0.0, 0.0), 0.01, false);
        assert_eq!(speed, 0.0);
    }

    #[test]
    fn test_vertical_acceleration_excluded_from_speed() {
        let mut integrator = make_undamped();
        let mut speed = 0.0;
        for _ in 0..100 {
            speed = integrator.on_sample(Vector3::new(0.0, 0.0, 5.0), 0.01, true);
        }
        assert_eq!(speed, 0.0);
        // Vertical velocity still accumulates internally
        assert!(integrator.velocity().z > 4.0);
    }
}
