//! Trailing energy window
//!
//! Bounded ring buffer of squared horizontal-acceleration magnitudes with an
//! incrementally maintained sum of squares. Sized to approximate a fixed time
//! window regardless of sample rate.

use ringbuf::{traits::*, HeapRb};

/// Ring buffer of squared magnitudes with O(1) windowed RMS.
///
/// Invariants:
/// - buffer length ≤ capacity
/// - `sum_of_squares` equals the sum of buffer contents at all times,
///   maintained on push/evict rather than recomputed per tick
pub struct EnergyWindow {
    buf: HeapRb<f64>,
    sum_of_squares: f64,
}

impl std::fmt::Debug for EnergyWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnergyWindow")
            .field("len", &self.buf.occupied_len())
            .field("sum_of_squares", &self.sum_of_squares)
            .finish()
    }
}

impl EnergyWindow {
    /// Create a window holding `capacity` samples.
    pub fn new(capacity: usize) -> Self {
        Self {
            buf: HeapRb::new(capacity.max(1)),
            sum_of_squares: 0.0,
        }
    }

    /// Create a window approximating `window_sec` at `sample_rate_hz`.
    pub fn for_rate(window_sec: f64, sample_rate_hz: f64) -> Self {
        let capacity = (window_sec * sample_rate_hz).round() as usize;
        Self::new(capacity)
    }

    /// Push one squared magnitude, evicting the oldest entry when full.
    pub fn push(&mut self, squared: f64) {
        if self.buf.is_full() {
            if let Some(evicted) = self.buf.try_pop() {
                self.sum_of_squares -= evicted;
            }
        }
        let _ = self.buf.try_push(squared);
        self.sum_of_squares += squared;
        // Running subtraction accumulates float error over long sessions
        if self.sum_of_squares < 0.0 {
            self.sum_of_squares = 0.0;
        }
    }

    /// Windowed RMS: `sqrt(sum_of_squares / count)`. Zero while empty.
    pub fn rms(&self) -> f64 {
        let count = self.buf.occupied_len();
        if count == 0 {
            return 0.0;
        }
        (self.sum_of_squares / count as f64).sqrt()
    }

    pub fn len(&self) -> usize {
        self.buf.occupied_len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.buf.is_full()
    }

    /// Drop all contents and reset the running sum.
    pub fn clear(&mut self) {
        self.buf.clear();
        self.sum_of_squares = 0.0;
    }
}
