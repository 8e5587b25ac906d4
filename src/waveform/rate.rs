//! Coarse event-rate readout for the "taps per second / per minute" labels.
//!
//! This is a causal, O(1) estimator rather than a sliding average: each
//! elapsed second the pending count becomes the per-second figure and is added
//! to a running total, and every 15 s that total is multiplied by four to
//! extrapolate a per-minute figure. The per-minute value only changes at those
//! 15 s boundaries.
/// Length of one counting bucket.
pub const SECOND_SECS: f64 = 1.0;
/// Length of the extrapolation window.
pub const EXTRAPOLATION_WINDOW_SECS: f64 = 15.0;
/// `60 s / EXTRAPOLATION_WINDOW_SECS`.
pub const PER_MINUTE_FACTOR: u32 = 4;
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EventRate {
    pub per_second: u8,
    pub per_minute_estimate: u32,
}
#[derive(Clone, Debug, Default)]
pub struct RateEstimator {
    events_this_second: u32,
    last_second_boundary: f64,
    window_total: u32,
    last_minute_boundary: f64,
    rate: EventRate,
}
impl RateEstimator {
    /// Boundaries start at the stream epoch, `t = 0`.
    pub fn new() -> Self {
        Self::default()
    }
    /// Account for one sample. A nonzero `event` counts as one event.
    pub fn record(&mut self, event: u8, time: f64) {
        if time - self.last_second_boundary >= SECOND_SECS {
            self.rate.per_second = u8::try_from(self.events_this_second).unwrap_or(u8::MAX);
            self.window_total = self.window_total.saturating_add(self.events_this_second);
            self.events_this_second = 0;
            self.last_second_boundary = time;
        }
        if time - self.last_minute_boundary > EXTRAPOLATION_WINDOW_SECS {
            self.rate.per_minute_estimate = self.window_total.saturating_mul(PER_MINUTE_FACTOR);
            self.window_total = 0;
            self.last_minute_boundary = time;
        }
        if event != 0 {
            self.events_this_second += 1;
        }
    }
    pub fn current_rate(&self) -> EventRate {
        self.rate
    }
    /// Start counting again from `time`, e.g. after the stream restarts.
    pub fn reset(&mut self, time: f64) {
        *self = Self {
            last_second_boundary: time,
            last_minute_boundary: time,
            ..Self::default()
        };
    }
}
