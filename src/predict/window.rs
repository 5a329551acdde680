use chrono::{DateTime, Duration, Utc};

use crate::predict::error::PredictError;

/// Half-open search interval `[start, end)` walked at a fixed step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub step: Duration,
}

impl TimeWindow {
    pub fn new(
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        step: Duration,
    ) -> Result<Self, PredictError> {
        if start >= end {
            return Err(PredictError::InvalidParameters(format!(
                "window start {} is not before end {}",
                start, end
            )));
        }
        if step < Duration::milliseconds(1) {
            return Err(PredictError::InvalidParameters(
                "step must be at least 1 ms".into(),
            ));
        }
        Ok(Self { start, end, step })
    }

    /// Window of `days` (possibly fractional) starting at `start`.
    pub fn from_days(
        start: DateTime<Utc>,
        days: f64,
        step: Duration,
    ) -> Result<Self, PredictError> {
        if !days.is_finite() || days <= 0.0 {
            return Err(PredictError::InvalidParameters(format!(
                "window length {} days must be positive",
                days
            )));
        }
        let length = Duration::try_milliseconds((days * 86_400_000.0).round() as i64)
            .ok_or_else(|| PredictError::InvalidParameters("window too long".into()))?;
        let end = start
            .checked_add_signed(length)
            .ok_or_else(|| PredictError::InvalidParameters("window end out of range".into()))?;
        Self::new(start, end, step)
    }

    pub fn length(&self) -> Duration {
        self.end - self.start
    }

    /// Number of ticks in `[start, end)`.
    pub fn sample_count(&self) -> u64 {
        tick_count(self.length(), self.step)
    }
}

/// Ticks of `step` needed to cover `length`, in whole milliseconds.
/// A step longer than the interval still yields the single tick at its start.
pub(crate) fn tick_count(length: Duration, step: Duration) -> u64 {
    let length = length.num_milliseconds().max(0) as u64;
    let step = step.num_milliseconds().max(1) as u64;
    length.div_ceil(step)
}

pub fn step_from_seconds(step_seconds: f64) -> Result<Duration, PredictError> {
    if !step_seconds.is_finite() || step_seconds <= 0.0 {
        return Err(PredictError::InvalidParameters(format!(
            "step {} s must be positive",
            step_seconds
        )));
    }
    let millis = (step_seconds * 1000.0).round() as i64;
    if millis < 1 {
        return Err(PredictError::InvalidParameters(format!(
            "step {} s is below 1 ms",
            step_seconds
        )));
    }
    Duration::try_milliseconds(millis)
        .ok_or_else(|| PredictError::InvalidParameters("step too large".into()))
}
