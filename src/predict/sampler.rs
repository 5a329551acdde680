use chrono::{DateTime, Duration, Utc};

use crate::predict::look_angles::look_angles;
use crate::predict::types::Sample;
use crate::predict::window::{tick_count, TimeWindow};
use crate::predict::{GroundStation, Propagator};

/// Look angles at a single instant. Propagation failures become invalid samples.
pub fn sample_at<P: Propagator + ?Sized>(
    propagator: &P,
    station: &GroundStation,
    time: DateTime<Utc>,
) -> Sample {
    match propagator.propagate(time) {
        Ok(position) => {
            let angles = look_angles(position, station, propagator.sidereal_angle(time));
            if angles.elevation_deg.is_finite() && angles.azimuth_deg.is_finite() {
                Sample::from_look_angles(time, angles)
            } else {
                log::trace!("Non-finite look angles at {}", time);
                Sample::unavailable(time)
            }
        }
        Err(e) => {
            log::trace!("No position at {}: {}", time, e);
            Sample::unavailable(time)
        }
    }
}

/// Lazy, finite walk over `[start, end)` producing one sample per step.
pub struct Sampler<'a, P: ?Sized> {
    propagator: &'a P,
    station: &'a GroundStation,
    cursor: DateTime<Utc>,
    end: DateTime<Utc>,
    step: Duration,
}

impl<'a, P: Propagator + ?Sized> Sampler<'a, P> {
    pub fn new(propagator: &'a P, station: &'a GroundStation, window: &TimeWindow) -> Self {
        Self {
            propagator,
            station,
            cursor: window.start,
            end: window.end,
            step: window.step,
        }
    }
}

impl<P: Propagator + ?Sized> Iterator for Sampler<'_, P> {
    type Item = Sample;

    fn next(&mut self) -> Option<Sample> {
        if self.cursor >= self.end {
            return None;
        }
        let sample = sample_at(self.propagator, self.station, self.cursor);
        self.cursor = self.cursor.checked_add_signed(self.step).unwrap_or(self.end);
        Some(sample)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.cursor >= self.end {
            return (0, Some(0));
        }
        let n = tick_count(self.end - self.cursor, self.step) as usize;
        (n, Some(n))
    }
}
