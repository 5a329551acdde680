use chrono::Duration;

use crate::predict::sampler::sample_at;
use crate::predict::types::Sample;
use crate::predict::visibility::Bracket;
use crate::predict::{GroundStation, Propagator};

pub const DEFAULT_TOLERANCE_MS: i64 = 1_000;
pub const DEFAULT_MAX_EVALUATIONS: u32 = 10;

/// Narrows a threshold crossing by bisection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundaryRefiner {
    pub tolerance: Duration,
    pub max_evaluations: u32,
}

impl Default for BoundaryRefiner {
    fn default() -> Self {
        Self {
            tolerance: Duration::milliseconds(DEFAULT_TOLERANCE_MS),
            max_evaluations: DEFAULT_MAX_EVALUATIONS,
        }
    }
}

impl BoundaryRefiner {
    pub fn new(tolerance: Duration, max_evaluations: u32) -> Self {
        Self {
            tolerance,
            max_evaluations,
        }
    }

    /// Returns the sample closest to the crossing that is still at or above
    /// `min_elevation_deg`.
    ///
    /// Works for both edges: the bracket's `above` side may come before or
    /// after its `below` side. Unavailable midpoints count as below.
    pub fn refine<P: Propagator + ?Sized>(
        &self,
        propagator: &P,
        station: &GroundStation,
        bracket: &Bracket,
        min_elevation_deg: f64,
    ) -> Sample {
        let mut above = bracket.above;
        let mut below = bracket.below;
        let mut evaluations = 0;

        while (above.time - below).abs() > self.tolerance && evaluations < self.max_evaluations {
            let mid = below + (above.time - below) / 2;
            let sample = sample_at(propagator, station, mid);
            evaluations += 1;

            if sample.is_visible(min_elevation_deg) {
                above = sample;
            } else {
                below = mid;
            }
        }

        log::trace!(
            "Refined crossing to {} after {} evaluations (width {} ms)",
            above.time,
            evaluations,
            (above.time - below).num_milliseconds().abs()
        );
        above
    }
}
