use chrono::{DateTime, Duration, Utc};

use crate::predict::aggregator::{PassAggregator, DEFAULT_MAX_PASSES};
use crate::predict::error::PredictError;
use crate::predict::refiner::BoundaryRefiner;
use crate::predict::sampler::{sample_at, Sampler};
use crate::predict::tle::OrbitalElements;
use crate::predict::types::{Pass, PassReport};
use crate::predict::visibility::{PassCandidate, Rise, Set, VisibilityMachine};
use crate::predict::window::TimeWindow;
use crate::predict::{GroundStation, Propagator, Sgp4Propagator};

pub const DEFAULT_MIN_ELEVATION_DEG: f64 = 10.0;
pub const DEFAULT_STEP_SECONDS: i64 = 20;
pub const DEFAULT_MAX_SAMPLES: u64 = 500_000;

/// Pass search settings. Each search builds its own sweep; nothing is shared
/// between calls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PassFinder {
    pub min_elevation_deg: f64,
    pub max_passes: usize,
    pub max_samples: u64,
    pub refiner: BoundaryRefiner,
}

impl Default for PassFinder {
    fn default() -> Self {
        Self {
            min_elevation_deg: DEFAULT_MIN_ELEVATION_DEG,
            max_passes: DEFAULT_MAX_PASSES,
            max_samples: DEFAULT_MAX_SAMPLES,
            refiner: BoundaryRefiner::default(),
        }
    }
}

impl PassFinder {
    pub fn with_min_elevation(mut self, min_elevation_deg: f64) -> Self {
        self.min_elevation_deg = min_elevation_deg;
        self
    }

    pub fn with_max_passes(mut self, max_passes: usize) -> Self {
        self.max_passes = max_passes;
        self
    }

    fn validate(&self, station: &GroundStation, window: &TimeWindow) -> Result<(), PredictError> {
        station.validate()?;
        let min = self.min_elevation_deg;
        if !min.is_finite() || !(-90.0..=90.0).contains(&min) {
            return Err(PredictError::InvalidParameters(format!(
                "minimum elevation {} outside [-90, 90]",
                min
            )));
        }
        if self.max_passes == 0 {
            return Err(PredictError::InvalidParameters("max passes must be at least 1".into()));
        }
        if window.start >= window.end || window.step < Duration::milliseconds(1) {
            return Err(PredictError::InvalidParameters(
                "window must be non-empty with a step of at least 1 ms".into(),
            ));
        }
        let samples = window.sample_count();
        if samples > self.max_samples {
            return Err(PredictError::InvalidParameters(format!(
                "window needs {} samples, limit is {}",
                samples, self.max_samples
            )));
        }
        Ok(())
    }

    /// Find all passes of the object over `station` inside `window`.
    pub fn find<P: Propagator + ?Sized>(
        &self,
        propagator: &P,
        station: &GroundStation,
        window: &TimeWindow,
    ) -> Result<PassReport, PredictError> {
        self.validate(station, window)?;

        log::debug!(
            "Searching passes {} .. {} every {} ms ({} samples, floor {} deg)",
            window.start,
            window.end,
            window.step.num_milliseconds(),
            window.sample_count(),
            self.min_elevation_deg
        );

        let mut aggregator = PassAggregator::new();
        let mut machine = VisibilityMachine::new(self.min_elevation_deg);
        let mut valid_samples = 0usize;
        let mut total_samples = 0usize;

        for sample in Sampler::new(propagator, station, window) {
            total_samples += 1;
            if sample.valid {
                valid_samples += 1;
            }

            let (next, candidate) = machine.step(sample);
            machine = next;

            if let Some(candidate) = candidate {
                aggregator.add(self.complete(propagator, station, candidate));
                // one beyond the cap is enough to know the output is truncated
                if aggregator.len() > self.max_passes {
                    break;
                }
            }
        }

        if aggregator.len() <= self.max_passes {
            if let Some(candidate) = machine.finish(window.end) {
                aggregator.add(self.complete(propagator, station, candidate));
            }
        }

        if aggregator.is_empty() {
            log::debug!("No passes found in {} samples", total_samples);
        }
        if valid_samples == 0 && total_samples > 0 {
            log::warn!(
                "No position available for any of {} samples; object may have decayed",
                total_samples
            );
        }

        Ok(aggregator.finalize(self.max_passes))
    }

    fn complete<P: Propagator + ?Sized>(
        &self,
        propagator: &P,
        station: &GroundStation,
        candidate: PassCandidate,
    ) -> Pass {
        let min = self.min_elevation_deg;

        let (aos, aos_azimuth_deg, truncated_start) = match candidate.rise {
            Rise::WindowStart(first) => (first.time, first.azimuth_deg, true),
            Rise::Crossing(bracket) => {
                let refined = self.refiner.refine(propagator, station, &bracket, min);
                (refined.time, refined.azimuth_deg, false)
            }
        };

        let (los, los_azimuth_deg, truncated_end) = match candidate.set {
            Set::WindowEnd { end, last_visible } => {
                // bearing at the window end itself, falling back to the last visible sample
                let at_end = sample_at(propagator, station, end);
                let azimuth = if at_end.valid {
                    at_end.azimuth_deg
                } else {
                    last_visible.azimuth_deg
                };
                (end, azimuth, true)
            }
            Set::Crossing(bracket) => {
                let refined = self.refiner.refine(propagator, station, &bracket, min);
                (refined.time, refined.azimuth_deg, false)
            }
        };

        let pass = Pass {
            aos,
            los,
            max_elevation_deg: candidate.max_elevation_deg,
            max_elevation_time: candidate.max_elevation_time,
            azimuth_at_max_deg: candidate.azimuth_at_max_deg,
            aos_azimuth_deg,
            los_azimuth_deg,
            duration_seconds: seconds_between(aos, los),
            truncated_start,
            truncated_end,
        };

        log::debug!(
            "Pass {} .. {} peaking at {:.2} deg",
            pass.aos,
            pass.los,
            pass.max_elevation_deg
        );
        pass
    }
}

/// Find passes of an element set with default settings and the given floor.
pub fn find_passes(
    elements: &OrbitalElements,
    station: &GroundStation,
    window: &TimeWindow,
    min_elevation_deg: f64,
) -> Result<PassReport, PredictError> {
    let propagator = Sgp4Propagator::initialize(elements)?;
    PassFinder::default()
        .with_min_elevation(min_elevation_deg)
        .find(&propagator, station, window)
}

fn seconds_between(start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
    ((end - start).num_milliseconds() as f64 / 1000.0).max(0.0)
}
