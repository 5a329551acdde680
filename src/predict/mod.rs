pub mod aggregator;
mod error;
mod ground_station;
pub mod look_angles;
mod pass_finder;
mod propagator;
pub mod refiner;
pub mod sampler;
mod tle;
mod types;
pub mod visibility;
mod window;

pub use error::{PredictError, PropagationUnavailable};
pub use ground_station::{GroundStation, EARTH_EQUATORIAL_RADIUS_KM};
pub use pass_finder::{
    find_passes, PassFinder, DEFAULT_MAX_SAMPLES, DEFAULT_MIN_ELEVATION_DEG, DEFAULT_STEP_SECONDS,
};
pub use propagator::{Propagator, Sgp4Propagator};
pub use tle::{parse_multi_tle, OrbitalElements};
pub use types::{Pass, PassReport, Sample};
pub use window::{step_from_seconds, TimeWindow};
