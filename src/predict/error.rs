use thiserror::Error;

#[derive(Debug, Error)]
pub enum PredictError {
    #[error("Invalid orbital elements: {0}")]
    InvalidOrbitalElements(String),
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),
    #[error("TLE file {path}: {message}")]
    TleFile { path: String, message: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PredictError {
    /// Stable machine-readable code, used as the `error` field of API responses.
    pub fn code(&self) -> &'static str {
        match self {
            PredictError::InvalidOrbitalElements(_) => "invalid_orbital_elements",
            PredictError::InvalidParameters(_) => "invalid_parameters",
            PredictError::TleFile { .. } => "tle_file",
            PredictError::Io(_) => "io",
        }
    }
}

/// The propagator could not produce a position at the requested instant.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("Propagation unavailable: {reason}")]
pub struct PropagationUnavailable {
    pub reason: String,
}

impl PropagationUnavailable {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}
