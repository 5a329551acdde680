use serde::{Deserialize, Deserializer};
use std::path::Path;
use std::time::Duration as StdDuration;
use thiserror::Error;

use crate::predict::aggregator::DEFAULT_MAX_PASSES;
use crate::predict::refiner::{BoundaryRefiner, DEFAULT_MAX_EVALUATIONS, DEFAULT_TOLERANCE_MS};
use crate::predict::{
    GroundStation, PassFinder, DEFAULT_MAX_SAMPLES, DEFAULT_MIN_ELEVATION_DEG,
    DEFAULT_STEP_SECONDS,
};

const DEFAULT_DAYS: f64 = 7.0;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub station: StationConfig,
    #[serde(default)]
    pub web: WebConfig,
    #[serde(default)]
    pub predict: PredictConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StationConfig {
    pub name: Option<String>,
    pub coordinates: String,
    #[serde(default)]
    pub altitude_km: f64,
}

impl StationConfig {
    pub fn ground_station(&self) -> Result<GroundStation, ConfigError> {
        let station = GroundStation::from_coordinates(&self.coordinates, Some(self.altitude_km))
            .ok_or_else(|| {
                ConfigError::Invalid(format!("station coordinates '{}'", self.coordinates))
            })?;
        station
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        Ok(station)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

/// Pass search defaults. Every key is optional.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PredictConfig {
    #[serde(deserialize_with = "deserialize_duration")]
    pub step: StdDuration,
    pub min_elevation_deg: f64,
    pub max_passes: usize,
    pub days: f64,
    #[serde(deserialize_with = "deserialize_duration")]
    pub refine_tolerance: StdDuration,
    pub max_refine_evaluations: u32,
    pub max_samples: u64,
}

impl Default for PredictConfig {
    fn default() -> Self {
        Self {
            step: StdDuration::from_secs(DEFAULT_STEP_SECONDS as u64),
            min_elevation_deg: DEFAULT_MIN_ELEVATION_DEG,
            max_passes: DEFAULT_MAX_PASSES,
            days: DEFAULT_DAYS,
            refine_tolerance: StdDuration::from_millis(DEFAULT_TOLERANCE_MS as u64),
            max_refine_evaluations: DEFAULT_MAX_EVALUATIONS,
            max_samples: DEFAULT_MAX_SAMPLES,
        }
    }
}

impl PredictConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::Invalid(msg));
        if self.step.as_millis() == 0 {
            return invalid("predict.step must be at least 1ms".into());
        }
        if self.refine_tolerance.as_millis() == 0 {
            return invalid("predict.refine_tolerance must be at least 1ms".into());
        }
        if !self.min_elevation_deg.is_finite() || !(-90.0..=90.0).contains(&self.min_elevation_deg)
        {
            return invalid(format!(
                "predict.min_elevation_deg {} outside [-90, 90]",
                self.min_elevation_deg
            ));
        }
        if self.max_passes == 0 {
            return invalid("predict.max_passes must be at least 1".into());
        }
        if !self.days.is_finite() || self.days <= 0.0 {
            return invalid(format!("predict.days {} must be positive", self.days));
        }
        if self.max_refine_evaluations == 0 {
            return invalid("predict.max_refine_evaluations must be at least 1".into());
        }
        if self.max_samples == 0 {
            return invalid("predict.max_samples must be at least 1".into());
        }
        Ok(())
    }

    pub fn step(&self) -> chrono::Duration {
        to_chrono(self.step)
    }

    pub fn finder(&self) -> PassFinder {
        PassFinder {
            min_elevation_deg: self.min_elevation_deg,
            max_passes: self.max_passes,
            max_samples: self.max_samples,
            refiner: BoundaryRefiner::new(
                to_chrono(self.refine_tolerance),
                self.max_refine_evaluations,
            ),
        }
    }
}

impl Config {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(content)?;
        config.station.ground_station()?;
        config.predict.validate()?;
        Ok(config)
    }
}

fn to_chrono(duration: StdDuration) -> chrono::Duration {
    chrono::Duration::from_std(duration).unwrap_or(chrono::Duration::MAX)
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<StdDuration, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    humantime::parse_duration(s.trim()).map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_uses_defaults() {
        let config = Config::from_yaml(
            r#"
station:
  coordinates: "55.7558, 37.6173"
"#,
        )
        .unwrap();

        assert_eq!(config.web.bind, "0.0.0.0:8080");
        assert_eq!(config.predict, PredictConfig::default());
        assert_eq!(config.predict.step(), chrono::Duration::seconds(20));

        let station = config.station.ground_station().unwrap();
        assert_eq!(station.latitude_deg, 55.7558);
        assert_eq!(station.altitude_km, 0.0);
    }

    #[test]
    fn full_config_overrides_defaults() {
        let config = Config::from_yaml(
            r#"
station:
  name: Moscow
  coordinates: "55.7558,37.6173"
  altitude_km: 0.05
web:
  bind: "127.0.0.1:9000"
predict:
  step: 30s
  min_elevation_deg: 5
  max_passes: 100
  days: 2.5
  refine_tolerance: 250ms
  max_refine_evaluations: 12
  max_samples: 10000
"#,
        )
        .unwrap();

        assert_eq!(config.station.name.as_deref(), Some("Moscow"));
        assert_eq!(config.web.bind, "127.0.0.1:9000");
        assert_eq!(config.predict.step, StdDuration::from_secs(30));
        assert_eq!(config.predict.days, 2.5);

        let finder = config.predict.finder();
        assert_eq!(finder.min_elevation_deg, 5.0);
        assert_eq!(finder.max_passes, 100);
        assert_eq!(finder.max_samples, 10_000);
        assert_eq!(finder.refiner.tolerance, chrono::Duration::milliseconds(250));
        assert_eq!(finder.refiner.max_evaluations, 12);
    }

    #[test]
    fn rejects_invalid_values() {
        let bad_station = Config::from_yaml("station:\n  coordinates: \"95,0\"\n");
        assert!(matches!(bad_station, Err(ConfigError::Invalid(_))));

        let zero_step = Config::from_yaml(
            "station:\n  coordinates: \"0,0\"\npredict:\n  step: 0s\n",
        );
        assert!(matches!(zero_step, Err(ConfigError::Invalid(_))));

        let bad_duration = Config::from_yaml(
            "station:\n  coordinates: \"0,0\"\npredict:\n  step: soon\n",
        );
        assert!(matches!(bad_duration, Err(ConfigError::Yaml(_))));
    }
}
