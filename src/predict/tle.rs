use std::fs;
use std::path::Path;

use crate::predict::error::PredictError;

/// A two-line element set, optionally preceded by a name line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrbitalElements {
    pub name: Option<String>,
    pub line1: String,
    pub line2: String,
}

impl OrbitalElements {
    pub fn new(name: Option<String>, line1: impl Into<String>, line2: impl Into<String>) -> Self {
        Self {
            name,
            line1: line1.into(),
            line2: line2.into(),
        }
    }

    /// Parse exactly one element set (2 or 3 non-empty lines).
    pub fn parse(text: &str) -> Result<Self, PredictError> {
        let lines: Vec<&str> = text
            .lines()
            .map(|l| l.trim())
            .filter(|l| !l.is_empty())
            .collect();

        match lines.as_slice() {
            [line1, line2] => Ok(Self::new(None, *line1, *line2)),
            [name, line1, line2] => Ok(Self::new(Some(name.to_string()), *line1, *line2)),
            _ => Err(PredictError::InvalidOrbitalElements(format!(
                "expected 2 or 3 lines, got {}",
                lines.len()
            ))),
        }
    }

    /// Catalog number from columns 3-7 of line 1, if present.
    pub fn norad_id(&self) -> Option<u32> {
        self.line1.get(2..7)?.trim().parse().ok()
    }

    /// Load an element set from a file that may hold several.
    ///
    /// Without `norad_id` the first entry is returned.
    pub fn from_file(path: &Path, norad_id: Option<u32>) -> Result<Self, PredictError> {
        let content = fs::read_to_string(path)?;
        let tle_error = |message: String| PredictError::TleFile {
            path: path.display().to_string(),
            message,
        };

        let mut entries = parse_multi_tle(&content).into_iter();
        match norad_id {
            None => entries
                .next()
                .ok_or_else(|| tle_error("no element sets found".into())),
            Some(id) => entries
                .find(|e| e.norad_id() == Some(id))
                .ok_or_else(|| tle_error(format!("no element set for NORAD {}", id))),
        }
    }
}

/// Split multi-satellite TLE content into entries, skipping unrecognised lines.
pub fn parse_multi_tle(content: &str) -> Vec<OrbitalElements> {
    let lines: Vec<&str> = content
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect();

    let mut result = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        if lines[i].starts_with("1 ") && i + 1 < lines.len() && lines[i + 1].starts_with("2 ") {
            result.push(OrbitalElements::new(None, lines[i], lines[i + 1]));
            i += 2;
        } else if i + 2 < lines.len()
            && lines[i + 1].starts_with("1 ")
            && lines[i + 2].starts_with("2 ")
        {
            result.push(OrbitalElements::new(
                Some(lines[i].to_string()),
                lines[i + 1],
                lines[i + 2],
            ));
            i += 3;
        } else {
            i += 1;
        }
    }

    result
}
