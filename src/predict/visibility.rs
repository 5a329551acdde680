use chrono::{DateTime, Utc};

use crate::predict::types::Sample;

/// Two instants straddling the elevation threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bracket {
    /// Sample at or above the threshold.
    pub above: Sample,
    /// Instant known to be below the threshold (or unavailable).
    pub below: DateTime<Utc>,
}

/// How a pass began.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rise {
    /// Already visible at the first sample of the window; no rising edge was observed.
    WindowStart(Sample),
    Crossing(Bracket),
}

/// How a pass ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Set {
    Crossing(Bracket),
    /// Still visible when the window closed.
    WindowEnd {
        end: DateTime<Utc>,
        last_visible: Sample,
    },
}

/// A pass whose boundaries are known only to sample granularity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PassCandidate {
    pub rise: Rise,
    pub set: Set,
    pub max_elevation_deg: f64,
    pub max_elevation_time: DateTime<Utc>,
    pub azimuth_at_max_deg: f64,
}

/// Pass opened on a rising edge, not yet closed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProvisionalPass {
    pub rise: Rise,
    pub max_elevation_deg: f64,
    pub max_elevation_time: DateTime<Utc>,
    pub azimuth_at_max_deg: f64,
    pub last_visible: Sample,
}

impl ProvisionalPass {
    fn open(rise: Rise, sample: Sample) -> Self {
        Self {
            rise,
            max_elevation_deg: sample.elevation_deg,
            max_elevation_time: sample.time,
            azimuth_at_max_deg: sample.azimuth_deg,
            last_visible: sample,
        }
    }

    fn observe(&mut self, sample: Sample) {
        // strict comparison keeps the earliest time of a tied maximum
        if sample.elevation_deg > self.max_elevation_deg {
            self.max_elevation_deg = sample.elevation_deg;
            self.max_elevation_time = sample.time;
            self.azimuth_at_max_deg = sample.azimuth_deg;
        }
        self.last_visible = sample;
    }

    fn close(self, set: Set, min_elevation_deg: f64) -> Option<PassCandidate> {
        if self.max_elevation_deg < min_elevation_deg {
            log::debug!(
                "Dropping pass peaking at {:.3} deg below floor {:.3} deg",
                self.max_elevation_deg,
                min_elevation_deg
            );
            return None;
        }
        Some(PassCandidate {
            rise: self.rise,
            set,
            max_elevation_deg: self.max_elevation_deg,
            max_elevation_time: self.max_elevation_time,
            azimuth_at_max_deg: self.azimuth_at_max_deg,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VisibilityState {
    BelowThreshold,
    Visible(ProvisionalPass),
}

/// Visibility state threaded through the sample stream.
///
/// Each [`step`](Self::step) consumes the machine and returns its successor,
/// together with a pass candidate whenever a falling edge closes one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibilityMachine {
    min_elevation_deg: f64,
    state: VisibilityState,
    previous: Option<Sample>,
}

impl VisibilityMachine {
    pub fn new(min_elevation_deg: f64) -> Self {
        Self {
            min_elevation_deg,
            state: VisibilityState::BelowThreshold,
            previous: None,
        }
    }

    pub fn state(&self) -> &VisibilityState {
        &self.state
    }

    pub fn step(self, sample: Sample) -> (Self, Option<PassCandidate>) {
        let min = self.min_elevation_deg;
        let visible = sample.is_visible(min);

        let (state, emitted) = match (self.state, visible) {
            (VisibilityState::BelowThreshold, false) => (VisibilityState::BelowThreshold, None),
            (VisibilityState::BelowThreshold, true) => {
                let rise = match self.previous {
                    None => Rise::WindowStart(sample),
                    Some(prev) => Rise::Crossing(Bracket {
                        above: sample,
                        below: prev.time,
                    }),
                };
                (VisibilityState::Visible(ProvisionalPass::open(rise, sample)), None)
            }
            (VisibilityState::Visible(mut pass), true) => {
                pass.observe(sample);
                (VisibilityState::Visible(pass), None)
            }
            (VisibilityState::Visible(pass), false) => {
                let set = Set::Crossing(Bracket {
                    above: pass.last_visible,
                    below: sample.time,
                });
                (VisibilityState::BelowThreshold, pass.close(set, min))
            }
        };

        let next = Self {
            min_elevation_deg: min,
            state,
            previous: Some(sample),
        };
        (next, emitted)
    }

    /// Close a pass left open at the end of the window.
    pub fn finish(self, window_end: DateTime<Utc>) -> Option<PassCandidate> {
        match self.state {
            VisibilityState::Visible(pass) => {
                let set = Set::WindowEnd {
                    end: window_end,
                    last_visible: pass.last_visible,
                };
                pass.close(set, self.min_elevation_deg)
            }
            VisibilityState::BelowThreshold => None,
        }
    }
}
