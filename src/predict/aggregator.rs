use crate::predict::types::{Pass, PassReport};

pub const DEFAULT_MAX_PASSES: usize = 50;

/// Collects finished passes in chronological order.
#[derive(Debug, Default)]
pub struct PassAggregator {
    passes: Vec<Pass>,
}

impl PassAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, pass: Pass) {
        debug_assert!(
            self.passes.last().map_or(true, |last| last.los <= pass.aos),
            "passes must arrive in order without overlap"
        );
        self.passes.push(pass);
    }

    pub fn len(&self) -> usize {
        self.passes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }

    /// Keep the first `max_count` passes.
    pub fn finalize(mut self, max_count: usize) -> PassReport {
        let truncated = self.passes.len() > max_count;
        if truncated {
            log::info!(
                "Capping output at {} passes ({} found)",
                max_count,
                self.passes.len()
            );
            self.passes.truncate(max_count);
        }
        PassReport {
            pass_count: self.passes.len(),
            passes: self.passes,
            truncated,
        }
    }
}
