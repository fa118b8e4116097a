use serde::{Deserialize, Serialize};

use crate::vision::Point2D;

// ---------------------------------------------------------------------------
// Staleness policy
// ---------------------------------------------------------------------------

/// How long a remembered marker stays usable after detection drops out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerMemoryPolicy {
    /// Keep converging on the last sighting indefinitely.
    #[default]
    Forever,
    /// Forget the marker after this many consecutive missed cycles.
    Cycles(u32),
}

// ---------------------------------------------------------------------------
// Effective marker for a cycle
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerSource {
    /// Seen in this frame.
    Live,
    /// Recalled; `age` is the number of consecutive missed cycles.
    Remembered { age: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectiveMarker {
    pub center: Point2D,
    pub source: MarkerSource,
}

// ---------------------------------------------------------------------------
// Last-known marker memory
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct MarkerMemory {
    policy: MarkerMemoryPolicy,
    last: Option<Point2D>,
    misses: u32,
}

impl MarkerMemory {
    pub fn new(policy: MarkerMemoryPolicy) -> Self {
        Self { policy, last: None, misses: 0 }
    }

    /// Feed this cycle's detection; returns the marker to steer on, if any.
    ///
    /// A live detection overwrites the memory. A miss falls back to the
    /// memory until the policy expires it.
    pub fn observe(&mut self, detected: Option<Point2D>) -> Option<EffectiveMarker> {
        if let Some(center) = detected {
            self.last = Some(center);
            self.misses = 0;
            return Some(EffectiveMarker { center, source: MarkerSource::Live });
        }

        let center = self.last?;
        self.misses = self.misses.saturating_add(1);
        if let MarkerMemoryPolicy::Cycles(limit) = self.policy {
            if self.misses > limit {
                tracing::warn!(
                    misses = self.misses,
                    limit,
                    "marker memory expired, dropping last sighting"
                );
                self.last = None;
                self.misses = 0;
                return None;
            }
        }
        Some(EffectiveMarker { center, source: MarkerSource::Remembered { age: self.misses } })
    }

    pub fn last(&self) -> Option<Point2D> {
        self.last
    }

    /// Consecutive missed cycles since the last live detection.
    pub fn misses(&self) -> u32 {
        self.misses
    }

    pub fn policy(&self) -> MarkerMemoryPolicy {
        self.policy
    }

    pub fn clear(&mut self) {
        self.last = None;
        self.misses = 0;
    }
}
