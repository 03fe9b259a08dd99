use serde::{Deserialize, Serialize};

use musiquest_domain::{format_progress, PlaybackState};

/// Display-ready view of the playback position.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PositionReport {
    /// `"mm:ss / mm:ss"`
    pub label: String,
    /// Slider range is `0..=slider_max`; zero while the duration is unknown.
    pub slider_max: u64,
    pub slider_value: u64,
}

impl PositionReport {
    /// Fraction of the track played, in `0.0..=1.0`.
    pub fn ratio(&self) -> f64 {
        if self.slider_max == 0 {
            0.0
        } else {
            (self.slider_value as f64 / self.slider_max as f64).min(1.0)
        }
    }
}

pub struct PositionReporter;

impl PositionReporter {
    pub fn format(position_ms: u64, duration_ms: u64) -> String {
        format_progress(position_ms, duration_ms)
    }

    pub fn report(state: &PlaybackState) -> PositionReport {
        PositionReport {
            label: Self::format(state.position_ms, state.duration_ms),
            slider_max: state.duration_ms,
            slider_value: state.position_ms.min(state.duration_ms),
        }
    }
}
