//! Visualizer core: frame pacing, sample → display reconciliation and the
//! connect/disconnect lifecycle.
//!
//! ```text
//! host frame ──► Visualizer::tick ──► FrameThrottle ──► sync_frame ──► Display
//! hot-plug   ──► Visualizer::dispatch ──► LoopState transitions
//! ```

pub mod haptics;
pub mod lifecycle;
pub mod sync;
pub mod throttle;

use std::time::Duration;

use crate::config::VisualizerConfig;
use crate::controller::RumbleEffect;

pub use lifecycle::{LifecycleEvent, LoopState, TeardownReason, Visualizer};
pub use sync::{sync_frame, FrameReport, DEFAULT_STICK_SCALE};
pub use throttle::FrameThrottle;

/// Runtime knobs of the core loop
#[derive(Debug, Clone, PartialEq)]
pub struct VisualizerSettings {
    /// Upper bound on full update passes per second
    pub target_fps: u32,
    /// Stick indicator travel in pixels at full deflection
    pub stick_scale: f32,
    pub haptics_enabled: bool,
    pub rumble: RumbleEffect,
}

impl Default for VisualizerSettings {
    fn default() -> Self {
        Self {
            target_fps: 30,
            stick_scale: DEFAULT_STICK_SCALE,
            haptics_enabled: true,
            rumble: RumbleEffect::default(),
        }
    }
}

impl From<&VisualizerConfig> for VisualizerSettings {
    fn from(config: &VisualizerConfig) -> Self {
        Self {
            target_fps: config.frame_loop.target_fps,
            stick_scale: config.frame_loop.stick_scale,
            haptics_enabled: config.haptics.enabled,
            rumble: RumbleEffect {
                duration: Duration::from_millis(config.haptics.duration_ms),
                strong_magnitude: config.haptics.strong_magnitude,
                weak_magnitude: config.haptics.weak_magnitude,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_default_settings() {
        let settings = VisualizerSettings::from(&VisualizerConfig::default());
        assert_eq!(settings, VisualizerSettings::default());
    }
}
