//! Input backend seam
//!
//! The lifecycle never talks to a gamepad library directly. It sees devices
//! through [`InputBackend`]: a queue of connect/disconnect notifications, a way
//! to find the first connected device, per-frame sampling and an optional
//! rumble capability. [`super::gilrs_backend::GilrsBackend`] is the production
//! implementation; tests substitute a mock.

use std::fmt;
use std::time::Duration;

use super::sample::LiveInputSample;

/// Opaque handle of a connected device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeviceHandle(pub usize);

impl fmt::Display for DeviceHandle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A connected device as seen by the backend
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceInfo {
    pub handle: DeviceHandle,
    /// Raw identifier string used for detection
    pub raw_id: String,
}

/// Hot-plug notification drained from the backend
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceEvent {
    Connected(DeviceInfo),
    Disconnected(DeviceHandle),
}

/// Dual-channel rumble parameters, magnitudes in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RumbleEffect {
    pub duration: Duration,
    pub strong_magnitude: f32,
    pub weak_magnitude: f32,
}

impl Default for RumbleEffect {
    fn default() -> Self {
        Self {
            duration: Duration::from_millis(100),
            strong_magnitude: 1.0,
            weak_magnitude: 1.0,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("Failed to initialize input backend: {0}")]
    InitializationError(String),
}

#[derive(Debug, thiserror::Error)]
pub enum HapticsError {
    #[error("Device {0} does not support force feedback")]
    Unsupported(DeviceHandle),

    #[error("Device {0} is not connected")]
    NotConnected(DeviceHandle),

    #[error("Rumble effect rejected: {0}")]
    EffectRejected(String),
}

/// Live device enumeration and query capability
#[cfg_attr(test, mockall::automock)]
pub trait InputBackend {
    /// Drains pending hot-plug notifications
    fn poll_events(&mut self) -> Vec<DeviceEvent>;

    /// First currently connected device, if any; consulted while a session
    /// is still unresolved
    fn first_connected(&self) -> Option<DeviceInfo>;

    /// Reads the current button and axis state, `None` if the device is gone
    fn sample(&self, handle: DeviceHandle) -> Option<LiveInputSample>;

    fn supports_rumble(&self, handle: DeviceHandle) -> bool;

    fn play_rumble(&mut self, handle: DeviceHandle, effect: RumbleEffect)
        -> Result<(), HapticsError>;
}
