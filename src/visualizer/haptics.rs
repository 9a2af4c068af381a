use tracing::{debug, info};

use crate::controller::{DeviceHandle, InputBackend, RumbleEffect};

/// User-invocable rumble for one device
///
/// Exists only while a rumble-capable device is connected. Firing is best
/// effort: a rejected effect is logged and otherwise ignored.
#[derive(Debug, Clone, PartialEq)]
pub struct HapticTrigger {
    device: DeviceHandle,
    effect: RumbleEffect,
}

impl HapticTrigger {
    pub fn new(device: DeviceHandle, effect: RumbleEffect) -> Self {
        Self { device, effect }
    }

    pub fn device(&self) -> DeviceHandle {
        self.device
    }

    /// Plays the effect, returns whether the backend accepted it
    pub fn fire<B: InputBackend + ?Sized>(&self, backend: &mut B) -> bool {
        match backend.play_rumble(self.device, self.effect) {
            Ok(()) => {
                info!("Rumble fired on {}", self.device);
                true
            }
            Err(e) => {
                debug!("Rumble on {} skipped: {}", self.device, e);
                false
            }
        }
    }
}
