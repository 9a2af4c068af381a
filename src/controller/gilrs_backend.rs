//! gilrs implementation of [`InputBackend`]
//!
//! The driver is a two-state machine: it is created in `Initializing`, scans
//! the gamepads that are already plugged in, and moves to `Polling` where it
//! serves the lifecycle. gilrs only updates its cached gamepad state while
//! events are drained, so [`InputBackend::poll_events`] has to run before every
//! [`InputBackend::sample`].
//!
//! Samples use the standard gamepad index layout (face buttons, shoulders,
//! triggers, select/start, stick clicks, d-pad, guide) with 17 buttons and 4
//! axes. gilrs reports "up" as positive Y; the driver flips both Y axes so
//! positive values point down the screen.

use std::collections::VecDeque;

use gilrs::ff::{BaseEffect, BaseEffectType, Effect, EffectBuilder, Repeat, Replay, Ticks};
use gilrs::{Axis, Button, Event, EventType, Gamepad, GamepadId, Gilrs};
use statum::{machine, state};
use tracing::{debug, error, info, warn};

use super::backend::{
    BackendError, DeviceEvent, DeviceHandle, DeviceInfo, HapticsError, InputBackend,
    RumbleEffect,
};
use super::sample::LiveInputSample;

const STANDARD_BUTTONS: [Button; 17] = [
    Button::South,
    Button::East,
    Button::West,
    Button::North,
    Button::LeftTrigger,
    Button::RightTrigger,
    Button::LeftTrigger2,
    Button::RightTrigger2,
    Button::Select,
    Button::Start,
    Button::LeftThumb,
    Button::RightThumb,
    Button::DPadUp,
    Button::DPadDown,
    Button::DPadLeft,
    Button::DPadRight,
    Button::Mode,
];

// (axis, sign) pairs; Y is flipped to screen orientation
const STANDARD_AXES: [(Axis, f32); 4] = [
    (Axis::LeftStickX, 1.0),
    (Axis::LeftStickY, -1.0),
    (Axis::RightStickX, 1.0),
    (Axis::RightStickY, -1.0),
];

#[state]
#[derive(Debug, Clone)]
pub enum DriverState {
    Initializing,
    Polling,
}

#[machine]
pub struct InputDriver<S: DriverState> {
    // Gilrs context
    gilrs: Gilrs,

    // Notifications not yet handed to the lifecycle
    pending: VecDeque<DeviceEvent>,

    // Running rumble effect; dropping it stops playback
    active_effect: Option<Effect>,
}

/// The driver as used by the application
pub type GilrsBackend = InputDriver<Polling>;

/// Creates and initializes the gilrs driver
pub fn open() -> Result<GilrsBackend, BackendError> {
    InputDriver::create()?.initialize()
}

impl InputDriver<Initializing> {
    pub fn create() -> Result<Self, BackendError> {
        info!("Initializing gilrs controller interface");
        let gilrs = match Gilrs::new() {
            Ok(g) => {
                info!("Successfully initialized gilrs");
                g
            }
            Err(e) => {
                error!("Failed to initialize gilrs: {}", e);
                return Err(BackendError::InitializationError(e.to_string()));
            }
        };

        Ok(Self::new(gilrs, VecDeque::new(), None))
    }

    /// Announces an already plugged-in gamepad and switches to `Polling`
    pub fn initialize(mut self) -> Result<InputDriver<Polling>, BackendError> {
        let gamepads: Vec<(GamepadId, Gamepad<'_>)> = self.gilrs.gamepads().collect();

        if gamepads.is_empty() {
            warn!("No gamepad connected, waiting for hot-plug");
        } else {
            info!("Found {} gamepads:", gamepads.len());
            for (idx, (id, gamepad)) in gamepads.iter().enumerate() {
                info!(
                    "  [{}] ID: {}, Name: {}, OS name: {}, FF: {}",
                    idx,
                    id,
                    gamepad.name(),
                    gamepad.os_name(),
                    gamepad.is_ff_supported()
                );
            }
            // first available device wins
            let (id, gamepad) = &gamepads[0];
            let info = device_info(*id, gamepad);
            self.pending.push_back(DeviceEvent::Connected(info));
        }

        debug!("Input driver initialized, transitioning to Polling state");
        Ok(self.transition())
    }
}

impl InputDriver<Polling> {
    fn gamepad(&self, handle: DeviceHandle) -> Option<Gamepad<'_>> {
        self.gilrs
            .gamepads()
            .find(|(id, _)| usize::from(*id) == handle.0)
            .map(|(_, gamepad)| gamepad)
    }
}

impl InputBackend for InputDriver<Polling> {
    fn poll_events(&mut self) -> Vec<DeviceEvent> {
        while let Some(Event { id, event, .. }) = self.gilrs.next_event() {
            match event {
                EventType::Connected => match self.gilrs.connected_gamepad(id) {
                    Some(gamepad) => {
                        let info = device_info(id, &gamepad);
                        info!("Gamepad connected: {} ({})", info.raw_id, info.handle);
                        self.pending.push_back(DeviceEvent::Connected(info));
                    }
                    None => warn!("Connect event for gamepad {} without a device", id),
                },
                EventType::Disconnected => {
                    warn!("Gamepad {} disconnected", id);
                    self.pending
                        .push_back(DeviceEvent::Disconnected(DeviceHandle(usize::from(id))));
                }
                // state changes are read back through `sample`
                _ => {}
            }
        }
        self.pending.drain(..).collect()
    }

    fn first_connected(&self) -> Option<DeviceInfo> {
        self.gilrs
            .gamepads()
            .next()
            .map(|(id, gamepad)| device_info(id, &gamepad))
    }

    fn sample(&self, handle: DeviceHandle) -> Option<LiveInputSample> {
        let gamepad = self.gamepad(handle)?;
        let buttons = STANDARD_BUTTONS
            .iter()
            .map(|button| gamepad.is_pressed(*button))
            .collect();
        let axes = STANDARD_AXES
            .iter()
            .map(|(axis, sign)| gamepad.value(*axis) * sign)
            .collect();
        Some(LiveInputSample::new(buttons, axes))
    }

    fn supports_rumble(&self, handle: DeviceHandle) -> bool {
        self.gamepad(handle)
            .map(|gamepad| gamepad.is_ff_supported())
            .unwrap_or(false)
    }

    fn play_rumble(
        &mut self,
        handle: DeviceHandle,
        effect: RumbleEffect,
    ) -> Result<(), HapticsError> {
        let id = {
            let gamepad = self
                .gamepad(handle)
                .ok_or(HapticsError::NotConnected(handle))?;
            if !gamepad.is_ff_supported() {
                return Err(HapticsError::Unsupported(handle));
            }
            gamepad.id()
        };

        let duration = Ticks::from_ms(effect.duration.as_millis() as u32);
        let scheduling = || Replay {
            play_for: duration,
            ..Default::default()
        };
        let ff = EffectBuilder::new()
            .add_effect(BaseEffect {
                kind: BaseEffectType::Strong {
                    magnitude: to_magnitude(effect.strong_magnitude),
                },
                scheduling: scheduling(),
                envelope: Default::default(),
            })
            .add_effect(BaseEffect {
                kind: BaseEffectType::Weak {
                    magnitude: to_magnitude(effect.weak_magnitude),
                },
                scheduling: scheduling(),
                envelope: Default::default(),
            })
            .repeat(Repeat::For(duration))
            .gamepads(&[id])
            .finish(&mut self.gilrs)
            .map_err(|e| HapticsError::EffectRejected(e.to_string()))?;

        ff.play()
            .map_err(|e| HapticsError::EffectRejected(e.to_string()))?;
        debug!("Rumble started on {} for {:?}", handle, effect.duration);
        self.active_effect = Some(ff);
        Ok(())
    }
}

fn device_info(id: GamepadId, gamepad: &Gamepad<'_>) -> DeviceInfo {
    let raw_id = if gamepad.os_name().is_empty() {
        gamepad.name()
    } else {
        gamepad.os_name()
    };
    DeviceInfo {
        handle: DeviceHandle(usize::from(id)),
        raw_id: raw_id.to_string(),
    }
}

fn to_magnitude(value: f32) -> u16 {
    (value.clamp(0.0, 1.0) * u16::MAX as f32).round() as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn magnitude_scales_to_full_range() {
        assert_eq!(to_magnitude(1.0), u16::MAX);
        assert_eq!(to_magnitude(0.0), 0);
        assert_eq!(to_magnitude(2.5), u16::MAX);
        assert_eq!(to_magnitude(-1.0), 0);
    }

    #[test]
    fn standard_layout_starts_with_face_buttons() {
        assert_eq!(STANDARD_BUTTONS.len(), 17);
        assert_eq!(STANDARD_BUTTONS[0], Button::South);
        assert_eq!(STANDARD_BUTTONS[16], Button::Mode);
    }

    #[test]
    fn vertical_axes_are_flipped() {
        let flipped: Vec<Axis> = STANDARD_AXES
            .iter()
            .filter(|(_, sign)| *sign < 0.0)
            .map(|(axis, _)| *axis)
            .collect();
        assert_eq!(flipped, vec![Axis::LeftStickY, Axis::RightStickY]);
    }
}
