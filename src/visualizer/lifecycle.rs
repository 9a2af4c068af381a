//! Lifecycle Manager - session state machine and frame chain ownership
//!
//! ```text
//!            Connected                 profile resolved
//!   Idle ──────────────► Detecting ──────────────────► Active ──┐
//!    ▲                       │  ▲  (retried each tick)    │     │ tick
//!    │  Disconnected /       │  └─────────────────────────┘     │
//!    └── Teardown ◄──────────┴─────────────────────────────◄────┘
//! ```
//!
//! All mutation goes through [`Visualizer::dispatch`] (hot-plug, teardown and
//! user requests) and [`Visualizer::tick`] (frame callback), both called from
//! the UI thread. The `armed` flag is the frame chain: `tick` reports whether
//! the host should schedule another frame, and teardown clears the flag so a
//! late callback finds nothing to do and does not re-arm.

use std::time::Duration;

use chrono::{DateTime, Local};
use tracing::{debug, info, trace, warn};

use super::haptics::HapticTrigger;
use super::sync::{sync_frame, FrameReport};
use super::throttle::FrameThrottle;
use super::VisualizerSettings;
use crate::controller::{
    detect, ControllerProfile, DeviceEvent, DeviceHandle, DeviceInfo, Detection, InputBackend,
};
use crate::display::{DisplayRenderer, RenderSurface, UNKNOWN_CONTROLLER_LABEL};

/// The two window teardown notifications; both clean up identically
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeardownReason {
    /// The user asked to close the window
    CloseRequested,
    /// The application is exiting
    Exit,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LifecycleEvent {
    Connected(DeviceInfo),
    Disconnected(DeviceHandle),
    Teardown(TeardownReason),
    /// The user pressed the vibrate affordance
    HapticRequested,
}

impl From<DeviceEvent> for LifecycleEvent {
    fn from(event: DeviceEvent) -> Self {
        match event {
            DeviceEvent::Connected(info) => LifecycleEvent::Connected(info),
            DeviceEvent::Disconnected(handle) => LifecycleEvent::Disconnected(handle),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoopState {
    Idle,
    Detecting {
        device: DeviceInfo,
    },
    Active {
        device: DeviceInfo,
        profile: &'static ControllerProfile,
    },
}

impl LoopState {
    pub fn device(&self) -> Option<&DeviceInfo> {
        match self {
            LoopState::Idle => None,
            LoopState::Detecting { device } | LoopState::Active { device, .. } => Some(device),
        }
    }

    pub fn profile(&self) -> Option<&'static ControllerProfile> {
        match self {
            LoopState::Active { profile, .. } => Some(*profile),
            _ => None,
        }
    }
}

/// One running visualizer: a backend, a display and the session between them
pub struct Visualizer<B, R> {
    backend: B,
    renderer: R,
    settings: VisualizerSettings,
    state: LoopState,
    throttle: FrameThrottle,
    armed: bool,
    haptics: Option<HapticTrigger>,
    connected_at: Option<DateTime<Local>>,
    last_report: FrameReport,
}

impl<B, R> Visualizer<B, R>
where
    B: InputBackend,
    R: DisplayRenderer + RenderSurface,
{
    pub fn new(backend: B, mut renderer: R, settings: VisualizerSettings) -> Self {
        renderer.reset();
        Self {
            backend,
            renderer,
            throttle: FrameThrottle::from_fps(settings.target_fps),
            settings,
            state: LoopState::Idle,
            armed: false,
            haptics: None,
            connected_at: None,
            last_report: FrameReport::default(),
        }
    }

    pub fn state(&self) -> &LoopState {
        &self.state
    }

    pub fn active_profile(&self) -> Option<&'static ControllerProfile> {
        self.state.profile()
    }

    /// Whether the frame chain is currently scheduled
    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn connected_at(&self) -> Option<DateTime<Local>> {
        self.connected_at
    }

    pub fn last_report(&self) -> FrameReport {
        self.last_report
    }

    pub fn haptic_trigger(&self) -> Option<&HapticTrigger> {
        self.haptics.as_ref()
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// Drains backend hot-plug notifications into [`Visualizer::dispatch`]
    pub fn pump_events(&mut self) {
        for event in self.backend.poll_events() {
            self.dispatch(event.into());
        }
    }

    pub fn dispatch(&mut self, event: LifecycleEvent) {
        debug!("Dispatching {:?} in state {:?}", event, self.state_name());
        match event {
            LifecycleEvent::Connected(device) => self.on_connect(device),
            LifecycleEvent::Disconnected(handle) => self.on_disconnect(handle),
            LifecycleEvent::Teardown(reason) => {
                info!("Teardown requested: {:?}", reason);
                self.end_session();
            }
            LifecycleEvent::HapticRequested => self.trigger_haptics(),
        }
    }

    /// Frame callback; returns whether another frame should be scheduled
    ///
    /// `now` is the host's monotonic frame timestamp.
    pub fn tick(&mut self, now: Duration) -> bool {
        if !self.armed {
            trace!("Frame callback after teardown ignored");
            return false;
        }
        if !self.throttle.accept(now) {
            return true;
        }

        if matches!(self.state, LoopState::Detecting { .. }) && !self.retry_detection() {
            trace!("Device still unresolved, nothing to sync");
            return true;
        }

        let LoopState::Active { device, profile } = &self.state else {
            warn!("Armed frame loop without a session, disarming");
            self.armed = false;
            return false;
        };
        let profile: &'static ControllerProfile = *profile;

        match self.backend.sample(device.handle) {
            Some(sample) => {
                self.last_report = sync_frame(
                    profile,
                    &sample,
                    &mut self.renderer,
                    self.settings.stick_scale,
                );
            }
            None => debug!("Device {} returned no sample this frame", device.handle),
        }
        true
    }

    fn on_connect(&mut self, device: DeviceInfo) {
        info!("Controller connected: '{}' ({})", device.raw_id, device.handle);
        let handle = device.handle;

        self.renderer.reset();
        self.haptics = None;
        self.state = LoopState::Detecting { device };
        self.connected_at = Some(Local::now());

        if !self.resolve_profile() {
            info!("No profile matches the connected device");
            self.renderer.show_label(UNKNOWN_CONTROLLER_LABEL);
        }

        self.init_haptics(handle);

        self.throttle.reset();
        self.armed = true;
    }

    fn on_disconnect(&mut self, handle: DeviceHandle) {
        match self.state.device().map(|device| device.handle) {
            Some(current) if current == handle => {
                info!("Controller {} disconnected", handle);
                self.end_session();
            }
            Some(current) => debug!(
                "Ignoring disconnect of {} while {} is active",
                handle, current
            ),
            None => debug!("Ignoring disconnect of {} while idle", handle),
        }
    }

    /// Detecting → Active when the detector knows the device
    fn resolve_profile(&mut self) -> bool {
        let LoopState::Detecting { device } = &self.state else {
            return self.state.profile().is_some();
        };
        let Detection::Known(profile) = detect(&device.raw_id) else {
            return false;
        };

        let device = device.clone();
        self.activate(device, profile);
        true
    }

    /// Per-frame detection while unresolved: the session device first, then
    /// whichever device the backend currently lists first
    fn retry_detection(&mut self) -> bool {
        if self.resolve_profile() {
            return true;
        }
        let Some(candidate) = self.backend.first_connected() else {
            return false;
        };
        let Detection::Known(profile) = detect(&candidate.raw_id) else {
            return false;
        };

        let previous = self.state.device().map(|device| device.handle);
        info!(
            "Adopting {} ('{}') as session device",
            candidate.handle, candidate.raw_id
        );
        let handle = candidate.handle;
        self.activate(candidate, profile);
        if previous != Some(handle) {
            self.haptics = None;
            self.renderer.set_haptic_trigger(false);
            self.init_haptics(handle);
        }
        true
    }

    fn activate(&mut self, device: DeviceInfo, profile: &'static ControllerProfile) {
        info!("Detected {} for '{}'", profile.name, device.raw_id);
        self.renderer.render(profile);
        if let Some(asset_ref) = profile.visual_asset {
            self.renderer.load_visual_asset(asset_ref);
        }
        self.state = LoopState::Active { device, profile };
    }

    fn init_haptics(&mut self, handle: DeviceHandle) {
        if !self.settings.haptics_enabled {
            debug!("Haptics disabled in configuration");
            return;
        }
        if !self.backend.supports_rumble(handle) {
            debug!("Device {} has no rumble capability", handle);
            return;
        }

        let trigger = HapticTrigger::new(handle, self.settings.rumble);
        self.renderer.set_haptic_trigger(true);
        // confirmation pulse
        trigger.fire(&mut self.backend);
        self.haptics = Some(trigger);
    }

    fn trigger_haptics(&mut self) {
        match &self.haptics {
            Some(trigger) => {
                trigger.fire(&mut self.backend);
            }
            None => debug!("Haptic request without a rumble-capable device"),
        }
    }

    fn end_session(&mut self) {
        self.state = LoopState::Idle;
        self.haptics = None;
        self.connected_at = None;
        self.armed = false;
        self.last_report = FrameReport::default();
        self.renderer.reset();
    }

    fn state_name(&self) -> &'static str {
        match self.state {
            LoopState::Idle => "Idle",
            LoopState::Detecting { .. } => "Detecting",
            LoopState::Active { .. } => "Active",
        }
    }
}
