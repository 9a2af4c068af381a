//! Controller subsystem: what is plugged in and what it reports
//!
//! 1. [`profile`] - static registry of controller families
//! 2. [`detector`] - device identifier → profile classification
//! 3. [`backend`] - input device seam used by the lifecycle
//! 4. [`gilrs_backend`] - gilrs implementation of the seam
//!
//! ```text
//! gilrs ──► InputBackend ──► LiveInputSample
//!               │
//!               └── raw id ──► detect() ──► ControllerProfile
//! ```

pub mod backend;
pub mod detector;
pub mod gilrs_backend;
pub mod profile;
pub mod sample;

pub use backend::{
    DeviceEvent, DeviceHandle, DeviceInfo, HapticsError, InputBackend, RumbleEffect,
};
pub use detector::{detect, Detection};
pub use profile::{overlay_class, overlay_classes, ControllerKind, ControllerProfile};
pub use sample::LiveInputSample;
