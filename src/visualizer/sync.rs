//! Per-frame reconciliation of a live sample against the display
//!
//! Every accepted frame is authoritative: the pressed state of each element is
//! set from the current sample alone, so two identical samples always produce
//! identical screens. Elements missing from the display are counted and
//! skipped, never fatal.

use tracing::trace;

use crate::controller::{overlay_class, ControllerProfile, LiveInputSample};
use crate::display::RenderSurface;

/// Pixels a stick indicator moves at full deflection
pub const DEFAULT_STICK_SCALE: f32 = 10.0;

/// Outcome of one synchronization pass
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FrameReport {
    pub applied: usize,
    pub skipped: usize,
}

impl FrameReport {
    fn record<T, E>(&mut self, result: Result<T, E>) {
        match result {
            Ok(_) => self.applied += 1,
            Err(_) => self.skipped += 1,
        }
    }
}

/// `"<id>: <value>"` with two decimals
pub fn format_readout(id: &str, value: f32) -> String {
    format!("{}: {:.2}", id, value)
}

/// Applies `sample` to every element declared by `profile`
pub fn sync_frame<S: RenderSurface + ?Sized>(
    profile: &ControllerProfile,
    sample: &LiveInputSample,
    surface: &mut S,
    stick_scale: f32,
) -> FrameReport {
    let mut report = FrameReport::default();

    for (index, id) in profile.buttons.iter().enumerate() {
        let pressed = sample.pressed(index);
        report.record(surface.set_pressed(id, pressed));
        if let Some(class) = overlay_class(id) {
            report.record(surface.set_overlay_active(class, pressed));
        }
    }

    for (index, id) in profile.axes.iter().enumerate() {
        let value = sample.axis(index);
        report.record(surface.set_axis_readout(id, format_readout(id, value)));

        // stick indicators move in (horizontal, vertical) pairs
        if index % 2 == 0 {
            let x = value * stick_scale;
            let y = sample.axis(index + 1) * stick_scale;
            match overlay_class(id) {
                Some(class) => report.record(surface.translate_overlay(class, x, y)),
                None => report.skipped += 1,
            }
        }
    }

    trace!(
        "Frame synced for {}: {} applied, {} skipped",
        profile.name,
        report.applied,
        report.skipped
    );
    report
}
