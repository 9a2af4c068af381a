//! # Display - retained element table behind the visualizer window
//!
//! The lifecycle and the frame synchronizer never draw anything. They talk to
//! two narrow traits:
//!
//! - [`DisplayRenderer`]: coarse operations (build placeholders for a profile,
//!   show a label, load artwork, reset)
//! - [`RenderSurface`]: per-element updates addressed by profile id or overlay
//!   class
//!
//! [`Display`] implements both as plain data. The egui view in
//! [`crate::ui`] paints whatever the table holds each frame, so the table is
//! the single source of truth for what is on screen.
//!
//! ## Element addressing
//!
//! `render` builds one button element per button id and one axis element per
//! axis id, and indexes them by id. Overlay parts (highlightable regions and
//! stick indicators of the artwork) only exist while artwork is attached; they
//! are derived from the profile ids through [`overlay_class`]. Updates for
//! anything not in the table fail with [`MissingTarget`] and change nothing.
//!
//! ## Artwork generations
//!
//! Every `render`/`reset` starts a new generation. Artwork deliveries tagged
//! with an older generation belong to a torn-down session and are dropped.

pub mod assets;

use std::collections::HashMap;

use tokio::sync::mpsc;
use tracing::{debug, trace, warn};

use crate::controller::{overlay_class, ControllerProfile};
use assets::{AssetDelivery, AssetLoader, VisualAsset};

pub const NO_CONTROLLER_LABEL: &str = "No controller connected";
pub const UNKNOWN_CONTROLLER_LABEL: &str = "Unknown Controller";

/// An update addressed an element that is not on screen
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("No display element for '{0}'")]
pub struct MissingTarget(pub String);

/// Coarse display operations used by the lifecycle
pub trait DisplayRenderer {
    /// Replaces all placeholders with the ones declared by `profile`
    fn render(&mut self, profile: &'static ControllerProfile);

    fn show_label(&mut self, text: &str);

    /// Starts loading artwork; the slot stays empty until it arrives
    fn load_visual_asset(&mut self, asset_ref: &str);

    /// Back to the "no controller" placeholder
    fn reset(&mut self);

    fn set_haptic_trigger(&mut self, visible: bool);
}

/// Per-element updates used by the frame synchronizer
pub trait RenderSurface {
    fn set_pressed(&mut self, id: &str, pressed: bool) -> Result<(), MissingTarget>;

    fn set_overlay_active(&mut self, class: &str, active: bool) -> Result<(), MissingTarget>;

    fn set_axis_readout(&mut self, id: &str, readout: String) -> Result<(), MissingTarget>;

    fn translate_overlay(&mut self, class: &str, dx: f32, dy: f32) -> Result<(), MissingTarget>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct ButtonElement {
    pub id: &'static str,
    pub pressed: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AxisElement {
    pub id: &'static str,
    pub readout: String,
}

/// A region of the artwork that highlights or moves
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayPart {
    pub class: &'static str,
    pub active: bool,
    pub offset: (f32, f32),
}

impl OverlayPart {
    fn new(class: &'static str) -> Self {
        Self {
            class,
            active: false,
            offset: (0.0, 0.0),
        }
    }
}

pub struct Display {
    label: String,
    buttons: Vec<ButtonElement>,
    axes: Vec<AxisElement>,
    button_index: HashMap<&'static str, usize>,
    axis_index: HashMap<&'static str, usize>,
    overlay: HashMap<&'static str, OverlayPart>,
    overlay_order: Vec<&'static str>,
    profile: Option<&'static ControllerProfile>,
    asset: Option<VisualAsset>,
    generation: u64,
    haptic_trigger: bool,
    loader: Option<(AssetLoader, mpsc::Receiver<AssetDelivery>)>,
}

impl Default for Display {
    fn default() -> Self {
        Self {
            label: NO_CONTROLLER_LABEL.to_string(),
            buttons: Vec::new(),
            axes: Vec::new(),
            button_index: HashMap::new(),
            axis_index: HashMap::new(),
            overlay: HashMap::new(),
            overlay_order: Vec::new(),
            profile: None,
            asset: None,
            generation: 0,
            haptic_trigger: false,
            loader: None,
        }
    }
}

impl Display {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_loader(loader: AssetLoader, deliveries: mpsc::Receiver<AssetDelivery>) -> Self {
        Self {
            loader: Some((loader, deliveries)),
            ..Self::default()
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn buttons(&self) -> &[ButtonElement] {
        &self.buttons
    }

    pub fn axes(&self) -> &[AxisElement] {
        &self.axes
    }

    pub fn button(&self, id: &str) -> Option<&ButtonElement> {
        self.button_index.get(id).map(|&i| &self.buttons[i])
    }

    pub fn axis(&self, id: &str) -> Option<&AxisElement> {
        self.axis_index.get(id).map(|&i| &self.axes[i])
    }

    pub fn overlay_part(&self, class: &str) -> Option<&OverlayPart> {
        self.overlay.get(class)
    }

    /// Overlay parts in profile order
    pub fn overlay_parts(&self) -> impl Iterator<Item = &OverlayPart> {
        self.overlay_order.iter().filter_map(|c| self.overlay.get(c))
    }

    pub fn asset(&self) -> Option<&VisualAsset> {
        self.asset.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn has_haptic_trigger(&self) -> bool {
        self.haptic_trigger
    }

    /// Drains finished artwork loads, attaching the one for this generation
    pub fn poll_assets(&mut self) {
        let mut fresh = Vec::new();
        if let Some((_, deliveries)) = self.loader.as_mut() {
            while let Ok(delivery) = deliveries.try_recv() {
                fresh.push(delivery);
            }
        }
        for delivery in fresh {
            self.deliver(delivery);
        }
    }

    /// Applies one artwork delivery
    pub fn deliver(&mut self, delivery: AssetDelivery) {
        if delivery.generation != self.generation {
            debug!(
                "Dropping stale artwork for generation {} (current {})",
                delivery.generation, self.generation
            );
            return;
        }
        if let Some(asset) = delivery.asset {
            self.attach_asset(asset);
        }
    }

    fn attach_asset(&mut self, asset: VisualAsset) {
        self.overlay.clear();
        self.overlay_order.clear();
        if let Some(profile) = self.profile {
            for id in profile.buttons.iter().chain(profile.axes.iter()) {
                if let Some(class) = overlay_class(id) {
                    if !self.overlay.contains_key(class) {
                        self.overlay.insert(class, OverlayPart::new(class));
                        self.overlay_order.push(class);
                    }
                }
            }
        }
        debug!(
            "Attached artwork {} with {} overlay parts",
            asset.name,
            self.overlay.len()
        );
        self.asset = Some(asset);
    }

    fn clear_elements(&mut self) {
        self.generation += 1;
        self.buttons.clear();
        self.axes.clear();
        self.button_index.clear();
        self.axis_index.clear();
        self.overlay.clear();
        self.overlay_order.clear();
        self.asset = None;
        self.profile = None;
    }
}

impl DisplayRenderer for Display {
    fn render(&mut self, profile: &'static ControllerProfile) {
        self.clear_elements();
        self.profile = Some(profile);
        self.label = profile.name.to_string();

        for (i, &id) in profile.buttons.iter().enumerate() {
            self.buttons.push(ButtonElement { id, pressed: false });
            self.button_index.insert(id, i);
        }
        for (i, &id) in profile.axes.iter().enumerate() {
            self.axes.push(AxisElement {
                id,
                readout: id.to_string(),
            });
            self.axis_index.insert(id, i);
        }
        debug!(
            "Rendered {} with {} buttons and {} axes",
            profile.name,
            self.buttons.len(),
            self.axes.len()
        );
    }

    fn show_label(&mut self, text: &str) {
        self.label = text.to_string();
    }

    fn load_visual_asset(&mut self, asset_ref: &str) {
        match self.loader.as_ref() {
            Some((loader, _)) => loader.request(self.generation, asset_ref),
            None => warn!("No asset loader configured, skipping {}", asset_ref),
        }
    }

    fn reset(&mut self) {
        self.clear_elements();
        self.label = NO_CONTROLLER_LABEL.to_string();
        self.haptic_trigger = false;
    }

    fn set_haptic_trigger(&mut self, visible: bool) {
        self.haptic_trigger = visible;
    }
}

impl RenderSurface for Display {
    fn set_pressed(&mut self, id: &str, pressed: bool) -> Result<(), MissingTarget> {
        let index = *self
            .button_index
            .get(id)
            .ok_or_else(|| MissingTarget(id.to_string()))?;
        self.buttons[index].pressed = pressed;
        Ok(())
    }

    fn set_overlay_active(&mut self, class: &str, active: bool) -> Result<(), MissingTarget> {
        let part = self
            .overlay
            .get_mut(class)
            .ok_or_else(|| MissingTarget(class.to_string()))?;
        part.active = active;
        Ok(())
    }

    fn set_axis_readout(&mut self, id: &str, readout: String) -> Result<(), MissingTarget> {
        let index = *self
            .axis_index
            .get(id)
            .ok_or_else(|| MissingTarget(id.to_string()))?;
        self.axes[index].readout = readout;
        Ok(())
    }

    fn translate_overlay(&mut self, class: &str, dx: f32, dy: f32) -> Result<(), MissingTarget> {
        let part = self
            .overlay
            .get_mut(class)
            .ok_or_else(|| MissingTarget(class.to_string()))?;
        trace!("Overlay {} -> ({:.1}, {:.1})", class, dx, dy);
        part.offset = (dx, dy);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::ControllerKind;

    fn artwork(name: &str) -> VisualAsset {
        VisualAsset {
            name: name.to_string(),
            width: 1,
            height: 1,
            rgba: vec![0; 4],
            regions: Default::default(),
        }
    }

    #[test]
    fn starts_with_no_controller_label() {
        let display = Display::new();
        assert_eq!(display.label(), NO_CONTROLLER_LABEL);
        assert!(display.buttons().is_empty());
    }

    #[test]
    fn render_builds_one_element_per_id() {
        let mut display = Display::new();
        display.render(ControllerKind::PS4.profile());

        assert_eq!(display.label(), "PlayStation 4 Controller");
        assert_eq!(display.buttons().len(), 18);
        assert_eq!(display.axes().len(), 4);
        assert_eq!(display.button("Touchpad").map(|b| b.pressed), Some(false));
        assert_eq!(display.axis("RSY").map(|a| a.readout.as_str()), Some("RSY"));
    }

    #[test]
    fn rerender_replaces_previous_profile() {
        let mut display = Display::new();
        display.render(ControllerKind::Xbox.profile());
        display.render(ControllerKind::JoyConL.profile());

        assert!(display.button("LB").is_none());
        assert!(display.button("Capture").is_some());
        assert_eq!(display.axes().len(), 2);
    }

    #[test]
    fn updates_to_missing_elements_fail_without_side_effects() {
        let mut display = Display::new();
        display.render(ControllerKind::Xbox.profile());

        assert_eq!(
            display.set_pressed("Cross", true),
            Err(MissingTarget("Cross".to_string()))
        );
        assert!(display.set_overlay_active("button-a", true).is_err());
        assert!(display.buttons().iter().all(|b| !b.pressed));
    }

    #[test]
    fn overlay_exists_only_with_current_artwork() {
        let mut display = Display::new();
        display.render(ControllerKind::PS4.profile());
        assert!(display.overlay_part("button-cross").is_none());

        let generation = display.generation();
        display.deliver(AssetDelivery {
            generation,
            asset: Some(artwork("dual-shock-4.svg")),
        });

        assert_eq!(display.asset().map(|a| a.name.as_str()), Some("dual-shock-4.svg"));
        assert!(display.overlay_part("button-cross").is_some());
        // both stick axes collapse into one container
        assert_eq!(
            display
                .overlay_parts()
                .filter(|p| p.class == "axis-l-container")
                .count(),
            1
        );
        // Share has artwork, Back is not part of this profile
        assert!(display.overlay_part("button-share").is_some());
    }

    #[test]
    fn stale_artwork_is_dropped() {
        let mut display = Display::new();
        display.render(ControllerKind::JoyConR.profile());
        let stale = display.generation();
        display.reset();

        display.deliver(AssetDelivery {
            generation: stale,
            asset: Some(artwork("joy-con.svg")),
        });
        assert!(display.asset().is_none());
    }

    #[test]
    fn failed_artwork_leaves_slot_empty() {
        let mut display = Display::new();
        display.render(ControllerKind::PS4.profile());
        let generation = display.generation();
        display.deliver(AssetDelivery {
            generation,
            asset: None,
        });
        assert!(display.asset().is_none());
        assert_eq!(display.buttons().len(), 18);
    }

    #[test]
    fn reset_clears_everything() {
        let mut display = Display::new();
        display.render(ControllerKind::PS5.profile());
        display.set_haptic_trigger(true);
        display.set_pressed("Cross", true).unwrap();

        display.reset();
        assert_eq!(display.label(), NO_CONTROLLER_LABEL);
        assert!(display.buttons().is_empty());
        assert!(display.axes().is_empty());
        assert!(display.button("Cross").is_none());
        assert!(!display.has_haptic_trigger());
    }
}
