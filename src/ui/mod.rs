//! # padview User Interface Module
//!
//! Hosts the [`Visualizer`] inside an eframe window and acts as its frame
//! source. egui's repaint request plays the role of a per-frame callback:
//! while the visualizer is armed every update requests the next repaint, and
//! the visualizer's own throttle decides which of those frames do real work.
//!
//! ## Frame Processing
//!
//! Each update runs, in order:
//! 1. artwork deliveries from the loader are attached to the display
//! 2. hot-plug events are drained and dispatched
//! 3. a close request from the window is dispatched as teardown
//! 4. [`Visualizer::tick`] with the time since startup
//! 5. the display table is painted
//! 6. user actions collected while painting are dispatched
//!
//! When the loop is disarmed (no controller) the window falls back to a slow
//! idle repaint so hot-plug events are still noticed.
//!
//! ## Layout
//! - **Central Panel**: controller name, button grid, axis readouts, artwork
//! - **Bottom Panel**: connection state, connect time and last frame stats

pub mod common;
pub mod view;

use std::time::{Duration, Instant};

use eframe::egui::{self, ColorImage, TextureHandle, TextureOptions};
use tracing::{debug, info};

use crate::controller::gilrs_backend::GilrsBackend;
use crate::display::Display;
use crate::visualizer::{LifecycleEvent, LoopState, TeardownReason, Visualizer};

use self::common::UiColors;
use self::view::controller_panel;

pub struct VisualizerUI {
    visualizer: Visualizer<GilrsBackend, Display>,

    /// Origin of the monotonic frame timestamps
    started: Instant,

    /// Repaint interval while no frame loop is armed
    idle_poll: Duration,

    /// Uploaded artwork, tagged with the display generation it belongs to
    artwork: Option<(u64, TextureHandle)>,

    close_dispatched: bool,
}

impl VisualizerUI {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        visualizer: Visualizer<GilrsBackend, Display>,
        idle_poll: Duration,
    ) -> Self {
        cc.egui_ctx.set_theme(egui::Theme::Dark);
        VisualizerUI {
            visualizer,
            started: Instant::now(),
            idle_poll,
            artwork: None,
            close_dispatched: false,
        }
    }

    /// Keeps the uploaded texture in step with the display's artwork slot
    fn sync_artwork_texture(&mut self, ctx: &egui::Context) {
        let display = self.visualizer.renderer();
        let generation = display.generation();
        match display.asset() {
            None => self.artwork = None,
            Some(_) if matches!(&self.artwork, Some((g, _)) if *g == generation) => {}
            Some(asset) => {
                let image = ColorImage::from_rgba_premultiplied(
                    [asset.width as usize, asset.height as usize],
                    &asset.rgba,
                );
                let texture = ctx.load_texture(&asset.name, image, TextureOptions::LINEAR);
                debug!("Uploaded artwork texture {} for generation {}", asset.name, generation);
                self.artwork = Some((generation, texture));
            }
        }
    }

    fn status_bar(&self, ui: &mut egui::Ui) {
        let (color, state) = match self.visualizer.state() {
            LoopState::Idle => (UiColors::INACTIVE, "Idle"),
            LoopState::Detecting { .. } => (UiColors::STICK, "Detecting"),
            LoopState::Active { .. } => (UiColors::ACTIVE, "Active"),
        };
        ui.horizontal_centered(|ui| {
            ui.label(egui::RichText::new(format!("● {}", state)).color(color));
            if let Some(device) = self.visualizer.state().device() {
                ui.label(format!("{} {}", device.handle, device.raw_id));
            }
            if let Some(at) = self.visualizer.connected_at() {
                ui.label(format!("since {}", at.format("%H:%M:%S")));
            }
            let report = self.visualizer.last_report();
            if report.applied + report.skipped > 0 {
                ui.label(format!(
                    "frame: {} applied / {} skipped",
                    report.applied, report.skipped
                ));
            }
        });
    }
}

impl eframe::App for VisualizerUI {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.visualizer.renderer_mut().poll_assets();
        self.visualizer.pump_events();

        if ctx.input(|i| i.viewport().close_requested()) && !self.close_dispatched {
            self.close_dispatched = true;
            self.visualizer
                .dispatch(LifecycleEvent::Teardown(TeardownReason::CloseRequested));
        }

        let rearm = self.visualizer.tick(self.started.elapsed());
        self.sync_artwork_texture(ctx);

        egui::TopBottomPanel::bottom("status_panel")
            .frame(common::create_frame(UiColors::INNER_BG, UiColors::BORDER))
            .show(ctx, |ui| self.status_bar(ui));

        let action = egui::CentralPanel::default()
            .frame(common::create_frame(UiColors::MAIN_BG, UiColors::BORDER))
            .show(ctx, |ui| {
                let artwork = self.artwork.as_ref().map(|(_, texture)| texture);
                controller_panel(ui, self.visualizer.renderer(), artwork)
            })
            .inner;

        if action.vibrate {
            self.visualizer.dispatch(LifecycleEvent::HapticRequested);
        }

        if rearm {
            ctx.request_repaint();
        } else {
            ctx.request_repaint_after(self.idle_poll);
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        info!("Window closing, tearing down visualizer");
        self.visualizer
            .dispatch(LifecycleEvent::Teardown(TeardownReason::Exit));
    }
}
