//! Painting of the retained [`Display`] table.
//!
//! Nothing here mutates visualizer state. User intent (the vibrate button) is
//! returned to the caller as a [`ViewAction`] and dispatched after painting.

use eframe::egui::{self, pos2, vec2, Color32, Rect, Sense, Stroke, StrokeKind, TextureHandle};

use super::common::{button_fill, button_text, create_frame, UiColors};
use crate::display::assets::{AssetRegion, VisualAsset};
use crate::display::Display;

/// Requests raised by the user while painting
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ViewAction {
    pub vibrate: bool,
}

const BUTTON_COLUMNS: usize = 6;
const ARTWORK_MAX_WIDTH: f32 = 480.0;
const STICK_RADIUS: f32 = 6.0;
const HIGHLIGHT_FILL: Color32 = Color32::from_rgba_premultiplied(25, 100, 10, 110);

pub fn controller_panel(
    ui: &mut egui::Ui,
    display: &Display,
    artwork: Option<&TextureHandle>,
) -> ViewAction {
    let mut action = ViewAction::default();

    ui.horizontal(|ui| {
        ui.heading(display.label());
        if display.has_haptic_trigger() && ui.button("Vibrate").clicked() {
            action.vibrate = true;
        }
    });
    ui.separator();

    if !display.buttons().is_empty() {
        create_frame(UiColors::MAIN_BG, UiColors::BORDER).show(ui, |ui| {
            egui::Grid::new("controller_buttons")
                .spacing(vec2(6.0, 6.0))
                .show(ui, |ui| {
                    for (i, button) in display.buttons().iter().enumerate() {
                        create_frame(button_fill(button.pressed), UiColors::BORDER).show(
                            ui,
                            |ui| {
                                ui.label(button_text(button.id, button.pressed));
                            },
                        );
                        if (i + 1) % BUTTON_COLUMNS == 0 {
                            ui.end_row();
                        }
                    }
                });
        });
    }

    if !display.axes().is_empty() {
        create_frame(UiColors::MAIN_BG, UiColors::BORDER).show(ui, |ui| {
            ui.horizontal_wrapped(|ui| {
                for axis in display.axes() {
                    ui.label(egui::RichText::new(&axis.readout).monospace());
                    ui.add_space(12.0);
                }
            });
        });
    }

    if let (Some(texture), Some(asset)) = (artwork, display.asset()) {
        artwork_panel(ui, display, texture, asset);
    }

    action
}

fn artwork_panel(
    ui: &mut egui::Ui,
    display: &Display,
    texture: &TextureHandle,
    asset: &VisualAsset,
) {
    let scale = (ARTWORK_MAX_WIDTH / asset.width.max(1) as f32).min(1.0);
    let size = vec2(asset.width as f32 * scale, asset.height as f32 * scale);

    create_frame(UiColors::EXTREME_BG, UiColors::BORDER).show(ui, |ui| {
        let (rect, _) = ui.allocate_exact_size(size, Sense::hover());
        let painter = ui.painter_at(rect);
        painter.image(
            texture.id(),
            rect,
            Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0)),
            Color32::WHITE,
        );

        for part in display.overlay_parts() {
            let Some(region) = asset.region(part.class) else {
                continue;
            };
            let area = region_rect(region, rect, scale);
            if is_stick(part.class) {
                let center = area.center() + vec2(part.offset.0, part.offset.1) * scale;
                painter.circle_stroke(
                    area.center(),
                    area.width() / 2.0,
                    Stroke::new(1.0, UiColors::BORDER),
                );
                painter.circle_filled(center, STICK_RADIUS, UiColors::STICK);
            } else if part.active {
                let area = area.expand(2.0);
                painter.rect_filled(area, 4.0, HIGHLIGHT_FILL);
                painter.rect_stroke(
                    area,
                    4.0,
                    Stroke::new(1.5, UiColors::ACTIVE),
                    StrokeKind::Outside,
                );
            }
        }
    });
}

fn is_stick(class: &str) -> bool {
    class.starts_with("axis-")
}

/// Maps an artwork region onto the painted image rect
fn region_rect(region: &AssetRegion, image: Rect, scale: f32) -> Rect {
    Rect::from_min_size(
        image.min + vec2(region.x, region.y) * scale,
        vec2(region.width, region.height) * scale,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regions_follow_image_scale_and_origin() {
        let region = AssetRegion {
            x: 100.0,
            y: 40.0,
            width: 20.0,
            height: 10.0,
        };
        let image = Rect::from_min_size(pos2(10.0, 5.0), vec2(240.0, 150.0));

        let area = region_rect(&region, image, 0.5);
        assert_eq!(area.min, pos2(60.0, 25.0));
        assert_eq!(area.size(), vec2(10.0, 5.0));
    }

    #[test]
    fn only_axis_containers_are_sticks() {
        assert!(is_stick("axis-l-container"));
        assert!(!is_stick("button-l3"));
    }
}
