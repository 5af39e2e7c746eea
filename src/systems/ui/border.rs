use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use crate::systems::measure::MeasurementState;

// screen border thing
// tells the user that clicks are placing measurement points
pub fn screen_border(
    mut contexts: EguiContexts,
    measurement: Res<MeasurementState>,
) {
    if !measurement.is_active() {
        return;
    }

    if let Ok(ctx) = contexts.ctx_mut() {
        let screen_rect = ctx.screen_rect();
        let border_width = 2.0;
        let color = egui::Color32::from_rgb(220, 40, 40);

        egui::Area::new(egui::Id::new("screen_border"))
            .fixed_pos(egui::pos2(0.0, 0.0))
            .order(egui::Order::Background)
            .interactable(false)
            .show(ctx, |ui| {
                let painter = ui.painter();

                // dashed, so it reads as a tool mode rather than a frame
                let dash_length = 10.0f32;
                let segment_length = dash_length + 5.0;

                let mut x = 0.0;
                while x < screen_rect.width() {
                    let dash_width = dash_length.min(screen_rect.width() - x);
                    painter.rect_filled(
                        egui::Rect::from_min_size(egui::pos2(x, 0.0), egui::vec2(dash_width, border_width)),
                        0.0, color);
                    painter.rect_filled(
                        egui::Rect::from_min_size(egui::pos2(x, screen_rect.height() - border_width), egui::vec2(dash_width, border_width)),
                        0.0, color);
                    x += segment_length;
                }

                let mut y = 0.0;
                while y < screen_rect.height() {
                    let dash_height = dash_length.min(screen_rect.height() - y);
                    painter.rect_filled(
                        egui::Rect::from_min_size(egui::pos2(0.0, y), egui::vec2(border_width, dash_height)),
                        0.0, color);
                    painter.rect_filled(
                        egui::Rect::from_min_size(egui::pos2(screen_rect.width() - border_width, y), egui::vec2(border_width, dash_height)),
                        0.0, color);
                    y += segment_length;
                }
            });
    }
}
