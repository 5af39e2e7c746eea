use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

/// Modes worth flashing on screen when they flip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatedMode {
    Measure(bool),
    Inside(bool),
}

impl IndicatedMode {
    fn text(&self) -> &'static str {
        match self {
            IndicatedMode::Measure(true) => "MEASURE ON",
            IndicatedMode::Measure(false) => "MEASURE OFF",
            IndicatedMode::Inside(true) => "INSIDE VIEW",
            IndicatedMode::Inside(false) => "EXTERIOR VIEW",
        }
    }

    fn color(&self) -> egui::Color32 {
        match self {
            IndicatedMode::Measure(true) => egui::Color32::from_rgb(180, 60, 60),
            IndicatedMode::Inside(true) => egui::Color32::from_rgb(74, 144, 226),
            _ => egui::Color32::from_rgb(40, 44, 52),
        }
    }
}

#[derive(Resource)]
pub struct ModeIndicator {
    pub mode: IndicatedMode,
    pub timer: f32,
    pub duration: f32,
}

impl Default for ModeIndicator {
    fn default() -> Self {
        Self {
            mode: IndicatedMode::Measure(false),
            timer: 0.0,
            duration: 2.0,
        }
    }
}

impl ModeIndicator {
    pub fn show(&mut self, mode: IndicatedMode) {
        self.mode = mode;
        self.timer = self.duration;
    }

    pub fn tick(&mut self, delta_secs: f32) {
        self.timer = (self.timer - delta_secs).max(0.0);
    }

    // fades out over the whole duration
    pub fn alpha(&self) -> f32 {
        (self.timer / self.duration).clamp(0.0, 1.0)
    }
}

#[derive(Event)]
pub struct ModeChangeEvent(pub IndicatedMode);

pub fn update_mode_indicator(
    mut mode_indicator: ResMut<ModeIndicator>,
    mut events: EventReader<ModeChangeEvent>,
    time: Res<Time>,
) {
    for event in events.read() {
        mode_indicator.show(event.0);
    }

    if mode_indicator.timer > 0.0 {
        mode_indicator.tick(time.delta_secs());
    }
}

pub fn render_mode_indicator(
    mode_indicator: Res<ModeIndicator>,
    mut contexts: EguiContexts,
) {
    if mode_indicator.timer <= 0.0 {
        return;
    }

    if let Ok(ctx) = contexts.ctx_mut() {
        let alpha = mode_indicator.alpha();
        let bg_color = mode_indicator.mode.color();

        egui::Area::new(egui::Id::new("mode_indicator"))
            .anchor(egui::Align2::CENTER_TOP, egui::vec2(0.0, 60.0))
            .interactable(false)
            .show(ctx, |ui| {
                let frame = egui::Frame::new()
                    .fill(egui::Color32::from_rgba_unmultiplied(
                        bg_color.r(), bg_color.g(), bg_color.b(),
                        (200.0 * alpha) as u8
                    ))
                    .stroke(egui::Stroke::new(
                        2.0,
                        egui::Color32::from_rgba_unmultiplied(255, 255, 255, (200.0 * alpha) as u8)
                    ))
                    .inner_margin(egui::Margin::symmetric(20, 10))
                    .corner_radius(egui::CornerRadius::same(8));

                frame.show(ui, |ui| {
                    ui.label(egui::RichText::new(mode_indicator.mode.text())
                        .size(18.0)
                        .color(egui::Color32::from_rgba_unmultiplied(255, 255, 255, (255.0 * alpha) as u8))
                        .strong());
                });
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indicator_fades_and_stops_at_zero() {
        let mut indicator = ModeIndicator::default();
        indicator.show(IndicatedMode::Inside(true));
        assert_eq!(indicator.alpha(), 1.0);

        indicator.tick(1.0);
        assert!((indicator.alpha() - 0.5).abs() < 1e-5);

        indicator.tick(5.0);
        assert_eq!(indicator.timer, 0.0);
        assert_eq!(indicator.mode, IndicatedMode::Inside(true));
    }
}
