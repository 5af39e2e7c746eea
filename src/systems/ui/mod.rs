use bevy::prelude::*;
use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin}; // fps
use bevy_egui::{egui, EguiContexts, EguiPlugin, EguiPrimaryContextPass};

use crate::config::*;
use crate::systems::house::{FloorLevel, HouseSettings};
use crate::systems::measure::MeasurementState;
use crate::systems::sun::{SunSettings, SunState};
use crate::systems::view::ViewSettings;

pub mod indicator;
pub mod border;

// re-export the main items that other modules need
pub use indicator::{IndicatedMode, ModeChangeEvent, ModeIndicator};
pub use indicator::{update_mode_indicator, render_mode_indicator};
pub use border::screen_border;

const MONTHS: [&str; 12] = [
    "January", "February", "March", "April", "May", "June",
    "July", "August", "September", "October", "November", "December",
];

pub struct UIPlugin;

impl Plugin for UIPlugin {
    fn build(&self, app: &mut App) {
        assert!(app.is_plugin_added::<EguiPlugin>());
        app
            .insert_resource(ModeIndicator::default())
            .add_event::<ModeChangeEvent>()
            .add_systems(Update, (key_input, update_mode_indicator).chain())
            .add_systems(EguiPrimaryContextPass, (ui_main, fps, screen_border, render_mode_indicator)); // UI rendering here
    }
}

// 13.75 -> "13:45"
pub fn format_clock(hours: f32) -> String {
    let total_minutes = (hours.rem_euclid(24.0) * 60.0).round() as u32 % (24 * 60);
    format!("{:02}:{:02}", total_minutes / 60, total_minutes % 60)
}

fn key_input(
    keyboard_input: Res<ButtonInput<KeyCode>>,
    mut measurement: ResMut<MeasurementState>,
    mut mode_events: EventWriter<ModeChangeEvent>,
) {
    if keyboard_input.just_pressed(KeyCode::KeyM) {
        measurement.toggle();
        mode_events.write(ModeChangeEvent(IndicatedMode::Measure(measurement.is_active())));
        info!("Measurement mode {}", if measurement.is_active() { "on" } else { "off" });
    }
}

fn ui_main(
    mut contexts: EguiContexts,
    mut house: ResMut<HouseSettings>,
    mut sun: ResMut<SunSettings>,
    mut view: ResMut<ViewSettings>,
    mut measurement: ResMut<MeasurementState>,
    mut mode_events: EventWriter<ModeChangeEvent>,
    sun_state: Res<SunState>,
) {
    // edit copies, so resources only report a change when a value really moves
    let mut house_edit = house.clone();
    let mut sun_edit = sun.clone();
    let mut view_edit = view.clone();
    let mut toggle_measure = false;

    if let Ok(ctx) = contexts.ctx_mut() {
        egui::SidePanel::right("config_panel")
            .default_width(260.0)
            .min_width(240.0)
            .max_width(400.0)
            .resizable(true)
            .show(ctx, |ui| {
                ui.heading("House Visualizer");

                // camera
                ui.label("Camera: ");
                ui.label("WASD - Move");
                ui.label("Scroll - Zoom");
                ui.label("MMB - Rotate");

                ui.separator();

                egui::CollapsingHeader::new("House")
                    .default_open(true)
                    .show(ui, |ui| {
                    ui.label(format!("Floor Spacing: {:.1}m", house_edit.floor_spacing));
                    ui.add(egui::Slider::new(&mut house_edit.floor_spacing, 0.0..=MAX_FLOOR_SPACING)
                        .step_by(0.1)
                        .show_value(false))
                        .on_hover_text("Vertical distance between floor levels.");

                    ui.label(format!("Opacity: {}%", (house_edit.opacity * 100.0).round() as i32));
                    ui.add(egui::Slider::new(&mut house_edit.opacity, MIN_OPACITY..=1.0)
                        .step_by(0.1)
                        .show_value(false))
                        .on_hover_text("Transparency of every floor plan and slab.");

                    ui.add(egui::Slider::new(&mut house_edit.wall_height, 0.0..=MAX_WALL_HEIGHT)
                        .step_by(0.1)
                        .text("Wall Height (m)")
                        .suffix(" m"))
                        .on_hover_text("Raises the dark wall lines of each plan out of the floor.");
                });

                // floor visibility, listed top down like the building
                egui::CollapsingHeader::new("Floors")
                    .default_open(true)
                    .show(ui, |ui| {
                    for level in FloorLevel::ALL.iter().rev() {
                        let mut visible = house_edit.is_visible(*level);
                        if ui.checkbox(&mut visible, level.label()).changed() {
                            house_edit.set_visible(*level, visible);
                        }
                    }
                });

                egui::CollapsingHeader::new("Sun")
                    .default_open(true)
                    .show(ui, |ui| {
                    ui.label(format!("Time: {}", format_clock(sun_edit.time_of_day)));
                    ui.add(egui::Slider::new(&mut sun_edit.time_of_day, 0.0..=23.75)
                        .step_by(0.25)
                        .show_value(false))
                        .on_hover_text("Site-local clock time.");

                    egui::ComboBox::from_label("Month")
                        .selected_text(MONTHS[sun_edit.season_month.min(11) as usize])
                        .show_ui(ui, |ui| {
                            for (idx, name) in MONTHS.iter().enumerate() {
                                ui.selectable_value(&mut sun_edit.season_month, idx as u32, *name);
                            }
                        });

                    if let Some(angles) = sun_state.angles {
                        ui.label(format!(
                            "Altitude {:.1}°, Azimuth {:.1}°",
                            angles.altitude.to_degrees(),
                            angles.azimuth.to_degrees()
                        ));
                    }
                    let (text, color) = if sun_state.is_night() {
                        ("Night", egui::Color32::from_rgb(120, 130, 200))
                    } else {
                        ("Day", egui::Color32::from_rgb(230, 180, 60))
                    };
                    ui.label(egui::RichText::new(text).color(color));
                });

                ui.separator();

                ui.checkbox(&mut view_edit.show_person, "Show Person (Scale)");

                let (view_text, view_color) = if view_edit.inside_view {
                    ("Exit Inside View", Some(egui::Color32::from_rgb(74, 144, 226)))
                } else {
                    ("Go Inside (Level 1)", None)
                };
                let mut view_button = egui::Button::new(view_text).min_size(egui::vec2(ui.available_width(), 0.0));
                if let Some(color) = view_color {
                    view_button = view_button.fill(color);
                }
                if ui.add(view_button).clicked() {
                    view_edit.inside_view = !view_edit.inside_view;
                    mode_events.write(ModeChangeEvent(IndicatedMode::Inside(view_edit.inside_view)));
                }

                ui.separator();

                // measurement
                ui.horizontal(|ui| {
                    let mut button = egui::Button::new("Measure");
                    if measurement.is_active() {
                        button = button.fill(egui::Color32::from_rgb(180, 60, 60));
                    }
                    if ui.add(button).on_hover_text("Click two points on a floor (M)").clicked() {
                        toggle_measure = true;
                    }
                    if measurement.is_active() {
                        ui.label(format!("Points: {}/2", measurement.points().len()));
                    }
                });
                if let Some(text) = measurement.label_text() {
                    ui.label(format!("Distance: {}", text));
                }

                ui.separator();
                ui.label("ESC - Exit");
            });
    }

    house.set_if_neq(house_edit);
    sun.set_if_neq(sun_edit);
    view.set_if_neq(view_edit);

    if toggle_measure {
        measurement.toggle();
        mode_events.write(ModeChangeEvent(IndicatedMode::Measure(measurement.is_active())));
    }
}

fn fps(
    mut contexts: EguiContexts,
    diagnostics: Res<DiagnosticsStore>,
) {
    if let Ok(ctx) = contexts.ctx_mut() {
        egui::Area::new(egui::Id::new("fps_counter"))
            .anchor(egui::Align2::LEFT_TOP, egui::Vec2::new(10.0, 10.0))
            .show(ctx, |ui| {
                if let Some(fps_diagnostic) = diagnostics.get(&FrameTimeDiagnosticsPlugin::FPS) {
                    if let Some(fps) = fps_diagnostic.smoothed() {
                        ui.label(egui::RichText::new(format!("{:.0}", fps))
                            .size(26.0)
                            .color(egui::Color32::WHITE));
                    }
                }
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_formats_quarter_hours() {
        assert_eq!(format_clock(13.75), "13:45");
        assert_eq!(format_clock(6.0), "06:00");
        assert_eq!(format_clock(24.0), "00:00");
    }
}
