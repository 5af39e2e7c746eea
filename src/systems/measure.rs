// two-point measuring tape
// left click on a floor places points, the third click starts a new pair
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_egui::{egui, EguiContexts, EguiPrimaryContextPass};

use crate::config::*;
use crate::systems::house::FloorSpec;

/// Measurement mode and the points picked so far, at most two
#[derive(Resource, Debug, Default)]
pub struct MeasurementState {
    active: bool,
    points: Vec<Vec3>,
}

impl MeasurementState {
    pub fn is_active(&self) -> bool {
        self.active
    }

    // leaving measurement mode drops any points
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
        if !active {
            self.points.clear();
        }
    }

    pub fn toggle(&mut self) {
        self.set_active(!self.active);
    }

    /// Adds a pick; a third pick discards the finished pair.
    /// # Returns `false` when measurement mode is off and the pick was ignored
    pub fn add_point(&mut self, point: Vec3) -> bool {
        if !self.active {
            return false;
        }
        if self.points.len() >= 2 {
            self.points.clear();
        }
        self.points.push(point);
        true
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    pub fn segment(&self) -> Option<(Vec3, Vec3)> {
        match self.points.as_slice() {
            [start, end] => Some((*start, *end)),
            _ => None,
        }
    }

    pub fn distance(&self) -> Option<f32> {
        self.segment().map(|(start, end)| start.distance(end))
    }

    // floats a little above the middle of the segment
    pub fn label_position(&self) -> Option<Vec3> {
        self.segment()
            .map(|(start, end)| (start + end) * 0.5 + Vec3::Y * MEASURE_LABEL_LIFT)
    }

    pub fn label_text(&self) -> Option<String> {
        self.distance().map(format_distance)
    }
}

pub fn format_distance(meters: f32) -> String {
    format!("{:.2}m", meters)
}

/// Pickable footprint of one rendered floor, in world space
#[derive(Debug, Clone, Copy)]
pub struct FloorPlane {
    pub center: Vec3,
    pub half_extents: Vec2,
}

/// Casts the ray against every floor plane and keeps the nearest hit inside a footprint.
pub fn pick_floor(ray: Ray3d, floors: impl IntoIterator<Item = FloorPlane>) -> Option<Vec3> {
    floors
        .into_iter()
        .filter_map(|floor| {
            let t = ray.intersect_plane(floor.center, InfinitePlane3d::new(Vec3::Y))?;
            let hit = ray.get_point(t);
            let local = hit - floor.center;
            let inside = local.x.abs() <= floor.half_extents.x && local.z.abs() <= floor.half_extents.y;
            inside.then_some((t, hit))
        })
        .min_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(_, hit)| hit)
}

// visual markers, rebuilt whenever the state changes
#[derive(Component)]
pub struct MeasureVisual;

pub struct MeasurePlugin;

impl Plugin for MeasurePlugin {
    fn build(&self, app: &mut App) {
        app
            .init_resource::<MeasurementState>()
            .add_systems(Update, (handle_measure_click, update_measure_render).chain())
            .add_systems(EguiPrimaryContextPass, render_measure_label);
    }
}

pub fn handle_measure_click(
    mut state: ResMut<MeasurementState>,
    mut contexts: EguiContexts,
    mouse: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&Camera, &GlobalTransform), With<Camera3d>>,
    floors: Query<(&FloorSpec, &GlobalTransform, &InheritedVisibility)>,
) {
    // picking while inactive is a no-op
    if !state.is_active() || !mouse.just_pressed(MouseButton::Left) {
        return;
    }

    // clicks on the control panel belong to egui
    if let Ok(ctx) = contexts.ctx_mut() {
        if ctx.is_pointer_over_area() || ctx.wants_pointer_input() {
            return;
        }
    }

    let Ok(window) = windows.single() else { return };
    let Ok((camera, camera_transform)) = cameras.single() else { return };
    let Some(cursor_pos) = window.cursor_position() else { return };
    let Ok(ray) = camera.viewport_to_world(camera_transform, cursor_pos) else { return };

    let planes = floors
        .iter()
        .filter(|(spec, _, visibility)| spec.is_rendered() && visibility.get())
        .map(|(spec, transform, _)| FloorPlane {
            center: transform.translation(),
            half_extents: spec.size().half_extents(),
        });

    let Some(hit) = pick_floor(ray, planes) else {
        debug!("Measurement click missed every floor");
        return;
    };

    state.add_point(hit);
    if let Some(text) = state.label_text() {
        info!("Measured {}", text);
    }
}

pub fn update_measure_render(
    mut commands: Commands,
    state: Res<MeasurementState>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    existing: Query<Entity, With<MeasureVisual>>,
) {
    if !state.is_changed() {
        return;
    }

    for entity in &existing {
        commands.entity(entity).despawn();
    }

    let marker_material = materials.add(StandardMaterial {
        base_color: Color::srgb(1.0, 0.0, 0.0),
        unlit: true,
        ..default()
    });

    let marker_mesh = meshes.add(Sphere::new(MEASURE_MARKER_RADIUS));
    for point in state.points() {
        commands.spawn((
            Mesh3d(marker_mesh.clone()),
            MeshMaterial3d(marker_material.clone()),
            Transform::from_translation(*point),
            MeasureVisual,
        ));
    }

    // the line only exists for a finished pair
    if let Some((start, end)) = state.segment() {
        let dir = end - start;
        let length = dir.length();
        if length > f32::EPSILON {
            let rot = Quat::from_rotation_arc(Vec3::X, dir / length);
            commands.spawn((
                Mesh3d(meshes.add(Cuboid::new(length, MEASURE_LINE_WIDTH, MEASURE_LINE_WIDTH))),
                MeshMaterial3d(marker_material),
                Transform::from_translation((start + end) * 0.5).with_rotation(rot),
                MeasureVisual,
            ));
        }
    }
}

// distance label, drawn in the egui pass
pub fn render_measure_label(
    mut contexts: EguiContexts,
    state: Res<MeasurementState>,
    cameras: Query<(&Camera, &GlobalTransform), With<Camera3d>>,
) {
    let (Some(position), Some(text)) = (state.label_position(), state.label_text()) else {
        return;
    };
    let Ok((camera, camera_transform)) = cameras.single() else { return };
    // behind the camera
    let Ok(screen) = camera.world_to_viewport(camera_transform, position) else { return };

    if let Ok(ctx) = contexts.ctx_mut() {
        egui::Area::new(egui::Id::new("measure_label"))
            .fixed_pos(egui::pos2(screen.x, screen.y))
            .pivot(egui::Align2::CENTER_BOTTOM)
            .interactable(false)
            .show(ctx, |ui| {
                egui::Frame::new()
                    .fill(egui::Color32::BLACK)
                    .inner_margin(egui::Margin::symmetric(8, 4))
                    .corner_radius(egui::CornerRadius::same(4))
                    .show(ui, |ui| {
                        ui.label(egui::RichText::new(text).color(egui::Color32::WHITE));
                    });
            });
    }
}
