// camera modes: RTS-style exterior view, or a fixed eye-height view inside level 1
use bevy::input::mouse::{AccumulatedMouseMotion, AccumulatedMouseScroll};
use bevy::math::bounding::Aabb2d;
use bevy::prelude::*;
use bevy_egui::EguiContexts;
use bevy_rts_camera::{RtsCamera, RtsCameraControls};

use crate::config::*;
use crate::systems::house::{FloorLevel, HouseSettings};

#[derive(Resource, Debug, Clone, PartialEq)]
pub struct ViewSettings {
    pub show_person: bool,
    pub inside_view: bool,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            show_person: true,
            inside_view: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub eye: Vec3,
    pub target: Vec3,
    pub fov_degrees: f32,
}

impl CameraPose {
    pub fn transform(&self) -> Transform {
        Transform::from_translation(self.eye).looking_at(self.target, Vec3::Y)
    }

    pub fn projection(&self) -> Projection {
        Projection::Perspective(PerspectiveProjection {
            fov: self.fov_degrees.to_radians(),
            ..default()
        })
    }
}

/// Where the camera sits for a view mode; the inside view tracks the middle floor
pub fn camera_pose(inside_view: bool, floor_spacing: f32) -> CameraPose {
    if inside_view {
        let eye_y = HOUSE_BASE_OFFSET + FloorLevel::Middle.elevation(floor_spacing) + INSIDE_EYE_HEIGHT;
        CameraPose {
            eye: Vec3::new(0.0, eye_y, INSIDE_EYE_BACKOFF),
            target: Vec3::new(0.0, eye_y, 0.0),
            fov_degrees: INSIDE_FOV_DEGREES,
        }
    } else {
        CameraPose {
            eye: EXTERIOR_EYE,
            target: Vec3::ZERO,
            fov_degrees: EXTERIOR_FOV_DEGREES,
        }
    }
}

pub fn exterior_camera() -> (RtsCamera, RtsCameraControls) {
    (
        RtsCamera {
            bounds: Aabb2d::new(Vec2::ZERO, Vec2::new(GROUND_SIZE, GROUND_SIZE)),
            min_angle: 0.3,
            height_max: 60.0,
            ..default()
        },
        RtsCameraControls {
            key_up: KeyCode::KeyW,
            key_down: KeyCode::KeyS,
            key_left: KeyCode::KeyA,
            key_right: KeyCode::KeyD,
            key_rotate_left: KeyCode::KeyQ,
            key_rotate_right: KeyCode::KeyE,
            pan_speed: 15.0,
            zoom_sensitivity: 0.15,
            edge_pan_width: 0.0,
            ..default()
        },
    )
}

#[derive(Component)]
pub struct ViewerCamera;

/// Orbit of the inside camera around its eye-height target, MMB drag and scroll
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct InsideOrbit {
    pub yaw: f32,
    pub pitch: f32,
    pub radius: f32,
}

impl Default for InsideOrbit {
    fn default() -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.0,
            radius: INSIDE_EYE_BACKOFF,
        }
    }
}

impl InsideOrbit {
    pub fn rotate(&mut self, drag: Vec2) {
        self.yaw -= drag.x * INSIDE_ORBIT_SENSITIVITY;
        self.pitch = (self.pitch + drag.y * INSIDE_ORBIT_SENSITIVITY)
            .clamp(-INSIDE_PITCH_LIMIT, INSIDE_PITCH_LIMIT);
    }

    pub fn zoom(&mut self, scroll: f32) {
        self.radius = (self.radius - scroll * INSIDE_ZOOM_STEP).clamp(INSIDE_MIN_RADIUS, INSIDE_MAX_RADIUS);
    }

    // yaw 0 puts the eye on +Z of the target
    pub fn eye(&self, target: Vec3) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        target + Vec3::new(sin_yaw * cos_pitch, sin_pitch, cos_yaw * cos_pitch) * self.radius
    }

    pub fn transform(&self, target: Vec3) -> Transform {
        Transform::from_translation(self.eye(target)).looking_at(target, Vec3::Y)
    }
}

pub struct ViewPlugin;

impl Plugin for ViewPlugin {
    fn build(&self, app: &mut App) {
        app
            .init_resource::<ViewSettings>()
            .add_systems(Startup, spawn_camera)
            .add_systems(
                Update,
                (
                    apply_view_mode.run_if(
                        resource_changed::<ViewSettings>.or(resource_changed::<HouseSettings>),
                    ),
                    inside_look_around.run_if(|view: Res<ViewSettings>| view.inside_view),
                )
                    .chain(),
            );
    }
}

fn spawn_camera(mut commands: Commands) {
    let pose = camera_pose(false, DEFAULT_FLOOR_SPACING);
    commands.spawn((ViewerCamera, Camera3d::default(), exterior_camera(), pose.projection(), pose.transform()));
}

fn apply_view_mode(
    mut commands: Commands,
    view: Res<ViewSettings>,
    settings: Res<HouseSettings>,
    mut cameras: Query<
        (Entity, &mut Transform, &mut Projection, Has<RtsCamera>, Option<&InsideOrbit>),
        With<ViewerCamera>,
    >,
) {
    let pose = camera_pose(view.inside_view, settings.floor_spacing);

    for (entity, mut transform, mut projection, has_rts, orbit) in &mut cameras {
        if view.inside_view {
            // the RTS rig would fight the orbit
            if has_rts {
                commands
                    .entity(entity)
                    .remove::<(RtsCamera, RtsCameraControls)>()
                    .insert(InsideOrbit::default());
                info!("Switched to inside view");
            }
            // keep the user's orbit when only the spacing moved
            *transform = orbit.copied().unwrap_or_default().transform(pose.target);
        } else if !has_rts {
            commands
                .entity(entity)
                .remove::<InsideOrbit>()
                .insert(exterior_camera());
            *transform = pose.transform();
            info!("Switched to exterior view");
        }

        if let Projection::Perspective(perspective) = projection.as_mut() {
            let fov = pose.fov_degrees.to_radians();
            if perspective.fov != fov {
                perspective.fov = fov;
            }
        }
    }
}

fn inside_look_around(
    mut contexts: EguiContexts,
    mouse: Res<ButtonInput<MouseButton>>,
    motion: Res<AccumulatedMouseMotion>,
    scroll: Res<AccumulatedMouseScroll>,
    view: Res<ViewSettings>,
    settings: Res<HouseSettings>,
    mut cameras: Query<(&mut Transform, &mut InsideOrbit), With<ViewerCamera>>,
) {
    // drags and scrolls over the panel belong to egui
    if let Ok(ctx) = contexts.ctx_mut() {
        if ctx.is_pointer_over_area() || ctx.wants_pointer_input() {
            return;
        }
    }

    let drag = if mouse.pressed(MouseButton::Middle) { motion.delta } else { Vec2::ZERO };
    if drag == Vec2::ZERO && scroll.delta.y == 0.0 {
        return;
    }

    let target = camera_pose(view.inside_view, settings.floor_spacing).target;
    for (mut transform, mut orbit) in &mut cameras {
        orbit.rotate(drag);
        orbit.zoom(scroll.delta.y);
        *transform = orbit.transform(target);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn exterior_pose_looks_at_origin() {
        let pose = camera_pose(false, 7.0);
        assert_eq!(pose.eye, Vec3::new(10.0, 15.0, 15.0));
        assert_eq!(pose.target, Vec3::ZERO);
        assert_eq!(pose.fov_degrees, 45.0);
    }

    #[test]
    fn inside_pose_follows_middle_floor() {
        let pose = camera_pose(true, 3.0);
        let eye_y = HOUSE_BASE_OFFSET + 3.0 + INSIDE_EYE_HEIGHT;
        assert!((pose.eye.y - eye_y).abs() < 1e-5);
        assert_eq!(pose.eye.z, INSIDE_EYE_BACKOFF);
        assert_eq!(pose.target.y, pose.eye.y);
        assert_eq!(pose.fov_degrees, 60.0);

        let higher = camera_pose(true, 4.0);
        assert!((higher.eye.y - pose.eye.y - 1.0).abs() < 1e-5);
    }

    #[test]
    fn default_orbit_matches_inside_pose() {
        let pose = camera_pose(true, 3.0);
        let orbit = InsideOrbit::default();
        assert!((orbit.eye(pose.target) - pose.eye).length() < 1e-5);
    }

    #[test]
    fn orbit_keeps_distance_and_clamps() {
        let target = Vec3::new(0.0, 2.7, 0.0);
        let mut orbit = InsideOrbit::default();

        // quarter turn to the right puts the eye on -X
        orbit.rotate(Vec2::new(FRAC_PI_2 / INSIDE_ORBIT_SENSITIVITY, 0.0));
        let eye = orbit.eye(target);
        assert!((eye - Vec3::new(-INSIDE_EYE_BACKOFF, 2.7, 0.0)).length() < 1e-4);
        assert!((eye.distance(target) - orbit.radius).abs() < 1e-4);

        orbit.rotate(Vec2::new(0.0, 10_000.0));
        assert_eq!(orbit.pitch, INSIDE_PITCH_LIMIT);
        assert!(orbit.eye(target).y > target.y);

        orbit.zoom(100.0);
        assert_eq!(orbit.radius, INSIDE_MIN_RADIUS);
        orbit.zoom(-100.0);
        assert_eq!(orbit.radius, INSIDE_MAX_RADIUS);
    }

    #[test]
    fn orbit_camera_faces_target() {
        let target = Vec3::new(0.0, 2.7, 0.0);
        let orbit = InsideOrbit { yaw: 0.7, pitch: 0.3, radius: 3.0 };
        let transform = orbit.transform(target);
        let to_target = (target - transform.translation).normalize();
        assert!((transform.forward().as_vec3() - to_target).length() < 1e-5);
    }

    #[test]
    fn inside_camera_looks_level() {
        let forward = camera_pose(true, 3.0).transform().forward();
        assert!((forward.as_vec3() - Vec3::NEG_Z).length() < 1e-5);
    }
}
