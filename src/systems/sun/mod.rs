// day/night simulation: sun light, ambient level and sky colour follow the clock
use bevy::color::Mix;
use bevy::pbr::{CascadeShadowConfig, CascadeShadowConfigBuilder};
use bevy::prelude::*;
use std::f32::consts::{FRAC_PI_2, PI};

use crate::config::*;

pub mod solar;

use solar::SolarAngles;

/// Clock inputs from the control panel
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct SunSettings {
    pub time_of_day: f32,  // hours, [0, 24)
    pub season_month: u32, // zero based
}

impl Default for SunSettings {
    fn default() -> Self {
        Self {
            time_of_day: DEFAULT_TIME_OF_DAY,
            season_month: DEFAULT_SEASON_MONTH,
        }
    }
}

impl SunSettings {
    pub fn set_time_of_day(&mut self, hours: f32) {
        self.time_of_day = hours.rem_euclid(24.0);
    }

    pub fn set_season_month(&mut self, month: u32) {
        self.season_month = month.min(11);
    }
}

/// Derived sun state, recomputed whenever the clock or site changes
#[derive(Resource, Debug, Clone, Default)]
pub struct SunState {
    pub position: Vec3,
    pub angles: Option<SolarAngles>,
    pub ambient: f32,
}

impl SunState {
    pub fn is_night(&self) -> bool {
        self.position.y < 0.0
    }
}

#[derive(Component)]
pub struct SunLight;

/// Spherical coordinates with `phi` measured down from +Y and `theta` around it from +Z
pub fn spherical_to_cartesian(radius: f32, phi: f32, theta: f32) -> Vec3 {
    let sin_phi = phi.sin();
    Vec3::new(
        radius * sin_phi * theta.sin(),
        radius * phi.cos(),
        radius * sin_phi * theta.cos(),
    )
}

pub fn map_linear(x: f32, a1: f32, a2: f32, b1: f32, b2: f32) -> f32 {
    b1 + (x - a1) * (b2 - b1) / (a2 - a1)
}

pub fn sun_position_from_angles(angles: SolarAngles, north_offset_degrees: f32) -> Vec3 {
    let phi = FRAC_PI_2 - angles.altitude as f32;
    let theta = angles.azimuth as f32 + north_offset_degrees.to_radians();
    spherical_to_cartesian(SUN_DISTANCE, phi, theta)
}

/// Fallback sun: 6h to 18h sweeps phi linearly over [0, PI], extrapolating outside.
pub fn simple_sun_position(time_of_day: f32) -> Vec3 {
    let phi = map_linear(time_of_day, 6.0, 18.0, 0.0, PI);
    spherical_to_cartesian(SUN_DISTANCE, phi, PI * 0.2)
}

/// Site-accurate sun, falls back to the simple sweep if the date cannot be built
pub fn compute_sun_state(settings: &SunSettings, site: &SiteConfig) -> SunState {
    let angles = match solar::site_datetime(settings.time_of_day, settings.season_month, site) {
        Ok(at) => Some(solar::solar_position(at, site.latitude, site.longitude)),
        Err(e) => {
            warn!("{e}; using simple sun sweep");
            None
        }
    };

    let position = match angles {
        Some(angles) => sun_position_from_angles(angles, site.north_offset_degrees),
        None => simple_sun_position(settings.time_of_day),
    };

    SunState {
        position,
        angles,
        ambient: ambient_intensity(position),
    }
}

// binary day/night step on the sun's height
pub fn ambient_intensity(sun_position: Vec3) -> f32 {
    if sun_position.y < 0.0 {
        AMBIENT_NIGHT
    } else {
        AMBIENT_DAY
    }
}

/// Sky tint from the sun's elevation: night, a warm band near the horizon, then day blue
pub fn sky_color(sun_position: Vec3) -> Color {
    let night = LinearRgba::from(Color::srgb(0.02, 0.03, 0.08));
    let horizon = LinearRgba::from(Color::srgb(0.95, 0.62, 0.42));
    let day = LinearRgba::from(Color::srgb(0.53, 0.75, 0.95));

    let elevation = (sun_position.y / sun_position.length().max(f32::EPSILON)).clamp(-1.0, 1.0);
    let sky = if elevation < 0.0 {
        night.mix(&horizon, ((elevation + 0.1) / 0.1).clamp(0.0, 1.0))
    } else {
        horizon.mix(&day, (elevation / 0.3).clamp(0.0, 1.0))
    };
    Color::from(sky)
}

// single cascade sized to the fixed [-20, 20] shadow box
fn shadow_config() -> CascadeShadowConfig {
    CascadeShadowConfigBuilder {
        num_cascades: 1,
        minimum_distance: 0.1,
        first_cascade_far_bound: SHADOW_HALF_EXTENT * 2.0,
        maximum_distance: SHADOW_HALF_EXTENT * 2.0,
        ..default()
    }
    .build()
}

pub struct SunPlugin;

impl Plugin for SunPlugin {
    fn build(&self, app: &mut App) {
        app
            .init_resource::<SiteConfig>()
            .init_resource::<SunSettings>()
            .init_resource::<SunState>()
            .add_systems(PreStartup, load_site_config)
            .add_systems(Startup, spawn_sun)
            .add_systems(
                Update,
                update_sun.run_if(
                    resource_changed::<SunSettings>.or(resource_changed::<SiteConfig>),
                ),
            );
    }
}

fn spawn_sun(mut commands: Commands) {
    commands.spawn((
        SunLight,
        DirectionalLight {
            illuminance: SUN_INTENSITY * SUN_LUX_PER_UNIT,
            shadows_enabled: true,
            ..default()
        },
        shadow_config(),
        Transform::from_xyz(0.0, SUN_DISTANCE, 0.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}

pub fn update_sun(
    settings: Res<SunSettings>,
    site: Res<SiteConfig>,
    mut state: ResMut<SunState>,
    mut ambient: ResMut<AmbientLight>,
    mut clear_color: ResMut<ClearColor>,
    mut lights: Query<&mut Transform, With<SunLight>>,
) {
    let was_night = state.is_night();
    *state = compute_sun_state(&settings, &site);

    for mut transform in &mut lights {
        *transform = Transform::from_translation(state.position).looking_at(Vec3::ZERO, Vec3::Y);
    }
    ambient.brightness = state.ambient * AMBIENT_BRIGHTNESS_SCALE;
    clear_color.0 = sky_color(state.position);

    if state.is_night() != was_night {
        info!(
            "Sun {} the horizon at {:.2}h",
            if state.is_night() { "below" } else { "above" },
            settings.time_of_day
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn equator_site() -> SiteConfig {
        SiteConfig {
            latitude: 0.0,
            longitude: 0.0,
            north_offset_degrees: 0.0,
            utc_offset_hours: 0.0,
        }
    }

    #[test]
    fn spherical_axes() {
        let up = spherical_to_cartesian(100.0, 0.0, 1.0);
        assert!((up - Vec3::new(0.0, 100.0, 0.0)).length() < 1e-3);

        let south = spherical_to_cartesian(100.0, FRAC_PI_2, 0.0);
        assert!((south - Vec3::new(0.0, 0.0, 100.0)).length() < 1e-3);
    }

    #[test]
    fn simple_sweep_rises_and_sets() {
        // phi is zero at six, so the fallback starts straight overhead
        assert!((simple_sun_position(6.0).y - SUN_DISTANCE).abs() < 1e-3);
        assert!(simple_sun_position(12.0).y.abs() < 1e-3);
        // extrapolated past eighteen the sun is below the horizon
        assert!(simple_sun_position(20.0).y < 0.0);
    }

    #[test]
    fn solar_position_sits_on_sun_sphere() {
        let state = compute_sun_state(&SunSettings::default(), &SiteConfig::default());
        assert!((state.position.length() - SUN_DISTANCE).abs() < 1e-2);
        assert!(state.angles.is_some());
    }

    #[test]
    fn night_dims_ambient_light() {
        let site = equator_site();
        let night = compute_sun_state(
            &SunSettings { time_of_day: 0.0, season_month: 2 },
            &site,
        );
        assert!(night.is_night());
        assert!(!night.angles.unwrap().is_above_horizon());
        assert_eq!(night.ambient, AMBIENT_NIGHT);

        let day = compute_sun_state(
            &SunSettings { time_of_day: 12.0, season_month: 2 },
            &site,
        );
        assert!(!day.is_night());
        assert_eq!(day.ambient, AMBIENT_DAY);
    }

    #[test]
    fn ambient_steps_on_the_horizon() {
        assert_eq!(ambient_intensity(Vec3::new(10.0, -0.01, 0.0)), AMBIENT_NIGHT);
        assert_eq!(ambient_intensity(Vec3::new(10.0, 0.0, 0.0)), AMBIENT_DAY);
    }

    #[test]
    fn north_offset_turns_the_sun_about_y() {
        let angles = SolarAngles { azimuth: 0.3, altitude: 0.6 };
        let base = sun_position_from_angles(angles, 0.0);
        let turned = sun_position_from_angles(angles, 90.0);
        let expected = Quat::from_rotation_y(FRAC_PI_2) * base;

        assert!((turned - expected).length() < 1e-3);
        assert!((turned.y - base.y).abs() < 1e-4);
    }

    #[test]
    fn sky_darkens_at_night() {
        let day = sky_color(Vec3::new(0.0, 100.0, 0.0)).to_linear();
        let night = sky_color(Vec3::new(0.0, -100.0, 0.0)).to_linear();
        assert!(day.blue > night.blue);
        assert!(day.green > night.green);
    }

    #[test]
    fn settings_wrap_and_clamp() {
        let mut settings = SunSettings::default();
        settings.set_time_of_day(25.5);
        assert!((settings.time_of_day - 1.5).abs() < 1e-5);
        settings.set_season_month(14);
        assert_eq!(settings.season_month, 11);
    }
}
