// Configuration file, all measurements in real-world meters (1 unit = 1 meter)
// Constants control the initial scene; the site file controls where the sun is

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ViewerError;

// Floor plan textures, relative to the assets folder
pub const BOTTOM_FLOOR_IMAGE: &str = "textures/bottom.jpg";
pub const MIDDLE_FLOOR_IMAGE: &str = "textures/middle.png";
pub const TOP_FLOOR_IMAGE: &str = "textures/top.png";
pub const FLOOR_PLAN_SHADER: &str = "shaders/floor_plan.wgsl";

// House layout
pub const HOUSE_BASE_OFFSET: f32 = -2.0;   // the whole house group sits below the origin
pub const FLOOR_BASE_WIDTH: f32 = 10.0;    // quad width; depth follows the image aspect
pub const FLOOR_SUBDIVISIONS: u32 = 127;   // inner cuts, a 128 x 128 cell grid for per-vertex relief
pub const SLAB_THICKNESS: f32 = 0.1;
pub const SLAB_DROP: f32 = 0.06;           // slab centre below the image quad
pub const SLAB_OPACITY_FACTOR: f32 = 0.6;
pub const GROUND_DROP: f32 = 0.12;         // shadow catcher under the bottom slab
pub const GROUND_SIZE: f32 = 40.0;

// UI defaults and slider ranges
pub const DEFAULT_FLOOR_SPACING: f32 = 3.0;
pub const MAX_FLOOR_SPACING: f32 = 10.0;
pub const DEFAULT_OPACITY: f32 = 1.0;
pub const MIN_OPACITY: f32 = 0.1;
pub const MAX_WALL_HEIGHT: f32 = 3.0;

// Matte shader defaults
pub const MATTE_THRESHOLD: f32 = 0.15;
pub const MATTE_SMOOTHNESS: f32 = 0.1;
pub const MATTE_DISCARD_ALPHA: f32 = 0.1;

// Relief shader constants
pub const RELIEF_LUMA_LOW: f32 = 0.4;
pub const RELIEF_LUMA_HIGH: f32 = 0.8;
pub const RELIEF_MIN_SCALE: f32 = 0.01;    // below this the surface stays flat

// Sun parameters
pub const SUN_DISTANCE: f32 = 100.0;
pub const SUN_INTENSITY: f32 = 1.5;
pub const SUN_LUX_PER_UNIT: f32 = 2_000.0; // maps the unitless intensity onto bevy lux
pub const SHADOW_HALF_EXTENT: f32 = 20.0;  // orthographic shadow box [-20, 20]
pub const AMBIENT_DAY: f32 = 0.6;
pub const AMBIENT_NIGHT: f32 = 0.2;
pub const AMBIENT_BRIGHTNESS_SCALE: f32 = 500.0;
pub const DEFAULT_TIME_OF_DAY: f32 = 12.0;
pub const DEFAULT_SEASON_MONTH: u32 = 5;   // zero based, June
pub const SUN_REFERENCE_YEAR: i32 = 2024;
pub const SUN_REFERENCE_DAY: u32 = 15;

// Measurement
pub const MEASURE_LABEL_LIFT: f32 = 0.5;
pub const MEASURE_MARKER_RADIUS: f32 = 0.1;
pub const MEASURE_LINE_WIDTH: f32 = 0.03;

// Scale figure, roughly an adult
pub const PERSON_HEIGHT: f32 = 1.8;
pub const PERSON_RADIUS: f32 = 0.25;
pub const PERSON_HEAD_RADIUS: f32 = 0.15;
pub const PERSON_OFFSET: Vec2 = Vec2::new(2.0, 2.0); // x/z inside the house group

// Camera poses
pub const EXTERIOR_EYE: Vec3 = Vec3::new(10.0, 15.0, 15.0);
pub const EXTERIOR_FOV_DEGREES: f32 = 45.0;
pub const INSIDE_EYE_HEIGHT: f32 = 1.7;
pub const INSIDE_EYE_BACKOFF: f32 = 5.0;
pub const INSIDE_FOV_DEGREES: f32 = 60.0;
pub const INSIDE_ORBIT_SENSITIVITY: f32 = 0.005; // radians per pixel of drag
pub const INSIDE_PITCH_LIMIT: f32 = 1.2;
pub const INSIDE_MIN_RADIUS: f32 = 0.5;
pub const INSIDE_MAX_RADIUS: f32 = 8.0;
pub const INSIDE_ZOOM_STEP: f32 = 0.5;

pub const MAX_UTC_OFFSET_HOURS: f64 = 14.0;

/// Geographic site the sun is computed for.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Degrees north, negative for the southern hemisphere
    pub latitude: f64,
    /// Degrees east, negative for west
    pub longitude: f64,
    /// Rotation of the plan relative to true north, in degrees
    pub north_offset_degrees: f32,
    /// Site-local clock offset from UTC, in hours
    pub utc_offset_hours: f64,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            latitude: 52.52,
            longitude: 13.405,
            north_offset_degrees: 0.0,
            utc_offset_hours: 1.0,
        }
    }
}

impl SiteConfig {
    pub fn path() -> PathBuf {
        Path::new("config").join("site.json")
    }

    pub fn load(path: &Path) -> Result<Self, ViewerError> {
        let content = fs::read_to_string(path).map_err(|source| ViewerError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let site = Self::from_json(&content).map_err(|source| ViewerError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;

        // real zones span UTC-12 to UTC+14
        if site.utc_offset_hours.is_nan() || site.utc_offset_hours.abs() > MAX_UTC_OFFSET_HOURS {
            return Err(ViewerError::UtcOffsetOutOfRange {
                path: path.to_path_buf(),
                hours: site.utc_offset_hours,
            });
        }
        Ok(site)
    }

    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }
}

// runs before the sun plugin reads the site
pub fn load_site_config(mut commands: Commands) {
    let path = SiteConfig::path();
    let site = if path.exists() {
        match SiteConfig::load(&path) {
            Ok(site) => {
                info!("Loaded site configuration from {}", path.display());
                site
            }
            Err(e) => {
                warn!("{e}; using default site");
                SiteConfig::default()
            }
        }
    } else {
        info!("No site file at {}, using default site", path.display());
        SiteConfig::default()
    };

    debug!(
        "Site at lat {:.3}, lon {:.3}, utc{:+}",
        site.latitude, site.longitude, site.utc_offset_hours
    );
    commands.insert_resource(site);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_site_file_keeps_defaults() {
        let site = SiteConfig::from_json(r#"{ "latitude": -33.87 }"#).unwrap();
        assert_eq!(site.latitude, -33.87);
        assert_eq!(site.longitude, SiteConfig::default().longitude);
        assert_eq!(site.north_offset_degrees, 0.0);
    }

    #[test]
    fn site_round_trips_through_json() {
        let site = SiteConfig {
            latitude: 45.0,
            longitude: -73.5,
            north_offset_degrees: 12.5,
            utc_offset_hours: -5.0,
        };
        let json = serde_json::to_string(&site).unwrap();
        assert_eq!(SiteConfig::from_json(&json).unwrap(), site);
    }

    #[test]
    fn malformed_site_file_is_a_parse_error() {
        let dir = std::env::temp_dir().join("house_viz_site_test");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("site.json");
        fs::write(&path, "{ latitude: nope").unwrap();

        let err = SiteConfig::load(&path).unwrap_err();
        assert!(matches!(err, ViewerError::ConfigParse { .. }));
    }

    #[test]
    fn out_of_range_utc_offset_is_rejected() {
        let dir = std::env::temp_dir().join("house_viz_offset_test");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("site.json");
        fs::write(&path, r#"{ "utc_offset_hours": 1e12 }"#).unwrap();

        let err = SiteConfig::load(&path).unwrap_err();
        assert!(matches!(err, ViewerError::UtcOffsetOutOfRange { hours, .. } if hours == 1e12));

        fs::write(&path, r#"{ "utc_offset_hours": -10.0 }"#).unwrap();
        assert_eq!(SiteConfig::load(&path).unwrap().utc_offset_hours, -10.0);
    }

    #[test]
    fn missing_site_file_is_a_read_error() {
        let err = SiteConfig::load(Path::new("does/not/exist/site.json")).unwrap_err();
        assert!(matches!(err, ViewerError::ConfigRead { .. }));
    }
}
