// builds the renderable pieces of one floor: image quad + slab
use bevy::prelude::*;

use crate::config::*;

/// Footprint of a floor quad on the XZ plane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceSize {
    pub width: f32,
    pub depth: f32,
}

impl SurfaceSize {
    pub fn from_ratio(height_ratio: f32) -> Self {
        Self {
            width: FLOOR_BASE_WIDTH,
            depth: FLOOR_BASE_WIDTH * height_ratio,
        }
    }

    pub fn half_extents(&self) -> Vec2 {
        Vec2::new(self.width, self.depth) * 0.5
    }
}

/// Image height over width, 1.0 for degenerate images
pub fn image_ratio(width: u32, height: u32) -> f32 {
    if width == 0 || height == 0 {
        return 1.0;
    }
    height as f32 / width as f32
}

// dense grid so the vertex stage can resolve wall outlines
pub fn quad_mesh(size: SurfaceSize) -> Mesh {
    Plane3d::default()
        .mesh()
        .size(size.width, size.depth)
        .subdivisions(FLOOR_SUBDIVISIONS)
        .build()
}

pub fn slab_mesh(size: SurfaceSize) -> Mesh {
    Cuboid::new(size.width, SLAB_THICKNESS, size.depth).into()
}

pub fn slab_material(opacity: f32) -> StandardMaterial {
    StandardMaterial {
        base_color: slab_color(opacity),
        alpha_mode: AlphaMode::Blend,
        perceptual_roughness: 0.9,
        ..default()
    }
}

// #e0e0e0 tinted by the floor opacity
pub fn slab_color(opacity: f32) -> Color {
    Color::srgba_u8(0xe0, 0xe0, 0xe0, 255).with_alpha(SLAB_OPACITY_FACTOR * opacity)
}

pub fn slab_offset() -> Vec3 {
    Vec3::new(0.0, -SLAB_DROP, 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_follows_image_aspect() {
        let size = SurfaceSize::from_ratio(image_ratio(2000, 1500));
        assert_eq!(size.width, 10.0);
        assert!((size.depth - 7.5).abs() < 1e-5);
        assert_eq!(size.half_extents(), Vec2::new(5.0, 3.75));
    }

    #[test]
    fn unloaded_image_is_square() {
        assert_eq!(image_ratio(0, 0), 1.0);
        assert_eq!(SurfaceSize::from_ratio(1.0).depth, FLOOR_BASE_WIDTH);
    }

    #[test]
    fn slab_is_translucent_grey() {
        let color = slab_color(0.5).to_srgba();
        assert!((color.alpha - 0.3).abs() < 1e-5);
        assert!((color.red - 224.0 / 255.0).abs() < 1e-5);
    }

    #[test]
    fn quad_is_densely_subdivided() {
        let mesh = quad_mesh(SurfaceSize::from_ratio(1.0));
        // 128 cells a side, so 129 vertices a side
        assert_eq!(FLOOR_SUBDIVISIONS + 1, 128);
        assert_eq!(mesh.count_vertices(), 129 * 129);
    }
}
