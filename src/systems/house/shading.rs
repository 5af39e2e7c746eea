// CPU reference for the floor plan shader
// assets/shaders/floor_plan.wgsl evaluates exactly these formulas on the GPU

use bevy::prelude::*;

use crate::config::*;

/// Cubic Hermite ramp between two edges, same as GLSL/WGSL `smoothstep`.
/// Equal edges collapse to a hard step at the edge.
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    if edge1 <= edge0 {
        return if x < edge0 { 0.0 } else { 1.0 };
    }
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Chroma-key settings: colours within `threshold` of white vanish,
/// colours beyond `threshold + smoothness` stay opaque.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatteParams {
    pub threshold: f32,
    pub smoothness: f32,
}

impl Default for MatteParams {
    fn default() -> Self {
        Self {
            threshold: MATTE_THRESHOLD,
            smoothness: MATTE_SMOOTHNESS,
        }
    }
}

pub fn matte_alpha(rgb: Vec3, params: MatteParams) -> f32 {
    let dist = rgb.distance(Vec3::ONE);
    smoothstep(params.threshold, params.threshold + params.smoothness, dist)
}

/// Keys out the near-white background of a texel.
/// # Returns the output colour, or `None` when the fragment would be discarded
pub fn matte(color: Vec4, params: MatteParams, opacity: f32) -> Option<Vec4> {
    let alpha = color.w * matte_alpha(color.truncate(), params) * opacity;
    if alpha < MATTE_DISCARD_ALPHA {
        return None;
    }
    Some(color.truncate().extend(alpha))
}

// Rec. 601 luma
pub fn luminance(rgb: Vec3) -> f32 {
    rgb.dot(Vec3::new(0.299, 0.587, 0.114))
}

/// How far a texel rises, 1 for dark wall lines and 0 for bright open floor.
pub fn relief_depth(rgb: Vec3) -> f32 {
    1.0 - smoothstep(RELIEF_LUMA_LOW, RELIEF_LUMA_HIGH, luminance(rgb))
}

/// Pushes a vertex out along its normal by the relief of the texel under it.
pub fn displace(position: Vec3, normal: Vec3, rgb: Vec3, scale: f32) -> Vec3 {
    if scale <= RELIEF_MIN_SCALE {
        return position;
    }
    position + normal * relief_depth(rgb) * scale
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn smoothstep_clamps_and_eases() {
        assert_eq!(smoothstep(0.2, 0.4, 0.1), 0.0);
        assert_eq!(smoothstep(0.2, 0.4, 0.5), 1.0);
        assert!((smoothstep(0.2, 0.4, 0.3) - 0.5).abs() < EPS);
        assert_eq!(smoothstep(0.3, 0.3, 0.29), 0.0);
        assert_eq!(smoothstep(0.3, 0.3, 0.3), 1.0);
    }

    #[test]
    fn white_background_becomes_transparent() {
        let params = MatteParams::default();
        assert_eq!(matte_alpha(Vec3::ONE, params), 0.0);
        assert_eq!(matte_alpha(Vec3::splat(0.95), params), 0.0);
        assert!(matte(Vec4::ONE, params, 1.0).is_none());
    }

    #[test]
    fn plan_lines_stay_opaque() {
        let params = MatteParams::default();
        let ink = Vec4::new(0.1, 0.1, 0.2, 1.0);
        let out = matte(ink, params, 1.0).unwrap();
        assert_eq!(out.truncate(), ink.truncate());
        assert_eq!(out.w, 1.0);

        let red = Vec4::new(0.9, 0.1, 0.1, 1.0);
        assert_eq!(matte_alpha(red.truncate(), params), 1.0);
    }

    #[test]
    fn alpha_ramp_is_bounded_and_monotonic() {
        let params = MatteParams { threshold: 0.2, smoothness: 0.3 };
        let mut previous = 0.0;
        // walk from white towards black, distance grows monotonically
        for step in 0..=100 {
            let grey = 1.0 - step as f32 / 100.0;
            let rgb = Vec3::splat(grey);
            let dist = rgb.distance(Vec3::ONE);
            let alpha = matte_alpha(rgb, params);

            if dist <= params.threshold {
                assert_eq!(alpha, 0.0);
            }
            if dist >= params.threshold + params.smoothness {
                assert_eq!(alpha, 1.0);
            }
            assert!(alpha >= previous);
            previous = alpha;
        }
    }

    #[test]
    fn opacity_scales_output_alpha_and_discards_faint_fragments() {
        let params = MatteParams::default();
        let ink = Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert!((matte(ink, params, 0.5).unwrap().w - 0.5).abs() < EPS);
        assert!(matte(ink, params, 0.05).is_none());
    }

    #[test]
    fn zero_scale_leaves_vertex_untouched() {
        let position = Vec3::new(1.5, 0.0, -2.0);
        for rgb in [Vec3::ZERO, Vec3::splat(0.5), Vec3::ONE] {
            assert_eq!(displace(position, Vec3::Y, rgb, 0.0), position);
            assert_eq!(displace(position, Vec3::Y, rgb, 0.01), position);
        }
    }

    #[test]
    fn black_rises_fully_and_bright_stays_flat() {
        let scale = 2.5;
        let wall = displace(Vec3::ZERO, Vec3::Y, Vec3::ZERO, scale);
        assert!((wall.y - scale).abs() < EPS);

        let floor = displace(Vec3::ZERO, Vec3::Y, Vec3::splat(0.8), scale);
        assert!(floor.y.abs() < EPS);
        let paper = displace(Vec3::ZERO, Vec3::Y, Vec3::ONE, scale);
        assert!(paper.y.abs() < EPS);
    }

    #[test]
    fn luminance_weights_green_highest() {
        assert!((luminance(Vec3::ONE) - 1.0).abs() < EPS);
        assert!(luminance(Vec3::Y) > luminance(Vec3::X));
        assert!(luminance(Vec3::X) > luminance(Vec3::Z));
    }
}
