/// Floor plan material: chroma-key in the fragment stage, wall relief in the vertex stage
use bevy::{
    pbr::{MaterialPipeline, MaterialPipelineKey},
    prelude::*,
    reflect::TypePath,
    render::{
        mesh::MeshVertexBufferLayoutRef,
        render_resource::{
            AsBindGroup, RenderPipelineDescriptor, ShaderRef, ShaderType,
            SpecializedMeshPipelineError,
        },
    },
};

use crate::config::*;
use super::shading::MatteParams;

/// Uniform block, layout mirrors `FloorPlanParams` in floor_plan.wgsl
#[derive(Debug, Clone, Copy, PartialEq, ShaderType)]
pub struct FloorPlanParams {
    pub threshold: f32,
    pub smoothness: f32,
    pub opacity: f32,
    pub displacement_scale: f32,
}

impl FloorPlanParams {
    pub fn new(opacity: f32, displacement_scale: f32) -> Self {
        let matte = MatteParams::default();
        Self {
            threshold: matte.threshold,
            smoothness: matte.smoothness,
            opacity: opacity.clamp(0.0, 1.0),
            displacement_scale: displacement_scale.max(0.0),
        }
    }

    pub fn matte(&self) -> MatteParams {
        MatteParams {
            threshold: self.threshold,
            smoothness: self.smoothness,
        }
    }
}

impl Default for FloorPlanParams {
    fn default() -> Self {
        Self::new(DEFAULT_OPACITY, 0.0)
    }
}

#[derive(Asset, TypePath, AsBindGroup, Debug, Clone)]
pub struct FloorPlanMaterial {
    #[texture(0, visibility(vertex, fragment))]
    #[sampler(1, visibility(vertex, fragment))]
    pub texture: Handle<Image>,

    #[uniform(2)]
    pub params: FloorPlanParams,
}

impl Material for FloorPlanMaterial {
    fn vertex_shader() -> ShaderRef {
        FLOOR_PLAN_SHADER.into()
    }

    fn fragment_shader() -> ShaderRef {
        FLOOR_PLAN_SHADER.into()
    }

    fn alpha_mode(&self) -> AlphaMode {
        AlphaMode::Blend
    }

    fn specialize(
        _pipeline: &MaterialPipeline<Self>,
        descriptor: &mut RenderPipelineDescriptor,
        layout: &MeshVertexBufferLayoutRef,
        _key: MaterialPipelineKey<Self>,
    ) -> Result<(), SpecializedMeshPipelineError> {
        // the shader reads exactly these three attributes
        let vertex_layout = layout.0.get_layout(&[
            Mesh::ATTRIBUTE_POSITION.at_shader_location(0),
            Mesh::ATTRIBUTE_NORMAL.at_shader_location(1),
            Mesh::ATTRIBUTE_UV_0.at_shader_location(2),
        ])?;
        descriptor.vertex.buffers = vec![vertex_layout];
        // plans are visible from below too
        descriptor.primitive.cull_mode = None;
        Ok(())
    }
}
