//! This module draws [`ParticleSet`]s with the twinkling particle shader.
//!
//! Bevy has no point sprites, so every particle becomes a quad of four vertices which all sit at
//! the particle's position. The shader pushes each vertex out to its corner in view space.

use bevy::{
    pbr::{MaterialPipeline, MaterialPipelineKey},
    prelude::*,
    reflect::TypeUuid,
    render::{
        mesh::{Indices, MeshVertexAttribute, MeshVertexBufferLayout},
        render_resource::{
            AsBindGroup, BlendComponent, BlendFactor, BlendOperation, BlendState,
            PrimitiveTopology, RenderPipelineDescriptor, ShaderRef, ShaderType,
            SpecializedMeshPipelineError, VertexFormat,
        },
    },
};
use crate::scene::SceneState;
use tracing::{debug, instrument, trace};
use tracing_unwrap::OptionExt;
use tt_geometry::ParticleSet;
use tt_shading::{point_world_scale, ShadingState, PARTICLE_SHADER};

/// The handle of the particle shader, which is added to the shader assets on startup.
pub const PARTICLE_SHADER_HANDLE: HandleUntyped =
    HandleUntyped::weak_from_u64(Shader::TYPE_UUID, 0x5a1e_7c0d_e2b4_91f3);

/// The size of each particle.
pub const ATTRIBUTE_PARTICLE_SIZE: MeshVertexAttribute =
    MeshVertexAttribute::new("Particle_Size", 0x7e5f_0a21, VertexFormat::Float32);

/// The category of each particle, as 0 for leaves and 1 for ornaments.
pub const ATTRIBUTE_PARTICLE_CATEGORY: MeshVertexAttribute =
    MeshVertexAttribute::new("Particle_Category", 0x7e5f_0a22, VertexFormat::Float32);

/// The corners of each quad, which double as the position within the particle's footprint.
const CORNERS: [[f32; 2]; 4] = [[0., 0.], [1., 0.], [1., 1.], [0., 1.]];

/// The uniform shared by every particle.
#[derive(Clone, Copy, Debug, Default, ShaderType)]
pub struct ParticleUniform {
    /// Seconds since the scene was mounted.
    pub time: f32,

    /// The view-space width of a particle of size 1.
    pub point_scale: f32,
}

/// The material for soft, additively blended, twinkling particles.
#[derive(AsBindGroup, TypeUuid, Clone, Debug, Default)]
#[uuid = "3f1c6a52-8b0e-4d8e-9a0b-6f3d2c1e7b54"]
pub struct ParticleMaterial {
    /// The per-frame uniform.
    #[uniform(0)]
    pub uniform: ParticleUniform,
}

impl Material for ParticleMaterial {
    fn vertex_shader() -> ShaderRef {
        PARTICLE_SHADER_HANDLE.typed().into()
    }

    fn fragment_shader() -> ShaderRef {
        PARTICLE_SHADER_HANDLE.typed().into()
    }

    fn alpha_mode(&self) -> AlphaMode {
        AlphaMode::Blend
    }

    fn specialize(
        _pipeline: &MaterialPipeline<Self>,
        descriptor: &mut RenderPipelineDescriptor,
        layout: &MeshVertexBufferLayout,
        _key: MaterialPipelineKey<Self>,
    ) -> Result<(), SpecializedMeshPipelineError> {
        let vertex_layout = layout.get_layout(&[
            Mesh::ATTRIBUTE_POSITION.at_shader_location(0),
            Mesh::ATTRIBUTE_COLOR.at_shader_location(1),
            Mesh::ATTRIBUTE_UV_0.at_shader_location(2),
            ATTRIBUTE_PARTICLE_SIZE.at_shader_location(3),
            ATTRIBUTE_PARTICLE_CATEGORY.at_shader_location(4),
        ])?;
        descriptor.vertex.buffers = vec![vertex_layout];

        // Additive blending, so overlapping particles glow
        if let Some(fragment) = descriptor.fragment.as_mut() {
            for target in fragment.targets.iter_mut().flatten() {
                target.blend = Some(BlendState {
                    color: BlendComponent {
                        src_factor: BlendFactor::SrcAlpha,
                        dst_factor: BlendFactor::One,
                        operation: BlendOperation::Add,
                    },
                    alpha: BlendComponent {
                        src_factor: BlendFactor::One,
                        dst_factor: BlendFactor::One,
                        operation: BlendOperation::Add,
                    },
                });
            }
        }

        if let Some(depth_stencil) = descriptor.depth_stencil.as_mut() {
            depth_stencil.depth_write_enabled = false;
        }

        // Quads face the camera, but their winding depends on the view
        descriptor.primitive.cull_mode = None;

        Ok(())
    }
}

/// The single material used by every particle cloud.
#[derive(Resource, Clone, Debug, Deref)]
pub struct ParticleMaterialHandle(pub Handle<ParticleMaterial>);

/// The plugin which registers the particle shader and material.
pub struct ParticlePlugin;

impl Plugin for ParticlePlugin {
    fn build(&self, app: &mut App) {
        app.world
            .resource_mut::<Assets<Shader>>()
            .set_untracked(PARTICLE_SHADER_HANDLE, Shader::from_wgsl(PARTICLE_SHADER));

        app.add_plugin(MaterialPlugin::<ParticleMaterial>::default());

        let handle = app
            .world
            .resource_mut::<Assets<ParticleMaterial>>()
            .add(ParticleMaterial::default());
        app.insert_resource(ParticleMaterialHandle(handle));
    }
}

/// Build a mesh of camera-facing quads for the given particles.
#[instrument(skip_all, fields(particles = particles.len()))]
pub fn particle_mesh(particles: &ParticleSet) -> Mesh {
    let vertex_count = particles.len() * CORNERS.len();
    let mut positions = Vec::with_capacity(vertex_count);
    let mut normals = Vec::with_capacity(vertex_count);
    let mut corners = Vec::with_capacity(vertex_count);
    let mut colours = Vec::with_capacity(vertex_count);
    let mut sizes = Vec::with_capacity(vertex_count);
    let mut categories = Vec::with_capacity(vertex_count);

    for particle in particles.iter() {
        let [r, g, b] = particle.colour;
        for corner in CORNERS {
            positions.push(particle.position.to_array());
            normals.push([0., 0., 1.]);
            corners.push(corner);
            colours.push([r, g, b, 1.]);
            sizes.push(particle.size);
            categories.push(particle.category.shader_value());
        }
    }

    let indices = (0..particles.len() as u32)
        .flat_map(|i| {
            let first = i * 4;
            [first, first + 1, first + 2, first, first + 2, first + 3]
        })
        .collect();

    let mut mesh = Mesh::new(PrimitiveTopology::TriangleList);
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
    mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, corners);
    mesh.insert_attribute(Mesh::ATTRIBUTE_COLOR, colours);
    mesh.insert_attribute(ATTRIBUTE_PARTICLE_SIZE, sizes);
    mesh.insert_attribute(ATTRIBUTE_PARTICLE_CATEGORY, categories);
    mesh.set_indices(Some(Indices::U32(indices)));

    debug!(vertices = vertex_count, "Built particle mesh");
    mesh
}

/// Write the shading state and the current point scale into the particle material.
pub fn update_particle_uniform(
    scene: Res<SceneState>,
    windows: Res<Windows>,
    cameras: Query<&Projection, With<Camera3d>>,
    handle: Res<ParticleMaterialHandle>,
    mut materials: ResMut<Assets<ParticleMaterial>>,
) {
    let Some(window) = windows.get_primary() else {
        return;
    };
    let Some(Projection::Perspective(projection)) = cameras.iter().next() else {
        return;
    };

    let state: ShadingState = scene.shading();
    let focal_scale = 1. / (projection.fov / 2.).tan();
    let uniform = ParticleUniform {
        time: state.elapsed(),
        point_scale: point_world_scale(window.physical_height() as f32, focal_scale),
    };
    trace!(?uniform);

    materials
        .get_mut(&handle.0)
        .expect_or_log("The particle material should never be removed")
        .uniform = uniform;
}
