//! This module puts the star on top of the tree, along with the sparkles around it.

use crate::{
    floating::Floating,
    particles::{particle_mesh, ParticleMaterial},
};
use bevy::{
    prelude::*,
    render::{mesh::Indices, render_resource::PrimitiveTopology, view::NoFrustumCulling},
};
use tt_geometry::{StarPrism, GOLD};
use tt_scene::TreeScene;

/// The star on top of the tree.
#[derive(Component, Clone, Copy, Debug)]
pub struct Star;

/// Build a Bevy mesh of the star.
pub fn star_mesh() -> Mesh {
    let StarPrism {
        positions,
        normals,
        indices,
    } = StarPrism::new();
    let uvs = vec![[0., 0.]; positions.len()];

    let mut mesh = Mesh::new(PrimitiveTopology::TriangleList);
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
    mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, uvs);
    mesh.set_indices(Some(Indices::U32(indices)));
    mesh
}

/// Spawn the star and its sparkles as children of the tree group, at the apex of the tree.
pub fn spawn_star(
    group: &mut ChildBuilder,
    scene: &TreeScene,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    particle_material: Handle<ParticleMaterial>,
) {
    let [r, g, b] = GOLD;
    let gold = Color::rgb_u8(r, g, b);
    let apex = Vec3::new(0., scene.dimensions().height / 2., 0.);

    group
        .spawn(SpatialBundle {
            transform: Transform::from_translation(apex),
            ..default()
        })
        .with_children(|anchor| {
            anchor
                .spawn((SpatialBundle::default(), Floating(scene.star_motion())))
                .with_children(|floating| {
                    floating.spawn((
                        PbrBundle {
                            mesh: meshes.add(star_mesh()),
                            material: materials.add(StandardMaterial {
                                base_color: gold,
                                emissive: gold,
                                unlit: true,
                                ..default()
                            }),
                            ..default()
                        },
                        Star,
                    ));

                    floating.spawn((
                        MaterialMeshBundle {
                            mesh: meshes.add(particle_mesh(scene.star_sparkles())),
                            material: particle_material,
                            ..default()
                        },
                        NoFrustumCulling,
                    ));
                });
        });
}
