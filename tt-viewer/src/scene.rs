//! This module composes the scene: the lights, the tree group with its spinning particle cloud and
//! photos, the star, and the snow. It also feeds config edits into the [`TreeScene`] and rebuilds
//! whatever they changed.

use crate::{
    camera::{bloom_settings, spawn_camera},
    particles::{particle_mesh, ParticleMaterialHandle},
    photos::{spawn_photo_cards, PhotoAssets},
    star::spawn_star,
};
use bevy::{core_pipeline::bloom::BloomSettings, prelude::*, render::view::NoFrustumCulling};
use tracing::{debug, instrument, trace};
use tt_scene::{PendingConfig, SceneChanges, TreeScene};

/// Where the tree group sits in the world.
pub const TREE_GROUP_POSITION: Vec3 = Vec3::new(0., -2., 0.);

/// The colour behind everything.
pub fn background_colour() -> Color {
    Color::rgb_u8(0x05, 0x10, 0x0a)
}

/// The dim green light that fills the whole scene.
pub fn ambient_light() -> AmbientLight {
    AmbientLight {
        color: Color::rgb_u8(0x00, 0x42, 0x25),
        brightness: 0.5,
    }
}

/// The [`TreeScene`] that everything is drawn from.
#[derive(Resource, Debug, Deref, DerefMut)]
pub struct SceneState(pub TreeScene);

/// The config edits made this frame, which are applied to the scene all at once.
#[derive(Resource, Clone, Debug, Default, Deref, DerefMut)]
pub struct ConfigEdits(pub PendingConfig);

/// Sent after a config has been applied, with everything that changed.
#[derive(Clone, Copy, Debug)]
pub struct SceneChanged(pub SceneChanges);

/// The group holding everything attached to the tree.
#[derive(Component, Clone, Copy, Debug)]
pub struct TreeGroup;

/// The part of the tree group that rotates: the particle cloud and the photos.
#[derive(Component, Clone, Copy, Debug)]
pub struct Spinner;

/// The particle cloud of the tree itself.
#[derive(Component, Clone, Copy, Debug)]
pub struct TreeCloud;

/// The falling snow.
#[derive(Component, Clone, Copy, Debug)]
pub struct SnowCloud;

/// The gold spot light above the tree, which casts shadows on high quality.
#[derive(Component, Clone, Copy, Debug)]
pub struct KeyLight;

/// The meshes of the particle clouds that get replaced when the scene regenerates them.
#[derive(Resource, Clone, Debug)]
pub struct ParticleMeshes {
    /// The tree.
    tree: Handle<Mesh>,

    /// The snow.
    snow: Handle<Mesh>,
}

/// Merge all the changes sent this frame.
pub fn collect_changes(changed: &mut EventReader<SceneChanged>) -> SceneChanges {
    changed
        .iter()
        .fold(SceneChanges::empty(), |all, &SceneChanged(changes)| {
            all | changes
        })
}

/// Setup the Bevy world with the camera, the lights, and everything in the scene.
#[allow(clippy::too_many_arguments)]
pub fn setup_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    particle_material: Res<ParticleMaterialHandle>,
    photo_assets: Res<PhotoAssets>,
    asset_server: Res<AssetServer>,
    scene: Res<SceneState>,
) {
    let quality = scene.config().quality();
    spawn_camera(&mut commands, quality);

    let [r, g, b] = tt_geometry::GOLD;
    commands.spawn((
        SpotLightBundle {
            spot_light: SpotLight {
                color: Color::rgb_u8(r, g, b),
                intensity: 8000.,
                range: 60.,
                outer_angle: 0.3,
                inner_angle: 0.,
                shadows_enabled: quality.casts_shadows(),
                ..default()
            },
            transform: Transform::from_xyz(10., 20., 10.).looking_at(Vec3::ZERO, Vec3::Y),
            ..default()
        },
        KeyLight,
    ));

    commands.spawn(PointLightBundle {
        point_light: PointLight {
            color: Color::RED,
            intensity: 3000.,
            range: 40.,
            ..default()
        },
        transform: Transform::from_xyz(-10., -10., -10.),
        ..default()
    });

    let particle_meshes = ParticleMeshes {
        tree: meshes.add(particle_mesh(scene.particles())),
        snow: meshes.add(particle_mesh(scene.snow())),
    };

    commands.spawn((
        MaterialMeshBundle {
            mesh: particle_meshes.snow.clone(),
            material: particle_material.0.clone(),
            visibility: Visibility {
                is_visible: scene.config().show_snow(),
            },
            ..default()
        },
        NoFrustumCulling,
        SnowCloud,
    ));

    debug!("Adding tree to world");
    commands
        .spawn((
            SpatialBundle {
                transform: Transform::from_translation(TREE_GROUP_POSITION),
                ..default()
            },
            TreeGroup,
        ))
        .with_children(|group| {
            group
                .spawn((SpatialBundle::default(), Spinner))
                .with_children(|spinner| {
                    spinner.spawn((
                        MaterialMeshBundle {
                            mesh: particle_meshes.tree.clone(),
                            material: particle_material.0.clone(),
                            ..default()
                        },
                        NoFrustumCulling,
                        TreeCloud,
                    ));

                    spawn_photo_cards(
                        spinner,
                        scene.photos(),
                        &photo_assets,
                        &asset_server,
                        &mut materials,
                    );
                });

            spawn_star(
                group,
                &scene,
                &mut meshes,
                &mut materials,
                particle_material.0.clone(),
            );
        });
    debug!("Finished adding tree to world");

    commands.insert_resource(particle_meshes);
}

/// Advance the scene to the current time.
pub fn advance_scene(time: Res<Time>, mut scene: ResMut<SceneState>) {
    scene.advance(time.elapsed_seconds());
}

/// Rotate the particle cloud and the photos around the trunk.
pub fn spin_tree(scene: Res<SceneState>, mut spinners: Query<&mut Transform, With<Spinner>>) {
    let rotation = Quat::from_rotation_y(scene.shading().rotation_y());
    for mut transform in &mut spinners {
        transform.rotation = rotation;
    }
}

/// Apply this frame's config edits to the scene.
#[instrument(skip_all)]
pub fn apply_config_edits(
    mut edits: ResMut<ConfigEdits>,
    mut scene: ResMut<SceneState>,
    mut changed: EventWriter<SceneChanged>,
) {
    if edits.is_empty() {
        return;
    }
    let Some(config) = edits.take() else {
        return;
    };

    let changes = scene.apply(&config);
    trace!(?changes);

    if !changes.is_empty() {
        changed.send(SceneChanged(changes));
    }
}

/// Upload new particle meshes when the scene has regenerated them, and show or hide the snow.
pub fn rebuild_particles(
    mut changed: EventReader<SceneChanged>,
    scene: Res<SceneState>,
    handles: Res<ParticleMeshes>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut snow: Query<&mut Visibility, With<SnowCloud>>,
) {
    let changes = collect_changes(&mut changed);

    if changes.contains(SceneChanges::PARTICLES) {
        // Replacing the asset keeps the old buffers alive until the new ones are uploaded
        let _ = meshes.set(&handles.tree, particle_mesh(scene.particles()));
    }

    if changes.contains(SceneChanges::SNOW) {
        let _ = meshes.set(&handles.snow, particle_mesh(scene.snow()));
        for mut visibility in &mut snow {
            visibility.is_visible = scene.config().show_snow();
        }
    }
}

/// Turn bloom and shadows on or off when the quality tier changes.
pub fn update_quality(
    mut commands: Commands,
    mut changed: EventReader<SceneChanged>,
    scene: Res<SceneState>,
    cameras: Query<Entity, With<Camera3d>>,
    mut key_lights: Query<&mut SpotLight, With<KeyLight>>,
) {
    if !collect_changes(&mut changed).contains(SceneChanges::QUALITY) {
        return;
    }

    let quality = scene.config().quality();
    debug!(?quality, "Changing quality");

    for camera in &cameras {
        if quality.post_processing() {
            commands.entity(camera).insert(bloom_settings());
        } else {
            commands.entity(camera).remove::<BloomSettings>();
        }
    }

    for mut light in &mut key_lights {
        light.shadows_enabled = quality.casts_shadows();
    }
}
