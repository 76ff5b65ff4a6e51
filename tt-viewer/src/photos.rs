//! This module hangs the user's photos on the tree as framed cards, and works out when one of
//! them is clicked.

use crate::{
    floating::Floating,
    scene::{collect_changes, SceneChanged, SceneState, Spinner},
};
use bevy::{prelude::*, render::render_resource::Face, window::CursorIcon};
use smooth_bevy_cameras::controllers::orbit::OrbitCameraController;
use std::f32::consts::PI;
use tracing::{debug, instrument};
use tt_config::ImageRef;
use tt_geometry::{pick_card, CardBounds, MountedPhoto, Ray};
use tt_scene::SceneChanges;

/// The size of the white frame behind each photo.
const FRAME_SIZE: Vec3 = Vec3::new(1.6, 2.1, 0.05);

/// How far the frame sits behind the centre of the card.
const FRAME_OFFSET: f32 = -0.02;

/// The size of the photo itself, and of the plate on the back of the card.
const IMAGE_SIZE: Vec2 = Vec2::new(1.5, 2.);

/// How far the photo sits in front of the centre of the card.
const IMAGE_OFFSET: f32 = 0.02;

/// How far the back plate sits behind the centre of the card.
const BACK_OFFSET: f32 = -0.05;

/// The resting place of a photo card, in one of the slots on the tree.
#[derive(Component, Clone, Copy, Debug)]
pub struct PhotoMount;

/// The floating card itself, which is what gets clicked.
#[derive(Component, Clone, Copy, Debug)]
pub struct PhotoCard {
    /// The slot that this card is mounted in.
    pub slot_index: usize,
}

/// Sent when the user clicks on a photo card.
#[derive(Clone, Debug, PartialEq)]
pub struct PhotoSelected {
    /// The slot of the clicked card.
    pub slot_index: usize,

    /// The image on the clicked card.
    pub image: ImageRef,
}

/// The meshes and materials shared by every photo card.
#[derive(Resource, Clone, Debug)]
pub struct PhotoAssets {
    /// The white frame.
    frame_mesh: Handle<Mesh>,

    /// The quad used for both the photo and the back plate.
    image_mesh: Handle<Mesh>,

    /// The material of the frame.
    frame_material: Handle<StandardMaterial>,

    /// The material of the back plate.
    back_material: Handle<StandardMaterial>,
}

impl FromWorld for PhotoAssets {
    fn from_world(world: &mut World) -> Self {
        let mut meshes = world.resource_mut::<Assets<Mesh>>();
        let frame_mesh = meshes.add(Mesh::from(shape::Box::new(
            FRAME_SIZE.x,
            FRAME_SIZE.y,
            FRAME_SIZE.z,
        )));
        let image_mesh = meshes.add(Mesh::from(shape::Quad::new(IMAGE_SIZE)));

        let mut materials = world.resource_mut::<Assets<StandardMaterial>>();
        let frame_material = materials.add(StandardMaterial {
            base_color: Color::WHITE,
            perceptual_roughness: 0.8,
            double_sided: true,
            cull_mode: None,
            ..default()
        });
        let back_material = materials.add(StandardMaterial {
            base_color: Color::rgb_u8(0xe0, 0xe0, 0xe0),
            perceptual_roughness: 0.8,
            cull_mode: Some(Face::Back),
            ..default()
        });

        Self {
            frame_mesh,
            image_mesh,
            frame_material,
            back_material,
        }
    }
}

/// Spawn a card for each of the given photos as children of the spinning part of the tree.
pub fn spawn_photo_cards(
    spinner: &mut ChildBuilder,
    photos: &[MountedPhoto<ImageRef>],
    assets: &PhotoAssets,
    asset_server: &AssetServer,
    materials: &mut Assets<StandardMaterial>,
) {
    for photo in photos {
        let image_material = materials.add(StandardMaterial {
            base_color_texture: Some(asset_server.load(photo.image.as_str())),
            unlit: true,
            double_sided: true,
            cull_mode: None,
            ..default()
        });

        spinner
            .spawn((
                SpatialBundle {
                    transform: Transform::from_translation(photo.slot.position)
                        .with_rotation(photo.slot.rotation()),
                    ..default()
                },
                PhotoMount,
            ))
            .with_children(|mount| {
                mount
                    .spawn((
                        SpatialBundle::default(),
                        Floating(photo.motion),
                        PhotoCard {
                            slot_index: photo.slot_index,
                        },
                    ))
                    .with_children(|card| {
                        card.spawn(PbrBundle {
                            mesh: assets.frame_mesh.clone(),
                            material: assets.frame_material.clone(),
                            transform: Transform::from_xyz(0., 0., FRAME_OFFSET),
                            ..default()
                        });
                        card.spawn(PbrBundle {
                            mesh: assets.image_mesh.clone(),
                            material: image_material,
                            transform: Transform::from_xyz(0., 0., IMAGE_OFFSET),
                            ..default()
                        });
                        card.spawn(PbrBundle {
                            mesh: assets.image_mesh.clone(),
                            material: assets.back_material.clone(),
                            transform: Transform::from_xyz(0., 0., BACK_OFFSET)
                                .with_rotation(Quat::from_rotation_y(PI)),
                            ..default()
                        });
                    });
            });
    }
}

/// Replace all the photo cards when the photos have been remounted.
#[allow(clippy::too_many_arguments)]
pub fn remount_photos(
    mut commands: Commands,
    mut changed: EventReader<SceneChanged>,
    scene: Res<SceneState>,
    mounts: Query<Entity, With<PhotoMount>>,
    spinners: Query<Entity, With<Spinner>>,
    assets: Res<PhotoAssets>,
    asset_server: Res<AssetServer>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    if !collect_changes(&mut changed).contains(SceneChanges::PHOTOS) {
        return;
    }

    for mount in &mounts {
        commands.entity(mount).despawn_recursive();
    }

    let Ok(spinner) = spinners.get_single() else {
        return;
    };
    commands.entity(spinner).with_children(|spinner| {
        spawn_photo_cards(
            spinner,
            scene.photos(),
            &assets,
            &asset_server,
            &mut materials,
        )
    });
    debug!(photos = scene.photos().len(), "Remounted photos");
}

/// Convert a cursor position (from the bottom left of the window) into normalised device
/// coordinates.
pub fn cursor_to_ndc(cursor: Vec2, window_size: Vec2) -> Vec2 {
    cursor / window_size * 2. - Vec2::ONE
}

/// Find the photo card under the cursor, show a zoom cursor when hovering over one, and send
/// [`PhotoSelected`] when one is clicked.
///
/// A click on a card is consumed, so the camera controls ignore it for that frame.
#[instrument(skip_all)]
pub fn pick_photos(
    mouse_buttons: Res<Input<MouseButton>>,
    mut windows: ResMut<Windows>,
    cameras: Query<(&Camera, &GlobalTransform)>,
    cards: Query<(&PhotoCard, &GlobalTransform)>,
    scene: Res<SceneState>,
    mut selected: EventWriter<PhotoSelected>,
    mut controllers: Query<&mut OrbitCameraController>,
) {
    let mut consumed = false;

    if let (Some(window), Ok((camera, camera_transform))) =
        (windows.get_primary_mut(), cameras.get_single())
    {
        let hovered = window
            .cursor_position()
            .filter(|_| scene.config().active_image().is_none())
            .and_then(|cursor| {
                let size = Vec2::new(window.width(), window.height());
                Ray::from_viewport(
                    cursor_to_ndc(cursor, size),
                    camera_transform.compute_matrix(),
                    camera.projection_matrix(),
                )
            })
            .and_then(|ray| {
                pick_card(
                    ray,
                    cards
                        .iter()
                        .map(|(card, transform)| (card.slot_index, transform.compute_matrix())),
                    CardBounds::PHOTO,
                )
            });

        let icon = if hovered.is_some() {
            CursorIcon::ZoomIn
        } else {
            CursorIcon::Default
        };
        if window.cursor_icon() != icon {
            window.set_cursor_icon(icon);
        }

        if let Some((slot_index, _)) = hovered {
            if mouse_buttons.just_pressed(MouseButton::Left) {
                if let Some(photo) = scene
                    .photos()
                    .iter()
                    .find(|photo| photo.slot_index == slot_index)
                {
                    debug!(slot_index, image = %photo.image, "Clicked photo");
                    selected.send(PhotoSelected {
                        slot_index,
                        image: photo.image.clone(),
                    });
                    consumed = true;
                }
            }
        }
    }

    for mut controller in &mut controllers {
        if controller.enabled == consumed {
            controller.enabled = !consumed;
        }
    }
}
