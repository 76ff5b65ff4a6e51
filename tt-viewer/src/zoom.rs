//! This module shows a zoomed in photo over the whole scene.

use crate::{
    photos::PhotoSelected,
    scene::{collect_changes, ConfigEdits, SceneChanged, SceneState},
};
use bevy::prelude::*;
use tracing::debug;
use tt_scene::SceneChanges;

/// The full screen overlay holding the zoomed photo.
#[derive(Component, Clone, Copy, Debug)]
pub struct ZoomOverlay;

/// Zoom in on photos when they're selected.
pub fn zoom_on_selected_photo(
    mut selected: EventReader<PhotoSelected>,
    scene: Res<SceneState>,
    mut edits: ResMut<ConfigEdits>,
) {
    for PhotoSelected { slot_index, image } in selected.iter() {
        debug!(slot_index, %image, "Zooming in on photo");
        edits.select_photo(&scene, *slot_index);
    }
}

/// Close the zoomed photo when the user clicks anywhere or presses escape.
///
/// Only a photo that was already showing is closed, so the click that zooms in doesn't also zoom
/// back out.
pub fn close_zoom(
    mouse_buttons: Res<Input<MouseButton>>,
    keyboard: Res<Input<KeyCode>>,
    scene: Res<SceneState>,
    mut edits: ResMut<ConfigEdits>,
) {
    if !(mouse_buttons.just_pressed(MouseButton::Left) || keyboard.just_pressed(KeyCode::Escape))
    {
        return;
    }

    if scene.config().active_image().is_some() {
        edits.dismiss_zoom(&scene);
    }
}

/// Show or hide the overlay when the zoomed photo changes.
pub fn update_zoom_overlay(
    mut commands: Commands,
    mut changed: EventReader<SceneChanged>,
    scene: Res<SceneState>,
    overlays: Query<Entity, With<ZoomOverlay>>,
    asset_server: Res<AssetServer>,
) {
    if !collect_changes(&mut changed).contains(SceneChanges::ZOOM) {
        return;
    }

    for overlay in &overlays {
        commands.entity(overlay).despawn_recursive();
    }

    let Some(image) = scene.config().active_image() else {
        return;
    };
    debug!(%image, "Showing zoomed photo");

    commands
        .spawn((
            NodeBundle {
                style: Style {
                    size: Size::new(Val::Percent(100.), Val::Percent(100.)),
                    position_type: PositionType::Absolute,
                    justify_content: JustifyContent::Center,
                    align_items: AlignItems::Center,
                    padding: UiRect::all(Val::Px(32.)),
                    ..default()
                },
                background_color: Color::rgba(0., 0., 0., 0.9).into(),
                ..default()
            },
            ZoomOverlay,
        ))
        .with_children(|overlay| {
            overlay.spawn(ImageBundle {
                style: Style {
                    size: Size::new(Val::Auto, Val::Percent(100.)),
                    max_size: Size::new(Val::Percent(100.), Val::Percent(100.)),
                    ..default()
                },
                image: UiImage(asset_server.load(image.as_str())),
                ..default()
            });
        });
}
