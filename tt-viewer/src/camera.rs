//! This module handles the camera: where it starts, how the user moves it, and its slow automatic
//! orbit around the tree.

use crate::scene::SceneState;
use bevy::{
    core_pipeline::bloom::BloomSettings,
    input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel},
    prelude::*,
};
use smooth_bevy_cameras::{
    controllers::orbit::{ControlEvent, OrbitCameraBundle, OrbitCameraController},
    LookTransform,
};
use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, TAU};
use tracing::trace;
use tt_config::QualityTier;

/// Where the camera starts.
pub const CAMERA_EYE: Vec3 = Vec3::new(0., 2., 28.);

/// The vertical field of view of the camera, in degrees.
pub const CAMERA_FOV_DEGREES: f32 = 45.;

/// How fast the camera orbits on its own, in radians per second. This is one orbit every two
/// minutes.
pub const AUTO_ROTATE_SPEED: f32 = TAU / 120.;

/// The camera never looks down from higher than this angle from vertical.
pub const MIN_POLAR_ANGLE: f32 = FRAC_PI_4;

/// The camera never drops below the horizon.
pub const MAX_POLAR_ANGLE: f32 = FRAC_PI_2;

/// The bloom used on [`QualityTier::High`].
pub fn bloom_settings() -> BloomSettings {
    BloomSettings {
        intensity: 1.5,
        threshold: 0.8,
        ..default()
    }
}

/// Spawn the camera, looking at the middle of the tree.
pub fn spawn_camera(commands: &mut Commands, quality: QualityTier) {
    let mut camera = commands.spawn(Camera3dBundle {
        camera: Camera {
            hdr: true,
            ..default()
        },
        projection: Projection::Perspective(PerspectiveProjection {
            fov: CAMERA_FOV_DEGREES.to_radians(),
            ..default()
        }),
        ..default()
    });

    camera.insert(OrbitCameraBundle::new(
        OrbitCameraController {
            mouse_rotate_sensitivity: Vec2::splat(0.25),
            smoothing_weight: 0.8,
            ..default()
        },
        CAMERA_EYE,
        Vec3::ZERO,
        Vec3::Y,
    ));

    if quality.post_processing() {
        camera.insert(bloom_settings());
    }
}

/// Turn mouse input into camera movement. Dragging with the left button orbits, and in edit mode
/// dragging with the right button pans and scrolling zooms.
pub fn camera_input(
    mut events: EventWriter<ControlEvent>,
    mut mouse_wheel_reader: EventReader<MouseWheel>,
    mut mouse_motion_reader: EventReader<MouseMotion>,
    mouse_buttons: Res<Input<MouseButton>>,
    scene: Res<SceneState>,
    controllers: Query<&OrbitCameraController>,
) {
    let cursor_delta = mouse_motion_reader
        .iter()
        .fold(Vec2::ZERO, |delta, event| delta + event.delta);
    let scroll: Vec<_> = mouse_wheel_reader.iter().cloned().collect();

    // The zoomed photo covers the scene
    if scene.config().active_image().is_some() {
        return;
    }

    let Some(controller) = controllers.iter().find(|controller| controller.enabled) else {
        return;
    };

    if mouse_buttons.pressed(MouseButton::Left) {
        events.send(ControlEvent::Orbit(
            controller.mouse_rotate_sensitivity * cursor_delta,
        ));
    }

    if !scene.config().mode().allows_camera_zoom_and_pan() {
        return;
    }

    if mouse_buttons.pressed(MouseButton::Right) {
        events.send(ControlEvent::TranslateTarget(
            controller.mouse_translate_sensitivity * cursor_delta,
        ));
    }

    let scalar = scroll.iter().fold(1., |scalar, event| {
        let amount = match event.unit {
            MouseScrollUnit::Line => event.y,
            MouseScrollUnit::Pixel => event.y / controller.pixels_per_line,
        };
        scalar * (1. - amount * controller.mouse_wheel_zoom_sensitivity)
    });
    events.send(ControlEvent::Zoom(scalar));
}

/// Slowly orbit the camera around its target and keep it within the allowed polar angles.
pub fn auto_rotate_camera(
    time: Res<Time>,
    mut cameras: Query<&mut LookTransform, With<OrbitCameraController>>,
) {
    let angle = AUTO_ROTATE_SPEED * time.delta_seconds();

    for mut look in &mut cameras {
        let offset = Quat::from_rotation_y(angle) * (look.eye - look.target);
        look.eye = look.target + clamp_polar_angle(offset);
        trace!(eye = ?look.eye);
    }
}

/// Clamp the angle between the given offset from the target and the vertical, keeping its length
/// and its direction around the vertical axis.
pub fn clamp_polar_angle(offset: Vec3) -> Vec3 {
    let radius = offset.length();
    if radius <= f32::EPSILON {
        return offset;
    }

    let polar = (offset.y / radius).clamp(-1., 1.).acos();
    let clamped = polar.clamp(MIN_POLAR_ANGLE, MAX_POLAR_ANGLE);
    if clamped == polar {
        return offset;
    }

    let azimuth = offset.z.atan2(offset.x);
    Vec3::new(
        radius * clamped.sin() * azimuth.cos(),
        radius * clamped.cos(),
        radius * clamped.sin() * azimuth.sin(),
    )
}
