//! This module makes things bob and tilt gently in place.

use crate::scene::SceneState;
use bevy::prelude::*;
use tt_geometry::FloatMotion;

/// An entity which floats with the given motion. Its transform is owned by the motion, so it
/// should be the child of something that holds its resting place.
#[derive(Component, Clone, Copy, Debug, Deref)]
pub struct Floating(pub FloatMotion);

/// Move every floating entity to where its motion puts it at the current time.
pub fn animate_floating(scene: Res<SceneState>, mut floating: Query<(&Floating, &mut Transform)>) {
    let elapsed = scene.shading().elapsed();

    for (Floating(motion), mut transform) in &mut floating {
        transform.translation = motion.offset_at(elapsed);
        transform.rotation = motion.rotation_at(elapsed);
    }
}
