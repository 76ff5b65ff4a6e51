//! This module provides a simple way to put a single point somewhere inside the tree.

use crate::TreeDimensions;
use glam::Vec3;
use rand::{thread_rng, Rng};
use std::f32::consts::TAU;

/// Get a random point inside a cone with the given height and base radius.
///
/// Unlike the tree particles, the height here is not biased, so every slice of height gets the
/// same share of points. The cross section shrinks towards the apex, so the points are packed
/// more tightly per unit volume there. The point is centred so that the base is at
/// `-height / 2`.
pub fn sample_point_in_cone(height: f32, radius: f32) -> Vec3 {
    sample_point_in_cone_with_rng(TreeDimensions { height, radius }, &mut thread_rng())
}

/// Like [`sample_point_in_cone`], but drawing randomness from `rng`.
pub fn sample_point_in_cone_with_rng<R: Rng + ?Sized>(
    dimensions: TreeDimensions,
    rng: &mut R,
) -> Vec3 {
    let y = rng.gen::<f32>() * dimensions.height;
    let radius_at_height = dimensions.radius_at(y / dimensions.height);

    let angle = rng.gen_range(0.0..TAU);
    let r = rng.gen::<f32>().sqrt() * radius_at_height;

    Vec3::new(
        r * angle.cos(),
        y - dimensions.height / 2.,
        r * angle.sin(),
    )
}
