//! This module handles where the user's photos hang on the tree.
//!
//! There are exactly [`PHOTO_SLOT_COUNT`] slots, spread up the tree and around the trunk, and
//! their layout never depends on how many photos there actually are.

use crate::{FloatMotion, TreeDimensions};
use glam::{EulerRot, Quat, Vec3};
use lazy_static::lazy_static;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f32::consts::{FRAC_PI_2, TAU};
use tracing::{debug, instrument};

/// The number of photo slots on the tree.
pub const PHOTO_SLOT_COUNT: usize = 5;

/// How far in from the surface of the cone the photos sit, as a proportion of its radius.
const INSET: f32 = 0.9;

lazy_static! {
    /// The photo slots for a tree of [`TreeDimensions::DEFAULT`].
    pub static ref PHOTO_SLOTS: [PhotoSlotConfig; PHOTO_SLOT_COUNT] =
        photo_slots(TreeDimensions::DEFAULT);
}

/// The placement of one photo slot.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PhotoSlotConfig {
    /// The position of the slot, in the local space of the tree.
    pub position: Vec3,

    /// The Euler angles (XYZ, in radians) of the slot, which face it away from the trunk.
    pub orientation: Vec3,
}

impl PhotoSlotConfig {
    /// The orientation of this slot as a quaternion.
    pub fn rotation(&self) -> Quat {
        let Vec3 { x, y, z } = self.orientation;
        Quat::from_euler(EulerRot::XYZ, x, y, z)
    }
}

/// Lay out the photo slots for a tree of the given dimensions.
///
/// Slot `i` sits at height `(i + 1) / 6` of the way up the tree, a fifth of a turn further round
/// than the previous slot, slightly inside the surface of the cone.
pub fn photo_slots(dimensions: TreeDimensions) -> [PhotoSlotConfig; PHOTO_SLOT_COUNT] {
    std::array::from_fn(|i| {
        let t = (i + 1) as f32 / (PHOTO_SLOT_COUNT + 1) as f32;
        let r = dimensions.radius_at(t) * INSET;
        let theta = i as f32 / PHOTO_SLOT_COUNT as f32 * TAU;

        PhotoSlotConfig {
            position: Vec3::new(r * theta.cos(), dimensions.y_at(t), r * theta.sin()),
            orientation: Vec3::new(0., -theta + FRAC_PI_2, 0.),
        }
    })
}

/// A photo which has been given a slot on the tree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MountedPhoto<I> {
    /// The index of the slot.
    pub slot_index: usize,

    /// Where the photo is placed.
    pub slot: PhotoSlotConfig,

    /// The image to show.
    pub image: I,

    /// The photo's own floating motion.
    pub motion: FloatMotion,
}

/// Mount the given images onto the slots in order.
///
/// Only the first [`PHOTO_SLOT_COUNT`] images get mounted and the rest are ignored. Unused slots
/// get nothing.
#[instrument(skip_all, fields(images = images.len()))]
pub fn mount_photos<I: Clone, R: Rng + ?Sized>(
    images: &[I],
    slots: &[PhotoSlotConfig; PHOTO_SLOT_COUNT],
    rng: &mut R,
) -> Vec<MountedPhoto<I>> {
    if images.len() > PHOTO_SLOT_COUNT {
        debug!(
            ignored = images.len() - PHOTO_SLOT_COUNT,
            "More images than photo slots"
        );
    }

    images
        .iter()
        .zip(slots)
        .enumerate()
        .map(|(slot_index, (image, &slot))| MountedPhoto {
            slot_index,
            slot,
            image: image.clone(),
            motion: FloatMotion::photo(&mut *rng),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn photo_slot_layout_test() {
        let layout = PHOTO_SLOTS
            .iter()
            .enumerate()
            .map(|(i, slot)| {
                let Vec3 { x, y, z } = slot.position;
                format!(
                    "slot {i}: position ({x:.3}, {y:.3}, {z:.3}) rotation_y {:.3}",
                    slot.orientation.y
                )
            })
            .collect::<Vec<_>>()
            .join("\n");

        insta::assert_snapshot!(layout);
    }

    #[test]
    fn slots_inside_tree_test() {
        let dims = TreeDimensions::DEFAULT;

        for (i, slot) in photo_slots(dims).iter().enumerate() {
            let t = dims.t_at(slot.position.y);
            assert!(approx_eq!(
                f32,
                t,
                (i + 1) as f32 / 6.,
                epsilon = 1e-5
            ));

            let planar = slot.position.x.hypot(slot.position.z);
            assert!(approx_eq!(
                f32,
                planar,
                dims.radius_at(t) * 0.9,
                epsilon = 1e-4
            ));

            // The slot faces away from the trunk
            let facing = slot.rotation() * Vec3::Z;
            let outwards = Vec3::new(slot.position.x, 0., slot.position.z).normalize();
            assert!(facing.dot(outwards) > 0.999, "{facing:?} vs {outwards:?}");
        }
    }

    #[test]
    fn mount_photos_test() {
        let mut rng = StdRng::seed_from_u64(12345);
        let images = ["a", "b", "c", "d", "e", "f", "g"];

        for n in 0..=images.len() {
            let mounted = mount_photos(&images[..n], &PHOTO_SLOTS, &mut rng);
            assert_eq!(mounted.len(), n.min(PHOTO_SLOT_COUNT));

            for (i, photo) in mounted.iter().enumerate() {
                assert_eq!(photo.slot_index, i);
                assert_eq!(photo.slot, PHOTO_SLOTS[i]);
                assert_eq!(photo.image, images[i]);
            }
        }

        let empty: [&str; 0] = [];
        assert!(mount_photos(&empty, &PHOTO_SLOTS, &mut rng).is_empty());
    }
}
