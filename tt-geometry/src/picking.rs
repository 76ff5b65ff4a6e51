//! This module works out which photo card, if any, is under the cursor.

use glam::{Mat4, Vec2, Vec3};
use tracing::trace;

/// A ray in world space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    /// Where the ray starts.
    pub origin: Vec3,

    /// The normalised direction of the ray.
    pub direction: Vec3,
}

impl Ray {
    /// Cast a ray from a camera through a point in normalised device coordinates.
    ///
    /// `camera_world` is the camera's transform and `projection` its projection matrix. This
    /// assumes a reversed-Z projection, where the near plane is at depth 1.
    pub fn from_viewport(ndc: Vec2, camera_world: Mat4, projection: Mat4) -> Option<Self> {
        let ndc_to_world = camera_world * projection.inverse();
        let near = ndc_to_world.project_point3(ndc.extend(1.));
        let further = ndc_to_world.project_point3(ndc.extend(0.5));
        let direction = (further - near).try_normalize()?;

        Some(Self {
            origin: near,
            direction,
        })
    }
}

/// The size of a flat card, which lies in its local XY plane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CardBounds {
    /// Half the width and half the height of the card.
    pub half_extents: Vec2,
}

impl CardBounds {
    /// The bounds of a photo card, including its frame.
    pub const PHOTO: Self = Self {
        half_extents: Vec2::new(0.8, 1.05),
    };

    /// Find the distance along `ray` to the card with the given world transform, if it hits.
    fn hit_distance(&self, ray: Ray, transform: Mat4) -> Option<f32> {
        let to_local = transform.inverse();
        let origin = to_local.transform_point3(ray.origin);
        let direction = to_local.transform_vector3(ray.direction);

        // Edge on
        if direction.z.abs() < f32::EPSILON {
            return None;
        }

        let s = -origin.z / direction.z;
        if s < 0. {
            return None;
        }

        let local_hit = origin + direction * s;
        if local_hit.x.abs() > self.half_extents.x || local_hit.y.abs() > self.half_extents.y {
            return None;
        }

        Some(transform.transform_point3(local_hit).distance(ray.origin))
    }
}

/// Find the nearest card hit by the ray, returning its key and the distance to it.
pub fn pick_card<K: Copy + std::fmt::Debug>(
    ray: Ray,
    cards: impl IntoIterator<Item = (K, Mat4)>,
    bounds: CardBounds,
) -> Option<(K, f32)> {
    let picked = cards
        .into_iter()
        .filter_map(|(key, transform)| Some((key, bounds.hit_distance(ray, transform)?)))
        .min_by(|(_, a), (_, b)| a.total_cmp(b));

    trace!(?ray, ?picked);
    picked
}
