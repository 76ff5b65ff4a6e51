//! This crate provides the shading program for the tree's particles.
//!
//! The program itself is WGSL in [`PARTICLE_SHADER`] and runs on the GPU. It's handed to the
//! renderer as-is. The functions in this crate mirror its maths on the CPU so that the behaviour
//! can be tested and reasoned about without a GPU.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use tracing::trace;
use tt_geometry::{Category, Rgb};

/// The WGSL source of the particle shading program.
pub const PARTICLE_SHADER: &str = include_str!("shaders/particles.wgsl");

/// How fast the whole particle cloud spins around the trunk, in radians per second.
pub const ROTATION_SPEED: f32 = 0.1;

/// The footprint of a particle of size 1 at a view depth of 1, in pixels.
pub const POINT_SCALE_PIXELS: f32 = 100.;

/// Below this alpha a fragment is discarded rather than blended.
pub const DISCARD_THRESHOLD: f32 = 0.01;

/// Leaves have their alpha scaled by this much.
pub const LEAF_ALPHA: f32 = 0.6;

/// The weights used to turn an ornament's position into the phase of its flashing.
pub const FLASH_SEED_WEIGHTS: Vec3 = Vec3::new(12.9898, 78.233, 45.164);

/// The per-frame state of the shader: the time uniform and the rotation of the cloud.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ShadingState {
    /// Seconds since the scene was mounted. This never goes backwards.
    elapsed: f32,
}

impl ShadingState {
    /// The state at the moment the scene is mounted.
    pub const MOUNTED: Self = Self { elapsed: 0. };

    /// Get the state for a frame drawn at the given clock reading.
    ///
    /// A reading earlier than the current one (from a clock hiccup, say) leaves the time where it
    /// is, so the uniform only ever moves forwards.
    #[must_use]
    pub fn advance(self, elapsed: f32) -> Self {
        let next = Self {
            elapsed: elapsed.max(self.elapsed),
        };
        trace!(?next);
        next
    }

    /// The value of the time uniform.
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// The rotation of the whole cloud around the vertical axis, in radians.
    pub fn rotation_y(&self) -> f32 {
        self.elapsed * ROTATION_SPEED
    }
}

/// Hermite interpolation between two edges, as in WGSL's `smoothstep`.
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0., 1.);
    t * t * (3. - 2. * t)
}

/// The alpha of the soft disc at distance `d` from the centre of the footprint, where the
/// footprint spans `[0, 1]` in both directions.
///
/// This is fully opaque up to 0.4 and fades out smoothly by 0.5.
pub fn disc_alpha(d: f32) -> f32 {
    1. - smoothstep(0.4, 0.5, d)
}

/// The phase offset of an ornament's flashing, taken from its position in the tree's local space.
pub fn flash_seed(position: Vec3) -> f32 {
    position.dot(FLASH_SEED_WEIGHTS)
}

/// The brightness of an ornament at the given position and time. This is in `[0.4, 1.2]`.
pub fn flash_brightness(elapsed: f32, position: Vec3) -> f32 {
    0.8 + 0.4 * (elapsed * 3. + flash_seed(position)).sin()
}

/// The width of a particle's footprint in pixels, given its size and its depth in view space.
pub fn point_footprint(size: f32, view_depth: f32) -> f32 {
    size * POINT_SCALE_PIXELS / view_depth
}

/// The view-space width of a particle of size 1 that makes its footprint match
/// [`point_footprint`].
///
/// `viewport_height` is in pixels and `focal_scale` is the `[1][1]` element of the projection
/// matrix, which is `1 / tan(fov_y / 2)` for a perspective projection.
pub fn point_world_scale(viewport_height: f32, focal_scale: f32) -> f32 {
    POINT_SCALE_PIXELS / (viewport_height / 2. * focal_scale)
}

/// Shade one fragment of a particle, returning its RGBA colour or `None` if it's discarded.
///
/// `point_coord` is the position of the fragment within the particle's footprint, from `(0, 0)`
/// in one corner to `(1, 1)` in the other.
pub fn shade_fragment(
    category: Category,
    colour: Rgb,
    local_position: Vec3,
    point_coord: Vec2,
    elapsed: f32,
) -> Option<[f32; 4]> {
    let d = point_coord.distance(Vec2::splat(0.5));
    let mut alpha = disc_alpha(d);

    let brightness = match category {
        Category::Ornament => flash_brightness(elapsed, local_position),
        Category::Leaf => {
            alpha *= LEAF_ALPHA;
            1.
        }
    };

    if alpha < DISCARD_THRESHOLD {
        return None;
    }

    let [r, g, b] = colour.map(|c| c * brightness);
    Some([r, g, b, alpha])
}
