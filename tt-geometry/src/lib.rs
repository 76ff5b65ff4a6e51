//! This crate provides the geometry for the tree: sampling the particles that make up its
//! silhouette, laying out the photo ornaments and the star, and the small bits of maths needed
//! to animate and pick them.
//!
//! Nothing in here touches the GPU. Everything is plain data that the renderer uploads.

mod colour;
mod cone;
mod float;
mod particles;
mod photos;
mod picking;
mod sampler;
mod sparkles;
mod star;

pub use self::{
    colour::{srgb_to_linear, Rgb, RGBArray, DEEP_GREEN, GOLD, NEON_GREEN, RED_PINK, WHITE},
    cone::{sample_point_in_cone, sample_point_in_cone_with_rng},
    float::FloatMotion,
    particles::{Category, MismatchedLengths, ParallelSequences, Particle, ParticleSet},
    photos::{
        mount_photos, photo_slots, MountedPhoto, PhotoSlotConfig, PHOTO_SLOTS, PHOTO_SLOT_COUNT,
    },
    picking::{pick_card, CardBounds, Ray},
    sampler::{generate, generate_with_rng},
    sparkles::{sparkle_field, SparkleStyle},
    star::{star_outline, StarPrism, STAR_POINTS},
};

/// The dimensions of the cone that approximates the tree.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TreeDimensions {
    /// The height of the tree, from the base to the apex.
    pub height: f32,

    /// The radius of the base of the tree.
    pub radius: f32,
}

impl TreeDimensions {
    /// The fixed size of the tree in the scene.
    pub const DEFAULT: Self = Self {
        height: 18.,
        radius: 7.5,
    };

    /// The radius of the cone's cross section at the normalised height `t`, where 0 is the base
    /// and 1 is the apex.
    pub fn radius_at(&self, t: f32) -> f32 {
        self.radius * (1. - t)
    }

    /// Convert a normalised height into a `y` coordinate, centring the tree on the origin.
    pub fn y_at(&self, t: f32) -> f32 {
        t * self.height - self.height / 2.
    }

    /// Convert a `y` coordinate back into a normalised height.
    pub fn t_at(&self, y: f32) -> f32 {
        (y + self.height / 2.) / self.height
    }
}

impl Default for TreeDimensions {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    #[test]
    fn tree_dimensions_test() {
        let dims = TreeDimensions::DEFAULT;

        assert!(approx_eq!(f32, dims.y_at(0.), -9.));
        assert!(approx_eq!(f32, dims.y_at(1.), 9.));
        assert!(approx_eq!(f32, dims.y_at(0.5), 0.));
        assert!(approx_eq!(f32, dims.radius_at(0.), 7.5));
        assert!(approx_eq!(f32, dims.radius_at(1.), 0.));

        for t in [0., 0.1, 0.25, 0.5, 0.9, 1.] {
            assert!(approx_eq!(f32, dims.t_at(dims.y_at(t)), t, epsilon = 1e-6));
        }
    }
}
