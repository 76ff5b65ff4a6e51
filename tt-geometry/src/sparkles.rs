//! This module generates the ambient sparkles: the snow hanging in the air around the scene and
//! the glitter around the star.
//!
//! Sparkles sit still in their field. Any motion comes from whatever they're attached to.

use crate::{colour::srgb_to_linear, Category, Particle, ParticleSet, RGBArray};
use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// How a field of sparkles should look.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SparkleStyle {
    /// The sRGB colour of every sparkle.
    pub colour: RGBArray,

    /// The render size of every sparkle.
    pub size: f32,

    /// How opaque the sparkles are, from 0 to 1.
    ///
    /// Particles are blended additively, so this is baked into the colour.
    pub opacity: f32,

    /// The full width, height, and depth of the box that the sparkles fill.
    pub extent: Vec3,
}

/// Scatter `count` sparkles uniformly through a box centred on the origin.
///
/// Sparkles are [`Category::Ornament`]s, so they twinkle with the same shader as the ornaments on
/// the tree.
pub fn sparkle_field<R: Rng + ?Sized>(
    count: usize,
    style: SparkleStyle,
    rng: &mut R,
) -> ParticleSet {
    let opacity = style.opacity.clamp(0., 1.);
    let colour = srgb_to_linear(style.colour).map(|c| c * opacity);

    (0..count)
        .map(|_| Particle {
            position: (rng.gen::<Vec3>() - Vec3::splat(0.5)) * style.extent,
            colour,
            size: style.size,
            category: Category::Ornament,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GOLD, WHITE};
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn sparkle_field_test() {
        let mut rng = StdRng::seed_from_u64(12345);
        let style = SparkleStyle {
            colour: WHITE,
            size: 0.4,
            opacity: 0.5,
            extent: Vec3::splat(50.),
        };

        let snow = sparkle_field(2000, style, &mut rng);
        assert_eq!(snow.len(), 2000);
        assert_eq!(snow.count_category(Category::Ornament), 2000);

        for particle in snow.iter() {
            assert!(particle.position.abs().max_element() <= 25.);
            assert_eq!(particle.size, 0.4);
            assert_eq!(particle.colour, [0.5, 0.5, 0.5]);
        }

        let glitter = SparkleStyle {
            colour: GOLD,
            size: 1.,
            opacity: 1.,
            extent: Vec3::splat(5.),
        };
        assert!(sparkle_field(0, glitter, &mut rng).is_empty());

        let gold = sparkle_field(10, glitter, &mut rng);
        assert!(gold
            .iter()
            .all(|particle| particle.colour == crate::srgb_to_linear(GOLD)));
        assert!(gold
            .iter()
            .all(|particle| particle.position.abs().max_element() <= 2.5));
    }
}
