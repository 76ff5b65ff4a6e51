//! This module samples the particles that make up the tree.
//!
//! Each particle gets a height biased towards the apex, a uniformly sampled point in the disc of
//! the cone at that height, a twist around the trunk that grows with height (giving the tree its
//! corkscrew look), and then an independent roll to decide whether it's a leaf or an ornament.

use crate::{
    colour::{srgb_to_linear, RGBArray, DEEP_GREEN, GOLD, NEON_GREEN, RED_PINK},
    Category, Particle, ParticleSet, TreeDimensions,
};
use glam::Vec3;
use rand::{thread_rng, Rng};
use std::f32::consts::TAU;
use tracing::{debug, instrument};

/// The exponent applied to the uniform height draw. Being less than 1, it biases particles
/// towards the apex.
const HEIGHT_BIAS_EXPONENT: f32 = 0.8;

/// How many radians the spiral twists by between the base and the apex.
const SPIRAL_TWIST: f32 = 15.;

/// The maximum random jitter added to the spiral twist.
const SPIRAL_JITTER: f32 = 0.5;

/// Rolls above this are gold ornaments.
const GOLD_THRESHOLD: f32 = 0.92;

/// Rolls above this (and not gold) are red ornaments.
const RED_THRESHOLD: f32 = 0.85;

/// Rolls above this (and not ornaments) are deep green leaves. Everything else is neon green.
const DEEP_GREEN_THRESHOLD: f32 = 0.5;

/// The smallest size of an ornament. Ornaments are in `[2, 3)` and leaves in `[0, 1)`.
const ORNAMENT_MIN_SIZE: f32 = 2.;

/// Generate `count` particles for a tree with the given height and radius, using the thread RNG.
///
/// Every call gives a different tree. Use [`generate_with_rng`] for a reproducible one.
pub fn generate(count: usize, height: f32, radius: f32) -> ParticleSet {
    generate_with_rng(count, TreeDimensions { height, radius }, &mut thread_rng())
}

/// Generate `count` particles for a tree of the given dimensions, drawing all randomness from
/// `rng`.
#[instrument(skip(rng))]
pub fn generate_with_rng<R: Rng + ?Sized>(
    count: usize,
    dimensions: TreeDimensions,
    rng: &mut R,
) -> ParticleSet {
    let set: ParticleSet = (0..count)
        .map(|_| sample_particle(dimensions, &mut *rng))
        .collect();

    debug!(
        count,
        ornaments = set.count_category(Category::Ornament),
        "Generated tree particles"
    );
    set
}

/// Sample a single particle.
fn sample_particle<R: Rng + ?Sized>(dimensions: TreeDimensions, rng: &mut R) -> Particle {
    let t = rng.gen::<f32>().powf(HEIGHT_BIAS_EXPONENT);
    let max_radius = dimensions.radius_at(t);

    let theta = rng.gen_range(0.0..TAU);

    // The square root makes the distribution uniform over the area of the disc instead of
    // bunching up in the middle
    let r = rng.gen::<f32>().sqrt() * max_radius;

    let twisted = theta + t * SPIRAL_TWIST + rng.gen::<f32>() * SPIRAL_JITTER;
    let position = Vec3::new(r * twisted.cos(), dimensions.y_at(t), r * twisted.sin());

    let (colour, category) = classify(rng.gen());
    let size = match category {
        Category::Leaf => rng.gen::<f32>(),
        Category::Ornament => ORNAMENT_MIN_SIZE + rng.gen::<f32>(),
    };

    Particle {
        position,
        colour: srgb_to_linear(colour),
        size,
        category,
    }
}

/// Decide the colour and category of a particle from a uniform roll in `[0, 1)`.
fn classify(roll: f32) -> (RGBArray, Category) {
    if roll > GOLD_THRESHOLD {
        (GOLD, Category::Ornament)
    } else if roll > RED_THRESHOLD {
        (RED_PINK, Category::Ornament)
    } else if roll > DEEP_GREEN_THRESHOLD {
        (DEEP_GREEN, Category::Leaf)
    } else {
        (NEON_GREEN, Category::Leaf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;
    use rand::{
        rngs::{mock::StepRng, StdRng},
        SeedableRng,
    };

    const DIMS: TreeDimensions = TreeDimensions::DEFAULT;

    #[test]
    fn lengths_match_count_test() {
        let mut rng = StdRng::seed_from_u64(12345);
        for count in [0, 1, 2, 17, 3000] {
            let set = generate_with_rng(count, DIMS, &mut rng);
            assert_eq!(set.len(), count);
            assert_eq!(set.positions().len(), count);
            assert_eq!(set.colours().len(), count);
            assert_eq!(set.sizes().len(), count);
            assert_eq!(set.categories().len(), count);
        }

        assert!(generate(0, 18., 7.5).is_empty());
        assert_eq!(generate(10, 18., 7.5).len(), 10);
    }

    #[test]
    fn particles_inside_cone_test() {
        let set = generate_with_rng(20_000, DIMS, &mut StdRng::seed_from_u64(1));

        for particle in set.iter() {
            let Vec3 { x, y, z } = particle.position;
            assert!(
                (-DIMS.height / 2. ..=DIMS.height / 2.).contains(&y),
                "y = {y} is outside the tree"
            );

            let t = DIMS.t_at(y);
            let planar = (x * x + z * z).sqrt();
            assert!(
                planar <= DIMS.radius_at(t) + 1e-4,
                "Particle at {:?} is outside the cone (t = {t})",
                particle.position
            );
        }
    }

    #[test]
    fn colours_and_sizes_test() {
        let set = generate_with_rng(20_000, DIMS, &mut StdRng::seed_from_u64(2));
        let gold = srgb_to_linear(GOLD);
        let red = srgb_to_linear(RED_PINK);
        let neon = srgb_to_linear(NEON_GREEN);
        let deep = srgb_to_linear(DEEP_GREEN);

        for particle in set.iter() {
            for component in particle.colour {
                assert!((0. ..=1.).contains(&component));
            }

            match particle.category {
                Category::Ornament => {
                    assert!((2.0..3.0).contains(&particle.size));
                    assert!(particle.colour == gold || particle.colour == red);
                }
                Category::Leaf => {
                    assert!((0.0..1.0).contains(&particle.size));
                    assert!(particle.colour == neon || particle.colour == deep);
                }
            }
        }
    }

    #[test]
    fn category_distribution_test() {
        let count = 100_000;
        let set = generate_with_rng(count, DIMS, &mut StdRng::seed_from_u64(3));

        let fraction = |n: usize| n as f32 / count as f32;
        let gold = srgb_to_linear(GOLD);
        let red = srgb_to_linear(RED_PINK);

        let ornaments = fraction(set.count_category(Category::Ornament));
        let leaves = fraction(set.count_category(Category::Leaf));
        let golds = fraction(set.colours().iter().filter(|&&c| c == gold).count());
        let reds = fraction(set.colours().iter().filter(|&&c| c == red).count());

        assert!(approx_eq!(f32, ornaments, 0.15, epsilon = 0.01), "{ornaments}");
        assert!(approx_eq!(f32, leaves, 0.85, epsilon = 0.01), "{leaves}");
        assert!(approx_eq!(f32, golds, 0.08, epsilon = 0.01), "{golds}");
        assert!(approx_eq!(f32, reds, 0.07, epsilon = 0.01), "{reds}");
    }

    #[test]
    fn height_bias_test() {
        let count = 100_000;
        let set = generate_with_rng(count, DIMS, &mut StdRng::seed_from_u64(4));

        // E[U^0.8] = 1 / 1.8
        let mean_t = set.positions().iter().map(|p| DIMS.t_at(p.y)).sum::<f32>() / count as f32;
        assert!(approx_eq!(f32, mean_t, 1. / 1.8, epsilon = 0.01), "{mean_t}");
    }

    #[test]
    fn all_zero_draws_test() {
        // Every draw is 0, so the particle sits at the centre of the base
        let set = generate_with_rng(1, DIMS, &mut StepRng::new(0, 0));
        let particle = set.get(0).unwrap();

        assert!(approx_eq!(f32, particle.position.x, 0.));
        assert!(approx_eq!(f32, particle.position.y, -9.));
        assert!(approx_eq!(f32, particle.position.z, 0.));
        assert_eq!(particle.category, Category::Leaf);
        assert_eq!(particle.colour, srgb_to_linear(NEON_GREEN));
        assert!(approx_eq!(f32, particle.size, 0.));
    }

    #[test]
    fn classify_thresholds_test() {
        assert_eq!(classify(0.99), (GOLD, Category::Ornament));
        assert_eq!(classify(0.92), (RED_PINK, Category::Ornament));
        assert_eq!(classify(0.9), (RED_PINK, Category::Ornament));
        assert_eq!(classify(0.85), (DEEP_GREEN, Category::Leaf));
        assert_eq!(classify(0.6), (DEEP_GREEN, Category::Leaf));
        assert_eq!(classify(0.5), (NEON_GREEN, Category::Leaf));
        assert_eq!(classify(0.), (NEON_GREEN, Category::Leaf));
    }
}
