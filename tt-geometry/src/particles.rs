//! This module handles the [`ParticleSet`] type, which holds everything needed to render one
//! generation of particles.

use crate::Rgb;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The category of a particle, which decides how the shader treats it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Foliage. Leaves are dimmed so that additive blending doesn't wash them out.
    Leaf,

    /// A decoration. Ornaments flash on and off over time.
    Ornament,
}

impl Category {
    /// The value of this category as a vertex attribute.
    pub fn shader_value(self) -> f32 {
        match self {
            Self::Leaf => 0.,
            Self::Ornament => 1.,
        }
    }
}

/// A single particle, as borrowed out of a [`ParticleSet`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    /// The position of the particle, in the local space of the tree.
    pub position: Vec3,

    /// The linear colour of the particle.
    pub colour: Rgb,

    /// The render size of the particle.
    pub size: f32,

    /// What kind of particle this is.
    pub category: Category,
}

/// A set of particles stored as four parallel sequences.
///
/// The sequences always have the same length, and index `i` refers to the same particle in each
/// of them. A set can only be built whole with [`FromIterator`], grown one particle at a time
/// with [`ParticleSet::push`], or deserialized through [`ParticleSet::try_from`], which checks
/// the lengths.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ParallelSequences")]
pub struct ParticleSet {
    positions: Vec<Vec3>,
    colours: Vec<Rgb>,
    sizes: Vec<f32>,
    categories: Vec<Category>,
}

/// The four sequences of a [`ParticleSet`] before their lengths have been checked.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[allow(missing_docs)]
pub struct ParallelSequences {
    pub positions: Vec<Vec3>,
    pub colours: Vec<Rgb>,
    pub sizes: Vec<f32>,
    pub categories: Vec<Category>,
}

/// The sequences of a [`ParticleSet`] didn't all have the same length.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
#[error(
    "Particle sequences must have the same length, but got {positions} positions, \
    {colours} colours, {sizes} sizes, and {categories} categories"
)]
#[allow(missing_docs)]
pub struct MismatchedLengths {
    pub positions: usize,
    pub colours: usize,
    pub sizes: usize,
    pub categories: usize,
}

impl TryFrom<ParallelSequences> for ParticleSet {
    type Error = MismatchedLengths;

    fn try_from(sequences: ParallelSequences) -> Result<Self, Self::Error> {
        let ParallelSequences {
            positions,
            colours,
            sizes,
            categories,
        } = sequences;

        let len = positions.len();
        if colours.len() != len || sizes.len() != len || categories.len() != len {
            return Err(MismatchedLengths {
                positions: len,
                colours: colours.len(),
                sizes: sizes.len(),
                categories: categories.len(),
            });
        }

        Ok(Self {
            positions,
            colours,
            sizes,
            categories,
        })
    }
}

impl ParticleSet {
    /// Create an empty set with room for `capacity` particles.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            positions: Vec::with_capacity(capacity),
            colours: Vec::with_capacity(capacity),
            sizes: Vec::with_capacity(capacity),
            categories: Vec::with_capacity(capacity),
        }
    }

    /// Add a particle to the end of the set.
    pub fn push(&mut self, particle: Particle) {
        let Particle {
            position,
            colour,
            size,
            category,
        } = particle;

        self.positions.push(position);
        self.colours.push(colour);
        self.sizes.push(size);
        self.categories.push(category);
    }

    /// The number of particles in the set.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Is the set empty?
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// The positions of all the particles.
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// The linear colours of all the particles.
    pub fn colours(&self) -> &[Rgb] {
        &self.colours
    }

    /// The render sizes of all the particles.
    pub fn sizes(&self) -> &[f32] {
        &self.sizes
    }

    /// The categories of all the particles.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Get the particle at the given index.
    pub fn get(&self, index: usize) -> Option<Particle> {
        Some(Particle {
            position: *self.positions.get(index)?,
            colour: *self.colours.get(index)?,
            size: *self.sizes.get(index)?,
            category: *self.categories.get(index)?,
        })
    }

    /// Iterate over all the particles in order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = Particle> + '_ {
        self.positions
            .iter()
            .zip(&self.colours)
            .zip(&self.sizes)
            .zip(&self.categories)
            .map(|(((&position, &colour), &size), &category)| Particle {
                position,
                colour,
                size,
                category,
            })
    }

    /// Count how many particles have the given category.
    pub fn count_category(&self, category: Category) -> usize {
        self.categories.iter().filter(|&&c| c == category).count()
    }
}

impl FromIterator<Particle> for ParticleSet {
    fn from_iter<T: IntoIterator<Item = Particle>>(iter: T) -> Self {
        let iter = iter.into_iter();
        let mut set = Self::with_capacity(iter.size_hint().0);
        for particle in iter {
            set.push(particle);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn particle(x: f32, category: Category) -> Particle {
        Particle {
            position: Vec3::new(x, 0., 0.),
            colour: [x, x, x],
            size: x,
            category,
        }
    }

    #[test]
    fn parallel_sequences_test() {
        let set: ParticleSet = [
            particle(0.1, Category::Leaf),
            particle(0.2, Category::Ornament),
            particle(0.3, Category::Leaf),
        ]
        .into_iter()
        .collect();

        assert_eq!(set.len(), 3);
        assert_eq!(set.positions().len(), 3);
        assert_eq!(set.colours().len(), 3);
        assert_eq!(set.sizes().len(), 3);
        assert_eq!(set.categories().len(), 3);

        assert_eq!(set.get(1), Some(particle(0.2, Category::Ornament)));
        assert_eq!(set.get(3), None);
        assert_eq!(set.count_category(Category::Leaf), 2);
        assert_eq!(set.count_category(Category::Ornament), 1);

        let collected: Vec<Particle> = set.iter().collect();
        assert_eq!(collected[2], particle(0.3, Category::Leaf));
    }

    #[test]
    fn deserialize_checks_lengths_test() {
        let set: ParticleSet = [
            particle(0.5, Category::Leaf),
            particle(1.5, Category::Ornament),
        ]
        .into_iter()
        .collect();

        let text = ron::to_string(&set).unwrap();
        let parsed: ParticleSet = ron::from_str(&text).unwrap();
        assert_eq!(parsed, set);
        assert_eq!(parsed.iter().count(), parsed.len());

        let error = ron::from_str::<ParticleSet>(
            "(positions: [], colours: [], sizes: [1.0], categories: [Leaf, Ornament])",
        )
        .unwrap_err();
        assert!(
            error.to_string().contains("0 positions, 0 colours, 1 sizes, and 2 categories"),
            "{error}"
        );

        assert_eq!(
            ParticleSet::try_from(ParallelSequences {
                positions: vec![Vec3::ZERO, Vec3::ONE],
                colours: vec![[1., 1., 1.]],
                sizes: vec![0.5, 0.5],
                categories: vec![Category::Leaf, Category::Leaf],
            }),
            Err(MismatchedLengths {
                positions: 2,
                colours: 1,
                sizes: 2,
                categories: 2,
            })
        );
    }

    #[test]
    fn empty_set_test() {
        let set = ParticleSet::default();
        assert!(set.is_empty());
        assert_eq!(set.iter().len(), 0);
        assert_eq!(set.get(0), None);
    }
}
