//! This module contains the quality tiers.

use serde::{Deserialize, Serialize};

/// Viewports narrower than this many logical pixels get [`QualityTier::Low`] by default.
pub const LOW_QUALITY_WIDTH: f32 = 768.;

/// How much work the renderer is allowed to do.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Eq,
    Hash,
    PartialEq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
)]
pub enum QualityTier {
    /// Lots of particles, shadows, and bloom.
    #[default]
    High,

    /// Fewer particles and no post processing, for small or weak devices.
    Low,
}

impl QualityTier {
    /// Pick a tier for a viewport of the given width in logical pixels.
    pub fn for_viewport_width(width: f32) -> Self {
        if width < LOW_QUALITY_WIDTH {
            Self::Low
        } else {
            Self::High
        }
    }

    /// The other tier.
    pub fn toggled(self) -> Self {
        match self {
            Self::High => Self::Low,
            Self::Low => Self::High,
        }
    }

    /// The number of particles in the tree.
    pub fn particle_count(self) -> usize {
        match self {
            Self::High => 8000,
            Self::Low => 3000,
        }
    }

    /// The number of falling snow particles.
    pub fn snow_count(self) -> usize {
        match self {
            Self::High => 2000,
            Self::Low => 500,
        }
    }

    /// Whether the key light casts shadows.
    pub fn casts_shadows(self) -> bool {
        self == Self::High
    }

    /// Whether bloom is applied to the final image.
    pub fn post_processing(self) -> bool {
        self == Self::High
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn quality_tier_test() {
        assert_eq!(QualityTier::High.particle_count(), 8000);
        assert_eq!(QualityTier::Low.particle_count(), 3000);
        assert_eq!(QualityTier::High.snow_count(), 2000);
        assert_eq!(QualityTier::Low.snow_count(), 500);

        assert!(QualityTier::High.casts_shadows());
        assert!(QualityTier::High.post_processing());
        assert!(!QualityTier::Low.casts_shadows());
        assert!(!QualityTier::Low.post_processing());

        for tier in QualityTier::iter() {
            assert_ne!(tier.toggled(), tier);
            assert_eq!(tier.toggled().toggled(), tier);
        }
    }

    #[test]
    fn for_viewport_width_test() {
        assert_eq!(QualityTier::for_viewport_width(375.), QualityTier::Low);
        assert_eq!(QualityTier::for_viewport_width(767.9), QualityTier::Low);
        assert_eq!(QualityTier::for_viewport_width(768.), QualityTier::High);
        assert_eq!(QualityTier::for_viewport_width(1920.), QualityTier::High);
    }
}
