//! This module handles the gentle floating motion of the photos and the star.

use glam::{EulerRot, Quat, Vec3};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// The upper bound of the random phase offset given to each floating object, so that objects
/// created at the same time don't bob in lockstep.
const MAX_PHASE_OFFSET: f32 = 10_000.;

/// A small oscillator that makes an object bob up and down and tilt slightly.
///
/// Each object carries its own oscillator, which only depends on the frame clock, so floating
/// objects never interfere with each other or with the rotation of the tree.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FloatMotion {
    /// How fast the object floats.
    pub speed: f32,

    /// How much the object tilts.
    pub rotation_intensity: f32,

    /// How far the object bobs up and down.
    pub float_intensity: f32,

    /// The phase offset of this object, in seconds.
    pub offset: f32,
}

impl FloatMotion {
    /// The motion of a mounted photo.
    pub fn photo<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::with_random_offset(2., 0.1, 0.2, rng)
    }

    /// The motion of the star on top of the tree.
    pub fn star<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::with_random_offset(4., 0.5, 0.5, rng)
    }

    /// Create a new oscillator with a random phase offset.
    pub fn with_random_offset<R: Rng + ?Sized>(
        speed: f32,
        rotation_intensity: f32,
        float_intensity: f32,
        rng: &mut R,
    ) -> Self {
        Self {
            speed,
            rotation_intensity,
            float_intensity,
            offset: rng.gen_range(0.0..MAX_PHASE_OFFSET),
        }
    }

    /// The phase of the oscillator at the given elapsed time.
    fn phase(&self, elapsed: f32) -> f32 {
        (self.offset + elapsed) * self.speed / 4.
    }

    /// The vertical offset of the object at the given elapsed time.
    pub fn offset_at(&self, elapsed: f32) -> Vec3 {
        Vec3::new(0., self.phase(elapsed).sin() / 10. * self.float_intensity, 0.)
    }

    /// The Euler angles (XYZ, in radians) of the object's tilt at the given elapsed time.
    pub fn tilt_at(&self, elapsed: f32) -> Vec3 {
        let phase = self.phase(elapsed);
        Vec3::new(
            phase.cos() / 8. * self.rotation_intensity,
            phase.sin() / 8. * self.rotation_intensity,
            phase.sin() / 20. * self.rotation_intensity,
        )
    }

    /// The tilt at the given elapsed time as a quaternion.
    pub fn rotation_at(&self, elapsed: f32) -> Quat {
        let Vec3 { x, y, z } = self.tilt_at(elapsed);
        Quat::from_euler(EulerRot::XYZ, x, y, z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn bounded_motion_test() {
        let mut rng = StdRng::seed_from_u64(12345);
        let photo = FloatMotion::photo(&mut rng);
        let star = FloatMotion::star(&mut rng);

        assert!((0. ..MAX_PHASE_OFFSET).contains(&photo.offset));
        assert_ne!(photo.offset, star.offset);

        for i in 0..1000 {
            let elapsed = i as f32 * 0.05;

            assert!(photo.offset_at(elapsed).y.abs() <= 0.02 + 1e-6);
            assert!(star.offset_at(elapsed).y.abs() <= 0.05 + 1e-6);

            let tilt = photo.tilt_at(elapsed);
            assert!(tilt.x.abs() <= 0.1 / 8. + 1e-6);
            assert!(tilt.y.abs() <= 0.1 / 8. + 1e-6);
            assert!(tilt.z.abs() <= 0.1 / 20. + 1e-6);
        }
    }

    #[test]
    fn oscillates_test() {
        let motion = FloatMotion {
            speed: 2.,
            rotation_intensity: 1.,
            float_intensity: 1.,
            offset: 0.,
        };

        // speed / 4 = 0.5 rad/s, so a quarter period is π seconds
        assert!(approx_eq!(f32, motion.offset_at(0.).y, 0.));
        assert!(approx_eq!(
            f32,
            motion.offset_at(std::f32::consts::PI).y,
            0.1,
            epsilon = 1e-6
        ));
        assert!(approx_eq!(f32, motion.tilt_at(0.).x, 1. / 8.));
        assert!(motion
            .rotation_at(0.)
            .abs_diff_eq(Quat::from_rotation_x(1. / 8.), 1e-6));
    }
}
