//! This module handles the colours used by the particles.

/// An sRGB colour, as it would be written in a hex code.
pub type RGBArray = [u8; 3];

/// A linear RGB colour with components in [0, 1], ready to be handed to the shader.
pub type Rgb = [f32; 3];

/// The neon green of most of the leaves (`#00ff88`).
pub const NEON_GREEN: RGBArray = [0x00, 0xff, 0x88];

/// The deeper green of the rest of the leaves (`#00cc66`).
pub const DEEP_GREEN: RGBArray = [0x00, 0xcc, 0x66];

/// The gold of the gold ornaments and the star (`#ffd700`).
pub const GOLD: RGBArray = [0xff, 0xd7, 0x00];

/// The red-pink of the red ornaments (`#ff3366`).
pub const RED_PINK: RGBArray = [0xff, 0x33, 0x66];

/// Plain white, used for snow.
pub const WHITE: RGBArray = [0xff, 0xff, 0xff];

/// Convert an sRGB colour into linear RGB with the standard sRGB transfer function.
pub fn srgb_to_linear(colour: RGBArray) -> Rgb {
    colour.map(|c| {
        let c = f32::from(c) / 255.;
        if c <= 0.04045 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    #[test]
    fn srgb_to_linear_test() {
        assert_eq!(srgb_to_linear([0, 0, 0]), [0., 0., 0.]);
        assert_eq!(srgb_to_linear(WHITE), [1., 1., 1.]);

        let [r, g, b] = srgb_to_linear(GOLD);
        assert!(approx_eq!(f32, r, 1.));
        assert!(approx_eq!(f32, g, 0.6795425, epsilon = 1e-4));
        assert!(approx_eq!(f32, b, 0.));

        // Linearising always darkens the midtones
        for colour in [NEON_GREEN, DEEP_GREEN, RED_PINK] {
            for (linear, srgb) in srgb_to_linear(colour).into_iter().zip(colour) {
                assert!(linear <= f32::from(srgb) / 255.);
                assert!((0. ..=1.).contains(&linear));
            }
        }
    }
}
