//! This module builds the star on top of the tree.

use glam::{Vec2, Vec3};
use std::f32::consts::{FRAC_PI_2, TAU};

/// The number of points on the star.
pub const STAR_POINTS: usize = 5;

/// The distance from the centre to the tip of each point.
const OUTER_RADIUS: f32 = 1.2;

/// The distance from the centre to the notches between the points.
const INNER_RADIUS: f32 = 0.6;

/// How thick the star is.
const DEPTH: f32 = 0.3;

/// The outline of the star in the XY plane, alternating between tips and notches and going
/// anticlockwise from the bottom tip.
pub fn star_outline() -> Vec<Vec2> {
    (0..STAR_POINTS * 2)
        .map(|i| {
            let r = if i % 2 == 0 {
                OUTER_RADIUS
            } else {
                INNER_RADIUS
            };
            let angle = i as f32 / (STAR_POINTS * 2) as f32 * TAU - FRAC_PI_2;
            Vec2::new(angle.cos() * r, angle.sin() * r)
        })
        .collect()
}

/// The mesh data of the star outline extruded into a flat prism, centred on the origin.
///
/// The faces and sides don't share vertices so that every face gets flat normals.
#[derive(Clone, Debug, PartialEq)]
pub struct StarPrism {
    /// The vertex positions.
    pub positions: Vec<[f32; 3]>,

    /// The vertex normals.
    pub normals: Vec<[f32; 3]>,

    /// The triangle list, wound anticlockwise when seen from outside.
    pub indices: Vec<u32>,
}

impl StarPrism {
    /// Extrude the [`star_outline`].
    pub fn new() -> Self {
        let outline = star_outline();
        let n = outline.len() as u32;
        let half = DEPTH / 2.;

        let mut positions = vec![];
        let mut normals = vec![];
        let mut indices = vec![];

        // Front and back faces as triangle fans around the centre
        for (z, normal) in [(half, Vec3::Z), (-half, Vec3::NEG_Z)] {
            let centre = positions.len() as u32;
            positions.push([0., 0., z]);
            positions.extend(outline.iter().map(|p| [p.x, p.y, z]));
            normals.extend(std::iter::repeat(normal.to_array()).take(outline.len() + 1));

            for i in 0..n {
                let a = centre + 1 + i;
                let b = centre + 1 + (i + 1) % n;
                if z > 0. {
                    indices.extend([centre, a, b]);
                } else {
                    indices.extend([centre, b, a]);
                }
            }
        }

        // Sides
        for i in 0..outline.len() {
            let p = outline[i];
            let q = outline[(i + 1) % outline.len()];
            let edge = q - p;
            let normal = Vec3::new(edge.y, -edge.x, 0.).normalize().to_array();

            let first = positions.len() as u32;
            positions.extend([
                [p.x, p.y, half],
                [q.x, q.y, half],
                [q.x, q.y, -half],
                [p.x, p.y, -half],
            ]);
            normals.extend([normal; 4]);
            indices.extend([first, first + 3, first + 2, first, first + 2, first + 1]);
        }

        Self {
            positions,
            normals,
            indices,
        }
    }
}

impl Default for StarPrism {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    #[test]
    fn star_outline_test() {
        let outline = star_outline();
        assert_eq!(outline.len(), 10);

        assert!(approx_eq!(f32, outline[0].x, 0., epsilon = 1e-6));
        assert!(approx_eq!(f32, outline[0].y, -1.2, epsilon = 1e-6));

        for (i, point) in outline.iter().enumerate() {
            let expected = if i % 2 == 0 { 1.2 } else { 0.6 };
            assert!(approx_eq!(f32, point.length(), expected, epsilon = 1e-6));
        }
    }

    #[test]
    fn star_prism_test() {
        let prism = StarPrism::new();

        assert_eq!(prism.positions.len(), 2 * 11 + 10 * 4);
        assert_eq!(prism.normals.len(), prism.positions.len());
        assert_eq!(prism.indices.len(), 2 * 10 * 3 + 10 * 6);
        assert!(prism
            .indices
            .iter()
            .all(|&i| (i as usize) < prism.positions.len()));

        for position in &prism.positions {
            assert!(position[2].abs() <= 0.15 + 1e-6);
        }

        // Every triangle is wound anticlockwise when seen from the side its normal points to
        for triangle in prism.indices.chunks(3) {
            let [a, b, c] = [triangle[0], triangle[1], triangle[2]]
                .map(|i| Vec3::from_array(prism.positions[i as usize]));
            let normal = Vec3::from_array(prism.normals[triangle[0] as usize]);

            assert!(approx_eq!(f32, normal.length(), 1., epsilon = 1e-6));
            assert!((b - a).cross(c - a).dot(normal) > 0., "{triangle:?}");
        }
    }
}
