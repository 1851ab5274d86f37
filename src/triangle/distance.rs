//! Point to triangle distance with closest-feature classification

use super::Triangle;
use crate::float_types::Real;
use nalgebra::Point3;

/// The part of a triangle holding the closest point to a query.
///
/// Edge `i` joins corner `i` to corner `(i + 1) % 3`:
///
/// | feature     | closest `(s, t)`   |
/// |-------------|--------------------|
/// | `Face`      | interior           |
/// | `Edge(0)`   | `t = 0`            |
/// | `Edge(1)`   | `s + t = 1`        |
/// | `Edge(2)`   | `s = 0`            |
/// | `Vertex(0)` | `(0, 0)`           |
/// | `Vertex(1)` | `(1, 0)`           |
/// | `Vertex(2)` | `(0, 1)`           |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClosestFeature {
    Face,
    Edge(u8),
    Vertex(u8),
}

/// Result of [`Triangle::distance_to`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointTriangleDistance {
    /// Unsigned Euclidean distance.
    pub distance: Real,
    /// Weight of `E0` in the closest point.
    pub s: Real,
    /// Weight of `E1` in the closest point.
    pub t: Real,
    pub feature: ClosestFeature,
}

impl Triangle {
    /// Distance from `p` to this triangle.
    ///
    /// Follows the Voronoi-region walk from "Real-Time Collision Detection"
    /// (Ericson, 5.1.5), keeping the region that produced the answer.
    pub fn distance_to(&self, p: &Point3<Real>) -> PointTriangleDistance {
        let (s, t, feature) = self.closest_parameters(p);
        PointTriangleDistance {
            distance: (p - self.point_at(s, t)).norm(),
            s,
            t,
            feature,
        }
    }

    fn closest_parameters(&self, p: &Point3<Real>) -> (Real, Real, ClosestFeature) {
        let [a, b, c] = self.vertices;
        let ab = self.e0;
        let ac = self.e1;

        let ap = p - a;
        let d1 = ab.dot(&ap);
        let d2 = ac.dot(&ap);
        if d1 <= 0.0 && d2 <= 0.0 {
            return (0.0, 0.0, ClosestFeature::Vertex(0));
        }

        let bp = p - b;
        let d3 = ab.dot(&bp);
        let d4 = ac.dot(&bp);
        if d3 >= 0.0 && d4 <= d3 {
            return (1.0, 0.0, ClosestFeature::Vertex(1));
        }

        let vc = d1 * d4 - d3 * d2;
        if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
            return (d1 / (d1 - d3), 0.0, ClosestFeature::Edge(0));
        }

        let cp = p - c;
        let d5 = ab.dot(&cp);
        let d6 = ac.dot(&cp);
        if d6 >= 0.0 && d5 <= d6 {
            return (0.0, 1.0, ClosestFeature::Vertex(2));
        }

        let vb = d5 * d2 - d1 * d6;
        if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
            return (0.0, d2 / (d2 - d6), ClosestFeature::Edge(2));
        }

        let va = d3 * d6 - d5 * d4;
        if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
            let w = (d4 - d3) / ((d4 - d3) + (d5 - d6));
            return (1.0 - w, w, ClosestFeature::Edge(1));
        }

        let denom = 1.0 / (va + vb + vc);
        (vb * denom, vc * denom, ClosestFeature::Face)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Vector3;

    fn unit_triangle() -> Triangle {
        let vertices = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        Triangle {
            vertices,
            e0: vertices[1] - vertices[0],
            e1: vertices[2] - vertices[0],
            normal: Vector3::z(),
            indices: [0, 1, 2],
            neighbors: [0; 3],
        }
    }

    #[test]
    fn classifies_every_region() {
        let tri = unit_triangle();
        let cases = [
            (Point3::new(0.2, 0.2, 1.0), ClosestFeature::Face, 1.0),
            (Point3::new(0.5, -1.0, 0.0), ClosestFeature::Edge(0), 1.0),
            (Point3::new(1.0, 1.0, 0.0), ClosestFeature::Edge(1), Real::sqrt(0.5)),
            (Point3::new(-2.0, 0.5, 0.0), ClosestFeature::Edge(2), 2.0),
            (Point3::new(-1.0, -1.0, 0.0), ClosestFeature::Vertex(0), Real::sqrt(2.0)),
            (Point3::new(3.0, -1.0, 0.0), ClosestFeature::Vertex(1), Real::sqrt(5.0)),
            (Point3::new(-1.0, 3.0, 0.0), ClosestFeature::Vertex(2), Real::sqrt(5.0)),
        ];
        for (p, feature, distance) in cases {
            let hit = tri.distance_to(&p);
            assert_eq!(hit.feature, feature, "{p}");
            assert_relative_eq!(hit.distance, distance, epsilon = 1e4 * Real::EPSILON);
        }
    }

    #[test]
    fn parameters_reproduce_the_closest_point() {
        let tri = unit_triangle();
        let hit = tri.distance_to(&Point3::new(1.0, 1.0, 0.5));
        assert_eq!(hit.feature, ClosestFeature::Edge(1));
        assert_relative_eq!(hit.s + hit.t, 1.0, epsilon = 1e4 * Real::EPSILON);
        let q = tri.point_at(hit.s, hit.t);
        assert_relative_eq!(q.x, 0.5, epsilon = 1e4 * Real::EPSILON);
        assert_relative_eq!(q.y, 0.5, epsilon = 1e4 * Real::EPSILON);
    }
}
