//! Broad-phase triangle / box overlap

use super::Triangle;
use crate::float_types::{Real, parry3d::bounding_volume::Aabb};
use nalgebra::{Point3, Vector3};

impl Triangle {
    /// Separating-axis test against `aabb`.
    ///
    /// Touching counts as overlapping, so a candidate is never dropped on a tie.
    pub fn intersects_aabb(&self, aabb: &Aabb) -> bool {
        let centre = aabb.center();
        let half_extents = aabb.half_extents();
        let [v0, v1, v2] = self.vertices.map(|v| Point3::from(v - centre));

        // box axes
        for axis in 0..3 {
            let lo = v0[axis].min(v1[axis]).min(v2[axis]);
            let hi = v0[axis].max(v1[axis]).max(v2[axis]);
            if hi < -half_extents[axis] || lo > half_extents[axis] {
                return false;
            }
        }

        if !overlaps_on_axis(&self.normal, &half_extents, [v0, v1, v2]) {
            return false;
        }

        let edges = [v1 - v0, v2 - v1, v0 - v2];
        let box_axes = [Vector3::x(), Vector3::y(), Vector3::z()];
        for axis in &box_axes {
            for edge in &edges {
                let cross = axis.cross(edge);
                if cross.norm_squared() > Real::EPSILON * edge.norm_squared()
                    && !overlaps_on_axis(&cross, &half_extents, [v0, v1, v2])
                {
                    return false;
                }
            }
        }

        true
    }
}

/// Projections of the triangle and of a box centred at the origin overlap on `axis`.
fn overlaps_on_axis(
    axis: &Vector3<Real>,
    half_extents: &Vector3<Real>,
    [v0, v1, v2]: [Point3<Real>; 3],
) -> bool {
    let p0 = axis.dot(&v0.coords);
    let p1 = axis.dot(&v1.coords);
    let p2 = axis.dot(&v2.coords);

    let radius = half_extents.x * axis.x.abs()
        + half_extents.y * axis.y.abs()
        + half_extents.z * axis.z.abs();

    p0.min(p1).min(p2) <= radius && p0.max(p1).max(p2) >= -radius
}
