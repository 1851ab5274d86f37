//! Octree cell arena entries

use crate::float_types::{Real, parry3d::bounding_volume::Aabb};
use crate::network::{LatticeKey, PointNetwork, VertexId};
use nalgebra::Point3;
use std::ops::Range;

/// Index of a cell in the octree arena.
pub type CellId = usize;

/// The root is always the first cell of the arena.
pub const ROOT: CellId = 0;

/// Upper/lower half along x, y and z for child or corner index `i`.
///
/// Bit 0 selects x, bit 1 y, bit 2 z; the same convention numbers both the
/// eight children of a cell and its eight corners.
#[inline]
pub const fn octant_bits(i: usize) -> [u32; 3] {
    [(i & 1) as u32, ((i >> 1) & 1) as u32, ((i >> 2) & 1) as u32]
}

/// An axis-aligned cell of the octree.
#[derive(Debug, Clone)]
pub struct Cell {
    pub bbox: Aabb,
    /// Broad-phase box: the cell centre ± three half-extents.
    pub triple: Aabb,
    /// Split point used when descending to children.
    pub centre: Point3<Real>,
    pub level: u32,
    /// Lattice key of the minimum corner.
    pub origin: LatticeKey,
    /// Edge length in lattice steps.
    pub size: u32,
    pub parent: Option<CellId>,
    pub children: Option<[CellId; 8]>,
    pub corners: [VertexId; 8],
    /// Triangles whose broad-phase test against `triple` passed.
    pub candidates: Vec<usize>,
    /// Range into the network tetrahedra filling this cell; empty unless a leaf.
    pub tetrahedra: Range<usize>,
}

impl Cell {
    pub(crate) fn new(
        network: &PointNetwork,
        origin: LatticeKey,
        size: u32,
        level: u32,
        parent: Option<CellId>,
        corners: [VertexId; 8],
    ) -> Self {
        let bbox = Aabb::new(
            network.position_of(origin),
            network.position_of(origin.map(|k| k + size)),
        );
        Self {
            triple: triple_of(&bbox),
            centre: network.position_of(origin.map(|k| k + size / 2)),
            bbox,
            level,
            origin,
            size,
            parent,
            children: None,
            corners,
            candidates: Vec::new(),
            tetrahedra: 0..0,
        }
    }

    #[inline]
    pub const fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// Lattice key of corner `i`, see [`octant_bits`].
    #[inline]
    pub fn corner_key(&self, i: usize) -> LatticeKey {
        let bits = octant_bits(i);
        [
            self.origin[0] + bits[0] * self.size,
            self.origin[1] + bits[1] * self.size,
            self.origin[2] + bits[2] * self.size,
        ]
    }

    /// Child index whose octant holds `p`; ties go to the upper half.
    #[inline]
    pub fn octant_of(&self, p: &Point3<Real>) -> usize {
        (0..3).fold(0, |acc, axis| {
            acc | (usize::from(p[axis] >= self.centre[axis]) << axis)
        })
    }

    /// Distance from `p` to the boundary of the broad-phase box, zero outside it.
    ///
    /// No triangle missing from `candidates` can be closer than this to `p`.
    pub fn clearance(&self, p: &Point3<Real>) -> Real {
        (0..3)
            .map(|axis| (p[axis] - self.triple.mins[axis]).min(self.triple.maxs[axis] - p[axis]))
            .fold(Real::MAX, Real::min)
            .max(0.0)
    }

    /// `true` when `p` is within `tolerance` of one of the six faces of this cell.
    pub fn on_boundary(&self, p: &Point3<Real>, tolerance: Real) -> bool {
        let extents = self.bbox.maxs - self.bbox.mins;
        (0..3).any(|axis| {
            let slack = tolerance * extents[axis];
            (p[axis] - self.bbox.mins[axis]).abs() <= slack
                || (self.bbox.maxs[axis] - p[axis]).abs() <= slack
        })
    }
}

/// The box with the same centre and three times the half-extents.
pub fn triple_of(bbox: &Aabb) -> Aabb {
    let centre = bbox.center();
    let radius = bbox.half_extents() * 3.0;
    Aabb::new(centre - radius, centre + radius)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triple_keeps_centre() {
        let bbox = Aabb::new(Point3::new(0.0, 0.0, 0.0), Point3::new(2.0, 4.0, 6.0));
        let triple = triple_of(&bbox);
        assert_eq!(triple.mins, Point3::new(-2.0, -4.0, -6.0));
        assert_eq!(triple.maxs, Point3::new(4.0, 8.0, 12.0));
    }

    #[test]
    fn octant_bits_match_corner_keys() {
        let domain = Aabb::new(Point3::origin(), Point3::new(1.0, 1.0, 1.0));
        let network = PointNetwork::new(&domain, 8);
        let cell = Cell::new(&network, [0, 4, 0], 4, 1, Some(ROOT), [0; 8]);
        assert_eq!(cell.corner_key(0), [0, 4, 0]);
        assert_eq!(cell.corner_key(5), [4, 4, 4]);
        assert_eq!(cell.octant_of(&Point3::new(0.75, 0.6, 0.1)), 1);
        assert_eq!(cell.octant_of(&Point3::new(0.1, 0.9, 0.9)), 6);
    }

    #[test]
    fn clearance_measures_the_broad_phase_box() {
        let domain = Aabb::new(Point3::origin(), Point3::new(1.0, 1.0, 1.0));
        let network = PointNetwork::new(&domain, 8);
        // cell [0.5, 1]^3, triple [0, 1.5]^3
        let cell = Cell::new(&network, [4, 4, 4], 4, 1, Some(ROOT), [0; 8]);
        assert!((cell.clearance(&Point3::new(0.5, 0.5, 0.5)) - 0.5).abs() < 1e4 * Real::EPSILON);
        assert!((cell.clearance(&Point3::new(0.2, 1.0, 1.0)) - 0.2).abs() < 1e4 * Real::EPSILON);
        assert_eq!(cell.clearance(&Point3::new(-1.0, 1.0, 1.0)), 0.0);
    }
}
