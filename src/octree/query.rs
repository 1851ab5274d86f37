//! Point location and barycentric interpolation

use super::cell::{CellId, ROOT};
use super::{DistanceQuery, Levelset, LevelsetOctree};
use crate::float_types::Real;
use nalgebra::{Matrix3, Point3, Vector3};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

impl LevelsetOctree {
    /// Signed distance at `point`.
    pub fn query(&self, point: &Point3<Real>) -> DistanceQuery {
        let Some(levelset) = &self.levelset else {
            return DistanceQuery::Unavailable;
        };
        let Some(leaf) = levelset.leaf_containing(point) else {
            return DistanceQuery::OutsideDomain;
        };

        let tet = levelset.locate(leaf, point);
        DistanceQuery::Sampled {
            distance: levelset.network.interpolate(tet, point),
            on_cell_boundary: levelset.cells[leaf]
                .on_boundary(point, levelset.config.location_tolerance),
        }
    }

    /// Signed distance at `point`: `None` when unconstructed,
    /// [`FAR_OUTSIDE`](crate::float_types::FAR_OUTSIDE) outside the domain.
    pub fn query_distance(&self, point: &Point3<Real>) -> Option<Real> {
        self.query(point).distance()
    }

    /// Gradient of the interpolated field at `point`.
    ///
    /// The field is linear inside each tetrahedron, so this is the gradient of
    /// the containing one. `None` when unconstructed or outside the domain.
    pub fn query_gradient(&self, point: &Point3<Real>) -> Option<Vector3<Real>> {
        let levelset = self.levelset.as_ref()?;
        let leaf = levelset.leaf_containing(point)?;
        levelset.gradient(levelset.locate(leaf, point))
    }

    /// [`query`](Self::query) for every point, in order.
    pub fn query_many(&self, points: &[Point3<Real>]) -> Vec<DistanceQuery> {
        #[cfg(feature = "parallel")]
        {
            points.par_iter().map(|p| self.query(p)).collect()
        }
        #[cfg(not(feature = "parallel"))]
        {
            points.iter().map(|p| self.query(p)).collect()
        }
    }
}

impl Levelset {
    /// Leaf holding `point`, `None` unless it lies strictly inside the root box.
    fn leaf_containing(&self, point: &Point3<Real>) -> Option<CellId> {
        let root = &self.cells[ROOT].bbox;
        let inside = (0..3).all(|axis| root.mins[axis] < point[axis] && point[axis] < root.maxs[axis]);
        if !inside {
            return None;
        }

        let mut id = ROOT;
        while let Some(children) = self.cells[id].children {
            id = children[self.cells[id].octant_of(point)];
        }
        Some(id)
    }

    /// Tetrahedron of `leaf` containing `point`.
    ///
    /// Rounding can leave a point just outside every tetrahedron, so the one
    /// with the largest minimum barycentric weight wins.
    fn locate(&self, leaf: CellId, point: &Point3<Real>) -> usize {
        let tolerance = self.config.location_tolerance;
        let mut best = (Real::MIN, self.cells[leaf].tetrahedra.start);
        for tet in self.cells[leaf].tetrahedra.clone() {
            let weakest = self
                .network
                .barycentric(tet, point)
                .into_iter()
                .fold(Real::MAX, Real::min);
            if weakest >= -tolerance {
                return tet;
            }
            if weakest > best.0 {
                best = (weakest, tet);
            }
        }
        best.1
    }

    fn gradient(&self, tet: usize) -> Option<Vector3<Real>> {
        let ids = self.network.tetrahedra()[tet].vertices;
        let [a, b, c, d] = ids.map(|id| self.network.vertex(id).position);
        let [da, db, dc, dd] = ids.map(|id| self.network.vertex(id).distance);

        let edges = Matrix3::from_rows(&[
            (b - a).transpose(),
            (c - a).transpose(),
            (d - a).transpose(),
        ]);
        let rise = Vector3::new(db - da, dc - da, dd - da);
        Some(edges.try_inverse()? * rise)
    }
}
