//! Conformal tetrahedralization of the leaf cells
//!
//! Each leaf face is walked as a quadtree: a square whose centre is a cell
//! corner was split by the neighbour across it and is visited as four
//! quadrants. An unsplit square keeps every corner point found by halving
//! its edges, then is cut along its fixed diagonal when it has just four
//! boundary points or fanned from its centre otherwise. Both cells sharing
//! a face read the same network, so they produce the same triangles. Every
//! boundary triangle is then coned to the leaf centre.

use super::cell::{Cell, CellId};
use crate::errors::{SdfError, SdfResult};
use crate::network::{LatticeKey, PointNetwork, VertexId, VertexKind};
use tracing::debug;

/// Tetrahedralize every leaf and record each vertex's owning leaf.
pub(crate) fn tetrahedralize(cells: &mut [Cell], network: &mut PointNetwork) -> SdfResult<()> {
    let mut boundary = Vec::new();
    for id in 0..cells.len() {
        if !cells[id].is_leaf() {
            continue;
        }
        for &corner in &cells[id].corners {
            network.claim(corner, id);
        }

        let (origin, size) = (cells[id].origin, cells[id].size);
        boundary.clear();
        for axis in 0..3 {
            for side in 0..2 {
                let square = FaceSquare {
                    axis,
                    fixed: origin[axis] + side * size,
                    u: origin[(axis + 1) % 3],
                    v: origin[(axis + 2) % 3],
                    size,
                };
                square.triangulate(network, id, &mut boundary);
            }
        }

        let apex = network.insert(origin.map(|k| k + size / 2), VertexKind::CellCentre);
        network.claim(apex, id);

        let start = network.tetrahedra().len();
        for &[a, b, c] in boundary.iter() {
            network
                .add_tetrahedron([apex, a, b, c])
                .ok_or(SdfError::DegenerateTetrahedron { cell: id })?;
        }
        cells[id].tetrahedra = start..network.tetrahedra().len();
    }

    debug!(
        tetrahedra = network.tetrahedra().len(),
        points = network.len(),
        "leaves tetrahedralized"
    );
    Ok(())
}

/// A square on the plane `key[axis] == fixed`, spanning `size` lattice steps
/// along the two other axes in cyclic order.
#[derive(Debug, Clone, Copy)]
struct FaceSquare {
    axis: usize,
    fixed: u32,
    u: u32,
    v: u32,
    size: u32,
}

impl FaceSquare {
    #[inline]
    fn key(&self, du: u32, dv: u32) -> LatticeKey {
        let mut key = [0; 3];
        key[self.axis] = self.fixed;
        key[(self.axis + 1) % 3] = self.u + du;
        key[(self.axis + 2) % 3] = self.v + dv;
        key
    }

    fn quadrant(&self, du: u32, dv: u32) -> Self {
        let half = self.size / 2;
        Self {
            u: self.u + du * half,
            v: self.v + dv * half,
            size: half,
            ..*self
        }
    }

    fn triangulate(&self, network: &mut PointNetwork, owner: CellId, out: &mut Vec<[VertexId; 3]>) {
        let half = self.size / 2;
        if self.size >= 2 && network.is_corner(self.key(half, half)) {
            for (du, dv) in [(0, 0), (1, 0), (1, 1), (0, 1)] {
                self.quadrant(du, dv).triangulate(network, owner, out);
            }
            return;
        }

        let s = self.size;
        let corners = [(0, 0), (s, 0), (s, s), (0, s)];
        let mut ring = Vec::with_capacity(8);
        for i in 0..4 {
            let from = corners[i];
            let to = corners[(i + 1) % 4];
            ring.push(corner_vertex(network, self.key(from.0, from.1)));
            self.edge_points(network, from, to, &mut ring);
        }

        if ring.len() == 4 {
            out.push([ring[0], ring[1], ring[2]]);
            out.push([ring[0], ring[2], ring[3]]);
        } else {
            let centre = network.insert(self.key(half, half), VertexKind::FaceCentre);
            network.claim(centre, owner);
            for i in 0..ring.len() {
                out.push([centre, ring[i], ring[(i + 1) % ring.len()]]);
            }
        }
    }

    /// Corner points strictly between `from` and `to`, in order.
    fn edge_points(
        &self,
        network: &mut PointNetwork,
        from: (u32, u32),
        to: (u32, u32),
        ring: &mut Vec<VertexId>,
    ) {
        let length = from.0.abs_diff(to.0) + from.1.abs_diff(to.1);
        if length < 2 {
            return;
        }
        let mid = ((from.0 + to.0) / 2, (from.1 + to.1) / 2);
        let key = self.key(mid.0, mid.1);
        if network.is_corner(key) {
            self.edge_points(network, from, mid, ring);
            ring.push(corner_vertex(network, key));
            self.edge_points(network, mid, to, ring);
        }
    }
}

/// Vertex at a square corner. Such points always exist already because the
/// square comes from the faces of subdivided cells.
fn corner_vertex(network: &mut PointNetwork, key: LatticeKey) -> VertexId {
    debug_assert!(network.is_corner(key), "missing corner {key:?}");
    network.insert(key, VertexKind::Corner)
}
