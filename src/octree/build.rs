//! Top-down subdivision of the root cell

use super::cell::{Cell, CellId, ROOT, octant_bits};
use crate::network::{LatticeKey, PointNetwork, VertexId, VertexKind};
use crate::triangle::TriangleCache;
use tracing::debug;

/// Build the whole octree arena over the network lattice.
///
/// The root spans the full lattice and holds every triangle. A cell is split
/// while it has candidates and is above `max_level`.
pub(crate) fn build_cells(
    triangles: &TriangleCache,
    network: &mut PointNetwork,
    max_level: u32,
) -> Vec<Cell> {
    let size = network.resolution();
    let origin = [0; 3];
    let corners: [VertexId; 8] = std::array::from_fn(|i| {
        let bits = octant_bits(i);
        network.insert(
            [bits[0] * size, bits[1] * size, bits[2] * size],
            VertexKind::Corner,
        )
    });

    let mut root = Cell::new(network, origin, size, 0, None, corners);
    root.candidates = (0..triangles.len()).collect();
    let mut cells = vec![root];

    let mut stack = vec![ROOT];
    while let Some(id) = stack.pop() {
        let cell = &cells[id];
        if cell.candidates.is_empty() || cell.level >= max_level {
            continue;
        }
        stack.extend(subdivide(&mut cells, id, triangles, network));
    }

    debug!(
        cells = cells.len(),
        points = network.len(),
        "octree subdivided"
    );
    cells
}

/// Split `id` into eight children, inserting its 27 lattice points.
fn subdivide(
    cells: &mut Vec<Cell>,
    id: CellId,
    triangles: &TriangleCache,
    network: &mut PointNetwork,
) -> [CellId; 8] {
    let (origin, size, level) = {
        let cell = &cells[id];
        (cell.origin, cell.size, cell.level)
    };
    let half = size / 2;

    // 3x3x3 grid: index a + 3b + 9c sits at origin + (a, b, c) * half
    let grid: [VertexId; 27] = std::array::from_fn(|g| {
        let step = [g % 3, (g / 3) % 3, g / 9].map(|s| s as u32 * half);
        network.insert(offset(origin, step), VertexKind::Corner)
    });

    let first = cells.len();
    for octant in 0..8 {
        let o = octant_bits(octant);
        let corners = std::array::from_fn(|j| {
            let c = octant_bits(j);
            grid[(o[0] + c[0]) as usize + 3 * (o[1] + c[1]) as usize + 9 * (o[2] + c[2]) as usize]
        });

        let mut child = Cell::new(
            network,
            offset(origin, o.map(|b| b * half)),
            half,
            level + 1,
            Some(id),
            corners,
        );
        child.candidates = cells[id]
            .candidates
            .iter()
            .copied()
            .filter(|&t| triangles.get(t).intersects_aabb(&child.triple))
            .collect();
        cells.push(child);
    }

    let children = std::array::from_fn(|i| first + i);
    cells[id].children = Some(children);
    children
}

#[inline]
fn offset(origin: LatticeKey, step: [u32; 3]) -> LatticeKey {
    [origin[0] + step[0], origin[1] + step[1], origin[2] + step[2]]
}
