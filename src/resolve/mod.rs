//! Distance and sign resolution of the point network
//!
//! A vertex searches from its owning leaf towards the root. At each cell
//! with candidates the nearest candidate is accepted only when it is closer
//! than the boundary of the cell's broad-phase box, since every triangle the
//! cell dropped lies outside that box. The root holds every triangle and
//! always accepts.

pub mod traits;

#[cfg(not(feature = "parallel"))]
pub mod serial;

#[cfg(feature = "parallel")]
pub mod parallel;

pub use traits::{ResolveOps, SearchContext};

#[cfg(not(feature = "parallel"))]
pub use serial::SerialResolveOps;

#[cfg(feature = "parallel")]
pub use parallel::ParallelResolveOps;

use crate::errors::{SdfError, SdfResult};
use crate::float_types::Real;
use crate::network::{PointNetwork, Resolution, VertexId};
use crate::octree::Cell;
use crate::triangle::TriangleCache;
use tracing::{debug, warn};

/// A resolution plus how far its search had to climb.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VertexResolution {
    pub resolution: Resolution,
    /// Levels climbed above the owning leaf before the distance was accepted.
    pub ascents: u32,
}

/// Totals of one resolution pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveStats {
    pub resolved: usize,
    /// Vertices accepted above their owning leaf.
    pub widened: usize,
    pub max_ascents: u32,
    /// Vertices whose sign came from a zero dot product.
    pub ambiguous: usize,
}

/// Resolve every vertex of `network` that is still unresolved.
pub(crate) fn resolve_network(
    triangles: &TriangleCache,
    cells: &[Cell],
    network: &mut PointNetwork,
) -> SdfResult<ResolveStats> {
    #[cfg(not(feature = "parallel"))]
    let ops = SerialResolveOps::new();
    #[cfg(feature = "parallel")]
    let ops = ParallelResolveOps::new();

    let resolved = ops.resolve_all(SearchContext {
        triangles,
        cells,
        network: &*network,
    })?;

    let mut stats = ResolveStats::default();
    for (id, found) in resolved {
        if !network.resolve(id, found.resolution) {
            continue;
        }
        stats.resolved += 1;
        if found.ascents > 0 {
            stats.widened += 1;
        }
        stats.max_ascents = stats.max_ascents.max(found.ascents);
        if found.resolution.ambiguous {
            stats.ambiguous += 1;
            warn!(
                vertex = id,
                triangle = found.resolution.triangle,
                feature = ?found.resolution.feature,
                "sign is ambiguous, treating vertex as outside"
            );
        }
    }

    debug!(
        resolved = stats.resolved,
        widened = stats.widened,
        max_ascents = stats.max_ascents,
        "point network resolved"
    );
    Ok(stats)
}

/// Signed distance of one network vertex.
pub fn resolve_vertex(context: SearchContext<'_>, id: VertexId) -> SdfResult<VertexResolution> {
    let SearchContext {
        triangles,
        cells,
        network,
    } = context;
    let vertex = network.vertex(id);
    let p = vertex.position;

    let mut cell_id = vertex.owner.ok_or(SdfError::UnownedVertex { vertex: id })?;
    let mut ascents = 0;
    let (triangle, hit) = loop {
        let cell = &cells[cell_id];
        let nearest = triangles.nearest(&p, &cell.candidates);
        match (nearest, cell.parent) {
            // the root holds every triangle, so its answer needs no certificate
            (Some(found), None) => break found,
            (Some((triangle, hit)), Some(_)) if hit.distance < cell.clearance(&p) => {
                break (triangle, hit);
            },
            (_, Some(parent)) => {
                cell_id = parent;
                ascents += 1;
            },
            (None, None) => return Err(SdfError::EmptyRoot),
        }
    };

    let normal = triangles.pseudo_normal(triangle, hit.feature)?;
    let closest = triangles.get(triangle).point_at(hit.s, hit.t);
    let (distance, ambiguous) = apply_sign(hit.distance, (p - closest).dot(&normal));

    Ok(VertexResolution {
        resolution: Resolution {
            distance,
            triangle,
            feature: hit.feature,
            ambiguous,
        },
        ascents,
    })
}

/// Sign an unsigned `distance` by `dot`, the projection of the offset from the
/// closest point onto the pseudo-normal.
///
/// Returns the signed distance and whether the sign was tie-broken: an exactly
/// zero `dot` off the surface counts as outside. A point on the surface has
/// nothing to sign.
pub const fn apply_sign(distance: Real, dot: Real) -> (Real, bool) {
    let sign = if dot < 0.0 { -1.0 } else { 1.0 };
    (sign * distance, dot == 0.0 && distance > 0.0)
}
