//! Traits defining the resolution pass for dependency inversion

use crate::errors::SdfResult;
use crate::network::{PointNetwork, VertexId};
use crate::octree::Cell;
use crate::resolve::VertexResolution;
use crate::triangle::TriangleCache;

/// Read-only view of a finished octree, shared by every vertex search.
#[derive(Clone, Copy)]
pub struct SearchContext<'a> {
    pub triangles: &'a TriangleCache,
    pub cells: &'a [Cell],
    pub network: &'a PointNetwork,
}

/// Computes the resolution of every unresolved network vertex.
///
/// Implementations only read; the caller writes the results back once each.
pub trait ResolveOps {
    fn resolve_all(&self, context: SearchContext<'_>) -> SdfResult<Vec<(VertexId, VertexResolution)>>;
}
