//! Parallel implementation of the resolution pass

use crate::errors::SdfResult;
use crate::network::VertexId;
use crate::resolve::traits::{ResolveOps, SearchContext};
use crate::resolve::{VertexResolution, resolve_vertex};
use rayon::prelude::*;

/// Resolves vertices on the rayon pool.
///
/// Every vertex id appears once in the input range, so each is still
/// resolved exactly once.
pub struct ParallelResolveOps;

impl ParallelResolveOps {
    pub const fn new() -> Self {
        Self
    }
}

impl Default for ParallelResolveOps {
    fn default() -> Self {
        Self::new()
    }
}

impl ResolveOps for ParallelResolveOps {
    fn resolve_all(&self, context: SearchContext<'_>) -> SdfResult<Vec<(VertexId, VertexResolution)>> {
        context
            .network
            .vertices()
            .par_iter()
            .enumerate()
            .filter(|(_, vertex)| !vertex.is_resolved())
            .map(|(id, _)| resolve_vertex(context, id).map(|found| (id, found)))
            .collect()
    }
}
