//! Serial implementation of the resolution pass

use crate::errors::SdfResult;
use crate::network::VertexId;
use crate::resolve::traits::{ResolveOps, SearchContext};
use crate::resolve::{VertexResolution, resolve_vertex};

/// Serial implementation of the resolution pass
pub struct SerialResolveOps;

impl SerialResolveOps {
    pub const fn new() -> Self {
        Self
    }
}

impl Default for SerialResolveOps {
    fn default() -> Self {
        Self::new()
    }
}

impl ResolveOps for SerialResolveOps {
    fn resolve_all(&self, context: SearchContext<'_>) -> SdfResult<Vec<(VertexId, VertexResolution)>> {
        context
            .network
            .vertices()
            .iter()
            .enumerate()
            .filter(|(_, vertex)| !vertex.is_resolved())
            .map(|(id, _)| resolve_vertex(context, id).map(|found| (id, found)))
            .collect()
    }
}
