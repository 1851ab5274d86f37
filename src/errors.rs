//! Construction errors

use crate::triangle::ClosestFeature;
use thiserror::Error;

/// Result alias used by every fallible operation of the crate.
pub type SdfResult<T> = Result<T, SdfError>;

/// Everything that can abort [`LevelsetOctree::construct`](crate::LevelsetOctree::construct).
///
/// Query-time conditions are never errors; see [`DistanceQuery`](crate::DistanceQuery).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SdfError {
    /// The mesh has no facets or no vertices.
    #[error("mesh is empty")]
    EmptyMesh,

    /// A facet does not have exactly three vertices.
    #[error("facet {facet} is not a triangle ({vertices} vertices)")]
    NotATriangle { facet: usize, vertices: usize },

    /// A facet references a vertex that does not exist.
    #[error("facet {facet} references vertex {index}, but the mesh has {len} vertices")]
    IndexOutOfRange { facet: usize, index: usize, len: usize },

    /// A facet has zero area, so it has no normal.
    #[error("facet {facet} is degenerate")]
    DegenerateFacet { facet: usize },

    /// An edge is used by a single facet, so the surface is not closed.
    #[error("edge ({a}, {b}) borders only one facet, the mesh is not closed")]
    OpenEdge { a: usize, b: usize },

    /// An edge is shared by more than two facets.
    #[error("edge ({a}, {b}) is shared by {facets} facets")]
    NonManifoldEdge { a: usize, b: usize, facets: usize },

    /// The configuration cannot produce an octree.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The mesh bounding box is flat along at least one axis.
    #[error("mesh bounding box is degenerate")]
    DegenerateBounds,

    /// Tetrahedralizing a leaf produced a tetrahedron without volume.
    #[error("leaf cell {cell} produced a flat tetrahedron")]
    DegenerateTetrahedron { cell: usize },

    /// Sign resolution met a closest feature it has no pseudo-normal for.
    #[error("triangle {triangle} has no pseudo-normal for {feature:?}")]
    UnexpectedFeature {
        triangle: usize,
        feature: ClosestFeature,
    },

    /// The root cell has no candidate triangles, so no distance can be found.
    #[error("root cell holds no triangles")]
    EmptyRoot,

    /// A network vertex is not referenced by any leaf, so its search has no start.
    #[error("network vertex {vertex} is not owned by any leaf cell")]
    UnownedVertex { vertex: usize },
}
