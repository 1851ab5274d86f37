//! The levelset octree: construction, lifetime and queries

use crate::config::OctreeConfig;
use crate::errors::{SdfError, SdfResult};
use crate::float_types::{FAR_OUTSIDE, Real, parry3d::bounding_volume::Aabb};
use crate::mesh::IndexedMesh;
use crate::network::{PointNetwork, VertexKind};
use crate::resolve::resolve_network;
use crate::triangle::TriangleCache;
use tracing::{debug, info};

mod build;
pub mod cell;
mod query;
mod tetra;

pub use cell::{Cell, CellId, ROOT};

/// Outcome of a point query. Query-time conditions are values, never errors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DistanceQuery {
    /// Nothing has been constructed, or the structure was released.
    Unavailable,
    /// The point is not strictly inside the root box.
    OutsideDomain,
    /// Interpolated signed distance, negative inside the surface.
    Sampled {
        distance: Real,
        /// The point lies on a face of its leaf cell (within tolerance).
        on_cell_boundary: bool,
    },
}

impl DistanceQuery {
    /// The distance, [`FAR_OUTSIDE`] outside the domain, `None` when unavailable.
    pub const fn distance(&self) -> Option<Real> {
        match self {
            DistanceQuery::Unavailable => None,
            DistanceQuery::OutsideDomain => Some(FAR_OUTSIDE),
            DistanceQuery::Sampled { distance, .. } => Some(*distance),
        }
    }

    pub const fn is_sampled(&self) -> bool {
        matches!(self, DistanceQuery::Sampled { .. })
    }
}

/// Counts describing a finished construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub triangles: usize,
    pub cells: usize,
    pub leaves: usize,
    /// Deepest level any cell reached.
    pub depth: u32,
    /// All network points, Steiner points included.
    pub vertices: usize,
    /// Cell corners only.
    pub corner_vertices: usize,
    pub tetrahedra: usize,
    /// Vertices whose distance had to be certified above their owning leaf.
    pub widened_searches: usize,
    /// Vertices whose sign was tie-broken.
    pub ambiguous_signs: usize,
}

/// Adaptive signed distance field of a closed triangle mesh.
///
/// ```
/// use levelset_octree::{IndexedMesh, LevelsetOctree, float_types::tolerance};
/// use nalgebra::Point3;
///
/// let mut octree = LevelsetOctree::new();
/// octree.construct(&IndexedMesh::cube(1.0), 3).unwrap();
///
/// let inside = octree.query_distance(&Point3::new(0.5, 0.5, 0.5)).unwrap();
/// assert!((inside + 0.5).abs() < 10.0 * tolerance());
///
/// octree.release();
/// assert_eq!(octree.query_distance(&Point3::new(0.5, 0.5, 0.5)), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct LevelsetOctree {
    levelset: Option<Levelset>,
}

/// Everything a construction produces, dropped as a unit.
#[derive(Debug, Clone)]
struct Levelset {
    config: OctreeConfig,
    triangles: TriangleCache,
    cells: Vec<Cell>,
    network: PointNetwork,
    report: BuildReport,
}

impl LevelsetOctree {
    pub const fn new() -> Self {
        Self { levelset: None }
    }

    /// Build the field of `mesh` with default settings and `max_level` subdivisions.
    pub fn construct(&mut self, mesh: &IndexedMesh, max_level: u32) -> SdfResult<BuildReport> {
        self.construct_with(mesh, &OctreeConfig::default().with_max_level(max_level))
    }

    /// Build the field of `mesh`.
    ///
    /// Any previous structure is released first; on error the octree stays
    /// unconstructed.
    pub fn construct_with(
        &mut self,
        mesh: &IndexedMesh,
        config: &OctreeConfig,
    ) -> SdfResult<BuildReport> {
        self.release();
        config.validate()?;

        let levelset = Levelset::build(mesh, config)?;
        let report = levelset.report.clone();
        info!(
            triangles = report.triangles,
            leaves = report.leaves,
            depth = report.depth,
            vertices = report.vertices,
            tetrahedra = report.tetrahedra,
            "levelset octree constructed"
        );
        self.levelset = Some(levelset);
        Ok(report)
    }

    /// Drop the whole structure. Calling it again is a no-op.
    pub fn release(&mut self) {
        if self.levelset.take().is_some() {
            debug!("levelset octree released");
        }
    }

    #[inline]
    pub const fn is_constructed(&self) -> bool {
        self.levelset.is_some()
    }

    pub fn report(&self) -> Option<&BuildReport> {
        self.levelset.as_ref().map(|l| &l.report)
    }

    pub fn config(&self) -> Option<&OctreeConfig> {
        self.levelset.as_ref().map(|l| &l.config)
    }

    /// Cell arena, root first; empty when unconstructed.
    pub fn cells(&self) -> &[Cell] {
        self.levelset.as_ref().map_or(&[][..], |l| l.cells.as_slice())
    }

    pub fn network(&self) -> Option<&PointNetwork> {
        self.levelset.as_ref().map(|l| &l.network)
    }

    pub fn triangles(&self) -> Option<&TriangleCache> {
        self.levelset.as_ref().map(|l| &l.triangles)
    }

    /// The enlarged box every query is answered in.
    pub fn domain(&self) -> Option<Aabb> {
        self.levelset.as_ref().map(|l| l.cells[ROOT].bbox)
    }
}

impl Levelset {
    fn build(mesh: &IndexedMesh, config: &OctreeConfig) -> SdfResult<Self> {
        let triangles = TriangleCache::from_mesh(mesh, config.vertex_normals)?;
        let bounds = mesh.bounding_box().ok_or(SdfError::EmptyMesh)?;
        let domain = enlarge(&bounds, config.margin)?;

        let mut network = PointNetwork::new(&domain, 1 << (config.max_level + 1));
        let mut cells = build::build_cells(&triangles, &mut network, config.max_level);
        tetra::tetrahedralize(&mut cells, &mut network)?;
        let stats = resolve_network(&triangles, &cells, &mut network)?;

        let report = BuildReport {
            triangles: triangles.len(),
            cells: cells.len(),
            leaves: cells.iter().filter(|c| c.is_leaf()).count(),
            depth: cells.iter().map(|c| c.level).max().unwrap_or(0),
            vertices: network.len(),
            corner_vertices: network
                .vertices()
                .iter()
                .filter(|v| v.kind == VertexKind::Corner)
                .count(),
            tetrahedra: network.tetrahedra().len(),
            widened_searches: stats.widened,
            ambiguous_signs: stats.ambiguous,
        };

        Ok(Self {
            config: config.clone(),
            triangles,
            cells,
            network,
            report,
        })
    }
}

/// `bounds` scaled about its centre by `factor`.
fn enlarge(bounds: &Aabb, factor: Real) -> SdfResult<Aabb> {
    let half = bounds.half_extents();
    if half.iter().any(|&h| h <= 0.0 || !h.is_finite()) {
        return Err(SdfError::DegenerateBounds);
    }
    let centre = bounds.center();
    Ok(Aabb::new(centre - half * factor, centre + half * factor))
}
