//! Conformal point network
//!
//! Every point the octree creates lives on an integer lattice spanning the
//! root box, so a point shared by neighbouring cells hashes to one key and
//! is stored once. The network also owns the tetrahedra that tile the root
//! box and the per-vertex signed distances written by the resolver.

use crate::float_types::{Real, UNRESOLVED, parry3d::bounding_volume::Aabb};
use crate::triangle::ClosestFeature;
use hashbrown::HashMap;
use nalgebra::{Point3, Vector3};

/// Index of a vertex in the network.
pub type VertexId = usize;

/// Integer lattice coordinates of a network point.
pub type LatticeKey = [u32; 3];

/// Why a point was inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexKind {
    /// One of the 27 points of a subdivided cell (or a root corner).
    Corner,
    /// Centre of a leaf face square fanned into triangles.
    FaceCentre,
    /// Centre of a leaf cell, apex of its tetrahedra.
    CellCentre,
}

/// Outcome of resolving one vertex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    /// Signed distance, negative inside.
    pub distance: Real,
    /// Triangle holding the closest point.
    pub triangle: usize,
    pub feature: ClosestFeature,
    /// The sign came from an exactly zero dot product and was tie-broken to positive.
    pub ambiguous: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NetworkVertex {
    pub key: LatticeKey,
    pub position: Point3<Real>,
    pub kind: VertexKind,
    /// Leaf cell the distance search starts from.
    pub owner: Option<usize>,
    /// Signed distance, [`UNRESOLVED`] until resolved.
    pub distance: Real,
    pub resolution: Option<Resolution>,
}

impl NetworkVertex {
    #[inline]
    pub fn is_resolved(&self) -> bool {
        self.resolution.is_some()
    }
}

/// Four vertex ids ordered so that `volume` is positive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tetrahedron {
    pub vertices: [VertexId; 4],
    pub volume: Real,
}

#[derive(Debug, Clone)]
pub struct PointNetwork {
    origin: Point3<Real>,
    step: Vector3<Real>,
    resolution: u32,
    index: HashMap<LatticeKey, VertexId>,
    vertices: Vec<NetworkVertex>,
    tetrahedra: Vec<Tetrahedron>,
}

impl PointNetwork {
    /// Empty network with `resolution` lattice steps along each axis of `domain`.
    pub fn new(domain: &Aabb, resolution: u32) -> Self {
        Self {
            origin: domain.mins,
            step: (domain.maxs - domain.mins) / resolution as Real,
            resolution,
            index: HashMap::new(),
            vertices: Vec::new(),
            tetrahedra: Vec::new(),
        }
    }

    /// Lattice steps per axis.
    #[inline]
    pub const fn resolution(&self) -> u32 {
        self.resolution
    }

    /// World position of a lattice key.
    #[inline]
    pub fn position_of(&self, key: LatticeKey) -> Point3<Real> {
        Point3::new(
            self.origin.x + key[0] as Real * self.step.x,
            self.origin.y + key[1] as Real * self.step.y,
            self.origin.z + key[2] as Real * self.step.z,
        )
    }

    /// Insert the point at `key`, or return the existing vertex there.
    ///
    /// Re-inserting never changes the stored kind.
    pub fn insert(&mut self, key: LatticeKey, kind: VertexKind) -> VertexId {
        if let Some(&id) = self.index.get(&key) {
            return id;
        }
        let id = self.vertices.len();
        let position = self.position_of(key);
        self.vertices.push(NetworkVertex {
            key,
            position,
            kind,
            owner: None,
            distance: UNRESOLVED,
            resolution: None,
        });
        self.index.insert(key, id);
        id
    }

    #[inline]
    pub fn find(&self, key: LatticeKey) -> Option<VertexId> {
        self.index.get(&key).copied()
    }

    /// A cell corner sits at `key`, meaning some cell around it was subdivided.
    #[inline]
    pub fn is_corner(&self, key: LatticeKey) -> bool {
        self.find(key)
            .is_some_and(|id| self.vertices[id].kind == VertexKind::Corner)
    }

    /// Record `cell` as the search start of `id` unless one is already set.
    pub fn claim(&mut self, id: VertexId, cell: usize) {
        self.vertices[id].owner.get_or_insert(cell);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    #[inline]
    pub fn vertex(&self, id: VertexId) -> &NetworkVertex {
        &self.vertices[id]
    }

    pub fn vertices(&self) -> &[NetworkVertex] {
        &self.vertices
    }

    /// Signed distance of `id`, `None` while unresolved.
    #[inline]
    pub fn distance(&self, id: VertexId) -> Option<Real> {
        let v = &self.vertices[id];
        v.is_resolved().then_some(v.distance)
    }

    /// Store the resolution of `id`. Returns `false`, changing nothing, if it was already resolved.
    pub fn resolve(&mut self, id: VertexId, resolution: Resolution) -> bool {
        let vertex = &mut self.vertices[id];
        if vertex.is_resolved() {
            return false;
        }
        vertex.distance = resolution.distance;
        vertex.resolution = Some(resolution);
        true
    }

    pub fn tetrahedra(&self) -> &[Tetrahedron] {
        &self.tetrahedra
    }

    /// Add a tetrahedron, reordering it to positive volume.
    ///
    /// Returns `None` and adds nothing when the four points are (nearly) coplanar.
    pub fn add_tetrahedron(&mut self, mut vertices: [VertexId; 4]) -> Option<usize> {
        let [a, b, c, d] = vertices.map(|v| self.vertices[v].position);
        let mut volume = signed_volume(&a, &b, &c, &d);
        let scale = (b - a).norm() * (c - a).norm() * (d - a).norm();
        if volume.abs() <= Real::EPSILON * scale {
            return None;
        }
        if volume < 0.0 {
            vertices.swap(2, 3);
            volume = -volume;
        }
        self.tetrahedra.push(Tetrahedron { vertices, volume });
        Some(self.tetrahedra.len() - 1)
    }

    /// Signed volumes of the four sub-tetrahedra made by replacing one corner of `tet` with `p`.
    ///
    /// They sum to the tetrahedron volume; all are non-negative iff `p` lies inside.
    pub fn sub_volumes(&self, tet: usize, p: &Point3<Real>) -> [Real; 4] {
        let [a, b, c, d] = self.tetrahedra[tet].vertices.map(|v| self.vertices[v].position);
        [
            signed_volume(p, &b, &c, &d),
            signed_volume(&a, p, &c, &d),
            signed_volume(&a, &b, p, &d),
            signed_volume(&a, &b, &c, p),
        ]
    }

    /// Barycentric weights of `p` in `tet`.
    pub fn barycentric(&self, tet: usize, p: &Point3<Real>) -> [Real; 4] {
        let volumes = self.sub_volumes(tet, p);
        let total: Real = volumes.iter().sum();
        volumes.map(|v| v / total)
    }

    /// Linear interpolation of the resolved distances of `tet` at `p`.
    pub fn interpolate(&self, tet: usize, p: &Point3<Real>) -> Real {
        let volumes = self.sub_volumes(tet, p);
        let corners = self.tetrahedra[tet].vertices;
        let mut sum = 0.0;
        let mut numer = 0.0;
        for (volume, id) in volumes.iter().zip(corners) {
            sum += volume;
            numer += volume * self.vertices[id].distance;
        }
        numer / sum
    }
}

/// Signed volume of `(a, b, c, d)`, positive when `d` is on the side `(b - a) × (c - a)` points to.
#[inline]
pub fn signed_volume(
    a: &Point3<Real>,
    b: &Point3<Real>,
    c: &Point3<Real>,
    d: &Point3<Real>,
) -> Real {
    (b - a).cross(&(c - a)).dot(&(d - a)) / 6.0
}
