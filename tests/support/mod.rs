//! Test support library
//! Provides various helper functions & utilities for tests.
#![allow(dead_code)]

use levelset_octree::{
    IndexedMesh, LevelsetOctree, OctreeConfig, VertexNormalWeighting,
    float_types::{Real, tolerance},
    triangle::TriangleCache,
};
use nalgebra::Point3;

/// Quick helper to compare floating-point results with an acceptable tolerance.
pub fn approx_eq(a: Real, b: Real, eps: Real) -> bool {
    (a - b).abs() < eps
}

/// Slack for values interpolated from the field.
pub fn field_eps() -> Real {
    10.0 * tolerance()
}

/// Slack for quantities computed directly in `Real`.
pub fn exact_eps() -> Real {
    1e4 * Real::EPSILON
}

/// Construct `mesh` at `max_level`, panicking on failure.
pub fn build(mesh: &IndexedMesh, max_level: u32) -> LevelsetOctree {
    let mut octree = LevelsetOctree::new();
    octree
        .construct(mesh, max_level)
        .expect("construction should succeed");
    octree
}

pub fn build_with(mesh: &IndexedMesh, config: &OctreeConfig) -> LevelsetOctree {
    let mut octree = LevelsetOctree::new();
    octree
        .construct_with(mesh, config)
        .expect("construction should succeed");
    octree
}

pub fn triangles(mesh: &IndexedMesh) -> TriangleCache {
    TriangleCache::from_mesh(mesh, VertexNormalWeighting::Uniform)
        .expect("mesh should be a closed manifold")
}

/// Unsigned distance to the surface by checking every triangle.
pub fn brute_force_distance(triangles: &TriangleCache, p: &Point3<Real>) -> Real {
    triangles
        .iter()
        .map(|t| t.distance_to(p).distance)
        .fold(Real::MAX, Real::min)
}

/// Strictly inside a convex, outward-wound surface.
pub fn inside_convex(triangles: &TriangleCache, p: &Point3<Real>) -> bool {
    triangles
        .iter()
        .all(|t| t.normal.dot(&(p - t.vertices[0])) < 0.0)
}

/// Small deterministic generator so sampled tests are reproducible.
pub struct Lcg(u64);

impl Lcg {
    pub const fn new(seed: u64) -> Self {
        Self(seed)
    }

    /// Uniform in `[0, 1)`.
    pub fn next_unit(&mut self) -> Real {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (self.0 >> 11) as Real / (1u64 << 53) as Real
    }

    pub fn next_in(&mut self, lo: Real, hi: Real) -> Real {
        lo + (hi - lo) * self.next_unit()
    }

    pub fn point_in(&mut self, lo: Real, hi: Real) -> Point3<Real> {
        Point3::new(self.next_in(lo, hi), self.next_in(lo, hi), self.next_in(lo, hi))
    }
}
