//! `IndexedMesh`, the surface handed to the octree builder

use crate::float_types::{Real, parry3d::bounding_volume::Aabb};
use nalgebra::{Point3, Vector3};

pub mod shapes;

/// A polygonal surface stored as shared positions plus per-facet index lists.
///
/// Facets may have any number of vertices here; the octree builder only
/// accepts triangles and reports the first facet that is not one.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct IndexedMesh {
    /// Shared vertex positions.
    pub vertices: Vec<Point3<Real>>,
    /// Facets as indices into `vertices`, counter-clockwise seen from outside.
    pub facets: Vec<Vec<usize>>,
}

impl IndexedMesh {
    pub const fn new() -> Self {
        Self {
            vertices: Vec::new(),
            facets: Vec::new(),
        }
    }

    /// Build a mesh from raw coordinates and arbitrary facets.
    pub fn polyhedron(points: &[[Real; 3]], facets: &[&[usize]]) -> Self {
        Self {
            vertices: points
                .iter()
                .map(|&[x, y, z]| Point3::new(x, y, z))
                .collect(),
            facets: facets.iter().map(|f| f.to_vec()).collect(),
        }
    }

    /// Build a triangle mesh.
    pub fn from_triangles(vertices: Vec<Point3<Real>>, triangles: &[[usize; 3]]) -> Self {
        Self {
            vertices,
            facets: triangles.iter().map(|t| t.to_vec()).collect(),
        }
    }

    /// `true` when every facet has exactly three vertices.
    pub fn is_triangulated(&self) -> bool {
        self.facets.iter().all(|f| f.len() == 3)
    }

    /// Fan-triangulate every facet around its first vertex.
    ///
    /// Only valid for convex facets; facets with fewer than three vertices are dropped.
    pub fn triangulate(&self) -> Self {
        let facets = self
            .facets
            .iter()
            .flat_map(|f| {
                (1..f.len().saturating_sub(1)).map(move |i| vec![f[0], f[i], f[i + 1]])
            })
            .collect();
        Self {
            vertices: self.vertices.clone(),
            facets,
        }
    }

    /// Return a copy moved by `offset`.
    pub fn translate(&self, offset: Vector3<Real>) -> Self {
        Self {
            vertices: self.vertices.iter().map(|p| p + offset).collect(),
            facets: self.facets.clone(),
        }
    }

    /// Axis-aligned bounds of all vertices, `None` for an empty mesh.
    pub fn bounding_box(&self) -> Option<Aabb> {
        let first = self.vertices.first()?;
        let (mins, maxs) = self
            .vertices
            .iter()
            .fold((*first, *first), |(lo, hi), p| (lo.inf(p), hi.sup(p)));
        Some(Aabb::new(mins, maxs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triangulate_splits_quads() {
        let quad = IndexedMesh::polyhedron(
            &[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]],
            &[&[0, 1, 2, 3]],
        );
        assert!(!quad.is_triangulated());

        let tris = quad.triangulate();
        assert!(tris.is_triangulated());
        assert_eq!(tris.facets, vec![vec![0, 1, 2], vec![0, 2, 3]]);
    }

    #[test]
    fn bounding_box_spans_vertices() {
        let mesh = IndexedMesh::polyhedron(&[[-1.0, 2.0, 0.5], [3.0, -4.0, 1.5]], &[]);
        let bbox = mesh.bounding_box().unwrap();
        assert_eq!(bbox.mins, Point3::new(-1.0, -4.0, 0.5));
        assert_eq!(bbox.maxs, Point3::new(3.0, 2.0, 1.5));
        assert!(IndexedMesh::new().bounding_box().is_none());
    }
}
