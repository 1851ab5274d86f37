//! Triangle cache: immutable per-facet geometry, adjacency and pseudo-normals
//!
//! Every distance query of the resolver reads from here. Edge `i` of a
//! triangle joins corner `i` to corner `(i + 1) % 3`.

use crate::config::VertexNormalWeighting;
use crate::errors::{SdfError, SdfResult};
use crate::float_types::Real;
use crate::mesh::IndexedMesh;
use hashbrown::HashMap;
use nalgebra::{Point3, Vector3};

mod distance;
mod intersect;

pub use distance::{ClosestFeature, PointTriangleDistance};

/// One facet of the input surface.
#[derive(Debug, Clone, PartialEq)]
pub struct Triangle {
    /// Corner positions in facet order.
    pub vertices: [Point3<Real>; 3],
    /// `v1 - v0`
    pub e0: Vector3<Real>,
    /// `v2 - v0`
    pub e1: Vector3<Real>,
    /// Unit normal, outward for counter-clockwise facets.
    pub normal: Vector3<Real>,
    /// Mesh vertex index of each corner.
    pub indices: [usize; 3],
    /// Triangle across each edge.
    pub neighbors: [usize; 3],
}

impl Triangle {
    /// Corner `0` plus `s·E0 + t·E1`.
    #[inline]
    pub fn point_at(&self, s: Real, t: Real) -> Point3<Real> {
        self.vertices[0] + self.e0 * s + self.e1 * t
    }
}

/// All triangles of a mesh together with the normals used for sign resolution.
#[derive(Debug, Clone, Default)]
pub struct TriangleCache {
    triangles: Vec<Triangle>,
    /// Pseudo-normal per mesh vertex; zero for vertices no facet uses.
    vertex_normals: Vec<Vector3<Real>>,
}

impl TriangleCache {
    /// Validate `mesh` as a closed triangle 2-manifold and precompute its geometry.
    pub fn from_mesh(mesh: &IndexedMesh, weighting: VertexNormalWeighting) -> SdfResult<Self> {
        if mesh.facets.is_empty() || mesh.vertices.is_empty() {
            return Err(SdfError::EmptyMesh);
        }

        let mut triangles = Vec::with_capacity(mesh.facets.len());
        for (facet, indices) in mesh.facets.iter().enumerate() {
            let indices: [usize; 3] =
                indices
                    .as_slice()
                    .try_into()
                    .map_err(|_| SdfError::NotATriangle {
                        facet,
                        vertices: indices.len(),
                    })?;
            if let Some(&index) = indices.iter().find(|&&i| i >= mesh.vertices.len()) {
                return Err(SdfError::IndexOutOfRange {
                    facet,
                    index,
                    len: mesh.vertices.len(),
                });
            }

            let vertices = indices.map(|i| mesh.vertices[i]);
            let e0 = vertices[1] - vertices[0];
            let e1 = vertices[2] - vertices[0];
            let normal = e0
                .cross(&e1)
                .try_normalize(Real::EPSILON * e0.norm() * e1.norm())
                .ok_or(SdfError::DegenerateFacet { facet })?;

            triangles.push(Triangle {
                vertices,
                e0,
                e1,
                normal,
                indices,
                neighbors: [usize::MAX; 3],
            });
        }

        link_neighbors(&mut triangles)?;
        let vertex_normals = vertex_normals(&triangles, mesh.vertices.len(), weighting);

        Ok(Self {
            triangles,
            vertex_normals,
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> &Triangle {
        &self.triangles[index]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Triangle> {
        self.triangles.iter()
    }

    /// Closest triangle among `candidates`; ties keep the earliest candidate.
    pub fn nearest(
        &self,
        point: &Point3<Real>,
        candidates: &[usize],
    ) -> Option<(usize, PointTriangleDistance)> {
        let mut best: Option<(usize, PointTriangleDistance)> = None;
        for &index in candidates {
            let hit = self.triangles[index].distance_to(point);
            if best.is_none_or(|(_, b)| hit.distance < b.distance) {
                best = Some((index, hit));
            }
        }
        best
    }

    /// Normal used to sign a distance whose closest point lies on `feature` of `triangle`.
    ///
    /// Faces use their own normal, edges the mean of both adjacent face normals
    /// and vertices the configured mean over incident faces.
    pub fn pseudo_normal(&self, triangle: usize, feature: ClosestFeature) -> SdfResult<Vector3<Real>> {
        let tri = &self.triangles[triangle];
        let unexpected = SdfError::UnexpectedFeature { triangle, feature };
        match feature {
            ClosestFeature::Face => Ok(tri.normal),
            ClosestFeature::Edge(i) => {
                let neighbor = tri.neighbors.get(i as usize).ok_or(unexpected)?;
                Ok((tri.normal + self.triangles[*neighbor].normal) / 2.0)
            },
            ClosestFeature::Vertex(i) => {
                let vertex = tri.indices.get(i as usize).ok_or(unexpected)?;
                Ok(self.vertex_normals[*vertex])
            },
        }
    }
}

/// Fill `neighbors` from an undirected edge map, failing on open or non-manifold edges.
fn link_neighbors(triangles: &mut [Triangle]) -> SdfResult<()> {
    let mut edge_faces: HashMap<(usize, usize), Vec<(usize, usize)>> =
        HashMap::with_capacity(triangles.len() * 3 / 2);
    for (t, tri) in triangles.iter().enumerate() {
        for e in 0..3 {
            edge_faces
                .entry(edge_key(tri, e))
                .or_default()
                .push((t, e));
        }
    }

    // walk triangles in order so the reported edge does not depend on hash order
    for t in 0..triangles.len() {
        for e in 0..3 {
            let key = edge_key(&triangles[t], e);
            let faces = &edge_faces[&key];
            match faces.len() {
                2 => {
                    let other = if faces[0].0 == t { faces[1].0 } else { faces[0].0 };
                    triangles[t].neighbors[e] = other;
                },
                1 => return Err(SdfError::OpenEdge { a: key.0, b: key.1 }),
                n => {
                    return Err(SdfError::NonManifoldEdge {
                        a: key.0,
                        b: key.1,
                        facets: n,
                    });
                },
            }
        }
    }
    Ok(())
}

#[inline]
fn edge_key(tri: &Triangle, edge: usize) -> (usize, usize) {
    let a = tri.indices[edge];
    let b = tri.indices[(edge + 1) % 3];
    (a.min(b), a.max(b))
}

fn vertex_normals(
    triangles: &[Triangle],
    vertex_count: usize,
    weighting: VertexNormalWeighting,
) -> Vec<Vector3<Real>> {
    let mut sums = vec![Vector3::zeros(); vertex_count];
    let mut weights: Vec<Real> = vec![0.0; vertex_count];

    for tri in triangles {
        for corner in 0..3 {
            let weight = match weighting {
                VertexNormalWeighting::Uniform => 1.0,
                VertexNormalWeighting::Angle => {
                    let p = tri.vertices[corner];
                    let a = tri.vertices[(corner + 1) % 3] - p;
                    let b = tri.vertices[(corner + 2) % 3] - p;
                    a.angle(&b)
                },
            };
            sums[tri.indices[corner]] += tri.normal * weight;
            weights[tri.indices[corner]] += weight;
        }
    }

    sums.into_iter()
        .zip(weights)
        .map(|(sum, w)| if w > 0.0 { sum / w } else { sum })
        .collect()
}
