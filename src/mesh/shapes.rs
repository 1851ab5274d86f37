//! Closed, outward-wound test and demo surfaces

use crate::float_types::{PI, Real, TAU};
use crate::mesh::IndexedMesh;
use nalgebra::Point3;

impl IndexedMesh {
    /// Axis-aligned box with one corner at the origin, two triangles per side.
    pub fn cuboid(width: Real, length: Real, height: Real) -> IndexedMesh {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),            // 0: origin
            Point3::new(width, 0.0, 0.0),          // 1: +X
            Point3::new(width, length, 0.0),       // 2: +X+Y
            Point3::new(0.0, length, 0.0),         // 3: +Y
            Point3::new(0.0, 0.0, height),         // 4: +Z
            Point3::new(width, 0.0, height),       // 5: +X+Z
            Point3::new(width, length, height),    // 6: +X+Y+Z
            Point3::new(0.0, length, height),      // 7: +Y+Z
        ];

        // quads, CCW from outside
        let sides: [[usize; 4]; 6] = [
            [0, 3, 2, 1], // bottom
            [4, 5, 6, 7], // top
            [0, 1, 5, 4], // front
            [3, 7, 6, 2], // back
            [0, 4, 7, 3], // left
            [1, 2, 6, 5], // right
        ];

        let triangles: Vec<[usize; 3]> = sides
            .iter()
            .flat_map(|&[a, b, c, d]| [[a, b, c], [a, c, d]])
            .collect();

        IndexedMesh::from_triangles(vertices, &triangles)
    }

    pub fn cube(width: Real) -> IndexedMesh {
        Self::cuboid(width, width, width)
    }

    /// UV sphere centred at the origin with single-vertex poles on the y axis.
    ///
    /// `segments` is clamped to at least 3 and `stacks` to at least 2.
    pub fn sphere(radius: Real, segments: usize, stacks: usize) -> IndexedMesh {
        let segments = segments.max(3);
        let stacks = stacks.max(2);
        let mut vertices = Vec::with_capacity(2 + segments * (stacks - 1));

        vertices.push(Point3::new(0.0, radius, 0.0));
        for j in 1..stacks {
            let phi = j as Real / stacks as Real * PI;
            let y = radius * phi.cos();
            let ring_radius = radius * phi.sin();
            for i in 0..segments {
                let theta = i as Real / segments as Real * TAU;
                vertices.push(Point3::new(
                    ring_radius * theta.cos(),
                    y,
                    ring_radius * theta.sin(),
                ));
            }
        }
        vertices.push(Point3::new(0.0, -radius, 0.0));

        let north_pole = 0;
        let south_pole = vertices.len() - 1;
        let ring = |j: usize, i: usize| 1 + (j - 1) * segments + i % segments;

        let mut triangles = Vec::with_capacity(2 * segments * (stacks - 1));
        for i in 0..segments {
            triangles.push([north_pole, ring(1, i + 1), ring(1, i)]);
        }
        for j in 1..stacks - 1 {
            for i in 0..segments {
                let (v1, v2) = (ring(j, i), ring(j, i + 1));
                let (v3, v4) = (ring(j + 1, i), ring(j + 1, i + 1));
                triangles.push([v1, v2, v3]);
                triangles.push([v2, v4, v3]);
            }
        }
        for i in 0..segments {
            triangles.push([south_pole, ring(stacks - 1, i), ring(stacks - 1, i + 1)]);
        }

        IndexedMesh::from_triangles(vertices, &triangles)
    }

    /// Regular octahedron centred at the origin with vertices at distance `radius`.
    pub fn octahedron(radius: Real) -> IndexedMesh {
        let pts = [
            [1.0, 0.0, 0.0],
            [-1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, -1.0, 0.0],
            [0.0, 0.0, 1.0],
            [0.0, 0.0, -1.0],
        ];
        let faces: [&[usize]; 8] = [
            &[0, 2, 4],
            &[2, 1, 4],
            &[1, 3, 4],
            &[3, 0, 4],
            &[5, 2, 0],
            &[5, 1, 2],
            &[5, 3, 1],
            &[5, 0, 3],
        ];
        let scaled: Vec<[Real; 3]> = pts
            .iter()
            .map(|&[x, y, z]| [x * radius, y * radius, z * radius])
            .collect();
        Self::polyhedron(&scaled, &faces)
    }
}
