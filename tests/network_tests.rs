mod support;

use hashbrown::HashMap;
use levelset_octree::{
    IndexedMesh, LevelsetOctree, OctreeConfig, VertexNormalWeighting,
    float_types::Real,
    network::{PointNetwork, VertexKind},
    triangle::ClosestFeature,
    octree::cell::octant_bits,
};

use crate::support::{
    brute_force_distance, build, build_with, exact_eps, field_eps, inside_convex, triangles,
};

fn network(octree: &LevelsetOctree) -> &PointNetwork {
    octree.network().expect("octree should be constructed")
}

fn domain_volume(octree: &LevelsetOctree) -> Real {
    let domain = octree.domain().expect("octree should be constructed");
    let extents = domain.maxs - domain.mins;
    extents.x * extents.y * extents.z
}

#[test]
fn report_matches_structure() {
    let octree = build(&IndexedMesh::cube(1.0), 3);
    let report = octree.report().unwrap();
    let network = network(&octree);

    assert_eq!(report.triangles, 12);
    assert_eq!(report.cells, octree.cells().len());
    assert_eq!(
        report.leaves,
        octree.cells().iter().filter(|c| c.is_leaf()).count()
    );
    assert_eq!(report.depth, 3);
    assert_eq!(report.vertices, network.len());
    assert_eq!(report.tetrahedra, network.tetrahedra().len());
    assert_eq!(
        report.corner_vertices,
        network
            .vertices()
            .iter()
            .filter(|v| v.kind == VertexKind::Corner)
            .count()
    );
    assert_eq!(report.ambiguous_signs, 0);
}

#[test]
fn cells_split_exactly_when_triangles_are_near() {
    let max_level = 3;
    let octree = build(&IndexedMesh::sphere(1.0, 12, 6), max_level);

    for cell in octree.cells() {
        let should_split = !cell.candidates.is_empty() && cell.level < max_level;
        assert_eq!(!cell.is_leaf(), should_split, "cell at level {}", cell.level);
        assert!(cell.level <= max_level);
    }
}

#[test]
fn children_candidates_are_a_subset_of_the_parent() {
    let octree = build(&IndexedMesh::cube(1.0), 3);
    let cells = octree.cells();

    for cell in cells {
        let Some(children) = cell.children else {
            continue;
        };
        for child in children {
            assert_eq!(cells[child].level, cell.level + 1);
            assert!(
                cells[child]
                    .candidates
                    .iter()
                    .all(|t| cell.candidates.contains(t))
            );
        }
    }
}

#[test]
fn sibling_cells_share_corner_vertices() {
    let octree = build(&IndexedMesh::cube(1.0), 3);
    let cells = octree.cells();
    let network = network(&octree);

    for cell in cells {
        let Some(children) = cell.children else {
            continue;
        };
        for axis in 0..3 {
            let bit = 1 << axis;
            for low in (0..8).filter(|o| o & bit == 0) {
                let (a, b) = (&cells[children[low]], &cells[children[low | bit]]);
                for corner in (0..8).filter(|j| j & bit != 0) {
                    let shared = a.corners[corner];
                    assert_eq!(shared, b.corners[corner & !bit]);
                    assert_eq!(network.vertex(shared).key, a.corner_key(corner));
                }
            }
        }
        // the parent's corners are its children's outer corners
        for (octant, &child) in children.iter().enumerate() {
            assert_eq!(cells[child].corners[octant], cell.corners[octant]);
        }
    }
}

#[test]
fn every_vertex_is_owned_and_resolved() {
    let octree = build(&IndexedMesh::sphere(1.0, 12, 6), 3);
    let cells = octree.cells();
    let network = network(&octree);

    for (id, vertex) in network.vertices().iter().enumerate() {
        let owner = vertex.owner.expect("every vertex has an owning leaf");
        assert!(cells[owner].is_leaf());
        assert!(network.distance(id).is_some());
        assert!(vertex.distance.is_finite());
        assert_eq!(network.find(vertex.key), Some(id));
    }
}

#[test]
fn resolved_distances_match_brute_force() {
    for mesh in [IndexedMesh::cube(1.0), IndexedMesh::sphere(1.0, 12, 6)] {
        let octree = build(&mesh, 3);
        let triangles = triangles(&mesh);
        let network = network(&octree);

        for vertex in network.vertices() {
            let expected = brute_force_distance(&triangles, &vertex.position);
            assert!(
                (vertex.distance.abs() - expected).abs() < exact_eps(),
                "vertex {:?}: stored {} expected {}",
                vertex.key,
                vertex.distance,
                expected
            );
            if expected > field_eps() {
                assert_eq!(
                    vertex.distance < 0.0,
                    inside_convex(&triangles, &vertex.position),
                    "wrong sign at {:?}",
                    vertex.position
                );
            }
        }
    }
}

#[test]
fn angle_weighted_vertex_normals_sign_correctly() {
    let mesh = IndexedMesh::octahedron(1.0);
    let config = OctreeConfig::default()
        .with_max_level(3)
        .with_vertex_normals(VertexNormalWeighting::Angle);
    let octree = build_with(&mesh, &config);
    let triangles = triangles(&mesh);

    for vertex in network(&octree).vertices() {
        if vertex.distance.abs() > field_eps() {
            assert_eq!(
                vertex.distance < 0.0,
                inside_convex(&triangles, &vertex.position)
            );
        }
    }
}

#[test]
fn double_sided_sheet_ties_edge_and_vertex_signs_outside() {
    // two coincident triangles with opposite winding: closed and manifold, but
    // every edge and vertex pseudo-normal cancels to zero
    let sheet = IndexedMesh::polyhedron(
        &[[0.0, 0.0, 0.0], [1.0, 0.2, 0.5], [0.3, 1.0, 0.8]],
        &[&[0, 1, 2], &[0, 2, 1]],
    );
    let octree = build(&sheet, 3);
    let report = octree.report().unwrap();
    let network = network(&octree);

    let mut flagged = 0;
    for vertex in network.vertices() {
        let resolution = vertex.resolution.expect("every vertex is resolved");
        if resolution.ambiguous {
            flagged += 1;
            assert!(vertex.distance > 0.0);
            assert_ne!(resolution.feature, ClosestFeature::Face);
        } else if vertex.distance != 0.0 {
            assert_eq!(resolution.feature, ClosestFeature::Face);
        }
    }

    assert!(report.ambiguous_signs > 0);
    assert_eq!(flagged, report.ambiguous_signs);
}

#[test]
fn tetrahedra_tile_the_domain() {
    let octree = build(&IndexedMesh::sphere(1.0, 12, 6), 3);
    let network = network(&octree);

    assert!(network.tetrahedra().iter().all(|t| t.volume > 0.0));
    let total: Real = network.tetrahedra().iter().map(|t| t.volume).sum();
    let expected = domain_volume(&octree);
    assert!(((total - expected) / expected).abs() < field_eps());

    for cell in octree.cells().iter().filter(|c| c.is_leaf()) {
        let extents = cell.bbox.maxs - cell.bbox.mins;
        let cell_volume = extents.x * extents.y * extents.z;
        let filled: Real = network.tetrahedra()[cell.tetrahedra.clone()]
            .iter()
            .map(|t| t.volume)
            .sum();
        assert!(((filled - cell_volume) / cell_volume).abs() < field_eps());
    }
}

#[test]
fn interior_faces_are_shared_by_two_tetrahedra() {
    let octree = build(&IndexedMesh::cube(1.0), 3);
    let network = network(&octree);
    let edge = network.resolution();

    let mut faces: HashMap<[usize; 3], usize> = HashMap::new();
    for tet in network.tetrahedra() {
        let v = tet.vertices;
        for skip in 0..4 {
            let mut face: Vec<usize> = (0..4).filter(|&i| i != skip).map(|i| v[i]).collect();
            face.sort_unstable();
            *faces.entry([face[0], face[1], face[2]]).or_default() += 1;
        }
    }

    for (face, count) in faces {
        let keys = face.map(|id| network.vertex(id).key);
        let on_domain_boundary = (0..3).any(|axis| {
            keys.iter().all(|k| k[axis] == 0) || keys.iter().all(|k| k[axis] == edge)
        });
        let expected = if on_domain_boundary { 1 } else { 2 };
        assert_eq!(count, expected, "face {keys:?}");
    }
}

#[test]
fn steiner_points_are_never_cell_corners() {
    let octree = build(&IndexedMesh::sphere(1.0, 12, 6), 4);
    let network = network(&octree);

    for cell in octree.cells() {
        for corner in cell.corners {
            assert_eq!(network.vertex(corner).kind, VertexKind::Corner);
        }
    }
    let centres = network
        .vertices()
        .iter()
        .filter(|v| v.kind == VertexKind::CellCentre)
        .count();
    assert_eq!(centres, octree.report().unwrap().leaves);
}

#[test]
fn corner_keys_follow_octant_bits() {
    let octree = build(&IndexedMesh::cube(1.0), 2);
    let root = &octree.cells()[0];
    let edge = network(&octree).resolution();

    for i in 0..8 {
        let bits = octant_bits(i);
        assert_eq!(root.corner_key(i), bits.map(|b| b * edge));
    }
}
