//! Polygon mesh operations using nalgebra
//!
//! This module provides the geometric helpers the geometry checks build on:
//! - Face area and largest-face lookup
//! - Edge derivation from faces and loose edges
//! - Floating vertex and degenerate edge detection
//! - Vertex merging by distance (the only operation that mutates a mesh)

use crate::scene::{Edge, Face, Mesh, Vertex};
use nalgebra::{Point3, Vector3};
use std::collections::{BTreeSet, HashMap};

fn point(v: &Vertex) -> Point3<f64> {
    Point3::new(v.x, v.y, v.z)
}

/// Compute the area of a polygon using Newell's method
///
/// Works for triangles and for planar n-gons. Faces referencing vertices
/// outside the mesh have zero area.
///
/// # Arguments
/// * `mesh` - The mesh the face belongs to
/// * `face` - The face to measure
pub fn face_area(mesh: &Mesh, face: &Face) -> f64 {
    let corners: Option<Vec<Point3<f64>>> = face
        .vertices
        .iter()
        .map(|&i| mesh.vertices.get(i).map(point))
        .collect();
    let Some(corners) = corners else {
        return 0.0;
    };
    if corners.len() < 3 {
        return 0.0;
    }

    let mut normal = Vector3::zeros();
    for (i, current) in corners.iter().enumerate() {
        let next = &corners[(i + 1) % corners.len()];
        normal += current.coords.cross(&next.coords);
    }
    normal.norm() * 0.5
}

/// Find the face with the largest area
///
/// When several faces share the maximum area the first one wins.
pub fn largest_face(mesh: &Mesh) -> Option<&Face> {
    let mut best: Option<(&Face, f64)> = None;
    for face in &mesh.faces {
        let area = face_area(mesh, face);
        match best {
            Some((_, best_area)) if area <= best_area => {}
            _ => best = Some((face, area)),
        }
    }
    best.map(|(face, _)| face)
}

/// Lowest Z coordinate among all vertices
pub fn min_z(mesh: &Mesh) -> Option<f64> {
    mesh.vertices.iter().map(|v| v.z).reduce(f64::min)
}

/// Highest Z coordinate among the corners of a face
pub fn face_max_z(mesh: &Mesh, face: &Face) -> Option<f64> {
    face.vertices
        .iter()
        .filter_map(|&i| mesh.vertices.get(i))
        .map(|v| v.z)
        .reduce(f64::max)
}

/// All unique edges of a mesh: face boundaries plus loose edges, sorted
pub fn mesh_edges(mesh: &Mesh) -> BTreeSet<Edge> {
    let mut edges: BTreeSet<Edge> = mesh.loose_edges.iter().copied().collect();
    for face in &mesh.faces {
        let n = face.vertices.len();
        if n < 2 {
            continue;
        }
        for i in 0..n {
            edges.insert(Edge::new(face.vertices[i], face.vertices[(i + 1) % n]));
        }
    }
    edges
}

/// Indices of vertices that no edge touches
pub fn floating_vertices(mesh: &Mesh) -> Vec<usize> {
    let mut linked = vec![false; mesh.vertices.len()];
    for edge in mesh_edges(mesh) {
        for i in [edge.0, edge.1] {
            if let Some(flag) = linked.get_mut(i) {
                *flag = true;
            }
        }
    }
    linked
        .iter()
        .enumerate()
        .filter(|(_, linked)| !**linked)
        .map(|(i, _)| i)
        .collect()
}

/// Edges whose two endpoints sit at exactly the same position
pub fn degenerate_edges(mesh: &Mesh) -> Vec<Edge> {
    mesh_edges(mesh)
        .into_iter()
        .filter(|e| match (mesh.vertices.get(e.0), mesh.vertices.get(e.1)) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        })
        .collect()
}

type Cell = (i64, i64, i64);

fn cell_of(p: &Point3<f64>, size: f64) -> Cell {
    (
        (p.x / size).floor() as i64,
        (p.y / size).floor() as i64,
        (p.z / size).floor() as i64,
    )
}

/// Merge vertices closer than `distance` to an earlier kept vertex
///
/// Vertices are visited in index order; each one either becomes a kept
/// vertex or is welded onto the first kept vertex within `distance`. Kept
/// vertices are therefore pairwise farther apart than `distance`, which makes
/// the operation idempotent. Faces, loose edges and UV loops are remapped;
/// corners that collapse onto their neighbour are dropped together with
/// their UV coordinate, and faces left with fewer than three corners are
/// removed.
///
/// # Returns
/// The number of vertices removed
pub fn merge_by_distance(mesh: &mut Mesh, distance: f64) -> usize {
    if mesh.vertices.is_empty() || distance.is_nan() || distance <= 0.0 {
        return 0;
    }

    let points: Vec<Point3<f64>> = mesh.vertices.iter().map(point).collect();
    let mut grid: HashMap<Cell, Vec<usize>> = HashMap::new();
    let mut remap = vec![0usize; points.len()];
    let mut kept: Vec<Vertex> = Vec::with_capacity(points.len());

    for (i, p) in points.iter().enumerate() {
        let (cx, cy, cz) = cell_of(p, distance);
        let mut target = None;
        'search: for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    let Some(candidates) = grid.get(&(cx + dx, cy + dy, cz + dz)) else {
                        continue;
                    };
                    for &k in candidates {
                        if nalgebra::distance(&point(&kept[k]), p) <= distance {
                            target = Some(k);
                            break 'search;
                        }
                    }
                }
            }
        }
        remap[i] = match target {
            Some(k) => k,
            None => {
                kept.push(mesh.vertices[i]);
                let k = kept.len() - 1;
                grid.entry((cx, cy, cz)).or_default().push(k);
                k
            }
        };
    }

    let removed = mesh.vertices.len() - kept.len();
    if removed == 0 {
        return 0;
    }

    let old_uvs = mesh.uv_layer.as_ref().map(|layer| layer.coords.as_slice());
    let mut new_faces = Vec::with_capacity(mesh.faces.len());
    let mut new_uvs = Vec::new();
    let mut loop_start = 0;
    for face in &mesh.faces {
        let corners: Vec<(usize, usize)> = face
            .vertices
            .iter()
            .enumerate()
            .map(|(corner, &v)| (remap.get(v).copied().unwrap_or(v), loop_start + corner))
            .collect();
        loop_start += face.vertices.len();

        let n = corners.len();
        let survivors: Vec<(usize, usize)> = corners
            .iter()
            .enumerate()
            .filter(|(i, (v, _))| n < 2 || corners[(i + 1) % n].0 != *v)
            .map(|(_, c)| *c)
            .collect();
        if survivors.len() < 3 {
            continue;
        }
        if let Some(uvs) = old_uvs {
            new_uvs.extend(survivors.iter().filter_map(|(_, l)| uvs.get(*l).copied()));
        }
        new_faces.push(Face::new(survivors.into_iter().map(|(v, _)| v).collect()));
    }

    let mut seen = BTreeSet::new();
    let loose_edges = mesh
        .loose_edges
        .iter()
        .map(|e| Edge::new(remap[e.0], remap[e.1]))
        .filter(|e| e.0 != e.1 && seen.insert(*e))
        .collect();

    mesh.vertices = kept;
    mesh.faces = new_faces;
    mesh.loose_edges = loose_edges;
    if let Some(layer) = mesh.uv_layer.as_mut() {
        layer.coords = new_uvs;
    }
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::UvLayer;

    fn quad() -> Mesh {
        let mut mesh = Mesh::new();
        mesh.vertices.push(Vertex::new(0.0, 0.0, 0.0));
        mesh.vertices.push(Vertex::new(2.0, 0.0, 0.0));
        mesh.vertices.push(Vertex::new(2.0, 3.0, 0.0));
        mesh.vertices.push(Vertex::new(0.0, 3.0, 0.0));
        mesh.faces.push(Face::new(vec![0, 1, 2, 3]));
        mesh
    }

    #[test]
    fn test_face_area_quad_and_triangle() {
        let mesh = quad();
        assert!((face_area(&mesh, &mesh.faces[0]) - 6.0).abs() < 1e-12);
        let tri = Face::triangle(0, 1, 2);
        assert!((face_area(&mesh, &tri) - 3.0).abs() < 1e-12);
        assert_eq!(face_area(&mesh, &Face::triangle(0, 1, 99)), 0.0);
    }

    #[test]
    fn test_largest_face_first_wins() {
        let mut mesh = Mesh::new();
        for (x, y, z) in [(0.0, 0.0, 0.0), (1.0, 0.0, 0.0), (0.0, 1.0, 0.0)] {
            mesh.vertices.push(Vertex::new(x, y, z));
        }
        for (x, y, z) in [(0.0, 0.0, 5.0), (1.0, 0.0, 5.0), (0.0, 1.0, 5.0)] {
            mesh.vertices.push(Vertex::new(x, y, z));
        }
        mesh.faces.push(Face::triangle(0, 1, 2));
        mesh.faces.push(Face::triangle(3, 4, 5));
        let face = largest_face(&mesh).unwrap();
        assert_eq!(face.vertices, vec![0, 1, 2]);
        assert_eq!(face_max_z(&mesh, face), Some(0.0));
        assert_eq!(min_z(&mesh), Some(0.0));
        assert!(largest_face(&Mesh::new()).is_none());
    }

    #[test]
    fn test_floating_and_degenerate() {
        let mut mesh = quad();
        mesh.vertices.push(Vertex::new(9.0, 9.0, 9.0));
        mesh.vertices.push(Vertex::new(5.0, 5.0, 5.0));
        mesh.vertices.push(Vertex::new(5.0, 5.0, 5.0));
        mesh.loose_edges.push(Edge::new(5, 6));

        assert_eq!(floating_vertices(&mesh), vec![4]);
        assert_eq!(degenerate_edges(&mesh), vec![Edge(5, 6)]);
        assert_eq!(mesh_edges(&mesh).len(), 5);
    }

    #[test]
    fn test_merge_by_distance_collapses_face() {
        let mut mesh = Mesh::new();
        mesh.vertices.push(Vertex::new(0.0, 0.0, 0.0));
        mesh.vertices.push(Vertex::new(1.0, 0.0, 0.0));
        mesh.vertices.push(Vertex::new(1.01, 0.0, 0.0));
        mesh.vertices.push(Vertex::new(0.0, 1.0, 0.0));
        mesh.faces.push(Face::new(vec![0, 1, 2, 3]));
        mesh.faces.push(Face::triangle(1, 2, 3));
        mesh.uv_layer = Some(UvLayer {
            name: "UVMap".into(),
            coords: vec![
                [0.1, 0.1],
                [0.2, 0.2],
                [0.3, 0.3],
                [0.4, 0.4],
                [0.5, 0.5],
                [0.6, 0.6],
                [0.7, 0.7],
            ],
        });

        let removed = merge_by_distance(&mut mesh, 0.025);
        assert_eq!(removed, 1);
        assert_eq!(mesh.vertices.len(), 3);
        assert_eq!(mesh.faces, vec![Face::triangle(0, 1, 2)]);
        assert_eq!(
            mesh.uv_layer.unwrap().coords,
            vec![[0.1, 0.1], [0.3, 0.3], [0.4, 0.4]]
        );
    }

    #[test]
    fn test_merge_by_distance_idempotent() {
        let mut mesh = quad();
        mesh.vertices.push(Vertex::new(0.01, 0.0, 0.0));
        mesh.vertices.push(Vertex::new(0.03, 0.0, 0.0));
        mesh.loose_edges.push(Edge::new(4, 5));

        let first = merge_by_distance(&mut mesh, 0.025);
        assert_eq!(first, 1);
        let snapshot = mesh.clone();
        assert_eq!(merge_by_distance(&mut mesh, 0.025), 0);
        assert_eq!(mesh, snapshot);
    }

    #[test]
    fn test_merge_without_duplicates_is_noop() {
        let mut mesh = quad();
        let before = mesh.clone();
        assert_eq!(merge_by_distance(&mut mesh, 0.025), 0);
        assert_eq!(mesh, before);
    }
}
