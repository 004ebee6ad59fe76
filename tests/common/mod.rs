//! Shared fixtures for integration tests
//!
//! Archives are written with `zip::ZipWriter`, textures with `image`, and
//! scenes are assembled with `SceneBuilder` or written as scene dumps.

#![allow(dead_code)]

use arch_asset_check::{Face, Mesh, UvLayer, Vertex};
use image::{Rgb, RgbImage, Rgba, RgbaImage};
use std::io::{Cursor, Write};
use std::path::Path;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Build an in-memory ZIP from `(name, bytes)` entries
pub fn zip_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    for (name, data) in entries {
        zip.start_file(*name, options).unwrap();
        zip.write_all(data).unwrap();
    }
    zip.finish().unwrap().into_inner()
}

/// Write a ZIP with the given entries to `path`
pub fn write_zip(path: &Path, entries: &[(&str, &[u8])]) {
    std::fs::write(path, zip_bytes(entries)).unwrap();
}

/// Encode a solid RGB PNG
pub fn rgb_png(size: u32) -> Vec<u8> {
    let mut bytes = Vec::new();
    RgbImage::from_pixel(size, size, Rgb([120, 90, 60]))
        .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .unwrap();
    bytes
}

/// Encode a solid RGBA PNG with the given alpha
pub fn rgba_png(size: u32, alpha: u8) -> Vec<u8> {
    let mut bytes = Vec::new();
    RgbaImage::from_pixel(size, size, Rgba([120, 90, 60, alpha]))
        .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .unwrap();
    bytes
}

/// A triangulated 4 x 4 x `height` box standing on the origin
pub fn box_mesh(height: f64) -> Mesh {
    let mut mesh = Mesh::new();
    for z in [0.0, height] {
        for (x, y) in [(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)] {
            mesh.vertices.push(Vertex::new(x, y, z));
        }
    }
    let quads = [
        [0, 3, 2, 1],
        [4, 5, 6, 7],
        [0, 1, 5, 4],
        [1, 2, 6, 5],
        [2, 3, 7, 6],
        [3, 0, 4, 7],
    ];
    for [a, b, c, d] in quads {
        mesh.faces.push(Face::triangle(a, b, c));
        mesh.faces.push(Face::triangle(a, c, d));
    }
    with_uvs(mesh)
}

/// A 4 x 4 ground plane at z = 0 with a skirt reaching `drop` below it
pub fn ground_mesh(drop: f64) -> Mesh {
    let mut mesh = Mesh::new();
    for (x, y) in [(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)] {
        mesh.vertices.push(Vertex::new(x, y, 0.0));
    }
    mesh.vertices.push(Vertex::new(2.0, 0.0, -drop));
    mesh.faces.push(Face::triangle(0, 1, 2));
    mesh.faces.push(Face::triangle(0, 2, 3));
    mesh.faces.push(Face::triangle(0, 4, 1));
    with_uvs(mesh)
}

fn with_uvs(mut mesh: Mesh) -> Mesh {
    mesh.uv_layer = Some(UvLayer {
        name: "UVMap".to_string(),
        coords: vec![[0.5, 0.5]; mesh.loop_count()],
    });
    mesh
}
