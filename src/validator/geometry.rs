//! Geometry checks

use crate::config::CheckConfig;
use crate::finding::{Finding, Status};
use crate::mesh_ops;
use crate::scene::{ObjectKind, Scene, Vertex};
use tracing::info;

fn fmt_vertex(v: &Vertex) -> String {
    format!("({:.4}, {:.4}, {:.4})", v.x, v.y, v.z)
}

/// Only MESH and EMPTY objects are allowed; meshes must be standalone and
/// unanimated
pub fn check_scene_contents(scene: &Scene) -> Finding {
    let mut issues = Vec::new();
    for object in &scene.objects {
        match object.kind {
            ObjectKind::Empty => {}
            ObjectKind::Mesh => {
                if object.parent.is_some() || !object.children.is_empty() {
                    issues.push(format!("{} (has parent or children)", object.name));
                }
                if object.has_animation_data {
                    issues.push(format!("{} (has animation data)", object.name));
                }
            }
            ref other => issues.push(format!("{} (type: {})", object.name, other.name())),
        }
    }

    let present = |kind: ObjectKind| scene.objects.iter().any(|o| o.kind == kind);
    for (kind, label) in [
        (ObjectKind::Armature, "Armatures found"),
        (ObjectKind::Camera, "Cameras found"),
        (ObjectKind::Light, "Lights found"),
        (ObjectKind::Sound, "Sounds found"),
    ] {
        if present(kind) {
            issues.push(label.to_string());
        }
    }

    Finding::from_issues(issues, "No invalid objects found")
}

/// Ground geometry must drop at least `min_ground_drop` below the top of its
/// largest face
pub fn check_ground_drop(scene: &Scene, config: &CheckConfig) -> Finding {
    let grounds: Vec<_> = scene
        .mesh_objects()
        .filter(|(o, _)| o.name.contains("Ground"))
        .collect();
    if grounds.is_empty() {
        return Finding::passed("No Ground objects found");
    }

    let mut issues = Vec::new();
    for (object, mesh) in grounds {
        let Some(face) = mesh_ops::largest_face(mesh) else {
            issues.push(format!("{}: No faces found", object.name));
            continue;
        };
        let (Some(top), Some(bottom)) = (mesh_ops::face_max_z(mesh, face), mesh_ops::min_z(mesh))
        else {
            issues.push(format!("{}: No faces found", object.name));
            continue;
        };
        let drop = top - bottom;
        if drop < config.min_ground_drop {
            issues.push(format!(
                "{}: Ground drop {:.3}m is less than {}m",
                object.name, drop, config.min_ground_drop
            ));
        }
    }

    Finding::from_issues(issues, "Ground drop check passed")
}

/// Detect floating vertices and degenerate edges
///
/// Pure detection: running it twice on the same scene yields the same
/// finding. Merging nearby vertices is done separately by [`repair_scene`].
pub fn check_geometry_cleanliness(scene: &Scene) -> Finding {
    let mut issues = Vec::new();
    for (object, mesh) in scene.mesh_objects() {
        for index in mesh_ops::floating_vertices(mesh) {
            issues.push(format!(
                "{}: Floating vertex at {}",
                object.name,
                fmt_vertex(&mesh.vertices[index])
            ));
        }
        for edge in mesh_ops::degenerate_edges(mesh) {
            issues.push(format!(
                "{}: Degenerate edge at {}",
                object.name,
                fmt_vertex(&mesh.vertices[edge.0])
            ));
        }
    }
    Finding::from_issues(issues, "No geometry issues found")
}

/// Merge vertices closer than the configured distance in every mesh
///
/// Returns the total number of vertices removed. Does nothing when
/// `merge_distance` is unset.
pub fn repair_scene(scene: &mut Scene, config: &CheckConfig) -> usize {
    let Some(distance) = config.merge_distance else {
        return 0;
    };
    let mut removed = 0;
    for object in scene.objects.iter_mut().filter(|o| o.is_mesh()) {
        if let Some(mesh) = object.mesh.as_mut() {
            let merged = mesh_ops::merge_by_distance(mesh, distance);
            if merged > 0 {
                info!("{}: merged {} vertices", object.name, merged);
            }
            removed += merged;
        }
    }
    removed
}

/// Every face must be a triangle
///
/// Reports one message per offending object, in scene order.
pub fn check_triangulation(scene: &Scene) -> Finding {
    let mut issues = Vec::new();
    for (object, mesh) in scene.mesh_objects() {
        let mut offending = mesh
            .faces
            .iter()
            .enumerate()
            .filter(|(_, f)| !f.is_triangle());
        let Some((first, face)) = offending.next() else {
            continue;
        };
        let count = 1 + offending.count();
        issues.push(format!(
            "{}: {} non-triangulated polygon(s), first at face {} (vertices: {})",
            object.name,
            count,
            first,
            face.vertices.len()
        ));
    }
    Finding::from_issues(issues, "All geometry is triangulated")
}

/// Whether a rotation angle counts as reset
///
/// Zero is reset. A negative angle is also accepted when it is an exact
/// multiple `n` (1..=max) of the exporter rotation bias, within tolerance.
pub fn rotation_is_reset(angle: f64, config: &CheckConfig) -> bool {
    if angle == 0.0 {
        return true;
    }
    if angle.is_nan() || angle > 0.0 {
        return false;
    }
    let bias = config.rotation_bias;
    let multiplier = angle / bias;
    let n = multiplier.round();
    n >= 1.0
        && n <= f64::from(config.max_rotation_bias_count)
        && (multiplier - n).abs() * bias.abs() < config.rotation_bias_tolerance
}

/// Rotation and scale must be reset on every mesh object
pub fn check_transforms(scene: &Scene, config: &CheckConfig) -> Finding {
    let mut issues = Vec::new();
    for (object, _) in scene.mesh_objects() {
        let transform = &object.transform;
        for (axis, angle) in ["X", "Y", "Z"].iter().zip(transform.rotation_euler) {
            if !rotation_is_reset(angle, config) {
                issues.push(format!(
                    "{}: Rotation not reset (Euler {}: {})",
                    object.name, axis, angle
                ));
            }
        }
        if transform
            .scale
            .iter()
            .any(|s| (s - 1.0).abs() > config.transform_tolerance)
        {
            let [x, y, z] = transform.scale;
            issues.push(format!(
                "{}: Scale not reset ({}, {}, {})",
                object.name, x, y, z
            ));
        }
    }
    Finding::from_issues(issues, "All transforms are reset")
}

/// Every mesh needs a UV layer whose coordinates stay inside the unit tile
/// and away from its edges by the texture padding
///
/// Violations are reported per object.
pub fn check_uv_maps(scene: &Scene, config: &CheckConfig) -> Finding {
    let mut issues = Vec::new();
    for (object, mesh) in scene.mesh_objects() {
        let Some(layer) = &mesh.uv_layer else {
            issues.push(format!("{}: No UV map", object.name));
            continue;
        };

        let padding = config.uv_padding_for(&object.name);
        let mut outside_udim = false;
        let mut in_padding = false;
        for &[u, v] in &layer.coords {
            if !(0.0..=1.0).contains(&u) || !(0.0..=1.0).contains(&v) {
                outside_udim = true;
            }
            if u < padding || u > 1.0 - padding || v < padding || v > 1.0 - padding {
                in_padding = true;
            }
            if outside_udim && in_padding {
                break;
            }
        }

        let violations: Vec<&str> = [
            (outside_udim, "UV outside UDIM bounds"),
            (in_padding, "UV padding violation"),
        ]
        .iter()
        .filter(|(hit, _)| *hit)
        .map(|(_, label)| *label)
        .collect();
        if !violations.is_empty() {
            issues.push(format!("{}: {}", object.name, violations.join(", ")));
        }
    }
    Finding::from_issues(issues, "All UV maps are valid")
}

/// Triangle totals per category must stay within budget
///
/// Objects are bucketed by name: anything containing "Main" is OKS,
/// otherwise "Ground" or "Flora" puts it in the Ground class. Remaining
/// triangles are reported as Other and never fail the check.
pub fn check_polygon_budget(scene: &Scene, config: &CheckConfig) -> Finding {
    let (mut oks, mut ground, mut other) = (0usize, 0usize, 0usize);
    for (object, mesh) in scene.mesh_objects() {
        let triangles = mesh.triangle_count();
        if object.name.contains("Main") {
            oks += triangles;
        } else if object.name.contains("Ground") || object.name.contains("Flora") {
            ground += triangles;
        } else {
            other += triangles;
        }
    }

    let mut messages = vec![
        format!("OKS polygon count: {}/{}", oks, config.poly_limit_oks),
        format!("Ground polygon count: {}/{}", ground, config.poly_limit_ground),
    ];
    if other > 0 {
        messages.push(format!("Other polygon count: {}", other));
    }
    Finding {
        status: Status::from_ok(oks <= config.poly_limit_oks && ground <= config.poly_limit_ground),
        messages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{Face, Mesh, SceneBuilder, SceneObject, UvLayer};

    fn triangle(z: f64) -> Mesh {
        let mut mesh = Mesh::new();
        mesh.vertices.push(Vertex::new(0.0, 0.0, z));
        mesh.vertices.push(Vertex::new(1.0, 0.0, z));
        mesh.vertices.push(Vertex::new(0.0, 1.0, z));
        mesh.faces.push(Face::triangle(0, 1, 2));
        mesh.uv_layer = Some(UvLayer {
            name: "UVMap".into(),
            coords: vec![[0.1, 0.1], [0.9, 0.1], [0.1, 0.9]],
        });
        mesh
    }

    fn scene_with(objects: Vec<SceneObject>) -> Scene {
        objects
            .into_iter()
            .fold(SceneBuilder::new(), |b, o| b.object(o))
            .build()
            .unwrap()
    }

    #[test]
    fn test_scene_contents() {
        let mut animated = SceneObject::mesh("SM_a_1_Main", triangle(0.0));
        animated.has_animation_data = true;
        let scene = scene_with(vec![
            animated,
            SceneObject::new("Empty", ObjectKind::Empty),
            SceneObject::new("Camera", ObjectKind::Camera),
        ]);
        let finding = check_scene_contents(&scene);
        assert_eq!(finding.status, Status::Failed);
        assert_eq!(
            finding.messages,
            vec![
                "SM_a_1_Main (has animation data)",
                "Camera (type: CAMERA)",
                "Cameras found"
            ]
        );

        let clean = scene_with(vec![SceneObject::mesh("SM_a_Ground", triangle(0.0))]);
        assert_eq!(
            check_scene_contents(&clean).messages,
            vec!["No invalid objects found"]
        );
    }

    #[test]
    fn test_ground_drop() {
        let config = CheckConfig::default();
        assert_eq!(
            check_ground_drop(&scene_with(Vec::new()), &config).messages,
            vec!["No Ground objects found"]
        );

        let mut deep = triangle(0.0);
        deep.vertices.push(Vertex::new(0.0, 0.0, -1.5));
        deep.faces.push(Face::triangle(0, 1, 3));
        let mut shallow = triangle(0.0);
        shallow.vertices.push(Vertex::new(0.0, 0.0, -0.5));
        let scene = scene_with(vec![
            SceneObject::mesh("SM_a_Ground", deep),
            SceneObject::mesh("SM_b_Ground", shallow),
            SceneObject::mesh("SM_c_GroundEl", Mesh::new()),
        ]);
        let finding = check_ground_drop(&scene, &config);
        assert_eq!(finding.status, Status::Failed);
        assert_eq!(
            finding.messages,
            vec![
                "SM_b_Ground: Ground drop 0.500m is less than 1m",
                "SM_c_GroundEl: No faces found"
            ]
        );
    }

    #[test]
    fn test_cleanliness_detection_is_pure() {
        let mut mesh = triangle(0.0);
        mesh.vertices.push(Vertex::new(5.0, 5.0, 5.0));
        let scene = scene_with(vec![SceneObject::mesh("SM_a_Ground", mesh)]);
        let first = check_geometry_cleanliness(&scene);
        let second = check_geometry_cleanliness(&scene);
        assert_eq!(first, second);
        assert_eq!(
            first.messages,
            vec!["SM_a_Ground: Floating vertex at (5.0000, 5.0000, 5.0000)"]
        );
    }

    #[test]
    fn test_repair_scene_respects_config() {
        let mut mesh = triangle(0.0);
        mesh.vertices.push(Vertex::new(0.0, 0.0, 0.001));
        let mut scene = scene_with(vec![SceneObject::mesh("SM_a_Ground", mesh)]);

        let disabled = CheckConfig::default().with_merge_distance(None);
        assert_eq!(repair_scene(&mut scene, &disabled), 0);
        assert_eq!(repair_scene(&mut scene, &CheckConfig::default()), 1);
        assert_eq!(scene.objects[0].mesh.as_ref().unwrap().vertices.len(), 3);
    }

    #[test]
    fn test_triangulation() {
        let mut quad = triangle(0.0);
        quad.vertices.push(Vertex::new(1.0, 1.0, 0.0));
        quad.faces.push(Face::new(vec![1, 3, 2, 0]));
        quad.uv_layer = None;
        let scene = scene_with(vec![
            SceneObject::mesh("SM_a_Ground", triangle(0.0)),
            SceneObject::mesh("SM_a_1_Main", quad),
        ]);
        let finding = check_triangulation(&scene);
        assert_eq!(finding.status, Status::Failed);
        assert_eq!(
            finding.messages,
            vec!["SM_a_1_Main: 1 non-triangulated polygon(s), first at face 1 (vertices: 4)"]
        );
    }

    #[test]
    fn test_rotation_bias_rule() {
        let config = CheckConfig::default();
        assert!(rotation_is_reset(0.0, &config));
        assert!(rotation_is_reset(-0.000008, &config));
        assert!(rotation_is_reset(-0.000016, &config));
        assert!(rotation_is_reset(-0.00004, &config));
        assert!(!rotation_is_reset(-0.000048, &config));
        assert!(!rotation_is_reset(-0.00005, &config));
        assert!(!rotation_is_reset(0.000008, &config));
        assert!(!rotation_is_reset(-0.0000001, &config));
        assert!(!rotation_is_reset(f64::NAN, &config));
    }

    #[test]
    fn test_transforms() {
        let config = CheckConfig::default();
        let mut biased = SceneObject::mesh("SM_a_1_Main", triangle(0.0));
        biased.transform.rotation_euler = [-0.000016, 0.0, 0.0];
        assert_eq!(
            check_transforms(&scene_with(vec![biased]), &config).status,
            Status::Passed
        );

        let mut rotated = SceneObject::mesh("SM_a_1_Main", triangle(0.0));
        rotated.transform.rotation_euler = [-0.00005, 0.0, 0.0];
        rotated.transform.scale = [1.0, 2.0, 1.0];
        let finding = check_transforms(&scene_with(vec![rotated]), &config);
        assert_eq!(finding.status, Status::Failed);
        assert_eq!(
            finding.messages,
            vec![
                "SM_a_1_Main: Rotation not reset (Euler X: -0.00005)",
                "SM_a_1_Main: Scale not reset (1, 2, 1)"
            ]
        );
    }

    #[test]
    fn test_uv_maps() {
        let config = CheckConfig::default();
        let mut no_uv = triangle(0.0);
        no_uv.uv_layer = None;
        let mut out_of_tile = triangle(0.0);
        out_of_tile.uv_layer.as_mut().unwrap().coords[0] = [1.5, 0.5];
        let mut near_edge = triangle(0.0);
        // 8px of a 512px texture is 0.015625
        near_edge.uv_layer.as_mut().unwrap().coords[0] = [0.01, 0.5];

        let scene = scene_with(vec![
            SceneObject::mesh("SM_a_Ground", triangle(0.0)),
            SceneObject::mesh("SM_b_Ground", no_uv),
            SceneObject::mesh("SM_c_1_Main", out_of_tile),
            SceneObject::mesh("SM_d_GroundEl", near_edge),
        ]);
        let finding = check_uv_maps(&scene, &config);
        assert_eq!(
            finding.messages,
            vec![
                "SM_b_Ground: No UV map",
                "SM_c_1_Main: UV outside UDIM bounds, UV padding violation",
                "SM_d_GroundEl: UV padding violation"
            ]
        );
    }

    #[test]
    fn test_uv_padding_for_default_texture_size() {
        let config = CheckConfig::default();
        let uv_at = |u: f64| {
            let mut mesh = triangle(0.0);
            mesh.uv_layer.as_mut().unwrap().coords[0] = [u, 0.5];
            check_uv_maps(
                &scene_with(vec![SceneObject::mesh("SM_a_1_Main", mesh)]),
                &config,
            )
        };

        // 8px of a 2048px texture is 0.00390625
        let inside_band = uv_at(0.003);
        assert_eq!(inside_band.status, Status::Failed);
        assert_eq!(inside_band.messages, vec!["SM_a_1_Main: UV padding violation"]);
        assert_eq!(uv_at(0.00390625).status, Status::Passed);
        assert_eq!(uv_at(1.0 - 0.00390625).status, Status::Passed);
        assert_eq!(uv_at(0.997).status, Status::Failed);
    }

    #[test]
    fn test_mesh_object_without_data_is_checked() {
        let config = CheckConfig::default();
        let mut object = SceneObject::new("SM_a_1_Main", ObjectKind::Mesh);
        object.transform.scale = [3.0, 3.0, 3.0];
        let scene = scene_with(vec![object]);

        assert_eq!(
            check_uv_maps(&scene, &config).messages,
            vec!["SM_a_1_Main: No UV map"]
        );
        assert_eq!(
            check_transforms(&scene, &config).messages,
            vec!["SM_a_1_Main: Scale not reset (3, 3, 3)"]
        );
        assert_eq!(check_triangulation(&scene).status, Status::Passed);
        assert_eq!(
            check_polygon_budget(&scene, &config).messages[0],
            "OKS polygon count: 0/150000"
        );
    }

    #[test]
    fn test_polygon_budget() {
        let config = CheckConfig::default().with_poly_limits(1, 1);
        let scene = scene_with(vec![
            SceneObject::mesh("SM_a_1_MainGlass", triangle(0.0)),
            SceneObject::mesh("SM_a_Flora", triangle(0.0)),
            SceneObject::mesh("SM_a_GroundEl", triangle(0.0)),
            SceneObject::mesh("Decor", triangle(0.0)),
        ]);
        let finding = check_polygon_budget(&scene, &config);
        assert_eq!(finding.status, Status::Failed);
        assert_eq!(
            finding.messages,
            vec![
                "OKS polygon count: 1/1",
                "Ground polygon count: 2/1",
                "Other polygon count: 1"
            ]
        );

        let relaxed = CheckConfig::default();
        assert_eq!(check_polygon_budget(&scene, &relaxed).status, Status::Passed);
    }
}
