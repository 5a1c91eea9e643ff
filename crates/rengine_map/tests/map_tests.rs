//! End-to-end tests for loading and saving map files

use approx::assert_relative_eq;
use glam::Vec3;
use rengine_map::*;
use std::fs;
use tempfile::TempDir;

const EXAMPLE_MAP: &str = "[RENGINE MAP FORMAT V1.0]
sky,0.1,0.2,0.3
cube,1,2,3,0,0,0,1,1,1,32,true
pointlight,0,0,0,1,0.09,0.032,0.1,0.1,0.1,0.8,0.8,0.8,1,1,1
";

const POINT_LIGHT_LINE: &str = "pointlight,0,0,0,1,0.09,0.032,0.1,0.1,0.1,0.8,0.8,0.8,1,1,1";

fn parse(text: &str) -> (MapResult<LoadReport>, SceneDocument, Vec<Diagnostic>) {
    let mut doc = SceneDocument::new();
    let mut diagnostics: Vec<Diagnostic> = Vec::new();
    let result = SceneParser::new().parse_str(text, &mut doc, &mut diagnostics);
    (result, doc, diagnostics)
}

fn full_document() -> SceneDocument {
    let mut doc = SceneDocument::new();
    doc.camera = Some(Camera::new(Vec3::new(0.0, 1.5, -4.0), Vec3::new(-10.0, 180.0, 0.0), 60.0));
    doc.sky_color = Some(Vec3::new(0.1, 0.2, 0.3));
    doc.directional_light = Some(DirectionalLight {
        direction: Vec3::new(-0.2, -1.0, -0.3),
        ambient: Vec3::splat(0.05),
        diffuse: Vec3::splat(0.4),
        specular: Vec3::splat(0.5),
    });
    for i in 0..3 {
        doc.point_lights.push(PointLight {
            position: Vec3::new(i as f32 * 1.25, 0.7, -0.333),
            attenuation: Attenuation::new(1.0, 0.09, 0.032),
            ambient: Vec3::splat(0.1),
            diffuse: Vec3::splat(0.8),
            specular: Vec3::ONE,
        });
    }
    doc.nodes.push(
        SceneNode::new(MeshKind::Cube)
            .with_position(Vec3::new(1.0, 2.0, 3.0))
            .with_rotation(Vec3::new(0.0, 45.0, 0.0))
            .with_shininess(32.0)
            .with_distort(true)
            .with_texture("textures/crate.png")
            .with_specular_map("textures/crate_specular.png"),
    );
    doc.nodes.push(
        SceneNode::new(MeshKind::SphereHiRes)
            .with_scale(Vec3::splat(0.1))
            .with_shininess(1.0 / 3.0),
    );
    doc.nodes.push(SceneNode::new(MeshKind::Cube).with_specular_map("textures/only_specular.png"));
    doc
}

// ============================================================================
// Loading
// ============================================================================

#[test]
fn test_example_map() {
    let (result, doc, diagnostics) = parse(EXAMPLE_MAP);
    let report = result.unwrap();

    assert!(report.is_clean());
    assert!(diagnostics.is_empty());
    assert_eq!(report.records_committed, 3);

    assert_eq!(doc.sky_color, Some(Vec3::new(0.1, 0.2, 0.3)));

    assert_eq!(doc.nodes.len(), 1);
    let node = &doc.nodes[0];
    assert_eq!(node.mesh, MeshKind::Cube);
    assert_eq!(node.position, Vec3::new(1.0, 2.0, 3.0));
    assert_eq!(node.rotation, Vec3::ZERO);
    assert_eq!(node.scale, Vec3::ONE);
    assert_eq!(node.shininess, 32.0);
    assert!(node.distort);
    assert_eq!(node.texture_path, None);
    assert_eq!(node.specular_path, None);

    assert_eq!(doc.point_lights.len(), 1);
    let light = &doc.point_lights[0];
    assert_eq!(light.position, Vec3::ZERO);
    assert_eq!(light.attenuation, Attenuation::new(1.0, 0.09, 0.032));
    assert_eq!(light.ambient, Vec3::splat(0.1));
    assert_eq!(light.diffuse, Vec3::splat(0.8));
    assert_eq!(light.specular, Vec3::ONE);

    assert_eq!(doc.camera, None);
    assert_eq!(doc.directional_light, None);
}

#[test]
fn test_missing_header_always_fails() {
    let bodies = ["", "sky,1,1,1\n", "// comment\n[RENGINE MAP FORMAT V1.0]\n"];
    for body in bodies {
        let (result, _, _) = parse(body);
        assert!(result.unwrap_err().is_format_error(), "accepted {:?}", body);
    }

    let lowercase = EXAMPLE_MAP.replacen("RENGINE", "rengine", 1);
    let (result, doc, _) = parse(&lowercase);
    assert!(result.is_err());
    assert!(doc.is_empty());
}

#[test]
fn test_point_light_cap() {
    let mut text = String::from("[RENGINE MAP FORMAT V1.0]\n");
    for _ in 0..POINT_LIGHTS_MAX + 3 {
        text.push_str(POINT_LIGHT_LINE);
        text.push('\n');
    }
    text.push_str("sky,0,0,1\n");
    text.push_str("sphere,0,0,0,0,0,0,1,1,1,8\n");

    let (result, doc, diagnostics) = parse(&text);
    let report = result.unwrap();

    assert_eq!(doc.point_lights.len(), POINT_LIGHTS_MAX);
    assert_eq!(report.lines_skipped, 3);
    assert!(diagnostics.iter().all(|d| d.kind() == DiagnosticKind::Capacity));

    // Lines after the cap still load
    assert_eq!(doc.sky_color, Some(Vec3::new(0.0, 0.0, 1.0)));
    assert_eq!(doc.nodes.len(), 1);
    assert_eq!(doc.nodes[0].mesh, MeshKind::SphereHiRes);
}

#[test]
fn test_unknown_keyword_is_isolated() {
    let with_unknown = format!(
        "{}torus,0,0,0,0,0,0,1,1,1,32,true\nlight,1\n",
        EXAMPLE_MAP
    );
    let (_, expected, _) = parse(EXAMPLE_MAP);
    let (result, doc, diagnostics) = parse(&with_unknown);

    assert_eq!(result.unwrap().lines_skipped, 2);
    assert_eq!(doc, expected);
    assert_eq!(diagnostics[0].kind(), DiagnosticKind::MeshType);
    assert_eq!(diagnostics[1].kind(), DiagnosticKind::ParameterCount);
}

#[test]
fn test_boolean_coercion() {
    let cases = [
        ("true", true),
        ("TRUE", false),
        ("1", false),
        ("", false),
        ("false", false),
        ("True", false),
    ];

    for (token, expected) in cases {
        let text = format!("[RENGINE MAP FORMAT V1.0]\ncube,0,0,0,0,0,0,1,1,1,32,{}\n", token);
        let (result, doc, _) = parse(&text);
        assert!(result.is_ok());
        assert_eq!(doc.nodes.len(), 1, "token {:?}", token);
        assert_eq!(doc.nodes[0].distort, expected, "token {:?}", token);
    }
}

#[test]
fn test_short_mesh_line_is_skipped() {
    let (result, doc, diagnostics) = parse("[RENGINE MAP FORMAT V1.0]\ncube,1,2,3,0,0,0,1,1,1\n");
    assert!(result.is_ok());
    assert!(doc.nodes.is_empty());
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].kind(), DiagnosticKind::ParameterCount);
    assert_eq!(diagnostics[0].line, 2);
}

#[test]
fn test_distort_is_optional() {
    let (_, doc, diagnostics) = parse("[RENGINE MAP FORMAT V1.0]\nsphere,0,0,0,0,0,0,1,1,1,16\n");
    assert!(diagnostics.is_empty());
    assert!(!doc.nodes[0].distort);
}

#[test]
fn test_texture_tail() {
    let text = "[RENGINE MAP FORMAT V1.0]
cube,0,0,0,0,0,0,1,1,1,32,false,textures/wall.png
cube,0,0,0,0,0,0,1,1,1,32,false,,textures/wall_spec.png
cube,0,0,0,0,0,0,1,1,1,32,false,textures/a.png,textures/b.png,ignored
";
    let (_, doc, diagnostics) = parse(text);
    assert!(diagnostics.is_empty());

    assert_eq!(doc.nodes[0].texture_path.as_deref(), Some("textures/wall.png"));
    assert_eq!(doc.nodes[0].specular_path, None);

    assert_eq!(doc.nodes[1].texture_path, None);
    assert_eq!(doc.nodes[1].specular_path.as_deref(), Some("textures/wall_spec.png"));

    assert_eq!(doc.nodes[2].texture_path.as_deref(), Some("textures/a.png"));
    assert_eq!(doc.nodes[2].specular_path.as_deref(), Some("textures/b.png"));
}

#[test]
fn test_failed_field_discards_whole_record() {
    let text = "[RENGINE MAP FORMAT V1.0]
camera,0,1,5,0,180,0,60
camera,9,9,9,9,9,9,nan?
dirlight,0,-1,0,0.1,0.1,0.1,0.5,0.5,0.5,1,1,1
";
    let (result, doc, diagnostics) = parse(text);
    assert_eq!(result.unwrap().lines_skipped, 1);
    assert_eq!(diagnostics[0].kind(), DiagnosticKind::Uninterpretable);

    let camera = doc.camera.unwrap();
    assert_eq!(camera.position, Vec3::new(0.0, 1.0, 5.0));
    assert_eq!(camera.fov, 60.0);
    assert_eq!(doc.directional_light.unwrap().direction, Vec3::new(0.0, -1.0, 0.0));
}

#[test]
fn test_closure_sink_counts() {
    let mut count = 0;
    let mut doc = SceneDocument::new();
    let mut sink = |_d: Diagnostic| count += 1;
    SceneParser::new()
        .parse_str("[RENGINE MAP FORMAT V1.0]\nsky,x,y,z\ncube,1\n", &mut doc, &mut sink)
        .unwrap();
    assert_eq!(count, 2);
}

// ============================================================================
// Round trips
// ============================================================================

#[test]
fn test_string_round_trip() {
    let original = full_document();
    let text = SceneSerializer::new().to_string(&original).unwrap();

    let (result, reloaded, diagnostics) = parse(&text);
    assert!(result.unwrap().is_clean(), "{:?}", diagnostics);
    assert_eq!(reloaded, original);
}

#[test]
fn test_example_map_round_trip() {
    let (_, first, _) = parse(EXAMPLE_MAP);
    let text = SceneSerializer::new().to_string(&first).unwrap();
    let (_, second, _) = parse(&text);
    assert_eq!(first, second);

    // Canonical output is stable
    assert_eq!(SceneSerializer::new().to_string(&second).unwrap(), text);
}

#[test]
fn test_file_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("scene.rem");
    let original = full_document();

    assert!(SceneLoader::save(&path, &original));

    let mut reloaded = SceneDocument::new();
    assert!(SceneLoader::load(&path, &mut reloaded));
    assert_eq!(reloaded, original);

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.starts_with(MAP_HEADER));
}

#[test]
fn test_load_clears_nodes_only() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("lights.rem");
    fs::write(&path, format!("{}\n{}\n", MAP_HEADER, POINT_LIGHT_LINE)).unwrap();

    let mut doc = full_document();
    assert!(SceneLoader::load(&path, &mut doc));

    assert!(doc.nodes.is_empty());
    assert_eq!(doc.point_lights.len(), 4);
    assert!(doc.camera.is_some());
    assert!(doc.sky_color.is_some());
}

#[test]
fn test_missing_file_leaves_document_unchanged() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("missing.rem");

    let mut doc = full_document();
    assert!(!SceneLoader::load(&path, &mut doc));
    assert_eq!(doc, full_document());

    let err = SceneLoader::try_load(&path, &mut doc, &mut NullSink).unwrap_err();
    assert!(matches!(err, MapError::SourceUnavailable { .. }));
}

#[test]
fn test_save_to_unwritable_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("no_such_dir").join("scene.rem");

    assert!(!SceneLoader::save(&path, &full_document()));
    assert!(!path.exists());
}

#[test]
fn test_crlf_file_loads() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("windows.rem");
    fs::write(&path, EXAMPLE_MAP.replace('\n', "\r\n")).unwrap();

    let mut doc = SceneDocument::new();
    let mut diagnostics: Vec<Diagnostic> = Vec::new();
    let report = SceneLoader::try_load(&path, &mut doc, &mut diagnostics).unwrap();

    assert!(report.is_clean());
    assert_eq!(doc.nodes.len(), 1);
    assert!(doc.nodes[0].distort);
}

// ============================================================================
// Consumers
// ============================================================================

#[test]
fn test_camera_orientation() {
    let (_, doc, _) = parse("[RENGINE MAP FORMAT V1.0]\ncamera,0,0,0,30,90,90,45\n");
    let camera = doc.camera_or_default();

    let front = camera.front();
    assert_relative_eq!(front.x, 1.0, epsilon = 1e-6);
    assert_relative_eq!(front.y, 0.5, epsilon = 1e-6);
    assert_relative_eq!(front.z, 0.0, epsilon = 1e-6);

    let up = camera.up();
    assert_relative_eq!(up.x, 1.0, epsilon = 1e-6);
    assert_relative_eq!(up.y, 0.0, epsilon = 1e-6);
    assert_relative_eq!(camera.clamped_fov(), 45.0);
}

#[test]
fn test_mesh_factory() {
    struct CountingFactory {
        cubes: usize,
        spheres: usize,
    }

    impl MeshFactory for CountingFactory {
        type Mesh = String;

        fn create_mesh(&mut self, kind: MeshKind) -> String {
            match kind {
                MeshKind::Cube => self.cubes += 1,
                MeshKind::SphereHiRes => self.spheres += 1,
            }
            kind.to_string()
        }
    }

    let mut factory = CountingFactory { cubes: 0, spheres: 0 };
    let meshes = full_document().instantiate_meshes(&mut factory);

    assert_eq!(meshes, vec!["cube", "sphere", "cube"]);
    assert_eq!(factory.cubes, 2);
    assert_eq!(factory.spheres, 1);
}
