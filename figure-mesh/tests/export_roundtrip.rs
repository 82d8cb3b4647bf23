//! End-to-end: generate figures through real backends and read the files back

#![cfg(all(feature = "procedural", feature = "faceted"))]

use std::fs;

use figure_core::{
    FigureAssembly, FigureError, FigureGenerator, PrimitiveError, ProportionConfig, preset_draft,
};
use figure_mesh::{
    BackendKind, ExportError, ExportFormat, FacetedBackend, ProceduralBackend, TriMesh,
    export_figure,
};
use tempfile::TempDir;

fn procedural_figure(preset: &str) -> FigureAssembly<TriMesh> {
    FigureGenerator::new(ProceduralBackend::new())
        .generate_preset(preset, 45.0)
        .unwrap()
}

#[test]
fn obj_has_one_object_per_part() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("female.obj");
    let figure = procedural_figure("female_adult");

    let format = export_figure(&figure, &path, None, BackendKind::Procedural).unwrap();
    assert_eq!(format, ExportFormat::Obj);

    let text = fs::read_to_string(&path).unwrap();
    let objects: Vec<&str> = text
        .lines()
        .filter_map(|line| line.strip_prefix("o "))
        .collect();
    let names: Vec<&str> = figure.part_names().collect();
    assert_eq!(objects, names);

    let vertices = text.lines().filter(|l| l.starts_with("v ")).count();
    let normals = text.lines().filter(|l| l.starts_with("vn ")).count();
    let faces = text.lines().filter(|l| l.starts_with("f ")).count();
    let expected_vertices: usize = figure.iter().map(|p| p.mesh.vertex_count()).sum();
    let expected_faces: usize = figure.iter().map(|p| p.mesh.triangle_count()).sum();
    assert_eq!(vertices, expected_vertices);
    assert_eq!(normals, expected_vertices);
    assert_eq!(faces, expected_faces);

    // Highest face index refers to the last vertex
    let max_index = text
        .lines()
        .filter_map(|l| l.strip_prefix("f "))
        .flat_map(|l| l.split_whitespace())
        .filter_map(|corner| corner.split("//").next()?.parse::<usize>().ok())
        .max()
        .unwrap();
    assert_eq!(max_index, expected_vertices);
}

#[test]
fn stl_size_matches_triangle_count() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("male.stl");
    let figure = FigureGenerator::new(FacetedBackend::new())
        .generate_preset("male_adult", 90.0)
        .unwrap();

    export_figure(&figure, &path, None, BackendKind::Faceted).unwrap();

    let bytes = fs::read(&path).unwrap();
    let triangles: usize = figure.iter().map(|p| p.mesh.triangle_count()).sum();
    assert_eq!(bytes.len(), 80 + 4 + 50 * triangles);
    let count = u32::from_le_bytes([bytes[80], bytes[81], bytes[82], bytes[83]]);
    assert_eq!(count as usize, triangles);
    assert!(!bytes.starts_with(b"solid"));
}

#[cfg(feature = "glb")]
#[test]
fn glb_reimports_with_named_nodes() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("female.glb");
    let figure = procedural_figure("female_adult");

    export_figure(&figure, &path, None, BackendKind::Procedural).unwrap();

    let (document, buffers, _images) = gltf::import(&path).unwrap();
    assert_eq!(document.meshes().count(), 21);
    assert_eq!(document.scenes().count(), 1);

    let node_names: Vec<String> = document
        .nodes()
        .filter_map(|n| n.name().map(str::to_string))
        .collect();
    let part_names: Vec<String> = figure.part_names().map(str::to_string).collect();
    assert_eq!(node_names, part_names);

    // Head icosphere at level 2
    let head = document.meshes().next().unwrap();
    let primitive = head.primitives().next().unwrap();
    let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));
    assert_eq!(reader.read_positions().unwrap().count(), 162);
    assert_eq!(reader.read_normals().unwrap().count(), 162);
    assert_eq!(reader.read_indices().unwrap().into_u32().count(), 320 * 3);
}

#[test]
fn faceted_backend_rejects_glb() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("figure.glb");
    let figure = FigureGenerator::new(FacetedBackend::new())
        .generate_preset("child", 20.0)
        .unwrap();

    let err = export_figure(&figure, &path, None, BackendKind::Faceted).unwrap_err();
    assert!(matches!(err, ExportError::UnsupportedFormat { backend: "faceted", .. }));
    assert!(!path.exists());
}

#[test]
fn unknown_extension_is_rejected() {
    let dir = TempDir::new().unwrap();
    let figure = procedural_figure("heroic");
    let err = export_figure(
        &figure,
        &dir.path().join("figure.fbx"),
        None,
        BackendKind::Procedural,
    )
    .unwrap_err();
    assert!(matches!(err, ExportError::UnknownExtension { .. }));
}

#[test]
fn oversubdivided_head_fails_whole_figure() {
    let mut draft = preset_draft("male_adult").unwrap();
    draft.subdivisions = 7;
    let config = ProportionConfig::try_from(draft).unwrap();

    let err = FigureGenerator::new(ProceduralBackend::new())
        .generate(&config, 45.0)
        .unwrap_err();
    assert_head_overflow(err);
}

#[test]
fn saturated_subdivisions_fail_faceted_figure() {
    let mut draft = preset_draft("male_adult").unwrap();
    draft.subdivisions = 30;
    let config = ProportionConfig::try_from(draft).unwrap();

    let err = FigureGenerator::new(FacetedBackend::new())
        .generate(&config, 45.0)
        .unwrap_err();
    assert_head_overflow(err);
}

fn assert_head_overflow(err: FigureError) {
    match err {
        FigureError::PartConstructionFailed { part_name, cause } => {
            assert_eq!(part_name, "Head");
            assert!(matches!(cause, PrimitiveError::IndexOverflow { .. }));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn boxed_backend_from_registry() {
    let kind = BackendKind::auto().unwrap();
    let generator = FigureGenerator::new(kind.create().unwrap());
    let figure = generator.generate_preset("female_adult", 0.0).unwrap();
    assert_eq!(figure.part_count(), 21);
    assert!(figure.iter().all(|p| !p.mesh.is_empty()));
}
