//! GLB (binary glTF 2.0) writer
//!
//! One mesh and one node per figure part, all in a single scene. Vertices
//! are already in world space, so nodes carry no transform.

use std::collections::BTreeMap;

use figure_core::FigureAssembly;
use gltf_json as json;
use gltf_json::validation::Checked::Valid;

use crate::error::ExportError;
use crate::mesh::TriMesh;

const GENERATOR: &str = concat!("figure-mesh ", env!("CARGO_PKG_VERSION"));

/// Encode a figure as a complete GLB file
pub fn encode_glb(assembly: &FigureAssembly<TriMesh>) -> Result<Vec<u8>, ExportError> {
    let mut buffer = BufferBuilder::new();
    let mut document = DocumentBuilder::default();

    for part in assembly {
        let mesh = &part.mesh;
        let positions = buffer.pack_positions(&mesh.positions);
        let normals = buffer.pack_vec3(&mesh.normals);
        let indices = buffer.pack_indices_u16(&mesh.indices);
        document.add_part(&part.name, positions, normals, indices);
    }

    let root = document.build(&buffer, assembly.config().name());
    assemble_glb(&root, buffer.data())
}

// =============================================================================
// Buffer packing
// =============================================================================

/// glTF buffers are little-endian regardless of host
fn vec3_le_bytes(data: &[[f32; 3]]) -> Vec<u8> {
    data.iter().flatten().flat_map(|c| c.to_le_bytes()).collect()
}

/// Binary buffer with 4-byte aligned views and one accessor per view
struct BufferBuilder {
    buffer: Vec<u8>,
    views: Vec<json::buffer::View>,
    accessors: Vec<json::Accessor>,
}

impl BufferBuilder {
    fn new() -> Self {
        Self {
            buffer: Vec::new(),
            views: Vec::new(),
            accessors: Vec::new(),
        }
    }

    fn data(&self) -> &[u8] {
        &self.buffer
    }

    /// Positions with the min/max bounds glTF requires
    fn pack_positions(&mut self, positions: &[[f32; 3]]) -> json::Index<json::Accessor> {
        let (min, max) = compute_bounds(positions);
        self.pack(
            &vec3_le_bytes(positions),
            positions.len(),
            json::accessor::ComponentType::F32,
            json::accessor::Type::Vec3,
            json::buffer::Target::ArrayBuffer,
            Some((min, max)),
        )
    }

    fn pack_vec3(&mut self, data: &[[f32; 3]]) -> json::Index<json::Accessor> {
        self.pack(
            &vec3_le_bytes(data),
            data.len(),
            json::accessor::ComponentType::F32,
            json::accessor::Type::Vec3,
            json::buffer::Target::ArrayBuffer,
            None,
        )
    }

    fn pack_indices_u16(&mut self, indices: &[u16]) -> json::Index<json::Accessor> {
        let bytes: Vec<u8> = indices.iter().flat_map(|i| i.to_le_bytes()).collect();
        self.pack(
            &bytes,
            indices.len(),
            json::accessor::ComponentType::U16,
            json::accessor::Type::Scalar,
            json::buffer::Target::ElementArrayBuffer,
            None,
        )
    }

    fn pack(
        &mut self,
        bytes: &[u8],
        count: usize,
        component_type: json::accessor::ComponentType,
        type_: json::accessor::Type,
        target: json::buffer::Target,
        bounds: Option<([f32; 3], [f32; 3])>,
    ) -> json::Index<json::Accessor> {
        let offset = self.buffer.len();
        self.buffer.extend_from_slice(bytes);

        self.views.push(json::buffer::View {
            buffer: json::Index::new(0),
            byte_length: bytes.len().into(),
            byte_offset: Some((offset as u64).into()),
            byte_stride: None,
            extensions: Default::default(),
            extras: Default::default(),
            name: None,
            target: Some(Valid(target)),
        });

        let to_json = |v: [f32; 3]| json::Value::Array(v.into_iter().map(json::Value::from).collect());
        let accessor_index = self.accessors.len() as u32;
        self.accessors.push(json::Accessor {
            buffer_view: Some(json::Index::new(self.views.len() as u32 - 1)),
            byte_offset: Some(0u64.into()),
            count: count.into(),
            component_type: Valid(json::accessor::GenericComponentType(component_type)),
            extensions: Default::default(),
            extras: Default::default(),
            type_: Valid(type_),
            min: bounds.map(|(min, _)| to_json(min)),
            max: bounds.map(|(_, max)| to_json(max)),
            name: None,
            normalized: false,
            sparse: None,
        });

        align_buffer(&mut self.buffer);
        json::Index::new(accessor_index)
    }
}

// =============================================================================
// Document
// =============================================================================

#[derive(Default)]
struct DocumentBuilder {
    meshes: Vec<json::Mesh>,
    nodes: Vec<json::Node>,
}

impl DocumentBuilder {
    /// Add a named mesh and the node that instances it
    fn add_part(
        &mut self,
        name: &str,
        positions: json::Index<json::Accessor>,
        normals: json::Index<json::Accessor>,
        indices: json::Index<json::Accessor>,
    ) {
        let mut attributes = BTreeMap::new();
        attributes.insert(Valid(json::mesh::Semantic::Positions), positions);
        attributes.insert(Valid(json::mesh::Semantic::Normals), normals);

        let mesh_index = json::Index::new(self.meshes.len() as u32);
        self.meshes.push(json::Mesh {
            extensions: Default::default(),
            extras: Default::default(),
            name: Some(name.to_string()),
            primitives: vec![json::mesh::Primitive {
                attributes,
                extensions: Default::default(),
                extras: Default::default(),
                indices: Some(indices),
                material: None,
                mode: Valid(json::mesh::Mode::Triangles),
                targets: None,
            }],
            weights: None,
        });

        self.nodes.push(json::Node {
            camera: None,
            children: None,
            extensions: Default::default(),
            extras: Default::default(),
            matrix: None,
            mesh: Some(mesh_index),
            name: Some(name.to_string()),
            rotation: None,
            scale: None,
            skin: None,
            translation: None,
            weights: None,
        });
    }

    fn build(self, buffer: &BufferBuilder, scene_name: &str) -> json::Root {
        let scene = json::Scene {
            extensions: Default::default(),
            extras: Default::default(),
            name: Some(scene_name.to_string()),
            nodes: (0..self.nodes.len() as u32).map(json::Index::new).collect(),
        };

        json::Root {
            accessors: buffer.accessors.clone(),
            animations: Vec::new(),
            asset: json::Asset {
                copyright: None,
                extensions: Default::default(),
                extras: Default::default(),
                generator: Some(GENERATOR.to_string()),
                min_version: None,
                version: "2.0".to_string(),
            },
            buffers: vec![json::Buffer {
                byte_length: buffer.buffer.len().into(),
                extensions: Default::default(),
                extras: Default::default(),
                name: None,
                uri: None,
            }],
            buffer_views: buffer.views.clone(),
            cameras: Vec::new(),
            extensions: Default::default(),
            extensions_required: Vec::new(),
            extensions_used: Vec::new(),
            extras: Default::default(),
            images: Vec::new(),
            materials: Vec::new(),
            meshes: self.meshes,
            nodes: self.nodes,
            samplers: Vec::new(),
            scene: Some(json::Index::new(0)),
            scenes: vec![scene],
            skins: Vec::new(),
            textures: Vec::new(),
        }
    }
}

// =============================================================================
// Container
// =============================================================================

fn compute_bounds(positions: &[[f32; 3]]) -> ([f32; 3], [f32; 3]) {
    let mut min = [f32::MAX; 3];
    let mut max = [f32::MIN; 3];
    for pos in positions {
        for i in 0..3 {
            min[i] = min[i].min(pos[i]);
            max[i] = max[i].max(pos[i]);
        }
    }
    (min, max)
}

/// Pad to a 4-byte boundary
fn align_buffer(buffer: &mut Vec<u8>) {
    while buffer.len() % 4 != 0 {
        buffer.push(0);
    }
}

/// GLB container: 12-byte header, JSON chunk (space padded), BIN chunk
fn assemble_glb(root: &json::Root, buffer_data: &[u8]) -> Result<Vec<u8>, ExportError> {
    let json_string = json::serialize::to_string(root)?;
    let json_bytes = json_string.as_bytes();

    let json_padding = (4 - (json_bytes.len() % 4)) % 4;
    let json_chunk_length = json_bytes.len() + json_padding;
    let buffer_padding = (4 - (buffer_data.len() % 4)) % 4;
    let buffer_chunk_length = buffer_data.len() + buffer_padding;
    let total_length = 12 + 8 + json_chunk_length + 8 + buffer_chunk_length;

    let mut glb = Vec::with_capacity(total_length);

    glb.extend_from_slice(b"glTF");
    glb.extend_from_slice(&2u32.to_le_bytes()); // version
    glb.extend_from_slice(&(total_length as u32).to_le_bytes());

    glb.extend_from_slice(&(json_chunk_length as u32).to_le_bytes());
    glb.extend_from_slice(&0x4E4F534Au32.to_le_bytes()); // "JSON"
    glb.extend_from_slice(json_bytes);
    glb.resize(glb.len() + json_padding, b' ');

    glb.extend_from_slice(&(buffer_chunk_length as u32).to_le_bytes());
    glb.extend_from_slice(&0x004E4942u32.to_le_bytes()); // "BIN\0"
    glb.extend_from_slice(buffer_data);
    glb.resize(glb.len() + buffer_padding, 0);

    Ok(glb)
}
