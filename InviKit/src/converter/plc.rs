//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: MIT
//!
//! PLC projection - decoded meshes and bones as an AXE parameter list
//!
//! A PLC document does not carry vertex data. It records where each stream
//! starts in the package and how it is typed, so the mesh can be pulled out
//! of the package file by the importer.

use std::collections::HashSet;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::error::Result;
use crate::formats::pak::{BoneNode, MeshEntry, TEXCOORD_STRIDE, VERTEX_STRIDE};
use crate::options::PlcOptions;
use crate::package::DecodedPackage;

pub const PLC_DOCUMENT_TITLE: &str = "Advanced Mesh Reaper Parameter List Container";
pub const PLC_VERSION: u32 = 102;

/// Three weights per vertex; the fourth blend index has no weight.
const PER_VERTEX_BONE_COUNT: u32 = 3;

// ============================================================================
// Document Types
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PlcDocument {
    pub document: String,
    pub version: u32,
    pub endianness: String,
    pub shared_source: String,
    pub mesh_count: usize,
    pub mesh_param_sets: Vec<MeshParamSet>,
    pub bone_count: usize,
    pub bone_node_list: Vec<BoneNodeEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MeshParamSet {
    pub mesh_name: String,
    pub vertex_count: u32,
    pub polygon_count: u32,
    pub has_normal: bool,
    pub has_texcoord: bool,
    pub has_tangent: bool,
    pub has_binormal: bool,
    pub has_skinning_info: bool,
    #[serde(rename = "FlipUV")]
    pub flip_uv: bool,
    #[serde(rename = "UVSetCount")]
    pub uv_set_count: u32,
    #[serde(rename = "UVSetLabels")]
    pub uv_set_labels: Vec<String>,
    pub vertex_param_set_count: u32,
    pub polygon_param_set_count: u32,
    pub vertex_param_sets: Vec<VertexParamSet>,
    pub polygon_param_sets: Vec<PolygonParamSet>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct VertexParamSet {
    pub vertex_count: u32,
    pub per_vertex_bone_count: u32,
    pub has_bone_index_mapping: bool,
    pub use_user_defined_indices: bool,
    #[serde(rename = "UVFactors")]
    pub uv_factors: Vec<String>,
    pub position_rec: StreamRecord,
    pub normal_rec: StreamRecord,
    pub texcoord_recs: Vec<StreamRecord>,
    pub tangent_rec: StreamRecord,
    pub binormal_rec: StreamRecord,
    pub blend_weight_rec: StreamRecord,
    pub blend_index_rec: StreamRecord,
    pub mapping_bone_indices: MappingBoneIndices,
}

/// Location and layout of one vertex stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StreamRecord {
    pub address: u64,
    pub stride: u64,
    pub data_type: String,
}

impl StreamRecord {
    fn new(address: u64, stride: u64, data_type: &str) -> Self {
        Self {
            address,
            stride,
            data_type: data_type.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MappingBoneIndices {
    pub count: usize,
    pub user_defined_indices: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PolygonParamSet {
    pub decoded_polygon_count: u32,
    pub polygon_vertex_index_count: u32,
    pub address: u64,
    pub data_type: String,
    pub encoding: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BoneNodeEntry {
    pub node_name: String,
    pub node_index: usize,
    pub parent_index: i32,
    pub translation: [f32; 3],
}

// ============================================================================
// Projection
// ============================================================================

impl MeshParamSet {
    #[must_use]
    pub fn from_mesh(mesh: &MeshEntry, name: String) -> Self {
        let a = &mesh.addresses;
        Self {
            mesh_name: name,
            vertex_count: mesh.vertex_count,
            polygon_count: mesh.face_count,
            has_normal: true,
            has_texcoord: true,
            has_tangent: true,
            has_binormal: true,
            has_skinning_info: true,
            flip_uv: true,
            uv_set_count: 1,
            uv_set_labels: vec!["UV0".to_string()],
            vertex_param_set_count: 1,
            polygon_param_set_count: 1,
            vertex_param_sets: vec![VertexParamSet {
                vertex_count: mesh.vertex_count,
                per_vertex_bone_count: PER_VERTEX_BONE_COUNT,
                has_bone_index_mapping: true,
                use_user_defined_indices: true,
                uv_factors: vec!["Auto".to_string()],
                position_rec: StreamRecord::new(a.positions, VERTEX_STRIDE, "Float"),
                normal_rec: StreamRecord::new(a.normals, VERTEX_STRIDE, "Float"),
                texcoord_recs: vec![StreamRecord::new(a.texcoords, TEXCOORD_STRIDE, "Half-float")],
                tangent_rec: StreamRecord::new(a.tangents, VERTEX_STRIDE, "Float"),
                binormal_rec: StreamRecord::new(a.binormals, VERTEX_STRIDE, "Float"),
                blend_weight_rec: StreamRecord::new(a.weights, VERTEX_STRIDE, "Float"),
                blend_index_rec: StreamRecord::new(a.blend_indices, VERTEX_STRIDE, "UINT8"),
                mapping_bone_indices: MappingBoneIndices {
                    count: mesh.bone_indices.len(),
                    user_defined_indices: mesh.bone_indices.clone(),
                },
            }],
            polygon_param_sets: vec![PolygonParamSet {
                decoded_polygon_count: mesh.face_count,
                polygon_vertex_index_count: mesh.face_count * 3,
                address: a.faces,
                data_type: "UINT16".to_string(),
                encoding: "Triangle".to_string(),
            }],
        }
    }
}

impl BoneNodeEntry {
    #[must_use]
    pub fn from_bone(bone: &BoneNode) -> Self {
        Self {
            node_name: bone.name.clone(),
            node_index: bone.index,
            parent_index: bone.parent_index(),
            translation: bone.translation,
        }
    }

    /// Placeholder for a bone that only served skipped meshes.
    #[must_use]
    pub fn masked(index: usize) -> Self {
        Self {
            node_name: format!("unused_bone_{index}"),
            node_index: index,
            parent_index: -1,
            translation: [0.0; 3],
        }
    }
}

/// Mesh name derived from the first bone of its mapping.
fn bone_based_name(mesh: &MeshEntry, bones: &[BoneNode]) -> Option<String> {
    let first = *mesh.bone_indices.first()? as usize;
    let bone = bones.get(first)?;
    Some(format!("mesh_{}", bone.name.to_lowercase().replace(' ', "_")))
}

/// Build the PLC documents for a set of meshes and bones.
///
/// Returns one document, or one per mesh with `split`. Returns nothing when
/// no mesh is left after skipping.
#[must_use]
pub fn build_plc_documents(
    shared_source: &str,
    meshes: &[MeshEntry],
    bones: &[BoneNode],
    options: &PlcOptions,
) -> Vec<PlcDocument> {
    let order: Vec<&MeshEntry> = if options.reverse {
        meshes.iter().rev().collect()
    } else {
        meshes.iter().collect()
    };

    let mut masked: HashSet<usize> = HashSet::new();
    let mut param_sets = Vec::with_capacity(order.len());
    for (position, mesh) in order.into_iter().enumerate() {
        if position < options.skip {
            masked.extend(mesh.bone_indices.iter().map(|&i| i as usize));
            continue;
        }
        let name = if options.rename {
            bone_based_name(mesh, bones).unwrap_or_else(|| mesh.name.clone())
        } else {
            mesh.name.clone()
        };
        param_sets.push(MeshParamSet::from_mesh(mesh, name));
    }

    // One pass in table order: a masked bone masks its parent (never the root
    // at index 0), which only affects parents later in the table
    let bone_nodes: Vec<BoneNodeEntry> = bones
        .iter()
        .map(|bone| {
            if !masked.contains(&bone.index) {
                return BoneNodeEntry::from_bone(bone);
            }
            let parent = bone.parent_index();
            if parent > 0 {
                masked.insert(parent as usize);
            }
            BoneNodeEntry::masked(bone.index)
        })
        .collect();

    if param_sets.is_empty() {
        tracing::warn!("No mesh left to export for {shared_source}");
        return Vec::new();
    }

    let document = |mesh_param_sets: Vec<MeshParamSet>| PlcDocument {
        document: PLC_DOCUMENT_TITLE.to_string(),
        version: PLC_VERSION,
        endianness: "Big".to_string(),
        shared_source: shared_source.to_string(),
        mesh_count: mesh_param_sets.len(),
        mesh_param_sets,
        bone_count: bone_nodes.len(),
        bone_node_list: bone_nodes.clone(),
    };

    if options.split {
        param_sets.into_iter().map(|set| document(vec![set])).collect()
    } else {
        vec![document(param_sets)]
    }
}

/// Output path for a document: `<pak>.plc`, or `<pak>.NN.plc` for split output.
#[must_use]
pub fn plc_output_path(pak_path: &Path, split_index: Option<usize>) -> PathBuf {
    let mut path = OsString::from(pak_path.as_os_str());
    match split_index {
        Some(index) => path.push(format!(".{:02}.plc", index + 1)),
        None => path.push(".plc"),
    }
    PathBuf::from(path)
}

/// Documents for a decoded package, each paired with its output path.
#[must_use]
pub fn project_package(package: &DecodedPackage, options: &PlcOptions) -> Vec<(PathBuf, PlcDocument)> {
    let shared_source = package
        .path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let bones = package
        .skeleton
        .as_ref()
        .map_or(&[][..], |skeleton| skeleton.bones.as_slice());

    let documents = build_plc_documents(&shared_source, &package.meshes.meshes, bones, options);
    documents
        .into_iter()
        .enumerate()
        .map(|(i, document)| {
            let index = options.split.then_some(i);
            (plc_output_path(&package.path, index), document)
        })
        .collect()
}

/// Serialize a document with four-space indentation.
pub fn serialize_plc(document: &PlcDocument) -> Result<String> {
    let mut buffer = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(b"    "));
    document.serialize(&mut serializer)?;
    Ok(String::from_utf8(buffer)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::pak::{AttributeAddresses, BoneMatrix, ParentRef};
    use pretty_assertions::assert_eq;

    fn mesh(data_offset: u32, bone_indices: Vec<u32>) -> MeshEntry {
        MeshEntry {
            name: format!("mesh_{data_offset:08x}"),
            vertex_count: 4,
            face_count: 2,
            data_offset,
            bone_indices,
            addresses: AttributeAddresses {
                faces: 0x100,
                positions: 0x110,
                normals: 0x11C,
                tangents: 0x128,
                binormals: 0x134,
                weights: 0x140,
                blend_indices: 0x14C,
                texcoords: 0x210,
            },
            faces: vec![[0, 1, 2], [2, 1, 3]],
            min_face_index: 0,
            max_face_index: 3,
            positions: vec![[0.0; 3]; 4],
            normals: vec![[0.0; 3]; 4],
            tangents: vec![[0.0; 3]; 4],
            binormals: vec![[0.0; 3]; 4],
            weights: vec![[0.0; 3]; 4],
            blend_indices: vec![[0; 4]; 4],
            max_blend_index: 0,
            unmapped_blend_indices: 0,
            texcoords: vec![[0.0; 2]; 4],
            end_offset: 0x220,
        }
    }

    fn bone(index: usize, name: &str, parent: ParentRef) -> BoneNode {
        BoneNode {
            index,
            id: index as u32,
            name: name.to_string(),
            parent,
            matrix: BoneMatrix { rows: [[0.0; 4]; 4] },
            scale: [1.0; 3],
            local: [0.0; 3],
            translation: [index as f32, 0.0, 0.0],
        }
    }

    fn skeleton() -> Vec<BoneNode> {
        vec![
            bone(0, "Root", ParentRef::Root),
            bone(1, "Spine Upper", ParentRef::Bone(0)),
            bone(2, "Head", ParentRef::Bone(1)),
            bone(3, "Tail", ParentRef::Bone(0)),
            bone(4, "Broken", ParentRef::OutOfRange { id: 40 }),
        ]
    }

    #[test]
    fn test_single_document() {
        let meshes = vec![mesh(0x100, vec![1, 2]), mesh(0x300, vec![3])];
        let docs = build_plc_documents("chr.pak", &meshes, &skeleton(), &PlcOptions::default());

        assert_eq!(docs.len(), 1);
        let doc = &docs[0];
        assert_eq!(doc.document, PLC_DOCUMENT_TITLE);
        assert_eq!(doc.version, 102);
        assert_eq!(doc.mesh_count, 2);
        assert_eq!(doc.bone_count, 5);
        assert_eq!(doc.mesh_param_sets[0].mesh_name, "mesh_00000100");
        assert_eq!(doc.bone_node_list[2].parent_index, 1);
        assert_eq!(doc.bone_node_list[4].parent_index, -1);
        assert_eq!(doc.bone_node_list[4].node_name, "Broken");
    }

    #[test]
    fn test_skip_masks_only_bones_of_skipped_meshes() {
        let meshes = vec![mesh(0x100, vec![2]), mesh(0x300, vec![1, 3])];
        let options = PlcOptions::new().with_skip(1);
        let docs = build_plc_documents("chr.pak", &meshes, &skeleton(), &options);

        let doc = &docs[0];
        assert_eq!(doc.mesh_count, 1);
        assert_eq!(doc.mesh_param_sets[0].mesh_name, "mesh_00000300");

        // Head's parent comes earlier in the table and is still used
        let names: Vec<&str> = doc.bone_node_list.iter().map(|b| b.node_name.as_str()).collect();
        assert_eq!(names, vec!["Root", "Spine Upper", "unused_bone_2", "Tail", "Broken"]);
        assert_eq!(doc.bone_node_list[1].parent_index, 0);
        assert_eq!(doc.bone_node_list[1].translation, [1.0, 0.0, 0.0]);
        assert_eq!(doc.bone_node_list[2].parent_index, -1);
        assert_eq!(doc.bone_node_list[2].translation, [0.0; 3]);
    }

    #[test]
    fn test_skip_masks_later_parents() {
        let bones = vec![
            bone(0, "Root", ParentRef::Root),
            bone(1, "Hand", ParentRef::Bone(2)),
            bone(2, "Arm", ParentRef::Bone(0)),
            bone(3, "Leg", ParentRef::Bone(0)),
        ];
        let meshes = vec![mesh(0x100, vec![1]), mesh(0x300, vec![3])];
        let options = PlcOptions::new().with_skip(1);
        let docs = build_plc_documents("chr.pak", &meshes, &bones, &options);

        let names: Vec<&str> = docs[0].bone_node_list.iter().map(|b| b.node_name.as_str()).collect();
        assert_eq!(names, vec!["Root", "unused_bone_1", "unused_bone_2", "Leg"]);
    }

    #[test]
    fn test_reverse_rename_split() {
        let meshes = vec![mesh(0x100, vec![1, 2]), mesh(0x300, vec![9])];
        let options = PlcOptions::new().with_reverse(true).with_rename(true).with_split(true);
        let docs = build_plc_documents("chr.pak", &meshes, &skeleton(), &options);

        assert_eq!(docs.len(), 2);
        assert!(docs.iter().all(|d| d.mesh_count == 1));
        // Bone 9 does not exist, so the name stays
        assert_eq!(docs[0].mesh_param_sets[0].mesh_name, "mesh_00000300");
        assert_eq!(docs[1].mesh_param_sets[0].mesh_name, "mesh_spine_upper");
    }

    #[test]
    fn test_no_mesh_left() {
        let meshes = vec![mesh(0x100, vec![1])];
        let options = PlcOptions::new().with_skip(1);
        assert!(build_plc_documents("chr.pak", &meshes, &skeleton(), &options).is_empty());
    }

    #[test]
    fn test_output_paths() {
        let pak = Path::new("out/chr_01.pak");
        assert_eq!(plc_output_path(pak, None), PathBuf::from("out/chr_01.pak.plc"));
        assert_eq!(plc_output_path(pak, Some(0)), PathBuf::from("out/chr_01.pak.01.plc"));
        assert_eq!(plc_output_path(pak, Some(11)), PathBuf::from("out/chr_01.pak.12.plc"));
    }

    #[test]
    fn test_json_field_names() {
        let meshes = vec![mesh(0x100, vec![1, 2])];
        let docs = build_plc_documents("chr.pak", &meshes, &skeleton(), &PlcOptions::default());
        let json = serialize_plc(&docs[0]).unwrap();

        assert!(json.starts_with("{\n    \"Document\": \"Advanced Mesh Reaper Parameter List Container\""));
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let mesh = &value["MeshParamSets"][0];
        assert_eq!(mesh["FlipUV"], true);
        assert_eq!(mesh["UVSetLabels"][0], "UV0");
        let vertex = &mesh["VertexParamSets"][0];
        assert_eq!(vertex["UVFactors"][0], "Auto");
        assert_eq!(vertex["PerVertexBoneCount"], 3);
        assert_eq!(vertex["PositionRec"]["Address"], 0x110);
        assert_eq!(vertex["PositionRec"]["Stride"], 64);
        assert_eq!(vertex["TexcoordRecs"][0]["DataType"], "Half-float");
        assert_eq!(vertex["BlendIndexRec"]["DataType"], "UINT8");
        assert_eq!(vertex["MappingBoneIndices"]["UserDefinedIndices"][1], 2);
        let polygons = &mesh["PolygonParamSets"][0];
        assert_eq!(polygons["PolygonVertexIndexCount"], 6);
        assert_eq!(polygons["Encoding"], "Triangle");
        assert_eq!(value["BoneNodeList"][1]["NodeName"], "Spine Upper");

        let parsed: PlcDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, docs[0]);
    }
}
