//! Mesh section decoder
//!
//! A mesh section starts with a 0x30-byte header. Word 10 points (relative to
//! the section) at a descriptor holding the mesh table pointer and the mesh
//! count. Each table entry is a bone mapping block followed by a 0x30-byte
//! mesh record; each record points at the mesh's face, vertex and texcoord
//! streams.
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: MIT

use std::fmt;
use std::io::{Read, Seek};

use crate::error::{Error, Result};
use crate::formats::common::{BinaryCursor, STREAM_ALIGNMENT, check_pointer};

/// Magic prefix of a mesh section.
pub const MESH_SECTION_PREFIX: u32 = 0x144C_0000;

const SECTION_HEADER_WORDS: usize = 12;
const MESH_RECORD_WORDS: usize = 12;
const DESCRIPTOR_WORD: usize = 10;
/// The table pointer in the descriptor is 16 bytes past the first mapping block.
const TABLE_POINTER_BIAS: u32 = 16;

/// Interleaved vertex stride: five `f32` triples and four blend index bytes.
pub const VERTEX_STRIDE: u64 = 64;
/// Two half floats per texcoord.
pub const TEXCOORD_STRIDE: u64 = 4;

// ============================================================================
// Types
// ============================================================================

/// Absolute file offsets of the first element of every stream of a mesh.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AttributeAddresses {
    pub faces: u64,
    pub positions: u64,
    pub normals: u64,
    pub tangents: u64,
    pub binormals: u64,
    pub weights: u64,
    pub blend_indices: u64,
    pub texcoords: u64,
}

/// A decoded mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshEntry {
    pub name: String,
    pub vertex_count: u32,
    pub face_count: u32,
    /// Offset of the face stream, relative to the section base
    pub data_offset: u32,
    /// Skeleton bone index for each local blend index
    pub bone_indices: Vec<u32>,
    pub addresses: AttributeAddresses,
    pub faces: Vec<[u16; 3]>,
    pub min_face_index: u16,
    pub max_face_index: u16,
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub tangents: Vec<[f32; 3]>,
    pub binormals: Vec<[f32; 3]>,
    pub weights: Vec<[f32; 3]>,
    /// Blend indices already mapped to skeleton bone indices
    pub blend_indices: Vec<[u32; 4]>,
    pub max_blend_index: u8,
    /// Blend indices that fell outside the mapping and were kept as is
    pub unmapped_blend_indices: usize,
    pub texcoords: Vec<[f32; 2]>,
    /// Absolute offset just past the padded texcoord stream
    pub end_offset: u64,
}

/// A mesh that passed the table checks but whose streams could not be decoded.
#[derive(Debug)]
pub struct RejectedMesh {
    /// Position in the mesh table
    pub table_index: usize,
    pub name: String,
    pub error: Error,
}

/// Everything decoded from one mesh section.
#[derive(Debug)]
pub struct MeshSection {
    /// Absolute offset of the section
    pub base: u64,
    pub header: [u32; SECTION_HEADER_WORDS],
    /// Mesh count from the descriptor
    pub declared_count: u32,
    /// Absolute offset of the mesh table
    pub table_offset: u64,
    pub meshes: Vec<MeshEntry>,
    pub rejected: Vec<RejectedMesh>,
}

/// Table entry that passed the sanity checks, before its streams are read.
struct MeshRecord {
    table_index: usize,
    vertex_count: u32,
    face_count: u32,
    data_offset: u32,
    bone_indices: Vec<u32>,
}

// ============================================================================
// Section
// ============================================================================

impl MeshSection {
    /// Decode the mesh section starting at `base`.
    pub fn read<R: Read + Seek>(cursor: &mut BinaryCursor<R>, base: u64) -> Result<Self> {
        cursor.seek(base)?;
        let header = cursor.read_u32s::<SECTION_HEADER_WORDS>()?;
        if header[0] != MESH_SECTION_PREFIX {
            return Err(Error::Structural {
                section: "mesh",
                expected: MESH_SECTION_PREFIX,
                found: header[0],
            });
        }

        let (declared_count, table_offset) =
            locate_mesh_table(cursor, base, header[DESCRIPTOR_WORD])?;
        tracing::debug!(
            "[Offset] Mesh Table   : 0x{:08X} ({} meshes declared)",
            table_offset,
            declared_count
        );

        let records = read_mesh_table(cursor, table_offset, declared_count)?;

        let mut meshes = Vec::with_capacity(records.len());
        let mut rejected = Vec::new();
        for record in records {
            let name = mesh_name(record.data_offset);
            match MeshEntry::read(cursor, base, &record, name.clone()) {
                Ok(mesh) => meshes.push(mesh),
                Err(error) => {
                    tracing::error!("[idx={:02}] {} rejected: {}", record.table_index, name, error);
                    rejected.push(RejectedMesh {
                        table_index: record.table_index,
                        name,
                        error,
                    });
                }
            }
        }

        if meshes.len() != declared_count as usize {
            tracing::warn!(
                "Decoded {} of {} declared meshes",
                meshes.len(),
                declared_count
            );
        }

        Ok(Self {
            base,
            header,
            declared_count,
            table_offset,
            meshes,
            rejected,
        })
    }
}

/// Follow the descriptor to the mesh count and the absolute table offset.
fn locate_mesh_table<R: Read + Seek>(
    cursor: &mut BinaryCursor<R>,
    base: u64,
    descriptor_offset: u32,
) -> Result<(u32, u64)> {
    cursor.seek(base + u64::from(descriptor_offset))?;
    let [pointer, packed] = cursor.read_u32s::<2>()?;
    let count = packed >> 16;
    if count == 0 {
        return Err(Error::Validity {
            message: "cannot estimate the number of meshes".to_string(),
        });
    }

    cursor.seek(base + u64::from(pointer))?;
    let table = cursor.read_u32()?;
    let Some(table) = table.checked_sub(TABLE_POINTER_BIAS) else {
        return Err(Error::Bounds {
            what: "mesh table",
            offset: u64::from(table),
            file_size: cursor.len(),
        });
    };
    let table_offset = base + u64::from(table);
    check_pointer("mesh table", table_offset, cursor.len())?;
    Ok((count, table_offset))
}

/// Walk the mesh table, keeping the entries that look like real meshes.
fn read_mesh_table<R: Read + Seek>(
    cursor: &mut BinaryCursor<R>,
    table_offset: u64,
    count: u32,
) -> Result<Vec<MeshRecord>> {
    cursor.seek(table_offset)?;

    let mut records = Vec::new();
    let mut previous_offset = 0u32;
    for table_index in 0..count as usize {
        let bone_indices = read_bone_mapping(cursor)?;
        let words = match cursor.read_u32s::<MESH_RECORD_WORDS>() {
            Ok(words) => words,
            Err(e) => {
                tracing::error!("[idx={table_index:02}] Mesh table ends early: {e}");
                break;
            }
        };

        let vertex_count = words[0] & 0xFFFF;
        let face_count = (words[0] >> 16) / 3;
        let data_offset = words[1];

        if data_offset <= previous_offset {
            tracing::warn!(
                "[idx={table_index:02}] Data offset 0x{data_offset:08x} does not follow the previous mesh, skip"
            );
            continue;
        }
        if vertex_count == 0 {
            tracing::warn!("[idx={table_index:02}] Mesh has no vertices, skip");
            continue;
        }
        if face_count == 0 {
            tracing::warn!("[idx={table_index:02}] Mesh has no faces, skip");
            continue;
        }
        if bone_indices.is_empty() {
            tracing::warn!("[idx={table_index:02}] Mesh has no bone mapping, skip");
            continue;
        }

        tracing::debug!(
            "[idx={:02}] data_offset=0x{:08x} vertices={} faces={} mapping={}",
            table_index,
            data_offset,
            vertex_count,
            face_count,
            bone_indices.len()
        );
        records.push(MeshRecord {
            table_index,
            vertex_count,
            face_count,
            data_offset,
            bone_indices,
        });
        previous_offset = data_offset;
    }
    Ok(records)
}

/// Read a zero-terminated list of `(start << 16) | run` slots, padded to 16 bytes.
///
/// A mapping listing more bones than the file has words is garbage and comes
/// back empty, so the entry is skipped.
fn read_bone_mapping<R: Read + Seek>(cursor: &mut BinaryCursor<R>) -> Result<Vec<u32>> {
    let start_offset = cursor.tell();
    let limit = cursor.len() / 4;
    let mut indices = Vec::new();
    let mut overflow = false;
    let mut consumed = 0u64;
    loop {
        let slot = match cursor.read_u32() {
            Ok(slot) => slot,
            Err(Error::IncompleteData { .. }) => break,
            Err(e) => return Err(e),
        };
        consumed += 4;
        if slot == 0 {
            break;
        }
        let run = slot & 0xFFFF;
        let start = slot >> 16;
        if overflow || indices.len() as u64 + u64::from(run) > limit {
            overflow = true;
            continue;
        }
        indices.extend(start..start + run);
    }
    cursor.skip_padding(consumed, STREAM_ALIGNMENT)?;
    if overflow {
        tracing::warn!(
            "Bone mapping at 0x{start_offset:08x} lists more bones than the file holds words, dropped"
        );
        indices.clear();
    }
    Ok(indices)
}

fn mesh_name(data_offset: u32) -> String {
    format!("mesh_{data_offset:08x}")
}

// ============================================================================
// Mesh Streams
// ============================================================================

impl MeshEntry {
    fn read<R: Read + Seek>(
        cursor: &mut BinaryCursor<R>,
        base: u64,
        record: &MeshRecord,
        name: String,
    ) -> Result<Self> {
        cursor.seek(base + u64::from(record.data_offset))?;

        let mut mesh = Self {
            name,
            vertex_count: record.vertex_count,
            face_count: record.face_count,
            data_offset: record.data_offset,
            bone_indices: record.bone_indices.clone(),
            addresses: AttributeAddresses::default(),
            faces: Vec::with_capacity(record.face_count as usize),
            min_face_index: 0,
            max_face_index: 0,
            positions: Vec::with_capacity(record.vertex_count as usize),
            normals: Vec::with_capacity(record.vertex_count as usize),
            tangents: Vec::with_capacity(record.vertex_count as usize),
            binormals: Vec::with_capacity(record.vertex_count as usize),
            weights: Vec::with_capacity(record.vertex_count as usize),
            blend_indices: Vec::with_capacity(record.vertex_count as usize),
            max_blend_index: 0,
            unmapped_blend_indices: 0,
            texcoords: Vec::with_capacity(record.vertex_count as usize),
            end_offset: 0,
        };

        mesh.read_faces(cursor)?;
        mesh.read_vertices(cursor)?;
        mesh.read_texcoords(cursor)?;
        mesh.end_offset = cursor.tell();
        Ok(mesh)
    }

    fn read_faces<R: Read + Seek>(&mut self, cursor: &mut BinaryCursor<R>) -> Result<()> {
        self.addresses.faces = cursor.tell();
        let index_count = self.face_count as usize * 3;
        let indices = cursor.read_u16_array(index_count)?;

        let min = indices.iter().copied().min().unwrap_or(0);
        let max = indices.iter().copied().max().unwrap_or(0);
        if u32::from(max) + 1 > self.vertex_count {
            return Err(Error::Validity {
                message: format!(
                    "face index {max} exceeds vertex range 0..{}",
                    self.vertex_count
                ),
            });
        }
        self.min_face_index = min;
        self.max_face_index = max;
        self.faces = indices
            .chunks_exact(3)
            .map(|face| [face[0], face[1], face[2]])
            .collect();

        cursor.skip_padding(index_count as u64 * 2, STREAM_ALIGNMENT)
    }

    fn read_vertices<R: Read + Seek>(&mut self, cursor: &mut BinaryCursor<R>) -> Result<()> {
        for vertex in 0..self.vertex_count {
            let first = vertex == 0;

            if first {
                self.addresses.positions = cursor.tell();
            }
            self.positions.push(read_vec3(cursor)?);

            if first {
                self.addresses.normals = cursor.tell();
            }
            self.normals.push(read_vec3(cursor)?);

            if first {
                self.addresses.tangents = cursor.tell();
            }
            self.tangents.push(read_vec3(cursor)?);

            if first {
                self.addresses.binormals = cursor.tell();
            }
            self.binormals.push(read_vec3(cursor)?);

            if first {
                self.addresses.weights = cursor.tell();
            }
            self.weights.push(read_vec3(cursor)?);

            if first {
                self.addresses.blend_indices = cursor.tell();
            }
            let raw = cursor.read_bytes(4)?;
            let mut mapped = [0u32; 4];
            for (slot, &local) in mapped.iter_mut().zip(raw.iter()) {
                self.max_blend_index = self.max_blend_index.max(local);
                *slot = match self.bone_indices.get(local as usize) {
                    Some(&bone) => bone,
                    None => {
                        self.unmapped_blend_indices += 1;
                        u32::from(local)
                    }
                };
            }
            self.blend_indices.push(mapped);
        }

        if self.unmapped_blend_indices > 0 {
            tracing::warn!(
                "{}: {} blend indices are outside the bone mapping",
                self.name,
                self.unmapped_blend_indices
            );
        }
        Ok(())
    }

    fn read_texcoords<R: Read + Seek>(&mut self, cursor: &mut BinaryCursor<R>) -> Result<()> {
        self.addresses.texcoords = cursor.tell();
        for _ in 0..self.vertex_count {
            let u = cursor.read_f16()?;
            let v = cursor.read_f16()?;
            self.texcoords.push([u, v]);
        }
        cursor.skip_padding(u64::from(self.vertex_count) * TEXCOORD_STRIDE, STREAM_ALIGNMENT)
    }
}

impl fmt::Display for MeshEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let a = &self.addresses;
        writeln!(f, "[{}]", self.name)?;
        writeln!(f, "  offset        = 0x{:08X}", self.data_offset)?;
        writeln!(
            f,
            "  faces         = {} (0x{:X}, index {}..={})",
            self.face_count, a.faces, self.min_face_index, self.max_face_index
        )?;
        writeln!(f, "  vertices      = {}", self.vertex_count)?;
        writeln!(f, "  positions     = 0x{:X}", a.positions)?;
        writeln!(f, "  normals       = 0x{:X}", a.normals)?;
        writeln!(f, "  tangents      = 0x{:X}", a.tangents)?;
        writeln!(f, "  binormals     = 0x{:X}", a.binormals)?;
        writeln!(f, "  weights       = 0x{:X}", a.weights)?;
        writeln!(
            f,
            "  blend indices = 0x{:X} (max {})",
            a.blend_indices, self.max_blend_index
        )?;
        writeln!(f, "  texcoords     = 0x{:X}", a.texcoords)?;
        write!(f, "  end           = 0x{:X}", self.end_offset)
    }
}

fn read_vec3<R: Read + Seek>(cursor: &mut BinaryCursor<R>) -> Result<[f32; 3]> {
    Ok([cursor.read_f32()?, cursor.read_f32()?, cursor.read_f32()?])
}

#[cfg(test)]
mod tests {
    use super::*;

    struct SectionBuilder {
        data: Vec<u8>,
    }

    impl SectionBuilder {
        fn u32(&mut self, value: u32) {
            self.data.extend_from_slice(&value.to_be_bytes());
        }
        fn u16(&mut self, value: u16) {
            self.data.extend_from_slice(&value.to_be_bytes());
        }
        fn f32(&mut self, value: f32) {
            self.u32(value.to_bits());
        }
        fn pad(&mut self) {
            while self.data.len() % 16 != 0 {
                self.data.push(0);
            }
        }
    }

    /// One-triangle mesh section at offset 0. `face` sets the third index.
    fn single_mesh_section(third_index: u16) -> Vec<u8> {
        let mut b = SectionBuilder { data: Vec::new() };
        // Header: descriptor at 0x30
        b.u32(MESH_SECTION_PREFIX);
        for _ in 1..10 {
            b.u32(0);
        }
        b.u32(0x30);
        b.u32(0);
        // Descriptor: pointer word at 0x40, one mesh
        b.u32(0x40);
        b.u32(1 << 16);
        b.pad();
        // Table pointer: table at 0x50
        b.u32(0x50 + 16);
        b.pad();
        // Mapping: bones 5, 6, 7
        b.u32((5 << 16) | 3);
        b.u32(0);
        b.pad();
        // Mesh record at 0x60: 3 vertices, 1 face, data at 0x90
        b.u32((3 << 16) | 3);
        b.u32(0x90);
        for _ in 2..12 {
            b.u32(0);
        }
        assert_eq!(b.data.len(), 0x90);
        // Faces
        b.u16(0);
        b.u16(1);
        b.u16(third_index);
        b.pad();
        // Vertices
        for v in 0..3u8 {
            for attribute in 0..5 {
                let value = f32::from(v) + attribute as f32 * 0.25;
                b.f32(value);
                b.f32(value);
                b.f32(value);
            }
            b.data.extend_from_slice(&[v, 2, 9, 0]);
        }
        // Texcoords: 1.0, 0.5 as half floats
        for _ in 0..3 {
            b.u16(0x3C00);
            b.u16(0x3800);
        }
        b.pad();
        b.data
    }

    #[test]
    fn test_bone_mapping_runs() {
        let mut data = Vec::new();
        for slot in [(3u32 << 16) | 2, (10 << 16) | 1, 0] {
            data.extend_from_slice(&slot.to_be_bytes());
        }
        data.resize(32, 0xAA);
        let mut cursor = BinaryCursor::from_bytes(&data);
        assert_eq!(read_bone_mapping(&mut cursor).unwrap(), vec![3, 4, 10]);
        assert_eq!(cursor.tell(), 16);
    }

    #[test]
    fn test_oversized_bone_mapping_is_dropped() {
        let mut data = Vec::new();
        for slot in [(3u32 << 16) | 2, 0xFFFF, 0] {
            data.extend_from_slice(&slot.to_be_bytes());
        }
        data.resize(32, 0);
        let mut cursor = BinaryCursor::from_bytes(&data);
        assert!(read_bone_mapping(&mut cursor).unwrap().is_empty());
        assert_eq!(cursor.tell(), 16);
    }

    const TRIANGLE: u32 = (3 << 16) | 3;
    const MAPPING: u32 = (5 << 16) | 3;

    /// Offset of the `block`-th triangle data block after a table of `entries`.
    fn block_offset(entries: usize, block: usize) -> u32 {
        (0x50 + entries * 64 + block * 0xE0) as u32
    }

    /// Mesh section with one table entry per `(mapping slot, counts word, data offset)`,
    /// followed by `blocks` one-triangle data blocks.
    fn table_section(entries: &[(u32, u32, u32)], blocks: usize) -> Vec<u8> {
        let mut b = SectionBuilder { data: Vec::new() };
        b.u32(MESH_SECTION_PREFIX);
        for _ in 1..10 {
            b.u32(0);
        }
        b.u32(0x30);
        b.u32(0);
        b.u32(0x40);
        b.u32((entries.len() as u32) << 16);
        b.pad();
        b.u32(0x50 + 16);
        b.pad();
        for &(slot, counts, data_offset) in entries {
            b.u32(slot);
            b.u32(0);
            b.pad();
            b.u32(counts);
            b.u32(data_offset);
            for _ in 2..12 {
                b.u32(0);
            }
        }
        assert_eq!(b.data.len() as u32, block_offset(entries.len(), 0));
        for _ in 0..blocks {
            b.u16(0);
            b.u16(1);
            b.u16(2);
            b.pad();
            b.data.resize(b.data.len() + 3 * VERTEX_STRIDE as usize, 0);
            for _ in 0..3 {
                b.u16(0x3C00);
                b.u16(0x3800);
            }
            b.pad();
        }
        b.data
    }

    fn decoded_offsets(data: &[u8]) -> Vec<u32> {
        let mut cursor = BinaryCursor::from_bytes(data);
        let section = MeshSection::read(&mut cursor, 0).unwrap();
        assert!(section.rejected.is_empty());
        section.meshes.iter().map(|mesh| mesh.data_offset).collect()
    }

    #[test]
    fn test_zero_data_offset_is_skipped() {
        let entries = [(MAPPING, TRIANGLE, 0), (MAPPING, TRIANGLE, block_offset(2, 0))];
        let data = table_section(&entries, 1);
        assert_eq!(decoded_offsets(&data), vec![block_offset(2, 0)]);
    }

    #[test]
    fn test_backward_data_offset_is_skipped() {
        let entries = [
            (MAPPING, TRIANGLE, block_offset(3, 1)),
            (MAPPING, TRIANGLE, block_offset(3, 0)),
            (MAPPING, TRIANGLE, block_offset(3, 2)),
        ];
        let data = table_section(&entries, 3);
        assert_eq!(decoded_offsets(&data), vec![block_offset(3, 1), block_offset(3, 2)]);
    }

    #[test]
    fn test_mesh_without_vertices_is_skipped() {
        let entries = [
            (MAPPING, 3 << 16, block_offset(2, 0)),
            (MAPPING, TRIANGLE, block_offset(2, 0)),
        ];
        let data = table_section(&entries, 1);
        assert_eq!(decoded_offsets(&data), vec![block_offset(2, 0)]);
    }

    #[test]
    fn test_mesh_without_faces_is_skipped() {
        // Two indices make no whole triangle
        let entries = [
            (MAPPING, (2 << 16) | 3, block_offset(2, 0)),
            (MAPPING, TRIANGLE, block_offset(2, 0)),
        ];
        let data = table_section(&entries, 1);
        assert_eq!(decoded_offsets(&data), vec![block_offset(2, 0)]);
    }

    #[test]
    fn test_mesh_without_bone_mapping_is_skipped() {
        let entries = [(0, TRIANGLE, block_offset(2, 0)), (MAPPING, TRIANGLE, block_offset(2, 0))];
        let data = table_section(&entries, 1);
        let mut cursor = BinaryCursor::from_bytes(&data);
        let section = MeshSection::read(&mut cursor, 0).unwrap();
        assert_eq!(section.declared_count, 2);
        assert_eq!(section.meshes.len(), 1);
        assert_eq!(section.meshes[0].data_offset, block_offset(2, 0));
        assert_eq!(section.meshes[0].bone_indices, vec![5, 6, 7]);
    }

    #[test]
    fn test_decode_single_mesh() {
        let data = single_mesh_section(2);
        let mut cursor = BinaryCursor::from_bytes(&data);
        let section = MeshSection::read(&mut cursor, 0).unwrap();

        assert_eq!(section.declared_count, 1);
        assert_eq!(section.table_offset, 0x50);
        assert!(section.rejected.is_empty());
        assert_eq!(section.meshes.len(), 1);

        let mesh = &section.meshes[0];
        assert_eq!(mesh.name, "mesh_00000090");
        assert_eq!(mesh.vertex_count, 3);
        assert_eq!(mesh.face_count, 1);
        assert_eq!(mesh.bone_indices, vec![5, 6, 7]);
        assert_eq!(mesh.faces, vec![[0, 1, 2]]);
        assert_eq!(mesh.max_face_index, 2);

        assert_eq!(mesh.addresses.faces, 0x90);
        assert_eq!(mesh.addresses.positions, 0xA0);
        assert_eq!(mesh.addresses.normals, 0xAC);
        assert_eq!(mesh.addresses.weights, 0xA0 + 48);
        assert_eq!(mesh.addresses.blend_indices, 0xA0 + 60);
        assert_eq!(mesh.addresses.texcoords, 0xA0 + 3 * VERTEX_STRIDE);
        assert_eq!(mesh.end_offset, 0xA0 + 3 * VERTEX_STRIDE + 16);

        // Local 2 maps to bone 7; 9 is outside the mapping
        assert_eq!(mesh.blend_indices[1], [6, 7, 9, 5]);
        assert_eq!(mesh.unmapped_blend_indices, 3);
        assert_eq!(mesh.max_blend_index, 9);
        assert_eq!(mesh.texcoords[0], [1.0, 0.5]);
        assert_eq!(mesh.positions[2], [2.0, 2.0, 2.0]);
        assert_eq!(mesh.normals[1], [1.25, 1.25, 1.25]);
    }

    #[test]
    fn test_mesh_dump_lists_stream_addresses() {
        let data = single_mesh_section(2);
        let mut cursor = BinaryCursor::from_bytes(&data);
        let section = MeshSection::read(&mut cursor, 0).unwrap();
        let dump = section.meshes[0].to_string();

        assert!(dump.starts_with("[mesh_00000090]\n"));
        assert!(dump.contains("faces         = 1 (0x90, index 0..=2)"));
        assert!(dump.contains("positions     = 0xA0"));
        assert!(dump.contains("blend indices = 0xDC (max 9)"));
        assert!(dump.contains("texcoords     = 0x160"));
        assert!(dump.ends_with("end           = 0x170"));
    }

    #[test]
    fn test_face_index_past_vertices_is_rejected() {
        let data = single_mesh_section(3);
        let mut cursor = BinaryCursor::from_bytes(&data);
        let section = MeshSection::read(&mut cursor, 0).unwrap();

        assert!(section.meshes.is_empty());
        assert_eq!(section.rejected.len(), 1);
        assert_eq!(section.rejected[0].name, "mesh_00000090");
        assert!(matches!(section.rejected[0].error, Error::Validity { .. }));
    }

    #[test]
    fn test_truncated_vertices_reject_only_that_mesh() {
        let mut data = single_mesh_section(2);
        data.truncate(0xA0 + 70);
        let mut cursor = BinaryCursor::from_bytes(&data);
        let section = MeshSection::read(&mut cursor, 0).unwrap();

        assert!(section.meshes.is_empty());
        assert!(matches!(
            section.rejected[0].error,
            Error::IncompleteData { .. }
        ));
    }

    #[test]
    fn test_section_at_offset() {
        let mut data = vec![0u8; 0x100];
        data.extend(single_mesh_section(2));
        let mut cursor = BinaryCursor::from_bytes(&data);
        let section = MeshSection::read(&mut cursor, 0x100).unwrap();
        assert_eq!(section.meshes[0].name, "mesh_00000090");
        assert_eq!(section.meshes[0].addresses.faces, 0x190);
    }

    #[test]
    fn test_wrong_prefix() {
        let mut data = single_mesh_section(2);
        data[1] = 0x4D;
        let mut cursor = BinaryCursor::from_bytes(&data);
        assert!(matches!(
            MeshSection::read(&mut cursor, 0),
            Err(Error::Structural { section: "mesh", .. })
        ));
    }

    #[test]
    fn test_zero_declared_meshes() {
        let mut data = single_mesh_section(2);
        data[0x34..0x38].copy_from_slice(&0u32.to_be_bytes());
        let mut cursor = BinaryCursor::from_bytes(&data);
        assert!(matches!(
            MeshSection::read(&mut cursor, 0),
            Err(Error::Validity { .. })
        ));
    }
}
