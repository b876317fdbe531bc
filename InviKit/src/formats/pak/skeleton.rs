//! Bone section decoder
//!
//! The bone section has no explicit bone count. The matrix block is found by
//! scanning for the `[0, 0, 0, 1]` fourth column that closes an affine 4x4
//! matrix, and the number of consecutive matrices of that shape is the bone
//! count. Bone records then give each bone its name and a backward pointer
//! to its parent's record.
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: MIT

use std::fmt;
use std::io::{Read, Seek};

use glam::{Mat3, Mat4, Vec3};

use crate::error::{Error, Result};
use crate::formats::common::{BinaryCursor, F32_ONE_BITS};

/// Magic prefix of a bone section.
pub const BONE_SECTION_PREFIX: u32 = 0x1703_0000;

const SECTION_HEADER_WORDS: usize = 12;
const SECTION_HEADER_SIZE: u64 = 0x30;
/// Header word holding the matrix block offset relative to the section.
const MATRIX_POINTER_WORD: usize = 4;
/// Bone records start inside the header, at this offset from the section.
const BONE_TABLE_OFFSET: u64 = 0x28;
const BONE_RECORD_WORDS: usize = 7;

const MATRIX_SIZE: u64 = 64;

// ============================================================================
// Matrices
// ============================================================================

/// A 4x4 bone matrix as stored: four rows, the fourth row holding the offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoneMatrix {
    pub rows: [[f32; 4]; 4],
}

impl BoneMatrix {
    /// Reinterpret sixteen raw words as the matrix elements.
    #[must_use]
    pub fn from_words(words: &[u32; 16]) -> Self {
        let mut rows = [[0.0f32; 4]; 4];
        for (i, word) in words.iter().enumerate() {
            rows[i / 4][i % 4] = f32::from_bits(*word);
        }
        Self { rows }
    }

    /// Whether sixteen words have the `0, 0, 0, 1.0` fourth column of an affine matrix.
    #[must_use]
    pub fn is_affine(words: &[u32; 16]) -> bool {
        words[3] == 0 && words[7] == 0 && words[11] == 0 && words[15] == F32_ONE_BITS
    }

    /// Length of each of the first three columns over rows 0..3.
    #[must_use]
    pub fn scale(&self) -> [f32; 3] {
        let r = &self.rows;
        std::array::from_fn(|axis| {
            (r[0][axis] * r[0][axis] + r[1][axis] * r[1][axis] + r[2][axis] * r[2][axis]).sqrt()
        })
    }

    /// Position of the bone: the stored rotation applied to the negated offset row.
    #[must_use]
    pub fn world_translation(&self) -> [f32; 3] {
        let r = &self.rows;
        let rotation = Mat3::from_cols_array_2d(&[
            [r[0][0], r[0][1], r[0][2]],
            [r[1][0], r[1][1], r[1][2]],
            [r[2][0], r[2][1], r[2][2]],
        ])
        .transpose();
        let offset = Vec3::new(r[3][0], r[3][1], r[3][2]);

        let combined = Mat4::from_mat3(rotation) * Mat4::from_translation(-offset);
        combined.w_axis.truncate().to_array()
    }
}

// ============================================================================
// Bones
// ============================================================================

/// How a bone record refers to its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParentRef {
    /// Parent offset is zero
    Root,
    /// Parent record resolved to a bone of this skeleton
    Bone(usize),
    /// Parent record carries an id past the bone count
    OutOfRange { id: u32 },
    /// Parent record could not be read
    Unreadable { offset: u32 },
}

impl ParentRef {
    /// Index for output: the parent bone, or -1 for roots and broken links.
    #[must_use]
    pub fn index(self) -> i32 {
        match self {
            Self::Bone(index) => index as i32,
            _ => -1,
        }
    }
}

/// One decoded bone.
#[derive(Debug, Clone, PartialEq)]
pub struct BoneNode {
    /// Position in the bone table
    pub index: usize,
    pub id: u32,
    pub name: String,
    pub parent: ParentRef,
    pub matrix: BoneMatrix,
    pub scale: [f32; 3],
    /// Raw xyz stored in the bone record
    pub local: [f32; 3],
    /// Filled once every matrix is known
    pub translation: [f32; 3],
}

impl BoneNode {
    #[must_use]
    pub fn parent_index(&self) -> i32 {
        self.parent.index()
    }
}

impl fmt::Display for BoneNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} (id {}, parent {})", self.name, self.id, self.parent_index())?;
        for (i, row) in self.matrix.rows.iter().enumerate() {
            writeln!(
                f,
                "  TX{} : {:.4}, {:.4}, {:.4}, {:.4}",
                i + 1,
                row[0],
                row[1],
                row[2],
                row[3]
            )?;
        }
        let [sx, sy, sz] = self.scale;
        writeln!(f, "  SCL : {sx:.4}, {sy:.4}, {sz:.4}")?;
        let [lx, ly, lz] = self.local;
        writeln!(f, "  LOC : {lx:.4}, {ly:.4}, {lz:.4}")?;
        let [x, y, z] = self.translation;
        write!(f, "  VAL : {x:.4}, {y:.4}, {z:.4}")
    }
}

/// Everything decoded from one bone section.
#[derive(Debug, Clone, PartialEq)]
pub struct SkeletonSection {
    pub base: u64,
    pub header: [u32; SECTION_HEADER_WORDS],
    /// Absolute offset of the matrix block
    pub matrix_offset: u64,
    pub bones: Vec<BoneNode>,
}

impl SkeletonSection {
    /// Decode the bone section starting at `base`.
    pub fn read<R: Read + Seek>(cursor: &mut BinaryCursor<R>, base: u64) -> Result<Self> {
        cursor.seek(base)?;
        let header = cursor.read_u32s::<SECTION_HEADER_WORDS>()?;
        if header[0] != BONE_SECTION_PREFIX {
            return Err(Error::Structural {
                section: "bone",
                expected: BONE_SECTION_PREFIX,
                found: header[0],
            });
        }

        let matrix_offset =
            find_matrix_block(cursor, base + SECTION_HEADER_SIZE)?.ok_or(Error::BoneMatrixNotFound)?;
        let expected = base + u64::from(header[MATRIX_POINTER_WORD]);
        if matrix_offset != expected {
            return Err(Error::BoneMatrixMismatch {
                found: matrix_offset,
                expected,
            });
        }
        tracing::debug!("[Offset] Bone Matrix  : 0x{:08X}", matrix_offset);

        let matrices = read_matrix_run(cursor, matrix_offset)?;
        if matrices.is_empty() {
            return Err(Error::Validity {
                message: "cannot estimate the number of bones".to_string(),
            });
        }
        tracing::debug!("Bones Number          : {}", matrices.len());

        let mut bones = read_bone_table(cursor, base, matrices)?;
        for bone in &mut bones {
            bone.translation = bone.matrix.world_translation();
        }

        Ok(Self {
            base,
            header,
            matrix_offset,
            bones,
        })
    }
}

// ============================================================================
// Scanning
// ============================================================================

/// Scan 16-byte rows from `start` for the last row of an affine matrix.
///
/// A row matches when its fourth word is `1.0` and the three rows before it
/// end in zero. Returns the offset of the matrix that row closes, or `None`
/// when the end of the file is reached first.
pub fn find_matrix_block<R: Read + Seek>(
    cursor: &mut BinaryCursor<R>,
    start: u64,
) -> Result<Option<u64>> {
    cursor.seek(start)?;

    let mut window = [u32::MAX; 4];
    loop {
        let row = match cursor.read_u32s::<4>() {
            Ok(row) => row,
            Err(Error::IncompleteData { .. }) => return Ok(None),
            Err(e) => return Err(e),
        };
        window.rotate_left(1);
        window[3] = row[3];

        if window == [0, 0, 0, F32_ONE_BITS] {
            let end = cursor.tell();
            return Ok(end.checked_sub(MATRIX_SIZE).filter(|&offset| offset > 0));
        }
    }
}

/// Read consecutive affine matrices from `offset`. A short read ends the run.
fn read_matrix_run<R: Read + Seek>(
    cursor: &mut BinaryCursor<R>,
    offset: u64,
) -> Result<Vec<BoneMatrix>> {
    cursor.seek(offset)?;
    let mut matrices = Vec::new();
    loop {
        let words = match cursor.read_u32s::<16>() {
            Ok(words) => words,
            Err(Error::IncompleteData { offset, .. }) => {
                tracing::warn!("Bone matrix run cut short at 0x{offset:08X}");
                break;
            }
            Err(e) => return Err(e),
        };
        if !BoneMatrix::is_affine(&words) {
            break;
        }
        matrices.push(BoneMatrix::from_words(&words));
    }
    Ok(matrices)
}

fn read_bone_table<R: Read + Seek>(
    cursor: &mut BinaryCursor<R>,
    base: u64,
    matrices: Vec<BoneMatrix>,
) -> Result<Vec<BoneNode>> {
    let bone_count = matrices.len();
    cursor.seek(base + BONE_TABLE_OFFSET)?;

    let mut bones = Vec::with_capacity(bone_count);
    for (index, matrix) in matrices.into_iter().enumerate() {
        let words = cursor.read_u32s::<BONE_RECORD_WORDS>()?;
        let local = [
            f32::from_bits(words[0]),
            f32::from_bits(words[1]),
            f32::from_bits(words[2]),
        ];
        let id = words[3] >> 16;

        let name = match cursor.with_position(base + u64::from(words[6]), BinaryCursor::read_string) {
            Ok(name) => name,
            Err(e) => {
                tracing::warn!("Bone {index} name unreadable: {e}");
                format!("bone_{index}")
            }
        };

        let parent = resolve_parent(cursor, base, words[4], bone_count);
        if let ParentRef::OutOfRange { id } = parent {
            tracing::warn!("Bone {index} ({name}) refers to parent id {id} of {bone_count}");
        }

        bones.push(BoneNode {
            index,
            id,
            name,
            parent,
            scale: matrix.scale(),
            matrix,
            local,
            translation: [0.0; 3],
        });
    }
    Ok(bones)
}

/// Look up the record at `base + parent_offset` and take its id as the parent index.
fn resolve_parent<R: Read + Seek>(
    cursor: &mut BinaryCursor<R>,
    base: u64,
    parent_offset: u32,
    bone_count: usize,
) -> ParentRef {
    if parent_offset == 0 {
        return ParentRef::Root;
    }
    let record = cursor.with_position(base + u64::from(parent_offset), |c| {
        c.read_u32s::<BONE_RECORD_WORDS>()
    });
    match record {
        Ok(words) => {
            let id = words[3] >> 16;
            if (id as usize) < bone_count {
                ParentRef::Bone(id as usize)
            } else {
                ParentRef::OutOfRange { id }
            }
        }
        Err(e) => {
            tracing::warn!("Cannot read parent bone at +0x{parent_offset:X}: {e}");
            ParentRef::Unreadable {
                offset: parent_offset,
            }
        }
    }
}
