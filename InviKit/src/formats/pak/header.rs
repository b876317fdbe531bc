//! PAK package header and entry pointer table
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: MIT

use std::io::{Read, Seek};

use crate::error::{Error, Result};
use crate::formats::common::{BinaryCursor, check_pointer};

/// Magic prefix of a PAK file.
pub const PAK_PREFIX: u32 = 0x020E_0000;

/// Second header word of every mesh package seen so far.
pub const PAK_MESH_MARKER: u32 = 0x0000_0044;

/// Known package layout versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageVersion {
    V1,
    V2,
}

impl PackageVersion {
    #[must_use]
    pub fn from_word(word: u32) -> Option<Self> {
        match word {
            0x0001_0001 => Some(Self::V1),
            0x0001_0002 => Some(Self::V2),
            _ => None,
        }
    }
}

/// The 32-byte header at the start of a PAK file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackageHeader {
    pub prefix: u32,
    pub marker: u32,
    pub version: u32,
    pub entry_offset: u32,
    pub edo_offset: u32,
    pub padding: [u32; 3],
}

impl PackageHeader {
    pub fn read<R: Read + Seek>(cursor: &mut BinaryCursor<R>) -> Result<Self> {
        cursor.seek(0)?;
        let [prefix, marker, version, entry_offset, edo_offset, pad0, pad1, pad2] =
            cursor.read_u32s::<8>()?;
        Ok(Self {
            prefix,
            marker,
            version,
            entry_offset,
            edo_offset,
            padding: [pad0, pad1, pad2],
        })
    }

    /// Check that this is a mesh package we know how to walk.
    pub fn validate(&self, file_size: u64) -> Result<PackageVersion> {
        if self.prefix != PAK_PREFIX {
            return Err(unrecognized(format!(
                "prefix is 0x{:08X}, expected 0x{PAK_PREFIX:08X}",
                self.prefix
            )));
        }
        if self.marker != PAK_MESH_MARKER {
            return Err(unrecognized(format!(
                "not a standard mesh package (unk0=0x{:08X})",
                self.marker
            )));
        }
        let version = PackageVersion::from_word(self.version).ok_or_else(|| {
            unrecognized(format!(
                "not a standard mesh package (unk1=0x{:08X})",
                self.version
            ))
        })?;
        check_pointer("entry", u64::from(self.entry_offset), file_size)
            .map_err(|e| unrecognized(e.to_string()))?;
        check_pointer("EDO", u64::from(self.edo_offset), file_size)
            .map_err(|e| unrecognized(e.to_string()))?;
        Ok(version)
    }
}

fn unrecognized(reason: String) -> Error {
    Error::UnrecognizedPackage { reason }
}

/// Section pointers stored at the header's entry offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryPointer {
    pub mesh_offset: u32,
    pub unknown0: u32,
    pub bone_offset: u32,
    pub unknown1: u32,
    pub aux_offset: u32,
}

impl EntryPointer {
    pub fn read<R: Read + Seek>(cursor: &mut BinaryCursor<R>, offset: u64) -> Result<Self> {
        cursor.seek(offset)?;
        let [mesh_offset, unknown0, bone_offset, unknown1, aux_offset] = cursor.read_u32s::<5>()?;
        Ok(Self {
            mesh_offset,
            unknown0,
            bone_offset,
            unknown1,
            aux_offset,
        })
    }

    pub fn validate(&self, file_size: u64) -> Result<()> {
        check_pointer("mesh section", u64::from(self.mesh_offset), file_size)?;
        check_pointer("bone section", u64::from(self.bone_offset), file_size)?;
        check_pointer("auxiliary section", u64::from(self.aux_offset), file_size)?;
        Ok(())
    }
}
