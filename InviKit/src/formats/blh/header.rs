//! BLH bundle header and string table
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: MIT

use std::fmt;
use std::io::{Read, Seek};
use std::path::Path;

use super::texture::TextureDescriptor;
use crate::error::{Error, Result};
use crate::formats::common::BinaryCursor;

/// Magic prefix of every BLH file.
pub const BLH_PREFIX: u32 = 0x040E_0000;

/// Size of the fixed header in front of the texture records.
pub const BLH_HEADER_SIZE: u64 = 32;

/// Parsed BLH file: header words plus one descriptor per texture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleHeader {
    pub prefix: u32,
    pub unknown0: u32,
    /// Absolute offset of the name pointer table
    pub string_table: u32,
    pub unknown1: u32,
    /// Declared number of textures
    pub count: u32,
    pub unknown2: u32,
    pub padding: [u32; 2],
    pub textures: Vec<TextureDescriptor>,
}

impl BundleHeader {
    /// Open and parse a BLH file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut cursor = BinaryCursor::open(path)?;
        let bundle = Self::read(&mut cursor)?;
        tracing::info!("{} parsed: {} textures", path.display(), bundle.textures.len());
        Ok(bundle)
    }

    /// Parse a bundle header from the start of the cursor.
    ///
    /// A bad prefix is fatal. A truncated record table keeps the records read
    /// so far; a missing or truncated string table keeps the default names.
    pub fn read<R: Read + Seek>(cursor: &mut BinaryCursor<R>) -> Result<Self> {
        cursor.seek(0)?;
        let [prefix, unknown0, string_table, unknown1, count, unknown2, padding0, padding1] =
            cursor.read_u32s::<8>()?;

        if prefix != BLH_PREFIX {
            tracing::error!("BLH prefix is not 0x{BLH_PREFIX:08X}");
            return Err(Error::Structural {
                section: "bundle",
                expected: BLH_PREFIX,
                found: prefix,
            });
        }

        let mut textures = Vec::with_capacity((count as usize).min(4096));
        for index in 0..count {
            match TextureDescriptor::read(cursor) {
                Ok(texture) => textures.push(texture),
                Err(e) => {
                    tracing::error!("Texture record {index} is truncated: {e}");
                    break;
                }
            }
        }

        let mut bundle = Self {
            prefix,
            unknown0,
            string_table,
            unknown1,
            count,
            unknown2,
            padding: [padding0, padding1],
            textures,
        };
        bundle.read_names(cursor);
        Ok(bundle)
    }

    fn read_names<R: Read + Seek>(&mut self, cursor: &mut BinaryCursor<R>) {
        if u64::from(self.string_table) >= cursor.len() {
            tracing::warn!("Invalid string table pointer, cannot build texture file names");
            return;
        }

        let pointers = match cursor
            .seek(u64::from(self.string_table))
            .and_then(|()| cursor.read_u32_array(self.count as usize))
        {
            Ok(pointers) => pointers,
            Err(e) => {
                tracing::warn!("String table is too small, cannot build texture file names: {e}");
                return;
            }
        };

        for (index, (texture, pointer)) in self.textures.iter_mut().zip(pointers).enumerate() {
            let name = cursor
                .seek(u64::from(pointer))
                .and_then(|()| cursor.read_string());
            match name {
                Ok(name) if !name.is_empty() => texture.name = name,
                Ok(_) => {}
                Err(e) => tracing::warn!("Texture {index} name unreadable at 0x{pointer:08X}: {e}"),
            }
        }
    }
}

impl fmt::Display for BundleHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "prefix        = 0x{:08X}", self.prefix)?;
        writeln!(f, "unknown0      = 0x{:08X}", self.unknown0)?;
        writeln!(f, "string_table  = 0x{:08X}", self.string_table)?;
        writeln!(f, "unknown1      = 0x{:08X}", self.unknown1)?;
        writeln!(f, "count         = {}", self.count)?;
        writeln!(f, "unknown2      = 0x{:08X}", self.unknown2)?;
        writeln!(f, "padding0      = 0x{:08X}", self.padding[0])?;
        write!(f, "padding1      = 0x{:08X}", self.padding[1])
    }
}
