//! Texture records from a BLH bundle header
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: MIT

use std::fmt;
use std::io::{Read, Seek};

use crate::error::Result;
use crate::formats::common::BinaryCursor;
use crate::formats::dds::{self, BlockCodec};

/// Size of one texture record in the bundle header.
pub const TEXTURE_RECORD_SIZE: u64 = 28;

// ============================================================================
// Pixel Format
// ============================================================================

/// Pixel layout selected by the record's format byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// 0x85: 32-bit RGBA, stored in the console's swizzled order
    R8G8B8A8,
    /// 0x86 / 0xA6
    Bc1,
    /// 0x88
    Bc3,
    /// Anything else; no size, no header
    Unknown(u8),
}

impl PixelFormat {
    #[must_use]
    pub fn from_code(code: u8) -> Self {
        match code {
            0x85 => Self::R8G8B8A8,
            0x86 | 0xA6 => Self::Bc1,
            0x88 => Self::Bc3,
            other => Self::Unknown(other),
        }
    }

    /// Label used in output file names.
    #[must_use]
    pub fn label(self) -> String {
        match self {
            Self::R8G8B8A8 => "R8G8B8A8".to_string(),
            Self::Bc1 => "BC1".to_string(),
            Self::Bc3 => "BC3".to_string(),
            Self::Unknown(code) => format!("UNK{code:02X}"),
        }
    }

    #[must_use]
    pub fn is_block_compressed(self) -> bool {
        matches!(self, Self::Bc1 | Self::Bc3)
    }

    /// Whether the data is stored swizzled and must be reordered on extraction.
    #[must_use]
    pub fn is_swizzled(self) -> bool {
        matches!(self, Self::R8G8B8A8)
    }

    /// Byte size of a `width` x `height` surface.
    #[must_use]
    pub fn surface_size(self, width: u32, height: u32) -> u64 {
        let pixels = u64::from(width) * u64::from(height);
        match self {
            Self::R8G8B8A8 => pixels * 4,
            Self::Bc1 => pixels / 2,
            Self::Bc3 => pixels,
            Self::Unknown(_) => 0,
        }
    }
}

// ============================================================================
// Mip Levels
// ============================================================================

/// One level of a mip chain inside the texture's data region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MipLevel {
    pub width: u32,
    pub height: u32,
    /// Offset from the start of the data region
    pub offset: u64,
    pub size: u64,
}

// ============================================================================
// Texture Descriptor
// ============================================================================

/// One texture of a bundle: where its bytes live in the BLI blob and how they are laid out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureDescriptor {
    /// Absolute offset of the data region in the BLI file
    pub position: u32,
    pub unknown0: u32,
    pub unknown1: u32,
    pub unknown2: u32,
    pub width: u16,
    pub height: u16,
    pub unknown3: u16,
    pub format_code: u8,
    /// Mip count as declared by the record
    pub declared_mips: u8,
    pub unknown4: u32,
    /// String table name, or the hex position when the bundle has no names
    pub name: String,
}

impl TextureDescriptor {
    /// Read one 28-byte record at the cursor.
    pub fn read<R: Read + Seek>(cursor: &mut BinaryCursor<R>) -> Result<Self> {
        let [position, unknown0, unknown1, unknown2] = cursor.read_u32s::<4>()?;
        let width = cursor.read_u16()?;
        let height = cursor.read_u16()?;
        let unknown3 = cursor.read_u16()?;
        let format_code = cursor.read_u8()?;
        let declared_mips = cursor.read_u8()?;
        let unknown4 = cursor.read_u32()?;

        Ok(Self {
            position,
            unknown0,
            unknown1,
            unknown2,
            width,
            height,
            unknown3,
            format_code,
            declared_mips,
            unknown4,
            name: default_name(position),
        })
    }

    #[must_use]
    pub fn pixel_format(&self) -> PixelFormat {
        PixelFormat::from_code(self.format_code)
    }

    #[must_use]
    pub fn is_swizzled(&self) -> bool {
        self.pixel_format().is_swizzled()
    }

    /// Size of the top level.
    #[must_use]
    pub fn base_size(&self) -> u64 {
        self.pixel_format()
            .surface_size(u32::from(self.width), u32::from(self.height))
    }

    /// Number of declared levels whose dimensions are still usable.
    ///
    /// Block-compressed levels need at least 4x4, other formats at least 1x1.
    #[must_use]
    pub fn effective_mip_count(&self) -> u32 {
        let format = self.pixel_format();
        let min_side = if format.is_block_compressed() { 4 } else { 1 };

        let mut width = u32::from(self.width);
        let mut height = u32::from(self.height);
        let mut count = 0;
        for level in 0..self.declared_mips {
            if level != 0 {
                width /= 2;
                height /= 2;
            }
            if width >= min_side && height >= min_side {
                count += 1;
            }
        }
        count
    }

    /// Levels that make up the data region, top level first.
    ///
    /// A record declaring zero mips still has its top level.
    #[must_use]
    pub fn mip_levels(&self) -> Vec<MipLevel> {
        let level_count = self.effective_mip_count().max(1);
        let mut levels = Vec::with_capacity(level_count as usize);

        let mut width = u32::from(self.width);
        let mut height = u32::from(self.height);
        let mut size = self.base_size();
        let mut offset = 0;
        for _ in 0..level_count {
            levels.push(MipLevel {
                width,
                height,
                offset,
                size,
            });
            offset += size;
            size /= 4;
            width /= 2;
            height /= 2;
        }
        levels
    }

    /// Byte length of the data region in the BLI file. Zero for unknown formats.
    #[must_use]
    pub fn data_size(&self) -> u64 {
        self.mip_levels().iter().map(|level| level.size).sum()
    }

    /// Synthesized DDS header, or `None` for unknown formats and unaligned BC sizes.
    #[must_use]
    pub fn dds_header(&self) -> Option<Vec<u8>> {
        let width = u32::from(self.width);
        let height = u32::from(self.height);
        let mips = self.effective_mip_count();
        match self.pixel_format() {
            PixelFormat::R8G8B8A8 => Some(dds::rgba8_header(width, height, mips)),
            PixelFormat::Bc1 => dds::block_compressed_header(BlockCodec::Dxt1, width, height, mips),
            PixelFormat::Bc3 => dds::block_compressed_header(BlockCodec::Dxt5, width, height, mips),
            PixelFormat::Unknown(_) => None,
        }
    }

    /// Format label, optionally tagged when the data is swizzled.
    #[must_use]
    pub fn format_label(&self, show_swizzle: bool) -> String {
        let label = self.pixel_format().label();
        if show_swizzle && self.is_swizzled() {
            format!("{label}-PS3Swizzle")
        } else {
            label
        }
    }

    /// `name@0xPPPPPPPP.FMT`
    #[must_use]
    pub fn full_name(&self, show_swizzle: bool) -> String {
        format!(
            "{}@0x{:08X}.{}",
            self.name,
            self.position,
            self.format_label(show_swizzle)
        )
    }

    /// Output file name: `.dds` when a header can be synthesized, `.raw` otherwise.
    #[must_use]
    pub fn file_name(&self) -> String {
        let extension = if self.dds_header().is_some() { "dds" } else { "raw" };
        format!("{}.{extension}", self.full_name(false))
    }
}

impl fmt::Display for TextureDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} ({}):", self.name, self.format_label(true))?;
        writeln!(f, "  position      = 0x{:08X}", self.position)?;
        writeln!(f, "  unknown0      = 0x{:08X}", self.unknown0)?;
        writeln!(f, "  unknown1      = 0x{:08X}", self.unknown1)?;
        writeln!(f, "  unknown2      = 0x{:08X}", self.unknown2)?;
        writeln!(f, "  width         = {}", self.width)?;
        writeln!(f, "  height        = {}", self.height)?;
        writeln!(f, "  unknown3      = 0x{:04X}", self.unknown3)?;
        writeln!(f, "  format        = 0x{:02X}", self.format_code)?;
        writeln!(f, "  mips          = {}", self.declared_mips)?;
        write!(f, "  unknown4      = 0x{:08X}", self.unknown4)
    }
}

fn default_name(position: u32) -> String {
    format!("0x{position:08X}")
}
