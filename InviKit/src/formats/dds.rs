//! DDS container header synthesis
//!
//! BLI texture data is headerless. These builders produce the `DirectDraw`
//! Surface header that makes an extracted data region loadable by ordinary
//! tools. Only the three layouts found in BLH bundles are supported.
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: MIT

// ============================================================================
// Constants
// ============================================================================

pub const DDS_MAGIC: &[u8; 4] = b"DDS ";
pub const DDS_HEADER_SIZE: u32 = 124;
pub const DDS_PIXELFORMAT_SIZE: u32 = 32;

/// Magic + classic header.
pub const CLASSIC_HEADER_LEN: usize = 4 + DDS_HEADER_SIZE as usize;
/// Length of the `DDS_HEADER_DXT10` extension.
pub const DX10_EXTENSION_LEN: usize = 20;

/// `DDS_HEADER.dwFlags`
pub mod flags {
    pub const CAPS: u32 = 0x0000_0001;
    pub const HEIGHT: u32 = 0x0000_0002;
    pub const WIDTH: u32 = 0x0000_0004;
    pub const PITCH: u32 = 0x0000_0008;
    pub const PIXELFORMAT: u32 = 0x0000_1000;
    pub const MIPMAPCOUNT: u32 = 0x0002_0000;
    pub const LINEARSIZE: u32 = 0x0008_0000;
}

/// `DDS_HEADER.dwCaps`
pub mod caps {
    pub const COMPLEX: u32 = 0x0000_0008;
    pub const TEXTURE: u32 = 0x0000_1000;
    pub const MIPMAP: u32 = 0x0040_0000;
}

/// `DDS_PIXELFORMAT.dwFlags` value for a FourCC-described format.
pub const DDPF_FOURCC: u32 = 0x4;

pub const DXGI_FORMAT_R8G8B8A8_UNORM: u32 = 28;
pub const D3D10_RESOURCE_DIMENSION_TEXTURE2D: u32 = 3;

/// Block-compressed codecs that have a classic FourCC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockCodec {
    /// BC1, 8 bytes per 4x4 block
    Dxt1,
    /// BC3, 16 bytes per 4x4 block
    Dxt5,
}

impl BlockCodec {
    #[must_use]
    pub const fn fourcc(self) -> &'static [u8; 4] {
        match self {
            Self::Dxt1 => b"DXT1",
            Self::Dxt5 => b"DXT5",
        }
    }

    #[must_use]
    pub const fn block_bytes(self) -> u32 {
        match self {
            Self::Dxt1 => 8,
            Self::Dxt5 => 16,
        }
    }
}

// ============================================================================
// Builders
// ============================================================================

/// Header for uncompressed RGBA8: classic header with a `DX10` FourCC and the
/// DXT10 extension describing a single-element 2D texture array.
#[must_use]
pub fn rgba8_header(width: u32, height: u32, mip_count: u32) -> Vec<u8> {
    let mut header_flags = flags::CAPS | flags::HEIGHT | flags::WIDTH | flags::PIXELFORMAT | flags::PITCH;
    if mip_count > 1 {
        header_flags |= flags::MIPMAPCOUNT;
    }

    let mut output = Vec::with_capacity(CLASSIC_HEADER_LEN + DX10_EXTENSION_LEN);
    write_classic_header(&mut output, header_flags, width, height, width * 4, mip_count, b"DX10");

    // DDS_HEADER_DXT10
    output.extend_from_slice(&DXGI_FORMAT_R8G8B8A8_UNORM.to_le_bytes());
    output.extend_from_slice(&D3D10_RESOURCE_DIMENSION_TEXTURE2D.to_le_bytes());
    output.extend_from_slice(&0u32.to_le_bytes()); // miscFlag
    output.extend_from_slice(&1u32.to_le_bytes()); // arraySize
    output.extend_from_slice(&0u32.to_le_bytes()); // miscFlags2

    output
}

/// Header for BC1/BC3 data.
///
/// Returns `None` when the dimensions are not multiples of the 4x4 block.
#[must_use]
pub fn block_compressed_header(
    codec: BlockCodec,
    width: u32,
    height: u32,
    mip_count: u32,
) -> Option<Vec<u8>> {
    if width % 4 != 0 || height % 4 != 0 {
        tracing::warn!(
            "Width and height must be multiples of 4 for {} ({}x{})",
            String::from_utf8_lossy(codec.fourcc()),
            width,
            height
        );
        return None;
    }

    let mut header_flags =
        flags::CAPS | flags::HEIGHT | flags::WIDTH | flags::PIXELFORMAT | flags::LINEARSIZE;
    if mip_count > 1 {
        header_flags |= flags::MIPMAPCOUNT;
    }

    let linear_size = linear_size(codec, width, height);

    let mut output = Vec::with_capacity(CLASSIC_HEADER_LEN);
    write_classic_header(
        &mut output,
        header_flags,
        width,
        height,
        linear_size,
        mip_count,
        codec.fourcc(),
    );
    Some(output)
}

/// Byte size of the top mip level of a block-compressed surface.
#[must_use]
pub fn linear_size(codec: BlockCodec, width: u32, height: u32) -> u32 {
    let blocks_x = width.div_ceil(4).max(1);
    let blocks_y = height.div_ceil(4).max(1);
    blocks_x * blocks_y * codec.block_bytes()
}

fn write_classic_header(
    output: &mut Vec<u8>,
    header_flags: u32,
    width: u32,
    height: u32,
    pitch_or_linear_size: u32,
    mip_count: u32,
    fourcc: &[u8; 4],
) {
    let mut caps1 = caps::TEXTURE;
    if mip_count > 1 {
        caps1 |= caps::COMPLEX | caps::MIPMAP;
    }

    output.extend_from_slice(DDS_MAGIC);

    // DDS_HEADER
    output.extend_from_slice(&DDS_HEADER_SIZE.to_le_bytes());
    output.extend_from_slice(&header_flags.to_le_bytes());
    output.extend_from_slice(&height.to_le_bytes());
    output.extend_from_slice(&width.to_le_bytes());
    output.extend_from_slice(&pitch_or_linear_size.to_le_bytes());
    output.extend_from_slice(&1u32.to_le_bytes()); // depth
    output.extend_from_slice(&mip_count.to_le_bytes());
    output.extend_from_slice(&[0u8; 11 * 4]); // reserved1

    // DDS_PIXELFORMAT
    output.extend_from_slice(&DDS_PIXELFORMAT_SIZE.to_le_bytes());
    output.extend_from_slice(&DDPF_FOURCC.to_le_bytes());
    output.extend_from_slice(fourcc);
    output.extend_from_slice(&[0u8; 5 * 4]); // bit count + RGBA masks

    output.extend_from_slice(&caps1.to_le_bytes());
    output.extend_from_slice(&[0u8; 4 * 4]); // caps2, caps3, caps4, reserved2
}
