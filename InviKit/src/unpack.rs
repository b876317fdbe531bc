//! Texture extraction from a BLI blob
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: MIT

use std::io::{Read, Seek};
use std::path::Path;

use crate::converter::swizzle::unswizzle_mip_chain;
use crate::error::{Error, Result};
use crate::formats::blh::{BundleHeader, PixelFormat};
use crate::formats::common::BinaryCursor;
use crate::options::UnpackOptions;

/// One extracted texture, ready to be written out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnpackedTexture {
    /// Position in the bundle
    pub index: usize,
    pub name: String,
    /// `name@0xPPPPPPPP.FMT.dds`, or `.raw` without a header
    pub file_name: String,
    pub header: Option<Vec<u8>>,
    pub data: Vec<u8>,
}

impl UnpackedTexture {
    /// Header followed by data, as the file should be written.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let header = self.header.as_deref().unwrap_or_default();
        let mut bytes = Vec::with_capacity(header.len() + self.data.len());
        bytes.extend_from_slice(header);
        bytes.extend_from_slice(&self.data);
        bytes
    }
}

/// A texture that was not extracted.
#[derive(Debug)]
pub struct SkippedTexture {
    pub index: usize,
    pub name: String,
    pub error: Error,
}

/// Result of unpacking a whole bundle.
#[derive(Debug, Default)]
pub struct UnpackReport {
    pub textures: Vec<UnpackedTexture>,
    pub skipped: Vec<SkippedTexture>,
}

/// Extracts the textures a bundle header describes.
///
/// # Example
///
/// ```no_run
/// use invikit::options::UnpackOptions;
/// use invikit::unpack::TextureUnpacker;
///
/// let unpacker = TextureUnpacker::open("ui.blh", UnpackOptions::default())?;
/// let report = unpacker.unpack_file("ui.bli")?;
/// for texture in &report.textures {
///     println!("{} ({} bytes)", texture.file_name, texture.data.len());
/// }
/// # Ok::<(), invikit::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct TextureUnpacker {
    bundle: BundleHeader,
    options: UnpackOptions,
}

impl TextureUnpacker {
    #[must_use]
    pub fn new(bundle: BundleHeader, options: UnpackOptions) -> Self {
        Self { bundle, options }
    }

    /// Parse a BLH file and wrap it.
    pub fn open<P: AsRef<Path>>(blh_path: P, options: UnpackOptions) -> Result<Self> {
        Ok(Self::new(BundleHeader::open(blh_path)?, options))
    }

    #[must_use]
    pub fn bundle(&self) -> &BundleHeader {
        &self.bundle
    }

    /// Extract every texture from a BLI file.
    pub fn unpack_file<P: AsRef<Path>>(&self, bli_path: P) -> Result<UnpackReport> {
        let mut cursor = BinaryCursor::open(bli_path)?;
        Ok(self.unpack(&mut cursor))
    }

    /// Extract every texture that passes the name filter.
    ///
    /// Per-texture failures are logged and collected in the report.
    pub fn unpack<R: Read + Seek>(&self, cursor: &mut BinaryCursor<R>) -> UnpackReport {
        let mut report = UnpackReport::default();
        for (index, texture) in self.bundle.textures.iter().enumerate() {
            if !self.options.matches(&texture.name) {
                continue;
            }
            match self.unpack_texture(cursor, index) {
                Ok(unpacked) => report.textures.push(unpacked),
                Err(error) => {
                    tracing::warn!("[{:03}] Pass unpack {}: {}", index + 1, texture.name, error);
                    report.skipped.push(SkippedTexture {
                        index,
                        name: texture.name.clone(),
                        error,
                    });
                }
            }
        }
        report
    }

    /// Extract one texture by its position in the bundle.
    pub fn unpack_texture<R: Read + Seek>(
        &self,
        cursor: &mut BinaryCursor<R>,
        index: usize,
    ) -> Result<UnpackedTexture> {
        let texture = self.bundle.textures.get(index).ok_or_else(|| Error::Validity {
            message: format!("texture index {index} out of range"),
        })?;

        if let PixelFormat::Unknown(code) = texture.pixel_format() {
            return Err(Error::UnsupportedFormat { code });
        }

        let start = u64::from(texture.position);
        let size = texture.data_size();
        if start >= cursor.len() {
            return Err(Error::Bounds {
                what: "texture data",
                offset: start,
                file_size: cursor.len(),
            });
        }
        if start + size > cursor.len() {
            tracing::warn!("[{:03}] Overflow at 0x{:08X} (size {})", index + 1, start, size);
        }

        cursor.seek(start)?;
        let mut data = cursor.read_bytes_available(size as usize)?;

        let effective = texture.effective_mip_count();
        if effective != u32::from(texture.declared_mips) {
            tracing::debug!(
                "[{:03}] Mip count reduced from {} to {}",
                index + 1,
                texture.declared_mips,
                effective
            );
        }

        if texture.is_swizzled() && self.options.unswizzle {
            data = unswizzle_mip_chain(&data, &texture.mip_levels());
        }

        Ok(UnpackedTexture {
            index,
            name: texture.name.clone(),
            file_name: texture.file_name(),
            header: texture.dds_header(),
            data,
        })
    }
}
