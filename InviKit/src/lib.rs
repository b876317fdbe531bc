//! # InviKit
//!
//! A pure-Rust library for decoding Invizimals PlayStation 3 asset containers.
//!
//! ## Supported Formats
//!
//! - **BLH/BLI texture bundles** - Parse the bundle header, undo the RSX swizzle
//!   and wrap every texture in a DDS header
//! - **PAK model packages** - Decode mesh streams and bone hierarchies
//! - **PLC** - Parameter list documents describing mesh streams for external
//!   mesh extractors
//!
//! ## Quick Start
//!
//! ### Unpacking a Texture Bundle
//!
//! ```no_run
//! use invikit::options::UnpackOptions;
//! use invikit::unpack::TextureUnpacker;
//!
//! let unpacker = TextureUnpacker::open("ui.blh", UnpackOptions::default())?;
//! let report = unpacker.unpack_file("ui.bli")?;
//! for texture in &report.textures {
//!     std::fs::write(&texture.file_name, texture.to_bytes())?;
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ### Projecting a Model Package
//!
//! ```no_run
//! use invikit::converter::{project_package, serialize_plc};
//! use invikit::options::{PlcOptions, SectionOffsets};
//! use invikit::package::decode_package;
//!
//! let package = decode_package("chr_001.pak", &SectionOffsets::new())?;
//! print!("{}", package.hierarchy().render_tree(
//!     package.skeleton.as_ref().map_or(&[][..], |s| s.bones.as_slice()),
//! ));
//!
//! for (path, document) in project_package(&package, &PlcOptions::default()) {
//!     std::fs::write(path, serialize_plc(&document)?)?;
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ### Using the Prelude
//!
//! ```
//! use invikit::prelude::*;
//!
//! // Now you have access to:
//! // - BundleHeader, TextureDescriptor, TextureUnpacker
//! // - MeshSection, SkeletonSection, Hierarchy, decode_package
//! // - PlcDocument, SectionOffsets, PlcOptions, UnpackOptions
//! // - Error, Result, and more
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` - Enables the `invikit` command-line binary

pub mod converter;
pub mod error;
pub mod formats;
pub mod options;
pub mod package;
pub mod unpack;

// Re-exports for convenience
pub use error::{Error, Result};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::formats::common::BinaryCursor;

    // Texture bundles
    pub use crate::formats::blh::{BundleHeader, MipLevel, PixelFormat, TextureDescriptor};
    pub use crate::unpack::{TextureUnpacker, UnpackReport, UnpackedTexture};

    // Model packages
    pub use crate::formats::pak::{
        BoneNode, EntryPointer, Hierarchy, MeshEntry, MeshSection, PackageHeader, ParentRef,
        SkeletonSection,
    };
    pub use crate::package::{DecodedPackage, decode_package};

    pub use crate::converter;
    pub use crate::converter::{PlcDocument, project_package, serialize_plc};
    pub use crate::options::{PlcOptions, SectionOffsets, UnpackOptions};
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// CLI module (feature-gated)
#[cfg(feature = "cli")]
pub mod cli;
