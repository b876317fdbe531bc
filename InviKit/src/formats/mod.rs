//! File format handlers for Invizimals PS3 assets

pub mod blh;
pub mod common;
pub mod dds;
pub mod pak;

// Re-export main types
pub use blh::{BundleHeader, PixelFormat, TextureDescriptor};
pub use common::BinaryCursor;
pub use pak::{EntryPointer, MeshSection, PackageHeader, SkeletonSection};
