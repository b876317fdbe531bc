//! BLH texture bundle headers
//!
//! A bundle is a pair of files: the `.blh` describes every texture and the
//! `.bli` holds the raw data regions back to back.

mod header;
mod texture;

pub use header::{BLH_HEADER_SIZE, BLH_PREFIX, BundleHeader};
pub use texture::{MipLevel, PixelFormat, TEXTURE_RECORD_SIZE, TextureDescriptor};
