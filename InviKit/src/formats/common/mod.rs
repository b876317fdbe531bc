//! Shared helpers for the console container formats.

mod cursor;

pub use cursor::BinaryCursor;

use crate::error::{Error, Result};

/// Alignment used by every stream inside PAK sections.
pub const STREAM_ALIGNMENT: u64 = 16;

/// Bit pattern of `1.0f32`, the last element of an affine 4x4 matrix.
pub const F32_ONE_BITS: u32 = 0x3F80_0000;

/// Check that a pointer is set and lands inside the file.
pub fn check_pointer(what: &'static str, offset: u64, file_size: u64) -> Result<()> {
    if offset == 0 || offset >= file_size {
        return Err(Error::Bounds {
            what,
            offset,
            file_size,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_pointer() {
        assert!(check_pointer("entry", 0x20, 0x100).is_ok());
        assert!(matches!(
            check_pointer("entry", 0, 0x100),
            Err(Error::Bounds { offset: 0, .. })
        ));
        assert!(matches!(
            check_pointer("entry", 0x100, 0x100),
            Err(Error::Bounds { offset: 0x100, file_size: 0x100, .. })
        ));
    }

    #[test]
    fn test_one_bits() {
        assert_eq!(1.0f32.to_bits(), F32_ONE_BITS);
    }
}
