//! Error types for `InviKit`

use thiserror::Error;

/// The error type for `InviKit` operations.
///
/// Section-level problems (bad magic, unusable pointers) surface as `Err`
/// from the section decoders. Per-entry problems are logged and the entry is
/// skipped; where the caller needs to know, the error is kept next to the
/// skipped entry instead of aborting the section.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    // ==================== IO Errors ====================
    /// IO error from file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ==================== Structural Errors ====================
    /// A section did not start with its fixed magic prefix.
    #[error("invalid {section} prefix: expected 0x{expected:08X}, found 0x{found:08X}")]
    Structural {
        /// Which section was being decoded.
        section: &'static str,
        /// The magic value this section must carry.
        expected: u32,
        /// The value found in the file.
        found: u32,
    },

    /// The PAK header does not describe a known mesh package layout.
    ///
    /// Callers can retry with manually supplied section offsets.
    #[error("not a recognized mesh package: {reason}")]
    UnrecognizedPackage {
        /// Which header check failed.
        reason: String,
    },

    // ==================== Bounds Errors ====================
    /// A pointer or offset is zero where it must be set, or lies past the end of the file.
    #[error("invalid {what} offset 0x{offset:08X} (file size 0x{file_size:08X})")]
    Bounds {
        /// The pointer being checked.
        what: &'static str,
        /// The offending offset.
        offset: u64,
        /// Size of the source file.
        file_size: u64,
    },

    // ==================== Data Errors ====================
    /// A read returned fewer bytes than requested.
    #[error("incomplete data at 0x{offset:08X}: expected {expected} bytes, got {actual}")]
    IncompleteData {
        /// Where the read started.
        offset: u64,
        /// Requested byte count.
        expected: usize,
        /// Bytes actually available.
        actual: usize,
    },

    /// A texture format code that has no known pixel layout.
    #[error("unsupported texture format 0x{code:02X}")]
    UnsupportedFormat {
        /// The format byte from the texture record.
        code: u8,
    },

    /// Decoded data contradicts itself (face index past the vertex count, bad parent link).
    #[error("validity check failed: {message}")]
    Validity {
        /// What did not hold.
        message: String,
    },

    // ==================== Skeleton Errors ====================
    /// The bone section scan reached the end of the file without finding a matrix row `[0, 0, 0, 1]`.
    #[error("could not locate the bone matrix block")]
    BoneMatrixNotFound,

    /// The scanned bone matrix start disagrees with the pointer stored in the bone header.
    #[error("bone matrix found at 0x{found:08X} but header points to 0x{expected:08X}")]
    BoneMatrixMismatch {
        /// Offset located by scanning.
        found: u64,
        /// Offset derived from the header.
        expected: u64,
    },

    // ==================== Parsing Errors ====================
    /// JSON serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// UTF-8 conversion error.
    #[error("UTF-8 conversion error: {0}")]
    Utf8Error(#[from] std::string::FromUtf8Error),
}

/// A specialized Result type for `InviKit` operations.
pub type Result<T> = std::result::Result<T, Error>;
