//! Options for texture unpacking and model projection
//!
//! All three option sets follow the same shape: `Default` gives the
//! behavior of the command-line tools without flags, and `with_*` setters
//! adjust one field at a time.

/// Section offsets that replace header discovery in a PAK file.
///
/// # Example
///
/// ```
/// use invikit::options::SectionOffsets;
///
/// // Sections found by hand in a hex editor
/// let offsets = SectionOffsets::new()
///     .with_mesh(Some(0xD7_5570))
///     .with_bone(Some(0xDC_1770));
/// assert!(offsets.is_manual());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SectionOffsets {
    /// Absolute offset of the mesh section (prefix `0x144C0000`)
    pub mesh: Option<u64>,
    /// Absolute offset of the bone section (prefix `0x17030000`)
    pub bone: Option<u64>,
}

impl SectionOffsets {
    /// No manual offsets: both sections come from the package header.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether both sections are given, so the package header is not read at all.
    #[must_use]
    pub fn is_manual(&self) -> bool {
        self.mesh.is_some() && self.bone.is_some()
    }

    #[must_use]
    pub fn with_mesh(mut self, offset: Option<u64>) -> Self {
        self.mesh = offset;
        self
    }

    #[must_use]
    pub fn with_bone(mut self, offset: Option<u64>) -> Self {
        self.bone = offset;
        self
    }
}

/// How decoded meshes and bones are projected into PLC documents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlcOptions {
    /// Leave out the first N meshes (after `reverse`); their bones are masked
    pub skip: usize,
    /// Walk the mesh list back to front
    pub reverse: bool,
    /// Name each mesh after the first bone of its mapping
    pub rename: bool,
    /// One document per mesh instead of one for the whole package
    pub split: bool,
}

impl PlcOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_skip(mut self, skip: usize) -> Self {
        self.skip = skip;
        self
    }

    #[must_use]
    pub fn with_reverse(mut self, reverse: bool) -> Self {
        self.reverse = reverse;
        self
    }

    #[must_use]
    pub fn with_rename(mut self, rename: bool) -> Self {
        self.rename = rename;
        self
    }

    #[must_use]
    pub fn with_split(mut self, split: bool) -> Self {
        self.split = split;
        self
    }
}

/// Options for extracting textures from a BLI blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnpackOptions {
    /// Reorder swizzled RGBA data into row-major order
    /// Default: true
    pub unswizzle: bool,

    /// Only extract textures whose name contains this text (case-insensitive)
    pub name_filter: Option<String>,
}

impl Default for UnpackOptions {
    fn default() -> Self {
        Self {
            unswizzle: true,
            name_filter: None,
        }
    }
}

impl UnpackOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_unswizzle(mut self, unswizzle: bool) -> Self {
        self.unswizzle = unswizzle;
        self
    }

    #[must_use]
    pub fn with_name_filter(mut self, filter: Option<String>) -> Self {
        self.name_filter = filter.map(|f| f.to_lowercase());
        self
    }

    /// Whether a texture with this name passes the filter.
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        self.name_filter
            .as_deref()
            .is_none_or(|filter| name.to_lowercase().contains(filter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_offsets() {
        assert!(!SectionOffsets::new().is_manual());
        assert!(!SectionOffsets::new().with_mesh(Some(0x10)).is_manual());
        let offsets = SectionOffsets::new().with_mesh(Some(0x10)).with_bone(Some(0x20));
        assert!(offsets.is_manual());
        assert_eq!(offsets.bone, Some(0x20));
    }

    #[test]
    fn test_plc_defaults() {
        let options = PlcOptions::new();
        assert_eq!(options.skip, 0);
        assert!(!options.reverse && !options.rename && !options.split);
        let options = options.with_skip(2).with_split(true);
        assert_eq!(options.skip, 2);
        assert!(options.split);
    }

    #[test]
    fn test_unpack_filter() {
        let options = UnpackOptions::new();
        assert!(options.unswizzle);
        assert!(options.matches("anything"));

        let options = options.with_name_filter(Some("Sky".to_string()));
        assert!(options.matches("env_SKY_01"));
        assert!(!options.matches("rock"));
    }
}
