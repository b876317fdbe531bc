//! Whole-package decoding
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: MIT

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::formats::common::BinaryCursor;
use crate::formats::pak::{EntryPointer, Hierarchy, MeshSection, PackageHeader, SkeletonSection};
use crate::options::SectionOffsets;

/// Where the two sections of a package start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionPointers {
    pub mesh: u64,
    pub bone: u64,
}

/// A decoded model package.
#[derive(Debug)]
pub struct DecodedPackage {
    pub path: PathBuf,
    pub sections: SectionPointers,
    pub meshes: MeshSection,
    /// `None` when the bone section could not be decoded
    pub skeleton: Option<SkeletonSection>,
    /// Why the bone section was dropped
    pub skeleton_error: Option<Error>,
}

impl DecodedPackage {
    /// Parent/child structure of the skeleton, empty without one.
    #[must_use]
    pub fn hierarchy(&self) -> Hierarchy {
        self.skeleton
            .as_ref()
            .map(|skeleton| Hierarchy::build(&skeleton.bones))
            .unwrap_or_default()
    }
}

/// Decode the mesh and bone sections of a PAK file.
///
/// Section offsets come from the package header unless given in `offsets`.
/// A mesh section failure is an error; a bone section failure is logged and
/// the package is returned without a skeleton.
///
/// # Example
///
/// ```no_run
/// use invikit::options::SectionOffsets;
/// use invikit::package::decode_package;
///
/// let package = decode_package("chr_001.pak", &SectionOffsets::new())?;
/// println!("{} meshes", package.meshes.meshes.len());
/// # Ok::<(), invikit::Error>(())
/// ```
pub fn decode_package<P: AsRef<Path>>(path: P, offsets: &SectionOffsets) -> Result<DecodedPackage> {
    let path = path.as_ref();
    let sections = resolve_sections(path, offsets)?;
    tracing::debug!("[Offset] Mesh Section : 0x{:08X}", sections.mesh);
    tracing::debug!("[Offset] Bone Section : 0x{:08X}", sections.bone);

    // Each section gets its own handle and cursor
    let (meshes, skeleton) = rayon::join(
        || {
            let mut cursor = BinaryCursor::open(path)?;
            MeshSection::read(&mut cursor, sections.mesh)
        },
        || {
            let mut cursor = BinaryCursor::open(path)?;
            SkeletonSection::read(&mut cursor, sections.bone)
        },
    );

    let meshes = meshes.inspect_err(|e| tracing::error!("Mesh section: {e}"))?;
    tracing::info!(
        "Decoded {} meshes ({} rejected)",
        meshes.meshes.len(),
        meshes.rejected.len()
    );

    let (skeleton, skeleton_error) = match skeleton {
        Ok(skeleton) => {
            tracing::info!("Decoded {} bones", skeleton.bones.len());
            (Some(skeleton), None)
        }
        Err(e) => {
            tracing::warn!("Cannot export bone information: {e}");
            (None, Some(e))
        }
    };

    Ok(DecodedPackage {
        path: path.to_path_buf(),
        sections,
        meshes,
        skeleton,
        skeleton_error,
    })
}

/// Find both section offsets, reading the header only for the ones not given.
pub fn resolve_sections<P: AsRef<Path>>(path: P, offsets: &SectionOffsets) -> Result<SectionPointers> {
    if offsets.is_manual() {
        tracing::debug!("Manual section offsets, package header not read");
        return Ok(SectionPointers {
            mesh: offsets.mesh.unwrap_or_default(),
            bone: offsets.bone.unwrap_or_default(),
        });
    }
    if offsets.mesh.is_some() || offsets.bone.is_some() {
        tracing::debug!("One manual section offset, the other comes from the package header");
    }

    let path = path.as_ref();
    let mut cursor = BinaryCursor::open(path)?;
    let header = PackageHeader::read(&mut cursor)?;
    if let Err(e) = header.validate(cursor.len()) {
        tracing::warn!(
            "You may need to set the mesh and bone section offsets for {} manually",
            path.display()
        );
        tracing::info!("Mesh data section starts with the prefix 0x144C0000");
        tracing::info!("Bone data section starts with the prefix 0x17030000");
        return Err(e);
    }
    tracing::debug!("[Offset] Entry Table  : 0x{:08X}", header.entry_offset);

    let entry = EntryPointer::read(&mut cursor, u64::from(header.entry_offset))?;
    entry.validate(cursor.len())?;

    Ok(SectionPointers {
        mesh: offsets.mesh.unwrap_or(u64::from(entry.mesh_offset)),
        bone: offsets.bone.unwrap_or(u64::from(entry.bone_offset)),
    })
}
