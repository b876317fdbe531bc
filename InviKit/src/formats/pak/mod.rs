//! PAK model packages
//!
//! A mesh package has a small header pointing at an entry table, and the
//! entry table points at the mesh and bone sections. Each section can also be
//! decoded on its own from a known offset.

mod header;
mod hierarchy;
mod mesh;
mod skeleton;

pub use header::{EntryPointer, PAK_MESH_MARKER, PAK_PREFIX, PackageHeader, PackageVersion};
pub use hierarchy::Hierarchy;
pub use mesh::{
    AttributeAddresses, MESH_SECTION_PREFIX, MeshEntry, MeshSection, RejectedMesh,
    TEXCOORD_STRIDE, VERTEX_STRIDE,
};
pub use skeleton::{
    BONE_SECTION_PREFIX, BoneMatrix, BoneNode, ParentRef, SkeletonSection, find_matrix_block,
};
