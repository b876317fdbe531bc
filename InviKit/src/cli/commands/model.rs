//! CLI commands for model package operations

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::converter::{project_package, serialize_plc};
use crate::options::{PlcOptions, SectionOffsets};
use crate::package::{DecodedPackage, decode_package};

/// PLC projection flags as given on the command line
#[derive(Debug, Clone, Copy, Default)]
pub struct PlcCliOptions {
    pub skip: usize,
    pub reverse: bool,
    pub rename: bool,
    pub split: bool,
    pub tree: bool,
}

/// Show the sections, meshes and bone tree of a PAK file
pub fn info(pak_path: &Path, mesh: Option<u64>, bone: Option<u64>, dump: bool) -> Result<()> {
    let package = decode(pak_path, mesh, bone)?;

    println!("Model Package: {}", pak_path.display());
    println!("Mesh section: 0x{:08X}", package.sections.mesh);
    println!("Bone section: 0x{:08X}", package.sections.bone);
    println!();
    print_meshes(&package);
    println!();
    print_tree(&package);

    if dump {
        print_dump(&package);
    }

    Ok(())
}

/// Decode a PAK file and write its PLC documents next to it
pub fn plc(pak_path: &Path, mesh: Option<u64>, bone: Option<u64>, cli: PlcCliOptions) -> Result<()> {
    let package = decode(pak_path, mesh, bone)?;
    if cli.tree {
        print_tree(&package);
        println!();
    }

    let options = PlcOptions::new()
        .with_skip(cli.skip)
        .with_reverse(cli.reverse)
        .with_rename(cli.rename)
        .with_split(cli.split);

    let documents = project_package(&package, &options);
    if documents.is_empty() {
        println!("No mesh to export from {}", pak_path.display());
        return Ok(());
    }

    for (path, document) in &documents {
        let json = serialize_plc(document)
            .with_context(|| format!("Failed to serialize {}", path.display()))?;
        fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
        println!(
            "Wrote {} ({} meshes, {} bones)",
            path.display(),
            document.mesh_count,
            document.bone_count
        );
    }

    Ok(())
}

fn decode(pak_path: &Path, mesh: Option<u64>, bone: Option<u64>) -> Result<DecodedPackage> {
    let offsets = SectionOffsets::new().with_mesh(mesh).with_bone(bone);
    decode_package(pak_path, &offsets)
        .with_context(|| format!("Failed to decode PAK file: {}", pak_path.display()))
}

fn print_meshes(package: &DecodedPackage) {
    let section = &package.meshes;
    println!(
        "Meshes: {} decoded, {} rejected, {} declared",
        section.meshes.len(),
        section.rejected.len(),
        section.declared_count
    );
    for mesh in &section.meshes {
        println!(
            "  {}  vertices {}  faces {}  bones {}  max blend index {}",
            mesh.name,
            mesh.vertex_count,
            mesh.face_count,
            mesh.bone_indices.len(),
            mesh.max_blend_index
        );
    }
    for rejected in &section.rejected {
        println!("  [idx={:02}] {} rejected: {}", rejected.table_index, rejected.name, rejected.error);
    }
}

fn print_dump(package: &DecodedPackage) {
    for mesh in &package.meshes.meshes {
        println!();
        println!("{mesh}");
    }
    if let Some(skeleton) = &package.skeleton {
        for bone in &skeleton.bones {
            println!();
            println!("{bone}");
        }
    }
}

fn print_tree(package: &DecodedPackage) {
    match (&package.skeleton, &package.skeleton_error) {
        (Some(skeleton), _) => {
            println!("Bones: {}", skeleton.bones.len());
            print!("{}", package.hierarchy().render_tree(&skeleton.bones));
        }
        (None, Some(error)) => println!("Bones: none ({error})"),
        (None, None) => println!("Bones: none"),
    }
}
