//! CLI commands for texture bundle operations

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::formats::blh::BundleHeader;
use crate::options::UnpackOptions;
use crate::unpack::TextureUnpacker;

/// Show the header and texture table of a BLH file
pub fn info(blh_path: &Path) -> Result<()> {
    let bundle = BundleHeader::open(blh_path)
        .with_context(|| format!("Failed to parse BLH file: {}", blh_path.display()))?;
    print_bundle(blh_path, &bundle);
    Ok(())
}

/// Extract the textures of a bundle to `<output>/<bli name>/`
pub fn unpack(
    blh_path: &Path,
    bli_path: Option<&Path>,
    output: Option<&Path>,
    filter: Option<String>,
    unswizzle: bool,
    show: bool,
) -> Result<()> {
    let bli_path = bli_path.map_or_else(|| blh_path.with_extension("bli"), Path::to_path_buf);
    let options = UnpackOptions::new()
        .with_unswizzle(unswizzle)
        .with_name_filter(filter);

    let unpacker = TextureUnpacker::open(blh_path, options)
        .with_context(|| format!("Failed to parse BLH file: {}", blh_path.display()))?;
    if show {
        print_bundle(blh_path, unpacker.bundle());
    }

    let report = unpacker
        .unpack_file(&bli_path)
        .with_context(|| format!("Failed to read BLI file: {}", bli_path.display()))?;

    let out_dir = output_dir(&bli_path, output);
    fs::create_dir_all(&out_dir)
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;

    for texture in &report.textures {
        let path = out_dir.join(&texture.file_name);
        fs::write(&path, texture.to_bytes())
            .with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::debug!("[{:03}] {}", texture.index + 1, path.display());
    }

    println!(
        "Extracted {} textures to {}",
        report.textures.len(),
        out_dir.display()
    );
    if !report.skipped.is_empty() {
        println!("Skipped {} textures:", report.skipped.len());
        for skipped in &report.skipped {
            println!("  [{:03}] {}: {}", skipped.index + 1, skipped.name, skipped.error);
        }
    }

    Ok(())
}

fn output_dir(bli_path: &Path, output: Option<&Path>) -> PathBuf {
    let parent = output
        .or_else(|| bli_path.parent())
        .unwrap_or_else(|| Path::new("."));
    let stem = bli_path
        .file_stem()
        .map_or_else(|| "textures".into(), |s| s.to_string_lossy());
    parent.join(&*stem)
}

fn print_bundle(blh_path: &Path, bundle: &BundleHeader) {
    println!("Texture Bundle: {}", blh_path.display());
    println!();
    println!("{bundle}");
    println!();
    for (i, texture) in bundle.textures.iter().enumerate() {
        println!(
            "[{:03}] {}  {}x{}  mips {}/{}  data {} bytes",
            i + 1,
            texture.full_name(true),
            texture.width,
            texture.height,
            texture.effective_mip_count(),
            texture.declared_mips,
            texture.data_size()
        );
    }
}
