//! Subcommand enum definitions for CLI

use clap::Subcommand;
use std::path::PathBuf;

/// Parse a section offset given in hex, with or without a `0x` prefix.
pub fn parse_hex_offset(s: &str) -> Result<u64, String> {
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    u64::from_str_radix(digits, 16).map_err(|e| format!("Invalid hex offset '{s}': {e}"))
}

/// BLH/BLI texture bundle commands
#[derive(Subcommand)]
pub enum TextureCommands {
    /// Show the header and texture table of a BLH file
    Info {
        /// BLH file to analyze
        blh: PathBuf,
    },

    /// Extract every texture of a bundle to DDS files
    Unpack {
        /// BLH file describing the bundle
        blh: PathBuf,

        /// BLI file holding the pixel data (defaults to the BLH path with a .bli extension)
        #[arg(long)]
        bli: Option<PathBuf>,

        /// Output directory; textures go to <output>/<bli name> (defaults to the BLI's directory)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Only extract textures whose name contains this text (case-insensitive)
        #[arg(short = 'f', long)]
        filter: Option<String>,

        /// Write RGBA data in console tile order
        #[arg(long)]
        keep_swizzle: bool,

        /// Print the bundle structure before extracting
        #[arg(long)]
        show: bool,
    },
}

/// PAK model package commands
#[derive(Subcommand)]
pub enum ModelCommands {
    /// Show the sections, meshes and bone tree of a PAK file
    Info {
        /// PAK file to analyze
        pak: PathBuf,

        /// Mesh section offset in hex (prefix 0x144C0000), bypasses the header
        #[arg(long, value_parser = parse_hex_offset)]
        mesh: Option<u64>,

        /// Bone section offset in hex (prefix 0x17030000), bypasses the header
        #[arg(long, value_parser = parse_hex_offset)]
        bone: Option<u64>,

        /// Print stream addresses of every mesh and the matrix of every bone
        #[arg(long)]
        dump: bool,
    },

    /// Write PLC parameter list documents next to the PAK file
    Plc {
        /// PAK file to convert
        pak: PathBuf,

        /// Mesh section offset in hex (prefix 0x144C0000), bypasses the header
        #[arg(long, value_parser = parse_hex_offset)]
        mesh: Option<u64>,

        /// Bone section offset in hex (prefix 0x17030000), bypasses the header
        #[arg(long, value_parser = parse_hex_offset)]
        bone: Option<u64>,

        /// Leave out the first N meshes and mask their bones
        #[arg(short, long, default_value_t = 0)]
        skip: usize,

        /// Reverse the mesh order before skipping
        #[arg(short, long)]
        reverse: bool,

        /// Name meshes after the first bone they map
        #[arg(long)]
        rename: bool,

        /// Write one document per mesh (<pak>.NN.plc)
        #[arg(long)]
        split: bool,

        /// Print the bone tree
        #[arg(short, long)]
        tree: bool,
    },
}
