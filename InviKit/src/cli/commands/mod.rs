pub mod definitions;
pub mod model;
pub mod texture;

use clap::Subcommand;

pub use definitions::{ModelCommands, TextureCommands};

#[derive(Subcommand)]
pub enum Commands {
    /// BLH/BLI texture bundle operations
    Texture {
        #[command(subcommand)]
        command: TextureCommands,
    },

    /// PAK model package operations
    Model {
        #[command(subcommand)]
        command: ModelCommands,
    },
}

impl Commands {
    pub fn execute(&self) -> anyhow::Result<()> {
        match self {
            Commands::Texture { command } => command.execute(),
            Commands::Model { command } => command.execute(),
        }
    }
}

impl TextureCommands {
    pub fn execute(&self) -> anyhow::Result<()> {
        match self {
            TextureCommands::Info { blh } => texture::info(blh),
            TextureCommands::Unpack {
                blh,
                bli,
                output,
                filter,
                keep_swizzle,
                show,
            } => texture::unpack(
                blh,
                bli.as_deref(),
                output.as_deref(),
                filter.clone(),
                !*keep_swizzle,
                *show,
            ),
        }
    }
}

impl ModelCommands {
    pub fn execute(&self) -> anyhow::Result<()> {
        match self {
            ModelCommands::Info {
                pak,
                mesh,
                bone,
                dump,
            } => model::info(pak, *mesh, *bone, *dump),
            ModelCommands::Plc {
                pak,
                mesh,
                bone,
                skip,
                reverse,
                rename,
                split,
                tree,
            } => model::plc(
                pak,
                *mesh,
                *bone,
                model::PlcCliOptions {
                    skip: *skip,
                    reverse: *reverse,
                    rename: *rename,
                    split: *split,
                    tree: *tree,
                },
            ),
        }
    }
}
