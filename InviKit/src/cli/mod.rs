//! InviKit CLI - Command-line interface for Invizimals asset tools

pub mod commands;

use clap::Parser;
use commands::Commands;

#[derive(Parser)]
#[command(name = "invikit")]
#[command(about = "InviKit: Invizimals PS3 texture and model tools", long_about = None)]
#[command(version)]
struct Cli {
    /// Print offsets and per-entry details
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Run the InviKit CLI
pub fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    cli.command.execute()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use commands::ModelCommands;

    #[test]
    fn test_model_info_dump_flag() {
        let cli = Cli::try_parse_from(["invikit", "model", "info", "chr.pak", "--dump", "--mesh", "D75570"])
            .unwrap();
        match cli.command {
            Commands::Model {
                command: ModelCommands::Info { dump, mesh, bone, .. },
            } => {
                assert!(dump);
                assert_eq!(mesh, Some(0xD7_5570));
                assert_eq!(bone, None);
            }
            _ => panic!("expected model info"),
        }

        let cli = Cli::try_parse_from(["invikit", "model", "info", "chr.pak"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Model { command: ModelCommands::Info { dump: false, .. } }
        ));
    }
}
