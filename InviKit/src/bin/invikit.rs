fn main() -> anyhow::Result<()> {
    invikit::cli::run_cli()
}
