//! tiersort - Sort a backup folder into retention tiers.

use clap::Parser;
use tiersort_cli::{Cli, CliError, Config, Formatter};
use tiersort_janitor::Janitor;
use tiersort_store::FsStore;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    // RUST_LOG wins over -v / -q
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> tiersort_cli::Result<()> {
    if !cli.root.is_dir() {
        return Err(CliError::InvalidRoot(cli.root));
    }

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    config.apply_cli(&cli);

    let formatter = Formatter::new(config.settings.format, config.settings.color);

    let mut store =
        FsStore::open(&cli.root).map_err(|_| CliError::InvalidRoot(cli.root.clone()))?;
    let janitor = Janitor::new(config.janitor);
    let report = janitor.run_now(&cli.root, &mut store)?;
    tracing::debug!("{} filesystem changes", store.mutation_count());

    println!("{}", formatter.format_report(&report)?);
    Ok(())
}
