use aci_netops::cli::{self, args::Args};
use color_eyre::Result;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse_checked();
    init_logging(args.verbose);

    cli::commands::run(args)
}

/// Log to stderr. `RUST_LOG` wins; otherwise `--verbose` enables debug output.
fn init_logging(verbose: bool) {
    let default = if verbose {
        "aci_netops=debug,warn"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
