mod cli;
mod page_range;
mod providers_cmd;
mod rows_cmd;
mod scan_cmd;
mod shared;

use clap::Parser;
use cli::Cli;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        cli::Commands::Scan {
            ref file,
            ref provider,
            format,
            row_tolerance,
            max_pages,
        } => scan_cmd::run(file, provider, format, row_tolerance, max_pages),
        cli::Commands::Rows {
            ref file,
            ref pages,
            tolerance,
            format,
        } => rows_cmd::run(file, pages.as_deref(), tolerance, format),
        cli::Commands::Providers => providers_cmd::run(),
    };

    if let Err(code) = result {
        std::process::exit(code);
    }
}

/// Log to stderr. `RUST_LOG` wins; otherwise `-v` picks the level.
fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
