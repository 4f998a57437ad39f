#![warn(clippy::all, rust_2018_idioms)]

use clap::Parser as _;

fn main() -> anyhow::Result<()> {
    let cli = partner_admin::cli::Cli::parse();

    if let Err(e) = partner_admin::tracing::init(&cli) {
        eprintln!("Failed to start tracing: {e}");
    }

    let rt = partner_admin::create_runtime()?;
    rt.block_on(partner_admin::run(cli))
}
