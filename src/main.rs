use color_eyre::Result;
use tracing::info;

mod action;
mod app;
mod cli;
mod components;
mod errors;
mod logging;
mod tui;

use tc_gas_station::config::{self, Config};

#[tokio::main]
async fn main() -> Result<()> {
    errors::install_hooks()?;

    let args = cli::Args::parse_args();

    let data_dir = args
        .data_dir
        .as_ref()
        .map(std::path::PathBuf::from)
        .unwrap_or_else(config::get_data_dir);
    let log_path = logging::init(&data_dir)?;

    let config = Config::new(&args.network, args.api_url.as_deref(), args.page_size);
    info!(
        "Starting on {} against {} (log: {})",
        config.network.name,
        config.api.base_url,
        log_path.display()
    );

    let mut app = app::App::new(&args, config)?;
    app.run().await?;

    Ok(())
}
