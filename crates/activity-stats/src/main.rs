mod bootstrap;
mod commands;

use activity_core::settings::Settings;
use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let settings = Settings::parse();

    bootstrap::setup_logging(&settings.log_level(), settings.log_file.as_deref())?;

    tracing::info!("Activity Stats v{} starting", env!("CARGO_PKG_VERSION"));

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if let Err(e) = commands::run(&settings.command, &mut out) {
        tracing::error!("{:#}", e);
        return Err(e);
    }

    Ok(())
}
