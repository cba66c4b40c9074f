use anyhow::Result;

use agriminder_app::AgriContext;
use agriminder_core::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    agriminder_core::init()?;

    // Warnings are logged during loading; errors stop here
    let (config, _warnings) = Config::load_validated()?;

    let mut context = AgriContext::new(config)?;
    context.initialize()?;

    tracing::info!("AgriMinder started");

    println!("AgriMinder - Farmer Dashboard");
    println!("Config directory: {}\n", context.config().config_dir.display());

    let now = chrono::Local::now().naive_local();
    match context.dashboard(now).await {
        Ok(summary) => print!("{}", summary),
        Err(e) => {
            tracing::error!("Dashboard failed: {}", e);
            println!("{}", e.user_message());
        }
    }

    Ok(())
}
