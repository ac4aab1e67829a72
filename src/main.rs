use anyhow::Context;
use pbr_basic::{PbrApp, ShowcaseConfig};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ShowcaseConfig::from_env();
    log::info!("Loading assets from {}", config.asset_dir.display());

    let app = PbrApp::new(config).context("failed to set up the showcase")?;
    app.run().context("showcase stopped with an error")?;
    Ok(())
}
