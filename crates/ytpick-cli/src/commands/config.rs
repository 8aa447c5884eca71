use anyhow::{Context, Result};
use std::path::Path;
use ytpick_core::config::Config;

pub async fn run(config_path: Option<&Path>) -> Result<()> {
    let config = Config::load(config_path)?;

    println!("ytpick configuration\n");
    let rendered = toml::to_string_pretty(&config).context("Failed to render configuration")?;
    println!("{}", rendered.trim_end());

    if config.paths.yt_dlp.is_none() {
        println!("\n# paths.yt_dlp unset: auto-detected from PATH");
    }
    if config.paths.ffmpeg.is_none() {
        println!("# paths.ffmpeg unset: auto-detected from PATH");
    }

    // Show config file locations
    println!("\nConfig file locations (in priority order):");
    println!("  1. Environment variables (YTPICK_<SECTION>__<KEY>)");
    if let Some(p) = config_path {
        println!("  2. {} (specified)", p.display());
    }
    if let Some(p) = Config::default_path() {
        println!("  3. {}", p.display());
    }

    Ok(())
}
