use anyhow::{Context, Result};
use std::io;
use std::path::Path;

use ytpick_core::{
    config::Config,
    extractor::Extractor,
    formats::FormatCatalog,
    menu::{write_summary, Menu},
    probe::probe_qualities,
    url::validate_video_url,
};

/// Probe a video and print the menu without asking for a choice
pub async fn run(url: &str, config_path: Option<&Path>) -> Result<()> {
    let url = validate_video_url(url)?;
    let config = Config::load(config_path)?;
    let extractor = Extractor::new(config.yt_dlp_path()?);

    println!("Detecting available qualities...");
    let report = probe_qualities(&extractor, url)
        .await
        .context("Failed to detect formats")?;

    let catalog = FormatCatalog::classify(&report.info.formats);
    let menu = Menu::build(&report, &catalog, config.menu.section_limit);

    let mut out = io::stdout().lock();
    write_summary(&report.info, &mut out)?;
    menu.render(&mut out)?;

    Ok(())
}
