use anyhow::Result;
use std::io;
use std::path::Path;
use tracing::debug;

use super::{playlist, print_destination, prompt, transfer};
use crate::args::DownloadArgs;
use ytpick_core::{
    config::Config,
    downloader::{DownloadMode, DownloadOptions, Downloader},
    extractor::Extractor,
    menu::present_menu,
    probe::DEFAULT_SELECTOR,
    url::{is_playlist_url, validate_video_url},
};

pub async fn run(url: Option<String>, args: &DownloadArgs, config_path: Option<&Path>) -> Result<()> {
    print_banner();

    let raw_url = match url {
        Some(url) => url,
        None => prompt("\nEnter the YouTube video URL: ")?,
    };
    let url = validate_video_url(&raw_url)?;

    let config = Config::load(config_path)?;
    let yt_dlp_path = config.yt_dlp_path()?;
    let directory = args
        .path
        .clone()
        .unwrap_or_else(|| config.download.directory.clone());

    let downloader = Downloader::new(
        yt_dlp_path.clone(),
        config.ffmpeg_path(),
        DownloadOptions::from_config(&config, directory),
    );
    downloader.prepare().await?;
    let extractor = Extractor::new(yt_dlp_path);
    let section_limit = config.menu.section_limit;

    if args.audio {
        debug!("Audio-only mode");
        audio(&downloader, url, &config.audio.codec).await
    } else if args.playlist || is_playlist_url(url) {
        debug!("Playlist mode");
        playlist::run(&extractor, &downloader, url, args.quality.as_deref(), section_limit).await
    } else {
        video(&extractor, &downloader, url, args.quality.as_deref(), section_limit).await
    }
}

/// Resolve the selector to use: the explicit one, or the menu's pick.
/// `None` means the user backed out.
pub async fn choose_selector(
    extractor: &Extractor,
    url: &str,
    explicit: Option<&str>,
    section_limit: usize,
) -> Result<Option<String>> {
    if let Some(selector) = explicit {
        return Ok(Some(selector.to_string()));
    }

    let mut out = io::stdout();
    let chosen = match present_menu(extractor, url, section_limit, &mut out).await? {
        // stdin is only locked once probing is done
        Some(menu) => menu.prompt(&mut io::stdin().lock(), &mut out)?,
        None => Some(DEFAULT_SELECTOR.to_string()),
    };
    Ok(chosen)
}

async fn video(
    extractor: &Extractor,
    downloader: &Downloader,
    url: &str,
    quality: Option<&str>,
    section_limit: usize,
) -> Result<()> {
    let Some(selector) = choose_selector(extractor, url, quality, section_limit).await? else {
        println!("Download cancelled");
        return Ok(());
    };

    println!("\nStarting download...");
    print_destination(downloader, Some(&selector)).await;

    let mode = DownloadMode::Video {
        selector: selector.clone(),
    };
    if let Err(e) = transfer(downloader, &mode, url).await {
        if !e.is::<super::Interrupted>() {
            eprintln!("\nTip: try '-q \"{}\"' as the format", DEFAULT_SELECTOR);
        }
        return Err(e);
    }

    println!("\nDownload completed successfully!");
    Ok(())
}

async fn audio(downloader: &Downloader, url: &str, codec: &str) -> Result<()> {
    println!("\nDownloading audio as {}...", codec.to_uppercase());
    print_destination(downloader, None).await;

    transfer(downloader, &DownloadMode::AudioOnly, url).await?;

    println!("\nAudio downloaded successfully!");
    Ok(())
}

fn print_banner() {
    println!("{}", "=".repeat(80));
    println!("{:^80}", "YOUTUBE DOWNLOADER");
    println!("{:^80}", "Real detection of every available quality");
    println!("{}", "=".repeat(80));
}
