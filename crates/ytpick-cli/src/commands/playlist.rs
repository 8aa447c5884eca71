use anyhow::Result;

use super::download::choose_selector;
use super::{print_destination, prompt, transfer};
use ytpick_core::{
    downloader::{DownloadMode, Downloader},
    extractor::Extractor,
};

pub async fn run(
    extractor: &Extractor,
    downloader: &Downloader,
    url: &str,
    quality: Option<&str>,
    section_limit: usize,
) -> Result<()> {
    let playlist = extractor.fetch_playlist(url).await?;

    // Qualities are probed on the first entry; a playlist URL has no formats
    let probe_url = playlist
        .entries
        .first()
        .map(|entry| entry.watch_url())
        .unwrap_or_else(|| url.to_string());

    let Some(selector) = choose_selector(extractor, &probe_url, quality, section_limit).await? else {
        println!("Download cancelled");
        return Ok(());
    };

    if !playlist.entries.is_empty() {
        println!(
            "\nPlaylist: {}",
            playlist.title.as_deref().unwrap_or("N/A")
        );
        println!("Videos: {}", playlist.entries.len());

        let answer = prompt("\nDownload the whole playlist? (y/n): ")?;
        if !is_affirmative(&answer) {
            println!("Download cancelled");
            return Ok(());
        }
    }

    println!("\nStarting playlist download...");
    print_destination(downloader, Some(&selector)).await;

    transfer(downloader, &DownloadMode::Playlist { selector }, url).await?;

    println!("\nPlaylist downloaded completely!");
    Ok(())
}

/// English and Spanish yes
fn is_affirmative(answer: &str) -> bool {
    matches!(
        answer.trim().to_lowercase().as_str(),
        "y" | "yes" | "s" | "si"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_affirmative() {
        for yes in ["y", "Y", "yes", "YES", " s ", "si", "Si"] {
            assert!(is_affirmative(yes), "{:?}", yes);
        }
        for no in ["", "n", "no", "sure", "yess"] {
            assert!(!is_affirmative(no), "{:?}", no);
        }
    }
}
