pub mod config;
pub mod doctor;
pub mod download;
pub mod formats;
pub mod playlist;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::fmt;
use std::io::{self, BufRead, Write};
use tokio::sync::mpsc;

use ytpick_core::downloader::{DownloadMode, Downloader};
use ytpick_core::progress::{truncate_name, DownloadEvent};

/// Returned when Ctrl-C stops a running download
#[derive(Debug)]
pub struct Interrupted;

impl fmt::Display for Interrupted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "interrupted by user")
    }
}

impl std::error::Error for Interrupted {}

/// Print `message` and read one trimmed line from stdin. End of input
/// reads as an empty line.
pub fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read from stdin")?;
    Ok(line.trim().to_string())
}

/// Folder and format lines shown before a download starts
pub async fn print_destination(downloader: &Downloader, selector: Option<&str>) {
    let folder = tokio::fs::canonicalize(downloader.directory())
        .await
        .unwrap_or_else(|_| downloader.directory().to_path_buf());

    println!("Folder: {}", folder.display());
    if let Some(selector) = selector {
        println!("Format: {}", selector);
    }
    println!("{}", "-".repeat(50));
}

/// Run a download with a progress bar. Ctrl-C kills yt-dlp and returns
/// [`Interrupted`].
pub async fn transfer(downloader: &Downloader, mode: &DownloadMode, url: &str) -> Result<()> {
    let (tx, mut rx) = mpsc::channel(32);

    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {bar:30.cyan/blue} {pos:>3}% {msg}")?
            .progress_chars("=>-"),
    );

    let progress_handle = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            match event {
                DownloadEvent::Progress {
                    percent,
                    speed,
                    size,
                    filename,
                } => {
                    pb.set_position(percent.clamp(0.0, 100.0) as u64);
                    pb.set_message(format!(
                        "{} | {} | {}",
                        truncate_name(&filename, 40),
                        speed,
                        size
                    ));
                }
                DownloadEvent::Finished { filename } => {
                    pb.println(format!("Completed: {}", truncate_name(&filename, 50)));
                    pb.set_position(0);
                    pb.set_message("");
                }
            }
        }
        pb.finish_and_clear();
    });

    let result = tokio::select! {
        result = downloader.download(mode, url, tx) => result.map_err(anyhow::Error::from),
        _ = tokio::signal::ctrl_c() => Err(Interrupted.into()),
    };

    progress_handle.await?;
    result
}
