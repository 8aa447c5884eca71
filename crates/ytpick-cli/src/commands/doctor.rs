use anyhow::Result;
use std::path::Path;
use std::process::Command;
use which::which;
use ytpick_core::config::Config;

pub async fn run(config_path: Option<&Path>) -> Result<()> {
    let config = Config::load(config_path)?;

    println!("ytpick dependency check\n");

    let mut all_ok = true;

    // Check yt-dlp
    print!("yt-dlp:  ");
    match config.paths.yt_dlp.clone().or_else(|| which("yt-dlp").ok()) {
        Some(path) => match version_of(&path, "--version") {
            Some(v) => println!("OK ({})", v),
            None => {
                println!("FOUND at {} but failed to get version", path.display());
                all_ok = false;
            }
        },
        None => {
            println!("NOT FOUND");
            println!("         Install with: pip install yt-dlp");
            all_ok = false;
        }
    }

    // Check FFmpeg, needed for merging separate streams and MP3 extraction
    print!("ffmpeg:  ");
    match config.ffmpeg_path() {
        Some(path) => match version_of(&path, "-version") {
            Some(first_line) => {
                // Extract just version number
                let version_part = first_line.split_whitespace().nth(2).unwrap_or("unknown");
                println!("OK ({})", version_part);
            }
            None => {
                println!("FOUND at {} but failed to get version", path.display());
                all_ok = false;
            }
        },
        None => {
            println!("NOT FOUND");
            println!("         Needed to merge video+audio and to extract MP3");
            all_ok = false;
        }
    }

    println!();
    if all_ok {
        println!("All dependencies OK!");
    } else {
        println!("Some dependencies are missing. See above for installation instructions.");
    }

    Ok(())
}

/// First line of `<binary> <flag>` output
fn version_of(path: &Path, flag: &str) -> Option<String> {
    let out = Command::new(path).arg(flag).output().ok()?;
    if !out.status.success() {
        return None;
    }
    String::from_utf8_lossy(&out.stdout)
        .lines()
        .next()
        .map(|line| line.trim().to_string())
}
