use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ytpick")]
#[command(author, version, about = "YouTube downloader with real quality detection")]
#[command(propagate_version = true)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// YouTube video or playlist URL (asked for interactively when omitted)
    #[arg(value_name = "URL")]
    pub url: Option<String>,

    #[command(flatten)]
    pub download: DownloadArgs,

    /// Verbose output (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Detect and list the qualities available for a video
    Formats {
        /// YouTube URL
        url: String,
    },

    /// Check that yt-dlp and FFmpeg are installed
    Doctor,

    /// Show configuration
    Config,
}

#[derive(clap::Args, Clone, Debug, Default)]
pub struct DownloadArgs {
    /// Download folder [default: ./downloads]
    #[arg(short, long, value_name = "DIR")]
    pub path: Option<PathBuf>,

    /// Download audio only (MP3)
    #[arg(short, long)]
    pub audio: bool,

    /// Explicit yt-dlp format selector, skips the quality menu
    #[arg(short, long, value_name = "FORMAT")]
    pub quality: Option<String>,

    /// Download the whole playlist
    #[arg(long)]
    pub playlist: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_download_flags() {
        let cli = Cli::try_parse_from([
            "ytpick",
            "https://youtu.be/x",
            "-p",
            "/tmp/videos",
            "-q",
            "bestvideo[height<=720]+bestaudio/best",
        ])
        .unwrap();

        assert!(cli.command.is_none());
        assert_eq!(cli.url.as_deref(), Some("https://youtu.be/x"));
        assert_eq!(cli.download.path, Some(PathBuf::from("/tmp/videos")));
        assert_eq!(
            cli.download.quality.as_deref(),
            Some("bestvideo[height<=720]+bestaudio/best")
        );
        assert!(!cli.download.audio);
        assert!(!cli.download.playlist);
    }

    #[test]
    fn test_audio_and_playlist_flags() {
        let cli = Cli::try_parse_from(["ytpick", "-a", "--playlist", "-vv"]).unwrap();
        assert!(cli.url.is_none());
        assert!(cli.download.audio);
        assert!(cli.download.playlist);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_subcommands() {
        let cli = Cli::try_parse_from(["ytpick", "formats", "https://youtu.be/x"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Formats { ref url }) if url == "https://youtu.be/x"));

        let cli = Cli::try_parse_from(["ytpick", "doctor"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Doctor)));
    }
}
