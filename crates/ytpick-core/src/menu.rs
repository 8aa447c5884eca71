//! Numbered quality menu and the interactive picker

use crate::extractor::Extractor;
use crate::formats::{
    dedupe_by_height, format_filesize, group_thousands, height_label, Format, FormatCatalog,
    VideoInfo,
};
use crate::probe::{probe_qualities, ProbeReport, DEFAULT_SELECTOR};
use std::io::{self, BufRead, Write};
use tracing::warn;

const QUICK_OPTIONS: [(&str, &str); 3] = [
    ("best", "Best automatic quality"),
    ("bestvideo+bestaudio/best", "Best video + audio (recommended)"),
    ("worst", "Lowest quality (mobile)"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuEntry {
    /// Format selector handed to yt-dlp
    pub selector: String,
    pub label: String,
}

#[derive(Debug, Clone)]
pub struct MenuSection {
    pub title: String,
    pub entries: Vec<MenuEntry>,
}

/// Outcome of one line of user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Choice {
    Selected(String),
    Quit,
    OutOfRange,
    NotANumber,
}

#[derive(Debug, Clone, Default)]
pub struct Menu {
    sections: Vec<MenuSection>,
}

impl Menu {
    /// Lay out probed qualities, the raw format catalog and the quick
    /// options. Each catalog section shows at most `section_limit` entries.
    pub fn build(report: &ProbeReport, catalog: &FormatCatalog, section_limit: usize) -> Self {
        let mut menu = Menu::default();

        let probed = dedupe_by_height(&report.available)
            .into_iter()
            .map(|p| {
                let marker = if p.kind.is_combined() { "[A/V]" } else { "[V]" };
                MenuEntry {
                    label: format!("{:5} {:25} | {}", marker, p.display(), p.description),
                    selector: p.selector,
                }
            })
            .collect();
        menu.push("Detected qualities (recommended)", probed);

        let combined = catalog
            .combined
            .iter()
            .take(section_limit)
            .map(|f| MenuEntry {
                selector: f.format_id.clone(),
                label: format!("[A/V] {}", video_label(f, true)),
            })
            .collect();
        menu.push("Direct combined formats", combined);

        let video = catalog
            .video
            .iter()
            .take(section_limit)
            .map(|f| MenuEntry {
                selector: format!("{}+bestaudio", f.format_id),
                label: format!("[V]   {}", video_label(f, false)),
            })
            .collect();
        menu.push("Video only (best audio merged in)", video);

        let audio = catalog
            .audio
            .iter()
            .take(section_limit)
            .map(|f| {
                let quality = match f.abr {
                    Some(abr) => format!("{}kbps", abr),
                    None => "N/A".to_string(),
                };
                MenuEntry {
                    selector: f.format_id.clone(),
                    label: format!(
                        "[A]   {:15} | {} | {}",
                        quality,
                        f.ext_upper(),
                        format_filesize(f.size())
                    ),
                }
            })
            .collect();
        menu.push("Audio only", audio);

        let quick = QUICK_OPTIONS
            .iter()
            .map(|(selector, label)| MenuEntry {
                selector: selector.to_string(),
                label: label.to_string(),
            })
            .collect();
        menu.push("Quick options", quick);

        menu
    }

    fn push(&mut self, title: &str, entries: Vec<MenuEntry>) {
        if !entries.is_empty() {
            self.sections.push(MenuSection {
                title: title.to_string(),
                entries,
            });
        }
    }

    pub fn sections(&self) -> &[MenuSection] {
        &self.sections
    }

    pub fn len(&self) -> usize {
        self.sections.iter().map(|s| s.entries.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 1-based lookup across all sections
    pub fn entry(&self, number: usize) -> Option<&MenuEntry> {
        if number == 0 {
            return None;
        }
        self.sections
            .iter()
            .flat_map(|s| s.entries.iter())
            .nth(number - 1)
    }

    pub fn render<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "\n{}", "=".repeat(80))?;
        writeln!(out, "DETECTED QUALITIES")?;
        writeln!(out, "{}", "=".repeat(80))?;

        let mut number = 1;
        for section in &self.sections {
            writeln!(out, "\n{}", section.title)?;
            writeln!(out, "{}", "-".repeat(70))?;
            for entry in &section.entries {
                writeln!(out, "{:2}. {}", number, entry.label)?;
                number += 1;
            }
        }

        writeln!(out, "\n{}", "=".repeat(80))?;
        writeln!(out, "Note: the detected qualities are what yt-dlp actually resolves,")?;
        writeln!(out, "including 2K/4K streams that YouTube sometimes leaves out of its format list")?;
        Ok(())
    }

    pub fn interpret(&self, input: &str) -> Choice {
        let input = input.trim();
        if input.eq_ignore_ascii_case("q") {
            return Choice::Quit;
        }

        let digits = input.strip_prefix(['+', '-']).unwrap_or(input);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Choice::NotANumber;
        }
        if input.starts_with('-') {
            return Choice::OutOfRange;
        }

        // Integers too large for usize are simply out of range
        match digits.parse::<usize>().ok().and_then(|n| self.entry(n)) {
            Some(entry) => Choice::Selected(entry.selector.clone()),
            None => Choice::OutOfRange,
        }
    }

    /// Ask until a valid option or quit. End of input counts as quit.
    pub fn prompt<R: BufRead, W: Write>(&self, input: &mut R, out: &mut W) -> io::Result<Option<String>> {
        let total = self.len();
        loop {
            write!(out, "\nSelect an option (1-{}) or 'q' to quit: ", total)?;
            out.flush()?;

            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                writeln!(out)?;
                return Ok(None);
            }

            match self.interpret(&line) {
                Choice::Selected(selector) => {
                    writeln!(out, "Selected: {}", selector)?;
                    return Ok(Some(selector));
                }
                Choice::Quit => return Ok(None),
                Choice::OutOfRange => {
                    writeln!(out, "Invalid option. Choose between 1 and {}", total)?;
                }
                Choice::NotANumber => {
                    writeln!(out, "Please enter a valid number")?;
                }
            }
        }
    }
}

fn video_label(f: &Format, full_hd: bool) -> String {
    let fps = f.fps.map(|fps| format!(" @{}fps", fps)).unwrap_or_default();
    format!(
        "{:15}{:10} | {} | {}",
        height_label(f.height.unwrap_or(0), full_hd),
        fps,
        f.ext_upper(),
        format_filesize(f.size())
    )
}

/// Print title, duration, channel and views
pub fn write_summary<W: Write>(info: &VideoInfo, out: &mut W) -> io::Result<()> {
    let na = || "N/A".to_string();
    writeln!(out, "\nTitle:    {}", info.title.clone().unwrap_or_else(na))?;
    writeln!(
        out,
        "Duration: {}",
        info.duration.map(|d| format!("{} seconds", d)).unwrap_or_else(na)
    )?;
    writeln!(out, "Channel:  {}", info.uploader.clone().unwrap_or_else(na))?;
    writeln!(
        out,
        "Views:    {}",
        info.view_count.map(group_thousands).unwrap_or_else(na)
    )?;
    Ok(())
}

/// Probe `url` and print the summary and menu. `None` means probing
/// failed and the caller should fall back to the default selector.
pub async fn present_menu<W: Write>(
    extractor: &Extractor,
    url: &str,
    section_limit: usize,
    out: &mut W,
) -> io::Result<Option<Menu>> {
    writeln!(out, "Detecting available qualities...")?;
    out.flush()?;

    let report = match probe_qualities(extractor, url).await {
        Ok(report) => report,
        Err(e) => {
            warn!("Quality detection failed: {}", e);
            writeln!(out, "Could not read video information: {}", e)?;
            writeln!(out, "Falling back to {}", DEFAULT_SELECTOR)?;
            return Ok(None);
        }
    };

    let catalog = FormatCatalog::classify(&report.info.formats);
    let menu = Menu::build(&report, &catalog, section_limit);

    write_summary(&report.info, out)?;
    menu.render(out)?;
    Ok(Some(menu))
}

/// Probe `url`, show the menu and return the chosen selector, or `None`
/// if the user quit. When probing fails the default selector is returned.
pub async fn select_quality<R: BufRead, W: Write>(
    extractor: &Extractor,
    url: &str,
    section_limit: usize,
    input: &mut R,
    out: &mut W,
) -> io::Result<Option<String>> {
    match present_menu(extractor, url, section_limit, out).await? {
        Some(menu) => menu.prompt(input, out),
        None => Ok(Some(DEFAULT_SELECTOR.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::{ProbedQuality, StreamKind};
    use std::io::Cursor;

    fn info(formats: Vec<Format>) -> VideoInfo {
        VideoInfo {
            id: "dQw4w9WgXcQ".to_string(),
            title: Some("Test".to_string()),
            duration: Some(213.0),
            uploader: Some("Uploader".to_string()),
            view_count: Some(1234567),
            formats,
        }
    }

    fn probe(selector: &str, height: u32, kind: StreamKind) -> ProbedQuality {
        ProbedQuality {
            selector: selector.to_string(),
            description: format!("desc {}", selector),
            resolution: format!("{}p", height),
            height,
            fps: None,
            codec: "avc1.640028".to_string(),
            kind,
        }
    }

    fn format(id: &str, height: Option<u32>, vcodec: &str, acodec: &str, abr: Option<f64>) -> Format {
        Format {
            format_id: id.to_string(),
            ext: Some("mp4".to_string()),
            height,
            vcodec: Some(vcodec.to_string()),
            acodec: Some(acodec.to_string()),
            abr,
            filesize: Some(1536.0),
            ..Default::default()
        }
    }

    fn sample_menu(limit: usize) -> Menu {
        let report = ProbeReport {
            info: info(vec![]),
            available: vec![
                probe("best", 1080, StreamKind::CombinedSeparate),
                probe("bestvideo+bestaudio/best", 1080, StreamKind::CombinedSeparate),
                probe("bestvideo[height<=720]+bestaudio/best", 720, StreamKind::VideoOnly),
            ],
        };
        let formats = vec![
            format("18", Some(360), "avc1", "mp4a", None),
            format("22", Some(720), "avc1", "mp4a", None),
            format("137", Some(1080), "avc1", "none", None),
            format("140", None, "none", "mp4a", Some(128.0)),
        ];
        Menu::build(&report, &FormatCatalog::classify(&formats), limit)
    }

    #[test]
    fn test_build_orders_sections_and_selectors() {
        let menu = sample_menu(5);
        let titles: Vec<&str> = menu.sections().iter().map(|s| s.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "Detected qualities (recommended)",
                "Direct combined formats",
                "Video only (best audio merged in)",
                "Audio only",
                "Quick options",
            ]
        );

        let selectors: Vec<String> = (1..=menu.len())
            .map(|n| menu.entry(n).unwrap().selector.clone())
            .collect();
        assert_eq!(
            selectors,
            vec![
                "best",
                "bestvideo[height<=720]+bestaudio/best",
                "22",
                "18",
                "137+bestaudio",
                "140",
                "best",
                "bestvideo+bestaudio/best",
                "worst",
            ]
        );
    }

    #[test]
    fn test_build_respects_section_limit_and_skips_empty() {
        let menu = sample_menu(1);
        assert_eq!(menu.sections()[1].entries.len(), 1);
        assert_eq!(menu.sections()[1].entries[0].selector, "22");

        let report = ProbeReport {
            info: info(vec![]),
            available: vec![],
        };
        let menu = Menu::build(&report, &FormatCatalog::default(), 5);
        assert_eq!(menu.sections().len(), 1);
        assert_eq!(menu.len(), 3);
    }

    #[test]
    fn test_labels() {
        let menu = sample_menu(5);
        let first = &menu.sections()[0].entries[0].label;
        assert!(first.starts_with("[A/V] 1080p (avc1)"));
        assert!(first.ends_with("| desc best"));
        assert!(menu.sections()[0].entries[1].label.starts_with("[V]   720p"));
        assert_eq!(
            menu.sections()[3].entries[0].label,
            format!("[A]   {:15} | MP4 | ~1.5 KB", "128kbps")
        );
    }

    #[test]
    fn test_interpret_bounds() {
        let menu = sample_menu(5);
        assert_eq!(menu.interpret("1"), Choice::Selected("best".to_string()));
        assert_eq!(menu.interpret(" 9 \n"), Choice::Selected("worst".to_string()));
        assert_eq!(menu.interpret("0"), Choice::OutOfRange);
        assert_eq!(menu.interpret("10"), Choice::OutOfRange);
        assert_eq!(menu.interpret("-3"), Choice::OutOfRange);
        assert_eq!(menu.interpret("+3"), Choice::Selected("22".to_string()));
        assert_eq!(menu.interpret("99999999999999999999"), Choice::OutOfRange);
        assert_eq!(menu.interpret("-99999999999999999999"), Choice::OutOfRange);
        assert_eq!(menu.interpret("-"), Choice::NotANumber);
        assert_eq!(menu.interpret("1.5"), Choice::NotANumber);
        assert_eq!(menu.interpret("two"), Choice::NotANumber);
        assert_eq!(menu.interpret(""), Choice::NotANumber);
        assert_eq!(menu.interpret("Q"), Choice::Quit);
    }

    #[test]
    fn test_prompt_retries_until_valid() {
        let menu = sample_menu(5);
        let mut input = Cursor::new("abc\n42\n3\n");
        let mut out = Vec::new();

        let choice = menu.prompt(&mut input, &mut out).unwrap();
        assert_eq!(choice.as_deref(), Some("22"));

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Please enter a valid number"));
        assert!(text.contains("Invalid option. Choose between 1 and 9"));
        assert!(text.contains("Selected: 22"));
    }

    #[test]
    fn test_prompt_quit_and_eof() {
        let menu = sample_menu(5);
        let mut out = Vec::new();
        assert_eq!(menu.prompt(&mut Cursor::new("q\n"), &mut out).unwrap(), None);
        assert_eq!(menu.prompt(&mut Cursor::new(""), &mut out).unwrap(), None);
    }

    #[test]
    fn test_render_numbers_continuously() {
        let menu = sample_menu(5);
        let mut out = Vec::new();
        menu.render(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains(" 1. [A/V]"));
        assert!(text.contains(" 3. [A/V] 720p"));
        assert!(text.contains(" 9. Lowest quality (mobile)"));
        assert!(!text.contains("10."));
    }

    #[test]
    fn test_write_summary() {
        let mut out = Vec::new();
        write_summary(&info(vec![]), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Duration: 213 seconds"));
        assert!(text.contains("Views:    1,234,567"));

        let mut bare = info(vec![]);
        bare.view_count = None;
        bare.title = None;
        let mut out = Vec::new();
        write_summary(&bare, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Title:    N/A"));
        assert!(text.contains("Views:    N/A"));
    }
}
