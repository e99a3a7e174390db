// OneHand Download Progress
// Copyright (c) 2026 Xing_The_Creator | OneHand
//
// Turns yt-dlp's line output into a single live progress bar plus the few
// lines worth echoing (destinations, skips, errors).

use std::io::{self, Write};
use std::sync::OnceLock;

use regex::Regex;

pub const BAR_LENGTH: usize = 30;

#[derive(Debug, Clone, PartialEq)]
pub struct DownloadProgress {
    pub percent: f64,
    pub size: String,
    pub speed: String,
}

fn progress_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| {
            Regex::new(r"\[download\]\s+(\d+\.?\d*)%\s+of\s+~?\s*([0-9.]+\w+)\s+at\s+([0-9.]+\w+/s)").ok()
        })
        .as_ref()
}

/// Parse a `[download]  42.0% of ~ 10.00MiB at 1.20MiB/s ...` line.
pub fn parse_progress(line: &str) -> Option<DownloadProgress> {
    let caps = progress_pattern()?.captures(line)?;
    Some(DownloadProgress {
        percent: caps[1].parse().ok()?,
        size: caps[2].to_string(),
        speed: caps[3].to_string(),
    })
}

/// `█` for the completed share, `─` for the rest.
pub fn render_bar(percent: f64) -> String {
    let filled = ((BAR_LENGTH as f64 * percent.clamp(0.0, 100.0) / 100.0) as usize).min(BAR_LENGTH);
    format!("{}{}", "█".repeat(filled), "─".repeat(BAR_LENGTH - filled))
}

/// What a single yt-dlp output line means to the user.
#[derive(Debug, Clone, PartialEq)]
pub enum LineKind {
    Progress(DownloadProgress),
    Destination,
    AlreadyDownloaded,
    Error,
    Other,
}

pub fn classify(line: &str) -> LineKind {
    if let Some(progress) = parse_progress(line) {
        return LineKind::Progress(progress);
    }
    if line.contains("[download]") && line.contains("Destination:") {
        return LineKind::Destination;
    }
    if line.contains("[download]") && line.contains("has already been downloaded") {
        return LineKind::AlreadyDownloaded;
    }
    if line.to_uppercase().contains("ERROR") {
        return LineKind::Error;
    }
    LineKind::Other
}

/// Renders yt-dlp output lines to `out`.
pub struct ProgressPrinter<W: Write> {
    out: W,
    last: Option<DownloadProgress>,
}

impl<W: Write> ProgressPrinter<W> {
    pub fn new(out: W) -> Self {
        Self { out, last: None }
    }

    pub fn saw_progress(&self) -> bool {
        self.last.is_some()
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn handle_line(&mut self, line: &str) -> io::Result<()> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(());
        }

        match classify(line) {
            LineKind::Progress(progress) => {
                if self.last.as_ref() == Some(&progress) {
                    return Ok(());
                }
                write!(
                    self.out,
                    "\rDownloading: |{}| {:.1}% ({}) @ {}",
                    render_bar(progress.percent),
                    progress.percent,
                    progress.size,
                    progress.speed
                )?;
                self.out.flush()?;
                self.last = Some(progress);
            }
            LineKind::Destination => writeln!(self.out, "\n📁 {}", line)?,
            LineKind::AlreadyDownloaded => writeln!(self.out, "\n✅ {}", line)?,
            LineKind::Error => writeln!(self.out, "\n❌ {}", line)?,
            LineKind::Other => {}
        }
        Ok(())
    }

    /// Close the progress line if one is open.
    pub fn finish(&mut self) -> io::Result<()> {
        if self.last.is_some() {
            writeln!(self.out)?;
        }
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_pattern_compiles() {
        assert!(progress_pattern().is_some());
    }

    #[test]
    fn test_parse_progress_line() {
        let p = parse_progress("[download]  42.7% of ~  10.50MiB at  1.20MiB/s ETA 00:05").unwrap();
        assert_eq!(p.percent, 42.7);
        assert_eq!(p.size, "10.50MiB");
        assert_eq!(p.speed, "1.20MiB/s");

        let p = parse_progress("[download] 100% of 3.00KiB at 512.00KiB/s").unwrap();
        assert_eq!(p.percent, 100.0);
    }

    #[test]
    fn test_parse_progress_ignores_other_lines() {
        assert_eq!(parse_progress("[youtube] abc: Downloading webpage"), None);
        assert_eq!(parse_progress("[download]  12.0% of Unknown at Unknown speed"), None);
    }

    #[test]
    fn test_render_bar() {
        assert_eq!(render_bar(0.0), "─".repeat(30));
        assert_eq!(render_bar(100.0), "█".repeat(30));
        assert_eq!(render_bar(50.0), format!("{}{}", "█".repeat(15), "─".repeat(15)));
        assert_eq!(render_bar(250.0), "█".repeat(30));
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify("[download] Destination: /x/video.mp4"), LineKind::Destination);
        assert_eq!(
            classify("[download] /x/video.mp4 has already been downloaded"),
            LineKind::AlreadyDownloaded
        );
        assert_eq!(classify("ERROR: [youtube] abc: Video unavailable"), LineKind::Error);
        assert_eq!(classify("[info] Writing thumbnail"), LineKind::Other);
    }

    #[test]
    fn test_printer_dedupes_progress() {
        let mut printer = ProgressPrinter::new(Vec::new());
        printer.handle_line("[download]  10.0% of 5.00MiB at 1.00MiB/s").unwrap();
        printer.handle_line("[download]  10.0% of 5.00MiB at 1.00MiB/s").unwrap();
        printer.handle_line("[download] Destination: out.mp4").unwrap();
        printer.handle_line("[generic] noise").unwrap();
        printer.finish().unwrap();

        let text = String::from_utf8(printer.into_inner()).unwrap();
        assert_eq!(text.matches("Downloading:").count(), 1);
        assert!(text.contains("10.0% (5.00MiB) @ 1.00MiB/s"));
        assert!(text.contains("📁 [download] Destination: out.mp4"));
        assert!(!text.contains("noise"));
    }
}
