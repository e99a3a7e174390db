// OneHand yt-dlp Runner
// Copyright (c) 2026 Xing_The_Creator | OneHand
//
// Finds a usable yt-dlp (standalone binary first, then `python -m yt_dlp`)
// and drives it as a child process with streamed output.

use std::io::Write;
use std::process::Stdio;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, info, warn};

use super::progress::ProgressPrinter;
use super::DownloadError;

/// Substrings that mark a URL as a playlist without asking yt-dlp.
pub const PLAYLIST_INDICATORS: [&str; 3] = ["list=", "playlist=", "channel="];

const PLAYLIST_CHECK_TIMEOUT: Duration = Duration::from_secs(10);

/// A runnable yt-dlp: the program plus any arguments that must precede ours.
#[derive(Debug, Clone, PartialEq)]
pub struct YtDlp {
    program: String,
    prefix: Vec<String>,
}

impl YtDlp {
    pub fn standalone(program: &str) -> Self {
        Self {
            program: program.to_string(),
            prefix: Vec::new(),
        }
    }

    pub fn python_module(python: &str) -> Self {
        Self {
            program: python.to_string(),
            prefix: vec!["-m".to_string(), "yt_dlp".to_string()],
        }
    }

    /// `sh -c SCRIPT`, standing in for yt-dlp in tests.
    #[cfg(all(test, unix))]
    pub(crate) fn shell(script: &str) -> Self {
        Self {
            program: "sh".to_string(),
            prefix: vec!["-c".to_string(), script.to_string()],
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Find yt-dlp on this machine.
    pub async fn locate() -> Result<Self, DownloadError> {
        let standalone = Self::standalone("yt-dlp");
        if standalone.responds().await {
            info!("[YTDLP] ✅ Found standalone 'yt-dlp' binary");
            return Ok(standalone);
        }

        for python in ["python3", "python", "py"] {
            let candidate = Self::python_module(python);
            if candidate.responds().await {
                info!("[YTDLP] ✅ Found Python with yt-dlp module: '{}'", python);
                return Ok(candidate);
            }
            debug!("[YTDLP] '{}' has no usable yt_dlp module", python);
        }

        warn!("[YTDLP] ⚠️ No yt-dlp binary or Python module found");
        Err(DownloadError::YtDlpNotFound)
    }

    /// Full argument vector for a call (prefix followed by `args`).
    pub fn argv(&self, args: &[String]) -> Vec<String> {
        self.prefix.iter().chain(args.iter()).cloned().collect()
    }

    fn command(&self, args: &[String]) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(self.argv(args)).kill_on_drop(true);
        cmd
    }

    async fn responds(&self) -> bool {
        self.command(&["--version".to_string()])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map(|s| s.success())
            .unwrap_or(false)
    }

    /// Number of entries yt-dlp sees at `url`, or `None` if the listing fails or times out.
    pub async fn count_entries(&self, url: &str) -> Option<usize> {
        let args = [
            "--flat-playlist".to_string(),
            "--print".to_string(),
            "id".to_string(),
            "--".to_string(),
            url.to_string(),
        ];

        let output = tokio::time::timeout(PLAYLIST_CHECK_TIMEOUT, self.command(&args).output())
            .await
            .ok()?
            .ok()?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        Some(stdout.lines().filter(|l| !l.trim().is_empty()).count())
    }

    /// Run a download, streaming its output through `printer`.
    ///
    /// Ctrl-C kills yt-dlp and returns `Interrupted`; partial files are resumable.
    pub async fn run<W: Write>(
        &self,
        args: &[String],
        printer: &mut ProgressPrinter<W>,
    ) -> Result<(), DownloadError> {
        let mut child = self
            .command(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        let stdout = child.stdout.take().ok_or(DownloadError::MissingPipe)?;
        let stderr = child.stderr.take().ok_or(DownloadError::MissingPipe)?;
        let mut out_lines = BufReader::new(stdout).lines();
        let mut err_lines = BufReader::new(stderr).lines();
        let (mut out_done, mut err_done) = (false, false);

        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        while !(out_done && err_done) {
            tokio::select! {
                line = out_lines.next_line(), if !out_done => match line? {
                    Some(line) => printer.handle_line(&line)?,
                    None => out_done = true,
                },
                line = err_lines.next_line(), if !err_done => match line? {
                    Some(line) => printer.handle_line(&line)?,
                    None => err_done = true,
                },
                _ = &mut ctrl_c => {
                    warn!("[YTDLP] Interrupted, stopping yt-dlp");
                    let _ = child.kill().await;
                    printer.finish()?;
                    return Err(DownloadError::Interrupted);
                }
            }
        }

        let status = child.wait().await?;
        printer.finish()?;

        if status.success() {
            Ok(())
        } else {
            Err(DownloadError::ProcessFailed {
                code: status.code(),
            })
        }
    }
}

/// Cheap URL check first, then ask yt-dlp whether more than one entry lives there.
pub async fn is_playlist_url(url: &str, ytdlp: Option<&YtDlp>) -> bool {
    let lower = url.to_lowercase();
    if PLAYLIST_INDICATORS.iter().any(|i| lower.contains(i)) {
        return true;
    }

    match ytdlp {
        Some(ytdlp) => ytdlp.count_entries(url).await.is_some_and(|n| n > 1),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argv_prefix() {
        let args = vec!["--version".to_string()];
        assert_eq!(YtDlp::standalone("yt-dlp").argv(&args), vec!["--version"]);
        assert_eq!(
            YtDlp::python_module("python3").argv(&args),
            vec!["-m", "yt_dlp", "--version"]
        );
    }

    #[tokio::test]
    async fn test_playlist_indicators_short_circuit() {
        assert!(is_playlist_url("https://www.youtube.com/watch?v=x&LIST=PL123", None).await);
        assert!(is_playlist_url("https://www.youtube.com/playlist?list=PL1", None).await);
        assert!(!is_playlist_url("https://youtu.be/abc", None).await);
    }

    #[tokio::test]
    async fn test_missing_program_is_not_a_playlist() {
        let bogus = YtDlp::standalone("definitely-not-a-real-yt-dlp-binary");
        assert!(!is_playlist_url("https://youtu.be/abc", Some(&bogus)).await);
        assert!(!bogus.responds().await);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_listed_entries_decide_playlist() {
        let many = YtDlp::shell("printf 'id1\\nid2\\n\\n'");
        assert_eq!(many.count_entries("https://example.com/c/videos").await, Some(2));
        assert!(is_playlist_url("https://example.com/c/videos", Some(&many)).await);

        let one = YtDlp::shell("echo id1");
        assert_eq!(one.count_entries("https://youtu.be/abc").await, Some(1));
        assert!(!is_playlist_url("https://youtu.be/abc", Some(&one)).await);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_reports_exit_code() {
        // `sh -c` stands in for yt-dlp: print a progress line, then fail.
        let fake = YtDlp {
            program: "sh".to_string(),
            prefix: vec!["-c".to_string()],
        };
        let script = vec!["echo '[download]  50.0% of 2.00MiB at 1.00MiB/s'; echo 'ERROR: boom' >&2; exit 3".to_string()];
        let mut printer = ProgressPrinter::new(Vec::new());

        let result = fake.run(&script, &mut printer).await;
        assert!(matches!(result, Err(DownloadError::ProcessFailed { code: Some(3) })));

        let text = String::from_utf8(printer.into_inner()).unwrap();
        assert!(text.contains("50.0%"));
        assert!(text.contains("❌ ERROR: boom"));
    }
}
