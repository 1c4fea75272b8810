//! Progress bars for terminal output during scans

use std::io::IsTerminal;

use indicatif::{ProgressBar, ProgressStyle};
use scout_scan::ScanProgress;

/// Scan progress drawn on stderr
///
/// Bars are only drawn on an interactive terminal. Discoveries are printed
/// above the bar; without a bar they are reported by the `info` log events
/// the scanners emit.
#[derive(Debug)]
pub struct TerminalProgress {
    bar: Option<ProgressBar>,
    interactive: bool,
}

impl TerminalProgress {
    pub fn new() -> Self {
        Self {
            bar: None,
            interactive: std::io::stderr().is_terminal(),
        }
    }
}

impl Default for TerminalProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ScanProgress for TerminalProgress {
    fn begin(&mut self, label: &str, total: u64) {
        self.finish();
        if self.interactive {
            self.bar = Some(create_progress_bar(label, total));
        }
    }

    fn advance(&mut self) {
        if let Some(bar) = &self.bar {
            bar.inc(1);
        }
    }

    fn found(&mut self, message: &str) {
        if let Some(bar) = &self.bar {
            bar.println(message);
        }
    }

    fn finish(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }
}

fn create_progress_bar(label: &str, total: u64) -> ProgressBar {
    let style = ProgressStyle::with_template(
        "{msg} {bar:40} {pos:>5}/{len:5} ({percent:>3}%) [{elapsed_precise} < {eta_precise}]",
    )
    .map_or_else(|_| ProgressStyle::default_bar(), |style| style.progress_chars("⣿⣀ "));

    ProgressBar::new(total)
        .with_style(style)
        .with_message(label.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_bar_when_not_interactive() {
        let mut progress = TerminalProgress {
            bar: None,
            interactive: false,
        };
        progress.begin("List EF", 0x10000);
        assert!(progress.bar.is_none());
        progress.advance();
        progress.found("EF 0001 (TRANSPARENT_FILE) found");
        progress.finish();
    }

    #[test]
    fn test_bar_replaced_per_pass() {
        let mut progress = TerminalProgress {
            bar: None,
            interactive: true,
        };
        progress.begin("List Data Object (1 byte tag)", 0xFE);
        progress.advance();
        assert_eq!(progress.bar.as_ref().map(|bar| bar.position()), Some(1));

        progress.begin("List Data Object (2 byte tag)", 0xE0E1);
        let bar = progress.bar.as_ref().unwrap();
        assert_eq!((bar.position(), bar.length()), (0, Some(0xE0E1)));

        progress.finish();
        assert!(progress.bar.is_none());
    }
}
