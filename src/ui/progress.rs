// Fri Oct 16 2026 - Alex

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

const TEMPLATE: &str = "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}";

/// Progress bar over a batch of analyses. Hidden when disabled or for a single request.
pub struct BatchProgress {
    bar: ProgressBar,
}

impl BatchProgress {
    pub fn new(total: usize, enabled: bool) -> Self {
        let bar = ProgressBar::new(total as u64);
        if !enabled || total < 2 {
            bar.set_draw_target(ProgressDrawTarget::hidden());
        }

        if let Ok(style) = ProgressStyle::default_bar().template(TEMPLATE) {
            bar.set_style(style.progress_chars("#>-"));
        }
        bar.set_message("Generating signatures...");

        Self { bar }
    }

    pub fn finished(&self, label: &str) {
        self.bar.set_message(label.to_string());
        self.bar.inc(1);
    }

    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_finished_requests() {
        let progress = BatchProgress::new(3, false);
        progress.finished("1000");
        progress.finished("2000");
        assert_eq!(progress.position(), 2);
        progress.finish();
    }
}
