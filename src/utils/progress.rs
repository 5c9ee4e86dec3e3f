// src/utils/progress.rs
use indicatif::{ProgressBar, ProgressStyle};

/// Observer for page processing. Implementations must not affect the scan results.
pub trait ProgressReporter {
    fn start(&mut self, total: usize, label: &str);
    fn tick(&mut self);
    fn finish(&mut self);
}

/// Terminal progress bar backed by indicatif.
#[derive(Default)]
pub struct BarProgress {
    bar: Option<ProgressBar>,
}

impl BarProgress {
    pub fn new() -> Self {
        Self { bar: None }
    }
}

impl ProgressReporter for BarProgress {
    fn start(&mut self, total: usize, label: &str) {
        let pb = ProgressBar::new(total as u64);
        match ProgressStyle::default_bar()
            .template("{msg} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len}")
        {
            Ok(style) => pb.set_style(style.progress_chars("#>-")),
            Err(e) => tracing::debug!("Falling back to default progress style: {}", e),
        }
        pb.set_message(label.to_string());
        self.bar = Some(pb);
    }

    fn tick(&mut self) {
        if let Some(pb) = &self.bar {
            pb.inc(1);
        }
    }

    fn finish(&mut self) {
        if let Some(pb) = self.bar.take() {
            pb.finish();
        }
    }
}

/// Used with `--no-progress` and in tests.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn start(&mut self, _total: usize, _label: &str) {}
    fn tick(&mut self) {}
    fn finish(&mut self) {}
}
