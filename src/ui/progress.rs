use crate::extractor::CopyProgress;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

pub struct ProgressManager {
    enabled: bool,
}

impl ProgressManager {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn create_copy_progress(&self, total_bytes: u64, message: &str) -> ProgressBar {
        if !self.enabled {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new(total_bytes);
        pb.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes:>7}/{total_bytes:7} {msg}"
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-")
        );
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new(true)
    }
}

pub fn update_copy_progress(pb: &ProgressBar, progress: &CopyProgress) {
    // The payload size is only known once the header has been scanned
    if pb.length() != Some(progress.total_bytes) {
        pb.set_length(progress.total_bytes);
    }
    pb.set_position(progress.bytes_written);
}

pub fn finish_progress_with_summary(pb: &ProgressBar, message: &str, duration: Duration) {
    let final_message = format!("{} (completed in {})", message, format_duration(duration));
    pb.finish_with_message(final_message);
}

pub(crate) fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs >= 60 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else if secs > 0 {
        format!("{}s", secs)
    } else {
        format!("{}ms", duration.as_millis())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_manager_hides_bars() {
        let manager = ProgressManager::new(false);
        let pb = manager.create_copy_progress(1024, "copying");
        assert!(pb.is_hidden());
    }

    #[test]
    fn test_update_copy_progress() {
        let pb = ProgressBar::hidden();

        let mut progress = CopyProgress::new(100);
        progress.bytes_written = 40;
        update_copy_progress(&pb, &progress);

        assert_eq!(pb.length(), Some(100));
        assert_eq!(pb.position(), 40);

        finish_progress_with_summary(&pb, "done", Duration::from_millis(5));
        assert!(pb.is_finished());
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_secs(30)), "30s");
        assert_eq!(format_duration(Duration::from_secs(90)), "1m 30s");
        assert_eq!(format_duration(Duration::from_millis(500)), "500ms");
        assert_eq!(format_duration(Duration::ZERO), "0ms");
    }
}
