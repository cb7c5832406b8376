use crate::extractor::file_extractor::ExtractedInfo;
use crate::extractor::output_naming::NamingPolicy;
use crate::scanner::AudioFormat;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionReport {
    pub input_path: String,
    pub input_size: u64,
    pub format: AudioFormat,
    pub offset: u64,
    pub bytes_written: u64,
    pub output_path: String,
    pub extraction_time: DateTime<Utc>,
    pub extraction_duration: Duration,
    pub settings_used: SettingsSnapshot,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingsSnapshot {
    pub scan_limit: u64,
    pub buffer_size: usize,
    pub naming: NamingPolicy,
}

impl ExtractionReport {
    pub fn new(
        input: &Path,
        info: &ExtractedInfo,
        duration: Duration,
        settings: SettingsSnapshot,
    ) -> Self {
        Self {
            input_path: input.display().to_string(),
            input_size: info.input_size,
            format: info.format,
            offset: info.offset,
            bytes_written: info.bytes_written,
            output_path: info.output_path.display().to_string(),
            extraction_time: Utc::now(),
            extraction_duration: duration,
            settings_used: settings,
        }
    }

    /// True when every byte from the signature to end-of-file was copied.
    pub fn is_complete(&self) -> bool {
        self.bytes_written == self.input_size.saturating_sub(self.offset)
    }

    pub fn throughput_bytes_per_sec(&self) -> f64 {
        let secs = self.extraction_duration.as_secs_f64();
        if secs > 0.0 {
            self.bytes_written as f64 / secs
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn sample_info() -> ExtractedInfo {
        ExtractedInfo {
            format: AudioFormat::Wav,
            offset: 100,
            bytes_written: 900,
            output_path: PathBuf::from("voice.wav"),
            input_size: 1000,
        }
    }

    fn snapshot() -> SettingsSnapshot {
        SettingsSnapshot {
            scan_limit: 65536,
            buffer_size: 4096,
            naming: NamingPolicy::Simple,
        }
    }

    #[test]
    fn test_report_from_info() {
        let report = ExtractionReport::new(
            Path::new("voice.koe"),
            &sample_info(),
            Duration::from_millis(500),
            snapshot(),
        );

        assert_eq!(report.input_path, "voice.koe");
        assert_eq!(report.output_path, "voice.wav");
        assert!(report.is_complete());
        assert_eq!(report.throughput_bytes_per_sec(), 1800.0);
    }

    #[test]
    fn test_report_serializes_format_lowercase() {
        let report = ExtractionReport::new(
            Path::new("voice.koe"),
            &sample_info(),
            Duration::ZERO,
            snapshot(),
        );

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["format"], "wav");
        assert_eq!(json["settings_used"]["naming"], "simple");
        assert_eq!(report.throughput_bytes_per_sec(), 0.0);
    }
}
