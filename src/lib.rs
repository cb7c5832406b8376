pub mod cli;
pub mod config;
pub mod error;
pub mod extractor;
pub mod scanner;
pub mod ui;

// Public API re-exports
pub use cli::{Cli, OutputFormat};
pub use config::{CliOverrides, Config, OutputConfig, ScanConfig};
pub use error::{KoeError, Result, UserFriendlyError};

// Core functionality re-exports
pub use extractor::{
    CopyProgress, ExtractedInfo, ExtractionReport, Extractor, NamingPolicy, ProbeResult,
    SettingsSnapshot,
};
pub use scanner::{find_signature, AudioFormat, HeaderScanner, SignatureMatch};
pub use ui::{OutputFormatter, OutputMode, ProgressManager};

use std::path::Path;
use std::time::Instant;

/// Main library interface for koe-extract functionality
pub struct KoeExtract {
    extractor: Extractor,
    output_formatter: OutputFormatter,
    progress_manager: ProgressManager,
}

impl KoeExtract {
    pub fn new(config: Config, output_mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let output_formatter = OutputFormatter::new(output_mode, verbose, quiet);
        let progress_manager = ProgressManager::new(!quiet && output_mode == OutputMode::Human);
        let extractor = Extractor::from_config(&config);

        Self {
            extractor,
            output_formatter,
            progress_manager,
        }
    }

    pub fn from_cli(cli_args: &Cli) -> Result<Self> {
        let config = cli_args.load_config()?;

        Ok(Self::new(
            config,
            cli_args.output_mode(),
            cli_args.verbosity_level(),
            cli_args.quiet,
        ))
    }

    /// Extract the audio payload of a single container
    pub fn extract_audio(&self, input: &Path) -> Result<ExtractionReport> {
        let start_time = Instant::now();

        self.output_formatter
            .start_operation(&format!("Scanning {}", input.display()));
        self.output_formatter.debug(&format!(
            "scan limit {} bytes, chunk size {} bytes, {:?} naming",
            self.extractor.scan_limit(),
            self.extractor.buffer_size(),
            self.extractor.naming()
        ));

        let copy_progress = self.progress_manager.create_copy_progress(0, "Extracting audio...");
        let progress_callback = {
            let pb = copy_progress.clone();
            move |progress: &CopyProgress| {
                ui::progress::update_copy_progress(&pb, progress);
            }
        };

        let info = match self
            .extractor
            .extract_with_progress(input, Some(&progress_callback))
        {
            Ok(info) => info,
            Err(e) => {
                copy_progress.finish_and_clear();
                return Err(e);
            }
        };

        ui::progress::finish_progress_with_summary(
            &copy_progress,
            &format!("Extracted {}", info.output_path.display()),
            start_time.elapsed(),
        );

        self.output_formatter.info(&format!(
            "{} found at offset {}",
            info.format, info.offset
        ));

        Ok(ExtractionReport::new(
            input,
            &info,
            start_time.elapsed(),
            self.settings_snapshot(),
        ))
    }

    /// Locate the payload without writing anything
    pub fn probe(&self, input: &Path) -> Result<ProbeResult> {
        self.extractor.probe(input)
    }

    fn settings_snapshot(&self) -> SettingsSnapshot {
        SettingsSnapshot {
            scan_limit: self.extractor.scan_limit(),
            buffer_size: self.extractor.buffer_size(),
            naming: self.extractor.naming(),
        }
    }

    pub fn generate_sample_config<P: AsRef<Path>>(output_path: P) -> Result<()> {
        let sample_config = Config::create_sample_config();
        std::fs::write(output_path.as_ref(), sample_config)?;
        Ok(())
    }

    pub fn output_formatter(&self) -> &OutputFormatter {
        &self.output_formatter
    }

    pub fn handle_error(&self, error: &KoeError) {
        self.output_formatter.print_user_friendly_error(error);
    }
}

/// Extract with default settings: 64 KB scan window, 4 KB chunks, simple naming
pub fn extract_file<P: AsRef<Path>>(input: P) -> Result<ExtractedInfo> {
    Extractor::new().extract(input.as_ref())
}

/// Configures the `log` backend from CLI verbosity only.
pub fn init_logging(verbosity: u8, quiet: bool) {
    let level = if quiet {
        log::LevelFilter::Error
    } else {
        match verbosity {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            _ => log::LevelFilter::Debug,
        }
    };

    env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp(None)
        .try_init()
        .ok();
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn quiet_instance(config: Config) -> KoeExtract {
        KoeExtract::new(config, OutputMode::Plain, 0, true)
    }

    #[test]
    fn test_extract_audio_report() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("se01.koe");
        let mut data = vec![0xAAu8; 64];
        data.extend_from_slice(b"OggS");
        data.extend_from_slice(&[0x55; 4000]);
        std::fs::write(&input, &data).unwrap();

        let koe = quiet_instance(Config::default());
        let report = koe.extract_audio(&input).unwrap();

        assert_eq!(report.format, AudioFormat::Ogg);
        assert_eq!(report.offset, 64);
        assert_eq!(report.bytes_written, 4004);
        assert!(report.is_complete());
        assert_eq!(report.settings_used.scan_limit, 65536);

        let output = std::fs::read(temp_dir.path().join("se01.ogg")).unwrap();
        assert_eq!(output, &data[64..]);
    }

    #[test]
    fn test_config_drives_extractor() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("late.koe");
        let mut data = vec![0u8; 40_000];
        data.extend_from_slice(b"RIFF");
        std::fs::write(&input, &data).unwrap();

        let mut config = Config::default();
        config.scan.scan_limit = 32768;
        config.output.naming = NamingPolicy::Dos;

        let koe = quiet_instance(config.clone());
        assert!(matches!(
            koe.probe(&input),
            Err(KoeError::NoSignatureFound { scanned: 32768, .. })
        ));

        config.scan.scan_limit = 65536;
        let koe = quiet_instance(config);
        let probe = koe.probe(&input).unwrap();
        assert_eq!(probe.offset, 40_000);
        assert_eq!(probe.output_path, temp_dir.path().join("LATE.WAV"));
    }

    #[test]
    fn test_extract_file_convenience() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("tiny.koe");
        std::fs::write(&input, b"RIF").unwrap();

        assert!(matches!(
            extract_file(&input),
            Err(KoeError::NoSignatureFound { scanned: 3, .. })
        ));
    }

    #[test]
    fn test_sample_config_generation() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("sample.toml");

        KoeExtract::generate_sample_config(&config_path).unwrap();

        let content = std::fs::read_to_string(&config_path).unwrap();
        assert!(content.contains("[scan]"));
        assert!(content.contains("[output]"));
        assert!(Config::load_from_file(&config_path).is_ok());
    }
}
