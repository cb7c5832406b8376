use crate::error::{format_bytes, KoeError, UserFriendlyError};
use crate::extractor::{ExtractionReport, ProbeResult};
use crate::ui::progress::format_duration;
use console::{style, Emoji, Term};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputMode {
    Human,
    Json,
    Plain,
}

// Emojis with text fallbacks
static CHECKMARK: Emoji = Emoji("✅ ", "✓ ");
static CROSS: Emoji = Emoji("❌ ", "✗ ");
static INFO: Emoji = Emoji("ℹ️  ", "i ");
static ARROW: Emoji = Emoji("🎵 ", "> ");
static SPARKLES: Emoji = Emoji("✨ ", "* ");

pub struct OutputFormatter {
    mode: OutputMode,
    use_colors: bool,
    verbose_level: u8,
    quiet: bool,
}

impl OutputFormatter {
    pub fn new(mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let use_colors = match mode {
            OutputMode::Human => Term::stdout().features().colors_supported() && !quiet,
            _ => false,
        };

        Self {
            mode,
            use_colors,
            verbose_level: if quiet { 0 } else { verbose },
            quiet,
        }
    }

    pub fn success(&self, message: &str) {
        if self.quiet {
            return;
        }
        match self.mode {
            OutputMode::Human => self.print_human_message(MessageType::Success, message),
            OutputMode::Json => self.print_json_message("success", message),
            OutputMode::Plain => println!("SUCCESS: {}", message),
        }
    }

    /// Errors are printed even in quiet mode, always on stderr.
    pub fn error(&self, message: &str) {
        match self.mode {
            OutputMode::Human => self.print_human_message(MessageType::Error, message),
            OutputMode::Json => eprintln!("{}", self.json_message("error", message)),
            OutputMode::Plain => eprintln!("ERROR: {}", message),
        }
    }

    pub fn info(&self, message: &str) {
        if self.should_show_message(1) {
            match self.mode {
                OutputMode::Human => self.print_human_message(MessageType::Info, message),
                OutputMode::Json => self.print_json_message("info", message),
                OutputMode::Plain => println!("INFO: {}", message),
            }
        }
    }

    pub fn debug(&self, message: &str) {
        if self.should_show_message(2) {
            match self.mode {
                OutputMode::Human => {
                    if self.use_colors {
                        println!("  {}", style(message).dim());
                    } else {
                        println!("  DEBUG: {}", message);
                    }
                }
                OutputMode::Json => self.print_json_message("debug", message),
                OutputMode::Plain => println!("DEBUG: {}", message),
            }
        }
    }

    pub fn start_operation(&self, operation: &str) {
        if self.should_show_message(0) {
            match self.mode {
                OutputMode::Human => {
                    if self.use_colors {
                        println!("{}{}", ARROW, style(operation).bold());
                    } else {
                        println!("> {}", operation);
                    }
                }
                OutputMode::Json => self.print_json_message("operation_start", operation),
                OutputMode::Plain => println!("STARTING: {}", operation),
            }
        }
    }

    pub fn print_user_friendly_error(&self, error: &KoeError) {
        self.error(&error.user_message());

        if let Some(suggestion) = error.suggestion() {
            match self.mode {
                OutputMode::Human => {
                    if self.use_colors {
                        eprintln!(
                            "{}{}",
                            INFO,
                            style(&format!("Suggestion: {}", suggestion)).cyan()
                        );
                    } else {
                        eprintln!("Suggestion: {}", suggestion);
                    }
                }
                OutputMode::Json => {
                    eprintln!(
                        "{}",
                        serde_json::json!({
                            "type": "suggestion",
                            "message": suggestion
                        })
                    );
                }
                OutputMode::Plain => {
                    eprintln!("SUGGESTION: {}", suggestion);
                }
            }
        }
    }

    pub fn print_extraction_report(&self, report: &ExtractionReport) {
        match self.mode {
            OutputMode::Human => {
                if !self.quiet {
                    self.print_human_report(report);
                }
            }
            OutputMode::Json => {
                let json_output =
                    serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string());
                println!("{}", json_output);
            }
            OutputMode::Plain => {
                if !self.quiet {
                    self.print_plain_report(report);
                }
            }
        }
    }

    pub fn print_probe_result(&self, probe: &ProbeResult) {
        match self.mode {
            OutputMode::Human => {
                self.print_header("Dry Run");
                println!(
                    "Input:        {} ({})",
                    probe.input_path.display(),
                    format_bytes(probe.input_size)
                );
                println!("Scanned:      {}", format_bytes(probe.scan_size));
                println!("Format:       {} at offset {}", probe.format, probe.offset);
                println!("Payload:      {}", format_bytes(probe.payload_size));
                println!("Would write:  {}", probe.output_path.display());
            }
            OutputMode::Json => {
                let json_output =
                    serde_json::to_string_pretty(probe).unwrap_or_else(|_| "{}".to_string());
                println!("{}", json_output);
            }
            OutputMode::Plain => {
                println!("FORMAT: {}", probe.format);
                println!("OFFSET: {}", probe.offset);
                println!("PAYLOAD: {} bytes", probe.payload_size);
                println!("OUTPUT: {}", probe.output_path.display());
            }
        }
    }

    pub fn print_header(&self, title: &str) {
        if self.quiet {
            return;
        }

        match self.mode {
            OutputMode::Human => {
                println!();
                if self.use_colors {
                    println!("{} {}", SPARKLES, style(title).bold().cyan());
                } else {
                    println!("=== {} ===", title);
                }
                println!();
            }
            OutputMode::Json => {
                self.print_json_object(&serde_json::json!({
                    "type": "header",
                    "title": title
                }));
            }
            OutputMode::Plain => {
                println!("=== {} ===", title);
            }
        }
    }

    pub fn print_separator(&self) {
        if self.quiet {
            return;
        }

        match self.mode {
            OutputMode::Human => {
                if self.use_colors {
                    println!("{}", style("─".repeat(60)).dim());
                } else {
                    println!("{}", "-".repeat(60));
                }
            }
            OutputMode::Plain => {
                println!("{}", "-".repeat(60));
            }
            OutputMode::Json => {}
        }
    }

    fn should_show_message(&self, min_verbose_level: u8) -> bool {
        !self.quiet && self.verbose_level >= min_verbose_level
    }

    fn print_human_message(&self, msg_type: MessageType, message: &str) {
        #[allow(clippy::type_complexity)]
        let (emoji, color_fn): (Emoji, Box<dyn Fn(&str) -> console::StyledObject<&str>>) =
            match msg_type {
                MessageType::Success => (CHECKMARK, Box::new(|msg| style(msg).green().bold())),
                MessageType::Error => (CROSS, Box::new(|msg| style(msg).red().bold())),
                MessageType::Info => (INFO, Box::new(|msg| style(msg).cyan())),
            };

        if self.use_colors {
            match msg_type {
                MessageType::Error => eprintln!("{}{}", emoji, color_fn(message)),
                _ => println!("{}{}", emoji, color_fn(message)),
            }
        } else {
            let prefix = match msg_type {
                MessageType::Success => "✓",
                MessageType::Error => "✗",
                MessageType::Info => "i",
            };

            match msg_type {
                MessageType::Error => eprintln!("{} {}", prefix, message),
                _ => println!("{} {}", prefix, message),
            }
        }
    }

    fn json_message(&self, level: &str, message: &str) -> serde_json::Value {
        serde_json::json!({
            "type": "message",
            "level": level,
            "message": message,
            "timestamp": chrono::Utc::now().to_rfc3339()
        })
    }

    fn print_json_message(&self, level: &str, message: &str) {
        self.print_json_object(&self.json_message(level, message));
    }

    fn print_json_object(&self, obj: &serde_json::Value) {
        println!(
            "{}",
            serde_json::to_string(obj).unwrap_or_else(|_| "{}".to_string())
        );
    }

    fn print_human_report(&self, report: &ExtractionReport) {
        println!();
        self.print_separator();

        if self.use_colors {
            println!(
                "{} {}",
                style("Audio extraction completed!").green().bold(),
                CHECKMARK
            );
        } else {
            println!("✓ Audio extraction completed!");
        }

        println!();
        for (label, value) in human_report_rows(report) {
            if self.use_colors {
                println!("  {} {}", label, style(value).cyan().bold());
            } else {
                println!("  {} {}", label, value);
            }
        }

        self.print_separator();
    }

    fn print_plain_report(&self, report: &ExtractionReport) {
        println!("COMPLETED: Audio extraction");
        println!("Format: {}", report.format);
        println!("Offset: {}", report.offset);
        println!("Bytes written: {}", report.bytes_written);
        println!("Output: {}", report.output_path);
        println!("Duration: {:?}", report.extraction_duration);
    }
}

#[derive(Debug, Clone, Copy)]
enum MessageType {
    Success,
    Error,
    Info,
}

fn human_report_rows(report: &ExtractionReport) -> Vec<(&'static str, String)> {
    let mut rows = vec![
        ("Format:       ", report.format.to_string()),
        ("Offset:       ", report.offset.to_string()),
        ("Bytes written:", format_bytes(report.bytes_written)),
        ("Output file:  ", report.output_path.clone()),
        ("Time taken:   ", format_duration(report.extraction_duration)),
    ];

    // Sub-millisecond copies have no meaningful rate
    let rate = report.throughput_bytes_per_sec();
    if rate > 0.0 {
        rows.push(("Throughput:   ", format!("{}/s", format_bytes(rate as u64))));
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::{ExtractedInfo, NamingPolicy, SettingsSnapshot};
    use crate::scanner::AudioFormat;
    use std::path::{Path, PathBuf};
    use std::time::Duration;

    fn snapshot() -> SettingsSnapshot {
        SettingsSnapshot {
            scan_limit: 65536,
            buffer_size: 4096,
            naming: NamingPolicy::Simple,
        }
    }

    #[test]
    fn test_quiet_mode() {
        let formatter = OutputFormatter::new(OutputMode::Human, 2, true);
        assert_eq!(formatter.verbose_level, 0);
        assert!(formatter.quiet);
        assert!(!formatter.use_colors);
    }

    #[test]
    fn test_non_human_modes_never_color() {
        assert!(!OutputFormatter::new(OutputMode::Json, 0, false).use_colors);
        assert!(!OutputFormatter::new(OutputMode::Plain, 0, false).use_colors);
    }

    #[test]
    fn test_report_rows_include_throughput() {
        let info = ExtractedInfo {
            format: AudioFormat::Ogg,
            offset: 0,
            bytes_written: 2048,
            output_path: PathBuf::from("bgm.ogg"),
            input_size: 2048,
        };
        let report = ExtractionReport::new(
            Path::new("bgm.koe"),
            &info,
            Duration::from_secs(2),
            snapshot(),
        );

        let rows = human_report_rows(&report);
        assert_eq!(rows[0].1, "OGG");
        assert_eq!(rows[4].1, "2s");
        let (label, value) = rows.last().unwrap();
        assert_eq!(*label, "Throughput:   ");
        assert_eq!(value, "1.0 KB/s");
    }

    #[test]
    fn test_report_rows_skip_throughput_for_instant_copy() {
        let info = ExtractedInfo {
            format: AudioFormat::Wav,
            offset: 4,
            bytes_written: 10,
            output_path: PathBuf::from("v.wav"),
            input_size: 14,
        };
        let report =
            ExtractionReport::new(Path::new("v.koe"), &info, Duration::ZERO, snapshot());

        let rows = human_report_rows(&report);
        assert_eq!(rows.len(), 5);
        assert!(rows.iter().all(|(label, _)| !label.starts_with("Throughput")));
    }

    #[test]
    fn test_should_show_message() {
        let formatter = OutputFormatter::new(OutputMode::Human, 1, false);
        assert!(formatter.should_show_message(0));
        assert!(formatter.should_show_message(1));
        assert!(!formatter.should_show_message(2));

        let quiet_formatter = OutputFormatter::new(OutputMode::Human, 2, true);
        assert!(!quiet_formatter.should_show_message(0));
    }

    #[test]
    fn test_json_message_shape() {
        let formatter = OutputFormatter::new(OutputMode::Json, 0, false);
        let value = formatter.json_message("error", "boom");
        assert_eq!(value["level"], "error");
        assert_eq!(value["message"], "boom");
        assert!(value["timestamp"].is_string());
    }
}
