use crate::config::{CliOverrides, Config};
use crate::error::Result;
use crate::extractor::NamingPolicy;
use crate::ui::OutputMode;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "koe-extract")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Extract embedded WAV/OGG audio from .koe containers")]
#[command(
    long_about = "koe-extract finds the RIFF or OggS signature in the header of a .koe \
                  container and copies the audio payload from that point to end-of-file \
                  into a new .wav or .ogg file."
)]
#[command(after_help = "EXAMPLES:\n  \
    koe-extract voice01.koe\n  \
    koe-extract voice01.koe --naming dos --output-dir extracted\n  \
    koe-extract bgm.koe --scan-limit 32KB --dry-run")]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Container file to extract from
    #[arg(required_unless_present = "generate_config")]
    pub input: Option<PathBuf>,

    /// Directory for the extracted file (defaults to the input's directory)
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Output naming policy
    #[arg(short, long, value_enum)]
    pub naming: Option<NamingPolicy>,

    /// Header bytes to scan (e.g., 65536, 32KB, 64k)
    #[arg(long, value_parser = parse_size_string)]
    pub scan_limit: Option<u64>,

    /// Chunk size used while copying (e.g., 4096, 8k)
    #[arg(long, value_parser = parse_buffer_size)]
    pub buffer_size: Option<usize>,

    /// Configuration file path
    #[arg(short, long, help = "Path to TOML configuration file")]
    pub config: Option<PathBuf>,

    /// Output format for results
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub output_format: OutputFormat,

    /// Verbose output level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (errors only)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Dry run (locate the payload without writing anything)
    #[arg(long, help = "Show what would be extracted without writing a file")]
    pub dry_run: bool,

    /// Generate sample configuration file
    #[arg(long, help = "Generate a sample configuration file")]
    pub generate_config: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// JSON formatted output
    Json,
    /// Plain text output
    Plain,
}

impl Cli {
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load_with_defaults(self.config.as_ref())?;

        let overrides = self.create_cli_overrides();
        config.merge_with_cli_args(&overrides);
        config.validate()?;

        Ok(config)
    }

    pub fn create_cli_overrides(&self) -> CliOverrides {
        CliOverrides::new()
            .with_scan_limit(self.scan_limit)
            .with_buffer_size(self.buffer_size)
            .with_naming(self.naming)
            .with_output_dir(self.output_dir.clone())
    }

    pub fn output_mode(&self) -> OutputMode {
        match self.output_format {
            OutputFormat::Human => OutputMode::Human,
            OutputFormat::Json => OutputMode::Json,
            OutputFormat::Plain => OutputMode::Plain,
        }
    }

    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }
}

pub fn parse_size_string(s: &str) -> std::result::Result<u64, String> {
    let s = s.trim().to_lowercase();

    let (number_str, multiplier) = if s.ends_with("kb") || s.ends_with('k') {
        (s.trim_end_matches("kb").trim_end_matches('k'), 1024)
    } else if s.ends_with("mb") || s.ends_with('m') {
        (s.trim_end_matches("mb").trim_end_matches('m'), 1024 * 1024)
    } else if s.ends_with('b') {
        (s.trim_end_matches('b'), 1)
    } else {
        (s.as_str(), 1)
    };

    let number: u64 = number_str
        .trim()
        .parse()
        .map_err(|_| format!("Invalid size: {}", s))?;

    number
        .checked_mul(multiplier)
        .ok_or_else(|| format!("Size is too large: {}", s))
}

pub fn parse_buffer_size(s: &str) -> std::result::Result<usize, String> {
    let size = parse_size_string(s)?;
    if size == 0 {
        return Err("Buffer size must be greater than 0".to_string());
    }
    usize::try_from(size).map_err(|_| format!("Buffer size is too large: {}", s))
}
