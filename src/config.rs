use crate::error::{KoeError, Result};
use crate::extractor::{NamingPolicy, DEFAULT_BUFFER_SIZE};
use crate::scanner::header_scanner::DEFAULT_SCAN_LIMIT;
use crate::scanner::SIGNATURE_LEN;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub scan: ScanConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ScanConfig {
    pub scan_limit: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    pub naming: NamingPolicy,
    pub buffer_size: usize,
    pub preserve_timestamps: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            scan_limit: DEFAULT_SCAN_LIMIT,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            naming: NamingPolicy::Simple,
            buffer_size: DEFAULT_BUFFER_SIZE,
            preserve_timestamps: true,
            output_dir: None, // next to the input
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(KoeError::Config {
                message: format!("Configuration file not found: {}", path.display()),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| KoeError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| KoeError::Config {
            message: format!("Failed to parse config file {}: {}", path.display(), e),
        })?;

        Ok(config)
    }

    pub fn load_with_defaults<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_from_file(path),
            None => {
                let default_paths = ["koe-extract.toml", ".koe-extract.toml"];

                for default_path in &default_paths {
                    if Path::new(default_path).exists() {
                        return Self::load_from_file(default_path);
                    }
                }

                Ok(Self::default())
            }
        }
    }

    pub fn merge_with_cli_args(&mut self, cli_args: &CliOverrides) {
        if let Some(scan_limit) = cli_args.scan_limit {
            self.scan.scan_limit = scan_limit;
        }

        if let Some(buffer_size) = cli_args.buffer_size {
            self.output.buffer_size = buffer_size;
        }

        if let Some(naming) = cli_args.naming {
            self.output.naming = naming;
        }

        if let Some(ref output_dir) = cli_args.output_dir {
            self.output.output_dir = Some(output_dir.clone());
        }
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self).map_err(|e| KoeError::Config {
            message: format!("Failed to serialize config: {}", e),
        })?;

        std::fs::write(path, content).map_err(|e| KoeError::Config {
            message: format!("Failed to write config file {}: {}", path.display(), e),
        })?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.scan.scan_limit < SIGNATURE_LEN as u64 {
            return Err(KoeError::Config {
                message: format!(
                    "Scan limit must be at least {} bytes (got {})",
                    SIGNATURE_LEN, self.scan.scan_limit
                ),
            });
        }

        if usize::try_from(self.scan.scan_limit).is_err() {
            return Err(KoeError::Config {
                message: format!("Scan limit is too large: {}", self.scan.scan_limit),
            });
        }

        if self.output.buffer_size == 0 {
            return Err(KoeError::Config {
                message: "Buffer size must be greater than 0".to_string(),
            });
        }

        if let Some(ref dir) = self.output.output_dir {
            if !dir.is_dir() {
                return Err(KoeError::Config {
                    message: format!("Output directory does not exist: {}", dir.display()),
                });
            }
        }

        Ok(())
    }

    pub fn create_sample_config() -> String {
        let sample_config = Self::default();
        toml::to_string_pretty(&sample_config).unwrap_or_else(|_| String::new())
    }
}

#[derive(Debug, Default)]
pub struct CliOverrides {
    pub scan_limit: Option<u64>,
    pub buffer_size: Option<usize>,
    pub naming: Option<NamingPolicy>,
    pub output_dir: Option<PathBuf>,
}

impl CliOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scan_limit(mut self, limit: Option<u64>) -> Self {
        self.scan_limit = limit;
        self
    }

    pub fn with_buffer_size(mut self, size: Option<usize>) -> Self {
        self.buffer_size = size;
        self
    }

    pub fn with_naming(mut self, naming: Option<NamingPolicy>) -> Self {
        self.naming = naming;
        self
    }

    pub fn with_output_dir(mut self, output_dir: Option<PathBuf>) -> Self {
        self.output_dir = output_dir;
        self
    }
}
