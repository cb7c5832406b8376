use thiserror::Error;

#[derive(Error, Debug)]
pub enum KoeError {
    #[error("Cannot open {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Read error on {path}: {message}")]
    Read { path: String, message: String },

    #[error("No WAV/OGG header found in {path} (scanned {scanned} bytes)")]
    NoSignatureFound { path: String, scanned: u64 },

    #[error("Cannot write {path}: {message}")]
    Create { path: String, message: String },

    #[error("Write failed on {path} after {bytes_written} bytes: {source}")]
    Write {
        path: String,
        bytes_written: u64,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),
}

pub trait UserFriendlyError {
    fn user_message(&self) -> String;
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for KoeError {
    fn user_message(&self) -> String {
        match self {
            KoeError::Open { path, source } => {
                format!("Cannot open {}: {}", path, source)
            }
            KoeError::Read { path, message } => {
                format!("Read error on {}: {}", path, message)
            }
            KoeError::NoSignatureFound { scanned, .. } => {
                format!(
                    "No WAV/OGG header found in the first {}",
                    format_bytes(*scanned)
                )
            }
            KoeError::Create { path, message } => {
                format!("Cannot write {}: {}", path, message)
            }
            KoeError::Write {
                path,
                bytes_written,
                ..
            } => {
                format!(
                    "Write failed on {} after {} (disk full?)",
                    path,
                    format_bytes(*bytes_written)
                )
            }
            KoeError::Config { message } => {
                format!("Configuration error: {}", message)
            }
            _ => self.to_string(),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            KoeError::Open { .. } => Some(
                "Check that the path exists and that you have read permission.".to_string()
            ),
            KoeError::Read { .. } => Some(
                "The file looks truncated or was modified while being read.".to_string()
            ),
            KoeError::NoSignatureFound { .. } => Some(
                "The file may not be a .koe container. Try a larger --scan-limit if the header sits further in.".to_string()
            ),
            KoeError::Create { .. } => Some(
                "Choose a writable location with --output-dir.".to_string()
            ),
            KoeError::Write { .. } => Some(
                "Free some disk space and run again. The partial output file was left on disk.".to_string()
            ),
            KoeError::Config { .. } => Some(
                "Check your configuration file syntax and ensure all values are in range.".to_string()
            ),
            _ => None,
        }
    }
}

impl From<toml::de::Error> for KoeError {
    fn from(error: toml::de::Error) -> Self {
        KoeError::Config {
            message: error.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, KoeError>;

pub(crate) fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[unit_index])
    } else {
        format!("{:.1} {}", size, UNITS[unit_index])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_friendly_messages() {
        let error = KoeError::NoSignatureFound {
            path: "voice.koe".to_string(),
            scanned: 65536,
        };
        assert!(error.user_message().contains("No WAV/OGG header"));
        assert!(error.user_message().contains("64.0 KB"));
        assert!(error.suggestion().is_some());
    }

    #[test]
    fn test_write_error_mentions_partial_output() {
        let error = KoeError::Write {
            path: "VOICE.WAV".to_string(),
            bytes_written: 2048,
            source: std::io::Error::new(std::io::ErrorKind::WriteZero, "short write"),
        };
        assert!(error.user_message().contains("VOICE.WAV"));
        assert!(error.suggestion().unwrap().contains("partial"));
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(1024), "1.0 KB");
        assert_eq!(format_bytes(1048576), "1.0 MB");
        assert_eq!(format_bytes(500), "500 B");
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_error = toml::from_str::<toml::Value>("not = [valid").unwrap_err();
        let error = KoeError::from(toml_error);
        assert!(matches!(error, KoeError::Config { .. }));
    }
}
