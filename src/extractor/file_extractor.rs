use crate::config::Config;
use crate::error::{KoeError, Result};
use crate::extractor::output_naming::{derive_output_path, NamingPolicy};
use crate::scanner::{AudioFormat, HeaderScan, HeaderScanner, SignatureMatch};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// Default chunk size used while streaming the payload out.
pub const DEFAULT_BUFFER_SIZE: usize = 4096;

#[derive(Debug, Clone)]
pub struct CopyProgress {
    pub bytes_written: u64,
    pub total_bytes: u64,
}

impl CopyProgress {
    pub fn new(total_bytes: u64) -> Self {
        Self {
            bytes_written: 0,
            total_bytes,
        }
    }
}

/// Outcome of a successful extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedInfo {
    pub format: AudioFormat,
    pub offset: u64,
    pub bytes_written: u64,
    pub output_path: PathBuf,
    pub input_size: u64,
}

/// What an extraction would do, without touching the filesystem.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeResult {
    pub input_path: PathBuf,
    pub input_size: u64,
    pub scan_size: u64,
    pub format: AudioFormat,
    pub offset: u64,
    pub payload_size: u64,
    pub output_path: PathBuf,
}

pub struct Extractor {
    scanner: HeaderScanner,
    naming: NamingPolicy,
    output_dir: Option<PathBuf>,
    buffer_size: usize,
    preserve_timestamps: bool,
}

impl Extractor {
    pub fn new() -> Self {
        Self {
            scanner: HeaderScanner::new(),
            naming: NamingPolicy::Simple,
            output_dir: None,
            buffer_size: DEFAULT_BUFFER_SIZE,
            preserve_timestamps: false,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new()
            .with_scan_limit(config.scan.scan_limit)
            .with_naming(config.output.naming)
            .with_output_dir(config.output.output_dir.clone())
            .with_buffer_size(config.output.buffer_size)
            .with_preserve_timestamps(config.output.preserve_timestamps)
    }

    pub fn with_scan_limit(mut self, limit: u64) -> Self {
        self.scanner = self.scanner.with_scan_limit(limit);
        self
    }

    pub fn with_naming(mut self, naming: NamingPolicy) -> Self {
        self.naming = naming;
        self
    }

    pub fn with_output_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.output_dir = dir;
        self
    }

    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size.max(1);
        self
    }

    pub fn with_preserve_timestamps(mut self, preserve: bool) -> Self {
        self.preserve_timestamps = preserve;
        self
    }

    pub fn scan_limit(&self) -> u64 {
        self.scanner.scan_limit()
    }

    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    pub fn naming(&self) -> NamingPolicy {
        self.naming
    }

    /// Locates the payload and names the output without creating it.
    pub fn probe(&self, input: &Path) -> Result<ProbeResult> {
        let mut source = open_input(input)?;
        let (scan, found) = self.locate(&mut source, input)?;
        let output_path = self.output_path_for(input, found.format)?;

        Ok(ProbeResult {
            input_path: input.to_path_buf(),
            input_size: scan.input_size,
            scan_size: scan.scan_size,
            format: found.format,
            offset: found.offset,
            payload_size: scan.input_size - found.offset,
            output_path,
        })
    }

    pub fn extract(&self, input: &Path) -> Result<ExtractedInfo> {
        self.extract_with_progress(input, None)
    }

    /// Copies everything from the first audio signature to end-of-file into a
    /// new file.
    ///
    /// No file is created when the header has no signature. A failed write
    /// leaves the partial output in place.
    pub fn extract_with_progress(
        &self,
        input: &Path,
        progress_callback: Option<&dyn Fn(&CopyProgress)>,
    ) -> Result<ExtractedInfo> {
        let mut source = open_input(input)?;
        let (scan, found) = self.locate(&mut source, input)?;
        let output_path = self.output_path_for(input, found.format)?;

        log::debug!(
            "{} found at offset {} in {}",
            found.format,
            found.offset,
            input.display()
        );

        let mut dest = create_output(input, &output_path)?;

        source
            .seek(SeekFrom::Start(found.offset))
            .map_err(|e| KoeError::Read {
                path: input.display().to_string(),
                message: format!("cannot seek to offset {}: {}", found.offset, e),
            })?;

        let total_bytes = scan.input_size - found.offset;
        let bytes_written = self.copy_payload(
            &mut source,
            &mut dest,
            input,
            &output_path,
            total_bytes,
            progress_callback,
        )?;
        drop(dest);

        if self.preserve_timestamps {
            if let Ok(modified_time) = source.metadata().and_then(|m| m.modified()) {
                let _ = filetime::set_file_mtime(
                    &output_path,
                    filetime::FileTime::from_system_time(modified_time),
                );
            }
        }

        log::debug!(
            "wrote {} bytes to {}",
            bytes_written,
            output_path.display()
        );

        Ok(ExtractedInfo {
            format: found.format,
            offset: found.offset,
            bytes_written,
            output_path,
            input_size: scan.input_size,
        })
    }

    fn locate(&self, source: &mut fs::File, input: &Path) -> Result<(HeaderScan, SignatureMatch)> {
        let scan = self.scanner.scan(source, &input.display().to_string())?;

        match scan.found {
            Some(found) => Ok((scan, found)),
            None => Err(KoeError::NoSignatureFound {
                path: input.display().to_string(),
                scanned: scan.scan_size,
            }),
        }
    }

    fn output_path_for(&self, input: &Path, format: AudioFormat) -> Result<PathBuf> {
        derive_output_path(input, format, self.naming, self.output_dir.as_deref())
    }

    /// Streams `reader` into `writer` in fixed-size chunks until EOF.
    pub fn copy_payload<R: Read, W: Write>(
        &self,
        reader: &mut R,
        writer: &mut W,
        input: &Path,
        output: &Path,
        total_bytes: u64,
        progress_callback: Option<&dyn Fn(&CopyProgress)>,
    ) -> Result<u64> {
        let mut progress = CopyProgress::new(total_bytes);
        let mut buffer = vec![0u8; self.buffer_size];

        let write_error = |bytes_written: u64, source: std::io::Error| KoeError::Write {
            path: output.display().to_string(),
            bytes_written,
            source,
        };

        loop {
            let bytes_read = match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    return Err(KoeError::Read {
                        path: input.display().to_string(),
                        message: format!(
                            "failed after copying {} bytes: {}",
                            progress.bytes_written, e
                        ),
                    })
                }
            };

            writer
                .write_all(&buffer[..bytes_read])
                .map_err(|e| write_error(progress.bytes_written, e))?;

            progress.bytes_written += bytes_read as u64;

            if let Some(callback) = progress_callback {
                callback(&progress);
            }
        }

        writer
            .flush()
            .map_err(|e| write_error(progress.bytes_written, e))?;

        Ok(progress.bytes_written)
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new()
    }
}

fn open_input(input: &Path) -> Result<fs::File> {
    let open_error = |source: std::io::Error| KoeError::Open {
        path: input.display().to_string(),
        source,
    };

    let file = fs::File::open(input).map_err(open_error)?;
    let metadata = file.metadata().map_err(open_error)?;

    if !metadata.is_file() {
        return Err(open_error(std::io::Error::new(
            ErrorKind::InvalidInput,
            "not a regular file",
        )));
    }

    Ok(file)
}

fn create_output(input: &Path, output: &Path) -> Result<fs::File> {
    let create_error = |message: String| KoeError::Create {
        path: output.display().to_string(),
        message,
    };

    // Truncating the container itself would destroy the payload mid-copy
    if let (Ok(a), Ok(b)) = (fs::canonicalize(input), fs::canonicalize(output)) {
        if a == b {
            return Err(create_error("output path is the input file".to_string()));
        }
    }

    fs::File::create(output).map_err(|e| create_error(e.to_string()))
}
