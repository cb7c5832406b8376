use crate::error::{KoeError, Result};
use crate::scanner::signature::{find_signature, SignatureMatch};
use std::io::{ErrorKind, Read, Seek, SeekFrom};

/// Default number of leading bytes searched for an audio signature.
pub const DEFAULT_SCAN_LIMIT: u64 = 64 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderScan {
    pub input_size: u64,
    pub scan_size: u64,
    pub found: Option<SignatureMatch>,
}

pub struct HeaderScanner {
    scan_limit: u64,
}

impl HeaderScanner {
    pub fn new() -> Self {
        Self {
            scan_limit: DEFAULT_SCAN_LIMIT,
        }
    }

    pub fn with_scan_limit(mut self, limit: u64) -> Self {
        self.scan_limit = limit;
        self
    }

    pub fn scan_limit(&self) -> u64 {
        self.scan_limit
    }

    /// Reads the bounded header window of `reader` and searches it.
    ///
    /// The cursor is left just past the window; callers seek before copying.
    pub fn scan<R: Read + Seek>(&self, reader: &mut R, path: &str) -> Result<HeaderScan> {
        let input_size = reader
            .seek(SeekFrom::End(0))
            .and_then(|size| reader.rewind().map(|_| size))
            .map_err(|e| KoeError::Read {
                path: path.to_string(),
                message: format!("cannot determine file size: {}", e),
            })?;

        let scan_size = input_size.min(self.scan_limit);
        let mut window = vec![0u8; scan_size as usize];

        reader.read_exact(&mut window).map_err(|e| KoeError::Read {
            path: path.to_string(),
            message: match e.kind() {
                ErrorKind::UnexpectedEof => format!(
                    "expected {} header bytes but the file ended early",
                    scan_size
                ),
                _ => e.to_string(),
            },
        })?;

        let found = find_signature(&window);
        log::debug!(
            "scanned {} of {} bytes in {}: {:?}",
            scan_size,
            input_size,
            path,
            found
        );

        Ok(HeaderScan {
            input_size,
            scan_size,
            found,
        })
    }
}

impl Default for HeaderScanner {
    fn default() -> Self {
        Self::new()
    }
}
