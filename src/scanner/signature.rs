use serde::{Deserialize, Serialize};
use std::fmt;

/// Length of every magic marker the scanner looks for.
pub const SIGNATURE_LEN: usize = 4;

const RIFF_MAGIC: &[u8; SIGNATURE_LEN] = b"RIFF";
const OGG_MAGIC: &[u8; SIGNATURE_LEN] = b"OggS";

/// Audio payload kinds that can be carved out of a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    Wav,
    Ogg,
}

impl AudioFormat {
    /// Signatures in the order they are tested at each offset.
    pub const PRIORITY: [AudioFormat; 2] = [AudioFormat::Wav, AudioFormat::Ogg];

    pub fn magic(&self) -> &'static [u8; SIGNATURE_LEN] {
        match self {
            AudioFormat::Wav => RIFF_MAGIC,
            AudioFormat::Ogg => OGG_MAGIC,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            AudioFormat::Wav => "wav",
            AudioFormat::Ogg => "ogg",
        }
    }

    pub fn from_magic(window: &[u8]) -> Option<Self> {
        Self::PRIORITY
            .into_iter()
            .find(|format| window == format.magic())
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AudioFormat::Wav => write!(f, "WAV"),
            AudioFormat::Ogg => write!(f, "OGG"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureMatch {
    pub format: AudioFormat,
    pub offset: u64,
}

/// Finds the first audio signature in `window`.
///
/// Offsets are visited strictly left to right and RIFF is tested before OggS
/// at each offset, so the lowest offset wins regardless of format. A window
/// shorter than [`SIGNATURE_LEN`] has no candidate offsets.
pub fn find_signature(window: &[u8]) -> Option<SignatureMatch> {
    window
        .windows(SIGNATURE_LEN)
        .enumerate()
        .find_map(|(offset, candidate)| {
            AudioFormat::from_magic(candidate).map(|format| SignatureMatch {
                format,
                offset: offset as u64,
            })
        })
}
