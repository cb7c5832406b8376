pub mod file_extractor;
pub mod output_naming;
pub mod report;

pub use file_extractor::{
    CopyProgress, ExtractedInfo, Extractor, ProbeResult, DEFAULT_BUFFER_SIZE,
};
pub use output_naming::{derive_output_path, NamingPolicy};
pub use report::{ExtractionReport, SettingsSnapshot};
