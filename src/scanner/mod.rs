pub mod header_scanner;
pub mod signature;

pub use header_scanner::{HeaderScan, HeaderScanner};
pub use signature::{find_signature, AudioFormat, SignatureMatch, SIGNATURE_LEN};
