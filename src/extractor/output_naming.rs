use crate::error::{KoeError, Result};
use crate::scanner::AudioFormat;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const DOS_STEM_LEN: usize = 8;
const DOS_FALLBACK_STEM: &str = "UNNAMED";

/// How the extracted file is named relative to its container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum NamingPolicy {
    /// Replace (or append) the extension: `voice01.koe` -> `voice01.wav`
    #[default]
    Simple,
    /// Legacy 8.3 name: `voice_track01.koe` -> `VOICE_TR.WAV`
    Dos,
}

/// Computes where the payload of `input` is written.
///
/// The file lands next to the input unless `output_dir` is given.
pub fn derive_output_path(
    input: &Path,
    format: AudioFormat,
    policy: NamingPolicy,
    output_dir: Option<&Path>,
) -> Result<PathBuf> {
    let file_name = match policy {
        NamingPolicy::Simple => {
            let name = input.file_name().ok_or_else(|| KoeError::Create {
                path: input.display().to_string(),
                message: "cannot derive an output file name".to_string(),
            })?;
            PathBuf::from(name).with_extension(format.extension())
        }
        NamingPolicy::Dos => PathBuf::from(format!(
            "{}.{}",
            dos_stem(&input.to_string_lossy()),
            format.extension().to_ascii_uppercase()
        )),
    };

    let dir = match output_dir {
        Some(dir) => dir,
        None => input.parent().unwrap_or_else(|| Path::new("")),
    };

    Ok(dir.join(file_name))
}

fn dos_stem(path: &str) -> String {
    // DOS drive letters and both slash styles all end a path component
    let name = path
        .rsplit(|c: char| c == '/' || c == '\\' || c == ':')
        .next()
        .unwrap_or(path);

    let stem: String = name
        .chars()
        .take_while(|&c| c != '.')
        .take(DOS_STEM_LEN)
        .map(|c| c.to_ascii_uppercase())
        .collect();

    match sanitize_filename(&stem) {
        s if s.is_empty() => DOS_FALLBACK_STEM.to_string(),
        s => s,
    }
}

/// Replaces characters that are not allowed in file names on common platforms.
pub fn sanitize_filename(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|ch| match ch {
            '<' | '>' | ':' | '"' | '|' | '?' | '*' => '_',
            '/' | '\\' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    // Trailing dots and spaces are problematic on Windows
    sanitized.trim_end_matches(&['.', ' '][..]).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_replaces_extension() {
        let out = derive_output_path(
            Path::new("data/voice01.koe"),
            AudioFormat::Wav,
            NamingPolicy::Simple,
            None,
        )
        .unwrap();
        assert_eq!(out, PathBuf::from("data/voice01.wav"));

        let out = derive_output_path(
            Path::new("voice01.koe"),
            AudioFormat::Ogg,
            NamingPolicy::Simple,
            None,
        )
        .unwrap();
        assert_eq!(out, PathBuf::from("voice01.ogg"));
    }

    #[test]
    fn test_simple_appends_missing_extension() {
        let out = derive_output_path(
            Path::new("dump/track"),
            AudioFormat::Ogg,
            NamingPolicy::Simple,
            None,
        )
        .unwrap();
        assert_eq!(out, PathBuf::from("dump/track.ogg"));
    }

    #[test]
    fn test_output_dir_overrides_parent() {
        let out = derive_output_path(
            Path::new("data/voice01.koe"),
            AudioFormat::Wav,
            NamingPolicy::Simple,
            Some(Path::new("out")),
        )
        .unwrap();
        assert_eq!(out, PathBuf::from("out/voice01.wav"));
    }

    #[test]
    fn test_dos_names() {
        let out = derive_output_path(
            Path::new("data/voice_track01.koe"),
            AudioFormat::Wav,
            NamingPolicy::Dos,
            None,
        )
        .unwrap();
        assert_eq!(out, PathBuf::from("data/VOICE_TR.WAV"));

        let out = derive_output_path(
            Path::new("bgm.v2.koe"),
            AudioFormat::Ogg,
            NamingPolicy::Dos,
            None,
        )
        .unwrap();
        assert_eq!(out, PathBuf::from("BGM.OGG"));
    }

    #[test]
    fn test_dos_stem_handles_dos_separators() {
        assert_eq!(dos_stem("C:\\GAME\\VOICE\\kanon001.koe"), "KANON001");
        assert_eq!(dos_stem("A:seen.koe"), "SEEN");
        assert_eq!(dos_stem(".koe"), "UNNAMED");
        assert_eq!(dos_stem("a*b?.koe"), "A_B_");
    }

    #[test]
    fn test_filename_sanitization() {
        assert_eq!(sanitize_filename("normal_file.txt"), "normal_file.txt");
        assert_eq!(sanitize_filename("file<>with|bad*chars.txt"), "file__with_bad_chars.txt");
        assert_eq!(sanitize_filename("file..."), "file");
        assert_eq!(sanitize_filename("   "), "");
    }

    #[test]
    fn test_simple_rejects_nameless_input() {
        let result = derive_output_path(
            Path::new("/"),
            AudioFormat::Wav,
            NamingPolicy::Simple,
            None,
        );
        assert!(matches!(result, Err(KoeError::Create { .. })));
    }
}
