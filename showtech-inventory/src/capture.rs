//! Reading and segmenting one capture file.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use showtech_core::{ConfigTree, PlatformFamily, SectionStore};

use crate::error::CaptureError;
use crate::identify::{classify, DeviceHint};

/// Files above this size are refused unless the caller raises the limit.
pub const DEFAULT_MAX_BYTES: u64 = 64 * 1024 * 1024;

/// Capture text exactly as read, plus the device type guessed from its head.
#[derive(Debug, Clone)]
pub struct RawCapture {
    pub path: PathBuf,
    pub text: String,
    pub hint: DeviceHint,
}

impl RawCapture {
    /// Read `path` whole. Invalid UTF-8 is replaced rather than rejected.
    pub fn read(path: &Path, max_bytes: u64) -> Result<Self, CaptureError> {
        let io_err = |source| CaptureError::Io {
            path: path.display().to_string(),
            source,
        };
        let size = fs::metadata(path).map_err(io_err)?.len();
        if size > max_bytes {
            return Err(CaptureError::TooLarge {
                path: path.display().to_string(),
                size,
                limit: max_bytes,
            });
        }
        let bytes = fs::read(path).map_err(io_err)?;
        let text = String::from_utf8_lossy(&bytes).into_owned();
        debug!("read {} bytes from {}", bytes.len(), path.display());
        Ok(Self::from_text(path, text))
    }

    pub fn from_text(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        let text = text.into();
        let hint = classify(&text);
        Self {
            path: path.into(),
            text,
            hint,
        }
    }

    pub fn display_path(&self) -> String {
        self.path.display().to_string()
    }
}

/// A capture split into sections, with its running configuration parsed.
#[derive(Debug, Clone)]
pub struct ParsedCapture {
    pub raw: RawCapture,
    pub sections: SectionStore,
    pub config: Option<ConfigTree>,
    pub family: PlatformFamily,
}

impl ParsedCapture {
    pub fn parse(raw: RawCapture) -> Result<Self, CaptureError> {
        let sections =
            SectionStore::extract(&raw.text).map_err(|source| CaptureError::Sections {
                path: raw.display_path(),
                source,
            })?;
        let config = match sections.running_config() {
            Some(body) => Some(ConfigTree::parse(body)),
            None => {
                warn!(
                    "{}: no running-config section; interface and access-list data will be empty",
                    raw.display_path()
                );
                None
            }
        };
        let family = sections.platform_family();
        debug!(
            "{}: {} sections, family {family}",
            raw.display_path(),
            sections.len()
        );
        Ok(Self {
            raw,
            sections,
            config,
            family,
        })
    }

    pub fn hostname(&self) -> String {
        self.sections.hostname()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn oversized_files_are_refused_before_reading() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(&[b'x'; 64]).expect("write");
        let err = RawCapture::read(file.path(), 16).unwrap_err();
        assert!(matches!(err, CaptureError::TooLarge { size: 64, limit: 16, .. }));
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(b"`show version`\nCisco IOS Software \xff\n")
            .expect("write");
        let raw = RawCapture::read(file.path(), DEFAULT_MAX_BYTES).expect("read");
        assert!(raw.text.contains('\u{fffd}'));
        assert_eq!(raw.hint, DeviceHint::CiscoIos);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = RawCapture::read(Path::new("/nonexistent/capture.txt"), DEFAULT_MAX_BYTES)
            .unwrap_err();
        assert!(matches!(err, CaptureError::Io { .. }));
    }

    #[test]
    fn capture_without_running_config_still_parses() {
        let raw = RawCapture::from_text("t.txt", "`show version`\nCisco Nexus NX-OS\n");
        let parsed = ParsedCapture::parse(raw).expect("parsed");
        assert!(parsed.config.is_none());
        assert_eq!(parsed.family, PlatformFamily::Nxos);
        assert_eq!(parsed.hostname(), "unknown");
    }

    #[test]
    fn capture_without_headers_fails() {
        let raw = RawCapture::from_text("t.txt", "hello\n");
        let err = ParsedCapture::parse(raw).unwrap_err();
        assert!(matches!(err, CaptureError::Sections { .. }));
    }
}
