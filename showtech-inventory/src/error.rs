use std::fmt::{self, Display, Formatter};

use showtech_core::SectionError;
use thiserror::Error;

/// Fatal errors for one capture file.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("failed to read capture {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("capture {path} is {size} bytes, above the {limit} byte limit")]
    TooLarge { path: String, size: u64, limit: u64 },
    #[error("failed to segment capture {path}: {source}")]
    Sections {
        path: String,
        source: SectionError,
    },
}

/// What kind of block failed to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Interface,
    AclLine,
    CdpEntry,
}

impl Display for BlockKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            BlockKind::Interface => "interface block",
            BlockKind::AclLine => "access-list line",
            BlockKind::CdpEntry => "CDP entry",
        };
        f.write_str(name)
    }
}

/// A single record that could not be extracted. Always logged and skipped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed {kind}: {detail}")]
pub struct MalformedBlock {
    pub kind: BlockKind,
    pub detail: String,
}

impl MalformedBlock {
    pub fn new(kind: BlockKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }
}
