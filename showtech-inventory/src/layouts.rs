use std::fmt::{self, Display, Formatter};
use std::fs;
use std::path::Path;

use log::{debug, warn};
use serde::Deserialize;
use showtech_core::ColumnSpan;
use thiserror::Error;

/// Block kinds found in NX-OS `show interface brief`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    Ethernet,
    Portchannel,
    Vlan,
    Mgmt,
}

impl SectionKind {
    /// Pick the block kind from the first header line after a dash separator.
    pub fn from_header(line: &str) -> Option<Self> {
        if line.contains("Port-channel") && line.contains("VLAN") {
            Some(SectionKind::Portchannel)
        } else if line.contains("Ethernet") && line.contains("VLAN") {
            Some(SectionKind::Ethernet)
        } else if line.contains("Interface") && line.contains("Secondary VLAN") {
            Some(SectionKind::Vlan)
        } else if line.contains("Port") && line.contains("VRF") {
            Some(SectionKind::Mgmt)
        } else {
            None
        }
    }

    /// Title of the first column, used to sanity-check a header line.
    fn leading_title(self) -> &'static str {
        match self {
            SectionKind::Ethernet => "Ethernet",
            SectionKind::Portchannel => "Port-channel",
            SectionKind::Vlan => "Interface",
            SectionKind::Mgmt => "Port",
        }
    }
}

impl Display for SectionKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            SectionKind::Ethernet => "ethernet",
            SectionKind::Portchannel => "portchannel",
            SectionKind::Vlan => "vlan",
            SectionKind::Mgmt => "mgmt",
        };
        f.write_str(name)
    }
}

/// Fixed column offsets per brief block kind.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ColumnLayouts {
    pub ethernet: Vec<ColumnSpan>,
    pub portchannel: Vec<ColumnSpan>,
    pub vlan: Vec<ColumnSpan>,
    pub mgmt: Vec<ColumnSpan>,
}

/// Errors returned when loading a layout file.
#[derive(Debug, Error)]
pub enum LayoutLoadError {
    #[error("failed to read layout file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse layout file {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
    #[error("invalid layout in {path}: {reason}")]
    Invalid { path: String, reason: String },
}

impl ColumnLayouts {
    /// Column spans for a block of `kind`.
    ///
    /// Offsets always come from the table, never from where titles sit in
    /// `header_line`; the header is only checked to flag drift in debug logs.
    pub fn columns_for(&self, header_line: &str, kind: SectionKind) -> &[ColumnSpan] {
        if !header_line.trim_start().starts_with(kind.leading_title()) {
            debug!("{kind} header does not start with '{}': {header_line}", kind.leading_title());
        }
        self.spans(kind)
    }

    pub fn spans(&self, kind: SectionKind) -> &[ColumnSpan] {
        match kind {
            SectionKind::Ethernet => &self.ethernet,
            SectionKind::Portchannel => &self.portchannel,
            SectionKind::Vlan => &self.vlan,
            SectionKind::Mgmt => &self.mgmt,
        }
    }

    fn validate(self, path: &str) -> Result<Self, LayoutLoadError> {
        let kinds = [
            SectionKind::Ethernet,
            SectionKind::Portchannel,
            SectionKind::Vlan,
            SectionKind::Mgmt,
        ];
        for kind in kinds {
            let spans = self.spans(kind);
            if !spans.iter().any(|span| span.field == "interface") {
                return Err(LayoutLoadError::Invalid {
                    path: path.to_string(),
                    reason: format!("{kind} layout has no 'interface' column"),
                });
            }
            if let Some(span) = spans.iter().find(|span| span.start >= span.end) {
                return Err(LayoutLoadError::Invalid {
                    path: path.to_string(),
                    reason: format!("{kind} column '{}' is empty or reversed", span.field),
                });
            }
        }
        Ok(self)
    }
}

impl Default for ColumnLayouts {
    fn default() -> Self {
        default_layouts()
    }
}

/// Load column layouts from a TOML file.
pub fn load_layouts(path: &Path) -> Result<ColumnLayouts, LayoutLoadError> {
    let raw = fs::read_to_string(path).map_err(|source| LayoutLoadError::Io {
        path: path.display().to_string(),
        source,
    })?;

    parse_layouts(&raw, path.display().to_string())
}

/// Built-in layouts.
pub fn default_layouts() -> ColumnLayouts {
    let embedded = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/layouts/columns.toml"));
    match parse_layouts(embedded, "embedded layouts".to_string()) {
        Ok(layouts) => layouts,
        Err(err) => {
            warn!("{err}; using compiled-in column offsets");
            fallback_layouts()
        }
    }
}

fn parse_layouts(raw: &str, path: String) -> Result<ColumnLayouts, LayoutLoadError> {
    let parsed: ColumnLayouts = toml::from_str(raw).map_err(|source| LayoutLoadError::Parse {
        path: path.clone(),
        source,
    })?;
    parsed.validate(&path)
}

fn fallback_layouts() -> ColumnLayouts {
    let ethernet_like = |speed_end: usize| {
        vec![
            ColumnSpan::new("interface", 0, 13),
            ColumnSpan::new("vlan", 13, 21),
            ColumnSpan::new("type", 21, 26),
            ColumnSpan::new("mode", 26, 33),
            ColumnSpan::new("status", 33, 41),
            ColumnSpan::new("reason", 41, 65),
            ColumnSpan::new("speed", 65, speed_end),
            ColumnSpan::new("port_ch", speed_end, 80).digits_only(),
        ]
    };
    ColumnLayouts {
        ethernet: ethernet_like(75),
        portchannel: ethernet_like(73),
        vlan: vec![
            ColumnSpan::new("interface", 0, 10),
            ColumnSpan::new("vlan", 10, 45),
            ColumnSpan::new("status", 45, 53),
            ColumnSpan::new("reason", 53, 80),
        ],
        mgmt: vec![
            ColumnSpan::new("interface", 0, 7),
            ColumnSpan::new("vrf", 7, 19),
            ColumnSpan::new("status", 19, 28),
            ColumnSpan::new("ip", 28, 65),
            ColumnSpan::new("speed", 65, 73),
            ColumnSpan::new("mtu", 73, 80),
        ],
    }
}
