use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::Serialize;
use showtech_core::PlatformFamily;

use crate::registry::Category;

/// Number of leading lines inspected by [`classify`].
pub const CLASSIFY_LINES: usize = 1000;

/// Coarse device type guessed from the head of a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DeviceHint {
    #[serde(rename = "Cisco IOS")]
    CiscoIos,
    #[serde(rename = "Cisco NXOS")]
    CiscoNxos,
    #[serde(rename = "Cisco ASA")]
    CiscoAsa,
    #[serde(rename = "Palo Alto")]
    PaloAlto,
    Unknown,
}

impl DeviceHint {
    pub const ALL: [DeviceHint; 5] = [
        DeviceHint::CiscoIos,
        DeviceHint::CiscoNxos,
        DeviceHint::CiscoAsa,
        DeviceHint::PaloAlto,
        DeviceHint::Unknown,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DeviceHint::CiscoIos => "Cisco IOS",
            DeviceHint::CiscoNxos => "Cisco NXOS",
            DeviceHint::CiscoAsa => "Cisco ASA",
            DeviceHint::PaloAlto => "Palo Alto",
            DeviceHint::Unknown => "Unknown",
        }
    }

    /// Categories this kind of device is expected to yield.
    pub fn categories(self) -> &'static [Category] {
        match self {
            DeviceHint::CiscoIos | DeviceHint::CiscoNxos => &[
                Category::Interfaces,
                Category::AccessLists,
                Category::Trunks,
                Category::Cdp,
            ],
            DeviceHint::CiscoAsa => &[Category::AccessLists],
            DeviceHint::PaloAlto | DeviceHint::Unknown => &[],
        }
    }

    /// Whether the hint agrees with the family detected from the sections.
    pub fn agrees_with(self, family: PlatformFamily) -> bool {
        matches!(
            (self, family),
            (DeviceHint::CiscoIos, PlatformFamily::Ios)
                | (DeviceHint::CiscoNxos, PlatformFamily::Nxos)
                | (_, PlatformFamily::Unknown)
                | (DeviceHint::Unknown, _)
        )
    }
}

impl Display for DeviceHint {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeviceHint {
    type Err = String;

    /// Accepts display names and short forms (`ios`, `nxos`, `asa`, `paloalto`).
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let key: String = value
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match key.as_str() {
            "ciscoios" | "ios" => Ok(DeviceHint::CiscoIos),
            "cisconxos" | "nxos" | "nexus" => Ok(DeviceHint::CiscoNxos),
            "ciscoasa" | "asa" => Ok(DeviceHint::CiscoAsa),
            "paloalto" | "panos" => Ok(DeviceHint::PaloAlto),
            "unknown" => Ok(DeviceHint::Unknown),
            _ => Err(format!(
                "unknown device hint '{value}' (expected one of: {})",
                DeviceHint::ALL.map(DeviceHint::as_str).join(", ")
            )),
        }
    }
}

/// Guess the device type from the first [`CLASSIFY_LINES`] lines of `text`.
pub fn classify(text: &str) -> DeviceHint {
    let head: String = text
        .lines()
        .take(CLASSIFY_LINES)
        .collect::<Vec<_>>()
        .join("\n");

    let has = |markers: &[&str]| markers.iter().any(|m| head.contains(m));

    if head.contains("<?xml")
        && has(&["<config", "<show"])
        && head.to_lowercase().contains("panos")
    {
        return DeviceHint::PaloAlto;
    }
    if has(&["ASA Version", "PIX Version", "Cisco Adaptive Security Appliance"]) {
        return DeviceHint::CiscoAsa;
    }
    if has(&["NX-OS", "Nexus"]) {
        return DeviceHint::CiscoNxos;
    }
    if has(&["IOS Software"]) {
        return DeviceHint::CiscoIos;
    }
    if has(&["show running-config", "show startup-config"]) {
        return DeviceHint::CiscoIos;
    }
    DeviceHint::Unknown
}
