//! `show interface brief` (NX-OS) and `show ip interface brief` (IOS) tables.

use std::collections::BTreeMap;

use log::{debug, warn};
use showtech_core::parse_row;

use crate::layouts::{ColumnLayouts, SectionKind};

/// One data row of an NX-OS brief block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BriefRow {
    pub kind: SectionKind,
    pub fields: BTreeMap<String, String>,
}

impl BriefRow {
    /// Field value, empty when the layout has no such column.
    pub fn get(&self, field: &str) -> &str {
        self.fields.get(field).map(String::as_str).unwrap_or("")
    }

    pub fn interface(&self) -> &str {
        self.get("interface")
    }
}

/// One row of IOS `show ip interface brief`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IpBriefRow {
    pub interface: String,
    pub ip_address: String,
    pub status: String,
    pub protocol: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    Header,
    Data,
}

/// Parse every block of NX-OS `show interface brief`.
///
/// A dash-only line toggles between header and data. The first header line
/// of a block picks the column layout; repeated title lines in the data area
/// (`Interface ... Ch #`) are skipped.
pub fn parse_interface_brief(body: &str, layouts: &ColumnLayouts) -> Vec<BriefRow> {
    let mut rows = Vec::new();
    let mut state = State::Idle;
    let mut kind: Option<SectionKind> = None;
    let mut header_line = "";
    let mut awaiting_title = false;

    for line in body.lines() {
        let trimmed = line.trim();
        if is_dash_line(trimmed) {
            state = match state {
                State::Header => State::Data,
                State::Idle | State::Data => {
                    awaiting_title = true;
                    State::Header
                }
            };
            continue;
        }
        if trimmed.is_empty() {
            continue;
        }

        match state {
            State::Header => {
                if awaiting_title {
                    awaiting_title = false;
                    kind = SectionKind::from_header(line);
                    header_line = line;
                    match kind {
                        Some(found) => debug!("brief block '{found}' starts: {trimmed}"),
                        None => warn!("unrecognised brief header: {trimmed}"),
                    }
                }
            }
            State::Idle | State::Data => {
                if line.contains("Interface") || line.contains("Ch #") {
                    continue;
                }
                let Some(current) = kind else {
                    warn!("dropping brief row outside a known block: {trimmed}");
                    continue;
                };
                let fields = parse_row(line, layouts.columns_for(header_line, current));
                if fields.get("interface").is_some_and(|name| !name.is_empty()) {
                    rows.push(BriefRow {
                        kind: current,
                        fields,
                    });
                }
            }
        }
    }
    rows
}

/// Parse IOS `show ip interface brief`. The status column may span words
/// (`administratively down`).
pub fn parse_ip_interface_brief(body: &str) -> Vec<IpBriefRow> {
    let mut rows = Vec::new();
    for line in body.lines() {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.is_empty() || tokens[0] == "Interface" {
            continue;
        }
        if tokens.len() < 6 {
            debug!("skipping short ip brief line: {}", line.trim());
            continue;
        }
        let last = tokens.len() - 1;
        rows.push(IpBriefRow {
            interface: tokens[0].to_string(),
            ip_address: tokens[1].to_string(),
            status: tokens[4..last].join(" "),
            protocol: tokens[last].to_string(),
        });
    }
    rows
}

fn is_dash_line(trimmed: &str) -> bool {
    !trimmed.is_empty() && trimmed.chars().all(|c| c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layouts::default_layouts;

    fn pad(cells: &[(&str, usize)]) -> String {
        cells
            .iter()
            .map(|(text, width)| format!("{text:<width$}"))
            .collect()
    }

    #[test]
    fn ethernet_block_rows_use_fixed_offsets() {
        let dash = "-".repeat(80);
        let row = pad(&[
            ("Eth1/1", 13),
            ("1", 8),
            ("eth", 5),
            ("trunk", 7),
            ("up", 8),
            ("none", 24),
            ("10G(D)", 10),
            ("101", 5),
        ]);
        let body = format!(
            "\n{dash}\nEthernet      VLAN    Type Mode   Status  Reason                   Speed     Port\n\
             Interface                                                                    Ch #\n\
             {dash}\n{row}\n"
        );
        let rows = parse_interface_brief(&body, &default_layouts());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].kind, SectionKind::Ethernet);
        assert_eq!(rows[0].interface(), "Eth1/1");
        assert_eq!(rows[0].get("status"), "up");
        assert_eq!(rows[0].get("speed"), "10G(D)");
        assert_eq!(rows[0].get("port_ch"), "101");
    }

    #[test]
    fn rows_without_a_block_are_dropped() {
        let rows = parse_interface_brief("Eth1/1  1  eth  access up\n", &default_layouts());
        assert!(rows.is_empty());
    }

    #[test]
    fn second_block_switches_layout() {
        let dash = "-".repeat(80);
        let mgmt = pad(&[
            ("mgmt0", 7),
            ("--", 12),
            ("up", 9),
            ("192.168.0.10", 37),
            ("1000", 8),
            ("1500", 7),
        ]);
        let body = format!(
            "{dash}\nPort   VRF          Status IP Address                              Speed    MTU\n{dash}\n{mgmt}\n"
        );
        let rows = parse_interface_brief(&body, &default_layouts());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].kind, SectionKind::Mgmt);
        assert_eq!(rows[0].get("ip"), "192.168.0.10");
        assert_eq!(rows[0].get("mtu"), "1500");
    }

    #[test]
    fn ip_brief_joins_multi_word_status() {
        let body = "Interface              IP-Address      OK? Method Status                Protocol\n\
                    GigabitEthernet0/0     10.0.0.1        YES NVRAM  up                    up\n\
                    Vlan1                  unassigned      YES unset  administratively down down\n";
        let rows = parse_ip_interface_brief(body);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].status, "administratively down");
        assert_eq!(rows[1].protocol, "down");
        assert_eq!(rows[0].ip_address, "10.0.0.1");
    }
}
