//! Per-interface records built from `interface` blocks and enriched by the
//! brief tables and `show interface(s)` detail output.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{self, Display, Formatter};

use log::{debug, warn};
use serde::Serialize;
use showtech_core::{
    compress_vlan_range, expand_vlan_range, mask_to_cidr, normalize_cidr, ConfigStatement,
    ConfigTree,
};

use crate::brief::{BriefRow, IpBriefRow};
use crate::detail::InterfaceDetail;
use crate::error::{BlockKind, MalformedBlock};
use crate::normalize::{normalize, BaseType};

/// Default allowed list on a trunk with no `allowed vlan` statement.
pub const ALL_TRUNK_VLANS: &str = "1-4094";

/// Switching mode of a port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Access,
    Trunk,
    Routed,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Access => "access",
            Mode::Trunk => "trunk",
            Mode::Routed => "routed",
        }
    }
}

impl Display for Mode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One interface, keyed by its normalized name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InterfaceRecord {
    pub name: String,
    pub raw_name: String,
    pub base_type: BaseType,
    pub mode: Mode,
    pub vlan: String,
    pub allowed_trunks: String,
    pub ip_cidr: String,
    pub port_channel: String,
    pub description: String,
    pub status: String,
    pub protocol: String,
    pub reason: String,
    pub speed: String,
    pub mtu: String,
    pub detail: Option<InterfaceDetail>,
}

impl InterfaceRecord {
    fn new(raw_name: &str) -> Self {
        let name = normalize(raw_name);
        let base_type = BaseType::of(&name);
        let mode = match base_type {
            BaseType::Vlan | BaseType::Loopback => Mode::Routed,
            BaseType::PortChannel | BaseType::Ethernet => Mode::Access,
        };
        Self {
            name,
            raw_name: raw_name.to_string(),
            base_type,
            mode,
            vlan: String::new(),
            allowed_trunks: String::new(),
            ip_cidr: String::new(),
            port_channel: String::new(),
            description: String::new(),
            status: String::new(),
            protocol: String::new(),
            reason: String::new(),
            speed: String::new(),
            mtu: String::new(),
            detail: None,
        }
    }
}

/// Allowed-VLAN list built up from successive `switchport trunk allowed vlan`
/// statements. `None` means no statement was seen.
#[derive(Debug, Default)]
struct AllowedVlans(Option<BTreeSet<u16>>);

impl AllowedVlans {
    fn all() -> BTreeSet<u16> {
        (1..=4094).collect()
    }

    fn apply(&mut self, spec: &str) {
        let mut words = spec.split_whitespace();
        let Some(first) = words.next() else {
            return;
        };
        let rest: String = words.collect();
        let current = self.0.take().unwrap_or_else(Self::all);
        let next = match first {
            "all" => Self::all(),
            "none" => BTreeSet::new(),
            "add" => current.union(&ids(&rest)).copied().collect(),
            "remove" => current.difference(&ids(&rest)).copied().collect(),
            "except" => Self::all().difference(&ids(&rest)).copied().collect(),
            list => ids(list),
        };
        self.0 = Some(next);
    }

    fn render(&self) -> Option<String> {
        self.0.as_ref().map(|set| {
            if set.is_empty() {
                "none".to_string()
            } else {
                compress_vlan_range(set.iter().copied())
            }
        })
    }
}

fn ids(list: &str) -> BTreeSet<u16> {
    expand_vlan_range(list).into_iter().collect()
}

/// Build one record per `interface` block in the running configuration.
pub fn extract_interfaces(tree: &ConfigTree) -> BTreeMap<String, InterfaceRecord> {
    let mut records = BTreeMap::new();
    for stmt in tree.find(|text| text == "interface" || text.starts_with("interface ")) {
        match build_record(stmt) {
            Ok(record) => {
                debug!("interface {} mode={}", record.name, record.mode);
                records.insert(record.name.clone(), record);
            }
            Err(err) => warn!("{err}"),
        }
    }
    records
}

fn build_record(stmt: &ConfigStatement) -> Result<InterfaceRecord, MalformedBlock> {
    let raw_name = stmt
        .trimmed()
        .strip_prefix("interface")
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .ok_or_else(|| MalformedBlock::new(BlockKind::Interface, stmt.trimmed()))?;

    let mut record = InterfaceRecord::new(raw_name);
    let mut allowed = AllowedVlans::default();
    let mut address: Option<String> = None;

    for child in &stmt.children {
        let line = child.trimmed();
        let words: Vec<&str> = line.split_whitespace().collect();
        match words.as_slice() {
            ["description", ..] => {
                record.description = line["description".len()..].trim().to_string();
            }
            ["switchport", "access", "vlan", vlan, ..] => {
                record.vlan = vlan.to_string();
                record.mode = Mode::Access;
            }
            ["switchport", "trunk", "native", "vlan", vlan, ..] => {
                record.vlan = vlan.to_string();
                record.mode = Mode::Trunk;
            }
            ["switchport", "mode", "trunk", ..] => record.mode = Mode::Trunk,
            ["switchport", "mode", "access", ..] => record.mode = Mode::Access,
            ["switchport", "trunk", "allowed", "vlan", spec @ ..] => allowed.apply(&spec.join(" ")),
            ["channel-group", group, ..] => record.port_channel = group.to_string(),
            ["no", "switchport"] => record.mode = Mode::Routed,
            ["ip", "address", .., "secondary"] => {}
            ["ip", "address", addr, ..] if addr.contains('/') => address = Some(addr.to_string()),
            ["ip", "address", addr, mask, ..] => address = Some(format!("{addr} {mask}")),
            ["ip", "address", addr] => address = Some(addr.to_string()),
            _ => {}
        }
    }

    match record.mode {
        Mode::Access => {
            if record.vlan.is_empty() {
                record.vlan = "1".to_string();
            }
        }
        Mode::Trunk => {
            record.allowed_trunks = allowed
                .render()
                .unwrap_or_else(|| ALL_TRUNK_VLANS.to_string());
        }
        Mode::Routed => {
            record.vlan.clear();
            if let Some(address) = address {
                record.ip_cidr = address_to_cidr(&record.name, &address);
            }
        }
    }
    Ok(record)
}

fn address_to_cidr(interface: &str, address: &str) -> String {
    let converted = match address.split_once(' ') {
        Some((addr, mask)) => mask_to_cidr(addr, mask),
        None => normalize_cidr(address),
    };
    converted.unwrap_or_else(|err| {
        warn!("{interface}: cannot convert ip address '{address}': {err}");
        String::new()
    })
}

/// Merge NX-OS brief rows. Status, reason, speed and MTU always win; VLAN and
/// port-channel only fill fields the configuration left empty, and routed
/// ports never take a VLAN.
pub fn merge_brief(records: &mut BTreeMap<String, InterfaceRecord>, rows: &[BriefRow]) {
    for row in rows {
        let name = normalize(row.interface());
        let Some(record) = records.get_mut(&name) else {
            debug!("brief row for {name} has no configured interface");
            continue;
        };
        if let Some(status) = row.fields.get("status") {
            record.status = status.clone();
        }
        if let Some(reason) = row.fields.get("reason") {
            record.reason = reason.clone();
        }
        if let Some(speed) = row.fields.get("speed") {
            record.speed = strip_duplex_marker(speed);
        }
        if let Some(mtu) = row.fields.get("mtu") {
            record.mtu = mtu.clone();
        }
        if record.mode != Mode::Routed {
            fill_if_empty(&mut record.vlan, row.get("vlan"));
        }
        fill_if_empty(&mut record.port_channel, row.get("port_ch"));
    }
}

/// Merge IOS `show ip interface brief` status and protocol.
pub fn merge_ip_brief(records: &mut BTreeMap<String, InterfaceRecord>, rows: &[IpBriefRow]) {
    for row in rows {
        let name = normalize(&row.interface);
        match records.get_mut(&name) {
            Some(record) => {
                record.status = row.status.clone();
                record.protocol = row.protocol.clone();
            }
            None => debug!("ip brief row for {name} has no configured interface"),
        }
    }
}

/// Attach detail counters; speed, MTU, status and protocol are only filled
/// when still empty.
pub fn merge_detail(
    records: &mut BTreeMap<String, InterfaceRecord>,
    details: &BTreeMap<String, InterfaceDetail>,
) {
    for (name, detail) in details {
        let Some(record) = records.get_mut(name) else {
            debug!("detail block for {name} has no configured interface");
            continue;
        };
        if record.speed.is_empty() {
            if let Some(speed) = detail.speed_from_bandwidth() {
                record.speed = speed;
            }
        }
        fill_if_empty(&mut record.mtu, &detail.mtu);
        fill_if_empty(&mut record.status, &detail.admin_state);
        fill_if_empty(&mut record.protocol, &detail.protocol);
        record.detail = Some(detail.clone());
    }
}

fn fill_if_empty(field: &mut String, value: &str) {
    if field.is_empty() && !value.is_empty() && value != "--" {
        *field = value.to_string();
    }
}

/// `10G(D)` -> `10G`
fn strip_duplex_marker(speed: &str) -> String {
    speed.split('(').next().unwrap_or("").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layouts::SectionKind;
    use pretty_assertions::assert_eq;

    fn records(config: &str) -> BTreeMap<String, InterfaceRecord> {
        extract_interfaces(&ConfigTree::parse(config))
    }

    #[test]
    fn trunk_only_block_gets_default_allowed_list() {
        let records = records("interface Ethernet1/1\n  switchport mode trunk\n");
        let eth = &records["Ethernet1/1"];
        assert_eq!(eth.mode, Mode::Trunk);
        assert_eq!(eth.allowed_trunks, "1-4094");
    }

    #[test]
    fn no_switchport_with_address_is_routed() {
        let records = records(
            "interface GigabitEthernet0/1\n no switchport\n ip address 10.0.0.1 255.255.255.0\n",
        );
        let gi = &records["GigabitEthernet0/1"];
        assert_eq!(gi.mode, Mode::Routed);
        assert_eq!(gi.ip_cidr, "10.0.0.1/24");
        assert_eq!(gi.vlan, "");
    }

    #[test]
    fn address_with_trailing_options_still_converts() {
        let records = records(
            "interface GigabitEthernet0/1\n no switchport\n ip address 10.0.0.1 255.255.255.0 tag 5\n\
             interface Vlan30\n ip address 10.30.0.1/24 tag 7\n",
        );
        assert_eq!(records["GigabitEthernet0/1"].mode, Mode::Routed);
        assert_eq!(records["GigabitEthernet0/1"].ip_cidr, "10.0.0.1/24");
        assert_eq!(records["Vlan30"].ip_cidr, "10.30.0.1/24");
    }

    #[test]
    fn access_port_defaults_to_vlan_one() {
        let records = records("interface Eth1/2\n  description host port\n");
        let eth = &records["Ethernet1/2"];
        assert_eq!(eth.mode, Mode::Access);
        assert_eq!(eth.vlan, "1");
        assert_eq!(eth.description, "host port");
        assert_eq!(eth.raw_name, "Eth1/2");
    }

    #[test]
    fn svi_is_routed_and_accepts_prefix_form() {
        let records = records(
            "interface Vlan20\n  ip address 10.20.0.1/24\n  ip address 10.21.0.1/24 secondary\n",
        );
        let svi = &records["Vlan20"];
        assert_eq!(svi.mode, Mode::Routed);
        assert_eq!(svi.base_type, BaseType::Vlan);
        assert_eq!(svi.ip_cidr, "10.20.0.1/24");
    }

    #[test]
    fn switched_ports_never_carry_an_address() {
        let records = records("interface Ethernet1/3\n  ip address 10.0.0.1 255.255.255.0\n");
        assert_eq!(records["Ethernet1/3"].ip_cidr, "");
    }

    #[test]
    fn malformed_mask_leaves_cidr_empty() {
        let records = records("interface Loopback0\n ip address 10.0.0.1 255.0.255.0\n");
        assert_eq!(records["Loopback0"].ip_cidr, "");
    }

    #[test]
    fn allowed_vlan_modifiers_accumulate() {
        let records = records(
            "interface port-channel10\n\
             \x20 switchport mode trunk\n\
             \x20 switchport trunk native vlan 99\n\
             \x20 switchport trunk allowed vlan 10-20\n\
             \x20 switchport trunk allowed vlan add 30,40\n\
             \x20 switchport trunk allowed vlan remove 15-16\n",
        );
        let po = &records["port-channel10"];
        assert_eq!(po.vlan, "99");
        assert_eq!(po.allowed_trunks, "10-14,17-20,30,40");
    }

    #[test]
    fn allowed_vlan_except_and_none() {
        let records = records(
            "interface Gi1/0/1\n switchport mode trunk\n switchport trunk allowed vlan except 1\n\
             interface Gi1/0/2\n switchport mode trunk\n switchport trunk allowed vlan none\n",
        );
        assert_eq!(records["GigabitEthernet1/0/1"].allowed_trunks, "2-4094");
        assert_eq!(records["GigabitEthernet1/0/2"].allowed_trunks, "none");
    }

    #[test]
    fn interface_without_name_is_skipped() {
        let records = records("interface\n description orphan\ninterface Eth1/9\n");
        assert_eq!(records.len(), 1);
        assert!(records.contains_key("Ethernet1/9"));
    }

    #[test]
    fn channel_group_sets_membership() {
        let records = records("interface Ethernet1/4\n  channel-group 101 mode active\n");
        assert_eq!(records["Ethernet1/4"].port_channel, "101");
    }

    #[test]
    fn brief_merge_overwrites_status_and_fills_blanks() {
        let mut records = records(
            "interface Ethernet1/1\n  switchport mode trunk\n\
             interface Ethernet1/2\n  switchport access vlan 30\n",
        );
        let row = |name: &str, vlan: &str, port_ch: &str| BriefRow {
            kind: SectionKind::Ethernet,
            fields: [
                ("interface", name),
                ("vlan", vlan),
                ("status", "up"),
                ("reason", "none"),
                ("speed", "10G(D)"),
                ("port_ch", port_ch),
            ]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
        };
        merge_brief(
            &mut records,
            &[row("Eth1/1", "1", "101"), row("Eth1/2", "40", ""), row("Eth1/7", "1", "")],
        );
        let trunk = &records["Ethernet1/1"];
        assert_eq!(trunk.status, "up");
        assert_eq!(trunk.speed, "10G");
        assert_eq!(trunk.port_channel, "101");
        assert_eq!(trunk.vlan, "1");
        assert_eq!(records["Ethernet1/2"].vlan, "30");
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn detail_merge_derives_speed_from_bandwidth() {
        let mut records = records("interface Vlan10\n ip address 10.0.0.1 255.255.255.0\n");
        let detail = InterfaceDetail {
            interface: "Vlan10".to_string(),
            bandwidth_kbit: "1000000".to_string(),
            mtu: "1500".to_string(),
            crc: "3".to_string(),
            ..InterfaceDetail::default()
        };
        let details = BTreeMap::from([("Vlan10".to_string(), detail)]);
        merge_detail(&mut records, &details);
        let svi = &records["Vlan10"];
        assert_eq!(svi.speed, "1G");
        assert_eq!(svi.mtu, "1500");
        assert_eq!(svi.detail.as_ref().map(|d| d.crc.as_str()), Some("3"));
    }

    #[test]
    fn ip_brief_merge_sets_status_and_protocol() {
        let mut records = records("interface GigabitEthernet0/0\n no switchport\n");
        merge_ip_brief(
            &mut records,
            &[IpBriefRow {
                interface: "Gi0/0".to_string(),
                ip_address: "unassigned".to_string(),
                status: "administratively down".to_string(),
                protocol: "down".to_string(),
            }],
        );
        let gi = &records["GigabitEthernet0/0"];
        assert_eq!(gi.status, "administratively down");
        assert_eq!(gi.protocol, "down");
    }
}
