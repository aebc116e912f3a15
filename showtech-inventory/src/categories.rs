//! Built-in category extractors and their flat record layouts.

use showtech_core::{compress_vlan_range, RUNNING_CONFIG_COMMANDS};

use crate::acl::{extract_acls, AclRule};
use crate::brief::{parse_interface_brief, parse_ip_interface_brief};
use crate::cdp::{parse_cdp_neighbors, CdpNeighbor};
use crate::detail::{parse_interface_details, InterfaceDetail};
use crate::interfaces::{
    extract_interfaces, merge_brief, merge_detail, merge_ip_brief, InterfaceRecord,
};
use crate::registry::{Category, CategoryExtractor, ExtractContext, Record};
use crate::trunk::{parse_trunk, TrunkStatus};

pub const BRIEF_COMMANDS: [&str; 2] = ["show interface brief", "show interfaces brief"];
pub const IP_BRIEF_COMMANDS: [&str; 2] = ["show ip interface brief", "show ip int brief"];
pub const DETAIL_COMMANDS: [&str; 2] = ["show interface", "show interfaces"];
pub const TRUNK_COMMANDS: [&str; 2] = ["show interface trunk", "show interfaces trunk"];
pub const CDP_COMMANDS: [&str; 3] = [
    "show cdp neighbors detail",
    "show cdp neighbor detail",
    "show cdp entry *",
];

inventory::submit! {
    CategoryExtractor {
        category: Category::Interfaces,
        sources: &RUNNING_CONFIG_COMMANDS,
        extract: interface_records,
    }
}

inventory::submit! {
    CategoryExtractor {
        category: Category::AccessLists,
        sources: &RUNNING_CONFIG_COMMANDS,
        extract: acl_records,
    }
}

inventory::submit! {
    CategoryExtractor {
        category: Category::Trunks,
        sources: &TRUNK_COMMANDS,
        extract: trunk_records,
    }
}

inventory::submit! {
    CategoryExtractor {
        category: Category::Cdp,
        sources: &CDP_COMMANDS,
        extract: cdp_records,
    }
}

fn record<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Record {
    pairs
        .into_iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

fn interface_records(ctx: &ExtractContext<'_>) -> Vec<Record> {
    let Some(config) = ctx.config else {
        return Vec::new();
    };
    let mut records = extract_interfaces(config);

    if let Some(body) = ctx.sections.get_any(&BRIEF_COMMANDS) {
        merge_brief(&mut records, &parse_interface_brief(body, ctx.layouts));
    }
    if let Some(body) = ctx.sections.get_any(&IP_BRIEF_COMMANDS) {
        merge_ip_brief(&mut records, &parse_ip_interface_brief(body));
    }
    if let Some(body) = ctx.sections.get_any(&DETAIL_COMMANDS) {
        merge_detail(&mut records, &parse_interface_details(body));
    }

    records.values().map(interface_record).collect()
}

/// Flatten an interface into its record; counters are empty when no detail
/// block was merged.
pub fn interface_record(iface: &InterfaceRecord) -> Record {
    let mut out = record([
        ("interface", iface.name.as_str()),
        ("raw_name", iface.raw_name.as_str()),
        ("type", iface.base_type.as_str()),
        ("mode", iface.mode.as_str()),
        ("vlan", iface.vlan.as_str()),
        ("allowed_trunks", iface.allowed_trunks.as_str()),
        ("ip_cidr", iface.ip_cidr.as_str()),
        ("port_channel", iface.port_channel.as_str()),
        ("description", iface.description.as_str()),
        ("status", iface.status.as_str()),
        ("protocol", iface.protocol.as_str()),
        ("reason", iface.reason.as_str()),
        ("speed", iface.speed.as_str()),
        ("mtu", iface.mtu.as_str()),
    ]);
    match &iface.detail {
        Some(detail) => out.extend(record(detail.counters())),
        None => out.extend(record(
            InterfaceDetail::counter_names().into_iter().map(|name| (name, "")),
        )),
    }
    out
}

fn acl_records(ctx: &ExtractContext<'_>) -> Vec<Record> {
    let Some(config) = ctx.config else {
        return Vec::new();
    };
    extract_acls(config)
        .values()
        .flatten()
        .map(acl_record)
        .collect()
}

pub fn acl_record(rule: &AclRule) -> Record {
    let line = rule.line_number.to_string();
    let flags = rule.flags.join(" ");
    record([
        ("acl_id", rule.acl_id.as_str()),
        ("line", line.as_str()),
        ("action", rule.action.as_str()),
        ("protocol", rule.protocol.as_str()),
        ("src", rule.src.as_str()),
        ("src_port", rule.src_port.as_str()),
        ("dst", rule.dst.as_str()),
        ("dst_port", rule.dst_port.as_str()),
        ("flags", flags.as_str()),
        ("remark", rule.remark.as_str()),
    ])
}

fn trunk_records(ctx: &ExtractContext<'_>) -> Vec<Record> {
    let Some(body) = ctx.sections.get_any(&TRUNK_COMMANDS) else {
        return Vec::new();
    };
    parse_trunk(body).values().map(trunk_record).collect()
}

pub fn trunk_record(trunk: &TrunkStatus) -> Record {
    let allowed = compress_vlan_range(trunk.allowed_vlans.iter().copied());
    let active = compress_vlan_range(trunk.active_vlans.iter().copied());
    let forwarding = compress_vlan_range(trunk.forwarding_vlans.iter().copied());
    record([
        ("interface", trunk.interface.as_str()),
        ("mode", trunk.mode.as_str()),
        ("encapsulation", trunk.encapsulation.as_str()),
        ("status", trunk.status.as_str()),
        ("native_vlan", trunk.native_vlan.as_str()),
        ("port_channel", trunk.port_channel.as_str()),
        ("allowed_vlans", allowed.as_str()),
        ("active_vlans", active.as_str()),
        ("forwarding_vlans", forwarding.as_str()),
    ])
}

fn cdp_records(ctx: &ExtractContext<'_>) -> Vec<Record> {
    let Some(body) = ctx.sections.get_any(&CDP_COMMANDS) else {
        return Vec::new();
    };
    parse_cdp_neighbors(body).iter().map(cdp_record).collect()
}

pub fn cdp_record(neighbor: &CdpNeighbor) -> Record {
    record([
        ("local_interface", neighbor.local_interface.as_str()),
        ("remote_hostname", neighbor.remote_hostname.as_str()),
        ("remote_port", neighbor.remote_port.as_str()),
        ("remote_ip", neighbor.remote_ip.as_str()),
        ("platform", neighbor.platform.as_str()),
        ("capabilities", neighbor.capabilities.as_str()),
        ("remote_version", neighbor.remote_version.as_str()),
    ])
}
