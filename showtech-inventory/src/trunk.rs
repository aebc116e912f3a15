//! `show interface(s) trunk` parsing for both IOS and NX-OS layouts.

use std::collections::BTreeMap;

use log::{debug, warn};
use serde::Serialize;
use showtech_core::expand_vlan_range;

use crate::normalize::normalize;

/// Per-port trunk state. VLAN sets are sorted and duplicate free.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TrunkStatus {
    pub interface: String,
    pub mode: String,
    pub encapsulation: String,
    pub status: String,
    pub native_vlan: String,
    pub port_channel: String,
    pub allowed_vlans: Vec<u16>,
    pub active_vlans: Vec<u16>,
    pub forwarding_vlans: Vec<u16>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VlanSet {
    Allowed,
    Active,
    Forwarding,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Block {
    /// `Port Mode Encapsulation Status Native vlan`
    IosSummary,
    /// `Port Native Vlan Status Port Channel`
    NxosSummary,
    Vlans(VlanSet),
    Ignored,
}

impl Block {
    fn from_header(line: &str) -> Self {
        let lower = line.to_lowercase();
        if lower.contains("allowed on trunk") {
            Block::Vlans(VlanSet::Allowed)
        } else if lower.contains("allowed and active") {
            Block::Vlans(VlanSet::Active)
        } else if lower.contains("forwarding state and not pruned") || lower.contains("stp forwarding")
        {
            Block::Vlans(VlanSet::Forwarding)
        } else if lower.contains("mode") && lower.contains("encapsulation") {
            Block::IosSummary
        } else if lower.contains("native") && lower.contains("status") {
            Block::NxosSummary
        } else {
            Block::Ignored
        }
    }
}

/// Raw VLAN strings per port, held until every wrapped line is joined.
#[derive(Debug, Default)]
struct PendingTrunk {
    status: TrunkStatus,
    allowed: String,
    active: String,
    forwarding: String,
}

impl PendingTrunk {
    fn raw_mut(&mut self, set: VlanSet) -> &mut String {
        match set {
            VlanSet::Allowed => &mut self.allowed,
            VlanSet::Active => &mut self.active,
            VlanSet::Forwarding => &mut self.forwarding,
        }
    }
}

/// Where a wrapped continuation line should be appended.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Cursor {
    interface: String,
    set: VlanSet,
}

/// Parse trunk output into per-port state keyed by normalized name.
pub fn parse_trunk(body: &str) -> BTreeMap<String, TrunkStatus> {
    let mut pending: BTreeMap<String, PendingTrunk> = BTreeMap::new();
    let mut block = Block::Ignored;
    let mut cursor: Option<Cursor> = None;

    for line in body.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.chars().all(|c| c == '-') {
            continue;
        }
        if trimmed.starts_with("Port ") || trimmed == "Port" {
            block = Block::from_header(trimmed);
            cursor = None;
            debug!("trunk block {block:?}: {trimmed}");
            continue;
        }

        if line.starts_with(char::is_whitespace) {
            append_continuation(&mut pending, cursor.as_ref(), trimmed);
            continue;
        }

        let mut tokens = trimmed.split_whitespace();
        let Some(port) = tokens.next() else {
            continue;
        };
        let interface = normalize(port);
        let values: Vec<&str> = tokens.collect();

        match block {
            Block::IosSummary | Block::NxosSummary => {
                cursor = None;
                let entry = pending.entry(interface.clone()).or_default();
                entry.status.interface = interface;
                fill_summary(&mut entry.status, block, &values);
            }
            Block::Vlans(set) => {
                let entry = pending.entry(interface.clone()).or_default();
                entry.status.interface = interface.clone();
                let raw = entry.raw_mut(set);
                raw.clear();
                raw.push_str(&values.concat());
                cursor = Some(Cursor { interface, set });
            }
            Block::Ignored => {}
        }
    }

    pending
        .into_iter()
        .map(|(name, entry)| {
            let mut status = entry.status;
            status.allowed_vlans = expand_set(&entry.allowed);
            status.active_vlans = expand_set(&entry.active);
            status.forwarding_vlans = expand_set(&entry.forwarding);
            (name, status)
        })
        .collect()
}

fn fill_summary(status: &mut TrunkStatus, block: Block, values: &[&str]) {
    let get = |idx: usize| values.get(idx).copied().unwrap_or("").to_string();
    match block {
        Block::IosSummary => {
            status.mode = get(0);
            status.encapsulation = get(1);
            status.status = get(2);
            status.native_vlan = get(3);
        }
        Block::NxosSummary => {
            status.native_vlan = get(0);
            status.status = get(1);
            status.port_channel = get(2)
                .chars()
                .filter(char::is_ascii_digit)
                .collect();
        }
        Block::Vlans(_) | Block::Ignored => {}
    }
}

fn append_continuation(
    pending: &mut BTreeMap<String, PendingTrunk>,
    cursor: Option<&Cursor>,
    text: &str,
) {
    let Some(cursor) = cursor else {
        if text.chars().any(|c| c.is_ascii_digit()) {
            warn!("continuation line with no open trunk record: {text}");
        } else {
            debug!("skipping trunk header continuation: {text}");
        }
        return;
    };
    let Some(entry) = pending.get_mut(&cursor.interface) else {
        warn!("trunk cursor points at unknown port {}", cursor.interface);
        return;
    };
    let raw = entry.raw_mut(cursor.set);
    if !raw.is_empty() && !raw.ends_with(',') {
        raw.push(',');
    }
    raw.push_str(&text.split_whitespace().collect::<String>());
}

fn expand_set(raw: &str) -> Vec<u16> {
    let raw = raw.trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case("none") {
        return Vec::new();
    }
    expand_vlan_range(raw)
}
