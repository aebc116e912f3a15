//! `show cdp neighbors detail` parsing.

use std::sync::LazyLock;

use log::{debug, warn};
use regex::{Captures, Regex};
use serde::Serialize;

use crate::error::{BlockKind, MalformedBlock};
use crate::normalize::normalize;

/// One directly connected neighbor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CdpNeighbor {
    pub local_interface: String,
    pub remote_hostname: String,
    pub remote_port: String,
    pub remote_ip: String,
    pub platform: String,
    /// Single-letter capability codes in advertised order (`R S I`).
    pub capabilities: String,
    pub remote_version: String,
}

const CAPABILITY_CODES: &[(&str, &str)] = &[
    ("router", "R"),
    ("trans-bridge", "T"),
    ("source-route-bridge", "B"),
    ("switch", "S"),
    ("host", "H"),
    ("igmp", "I"),
    ("repeater", "r"),
    ("phone", "P"),
    ("remote", "D"),
    ("cvta", "C"),
];

struct Rule {
    pattern: Regex,
    apply: fn(&mut CdpNeighbor, &Captures),
}

fn rule(pattern: &str, apply: fn(&mut CdpNeighbor, &Captures)) -> Rule {
    Rule {
        pattern: Regex::new(pattern).expect("valid cdp rule"),
        apply,
    }
}

fn fill(field: &mut String, value: String) {
    if field.is_empty() {
        *field = value;
    }
}

static RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    vec![
        rule(r"Device ID:\s*(\S+)", |n, c| {
            fill(&mut n.remote_hostname, strip_serial(&c[1]).to_string())
        }),
        rule(r"IP(?:v4)? [Aa]ddress:\s*(\d+\.\d+\.\d+\.\d+)", |n, c| {
            fill(&mut n.remote_ip, c[1].to_string())
        }),
        rule(r"Platform:\s*([^,\n]+)", |n, c| {
            fill(&mut n.platform, c[1].trim().to_string())
        }),
        rule(r"Capabilities:\s*([^\n]*)", |n, c| {
            fill(&mut n.capabilities, capability_codes(&c[1]))
        }),
        rule(
            r"(?m)Interface:\s*([^,\n]+),\s*Port ID \(outgoing port\):\s*(.+?)\s*$",
            |n, c| {
                fill(&mut n.local_interface, normalize(&c[1]));
                fill(&mut n.remote_port, normalize(&c[2]));
            },
        ),
        rule(r"(?ms)^Version\s*:\s*$(.*)", |n, c| {
            fill(&mut n.remote_version, version_from(&c[1]))
        }),
    ]
});

static RELEASE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bVersion\s+([0-9][^\s,]*)").expect("valid cdp version regex")
});

/// Parse neighbor entries. Entries without a remote hostname or a local
/// interface are logged and dropped.
pub fn parse_cdp_neighbors(body: &str) -> Vec<CdpNeighbor> {
    let mut neighbors = Vec::new();
    for block in split_entries(body) {
        match parse_entry(&block) {
            Ok(Some(neighbor)) => neighbors.push(neighbor),
            Ok(None) => {}
            Err(err) => warn!("{err}"),
        }
    }
    neighbors
}

fn split_entries(body: &str) -> Vec<String> {
    let mut blocks = vec![String::new()];
    for line in body.lines() {
        let trimmed = line.trim();
        let is_separator = trimmed.len() >= 5 && trimmed.chars().all(|c| c == '-');
        if is_separator || trimmed.starts_with("Device ID") {
            blocks.push(String::new());
            if is_separator {
                continue;
            }
        }
        if let Some(current) = blocks.last_mut() {
            current.push_str(line);
            current.push('\n');
        }
    }
    blocks
        .into_iter()
        .filter(|block| !block.trim().is_empty())
        .collect()
}

fn parse_entry(block: &str) -> Result<Option<CdpNeighbor>, MalformedBlock> {
    let mut neighbor = CdpNeighbor::default();
    let mut matched = false;
    for rule in RULES.iter() {
        if let Some(caps) = rule.pattern.captures(block) {
            matched = true;
            (rule.apply)(&mut neighbor, &caps);
        }
    }
    if !matched {
        debug!("skipping non-neighbor text in CDP output");
        return Ok(None);
    }
    if neighbor.remote_hostname.is_empty() || neighbor.local_interface.is_empty() {
        let summary = block.lines().find(|l| !l.trim().is_empty()).unwrap_or("");
        return Err(MalformedBlock::new(
            BlockKind::CdpEntry,
            format!("missing device id or local interface near '{}'", summary.trim()),
        ));
    }
    Ok(Some(neighbor))
}

/// NX-OS appends the chassis serial: `core-sw2(FOX1234ABCD)`.
fn strip_serial(device_id: &str) -> &str {
    match device_id.find('(') {
        Some(idx) if idx > 0 && device_id.ends_with(')') => &device_id[..idx],
        _ => device_id,
    }
}

fn capability_codes(text: &str) -> String {
    let mut codes: Vec<&str> = Vec::new();
    for word in text.split(|c: char| c.is_whitespace() || c == ',') {
        let lower = word.to_ascii_lowercase();
        if let Some((_, code)) = CAPABILITY_CODES.iter().find(|(name, _)| *name == lower) {
            if !codes.contains(code) {
                codes.push(code);
            }
        }
    }
    codes.join(" ")
}

fn version_from(tail: &str) -> String {
    if let Some(caps) = RELEASE.captures(tail) {
        return caps[1].to_string();
    }
    tail.lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("")
        .to_string()
}
