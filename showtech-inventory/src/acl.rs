//! Access-list extraction from the running configuration.
//!
//! Numbered `access-list <id> ...` lines and named `ip access-list` blocks are
//! both reduced to the same token stream:
//!
//! ```text
//! access-list <id> <action> <protocol> <src> [port] <dst> [port] [flags..]
//! ```
//!
//! Standard lists carry no protocol and no destination.

use std::collections::BTreeMap;

use log::{debug, warn};
use serde::Serialize;
use showtech_core::{looks_like_dotted_quad, mask_to_cidr, wildcard_to_cidr, ConfigTree};

use crate::error::{BlockKind, MalformedBlock};

/// One permit/deny entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AclRule {
    pub acl_id: String,
    /// 1-based position among this list's non-remark entries.
    pub line_number: usize,
    pub action: String,
    pub protocol: String,
    pub src: String,
    pub src_port: String,
    pub dst: String,
    pub dst_port: String,
    pub flags: Vec<String>,
    /// Remarks seen since the previous entry, joined with `" | "`.
    pub remark: String,
}

/// A list line reduced to tokens, with the list flavour it came from.
#[derive(Debug, Clone)]
struct AclLine {
    id: String,
    standard: bool,
    tokens: Vec<String>,
}

/// Extract every access list, keyed by list id, entries in file order.
pub fn extract_acls(tree: &ConfigTree) -> BTreeMap<String, Vec<AclRule>> {
    let lines = collect_lines(tree);

    let mut ids: Vec<&str> = lines.iter().map(|line| line.id.as_str()).collect();
    ids.sort_unstable();
    ids.dedup();
    debug!("found access lists: {}", ids.join(", "));

    let mut acls = BTreeMap::new();
    for id in ids {
        let mut rules = Vec::new();
        let mut remarks: Vec<String> = Vec::new();
        let mut line_number = 0;

        for line in lines.iter().filter(|line| line.id == id) {
            if line.tokens.get(2).map(String::as_str) == Some("remark") {
                remarks.push(line.tokens[3..].join(" "));
                continue;
            }
            match parse_rule(line, line_number + 1, &remarks) {
                Ok(rule) => {
                    line_number += 1;
                    remarks.clear();
                    rules.push(rule);
                }
                Err(err) => warn!("{err}"),
            }
        }
        acls.insert(id.to_string(), rules);
    }
    acls
}

/// Numbered lists 1-99 and 1300-1999 are standard lists.
pub fn is_standard_number(id: &str) -> bool {
    matches!(id.parse::<u32>(), Ok(1..=99 | 1300..=1999))
}

fn collect_lines(tree: &ConfigTree) -> Vec<AclLine> {
    let mut lines = Vec::new();
    for stmt in &tree.statements {
        let tokens: Vec<&str> = stmt.trimmed().split_whitespace().collect();
        match tokens.as_slice() {
            ["access-list", id, rest @ ..] => {
                // ASA style `access-list NAME extended permit ...`
                let (flavour, rest) = match rest {
                    [kind @ ("standard" | "extended"), tail @ ..] => (Some(*kind), tail),
                    _ => (None, rest),
                };
                let standard = flavour.map_or_else(|| is_standard_number(id), |k| k == "standard");
                lines.push(AclLine {
                    id: id.to_string(),
                    standard,
                    tokens: with_prefix(id, rest),
                });
            }
            ["ip", "access-list", rest @ ..] => {
                let (standard, name) = match rest {
                    ["standard", name, ..] => (true, *name),
                    ["extended", name, ..] => (false, *name),
                    [name, ..] => (is_standard_number(name), *name),
                    [] => {
                        warn!("{}", MalformedBlock::new(BlockKind::AclLine, stmt.trimmed()));
                        continue;
                    }
                };
                for child in &stmt.children {
                    let mut body: Vec<&str> = child.trimmed().split_whitespace().collect();
                    if body.first().is_some_and(|t| t.bytes().all(|b| b.is_ascii_digit())) {
                        body.remove(0);
                    }
                    if !matches!(body.first(), Some(&("permit" | "deny" | "remark"))) {
                        debug!("skipping '{}' in access-list {name}", child.trimmed());
                        continue;
                    }
                    lines.push(AclLine {
                        id: name.to_string(),
                        standard,
                        tokens: with_prefix(name, &body),
                    });
                }
            }
            _ => {}
        }
    }
    lines
}

fn with_prefix(id: &str, rest: &[&str]) -> Vec<String> {
    ["access-list", id]
        .iter()
        .chain(rest.iter())
        .map(|t| t.to_string())
        .collect()
}

fn parse_rule(line: &AclLine, line_number: usize, remarks: &[String]) -> Result<AclRule, MalformedBlock> {
    let tokens = &line.tokens;
    let min_len = if line.standard { 4 } else { 5 };
    if tokens.len() < min_len {
        return Err(MalformedBlock::new(BlockKind::AclLine, tokens.join(" ")));
    }

    let mut rule = AclRule {
        acl_id: line.id.clone(),
        line_number,
        action: tokens[2].clone(),
        remark: remarks.join(" | "),
        ..AclRule::default()
    };

    let mut idx = if line.standard {
        rule.protocol = "ip".to_string();
        3
    } else {
        rule.protocol = tokens[3].clone();
        4
    };

    rule.src = endpoint(tokens, &mut idx)?;
    if !line.standard {
        if let Some(port) = port_match(tokens, &mut idx) {
            rule.src_port = port;
        }
        if idx < tokens.len() {
            rule.dst = endpoint(tokens, &mut idx)?;
            if let Some(port) = port_match(tokens, &mut idx) {
                rule.dst_port = port;
            }
        }
    }
    rule.flags = tokens[idx.min(tokens.len())..].to_vec();
    Ok(rule)
}

/// Consume one address side starting at `idx`.
fn endpoint(tokens: &[String], idx: &mut usize) -> Result<String, MalformedBlock> {
    let malformed = || MalformedBlock::new(BlockKind::AclLine, tokens.join(" "));
    let token = tokens.get(*idx).ok_or_else(malformed)?.as_str();
    let next = tokens.get(*idx + 1).map(String::as_str);

    let (value, used) = match (token, next) {
        ("any" | "any4" | "any6", _) => ("any".to_string(), 1),
        ("host", Some(addr)) => (format!("{addr}/32"), 2),
        ("host", None) => return Err(malformed()),
        (
            "object-group" | "addrgroup" | "object" | "object-group-user" | "interface",
            Some(name),
        ) => (format!("{token} {name}"), 2),
        (addr, Some(wildcard)) if looks_like_dotted_quad(addr) && looks_like_dotted_quad(wildcard) => {
            (address_with_mask(addr, wildcard), 2)
        }
        (other, _) => (other.to_string(), 1),
    };
    *idx += used;
    Ok(value)
}

/// IOS lists carry a wildcard, ASA lists a netmask. Wildcard wins when both
/// readings are valid (`0.0.0.0`, `255.255.255.255`).
fn address_with_mask(addr: &str, mask: &str) -> String {
    wildcard_to_cidr(addr, mask)
        .or_else(|err| mask_to_cidr(addr, mask).map_err(|_| err))
        .unwrap_or_else(|err| {
            warn!("keeping {addr}/{mask} as written: {err}");
            format!("{addr}/{mask}")
        })
}

/// Consume a port qualifier (`eq 22`, `gt 1023`, `range 1 5`) if one starts at `idx`.
fn port_match(tokens: &[String], idx: &mut usize) -> Option<String> {
    let op = tokens.get(*idx)?.as_str();
    let first = tokens.get(*idx + 1)?;
    let (value, used) = match op {
        "eq" => (first.clone(), 2),
        "gt" | "lt" | "neq" | "portgroup" => (format!("{op} {first}"), 2),
        "range" => {
            let second = tokens.get(*idx + 2)?;
            (format!("range {first} {second}"), 3)
        }
        _ => return None,
    };
    *idx += used;
    Some(value)
}
