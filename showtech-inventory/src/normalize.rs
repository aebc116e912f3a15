//! Canonical interface names, the join key between every extracted source.
//!
//! The running-config, `show interface brief`, trunk tables, interface detail
//! and CDP output all spell the same port differently (`Eth1/1`,
//! `Ethernet1/1`, `ethernet 1/1`). Everything is merged through [`normalize`].

/// Alias prefix (lowercase) to canonical prefix.
const ALIASES: &[(&str, &str)] = &[
    ("ethernet", "Ethernet"),
    ("eth", "Ethernet"),
    ("port-channel", "port-channel"),
    ("portchannel", "port-channel"),
    ("po", "port-channel"),
    ("vlan", "Vlan"),
    ("vl", "Vlan"),
    ("mgmt", "mgmt"),
    ("management", "mgmt"),
    ("gigabitethernet", "GigabitEthernet"),
    ("gig", "GigabitEthernet"),
    ("gi", "GigabitEthernet"),
    ("tengigabitethernet", "TenGigabitEthernet"),
    ("tengig", "TenGigabitEthernet"),
    ("te", "TenGigabitEthernet"),
    ("twentyfivegige", "TwentyFiveGigE"),
    ("twe", "TwentyFiveGigE"),
    ("fortygigabitethernet", "FortyGigabitEthernet"),
    ("fo", "FortyGigabitEthernet"),
    ("hundredgige", "HundredGigE"),
    ("hu", "HundredGigE"),
    ("fastethernet", "FastEthernet"),
    ("fa", "FastEthernet"),
    ("loopback", "Loopback"),
    ("lo", "Loopback"),
    ("tunnel", "Tunnel"),
    ("tu", "Tunnel"),
];

/// Canonicalize an interface name.
///
/// Total and idempotent: names that are not recognised come back trimmed but
/// otherwise untouched.
pub fn normalize(raw: &str) -> String {
    let trimmed = raw.trim();
    let split = trimmed
        .find(|c: char| c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    let (prefix, rest) = trimmed.split_at(split);
    let prefix = prefix.trim_end();
    if prefix.is_empty() || !is_port_number(rest) {
        return trimmed.to_string();
    }

    let lowered = prefix.to_ascii_lowercase();
    match ALIASES.iter().find(|(alias, _)| *alias == lowered) {
        Some((_, canonical)) => format!("{canonical}{rest}"),
        None => trimmed.to_string(),
    }
}

/// Interface family used to pick defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BaseType {
    Vlan,
    PortChannel,
    Loopback,
    Ethernet,
}

impl BaseType {
    /// Classify an already normalized name.
    pub fn of(normalized: &str) -> Self {
        if normalized.starts_with("Vlan") {
            BaseType::Vlan
        } else if normalized.starts_with("port-channel") {
            BaseType::PortChannel
        } else if normalized.starts_with("Loopback") {
            BaseType::Loopback
        } else {
            BaseType::Ethernet
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BaseType::Vlan => "vlan",
            BaseType::PortChannel => "port-channel",
            BaseType::Loopback => "loopback",
            BaseType::Ethernet => "ethernet",
        }
    }
}

/// `digit [digit / . :]*`
fn is_port_number(rest: &str) -> bool {
    let mut chars = rest.chars();
    chars.next().is_some_and(|c| c.is_ascii_digit())
        && chars.all(|c| c.is_ascii_digit() || matches!(c, '/' | '.' | ':'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_alias_matches_its_canonical_form() {
        for (alias, canonical) in ALIASES {
            assert_eq!(
                normalize(&format!("{alias}1/1")),
                normalize(&format!("{canonical}1/1")),
                "alias {alias}"
            );
        }
    }

    #[test]
    fn short_and_long_forms_agree() {
        assert_eq!(normalize("Eth1/1"), "Ethernet1/1");
        assert_eq!(normalize("Po12"), "port-channel12");
        assert_eq!(normalize("Gi1/0/24"), "GigabitEthernet1/0/24");
        assert_eq!(normalize("vlan 10"), "Vlan10");
        assert_eq!(normalize("Te1/1/1.100"), "TenGigabitEthernet1/1/1.100");
        assert_eq!(normalize("mgmt0"), "mgmt0");
    }

    #[test]
    fn normalization_is_idempotent() {
        for name in ["Eth1/1", "po7", "Lo0", "Tu100", "mgmt0", "Null0", "weird"] {
            let once = normalize(name);
            assert_eq!(normalize(&once), once, "{name}");
        }
    }

    #[test]
    fn unknown_names_pass_through_trimmed() {
        assert_eq!(normalize("  Null0 "), "Null0");
        assert_eq!(normalize("Eth1/1-2"), "Eth1/1-2");
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("  sup-eth1 "), "sup-eth1");
    }

    #[test]
    fn base_types() {
        assert_eq!(BaseType::of("Vlan10"), BaseType::Vlan);
        assert_eq!(BaseType::of("port-channel1"), BaseType::PortChannel);
        assert_eq!(BaseType::of("Loopback0"), BaseType::Loopback);
        assert_eq!(BaseType::of("Ethernet1/1"), BaseType::Ethernet);
        assert_eq!(BaseType::of("mgmt0"), BaseType::Ethernet);
    }
}
