//! Operational counters from `show interface(s)` prose output.
//!
//! The output is split into one block per interface (`<name> is ...` at the
//! start of a line) and each block is run through an ordered list of
//! `(pattern, setter)` rules. A field keeps the first value any rule gives it;
//! rules that do not match leave the field empty.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use log::debug;
use regex::{Captures, Regex};
use serde::Serialize;

use crate::normalize::normalize;

/// Counters and state for one interface block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InterfaceDetail {
    pub interface: String,
    pub admin_state: String,
    pub protocol: String,
    pub hardware: String,
    pub mac_address: String,
    pub mtu: String,
    pub bandwidth_kbit: String,
    pub delay_usec: String,
    pub reliability: String,
    pub txload: String,
    pub rxload: String,
    pub encapsulation: String,
    pub duplex: String,
    pub oper_speed: String,
    pub media_type: String,
    pub last_link_flapped: String,
    pub last_input: String,
    pub last_output: String,
    pub last_clearing: String,
    pub input_rate_bps: String,
    pub input_rate_pps: String,
    pub output_rate_bps: String,
    pub output_rate_pps: String,
    pub input_packets: String,
    pub input_bytes: String,
    pub output_packets: String,
    pub output_bytes: String,
    pub input_errors: String,
    pub crc: String,
    pub frame: String,
    pub overrun: String,
    pub ignored: String,
    pub runts: String,
    pub giants: String,
    pub input_drops: String,
    pub output_errors: String,
    pub output_drops: String,
    pub collisions: String,
    pub interface_resets: String,
}

impl InterfaceDetail {
    /// Counter names and values in display order (everything but the name).
    pub fn counters(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("admin_state", self.admin_state.as_str()),
            ("protocol", self.protocol.as_str()),
            ("hardware", self.hardware.as_str()),
            ("mac_address", self.mac_address.as_str()),
            ("bandwidth_kbit", self.bandwidth_kbit.as_str()),
            ("delay_usec", self.delay_usec.as_str()),
            ("reliability", self.reliability.as_str()),
            ("txload", self.txload.as_str()),
            ("rxload", self.rxload.as_str()),
            ("encapsulation", self.encapsulation.as_str()),
            ("duplex", self.duplex.as_str()),
            ("oper_speed", self.oper_speed.as_str()),
            ("media_type", self.media_type.as_str()),
            ("last_link_flapped", self.last_link_flapped.as_str()),
            ("last_input", self.last_input.as_str()),
            ("last_output", self.last_output.as_str()),
            ("last_clearing", self.last_clearing.as_str()),
            ("input_rate_bps", self.input_rate_bps.as_str()),
            ("input_rate_pps", self.input_rate_pps.as_str()),
            ("output_rate_bps", self.output_rate_bps.as_str()),
            ("output_rate_pps", self.output_rate_pps.as_str()),
            ("input_packets", self.input_packets.as_str()),
            ("input_bytes", self.input_bytes.as_str()),
            ("output_packets", self.output_packets.as_str()),
            ("output_bytes", self.output_bytes.as_str()),
            ("input_errors", self.input_errors.as_str()),
            ("crc", self.crc.as_str()),
            ("frame", self.frame.as_str()),
            ("overrun", self.overrun.as_str()),
            ("ignored", self.ignored.as_str()),
            ("runts", self.runts.as_str()),
            ("giants", self.giants.as_str()),
            ("input_drops", self.input_drops.as_str()),
            ("output_errors", self.output_errors.as_str()),
            ("output_drops", self.output_drops.as_str()),
            ("collisions", self.collisions.as_str()),
            ("interface_resets", self.interface_resets.as_str()),
        ]
    }

    /// Names of [`InterfaceDetail::counters`], for building uniform records.
    pub fn counter_names() -> Vec<&'static str> {
        InterfaceDetail::default()
            .counters()
            .into_iter()
            .map(|(name, _)| name)
            .collect()
    }

    /// Coarse speed label derived from `BW <n> Kbit`.
    pub fn speed_from_bandwidth(&self) -> Option<String> {
        let kbit: u64 = self.bandwidth_kbit.parse().ok()?;
        Some(speed_label(kbit))
    }
}

struct Rule {
    pattern: Regex,
    apply: fn(&mut InterfaceDetail, &Captures),
}

fn rule(pattern: &str, apply: fn(&mut InterfaceDetail, &Captures)) -> Rule {
    Rule {
        pattern: Regex::new(pattern).expect("valid interface detail rule"),
        apply,
    }
}

/// Assign capture group `group` to `field` unless it already has a value.
fn fill(field: &mut String, caps: &Captures, group: usize) {
    if field.is_empty() {
        if let Some(m) = caps.get(group) {
            *field = m.as_str().trim().to_string();
        }
    }
}

static RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    vec![
        rule(r"(?m)\A\S+ is (administratively down|up|down)", |d, c| fill(&mut d.admin_state, c, 1)),
        rule(r"admin state is (\w+)", |d, c| fill(&mut d.admin_state, c, 1)),
        rule(r"line protocol is (\w+)", |d, c| fill(&mut d.protocol, c, 1)),
        rule(r"\A\S+ is (?:up|down)\b", |d, _| {
            // NX-OS reports a single state for the port; mirror it.
            if d.protocol.is_empty() && !d.admin_state.is_empty() {
                d.protocol = d.admin_state.clone();
            }
        }),
        rule(r"Hardware(?: is|:)\s*([^,\n]+)", |d, c| fill(&mut d.hardware, c, 1)),
        rule(r"address(?: is|:)\s*([0-9a-fA-F]{4}\.[0-9a-fA-F]{4}\.[0-9a-fA-F]{4})", |d, c| {
            fill(&mut d.mac_address, c, 1)
        }),
        rule(r"MTU (\d+) bytes", |d, c| fill(&mut d.mtu, c, 1)),
        rule(r"BW (\d+) [Kk]bit", |d, c| fill(&mut d.bandwidth_kbit, c, 1)),
        rule(r"DLY (\d+) usec", |d, c| fill(&mut d.delay_usec, c, 1)),
        rule(r"reliability (\d+/\d+)", |d, c| fill(&mut d.reliability, c, 1)),
        rule(r"txload (\d+/\d+)", |d, c| fill(&mut d.txload, c, 1)),
        rule(r"rxload (\d+/\d+)", |d, c| fill(&mut d.rxload, c, 1)),
        rule(r"[Ee]ncapsulation ([^,\n]+)", |d, c| fill(&mut d.encapsulation, c, 1)),
        rule(r"(?i)\b(full|half|auto)-duplex,\s*([^,\n]+)", |d, c| {
            if d.duplex.is_empty() {
                d.duplex = c[1].to_lowercase();
            }
            fill(&mut d.oper_speed, c, 2);
        }),
        rule(r"media type is ([^,\n]+)", |d, c| fill(&mut d.media_type, c, 1)),
        rule(r"Last link flapped ([^\n]+)", |d, c| fill(&mut d.last_link_flapped, c, 1)),
        rule(r"Last input ([^,\n]+), output ([^,\n]+)", |d, c| {
            fill(&mut d.last_input, c, 1);
            fill(&mut d.last_output, c, 2);
        }),
        rule(r#"Last clearing of "show interface" counters ([^\n]+)"#, |d, c| {
            fill(&mut d.last_clearing, c, 1)
        }),
        rule(r"input rate (\d+) bits/sec, (\d+) packets/sec", |d, c| {
            fill(&mut d.input_rate_bps, c, 1);
            fill(&mut d.input_rate_pps, c, 2);
        }),
        rule(r"output rate (\d+) bits/sec, (\d+) packets/sec", |d, c| {
            fill(&mut d.output_rate_bps, c, 1);
            fill(&mut d.output_rate_pps, c, 2);
        }),
        rule(r"(\d+) packets input, (\d+) bytes", |d, c| {
            fill(&mut d.input_packets, c, 1);
            fill(&mut d.input_bytes, c, 2);
        }),
        rule(r"(\d+) input packets\s+(\d+) bytes", |d, c| {
            fill(&mut d.input_packets, c, 1);
            fill(&mut d.input_bytes, c, 2);
        }),
        rule(r"(\d+) packets output, (\d+) bytes", |d, c| {
            fill(&mut d.output_packets, c, 1);
            fill(&mut d.output_bytes, c, 2);
        }),
        rule(r"(\d+) output packets\s+(\d+) bytes", |d, c| {
            fill(&mut d.output_packets, c, 1);
            fill(&mut d.output_bytes, c, 2);
        }),
        rule(r"(\d+) input errors?", |d, c| fill(&mut d.input_errors, c, 1)),
        rule(r"(\d+) CRC", |d, c| fill(&mut d.crc, c, 1)),
        rule(r"(\d+) frame\b", |d, c| fill(&mut d.frame, c, 1)),
        rule(r"(\d+) overrun", |d, c| fill(&mut d.overrun, c, 1)),
        rule(r"(\d+) ignored", |d, c| fill(&mut d.ignored, c, 1)),
        rule(r"(\d+) runts", |d, c| fill(&mut d.runts, c, 1)),
        rule(r"(\d+) giants", |d, c| fill(&mut d.giants, c, 1)),
        rule(r"Input queue: \d+/\d+/(\d+)/\d+", |d, c| fill(&mut d.input_drops, c, 1)),
        rule(r"(\d+) input discard", |d, c| fill(&mut d.input_drops, c, 1)),
        rule(r"(\d+) output errors?", |d, c| fill(&mut d.output_errors, c, 1)),
        rule(r"Total output drops: (\d+)", |d, c| fill(&mut d.output_drops, c, 1)),
        rule(r"(\d+) output discard", |d, c| fill(&mut d.output_drops, c, 1)),
        rule(r"(\d+) collisions?", |d, c| fill(&mut d.collisions, c, 1)),
        rule(r"(\d+) interface resets", |d, c| fill(&mut d.interface_resets, c, 1)),
    ]
});

static BLOCK_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\S+) is ").expect("valid interface block regex"));

/// Parse every interface block, keyed by normalized name.
pub fn parse_interface_details(body: &str) -> BTreeMap<String, InterfaceDetail> {
    let mut details = BTreeMap::new();
    for (name, block) in split_blocks(body) {
        let detail = parse_block(&name, &block);
        debug!("parsed detail block for {}", detail.interface);
        details.entry(detail.interface.clone()).or_insert(detail);
    }
    details
}

fn split_blocks(body: &str) -> Vec<(String, String)> {
    let mut blocks: Vec<(String, String)> = Vec::new();
    for line in body.lines() {
        if let Some(caps) = BLOCK_START.captures(line) {
            blocks.push((caps[1].to_string(), String::new()));
        }
        if let Some((_, text)) = blocks.last_mut() {
            text.push_str(line);
            text.push('\n');
        }
    }
    blocks
}

fn parse_block(name: &str, block: &str) -> InterfaceDetail {
    let mut detail = InterfaceDetail {
        interface: normalize(name),
        ..InterfaceDetail::default()
    };
    for rule in RULES.iter() {
        if let Some(caps) = rule.pattern.captures(block) {
            (rule.apply)(&mut detail, &caps);
        }
    }
    detail
}

/// `10G`, `1G`, `100M`, `10M` or `<n>K` from a bandwidth in kbit/s.
pub fn speed_label(kbit: u64) -> String {
    match kbit {
        10_000_000.. => "10G".to_string(),
        1_000_000.. => "1G".to_string(),
        100_000.. => "100M".to_string(),
        10_000.. => "10M".to_string(),
        _ => format!("{kbit}K"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const IOS: &str = "\
GigabitEthernet1/0/1 is up, line protocol is up (connected)
  Hardware is Gigabit Ethernet, address is 0011.2233.4455 (bia 0011.2233.4455)
  Description: uplink
  MTU 1500 bytes, BW 1000000 Kbit/sec, DLY 10 usec,
     reliability 255/255, txload 1/255, rxload 2/255
  Encapsulation ARPA, loopback not set
  Full-duplex, 1000Mb/s, media type is 10/100/1000BaseTX
  Last input 00:00:01, output 00:00:00, output hang never
  Last clearing of \"show interface\" counters never
  Input queue: 0/75/3/0 (size/max/drops/flushes); Total output drops: 7
  5 minute input rate 2000 bits/sec, 3 packets/sec
  5 minute output rate 4000 bits/sec, 5 packets/sec
     12345 packets input, 678901 bytes, 0 no buffer
     0 runts, 0 giants, 0 throttles
     4 input errors, 1 CRC, 0 frame, 0 overrun, 0 ignored
     54321 packets output, 109876 bytes, 0 underruns
     0 output errors, 0 collisions, 2 interface resets
Vlan10 is administratively down, line protocol is down
  Hardware is EtherSVI, address is 0011.2233.4466 (bia 0011.2233.4466)
  MTU 1500 bytes, BW 100000 Kbit/sec, DLY 10 usec,
";

    const NXOS: &str = "\
Ethernet1/1 is up
admin state is up, Dedicated Interface
  Hardware: 1000/10000 Ethernet, address: 00de.fb00.0001 (bia 00de.fb00.0001)
  MTU 9216 bytes, BW 10000000 Kbit, DLY 10 usec
  full-duplex, 10 Gb/s, media type is 10G
  Last link flapped 2d03h
    1200 input packets  340000 bytes
    0 runts  0 giants  0 CRC  0 no buffer
    17 input discard
    900 output packets  120000 bytes
    0 output discard
";

    #[test]
    fn ios_block_fills_counters() {
        let details = parse_interface_details(IOS);
        let gi = &details["GigabitEthernet1/0/1"];
        assert_eq!(gi.admin_state, "up");
        assert_eq!(gi.protocol, "up");
        assert_eq!(gi.mac_address, "0011.2233.4455");
        assert_eq!(gi.mtu, "1500");
        assert_eq!(gi.bandwidth_kbit, "1000000");
        assert_eq!(gi.duplex, "full");
        assert_eq!(gi.oper_speed, "1000Mb/s");
        assert_eq!(gi.input_packets, "12345");
        assert_eq!(gi.input_errors, "4");
        assert_eq!(gi.crc, "1");
        assert_eq!(gi.input_drops, "3");
        assert_eq!(gi.output_drops, "7");
        assert_eq!(gi.interface_resets, "2");
        assert_eq!(gi.last_clearing, "never");
        assert_eq!(gi.speed_from_bandwidth().as_deref(), Some("1G"));

        let vlan = &details["Vlan10"];
        assert_eq!(vlan.admin_state, "administratively down");
        assert_eq!(vlan.speed_from_bandwidth().as_deref(), Some("100M"));
        assert_eq!(vlan.crc, "");
    }

    #[test]
    fn nxos_block_uses_alternate_patterns() {
        let details = parse_interface_details(NXOS);
        let eth = &details["Ethernet1/1"];
        assert_eq!(eth.admin_state, "up");
        assert_eq!(eth.protocol, "up");
        assert_eq!(eth.hardware, "1000/10000 Ethernet");
        assert_eq!(eth.mac_address, "00de.fb00.0001");
        assert_eq!(eth.oper_speed, "10 Gb/s");
        assert_eq!(eth.input_packets, "1200");
        assert_eq!(eth.output_bytes, "120000");
        assert_eq!(eth.input_drops, "17");
        assert_eq!(eth.last_link_flapped, "2d03h");
        assert_eq!(eth.speed_from_bandwidth().as_deref(), Some("10G"));
    }

    #[test]
    fn speed_labels() {
        assert_eq!(speed_label(40_000_000), "10G");
        assert_eq!(speed_label(10_000), "10M");
        assert_eq!(speed_label(1_544), "1544K");
    }

    #[test]
    fn every_counter_has_a_name() {
        assert_eq!(InterfaceDetail::counter_names().len(), 37);
    }
}
