//! VLAN list expansion and compression (`"10-15,20"` <-> `[10, .., 15, 20]`).

use std::collections::BTreeSet;
use std::ops::RangeInclusive;

use log::warn;
use thiserror::Error;

/// Highest VLAN id accepted in a range token.
pub const MAX_VLAN_ID: u16 = 4095;

/// Errors for a single comma-separated VLAN token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VlanRangeError {
    #[error("'{0}' is not a VLAN number")]
    NotANumber(String),
    #[error("VLAN {0} is outside 0-4095")]
    OutOfRange(u32),
    #[error("range '{0}' ends before it starts")]
    Reversed(String),
}

/// Parse one token (`"12"` or `"10-15"`) into an inclusive range.
pub fn parse_vlan_token(token: &str) -> Result<RangeInclusive<u16>, VlanRangeError> {
    let token = token.trim();
    match token.split_once('-') {
        Some((start, end)) => {
            let start = parse_id(start)?;
            let end = parse_id(end)?;
            if end < start {
                return Err(VlanRangeError::Reversed(token.to_string()));
            }
            Ok(start..=end)
        }
        None => {
            let id = parse_id(token)?;
            Ok(id..=id)
        }
    }
}

/// Expand a VLAN list into a strictly increasing, duplicate-free sequence.
///
/// Empty tokens (a trailing comma from a wrapped line) are ignored; other
/// invalid tokens are dropped with a warning.
pub fn expand_vlan_range(spec: &str) -> Vec<u16> {
    let mut ids = BTreeSet::new();
    for token in spec.split(',') {
        if token.trim().is_empty() {
            continue;
        }
        match parse_vlan_token(token) {
            Ok(range) => ids.extend(range),
            Err(err) => warn!("dropping VLAN token '{}': {err}", token.trim()),
        }
    }
    ids.into_iter().collect()
}

/// Render VLAN ids back into the compact comma/range form.
pub fn compress_vlan_range<I>(ids: I) -> String
where
    I: IntoIterator<Item = u16>,
{
    let sorted: BTreeSet<u16> = ids.into_iter().collect();
    let mut parts = Vec::new();
    let mut iter = sorted.into_iter();
    let Some(first) = iter.next() else {
        return String::new();
    };

    let (mut start, mut prev) = (first, first);
    for id in iter {
        if id == prev + 1 {
            prev = id;
            continue;
        }
        parts.push(render_run(start, prev));
        start = id;
        prev = id;
    }
    parts.push(render_run(start, prev));
    parts.join(",")
}

fn render_run(start: u16, end: u16) -> String {
    if start == end {
        start.to_string()
    } else {
        format!("{start}-{end}")
    }
}

fn parse_id(raw: &str) -> Result<u16, VlanRangeError> {
    let raw = raw.trim();
    let value: u32 = raw
        .parse()
        .map_err(|_| VlanRangeError::NotANumber(raw.to_string()))?;
    if value > u32::from(MAX_VLAN_ID) {
        return Err(VlanRangeError::OutOfRange(value));
    }
    Ok(value as u16)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlapping_tokens_are_deduplicated() {
        assert_eq!(expand_vlan_range("10,10-12"), vec![10, 11, 12]);
    }

    #[test]
    fn output_is_strictly_increasing() {
        let ids = expand_vlan_range("30,1-3,20-22,2,30");
        assert_eq!(ids, vec![1, 2, 3, 20, 21, 22, 30]);
        assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn invalid_tokens_are_dropped() {
        assert_eq!(expand_vlan_range("5,abc,9-7,5000,7"), vec![5, 7]);
        assert!(expand_vlan_range("none").is_empty());
    }

    #[test]
    fn trailing_comma_is_ignored() {
        assert_eq!(expand_vlan_range("1-3,"), vec![1, 2, 3]);
    }

    #[test]
    fn token_errors_are_specific() {
        assert_eq!(parse_vlan_token("12"), Ok(12..=12));
        assert!(matches!(
            parse_vlan_token("x"),
            Err(VlanRangeError::NotANumber(_))
        ));
        assert!(matches!(
            parse_vlan_token("20-10"),
            Err(VlanRangeError::Reversed(_))
        ));
        assert_eq!(parse_vlan_token("9000"), Err(VlanRangeError::OutOfRange(9000)));
    }

    #[test]
    fn compress_renders_runs() {
        assert_eq!(compress_vlan_range(vec![1, 2, 3, 5, 7, 8]), "1-3,5,7-8");
        assert_eq!(compress_vlan_range(1..=4094), "1-4094");
        assert_eq!(compress_vlan_range(Vec::<u16>::new()), "");
    }
}
