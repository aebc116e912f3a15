//! IPv4 mask arithmetic for config and ACL address fields.

use std::net::Ipv4Addr;

use thiserror::Error;

/// Errors raised when an address/mask pair cannot be converted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    #[error("invalid IPv4 address '{0}'")]
    InvalidAddress(String),
    #[error("invalid IPv4 mask '{0}'")]
    InvalidMask(String),
    #[error("mask '{0}' is not contiguous")]
    NonContiguousMask(String),
    #[error("invalid prefix length '{0}'")]
    InvalidPrefix(String),
}

/// Return the subnet mask as a `u32` for a CIDR prefix length (0..=32).
pub fn prefix_to_mask(prefix: u8) -> Option<u32> {
    match prefix {
        0 => Some(0),
        1..=32 => Some(u32::MAX << (32 - u32::from(prefix))),
        _ => None,
    }
}

/// Prefix length of a contiguous netmask.
pub fn mask_to_prefix(mask: Ipv4Addr) -> Option<u8> {
    let bits = u32::from(mask);
    let prefix = bits.leading_ones() as u8;
    (prefix_to_mask(prefix)? == bits).then_some(prefix)
}

/// Convert `10.0.0.1` + `255.255.255.0` into `10.0.0.1/24`, keeping host bits.
pub fn mask_to_cidr(addr: &str, mask: &str) -> Result<String, ConversionError> {
    let ip = parse_addr(addr)?;
    let mask_addr: Ipv4Addr = mask
        .trim()
        .parse()
        .map_err(|_| ConversionError::InvalidMask(mask.to_string()))?;
    let prefix = mask_to_prefix(mask_addr)
        .ok_or_else(|| ConversionError::NonContiguousMask(mask.to_string()))?;
    Ok(format!("{ip}/{prefix}"))
}

/// Validate an `a.b.c.d/len` string and return it in canonical form.
pub fn normalize_cidr(value: &str) -> Result<String, ConversionError> {
    let (addr, len) = value
        .trim()
        .split_once('/')
        .ok_or_else(|| ConversionError::InvalidPrefix(value.to_string()))?;
    let ip = parse_addr(addr)?;
    let prefix: u8 = len
        .parse()
        .ok()
        .filter(|p| *p <= 32)
        .ok_or_else(|| ConversionError::InvalidPrefix(len.to_string()))?;
    Ok(format!("{ip}/{prefix}"))
}

/// Convert an ACL address/wildcard pair into network CIDR notation.
///
/// The wildcard is inverted octet by octet (`255 - octet`) into a netmask and
/// the host bits of `addr` are cleared: `10.1.1.5 0.0.0.255` becomes
/// `10.1.1.0/24`.
pub fn wildcard_to_cidr(addr: &str, wildcard: &str) -> Result<String, ConversionError> {
    let ip = parse_addr(addr)?;
    let wild: Ipv4Addr = wildcard
        .trim()
        .parse()
        .map_err(|_| ConversionError::InvalidMask(wildcard.to_string()))?;
    let netmask = Ipv4Addr::from(wild.octets().map(|octet| 255 - octet));
    let prefix = mask_to_prefix(netmask)
        .ok_or_else(|| ConversionError::NonContiguousMask(wildcard.to_string()))?;
    let network = u32::from(ip) & u32::from(netmask);
    Ok(format!("{}/{prefix}", Ipv4Addr::from(network)))
}

/// Wildcard mask (bit complement of the netmask) for a prefix length.
pub fn cidr_to_wildcard(prefix: u8) -> Result<Ipv4Addr, ConversionError> {
    let mask =
        prefix_to_mask(prefix).ok_or_else(|| ConversionError::InvalidPrefix(prefix.to_string()))?;
    Ok(Ipv4Addr::from(!mask))
}

/// Cheap shape test for a dotted-quad token (`d+.d+.d+.d+`).
pub fn looks_like_dotted_quad(token: &str) -> bool {
    let parts: Vec<&str> = token.split('.').collect();
    parts.len() == 4
        && parts
            .iter()
            .all(|part| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit()))
}

fn parse_addr(addr: &str) -> Result<Ipv4Addr, ConversionError> {
    addr.trim()
        .parse()
        .map_err(|_| ConversionError::InvalidAddress(addr.to_string()))
}
