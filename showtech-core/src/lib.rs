//! Generic text primitives for show-tech captures used by higher-level extractors.
//!
//! - [`SectionStore`] splits a raw capture into per-command sections.
//! - [`ConfigTree`] rebuilds the indentation hierarchy of a configuration.
//! - [`parse_row`] slices fixed-width table rows by [`ColumnSpan`].
//! - [`vlan`] and [`ipv4`] hold the range and mask arithmetic shared by parsers.

pub mod config;
pub mod ipv4;
pub mod section;
pub mod table;
pub mod tree;
pub mod vlan;

pub use config::ConfigTree;
pub use ipv4::{
    cidr_to_wildcard, looks_like_dotted_quad, mask_to_cidr, mask_to_prefix, normalize_cidr,
    prefix_to_mask, wildcard_to_cidr, ConversionError,
};
pub use section::{
    normalize_command, HeaderStyle, PlatformFamily, Section, SectionError, SectionStore,
    RUNNING_CONFIG_COMMANDS,
};
pub use table::{parse_row, ColumnSpan};
pub use tree::ConfigStatement;
pub use vlan::{compress_vlan_range, expand_vlan_range, parse_vlan_token, VlanRangeError};
