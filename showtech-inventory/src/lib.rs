//! Cisco IOS and NX-OS show-tech inventory extraction.
//!
//! This library turns large, free-form diagnostic captures (a running
//! configuration plus many concatenated `show ...` outputs) into flat,
//! ordered records for interfaces, access lists, trunk state and CDP
//! neighbors. Every parser is best effort: a missing section or a mangled
//! block costs that data only, never the whole capture.
//!
//! # Architecture
//!
//! Generic text primitives live in `showtech-core` (section segmentation,
//! indentation tree, fixed-column rows, VLAN ranges, IPv4 masks). This crate
//! adds the Cisco-specific layers:
//!
//! ## Capture handling
//!
//! - [`capture`] - Size-guarded file reading and segmentation
//! - [`cache`] - Caller-owned cache of segmented captures
//! - [`identify`] - Device-type guess from the file head
//! - [`extract`] - Runs the category extractors for one capture
//!
//! ## Parsers
//!
//! - [`interfaces`] - `interface` blocks merged with operational tables
//! - [`brief`] - `show interface brief` and `show ip interface brief`
//! - [`layouts`] - Column layouts for the fixed-width brief tables
//! - [`trunk`] - `show interface trunk` with wrapped VLAN lists
//! - [`detail`] - Counters from `show interface`
//! - [`acl`] - Numbered and named access lists
//! - [`cdp`] - `show cdp neighbors detail`
//! - [`normalize`] - Interface name canonicalization, the merge key
//!
//! ## Output
//!
//! - [`registry`] - Self-registering category extractors and the record type
//! - [`categories`] - The built-in categories and their record layouts
//! - [`report`] - Terminal rendering
//!
//! # Workflow
//!
//! 1. **Read** the file, refusing anything above the size limit
//! 2. **Segment** it into command sections and parse the running config
//! 3. **Select** categories from the device hint and the sections present
//! 4. **Extract** each category into records keyed by normalized names
//! 5. **Render** the records as text tables or JSON
//!
//! # Examples
//!
//! ```ignore
//! use showtech_inventory::extract::{extract_file, ExtractOptions};
//! use showtech_inventory::capture::DEFAULT_MAX_BYTES;
//! use showtech_inventory::layouts::default_layouts;
//!
//! let layouts = default_layouts();
//! let inventory = extract_file(
//!     "core1-showtech.txt".as_ref(),
//!     DEFAULT_MAX_BYTES,
//!     &ExtractOptions::new(&layouts),
//! )?;
//! for (category, records) in inventory.categories() {
//!     println!("{category}: {} records", records.len());
//! }
//! ```

pub mod acl;
pub mod brief;
pub mod cache;
pub mod capture;
pub mod categories;
pub mod cdp;
pub mod detail;
pub mod error;
pub mod extract;
pub mod identify;
pub mod interfaces;
pub mod layouts;
pub mod normalize;
pub mod registry;
pub mod report;
pub mod trunk;
