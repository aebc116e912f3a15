//! Per-capture orchestration: run the registered category extractors and
//! collect their records.

use std::path::Path;

use indexmap::IndexMap;
use log::{debug, info, warn};
use serde::Serialize;
use showtech_core::PlatformFamily;

use crate::cache::CaptureCache;
use crate::capture::{ParsedCapture, RawCapture};
use crate::error::CaptureError;
use crate::identify::DeviceHint;
use crate::layouts::ColumnLayouts;
use crate::registry::{extractors, Category, ExtractContext, Record};

/// Knobs for one extraction run.
#[derive(Debug, Clone, Copy)]
pub struct ExtractOptions<'a> {
    /// Overrides the hint classified from the file head.
    pub hint: Option<DeviceHint>,
    /// Restrict output to these categories; `None` keeps all of them.
    pub categories: Option<&'a [Category]>,
    pub layouts: &'a ColumnLayouts,
}

impl<'a> ExtractOptions<'a> {
    pub fn new(layouts: &'a ColumnLayouts) -> Self {
        Self {
            hint: None,
            categories: None,
            layouts,
        }
    }

    fn selects(&self, category: Category) -> bool {
        self.categories
            .map_or(true, |selected| selected.contains(&category))
    }
}

/// Everything extracted from one capture.
#[derive(Debug, Clone, Serialize)]
pub struct Inventory {
    pub source: String,
    pub hostname: String,
    pub family: PlatformFamily,
    pub hint: DeviceHint,
    categories: IndexMap<String, Vec<Record>>,
}

impl Inventory {
    /// Category title to records, in fixed category order.
    pub fn categories(&self) -> &IndexMap<String, Vec<Record>> {
        &self.categories
    }

    pub fn category(&self, category: Category) -> &[Record] {
        self.categories
            .get(category.title())
            .map_or(&[], Vec::as_slice)
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    pub fn record_count(&self) -> usize {
        self.categories.values().map(Vec::len).sum()
    }
}

/// Read, segment and extract one file.
pub fn extract_file(
    path: &Path,
    max_bytes: u64,
    options: &ExtractOptions<'_>,
) -> Result<Inventory, CaptureError> {
    let raw = RawCapture::read(path, max_bytes)?;
    let parsed = ParsedCapture::parse(raw)?;
    Ok(extract_parsed(&parsed, options))
}

/// Like [`extract_file`], but segments each distinct file only once per cache.
pub fn extract_cached(
    cache: &CaptureCache,
    path: &Path,
    options: &ExtractOptions<'_>,
) -> Result<Inventory, CaptureError> {
    let parsed = cache.get_or_load(path)?;
    Ok(extract_parsed(&parsed, options))
}

/// Run every selected category over an already segmented capture.
///
/// A category runs when the hint expects it or when one of its source
/// sections is present, so a wrong hint only loses data the capture does
/// not have.
pub fn extract_parsed(parsed: &ParsedCapture, options: &ExtractOptions<'_>) -> Inventory {
    let source = parsed.raw.display_path();
    let hint = options.hint.unwrap_or(parsed.raw.hint);
    if !hint.agrees_with(parsed.family) {
        warn!(
            "{source}: device hint '{hint}' disagrees with detected family {}",
            parsed.family
        );
    }

    let ctx = ExtractContext {
        sections: &parsed.sections,
        config: parsed.config.as_ref(),
        layouts: options.layouts,
    };

    let mut categories = IndexMap::new();
    for extractor in extractors() {
        let category = extractor.category;
        if !options.selects(category) {
            continue;
        }
        let expected = hint.categories().contains(&category);
        let records = if expected || extractor.has_source(&parsed.sections) {
            (extractor.extract)(&ctx)
        } else {
            debug!("{source}: skipping {category}, not expected for {hint} and no source section");
            Vec::new()
        };
        debug!("{source}: {category} yielded {} records", records.len());
        categories.insert(category.title().to_string(), records);
    }

    let inventory = Inventory {
        source,
        hostname: parsed.hostname(),
        family: parsed.family,
        hint,
        categories,
    };
    info!(
        "{}: {} records for {}",
        inventory.source,
        inventory.record_count(),
        inventory.hostname
    );
    inventory
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layouts::default_layouts;

    const CAPTURE: &str = "\
------------------ show running-config ------------------
hostname edge1
interface GigabitEthernet0/1
 switchport mode access
 switchport access vlan 20
access-list 10 permit 10.0.0.0 0.0.0.255
`show cdp neighbors detail`
-------------------------
Device ID: core1
Interface: GigabitEthernet0/1,  Port ID (outgoing port): GigabitEthernet1/0/1
";

    fn parsed() -> ParsedCapture {
        ParsedCapture::parse(RawCapture::from_text("edge1.txt", CAPTURE)).expect("parsed")
    }

    #[test]
    fn every_category_key_is_present_in_order() {
        let layouts = default_layouts();
        let inventory = extract_parsed(&parsed(), &ExtractOptions::new(&layouts));
        let keys: Vec<&str> = inventory.categories().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["Interfaces", "Access Lists", "Trunks", "CDP"]);
        assert_eq!(inventory.hostname(), "edge1");
        assert_eq!(inventory.category(Category::Interfaces)[0]["vlan"], "20");
        assert_eq!(inventory.category(Category::AccessLists).len(), 1);
        assert!(inventory.category(Category::Trunks).is_empty());
        assert_eq!(inventory.category(Category::Cdp)[0]["remote_hostname"], "core1");
    }

    #[test]
    fn present_sections_run_despite_a_narrow_hint() {
        let layouts = default_layouts();
        let options = ExtractOptions {
            hint: Some(DeviceHint::PaloAlto),
            ..ExtractOptions::new(&layouts)
        };
        let inventory = extract_parsed(&parsed(), &options);
        assert_eq!(inventory.hint, DeviceHint::PaloAlto);
        assert_eq!(inventory.category(Category::Interfaces).len(), 1);
        assert_eq!(inventory.category(Category::Cdp).len(), 1);
    }

    #[test]
    fn category_filter_limits_output() {
        let layouts = default_layouts();
        let selected = [Category::Cdp];
        let options = ExtractOptions {
            categories: Some(&selected),
            ..ExtractOptions::new(&layouts)
        };
        let inventory = extract_parsed(&parsed(), &options);
        let keys: Vec<&String> = inventory.categories().keys().collect();
        assert_eq!(keys, vec!["CDP"]);
    }

    #[test]
    fn repeated_paths_share_one_segmented_capture() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("edge1.txt");
        std::fs::write(&path, CAPTURE).expect("write capture");

        let layouts = default_layouts();
        let options = ExtractOptions::new(&layouts);
        let cache = CaptureCache::new(crate::capture::DEFAULT_MAX_BYTES);
        let first = extract_cached(&cache, &path, &options).expect("first");
        let second = extract_cached(&cache, &path, &options).expect("second");

        assert_eq!(cache.len(), 1);
        assert_eq!(first.hostname(), "edge1");
        assert_eq!(first.record_count(), second.record_count());
        assert_eq!(first.source, path.display().to_string());
    }
}
