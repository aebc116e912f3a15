//! Self-registering category extractors.
//!
//! Each output category submits a [`CategoryExtractor`] through the
//! `inventory` crate; [`extractors`] returns them in their fixed output order.

use std::fmt::{self, Display, Formatter};

use indexmap::IndexMap;
use showtech_core::{ConfigTree, SectionStore};

use crate::layouts::ColumnLayouts;

/// Ordered flat record. Every record in a category has the same keys in the
/// same order.
pub type Record = IndexMap<String, String>;

/// Output categories, in output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Interfaces,
    AccessLists,
    Trunks,
    Cdp,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Interfaces,
        Category::AccessLists,
        Category::Trunks,
        Category::Cdp,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Category::Interfaces => "Interfaces",
            Category::AccessLists => "Access Lists",
            Category::Trunks => "Trunks",
            Category::Cdp => "CDP",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Everything a category extractor may read for one capture.
pub struct ExtractContext<'a> {
    pub sections: &'a SectionStore,
    /// Parsed running configuration, when the capture has one.
    pub config: Option<&'a ConfigTree>,
    pub layouts: &'a ColumnLayouts,
}

/// A registered category builder.
pub struct CategoryExtractor {
    pub category: Category,
    /// Commands whose presence makes the category worth running.
    pub sources: &'static [&'static str],
    pub extract: fn(&ExtractContext<'_>) -> Vec<Record>,
}

impl CategoryExtractor {
    /// Whether any source section exists in the capture.
    pub fn has_source(&self, sections: &SectionStore) -> bool {
        self.sources.iter().any(|command| sections.contains(command))
    }
}

inventory::collect!(CategoryExtractor);

/// All registered extractors in category order.
pub fn extractors() -> Vec<&'static CategoryExtractor> {
    let mut all: Vec<&'static CategoryExtractor> =
        inventory::iter::<CategoryExtractor>.into_iter().collect();
    all.sort_by_key(|extractor| extractor.category);
    all
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_category_is_registered_once() {
        let registered: Vec<Category> = extractors().iter().map(|e| e.category).collect();
        assert_eq!(registered, Category::ALL.to_vec());
    }

    #[test]
    fn titles_match_output_keys() {
        let titles: Vec<&str> = Category::ALL.iter().map(|c| c.title()).collect();
        assert_eq!(titles, vec!["Interfaces", "Access Lists", "Trunks", "CDP"]);
    }
}
