//! Known pages and the page-specific chunk assignment

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::bundler::Page;

/// Chunk key -> names of the chunks that page must pull in, in order
pub type PageChunkAssignment = IndexMap<String, Vec<String>>;

type AssignFn = dyn Fn(&mut PageChunkAssignment, &[String]) + Send + Sync;

/// Callback that fills in the page chunk assignment.
///
/// It is handed the accumulated assignment and every known page name before
/// each page chunk renders. Entries it wrote on earlier calls are still there.
#[derive(Clone)]
pub struct AddChunkPages(Arc<AssignFn>);

impl AddChunkPages {
    pub fn new<F>(assign: F) -> Self
    where
        F: Fn(&mut PageChunkAssignment, &[String]) + Send + Sync + 'static,
    {
        Self(Arc::new(assign))
    }

    /// Callback assigning a fixed table, limited to the pages the host knows
    pub fn from_table(table: IndexMap<String, Vec<String>>) -> Self {
        Self::new(move |assignment, pages| {
            for page in pages {
                if let Some(chunks) = table.get(page) {
                    assignment.insert(page.clone(), chunks.clone());
                }
            }
        })
    }

    pub fn call(&self, assignment: &mut PageChunkAssignment, pages: &[String]) {
        (self.0)(assignment, pages)
    }
}

impl fmt::Debug for AddChunkPages {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AddChunkPages(..)")
    }
}

/// Pages supplied by the host before any chunk renders
#[derive(Debug, Clone, Default)]
pub struct PageRegistry {
    pages: Option<Vec<Page>>,
}

impl PageRegistry {
    pub fn record(&mut self, pages: &[Page]) {
        self.pages = Some(pages.to_vec());
    }

    /// Whether the host supplied the page list for this build
    pub fn is_recorded(&self) -> bool {
        self.pages.is_some()
    }

    pub fn names(&self) -> Vec<String> {
        self.pages
            .iter()
            .flatten()
            .map(|page| page.name.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_table_only_assigns_known_pages() {
        let mut table = IndexMap::new();
        table.insert("pages/home/index".to_string(), vec!["common-ui".to_string()]);
        table.insert("pages/gone/index".to_string(), vec!["legacy".to_string()]);
        let callback = AddChunkPages::from_table(table);

        let mut assignment = PageChunkAssignment::new();
        callback.call(&mut assignment, &["pages/home/index".to_string()]);

        assert_eq!(assignment.len(), 1);
        assert_eq!(assignment["pages/home/index"], vec!["common-ui"]);
    }

    #[test]
    fn test_assignment_accumulates_across_calls() {
        let callback = AddChunkPages::new(|assignment, pages| {
            let next = pages[assignment.len() % pages.len()].clone();
            assignment.insert(next, vec!["shared".to_string()]);
        });
        let pages = vec!["a".to_string(), "b".to_string()];

        let mut assignment = PageChunkAssignment::new();
        callback.call(&mut assignment, &pages);
        callback.call(&mut assignment, &pages);

        assert!(assignment.contains_key("a"));
        assert!(assignment.contains_key("b"));
    }

    #[test]
    fn test_page_registry_names() {
        let mut registry = PageRegistry::default();
        assert!(!registry.is_recorded());
        assert!(registry.names().is_empty());

        registry.record(&[Page::new("pages/index/index", "src/pages/index/index.tsx")]);
        assert!(registry.is_recorded());
        assert_eq!(registry.names(), vec!["pages/index/index"]);
    }
}
