//! Result types for scrolled searches.

use search_demo_shared::SearchHit;

/// One page of a scrolled search.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScrollPage {
    /// Handle for fetching the next page. Absent when the store did not open
    /// a scroll context.
    pub scroll_id: Option<String>,
    pub hits: Vec<SearchHit>,
}

impl ScrollPage {
    pub fn new(scroll_id: Option<String>, hits: Vec<SearchHit>) -> Self {
        Self { scroll_id, hits }
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }
}

/// Why a scroll stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollEnd {
    /// The store returned an empty page (or no scroll handle).
    Exhausted,
    /// The configured maximum page count was reached first. More pages may
    /// exist, even when the last fetched page happened to hold the final hits.
    PageLimit,
}

/// Everything a scrolled search produced.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollOutcome {
    /// Hits in the order the store returned them.
    pub hits: Vec<SearchHit>,
    /// Number of pages fetched, the terminating empty page included.
    pub pages: usize,
    pub end: ScrollEnd,
}

impl ScrollOutcome {
    /// Names of the returned documents, in order. Hits without a string
    /// `name` field are skipped.
    pub fn names(&self) -> Vec<&str> {
        self.hits.iter().filter_map(SearchHit::name).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn hit(id: &str, name: &str) -> SearchHit {
        let source = json!({ "name": name });
        SearchHit::new(id, source.as_object().cloned().unwrap_or_default())
    }

    #[test]
    fn test_outcome_names() {
        let outcome = ScrollOutcome {
            hits: vec![hit("1", "John Doe"), hit("2", "Peter Pan")],
            pages: 2,
            end: ScrollEnd::Exhausted,
        };

        assert_eq!(outcome.names(), vec!["John Doe", "Peter Pan"]);
    }

    #[test]
    fn test_empty_page() {
        assert!(ScrollPage::default().is_empty());
        assert!(!ScrollPage::new(None, vec![hit("1", "x")]).is_empty());
    }
}
