// Server-side list filters
//
// Search text, category and priority map to the backend's well-known
// query parameters; anything else rides along as a free-form filter.

use std::collections::BTreeMap;

/// Query parameters for a list request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub priority: Option<String>,
    /// Free-form filters, sent in key order.
    pub filters: BTreeMap<String, String>,
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = Some(text.into());
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = Some(priority.into());
        self
    }

    pub fn filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.insert(key.into(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.to_pairs().is_empty()
    }

    /// Flatten into `(key, value)` pairs. Blank values are dropped so an
    /// empty search box doesn't send `?search=`.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let named = [
            ("search", &self.search),
            ("category", &self.category),
            ("priority", &self.priority),
        ];

        named
            .into_iter()
            .filter_map(|(key, value)| value.as_ref().map(|v| (key.to_owned(), v.clone())))
            .chain(self.filters.iter().map(|(k, v)| (k.clone(), v.clone())))
            .filter(|(_, v)| !v.trim().is_empty())
            .collect()
    }
}
