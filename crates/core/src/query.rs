//! Outbound list-query construction.
//!
//! All `getAll` operations share the same query contract: clamped
//! `page[size]`, `page[number]` passthrough, `filter[search]` for free text,
//! a single `sort` field (`-` prefix for descending) and arbitrary
//! `filter[<key>]` pairs.

use annyflow_domain::constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

/// Builder for paginated list queries.
#[derive(Debug, Clone)]
pub struct ListQuery {
    page_size: u32,
    page_number: u32,
    include: Option<String>,
    search: Option<String>,
    sort: Option<String>,
    filters: Vec<(String, String)>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            page_number: 1,
            include: None,
            search: None,
            sort: None,
            filters: Vec::new(),
        }
    }
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requested page size. Values above the server ceiling are clamped to
    /// [`MAX_PAGE_SIZE`]; zero is raised to 1 (the remote rejects empty
    /// pages).
    pub fn page_size(mut self, size: u32) -> Self {
        self.page_size = size.clamp(1, MAX_PAGE_SIZE);
        self
    }

    pub fn page_number(mut self, number: u32) -> Self {
        self.page_number = number.max(1);
        self
    }

    /// Comma/dot separated relation paths to expand. Empty strings are
    /// treated as unset so a per-resource default can apply.
    pub fn include(mut self, include: impl Into<String>) -> Self {
        let include = include.into();
        self.include = (!include.is_empty()).then_some(include);
        self
    }

    /// Free-text search, emitted as `filter[search]`.
    pub fn search(mut self, search: impl Into<String>) -> Self {
        let search = search.into();
        self.search = (!search.is_empty()).then_some(search);
        self
    }

    /// Sort field, optionally `-`-prefixed for descending order.
    pub fn sort(mut self, sort: impl Into<String>) -> Self {
        let sort = sort.into();
        self.sort = (!sort.is_empty()).then_some(sort);
        self
    }

    /// Add one custom `filter[<key>]=<value>` pair. Entries with an empty
    /// key or value are skipped.
    pub fn filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let (key, value) = (key.into(), value.into());
        if !key.is_empty() && !value.is_empty() {
            self.filters.push((key, value));
        }
        self
    }

    /// Add many custom filter pairs, applying the same empty-entry skip.
    pub fn filters<I, K, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (key, value) in pairs {
            self = self.filter(key, value);
        }
        self
    }

    /// Whether an include expansion was set explicitly.
    pub fn has_include(&self) -> bool {
        self.include.is_some()
    }

    /// Render the query as ordered key/value pairs for the transport.
    pub fn into_params(self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if let Some(include) = self.include {
            params.push(("include".to_string(), include));
        }
        if let Some(search) = self.search {
            params.push(("filter[search]".to_string(), search));
        }
        if let Some(sort) = self.sort {
            params.push(("sort".to_string(), sort));
        }
        params.push(("page[size]".to_string(), self.page_size.to_string()));
        params.push(("page[number]".to_string(), self.page_number.to_string()));
        for (key, value) in self.filters {
            params.push((format!("filter[{key}]"), value));
        }
        params
    }
}
