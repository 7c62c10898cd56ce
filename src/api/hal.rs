//! Hypermedia (HAL-style) response envelopes.
//!
//! Single resources carry a `_links` object next to their fields; collections
//! put their items under `_embedded` and add `page` metadata.

use crate::api::pagination::PageMetadata;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Link {
    pub href: String,
}

/// Relation name -> link. Serialized as a plain JSON object.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Links(BTreeMap<&'static str, Link>);

impl Links {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, rel: &'static str, href: impl Into<String>) -> Self {
        self.0.insert(rel, Link { href: href.into() });
        self
    }

    pub fn get(&self, rel: &str) -> Option<&Link> {
        self.0.get(rel)
    }
}

/// Turns absolute paths into hrefs under the public base URL.
#[derive(Debug, Clone)]
pub struct LinkBuilder {
    base: String,
}

impl LinkBuilder {
    pub fn new(base_url: &str) -> Self {
        Self {
            base: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn href(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    pub fn page_href(&self, path: &str, page: u32, size: u32) -> String {
        format!("{}{}?page={}&size={}", self.base, path, page, size)
    }

    /// self/first/last plus next/prev when they exist.
    pub fn page_links(&self, path: &str, meta: &PageMetadata) -> Links {
        let mut links = Links::new()
            .with("self", self.page_href(path, meta.number, meta.size))
            .with("first", self.page_href(path, 0, meta.size))
            .with("last", self.page_href(path, meta.last_page(), meta.size));

        if meta.has_next() {
            links = links.with("next", self.page_href(path, meta.number + 1, meta.size));
        }
        if meta.has_previous() {
            links = links.with("prev", self.page_href(path, meta.number - 1, meta.size));
        }

        links
    }
}

#[derive(Debug, Serialize)]
pub struct Resource<T> {
    #[serde(flatten)]
    pub content: T,
    #[serde(rename = "_links")]
    pub links: Links,
}

#[derive(Debug, Serialize)]
pub struct PagedResources<T> {
    #[serde(rename = "_embedded")]
    pub embedded: BTreeMap<&'static str, Vec<Resource<T>>>,
    #[serde(rename = "_links")]
    pub links: Links,
    pub page: PageMetadata,
}

impl<T> PagedResources<T> {
    pub fn new(rel: &'static str, items: Vec<Resource<T>>, links: Links, page: PageMetadata) -> Self {
        let mut embedded = BTreeMap::new();
        embedded.insert(rel, items);
        Self {
            embedded,
            links,
            page,
        }
    }
}
