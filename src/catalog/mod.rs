pub mod client;
pub mod display;
#[cfg(test)]
pub(crate) mod stub;

use std::fmt;

use async_trait::async_trait;

use crate::model::{CatalogItem, SearchPage};

pub use client::OpenLibraryClient;
pub use display::{BookDisplay, CoverResolver, resolve_cover_url};

pub const DEFAULT_CATALOG_URL: &str = "https://openlibrary.org";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOperation {
    Search,
    Detail,
}

impl fmt::Display for FetchOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Search => f.write_str("search"),
            Self::Detail => f.write_str("detail"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("{operation} request failed: {reason}")]
pub struct FetchFailure {
    pub operation: FetchOperation,
    /// HTTP status when the catalog answered; `None` for transport errors.
    pub status: Option<u16>,
    pub reason: String,
}

impl FetchFailure {
    pub fn new(operation: FetchOperation, reason: impl Into<String>) -> Self {
        Self {
            operation,
            status: None,
            reason: reason.into(),
        }
    }

    pub fn status(operation: FetchOperation, status: u16) -> Self {
        Self {
            operation,
            status: Some(status),
            reason: format!("catalog responded with status {status}"),
        }
    }
}

#[async_trait]
pub trait Catalog: Send + Sync {
    async fn search(&self, query: &str, limit: usize) -> Result<SearchPage, FetchFailure>;

    async fn detail(&self, reference: &str) -> Result<CatalogItem, FetchFailure>;

    /// Resolves a carried item without touching the network.
    async fn fetch_detail(
        &self,
        reference: &str,
        carried: Option<CatalogItem>,
    ) -> Result<CatalogItem, FetchFailure> {
        if let Some(item) = carried {
            tracing::debug!(reference, key = %item.key, "using carried item");
            return Ok(item);
        }
        self.detail(reference).await
    }
}

/// Canonical catalog key for user input such as `OL45883W` or `works/OL45883W`.
pub fn normalize_reference(reference: &str) -> String {
    let trimmed = reference.trim().trim_matches('/');
    if trimmed.contains('/') {
        return format!("/{trimmed}");
    }
    let kind = match trimmed.chars().last() {
        Some('M') => "books",
        Some('A') => "authors",
        _ => "works",
    };
    format!("/{kind}/{trimmed}")
}
