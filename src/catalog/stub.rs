use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::catalog::{Catalog, FetchFailure, FetchOperation};
use crate::model::{CatalogItem, SearchPage};

/// In-process catalog with canned answers and call counters.
#[derive(Default)]
pub struct StubCatalog {
    searches: Mutex<HashMap<String, Result<Vec<CatalogItem>, u16>>>,
    details: Mutex<HashMap<String, CatalogItem>>,
    search_calls: AtomicUsize,
    detail_calls: AtomicUsize,
}

impl StubCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_results(self, query: &str, items: Vec<CatalogItem>) -> Self {
        self.searches
            .lock()
            .unwrap()
            .insert(query.to_owned(), Ok(items));
        self
    }

    pub fn with_search_status(self, query: &str, status: u16) -> Self {
        self.searches
            .lock()
            .unwrap()
            .insert(query.to_owned(), Err(status));
        self
    }

    pub fn with_detail(self, item: CatalogItem) -> Self {
        self.details.lock().unwrap().insert(item.key.clone(), item);
        self
    }

    pub fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    pub fn detail_calls(&self) -> usize {
        self.detail_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Catalog for StubCatalog {
    async fn search(&self, query: &str, limit: usize) -> Result<SearchPage, FetchFailure> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        let answer = self.searches.lock().unwrap().get(query).cloned();
        match answer {
            Some(Ok(items)) => {
                let total = items.len() as u64;
                Ok(SearchPage {
                    items: items.into_iter().take(limit).collect(),
                    total,
                })
            }
            Some(Err(status)) => Err(FetchFailure::status(FetchOperation::Search, status)),
            None => Ok(SearchPage::default()),
        }
    }

    async fn detail(&self, reference: &str) -> Result<CatalogItem, FetchFailure> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);
        self.details
            .lock()
            .unwrap()
            .get(reference)
            .cloned()
            .ok_or_else(|| FetchFailure::status(FetchOperation::Detail, 404))
    }
}
