use anyhow::Context as _;
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use serde_json::Value;
use url::Url;

use crate::catalog::{Catalog, FetchFailure, FetchOperation, normalize_reference};
use crate::model::{CatalogItem, SearchPage};

/// Fields requested from the search endpoint; everything a result row or a
/// carried detail view can show.
const SEARCH_FIELDS: &str = "key,title,author_name,cover_i,first_publish_year,first_sentence,\
isbn,ratings_average,ratings_count,number_of_pages_median,subject";

#[derive(Debug, Clone)]
pub struct OpenLibraryClient {
    client: reqwest::Client,
    base_url: String,
}

impl OpenLibraryClient {
    pub fn new(base_url: &Url) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("booknook/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("build http client")?;
        Ok(Self {
            client,
            base_url: base_url.as_str().trim_end_matches('/').to_owned(),
        })
    }

    fn search_url(&self, query: &str, limit: usize) -> Result<Url, FetchFailure> {
        let mut url = Url::parse(&format!("{}/search.json", self.base_url))
            .map_err(|err| FetchFailure::new(FetchOperation::Search, err.to_string()))?;
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("limit", &limit.to_string())
            .append_pair("fields", SEARCH_FIELDS);
        Ok(url)
    }

    fn detail_url(&self, key: &str) -> Result<Url, FetchFailure> {
        Url::parse(&format!("{}{key}.json", self.base_url))
            .map_err(|err| FetchFailure::new(FetchOperation::Detail, err.to_string()))
    }

    async fn get_json(&self, operation: FetchOperation, url: Url) -> Result<Value, FetchFailure> {
        let response = self
            .client
            .get(url.clone())
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|err| FetchFailure::new(operation, format!("GET {url}: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(%url, %status, "catalog request failed");
            return Err(FetchFailure::status(operation, status.as_u16()));
        }

        response
            .json::<Value>()
            .await
            .map_err(|err| FetchFailure::new(operation, format!("read response body: {err}")))
    }
}

#[async_trait]
impl Catalog for OpenLibraryClient {
    async fn search(&self, query: &str, limit: usize) -> Result<SearchPage, FetchFailure> {
        let url = self.search_url(query, limit)?;
        tracing::debug!(query, limit, %url, "catalog search");
        let body = self.get_json(FetchOperation::Search, url).await?;
        Ok(parse_search_response(&body))
    }

    async fn detail(&self, reference: &str) -> Result<CatalogItem, FetchFailure> {
        let key = normalize_reference(reference);
        let url = self.detail_url(&key)?;
        tracing::debug!(%key, %url, "catalog detail");
        let body = self.get_json(FetchOperation::Detail, url).await?;
        parse_detail_response(&key, body)
    }
}

pub fn parse_search_response(body: &Value) -> SearchPage {
    let docs = body
        .get("docs")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    let mut items = Vec::with_capacity(docs.len());
    for doc in docs {
        match serde_json::from_value::<CatalogItem>(doc.clone()) {
            Ok(item) => items.push(item),
            Err(err) => {
                tracing::debug!(?err, doc = %doc, "skipping unusable search result");
            }
        }
    }

    let total = body
        .get("numFound")
        .or_else(|| body.get("num_found"))
        .and_then(Value::as_u64)
        .unwrap_or(items.len() as u64);

    SearchPage { items, total }
}

pub fn parse_detail_response(key: &str, mut body: Value) -> Result<CatalogItem, FetchFailure> {
    if let Some(obj) = body.as_object_mut()
        && !obj.contains_key("key")
    {
        obj.insert("key".to_owned(), Value::String(key.to_owned()));
    }
    serde_json::from_value(body).map_err(|err| {
        FetchFailure::new(
            FetchOperation::Detail,
            format!("unusable catalog record for {key}: {err}"),
        )
    })
}
