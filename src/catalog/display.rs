//! Display rules for catalog records.
//!
//! The catalog omits fields freely, so every value shown to a user goes
//! through one of these functions and has a fixed fallback. Views only ever
//! look at a [`BookDisplay`].

use crate::model::{CatalogItem, CoverSize, FirstSentence, TextValue};

pub const DEFAULT_COVERS_URL: &str = "https://covers.openlibrary.org";
pub const COVER_PLACEHOLDER_URL: &str = "https://via.placeholder.com/200x300?text=No+Cover";
pub const UNKNOWN_AUTHOR: &str = "Unknown Author";
pub const NO_DESCRIPTION: &str = "No description available";
pub const MAX_SUBJECTS: usize = 6;

#[derive(Debug, Clone, PartialEq)]
pub struct BookDisplay {
    pub key: String,
    pub title: String,
    pub author: String,
    pub description: String,
    pub isbn: Option<String>,
    pub subjects: Vec<String>,
    pub published: Option<String>,
    pub rating: Option<String>,
    pub pages: Option<u32>,
    pub cover_url: String,
}

impl BookDisplay {
    pub fn new(item: &CatalogItem, covers: &CoverResolver, size: CoverSize) -> Self {
        Self {
            key: item.key.clone(),
            title: item.title.clone(),
            author: author_display(item),
            description: description_display(item),
            isbn: isbn_display(item).map(str::to_owned),
            subjects: subjects_display(item).to_vec(),
            published: published_display(item),
            rating: rating_display(item),
            pages: item.number_of_pages_median,
            cover_url: covers.resolve(item, size),
        }
    }
}

pub fn author_display(item: &CatalogItem) -> String {
    let names = item
        .author_name
        .iter()
        .map(|name| name.trim())
        .filter(|name| !name.is_empty())
        .collect::<Vec<_>>();
    if names.is_empty() {
        return UNKNOWN_AUTHOR.to_owned();
    }
    names.join(", ")
}

pub fn description_display(item: &CatalogItem) -> String {
    let plain = match &item.description {
        Some(TextValue::Plain(text)) => non_blank(text),
        _ => None,
    };
    let structured = match &item.description {
        Some(TextValue::Structured { value, .. }) => non_blank(value),
        _ => None,
    };
    let sentence = item
        .first_sentence
        .as_ref()
        .and_then(FirstSentence::first)
        .and_then(non_blank);

    plain
        .or(structured)
        .or(sentence)
        .unwrap_or(NO_DESCRIPTION)
        .to_owned()
}

pub fn isbn_display(item: &CatalogItem) -> Option<&str> {
    [&item.isbn, &item.isbn_13, &item.isbn_10]
        .into_iter()
        .find_map(|list| list.iter().find_map(|isbn| non_blank(isbn)))
}

pub fn subjects_display(item: &CatalogItem) -> &[String] {
    let subjects = if item.subject.is_empty() {
        &item.subjects
    } else {
        &item.subject
    };
    &subjects[..subjects.len().min(MAX_SUBJECTS)]
}

pub fn published_display(item: &CatalogItem) -> Option<String> {
    item.first_publish_year
        .map(|year| year.to_string())
        .or_else(|| {
            item.first_publish_date
                .as_deref()
                .and_then(non_blank)
                .map(str::to_owned)
        })
}

pub fn rating_display(item: &CatalogItem) -> Option<String> {
    let average = item.ratings_average?;
    Some(match item.ratings_count {
        Some(count) => format!("{average:.2} ({count} reviews)"),
        None => format!("{average:.2}"),
    })
}

/// First usable cover id. The catalog marks missing covers with `-1`.
pub fn cover_id(item: &CatalogItem) -> Option<i64> {
    item.cover_i
        .into_iter()
        .chain(item.covers.iter().copied())
        .find(|id| *id > 0)
}

pub fn resolve_cover_url(item: &CatalogItem, size: CoverSize) -> String {
    CoverResolver::default().resolve(item, size)
}

#[derive(Debug, Clone)]
pub struct CoverResolver {
    base_url: String,
}

impl CoverResolver {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }

    pub fn resolve(&self, item: &CatalogItem, size: CoverSize) -> String {
        match cover_id(item) {
            Some(id) => format!("{}/b/id/{id}-{}.jpg", self.base_url, size.as_str()),
            None => COVER_PLACEHOLDER_URL.to_owned(),
        }
    }
}

impl Default for CoverResolver {
    fn default() -> Self {
        Self::new(DEFAULT_COVERS_URL)
    }
}

fn non_blank(text: &str) -> Option<&str> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}
