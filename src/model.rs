use serde::{Deserialize, Serialize};

/// One catalog record. Field names follow the catalog's JSON so the same
/// shape is used for responses and for the persisted favorites record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub key: String,
    pub title: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub author_name: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_i: Option<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub covers: Vec<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_publish_year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_publish_date: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<TextValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_sentence: Option<FirstSentence>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ratings_average: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ratings_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_of_pages_median: Option<u32>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subject: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subjects: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub isbn: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub isbn_13: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub isbn_10: Vec<String>,
}

impl CatalogItem {
    pub fn new(key: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            title: title.into(),
            ..Self::default()
        }
    }
}

/// Text the catalog sends either as a bare string or as `{ "type", "value" }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TextValue {
    Plain(String),
    Structured {
        #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
        kind: Option<String>,
        value: String,
    },
}

impl TextValue {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Plain(text) => text,
            Self::Structured { value, .. } => value,
        }
    }
}

/// Search results carry a list of sentences; detail records carry one text value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FirstSentence {
    List(Vec<String>),
    Single(TextValue),
}

impl FirstSentence {
    pub fn first(&self) -> Option<&str> {
        match self {
            Self::List(sentences) => sentences.first().map(String::as_str),
            Self::Single(text) => Some(text.as_str()),
        }
    }
}

/// The persisted favorites aggregate, in insertion order.
pub type FavoritesCollection = Vec<CatalogItem>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchPage {
    pub items: Vec<CatalogItem>,
    /// Informational only; results are never paged.
    pub total: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum CoverSize {
    #[value(name = "S", alias = "s")]
    S,
    #[default]
    #[value(name = "M", alias = "m")]
    M,
    #[value(name = "L", alias = "l")]
    L,
}

impl CoverSize {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::S => "S",
            Self::M => "M",
            Self::L => "L",
        }
    }
}
