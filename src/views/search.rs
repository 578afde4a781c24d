use std::fmt;

use crate::views::Route;

/// A query that is known to be non-blank. Always stored trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery(String);

impl SearchQuery {
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Holds the text being typed. Has no network state.
#[derive(Debug, Default)]
pub struct SearchView {
    input: String,
}

impl SearchView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_input(&mut self, input: impl Into<String>) {
        self.input = input.into();
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// `None` means stay on this view; blank input shows no error.
    pub fn submit(&self) -> Option<Route> {
        let Some(query) = SearchQuery::parse(&self.input) else {
            tracing::debug!("blank query; staying on search");
            return None;
        };
        Some(Route::Results {
            query: query.as_str().to_owned(),
        })
    }

    pub fn render(&self) -> String {
        "Find your next favorite read\nSearch books: ".to_owned()
    }
}
