//! Per-view controllers.
//!
//! Each view owns a [`FetchState`] and moves it through
//! `Idle -> Loading -> Success | Error`. A fetch is tagged with a [`Ticket`]
//! naming the input that started it; a result whose ticket is no longer
//! current is dropped instead of overwriting newer state.

pub mod details;
pub mod favorites;
pub mod results;
pub mod search;

use crate::model::CatalogItem;

pub use details::DetailsView;
pub use favorites::FavoritesView;
pub use results::ResultsView;
pub use search::{SearchQuery, SearchView};

#[derive(Debug, Clone, Default, PartialEq)]
pub enum FetchState<T> {
    #[default]
    Idle,
    Loading,
    Success(T),
    Error(String),
}

impl<T> FetchState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn success(&self) -> Option<&T> {
        match self {
            Self::Success(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Error(message) => Some(message),
            _ => None,
        }
    }
}

/// Where a view wants to go next, with any state it hands over.
#[derive(Debug, Clone, PartialEq)]
pub enum Route {
    Search,
    Results {
        query: String,
    },
    Details {
        reference: String,
        carried: Option<CatalogItem>,
    },
    Favorites,
}

impl Route {
    pub fn details_for(item: &CatalogItem) -> Self {
        Self::Details {
            reference: item.key.clone(),
            carried: Some(item.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    generation: u64,
    input: String,
}

impl Ticket {
    pub fn input(&self) -> &str {
        &self.input
    }
}

/// Issues tickets and remembers which one is current.
#[derive(Debug, Default)]
pub(crate) struct TicketCounter {
    current: Option<Ticket>,
}

impl TicketCounter {
    pub(crate) fn issue(&mut self, input: &str) -> Ticket {
        let generation = self.current.as_ref().map_or(1, |t| t.generation + 1);
        let ticket = Ticket {
            generation,
            input: input.to_owned(),
        };
        self.current = Some(ticket.clone());
        ticket
    }

    pub(crate) fn is_current(&self, ticket: &Ticket) -> bool {
        self.current.as_ref() == Some(ticket)
    }

    pub(crate) fn current_input(&self) -> Option<&str> {
        self.current.as_ref().map(Ticket::input)
    }
}
