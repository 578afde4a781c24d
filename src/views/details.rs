use crate::catalog::{BookDisplay, Catalog, CoverResolver, FetchFailure, normalize_reference};
use crate::favorites::FavoritesManager;
use crate::model::{CatalogItem, CoverSize};
use crate::views::{FetchState, Ticket, TicketCounter};

#[derive(Default)]
pub struct DetailsView {
    tickets: TicketCounter,
    state: FetchState<CatalogItem>,
}

impl DetailsView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &FetchState<CatalogItem> {
        &self.state
    }

    pub fn reference(&self) -> Option<&str> {
        self.tickets.current_input()
    }

    pub fn item(&self) -> Option<&CatalogItem> {
        self.state.success()
    }

    /// Starts resolving `reference`. A carried item skips `Loading` entirely.
    pub fn begin(&mut self, reference: &str, carried: bool) -> Ticket {
        let ticket = self.tickets.issue(&normalize_reference(reference));
        if !carried {
            self.state = FetchState::Loading;
        }
        ticket
    }

    /// Applies a fetch result. Returns `false` when the ticket is stale.
    pub fn complete(&mut self, ticket: &Ticket, result: Result<CatalogItem, FetchFailure>) -> bool {
        if !self.tickets.is_current(ticket) {
            tracing::debug!(reference = ticket.input(), "dropping stale detail result");
            return false;
        }
        self.state = match result {
            Ok(item) => FetchState::Success(item),
            Err(err) => {
                tracing::warn!(reference = ticket.input(), %err, "detail fetch failed");
                FetchState::Error(err.to_string())
            }
        };
        true
    }

    pub async fn load(
        &mut self,
        catalog: &dyn Catalog,
        reference: &str,
        carried: Option<CatalogItem>,
    ) {
        let ticket = self.begin(reference, carried.is_some());
        let result = catalog.fetch_detail(ticket.input(), carried).await;
        self.complete(&ticket, result);
    }

    /// Saving needs a loaded item.
    pub fn can_save(&self) -> bool {
        self.state.success().is_some()
    }

    pub fn is_saved(&self, favorites: &FavoritesManager) -> bool {
        self.item()
            .is_some_and(|item| favorites.is_favorite(&item.key))
    }

    /// Returns `Ok(false)` when the item was already saved.
    pub async fn save(&self, favorites: &mut FavoritesManager) -> anyhow::Result<bool> {
        let Some(item) = self.item() else {
            anyhow::bail!("save is only available once the book has loaded");
        };
        Ok(favorites.add(item.clone()).await)
    }

    /// Returns `Ok(false)` when the item was not saved.
    pub async fn unsave(&self, favorites: &mut FavoritesManager) -> anyhow::Result<bool> {
        let Some(item) = self.item() else {
            anyhow::bail!("unsave is only available once the book has loaded");
        };
        Ok(favorites.remove(&item.key).await)
    }

    pub fn render(&self, covers: &CoverResolver, favorites: &FavoritesManager) -> String {
        let reference = self.reference().unwrap_or_default();
        let mut out = String::new();
        match &self.state {
            FetchState::Idle => {}
            FetchState::Loading => {
                out.push_str(&format!("Loading {reference}...\n"));
            }
            FetchState::Error(message) => {
                out.push_str(&format!("Could not load book {reference}: {message}\n"));
                out.push_str("Back to results\n");
            }
            FetchState::Success(item) => {
                let book = BookDisplay::new(item, covers, CoverSize::L);
                out.push_str(&format!("{}\n", book.title));
                out.push_str(&format!("by {}\n", book.author));
                if let Some(rating) = &book.rating {
                    out.push_str(&format!("Rating: {rating}\n"));
                }
                out.push_str(&format!("\n{}\n\n", book.description));
                if let Some(isbn) = &book.isbn {
                    out.push_str(&format!("ISBN:             {isbn}\n"));
                }
                if let Some(published) = &book.published {
                    out.push_str(&format!("Publication date: {published}\n"));
                }
                if let Some(pages) = book.pages {
                    out.push_str(&format!("Number of pages:  {pages} pages\n"));
                }
                if !book.subjects.is_empty() {
                    out.push_str(&format!("Subjects:         {}\n", book.subjects.join(", ")));
                }
                out.push_str(&format!("Cover:            {}\n", book.cover_url));
                out.push_str(&format!("Key:              {}\n", book.key));
                if favorites.is_favorite(&item.key) {
                    out.push_str("\n[saved] Remove from favorites\n");
                } else {
                    out.push_str("\n[not saved] Save\n");
                }
            }
        }
        out
    }
}
