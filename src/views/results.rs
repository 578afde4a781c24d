use crate::catalog::{BookDisplay, Catalog, CoverResolver, FetchFailure};
use crate::model::{CoverSize, SearchPage};
use crate::views::{FetchState, Route, Ticket, TicketCounter};

pub struct ResultsView {
    limit: usize,
    tickets: TicketCounter,
    state: FetchState<SearchPage>,
}

impl ResultsView {
    pub fn new(limit: usize) -> Self {
        Self {
            limit: limit.max(1),
            tickets: TicketCounter::default(),
            state: FetchState::Idle,
        }
    }

    pub fn state(&self) -> &FetchState<SearchPage> {
        &self.state
    }

    pub fn query(&self) -> Option<&str> {
        self.tickets.current_input()
    }

    /// Starts a fetch for `query`; any fetch still in flight becomes stale.
    pub fn begin(&mut self, query: &str) -> Ticket {
        let ticket = self.tickets.issue(query);
        self.state = FetchState::Loading;
        ticket
    }

    /// Applies a fetch result. Returns `false` when the ticket is stale.
    pub fn complete(&mut self, ticket: &Ticket, result: Result<SearchPage, FetchFailure>) -> bool {
        if !self.tickets.is_current(ticket) {
            tracing::debug!(query = ticket.input(), "dropping stale search result");
            return false;
        }
        self.state = match result {
            Ok(page) => {
                tracing::debug!(
                    query = ticket.input(),
                    count = page.items.len(),
                    total = page.total,
                    "search loaded"
                );
                FetchState::Success(page)
            }
            Err(err) => {
                tracing::warn!(query = ticket.input(), %err, "search failed");
                FetchState::Error(err.to_string())
            }
        };
        true
    }

    pub async fn load(&mut self, catalog: &dyn Catalog, query: &str) {
        let ticket = self.begin(query);
        let result = catalog.search(query, self.limit).await;
        self.complete(&ticket, result);
    }

    /// Fetches only when `query` differs from the current one. A failed
    /// query stays failed until [`ResultsView::retry`].
    pub async fn enter(&mut self, catalog: &dyn Catalog, query: &str) {
        if self.query() == Some(query) {
            return;
        }
        self.load(catalog, query).await;
    }

    pub async fn retry(&mut self, catalog: &dyn Catalog) {
        if let Some(query) = self.query().map(str::to_owned) {
            self.load(catalog, &query).await;
        }
    }

    /// Route to the 1-based result `position`, carrying the item along.
    pub fn select(&self, position: usize) -> Option<Route> {
        let page = self.state.success()?;
        let item = page.items.get(position.checked_sub(1)?)?;
        Some(Route::details_for(item))
    }

    pub fn render(&self, covers: &CoverResolver, show_covers: bool) -> String {
        let query = self.query().unwrap_or_default();
        let mut out = String::new();
        match &self.state {
            FetchState::Idle => {}
            FetchState::Loading => {
                out.push_str(&format!("Searching for \"{query}\"...\n"));
            }
            FetchState::Error(message) => {
                out.push_str(&format!("Could not load results for \"{query}\": {message}\n"));
                out.push_str("Try again, or go back to search.\n");
            }
            FetchState::Success(page) if page.items.is_empty() => {
                out.push_str(&format!("No books found for \"{query}\".\n"));
                out.push_str("Back to search\n");
            }
            FetchState::Success(page) => {
                out.push_str(&format!(
                    "Book Results for \"{query}\" ({} of {})\n\n",
                    page.items.len(),
                    page.total.max(page.items.len() as u64)
                ));
                for (idx, item) in page.items.iter().enumerate() {
                    let book = BookDisplay::new(item, covers, CoverSize::M);
                    out.push_str(&format!("{:>3}. {}\n", idx + 1, book.title));
                    match &book.published {
                        Some(year) => out.push_str(&format!("     {} ({year})\n", book.author)),
                        None => out.push_str(&format!("     {}\n", book.author)),
                    }
                    out.push_str(&format!("     {}\n", book.key));
                    if show_covers {
                        out.push_str(&format!("     {}\n", book.cover_url));
                    }
                }
            }
        }
        out
    }
}
