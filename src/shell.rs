//! Line-driven browser over the four views.
//!
//! Each screen runs until the user picks a destination and returns the next
//! [`Route`]; `None` ends the session.

use std::io::Write;

use anyhow::Context as _;
use tokio::io::{AsyncBufRead, AsyncBufReadExt as _, Lines};

use crate::commands::Session;
use crate::model::CatalogItem;
use crate::views::{DetailsView, FavoritesView, ResultsView, Route, SearchView};

pub async fn run<R, W>(session: &mut Session, input: R, out: &mut W) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let limit = session.config.search_limit;
    let mut shell = Shell {
        session,
        lines: input.lines(),
        out,
        results: ResultsView::new(limit),
        back: Route::Search,
    };

    let mut route = Some(Route::Search);
    while let Some(current) = route {
        tracing::debug!(?current, "entering view");
        route = shell.enter(current).await?;
    }
    Ok(())
}

struct Shell<'a, R, W> {
    session: &'a mut Session,
    lines: Lines<R>,
    out: &'a mut W,
    /// Kept across visits so going back to the same query does not refetch.
    results: ResultsView,
    /// Where `b` leads from the details screen.
    back: Route,
}

impl<R, W> Shell<'_, R, W>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    async fn enter(&mut self, route: Route) -> anyhow::Result<Option<Route>> {
        match route {
            Route::Search => self.search().await,
            Route::Results { query } => self.results(&query).await,
            Route::Details { reference, carried } => self.details(&reference, carried).await,
            Route::Favorites => self.favorites().await,
        }
    }

    async fn search(&mut self) -> anyhow::Result<Option<Route>> {
        let mut view = SearchView::new();
        loop {
            let Some(line) = self.prompt(&view.render()).await? else {
                return Ok(None);
            };
            match line.as_str() {
                ":q" => return Ok(None),
                ":f" => return Ok(Some(Route::Favorites)),
                _ => {
                    view.set_input(line);
                    if let Some(route) = view.submit() {
                        return Ok(Some(route));
                    }
                }
            }
        }
    }

    async fn results(&mut self, query: &str) -> anyhow::Result<Option<Route>> {
        self.results.enter(self.session.catalog.as_ref(), query).await;
        loop {
            let text = self.results.render(&self.session.covers, false);
            self.print(&text)?;
            let Some(line) = self
                .prompt("\n[number] open  r retry  b back  f favorites  q quit\n> ")
                .await?
            else {
                return Ok(None);
            };
            match line.as_str() {
                "q" => return Ok(None),
                "b" => return Ok(Some(Route::Search)),
                "f" => return Ok(Some(Route::Favorites)),
                "r" => self.results.retry(self.session.catalog.as_ref()).await,
                other => match other.parse::<usize>().ok().and_then(|n| self.results.select(n)) {
                    Some(route) => {
                        self.back = Route::Results {
                            query: query.to_owned(),
                        };
                        return Ok(Some(route));
                    }
                    None => self.print(&format!("No result numbered {other:?}.\n"))?,
                },
            }
        }
    }

    async fn details(
        &mut self,
        reference: &str,
        carried: Option<CatalogItem>,
    ) -> anyhow::Result<Option<Route>> {
        let mut view = DetailsView::new();
        view.load(self.session.catalog.as_ref(), reference, carried)
            .await;
        loop {
            let text = view.render(&self.session.covers, &self.session.favorites);
            self.print(&text)?;
            let Some(line) = self
                .prompt("\ns save  u unsave  b back  f favorites  q quit\n> ")
                .await?
            else {
                return Ok(None);
            };
            match line.as_str() {
                "q" => return Ok(None),
                "b" => return Ok(Some(self.back.clone())),
                "f" => return Ok(Some(Route::Favorites)),
                "s" | "u" if !view.can_save() => {
                    self.print("Nothing to save until the book has loaded.\n")?;
                }
                "s" => {
                    view.save(&mut self.session.favorites).await?;
                }
                "u" => {
                    view.unsave(&mut self.session.favorites).await?;
                }
                other => self.print(&format!("Unknown command {other:?}.\n"))?,
            }
        }
    }

    async fn favorites(&mut self) -> anyhow::Result<Option<Route>> {
        let view = FavoritesView::new();
        loop {
            let text = view.render(&self.session.favorites, &self.session.covers, false);
            self.print(&text)?;
            let Some(line) = self
                .prompt("\n[number] open  d <number> remove  b search  q quit\n> ")
                .await?
            else {
                return Ok(None);
            };
            if let Some(position) = line.strip_prefix("d ") {
                let removed = match position.trim().parse::<usize>() {
                    Ok(position) => view.remove_at(&mut self.session.favorites, position).await,
                    Err(_) => false,
                };
                if !removed {
                    self.print(&format!("No saved book numbered {:?}.\n", position.trim()))?;
                }
                continue;
            }
            match line.as_str() {
                "q" => return Ok(None),
                "b" => return Ok(Some(Route::Search)),
                other => match other
                    .parse::<usize>()
                    .ok()
                    .and_then(|n| view.select(&self.session.favorites, n))
                {
                    Some(route) => {
                        self.back = Route::Favorites;
                        return Ok(Some(route));
                    }
                    None => self.print(&format!("No saved book numbered {other:?}.\n"))?,
                },
            }
        }
    }

    /// Returns the next trimmed line, or `None` at end of input.
    async fn prompt(&mut self, text: &str) -> anyhow::Result<Option<String>> {
        self.print(text)?;
        let line = self.lines.next_line().await.context("read input")?;
        Ok(line.map(|line| line.trim().to_owned()))
    }

    fn print(&mut self, text: &str) -> anyhow::Result<()> {
        self.out.write_all(text.as_bytes()).context("write output")?;
        self.out.flush().context("flush output")
    }
}
