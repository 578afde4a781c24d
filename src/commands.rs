use std::io::Write;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context as _;

use crate::catalog::{Catalog, CoverResolver, OpenLibraryClient, normalize_reference};
use crate::cli::{CoverArgs, FavoriteRefArgs, FavoritesListArgs, SearchArgs, ShowArgs};
use crate::config::Config;
use crate::favorites::FavoritesManager;
use crate::favorites_store::{FavoritesStore, LocalFsFavoritesStore};
use crate::views::{DetailsView, FavoritesView, FetchState, ResultsView, Route, SearchView};

/// Everything a view needs, built once per process.
pub struct Session {
    pub config: Config,
    pub catalog: Arc<dyn Catalog>,
    pub favorites: FavoritesManager,
    pub covers: CoverResolver,
}

impl Session {
    pub async fn open(config: Config) -> anyhow::Result<Self> {
        let catalog =
            OpenLibraryClient::new(&config.catalog_url).context("create catalog client")?;
        let store = LocalFsFavoritesStore::new(&config.data_dir);
        Ok(Self::with_parts(config, Arc::new(catalog), Arc::new(store)).await)
    }

    pub async fn with_parts(
        config: Config,
        catalog: Arc<dyn Catalog>,
        store: Arc<dyn FavoritesStore>,
    ) -> Self {
        let covers = CoverResolver::new(config.covers_url.as_str());
        let favorites = FavoritesManager::open(store).await;
        Self {
            config,
            catalog,
            favorites,
            covers,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Rendered,
    /// The view ended in its error state; it was still rendered.
    Failed,
}

impl Outcome {
    fn of<T>(state: &FetchState<T>) -> Self {
        match state {
            FetchState::Error(_) => Self::Failed,
            _ => Self::Rendered,
        }
    }

    pub fn exit_code(self) -> ExitCode {
        match self {
            Self::Rendered => ExitCode::SUCCESS,
            Self::Failed => ExitCode::FAILURE,
        }
    }
}

pub async fn search(
    session: &Session,
    args: SearchArgs,
    out: &mut impl Write,
) -> anyhow::Result<Outcome> {
    let mut search = SearchView::new();
    search.set_input(args.query.join(" "));
    let Some(Route::Results { query }) = search.submit() else {
        return Ok(Outcome::Rendered);
    };

    let limit = args.limit.unwrap_or(session.config.search_limit);
    let mut results = ResultsView::new(limit);
    results.load(session.catalog.as_ref(), &query).await;

    out.write_all(results.render(&session.covers, args.covers).as_bytes())
        .context("write results")?;
    Ok(Outcome::of(results.state()))
}

pub async fn show(
    session: &mut Session,
    args: ShowArgs,
    out: &mut impl Write,
) -> anyhow::Result<Outcome> {
    let key = normalize_reference(&args.reference);
    let carried = if args.refresh {
        None
    } else {
        session.favorites.get(&key).cloned()
    };

    let mut details = DetailsView::new();
    details.load(session.catalog.as_ref(), &key, carried).await;

    if details.can_save() {
        if args.save {
            details.save(&mut session.favorites).await?;
        } else if args.unsave {
            details.unsave(&mut session.favorites).await?;
        }
    }

    out.write_all(details.render(&session.covers, &session.favorites).as_bytes())
        .context("write details")?;
    Ok(Outcome::of(details.state()))
}

pub fn favorites_list(
    session: &Session,
    args: FavoritesListArgs,
    out: &mut impl Write,
) -> anyhow::Result<Outcome> {
    let view = FavoritesView::new();
    out.write_all(
        view.render(&session.favorites, &session.covers, args.covers)
            .as_bytes(),
    )
    .context("write favorites")?;
    Ok(Outcome::Rendered)
}

pub async fn favorites_add(
    session: &mut Session,
    args: FavoriteRefArgs,
    out: &mut impl Write,
) -> anyhow::Result<Outcome> {
    let key = normalize_reference(&args.reference);
    let carried = session.favorites.get(&key).cloned();

    let mut details = DetailsView::new();
    details.load(session.catalog.as_ref(), &key, carried).await;

    let Some(item) = details.item() else {
        out.write_all(details.render(&session.covers, &session.favorites).as_bytes())
            .context("write details")?;
        return Ok(Outcome::of(details.state()));
    };
    let title = item.title.clone();
    let message = if details.save(&mut session.favorites).await? {
        format!("Saved \"{title}\" ({key}).\n")
    } else {
        format!("\"{title}\" ({key}) is already saved.\n")
    };
    out.write_all(message.as_bytes()).context("write message")?;
    Ok(Outcome::Rendered)
}

pub async fn favorites_remove(
    session: &mut Session,
    args: FavoriteRefArgs,
    out: &mut impl Write,
) -> anyhow::Result<Outcome> {
    let key = normalize_reference(&args.reference);
    let message = if session.favorites.remove(&key).await {
        format!("Removed {key} from favorites.\n")
    } else {
        format!("{key} is not in favorites.\n")
    };
    out.write_all(message.as_bytes()).context("write message")?;
    Ok(Outcome::Rendered)
}

pub async fn cover(
    session: &Session,
    args: CoverArgs,
    out: &mut impl Write,
) -> anyhow::Result<Outcome> {
    let key = normalize_reference(&args.reference);
    let carried = session.favorites.get(&key).cloned();

    let mut details = DetailsView::new();
    details.load(session.catalog.as_ref(), &key, carried).await;

    let text = match details.item() {
        Some(item) => format!("{}\n", session.covers.resolve(item, args.size)),
        None => details.render(&session.covers, &session.favorites),
    };
    out.write_all(text.as_bytes()).context("write cover url")?;
    Ok(Outcome::of(details.state()))
}
