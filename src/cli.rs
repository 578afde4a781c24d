use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::model::CoverSize;

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    /// Directory holding the favorites record (default: $BOOKNOOK_DATA_DIR or the user data dir).
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Catalog base URL (default: $BOOKNOOK_CATALOG_URL or https://openlibrary.org).
    #[arg(long, global = true)]
    pub catalog_url: Option<String>,

    /// Cover image base URL (default: $BOOKNOOK_COVERS_URL or https://covers.openlibrary.org).
    #[arg(long, global = true)]
    pub covers_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Search the catalog.
    Search(SearchArgs),
    /// Show one book.
    Show(ShowArgs),
    /// Manage saved books.
    Favorites {
        #[command(subcommand)]
        command: FavoritesCommand,
    },
    /// Print the cover image URL of a book.
    Cover(CoverArgs),
    /// Browse interactively.
    Shell,
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Free-text query.
    #[arg(num_args = 0..)]
    pub query: Vec<String>,

    /// Maximum results to fetch (default: $BOOKNOOK_SEARCH_LIMIT or 20).
    #[arg(long)]
    pub limit: Option<usize>,

    /// Print cover image URLs.
    #[arg(long)]
    pub covers: bool,
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Catalog key or id (e.g. `OL45883W` or `/works/OL45883W`).
    pub reference: String,

    /// Add the book to favorites.
    #[arg(long, conflicts_with = "unsave")]
    pub save: bool,

    /// Remove the book from favorites.
    #[arg(long)]
    pub unsave: bool,

    /// Fetch from the catalog even when the book is saved locally.
    #[arg(long)]
    pub refresh: bool,
}

#[derive(Debug, Subcommand)]
pub enum FavoritesCommand {
    List(FavoritesListArgs),
    Add(FavoriteRefArgs),
    Remove(FavoriteRefArgs),
}

#[derive(Debug, Args)]
pub struct FavoritesListArgs {
    /// Print cover image URLs.
    #[arg(long)]
    pub covers: bool,
}

#[derive(Debug, Args)]
pub struct FavoriteRefArgs {
    /// Catalog key or id.
    pub reference: String,
}

#[derive(Debug, Args)]
pub struct CoverArgs {
    /// Catalog key or id.
    pub reference: String,

    /// Size class.
    #[arg(long, value_enum, default_value_t = CoverSize::M)]
    pub size: CoverSize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_collects_words_and_flags() {
        let cli =
            Cli::try_parse_from(["booknook", "search", "the", "hobbit", "--limit", "3"]).unwrap();
        let Command::Search(args) = cli.command else {
            panic!("expected search");
        };
        assert_eq!(args.query, vec!["the", "hobbit"]);
        assert_eq!(args.limit, Some(3));
    }

    #[test]
    fn save_conflicts_with_unsave() {
        let err = Cli::try_parse_from(["booknook", "show", "OL1W", "--save", "--unsave"]);
        assert!(err.is_err());
    }

    #[test]
    fn cover_size_accepts_lowercase() {
        let cli = Cli::try_parse_from(["booknook", "cover", "OL1W", "--size", "l"]).unwrap();
        let Command::Cover(args) = cli.command else {
            panic!("expected cover");
        };
        assert_eq!(args.size, CoverSize::L);
    }
}
