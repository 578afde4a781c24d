use crate::catalog::{BookDisplay, CoverResolver};
use crate::favorites::FavoritesManager;
use crate::model::CoverSize;
use crate::views::Route;

/// Lists saved books straight from the manager; there is nothing to fetch.
#[derive(Debug, Default)]
pub struct FavoritesView;

impl FavoritesView {
    pub fn new() -> Self {
        Self
    }

    /// Route to the 1-based entry `position`, carrying the stored record.
    pub fn select(&self, favorites: &FavoritesManager, position: usize) -> Option<Route> {
        let item = favorites.list().get(position.checked_sub(1)?)?;
        Some(Route::details_for(item))
    }

    /// Removes the 1-based entry `position`. Returns `false` when out of range.
    pub async fn remove_at(&self, favorites: &mut FavoritesManager, position: usize) -> bool {
        let Some(key) = position
            .checked_sub(1)
            .and_then(|idx| favorites.list().get(idx))
            .map(|item| item.key.clone())
        else {
            return false;
        };
        favorites.remove(&key).await
    }

    pub fn render(
        &self,
        favorites: &FavoritesManager,
        covers: &CoverResolver,
        show_covers: bool,
    ) -> String {
        let mut out = format!("My Saved Books ({})\n", favorites.len());
        if favorites.is_empty() {
            out.push_str("\nYou haven't saved any books yet.\n");
            out.push_str("Go to Search\n");
            return out;
        }

        out.push('\n');
        for (idx, item) in favorites.list().iter().enumerate() {
            let book = BookDisplay::new(item, covers, CoverSize::M);
            out.push_str(&format!("{:>3}. {}\n", idx + 1, book.title));
            out.push_str(&format!("     {}\n", book.author));
            out.push_str(&format!("     {}\n", book.key));
            if show_covers {
                out.push_str(&format!("     {}\n", book.cover_url));
            }
        }
        out
    }
}
