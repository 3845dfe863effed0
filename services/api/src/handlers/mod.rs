use ladle_domain::pagination::{PageRequest, Paginated};
use serde::Serialize;

pub mod ingredients;
pub mod recipes;
pub mod shortlink;
pub mod subscriptions;
pub mod tags;
pub mod users;

/// Standard list envelope with absolute `next`/`previous` links.
#[derive(Serialize)]
pub struct PageResponse<T> {
    pub count: u64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T> PageResponse<T> {
    /// Wrap one page of `results`. `extra_query` carries any non-paging
    /// params and must start with `&` when non-empty.
    pub fn new(
        base_url: &str,
        path: &str,
        extra_query: &str,
        page: PageRequest,
        data: Paginated<T>,
    ) -> Self {
        let link = |p: u32| format!("{base_url}{path}?page={p}&limit={}{extra_query}", page.limit);
        let next = page.has_next(data.count).then(|| link(page.page + 1));
        let previous = (page.page > 1).then(|| link(page.page - 1));
        Self {
            count: data.count,
            next,
            previous,
            results: data.items,
        }
    }
}

/// Absolute URL for a media-relative file path.
pub fn media_url(base_url: &str, path: &str) -> String {
    format!("{base_url}/media/{path}")
}
