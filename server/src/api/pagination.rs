use crate::config::Config;
use axum::http::Uri;
use foodgram_core::{page_link, PageRequest};
use serde::Serialize;
use utoipa::ToSchema;

/// One page of a listing, with absolute links to its neighbours.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Page<T> {
    pub count: i64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T> Page<T> {
    /// `uri` must be the request's original URI so nested routers keep their prefix.
    pub fn new(
        config: &Config,
        uri: &Uri,
        request: PageRequest,
        count: i64,
        results: Vec<T>,
    ) -> Self {
        let link = |page| page_link(&config.public_base_url, uri.path(), uri.query(), page);

        Self {
            count,
            next: request.has_next(count).then(|| link(request.page + 1)),
            previous: request.has_previous().then(|| link(request.page - 1)),
            results,
        }
    }
}
