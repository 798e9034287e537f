//! Marker-based pagination over OpenStack collection responses.
//!
//! Collections come back one page at a time, each page carrying the items
//! in server order plus relational links. A `rel="next"` link holds the
//! resume marker for the following page. [`paginate`] turns a per-resource
//! page fetcher into a lazy stream of pages: one backend call per page,
//! no read-ahead, no buffering, not restartable. Re-listing means opening
//! a fresh stream from the API accessor.

use std::future::Future;

use futures_util::stream::{self, Stream, TryStreamExt};
use url::Url;

use crate::error::{OpenStackError, OpenStackResult};
use crate::models::Link;

/// Caller-supplied listing options, forwarded as `limit`/`marker` query
/// parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaginationOptions {
    limit: Option<u32>,
    marker: Option<String>,
}

impl PaginationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Maximum number of items per page
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Start listing after the item with this marker
    pub fn marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = Some(marker.into());
        self
    }

    /// Add the configured parameters to a request
    pub(crate) fn apply(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let mut req = request;

        if let Some(limit) = self.limit {
            req = req.query(&[("limit", limit.to_string())]);
        }

        if let Some(marker) = &self.marker {
            req = req.query(&[("marker", marker)]);
        }

        req
    }
}

/// One page of a listing: items in server order plus relational links
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    items: Vec<T>,
    links: Vec<Link>,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, links: Vec<Link>) -> Self {
        Self { items, links }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// Resume marker carried by the `rel="next"` link, if any.
    ///
    /// The marker value is backend-opaque; it is extracted but never
    /// interpreted. A next link without a parseable marker means the
    /// sequence has ended.
    pub fn next_marker(&self) -> Option<String> {
        let next = self.links.iter().find(|link| link.rel == "next")?;
        let href = Url::parse(&next.href).ok()?;
        href.query_pairs()
            .find(|(key, _)| key == "marker")
            .map(|(_, value)| value.into_owned())
    }
}

/// Lazily walk a paginated listing.
///
/// The first fetch passes the caller's `options` through unchanged; every
/// later fetch carries only the marker extracted from the previous page's
/// next link. Each polled page costs exactly one call to `fetch`; a fetch
/// error ends the stream after being yielded, without invalidating pages
/// already produced.
pub fn paginate<T, F, Fut>(
    options: PaginationOptions,
    fetch: F,
) -> impl Stream<Item = OpenStackResult<Page<T>>>
where
    F: Fn(PaginationOptions) -> Fut,
    Fut: Future<Output = OpenStackResult<Page<T>>>,
{
    stream::try_unfold((fetch, Some(options)), |(fetch, pending)| async move {
        let Some(options) = pending else {
            return Ok(None);
        };

        let page = fetch(options).await?;
        let next = page
            .next_marker()
            .map(|marker| PaginationOptions::new().marker(marker));

        Ok(Some((page, (fetch, next))))
    })
}

/// Flatten a stream of pages into a stream of items, preserving order
pub fn items<T, S>(pages: S) -> impl Stream<Item = OpenStackResult<T>>
where
    S: Stream<Item = OpenStackResult<Page<T>>>,
{
    pages
        .map_ok(|page| stream::iter(page.into_items().into_iter().map(Ok::<_, OpenStackError>)))
        .try_flatten()
}
