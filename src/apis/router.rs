use crate::{
    client::OpenStackClient,
    error::OpenStackResult,
    models::{Link, ReferenceWithName},
    pagination::{self, Page, PaginationOptions},
};
use futures_util::stream::Stream;
use log::debug;
use reqwest::Method;
use serde::Deserialize;
use url::Url;

/// Wire envelope of a router listing
#[derive(Debug, Deserialize)]
struct RoutersPage {
    routers: Vec<ReferenceWithName>,
    #[serde(default)]
    routers_links: Vec<Link>,
}

/// Router API operations, bound to one region's network endpoint
pub struct RouterApi<'a> {
    client: &'a OpenStackClient,
    endpoint: Url,
}

impl<'a> RouterApi<'a> {
    pub(crate) fn new(client: &'a OpenStackClient, endpoint: Url) -> Self {
        Self { client, endpoint }
    }

    /// Fetch one page of router summaries
    pub async fn list_page(
        &self,
        options: PaginationOptions,
    ) -> OpenStackResult<Page<ReferenceWithName>> {
        let url = OpenStackClient::url_for(&self.endpoint, "v2.0/routers")?;
        debug!("GET {}", url);
        let mut req = self.client.request(Method::GET, url).await?;
        req = options.apply(req);

        let page: RoutersPage = self.client.execute(req).await?;
        Ok(Page::new(page.routers, page.routers_links))
    }

    /// Lazily list router summaries across all pages
    pub fn list(
        &self,
        options: PaginationOptions,
    ) -> impl Stream<Item = OpenStackResult<ReferenceWithName>> + '_ {
        pagination::items(pagination::paginate(options, move |options| {
            self.list_page(options)
        }))
    }
}
