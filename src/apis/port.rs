use crate::{
    client::OpenStackClient,
    error::OpenStackResult,
    models::{Link, Port, ReferenceWithName},
    pagination::{self, Page, PaginationOptions},
};
use futures_util::stream::Stream;
use log::debug;
use reqwest::Method;
use serde::Deserialize;
use url::Url;

/// Wire envelope of a port summary listing
#[derive(Debug, Deserialize)]
struct PortsPage {
    ports: Vec<ReferenceWithName>,
    #[serde(default)]
    ports_links: Vec<Link>,
}

/// Wire envelope of a detailed port listing
#[derive(Debug, Deserialize)]
struct PortDetailsPage {
    ports: Vec<Port>,
    #[serde(default)]
    ports_links: Vec<Link>,
}

/// Port API operations, bound to one region's network endpoint
pub struct PortApi<'a> {
    client: &'a OpenStackClient,
    endpoint: Url,
}

impl std::fmt::Debug for PortApi<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PortApi")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl<'a> PortApi<'a> {
    pub(crate) fn new(client: &'a OpenStackClient, endpoint: Url) -> Self {
        Self { client, endpoint }
    }

    /// Fetch one page of port summaries
    pub async fn list_page(
        &self,
        options: PaginationOptions,
    ) -> OpenStackResult<Page<ReferenceWithName>> {
        let url = OpenStackClient::url_for(&self.endpoint, "v2.0/ports")?;
        debug!("GET {}", url);
        let mut req = self.client.request(Method::GET, url).await?;
        req = options.apply(req);

        let page: PortsPage = self.client.execute(req).await?;
        Ok(Page::new(page.ports, page.ports_links))
    }

    /// Lazily list port summaries across all pages.
    ///
    /// Forward-only; consuming the stream issues one call per page. Call
    /// again for a fresh iteration.
    pub fn list(
        &self,
        options: PaginationOptions,
    ) -> impl Stream<Item = OpenStackResult<ReferenceWithName>> + '_ {
        pagination::items(pagination::paginate(options, move |options| {
            self.list_page(options)
        }))
    }

    /// Fetch one page of ports in detail form
    pub async fn list_in_detail_page(
        &self,
        options: PaginationOptions,
    ) -> OpenStackResult<Page<Port>> {
        let url = OpenStackClient::url_for(&self.endpoint, "v2.0/ports/detail")?;
        debug!("GET {}", url);
        let mut req = self.client.request(Method::GET, url).await?;
        req = options.apply(req);

        let page: PortDetailsPage = self.client.execute(req).await?;
        Ok(Page::new(page.ports, page.ports_links))
    }

    /// Lazily list detailed ports across all pages
    pub fn list_in_detail(
        &self,
        options: PaginationOptions,
    ) -> impl Stream<Item = OpenStackResult<Port>> + '_ {
        pagination::items(pagination::paginate(options, move |options| {
            self.list_in_detail_page(options)
        }))
    }
}
