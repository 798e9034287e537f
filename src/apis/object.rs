use crate::{
    client::OpenStackClient,
    error::OpenStackResult,
    models::ObjectList,
    object_list::{parse_object_list, ListContext},
};
use log::debug;
use reqwest::Method;
use url::Url;

/// Options for listing the objects of a container
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectListOptions {
    prefix: Option<String>,
    marker: Option<String>,
    limit: Option<u32>,
}

impl ObjectListOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only list objects whose name starts with this prefix
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Start listing after the object with this name
    pub fn marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = Some(marker.into());
        self
    }

    /// Maximum number of objects to return
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    fn apply(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let mut req = request;

        if let Some(prefix) = &self.prefix {
            req = req.query(&[("prefix", prefix)]);
        }

        if let Some(marker) = &self.marker {
            req = req.query(&[("marker", marker)]);
        }

        if let Some(limit) = self.limit {
            req = req.query(&[("limit", limit.to_string())]);
        }

        req
    }
}

/// Object API operations, bound to one region and container
pub struct ObjectApi<'a> {
    client: &'a OpenStackClient,
    endpoint: Url,
    container: String,
}

impl<'a> ObjectApi<'a> {
    pub(crate) fn new(client: &'a OpenStackClient, endpoint: Url, container: String) -> Self {
        Self {
            client,
            endpoint,
            container,
        }
    }

    /// List the objects of the container.
    ///
    /// The response body only carries partial records; each object's URI
    /// and the container metadata are reconstructed from the request URL,
    /// the container argument of this call, and the response headers.
    pub async fn list(&self, options: ObjectListOptions) -> OpenStackResult<ObjectList> {
        let url = OpenStackClient::url_for(&self.endpoint, &urlencoding::encode(&self.container))?;
        debug!("GET {} (container listing)", url);

        let mut req = self.client.request(Method::GET, url).await?;
        req = req.query(&[("format", "json")]);
        req = options.apply(req);

        let response = self.client.execute_raw(req).await?;

        let context = ListContext::new(self.container.as_str(), response.url());
        let headers = response.headers().clone();
        let body = response.bytes().await?;

        parse_object_list(&body, &context, &headers)
    }
}
