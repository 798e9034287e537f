use crate::{
    client::OpenStackClient,
    error::OpenStackResult,
    models::QueueStats,
};
use log::debug;
use reqwest::Method;
use std::collections::HashMap;
use url::Url;

/// Queue API operations, bound to one region's messaging endpoint.
///
/// Existence checks, reads and deletes treat 404 as a benign outcome
/// rather than an error; each method documents its fallback.
pub struct QueueApi<'a> {
    client: &'a OpenStackClient,
    endpoint: Url,
}

impl<'a> QueueApi<'a> {
    pub(crate) fn new(client: &'a OpenStackClient, endpoint: Url) -> Self {
        Self { client, endpoint }
    }

    fn queue_url(&self, name: &str, suffix: &str) -> OpenStackResult<Url> {
        let path = format!("queues/{}{}", urlencoding::encode(name), suffix);
        OpenStackClient::url_for(&self.endpoint, &path)
    }

    /// Create a queue. Returns `false` on 404 from the backend.
    pub async fn create(&self, name: &str) -> OpenStackResult<bool> {
        debug!("creating queue {}", name);
        let req = self
            .client
            .request(Method::PUT, self.queue_url(name, "")?)
            .await?;

        self.client.execute_ok(req).await
    }

    /// Delete a queue. Deleting an absent queue returns `false`, not an
    /// error.
    pub async fn delete(&self, name: &str) -> OpenStackResult<bool> {
        debug!("deleting queue {}", name);
        let req = self
            .client
            .request(Method::DELETE, self.queue_url(name, "")?)
            .await?;

        self.client.execute_ok(req).await
    }

    /// Check for a queue's existence
    pub async fn exists(&self, name: &str) -> OpenStackResult<bool> {
        let req = self
            .client
            .request(Method::GET, self.queue_url(name, "")?)
            .await?;

        self.client.execute_ok(req).await
    }

    /// Replace the queue's metadata document in its entirety.
    ///
    /// Returns `false` when the queue does not exist.
    pub async fn set_metadata(
        &self,
        name: &str,
        metadata: &HashMap<String, String>,
    ) -> OpenStackResult<bool> {
        debug!("setting metadata on queue {}", name);
        let mut req = self
            .client
            .request(Method::PUT, self.queue_url(name, "/metadata")?)
            .await?;
        req = req.json(metadata);

        self.client.execute_ok(req).await
    }

    /// Get the queue's metadata; `None` when the queue does not exist
    pub async fn get_metadata(
        &self,
        name: &str,
    ) -> OpenStackResult<Option<HashMap<String, String>>> {
        let req = self
            .client
            .request(Method::GET, self.queue_url(name, "/metadata")?)
            .await?;

        self.client.execute_optional(req).await
    }

    /// Get the queue's message statistics; `None` when the queue does not
    /// exist
    pub async fn stats(&self, name: &str) -> OpenStackResult<Option<QueueStats>> {
        let req = self
            .client
            .request(Method::GET, self.queue_url(name, "/stats")?)
            .await?;

        self.client.execute_optional(req).await
    }
}
