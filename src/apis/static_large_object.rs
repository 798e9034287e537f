use crate::{
    client::OpenStackClient,
    error::OpenStackResult,
    models::Segment,
};
use log::{debug, info};
use reqwest::Method;
use std::collections::HashMap;
use url::Url;

/// Static large object operations, bound to one region and container.
///
/// A static large object is assembled server-side from already-uploaded
/// segments; this API only publishes and removes the manifest tying them
/// together. Uploading the segments themselves is ordinary object upload,
/// done beforehand.
pub struct StaticLargeObjectApi<'a> {
    client: &'a OpenStackClient,
    endpoint: Url,
    container: String,
}

impl<'a> StaticLargeObjectApi<'a> {
    pub(crate) fn new(client: &'a OpenStackClient, endpoint: Url, container: String) -> Self {
        Self {
            client,
            endpoint,
            container,
        }
    }

    fn object_url(&self, name: &str) -> OpenStackResult<Url> {
        let path = format!(
            "{}/{}",
            urlencoding::encode(&self.container),
            urlencoding::encode(name)
        );
        OpenStackClient::url_for(&self.endpoint, &path)
    }

    /// Create or update a static large object's manifest.
    ///
    /// `segments` are concatenated upon download in exactly the given
    /// order. The call replaces any previous manifest under `name` in its
    /// entirety. Returns the object's ETag: the MD5 of the concatenated
    /// ETag values of the segments (see [`crate::checksum::manifest_etag`]
    /// for the client-side expected value).
    pub async fn replace_manifest(
        &self,
        name: &str,
        segments: &[Segment],
        metadata: &HashMap<String, String>,
    ) -> OpenStackResult<String> {
        let url = self.object_url(name)?;
        info!("publishing manifest {}/{} ({} segments)", self.container, name, segments.len());

        let mut req = self.client.request(Method::PUT, url).await?;
        req = req.query(&[("multipart-manifest", "put")]);
        req = req.json(&segments);

        for (key, value) in metadata {
            req = req.header(format!("X-Object-Meta-{}", key).as_str(), value.as_str());
        }

        self.client.execute_etag(req).await
    }

    /// Delete a static large object, if present, including all of its
    /// segments.
    ///
    /// Idempotent: deleting a name that does not exist is a no-op, not an
    /// error.
    pub async fn delete(&self, name: &str) -> OpenStackResult<()> {
        let url = self.object_url(name)?;
        info!("deleting manifest {}/{}", self.container, name);

        let mut req = self.client.request(Method::DELETE, url).await?;
        req = req.query(&[("multipart-manifest", "delete")]);

        let deleted = self.client.execute_ok(req).await?;
        if !deleted {
            debug!("manifest {}/{} already absent", self.container, name);
        }

        Ok(())
    }
}
