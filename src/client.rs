use crate::{
    apis::{ObjectApi, PortApi, QueueApi, RouterApi, StaticLargeObjectApi},
    auth::Authentication,
    error::{OpenStackError, OpenStackResult},
};
use log::debug;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::sync::Arc;
use url::Url;

/// Service families this client binds to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceType {
    ObjectStore,
    Network,
    Messaging,
}

impl ServiceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ObjectStore => "object-store",
            Self::Network => "network",
            Self::Messaging => "messaging",
        }
    }
}

/// Per-region endpoint catalog for the configured services.
///
/// Stands in for the provider's identity catalog: each (service, region)
/// pair maps to the service root URL for that region.
#[derive(Debug, Clone)]
pub struct ServiceCatalog {
    endpoints: HashMap<(ServiceType, String), Url>,
    default_region: Option<String>,
}

impl ServiceCatalog {
    pub fn builder() -> ServiceCatalogBuilder {
        ServiceCatalogBuilder::default()
    }

    /// Regions configured for a service, in sorted order
    pub fn configured_regions(&self, service: ServiceType) -> Vec<String> {
        let mut regions: Vec<String> = self
            .endpoints
            .keys()
            .filter(|(s, _)| *s == service)
            .map(|(_, region)| region.clone())
            .collect();
        regions.sort();
        regions
    }

    /// Resolve a region argument to an endpoint.
    ///
    /// An absent region falls back to the configured default, or to the
    /// single configured region for the service. A name that matches no
    /// endpoint is a configuration error, surfaced immediately and never
    /// retried.
    pub(crate) fn resolve(
        &self,
        service: ServiceType,
        region: Option<&str>,
    ) -> OpenStackResult<&Url> {
        let region = match region {
            Some(region) => region.to_string(),
            None => self.default_region_for(service)?,
        };

        self.endpoints
            .get(&(service, region.clone()))
            .ok_or(OpenStackError::UnknownRegion(region))
    }

    fn default_region_for(&self, service: ServiceType) -> OpenStackResult<String> {
        if let Some(region) = &self.default_region {
            return Ok(region.clone());
        }

        let mut regions = self
            .endpoints
            .keys()
            .filter(|(s, _)| *s == service)
            .map(|(_, region)| region);

        match (regions.next(), regions.next()) {
            (Some(region), None) => Ok(region.clone()),
            _ => Err(OpenStackError::UnknownRegion(format!(
                "no default region for service {}",
                service.as_str()
            ))),
        }
    }
}

/// Builder for [`ServiceCatalog`]
#[derive(Debug, Clone, Default)]
pub struct ServiceCatalogBuilder {
    endpoints: HashMap<(ServiceType, String), Url>,
    default_region: Option<String>,
}

impl ServiceCatalogBuilder {
    /// Register the endpoint of a service in a region
    pub fn endpoint(
        mut self,
        service: ServiceType,
        region: impl Into<String>,
        endpoint: impl AsRef<str>,
    ) -> OpenStackResult<Self> {
        let url = Url::parse(endpoint.as_ref())?;
        self.endpoints.insert((service, region.into()), url);
        Ok(self)
    }

    /// Region used when a call does not name one
    pub fn default_region(mut self, region: impl Into<String>) -> Self {
        self.default_region = Some(region.into());
        self
    }

    pub fn build(self) -> ServiceCatalog {
        ServiceCatalog {
            endpoints: self.endpoints,
            default_region: self.default_region,
        }
    }
}

/// Main OpenStack client: shared transport, credentials, and the endpoint
/// catalog the per-service APIs are resolved against.
#[derive(Clone)]
pub struct OpenStackClient {
    client: Client,
    catalog: Arc<ServiceCatalog>,
    auth: Arc<dyn Authentication>,
}

impl OpenStackClient {
    /// Create a new client with authentication
    pub fn new(
        catalog: ServiceCatalog,
        auth: impl Authentication + 'static,
    ) -> OpenStackResult<Self> {
        let client = Client::builder()
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()?;

        Ok(Self {
            client,
            catalog: Arc::new(catalog),
            auth: Arc::new(auth),
        })
    }

    /// Create a new client with a custom reqwest client
    pub fn with_client(
        client: Client,
        catalog: ServiceCatalog,
        auth: impl Authentication + 'static,
    ) -> Self {
        Self {
            client,
            catalog: Arc::new(catalog),
            auth: Arc::new(auth),
        }
    }

    /// Regions configured for a service
    pub fn configured_regions(&self, service: ServiceType) -> Vec<String> {
        self.catalog.configured_regions(service)
    }

    /// Get the Port API bound to a region
    pub fn ports(&self, region: Option<&str>) -> OpenStackResult<PortApi<'_>> {
        let endpoint = self.catalog.resolve(ServiceType::Network, region)?.clone();
        Ok(PortApi::new(self, endpoint))
    }

    /// Get the Router API bound to a region
    pub fn routers(&self, region: Option<&str>) -> OpenStackResult<RouterApi<'_>> {
        let endpoint = self.catalog.resolve(ServiceType::Network, region)?.clone();
        Ok(RouterApi::new(self, endpoint))
    }

    /// Get the Queue API bound to a region
    pub fn queues(&self, region: Option<&str>) -> OpenStackResult<QueueApi<'_>> {
        let endpoint = self.catalog.resolve(ServiceType::Messaging, region)?.clone();
        Ok(QueueApi::new(self, endpoint))
    }

    /// Get the Object API bound to a region and container
    pub fn objects(
        &self,
        region: Option<&str>,
        container: impl Into<String>,
    ) -> OpenStackResult<ObjectApi<'_>> {
        let endpoint = self
            .catalog
            .resolve(ServiceType::ObjectStore, region)?
            .clone();
        Ok(ObjectApi::new(self, endpoint, container.into()))
    }

    /// Get the static large object API bound to a region and container
    pub fn static_large_objects(
        &self,
        region: Option<&str>,
        container: impl Into<String>,
    ) -> OpenStackResult<StaticLargeObjectApi<'_>> {
        let endpoint = self
            .catalog
            .resolve(ServiceType::ObjectStore, region)?
            .clone();
        Ok(StaticLargeObjectApi::new(self, endpoint, container.into()))
    }

    /// Append a path to a service endpoint, keeping the endpoint's own path
    pub(crate) fn url_for(endpoint: &Url, path: &str) -> OpenStackResult<Url> {
        let base = endpoint.as_str().trim_end_matches('/');
        let url = Url::parse(&format!("{}/{}", base, path.trim_start_matches('/')))?;
        Ok(url)
    }

    /// Build a request to the given URL with authentication
    pub(crate) async fn request(
        &self,
        method: Method,
        url: Url,
    ) -> OpenStackResult<RequestBuilder> {
        let mut request = self.client.request(method, url);

        let mut headers = reqwest::header::HeaderMap::new();
        self.auth.apply_auth(&mut headers).await?;

        for (name, value) in headers.iter() {
            request = request.header(name, value);
        }

        Ok(request)
    }

    /// Execute a request and deserialize the JSON body
    pub(crate) async fn execute<T>(&self, request: RequestBuilder) -> OpenStackResult<T>
    where
        T: DeserializeOwned,
    {
        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            let json = response.json::<T>().await?;
            Ok(json)
        } else {
            self.handle_error_response(status, response).await
        }
    }

    /// Execute a request and hand back the raw success response
    pub(crate) async fn execute_raw(&self, request: RequestBuilder) -> OpenStackResult<Response> {
        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            Ok(response)
        } else {
            self.handle_error_response(status, response).await
        }
    }

    /// Execute a request, treating 404 as a benign `false`.
    ///
    /// The fallback used by existence checks and delete-style operations
    /// whose target may legitimately be gone already.
    pub(crate) async fn execute_ok(&self, request: RequestBuilder) -> OpenStackResult<bool> {
        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            Ok(true)
        } else if status == StatusCode::NOT_FOUND {
            debug!("treating 404 as benign false");
            Ok(false)
        } else {
            self.handle_error_response(status, response).await
        }
    }

    /// Execute a request, treating 404 as `None`.
    ///
    /// The fallback used by reads whose subject may not exist.
    pub(crate) async fn execute_optional<T>(
        &self,
        request: RequestBuilder,
    ) -> OpenStackResult<Option<T>>
    where
        T: DeserializeOwned,
    {
        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            debug!("treating 404 as benign None");
            return Ok(None);
        }

        if status.is_success() {
            let json = response.json::<T>().await?;
            Ok(Some(json))
        } else {
            self.handle_error_response(status, response).await
        }
    }

    /// Execute a request and return the `ETag` response header.
    ///
    /// Surrounding quotes are stripped; a success response without the
    /// header is malformed.
    pub(crate) async fn execute_etag(&self, request: RequestBuilder) -> OpenStackResult<String> {
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            return self.handle_error_response(status, response).await;
        }

        let etag = response
            .headers()
            .get(reqwest::header::ETAG)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| OpenStackError::malformed("missing ETag header"))?;

        Ok(etag.trim_matches('"').to_string())
    }

    /// Map an error response onto the error taxonomy
    async fn handle_error_response<T>(
        &self,
        status: StatusCode,
        response: Response,
    ) -> OpenStackResult<T> {
        let message = match response.json::<serde_json::Value>().await {
            Ok(body) => {
                extract_error_message(&body).unwrap_or_else(|| format!("HTTP {}", status))
            }
            Err(_) => format!("HTTP {}", status),
        };

        match status {
            StatusCode::UNAUTHORIZED => Err(OpenStackError::auth_error(message)),
            StatusCode::FORBIDDEN => Err(OpenStackError::PermissionDenied(message)),
            StatusCode::NOT_FOUND => Err(OpenStackError::NotFound(message)),
            StatusCode::BAD_REQUEST => Err(OpenStackError::BadRequest(message)),
            _ => Err(OpenStackError::api_error(status.as_u16(), message)),
        }
    }
}

/// Pull a human-readable message out of an OpenStack error body.
///
/// Services wrap errors either flat (`{"message": …}`) or keyed by fault
/// name (`{"itemNotFound": {"message": …}}`).
fn extract_error_message(body: &serde_json::Value) -> Option<String> {
    let object = body.as_object()?;

    if let Some(message) = object.get("message").and_then(|v| v.as_str()) {
        return Some(message.to_string());
    }

    if object.len() == 1 {
        let inner = object.values().next()?;
        if let Some(message) = inner.get("message").and_then(|v| v.as_str()) {
            return Some(message.to_string());
        }
        if let Some(message) = inner.as_str() {
            return Some(message.to_string());
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> ServiceCatalog {
        ServiceCatalog::builder()
            .endpoint(ServiceType::Network, "DFW", "http://dfw.host:9696")
            .unwrap()
            .endpoint(ServiceType::Network, "ORD", "http://ord.host:9696")
            .unwrap()
            .endpoint(ServiceType::ObjectStore, "DFW", "https://storage.host/v1/AUTH_acct")
            .unwrap()
            .default_region("DFW")
            .build()
    }

    #[test]
    fn resolves_named_region() {
        let catalog = catalog();
        let endpoint = catalog.resolve(ServiceType::Network, Some("ORD")).unwrap();
        assert_eq!(endpoint.as_str(), "http://ord.host:9696/");
    }

    #[test]
    fn absent_region_uses_default() {
        let catalog = catalog();
        let endpoint = catalog.resolve(ServiceType::Network, None).unwrap();
        assert_eq!(endpoint.host_str(), Some("dfw.host"));
    }

    #[test]
    fn absent_region_with_single_endpoint_and_no_default() {
        let catalog = ServiceCatalog::builder()
            .endpoint(ServiceType::Messaging, "SYD", "http://syd.host:8888")
            .unwrap()
            .build();

        let endpoint = catalog.resolve(ServiceType::Messaging, None).unwrap();
        assert_eq!(endpoint.host_str(), Some("syd.host"));
    }

    #[test]
    fn unknown_region_is_a_configuration_error() {
        let catalog = catalog();
        let err = catalog
            .resolve(ServiceType::Network, Some("LON"))
            .unwrap_err();
        assert!(matches!(err, OpenStackError::UnknownRegion(region) if region == "LON"));
    }

    #[test]
    fn ambiguous_default_is_an_error() {
        let catalog = ServiceCatalog::builder()
            .endpoint(ServiceType::Network, "DFW", "http://dfw.host:9696")
            .unwrap()
            .endpoint(ServiceType::Network, "ORD", "http://ord.host:9696")
            .unwrap()
            .build();

        assert!(matches!(
            catalog.resolve(ServiceType::Network, None),
            Err(OpenStackError::UnknownRegion(_))
        ));
    }

    #[test]
    fn configured_regions_are_sorted_per_service() {
        let catalog = catalog();
        assert_eq!(catalog.configured_regions(ServiceType::Network), ["DFW", "ORD"]);
        assert_eq!(catalog.configured_regions(ServiceType::ObjectStore), ["DFW"]);
        assert!(catalog.configured_regions(ServiceType::Messaging).is_empty());
    }

    #[test]
    fn url_for_keeps_endpoint_path() {
        let endpoint = Url::parse("https://storage.host/v1/AUTH_acct").unwrap();
        let url = OpenStackClient::url_for(&endpoint, "my-container").unwrap();
        assert_eq!(url.as_str(), "https://storage.host/v1/AUTH_acct/my-container");
    }

    #[test]
    fn extracts_flat_and_nested_error_messages() {
        let flat = serde_json::json!({"message": "boom"});
        let nested = serde_json::json!({"itemNotFound": {"message": "no such port"}});
        let unknown = serde_json::json!(["not", "an", "object"]);

        assert_eq!(extract_error_message(&flat).as_deref(), Some("boom"));
        assert_eq!(extract_error_message(&nested).as_deref(), Some("no such port"));
        assert_eq!(extract_error_message(&unknown), None);
    }
}
