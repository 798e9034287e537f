//! Reconstruction of object listings from a response body plus request
//! context.
//!
//! A container listing body is a JSON array of partial records; the
//! identity of each object (its URI) and of the container itself are not
//! in the body. They come from the original call: the container name the
//! caller passed, and the request endpoint with its query string removed.
//! [`parse_object_list`] fuses the three inputs into complete domain
//! objects and is a pure function of them.

use reqwest::header::HeaderMap;
use serde::Deserialize;
use url::Url;

use crate::error::{OpenStackError, OpenStackResult};
use crate::models::{Container, ObjectList, Payload, SwiftObject};

/// Row shape of a `format=json` container listing
#[derive(Debug, Deserialize)]
struct RawObjectRecord {
    name: String,
    hash: String,
    bytes: u64,
    content_type: String,
    last_modified: chrono::NaiveDateTime,
}

/// Per-response context the listing body does not carry.
///
/// Built once, immutable; every object of the response is derived against
/// the same container name and base URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListContext {
    container: String,
    base_uri: String,
}

/// Positional index of the container name in an object-listing call
const CONTAINER_ARG_INDEX: usize = 1;

impl ListContext {
    /// Bind a response to the container the caller named and the endpoint
    /// the request was issued against. Any query component of the endpoint
    /// is stripped to form the base URI.
    pub fn new(container: impl Into<String>, endpoint: &Url) -> Self {
        let uri = endpoint.as_str();
        let base_uri = match uri.split_once('?') {
            Some((base, _)) => base.to_string(),
            None => uri.to_string(),
        };

        Self {
            container: container.into(),
            base_uri,
        }
    }

    /// Recover the context from a call's positional arguments.
    ///
    /// The container name is argument 1 of the listing call; its absence is
    /// a binding defect between caller and parser, not a runtime condition.
    pub fn from_call_args(args: &[String], endpoint: &Url) -> OpenStackResult<Self> {
        let container = args.get(CONTAINER_ARG_INDEX).ok_or(
            OpenStackError::MissingContext("container name at call argument index 1"),
        )?;

        Ok(Self::new(container.clone(), endpoint))
    }

    pub fn container(&self) -> &str {
        &self.container
    }

    /// Canonical URI of an object: base URI with the name appended
    /// verbatim, no escaping and no separator inserted.
    fn object_uri(&self, name: &str) -> String {
        format!("{}{}", self.base_uri, name)
    }
}

/// Parse a container listing response into complete objects.
///
/// Fails with `MalformedResponse` when the body is not a JSON array of
/// listing records; a wrong-shaped body is never coerced into an empty
/// listing.
pub fn parse_object_list(
    body: &[u8],
    context: &ListContext,
    headers: &HeaderMap,
) -> OpenStackResult<ObjectList> {
    let records: Vec<RawObjectRecord> = serde_json::from_slice(body)
        .map_err(|e| OpenStackError::malformed(format!("object listing body: {}", e)))?;

    let objects = records
        .into_iter()
        .map(|record| SwiftObject {
            uri: context.object_uri(&record.name),
            etag: record.hash,
            last_modified: record.last_modified,
            payload: Payload::placeholder(record.bytes, record.content_type),
            name: record.name,
        })
        .collect();

    let container = Container {
        name: context.container.clone(),
        object_count: header_u64(headers, "X-Container-Object-Count"),
        bytes_used: header_u64(headers, "X-Container-Bytes-Used"),
    };

    Ok(ObjectList { container, objects })
}

fn header_u64(headers: &HeaderMap, name: &str) -> Option<u64> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse().ok())
}
