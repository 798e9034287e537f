use bytes::Bytes;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Relational link as returned by OpenStack collection responses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub href: String,
    pub rel: String,
}

/// Summary row shared by Neutron listings: identity plus display name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceWithName {
    pub id: String,
    pub tenant_id: Option<String>,
    pub name: Option<String>,
}

/// Fixed IP assignment on a port
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedIp {
    pub ip_address: Option<String>,
    pub subnet_id: Option<String>,
}

/// Neutron port in detail form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Port {
    pub id: String,
    pub tenant_id: Option<String>,
    pub name: Option<String>,
    pub network_id: Option<String>,
    pub admin_state_up: Option<bool>,
    pub mac_address: Option<String>,
    pub fixed_ips: Option<Vec<FixedIp>>,
    pub device_id: Option<String>,
    pub device_owner: Option<String>,
    pub status: Option<String>,
}

/// Container metadata recovered from listing response headers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    pub name: String,
    pub object_count: Option<u64>,
    pub bytes_used: Option<u64>,
}

/// Object content stand-in attached to listed objects.
///
/// Listing calls never fetch object bytes; the payload carries only the
/// length and content type the server reported, over an empty body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload {
    pub content: Bytes,
    pub content_length: u64,
    pub content_type: String,
}

impl Payload {
    /// Zero-content placeholder carrying the reported metadata
    pub fn placeholder(content_length: u64, content_type: impl Into<String>) -> Self {
        Self {
            content: Bytes::new(),
            content_length,
            content_type: content_type.into(),
        }
    }
}

/// Fully-assembled object-storage entry.
///
/// `uri` is derived from the request endpoint and the object name; it is
/// never present in the listing body itself.
#[derive(Debug, Clone, PartialEq)]
pub struct SwiftObject {
    pub uri: String,
    pub name: String,
    pub etag: String,
    pub last_modified: NaiveDateTime,
    pub payload: Payload,
}

/// Object listing: container metadata plus its objects in server order
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectList {
    pub container: Container,
    pub objects: Vec<SwiftObject>,
}

/// One ordered part of a static large object manifest.
///
/// Field names match the Swift manifest wire format verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub path: String,
    pub etag: String,
    pub size_bytes: u64,
}

impl Segment {
    pub fn new(path: impl Into<String>, etag: impl Into<String>, size_bytes: u64) -> Self {
        Self {
            path: path.into(),
            etag: etag.into(),
            size_bytes,
        }
    }
}

/// Queue statistics, including how many messages are in the queue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueStats {
    pub messages: MessagesStats,
}

/// Message counters for a queue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessagesStats {
    pub claimed: u64,
    pub free: u64,
    pub total: u64,
    pub oldest: Option<AgedMessage>,
    pub newest: Option<AgedMessage>,
}

/// Age marker for the oldest/newest message in a queue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgedMessage {
    pub age: u64,
    pub created: DateTime<Utc>,
    pub href: String,
}
