use crate::error::{OpenStackError, OpenStackResult};

/// Authentication trait for OpenStack services
///
/// Token acquisition (Keystone, Rackspace identity) is a separate concern;
/// implementations only stamp already-obtained credentials onto requests.
#[async_trait::async_trait]
pub trait Authentication: Send + Sync {
    /// Apply authentication to the request headers
    async fn apply_auth(&self, headers: &mut reqwest::header::HeaderMap) -> OpenStackResult<()>;
}

/// Pre-acquired token authentication via the `X-Auth-Token` header
#[derive(Debug, Clone)]
pub struct TokenAuth {
    token: String,
}

impl TokenAuth {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait::async_trait]
impl Authentication for TokenAuth {
    async fn apply_auth(&self, headers: &mut reqwest::header::HeaderMap) -> OpenStackResult<()> {
        headers.insert(
            "X-Auth-Token",
            self.token
                .parse()
                .map_err(|e| OpenStackError::auth_error(format!("Invalid auth header: {}", e)))?,
        );

        Ok(())
    }
}

/// No authentication
#[derive(Debug, Clone)]
pub struct NoAuth;

#[async_trait::async_trait]
impl Authentication for NoAuth {
    async fn apply_auth(&self, _headers: &mut reqwest::header::HeaderMap) -> OpenStackResult<()> {
        Ok(())
    }
}
