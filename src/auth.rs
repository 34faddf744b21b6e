//! Credential shapes accepted by the store connectors
//!
//! Token acquisition itself belongs to the connector. This module only
//! decides, before any network call, which flow is used.

use crate::error::{FsError, Result};
use std::fmt;
use std::str::FromStr;

/// OAuth resource requested for Generation-1 service tokens
pub const DATALAKE_RESOURCE: &str = "https://datalake.azure.net/";

/// Service principal secret
#[derive(Clone, PartialEq, Eq)]
pub struct AdlSecret {
    pub tenant_id: String,
    pub client_id: String,
    client_secret: String,
}

impl AdlSecret {
    #[must_use]
    pub fn new(
        tenant_id: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    #[must_use]
    pub fn client_secret(&self) -> &str {
        &self.client_secret
    }
}

impl fmt::Debug for AdlSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdlSecret")
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// Parses `tenant_id:client_id:client_secret`
///
/// The secret is the remainder after the second colon and may itself
/// contain colons.
impl FromStr for AdlSecret {
    type Err = FsError;

    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.splitn(3, ':');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(tenant), Some(client), Some(secret))
                if !tenant.is_empty() && !client.is_empty() && !secret.is_empty() =>
            {
                Ok(Self::new(tenant, client, secret))
            }
            _ => Err(FsError::Config(
                "ADL secret must have the form tenant_id:client_id:client_secret".to_string(),
            )),
        }
    }
}

/// Supported authentication flows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    /// Interactive browser login
    InteractiveBrowser,
    /// Tenant / client id / client secret
    ClientSecret(AdlSecret),
}

impl Credentials {
    /// Resolve the flow from configuration
    ///
    /// Interactive login takes precedence; otherwise a service principal
    /// secret is required.
    ///
    /// # Errors
    ///
    /// Returns [`FsError::Config`] when neither interactive login nor a secret
    /// is configured.
    pub fn from_config(interactive: bool, secret: Option<AdlSecret>) -> Result<Self> {
        if interactive {
            return Ok(Self::InteractiveBrowser);
        }
        secret.map(Self::ClientSecret).ok_or_else(|| {
            FsError::Config(
                "A service principal secret is required unless interactive authentication is used"
                    .to_string(),
            )
        })
    }

    /// Short name of the flow for log messages
    #[must_use]
    pub const fn flow(&self) -> &'static str {
        match self {
            Self::InteractiveBrowser => "interactive",
            Self::ClientSecret(_) => "service principal",
        }
    }
}
