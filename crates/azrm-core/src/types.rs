//! Credentials, configuration and the ARM envelope types shared across domains.

use std::env;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ─── Credentials ─────────────────────────────────────────────────────

/// Service-principal credentials used for the client-credentials grant.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AzureCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub tenant_id: String,
    pub subscription_id: String,
}

impl AzureCredentials {
    pub fn new(
        tenant_id: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        subscription_id: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            tenant_id: tenant_id.into(),
            subscription_id: subscription_id.into(),
        }
    }

    /// Read `AZURE_TENANT_ID`, `AZURE_CLIENT_ID`, `AZURE_CLIENT_SECRET` and
    /// `AZURE_SUBSCRIPTION_ID`. Unset variables become empty strings.
    pub fn from_environment() -> Self {
        Self {
            client_id: env::var("AZURE_CLIENT_ID").unwrap_or_default(),
            client_secret: env::var("AZURE_CLIENT_SECRET").unwrap_or_default(),
            tenant_id: env::var("AZURE_TENANT_ID").unwrap_or_default(),
            subscription_id: env::var("AZURE_SUBSCRIPTION_ID").unwrap_or_default(),
        }
    }

    pub fn can_authenticate(&self) -> bool {
        !self.client_id.is_empty() && !self.client_secret.is_empty() && !self.tenant_id.is_empty()
    }
}

/// Cached bearer token.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AzureToken {
    pub access_token: String,
    pub token_type: String,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

impl AzureToken {
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(exp) => Utc::now() >= exp,
            None => false,
        }
    }
}

/// Raw token endpoint response.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

// ─── Configuration ───────────────────────────────────────────────────

/// Endpoints and per-provider API versions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AzureConfig {
    pub resource_manager_endpoint: String,
    pub login_endpoint: String,
    pub timeout_secs: u64,
    pub api_version_compute: String,
    pub api_version_network: String,
    pub api_version_storage: String,
    pub api_version_sql: String,
    pub api_version_dns: String,
    pub api_version_resources: String,
}

impl AzureConfig {
    pub fn new() -> Self {
        Self {
            resource_manager_endpoint: ARM_BASE.into(),
            login_endpoint: LOGIN_BASE.into(),
            timeout_secs: 30,
            api_version_compute: api_versions::COMPUTE.into(),
            api_version_network: api_versions::NETWORK.into(),
            api_version_storage: api_versions::STORAGE.into(),
            api_version_sql: api_versions::SQL.into(),
            api_version_dns: api_versions::DNS.into(),
            api_version_resources: api_versions::RESOURCES.into(),
        }
    }
}

impl Default for AzureConfig {
    fn default() -> Self {
        Self::new()
    }
}

// ─── ARM envelopes ───────────────────────────────────────────────────

/// Generic ARM list wrapper (`value` array with optional `nextLink`).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", bound(deserialize = "T: Deserialize<'de>"))]
pub struct ArmList<T> {
    #[serde(default)]
    pub value: Vec<T>,
    #[serde(default)]
    pub next_link: Option<String>,
}

/// `{ "id": ... }` reference to another resource.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct SubResource {
    #[serde(default)]
    pub id: String,
}

impl SubResource {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// Handle to a long-running ARM operation (`Azure-AsyncOperation` header).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AsyncOperation {
    pub status_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum OperationStatus {
    InProgress,
    Succeeded,
    Failed,
    Canceled,
}

impl OperationStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::InProgress)
    }
}

/// Body returned when polling an async operation URL.
#[derive(Debug, Clone, Deserialize)]
pub struct OperationStatusBody {
    pub status: OperationStatus,
    #[serde(default)]
    pub error: Option<ArmErrorDetail>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ArmErrorDetail {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
}

// ─── Constants ───────────────────────────────────────────────────────

pub const ARM_BASE: &str = "https://management.azure.com";
pub const LOGIN_BASE: &str = "https://login.microsoftonline.com";

pub mod api_versions {
    pub const COMPUTE: &str = "2024-03-01";
    pub const NETWORK: &str = "2024-01-01";
    pub const STORAGE: &str = "2023-05-01";
    pub const SQL: &str = "2023-05-01-preview";
    pub const DNS: &str = "2018-05-01";
    pub const RESOURCES: &str = "2024-03-01";
}

// ─── Tests ──────────────────────────────────────────────────────────
