//! HTTP client wrapper for Azure Resource Manager API.
//!
//! Handles bearer-token injection (acquiring a token lazily from the
//! configured service principal), pagination via `nextLink`, capture of the
//! `Azure-AsyncOperation` header and standard ARM error extraction. Every call
//! is a single attempt.

use std::time::Duration;

use log::debug;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::RwLock;

use crate::auth;
use crate::error::{AzureError, AzureErrorKind, AzureResult};
use crate::types::{
    ArmList, AsyncOperation, AzureConfig, AzureCredentials, AzureToken, OperationStatus,
    OperationStatusBody,
};

const ASYNC_OPERATION_HEADER: &str = "azure-asyncoperation";

/// HTTP client with Azure-specific auth.
pub struct AzureClient {
    http: Client,
    credentials: AzureCredentials,
    config: AzureConfig,
    token: RwLock<Option<AzureToken>>,
}

impl AzureClient {
    pub fn new(credentials: AzureCredentials, config: AzureConfig) -> Self {
        Self {
            http: Client::builder()
                .timeout(Duration::from_secs(config.timeout_secs))
                .build()
                .unwrap_or_default(),
            credentials,
            config,
            token: RwLock::new(None),
        }
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn config(&self) -> &AzureConfig {
        &self.config
    }

    pub fn credentials(&self) -> &AzureCredentials {
        &self.credentials
    }

    pub fn subscription_id(&self) -> AzureResult<&str> {
        Some(self.credentials.subscription_id.as_str())
            .filter(|s| !s.is_empty())
            .ok_or_else(AzureError::subscription_not_set)
    }

    /// Inner reqwest client (for auth module direct use).
    pub fn http(&self) -> &Client {
        &self.http
    }

    pub async fn set_token(&self, token: AzureToken) {
        *self.token.write().await = Some(token);
    }

    pub async fn clear_token(&self) {
        *self.token.write().await = None;
    }

    pub async fn is_authenticated(&self) -> bool {
        self.token
            .read()
            .await
            .as_ref()
            .map(|t| !t.access_token.is_empty() && !t.is_expired())
            .unwrap_or(false)
    }

    // ── URL builders ─────────────────────────────────────────────────

    pub fn arm_url(&self, path: &str) -> String {
        format!("{}{}", self.config.resource_manager_endpoint, path)
    }

    pub fn subscription_url(&self, suffix: &str) -> AzureResult<String> {
        let sub = self.subscription_id()?;
        Ok(self.arm_url(&format!("/subscriptions/{}{}", sub, suffix)))
    }

    pub fn resource_group_url(&self, rg: &str, suffix: &str) -> AzureResult<String> {
        let sub = self.subscription_id()?;
        Ok(self.arm_url(&format!(
            "/subscriptions/{}/resourceGroups/{}{}",
            sub, rg, suffix
        )))
    }

    // ── Auth ─────────────────────────────────────────────────────────

    /// Current bearer token, acquiring a new one when absent or expired.
    pub async fn access_token(&self) -> AzureResult<String> {
        if let Some(token) = self.token.read().await.as_ref() {
            if !token.access_token.is_empty() && !token.is_expired() {
                return Ok(token.access_token.clone());
            }
        }
        if !self.credentials.can_authenticate() {
            return Err(AzureError::not_authenticated());
        }
        let token = auth::acquire_token(self, &self.credentials).await?;
        let access = token.access_token.clone();
        *self.token.write().await = Some(token);
        Ok(access)
    }

    async fn auth_headers(&self) -> AzureResult<HeaderMap> {
        let access = self.access_token().await?;
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", access)).map_err(|e| {
                AzureError::new(AzureErrorKind::Auth, format!("Header value error: {e}"))
            })?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    async fn send(&self, request: RequestBuilder, method: &str, url: &str) -> AzureResult<Response> {
        let headers = self.auth_headers().await?;
        debug!("Azure {} {}", method, url);
        let resp = request
            .headers(headers)
            .send()
            .await
            .map_err(|e| AzureError::new(AzureErrorKind::Network, format!("{e}")))?;

        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        debug!("Azure {} {} → {}", method, url, status);
        Err(AzureError::from_status(status.as_u16(), &body))
    }

    // ── Core HTTP verbs ──────────────────────────────────────────────

    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> AzureResult<T> {
        let resp = self.send(self.http.get(url), "GET", url).await?;
        read_json(resp).await
    }

    /// `GET` that reports 404 as `false` instead of an error.
    pub async fn exists(&self, url: &str) -> AzureResult<bool> {
        match self.send(self.http.get(url), "GET", url).await {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }

    pub async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        url: &str,
        body: &B,
    ) -> AzureResult<T> {
        let resp = self.send(self.http.post(url).json(body), "POST", url).await?;
        read_json(resp).await
    }

    /// POST with an empty body, used for lifecycle actions (start, powerOff, ...).
    pub async fn post_action(&self, url: &str) -> AzureResult<()> {
        self.send(self.http.post(url).body("{}"), "POST", url).await?;
        Ok(())
    }

    pub async fn put_json<B: Serialize, T: DeserializeOwned>(
        &self,
        url: &str,
        body: &B,
    ) -> AzureResult<T> {
        let resp = self.send(self.http.put(url).json(body), "PUT", url).await?;
        read_json(resp).await
    }

    /// PUT that also returns the long-running operation handle, when ARM sends one.
    pub async fn put_json_async<B: Serialize, T: DeserializeOwned>(
        &self,
        url: &str,
        body: &B,
    ) -> AzureResult<(T, Option<AsyncOperation>)> {
        let resp = self.send(self.http.put(url).json(body), "PUT", url).await?;
        let operation = resp
            .headers()
            .get(ASYNC_OPERATION_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(|s| AsyncOperation {
                status_url: s.to_string(),
            });
        let value = read_json(resp).await?;
        Ok((value, operation))
    }

    pub async fn patch_json<B: Serialize, T: DeserializeOwned>(
        &self,
        url: &str,
        body: &B,
    ) -> AzureResult<T> {
        let resp = self.send(self.http.patch(url).json(body), "PATCH", url).await?;
        read_json(resp).await
    }

    /// 200, 202 and 204 all count as success.
    pub async fn delete(&self, url: &str) -> AzureResult<()> {
        self.send(self.http.delete(url), "DELETE", url).await?;
        Ok(())
    }

    // ── Pagination ───────────────────────────────────────────────────

    /// Follow `nextLink` to collect **all** items from a paginated ARM list endpoint.
    pub async fn get_all_pages<T: DeserializeOwned>(&self, initial_url: &str) -> AzureResult<Vec<T>> {
        let mut all: Vec<T> = Vec::new();
        let mut url = initial_url.to_string();

        loop {
            let page: ArmList<T> = self.get_json(&url).await?;
            all.extend(page.value);
            match page.next_link {
                Some(next) if !next.is_empty() => url = next,
                _ => break,
            }
        }

        Ok(all)
    }

    // ── Long-running operations ──────────────────────────────────────

    pub async fn operation_status(&self, operation: &AsyncOperation) -> AzureResult<OperationStatus> {
        let body: OperationStatusBody = self.get_json(&operation.status_url).await?;
        if body.status == OperationStatus::Failed {
            if let Some(err) = body.error {
                debug!("Azure operation failed: {} {}", err.code, err.message);
            }
        }
        Ok(body.status)
    }

    /// POST unauthenticated form data (token exchange).
    pub async fn post_form_unauthenticated<T: DeserializeOwned>(
        &self,
        url: &str,
        form: &[(&str, &str)],
    ) -> AzureResult<T> {
        let resp = self
            .http
            .post(url)
            .form(form)
            .send()
            .await
            .map_err(|e| AzureError::new(AzureErrorKind::Network, format!("{e}")))?;

        if resp.status().is_success() {
            read_json(resp).await
        } else {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            Err(AzureError::from_status(status, &body))
        }
    }
}

// ── Helpers ─────────────────────────────────────────────────────────

async fn read_json<T: DeserializeOwned>(resp: Response) -> AzureResult<T> {
    let text = resp
        .text()
        .await
        .map_err(|e| AzureError::new(AzureErrorKind::Network, format!("{e}")))?;
    serde_json::from_str(&text).map_err(|e| AzureError::parse("JSON parse", e))
}

// ─── Tests ──────────────────────────────────────────────────────────
