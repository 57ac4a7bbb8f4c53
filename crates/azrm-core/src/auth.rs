//! Azure AD client-credentials token acquisition.

use chrono::{Duration, Utc};
use log::debug;

use crate::client::AzureClient;
use crate::error::{AzureError, AzureErrorKind, AzureResult};
use crate::types::{AzureCredentials, AzureToken, TokenResponse};

/// Token endpoint URL for a given tenant.
fn token_url(login_endpoint: &str, tenant_id: &str) -> String {
    format!("{}/{}/oauth2/v2.0/token", login_endpoint, tenant_id)
}

/// `.default` scope for the configured resource manager endpoint.
fn scope(resource_manager_endpoint: &str) -> String {
    format!("{}/.default", resource_manager_endpoint.trim_end_matches('/'))
}

/// Acquire a token using the client-credentials grant.
pub async fn acquire_token(
    client: &AzureClient,
    creds: &AzureCredentials,
) -> AzureResult<AzureToken> {
    if !creds.can_authenticate() {
        return Err(AzureError::new(
            AzureErrorKind::Validation,
            "client_id, client_secret, and tenant_id are all required",
        ));
    }

    let config = client.config();
    let url = token_url(&config.login_endpoint, &creds.tenant_id);
    debug!("Azure token request → {}", url);

    let scope = scope(&config.resource_manager_endpoint);
    let form = [
        ("grant_type", "client_credentials"),
        ("client_id", creds.client_id.as_str()),
        ("client_secret", creds.client_secret.as_str()),
        ("scope", scope.as_str()),
    ];

    let resp: TokenResponse = client.post_form_unauthenticated(&url, &form).await?;
    Ok(token_from_response(resp))
}

fn token_from_response(resp: TokenResponse) -> AzureToken {
    let expires_at = resp
        .expires_in
        .map(|secs| Utc::now() + Duration::seconds(secs as i64));

    AzureToken {
        access_token: resp.access_token,
        token_type: resp.token_type,
        expires_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AzureConfig, LOGIN_BASE};

    #[test]
    fn token_url_format() {
        assert_eq!(
            token_url(LOGIN_BASE, "tenant-1"),
            "https://login.microsoftonline.com/tenant-1/oauth2/v2.0/token"
        );
    }

    #[test]
    fn scope_from_endpoint() {
        assert_eq!(
            scope("https://management.azure.com/"),
            "https://management.azure.com/.default"
        );
    }

    #[test]
    fn token_from_response_sets_expiry() {
        let t = token_from_response(TokenResponse {
            access_token: "tok".into(),
            token_type: "Bearer".into(),
            expires_in: Some(3600),
        });
        assert_eq!(t.access_token, "tok");
        assert!(!t.is_expired());
        assert!(t.expires_at.is_some());
    }

    #[tokio::test]
    async fn acquire_rejects_empty_credentials() {
        let client = AzureClient::new(AzureCredentials::default(), AzureConfig::new());
        let err = acquire_token(&client, &AzureCredentials::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind, AzureErrorKind::Validation);
    }
}
