//! Shared Key authorization for the Blob service.
//!
//! StringToSign =
//!   VERB + '\n' + Content-Encoding + '\n' + Content-Language + '\n' +
//!   Content-Length + '\n' + Content-MD5 + '\n' + Content-Type + '\n' +
//!   Date + '\n' + If-Modified-Since + '\n' + If-Match + '\n' +
//!   If-None-Match + '\n' + If-Unmodified-Since + '\n' + Range + '\n' +
//!   CanonicalizedHeaders + CanonicalizedResource
//!
//! The signature is `Base64(HMAC-SHA256(Base64Decode(key), StringToSign))`.

use std::collections::BTreeMap;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use azrm_core::{AzureError, AzureErrorKind, AzureResult};

type HmacSha256 = Hmac<Sha256>;

/// Service version sent as `x-ms-version` on every data-plane request.
pub const STORAGE_SERVICE_VERSION: &str = "2021-08-06";

/// Standard headers covered by the signature, in signing order.
const SIGNED_STANDARD_HEADERS: [&str; 11] = [
    "content-encoding",
    "content-language",
    "content-length",
    "content-md5",
    "content-type",
    "date",
    "if-modified-since",
    "if-match",
    "if-none-match",
    "if-unmodified-since",
    "range",
];

#[derive(Clone)]
pub struct SharedKeySigner {
    account_name: String,
    key: Vec<u8>,
}

impl std::fmt::Debug for SharedKeySigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedKeySigner")
            .field("account_name", &self.account_name)
            .finish()
    }
}

impl SharedKeySigner {
    /// `access_key` is the base64 account key as shown by `listKeys`.
    pub fn new(account_name: &str, access_key: &str) -> AzureResult<Self> {
        let key = BASE64.decode(access_key.trim()).map_err(|e| {
            AzureError::new(
                AzureErrorKind::Auth,
                format!("storage access key is not valid base64: {e}"),
            )
        })?;
        Ok(Self {
            account_name: account_name.to_string(),
            key,
        })
    }

    pub fn account_name(&self) -> &str {
        &self.account_name
    }

    /// `Wed, 27 Mar 2024 10:00:00 GMT`.
    pub fn http_date(timestamp: DateTime<Utc>) -> String {
        timestamp.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
    }

    /// Value of the `Authorization` header for a request.
    ///
    /// `headers` uses lowercase names and must already hold `x-ms-date` and
    /// `x-ms-version`.
    pub fn authorization(&self, method: &str, url: &str, headers: &BTreeMap<String, String>) -> AzureResult<String> {
        let string_to_sign = self.string_to_sign(method, url, headers)?;
        let mut mac = HmacSha256::new_from_slice(&self.key)
            .map_err(|e| AzureError::new(AzureErrorKind::Auth, format!("HMAC key error: {e}")))?;
        mac.update(string_to_sign.as_bytes());
        let signature = BASE64.encode(mac.finalize().into_bytes());
        Ok(format!("SharedKey {}:{}", self.account_name, signature))
    }

    pub fn string_to_sign(&self, method: &str, url: &str, headers: &BTreeMap<String, String>) -> AzureResult<String> {
        let mut out = String::new();
        out.push_str(&method.to_uppercase());
        out.push('\n');
        for name in SIGNED_STANDARD_HEADERS {
            let value = headers.get(name).map(String::as_str).unwrap_or("");
            // A zero length is signed as empty.
            let value = if name == "content-length" && value == "0" { "" } else { value };
            out.push_str(value);
            out.push('\n');
        }
        out.push_str(&canonical_headers(headers));
        out.push_str(&self.canonical_resource(url)?);
        Ok(out)
    }

    fn canonical_resource(&self, url: &str) -> AzureResult<String> {
        let parsed = url::Url::parse(url).map_err(|e| AzureError::parse("blob URL", e))?;
        let mut out = format!("/{}{}", self.account_name, parsed.path());
        let mut params: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (k, v) in parsed.query_pairs() {
            params.entry(k.to_lowercase()).or_default().push(v.into_owned());
        }
        for (k, mut values) in params {
            values.sort();
            out.push_str(&format!("\n{}:{}", k, values.join(",")));
        }
        Ok(out)
    }
}

/// `x-ms-*` headers, lowercased, sorted, one `name:value\n` line each.
fn canonical_headers(headers: &BTreeMap<String, String>) -> String {
    let mut ms: Vec<(String, String)> = headers
        .iter()
        .map(|(k, v)| (k.to_lowercase(), v.trim().to_string()))
        .filter(|(k, _)| k.starts_with("x-ms-"))
        .collect();
    ms.sort_by(|a, b| a.0.cmp(&b.0));
    ms.iter().map(|(k, v)| format!("{}:{}\n", k, v)).collect()
}
