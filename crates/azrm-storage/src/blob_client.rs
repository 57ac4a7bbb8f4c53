//! Blob service data plane: Shared Key signed REST calls against
//! `https://{account}.blob.core.windows.net`.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use bytes::Bytes;
use chrono::Utc;
use log::debug;
use reqwest::header::HeaderMap;
use reqwest::{Client, Method, Response};
use url::Url;

use azrm_core::{AzureError, AzureErrorKind, AzureResult};

use crate::signing::{SharedKeySigner, STORAGE_SERVICE_VERSION};
use crate::types::{
    Blob, BlobContainer, BlobEnumeration, BlobProperties, ContainerEnumeration, ContainerParams,
    ContainerProperties, StorageCredentials,
};

const META_PREFIX: &str = "x-ms-meta-";
const BLOCK_BLOB: &str = "BlockBlob";

pub struct BlobClient {
    http: Client,
    signer: SharedKeySigner,
    endpoint: String,
}

impl std::fmt::Debug for BlobClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlobClient")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl BlobClient {
    pub fn new(credentials: &StorageCredentials) -> AzureResult<Self> {
        if !credentials.is_configured() {
            return Err(AzureError::new(
                AzureErrorKind::Auth,
                "storage account name and access key are required",
            ));
        }
        Ok(Self {
            http: Client::builder()
                .timeout(Duration::from_secs(300))
                .build()
                .unwrap_or_default(),
            signer: SharedKeySigner::new(&credentials.account_name, &credentials.access_key)?,
            endpoint: credentials.blob_endpoint(),
        })
    }

    pub fn account_name(&self) -> &str {
        self.signer.account_name()
    }

    // ── URLs ─────────────────────────────────────────────────────────

    fn resource_url(&self, container: Option<&str>, blob: Option<&str>, query: &[(&str, &str)]) -> AzureResult<Url> {
        let mut url = Url::parse(&self.endpoint).map_err(|e| AzureError::parse("blob endpoint", e))?;
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| AzureError::parse("blob endpoint", "cannot be a base"))?;
            segments.pop_if_empty();
            if let Some(container) = container {
                segments.push(container);
            }
            if let Some(blob) = blob {
                segments.extend(blob.split('/'));
            }
        }
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in query {
                pairs.append_pair(k, v);
            }
        }
        Ok(url)
    }

    /// Unsigned URL of a container.
    pub fn container_url(&self, container: &str) -> AzureResult<String> {
        Ok(self.resource_url(Some(container), None, &[])?.to_string())
    }

    /// Unsigned URL of a blob.
    pub fn blob_url(&self, container: &str, blob: &str) -> AzureResult<String> {
        Ok(self.resource_url(Some(container), Some(blob), &[])?.to_string())
    }

    // ── Transport ────────────────────────────────────────────────────

    async fn send(
        &self,
        method: Method,
        url: Url,
        extra_headers: BTreeMap<String, String>,
        body: Option<Bytes>,
    ) -> AzureResult<Response> {
        let mut headers = extra_headers;
        headers.insert("x-ms-date".into(), SharedKeySigner::http_date(Utc::now()));
        headers.insert("x-ms-version".into(), STORAGE_SERVICE_VERSION.into());
        if let Some(body) = &body {
            headers.insert("content-length".into(), body.len().to_string());
        }
        let authorization = self.signer.authorization(method.as_str(), url.as_str(), &headers)?;

        debug!("Blob {} {}", method, url);
        let mut request = self
            .http
            .request(method.clone(), url.clone())
            .header("authorization", authorization);
        for (k, v) in headers.iter().filter(|(k, _)| k.as_str() != "content-length") {
            request = request.header(k.as_str(), v.as_str());
        }
        if let Some(body) = body {
            request = request.body(body);
        }
        let resp = request
            .send()
            .await
            .map_err(|e| AzureError::new(AzureErrorKind::Network, format!("{e}")))?;

        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let text = resp.text().await.unwrap_or_default();
        debug!("Blob {} {} → {}", method, url, status);
        Err(AzureError::from_status(status.as_u16(), &text))
    }

    async fn send_text(&self, url: Url) -> AzureResult<String> {
        let resp = self.send(Method::GET, url, BTreeMap::new(), None).await?;
        resp.text()
            .await
            .map_err(|e| AzureError::new(AzureErrorKind::Network, format!("{e}")))
    }

    // ── Containers ───────────────────────────────────────────────────

    pub async fn list_containers(&self) -> AzureResult<Vec<BlobContainer>> {
        let mut all = Vec::new();
        let mut marker: Option<String> = None;
        loop {
            let mut query = vec![("comp", "list"), ("include", "metadata")];
            if let Some(m) = marker.as_deref() {
                query.push(("marker", m));
            }
            let url = self.resource_url(None, None, &query)?;
            let (page, next) = parse_container_list(&self.send_text(url).await?)?;
            all.extend(page);
            match next {
                Some(n) => marker = Some(n),
                None => break,
            }
        }
        Ok(all)
    }

    pub async fn create_container(&self, params: &ContainerParams) -> AzureResult<BlobContainer> {
        let url = self.resource_url(Some(&params.name), None, &[("restype", "container")])?;
        let mut headers = metadata_headers(&params.metadata);
        if let Some(access) = &params.public_access {
            headers.insert("x-ms-blob-public-access".into(), access.clone());
        }
        let resp = self.send(Method::PUT, url, headers, Some(Bytes::new())).await?;
        let mut container = container_from_headers(&params.name, resp.headers());
        container.properties.public_access = params.public_access.clone();
        container.metadata = params.metadata.clone();
        Ok(container)
    }

    pub async fn get_container_properties(&self, name: &str) -> AzureResult<BlobContainer> {
        let url = self.resource_url(Some(name), None, &[("restype", "container")])?;
        let resp = self.send(Method::HEAD, url, BTreeMap::new(), None).await?;
        Ok(container_from_headers(name, resp.headers()))
    }

    pub async fn delete_container(&self, name: &str) -> AzureResult<()> {
        let url = self.resource_url(Some(name), None, &[("restype", "container")])?;
        self.send(Method::DELETE, url, BTreeMap::new(), None).await?;
        Ok(())
    }

    // ── Blobs ────────────────────────────────────────────────────────

    pub async fn list_blobs(&self, container: &str) -> AzureResult<Vec<Blob>> {
        let mut all = Vec::new();
        let mut marker: Option<String> = None;
        loop {
            let mut query = vec![("restype", "container"), ("comp", "list"), ("include", "metadata")];
            if let Some(m) = marker.as_deref() {
                query.push(("marker", m));
            }
            let url = self.resource_url(Some(container), None, &query)?;
            let (page, next) = parse_blob_list(&self.send_text(url).await?)?;
            all.extend(page);
            match next {
                Some(n) => marker = Some(n),
                None => break,
            }
        }
        Ok(all)
    }

    pub async fn get_blob_properties(&self, container: &str, blob: &str) -> AzureResult<Blob> {
        let url = self.resource_url(Some(container), Some(blob), &[])?;
        let resp = self.send(Method::HEAD, url, BTreeMap::new(), None).await?;
        Ok(blob_from_headers(blob, resp.headers()))
    }

    pub async fn get_blob(&self, container: &str, blob: &str) -> AzureResult<Bytes> {
        let url = self.resource_url(Some(container), Some(blob), &[])?;
        let resp = self.send(Method::GET, url, BTreeMap::new(), None).await?;
        resp.bytes()
            .await
            .map_err(|e| AzureError::new(AzureErrorKind::Network, format!("{e}")))
    }

    /// Single-request block blob upload.
    pub async fn create_block_blob(&self, container: &str, blob: &str, body: Bytes) -> AzureResult<Blob> {
        let url = self.resource_url(Some(container), Some(blob), &[])?;
        let mut headers = BTreeMap::new();
        headers.insert("x-ms-blob-type".to_string(), BLOCK_BLOB.to_string());
        let length = body.len() as u64;
        let resp = self.send(Method::PUT, url, headers, Some(body)).await?;
        let mut created = blob_from_headers(blob, resp.headers());
        created.properties.content_length = Some(length);
        created.properties.blob_type = Some(BLOCK_BLOB.to_string());
        Ok(created)
    }

    pub async fn put_blob_block(&self, container: &str, blob: &str, block_id: &str, data: Bytes) -> AzureResult<()> {
        let url = self.resource_url(Some(container), Some(blob), &[("comp", "block"), ("blockid", block_id)])?;
        self.send(Method::PUT, url, BTreeMap::new(), Some(data)).await?;
        Ok(())
    }

    /// Commit uncommitted blocks; the blob's content is the blocks in `block_ids` order.
    pub async fn commit_blob_blocks(&self, container: &str, blob: &str, block_ids: &[String]) -> AzureResult<()> {
        let url = self.resource_url(Some(container), Some(blob), &[("comp", "blocklist")])?;
        let mut headers = BTreeMap::new();
        headers.insert("content-type".to_string(), "application/xml".to_string());
        let body = block_list_xml(block_ids);
        self.send(Method::PUT, url, headers, Some(Bytes::from(body))).await?;
        Ok(())
    }

    pub async fn set_blob_metadata(
        &self,
        container: &str,
        blob: &str,
        metadata: &HashMap<String, String>,
    ) -> AzureResult<()> {
        let url = self.resource_url(Some(container), Some(blob), &[("comp", "metadata")])?;
        self.send(Method::PUT, url, metadata_headers(metadata), Some(Bytes::new()))
            .await?;
        Ok(())
    }

    pub async fn delete_blob(&self, container: &str, blob: &str) -> AzureResult<()> {
        let url = self.resource_url(Some(container), Some(blob), &[])?;
        self.send(Method::DELETE, url, BTreeMap::new(), None).await?;
        Ok(())
    }
}

// ── Headers ─────────────────────────────────────────────────────────

fn metadata_headers(metadata: &HashMap<String, String>) -> BTreeMap<String, String> {
    metadata
        .iter()
        .map(|(k, v)| (format!("{}{}", META_PREFIX, k.to_lowercase()), v.clone()))
        .collect()
}

fn header(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .and_then(non_empty)
}

fn metadata_from_headers(headers: &HeaderMap) -> HashMap<String, String> {
    headers
        .iter()
        .filter_map(|(k, v)| {
            let key = k.as_str().strip_prefix(META_PREFIX)?;
            Some((key.to_string(), v.to_str().ok()?.to_string()))
        })
        .collect()
}

pub(crate) fn container_from_headers(name: &str, headers: &HeaderMap) -> BlobContainer {
    BlobContainer {
        name: name.to_string(),
        properties: ContainerProperties {
            last_modified: header(headers, "last-modified"),
            etag: header(headers, "etag"),
            lease_status: header(headers, "x-ms-lease-status"),
            lease_state: header(headers, "x-ms-lease-state"),
            public_access: header(headers, "x-ms-blob-public-access"),
        },
        metadata: metadata_from_headers(headers),
    }
}

pub(crate) fn blob_from_headers(name: &str, headers: &HeaderMap) -> Blob {
    Blob {
        name: name.to_string(),
        properties: BlobProperties {
            last_modified: header(headers, "last-modified"),
            etag: header(headers, "etag"),
            content_length: header(headers, "content-length").and_then(|v| v.parse().ok()),
            content_type: header(headers, "content-type"),
            content_encoding: header(headers, "content-encoding"),
            content_md5: header(headers, "content-md5"),
            blob_type: header(headers, "x-ms-blob-type"),
            lease_status: header(headers, "x-ms-lease-status"),
        },
        metadata: metadata_from_headers(headers),
    }
}

// ── XML ─────────────────────────────────────────────────────────────

fn non_empty(s: String) -> Option<String> {
    Some(s).filter(|s| !s.trim().is_empty())
}

fn strip_bom(xml: &str) -> &str {
    xml.trim_start_matches('\u{feff}')
}

/// Containers plus the continuation marker, if any.
pub(crate) fn parse_container_list(xml: &str) -> AzureResult<(Vec<BlobContainer>, Option<String>)> {
    let list: ContainerEnumeration =
        quick_xml::de::from_str(strip_bom(xml)).map_err(|e| AzureError::parse("container list XML", e))?;
    let containers = list
        .containers
        .items
        .into_iter()
        .map(|mut c| {
            let p = &mut c.properties;
            p.public_access = p.public_access.take().and_then(non_empty);
            p.lease_status = p.lease_status.take().and_then(non_empty);
            p.lease_state = p.lease_state.take().and_then(non_empty);
            c
        })
        .collect();
    Ok((containers, list.next_marker.and_then(non_empty)))
}

/// Blobs plus the continuation marker, if any.
pub(crate) fn parse_blob_list(xml: &str) -> AzureResult<(Vec<Blob>, Option<String>)> {
    let list: BlobEnumeration =
        quick_xml::de::from_str(strip_bom(xml)).map_err(|e| AzureError::parse("blob list XML", e))?;
    let blobs = list
        .blobs
        .items
        .into_iter()
        .map(|mut b| {
            let p = &mut b.properties;
            p.content_type = p.content_type.take().and_then(non_empty);
            p.content_encoding = p.content_encoding.take().and_then(non_empty);
            p.content_md5 = p.content_md5.take().and_then(non_empty);
            p.lease_status = p.lease_status.take().and_then(non_empty);
            b
        })
        .collect();
    Ok((blobs, list.next_marker.and_then(non_empty)))
}

pub(crate) fn block_list_xml(block_ids: &[String]) -> String {
    let mut xml = String::from(r#"<?xml version="1.0" encoding="utf-8"?><BlockList>"#);
    for id in block_ids {
        xml.push_str(&format!("<Latest>{}</Latest>", id));
    }
    xml.push_str("</BlockList>");
    xml
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    fn client() -> BlobClient {
        BlobClient::new(&StorageCredentials::new("acct", "c2VjcmV0")).unwrap()
    }

    #[test]
    fn requires_credentials() {
        let err = BlobClient::new(&StorageCredentials::default()).unwrap_err();
        assert_eq!(err.kind, AzureErrorKind::Auth);
    }

    #[test]
    fn urls_encode_segments() {
        let c = client();
        assert_eq!(c.container_url("photos").unwrap(), "https://acct.blob.core.windows.net/photos");
        assert_eq!(
            c.blob_url("photos", "2024/summer trip.jpg").unwrap(),
            "https://acct.blob.core.windows.net/photos/2024/summer%20trip.jpg"
        );
        let url = c
            .resource_url(Some("c"), Some("b"), &[("comp", "block"), ("blockid", "YQ==")])
            .unwrap();
        assert_eq!(url.query(), Some("comp=block&blockid=YQ%3D%3D"));
    }

    #[test]
    fn parses_blob_list() {
        let xml = "\u{feff}<?xml version=\"1.0\" encoding=\"utf-8\"?>\
            <EnumerationResults ServiceEndpoint=\"https://acct.blob.core.windows.net/\" ContainerName=\"photos\">\
              <Blobs>\
                <Blob>\
                  <Name>a.txt</Name>\
                  <Properties>\
                    <Creation-Time>Mon, 01 Jan 2024 00:00:00 GMT</Creation-Time>\
                    <Last-Modified>Mon, 01 Jan 2024 00:00:00 GMT</Last-Modified>\
                    <Etag>0x8D3B6B3D353FFCA</Etag>\
                    <Content-Length>1024</Content-Length>\
                    <Content-Type>text/plain</Content-Type>\
                    <Content-Encoding />\
                    <Content-MD5>tXAohIyxuu/t94Lp/ujeRw==</Content-MD5>\
                    <BlobType>BlockBlob</BlobType>\
                    <LeaseStatus>unlocked</LeaseStatus>\
                  </Properties>\
                  <Metadata><owner>fog</owner></Metadata>\
                </Blob>\
                <Blob><Name>b.bin</Name><Properties><Content-Length>7</Content-Length><BlobType>BlockBlob</BlobType></Properties></Blob>\
              </Blobs>\
              <NextMarker>page2</NextMarker>\
            </EnumerationResults>";
        let (blobs, next) = parse_blob_list(xml).unwrap();
        assert_eq!(blobs.len(), 2);
        assert_eq!(blobs[0].name, "a.txt");
        assert_eq!(blobs[0].properties.content_length, Some(1024));
        assert_eq!(blobs[0].properties.content_encoding, None);
        assert_eq!(blobs[0].metadata.get("owner").map(String::as_str), Some("fog"));
        assert_eq!(blobs[1].properties.content_length, Some(7));
        assert_eq!(next.as_deref(), Some("page2"));
    }

    #[test]
    fn parses_container_list_without_marker() {
        let xml = "<EnumerationResults ServiceEndpoint=\"https://acct.blob.core.windows.net/\">\
              <Containers>\
                <Container>\
                  <Name>photos</Name>\
                  <Properties>\
                    <Last-Modified>Mon, 01 Jan 2024 00:00:00 GMT</Last-Modified>\
                    <Etag>\"0x8D3\"</Etag>\
                    <LeaseStatus>unlocked</LeaseStatus>\
                    <LeaseState>available</LeaseState>\
                    <PublicAccess>blob</PublicAccess>\
                  </Properties>\
                </Container>\
              </Containers>\
            </EnumerationResults>";
        let (containers, next) = parse_container_list(xml).unwrap();
        assert_eq!(containers.len(), 1);
        assert_eq!(containers[0].properties.public_access.as_deref(), Some("blob"));
        assert_eq!(containers[0].properties.lease_state.as_deref(), Some("available"));
        assert!(next.is_none());
    }

    #[test]
    fn malformed_list_is_parse_error() {
        let err = parse_blob_list("<EnumerationResults><Blobs>").unwrap_err();
        assert_eq!(err.kind, AzureErrorKind::Parse);
    }

    #[test]
    fn block_list_keeps_order() {
        let xml = block_list_xml(&["Yg==".to_string(), "YQ==".to_string()]);
        assert!(xml.ends_with("<BlockList><Latest>Yg==</Latest><Latest>YQ==</Latest></BlockList>"));
    }

    #[test]
    fn blob_properties_from_headers() {
        let mut h = HeaderMap::new();
        h.insert("etag", HeaderValue::from_static("\"0x1\""));
        h.insert("content-length", HeaderValue::from_static("42"));
        h.insert("x-ms-blob-type", HeaderValue::from_static("BlockBlob"));
        h.insert("x-ms-meta-owner", HeaderValue::from_static("fog"));
        let blob = blob_from_headers("b", &h);
        assert_eq!(blob.properties.content_length, Some(42));
        assert_eq!(blob.properties.etag.as_deref(), Some("\"0x1\""));
        assert_eq!(blob.metadata.get("owner").map(String::as_str), Some("fog"));
        assert!(blob.properties.content_type.is_none());
    }
}
