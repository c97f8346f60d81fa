//! HTTP client for the tabular API.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{RequestBuilder, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};
use url::Url;

use folio_core::RecordId;

use super::types::{DeletedRecord, ErrorEnvelope, Fields, FieldsBody, ListResponse, Record};
use super::{TableTransport, TransportError};
use crate::config::BackofficeConfig;
use crate::credentials::CredentialStore;

/// Tabular API client.
///
/// Reads the API key and base id from the [`CredentialStore`] on every call,
/// so settings changed in the BackOffice apply to the next request.
#[derive(Clone)]
pub struct AirtableClient {
    inner: Arc<AirtableClientInner>,
}

struct AirtableClientInner {
    client: reqwest::Client,
    api_base: Url,
    credentials: CredentialStore,
}

impl AirtableClient {
    /// Create a new client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(
        config: &BackofficeConfig,
        credentials: CredentialStore,
    ) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(AirtableClientInner {
                client,
                api_base: config.api_base_url.clone(),
                credentials,
            }),
        })
    }

    /// Resolve credentials, failing before any network access if either is missing.
    fn authorize(&self) -> Result<(SecretString, String), TransportError> {
        let api_key = self
            .inner
            .credentials
            .api_key()
            .ok_or(TransportError::Unauthenticated)?;
        let base_id = self
            .inner
            .credentials
            .base_id()
            .ok_or(TransportError::NotConfigured)?;
        Ok((api_key, base_id))
    }

    /// Send a request and decode a JSON success body.
    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        api_key: &SecretString,
    ) -> Result<T, TransportError> {
        let response = request.bearer_auth(api_key.expose_secret()).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let error = error_from_body(status, &body);
            warn!(status = %status, error = %error, "Tabular API returned non-success status");
            return Err(error);
        }

        serde_json::from_str(&body)
            .map_err(|e| TransportError::Parse(format!("Failed to parse response: {e}")))
    }
}

#[async_trait]
impl TableTransport for AirtableClient {
    #[instrument(skip(self))]
    async fn list(&self, table: &str) -> Result<Vec<Record>, TransportError> {
        let (api_key, base_id) = self.authorize()?;
        let url = table_url(&self.inner.api_base, &base_id, table, None)?;

        let response: ListResponse = self.send(self.inner.client.get(url), &api_key).await?;
        if response.offset.is_some() {
            debug!(
                records = response.records.len(),
                "More records available; only the first page is read"
            );
        }
        Ok(response.records)
    }

    #[instrument(skip(self, fields))]
    async fn create(&self, table: &str, fields: Fields) -> Result<Record, TransportError> {
        let (api_key, base_id) = self.authorize()?;
        let url = table_url(&self.inner.api_base, &base_id, table, None)?;

        let request = self.inner.client.post(url).json(&FieldsBody { fields: &fields });
        let record: Record = self.send(request, &api_key).await?;
        debug!(id = %record.id, "Record created");
        Ok(record)
    }

    #[instrument(skip(self, fields), fields(id = %id))]
    async fn update(
        &self,
        table: &str,
        id: &RecordId,
        fields: Fields,
    ) -> Result<Record, TransportError> {
        let (api_key, base_id) = self.authorize()?;
        let url = table_url(&self.inner.api_base, &base_id, table, Some(id))?;

        let request = self.inner.client.patch(url).json(&FieldsBody { fields: &fields });
        self.send(request, &api_key).await
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn delete(&self, table: &str, id: &RecordId) -> Result<DeletedRecord, TransportError> {
        let (api_key, base_id) = self.authorize()?;
        let url = table_url(&self.inner.api_base, &base_id, table, Some(id))?;

        self.send(self.inner.client.delete(url), &api_key).await
    }
}

impl std::fmt::Debug for AirtableClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AirtableClient")
            .field("api_base", &self.inner.api_base.as_str())
            .field("credentials", &self.inner.credentials)
            .finish_non_exhaustive()
    }
}

/// Build `{api_base}/{base_id}/{table}[/{id}]` with each segment percent-encoded.
fn table_url(
    api_base: &Url,
    base_id: &str,
    table: &str,
    id: Option<&RecordId>,
) -> Result<Url, TransportError> {
    let mut url = api_base.clone();
    {
        let mut segments = url.path_segments_mut().map_err(|()| {
            TransportError::Endpoint(format!("{api_base} cannot carry a path"))
        })?;
        segments.pop_if_empty().push(base_id).push(table);
        if let Some(id) = id {
            segments.push(id.as_str());
        }
    }
    Ok(url)
}

/// Convert a non-success response into an error carrying the provider's message.
///
/// Falls back to the status reason phrase when the body is not a recognised
/// error envelope.
fn error_from_body(status: StatusCode, body: &str) -> TransportError {
    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .and_then(|envelope| envelope.error.into_message())
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .map_or_else(|| status.as_str().to_string(), ToString::to_string)
        });

    TransportError::Api {
        status: status.as_u16(),
        message,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    use super::*;
    use crate::storage::LocalStore;

    /// What the stub server received.
    #[derive(Debug)]
    struct Received {
        method: String,
        path: String,
        authorization: Option<String>,
        body: String,
    }

    impl Received {
        fn json(&self) -> serde_json::Value {
            serde_json::from_str(&self.body).unwrap()
        }
    }

    /// Serve a single request with a canned response on a loopback port.
    async fn serve_once(status: u16, response: &'static str) -> (Url, JoinHandle<Received>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0_u8; 4096];

            let head_len = loop {
                let n = socket.read(&mut chunk).await.unwrap();
                assert!(n > 0, "connection closed before headers");
                buf.extend_from_slice(chunk.get(..n).unwrap());
                if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                    break pos + 4;
                }
            };

            let head = String::from_utf8_lossy(buf.get(..head_len).unwrap()).into_owned();
            let mut lines = head.lines();
            let mut request_line = lines.next().unwrap().split_whitespace();
            let method = request_line.next().unwrap().to_string();
            let path = request_line.next().unwrap().to_string();

            let mut authorization = None;
            let mut content_length = 0_usize;
            for line in lines {
                let Some((name, value)) = line.split_once(':') else {
                    continue;
                };
                if name.eq_ignore_ascii_case("authorization") {
                    authorization = Some(value.trim().to_string());
                } else if name.eq_ignore_ascii_case("content-length") {
                    content_length = value.trim().parse().unwrap();
                }
            }

            while buf.len() < head_len + content_length {
                let n = socket.read(&mut chunk).await.unwrap();
                assert!(n > 0, "connection closed before body");
                buf.extend_from_slice(chunk.get(..n).unwrap());
            }
            let body = String::from_utf8_lossy(buf.get(head_len..).unwrap()).into_owned();

            let reply = format!(
                "HTTP/1.1 {status} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{response}",
                response.len()
            );
            socket.write_all(reply.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();

            Received {
                method,
                path,
                authorization,
                body,
            }
        });

        (Url::parse(&format!("http://{addr}/v0")).unwrap(), handle)
    }

    fn configured_client(api_base_url: Url) -> AirtableClient {
        let credentials = CredentialStore::load(LocalStore::in_memory());
        credentials.set_api_key("pat-secret").unwrap();
        credentials.set_base_id("appXYZ").unwrap();
        let config = BackofficeConfig {
            api_base_url,
            ..BackofficeConfig::default()
        };
        AirtableClient::new(&config, credentials).unwrap()
    }

    fn unreachable_config() -> BackofficeConfig {
        // Port 9 (discard) on loopback: any request that slips through fails
        // with `TransportError::Http`, never with a configuration error.
        BackofficeConfig {
            api_base_url: Url::parse("http://127.0.0.1:9/v0").unwrap(),
            ..BackofficeConfig::default()
        }
    }

    #[test]
    fn test_table_url() {
        let base = Url::parse("https://api.airtable.com/v0").unwrap();
        let url = table_url(&base, "appXYZ", "Portfolio", None).unwrap();
        assert_eq!(url.as_str(), "https://api.airtable.com/v0/appXYZ/Portfolio");

        let id = RecordId::parse("rec123").unwrap();
        let url = table_url(&base, "appXYZ", "Skills", Some(&id)).unwrap();
        assert_eq!(url.as_str(), "https://api.airtable.com/v0/appXYZ/Skills/rec123");
    }

    #[test]
    fn test_table_url_trailing_slash_and_encoding() {
        let base = Url::parse("http://localhost:8080/v0/").unwrap();
        let url = table_url(&base, "app", "Site Content", None).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/v0/app/Site%20Content");
    }

    #[test]
    fn test_error_from_structured_body() {
        let err = error_from_body(
            StatusCode::UNPROCESSABLE_ENTITY,
            r#"{"error": {"type": "INVALID_VALUE_FOR_COLUMN", "message": "Field \"Tags\" cannot accept the provided value"}}"#,
        );
        match err {
            TransportError::Api { status, message } => {
                assert_eq!(status, 422);
                assert_eq!(message, "Field \"Tags\" cannot accept the provided value");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_error_from_string_body() {
        let err = error_from_body(StatusCode::NOT_FOUND, r#"{"error": "NOT_FOUND"}"#);
        assert!(matches!(err, TransportError::Api { status: 404, ref message } if message == "NOT_FOUND"));
    }

    #[test]
    fn test_error_falls_back_to_status_text() {
        let err = error_from_body(StatusCode::BAD_GATEWAY, "<html>upstream down</html>");
        assert!(
            matches!(err, TransportError::Api { status: 502, ref message } if message == "Bad Gateway")
        );
    }

    #[tokio::test]
    async fn test_missing_api_key_fails_before_request() {
        let credentials = CredentialStore::load(LocalStore::in_memory());
        credentials.set_base_id("appXYZ").unwrap();
        let client = AirtableClient::new(&unreachable_config(), credentials).unwrap();

        let err = client.list("Hero").await.unwrap_err();
        assert!(matches!(err, TransportError::Unauthenticated));

        let id = RecordId::parse("rec1").unwrap();
        let err = client.delete("Hero", &id).await.unwrap_err();
        assert!(matches!(err, TransportError::Unauthenticated));
    }

    #[tokio::test]
    async fn test_missing_base_id_fails_before_request() {
        let credentials = CredentialStore::load(LocalStore::in_memory());
        credentials.set_api_key("key").unwrap();
        let client = AirtableClient::new(&unreachable_config(), credentials).unwrap();

        let err = client.create("Skills", Fields::new()).await.unwrap_err();
        assert!(matches!(err, TransportError::NotConfigured));
        assert!(err.is_configuration());
    }

    #[test]
    fn test_debug_redacts_key() {
        let credentials = CredentialStore::load(LocalStore::in_memory());
        credentials.set_api_key("pat-very-secret").unwrap();
        let client = AirtableClient::new(&BackofficeConfig::default(), credentials).unwrap();
        assert!(!format!("{client:?}").contains("pat-very-secret"));
    }

    #[tokio::test]
    async fn test_list_sends_bearer_and_reads_first_page() {
        let (base, server) = serve_once(
            200,
            r#"{"records": [{"id": "recA1", "createdTime": "2024-03-01T10:00:00.000Z", "fields": {"Title": "Hi"}}], "offset": "itrNext/recA1"}"#,
        )
        .await;
        let client = configured_client(base);

        let records = client.list("Hero").await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records.first().unwrap().id.as_str(), "recA1");
        assert_eq!(records.first().unwrap().fields["Title"], "Hi");

        let received = server.await.unwrap();
        assert_eq!(received.method, "GET");
        assert_eq!(received.path, "/v0/appXYZ/Hero");
        assert_eq!(received.authorization.as_deref(), Some("Bearer pat-secret"));
    }

    #[tokio::test]
    async fn test_create_posts_fields_body() {
        let (base, server) = serve_once(
            200,
            r#"{"id": "recNew", "createdTime": "2024-03-01T10:00:00.000Z", "fields": {"Name": "Go", "Category": "other"}}"#,
        )
        .await;
        let client = configured_client(base);

        let fields = json!({"Name": "Go", "Category": "other"})
            .as_object()
            .cloned()
            .unwrap();
        let record = client.create("Skills", fields).await.unwrap();
        assert_eq!(record.id.as_str(), "recNew");

        let received = server.await.unwrap();
        assert_eq!(received.method, "POST");
        assert_eq!(received.path, "/v0/appXYZ/Skills");
        assert_eq!(
            received.json(),
            json!({"fields": {"Name": "Go", "Category": "other"}})
        );
    }

    #[tokio::test]
    async fn test_update_patches_record() {
        let (base, server) = serve_once(
            200,
            r#"{"id": "rec1", "fields": {"Title": "New"}}"#,
        )
        .await;
        let client = configured_client(base);

        let id = RecordId::parse("rec1").unwrap();
        let fields = json!({"Title": "New", "Link": null})
            .as_object()
            .cloned()
            .unwrap();
        let record = client.update("Portfolio", &id, fields).await.unwrap();
        assert_eq!(record.id, id);

        let received = server.await.unwrap();
        assert_eq!(received.method, "PATCH");
        assert_eq!(received.path, "/v0/appXYZ/Portfolio/rec1");
        assert_eq!(received.authorization.as_deref(), Some("Bearer pat-secret"));
        assert_eq!(
            received.json(),
            json!({"fields": {"Title": "New", "Link": null}})
        );
    }

    #[tokio::test]
    async fn test_delete_reads_confirmation() {
        let (base, server) = serve_once(200, r#"{"id": "rec1", "deleted": true}"#).await;
        let client = configured_client(base);

        let id = RecordId::parse("rec1").unwrap();
        let deleted = client.delete("Career", &id).await.unwrap();
        assert!(deleted.deleted);
        assert_eq!(deleted.id, id);

        let received = server.await.unwrap();
        assert_eq!(received.method, "DELETE");
        assert_eq!(received.path, "/v0/appXYZ/Career/rec1");
    }

    #[tokio::test]
    async fn test_error_status_carries_provider_message() {
        let (base, server) = serve_once(
            422,
            r#"{"error": {"type": "INVALID_VALUE_FOR_COLUMN", "message": "Field \"Tags\" cannot accept the provided value"}}"#,
        )
        .await;
        let client = configured_client(base);

        let err = client.create("Portfolio", Fields::new()).await.unwrap_err();
        assert!(matches!(
            err,
            TransportError::Api { status: 422, ref message }
                if message == "Field \"Tags\" cannot accept the provided value"
        ));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_malformed_success_body_is_parse_error() {
        let (base, server) = serve_once(200, "not json").await;
        let client = configured_client(base);

        let err = client.list("Hero").await.unwrap_err();
        assert!(matches!(err, TransportError::Parse(_)));
        server.await.unwrap();
    }
}
