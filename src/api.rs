use std::sync::Arc;
use std::time::Duration;

use anyhow::Context as _;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;

use crate::credentials::CredentialSource;
use crate::error::{ClientError, Result};
use crate::model::{BookId, NewBook, ReadingListSnapshot, Shelf};

/// Reading-list operations as the server exposes them. The store talks to
/// this trait so tests can swap in a scripted backend.
#[async_trait]
pub trait ReadingListBackend: Send + Sync {
    async fn fetch(&self) -> Result<ReadingListSnapshot>;
    async fn move_book(&self, id: &BookId, from: Shelf, to: Shelf) -> Result<()>;
    async fn remove_book(&self, id: &BookId) -> Result<()>;
    async fn add_book(&self, book: &NewBook, shelf: Shelf) -> Result<()>;
}

pub struct HttpReadingListBackend {
    http: reqwest::Client,
    base_url: String,
    credentials: Arc<dyn CredentialSource>,
}

impl HttpReadingListBackend {
    pub fn new(
        base_url: &str,
        credentials: Arc<dyn CredentialSource>,
    ) -> anyhow::Result<Self> {
        let base_url = base_url.trim_end_matches('/').to_owned();
        if base_url.is_empty() {
            anyhow::bail!("base url is empty");
        }
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("build http client")?;
        Ok(Self {
            http,
            base_url,
            credentials,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    // The token is read per request, never cached, so a rotated credential
    // applies to the next call.
    fn bearer(&self) -> Result<String> {
        self.credentials.token().ok_or(ClientError::Unauthenticated)
    }
}

#[async_trait]
impl ReadingListBackend for HttpReadingListBackend {
    async fn fetch(&self) -> Result<ReadingListSnapshot> {
        let token = self.bearer()?;
        tracing::debug!("fetch reading list");
        let response = self
            .http
            .get(self.endpoint("/api/readingList"))
            .bearer_auth(token)
            .send()
            .await
            .map_err(transport)?;
        let raw = success_body(response).await?;
        serde_json::from_str(&raw)
            .map_err(|err| ClientError::Transport(format!("malformed reading list: {err}")))
    }

    async fn move_book(&self, id: &BookId, from: Shelf, to: Shelf) -> Result<()> {
        let token = self.bearer()?;
        tracing::debug!(%id, from = from.wire_name(), to = to.wire_name(), "move book");
        let body = serde_json::json!({
            "bookId": id,
            "fromList": from,
            "toList": to,
        });
        let response = self
            .http
            .put(self.endpoint("/api/readingList/move"))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .map_err(transport)?;
        let raw = success_body(response).await?;
        expect_ack(&raw)
    }

    async fn remove_book(&self, id: &BookId) -> Result<()> {
        let token = self.bearer()?;
        tracing::debug!(%id, "remove book");
        let response = self
            .http
            .delete(self.endpoint(&format!("/api/readingList/{id}")))
            .bearer_auth(token)
            .send()
            .await
            .map_err(transport)?;
        let raw = success_body(response).await?;
        expect_ack(&raw)
    }

    async fn add_book(&self, book: &NewBook, shelf: Shelf) -> Result<()> {
        let token = self.bearer()?;
        tracing::debug!(title = %book.title, shelf = shelf.wire_name(), "add book");
        let body = serde_json::json!({
            "book": book,
            "list": shelf,
        });
        let response = self
            .http
            .post(self.endpoint("/api/readingList/add"))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .map_err(transport)?;
        let raw = success_body(response).await?;
        // A 2xx add response is either an ack or the stored record itself.
        match serde_json::from_str::<serde_json::Value>(&raw) {
            Ok(value) if value.get("success").and_then(|v| v.as_bool()) == Some(false) => {
                Err(ClientError::Backend(
                    "the server did not accept the book".to_owned(),
                ))
            }
            _ => Ok(()),
        }
    }
}

pub(crate) fn transport(err: reqwest::Error) -> ClientError {
    ClientError::Transport(err.to_string())
}

/// Reads the body and maps non-2xx statuses into the error taxonomy.
pub(crate) async fn success_body(response: reqwest::Response) -> Result<String> {
    let status = response.status();
    let raw = response.text().await.map_err(transport)?;
    if !status.is_success() {
        return Err(error_from_response(status, &raw));
    }
    Ok(raw)
}

pub(crate) fn error_from_response(status: StatusCode, raw: &str) -> ClientError {
    match parse_error_message(raw) {
        Some(message) => ClientError::Backend(message),
        None => ClientError::Transport(format!("server returned {status}")),
    }
}

fn parse_error_message(raw: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(raw).ok()?;
    let object = value.as_object()?;
    for key in ["error", "message"] {
        if let Some(text) = object.get(key).and_then(|v| v.as_str()) {
            return Some(text.to_owned());
        }
    }
    None
}

#[derive(Debug, Deserialize)]
struct Ack {
    #[serde(default)]
    success: bool,
}

fn expect_ack(raw: &str) -> Result<()> {
    let ack: Ack = serde_json::from_str(raw)
        .map_err(|err| ClientError::Transport(format!("malformed response body: {err}")))?;
    if !ack.success {
        return Err(ClientError::Backend(
            "the server did not accept the change".to_owned(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_key_takes_precedence_over_message() {
        let err = error_from_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            r#"{"error": "db down", "message": "ignored"}"#,
        );
        assert_eq!(err, ClientError::Backend("db down".to_owned()));
    }

    #[test]
    fn message_key_is_accepted_when_error_is_absent() {
        let err = error_from_response(
            StatusCode::BAD_REQUEST,
            r#"{"message": "invalid list name"}"#,
        );
        assert_eq!(err, ClientError::Backend("invalid list name".to_owned()));
    }

    #[test]
    fn unstructured_bodies_fall_back_to_transport() {
        let err = error_from_response(StatusCode::BAD_GATEWAY, "<html>oops</html>");
        assert_eq!(
            err,
            ClientError::Transport("server returned 502 Bad Gateway".to_owned())
        );
    }

    #[test]
    fn ack_must_say_success() {
        assert!(expect_ack(r#"{"success": true}"#).is_ok());
        assert!(matches!(
            expect_ack(r#"{"success": false}"#),
            Err(ClientError::Backend(_))
        ));
        assert!(matches!(
            expect_ack("not json"),
            Err(ClientError::Transport(_))
        ));
    }
}
