//! Gmail REST API backend.
//!
//! Talks to `https://gmail.googleapis.com/gmail/v1/users/{user}` with a
//! bearer access token. Obtaining and refreshing that token is outside this
//! crate; an expired token surfaces as [`MailError::Unauthorized`].

use std::time::Duration;

use async_trait::async_trait;
use mailpilot_config::GmailConfig;
use mailpilot_core::error::MailError;
use mailpilot_core::mail::{Email, EmailSummary, EmailThread, MailService, OutgoingEmail, SentEmail};
use reqwest::Url;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::mime;

const UNREAD: &str = "UNREAD";
const INBOX: &str = "INBOX";

/// A [`MailService`] backed by the Gmail REST API.
pub struct GmailClient {
    base_url: String,
    access_token: String,
    client: reqwest::Client,
}

impl GmailClient {
    /// Create a client for `user_id` ("me" for the token's own mailbox).
    pub fn new(
        api_url: impl Into<String>,
        user_id: &str,
        access_token: impl Into<String>,
    ) -> Self {
        let api_url = api_url.into();
        Self {
            base_url: format!("{}/users/{}", api_url.trim_end_matches('/'), user_id),
            access_token: access_token.into(),
            client: http_client(Duration::from_secs(30)),
        }
    }

    /// Build a client from the `[gmail]` config section.
    pub fn from_config(config: &GmailConfig) -> Result<Self, MailError> {
        let token = config.access_token.as_deref().ok_or_else(|| {
            MailError::Unauthorized(
                "no Gmail access token configured (set GMAIL_ACCESS_TOKEN or gmail.access_token)".into(),
            )
        })?;
        Ok(Self::new(&config.api_url, &config.user_id, token))
    }

    /// Resolve `segments` under the user's API root. Each segment is
    /// percent-encoded, so an id can never address a different endpoint.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, MailError> {
        if let Some(bad) = segments.iter().find(|s| s.is_empty() || **s == "." || **s == "..") {
            return Err(MailError::InvalidRequest(format!("invalid Gmail resource id: {bad:?}")));
        }

        let mut url = Url::parse(&self.base_url)
            .map_err(|e| MailError::InvalidRequest(format!("invalid Gmail API URL {}: {e}", self.base_url)))?;
        url.path_segments_mut()
            .map_err(|_| MailError::InvalidRequest(format!("invalid Gmail API URL {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, String)],
        resource: &str,
    ) -> Result<T, MailError> {
        let url = self.endpoint(segments)?;
        debug!(%url, "Gmail GET");

        let response = self
            .client
            .get(url)
            .bearer_auth(&self.access_token)
            .query(query)
            .send()
            .await
            .map_err(|e| MailError::Network(e.to_string()))?;

        Self::parse(response, resource).await
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        body: serde_json::Value,
        resource: &str,
    ) -> Result<T, MailError> {
        let url = self.endpoint(segments)?;
        debug!(%url, "Gmail POST");

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| MailError::Network(e.to_string()))?;

        Self::parse(response, resource).await
    }

    async fn parse<T: DeserializeOwned>(
        response: reqwest::Response,
        resource: &str,
    ) -> Result<T, MailError> {
        let status = response.status().as_u16();

        match status {
            200..=299 => response
                .json::<T>()
                .await
                .map_err(|e| MailError::InvalidResponse(e.to_string())),
            404 => Err(MailError::NotFound(resource.to_string())),
            401 | 403 => {
                let body = response.text().await.unwrap_or_default();
                Err(MailError::Unauthorized(api_error_message(&body)))
            }
            _ => {
                let body = response.text().await.unwrap_or_default();
                warn!(status, body = %body, "Gmail API error");
                Err(MailError::Api {
                    status,
                    message: api_error_message(&body),
                })
            }
        }
    }

    async fn modify_labels(&self, id: &str, add: &[&str], remove: &[&str]) -> Result<(), MailError> {
        let body = serde_json::json!({
            "addLabelIds": add,
            "removeLabelIds": remove,
        });
        let _: GmailMessage = self.post_json(&["messages", id, "modify"], body, id).await?;
        Ok(())
    }

    /// Resolve a page of message references into summaries, one request each.
    async fn summaries(&self, list: MessageList) -> Result<Vec<EmailSummary>, MailError> {
        let mut summaries = Vec::new();
        for r in list.messages {
            let msg: GmailMessage = self
                .get_json(
                    &["messages", r.id.as_str()],
                    &[
                        ("format", "metadata".into()),
                        ("metadataHeaders", "From".into()),
                        ("metadataHeaders", "Subject".into()),
                        ("metadataHeaders", "Date".into()),
                    ],
                    &r.id,
                )
                .await?;
            summaries.push(summary_from(msg));
        }
        Ok(summaries)
    }
}

#[async_trait]
impl MailService for GmailClient {
    fn name(&self) -> &str {
        "gmail"
    }

    async fn list_messages(&self, label: &str, max_results: u32) -> Result<Vec<EmailSummary>, MailError> {
        let list: MessageList = self
            .get_json(
                &["messages"],
                &[("labelIds", label.to_string()), ("maxResults", max_results.to_string())],
                label,
            )
            .await?;
        self.summaries(list).await
    }

    async fn search_messages(&self, query: &str, max_results: u32) -> Result<Vec<EmailSummary>, MailError> {
        let list: MessageList = self
            .get_json(
                &["messages"],
                &[("q", query.to_string()), ("maxResults", max_results.to_string())],
                query,
            )
            .await?;
        self.summaries(list).await
    }

    async fn get_message(&self, id: &str) -> Result<Email, MailError> {
        let msg: GmailMessage = self
            .get_json(&["messages", id], &[("format", "full".into())], id)
            .await?;
        Ok(email_from(msg))
    }

    async fn send_message(&self, email: OutgoingEmail) -> Result<SentEmail, MailError> {
        mime::validate_outgoing(&email)?;

        let raw = mime::encode_base64url(mime::build_rfc2822(&email).as_bytes());
        let mut body = serde_json::json!({ "raw": raw });
        if let Some(thread_id) = &email.thread_id {
            body["threadId"] = serde_json::json!(thread_id);
        }

        let sent: MessageRef = self.post_json(&["messages", "send"], body, "messages/send").await?;
        Ok(SentEmail {
            id: sent.id,
            thread_id: sent.thread_id,
        })
    }

    async fn archive_message(&self, id: &str) -> Result<(), MailError> {
        self.modify_labels(id, &[], &[INBOX]).await
    }

    async fn trash_message(&self, id: &str) -> Result<(), MailError> {
        let _: GmailMessage = self
            .post_json(&["messages", id, "trash"], serde_json::json!({}), id)
            .await?;
        Ok(())
    }

    async fn mark_read(&self, id: &str) -> Result<(), MailError> {
        self.modify_labels(id, &[], &[UNREAD]).await
    }

    async fn mark_unread(&self, id: &str) -> Result<(), MailError> {
        self.modify_labels(id, &[UNREAD], &[]).await
    }

    async fn unread_count(&self) -> Result<u64, MailError> {
        let label: Label = self.get_json(&["labels", INBOX], &[], INBOX).await?;
        Ok(label.messages_unread.unwrap_or(0))
    }

    async fn get_thread(&self, thread_id: &str) -> Result<EmailThread, MailError> {
        let thread: Thread = self
            .get_json(&["threads", thread_id], &[("format", "full".into())], thread_id)
            .await?;
        Ok(EmailThread {
            id: thread.id,
            messages: thread.messages.into_iter().map(email_from).collect(),
        })
    }
}

/// HTTP client with a request timeout. A builder failure falls back to the
/// default client, without the timeout.
fn http_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|e| {
            warn!(error = %e, timeout_secs = timeout.as_secs(), "HTTP client builder failed, using defaults without a timeout");
            reqwest::Client::new()
        })
}

// --- Gmail API types (internal) ---

#[derive(Debug, Deserialize)]
struct MessageList {
    #[serde(default)]
    messages: Vec<MessageRef>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MessageRef {
    id: String,
    #[serde(default)]
    thread_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GmailMessage {
    id: String,
    #[serde(default)]
    thread_id: String,
    #[serde(default)]
    label_ids: Vec<String>,
    #[serde(default)]
    snippet: String,
    #[serde(default)]
    payload: Option<MessagePart>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MessagePart {
    #[serde(default)]
    mime_type: String,
    #[serde(default)]
    headers: Vec<Header>,
    #[serde(default)]
    body: Option<PartBody>,
    #[serde(default)]
    parts: Vec<MessagePart>,
}

#[derive(Debug, Deserialize)]
struct Header {
    name: String,
    value: String,
}

#[derive(Debug, Deserialize)]
struct PartBody {
    #[serde(default)]
    data: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Label {
    #[serde(default)]
    messages_unread: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct Thread {
    id: String,
    #[serde(default)]
    messages: Vec<GmailMessage>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Pull `error.message` out of a Gmail error body, falling back to the raw text.
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<ApiErrorBody>(body)
        .map(|b| b.error.message)
        .unwrap_or_else(|_| body.trim().to_string())
}

impl MessagePart {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|h| h.name.eq_ignore_ascii_case(name))
            .map(|h| h.value.as_str())
    }

    fn decoded_data(&self) -> Option<String> {
        self.body
            .as_ref()
            .and_then(|b| b.data.as_deref())
            .and_then(|d| mime::decode_base64url(d).ok())
    }

    /// First part of the given MIME type, depth-first.
    fn find(&self, mime_type: &str) -> Option<&MessagePart> {
        if self.mime_type.eq_ignore_ascii_case(mime_type) {
            return Some(self);
        }
        self.parts.iter().find_map(|p| p.find(mime_type))
    }
}

/// Body text: text/plain if present, otherwise text/html flattened to text.
fn extract_body(payload: &MessagePart) -> String {
    if let Some(text) = payload.find("text/plain").and_then(MessagePart::decoded_data) {
        return text;
    }
    if let Some(html) = payload.find("text/html").and_then(MessagePart::decoded_data) {
        return mime::strip_html(&html);
    }
    payload.decoded_data().unwrap_or_default()
}

fn summary_from(msg: GmailMessage) -> EmailSummary {
    let payload = msg.payload.unwrap_or_default();
    EmailSummary {
        unread: msg.label_ids.iter().any(|l| l == UNREAD),
        from: payload.header("From").unwrap_or("(unknown sender)").to_string(),
        subject: payload.header("Subject").unwrap_or("(no subject)").to_string(),
        date: payload.header("Date").unwrap_or_default().to_string(),
        snippet: mime::strip_html(&msg.snippet),
        id: msg.id,
        thread_id: msg.thread_id,
    }
}

fn email_from(msg: GmailMessage) -> Email {
    let payload = msg.payload.unwrap_or_default();
    Email {
        unread: msg.label_ids.iter().any(|l| l == UNREAD),
        from: payload.header("From").unwrap_or("(unknown sender)").to_string(),
        to: payload.header("To").unwrap_or_default().to_string(),
        cc: payload.header("Cc").map(str::to_string),
        subject: payload.header("Subject").unwrap_or("(no subject)").to_string(),
        date: payload.header("Date").unwrap_or_default().to_string(),
        message_id_header: payload.header("Message-ID").map(str::to_string),
        body: extract_body(&payload),
        labels: msg.label_ids,
        id: msg.id,
        thread_id: msg.thread_id,
    }
}
