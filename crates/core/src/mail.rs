//! MailService trait: the abstraction over the user's mailbox.
//!
//! Every operation the email tools can perform maps to exactly one method
//! here. Implementations: Gmail REST API, in-memory mailbox (tests, offline).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::error::MailError;

/// A compact view of a message, as returned by list and search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailSummary {
    pub id: String,
    pub thread_id: String,
    pub from: String,
    pub subject: String,
    pub date: String,
    pub snippet: String,
    pub unread: bool,
}

/// A fully fetched message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Email {
    pub id: String,
    pub thread_id: String,
    pub from: String,
    pub to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cc: Option<String>,
    pub subject: String,
    pub date: String,
    pub body: String,
    #[serde(default)]
    pub labels: Vec<String>,
    pub unread: bool,

    /// The RFC 2822 `Message-ID` header, used for reply threading
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id_header: Option<String>,
}

/// All messages of one thread, oldest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailThread {
    pub id: String,
    pub messages: Vec<Email>,
}

/// A message to send.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutgoingEmail {
    pub to: Vec<String>,
    #[serde(default)]
    pub cc: Vec<String>,
    #[serde(default)]
    pub bcc: Vec<String>,
    pub subject: String,
    pub body: String,

    /// Thread to attach the message to (replies)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<String>,

    /// `Message-ID` of the message being replied to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_reply_to: Option<String>,
}

/// Identifiers assigned to a sent message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentEmail {
    pub id: String,
    pub thread_id: String,
}

/// The mailbox operations available to the email tools.
#[async_trait]
pub trait MailService: Send + Sync {
    /// A human-readable name for this backend (e.g., "gmail", "in_memory").
    fn name(&self) -> &str;

    /// List messages carrying `label` (e.g. "INBOX"), newest first.
    async fn list_messages(&self, label: &str, max_results: u32) -> Result<Vec<EmailSummary>, MailError>;

    /// Search messages with a provider query string (e.g. "from:alice is:unread").
    async fn search_messages(&self, query: &str, max_results: u32) -> Result<Vec<EmailSummary>, MailError>;

    /// Fetch one message with its body.
    async fn get_message(&self, id: &str) -> Result<Email, MailError>;

    /// Send a message.
    async fn send_message(&self, email: OutgoingEmail) -> Result<SentEmail, MailError>;

    /// Remove a message from the inbox without deleting it.
    async fn archive_message(&self, id: &str) -> Result<(), MailError>;

    /// Move a message to the trash.
    async fn trash_message(&self, id: &str) -> Result<(), MailError>;

    /// Mark a message as read.
    async fn mark_read(&self, id: &str) -> Result<(), MailError>;

    /// Mark a message as unread.
    async fn mark_unread(&self, id: &str) -> Result<(), MailError>;

    /// Number of unread messages in the inbox.
    async fn unread_count(&self) -> Result<u64, MailError>;

    /// Fetch every message in a thread.
    async fn get_thread(&self, thread_id: &str) -> Result<EmailThread, MailError>;
}
