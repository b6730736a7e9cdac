//! In-memory mailbox for tests and the `--offline` chat mode.
//!
//! Labels behave like Gmail's system labels (`INBOX`, `UNREAD`, `SENT`,
//! `TRASH`), and search understands a small subset of Gmail query syntax.

use async_trait::async_trait;
use chrono::Utc;
use mailpilot_core::error::MailError;
use mailpilot_core::mail::{Email, EmailSummary, EmailThread, MailService, OutgoingEmail, SentEmail};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::mime;

/// A mailbox that keeps every message in a Vec, in mailbox order (newest first).
pub struct InMemoryMailbox {
    emails: Arc<RwLock<Vec<Email>>>,
    sent: Arc<RwLock<Vec<OutgoingEmail>>>,
    unavailable: AtomicBool,
}

impl InMemoryMailbox {
    pub fn new() -> Self {
        Self::with_messages(Vec::new())
    }

    /// Create a mailbox pre-filled with `emails`.
    pub fn with_messages(emails: Vec<Email>) -> Self {
        Self {
            emails: Arc::new(RwLock::new(emails)),
            sent: Arc::new(RwLock::new(Vec::new())),
            unavailable: AtomicBool::new(false),
        }
    }

    /// A small realistic inbox for offline demos.
    pub fn demo() -> Self {
        Self::with_messages(vec![
            inbox_email(
                "msg-004",
                "thread-001",
                "Dana Lee <dana@example.com>",
                "Re: Q3 planning review moved to Friday",
                "Works for me. I will send the hiring numbers on Thursday.",
                true,
            ),
            inbox_email(
                "msg-001",
                "thread-001",
                "Alice Chen <alice@example.com>",
                "Q3 planning review moved to Friday",
                "Hi, the Q3 planning review is now on Friday at 10:00. Please bring the updated roadmap and the hiring numbers.",
                true,
            ),
            inbox_email(
                "msg-002",
                "thread-002",
                "GitHub <noreply@github.com>",
                "[mailpilot] Pull request #42 merged",
                "Your pull request \"Add thread view\" was merged into main.",
                true,
            ),
            inbox_email(
                "msg-003",
                "thread-003",
                "Bob Martin <bob@example.com>",
                "Lunch tomorrow?",
                "Are you free for lunch tomorrow around 12:30? The new ramen place opened.",
                false,
            ),
        ])
    }

    /// Messages handed to `send_message`, in send order.
    pub async fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent.read().await.clone()
    }

    /// Look up a stored message without going through the trait.
    pub async fn get(&self, id: &str) -> Option<Email> {
        self.emails.read().await.iter().find(|e| e.id == id).cloned()
    }

    /// Make every operation fail with a network error (for failure-path tests).
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), MailError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(MailError::Network("mailbox unavailable".into()));
        }
        Ok(())
    }

    async fn update_labels(&self, id: &str, add: &[&str], remove: &[&str]) -> Result<(), MailError> {
        self.check_available()?;
        let mut emails = self.emails.write().await;
        let email = emails
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| MailError::NotFound(id.to_string()))?;

        email.labels.retain(|l| !remove.contains(&l.as_str()));
        for label in add {
            if !email.labels.iter().any(|l| l == label) {
                email.labels.push(label.to_string());
            }
        }
        email.unread = email.labels.iter().any(|l| l == "UNREAD");
        Ok(())
    }
}

impl Default for InMemoryMailbox {
    fn default() -> Self {
        Self::new()
    }
}

/// Build an inbox message for seeding a mailbox.
pub fn inbox_email(id: &str, thread_id: &str, from: &str, subject: &str, body: &str, unread: bool) -> Email {
    let mut labels = vec!["INBOX".to_string()];
    if unread {
        labels.push("UNREAD".to_string());
    }
    Email {
        id: id.into(),
        thread_id: thread_id.into(),
        from: from.into(),
        to: "me@example.com".into(),
        cc: None,
        subject: subject.into(),
        date: Utc::now().to_rfc2822(),
        body: body.into(),
        labels,
        unread,
        message_id_header: Some(format!("<{id}@mail.example.com>")),
    }
}

fn summarize(email: &Email) -> EmailSummary {
    let snippet: String = email
        .body
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .take(200)
        .collect();
    EmailSummary {
        id: email.id.clone(),
        thread_id: email.thread_id.clone(),
        from: email.from.clone(),
        subject: email.subject.clone(),
        date: email.date.clone(),
        snippet,
        unread: email.unread,
    }
}

/// Gmail-style query matching: `is:unread`, `is:read`, `from:`, `to:`,
/// `subject:`, `in:`/`label:`; bare words match sender, subject or body.
/// All terms must match; comparisons are case-insensitive.
fn matches_query(email: &Email, query: &str) -> bool {
    let has_label = |label: &str| email.labels.iter().any(|l| l.eq_ignore_ascii_case(label));
    let contains = |haystack: &str, needle: &str| haystack.to_lowercase().contains(&needle.to_lowercase());

    query.split_whitespace().all(|term| match term.split_once(':') {
        Some(("is", "unread")) => email.unread,
        Some(("is", "read")) => !email.unread,
        Some(("from", v)) => contains(&email.from, v),
        Some(("to", v)) => contains(&email.to, v),
        Some(("subject", v)) => contains(&email.subject, v),
        Some(("in" | "label", v)) => has_label(v),
        _ => contains(&email.from, term) || contains(&email.subject, term) || contains(&email.body, term),
    })
}

#[async_trait]
impl MailService for InMemoryMailbox {
    fn name(&self) -> &str {
        "in_memory"
    }

    async fn list_messages(&self, label: &str, max_results: u32) -> Result<Vec<EmailSummary>, MailError> {
        self.check_available()?;
        let emails = self.emails.read().await;
        Ok(emails
            .iter()
            .filter(|e| e.labels.iter().any(|l| l.eq_ignore_ascii_case(label)))
            .take(max_results as usize)
            .map(summarize)
            .collect())
    }

    async fn search_messages(&self, query: &str, max_results: u32) -> Result<Vec<EmailSummary>, MailError> {
        self.check_available()?;
        let emails = self.emails.read().await;
        Ok(emails
            .iter()
            .filter(|e| !e.labels.iter().any(|l| l == "TRASH"))
            .filter(|e| matches_query(e, query))
            .take(max_results as usize)
            .map(summarize)
            .collect())
    }

    async fn get_message(&self, id: &str) -> Result<Email, MailError> {
        self.check_available()?;
        self.get(id)
            .await
            .ok_or_else(|| MailError::NotFound(id.to_string()))
    }

    async fn send_message(&self, email: OutgoingEmail) -> Result<SentEmail, MailError> {
        self.check_available()?;
        mime::validate_outgoing(&email)?;

        let id = format!("sent-{}", Uuid::new_v4().simple());
        let thread_id = email.thread_id.clone().unwrap_or_else(|| id.clone());

        let stored = Email {
            id: id.clone(),
            thread_id: thread_id.clone(),
            from: "me@example.com".into(),
            to: email.to.join(", "),
            cc: (!email.cc.is_empty()).then(|| email.cc.join(", ")),
            subject: email.subject.clone(),
            date: Utc::now().to_rfc2822(),
            body: email.body.clone(),
            labels: vec!["SENT".into()],
            unread: false,
            message_id_header: Some(format!("<{id}@mail.example.com>")),
        };

        self.emails.write().await.insert(0, stored);
        self.sent.write().await.push(email);
        Ok(SentEmail { id, thread_id })
    }

    async fn archive_message(&self, id: &str) -> Result<(), MailError> {
        self.update_labels(id, &[], &["INBOX"]).await
    }

    async fn trash_message(&self, id: &str) -> Result<(), MailError> {
        self.update_labels(id, &["TRASH"], &["INBOX"]).await
    }

    async fn mark_read(&self, id: &str) -> Result<(), MailError> {
        self.update_labels(id, &[], &["UNREAD"]).await
    }

    async fn mark_unread(&self, id: &str) -> Result<(), MailError> {
        self.update_labels(id, &["UNREAD"], &[]).await
    }

    async fn unread_count(&self) -> Result<u64, MailError> {
        self.check_available()?;
        let emails = self.emails.read().await;
        Ok(emails
            .iter()
            .filter(|e| e.unread && e.labels.iter().any(|l| l == "INBOX"))
            .count() as u64)
    }

    async fn get_thread(&self, thread_id: &str) -> Result<EmailThread, MailError> {
        self.check_available()?;
        let emails = self.emails.read().await;
        // Stored newest first; threads read oldest first
        let messages: Vec<Email> = emails
            .iter()
            .rev()
            .filter(|e| e.thread_id == thread_id)
            .cloned()
            .collect();

        if messages.is_empty() {
            return Err(MailError::NotFound(thread_id.to_string()));
        }
        Ok(EmailThread {
            id: thread_id.to_string(),
            messages,
        })
    }
}
