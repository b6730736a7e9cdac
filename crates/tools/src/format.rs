//! Text rendering of tool results. The model reads these strings as its only
//! evidence of what happened, so the layout is fixed.

use mailpilot_core::mail::{Email, EmailSummary, EmailThread};

const SNIPPET_CHARS: usize = 100;

fn plural(count: usize, word: &str) -> String {
    if count == 1 {
        format!("{count} {word}")
    } else {
        format!("{count} {word}s")
    }
}

/// Numbered list of summaries; `empty` is returned verbatim when there are none.
pub fn summaries(emails: &[EmailSummary], empty: &str) -> String {
    if emails.is_empty() {
        return empty.to_string();
    }

    let mut out = format!("Found {}:\n", plural(emails.len(), "email"));
    for (i, email) in emails.iter().enumerate() {
        let marker = if email.unread { "[UNREAD] " } else { "" };
        out.push_str(&format!("\n{}. {marker}From: {}\n", i + 1, email.from));
        out.push_str(&format!("   Subject: {}\n", email.subject));
        out.push_str(&format!("   Date: {}\n", email.date));
        out.push_str(&format!("   ID: {} | Thread: {}\n", email.id, email.thread_id));
        out.push_str(&format!("   Snippet: {}\n", truncate(&email.snippet, SNIPPET_CHARS)));
    }
    out.trim_end().to_string()
}

/// Header block, blank line, body.
pub fn email(email: &Email) -> String {
    let mut out = format!("From: {}\nTo: {}\n", email.from, email.to);
    if let Some(cc) = &email.cc {
        out.push_str(&format!("Cc: {cc}\n"));
    }
    out.push_str(&format!("Subject: {}\n", email.subject));
    out.push_str(&format!("Date: {}\n", email.date));
    out.push_str(&format!("ID: {}\n", email.id));
    out.push_str(&format!("Thread: {}\n", email.thread_id));
    if let Some(message_id) = &email.message_id_header {
        out.push_str(&format!("Message-ID: {message_id}\n"));
    }
    if !email.labels.is_empty() {
        out.push_str(&format!("Labels: {}\n", email.labels.join(", ")));
    }
    out.push('\n');
    out.push_str(email.body.trim_end());
    out
}

pub fn thread(thread: &EmailThread) -> String {
    let mut out = format!("Thread {} ({}):", thread.id, plural(thread.messages.len(), "message"));
    for (i, message) in thread.messages.iter().enumerate() {
        out.push_str(&format!("\n\n--- Message {} ---\n", i + 1));
        out.push_str(&email(message));
    }
    out
}

pub fn unread_count(count: u64) -> String {
    let noun = if count == 1 { "email" } else { "emails" };
    format!("You have {count} unread {noun} in your inbox.")
}

/// First `max` characters, with `...` appended when anything was cut.
pub fn truncate(text: &str, max: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(id: &str, unread: bool) -> EmailSummary {
        EmailSummary {
            id: id.into(),
            thread_id: format!("t-{id}"),
            from: "Alice <alice@example.com>".into(),
            subject: "Hello".into(),
            date: "Mon, 1 Jan 2024 10:00:00 +0000".into(),
            snippet: "Short snippet".into(),
            unread,
        }
    }

    #[test]
    fn summaries_are_numbered_with_unread_marker() {
        let out = summaries(&[summary("a", true), summary("b", false)], "No emails found.");
        assert!(out.starts_with("Found 2 emails:\n"));
        assert!(out.contains("1. [UNREAD] From: Alice <alice@example.com>"));
        assert!(out.contains("2. From: Alice <alice@example.com>"));
        assert!(out.contains("   ID: a | Thread: t-a"));
        assert!(out.contains("   Snippet: Short snippet"));
    }

    #[test]
    fn single_summary_is_singular() {
        let out = summaries(&[summary("a", false)], "none");
        assert!(out.starts_with("Found 1 email:\n"));
    }

    #[test]
    fn empty_summaries_use_given_text() {
        assert_eq!(summaries(&[], "No emails found."), "No emails found.");
    }

    #[test]
    fn snippet_truncated_at_100_chars() {
        let long = "x".repeat(150);
        let cut = truncate(&long, 100);
        assert_eq!(cut.len(), 103);
        assert!(cut.ends_with("..."));

        let exact = "y".repeat(100);
        assert_eq!(truncate(&exact, 100), exact);
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let text = "é".repeat(120);
        let cut = truncate(&text, 100);
        assert_eq!(cut.chars().count(), 103);
    }

    #[test]
    fn unread_count_wording() {
        assert_eq!(unread_count(3), "You have 3 unread emails in your inbox.");
        assert_eq!(unread_count(1), "You have 1 unread email in your inbox.");
        assert_eq!(unread_count(0), "You have 0 unread emails in your inbox.");
    }

    #[test]
    fn email_block_has_headers_then_body() {
        let message = Email {
            id: "m1".into(),
            thread_id: "t1".into(),
            from: "alice@example.com".into(),
            to: "me@example.com".into(),
            cc: None,
            subject: "Lunch".into(),
            date: "today".into(),
            body: "See you at noon.\n".into(),
            labels: vec!["INBOX".into()],
            unread: false,
            message_id_header: None,
        };
        let out = email(&message);
        assert!(out.starts_with("From: alice@example.com\nTo: me@example.com\nSubject: Lunch\n"));
        assert!(!out.contains("Cc:"));
        assert!(out.contains("Labels: INBOX\n\nSee you at noon."));

        let out = thread(&EmailThread {
            id: "t1".into(),
            messages: vec![message],
        });
        assert!(out.starts_with("Thread t1 (1 message):\n\n--- Message 1 ---\nFrom:"));
    }
}
