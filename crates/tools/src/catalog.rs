//! The tool catalog: every email tool the model may call.
//!
//! The catalog is a closed enum. Definitions sent to the model and the
//! dispatcher's handlers are both derived from [`MailTool`], so a tool can't
//! be advertised without being executable (or the other way round).

use mailpilot_core::provider::ToolDefinition;
use serde_json::{Value, json};

/// Upper bound on `max_results` for list and search.
pub const MAX_RESULTS_LIMIT: u32 = 50;

/// Default `max_results` for list and search.
pub const DEFAULT_MAX_RESULTS: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MailTool {
    ListEmails,
    SearchEmails,
    ReadEmail,
    SendEmail,
    ArchiveEmail,
    TrashEmail,
    MarkAsRead,
    MarkAsUnread,
    GetUnreadCount,
    GetThread,
}

impl MailTool {
    /// Every tool, in catalog order.
    pub const ALL: [MailTool; 10] = [
        MailTool::ListEmails,
        MailTool::SearchEmails,
        MailTool::ReadEmail,
        MailTool::SendEmail,
        MailTool::ArchiveEmail,
        MailTool::TrashEmail,
        MailTool::MarkAsRead,
        MailTool::MarkAsUnread,
        MailTool::GetUnreadCount,
        MailTool::GetThread,
    ];

    pub fn name(self) -> &'static str {
        match self {
            MailTool::ListEmails => "gmail_list_emails",
            MailTool::SearchEmails => "gmail_search_emails",
            MailTool::ReadEmail => "gmail_read_email",
            MailTool::SendEmail => "gmail_send_email",
            MailTool::ArchiveEmail => "gmail_archive_email",
            MailTool::TrashEmail => "gmail_trash_email",
            MailTool::MarkAsRead => "gmail_mark_as_read",
            MailTool::MarkAsUnread => "gmail_mark_as_unread",
            MailTool::GetUnreadCount => "gmail_get_unread_count",
            MailTool::GetThread => "gmail_get_thread",
        }
    }

    /// Exact, case-sensitive lookup by tool name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tool| tool.name() == name)
    }

    pub fn description(self) -> &'static str {
        match self {
            MailTool::ListEmails => {
                "List recent emails from the mailbox. Returns sender, subject, date, IDs and a snippet for each email."
            }
            MailTool::SearchEmails => {
                "Search emails using Gmail search syntax (e.g. 'from:alice@example.com', 'is:unread', 'subject:invoice', 'after:2024/01/01')."
            }
            MailTool::ReadEmail => "Read the full content of an email by its message ID.",
            MailTool::SendEmail => {
                "Send an email. To reply within a conversation, pass the thread_id and the Message-ID of the email being answered as in_reply_to."
            }
            MailTool::ArchiveEmail => "Archive an email (remove it from the inbox without deleting it).",
            MailTool::TrashEmail => "Move an email to the trash.",
            MailTool::MarkAsRead => "Mark an email as read.",
            MailTool::MarkAsUnread => "Mark an email as unread.",
            MailTool::GetUnreadCount => "Get the number of unread emails in the inbox.",
            MailTool::GetThread => "Get every message in an email thread (conversation), oldest first.",
        }
    }

    /// JSON Schema for the tool's arguments.
    pub fn parameters_schema(self) -> Value {
        match self {
            MailTool::ListEmails => json!({
                "type": "object",
                "properties": {
                    "max_results": max_results_schema(),
                    "label": {
                        "type": "string",
                        "description": "Label to list (default: INBOX). Other common labels: SENT, STARRED, IMPORTANT, SPAM, TRASH",
                        "default": "INBOX"
                    }
                },
                "required": []
            }),
            MailTool::SearchEmails => json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "Gmail search query"
                    },
                    "max_results": max_results_schema()
                },
                "required": ["query"]
            }),
            MailTool::ReadEmail
            | MailTool::ArchiveEmail
            | MailTool::TrashEmail
            | MailTool::MarkAsRead
            | MailTool::MarkAsUnread => json!({
                "type": "object",
                "properties": {
                    "message_id": {
                        "type": "string",
                        "description": "The message ID (from a list or search result)"
                    }
                },
                "required": ["message_id"]
            }),
            MailTool::SendEmail => json!({
                "type": "object",
                "properties": {
                    "to": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "Recipient email addresses"
                    },
                    "subject": { "type": "string", "description": "Subject line" },
                    "body": { "type": "string", "description": "Plain-text message body" },
                    "cc": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "CC recipients"
                    },
                    "bcc": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "BCC recipients"
                    },
                    "thread_id": {
                        "type": "string",
                        "description": "Thread ID to reply within"
                    },
                    "in_reply_to": {
                        "type": "string",
                        "description": "Message-ID header of the email being replied to"
                    }
                },
                "required": ["to", "subject", "body"]
            }),
            MailTool::GetUnreadCount => json!({
                "type": "object",
                "properties": {},
                "required": []
            }),
            MailTool::GetThread => json!({
                "type": "object",
                "properties": {
                    "thread_id": {
                        "type": "string",
                        "description": "The thread ID (from a list or search result)"
                    }
                },
                "required": ["thread_id"]
            }),
        }
    }

    /// Names of the required parameters, in schema order.
    pub fn required_params(self) -> Vec<String> {
        self.parameters_schema()["required"]
            .as_array()
            .map(|names| {
                names
                    .iter()
                    .filter_map(|n| n.as_str().map(String::from))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn to_definition(self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters_schema(),
        }
    }
}

impl std::fmt::Display for MailTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

fn max_results_schema() -> Value {
    json!({
        "type": "integer",
        "description": format!("Maximum number of emails to return (default: {DEFAULT_MAX_RESULTS}, max: {MAX_RESULTS_LIMIT})"),
        "default": DEFAULT_MAX_RESULTS,
        "minimum": 1,
        "maximum": MAX_RESULTS_LIMIT
    })
}

/// The full catalog, as sent with every completion request.
pub fn definitions() -> Vec<ToolDefinition> {
    MailTool::ALL.into_iter().map(MailTool::to_definition).collect()
}
