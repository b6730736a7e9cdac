//! Tool dispatcher: runs one named tool call against the mail service.
//!
//! `execute` is total. Unknown tools, malformed arguments and mail-service
//! failures all come back as a failed [`ToolResult`] whose `output` the
//! model can read.

use std::sync::Arc;

use mailpilot_core::error::MailError;
use mailpilot_core::mail::MailService;
use mailpilot_core::tool::ToolResult;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::args::{self, ListArgs, MessageIdArgs, NoArgs, SearchArgs, SendArgs, ThreadIdArgs};
use crate::catalog::MailTool;
use crate::format;

pub struct ToolDispatcher {
    mail: Arc<dyn MailService>,
}

impl ToolDispatcher {
    pub fn new(mail: Arc<dyn MailService>) -> Self {
        Self { mail }
    }

    /// Name of the mail backend the tools act on.
    pub fn backend(&self) -> &str {
        self.mail.name()
    }

    /// Names of every tool this dispatcher can execute, in catalog order.
    pub fn supported_tools(&self) -> Vec<&'static str> {
        MailTool::ALL.iter().map(|t| t.name()).collect()
    }

    /// Execute the tool called `name` with the JSON-encoded `arguments`.
    pub async fn execute(&self, name: &str, arguments: &str) -> ToolResult {
        let Some(tool) = MailTool::from_name(name) else {
            warn!(tool = name, "Model requested unknown tool");
            return ToolResult::unknown_tool(name);
        };

        debug!(tool = name, backend = self.mail.name(), "Executing tool");
        let result = match self.run(tool, arguments).await {
            Ok(output) => ToolResult::ok(output),
            Err(ToolFailure::InvalidArguments(detail)) => {
                ToolResult::error(format!("Invalid arguments for {name}: {detail}"))
            }
            Err(ToolFailure::Mail(e)) => ToolResult::error(e.to_string()),
        };

        if !result.success {
            warn!(tool = name, output = %result.output, "Tool failed");
        }
        result
    }

    async fn run(&self, tool: MailTool, raw: &str) -> Result<String, ToolFailure> {
        match tool {
            MailTool::ListEmails => {
                let args: ListArgs = parse(raw)?;
                let emails = self.mail.list_messages(&args.label, args.limit()).await?;
                Ok(format::summaries(&emails, "No emails found."))
            }
            MailTool::SearchEmails => {
                let args: SearchArgs = parse(raw)?;
                let emails = self.mail.search_messages(&args.query, args.limit()).await?;
                let empty = format!("No emails found matching \"{}\".", args.query);
                Ok(format::summaries(&emails, &empty))
            }
            MailTool::ReadEmail => {
                let id = message_id(raw)?;
                let email = self.mail.get_message(&id).await?;
                Ok(format::email(&email))
            }
            MailTool::SendEmail => {
                let args: SendArgs = parse(raw)?;
                let recipients = args.to.join(", ");
                let sent = self.mail.send_message(args.into()).await?;
                Ok(format!("Email sent successfully to {recipients}. Message ID: {}", sent.id))
            }
            MailTool::ArchiveEmail => {
                let id = message_id(raw)?;
                self.mail.archive_message(&id).await?;
                Ok(format!("Email {id} archived."))
            }
            MailTool::TrashEmail => {
                let id = message_id(raw)?;
                self.mail.trash_message(&id).await?;
                Ok(format!("Email {id} moved to trash."))
            }
            MailTool::MarkAsRead => {
                let id = message_id(raw)?;
                self.mail.mark_read(&id).await?;
                Ok(format!("Email {id} marked as read."))
            }
            MailTool::MarkAsUnread => {
                let id = message_id(raw)?;
                self.mail.mark_unread(&id).await?;
                Ok(format!("Email {id} marked as unread."))
            }
            MailTool::GetUnreadCount => {
                let _: NoArgs = parse(raw)?;
                let count = self.mail.unread_count().await?;
                Ok(format::unread_count(count))
            }
            MailTool::GetThread => {
                let args: ThreadIdArgs = parse(raw)?;
                let thread_id = non_empty("thread_id", args.thread_id)?;
                let thread = self.mail.get_thread(&thread_id).await?;
                Ok(format::thread(&thread))
            }
        }
    }
}

enum ToolFailure {
    InvalidArguments(String),
    Mail(MailError),
}

impl From<MailError> for ToolFailure {
    fn from(e: MailError) -> Self {
        ToolFailure::Mail(e)
    }
}

fn parse<T: DeserializeOwned>(raw: &str) -> Result<T, ToolFailure> {
    args::parse(raw).map_err(ToolFailure::InvalidArguments)
}

fn message_id(raw: &str) -> Result<String, ToolFailure> {
    let args: MessageIdArgs = parse(raw)?;
    non_empty("message_id", args.message_id)
}

fn non_empty(field: &str, value: String) -> Result<String, ToolFailure> {
    let value = value.trim().to_string();
    if value.is_empty() {
        return Err(ToolFailure::InvalidArguments(format!("{field} must not be empty")));
    }
    Ok(value)
}
