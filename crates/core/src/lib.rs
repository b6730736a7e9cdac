//! # MailPilot Core
//!
//! Domain types, traits, and error definitions for the MailPilot email
//! assistant. This crate has **no framework dependencies**: it defines the
//! domain model that every other crate implements against.
//!
//! ## Design Philosophy
//!
//! Every external collaborator is defined as a trait here:
//! - [`Provider`] is the chat-completion endpoint
//! - [`MailService`] is the mailbox the tools act on
//!
//! Implementations live in their respective crates, which keeps the agent
//! loop testable with scripted providers and an in-memory mailbox.

pub mod error;
pub mod event;
pub mod mail;
pub mod message;
pub mod provider;
pub mod tool;

// Re-export key types at crate root for ergonomics
pub use error::{Error, MailError, ProviderError, Result};
pub use event::{DomainEvent, EventBus};
pub use mail::{Email, EmailSummary, EmailThread, MailService, OutgoingEmail, SentEmail};
pub use message::{Conversation, ConversationId, Message, MessageToolCall, Role};
pub use provider::{Provider, ProviderRequest, ProviderResponse, ToolChoice, ToolDefinition, Usage};
pub use tool::ToolResult;
