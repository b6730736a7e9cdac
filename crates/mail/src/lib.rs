//! Mail service backends for MailPilot.
//!
//! All backends implement the `mailpilot_core::MailService` trait.

pub mod gmail;
pub mod in_memory;
pub mod mime;

pub use gmail::GmailClient;
pub use in_memory::InMemoryMailbox;
