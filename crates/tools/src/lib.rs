//! Email tools for MailPilot.
//!
//! The [`catalog`] describes the tools offered to the model; the
//! [`dispatcher`] executes a tool call against a [`MailService`] and renders
//! the outcome as text for the next completion request.
//!
//! [`MailService`]: mailpilot_core::mail::MailService

pub mod args;
pub mod catalog;
pub mod dispatcher;
pub mod format;

pub use catalog::{MailTool, definitions};
pub use dispatcher::ToolDispatcher;
