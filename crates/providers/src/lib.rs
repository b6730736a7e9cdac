//! Chat-completion providers for MailPilot.
//!
//! All providers implement the `mailpilot_core::Provider` trait.
//! [`build_from_config`] picks and configures the default one.

pub mod openai_compat;
pub mod router;

pub use openai_compat::OpenAiCompatProvider;
pub use router::build_from_config;
