//! Typed tool arguments, parsed from the JSON string the model sends.

use mailpilot_core::mail::OutgoingEmail;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

use crate::catalog::{DEFAULT_MAX_RESULTS, MAX_RESULTS_LIMIT};

/// Parse a raw argument string into `T`. An empty string counts as `{}`.
pub fn parse<T: DeserializeOwned>(raw: &str) -> Result<T, String> {
    let raw = raw.trim();
    let raw = if raw.is_empty() { "{}" } else { raw };
    serde_json::from_str(raw).map_err(|e| e.to_string())
}

#[derive(Debug, Deserialize)]
pub struct ListArgs {
    #[serde(default = "default_max_results")]
    pub max_results: u32,
    #[serde(default = "default_label")]
    pub label: String,
}

impl ListArgs {
    pub fn limit(&self) -> u32 {
        clamp_results(self.max_results)
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchArgs {
    pub query: String,
    #[serde(default = "default_max_results")]
    pub max_results: u32,
}

impl SearchArgs {
    pub fn limit(&self) -> u32 {
        clamp_results(self.max_results)
    }
}

#[derive(Debug, Deserialize)]
pub struct MessageIdArgs {
    pub message_id: String,
}

#[derive(Debug, Deserialize)]
pub struct ThreadIdArgs {
    pub thread_id: String,
}

#[derive(Debug, Deserialize)]
pub struct SendArgs {
    #[serde(deserialize_with = "one_or_many")]
    pub to: Vec<String>,
    pub subject: String,
    pub body: String,
    #[serde(default, deserialize_with = "one_or_many")]
    pub cc: Vec<String>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub bcc: Vec<String>,
    #[serde(default)]
    pub thread_id: Option<String>,
    #[serde(default)]
    pub in_reply_to: Option<String>,
}

impl From<SendArgs> for OutgoingEmail {
    fn from(args: SendArgs) -> Self {
        OutgoingEmail {
            to: args.to,
            cc: args.cc,
            bcc: args.bcc,
            subject: args.subject,
            body: args.body,
            thread_id: args.thread_id.filter(|t| !t.is_empty()),
            in_reply_to: args.in_reply_to.filter(|m| !m.is_empty()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct NoArgs {}

fn default_max_results() -> u32 {
    DEFAULT_MAX_RESULTS
}

fn default_label() -> String {
    "INBOX".into()
}

fn clamp_results(requested: u32) -> u32 {
    requested.clamp(1, MAX_RESULTS_LIMIT)
}

/// Accept either `"a@x.com"` or `["a@x.com", ...]`; a comma-separated string
/// is split into addresses.
fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    let addresses: Vec<String> = match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(s) => s.split(',').map(|a| a.trim().to_string()).collect(),
        OneOrMany::Many(v) => v.into_iter().map(|a| a.trim().to_string()).collect(),
    };
    Ok(addresses.into_iter().filter(|a| !a.is_empty()).collect())
}
