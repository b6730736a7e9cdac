//! Minimal MIME helpers: building outgoing RFC 2822 messages and decoding
//! the base64url bodies the Gmail API hands back.

use base64::Engine;
use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use mailpilot_core::error::MailError;
use mailpilot_core::mail::OutgoingEmail;

/// Reject messages that can't be sent as-is.
///
/// Header values must not contain line breaks, otherwise a model-supplied
/// subject could inject extra headers.
pub fn validate_outgoing(email: &OutgoingEmail) -> Result<(), MailError> {
    if email.to.is_empty() {
        return Err(MailError::InvalidRequest("at least one recipient is required".into()));
    }

    for addr in email.to.iter().chain(&email.cc).chain(&email.bcc) {
        if !addr.contains('@') {
            return Err(MailError::InvalidRequest(format!("invalid email address: {addr}")));
        }
    }

    let header_values = email
        .to
        .iter()
        .chain(&email.cc)
        .chain(&email.bcc)
        .chain(std::iter::once(&email.subject))
        .chain(email.in_reply_to.iter());
    for value in header_values {
        if value.contains('\r') || value.contains('\n') {
            return Err(MailError::InvalidRequest("header values must be single-line".into()));
        }
    }

    Ok(())
}

/// Render an outgoing email as an RFC 2822 message with CRLF line endings.
pub fn build_rfc2822(email: &OutgoingEmail) -> String {
    let mut out = String::new();
    out.push_str(&format!("To: {}\r\n", email.to.join(", ")));
    if !email.cc.is_empty() {
        out.push_str(&format!("Cc: {}\r\n", email.cc.join(", ")));
    }
    if !email.bcc.is_empty() {
        out.push_str(&format!("Bcc: {}\r\n", email.bcc.join(", ")));
    }
    out.push_str(&format!("Subject: {}\r\n", encode_header(&email.subject)));
    if let Some(reply_to) = &email.in_reply_to {
        out.push_str(&format!("In-Reply-To: {reply_to}\r\n"));
        out.push_str(&format!("References: {reply_to}\r\n"));
    }
    out.push_str("MIME-Version: 1.0\r\n");
    out.push_str("Content-Type: text/plain; charset=\"UTF-8\"\r\n");
    out.push_str("Content-Transfer-Encoding: 8bit\r\n");
    out.push_str("\r\n");
    out.push_str(&normalize_newlines(&email.body));
    out
}

/// RFC 2047 encoded-word for non-ASCII header text; ASCII passes through.
fn encode_header(value: &str) -> String {
    if value.is_ascii() {
        value.to_string()
    } else {
        format!("=?UTF-8?B?{}?=", STANDARD.encode(value.as_bytes()))
    }
}

fn normalize_newlines(body: &str) -> String {
    body.replace("\r\n", "\n").replace('\n', "\r\n")
}

/// Encode bytes as unpadded base64url (Gmail's `raw` format).
pub fn encode_base64url(data: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(data)
}

/// Decode base64url text, with or without padding, into UTF-8 (lossy).
pub fn decode_base64url(data: &str) -> Result<String, MailError> {
    let trimmed = data.trim().trim_end_matches('=');
    let bytes = URL_SAFE_NO_PAD
        .decode(trimmed)
        .map_err(|e| MailError::InvalidResponse(format!("body is not valid base64url: {e}")))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Crude HTML-to-text conversion for messages without a text/plain part.
pub fn strip_html(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut in_tag = false;
    let mut tag = String::new();

    for ch in html.chars() {
        match ch {
            '<' => {
                in_tag = true;
                tag.clear();
            }
            '>' if in_tag => {
                in_tag = false;
                let name = tag
                    .trim_start_matches('/')
                    .split(|c: char| c.is_whitespace() || c == '/')
                    .next()
                    .unwrap_or("")
                    .to_ascii_lowercase();
                if matches!(name.as_str(), "br" | "p" | "div" | "tr" | "li" | "h1" | "h2" | "h3") {
                    text.push('\n');
                }
            }
            _ if in_tag => tag.push(ch),
            _ => text.push(ch),
        }
    }

    let decoded = text
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&");

    decoded
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outgoing() -> OutgoingEmail {
        OutgoingEmail {
            to: vec!["alice@example.com".into(), "bob@example.com".into()],
            subject: "Quarterly report".into(),
            body: "Hi,\nAttached.\n".into(),
            ..OutgoingEmail::default()
        }
    }

    #[test]
    fn builds_headers_and_crlf_body() {
        let raw = build_rfc2822(&outgoing());
        assert!(raw.starts_with("To: alice@example.com, bob@example.com\r\n"));
        assert!(raw.contains("Subject: Quarterly report\r\n"));
        assert!(!raw.contains("Cc:"));
        assert!(raw.ends_with("\r\n\r\nHi,\r\nAttached.\r\n"));
    }

    #[test]
    fn reply_headers_present_when_threading() {
        let email = OutgoingEmail {
            in_reply_to: Some("<abc@mail.gmail.com>".into()),
            thread_id: Some("t1".into()),
            ..outgoing()
        };
        let raw = build_rfc2822(&email);
        assert!(raw.contains("In-Reply-To: <abc@mail.gmail.com>\r\n"));
        assert!(raw.contains("References: <abc@mail.gmail.com>\r\n"));
    }

    #[test]
    fn non_ascii_subject_is_encoded() {
        let email = OutgoingEmail {
            subject: "Café".into(),
            ..outgoing()
        };
        let raw = build_rfc2822(&email);
        assert!(raw.contains("Subject: =?UTF-8?B?"));
    }

    #[test]
    fn base64url_handles_padding() {
        let encoded = encode_base64url("hello?>".as_bytes());
        assert!(!encoded.contains('='));
        assert_eq!(decode_base64url(&encoded).unwrap(), "hello?>");
        assert_eq!(decode_base64url("aGk=").unwrap(), "hi");
    }

    #[test]
    fn invalid_base64_is_error() {
        assert!(decode_base64url("***").is_err());
    }

    #[test]
    fn validation_rejects_bad_input() {
        let no_recipients = OutgoingEmail {
            to: vec![],
            ..outgoing()
        };
        assert!(validate_outgoing(&no_recipients).is_err());

        let bad_address = OutgoingEmail {
            to: vec!["not-an-address".into()],
            ..outgoing()
        };
        assert!(validate_outgoing(&bad_address).is_err());

        let injected = OutgoingEmail {
            subject: "Hi\r\nBcc: eve@example.com".into(),
            ..outgoing()
        };
        assert!(validate_outgoing(&injected).is_err());

        assert!(validate_outgoing(&outgoing()).is_ok());
    }

    #[test]
    fn strip_html_keeps_text() {
        let html = "<html><body><p>Hello&nbsp;there</p><div>Line &amp; more<br/>end</div></body></html>";
        assert_eq!(strip_html(html), "Hello there\nLine & more\nend");
    }
}
