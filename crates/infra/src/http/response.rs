//! Parsing of non-200 response bodies

use clustersync_domain::ErrorPayload;
use serde::Deserialize;

/// Error document the control plane sends with a JSON content type.
#[derive(Debug, Default, Deserialize)]
struct ErrorDocument {
    #[serde(default)]
    error_code: Option<String>,
    #[serde(default)]
    message: Option<String>,
    /// Older endpoints put the text here instead of `message`.
    #[serde(default)]
    error: Option<String>,
}

/// Decide the shape of a failed response body.
///
/// Only a `Content-Type` containing `json` is parsed as an error document.
/// A JSON body that does not parse, and any other body, is kept as raw text.
pub fn parse_error_payload(content_type: Option<&str>, body: &[u8]) -> ErrorPayload {
    let text = String::from_utf8_lossy(body);

    if !content_type.is_some_and(|value| value.contains("json")) {
        return ErrorPayload::raw(text);
    }

    match serde_json::from_slice::<ErrorDocument>(body) {
        Ok(document) => ErrorPayload::Structured {
            code: document.error_code.filter(|code| !code.is_empty()),
            message: document.message.or(document.error).unwrap_or_default(),
        },
        Err(_) => ErrorPayload::raw(text),
    }
}
