//! Shared request plumbing for the Google adapters.

use daybell_core::error::{DaybellError, Result};
use serde::de::DeserializeOwned;

/// Send `request` and decode a JSON body, tagging every failure with `source`.
pub(crate) async fn send_json<T: DeserializeOwned>(
    source: &str,
    request: reqwest::RequestBuilder,
) -> Result<T> {
    let response = request
        .send()
        .await
        .map_err(|e| DaybellError::provider(source, format!("request failed: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let hint = match status {
            reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN => {
                " (token rejected, re-run authorization)"
            }
            reqwest::StatusCode::TOO_MANY_REQUESTS => " (rate limited)",
            _ => "",
        };
        return Err(DaybellError::provider(
            source,
            format!("HTTP {status}{hint}: {}", truncate(&body, 300)),
        ));
    }

    response
        .json::<T>()
        .await
        .map_err(|e| DaybellError::provider(source, format!("invalid response: {e}")))
}

fn truncate(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
