//! Target URL extraction and validation.
//!
//! The `url` parameter goes through two decoding steps: the query string
//! decoding done while reading the parameter, then a strict query-unescape.
//! When the second step fails on a malformed escape, the value from the
//! first step is used as-is.

use std::borrow::Cow;

use percent_encoding::percent_decode_str;
use url::{form_urlencoded, Url};

use crate::relay::error::RelayError;

/// Name of the query parameter carrying the target URL.
pub const URL_PARAM: &str = "url";

/// Return the first non-empty `url` value from a raw query string.
pub fn url_param(query: Option<&str>) -> Option<String> {
    let query = query?;
    form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == URL_PARAM)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

/// Query-unescape `raw`, falling back to `raw` unchanged when it holds a
/// malformed escape or does not decode to UTF-8.
pub fn decode_target(raw: &str) -> String {
    query_unescape(raw).unwrap_or_else(|| raw.to_string())
}

/// Strict `application/x-www-form-urlencoded` component decoding.
///
/// `+` becomes a space and every `%` must be followed by two hex digits.
/// `percent_decode_str` alone passes malformed escapes through, so the
/// escapes are checked first and any bad one fails the whole decode.
fn query_unescape(raw: &str) -> Option<String> {
    let bytes = raw.as_bytes();
    let well_formed = bytes
        .iter()
        .enumerate()
        .filter(|(_, b)| **b == b'%')
        .all(|(i, _)| {
            matches!(bytes.get(i + 1..i + 3), Some(hex) if hex.iter().all(u8::is_ascii_hexdigit))
        });
    if !well_formed {
        return None;
    }

    let spaced = raw.replace('+', " ");
    percent_decode_str(&spaced)
        .decode_utf8()
        .ok()
        .map(Cow::into_owned)
}

/// Decode and parse a caller-supplied target. Only absolute `http`/`https`
/// URLs are accepted.
pub fn parse_target(raw: &str) -> Result<Url, RelayError> {
    let decoded = decode_target(raw);
    let url = Url::parse(&decoded).map_err(|_| RelayError::InvalidUrl)?;

    match url.scheme() {
        "http" | "https" if url.host_str().is_some() => Ok(url),
        _ => Err(RelayError::InvalidUrl),
    }
}
