//! Textual link forms wrapping encoded loadout bytes.
//!
//! Two forms are produced and accepted:
//!
//! - `lsml://<base64>` using the standard alphabet with padding
//! - `<base>?lsml=<base64>` using the URL-safe alphabet without padding

use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Scheme prefix of the compact link form.
pub const LSML_SCHEME: &str = "lsml://";

/// Query parameter carrying the payload in HTTP links.
pub const LINK_QUERY_PARAM: &str = "lsml";

/// Base URL used for HTTP links when none is supplied.
pub const DEFAULT_HTTP_BASE: &str = "https://mechlab.invalid/loadout";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkStyle {
    #[default]
    Lsml,
    Http,
}

/// Wrap encoded loadout bytes as a link. HTTP links use [`DEFAULT_HTTP_BASE`].
pub fn encode_link(bytes: &[u8], style: LinkStyle) -> String {
    match style {
        LinkStyle::Lsml => format!("{LSML_SCHEME}{}", STANDARD.encode(bytes)),
        LinkStyle::Http => encode_http_link(bytes, DEFAULT_HTTP_BASE),
    }
}

/// HTTP link form with an explicit base URL.
pub fn encode_http_link(bytes: &[u8], base: &str) -> String {
    let separator = if base.contains('?') { '&' } else { '?' };
    format!(
        "{base}{separator}{LINK_QUERY_PARAM}={}",
        URL_SAFE_NO_PAD.encode(bytes)
    )
}

/// Extract the encoded loadout bytes from either link form.
pub fn decode_link(link: &str) -> Result<Vec<u8>> {
    let link = link.trim();
    if let Some(payload) = link.strip_prefix(LSML_SCHEME) {
        return decode_payload(payload, LinkStyle::Lsml);
    }
    let payload = link
        .split_once('?')
        .and_then(|(_, query)| {
            query
                .split('&')
                .filter_map(|pair| pair.split_once('='))
                .find(|(key, _)| *key == LINK_QUERY_PARAM)
                .map(|(_, value)| value)
        })
        .ok_or_else(|| Error::LinkFormat {
            link: link.to_string(),
        })?;
    decode_payload(payload, LinkStyle::Http)
}

fn decode_payload(payload: &str, style: LinkStyle) -> Result<Vec<u8>> {
    let decoded = match style {
        LinkStyle::Lsml => STANDARD.decode(payload),
        LinkStyle::Http => URL_SAFE_NO_PAD.decode(payload),
    };
    decoded.map_err(|source| Error::Base64Decode { source })
}
