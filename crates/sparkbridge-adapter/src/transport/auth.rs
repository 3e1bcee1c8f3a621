//! Spark websocket URL signing
//!
//! The handshake URL carries an HMAC-SHA256 signature over the host,
//! the request date and the request line, keyed by the API secret.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use hmac::{Hmac, Mac};
use jiff::Timestamp;
use sha2::Sha256;
use url::Url;

use crate::error::{AdapterError, VendorFailure};

type HmacSha256 = Hmac<Sha256>;

/// RFC 1123 date, as expected in the `date` query parameter
const DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Produce the authenticated handshake URL for `endpoint` at time `now`
pub fn signed_url(endpoint: &Url, api_key: &str, api_secret: &str, now: Timestamp) -> Result<Url, AdapterError> {
    let host = endpoint
        .host_str()
        .ok_or_else(|| VendorFailure::Transport(format!("endpoint has no host: {endpoint}")))?;
    let host = match endpoint.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_owned(),
    };

    let date = now.strftime(DATE_FORMAT).to_string();
    let signature_origin = format!("host: {host}\ndate: {date}\nGET {} HTTP/1.1", endpoint.path());

    let mut mac = HmacSha256::new_from_slice(api_secret.as_bytes())
        .map_err(|e| anyhow::anyhow!("invalid api secret for hmac: {e}"))?;
    mac.update(signature_origin.as_bytes());
    let signature = STANDARD.encode(mac.finalize().into_bytes());

    let authorization_origin = format!(
        r#"api_key="{api_key}", algorithm="hmac-sha256", headers="host date request-line", signature="{signature}""#
    );
    let authorization = STANDARD.encode(authorization_origin);

    let mut url = endpoint.clone();
    url.query_pairs_mut()
        .append_pair("authorization", &authorization)
        .append_pair("date", &date)
        .append_pair("host", &host);

    Ok(url)
}
