use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::HttpError;

type HmacSha256 = Hmac<Sha256>;

/// Computes the request signature expected by the upstream API.
///
/// The message is `"{timestamp}\n{raw_body}"` where `raw_body` must be the
/// exact bytes sent on the wire. The result is lowercase hex.
///
/// # Errors
///
/// Returns an error when the secret cannot be used as an HMAC key.
pub fn sign_payload(secret: &[u8], timestamp: i64, raw_body: &str) -> Result<String, HttpError> {
    let mut mac = HmacSha256::new_from_slice(secret).map_err(|err| HttpError::InvalidSigningKey {
        message: err.to_string(),
    })?;
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b"\n");
    mac.update(raw_body.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}
