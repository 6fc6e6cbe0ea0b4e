//! RFC 6238 time-based one-time passwords (HMAC-SHA1, 6 digits, 30 s step).

use data_encoding::{BASE32, BASE32_NOPAD};
use hmac::{Hmac, Mac};
use rand::RngExt;
use sha1::Sha1;
use subtle::ConstantTimeEq;
use url::Url;

type HmacSha1 = Hmac<Sha1>;

pub const TOTP_DIGITS: usize = 6;
pub const TOTP_STEP_SECS: u64 = 30;
/// Steps accepted on either side of the current one.
pub const TOTP_SKEW_STEPS: u64 = 1;
/// 160-bit secrets, the RFC 4226 recommendation for SHA-1.
pub const TOTP_SECRET_BYTES: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TotpError {
    #[error("TOTP secret must be non-empty base32")]
    InvalidSecret,
    #[error("invalid otpauth uri: {0}")]
    InvalidUri(#[from] url::ParseError),
}

/// Fresh random secret, unpadded base32.
pub fn generate_secret() -> String {
    let bytes: [u8; TOTP_SECRET_BYTES] = rand::rng().random();
    BASE32_NOPAD.encode(&bytes)
}

/// Six ASCII digits, nothing else.
pub fn is_well_formed_code(code: &str) -> bool {
    code.len() == TOTP_DIGITS && code.bytes().all(|b| b.is_ascii_digit())
}

pub fn code_at(secret_base32: &str, unix_secs: u64) -> Result<String, TotpError> {
    let key = decode_secret(secret_base32)?;
    Ok(hotp(&key, unix_secs / TOTP_STEP_SECS))
}

/// Check `code` against the steps around `unix_secs`.
/// Malformed codes are rejected without touching the secret.
pub fn verify(secret_base32: &str, code: &str, unix_secs: u64) -> Result<bool, TotpError> {
    let key = decode_secret(secret_base32)?;
    if !is_well_formed_code(code) {
        return Ok(false);
    }
    let current = unix_secs / TOTP_STEP_SECS;
    let first = current.saturating_sub(TOTP_SKEW_STEPS);
    let matched = (first..=current + TOTP_SKEW_STEPS)
        .any(|counter| bool::from(hotp(&key, counter).as_bytes().ct_eq(code.as_bytes())));
    Ok(matched)
}

/// `otpauth://` URI for authenticator apps. The label is `issuer:account`.
pub fn provisioning_uri(
    secret_base32: &str,
    account: &str,
    issuer: &str,
) -> Result<String, TotpError> {
    let mut uri = Url::parse("otpauth://totp/")?;
    if let Ok(mut segments) = uri.path_segments_mut() {
        segments.push(&format!("{issuer}:{account}"));
    }
    uri.query_pairs_mut()
        .append_pair("secret", secret_base32)
        .append_pair("issuer", issuer);
    Ok(uri.into())
}

fn hotp(key: &[u8], counter: u64) -> String {
    // HMAC accepts keys of any length, so this cannot fail.
    let mut mac = match HmacSha1::new_from_slice(key) {
        Ok(mac) => mac,
        Err(_) => return String::new(),
    };
    mac.update(&counter.to_be_bytes());
    let digest = mac.finalize().into_bytes();

    let offset = (digest[digest.len() - 1] & 0x0f) as usize;
    let binary = ((digest[offset] as u32 & 0x7f) << 24)
        | ((digest[offset + 1] as u32) << 16)
        | ((digest[offset + 2] as u32) << 8)
        | (digest[offset + 3] as u32);
    let code = binary % 10u32.pow(TOTP_DIGITS as u32);
    format!("{code:0width$}", width = TOTP_DIGITS)
}

fn decode_secret(secret_base32: &str) -> Result<Vec<u8>, TotpError> {
    let normalized = secret_base32
        .trim()
        .replace([' ', '-'], "")
        .to_ascii_uppercase();
    let decoded = BASE32_NOPAD
        .decode(normalized.as_bytes())
        .or_else(|_| BASE32.decode(normalized.as_bytes()))
        .map_err(|_| TotpError::InvalidSecret)?;
    if decoded.is_empty() {
        return Err(TotpError::InvalidSecret);
    }
    Ok(decoded)
}
