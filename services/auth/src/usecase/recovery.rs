//! Single-use recovery codes.
//!
//! Codes are ten lowercase hex characters. Only ciphertext is stored; a
//! presented code is matched by decrypting each stored row and comparing in
//! constant time, then the matching row is deleted.

use data_encoding::HEXLOWER;
use rand::RngExt;
use subtle::ConstantTimeEq;
use uuid::Uuid;

use crate::domain::repository::CredentialStore;
use crate::domain::types::{RECOVERY_CODE_BYTES, RECOVERY_CODE_COUNT};
use crate::error::AuthServiceError;
use crate::infra::crypto::SecretCipher;

/// A fresh batch of plaintext codes. Shown to the user once, then encrypted.
pub fn generate_recovery_codes(count: usize) -> Vec<String> {
    let mut rng = rand::rng();
    (0..count)
        .map(|_| {
            let bytes: [u8; RECOVERY_CODE_BYTES] = rng.random();
            HEXLOWER.encode(&bytes)
        })
        .collect()
}

/// Trimmed and lowercased. Inner characters are compared as given.
pub fn normalize_recovery_code(input: &str) -> String {
    input.trim().to_lowercase()
}

pub fn encrypt_codes(
    cipher: &SecretCipher,
    codes: &[String],
) -> Result<Vec<String>, AuthServiceError> {
    codes
        .iter()
        .map(|code| {
            cipher
                .encrypt(code)
                .map_err(|e| AuthServiceError::Internal(e.into()))
        })
        .collect()
}

/// Generate, encrypt and return `(plaintext, ciphertext)` batches.
pub fn new_recovery_batch(
    cipher: &SecretCipher,
) -> Result<(Vec<String>, Vec<String>), AuthServiceError> {
    let codes = generate_recovery_codes(RECOVERY_CODE_COUNT);
    let encrypted = encrypt_codes(cipher, &codes)?;
    Ok((codes, encrypted))
}

/// Consume `candidate` if it matches one of the user's stored codes.
///
/// Rows that fail to decrypt are skipped. Returns `false` when nothing
/// matched, or when a concurrent request deleted the row first.
pub async fn consume_recovery_code<U: CredentialStore>(
    users: &U,
    cipher: &SecretCipher,
    user_id: Uuid,
    candidate: &str,
) -> Result<bool, AuthServiceError> {
    let candidate = normalize_recovery_code(candidate);
    if candidate.is_empty() {
        return Ok(false);
    }

    let stored = users.list_recovery_codes(user_id).await?;
    let mut matched = None;
    for row in &stored {
        let plain = match cipher.decrypt(&row.encrypted_code) {
            Ok(plain) => plain,
            Err(e) => {
                tracing::warn!(user_id = %user_id, code_id = %row.id, error = %e, "undecryptable recovery code skipped");
                continue;
            }
        };
        if bool::from(plain.as_bytes().ct_eq(candidate.as_bytes())) && matched.is_none() {
            matched = Some(row.id);
        }
    }

    match matched {
        Some(id) => users.consume_recovery_code(id).await,
        None => Ok(false),
    }
}
