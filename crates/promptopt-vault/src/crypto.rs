//! Key derivation and token sealing using the `ring` crate.
//!
//! This module provides the cryptographic primitives for the vault:
//!
//! - **Key derivation**: PBKDF2-HMAC-SHA256 producing a 256-bit key from a
//!   seed and salt. The production key is derived from fixed compile-time
//!   constants so the same key is available across process restarts without
//!   any key storage.
//! - **Token sealing**: AES-256-GCM authenticated encryption with a fresh
//!   random 96-bit nonce per call. A sealed token is the URL-safe base64
//!   (no padding) encoding of `nonce ‖ ciphertext ‖ tag`, safe to embed in a
//!   JSON config file.
//!
//! # Security Notes
//!
//! - Because the derivation inputs are constants, a sealed token protects
//!   the stored credential against casual inspection of the config file, not
//!   against an adversary who can run code on the same machine. This is a
//!   deliberate trade for zero-configuration persistence.
//! - Nonces are generated randomly for each sealing operation, so sealing
//!   the same plaintext twice yields different tokens.

use std::num::NonZeroU32;

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use ring::aead::{self, Aad, BoundKey, NONCE_LEN, Nonce, NonceSequence, SealingKey, UnboundKey};
use ring::pbkdf2;
use ring::rand::{SecureRandom, SystemRandom};

use crate::error::{Result, VaultError};

/// Length of the AES-256-GCM key in bytes.
pub const KEY_LEN: usize = 32;

/// Length of the AES-256-GCM nonce in bytes (96 bits).
pub const NONCE_LEN_BYTES: usize = NONCE_LEN;

/// Length of the GCM authentication tag in bytes.
pub const TAG_LEN: usize = 16;

/// PBKDF2 iteration count for the vault key.
pub const PBKDF2_ITERATIONS: u32 = 100_000;

/// Fixed derivation seed. Together with [`KEY_SALT`] this pins the vault key
/// to the application rather than to a user passphrase; changing either
/// constant invalidates every previously stored token.
const KEY_SEED: &[u8] = b"promptopt-vault-key-material-v1";

/// Fixed derivation salt, companion to [`KEY_SEED`].
const KEY_SALT: &[u8] = b"promptopt-vault-salt-v1";

/// PBKDF2 algorithm: HMAC-SHA256.
static PBKDF2_ALG: pbkdf2::Algorithm = pbkdf2::PBKDF2_HMAC_SHA256;

/// AES-256-GCM algorithm from `ring`.
static AEAD_ALG: &aead::Algorithm = &aead::AES_256_GCM;

// ---------------------------------------------------------------------------
// Key derivation
// ---------------------------------------------------------------------------

/// Derive a 256-bit key from `seed` and `salt` using PBKDF2-HMAC-SHA256.
///
/// Deterministic and side-effect-free: identical inputs always produce the
/// identical key, across calls and across process restarts. There is no
/// failure path — the signature only admits well-formed inputs.
pub fn derive_key(seed: &[u8], salt: &[u8], iterations: NonZeroU32) -> [u8; KEY_LEN] {
    let mut key = [0u8; KEY_LEN];
    pbkdf2::derive(PBKDF2_ALG, iterations, salt, seed, &mut key);
    key
}

/// The vault key, derived from the fixed application constants.
pub fn vault_key() -> [u8; KEY_LEN] {
    let iterations = NonZeroU32::new(PBKDF2_ITERATIONS).expect("PBKDF2_ITERATIONS is non-zero");
    derive_key(KEY_SEED, KEY_SALT, iterations)
}

// ---------------------------------------------------------------------------
// Nonce handling
// ---------------------------------------------------------------------------

/// A single-use nonce sequence that yields exactly one nonce and then errors.
///
/// `ring` requires a [`NonceSequence`] for sealing operations. Since we
/// generate a fresh random nonce per sealing call, this wrapper ensures each
/// sealing key is used exactly once.
struct SingleNonce(Option<[u8; NONCE_LEN_BYTES]>);

impl SingleNonce {
    fn new(bytes: [u8; NONCE_LEN_BYTES]) -> Self {
        Self(Some(bytes))
    }
}

impl NonceSequence for SingleNonce {
    fn advance(&mut self) -> std::result::Result<Nonce, ring::error::Unspecified> {
        self.0
            .take()
            .map(Nonce::assume_unique_for_key)
            .ok_or(ring::error::Unspecified)
    }
}

// ---------------------------------------------------------------------------
// Token sealing
// ---------------------------------------------------------------------------

/// Seal `plaintext` into an opaque text token under the given 256-bit `key`.
///
/// The token is `base64url(nonce ‖ ciphertext ‖ tag)` with a randomly
/// generated nonce, so repeated sealing of the same plaintext produces
/// different tokens.
///
/// # Errors
///
/// Returns [`VaultError::EncryptionFailed`] if nonce generation or the AEAD
/// seal fails.
pub fn seal_token(plaintext: &str, key: &[u8; KEY_LEN]) -> Result<String> {
    let rng = SystemRandom::new();

    let mut nonce_bytes = [0u8; NONCE_LEN_BYTES];
    rng.fill(&mut nonce_bytes)
        .map_err(|_| VaultError::EncryptionFailed {
            reason: "failed to generate random nonce".into(),
        })?;

    let unbound_key = UnboundKey::new(AEAD_ALG, key).map_err(|_| VaultError::EncryptionFailed {
        reason: "failed to create AES-256-GCM key".into(),
    })?;

    let mut sealing_key = SealingKey::new(unbound_key, SingleNonce::new(nonce_bytes));

    // `ring` encrypts in-place and appends the authentication tag.
    let mut in_out = plaintext.as_bytes().to_vec();
    sealing_key
        .seal_in_place_append_tag(Aad::empty(), &mut in_out)
        .map_err(|_| VaultError::EncryptionFailed {
            reason: "seal_in_place failed".into(),
        })?;

    let mut framed = Vec::with_capacity(NONCE_LEN_BYTES + in_out.len());
    framed.extend_from_slice(&nonce_bytes);
    framed.extend_from_slice(&in_out);

    tracing::trace!(
        plaintext_len = plaintext.len(),
        token_len = framed.len(),
        "sealed credential token"
    );

    Ok(URL_SAFE_NO_PAD.encode(framed))
}

/// Open a token produced by [`seal_token`] and recover the plaintext.
///
/// # Errors
///
/// Returns [`VaultError::DecryptionFailed`] if the token is not valid
/// base64, is too short to contain a nonce and tag, fails authentication
/// (wrong key or tampered data), or does not decrypt to valid UTF-8.
pub fn open_token(token: &str, key: &[u8; KEY_LEN]) -> Result<String> {
    let framed = URL_SAFE_NO_PAD
        .decode(token)
        .map_err(|e| VaultError::DecryptionFailed {
            reason: format!("token is not valid base64: {e}"),
        })?;

    if framed.len() < NONCE_LEN_BYTES + TAG_LEN {
        return Err(VaultError::DecryptionFailed {
            reason: "token is too short".into(),
        });
    }

    let (nonce_bytes, ciphertext) = framed.split_at(NONCE_LEN_BYTES);
    let mut nonce = [0u8; NONCE_LEN_BYTES];
    nonce.copy_from_slice(nonce_bytes);

    let unbound_key = UnboundKey::new(AEAD_ALG, key).map_err(|_| VaultError::DecryptionFailed {
        reason: "failed to create AES-256-GCM key".into(),
    })?;

    let mut opening_key = aead::OpeningKey::new(unbound_key, SingleNonce::new(nonce));

    let mut in_out = ciphertext.to_vec();
    let plaintext = opening_key
        .open_in_place(Aad::empty(), &mut in_out)
        .map_err(|_| VaultError::DecryptionFailed {
            reason: "authentication failed — wrong key or corrupted token".into(),
        })?;

    String::from_utf8(plaintext.to_vec()).map_err(|_| VaultError::DecryptionFailed {
        reason: "decrypted data is not valid UTF-8".into(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
