//! Opaque secret generation and digesting.
//!
//! Refresh and reset credentials are unguessable random strings, not JWTs.
//! The data store holds only their SHA-256 digest; a presented secret is
//! digested and matched by exact, unique lookup.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngCore;
use sha2::{Digest, Sha256};

/// Entropy of a generated secret, in bytes.
const SECRET_BYTES: usize = 32;

/// Generates a fresh opaque secret (URL-safe base64 of 32 CSPRNG bytes).
pub fn generate() -> String {
    let mut bytes = [0u8; SECRET_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Returns the lowercase SHA-256 hex digest of a secret.
pub fn digest(secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(secret.as_bytes());
    let out = hasher.finalize();
    let mut hex = String::with_capacity(out.len() * 2);
    for byte in out {
        use std::fmt::Write;
        let _ = write!(hex, "{byte:02x}");
    }
    hex
}
