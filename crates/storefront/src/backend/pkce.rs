//! PKCE (RFC 7636) verifier/challenge pairs for the OAuth sign-in flow.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::seq::IndexedRandom;
use sha2::{Digest, Sha256};

/// Verifier length; RFC 7636 allows 43..=128.
const VERIFIER_LENGTH: usize = 64;

/// RFC 7636 "unreserved" characters.
const VERIFIER_CHARSET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-._~";

/// A code verifier kept server-side and the challenge sent to the provider.
#[derive(Clone)]
pub struct PkcePair {
    pub verifier: String,
    pub challenge: String,
}

impl PkcePair {
    /// Generate a fresh random pair.
    #[must_use]
    pub fn generate() -> Self {
        let verifier = random_verifier();
        let challenge = challenge_for(&verifier);
        Self {
            verifier,
            challenge,
        }
    }
}

/// S256 challenge: base64url (no padding) of the verifier's SHA-256.
#[must_use]
pub fn challenge_for(verifier: &str) -> String {
    URL_SAFE_NO_PAD.encode(Sha256::digest(verifier.as_bytes()))
}

fn random_verifier() -> String {
    let mut rng = rand::rng();
    (0..VERIFIER_LENGTH)
        .filter_map(|_| VERIFIER_CHARSET.choose(&mut rng).copied().map(char::from))
        .collect()
}
