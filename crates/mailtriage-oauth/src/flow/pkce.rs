//! Proof Key for Code Exchange (RFC 7636), `S256` only.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::Rng;
use sha2::{Digest, Sha256};

/// 32 random bytes encode to a 43-character verifier, the RFC minimum.
const VERIFIER_BYTES: usize = 32;

/// A code verifier and its `S256` challenge.
#[derive(Debug, Clone)]
pub struct PkceChallenge {
    verifier: String,
    challenge: String,
}

impl PkceChallenge {
    /// Draws a fresh verifier.
    #[must_use]
    pub fn generate() -> Self {
        let mut entropy = [0u8; VERIFIER_BYTES];
        rand::thread_rng().fill(&mut entropy);
        Self::from_verifier(URL_SAFE_NO_PAD.encode(entropy))
    }

    /// Derives the challenge of a known verifier.
    #[must_use]
    pub fn from_verifier(verifier: impl Into<String>) -> Self {
        let verifier = verifier.into();
        let digest = Sha256::digest(verifier.as_bytes());
        Self {
            challenge: URL_SAFE_NO_PAD.encode(digest),
            verifier,
        }
    }

    /// Sent with the code exchange.
    #[must_use]
    pub fn verifier(&self) -> &str {
        &self.verifier
    }

    /// Sent on the consent URL.
    #[must_use]
    pub fn challenge(&self) -> &str {
        &self.challenge
    }

    /// `code_challenge_method` value.
    #[must_use]
    pub const fn method(&self) -> &'static str {
        "S256"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_verifier() {
        let pkce = PkceChallenge::generate();
        assert_eq!(pkce.verifier().len(), 43);
        assert!(
            pkce.verifier()
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
        assert_ne!(PkceChallenge::generate().verifier(), pkce.verifier());
    }

    #[test]
    fn test_known_answer() {
        // RFC 7636 appendix B
        let pkce = PkceChallenge::from_verifier("dBjftJeZ4CVP-mB92K27uhbUJU1p1r_wW1gFWFOEjXk");
        assert_eq!(
            pkce.challenge(),
            "E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM"
        );
    }
}
