//! Share token generation.

use rand::Rng;

use sharedrop_core::types::ShareToken;

const ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Characters per random fragment.
const FRAGMENT_LEN: usize = 10;

/// Generates share link tokens.
///
/// Tokens are unguessable enough for casual sharing but are not drawn from
/// a cryptographic source.
#[derive(Debug, Clone)]
pub struct LinkService;

impl LinkService {
    /// Creates a new link service.
    pub fn new() -> Self {
        Self
    }

    /// Generates a token made of two base-36 fragments.
    pub fn generate_token(&self) -> ShareToken {
        let mut rng = rand::rng();
        let mut token = String::with_capacity(FRAGMENT_LEN * 2);
        for _ in 0..2 {
            token.extend(
                (0..FRAGMENT_LEN).map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char),
            );
        }
        ShareToken::new(token)
    }
}

impl Default for LinkService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_token_shape() {
        let token = LinkService::new().generate_token();
        assert_eq!(token.as_str().len(), 20);
        assert!(
            token
                .as_str()
                .chars()
                .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase())
        );
    }

    #[test]
    fn test_tokens_do_not_repeat() {
        let links = LinkService::new();
        let tokens: HashSet<_> = (0..10_000).map(|_| links.generate_token()).collect();
        assert_eq!(tokens.len(), 10_000);
    }
}
