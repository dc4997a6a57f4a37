//! Share token generation.

use rand::Rng;

/// Random bytes per token; the hex form is twice as long.
const TOKEN_BYTES: usize = 32;

/// Generates a random share token of 64 lowercase hex characters.
pub fn generate_token() -> String {
    let mut rng = rand::thread_rng();
    let bytes: [u8; TOKEN_BYTES] = rng.r#gen();
    hex::encode(&bytes)
}

/// Hex encoding for token bytes.
mod hex {
    /// Encode bytes to a lowercase hex string.
    pub fn encode(bytes: &[u8]) -> String {
        bytes.iter().map(|b| format!("{b:02x}")).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_shape() {
        let token = generate_token();
        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_tokens_differ() {
        assert_ne!(generate_token(), generate_token());
    }
}
