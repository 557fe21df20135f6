use chrono::Duration;
use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::Claims;
use super::errors::TokenError;

/// Issues and validates signed, time-bounded identity tokens.
///
/// HS256 over a shared secret; the secret should be at least 32 bytes and
/// come from configuration, never from code.
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    validity_hours: i64,
}

impl TokenIssuer {
    /// Create an issuer signing with `secret`, issuing tokens valid for
    /// `validity_hours` from the moment of issuance.
    pub fn new(secret: &[u8], validity_hours: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
            validity_hours,
        }
    }

    /// Generate a token binding `username` and the role set at issuance time.
    ///
    /// Deterministic in format, distinct in value per call: `iat`/`exp`
    /// advance with the clock.
    ///
    /// # Errors
    /// * `EncodingFailed` - signing failed
    pub fn generate(&self, username: &str, roles: &[String]) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = Claims {
            sub: username.to_string(),
            roles: roles.to_vec(),
            iat: now.timestamp(),
            exp: (now + Duration::hours(self.validity_hours)).timestamp(),
        };

        encode(&Header::new(self.algorithm), &claims, &self.encoding_key)
            .map_err(|e| TokenError::EncodingFailed(e.to_string()))
    }

    /// Verify signature and expiry, returning the full claim set.
    ///
    /// # Errors
    /// * `Expired` - token is past its `exp`
    /// * `Invalid` - bad signature or malformed token
    pub fn decode(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(self.algorithm);
        // No clock leeway: a token past its exp is rejected immediately
        validation.leeway = 0;

        let token_data =
            decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
                match e.kind() {
                    ErrorKind::ExpiredSignature => TokenError::Expired,
                    _ => TokenError::Invalid(e.to_string()),
                }
            })?;

        Ok(token_data.claims)
    }

    /// Verify the token and return only the username it binds.
    ///
    /// # Errors
    /// * `Expired` / `Invalid` - as for [`decode`](Self::decode)
    pub fn extract_username(&self, token: &str) -> Result<String, TokenError> {
        self.decode(token).map(|claims| claims.sub)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"test_secret_key_at_least_32_bytes!";

    fn roles(tags: &[&str]) -> Vec<String> {
        tags.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_generate_then_extract_username() {
        let issuer = TokenIssuer::new(SECRET, 24);

        let token = issuer
            .generate("alice", &roles(&["USER"]))
            .expect("Failed to generate token");
        assert!(!token.is_empty());

        let username = issuer
            .extract_username(&token)
            .expect("Failed to extract username");
        assert_eq!(username, "alice");
    }

    #[test]
    fn test_decode_preserves_roles_and_time_bounds() {
        let issuer = TokenIssuer::new(SECRET, 24);

        let token = issuer.generate("carol", &roles(&["ADMIN"])).unwrap();
        let claims = issuer.decode(&token).expect("Failed to decode token");

        assert_eq!(claims.sub, "carol");
        assert!(claims.has_role("ADMIN"));
        assert_eq!(claims.exp - claims.iat, 24 * 60 * 60);
    }

    #[test]
    fn test_expired_token_is_rejected() {
        // Negative validity puts exp in the past at issuance
        let issuer = TokenIssuer::new(SECRET, -1);

        let token = issuer.generate("alice", &roles(&["USER"])).unwrap();
        let result = issuer.extract_username(&token);

        assert!(matches!(result, Err(TokenError::Expired)));
    }

    #[test]
    fn test_tampered_signature_is_rejected() {
        let issuer = TokenIssuer::new(SECRET, 24);
        let other = TokenIssuer::new(b"a_completely_different_32b_secret!", 24);

        let token = issuer.generate("alice", &roles(&["USER"])).unwrap();
        let result = other.extract_username(&token);

        assert!(matches!(result, Err(TokenError::Invalid(_))));
    }

    #[test]
    fn test_malformed_token_is_rejected() {
        let issuer = TokenIssuer::new(SECRET, 24);

        let result = issuer.extract_username("not.a.token");
        assert!(matches!(result, Err(TokenError::Invalid(_))));
    }
}
