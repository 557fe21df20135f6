use serde::Deserialize;
use serde::Serialize;

/// Claims carried by every identity token.
///
/// Fixed shape rather than a generic claims map: the service only ever
/// binds a username and the role set held at issuance time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject: the authenticated username
    pub sub: String,

    /// Role tags held at issuance time (e.g. "USER", "ADMIN")
    pub roles: Vec<String>,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// True if the token carries the given role tag.
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_role() {
        let claims = Claims {
            sub: "alice".to_string(),
            roles: vec!["USER".to_string(), "ADMIN".to_string()],
            iat: 0,
            exp: 0,
        };

        assert!(claims.has_role("ADMIN"));
        assert!(claims.has_role("USER"));
        assert!(!claims.has_role("AUDITOR"));
    }
}
