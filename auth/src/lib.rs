//! Authentication primitives for the login service
//!
//! Two building blocks, kept free of service domain logic:
//! - Password hashing (Argon2id, PHC string format)
//! - Signed, time-bounded identity tokens (JWT, HS256) carrying a username
//!   and a role set
//!
//! The service composes these; nothing here touches storage or HTTP.
//!
//! # Examples
//!
//! ```
//! use auth::{PasswordHasher, TokenIssuer};
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("hunter2").unwrap();
//! assert!(hasher.verify("hunter2", &hash).unwrap());
//!
//! let issuer = TokenIssuer::new(b"secret_key_at_least_32_bytes_long!", 24);
//! let token = issuer.generate("alice", &["USER".to_string()]).unwrap();
//! assert_eq!(issuer.extract_username(&token).unwrap(), "alice");
//! ```

pub mod password;
pub mod token;

pub use password::PasswordError;
pub use password::PasswordHasher;
pub use token::Claims;
pub use token::TokenError;
pub use token::TokenIssuer;
