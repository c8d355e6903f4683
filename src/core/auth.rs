//! Credential-based authentication
//!
//! A login attempt is checked in three steps: shape validation of the
//! submitted credentials (a syntactically valid email and a password of at
//! least six characters), a single parameterized lookup by email, and an
//! Argon2id verification against the stored PHC hash. All three failure
//! modes collapse into `None` so a caller cannot distinguish an unknown
//! email from a wrong password.

use crate::core::service::UserStore;
use anyhow::{Result, anyhow};
use argon2::password_hash::SaltString;
use argon2::password_hash::rand_core::OsRng;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use uuid::Uuid;

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern"));

/// Minimum accepted password length
pub const MIN_PASSWORD_LEN: usize = 6;

/// A user row as stored
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    /// Argon2id PHC-format hash; never serialized
    #[serde(skip_serializing)]
    pub password_hash: String,
}

/// Credentials as submitted by the login form
#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    /// Shape check performed before any store access
    pub fn is_well_formed(&self) -> bool {
        EMAIL_PATTERN.is_match(&self.email) && self.password.len() >= MIN_PASSWORD_LEN
    }
}

/// Check credentials against the user store.
///
/// Returns `Ok(None)` for malformed credentials, unknown email, or password
/// mismatch; malformed credentials short-circuit without touching the store.
/// `Err` is reserved for store failures and unreadable stored hashes.
pub async fn authorize(users: &dyn UserStore, credentials: &Credentials) -> Result<Option<User>> {
    if !credentials.is_well_formed() {
        tracing::info!("rejected malformed login credentials");
        return Ok(None);
    }

    let Some(user) = users.user_by_email(&credentials.email).await? else {
        tracing::info!(email = %credentials.email, "login attempt for unknown user");
        return Ok(None);
    };

    if verify_password(&credentials.password, &user.password_hash)? {
        Ok(Some(user))
    } else {
        tracing::info!(email = %credentials.email, "login attempt with wrong password");
        Ok(None)
    }
}

/// Verify a password against an Argon2id PHC-format hash.
///
/// An unparseable stored hash is an error (corrupt data), a mismatch is
/// `Ok(false)`.
pub fn verify_password(password: &str, phc_hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(phc_hash)
        .map_err(|e| anyhow!("stored password hash is not a valid PHC string: {}", e))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Hash a password with Argon2id and a fresh random salt.
///
/// Used when seeding users; the dashboard itself never writes passwords.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow!("failed to hash password: {}", e))?;
    Ok(hash.to_string())
}
