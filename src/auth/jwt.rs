use crate::types::{AppError, Claims, Result};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

/// Token issuer for JWT management and password hashing.
///
/// Provides secure password hashing using Argon2id and JWT token
/// generation/verification using HS256.
pub struct TokenIssuer {
    jwt_secret: String,
    token_expiry: i64,
}

impl TokenIssuer {
    /// Creates a new TokenIssuer with the given configuration.
    ///
    /// # Arguments
    /// * `jwt_secret` - Secret key for signing JWTs (should be at least 32 chars)
    /// * `token_expiry` - Token validity in seconds
    pub fn new(jwt_secret: String, token_expiry: i64) -> Self {
        Self {
            jwt_secret,
            token_expiry,
        }
    }

    /// Token validity in seconds.
    pub fn token_expiry(&self) -> i64 {
        self.token_expiry
    }

    /// Hashes a password using Argon2id.
    ///
    /// Returns a PHC-formatted hash string.
    pub fn hash_password(&self, password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
    }

    /// Verifies a password against an Argon2 hash.
    pub fn verify_password(&self, password: &str, hash: &str) -> Result<bool> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| AppError::Internal(format!("Invalid password hash: {}", e)))?;

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Issues a token for `user_id` expiring `token_expiry` seconds from now.
    pub fn issue_token(&self, user_id: i64) -> Result<String> {
        self.issue_token_at(user_id, Utc::now())
    }

    /// Issues a token as if it had been issued at `issued_at`.
    pub fn issue_token_at(&self, user_id: i64, issued_at: DateTime<Utc>) -> Result<String> {
        let expires = Duration::try_seconds(self.token_expiry)
            .and_then(|lifetime| issued_at.checked_add_signed(lifetime))
            .ok_or_else(|| {
                AppError::Internal(format!("Token expiry {}s out of range", self.token_expiry))
            })?;

        let claims = Claims {
            user_id,
            exp: expires.timestamp() as usize,
            iat: issued_at.timestamp() as usize,
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(format!("Failed to generate token: {}", e)))
    }

    /// Verifies signature and expiration and returns the claims.
    pub fn verify_token(&self, token: &str) -> Result<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        self.decode_with(token, &validation)
    }

    /// Reads the `exp` claim of a correctly signed token, expired or not.
    pub fn expires_at(&self, token: &str) -> Result<i64> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        self.decode_with(token, &validation)
            .map(|claims| claims.exp as i64)
    }

    fn decode_with(&self, token: &str, validation: &Validation) -> Result<Claims> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            validation,
        )
        .map(|data| data.claims)
        .map_err(|_| AppError::AuthenticationFailed)
    }

    /// Hashes a token using SHA256 for storage in the blacklist.
    pub fn hash_token(&self, token: &str) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        hex::encode(hasher.finalize())
    }
}
