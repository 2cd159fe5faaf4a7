//! Authentication service

use crate::storage::Database;
use anyhow::Result;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use lingo_core::ports::Authenticator;
use lingo_core::{AuthTokens, Identity, LingoError, User};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub struct AuthService {
    db: Arc<Database>,
    jwt_secret: String,
    token_ttl: Duration,
}

impl AuthService {
    pub fn new(db: Arc<Database>, jwt_secret: String, token_ttl: Duration) -> Self {
        Self {
            db,
            jwt_secret,
            token_ttl,
        }
    }

    pub async fn register(
        &self,
        email: &str,
        password: &str,
        name: Option<&str>,
    ) -> Result<(User, AuthTokens)> {
        // Hash password
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let password_hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?
            .to_string();

        let user = self.db.create_user(email, &password_hash, name).await?;
        let tokens = self.generate_token(&user.id)?;

        Ok((user, tokens))
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<(User, AuthTokens)> {
        if let Some((user, password_hash)) = self.db.get_user_by_email(email).await? {
            let parsed_hash = PasswordHash::new(&password_hash)
                .map_err(|e| anyhow::anyhow!("Invalid password hash: {}", e))?;

            if Argon2::default()
                .verify_password(password.as_bytes(), &parsed_hash)
                .is_ok()
            {
                let tokens = self.generate_token(&user.id)?;
                return Ok((user, tokens));
            }
        }

        anyhow::bail!("Invalid credentials")
    }

    /// Decode a token and return the user id it was issued to.
    pub fn validate_token(&self, token: &str) -> Result<String> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &Validation::default(),
        )?;

        Ok(token_data.claims.sub)
    }

    fn generate_token(&self, user_id: &str) -> Result<AuthTokens> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            exp: (now + self.token_ttl).timestamp(),
            iat: now.timestamp(),
        };

        let access_token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )?;

        Ok(AuthTokens {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.token_ttl.num_seconds(),
        })
    }
}

#[async_trait]
impl Authenticator for AuthService {
    async fn authenticate(&self, token: &str) -> lingo_core::Result<Identity> {
        let user_id = self
            .validate_token(token)
            .map_err(|e| LingoError::Unauthenticated(format!("Invalid token: {}", e)))?;

        match self.db.get_user_by_id(&user_id).await {
            Ok(Some(user)) => Ok(Identity {
                user_id: user.id,
                email: user.email,
            }),
            Ok(None) => Err(LingoError::Unauthenticated("User not found".to_string())),
            Err(e) => Err(LingoError::Database(e.to_string())),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String, // user_id
    exp: i64,
    iat: i64,
}
