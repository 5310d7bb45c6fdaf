use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use thiserror::Error;

use crate::config::AuthSettings;
use crate::database::connection::DbPool;
use crate::models::auth::Claims;
use crate::models::user::{User, UserError};

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
    #[error(transparent)]
    User(#[from] UserError),
}

/// Issues and checks the HS256 tokens organizers use to manage funds.
pub struct AuthService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_ttl_hours: i64,
}

impl AuthService {
    pub fn new(settings: &AuthSettings) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(settings.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(settings.jwt_secret.as_bytes()),
            token_ttl_hours: settings.token_ttl_hours,
        }
    }

    pub fn generate_token(&self, user: &User) -> Result<String, AuthError> {
        let claims = Claims::new(user.id, user.email.clone(), self.token_ttl_hours);
        Ok(encode(&Header::default(), &claims, &self.encoding_key)?)
    }

    pub fn verify_token(&self, token: &str) -> Result<Claims, AuthError> {
        let data = decode::<Claims>(token, &self.decoding_key, &Validation::default())?;
        Ok(data.claims)
    }

    pub async fn authenticate_user(
        &self,
        pool: &DbPool,
        email: &str,
        password: &str,
    ) -> Result<Option<User>, AuthError> {
        Ok(User::authenticate(pool, email, password).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn settings(secret: &str) -> AuthSettings {
        AuthSettings {
            jwt_secret: secret.to_string(),
            token_ttl_hours: 1,
        }
    }

    fn organizer() -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            fullname: "Lena".to_string(),
            email: "lena@example.com".to_string(),
            password_hash: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn issued_token_verifies_to_same_user() {
        let service = AuthService::new(&settings("secret"));
        let user = organizer();

        let token = service.generate_token(&user).unwrap();
        let claims = service.verify_token(&token).unwrap();

        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.email, user.email);
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let issuer = AuthService::new(&settings("one"));
        let verifier = AuthService::new(&settings("two"));
        let token = issuer.generate_token(&organizer()).unwrap();

        assert!(verifier.verify_token(&token).is_err());
    }
}
