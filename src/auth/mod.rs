use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use argon2::password_hash::{SaltString, rand_core::OsRng};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    domain::{Role, User},
    error::{AppError, Result},
};

/// Claims carried by a bearer credential.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// The user's gid
    pub sub: String,
    pub role: Role,
    /// Token version of the user when the credential was issued
    pub ver: i64,
    pub iat: i64,
    pub exp: i64,
}

/// Issues and verifies HS256 bearer credentials.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
            ttl,
        }
    }

    pub fn issue(&self, user: &User) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.gid.clone(),
            role: user.role,
            ver: user.token_version,
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Token encoding failed: {}", e)))
    }

    /// Decodes a credential. Any failure (bad signature, malformed, expired) is `Forbidden`.
    pub fn verify(&self, token: &str) -> Result<Claims> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!("Rejected credential: {}", e);
                AppError::Forbidden
            })
    }
}

pub async fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| AppError::Internal(format!("Invalid password hash: {}", e)))?;

    let argon2 = Argon2::default();

    Ok(argon2.verify_password(password.as_bytes(), &parsed_hash).is_ok())
}

pub async fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?;

    Ok(password_hash.to_string())
}

/// Random four digit numeric password for newly created students.
pub fn generate_pin() -> String {
    rand::thread_rng().gen_range(1000..=9999).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: Role, token_version: i64) -> User {
        let now = Utc::now();
        User {
            gid: "Aurapass-YCP-0042".to_string(),
            name: Some("Test".to_string()),
            role,
            email: None,
            phone: None,
            token_version,
            password_changed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_token_round_trip() {
        let service = TokenService::new("secret", Duration::hours(1));
        let token = service.issue(&user(Role::Admin, 3)).unwrap();

        let claims = service.verify(&token).unwrap();
        assert_eq!(claims.sub, "Aurapass-YCP-0042");
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.ver, 3);
    }

    #[test]
    fn test_token_from_other_secret_is_forbidden() {
        let issuer = TokenService::new("secret-a", Duration::hours(1));
        let verifier = TokenService::new("secret-b", Duration::hours(1));
        let token = issuer.issue(&user(Role::Student, 0)).unwrap();

        assert!(matches!(verifier.verify(&token), Err(AppError::Forbidden)));
    }

    #[test]
    fn test_expired_token_is_forbidden() {
        let service = TokenService::new("secret", Duration::hours(-2));
        let token = service.issue(&user(Role::Student, 0)).unwrap();

        assert!(matches!(service.verify(&token), Err(AppError::Forbidden)));
    }

    #[test]
    fn test_garbage_token_is_forbidden() {
        let service = TokenService::new("secret", Duration::hours(1));
        assert!(matches!(service.verify("not.a.token"), Err(AppError::Forbidden)));
    }

    #[test]
    fn test_generate_pin() {
        for _ in 0..100 {
            let pin = generate_pin();
            assert_eq!(pin.len(), 4);
            let value: u32 = pin.parse().unwrap();
            assert!((1000..=9999).contains(&value));
        }
    }

    #[tokio::test]
    async fn test_password_hashing() {
        let hash = hash_password("456").await.unwrap();
        assert_ne!(hash, "456");
        assert!(verify_password("456", &hash).await.unwrap());
        assert!(!verify_password("457", &hash).await.unwrap());
    }
}
