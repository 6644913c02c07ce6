use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use password_hash::rand_core::OsRng;
use uuid::Uuid;

use crate::{
    db::DbPool,
    dto::{
        MessageResponse,
        auth::{Claims, LoginRequest, LoginResponse, RegisterRequest},
    },
    error::{AppError, AppResult},
    models::{ROLE_ADMIN, ROLE_CUSTOMER},
    repo::users::UserRepo,
};

pub async fn register_user(pool: &DbPool, payload: RegisterRequest) -> AppResult<MessageResponse> {
    let RegisterRequest {
        username,
        password,
        role,
    } = payload;

    let role = role.unwrap_or_else(|| ROLE_CUSTOMER.to_string());
    if role != ROLE_CUSTOMER && role != ROLE_ADMIN {
        return Err(AppError::BadRequest("Invalid role".into()));
    }

    let repo = UserRepo::new(pool);
    // Find-then-insert; the unique index on username is the only backstop
    // against a racing duplicate.
    if repo.find_by_username(&username).await?.is_some() {
        return Err(AppError::BadRequest("Username already exists".into()));
    }

    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        .to_string();

    let user = repo.insert(&username, &password_hash, &role).await?;
    tracing::info!(user_id = %user.id, "user registered");

    Ok(MessageResponse::new("User registered successfully"))
}

pub async fn login_user(pool: &DbPool, payload: LoginRequest) -> AppResult<LoginResponse> {
    let LoginRequest { username, password } = payload;

    let repo = UserRepo::new(pool);
    let user = match repo.find_by_username(&username).await? {
        Some(u) => u,
        None => return Err(AppError::BadRequest("Invalid credentials".into())),
    };

    let parsed_hash = PasswordHash::new(&user.password_hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;

    let argon2 = Argon2::default();
    if argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_err()
    {
        return Err(AppError::BadRequest("Invalid credentials".into()));
    }

    let secret = std::env::var("JWT_SECRET")
        .map_err(|_| AppError::Internal(anyhow::anyhow!("JWT_SECRET is not set")))?;

    let token = issue_token(secret.as_bytes(), user.id, &user.role)?;

    Ok(LoginResponse {
        token,
        role: user.role,
    })
}

pub fn issue_token(secret: &[u8], user_id: Uuid, role: &str) -> AppResult<String> {
    let expiration = Utc::now()
        .checked_add_signed(Duration::hours(24))
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;

    let claims = Claims {
        sub: user_id.to_string(),
        role: role.to_string(),
        exp: expiration.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::auth::decode_token;

    #[test]
    fn issued_token_round_trips_with_role_intact() {
        let user_id = Uuid::new_v4();
        let token = issue_token(b"test-secret", user_id, ROLE_ADMIN).unwrap();

        let claims = decode_token(b"test-secret", &token).unwrap();
        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.role, ROLE_ADMIN);
    }

    #[test]
    fn token_signed_with_another_secret_is_rejected() {
        let token = issue_token(b"test-secret", Uuid::new_v4(), ROLE_CUSTOMER).unwrap();
        assert!(decode_token(b"other-secret", &token).is_err());
    }
}
