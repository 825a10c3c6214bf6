//! Authentication service
//!
//! Registration and login with bcrypt password hashing and JWT issuance.

use chrono::{DateTime, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::config::JwtConfig;
use crate::error::{AppError, AppResult};
use crate::middleware::Claims;
use shared::{validate_email, validate_password, User, UserRole};

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    db: PgPool,
    jwt: JwtConfig,
}

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    full_name: String,
    role: String,
    password_hash: String,
    created_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> AppResult<User> {
        let role = UserRole::from_str(&self.role)
            .ok_or_else(|| AppError::Internal(format!("unknown role '{}' in store", self.role)))?;
        Ok(User {
            id: self.id,
            email: self.email,
            full_name: self.full_name,
            role,
            created_at: self.created_at,
        })
    }
}

/// Registration request
#[derive(Debug, Deserialize)]
pub struct RegisterInput {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub role: UserRole,
}

/// Login request
#[derive(Debug, Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Successful authentication response
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

impl AuthService {
    /// Create a new AuthService instance
    pub fn new(db: PgPool, jwt: JwtConfig) -> Self {
        Self { db, jwt }
    }

    /// Register a new user and issue a token
    pub async fn register(&self, input: RegisterInput) -> AppResult<AuthResponse> {
        validate_email(&input.email).map_err(|msg| AppError::Validation {
            field: "email".to_string(),
            message: msg.to_string(),
        })?;
        validate_password(&input.password).map_err(|msg| AppError::Validation {
            field: "password".to_string(),
            message: msg.to_string(),
        })?;
        if input.full_name.trim().is_empty() {
            return Err(AppError::Validation {
                field: "full_name".to_string(),
                message: "Full name cannot be empty".to_string(),
            });
        }

        let existing = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE email = $1")
            .bind(&input.email)
            .fetch_one(&self.db)
            .await?;
        if existing > 0 {
            return Err(AppError::DuplicateEntry("email".to_string()));
        }

        let password_hash = bcrypt::hash(&input.password, bcrypt::DEFAULT_COST)
            .map_err(|e| AppError::Internal(format!("password hashing failed: {}", e)))?;

        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (email, full_name, role, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING id, email, full_name, role, password_hash, created_at
            "#,
        )
        .bind(&input.email)
        .bind(&input.full_name)
        .bind(input.role.as_str())
        .bind(&password_hash)
        .fetch_one(&self.db)
        .await?;

        let user = row.into_user()?;
        let token = self.issue_token(&user)?;

        Ok(AuthResponse { token, user })
    }

    /// Verify credentials and issue a token
    pub async fn login(&self, input: LoginInput) -> AppResult<AuthResponse> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, email, full_name, role, password_hash, created_at FROM users WHERE email = $1",
        )
        .bind(&input.email)
        .fetch_optional(&self.db)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

        let verified = bcrypt::verify(&input.password, &row.password_hash)
            .map_err(|e| AppError::Internal(format!("password verification failed: {}", e)))?;
        if !verified {
            return Err(AppError::InvalidCredentials);
        }

        let user = row.into_user()?;
        let token = self.issue_token(&user)?;

        Ok(AuthResponse { token, user })
    }

    fn issue_token(&self, user: &User) -> AppResult<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id.to_string(),
            role: user.role.as_str().to_string(),
            iat: now.timestamp(),
            exp: now.timestamp() + self.jwt.access_token_expiry,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt.secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(format!("token signing failed: {}", e)))
    }
}
