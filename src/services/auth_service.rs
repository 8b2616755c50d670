//! Authentication service
//!
//! Email/password login against the users table, issuing the JWT the
//! middleware verifies on every request.

use chrono::{Duration, Utc};
use sqlx::PgPool;
use tracing::info;

use crate::config::environment::EnvironmentConfig;
use crate::dto::auth_dto::{LoginRequest, LoginResponse, UserResponse};
use crate::models::user::User;
use crate::utils::errors::{AppError, AppResult};
use crate::utils::jwt::{generate_token, JwtConfig};

pub struct AuthService {
    pool: PgPool,
    jwt_config: JwtConfig,
}

impl AuthService {
    pub fn new(pool: PgPool, config: &EnvironmentConfig) -> Self {
        Self {
            pool,
            jwt_config: JwtConfig::from(config),
        }
    }

    /// Verify credentials and issue a bearer token. Unknown email and bad
    /// password produce the same error so the endpoint does not leak which
    /// accounts exist.
    pub async fn login(&self, request: LoginRequest) -> AppResult<LoginResponse> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(&request.email)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Invalid credentials".to_string()))?;

        let password_ok = bcrypt::verify(&request.password, &user.password_hash)
            .map_err(|e| AppError::Internal(format!("Password verification failed: {}", e)))?;

        if !password_ok {
            return Err(AppError::Unauthorized("Invalid credentials".to_string()));
        }

        let token = generate_token(&user.id, &user.email, user.role.as_str(), &self.jwt_config)?;
        let expires_at = Utc::now() + Duration::seconds(self.jwt_config.expiration as i64);

        info!(user_id = %user.id, role = user.role.as_str(), "User logged in");

        Ok(LoginResponse {
            token,
            user: UserResponse {
                id: user.id,
                email: user.email,
                full_name: user.full_name,
                role: user.role,
            },
            expires_at,
        })
    }
}
