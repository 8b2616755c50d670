//! JWT authentication middleware
//!
//! Verifies the bearer token, confirms the user still exists, and injects
//! the authenticated identity into request extensions. Role checks happen
//! per handler via [`require_role`].

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

use crate::{
    models::user::{User, UserRole},
    state::AppState,
    utils::errors::AppError,
    utils::jwt::{verify_token, JwtConfig},
};

/// Authenticated caller injected into request extensions
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: String,
    pub email: String,
    pub role: UserRole,
}

/// Bearer-token authentication layer
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|auth| auth.to_str().ok())
        .and_then(|auth| auth.strip_prefix("Bearer "))
        .ok_or_else(|| AppError::Unauthorized("Authorization token required".to_string()))?;

    let jwt_config = JwtConfig::from(&state.config);
    let claims = verify_token(token, &jwt_config)?;

    let role = UserRole::from_str(&claims.role)
        .ok_or_else(|| AppError::Unauthorized("Unknown role in token".to_string()))?;

    // The token may outlive the account; re-check the user row.
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(&claims.sub)
        .fetch_optional(&state.pool)
        .await?
        .ok_or_else(|| AppError::Unauthorized("User no longer exists".to_string()))?;

    let authenticated = AuthenticatedUser {
        user_id: user.id,
        email: user.email,
        role,
    };

    request.extensions_mut().insert(authenticated);

    Ok(next.run(request).await)
}

/// Reject callers whose role is not in the allowed set
pub fn require_role(user: &AuthenticatedUser, allowed: &[UserRole]) -> Result<(), AppError> {
    if allowed.contains(&user.role) {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!(
            "Role '{}' cannot perform this operation",
            user.role.as_str()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_with(role: UserRole) -> AuthenticatedUser {
        AuthenticatedUser {
            user_id: "usr-test".to_string(),
            email: "test@fleetflow.test".to_string(),
            role,
        }
    }

    #[test]
    fn role_gate_allows_listed_roles() {
        let user = user_with(UserRole::Dispatcher);
        assert!(require_role(&user, &[UserRole::Dispatcher, UserRole::Manager]).is_ok());
    }

    #[test]
    fn role_gate_rejects_unlisted_roles() {
        let user = user_with(UserRole::Finance);
        let err = require_role(&user, &[UserRole::Manager]).unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }
}
