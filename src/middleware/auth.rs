use axum::{extract::FromRequestParts, http::header};
use jsonwebtoken::{DecodingKey, Validation, decode};
use uuid::Uuid;

use crate::{dto::auth::Claims, error::AppError};

pub const ROLE_ADMIN: &str = "ROLE_ADMIN";
pub const ROLE_EMPLOYEE: &str = "ROLE_EMPLOYEE";
pub const ROLE_CUSTOMER: &str = "ROLE_CUSTOMER";

#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    /// Granted role names, stored already prefixed ("ROLE_ADMIN").
    pub roles: Vec<String>,
}

impl AuthUser {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

pub fn ensure_role(user: &AuthUser, role: &str) -> Result<(), AppError> {
    if !user.has_role(role) {
        return Err(AppError::Forbidden);
    }
    Ok(())
}

pub fn ensure_admin(user: &AuthUser) -> Result<(), AppError> {
    ensure_role(user, ROLE_ADMIN)
}

/// Admin or employee: back-office read access.
pub fn ensure_staff(user: &AuthUser) -> Result<(), AppError> {
    if user.has_role(ROLE_ADMIN) || user.has_role(ROLE_EMPLOYEE) {
        return Ok(());
    }
    Err(AppError::Forbidden)
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;
    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .ok_or(AppError::Unauthorized)?;

        let auth_str = auth_header.to_str().map_err(|_| AppError::Unauthorized)?;

        if !auth_str.starts_with("Bearer ") {
            return Err(AppError::Unauthorized);
        }
        let token = auth_str.trim_start_matches("Bearer ").trim();

        let secret = std::env::var("JWT_SECRET")
            .map_err(|_| AppError::Internal(anyhow::anyhow!("JWT_SECRET is not set")))?;

        let decoded = decode::<Claims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|_| AppError::Unauthorized)?;

        let user_id = Uuid::parse_str(&decoded.claims.sub).map_err(|_| AppError::Unauthorized)?;

        Ok(AuthUser {
            user_id,
            roles: decoded.claims.roles.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_with(roles: &[&str]) -> AuthUser {
        AuthUser {
            user_id: Uuid::new_v4(),
            roles: roles.iter().map(|r| r.to_string()).collect(),
        }
    }

    #[test]
    fn ensure_role_rejects_missing_role() {
        let user = user_with(&[ROLE_CUSTOMER]);
        assert!(ensure_admin(&user).is_err());
        assert!(ensure_role(&user, ROLE_CUSTOMER).is_ok());
    }

    #[test]
    fn staff_check_accepts_admin_and_employee() {
        assert!(ensure_staff(&user_with(&[ROLE_ADMIN])).is_ok());
        assert!(ensure_staff(&user_with(&[ROLE_EMPLOYEE])).is_ok());
        assert!(ensure_staff(&user_with(&[ROLE_CUSTOMER])).is_err());
    }
}
