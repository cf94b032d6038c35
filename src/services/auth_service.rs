use argon2::{Argon2, password_hash::PasswordHash, password_hash::PasswordVerifier};
use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};

use crate::{
    db::DbPool,
    dto::auth::{Claims, LoginRequest, LoginResponse},
    error::{AppError, AppResult},
    middleware::auth::{ROLE_ADMIN, ROLE_CUSTOMER, ROLE_EMPLOYEE},
    response::{ApiResponse, Meta},
};

/// Post-login landing page, decided by role precedence. The check order is
/// fixed (ADMIN > EMPLOYEE > CUSTOMER) and only the first match wins.
pub fn redirect_path(roles: &[String]) -> &'static str {
    if roles.iter().any(|r| r == ROLE_ADMIN) {
        "/admin/dashboard"
    } else if roles.iter().any(|r| r == ROLE_EMPLOYEE) {
        "/employee/dashboard"
    } else if roles.iter().any(|r| r == ROLE_CUSTOMER) {
        "/customer/home"
    } else {
        "/"
    }
}

/// Verify credentials and issue a bearer token.
///
/// The two lookups keep the exact query shapes the store has always used:
/// the user row by email, then the granted authorities via the
/// account-role join. Role names come back already prefixed; nothing
/// concatenates "ROLE_" at query time.
pub async fn login(pool: &DbPool, payload: LoginRequest) -> AppResult<ApiResponse<LoginResponse>> {
    let LoginRequest { email, password } = payload;

    let row: Option<(String, String, bool)> = sqlx::query_as(
        "SELECT email, hashed_password, is_active FROM user_account WHERE email = $1",
    )
    .bind(email.as_str())
    .fetch_optional(pool)
    .await?;

    let (_, hashed_password, is_active) = match row {
        Some(r) => r,
        None => return Err(AppError::BadRequest("Invalid email or password".into())),
    };

    let parsed_hash = PasswordHash::new(&hashed_password)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;

    if Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_err()
    {
        return Err(AppError::BadRequest("Invalid email or password".into()));
    }

    if !is_active {
        return Err(AppError::Forbidden);
    }

    let authority_rows: Vec<(String, String)> = sqlx::query_as(
        "SELECT ua.email, r.role_name \
         FROM user_account ua \
         JOIN user_account_role uar ON ua.user_account_id = uar.user_account_id \
         JOIN role r ON r.role_id = uar.role_id \
         WHERE ua.email = $1",
    )
    .bind(email.as_str())
    .fetch_all(pool)
    .await?;

    let roles: Vec<String> = authority_rows.into_iter().map(|(_, role)| role).collect();

    let user_id: (uuid::Uuid,) =
        sqlx::query_as("SELECT user_account_id FROM user_account WHERE email = $1")
            .bind(email.as_str())
            .fetch_one(pool)
            .await?;

    let secret = std::env::var("JWT_SECRET")
        .map_err(|_| AppError::Internal(anyhow::anyhow!("JWT_SECRET is not set")))?;

    let expiration = Utc::now()
        .checked_add_signed(Duration::hours(24))
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;

    let claims = Claims {
        sub: user_id.0.to_string(),
        roles: roles.clone(),
        exp: expiration.timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?;

    tracing::info!(email = %email, "login succeeded");

    let resp = LoginResponse {
        token: format!("Bearer {}", token),
        redirect_to: redirect_path(&roles).to_string(),
    };

    Ok(ApiResponse::success("Logged in", resp, Some(Meta::empty())))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roles(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn admin_outranks_everything() {
        let r = roles(&[ROLE_CUSTOMER, ROLE_ADMIN, ROLE_EMPLOYEE]);
        assert_eq!(redirect_path(&r), "/admin/dashboard");
    }

    #[test]
    fn employee_outranks_customer() {
        let r = roles(&[ROLE_CUSTOMER, ROLE_EMPLOYEE]);
        assert_eq!(redirect_path(&r), "/employee/dashboard");
    }

    #[test]
    fn customer_lands_on_home() {
        assert_eq!(redirect_path(&roles(&[ROLE_CUSTOMER])), "/customer/home");
    }

    #[test]
    fn unknown_roles_fall_back_to_root() {
        assert_eq!(redirect_path(&roles(&["ROLE_AUDITOR"])), "/");
        assert_eq!(redirect_path(&[]), "/");
    }
}
