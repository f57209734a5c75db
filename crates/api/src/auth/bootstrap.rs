use fathom_core::roles::ROLE_ADMIN;
use fathom_db::models::user::CreateUser;
use fathom_db::repositories::UserRepo;
use fathom_db::DbPool;

use crate::auth::password::{hash_password, validate_password_strength};
use crate::config::AdminBootstrap;
use crate::error::{AppError, AppResult};

/// Create the configured admin account unless a user with that email
/// already exists. Returns `true` if an account was created.
///
/// An existing account is left untouched, including its role and password.
pub async fn ensure_admin(pool: &DbPool, admin: &AdminBootstrap) -> AppResult<bool> {
    if UserRepo::find_by_email(pool, &admin.email).await?.is_some() {
        tracing::debug!(email = %admin.email, "Bootstrap admin already exists");
        return Ok(false);
    }

    validate_password_strength(&admin.password)?;
    let password_hash = hash_password(&admin.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing failed: {e}")))?;

    let user = UserRepo::create(
        pool,
        &CreateUser {
            email: admin.email.clone(),
            display_name: "Administrator".into(),
            password_hash,
            role: ROLE_ADMIN.into(),
        },
    )
    .await?;

    tracing::info!(user_id = user.id, email = %user.email, "Bootstrap admin created");
    Ok(true)
}
