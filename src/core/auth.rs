//! Admin authorization.
//!
//! Who the caller is gets decided upstream (auth gateway or Discord); this
//! module only answers whether that identity holds an admin role.

use crate::{
    config::settings::AdminConfig,
    entities::{AdminRole, admin_role},
    errors::{Error, Result},
};
use sea_orm::{Set, prelude::*};

/// Regular back-office access
pub const ROLE_ADMIN: &str = "admin";
/// Back-office access plus role management
pub const ROLE_SUPER_ADMIN: &str = "super_admin";

fn is_known_role(role: &str) -> bool {
    role == ROLE_ADMIN || role == ROLE_SUPER_ADMIN
}

/// Looks up the admin role row for a user.
pub async fn get_admin_role<C>(db: &C, user_id: &str) -> Result<Option<admin_role::Model>>
where
    C: ConnectionTrait,
{
    AdminRole::find()
        .filter(admin_role::Column::UserId.eq(user_id))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Whether the user holds any admin role.
pub async fn is_admin<C>(db: &C, user_id: &str) -> Result<bool>
where
    C: ConnectionTrait,
{
    Ok(get_admin_role(db, user_id)
        .await?
        .is_some_and(|row| is_known_role(&row.role)))
}

/// Resolves an optional caller identity into an admin id.
///
/// # Errors
/// [`Error::Unauthorized`] when no identity was supplied,
/// [`Error::Forbidden`] when it is not an admin.
pub async fn require_admin<C>(db: &C, user_id: Option<&str>) -> Result<String>
where
    C: ConnectionTrait,
{
    let user_id = user_id
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or(Error::Unauthorized)?;

    if is_admin(db, user_id).await? {
        Ok(user_id.to_string())
    } else {
        tracing::warn!(user_id, "Rejected non-admin access");
        Err(Error::Forbidden)
    }
}

/// Grants (or changes) a user's role.
///
/// # Errors
/// Returns [`Error::Validation`] for an empty id or unknown role.
pub async fn grant_admin<C>(db: &C, user_id: &str, role: &str) -> Result<admin_role::Model>
where
    C: ConnectionTrait,
{
    let user_id = user_id.trim();
    if user_id.is_empty() {
        return Err(Error::validation("Admin user id cannot be empty"));
    }
    if !is_known_role(role) {
        return Err(Error::validation(format!("Unknown admin role '{role}'")));
    }

    if let Some(existing) = get_admin_role(db, user_id).await? {
        if existing.role == role {
            return Ok(existing);
        }
        let mut active: admin_role::ActiveModel = existing.into();
        active.role = Set(role.to_string());
        return active.update(db).await.map_err(Into::into);
    }

    admin_role::ActiveModel {
        user_id: Set(user_id.to_string()),
        role: Set(role.to_string()),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Removes a user's admin role; returns whether a row was deleted.
pub async fn revoke_admin<C>(db: &C, user_id: &str) -> Result<bool>
where
    C: ConnectionTrait,
{
    let result = AdminRole::delete_many()
        .filter(admin_role::Column::UserId.eq(user_id))
        .exec(db)
        .await?;
    Ok(result.rows_affected > 0)
}

/// Grants every configured admin, returning how many rows were written.
pub async fn seed_admins(db: &DatabaseConnection, admins: &[AdminConfig]) -> Result<usize> {
    for admin in admins {
        grant_admin(db, &admin.user_id, &admin.role).await?;
    }
    Ok(admins.len())
}
