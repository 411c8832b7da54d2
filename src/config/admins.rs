//! Bootstrap admin ids from environment variables.
//!
//! `BOXPRINT_ADMIN_IDS` holds a comma-separated list of user ids that are
//! granted the `admin` role on startup, in addition to the `[[admins]]`
//! entries of config.toml. Handy for a first deploy before any config exists.

use super::settings::AdminConfig;

/// Parses a comma-separated id list, skipping blanks.
#[must_use]
pub fn parse_admin_ids(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Gets the admin ids configured in `BOXPRINT_ADMIN_IDS`.
#[must_use]
pub fn get_env_admin_ids() -> Vec<String> {
    std::env::var("BOXPRINT_ADMIN_IDS")
        .map(|raw| parse_admin_ids(&raw))
        .unwrap_or_default()
}

/// Merges config.toml admins with the environment list, config entries first.
///
/// Ids already present in `configured` keep their configured role.
#[must_use]
pub fn merge_admins(configured: &[AdminConfig], env_ids: Vec<String>) -> Vec<AdminConfig> {
    let mut merged = configured.to_vec();
    for user_id in env_ids {
        if !merged.iter().any(|a| a.user_id == user_id) {
            merged.push(AdminConfig {
                user_id,
                role: crate::core::auth::ROLE_ADMIN.to_string(),
            });
        }
    }
    merged
}
