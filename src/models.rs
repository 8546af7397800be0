use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User record as returned by the Supabase auth admin API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    /// Email from the auth provider
    #[serde(default)]
    pub email: Option<String>,
    /// When the user registered
    pub created_at: DateTime<Utc>,
    /// Provider-specific metadata carrying the legacy `role` flag
    #[serde(default)]
    pub app_metadata: AppMetadata,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppMetadata {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl User {
    /// Display label for operator-facing output.
    pub fn label(&self) -> &str {
        self.email.as_deref().unwrap_or("<no email>")
    }

    /// Legacy privilege flag on the user record. Informational only; the
    /// `is_admin` RPC is the source of truth.
    pub fn has_legacy_admin_flag(&self) -> bool {
        self.app_metadata.role.as_deref() == Some("admin")
    }
}

/// Result of the per-user admin check. A failed RPC is preserved as its
/// own state instead of being collapsed into a boolean; candidate
/// selection still treats it as non-admin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminStatus {
    Admin,
    NotAdmin,
    CheckFailed(String),
}

impl AdminStatus {
    pub fn is_admin(&self) -> bool {
        matches!(self, AdminStatus::Admin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_deserializes_without_metadata() {
        let json = r#"{
            "id": "7e3b4c8a-0f6d-4f6e-9a1b-2c3d4e5f6a7b",
            "email": "owner@lawnquote.test",
            "created_at": "2025-01-15T10:30:00Z"
        }"#;

        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.label(), "owner@lawnquote.test");
        assert!(!user.has_legacy_admin_flag());
    }

    #[test]
    fn test_legacy_admin_flag() {
        let json = r#"{
            "id": "7e3b4c8a-0f6d-4f6e-9a1b-2c3d4e5f6a7b",
            "created_at": "2025-01-15T10:30:00Z",
            "app_metadata": {"role": "admin", "provider": "email"}
        }"#;

        let user: User = serde_json::from_str(json).unwrap();
        assert!(user.has_legacy_admin_flag());
        assert_eq!(user.label(), "<no email>");
    }

    #[test]
    fn test_check_failed_is_not_admin() {
        assert!(!AdminStatus::CheckFailed("timeout".to_string()).is_admin());
        assert!(AdminStatus::Admin.is_admin());
    }
}
