//! Admin bootstrap workflow: enumerate users, check admin status, promote
//! a candidate when no admin exists, then verify the promotion.

use std::time::Duration;

use crate::models::{AdminStatus, User};
use crate::supabase::{SupabaseAdminClient, SupabaseError};

/// One user together with its checked admin status.
#[derive(Debug, Clone)]
pub struct UserStatus {
    pub user: User,
    pub status: AdminStatus,
}

/// Result of checking every registered user, in service list order.
#[derive(Debug, Clone, Default)]
pub struct AdminScan {
    pub entries: Vec<UserStatus>,
}

impl AdminScan {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First user confirmed as admin, if any.
    pub fn admin(&self) -> Option<&User> {
        self.entries
            .iter()
            .find(|e| e.status.is_admin())
            .map(|e| &e.user)
    }

    /// Promotion candidate: the first user in list order whose check did
    /// not confirm admin, failed checks included.
    pub fn candidate(&self) -> Option<&User> {
        self.entries
            .iter()
            .find(|e| !e.status.is_admin())
            .map(|e| &e.user)
    }

    /// Users whose legacy `app_metadata.role` flag disagrees with the
    /// `is_admin` RPC. Users with a failed check are skipped since the
    /// authoritative answer is unknown for them.
    pub fn legacy_flag_mismatches(&self) -> Vec<&UserStatus> {
        self.entries
            .iter()
            .filter(|e| match e.status {
                AdminStatus::Admin => !e.user.has_legacy_admin_flag(),
                AdminStatus::NotAdmin => e.user.has_legacy_admin_flag(),
                AdminStatus::CheckFailed(_) => false,
            })
            .collect()
    }
}

/// Options for the bootstrap workflow.
#[derive(Debug, Clone)]
pub struct BootstrapOptions {
    /// Delay between promotion and the verification re-check.
    pub verify_delay: Duration,
}

impl Default for BootstrapOptions {
    fn default() -> Self {
        Self {
            verify_delay: Duration::from_millis(1000),
        }
    }
}

/// Terminal state of one bootstrap run.
#[derive(Debug, Clone)]
pub enum BootstrapOutcome {
    /// No users registered at all; nothing to do.
    NoUsers,
    /// At least one user already has admin privilege; no write issued.
    AdminPresent { user: User },
    /// A candidate was promoted. `verified` is the result of the awaited
    /// re-check (`None` when the re-check itself failed).
    Promoted { user: User, verified: Option<bool> },
    /// The promotion call failed. Not a process-level failure.
    PromotionFailed { user: User, reason: String },
}

impl BootstrapOutcome {
    /// Operator-facing summary line.
    pub fn summary(&self) -> String {
        match self {
            BootstrapOutcome::NoUsers => {
                "⚠️  No users registered yet — sign up through the app first".to_string()
            }
            BootstrapOutcome::AdminPresent { user } => {
                format!("✅ Found admin user: {}", user.label())
            }
            BootstrapOutcome::Promoted {
                user,
                verified: Some(true),
            } => format!("✅ Promoted {} to admin (verified)", user.label()),
            BootstrapOutcome::Promoted {
                user,
                verified: Some(false),
            } => format!(
                "⚠️  Promoted {} but is_admin() still reports non-admin",
                user.label()
            ),
            BootstrapOutcome::Promoted {
                user,
                verified: None,
            } => format!(
                "⚠️  Promoted {} but the verification check failed",
                user.label()
            ),
            BootstrapOutcome::PromotionFailed { user, reason } => {
                format!("❌ Failed to promote {}: {}", user.label(), reason)
            }
        }
    }
}

/// Check every user sequentially. A failed RPC is recorded as
/// `CheckFailed` and the scan continues with the next user.
pub async fn scan(client: &SupabaseAdminClient) -> Result<AdminScan, SupabaseError> {
    let users = client.list_users().await?;
    tracing::info!("Listed {} user(s)", users.len());

    let mut entries = Vec::with_capacity(users.len());
    for user in users {
        let status = match client.is_admin(user.id).await {
            Ok(true) => AdminStatus::Admin,
            Ok(false) => AdminStatus::NotAdmin,
            Err(e) => {
                tracing::warn!("Admin check failed for {}: {}", user.label(), e);
                AdminStatus::CheckFailed(e.to_string())
            }
        };
        entries.push(UserStatus { user, status });
    }

    Ok(AdminScan { entries })
}

/// Run the full bootstrap workflow.
///
/// Only the initial user listing can fail this function; promotion and
/// verification failures are folded into the outcome so the caller can
/// exit 0 on every completed run.
pub async fn bootstrap(
    client: &SupabaseAdminClient,
    options: &BootstrapOptions,
) -> Result<BootstrapOutcome, SupabaseError> {
    let scan = scan(client).await?;

    if scan.is_empty() {
        tracing::warn!("No users registered; nothing to bootstrap");
        return Ok(BootstrapOutcome::NoUsers);
    }

    if let Some(admin) = scan.admin() {
        tracing::info!("Found admin user: {}", admin.label());
        return Ok(BootstrapOutcome::AdminPresent {
            user: admin.clone(),
        });
    }

    // No admin anywhere; promote the first candidate in list order.
    let candidate = scan
        .candidate()
        .expect("non-empty scan without admin has a candidate")
        .clone();
    tracing::info!("No admin found, promoting {}", candidate.label());

    if let Err(e) = client.promote_to_admin(candidate.id).await {
        tracing::error!("Promotion failed for {}: {}", candidate.label(), e);
        return Ok(BootstrapOutcome::PromotionFailed {
            user: candidate,
            reason: e.to_string(),
        });
    }

    // The role grant propagates asynchronously on the Supabase side, so
    // wait before re-checking. Awaited, not fire-and-forget: the process
    // must not exit before the verification result is known.
    tokio::time::sleep(options.verify_delay).await;

    let verified = match client.is_admin(candidate.id).await {
        Ok(result) => Some(result),
        Err(e) => {
            tracing::warn!("Verification check failed for {}: {}", candidate.label(), e);
            None
        }
    };

    Ok(BootstrapOutcome::Promoted {
        user: candidate,
        verified,
    })
}
