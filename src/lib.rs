pub mod bootstrap;
pub mod config;
pub mod models;
pub mod policies;
pub mod supabase;

pub use bootstrap::{bootstrap, scan, AdminScan, BootstrapOptions, BootstrapOutcome};
pub use config::Config;
pub use models::{AdminStatus, User};
pub use policies::{fix_role_policies, PolicyFixReport};
pub use supabase::{SupabaseAdminClient, SupabaseError};
