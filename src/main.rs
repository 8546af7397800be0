//! QuoteKit ops CLI: admin bootstrap and role-policy maintenance for the
//! Supabase backend.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use quotekit_admin::bootstrap::{bootstrap, scan, BootstrapOptions};
use quotekit_admin::config::Config;
use quotekit_admin::models::AdminStatus;
use quotekit_admin::policies::fix_role_policies;
use quotekit_admin::supabase::SupabaseAdminClient;

#[derive(Parser)]
#[command(
    name = "quotekit-admin",
    about = "QuoteKit operational tasks — verify admin users, bootstrap the first admin, fix role policies",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List users and their admin status; takes no write action
    Check,

    /// Promote the first non-admin user when no admin exists, then verify
    Bootstrap {
        /// Delay before the verification re-check, in milliseconds
        #[arg(long, default_value_t = 1000)]
        verify_delay_ms: u64,
    },

    /// Replace legacy user_roles policy clauses in migration SQL with public.is_admin()
    FixPolicies {
        /// Migrations directory to scan
        #[arg(long, default_value = "supabase/migrations")]
        dir: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Check => {
            let config = Config::from_env()?;
            let client = SupabaseAdminClient::new(&config.supabase_url, &config.service_role_key);
            run_check(&client).await?;
        }
        Commands::Bootstrap { verify_delay_ms } => {
            let config = Config::from_env()?;
            let client = SupabaseAdminClient::new(&config.supabase_url, &config.service_role_key);
            let options = BootstrapOptions {
                verify_delay: Duration::from_millis(verify_delay_ms),
            };
            let outcome = bootstrap(&client, &options).await?;
            println!("{}", outcome.summary());
        }
        Commands::FixPolicies { dir } => {
            let report = fix_role_policies(&dir)?;
            for fix in &report.fixes {
                println!(
                    "🔧 {}: {} replacement(s)",
                    fix.path.display(),
                    fix.replacements
                );
            }
            println!(
                "✅ Scanned {} file(s), {} replacement(s) total",
                report.files_scanned,
                report.total_replacements()
            );
        }
    }

    Ok(())
}

async fn run_check(client: &SupabaseAdminClient) -> Result<(), Box<dyn std::error::Error>> {
    let scan = scan(client).await?;

    println!("👥 {} user(s) registered", scan.entries.len());
    for entry in &scan.entries {
        match &entry.status {
            AdminStatus::Admin => println!("  ✅ admin    {}", entry.user.label()),
            AdminStatus::NotAdmin => println!("  ·  member   {}", entry.user.label()),
            AdminStatus::CheckFailed(reason) => {
                println!("  ⚠️  unknown  {} (check failed: {})", entry.user.label(), reason)
            }
        }
    }

    for entry in scan.legacy_flag_mismatches() {
        println!(
            "⚠️  Legacy role flag disagrees with is_admin() for {}",
            entry.user.label()
        );
    }

    match scan.admin() {
        Some(admin) => println!("✅ Found admin user: {}", admin.label()),
        None if scan.is_empty() => println!("⚠️  No users registered yet"),
        None => println!("⚠️  No admin user found — run `quotekit-admin bootstrap`"),
    }

    Ok(())
}
