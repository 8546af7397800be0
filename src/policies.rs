//! Migration role-policy fixer.
//!
//! Early RLS policies checked admin privilege with an inline
//! `EXISTS (SELECT 1 FROM user_roles ...)` clause; the canonical helper is
//! now `public.is_admin()`. This rewrites migration SQL in place so both
//! spellings do not drift apart.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;

static LEGACY_CLAUSE_RE: OnceLock<Regex> = OnceLock::new();

fn legacy_clause_re() -> &'static Regex {
    LEGACY_CLAUSE_RE.get_or_init(|| {
        Regex::new(
            r"EXISTS \(\s*SELECT 1 FROM user_roles\s*WHERE user_id = auth\.uid\(\) AND role = 'admin'\s*\)",
        )
        .unwrap()
    })
}

const CANONICAL_CLAUSE: &str = "public.is_admin()";

/// One rewritten migration file.
#[derive(Debug, Clone)]
pub struct FileFix {
    pub path: PathBuf,
    pub replacements: usize,
}

/// Result of one fixer run.
#[derive(Debug, Clone, Default)]
pub struct PolicyFixReport {
    /// Files that contained at least one legacy clause, in path order.
    pub fixes: Vec<FileFix>,
    /// Total number of SQL files inspected.
    pub files_scanned: usize,
}

impl PolicyFixReport {
    pub fn total_replacements(&self) -> usize {
        self.fixes.iter().map(|f| f.replacements).sum()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PolicyError {
    #[error("Migrations directory not found: {0}")]
    MissingDir(PathBuf),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Rewrite every `*.sql` file under `dir` that still carries the legacy
/// clause. Files without a match are left untouched, so re-running is a
/// no-op.
pub fn fix_role_policies(dir: &Path) -> Result<PolicyFixReport, PolicyError> {
    if !dir.is_dir() {
        return Err(PolicyError::MissingDir(dir.to_path_buf()));
    }

    let mut sql_files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext == "sql"))
        .collect();
    sql_files.sort();

    let re = legacy_clause_re();
    let mut report = PolicyFixReport {
        files_scanned: sql_files.len(),
        ..Default::default()
    };

    for path in sql_files {
        let content = fs::read_to_string(&path)?;
        let replacements = re.find_iter(&content).count();
        if replacements == 0 {
            continue;
        }

        let rewritten = re.replace_all(&content, CANONICAL_CLAUSE);
        fs::write(&path, rewritten.as_bytes())?;
        tracing::info!("Fixed {}: {} replacement(s)", path.display(), replacements);

        report.fixes.push(FileFix { path, replacements });
    }

    Ok(report)
}
