use log::{error, info, warn};
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use crate::config::SiteConfig;

#[derive(Debug, Default, PartialEq, Eq)]
pub struct BootReport {
    pub errors: u32,
    pub warnings: u32,
}

/// Run all boot checks. Call this before opening storage.
/// Creates missing directories and aborts if one cannot be created or the
/// database directory is not writable.
pub fn run(config: &SiteConfig, ephemeral: bool) {
    info!("kuranie boot check starting...");

    let report = check(config, ephemeral);

    // ── Summary ─────────────────────────────────────────
    if report.errors > 0 {
        error!(
            "Boot check FAILED: {} error(s), {} warning(s). Aborting.",
            report.errors, report.warnings
        );
        process::exit(1);
    }

    if report.warnings > 0 {
        warn!("Boot check passed with {} warning(s).", report.warnings);
    } else {
        info!("Boot check passed.");
    }
}

pub fn check(config: &SiteConfig, ephemeral: bool) -> BootReport {
    let mut report = BootReport::default();

    // ── 1. Directories ─────────────────────────────────
    let mut dirs: Vec<PathBuf> = vec![PathBuf::from(&config.output_dir)];
    if !ephemeral {
        if let Some(parent) = Path::new(&config.database).parent() {
            if !parent.as_os_str().is_empty() {
                dirs.push(parent.to_path_buf());
            }
        }
    }

    for dir in &dirs {
        if !dir.exists() {
            match fs::create_dir_all(dir) {
                Ok(_) => info!("  Created directory: {}", dir.display()),
                Err(e) => {
                    error!("  FAILED to create directory {}: {}", dir.display(), e);
                    report.errors += 1;
                }
            }
        }
    }

    // ── 2. Database directory writable ──────────────────
    if !ephemeral {
        let db_dir = Path::new(&config.database)
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        if db_dir.exists() {
            let test_file = db_dir.join(".write_test");
            match fs::write(&test_file, "test") {
                Ok(_) => {
                    let _ = fs::remove_file(&test_file);
                }
                Err(e) => {
                    error!("  Database directory not writable: {}", e);
                    report.errors += 1;
                }
            }
        }
    }

    // ── 3. Timezone ────────────────────────────────────
    if config.timezone.parse::<chrono_tz::Tz>().is_err() {
        warn!("  Unknown timezone '{}', dates will be shown in UTC", config.timezone);
        report.warnings += 1;
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let config = SiteConfig {
            database: dir.path().join("db/kuranie.db").to_string_lossy().into_owned(),
            output_dir: dir.path().join("public").to_string_lossy().into_owned(),
            ..Default::default()
        };
        let report = check(&config, false);
        assert_eq!(report, BootReport::default());
        assert!(dir.path().join("db").is_dir());
        assert!(dir.path().join("public").is_dir());
    }

    #[test]
    fn test_ephemeral_skips_database_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config = SiteConfig {
            database: dir.path().join("db/kuranie.db").to_string_lossy().into_owned(),
            output_dir: dir.path().join("public").to_string_lossy().into_owned(),
            ..Default::default()
        };
        check(&config, true);
        assert!(!dir.path().join("db").exists());
    }

    #[test]
    fn test_bad_timezone_is_warning() {
        let dir = tempfile::tempdir().unwrap();
        let config = SiteConfig {
            output_dir: dir.path().join("public").to_string_lossy().into_owned(),
            timezone: "Nowhere/Special".to_string(),
            ..Default::default()
        };
        let report = check(&config, true);
        assert_eq!(report.errors, 0);
        assert_eq!(report.warnings, 1);
    }
}
