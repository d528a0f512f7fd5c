use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

use crate::db::DEFAULT_SNAPSHOT_KEEP;

/// Runtime settings for the CLI, resolved from flags, the environment and `.env`.
#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: PathBuf,
    pub log_level: String,
    pub snapshot_keep: usize,
}

impl Config {
    pub fn load(db_override: Option<PathBuf>) -> Result<Self> {
        dotenvy::dotenv().ok();

        let db_path = db_override
            .or_else(|| env::var_os("GTM_DB_PATH").map(PathBuf::from))
            .unwrap_or_else(default_db_path);
        let log_level = env::var("GTM_LOG_LEVEL").unwrap_or_else(|_| "warn".to_string());
        let snapshot_keep = match env::var("GTM_SNAPSHOT_KEEP") {
            Ok(raw) => raw
                .trim()
                .parse::<usize>()
                .with_context(|| format!("GTM_SNAPSHOT_KEEP must be a non-negative integer, got '{}'", raw))?,
            Err(_) => DEFAULT_SNAPSHOT_KEEP,
        };

        Ok(Self {
            db_path,
            log_level,
            snapshot_keep,
        })
    }
}

fn default_db_path() -> PathBuf {
    // XDG data directory, or the working directory as a last resort
    match directories::ProjectDirs::from("", "", "gtm") {
        Some(dirs) => dirs.data_dir().join("gtm.db"),
        None => PathBuf::from("gtm.db"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        unsafe {
            env::remove_var("GTM_DB_PATH");
            env::remove_var("GTM_LOG_LEVEL");
            env::remove_var("GTM_SNAPSHOT_KEEP");
        }
    }

    #[test]
    fn test_defaults() {
        let _lock = env_guard().lock().unwrap();
        reset_env();
        let config = Config::load(None).unwrap();
        assert_eq!(config.log_level, "warn");
        assert!(config.db_path.ends_with("gtm.db"));
        assert_eq!(config.snapshot_keep, DEFAULT_SNAPSHOT_KEEP);
    }

    #[test]
    fn test_snapshot_keep_from_env() {
        let _lock = env_guard().lock().unwrap();
        reset_env();
        unsafe {
            env::set_var("GTM_SNAPSHOT_KEEP", "5");
        }
        assert_eq!(Config::load(None).unwrap().snapshot_keep, 5);

        unsafe {
            env::set_var("GTM_SNAPSHOT_KEEP", "lots");
        }
        let err = Config::load(None).unwrap_err();
        assert!(err.to_string().contains("GTM_SNAPSHOT_KEEP"));
        reset_env();
    }

    #[test]
    fn test_env_overrides() {
        let _lock = env_guard().lock().unwrap();
        reset_env();
        unsafe {
            env::set_var("GTM_DB_PATH", "/tmp/tracker.db");
            env::set_var("GTM_LOG_LEVEL", "debug");
        }
        let config = Config::load(None).unwrap();
        assert_eq!(config.db_path, PathBuf::from("/tmp/tracker.db"));
        assert_eq!(config.log_level, "debug");
        reset_env();
    }

    #[test]
    fn test_flag_beats_env() {
        let _lock = env_guard().lock().unwrap();
        reset_env();
        unsafe {
            env::set_var("GTM_DB_PATH", "/tmp/tracker.db");
        }
        let config = Config::load(Some(PathBuf::from("local.db"))).unwrap();
        assert_eq!(config.db_path, PathBuf::from("local.db"));
        reset_env();
    }
}
