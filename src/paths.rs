/// Centralized filesystem layout for TrackChat
///
/// All files live under a single data directory so a user can inspect or
/// remove the application state in one place:
///
/// ```text
/// ~/.trackchat/
///   config.toml     application configuration
///   session.json    stored session tokens
///   logs/           per-day log files
/// ```
use std::path::PathBuf;

const DATA_DIR_NAME: &str = ".trackchat";

/// Root data directory (~/.trackchat)
///
/// Falls back to the current directory when no home directory can be
/// resolved (e.g. stripped-down containers).
pub fn get_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DATA_DIR_NAME)
}

/// Path of the TOML configuration file
pub fn get_config_path() -> PathBuf {
    get_data_dir().join("config.toml")
}

/// Path of the stored session tokens
pub fn get_session_path() -> PathBuf {
    get_data_dir().join("session.json")
}

/// Directory for log files
pub fn get_logs_dir() -> PathBuf {
    get_data_dir().join("logs")
}

/// Create every directory the application writes into
///
/// Must run before logger initialization so the log file can be created.
pub fn ensure_all_directories() -> std::io::Result<()> {
    std::fs::create_dir_all(get_data_dir())?;
    std::fs::create_dir_all(get_logs_dir())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_live_under_data_dir() {
        let root = get_data_dir();

        assert!(get_config_path().starts_with(&root));
        assert!(get_session_path().starts_with(&root));
        assert!(get_logs_dir().starts_with(&root));
    }
}
