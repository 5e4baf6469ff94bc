/// Logger configuration derived from command-line arguments
///
/// Scans CMD_ARGS once at init for --debug-<module>, --verbose and
/// --quiet flags, then answers filtering queries for the core module.
use super::levels::LogLevel;
use super::tags::LogTag;
use crate::arguments::get_cmd_args;
use once_cell::sync::Lazy;
use std::collections::HashSet;
use std::sync::RwLock;

#[derive(Debug, Clone)]
pub struct LoggerConfig {
    /// Minimum level shown on console (errors always pass)
    pub min_level: LogLevel,
    /// Module keys with --debug-<module> enabled
    pub debug_modules: HashSet<String>,
    /// Module keys with --verbose-<module> enabled
    pub verbose_modules: HashSet<String>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            min_level: LogLevel::Info,
            debug_modules: HashSet::new(),
            verbose_modules: HashSet::new(),
        }
    }
}

static LOGGER_CONFIG: Lazy<RwLock<LoggerConfig>> =
    Lazy::new(|| RwLock::new(LoggerConfig::default()));

/// Parse command-line arguments into the logger configuration
///
/// Recognized flags:
/// - `--debug-<module>`: enable debug logs for one module tag
/// - `--verbose-<module>`: enable verbose logs for one module tag
/// - `--verbose`: enable verbose logs everywhere
/// - `--quiet`: only warnings and errors
pub fn init_from_args() {
    let config = parse_args(&get_cmd_args());

    if let Ok(mut current) = LOGGER_CONFIG.write() {
        *current = config;
    }
}

/// Build a configuration from an argument list
fn parse_args(args: &[String]) -> LoggerConfig {
    let mut config = LoggerConfig::default();

    for arg in args {
        if let Some(module) = arg.strip_prefix("--debug-") {
            config.debug_modules.insert(module.to_string());
        } else if let Some(module) = arg.strip_prefix("--verbose-") {
            config.verbose_modules.insert(module.to_string());
        } else if arg == "--verbose" {
            config.min_level = LogLevel::Verbose;
        } else if arg == "--quiet" {
            config.min_level = LogLevel::Warning;
        }
    }

    config
}

/// Get a snapshot of the current logger configuration
pub fn get_logger_config() -> LoggerConfig {
    LOGGER_CONFIG
        .read()
        .map(|c| c.clone())
        .unwrap_or_default()
}

/// Check whether --debug-<module> was given for this tag
pub fn is_debug_enabled_for_tag(tag: &LogTag) -> bool {
    get_logger_config().debug_modules.contains(&tag.to_debug_key())
}

/// Check whether --verbose-<module> was given for this tag
pub fn is_verbose_enabled_for_tag(tag: &LogTag) -> bool {
    get_logger_config()
        .verbose_modules
        .contains(&tag.to_debug_key())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_debug_flags_parsed_per_module() {
        let config = parse_args(&args(&["trackchat", "--debug-api", "--debug-cache"]));

        assert!(config.debug_modules.contains("api"));
        assert!(config.debug_modules.contains("cache"));
        assert!(!config.debug_modules.contains("chat"));
    }

    #[test]
    fn test_verbose_and_quiet_set_threshold() {
        let verbose = parse_args(&args(&["trackchat", "--verbose"]));
        assert_eq!(verbose.min_level, LogLevel::Verbose);

        let quiet = parse_args(&args(&["trackchat", "--quiet"]));
        assert_eq!(quiet.min_level, LogLevel::Warning);
    }

    #[test]
    fn test_per_module_verbose_flag() {
        let config = parse_args(&args(&["trackchat", "--verbose-auth"]));

        assert!(config.verbose_modules.contains("auth"));
        assert_eq!(config.min_level, LogLevel::Info);
    }
}
