use trackchat::{
    arguments::{get_auth_code, is_help_requested, is_logout_enabled, print_debug_info, print_help},
    logger::{self, LogTag},
};

/// Main entry point for TrackChat
///
/// Handles special modes (--help, --auth-code, --logout) and otherwise
/// runs the interactive session: recently played tracks plus the themed
/// agent conversation loop.
#[tokio::main]
async fn main() {
    // Ensure all directories exist BEFORE logger initialization
    // (the logger needs the logs directory to create its file)
    if let Err(e) = trackchat::paths::ensure_all_directories() {
        eprintln!("Failed to create required directories: {}", e);
        std::process::exit(1);
    }

    logger::init();

    if is_help_requested() {
        print_help();
        std::process::exit(0);
    }

    if let Err(e) = trackchat::config::load_config(&trackchat::paths::get_config_path()) {
        logger::error(LogTag::Config, &format!("Failed to load config: {}", e));
        std::process::exit(1);
    }

    print_debug_info();

    // =========================================================================
    // SPECIAL MODES (execute and exit)
    // =========================================================================

    if let Some(code) = get_auth_code() {
        match trackchat::run::run_auth_code_exchange(&code).await {
            Ok(()) => std::process::exit(0),
            Err(e) => {
                logger::error(LogTag::Auth, &format!("Sign-in failed: {}", e));
                std::process::exit(1);
            }
        }
    }

    if is_logout_enabled() {
        match trackchat::run::run_logout() {
            Ok(()) => std::process::exit(0),
            Err(e) => {
                logger::error(LogTag::Auth, &format!("Logout failed: {}", e));
                std::process::exit(1);
            }
        }
    }

    // =========================================================================
    // MAIN SESSION
    // =========================================================================

    logger::info(LogTag::System, "TrackChat starting up");

    match trackchat::run::run_app().await {
        Ok(()) => {
            logger::flush();
        }
        Err(e) => {
            logger::error(LogTag::System, &format!("TrackChat failed: {}", e));
            logger::flush();
            std::process::exit(1);
        }
    }
}
