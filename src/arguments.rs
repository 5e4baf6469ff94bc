/// Centralized argument handling for TrackChat
///
/// Consolidates command-line argument parsing and debug flag checking:
/// - Centralized CMD_ARGS storage with thread-safe access
/// - Debug flag checking functions for all modules
/// - Value extraction for flags that take an argument
use once_cell::sync::Lazy;
use std::env;
use std::sync::Mutex;

/// Global command-line arguments storage
///
/// Thread-safe singleton that stores arguments for access throughout the
/// application. Tests override it via set_cmd_args().
pub static CMD_ARGS: Lazy<Mutex<Vec<String>>> = Lazy::new(|| Mutex::new(env::args().collect()));

/// Sets the global command-line arguments
///
/// Used by tests to override the default env::args() collection.
pub fn set_cmd_args(args: Vec<String>) {
    if let Ok(mut cmd_args) = CMD_ARGS.lock() {
        *cmd_args = args;
    }
}

/// Gets a copy of the current command-line arguments
pub fn get_cmd_args() -> Vec<String> {
    match CMD_ARGS.lock() {
        Ok(args) => args.clone(),
        Err(_) => env::args().collect(),
    }
}

/// Checks if a specific argument is present in the command line
pub fn has_arg(arg: &str) -> bool {
    get_cmd_args().iter().any(|a| a == arg)
}

/// Gets the value of a command-line argument that follows a flag
///
/// Returns None if the flag is not found or has no value.
pub fn get_arg_value(flag: &str) -> Option<String> {
    let args = get_cmd_args();
    for (i, arg) in args.iter().enumerate() {
        if arg == flag && i + 1 < args.len() {
            return Some(args[i + 1].clone());
        }
    }
    None
}

// =============================================================================
// SPECIAL MODE FLAGS
// =============================================================================

/// Initial login: exchange an authorization code for session tokens
pub fn get_auth_code() -> Option<String> {
    get_arg_value("--auth-code")
}

/// Clear the stored session and caches, then exit
pub fn is_logout_enabled() -> bool {
    has_arg("--logout")
}

/// Help requested via -h/--help
pub fn is_help_requested() -> bool {
    has_arg("--help") || has_arg("-h")
}

// =============================================================================
// DEBUG FLAG CHECKING FUNCTIONS
// =============================================================================

/// API client debug mode
pub fn is_debug_api_enabled() -> bool {
    has_arg("--debug-api")
}

/// Auth/token debug mode
pub fn is_debug_auth_enabled() -> bool {
    has_arg("--debug-auth")
}

/// Music endpoints debug mode
pub fn is_debug_music_enabled() -> bool {
    has_arg("--debug-music")
}

/// Chat agents debug mode
pub fn is_debug_chat_enabled() -> bool {
    has_arg("--debug-chat")
}

/// Response cache debug mode
pub fn is_debug_cache_enabled() -> bool {
    has_arg("--debug-cache")
}

/// Print which debug modes are active at startup
pub fn print_debug_info() {
    let mut enabled: Vec<&str> = Vec::new();
    if is_debug_api_enabled() {
        enabled.push("api");
    }
    if is_debug_auth_enabled() {
        enabled.push("auth");
    }
    if is_debug_music_enabled() {
        enabled.push("music");
    }
    if is_debug_chat_enabled() {
        enabled.push("chat");
    }
    if is_debug_cache_enabled() {
        enabled.push("cache");
    }

    if !enabled.is_empty() {
        println!("Debug modes enabled: {}", enabled.join(", "));
    }
}

/// Print command-line help
pub fn print_help() {
    println!("TrackChat - talk to themed agents about your music");
    println!();
    println!("USAGE:");
    println!("  trackchat [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("  --auth-code <code>   Exchange an authorization code for a session");
    println!("  --logout             Clear the stored session and exit");
    println!("  --debug-api          Debug logs for the API client");
    println!("  --debug-auth         Debug logs for token handling");
    println!("  --debug-music        Debug logs for music endpoints");
    println!("  --debug-chat         Debug logs for chat agents");
    println!("  --debug-cache        Debug logs for the response cache");
    println!("  --verbose            Show verbose logs for all modules");
    println!("  --quiet              Only warnings and errors");
    println!("  -h, --help           Show this help");
}
