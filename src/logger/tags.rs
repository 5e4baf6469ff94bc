/// Log tags identify the module a message originates from
///
/// Tags drive two things: the colored prefix in console output and the
/// --debug-<module> flag that enables debug logging for that module.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTag {
    System,
    Api,
    Auth,
    Music,
    Chat,
    Cache,
    Config,
    Test,
    Other(String),
}

impl LogTag {
    /// Key used for --debug-<key> and --verbose-<key> flag matching
    pub fn to_debug_key(&self) -> String {
        match self {
            LogTag::System => "system".to_string(),
            LogTag::Api => "api".to_string(),
            LogTag::Auth => "auth".to_string(),
            LogTag::Music => "music".to_string(),
            LogTag::Chat => "chat".to_string(),
            LogTag::Cache => "cache".to_string(),
            LogTag::Config => "config".to_string(),
            LogTag::Test => "test".to_string(),
            LogTag::Other(s) => s.to_lowercase(),
        }
    }

    /// Uncolored tag text for file output
    pub fn to_plain_string(&self) -> String {
        match self {
            LogTag::System => "SYSTEM".to_string(),
            LogTag::Api => "API".to_string(),
            LogTag::Auth => "AUTH".to_string(),
            LogTag::Music => "MUSIC".to_string(),
            LogTag::Chat => "CHAT".to_string(),
            LogTag::Cache => "CACHE".to_string(),
            LogTag::Config => "CONFIG".to_string(),
            LogTag::Test => "TEST".to_string(),
            LogTag::Other(s) => s.to_uppercase(),
        }
    }
}
