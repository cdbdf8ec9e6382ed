//! Runtime defaults.

/// Default directories
pub mod dirs {
    /// Where the state file lives
    pub const DEFAULT_STATE_DIR: &str = "/var/lib/localpersist/state";

    /// Root under which every mountpoint is created
    pub const DEFAULT_DATA_DIR: &str = "/var/lib/localpersist/data";
}

/// Environment variables read by the CLI
pub mod envs {
    pub const STATE_DIR: &str = "LOCALPERSIST_STATE_DIR";
    pub const DATA_DIR: &str = "LOCALPERSIST_DATA_DIR";
    pub const LOG_DIR: &str = "LOCALPERSIST_LOG_DIR";
    /// Boolean switch for debug logging
    pub const DEBUG: &str = "DEBUG";
}
