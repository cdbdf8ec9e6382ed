//! Storage constants.
//!
//! Centralized location for file names, permissions, and schema versions.

/// State file configuration
pub mod state {
    /// Name of the state file inside the state directory
    pub const FILE_NAME: &str = "local-persist.json";

    /// Current on-disk schema version
    pub const SCHEMA_VERSION: u32 = 1;

    /// Version assigned to the unversioned `{"state": {...}}` layout
    pub const LEGACY_SCHEMA_VERSION: u32 = 0;
}

/// Unix permission bits
pub mod perms {
    /// State directory (owner only)
    pub const STATE_DIR_MODE: u32 = 0o700;

    /// Data root and per-volume mountpoints
    pub const DATA_DIR_MODE: u32 = 0o755;

    /// State file (owner read/write)
    pub const STATE_FILE_MODE: u32 = 0o600;
}
