//! Process-level setup: options, directory layout, and the runtime that owns the registry.

pub mod constants;
mod core;
pub mod layout;
pub mod options;

pub use self::core::LocalPersistRuntime;
pub use layout::FilesystemLayout;
pub use options::RuntimeOptions;
