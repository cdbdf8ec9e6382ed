//! Durable registry of locally persisted volumes.
//!
//! A volume is a name bound to a directory under a fixed data root. The
//! registry answers the lifecycle calls a volume plugin host makes (create,
//! get, list, remove, mount, unmount, path, capabilities) and keeps a JSON
//! state file in step with memory so volumes survive restarts.
//!
//! ```no_run
//! use localpersist::{CreateOptions, LocalPersistRuntime, RuntimeOptions};
//!
//! # fn main() -> localpersist::PersistResult<()> {
//! let runtime = LocalPersistRuntime::new(RuntimeOptions::new("/var/lib/lp/state", "/data"))?;
//! let volume = runtime.registry().create("vol1", &CreateOptions::default())?;
//! assert_eq!(volume.mountpoint, std::path::Path::new("/data/vol1"));
//! # Ok(())
//! # }
//! ```

pub mod logging;
pub mod runtime;
pub mod store;
pub mod util;
pub mod volumes;

pub use localpersist_shared::errors::{ErrorKind, PersistError, PersistResult};
pub use localpersist_shared::types::{
    Capabilities, CreateOptions, MountpointResponse, Scope, Volume,
};
pub use logging::{LoggingOptions, debug_from_env, init_logging};
pub use runtime::{FilesystemLayout, LocalPersistRuntime, RuntimeOptions};
pub use store::StateStore;
pub use volumes::VolumeRegistry;
