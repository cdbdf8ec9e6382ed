//! Types shared between the localpersist registry and the transports that drive it.

pub mod errors;
pub mod types;

pub use errors::{ErrorKind, PersistError, PersistResult};
pub use types::{Capabilities, CreateOptions, MountpointResponse, Scope, Volume};
