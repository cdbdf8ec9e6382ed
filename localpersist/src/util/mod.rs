//! Filesystem helpers.

mod fs;

pub use fs::{ensure_dir, set_mode};
