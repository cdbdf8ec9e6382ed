//! Host-facing volume types.
//!
//! These are the shapes a transport hands back to the plugin host. They are
//! plain values: the registry keeps its own records and gives out copies.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A tracked volume as seen by callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Volume {
    pub name: String,
    pub mountpoint: PathBuf,
    /// Absent for volumes migrated from the legacy state schema.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Options accepted by volume creation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateOptions {
    /// Mountpoint relative to the data root. Defaults to the volume name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mountpoint: Option<String>,
}

impl CreateOptions {
    pub fn with_mountpoint(mountpoint: impl Into<String>) -> Self {
        Self {
            mountpoint: Some(mountpoint.into()),
        }
    }
}

/// Response for mount and path lookups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MountpointResponse {
    pub mountpoint: PathBuf,
}

/// Visibility of volumes managed by a driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// Volumes exist only on this host.
    Local,
}

/// Driver capability descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    pub scope: Scope,
}

impl Capabilities {
    pub const fn local() -> Self {
        Self {
            scope: Scope::Local,
        }
    }
}
