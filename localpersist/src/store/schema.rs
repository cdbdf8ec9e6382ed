//! On-disk layout of the state file.
//!
//! Version 1 (current):
//!
//! ```json
//! {"schemaVersion":1,"volumes":{"vol1":{"mountpoint":"/data/vol1","createdAt":"2024-01-01T00:00:00Z"}}}
//! ```
//!
//! The top level is an envelope, not the name to record map; that map is the
//! `volumes` object.
//!
//! The unversioned `{"state":{"vol1":"/data/vol1"}}` layout is read as
//! version 0 and migrated. Any other unversioned document is corrupt.

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use localpersist_shared::errors::{PersistError, PersistResult};

use crate::volumes::constants::state::{LEGACY_SCHEMA_VERSION, SCHEMA_VERSION};

/// Stored volume record. The name is the map key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeRecord {
    pub mountpoint: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl VolumeRecord {
    pub fn new(mountpoint: PathBuf) -> Self {
        Self {
            mountpoint,
            created_at: Some(Utc::now()),
        }
    }
}

/// Registry contents keyed by volume name.
pub type VolumeMap = HashMap<String, VolumeRecord>;

/// Serialized view. Sorted so rewrites of an unchanged registry are byte-identical.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StateDocumentRef<'a> {
    schema_version: u32,
    volumes: BTreeMap<&'a str, &'a VolumeRecord>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StateDocument {
    schema_version: u32,
    #[serde(default)]
    volumes: VolumeMap,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct NestedLegacyDocument {
    state: Option<HashMap<String, PathBuf>>,
}

/// Result of decoding a state file.
#[derive(Debug)]
pub struct Decoded {
    pub volumes: VolumeMap,
    /// Schema version found on disk, before any migration.
    pub version: u32,
}

impl Decoded {
    pub fn was_migrated(&self) -> bool {
        self.version != SCHEMA_VERSION
    }
}

pub fn encode(volumes: &VolumeMap) -> PersistResult<Vec<u8>> {
    let doc = StateDocumentRef {
        schema_version: SCHEMA_VERSION,
        volumes: volumes.iter().map(|(k, v)| (k.as_str(), v)).collect(),
    };
    serde_json::to_vec(&doc)
        .map_err(|e| PersistError::Internal(format!("Failed to serialize state: {}", e)))
}

pub fn decode(bytes: &[u8]) -> PersistResult<Decoded> {
    let value: Value = serde_json::from_slice(bytes)?;
    let Value::Object(ref object) = value else {
        return Err(PersistError::CorruptState(
            "top-level value is not an object".to_string(),
        ));
    };

    let version = object
        .get("schemaVersion")
        .map(|raw| {
            raw.as_u64()
                .ok_or_else(|| PersistError::CorruptState(format!("invalid schemaVersion {}", raw)))
        })
        .transpose()?;

    match version {
        Some(version) if version > u64::from(SCHEMA_VERSION) => {
            Err(PersistError::CorruptState(format!(
                "schema version {} is newer than supported {}",
                version, SCHEMA_VERSION
            )))
        }
        Some(version) if version < u64::from(SCHEMA_VERSION) => Err(
            PersistError::CorruptState(format!("unknown schema version {}", version)),
        ),
        Some(_) => {
            let doc: StateDocument = serde_json::from_value(value)?;
            Ok(Decoded {
                volumes: doc.volumes,
                version: doc.schema_version,
            })
        }
        None => decode_legacy(value),
    }
}

fn decode_legacy(value: Value) -> PersistResult<Decoded> {
    let doc: NestedLegacyDocument = serde_json::from_value(value).map_err(|e| {
        PersistError::CorruptState(format!("unversioned state is not the legacy layout: {}", e))
    })?;

    let mut volumes = VolumeMap::new();
    for (name, mountpoint) in doc.state.unwrap_or_default() {
        if !mountpoint.is_absolute() {
            return Err(PersistError::CorruptState(format!(
                "legacy mountpoint {} for volume {} is not absolute",
                mountpoint.display(),
                name
            )));
        }
        volumes.insert(
            name,
            VolumeRecord {
                mountpoint,
                created_at: None,
            },
        );
    }

    Ok(Decoded {
        volumes,
        version: LEGACY_SCHEMA_VERSION,
    })
}
