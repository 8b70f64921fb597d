//! Serializable captures of the scene state with BLAKE3 hashing.
//!
//! A [`SceneSnapshot`] records, for every live game object in update order,
//! its id, name, transform and attached component types. The BLAKE3 digest
//! over that content is what determinism tests compare: two sessions fed the
//! same timestamps and inputs must end with the same hash.
//!
//! Snapshots are one-way. Components hold host resources (mixers, cameras)
//! that cannot be rebuilt from plain data, so there is no restore.
//!
//! ```
//! use pasture_engine::prelude::*;
//!
//! let mut frame_loop = FrameLoop::new(SceneConfig::default(), HeadlessScene::default()).unwrap();
//! frame_loop.populate(&stock_library()).unwrap();
//! frame_loop.frame(16.0, &InputSnapshot::default());
//!
//! let snapshot = frame_loop.capture_snapshot();
//! assert_eq!(snapshot.frame, 1);
//! assert_eq!(snapshot.hash.len(), 64); // BLAKE3 hex digest
//! assert_eq!(snapshot.objects[0].name, "player");
//! ```

use serde::{Deserialize, Serialize};

use pasture_core::prelude::*;

use crate::EngineError;

// ---------------------------------------------------------------------------
// ObjectState
// ---------------------------------------------------------------------------

/// One game object as captured.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectState {
    /// Slot and lifetime packed by `GameObjectId::to_raw`.
    pub id: u64,
    pub name: String,
    pub position: [f32; 3],
    /// Euler rotation in radians.
    pub rotation: [f32; 3],
    /// Component type names (without module path) in attachment order.
    pub components: Vec<String>,
}

impl ObjectState {
    fn capture(object: &GameObject) -> Self {
        let transform = object.transform();
        Self {
            id: object.id().to_raw(),
            name: object.name().to_owned(),
            position: transform.position().to_array(),
            rotation: transform.rotation().to_array(),
            components: object
                .component_type_names()
                .into_iter()
                .map(|name| short_type_name(name).to_owned())
                .collect(),
        }
    }
}

fn short_type_name(name: &str) -> &str {
    name.rsplit("::").next().unwrap_or(name)
}

// ---------------------------------------------------------------------------
// SceneSnapshot
// ---------------------------------------------------------------------------

/// Captured state of every live game object after some number of frames.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneSnapshot {
    /// Frames run at capture time.
    pub frame: u64,
    /// Live objects in update order.
    pub objects: Vec<ObjectState>,
    /// BLAKE3 hex digest (64 lowercase hex chars) of `frame` and `objects`.
    pub hash: String,
}

impl SceneSnapshot {
    /// Capture every object currently live in `manager`.
    pub fn capture(manager: &GameObjectManager, frame: u64) -> Self {
        let objects: Vec<ObjectState> = manager.iter().map(ObjectState::capture).collect();
        let hash = compute_hash(frame, &objects);
        Self {
            frame,
            objects,
            hash,
        }
    }

    /// Recompute the digest and compare it with the stored one.
    pub fn verify(&self) -> bool {
        compute_hash(self.frame, &self.objects) == self.hash
    }

    /// Captured object by name (first match in update order).
    pub fn object(&self, name: &str) -> Option<&ObjectState> {
        self.objects.iter().find(|object| object.name == name)
    }

    /// Pretty-printed JSON, for logging or writing to disk.
    pub fn to_json(&self) -> Result<String, EngineError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        Ok(serde_json::from_str(json)?)
    }
}

// ---------------------------------------------------------------------------
// Hashing
// ---------------------------------------------------------------------------

/// Digest over a fixed little-endian layout, so the hash does not depend on
/// any serializer's float formatting.
fn compute_hash(frame: u64, objects: &[ObjectState]) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(&frame.to_le_bytes());
    hasher.update(&(objects.len() as u64).to_le_bytes());
    for object in objects {
        hasher.update(&object.id.to_le_bytes());
        hash_str(&mut hasher, &object.name);
        for value in object.position.iter().chain(object.rotation.iter()) {
            hasher.update(&value.to_bits().to_le_bytes());
        }
        hasher.update(&(object.components.len() as u64).to_le_bytes());
        for component in &object.components {
            hash_str(&mut hasher, component);
        }
    }
    hasher.finalize().to_hex().to_string()
}

fn hash_str(hasher: &mut blake3::Hasher, value: &str) {
    hasher.update(&(value.len() as u64).to_le_bytes());
    hasher.update(value.as_bytes());
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
