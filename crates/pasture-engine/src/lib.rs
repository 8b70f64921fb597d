//! Pasture Engine -- frame driver, farm-scene components and headless hosts.
//!
//! This crate builds on [`pasture_core`] to run the pasture scene: a knight
//! the player steers around, a camera rig that follows it, and idle farm
//! animals. It provides:
//!
//! - [`FrameLoop`](frame_loop::FrameLoop): converts host timestamps into
//!   clamped frame deltas and drives the game object manager once per frame.
//! - The concrete components [`SkinInstance`](components::SkinInstance),
//!   [`Player`](components::Player), [`Animal`](components::Animal) and
//!   [`CameraInfo`](components::CameraInfo).
//! - [`SceneConfig`](config::SceneConfig): tunables loaded from JSON.
//! - Headless stand-ins for the rendering, animation and input collaborators,
//!   so the whole scene runs in tests and on servers.
//!
//! # Quick Start
//!
//! ```
//! use pasture_engine::prelude::*;
//!
//! let library = stock_library();
//! let mut frame_loop = FrameLoop::new(SceneConfig::default(), HeadlessScene::default()).unwrap();
//! let handles = frame_loop.populate(&library).unwrap();
//!
//! let mut input = InputSnapshot::default();
//! input.press(Direction::Up);
//! for frame in 0..30 {
//!     frame_loop.frame(frame as f64 * 16.0, &input);
//! }
//!
//! let player = frame_loop.manager().get(handles.player).unwrap();
//! assert!(player.transform().position().z > 0.0);
//! ```

#![deny(unsafe_code)]

pub mod assets;
pub mod camera;
pub mod components;
pub mod config;
pub mod frame_loop;
pub mod headless;
pub mod input;
pub mod scene;
pub mod snapshot;

/// Re-export the core crate for convenience.
pub use pasture_core;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors produced while configuring or bootstrapping a scene.
///
/// Per-frame work never returns errors; failures during a frame are logged
/// and the next frame proceeds.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// A core runtime operation failed (usually component attachment).
    #[error(transparent)]
    Core(#[from] pasture_core::CoreError),

    /// Scene configuration JSON could not be parsed.
    #[error("failed to parse scene configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// A configuration value is out of range.
    #[error("invalid configuration field '{field}': {details}")]
    InvalidConfig { field: &'static str, details: String },

    /// A model name is not in the library.
    #[error("unknown model '{name}'. Available models: [{available}]")]
    UnknownModel { name: String, available: String },
}

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for common engine usage.
pub mod prelude {
    pub use pasture_core::prelude::*;

    pub use crate::assets::ModelLibrary;
    pub use crate::camera::{PerspectiveCamera, ViewFrustum};
    pub use crate::components::{
        Animal, AnimalConfig, CameraInfo, CameraInfoConfig, Gait, Player, PlayerConfig,
        SkinInstance, FORWARD,
    };
    pub use crate::config::{CameraConfig, SceneConfig};
    pub use crate::frame_loop::{FrameClock, FrameDiagnostics, FrameLoop};
    pub use crate::headless::{
        stock_library, HeadlessMixer, HeadlessModel, HeadlessScene, NodeTransform,
    };
    pub use crate::input::InputSnapshot;
    pub use crate::scene::{populate, SceneHandles};
    pub use crate::snapshot::{ObjectState, SceneSnapshot};
    pub use crate::EngineError;
}
