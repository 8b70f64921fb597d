//! Pasture Core -- game objects, components and deferred-mutation traversal.
//!
//! This crate is the reusable runtime of the Pasture scene engine. A
//! [`GameObject`](game_object::GameObject) owns a transform handle and an
//! ordered list of [`Component`](component::Component)s. The
//! [`GameObjectManager`](manager::GameObjectManager) owns every game object and
//! drives the per-frame update of all of them.
//!
//! Both the manager's object list and each object's component list are
//! [`SafeArray`](safe_array::SafeArray)s: additions and removals requested while
//! a traversal is running are queued and applied at the next safe point, so a
//! component may spawn or remove objects (or siblings) from inside its own
//! `update` without corrupting the traversal in flight.
//!
//! Rendering, animation playback, camera math and input polling are consumed
//! through the narrow traits in [`external`].
//!
//! # Quick Start
//!
//! ```
//! use pasture_core::prelude::*;
//! # use glam::Vec3;
//! # #[derive(Debug, Default)]
//! # struct Node { position: Vec3, rotation: Vec3 }
//! # impl TransformHandle for Node {
//! #     fn position(&self) -> Vec3 { self.position }
//! #     fn set_position(&mut self, position: Vec3) { self.position = position; }
//! #     fn rotation(&self) -> Vec3 { self.rotation }
//! #     fn set_rotation(&mut self, rotation: Vec3) { self.rotation = rotation; }
//! #     fn translate_on_axis(&mut self, axis: Vec3, distance: f32) { self.position += axis * distance; }
//! # }
//! # struct Root;
//! # impl SceneParent for Root {
//! #     fn attach_child(&mut self, _name: &str) -> Box<dyn TransformHandle> { Box::new(Node::default()) }
//! # }
//! # struct NoInput;
//! # impl InputState for NoInput { fn is_down(&self, _d: Direction) -> bool { false } }
//!
//! #[derive(Debug, Default)]
//! struct Spin;
//!
//! impl Component for Spin {
//!     fn update(&mut self, owner: &mut Owner<'_>, frame: &mut Frame<'_>) {
//!         let mut rotation = owner.transform().rotation();
//!         rotation.y += frame.delta_time();
//!         owner.transform_mut().set_rotation(rotation);
//!     }
//! }
//!
//! impl Attach for Spin {
//!     type Config = ();
//!     fn attach(_owner: &mut Owner<'_>, _config: ()) -> Result<Self, CoreError> {
//!         Ok(Spin)
//!     }
//! }
//!
//! let mut root = Root;
//! let mut manager = GameObjectManager::new();
//! let id = manager.create_game_object(&mut root, "spinner").id();
//! manager.get_mut(id).unwrap().add_component::<Spin>(()).unwrap();
//!
//! let mut shared = Shared::default();
//! let mut ctx = FrameContext {
//!     time: FrameTime { time: 0.5, delta_time: 0.5 },
//!     input: &NoInput,
//!     scene: &mut root,
//!     shared: &mut shared,
//! };
//! manager.update(&mut ctx);
//!
//! assert_eq!(manager.get(id).unwrap().transform().rotation().y, 0.5);
//! ```

#![deny(unsafe_code)]

pub mod component;
pub mod external;
pub mod frame;
pub mod game_object;
pub mod identity;
pub mod manager;
pub mod safe_array;

#[cfg(test)]
mod testing;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors produced by core runtime operations.
///
/// Lookups never produce errors -- they return `Option`. Errors are reserved
/// for attach-time configuration problems and operations on dead objects.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// An animation clip was requested that the model does not provide.
    #[error("model '{model}' has no animation clip '{clip}'. Available clips: [{available}]")]
    UnknownClip {
        model: String,
        clip: String,
        available: String,
    },

    /// A component was attached with configuration it cannot work with.
    #[error("invalid configuration for component '{component}': {details}")]
    InvalidComponentConfig {
        component: &'static str,
        details: String,
    },

    /// The game object does not exist (removed, or never created).
    #[error("game object {id:?} does not exist (removed or never created)")]
    StaleGameObject {
        id: identity::GameObjectId,
    },
}

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::component::{AsAny, Attach, Component, ComponentRef, Owner};
    pub use crate::external::{
        ActionId, AnimationMixer, Camera, Direction, Frustum, InputState, SceneParent,
        SkinnedModel, TransformHandle,
    };
    pub use crate::frame::{Frame, FrameContext, FrameTime, Shared};
    pub use crate::game_object::GameObject;
    pub use crate::identity::{ComponentId, GameObjectId};
    pub use crate::manager::GameObjectManager;
    pub use crate::safe_array::{Deferred, SafeArray};
    pub use crate::CoreError;
}
