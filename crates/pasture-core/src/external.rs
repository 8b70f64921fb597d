//! Capabilities the runtime consumes from its host.
//!
//! The core never renders, plays animation clips, or polls devices itself.
//! Hosts supply these through the traits below; `pasture-engine` ships
//! headless implementations used by its tests and demo.

use std::fmt;

use glam::{Mat4, Vec3};

// ---------------------------------------------------------------------------
// Transforms
// ---------------------------------------------------------------------------

/// A node in the host's scene graph that a game object positions.
///
/// Rotation is expressed as XYZ Euler angles in radians.
pub trait TransformHandle: fmt::Debug {
    /// Position relative to the parent node.
    fn position(&self) -> Vec3;

    /// Set the position relative to the parent node.
    fn set_position(&mut self, position: Vec3);

    /// Euler rotation in radians.
    fn rotation(&self) -> Vec3;

    /// Set the Euler rotation in radians.
    fn set_rotation(&mut self, rotation: Vec3);

    /// Move `distance` units along `axis`, where `axis` is expressed in the
    /// node's own (rotated) frame.
    fn translate_on_axis(&mut self, axis: Vec3, distance: f32);

    /// Copy another node's position onto this one.
    fn copy_position_from(&mut self, other: &dyn TransformHandle) {
        self.set_position(other.position());
    }
}

/// Something new transforms can be attached under (the scene root, or any
/// other parent node).
pub trait SceneParent {
    /// Create a child node named `name` and hand back its handle.
    fn attach_child(&mut self, name: &str) -> Box<dyn TransformHandle>;
}

// ---------------------------------------------------------------------------
// Animation
// ---------------------------------------------------------------------------

/// Handle to a playable action inside one [`AnimationMixer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActionId(pub u32);

/// Playback context bound to one cloned skeletal hierarchy.
pub trait AnimationMixer: fmt::Debug {
    /// Return the action for `clip`, creating it on first request and reusing
    /// it afterwards. `None` if the clip does not exist.
    fn clip_action(&mut self, clip: &str) -> Option<ActionId>;

    /// Enable or disable an action's contribution to the pose.
    fn set_enabled(&mut self, action: ActionId, enabled: bool);

    /// Whether the action currently contributes to the pose.
    fn is_enabled(&self, action: ActionId) -> bool;

    /// Rewind the action to its start.
    fn reset(&mut self, action: ActionId);

    /// Start (or keep) the action playing.
    fn play(&mut self, action: ActionId);

    /// Local playback time of the action in seconds.
    fn action_time(&self, action: ActionId) -> Option<f32>;

    /// Global playback-rate multiplier.
    fn time_scale(&self) -> f32;

    /// Set the global playback-rate multiplier.
    fn set_time_scale(&mut self, scale: f32);

    /// Advance every playing action by `delta_time` seconds (before scaling).
    fn update(&mut self, delta_time: f32);
}

/// A loaded, skinned model with named animation clips.
pub trait SkinnedModel: fmt::Debug {
    /// Catalog name of the model.
    fn name(&self) -> &str;

    /// Whether the model carries a clip named `clip`.
    fn has_clip(&self, clip: &str) -> bool;

    /// All clip names, in the model's own order.
    fn clip_names(&self) -> Vec<String>;

    /// Clone the skeletal hierarchy under `parent` and return a mixer bound to
    /// the clone.
    fn instantiate(&self, parent: &mut dyn TransformHandle) -> Box<dyn AnimationMixer>;
}

// ---------------------------------------------------------------------------
// Camera and visibility
// ---------------------------------------------------------------------------

/// A visible-volume test.
pub trait Frustum: fmt::Debug {
    /// Whether `point` (world space) lies inside the volume.
    fn contains_point(&self, point: Vec3) -> bool;
}

/// A camera mounted on a rig node.
pub trait Camera: fmt::Debug {
    /// The projection matrix.
    fn projection_matrix(&self) -> Mat4;

    /// Inverse of the camera's world matrix, given the rig it is mounted on.
    fn world_inverse_matrix(&self, rig: &dyn TransformHandle) -> Mat4;

    /// Update the aspect ratio after the output surface was resized.
    fn set_aspect(&mut self, aspect: f32);

    /// Build the visible volume for the current matrices.
    fn frustum(&self, rig: &dyn TransformHandle) -> Box<dyn Frustum>;
}

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// Logical directions a player can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

/// Per-frame input snapshot, refreshed by the host once per frame.
pub trait InputState {
    /// Whether `direction` is currently held.
    fn is_down(&self, direction: Direction) -> bool;
}
