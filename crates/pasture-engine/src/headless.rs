//! Headless implementations of the scene-graph and animation collaborators.
//!
//! Nothing here renders. Transforms are plain glam values, models are clip
//! catalogs with durations, and mixers keep looping per-action clocks. This
//! is enough to run the full scene deterministically in tests, benchmarks
//! and on servers.

use std::rc::Rc;

use glam::{EulerRot, Quat, Vec3};
use tracing::trace;

use pasture_core::external::{
    ActionId, AnimationMixer, SceneParent, SkinnedModel, TransformHandle,
};

use crate::assets::ModelLibrary;

// ---------------------------------------------------------------------------
// NodeTransform
// ---------------------------------------------------------------------------

/// A scene-graph node holding a position and XYZ Euler rotation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeTransform {
    position: Vec3,
    rotation: Vec3,
}

impl NodeTransform {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            rotation: Vec3::ZERO,
        }
    }

    pub fn orientation(&self) -> Quat {
        Quat::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z)
    }
}

impl TransformHandle for NodeTransform {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    fn rotation(&self) -> Vec3 {
        self.rotation
    }

    fn set_rotation(&mut self, rotation: Vec3) {
        self.rotation = rotation;
    }

    fn translate_on_axis(&mut self, axis: Vec3, distance: f32) {
        self.position += self.orientation() * axis.normalize_or_zero() * distance;
    }
}

// ---------------------------------------------------------------------------
// HeadlessScene
// ---------------------------------------------------------------------------

/// Scene root that records the name of every node attached to it.
#[derive(Debug, Default)]
pub struct HeadlessScene {
    attached: Vec<String>,
}

impl HeadlessScene {
    /// Names of attached nodes, in attachment order.
    pub fn attached(&self) -> &[String] {
        &self.attached
    }
}

impl SceneParent for HeadlessScene {
    fn attach_child(&mut self, name: &str) -> Box<dyn TransformHandle> {
        self.attached.push(name.to_owned());
        Box::new(NodeTransform::default())
    }
}

// ---------------------------------------------------------------------------
// HeadlessModel
// ---------------------------------------------------------------------------

/// A model reduced to its animation clip catalog.
#[derive(Debug, Clone)]
pub struct HeadlessModel {
    name: String,
    /// `(clip name, duration in seconds)`, in the model's order.
    clips: Vec<(String, f32)>,
}

impl HeadlessModel {
    pub fn new(name: &str, clips: &[(&str, f32)]) -> Self {
        Self {
            name: name.to_owned(),
            clips: clips
                .iter()
                .map(|(clip, duration)| ((*clip).to_owned(), *duration))
                .collect(),
        }
    }

    pub fn clip_duration(&self, clip: &str) -> Option<f32> {
        self.clips
            .iter()
            .find(|(name, _)| name == clip)
            .map(|(_, duration)| *duration)
    }
}

impl SkinnedModel for HeadlessModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn has_clip(&self, clip: &str) -> bool {
        self.clips.iter().any(|(name, _)| name == clip)
    }

    fn clip_names(&self) -> Vec<String> {
        self.clips.iter().map(|(name, _)| name.clone()).collect()
    }

    fn instantiate(&self, _parent: &mut dyn TransformHandle) -> Box<dyn AnimationMixer> {
        trace!(model = %self.name, "instantiated headless skin");
        Box::new(HeadlessMixer::new(self.clips.clone()))
    }
}

// ---------------------------------------------------------------------------
// HeadlessMixer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct Action {
    clip: String,
    duration: f32,
    enabled: bool,
    playing: bool,
    time: f32,
}

/// Mixer whose actions are looping clocks.
///
/// Only actions that are both enabled and playing advance.
#[derive(Debug, Clone)]
pub struct HeadlessMixer {
    clips: Vec<(String, f32)>,
    actions: Vec<Action>,
    time_scale: f32,
}

impl HeadlessMixer {
    pub fn new(clips: Vec<(String, f32)>) -> Self {
        Self {
            clips,
            actions: Vec::new(),
            time_scale: 1.0,
        }
    }

    /// Number of actions created so far.
    pub fn action_count(&self) -> usize {
        self.actions.len()
    }

    /// Clip names of the actions that currently advance.
    pub fn active_clips(&self) -> Vec<&str> {
        self.actions
            .iter()
            .filter(|a| a.enabled && a.playing)
            .map(|a| a.clip.as_str())
            .collect()
    }

    fn action_mut(&mut self, action: ActionId) -> Option<&mut Action> {
        self.actions.get_mut(action.0 as usize)
    }
}

impl AnimationMixer for HeadlessMixer {
    fn clip_action(&mut self, clip: &str) -> Option<ActionId> {
        if let Some(index) = self.actions.iter().position(|a| a.clip == clip) {
            return Some(ActionId(index as u32));
        }
        let duration = self
            .clips
            .iter()
            .find(|(name, _)| name == clip)
            .map(|(_, duration)| *duration)?;
        self.actions.push(Action {
            clip: clip.to_owned(),
            duration,
            enabled: true,
            playing: false,
            time: 0.0,
        });
        Some(ActionId((self.actions.len() - 1) as u32))
    }

    fn set_enabled(&mut self, action: ActionId, enabled: bool) {
        if let Some(action) = self.action_mut(action) {
            action.enabled = enabled;
        }
    }

    fn is_enabled(&self, action: ActionId) -> bool {
        self.actions
            .get(action.0 as usize)
            .is_some_and(|a| a.enabled)
    }

    fn reset(&mut self, action: ActionId) {
        if let Some(action) = self.action_mut(action) {
            action.time = 0.0;
            action.enabled = true;
        }
    }

    fn play(&mut self, action: ActionId) {
        if let Some(action) = self.action_mut(action) {
            action.playing = true;
        }
    }

    fn action_time(&self, action: ActionId) -> Option<f32> {
        self.actions.get(action.0 as usize).map(|a| a.time)
    }

    fn time_scale(&self) -> f32 {
        self.time_scale
    }

    fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = scale;
    }

    fn update(&mut self, delta_time: f32) {
        let step = delta_time * self.time_scale;
        for action in self.actions.iter_mut().filter(|a| a.enabled && a.playing) {
            action.time += step;
            if action.duration > 0.0 {
                action.time %= action.duration;
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Stock library
// ---------------------------------------------------------------------------

/// The farm cast: a knight and five animals, with the clips the scene uses.
pub fn stock_library() -> ModelLibrary {
    let animal_clips: &[(&str, f32)] = &[
        ("Idle", 2.0),
        ("Walk", 1.0),
        ("Eating", 3.0),
        ("Death", 1.5),
    ];

    let mut library = ModelLibrary::new();
    library.insert(Rc::new(HeadlessModel::new(
        "knight",
        &[
            ("Idle", 2.5),
            ("Run", 0.8),
            ("Walk", 1.2),
            ("Roll", 0.9),
            ("Sword_Slash", 1.1),
        ],
    )));
    for name in ["pig", "cow", "llama", "zebra", "horse"] {
        library.insert(Rc::new(HeadlessModel::new(name, animal_clips)));
    }
    library
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
