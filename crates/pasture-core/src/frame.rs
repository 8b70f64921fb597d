//! Per-frame context handed to every component update.
//!
//! Instead of ambient globals (frame clock, input, camera), each frame the host
//! builds a [`FrameContext`] and passes it to
//! [`GameObjectManager::update`](crate::manager::GameObjectManager::update).
//! The manager derives a [`Frame`] from it for each game object; the frame is
//! what components read the clock and input from, publish shared state to,
//! and request object creation/removal through.

use crate::external::{Frustum, InputState, SceneParent};
use crate::game_object::GameObject;
use crate::identity::{GameObjectId, GameObjectIds};
use crate::manager::ObjectStore;

// ---------------------------------------------------------------------------
// FrameTime
// ---------------------------------------------------------------------------

/// Clock readings for one frame, in seconds.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameTime {
    /// Time since the frame driver started.
    pub time: f32,
    /// Elapsed time since the previous frame, already clamped by the driver.
    pub delta_time: f32,
}

// ---------------------------------------------------------------------------
// Shared
// ---------------------------------------------------------------------------

/// State components publish for one another across frames.
#[derive(Debug, Default)]
pub struct Shared {
    frustum: Option<Box<dyn Frustum>>,
}

impl Shared {
    /// The most recently published view frustum, if any camera published one.
    pub fn frustum(&self) -> Option<&dyn Frustum> {
        self.frustum.as_deref()
    }

    /// Publish the view frustum for visibility tests by other components.
    pub fn set_frustum(&mut self, frustum: Box<dyn Frustum>) {
        self.frustum = Some(frustum);
    }

    /// Withdraw the published frustum.
    pub fn clear_frustum(&mut self) {
        self.frustum = None;
    }
}

// ---------------------------------------------------------------------------
// FrameContext
// ---------------------------------------------------------------------------

/// Everything the host supplies for one manager update.
pub struct FrameContext<'a> {
    pub time: FrameTime,
    pub input: &'a dyn InputState,
    /// Parent under which game objects created during the frame are attached.
    pub scene: &'a mut dyn SceneParent,
    pub shared: &'a mut Shared,
}

// ---------------------------------------------------------------------------
// Frame
// ---------------------------------------------------------------------------

/// A game object's view of the frame currently being updated.
///
/// Object creation and removal requested here follow the manager's deferred
/// discipline: a created object is usable immediately through the returned
/// reference but is first updated on the next frame; a removed object is
/// skipped for the rest of this frame.
pub struct Frame<'a> {
    time: FrameTime,
    input: &'a dyn InputState,
    scene: &'a mut dyn SceneParent,
    shared: &'a mut Shared,
    objects: &'a ObjectStore,
    ids: &'a mut GameObjectIds,
    /// Objects already queued for removal this update.
    doomed: &'a [GameObjectId],
    current: GameObjectId,
    spawned: Vec<GameObject>,
    removed: Vec<GameObjectId>,
}

impl<'a> Frame<'a> {
    pub(crate) fn new(
        ctx: &'a mut FrameContext<'_>,
        objects: &'a ObjectStore,
        ids: &'a mut GameObjectIds,
        doomed: &'a [GameObjectId],
        current: GameObjectId,
    ) -> Self {
        Self {
            time: ctx.time,
            input: ctx.input,
            scene: &mut *ctx.scene,
            shared: &mut *ctx.shared,
            objects,
            ids,
            doomed,
            current,
            spawned: Vec::new(),
            removed: Vec::new(),
        }
    }

    /// Clock readings for this frame.
    pub fn time(&self) -> FrameTime {
        self.time
    }

    /// Clamped seconds since the previous frame.
    pub fn delta_time(&self) -> f32 {
        self.time.delta_time
    }

    /// Input snapshot for this frame.
    pub fn input(&self) -> &dyn InputState {
        self.input
    }

    /// Shared state published by components.
    pub fn shared(&self) -> &Shared {
        &*self.shared
    }

    /// Mutable shared state.
    pub fn shared_mut(&mut self) -> &mut Shared {
        &mut *self.shared
    }

    /// Id of the game object being updated.
    pub fn current_object(&self) -> GameObjectId {
        self.current
    }

    /// Read access to another game object, including ones created earlier in
    /// this object's update. The object being updated is not reachable here;
    /// use the component's `Owner` instead.
    pub fn game_object(&self, id: GameObjectId) -> Option<&GameObject> {
        self.objects
            .get(id)
            .or_else(|| self.spawned.iter().find(|object| object.id() == id))
    }

    /// Create a game object under the frame's scene parent.
    pub fn create_game_object(&mut self, name: &str) -> &mut GameObject {
        let transform = self.scene.attach_child(name);
        let id = self.ids.issue();
        let index = self.spawned.len();
        self.spawned.push(GameObject::new(id, name, transform));
        &mut self.spawned[index]
    }

    /// Request removal of a game object (possibly the one being updated).
    /// Returns `false` if it does not exist or is already queued.
    pub fn remove_game_object(&mut self, id: GameObjectId) -> bool {
        if self.doomed.contains(&id) || self.removed.contains(&id) {
            return false;
        }
        let exists = id == self.current
            || self.objects.contains(id)
            || self.spawned.iter().any(|object| object.id() == id);
        if exists {
            self.removed.push(id);
        }
        exists
    }

    pub(crate) fn finish(self) -> (Vec<GameObject>, Vec<GameObjectId>) {
        (self.spawned, self.removed)
    }
}
