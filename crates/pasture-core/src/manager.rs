//! The [`GameObjectManager`] owns every game object and drives the per-frame
//! update of all of them.
//!
//! Object order is a [`SafeArray`] of ids, so objects created during an
//! update are first visited on the next update, and objects removed during an
//! update are skipped for the rest of it. A removed object is dropped, and its
//! id invalidated, at the end of the update that applies the removal.

use std::collections::HashMap;

use tracing::{debug, trace, warn};

use crate::component::{Attach, ComponentRef};
use crate::external::SceneParent;
use crate::frame::{Frame, FrameContext};
use crate::game_object::GameObject;
use crate::identity::{GameObjectId, GameObjectIds};
use crate::safe_array::SafeArray;
use crate::CoreError;

// ---------------------------------------------------------------------------
// ObjectStore
// ---------------------------------------------------------------------------

/// Owned game objects keyed by id. Traversal order lives in the manager's
/// `SafeArray`; this is storage only.
#[derive(Debug, Default)]
pub(crate) struct ObjectStore {
    objects: HashMap<GameObjectId, GameObject>,
}

impl ObjectStore {
    pub(crate) fn get(&self, id: GameObjectId) -> Option<&GameObject> {
        self.objects.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: GameObjectId) -> Option<&mut GameObject> {
        self.objects.get_mut(&id)
    }

    pub(crate) fn contains(&self, id: GameObjectId) -> bool {
        self.objects.contains_key(&id)
    }

    pub(crate) fn insert(&mut self, object: GameObject) -> &mut GameObject {
        let id = object.id();
        self.objects.entry(id).or_insert(object)
    }

    /// Detach an object, either for its own update or to drop it.
    pub(crate) fn take(&mut self, id: GameObjectId) -> Option<GameObject> {
        self.objects.remove(&id)
    }
}

// ---------------------------------------------------------------------------
// GameObjectManager
// ---------------------------------------------------------------------------

/// Sole owner of the game-object graph.
#[derive(Debug, Default)]
pub struct GameObjectManager {
    objects: SafeArray<GameObjectId>,
    store: ObjectStore,
    ids: GameObjectIds,
    /// Objects queued for removal, dropped once the removal is applied.
    doomed: Vec<GameObjectId>,
}

impl GameObjectManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a game object whose transform is attached under `parent`.
    ///
    /// The object is returned immediately and can be configured right away,
    /// but it is first visited by the update that follows this call.
    pub fn create_game_object(
        &mut self,
        parent: &mut dyn SceneParent,
        name: &str,
    ) -> &mut GameObject {
        let transform = parent.attach_child(name);
        let id = self.ids.issue();
        self.objects.add(id);
        debug!(object = %id, name, "game object created");
        self.store.insert(GameObject::new(id, name, transform))
    }

    /// Queue a game object for removal. Returns `false` if it does not exist
    /// or is already queued.
    pub fn remove_game_object(&mut self, id: GameObjectId) -> bool {
        if !self.contains(id) {
            return false;
        }
        self.objects.remove(id);
        self.doomed.push(id);
        debug!(object = %id, "game object queued for removal");
        true
    }

    /// Attach a component to the object `id`.
    pub fn add_component<C: Attach>(
        &mut self,
        id: GameObjectId,
        config: C::Config,
    ) -> Result<ComponentRef<C>, CoreError> {
        self.get_mut(id)
            .ok_or(CoreError::StaleGameObject { id })?
            .add_component(config)
    }

    /// Update every live game object once, in creation-commit order.
    ///
    /// Returns the number of objects visited.
    pub fn update(&mut self, ctx: &mut FrameContext<'_>) -> usize {
        let Self {
            objects,
            store,
            ids,
            doomed,
        } = self;

        let mut visited = 0;
        objects.for_each_deferred(|id, pending| {
            let Some(mut object) = store.take(id) else {
                warn!(object = %id, "traversal reached an object with no storage");
                return;
            };
            let (spawned, removed) = {
                let mut frame = Frame::new(&mut *ctx, &*store, &mut *ids, &doomed[..], id);
                object.update(&mut frame);
                frame.finish()
            };
            store.insert(object);
            visited += 1;

            for child in spawned {
                let child_id = child.id();
                pending.add(child_id);
                store.insert(child);
                debug!(object = %child_id, parent = %id, "game object created during update");
            }
            for target in removed {
                if !pending.withdraw_add(target) {
                    pending.remove(target);
                }
                doomed.push(target);
                debug!(object = %target, by = %id, "game object queued for removal");
            }
        });

        for id in doomed.drain(..) {
            if objects.contains(id) {
                continue;
            }
            if store.take(id).is_some() {
                ids.retire(id);
                trace!(object = %id, "game object dropped");
            }
        }

        visited
    }

    /// A live game object. Objects queued for removal are not returned.
    pub fn get(&self, id: GameObjectId) -> Option<&GameObject> {
        if !self.objects.contains(id) {
            return None;
        }
        self.store.get(id)
    }

    /// Mutable access to a live game object.
    pub fn get_mut(&mut self, id: GameObjectId) -> Option<&mut GameObject> {
        if !self.objects.contains(id) {
            return None;
        }
        self.store.get_mut(id)
    }

    /// Committed objects in update order, excluding any queued for removal.
    ///
    /// Objects created since the last update are not listed yet.
    pub fn live_ids(&self) -> Vec<GameObjectId> {
        self.objects.live().collect()
    }

    /// Whether `id` names a live object (committed or awaiting its first
    /// update) that is not queued for removal.
    pub fn contains(&self, id: GameObjectId) -> bool {
        self.objects.contains(id)
    }

    /// Logical number of live objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// First committed object named `name`, in update order.
    pub fn find_by_name(&self, name: &str) -> Option<&GameObject> {
        self.objects
            .live()
            .filter_map(|id| self.store.get(id))
            .find(|object| object.name() == name)
    }

    /// Iterate live committed objects in update order.
    pub fn iter(&self) -> impl Iterator<Item = &GameObject> + '_ {
        self.objects.live().filter_map(|id| self.store.get(id))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
