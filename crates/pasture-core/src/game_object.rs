//! Game objects: named entities owning a transform and ordered components.

use std::fmt;

use tracing::trace;

use crate::component::{Attach, Component, ComponentRef, ComponentStore, Owner};
use crate::external::TransformHandle;
use crate::frame::Frame;
use crate::identity::{ComponentId, GameObjectId};
use crate::safe_array::SafeArray;
use crate::CoreError;

/// A named entity with a transform and an ordered list of components.
///
/// Components update in attachment order. The update traversal is a
/// [`SafeArray`], so components attached during an update are first updated
/// on the next pass, and components removed during an update are skipped for
/// the rest of the pass.
///
/// Game objects are created by the
/// [`GameObjectManager`](crate::manager::GameObjectManager) (or by a
/// [`Frame`] during an update) and live until the manager drops them.
pub struct GameObject {
    id: GameObjectId,
    name: String,
    transform: Box<dyn TransformHandle>,
    components: SafeArray<ComponentId>,
    store: ComponentStore,
}

impl GameObject {
    pub(crate) fn new(id: GameObjectId, name: &str, transform: Box<dyn TransformHandle>) -> Self {
        Self {
            id,
            name: name.to_owned(),
            transform,
            components: SafeArray::new(),
            store: ComponentStore::default(),
        }
    }

    /// Unique id assigned by the manager.
    pub fn id(&self) -> GameObjectId {
        self.id
    }

    /// Informational name; not required to be unique.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn transform(&self) -> &dyn TransformHandle {
        self.transform.as_ref()
    }

    pub fn transform_mut(&mut self) -> &mut dyn TransformHandle {
        self.transform.as_mut()
    }

    /// The component-facing view of this object, as components see it during
    /// `update`.
    pub fn owner(&mut self) -> Owner<'_> {
        Owner::new(
            self.id,
            &self.name,
            self.transform.as_mut(),
            &mut self.store,
            self.components.pending_mut(),
        )
    }

    /// Construct a component of type `C` with `config` and attach it after
    /// all existing components.
    ///
    /// Multiple components of the same type may coexist.
    pub fn add_component<C: Attach>(
        &mut self,
        config: C::Config,
    ) -> Result<ComponentRef<C>, CoreError> {
        self.owner().add_component(config)
    }

    /// Remove a component by id. No-op (returning `false`) if absent.
    pub fn remove_component(&mut self, id: ComponentId) -> bool {
        self.owner().remove_component(id)
    }

    /// Handle to the first component of type `C`, in attachment order.
    pub fn get_component<C: Component>(&self) -> Option<ComponentRef<C>> {
        self.store.first_of::<C>().map(ComponentRef::new)
    }

    /// First component of type `C`, in attachment order.
    pub fn get<C: Component>(&self) -> Option<&C> {
        let id = self.store.first_of::<C>()?;
        self.store.get(id)
    }

    /// Mutable access to the first component of type `C`.
    pub fn get_mut<C: Component>(&mut self) -> Option<&mut C> {
        let id = self.store.first_of::<C>()?;
        self.store.get_mut(id)
    }

    /// Resolve a typed handle. `None` if the component has been removed.
    pub fn component<C: Component>(&self, handle: ComponentRef<C>) -> Option<&C> {
        self.store.get(handle.id())
    }

    /// Resolve a typed handle mutably.
    pub fn component_mut<C: Component>(&mut self, handle: ComponentRef<C>) -> Option<&mut C> {
        self.store.get_mut(handle.id())
    }

    /// Whether a component with this id is attached.
    pub fn has_component(&self, id: ComponentId) -> bool {
        self.store.contains(id)
    }

    /// Number of attached components.
    pub fn component_count(&self) -> usize {
        self.store.len()
    }

    /// Type names of attached components, in attachment order.
    pub fn component_type_names(&self) -> Vec<&'static str> {
        self.store.type_names()
    }

    /// Update every attached component once, in attachment order.
    pub fn update(&mut self, frame: &mut Frame<'_>) {
        let Self {
            id,
            name,
            transform,
            components,
            store,
        } = self;

        components.for_each_deferred(|component_id, pending| {
            // Removed since it was queued for traversal.
            let Some(mut component) = store.take(component_id) else {
                return;
            };
            {
                let mut owner = Owner::new(*id, name.as_str(), &mut **transform, &mut *store, pending);
                component.update(&mut owner, frame);
            }
            if !store.restore(component_id, component) {
                trace!(object = %id, ?component_id, "component removed itself during update");
            }
        });
    }
}

impl fmt::Debug for GameObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameObject")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("components", &self.store.type_names())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::frame::Shared;
    use crate::manager::GameObjectManager;
    use crate::testing::{once, step, Log, OnFirstUpdate, Recorder, Root};

    struct Marker(u32);

    impl Component for Marker {}

    impl Attach for Marker {
        type Config = u32;

        fn attach(_owner: &mut Owner<'_>, value: u32) -> Result<Self, CoreError> {
            Ok(Marker(value))
        }
    }

    /// Attaches a `Marker` sibling while being constructed.
    struct WithMarker;

    impl Component for WithMarker {}

    impl Attach for WithMarker {
        type Config = ();

        fn attach(owner: &mut Owner<'_>, _config: ()) -> Result<Self, CoreError> {
            owner.add_component::<Marker>(99)?;
            Ok(WithMarker)
        }
    }

    struct Rejects;

    impl Component for Rejects {}

    impl Attach for Rejects {
        type Config = ();

        fn attach(_owner: &mut Owner<'_>, _config: ()) -> Result<Self, CoreError> {
            Err(CoreError::InvalidComponentConfig {
                component: "Rejects",
                details: "always".into(),
            })
        }
    }

    /// Attaches a `Recorder` sibling, then rejects its own configuration.
    struct RecordsThenRejects;

    impl Component for RecordsThenRejects {}

    impl Attach for RecordsThenRejects {
        type Config = Log;

        fn attach(owner: &mut Owner<'_>, log: Log) -> Result<Self, CoreError> {
            owner.add_component::<Recorder>((log, "sibling"))?;
            Err(CoreError::InvalidComponentConfig {
                component: "RecordsThenRejects",
                details: "rejected after attaching a sibling".into(),
            })
        }
    }

    fn setup() -> (GameObjectManager, Root, Shared, Log) {
        (
            GameObjectManager::new(),
            Root::default(),
            Shared::default(),
            Rc::new(RefCell::new(Vec::new())),
        )
    }

    #[test]
    fn get_component_returns_first_in_attachment_order() {
        let (mut manager, mut root, _, _) = setup();
        let object = manager.create_game_object(&mut root, "o");
        let first = object.add_component::<Marker>(1).unwrap();
        let second = object.add_component::<Marker>(2).unwrap();

        assert_eq!(object.get_component::<Marker>(), Some(first));
        assert_eq!(object.get::<Marker>().map(|m| m.0), Some(1));
        assert_eq!(object.component(second).map(|m| m.0), Some(2));
        assert!(object.get_component::<Recorder>().is_none());

        assert!(object.remove_component(first.id()));
        assert!(!object.remove_component(first.id()));
        assert_eq!(object.get_component::<Marker>(), Some(second));
        assert!(object.component(first).is_none());
    }

    #[test]
    fn attach_may_add_siblings_first() {
        let (mut manager, mut root, _, _) = setup();
        let object = manager.create_game_object(&mut root, "o");
        object.add_component::<WithMarker>(()).unwrap();

        assert_eq!(object.component_count(), 2);
        assert_eq!(object.get::<Marker>().map(|m| m.0), Some(99));
        let names = object.component_type_names();
        assert!(names[0].ends_with("Marker"));
        assert!(names[1].ends_with("WithMarker"));
    }

    #[test]
    fn failed_attach_leaves_object_untouched() {
        let (mut manager, mut root, _, _) = setup();
        let object = manager.create_game_object(&mut root, "o");
        let result = object.add_component::<Rejects>(());
        assert!(matches!(
            result,
            Err(CoreError::InvalidComponentConfig { component: "Rejects", .. })
        ));
        assert_eq!(object.component_count(), 0);
    }

    #[test]
    fn failed_attach_detaches_siblings_it_added() {
        let (mut manager, mut root, mut shared, log) = setup();
        let object = manager.create_game_object(&mut root, "o");
        let kept = object.add_component::<Marker>(7).unwrap();

        let result = object.add_component::<RecordsThenRejects>(Rc::clone(&log));
        assert!(matches!(
            result,
            Err(CoreError::InvalidComponentConfig { component: "RecordsThenRejects", .. })
        ));
        assert_eq!(object.component_count(), 1);
        assert!(object.get_component::<Recorder>().is_none());
        assert_eq!(object.component(kept).map(|m| m.0), Some(7));

        // The discarded sibling never runs.
        step(&mut manager, &mut root, &mut shared);
        step(&mut manager, &mut root, &mut shared);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn components_update_in_attachment_order() {
        let (mut manager, mut root, mut shared, log) = setup();
        let object = manager.create_game_object(&mut root, "o");
        for tag in ["first", "second", "third"] {
            object
                .add_component::<Recorder>((Rc::clone(&log), tag))
                .unwrap();
        }
        step(&mut manager, &mut root, &mut shared);
        assert_eq!(*log.borrow(), vec!["o:first", "o:second", "o:third"]);
    }

    #[test]
    fn removing_a_later_sibling_during_update_skips_it() {
        let (mut manager, mut root, mut shared, log) = setup();
        let object = manager.create_game_object(&mut root, "o");
        let id = object.id();
        object
            .add_component::<OnFirstUpdate>(once(|owner, _frame| {
                let victim = owner.get_component::<Recorder>().unwrap();
                assert!(owner.remove_component(victim.id()));
            }))
            .unwrap();
        object
            .add_component::<Recorder>((Rc::clone(&log), "doomed"))
            .unwrap();
        object.add_component::<Marker>(0).unwrap();

        step(&mut manager, &mut root, &mut shared);
        assert!(log.borrow().is_empty());
        let object = manager.get(id).unwrap();
        assert_eq!(object.component_count(), 2);
        assert!(object.get_component::<Recorder>().is_none());
    }

    #[test]
    fn component_added_during_update_runs_next_pass() {
        let (mut manager, mut root, mut shared, log) = setup();
        let object = manager.create_game_object(&mut root, "o");
        let late_log = Rc::clone(&log);
        object
            .add_component::<OnFirstUpdate>(once(move |owner, _frame| {
                owner.add_component::<Recorder>((late_log, "late")).unwrap();
            }))
            .unwrap();

        step(&mut manager, &mut root, &mut shared);
        assert!(log.borrow().is_empty());
        step(&mut manager, &mut root, &mut shared);
        assert_eq!(*log.borrow(), vec!["o:late"]);
    }

    #[test]
    fn component_cannot_see_itself_during_update() {
        let (mut manager, mut root, mut shared, _) = setup();
        let object = manager.create_game_object(&mut root, "o");
        object
            .add_component::<OnFirstUpdate>(once(|owner, _frame| {
                assert!(owner.get_component::<OnFirstUpdate>().is_none());
                assert_eq!(owner.component_count(), 1);
            }))
            .unwrap();
        step(&mut manager, &mut root, &mut shared);
    }
}
