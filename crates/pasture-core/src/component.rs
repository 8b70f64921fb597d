//! Components: per-frame behaviour units attached to one game object.
//!
//! A component is any `'static` type implementing [`Component`]. Components
//! are created through [`Attach`], the factory that receives the owning game
//! object (as an [`Owner`] view) plus variant-specific configuration, and may
//! itself attach sibling components before it is attached.
//!
//! Lookups are by concrete type and return the first match in attachment
//! order. Holding on to a sibling is done with the copyable [`ComponentRef`]
//! handle returned by `add_component`, never with a reference.

use std::any::Any;
use std::fmt;
use std::marker::PhantomData;

use tracing::debug;

use crate::external::TransformHandle;
use crate::frame::Frame;
use crate::identity::{ComponentId, GameObjectId};
use crate::safe_array::Deferred;
use crate::CoreError;

// ---------------------------------------------------------------------------
// Component traits
// ---------------------------------------------------------------------------

/// Dynamic-typing helper so boxed components can be downcast by type.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A behaviour unit updated once per frame by its owning game object.
pub trait Component: AsAny {
    /// Per-frame hook. The default does nothing.
    ///
    /// `owner` gives access to the owning game object's transform and sibling
    /// components; the component itself is detached from `owner` for the
    /// duration of the call, so it cannot find itself through lookups.
    fn update(&mut self, _owner: &mut Owner<'_>, _frame: &mut Frame<'_>) {}

    /// Type name used in diagnostics.
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Construction of a component variant from its configuration.
pub trait Attach: Component + Sized {
    /// Variant-specific arguments.
    type Config;

    /// Build the component for `owner`. Configuration problems must be
    /// reported here rather than surfacing later during `update`.
    fn attach(owner: &mut Owner<'_>, config: Self::Config) -> Result<Self, CoreError>;
}

// ---------------------------------------------------------------------------
// ComponentRef
// ---------------------------------------------------------------------------

/// Typed, copyable handle to a component attached to a known game object.
pub struct ComponentRef<C> {
    id: ComponentId,
    _marker: PhantomData<fn() -> C>,
}

impl<C> ComponentRef<C> {
    pub(crate) fn new(id: ComponentId) -> Self {
        Self {
            id,
            _marker: PhantomData,
        }
    }

    /// The untyped id, as accepted by `remove_component`.
    pub fn id(self) -> ComponentId {
        self.id
    }
}

impl<C> Clone for ComponentRef<C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C> Copy for ComponentRef<C> {}

impl<C> PartialEq for ComponentRef<C> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<C> Eq for ComponentRef<C> {}

impl<C> fmt::Debug for ComponentRef<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ComponentRef<{}>({})", std::any::type_name::<C>(), self.id.0)
    }
}

// ---------------------------------------------------------------------------
// ComponentStore
// ---------------------------------------------------------------------------

struct Slot {
    id: ComponentId,
    /// `None` while the component is detached for its own update.
    component: Option<Box<dyn Component>>,
}

/// Owned components of one game object, in attachment order.
///
/// Attachment and removal take effect here immediately (for lookup); the
/// update traversal order is governed separately by the object's
/// `SafeArray<ComponentId>`.
#[derive(Default)]
pub(crate) struct ComponentStore {
    slots: Vec<Slot>,
    next_id: u32,
}

impl ComponentStore {
    pub(crate) fn insert(&mut self, component: Box<dyn Component>) -> ComponentId {
        let id = ComponentId(self.next_id);
        self.next_id += 1;
        self.slots.push(Slot {
            id,
            component: Some(component),
        });
        id
    }

    pub(crate) fn remove(&mut self, id: ComponentId) -> bool {
        match self.position(id) {
            Some(index) => {
                self.slots.remove(index);
                true
            }
            None => false,
        }
    }

    /// Detach a component for its update call.
    pub(crate) fn take(&mut self, id: ComponentId) -> Option<Box<dyn Component>> {
        let index = self.position(id)?;
        self.slots[index].component.take()
    }

    /// Put a detached component back. Returns `false` (and drops it) if the
    /// component was removed while detached.
    pub(crate) fn restore(&mut self, id: ComponentId, component: Box<dyn Component>) -> bool {
        match self.position(id) {
            Some(index) => {
                self.slots[index].component = Some(component);
                true
            }
            None => false,
        }
    }

    /// Id the next insertion will receive.
    pub(crate) fn mark(&self) -> ComponentId {
        ComponentId(self.next_id)
    }

    /// Drop every component inserted at or after `mark`, returning their ids.
    pub(crate) fn discard_since(&mut self, mark: ComponentId) -> Vec<ComponentId> {
        let discarded = self
            .slots
            .iter()
            .filter(|slot| slot.id >= mark)
            .map(|slot| slot.id)
            .collect();
        self.slots.retain(|slot| slot.id < mark);
        discarded
    }

    pub(crate) fn contains(&self, id: ComponentId) -> bool {
        self.position(id).is_some()
    }

    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn get<C: Component>(&self, id: ComponentId) -> Option<&C> {
        let index = self.position(id)?;
        self.slots[index]
            .component
            .as_deref()?
            .as_any()
            .downcast_ref::<C>()
    }

    pub(crate) fn get_mut<C: Component>(&mut self, id: ComponentId) -> Option<&mut C> {
        let index = self.position(id)?;
        self.slots[index]
            .component
            .as_deref_mut()?
            .as_any_mut()
            .downcast_mut::<C>()
    }

    pub(crate) fn first_of<C: Component>(&self) -> Option<ComponentId> {
        self.slots.iter().find_map(|slot| {
            let component = slot.component.as_deref()?;
            component.as_any().is::<C>().then_some(slot.id)
        })
    }

    pub(crate) fn type_names(&self) -> Vec<&'static str> {
        self.slots
            .iter()
            .filter_map(|slot| slot.component.as_deref().map(|c| c.type_name()))
            .collect()
    }

    fn position(&self, id: ComponentId) -> Option<usize> {
        self.slots.iter().position(|slot| slot.id == id)
    }
}

// ---------------------------------------------------------------------------
// Owner
// ---------------------------------------------------------------------------

/// A component's view of the game object that owns it.
///
/// This is the non-owning back-reference from a component to its game
/// object: it lives only for the duration of one call.
pub struct Owner<'a> {
    id: GameObjectId,
    name: &'a str,
    transform: &'a mut dyn TransformHandle,
    store: &'a mut ComponentStore,
    pending: &'a mut Deferred<ComponentId>,
}

impl<'a> Owner<'a> {
    pub(crate) fn new(
        id: GameObjectId,
        name: &'a str,
        transform: &'a mut dyn TransformHandle,
        store: &'a mut ComponentStore,
        pending: &'a mut Deferred<ComponentId>,
    ) -> Self {
        Self {
            id,
            name,
            transform,
            store,
            pending,
        }
    }

    /// Id of the owning game object.
    pub fn id(&self) -> GameObjectId {
        self.id
    }

    /// Informational name of the owning game object.
    pub fn name(&self) -> &str {
        self.name
    }

    /// The owning game object's transform.
    pub fn transform(&self) -> &dyn TransformHandle {
        &*self.transform
    }

    /// Mutable access to the owning game object's transform.
    pub fn transform_mut(&mut self) -> &mut dyn TransformHandle {
        &mut *self.transform
    }

    /// Construct a component of type `C` and attach it after all existing
    /// components. It is first updated on the owner's next update pass.
    ///
    /// If `attach` fails, every sibling it attached on the way is detached
    /// again before the error is returned.
    pub fn add_component<C: Attach>(
        &mut self,
        config: C::Config,
    ) -> Result<ComponentRef<C>, CoreError> {
        let mark = self.store.mark();
        let component = match C::attach(self, config) {
            Ok(component) => component,
            Err(err) => {
                for sibling in self.store.discard_since(mark) {
                    self.pending.withdraw_add(sibling);
                }
                debug!(
                    object = %self.id,
                    component = std::any::type_name::<C>(),
                    %err,
                    "component attach failed"
                );
                return Err(err);
            }
        };
        let id = self.store.insert(Box::new(component));
        self.pending.add(id);
        debug!(
            object = %self.id,
            component = std::any::type_name::<C>(),
            ?id,
            "component attached"
        );
        Ok(ComponentRef::new(id))
    }

    /// Remove a component by id. Returns `false` (and does nothing) if no such
    /// component is attached.
    pub fn remove_component(&mut self, id: ComponentId) -> bool {
        if !self.store.remove(id) {
            return false;
        }
        // Attached earlier in this same pass: never committed, nothing to skip.
        if !self.pending.withdraw_add(id) {
            self.pending.remove(id);
        }
        debug!(object = %self.id, ?id, "component removed");
        true
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
        self.store.get(handle.id)
    }

    /// Resolve a typed handle mutably.
    pub fn component_mut<C: Component>(&mut self, handle: ComponentRef<C>) -> Option<&mut C> {
        self.store.get_mut(handle.id)
    }

    /// Number of attached components (including any detached for update).
    pub fn component_count(&self) -> usize {
        self.store.len()
    }
}
