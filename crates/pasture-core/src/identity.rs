//! Handles for game objects and their components.
//!
//! A [`GameObjectId`] names a storage slot together with the lifetime of that
//! slot it was issued in. Once an object is dropped its slot is handed out
//! again under the next lifetime, so a handle kept past the object's removal
//! stops resolving instead of reaching the newcomer.
//!
//! [`ComponentId`]s are per game object and only ever increase.

use std::fmt;

// ---------------------------------------------------------------------------
// GameObjectId
// ---------------------------------------------------------------------------

/// Copyable handle to one game object.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GameObjectId {
    slot: u32,
    lifetime: u32,
}

impl GameObjectId {
    /// Storage slot, shared with earlier and later occupants.
    pub fn slot(self) -> u32 {
        self.slot
    }

    /// How many times the slot had been vacated when this handle was issued.
    pub fn lifetime(self) -> u32 {
        self.lifetime
    }

    /// Single-integer form, lifetime in the upper half. Used as the object key
    /// in scene snapshots.
    pub fn to_raw(self) -> u64 {
        u64::from(self.lifetime) << 32 | u64::from(self.slot)
    }
}

impl fmt::Debug for GameObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("GameObjectId").field(&format_args!("{self}")).finish()
    }
}

impl fmt::Display for GameObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}.{}", self.slot, self.lifetime)
    }
}

// ---------------------------------------------------------------------------
// ComponentId
// ---------------------------------------------------------------------------

/// Identifies one attached component within its owning game object.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(pub(crate) u32);

impl fmt::Debug for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ComponentId({})", self.0)
    }
}

// ---------------------------------------------------------------------------
// GameObjectIds
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
struct SlotState {
    lifetime: u32,
    occupied: bool,
}

/// The manager's slot table. Vacated slots are reused most recent first.
#[derive(Debug, Default)]
pub(crate) struct GameObjectIds {
    slots: Vec<SlotState>,
    vacant: Vec<u32>,
}

impl GameObjectIds {
    pub(crate) fn issue(&mut self) -> GameObjectId {
        if let Some(slot) = self.vacant.pop() {
            let state = &mut self.slots[slot as usize];
            state.occupied = true;
            return GameObjectId {
                slot,
                lifetime: state.lifetime,
            };
        }
        let slot = self.slots.len() as u32;
        self.slots.push(SlotState {
            lifetime: 0,
            occupied: true,
        });
        GameObjectId { slot, lifetime: 0 }
    }

    /// Vacate the slot behind `id`. Returns `false` for a handle that is
    /// already stale.
    pub(crate) fn retire(&mut self, id: GameObjectId) -> bool {
        match self.slots.get_mut(id.slot as usize) {
            Some(state) if state.occupied && state.lifetime == id.lifetime => {
                state.occupied = false;
                state.lifetime = state.lifetime.wrapping_add(1);
                self.vacant.push(id.slot);
                true
            }
            _ => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_slots_are_sequential() {
        let mut ids = GameObjectIds::default();
        let slots: Vec<u32> = (0..4).map(|_| ids.issue().slot()).collect();
        assert_eq!(slots, vec![0, 1, 2, 3]);
    }

    #[test]
    fn reissued_slot_moves_to_next_lifetime() {
        let mut ids = GameObjectIds::default();
        let first = ids.issue();
        let _other = ids.issue();
        assert!(ids.retire(first));

        let reissued = ids.issue();
        assert_eq!(reissued.slot(), first.slot());
        assert_eq!(reissued.lifetime(), 1);
        assert_ne!(reissued, first);
    }

    #[test]
    fn stale_handle_cannot_retire_the_newcomer() {
        let mut ids = GameObjectIds::default();
        let old = ids.issue();
        assert!(ids.retire(old));
        assert!(!ids.retire(old));

        let newcomer = ids.issue();
        assert!(!ids.retire(old));
        assert!(ids.retire(newcomer));
    }

    #[test]
    fn display_and_raw_forms() {
        let mut ids = GameObjectIds::default();
        let first = ids.issue();
        ids.retire(first);
        let id = ids.issue();
        assert_eq!(id.to_string(), "#0.1");
        assert_eq!(format!("{id:?}"), "GameObjectId(#0.1)");
        assert_eq!(id.to_raw(), 1 << 32);
    }
}
