//! Ordered container whose additions and removals are deferred around traversal.
//!
//! A [`SafeArray`] holds a committed ordered sequence plus two pending queues:
//! an ordered add queue and a removal set. Mutation requests never touch the
//! committed sequence directly. Instead, every traversal follows a fixed
//! four-step protocol:
//!
//! 1. Commit pending adds to the end of the sequence, in the order requested.
//! 2. Physically drop pending removals.
//! 3. Visit each committed item in order, skipping any item that is pending
//!    removal *at the moment it is reached*.
//! 4. Physically drop removals queued during step 3.
//!
//! Consequences callers can rely on:
//!
//! - An item added during a traversal is not visited in that traversal, and is
//!   visited in the next one (unless removed first).
//! - An item removed during a traversal is never visited again, including
//!   later in the same traversal.
//! - Removing and re-adding the same item inside a single traversal has no
//!   defined outcome and must be avoided.
//!
//! # Example
//!
//! ```
//! use pasture_core::safe_array::SafeArray;
//!
//! let mut array = SafeArray::new();
//! array.add(1);
//! array.add(2);
//! array.add(3);
//!
//! let mut seen = Vec::new();
//! array.for_each_deferred(|item, pending| {
//!     seen.push(item);
//!     if item == 1 {
//!         pending.remove(3); // skipped later in this same pass
//!         pending.add(4);    // first visited on the next pass
//!     }
//! });
//! assert_eq!(seen, vec![1, 2]);
//!
//! seen.clear();
//! array.for_each(|item| seen.push(item));
//! assert_eq!(seen, vec![1, 2, 4]);
//! ```

use std::collections::HashSet;
use std::hash::Hash;

use tracing::trace;

// ---------------------------------------------------------------------------
// Deferred
// ---------------------------------------------------------------------------

/// The pending-mutation queues of a [`SafeArray`].
///
/// Handed to the visitor of [`SafeArray::for_each_deferred`] so that it can
/// request mutations of the array currently being traversed.
#[derive(Debug, Clone)]
pub struct Deferred<T> {
    adds: Vec<T>,
    removals: HashSet<T>,
}

impl<T: Copy + Eq + Hash> Deferred<T> {
    fn new() -> Self {
        Self {
            adds: Vec::new(),
            removals: HashSet::new(),
        }
    }

    /// Queue `item` for inclusion at the start of the next traversal.
    pub fn add(&mut self, item: T) {
        self.adds.push(item);
    }

    /// Queue `item` for exclusion. It is skipped immediately by any traversal
    /// in progress.
    pub fn remove(&mut self, item: T) {
        self.removals.insert(item);
    }

    /// Drop `item` from the add queue if it is still waiting to be committed.
    /// Returns `true` if it was queued.
    pub fn withdraw_add(&mut self, item: T) -> bool {
        let before = self.adds.len();
        self.adds.retain(|queued| *queued != item);
        self.adds.len() != before
    }

    /// Whether `item` has been requested for removal and not yet compacted.
    pub fn is_pending_removal(&self, item: T) -> bool {
        self.removals.contains(&item)
    }

    /// Number of distinct items queued for removal.
    pub fn pending_removal_count(&self) -> usize {
        self.removals.len()
    }
}

// ---------------------------------------------------------------------------
// SafeArray
// ---------------------------------------------------------------------------

/// A mutation-deferring ordered container.
///
/// Items are small copyable handles (ids). Identity is `Eq + Hash`; the same
/// item never appears twice in the committed sequence.
#[derive(Debug, Clone)]
pub struct SafeArray<T> {
    items: Vec<T>,
    members: HashSet<T>,
    pending: Deferred<T>,
}

impl<T: Copy + Eq + Hash> SafeArray<T> {
    /// Create an empty array.
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            members: HashSet::new(),
            pending: Deferred::new(),
        }
    }

    /// Queue `item` for inclusion. It counts toward [`is_empty`](Self::is_empty)
    /// immediately but is not visited until the next traversal begins.
    pub fn add(&mut self, item: T) {
        self.pending.add(item);
    }

    /// Queue `item` for exclusion. It is skipped by the remainder of any
    /// traversal in progress and physically dropped by the end of it.
    pub fn remove(&mut self, item: T) {
        self.pending.remove(item);
    }

    /// Mutable access to the pending queues outside of a traversal.
    pub fn pending_mut(&mut self) -> &mut Deferred<T> {
        &mut self.pending
    }

    /// Read access to the pending queues.
    pub fn pending(&self) -> &Deferred<T> {
        &self.pending
    }

    /// Run the four-step traversal protocol, calling `visit` for each live item.
    pub fn for_each<F>(&mut self, mut visit: F)
    where
        F: FnMut(T),
    {
        self.for_each_deferred(|item, _| visit(item));
    }

    /// Like [`for_each`](Self::for_each), but the visitor also receives the
    /// array's pending queues so it can add or remove items mid-traversal.
    pub fn for_each_deferred<F>(&mut self, mut visit: F)
    where
        F: FnMut(T, &mut Deferred<T>),
    {
        self.commit_adds();
        self.compact_removals();

        // Items are only appended or dropped by the commit steps, so the
        // committed length is fixed for the duration of the loop.
        for index in 0..self.items.len() {
            let item = self.items[index];
            if self.pending.is_pending_removal(item) {
                continue;
            }
            visit(item, &mut self.pending);
        }

        self.compact_removals();
    }

    /// Whether the array has no committed items and no pending adds.
    ///
    /// The result has the conventional polarity: `true` means empty, and an
    /// array holding items reports `false`.
    ///
    /// Pending removals are *not* taken into account: an array whose only
    /// items are all queued for removal still reports `false` until a
    /// traversal compacts them. Use [`len`](Self::len) for the logical size.
    pub fn is_empty(&self) -> bool {
        self.items.len() + self.pending.adds.len() == 0
    }

    /// Logical number of items: committed plus pending adds, excluding
    /// anything queued for removal and counting duplicates once.
    pub fn len(&self) -> usize {
        let committed = self
            .items
            .iter()
            .filter(|item| !self.pending.is_pending_removal(**item))
            .count();
        let mut queued = HashSet::new();
        let added = self
            .pending
            .adds
            .iter()
            .filter(|item| {
                !self.members.contains(*item)
                    && !self.pending.is_pending_removal(**item)
                    && queued.insert(**item)
            })
            .count();
        committed + added
    }

    /// Whether `item` is committed or queued for addition, and not queued for
    /// removal.
    pub fn contains(&self, item: T) -> bool {
        if self.pending.is_pending_removal(item) {
            return false;
        }
        self.members.contains(&item) || self.pending.adds.contains(&item)
    }

    /// Committed items in traversal order. Items queued for removal are still
    /// listed until the next compaction; pending adds are not listed.
    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        self.items.iter().copied()
    }

    /// Committed items in traversal order, excluding those queued for removal.
    pub fn live(&self) -> impl Iterator<Item = T> + '_ {
        self.items
            .iter()
            .copied()
            .filter(|item| !self.pending.is_pending_removal(*item))
    }

    // -- internal helpers ---------------------------------------------------

    fn commit_adds(&mut self) {
        if self.pending.adds.is_empty() {
            return;
        }
        let adds = std::mem::take(&mut self.pending.adds);
        let before = self.items.len();
        for item in adds {
            if self.members.insert(item) {
                self.items.push(item);
            }
        }
        trace!(
            committed = self.items.len() - before,
            total = self.items.len(),
            "safe array committed pending adds"
        );
    }

    fn compact_removals(&mut self) {
        if self.pending.removals.is_empty() {
            return;
        }
        let removals = std::mem::take(&mut self.pending.removals);
        let before = self.items.len();
        self.items.retain(|item| !removals.contains(item));
        for item in &removals {
            self.members.remove(item);
        }
        trace!(
            removed = before - self.items.len(),
            total = self.items.len(),
            "safe array compacted removals"
        );
    }
}

impl<T: Copy + Eq + Hash> Default for SafeArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
