//! Identity-indexed collections with buffered change notifications.
//!
//! Every list of entities in the client mirror is an [`IdList`]: an ordered
//! container keyed by a unique identity. Structural and field-level changes are
//! buffered inside the list and drained by the owner once a message has been
//! fully applied, so observers only ever see complete mutations.
mod history;
mod view;

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

pub use history::{BoundedHistory, CommandHistory};
pub use view::FilteredView;

use crate::error::CollectionError;

/// Entity that carries a unique identity within its list.
pub trait Identified: Clone {
    /// Identity type (object id, stat number, ...).
    type Key: Copy + Eq + Hash + fmt::Debug + fmt::Display;
    /// Field mask reported by in-place updates. `Default` is the empty mask.
    type Fields: Copy + Default + PartialEq + fmt::Debug;

    fn key(&self) -> Self::Key;
}

/// What a collection does when an add targets an identity it already holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DuplicatePolicy {
    /// Keep the existing entity and fail the add.
    Reject,
    /// Swap the new entity into the existing slot.
    Replace,
}

/// Structural or field-level change recorded by an [`IdList`].
#[derive(Clone, Debug)]
pub enum ListChange<T: Identified> {
    Added { index: usize, item: T },
    Removed { index: usize, item: T },
    Replaced { index: usize, old: T, new: T },
    Updated { key: T::Key, fields: T::Fields },
    Cleared,
}

impl<T: Identified> ListChange<T> {
    /// Identity affected by this change, `None` for bulk clears.
    pub fn key(&self) -> Option<T::Key> {
        match self {
            ListChange::Added { item, .. } | ListChange::Removed { item, .. } => Some(item.key()),
            ListChange::Replaced { new, .. } => Some(new.key()),
            ListChange::Updated { key, .. } => Some(*key),
            ListChange::Cleared => None,
        }
    }

    /// Returns true for changes that alter membership (not field updates).
    pub fn is_structural(&self) -> bool {
        !matches!(self, ListChange::Updated { .. })
    }
}

type SortFn<T> = fn(&T, &T) -> Ordering;

/// Ordered, identity-indexed entity list.
///
/// Entities are stored in insertion order. A list declared sorted keeps that
/// unfiltered order internally and maintains a separate sorted permutation for
/// iteration, so identity-based removal never depends on the sort key.
pub struct IdList<T: Identified> {
    name: &'static str,
    policy: DuplicatePolicy,
    items: Vec<T>,
    index: HashMap<T::Key, usize>,
    sort: Option<SortFn<T>>,
    order: Vec<usize>,
    changes: Vec<ListChange<T>>,
}

impl<T: Identified> IdList<T> {
    pub fn new(name: &'static str, policy: DuplicatePolicy) -> Self {
        Self {
            name,
            policy,
            items: Vec::new(),
            index: HashMap::new(),
            sort: None,
            order: Vec::new(),
            changes: Vec::new(),
        }
    }

    /// Declares the iteration order of this list.
    pub fn sorted_by(mut self, compare: SortFn<T>) -> Self {
        self.sort = Some(compare);
        self.reorder();
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn policy(&self) -> DuplicatePolicy {
        self.policy
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, key: T::Key) -> bool {
        self.index.contains_key(&key)
    }

    pub fn get(&self, key: T::Key) -> Option<&T> {
        self.index.get(&key).map(|&i| &self.items[i])
    }

    /// Entity at `index` in insertion order.
    pub fn get_at(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    /// Iterates in declared order (sorted lists) or insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.order.iter().map(|&i| &self.items[i])
    }

    /// Iterates in insertion order regardless of any declared sort.
    pub fn iter_unsorted(&self) -> impl Iterator<Item = &T> + '_ {
        self.items.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = T::Key> + '_ {
        self.items.iter().map(Identified::key)
    }

    /// Adds an entity, applying the list's duplicate policy.
    pub fn add(&mut self, item: T) -> Result<(), CollectionError> {
        let index = self.insert(item)?;
        self.place(index);
        Ok(())
    }

    /// Clears the list and fills it from `items`, sorting once at the end.
    ///
    /// Entities rejected as duplicates are skipped; the first rejection is
    /// returned after the rest have been added.
    pub fn repopulate<I>(&mut self, items: I) -> Result<(), CollectionError>
    where
        I: IntoIterator<Item = T>,
    {
        self.clear();
        let mut result = Ok(());
        for item in items {
            if let Err(err) = self.insert(item) {
                result = result.and(Err(err));
            }
        }
        self.reorder();
        result
    }

    /// Stores `item` without touching the iteration order. Returns the slot of
    /// an appended entity, or of the replaced one.
    fn insert(&mut self, item: T) -> Result<usize, CollectionError> {
        let key = item.key();
        match self.index.get(&key).copied() {
            Some(index) => match self.policy {
                DuplicatePolicy::Reject => Err(CollectionError::DuplicateId {
                    list: self.name,
                    id: key.to_string(),
                }),
                DuplicatePolicy::Replace => {
                    let new = item.clone();
                    let old = std::mem::replace(&mut self.items[index], item);
                    self.changes.push(ListChange::Replaced { index, old, new });
                    Ok(index)
                }
            },
            None => {
                let index = self.items.len();
                self.changes.push(ListChange::Added {
                    index,
                    item: item.clone(),
                });
                self.index.insert(key, index);
                self.items.push(item);
                Ok(index)
            }
        }
    }

    /// Removes the entity with `key`. No-op (returns `None`) if absent.
    pub fn remove(&mut self, key: T::Key) -> Option<T> {
        let index = self.index.get(&key).copied()?;
        Some(self.remove_at(index))
    }

    /// Removes the entity at `index` (insertion order).
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn remove_at(&mut self, index: usize) -> T {
        let item = self.items.remove(index);
        self.index.remove(&item.key());
        for (i, entry) in self.items.iter().enumerate().skip(index) {
            self.index.insert(entry.key(), i);
        }
        self.changes.push(ListChange::Removed {
            index,
            item: item.clone(),
        });
        self.order.retain(|&slot| slot != index);
        for slot in &mut self.order {
            if *slot > index {
                *slot -= 1;
            }
        }
        item
    }

    /// Removes every entity and records a bulk clear.
    pub fn clear(&mut self) {
        self.items.clear();
        self.index.clear();
        self.order.clear();
        self.changes.push(ListChange::Cleared);
    }

    /// Mutates the entity with `key` in place.
    ///
    /// The closure returns the mask of changed fields; a non-empty mask is
    /// recorded as an update notification. Returns `None` if the key is absent.
    pub fn update<F>(&mut self, key: T::Key, apply: F) -> Option<T::Fields>
    where
        F: FnOnce(&mut T) -> T::Fields,
    {
        let index = self.index.get(&key).copied()?;
        Some(self.update_at(index, apply))
    }

    /// Mutates the entity at `index` (insertion order) in place.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn update_at<F>(&mut self, index: usize, apply: F) -> T::Fields
    where
        F: FnOnce(&mut T) -> T::Fields,
    {
        let fields = apply(&mut self.items[index]);
        if fields != T::Fields::default() {
            let key = self.items[index].key();
            self.changes.push(ListChange::Updated { key, fields });
            if self.sort.is_some() {
                self.place(index);
            }
        }
        fields
    }

    /// Applies `apply` to every entity in insertion order.
    pub fn update_all<F>(&mut self, mut apply: F)
    where
        F: FnMut(&mut T) -> T::Fields,
    {
        for index in 0..self.items.len() {
            self.update_at(index, &mut apply);
        }
    }

    /// Takes every change recorded since the last call.
    pub fn take_changes(&mut self) -> Vec<ListChange<T>> {
        std::mem::take(&mut self.changes)
    }

    pub fn has_pending_changes(&self) -> bool {
        !self.changes.is_empty()
    }

    /// Moves the entity at `index` to its place in the iteration order.
    fn place(&mut self, index: usize) {
        let Some(compare) = self.sort else {
            if self.order.len() < self.items.len() {
                self.order.push(index);
            }
            return;
        };
        self.order.retain(|&slot| slot != index);
        let items = &self.items;
        let at = self
            .order
            .partition_point(|&slot| compare(&items[slot], &items[index]) != Ordering::Greater);
        self.order.insert(at, index);
    }

    /// Rebuilds the whole iteration permutation.
    fn reorder(&mut self) {
        let items = &self.items;
        self.order = (0..items.len()).collect();
        if let Some(compare) = self.sort {
            self.order.sort_by(|&a, &b| compare(&items[a], &items[b]));
        }
    }
}

impl<T: Identified + fmt::Debug> fmt::Debug for IdList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdList")
            .field("name", &self.name)
            .field("policy", &self.policy)
            .field("items", &self.items)
            .finish()
    }
}

/// Case-insensitive ordering helper for name-sorted lists.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    let lhs = a.chars().flat_map(char::to_lowercase);
    let rhs = b.chars().flat_map(char::to_lowercase);
    lhs.cmp(rhs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    struct Entry {
        id: u32,
        name: &'static str,
        value: i32,
    }

    impl Identified for Entry {
        type Key = u32;
        type Fields = bool;

        fn key(&self) -> u32 {
            self.id
        }
    }

    fn entry(id: u32, name: &'static str) -> Entry {
        Entry { id, name, value: 0 }
    }

    #[test]
    fn reject_policy_keeps_existing_entity() {
        let mut list = IdList::new("entries", DuplicatePolicy::Reject);
        list.add(entry(1, "a")).unwrap();

        let err = list.add(entry(1, "b")).unwrap_err();
        assert_eq!(err.error_code(), "COLLECTION_DUPLICATE_ID");
        assert_eq!(list.len(), 1);
        assert_eq!(list.get(1).unwrap().name, "a");
    }

    #[test]
    fn replace_policy_swaps_in_place() {
        let mut list = IdList::new("entries", DuplicatePolicy::Replace);
        list.add(entry(1, "a")).unwrap();
        list.add(entry(2, "b")).unwrap();
        list.take_changes();

        list.add(entry(1, "c")).unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list.get_at(0).unwrap().name, "c");

        let changes = list.take_changes();
        assert!(matches!(
            changes.as_slice(),
            [ListChange::Replaced { index: 0, .. }]
        ));
    }

    #[test]
    fn remove_reindexes_tail() {
        let mut list = IdList::new("entries", DuplicatePolicy::Reject);
        for id in 1..=4 {
            list.add(entry(id, "x")).unwrap();
        }

        let removed = list.remove(2).unwrap();
        assert_eq!(removed.id, 2);
        assert!(list.get(2).is_none());
        assert_eq!(list.get(3).unwrap().id, 3);
        assert_eq!(list.get(4).unwrap().id, 4);
        assert_eq!(list.keys().collect::<Vec<_>>(), vec![1, 3, 4]);

        // Absent identity is a no-op.
        assert!(list.remove(2).is_none());
    }

    #[test]
    fn add_remove_sequences_never_duplicate_identities() {
        let mut list = IdList::new("entries", DuplicatePolicy::Replace);
        let ops: [(bool, u32); 10] = [
            (true, 1),
            (true, 2),
            (true, 1),
            (false, 2),
            (true, 3),
            (true, 2),
            (false, 1),
            (true, 3),
            (false, 9),
            (true, 1),
        ];

        for (add, id) in ops {
            if add {
                list.add(entry(id, "x")).unwrap();
            } else {
                list.remove(id);
                assert!(list.get(id).is_none());
            }

            let mut keys: Vec<_> = list.keys().collect();
            let total = keys.len();
            keys.sort();
            keys.dedup();
            assert_eq!(keys.len(), total);
        }
    }

    #[test]
    fn sorted_list_iterates_by_name_and_removes_by_identity() {
        let mut list = IdList::new("entries", DuplicatePolicy::Replace)
            .sorted_by(|a: &Entry, b: &Entry| compare_names(a.name, b.name));
        list.add(entry(1, "charlie")).unwrap();
        list.add(entry(2, "Alpha")).unwrap();
        list.add(entry(3, "bravo")).unwrap();

        let names: Vec<_> = list.iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["Alpha", "bravo", "charlie"]);

        let unsorted: Vec<_> = list.iter_unsorted().map(|e| e.id).collect();
        assert_eq!(unsorted, vec![1, 2, 3]);

        list.remove(2);
        let names: Vec<_> = list.iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["bravo", "charlie"]);
    }

    #[test]
    fn sorted_order_follows_updates_and_removals() {
        let mut list = IdList::new("entries", DuplicatePolicy::Replace)
            .sorted_by(|a: &Entry, b: &Entry| a.value.cmp(&b.value));
        for (id, value) in [(1, 30), (2, 10), (3, 20)] {
            list.add(Entry { id, name: "x", value }).unwrap();
        }
        let ids = |list: &IdList<Entry>| list.iter().map(|e| e.id).collect::<Vec<_>>();
        assert_eq!(ids(&list), vec![2, 3, 1]);

        list.update(2, |e| {
            e.value = 40;
            true
        });
        assert_eq!(ids(&list), vec![3, 1, 2]);

        list.remove(3);
        list.add(Entry { id: 4, name: "x", value: 35 }).unwrap();
        assert_eq!(ids(&list), vec![1, 4, 2]);
    }

    #[test]
    fn repopulate_sorts_once_and_skips_rejected_duplicates() {
        let mut list = IdList::new("entries", DuplicatePolicy::Reject)
            .sorted_by(|a: &Entry, b: &Entry| compare_names(a.name, b.name));
        list.add(entry(9, "stale")).unwrap();
        list.take_changes();

        let err = list
            .repopulate([entry(1, "charlie"), entry(2, "alpha"), entry(1, "again"), entry(3, "bravo")])
            .unwrap_err();
        assert_eq!(err.error_code(), "COLLECTION_DUPLICATE_ID");

        let names: Vec<_> = list.iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["alpha", "bravo", "charlie"]);
        assert!(list.get(9).is_none());

        let changes = list.take_changes();
        assert!(matches!(changes.first(), Some(ListChange::Cleared)));
        assert_eq!(changes.len(), 4);
    }

    #[test]
    fn update_records_only_changed_fields() {
        let mut list = IdList::new("entries", DuplicatePolicy::Reject);
        list.add(entry(1, "a")).unwrap();
        list.take_changes();

        assert_eq!(list.update(1, |_| false), Some(false));
        assert!(!list.has_pending_changes());

        let changed = list.update(1, |e| {
            e.value = 5;
            true
        });
        assert_eq!(changed, Some(true));
        assert!(matches!(
            list.take_changes().as_slice(),
            [ListChange::Updated { key: 1, fields: true }]
        ));

        assert_eq!(list.update(7, |_| true), None);
    }

    #[test]
    fn clear_records_bulk_notification() {
        let mut list = IdList::new("entries", DuplicatePolicy::Reject);
        list.add(entry(1, "a")).unwrap();
        list.take_changes();

        list.clear();
        assert!(list.is_empty());
        assert!(matches!(list.take_changes().as_slice(), [ListChange::Cleared]));
    }
}
