use std::fmt;

use super::{IdList, Identified};

type Predicate<T> = Box<dyn Fn(&T) -> bool + Send + Sync>;

/// Membership-only projection over an [`IdList`].
///
/// The view stores identities, never entity copies. Owners call
/// [`FilteredView::refresh`] whenever the base list reports a change.
pub struct FilteredView<T: Identified> {
    filter: Predicate<T>,
    members: Vec<T::Key>,
}

impl<T: Identified> FilteredView<T> {
    /// A view that admits every entity.
    pub fn all() -> Self {
        Self::new(|_| true)
    }

    pub fn new<F>(filter: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Self {
            filter: Box::new(filter),
            members: Vec::new(),
        }
    }

    /// Swaps the predicate and re-derives membership against `base`.
    pub fn set_filter<F>(&mut self, filter: F, base: &IdList<T>)
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.filter = Box::new(filter);
        self.refresh(base);
    }

    /// Re-derives membership from the current contents of `base`.
    pub fn refresh(&mut self, base: &IdList<T>) {
        self.members = base
            .iter()
            .filter(|item| (self.filter)(item))
            .map(Identified::key)
            .collect();
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, key: T::Key) -> bool {
        self.members.contains(&key)
    }

    /// Resolves the members against `base`, skipping any that vanished since
    /// the last refresh.
    pub fn iter<'a>(&'a self, base: &'a IdList<T>) -> impl Iterator<Item = &'a T> + 'a {
        self.members.iter().filter_map(move |key| base.get(*key))
    }
}

impl<T: Identified> fmt::Debug for FilteredView<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilteredView")
            .field("members", &self.members)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::DuplicatePolicy;

    #[derive(Clone, Debug)]
    struct Item(u32);

    impl Identified for Item {
        type Key = u32;
        type Fields = ();

        fn key(&self) -> u32 {
            self.0
        }
    }

    #[test]
    fn view_tracks_base_membership_without_copying() {
        let mut base = IdList::new("items", DuplicatePolicy::Reject);
        for id in 1..=6 {
            base.add(Item(id)).unwrap();
        }

        let mut view = FilteredView::new(|item: &Item| item.0 % 2 == 0);
        view.refresh(&base);
        assert_eq!(view.iter(&base).map(|i| i.0).collect::<Vec<_>>(), vec![2, 4, 6]);

        base.remove(4);
        view.refresh(&base);
        assert!(!view.contains(4));
        assert_eq!(view.len(), 2);

        view.set_filter(|item: &Item| item.0 > 4, &base);
        assert_eq!(view.iter(&base).map(|i| i.0).collect::<Vec<_>>(), vec![5, 6]);
    }
}
