#![forbid(unsafe_code)]

//! Structural diff between two tab arrays.
//!
//! [`ArrayDiff`] is carried by [`TabModelEvent::IndicesChanged`] when the
//! whole tab list is replaced. It records which old positions disappeared,
//! which new positions are fresh, and the old-to-new correspondence for
//! everything that survived, so cached indices can be remapped instead of
//! dropped.
//!
//! Tabs are matched by [`TabId`]; a retitled tab keeps its identity and is
//! reported as *changed* rather than deleted and re-added.
//!
//! [`TabModelEvent::IndicesChanged`]: crate::TabModelEvent::IndicesChanged

use std::collections::BTreeSet;

use ahash::AHashMap;

use crate::tab::{TabData, TabId};

/// Old/new correspondence for a wholesale tab replacement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayDiff {
    old: Vec<TabData>,
    new: Vec<TabData>,
    deleted: BTreeSet<usize>,
    added: BTreeSet<usize>,
    changed: BTreeSet<usize>,
    moved: BTreeSet<usize>,
    old_to_new: Vec<Option<usize>>,
}

impl ArrayDiff {
    /// Diff two arrays. Returns `None` when they are identical.
    ///
    /// When an id occurs more than once, occurrences are paired in order.
    #[must_use]
    pub fn compute(old: &[TabData], new: &[TabData]) -> Option<Self> {
        if old == new {
            return None;
        }

        let mut new_positions: AHashMap<TabId, Vec<usize>> = AHashMap::with_capacity(new.len());
        for (idx, tab) in new.iter().enumerate().rev() {
            new_positions.entry(tab.id()).or_default().push(idx);
        }

        let mut old_to_new = Vec::with_capacity(old.len());
        let mut claimed = vec![false; new.len()];
        let mut deleted = BTreeSet::new();
        let mut changed = BTreeSet::new();
        let mut moved = BTreeSet::new();

        for (old_idx, tab) in old.iter().enumerate() {
            // Positions were pushed in reverse, so pop() yields the lowest first.
            let target = new_positions.get_mut(&tab.id()).and_then(Vec::pop);
            match target {
                Some(new_idx) => {
                    claimed[new_idx] = true;
                    if new[new_idx] != *tab {
                        changed.insert(new_idx);
                    }
                    if new_idx != old_idx {
                        moved.insert(new_idx);
                    }
                    old_to_new.push(Some(new_idx));
                }
                None => {
                    deleted.insert(old_idx);
                    old_to_new.push(None);
                }
            }
        }

        let added = claimed
            .iter()
            .enumerate()
            .filter(|(_, taken)| !**taken)
            .map(|(idx, _)| idx)
            .collect();

        Some(Self {
            old: old.to_vec(),
            new: new.to_vec(),
            deleted,
            added,
            changed,
            moved,
            old_to_new,
        })
    }

    /// The array before the change.
    #[must_use]
    pub fn old_data(&self) -> &[TabData] {
        &self.old
    }

    /// The array after the change.
    #[must_use]
    pub fn new_data(&self) -> &[TabData] {
        &self.new
    }

    /// Indices into the old array whose tab no longer exists.
    #[must_use]
    pub fn deleted_indices(&self) -> &BTreeSet<usize> {
        &self.deleted
    }

    /// Indices into the new array whose tab did not exist before.
    #[must_use]
    pub fn added_indices(&self) -> &BTreeSet<usize> {
        &self.added
    }

    /// Indices into the new array whose tab survived with different content.
    #[must_use]
    pub fn changed_indices(&self) -> &BTreeSet<usize> {
        &self.changed
    }

    /// Indices into the new array whose tab survived at a different position.
    #[must_use]
    pub fn moved_indices(&self) -> &BTreeSet<usize> {
        &self.moved
    }

    /// Where the tab at `old_index` ended up, if it survived.
    #[must_use]
    pub fn new_index_of(&self, old_index: usize) -> Option<usize> {
        self.old_to_new.get(old_index).copied().flatten()
    }

    /// Number of deleted old indices strictly below `old_index`.
    #[must_use]
    pub fn deleted_before(&self, old_index: usize) -> usize {
        self.deleted.range(..old_index).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tabs(ids: &[u64]) -> Vec<TabData> {
        ids.iter()
            .map(|&id| TabData::new(TabId::new(id), format!("T{id}")))
            .collect()
    }

    #[test]
    fn identical_arrays_produce_no_diff() {
        let a = tabs(&[1, 2, 3]);
        assert!(ArrayDiff::compute(&a, &a.clone()).is_none());
    }

    #[test]
    fn removal_and_insertion_are_tracked() {
        let old = tabs(&[1, 2, 3, 4]);
        let new = tabs(&[1, 3, 5, 4]);
        let diff = ArrayDiff::compute(&old, &new).expect("arrays differ");
        assert_eq!(diff.deleted_indices().iter().copied().collect::<Vec<_>>(), [1]);
        assert_eq!(diff.added_indices().iter().copied().collect::<Vec<_>>(), [2]);
        assert_eq!(diff.new_index_of(0), Some(0));
        assert_eq!(diff.new_index_of(1), None);
        assert_eq!(diff.new_index_of(2), Some(1));
        assert_eq!(diff.new_index_of(3), Some(3));
        assert_eq!(diff.new_index_of(99), None);
        assert_eq!(diff.deleted_before(3), 1);
    }

    #[test]
    fn reorder_reports_moves_not_deletions() {
        let old = tabs(&[1, 2, 3]);
        let new = tabs(&[3, 1, 2]);
        let diff = ArrayDiff::compute(&old, &new).expect("arrays differ");
        assert!(diff.deleted_indices().is_empty());
        assert!(diff.added_indices().is_empty());
        assert_eq!(diff.new_index_of(0), Some(1));
        assert_eq!(diff.new_index_of(2), Some(0));
        assert_eq!(diff.moved_indices().len(), 3);
    }

    #[test]
    fn retitle_is_a_change_not_a_replacement() {
        let old = tabs(&[1, 2]);
        let mut new = old.clone();
        new[1].set_text("renamed".into());
        let diff = ArrayDiff::compute(&old, &new).expect("arrays differ");
        assert!(diff.deleted_indices().is_empty());
        assert_eq!(diff.changed_indices().iter().copied().collect::<Vec<_>>(), [1]);
        assert!(diff.moved_indices().is_empty());
    }

    #[test]
    fn duplicate_ids_pair_in_order() {
        let old = tabs(&[7, 7]);
        let new = tabs(&[7]);
        let diff = ArrayDiff::compute(&old, &new).expect("arrays differ");
        assert_eq!(diff.new_index_of(0), Some(0));
        assert_eq!(diff.new_index_of(1), None);
    }
}
