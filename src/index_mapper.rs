//! Physical <-> visual index translation for one grid axis.
//!
//! Three index spaces exist per axis:
//! - **physical**: position in the data store, stable while the row/column exists
//! - **visual**: position among non-trimmed indexes in display order
//! - **renderable**: position among indexes that are neither trimmed nor hidden
//!
//! Hidden indexes keep their visual index (they are selectable and copyable)
//! but are never drawn. Trimmed indexes behave as if they did not exist.
//!
//! Every mutation only drops the cached translation tables. They are rebuilt
//! in a single O(n) pass on the next query, so bulk hide/trim updates stay linear.

use std::cell::OnceCell;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};

/// What a registered index map contributes to the index state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexMapType {
    /// Index is skipped when rendering but still selectable.
    Hiding,
    /// Index is excluded from every visual operation.
    Trimming,
}

#[derive(Debug, Clone)]
struct IndexMap {
    kind: IndexMapType,
    values: Vec<bool>,
}

#[derive(Debug, Clone, Default)]
struct IndexCache {
    visual_to_physical: Vec<usize>,
    physical_to_visual: Vec<Option<usize>>,
    renderable_to_physical: Vec<usize>,
    physical_to_renderable: Vec<Option<usize>>,
    visual_to_renderable: Vec<Option<usize>>,
    renderable_to_visual: Vec<usize>,
}

/// Index translation for a single axis (rows or columns).
#[derive(Debug, Clone)]
pub struct IndexMapper {
    /// Display order of physical indexes (identity until sorted or moved)
    sequence: Vec<usize>,
    /// Named maps; effective state is the OR over maps of the same type
    maps: BTreeMap<String, IndexMap>,
    cache: OnceCell<IndexCache>,
}

impl Default for IndexMapper {
    fn default() -> Self {
        Self::new(0)
    }
}

impl IndexMapper {
    /// Create a mapper over `length` physical indexes, identity ordered.
    pub fn new(length: usize) -> Self {
        Self {
            sequence: (0..length).collect(),
            maps: BTreeMap::new(),
            cache: OnceCell::new(),
        }
    }

    /// Change the number of physical indexes.
    ///
    /// Indexes past the new length are dropped from the sequence and all maps;
    /// new indexes are appended at the end, neither hidden nor trimmed.
    pub fn set_length(&mut self, length: usize) {
        let old_length = self.sequence.len();
        if length == old_length {
            return;
        }
        self.sequence.retain(|&physical| physical < length);
        self.sequence.extend(old_length..length);
        for map in self.maps.values_mut() {
            map.values.resize(length, false);
        }
        self.invalidate();
    }

    /// Register (or replace) a named index map, seeding every physical index
    /// with `predicate(physical)`.
    pub fn register_index_map(
        &mut self,
        name: impl Into<String>,
        kind: IndexMapType,
        predicate: impl Fn(usize) -> bool,
    ) {
        let name = name.into();
        let values = (0..self.sequence.len()).map(predicate).collect();
        log::debug!("registering {kind:?} index map '{name}'");
        self.maps.insert(name, IndexMap { kind, values });
        self.invalidate();
    }

    /// Remove a named index map. Returns `true` if it existed.
    pub fn unregister_index_map(&mut self, name: &str) -> bool {
        let removed = self.maps.remove(name).is_some();
        if removed {
            self.invalidate();
        }
        removed
    }

    /// Whether a map with this name is registered.
    pub fn has_index_map(&self, name: &str) -> bool {
        self.maps.contains_key(name)
    }

    /// Set the flag of one physical index in a named map.
    pub fn set_index_map_value(&mut self, name: &str, physical: usize, value: bool) -> Result<()> {
        let length = self.sequence.len();
        let map = self
            .maps
            .get_mut(name)
            .ok_or_else(|| GridError::UnknownIndexMap(name.to_string()))?;
        let slot = map.values.get_mut(physical).ok_or_else(|| {
            GridError::OutOfRange(format!("physical index {physical} (length {length})"))
        })?;
        if *slot != value {
            *slot = value;
            self.invalidate();
        }
        Ok(())
    }

    /// Replace the display order with a permutation of the physical indexes.
    pub fn set_indexes_sequence(&mut self, sequence: Vec<usize>) -> Result<()> {
        let length = self.sequence.len();
        if sequence.len() != length {
            return Err(GridError::InvalidSequence(format!(
                "expected {length} indexes, got {}",
                sequence.len()
            )));
        }
        let mut seen = vec![false; length];
        for &physical in &sequence {
            match seen.get_mut(physical) {
                Some(flag) if !*flag => *flag = true,
                Some(_) => {
                    return Err(GridError::InvalidSequence(format!(
                        "index {physical} appears twice"
                    )))
                }
                None => {
                    return Err(GridError::InvalidSequence(format!(
                        "index {physical} is out of range"
                    )))
                }
            }
        }
        self.sequence = sequence;
        self.invalidate();
        Ok(())
    }

    /// Current display order of physical indexes, trimmed ones included.
    pub fn indexes_sequence(&self) -> &[usize] {
        &self.sequence
    }

    /// Move the given visual indexes so that the first of them lands at
    /// `final_index` (a visual index after the move). Moved indexes keep their
    /// relative order.
    pub fn move_indexes(&mut self, moved: &[usize], final_index: usize) -> Result<()> {
        let mut physicals = Vec::with_capacity(moved.len());
        for &visual in moved {
            let physical = self
                .to_physical(visual)
                .ok_or_else(|| GridError::OutOfRange(format!("visual index {visual}")))?;
            if !physicals.contains(&physical) {
                physicals.push(physical);
            }
        }
        let mut remaining: Vec<usize> = self
            .sequence
            .iter()
            .copied()
            .filter(|p| !physicals.contains(p))
            .collect();

        // Insert before the remaining entry holding visual slot `final_index`
        let mut visual_seen = 0;
        let mut insert_at = remaining.len();
        for (position, &physical) in remaining.iter().enumerate() {
            if self.is_trimmed(physical) {
                continue;
            }
            if visual_seen == final_index {
                insert_at = position;
                break;
            }
            visual_seen += 1;
        }
        let tail = remaining.split_off(insert_at);
        remaining.extend(physicals);
        remaining.extend(tail);
        self.sequence = remaining;
        self.invalidate();
        Ok(())
    }

    /// Whether any hiding map flags this physical index.
    pub fn is_hidden(&self, physical: usize) -> bool {
        self.flagged(physical, IndexMapType::Hiding)
    }

    /// Whether any trimming map flags this physical index.
    pub fn is_trimmed(&self, physical: usize) -> bool {
        self.flagged(physical, IndexMapType::Trimming)
    }

    /// Whether the index at this visual position is hidden.
    pub fn is_visual_hidden(&self, visual: usize) -> bool {
        self.to_physical(visual)
            .is_some_and(|physical| self.is_hidden(physical))
    }

    /// Number of physical indexes.
    pub fn count_physical(&self) -> usize {
        self.sequence.len()
    }

    /// Number of non-trimmed indexes.
    pub fn count_visual(&self) -> usize {
        self.cache().visual_to_physical.len()
    }

    /// Number of indexes that are neither trimmed nor hidden.
    pub fn count_renderable(&self) -> usize {
        self.cache().renderable_to_physical.len()
    }

    /// Visual index of a physical index, `None` when trimmed or out of range.
    pub fn to_visual(&self, physical: usize) -> Option<usize> {
        self.cache()
            .physical_to_visual
            .get(physical)
            .copied()
            .flatten()
    }

    /// Physical index at a visual position, `None` when out of range.
    pub fn to_physical(&self, visual: usize) -> Option<usize> {
        self.cache().visual_to_physical.get(visual).copied()
    }

    /// Renderable index of a physical index, `None` when hidden, trimmed or out of range.
    pub fn to_renderable(&self, physical: usize) -> Option<usize> {
        self.cache()
            .physical_to_renderable
            .get(physical)
            .copied()
            .flatten()
    }

    /// Physical index at a renderable position.
    pub fn renderable_to_physical(&self, renderable: usize) -> Option<usize> {
        self.cache().renderable_to_physical.get(renderable).copied()
    }

    /// Renderable index of a visual index, `None` when hidden.
    pub fn visual_to_renderable(&self, visual: usize) -> Option<usize> {
        self.cache()
            .visual_to_renderable
            .get(visual)
            .copied()
            .flatten()
    }

    /// Visual index at a renderable position.
    pub fn renderable_to_visual(&self, renderable: usize) -> Option<usize> {
        self.cache().renderable_to_visual.get(renderable).copied()
    }

    fn flagged(&self, physical: usize, kind: IndexMapType) -> bool {
        self.maps
            .values()
            .filter(|map| map.kind == kind)
            .any(|map| map.values.get(physical).copied().unwrap_or(false))
    }

    fn flags(&self, kind: IndexMapType) -> Vec<bool> {
        let mut flags = vec![false; self.sequence.len()];
        for map in self.maps.values().filter(|map| map.kind == kind) {
            for (flag, value) in flags.iter_mut().zip(&map.values) {
                *flag |= *value;
            }
        }
        flags
    }

    fn invalidate(&mut self) {
        self.cache.take();
    }

    fn cache(&self) -> &IndexCache {
        self.cache.get_or_init(|| self.build_cache())
    }

    fn build_cache(&self) -> IndexCache {
        let length = self.sequence.len();
        log::debug!(
            "rebuilding index cache ({length} indexes, {} maps)",
            self.maps.len()
        );
        let trimmed = self.flags(IndexMapType::Trimming);
        let hidden = self.flags(IndexMapType::Hiding);
        let mut cache = IndexCache {
            physical_to_visual: vec![None; length],
            physical_to_renderable: vec![None; length],
            ..IndexCache::default()
        };

        for &physical in &self.sequence {
            if trimmed.get(physical).copied().unwrap_or(false) {
                continue;
            }
            let visual = cache.visual_to_physical.len();
            cache.visual_to_physical.push(physical);
            if let Some(slot) = cache.physical_to_visual.get_mut(physical) {
                *slot = Some(visual);
            }
            if hidden.get(physical).copied().unwrap_or(false) {
                cache.visual_to_renderable.push(None);
                continue;
            }
            let renderable = cache.renderable_to_physical.len();
            cache.renderable_to_physical.push(physical);
            cache.renderable_to_visual.push(visual);
            cache.visual_to_renderable.push(Some(renderable));
            if let Some(slot) = cache.physical_to_renderable.get_mut(physical) {
                *slot = Some(renderable);
            }
        }
        cache
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_mapping() {
        let mapper = IndexMapper::new(5);
        assert_eq!(mapper.count_visual(), 5);
        assert_eq!(mapper.count_renderable(), 5);
        for i in 0..5 {
            assert_eq!(mapper.to_visual(i), Some(i));
            assert_eq!(mapper.to_physical(i), Some(i));
        }
        assert_eq!(mapper.to_physical(5), None);
        assert_eq!(mapper.to_visual(5), None);
    }

    #[test]
    fn test_trimming_removes_visual_slot() {
        let mut mapper = IndexMapper::new(5);
        mapper.register_index_map("filter", IndexMapType::Trimming, |p| p == 1 || p == 3);
        assert_eq!(mapper.count_visual(), 3);
        assert_eq!(mapper.to_physical(0), Some(0));
        assert_eq!(mapper.to_physical(1), Some(2));
        assert_eq!(mapper.to_physical(2), Some(4));
        assert_eq!(mapper.to_visual(1), None);
        assert!(mapper.is_trimmed(3));
    }

    #[test]
    fn test_hiding_keeps_visual_slot() {
        let mut mapper = IndexMapper::new(4);
        mapper.register_index_map("hidden", IndexMapType::Hiding, |p| p == 2);
        assert_eq!(mapper.count_visual(), 4);
        assert_eq!(mapper.count_renderable(), 3);
        assert_eq!(mapper.to_visual(2), Some(2));
        assert_eq!(mapper.to_renderable(2), None);
        assert_eq!(mapper.to_renderable(3), Some(2));
        assert_eq!(mapper.visual_to_renderable(2), None);
        assert_eq!(mapper.renderable_to_visual(2), Some(3));
        assert!(mapper.is_visual_hidden(2));
    }

    #[test]
    fn test_maps_of_same_type_are_ored() {
        let mut mapper = IndexMapper::new(4);
        mapper.register_index_map("a", IndexMapType::Hiding, |p| p == 0);
        mapper.register_index_map("b", IndexMapType::Hiding, |p| p == 3);
        assert_eq!(mapper.count_renderable(), 2);

        mapper.set_index_map_value("a", 0, false).unwrap();
        assert_eq!(mapper.count_renderable(), 3);
        assert!(mapper.unregister_index_map("b"));
        assert_eq!(mapper.count_renderable(), 4);
    }

    #[test]
    fn test_unknown_map_and_out_of_range() {
        let mut mapper = IndexMapper::new(2);
        assert!(matches!(
            mapper.set_index_map_value("missing", 0, true),
            Err(GridError::UnknownIndexMap(_))
        ));
        mapper.register_index_map("m", IndexMapType::Hiding, |_| false);
        assert!(matches!(
            mapper.set_index_map_value("m", 7, true),
            Err(GridError::OutOfRange(_))
        ));
    }

    #[test]
    fn test_cache_is_lazy() {
        let mut mapper = IndexMapper::new(3);
        assert!(mapper.cache.get().is_none());
        let _ = mapper.count_visual();
        assert!(mapper.cache.get().is_some());
        mapper.register_index_map("m", IndexMapType::Trimming, |_| true);
        assert!(mapper.cache.get().is_none());
        assert_eq!(mapper.count_visual(), 0);
    }

    #[test]
    fn test_sequence_reorders_visual_indexes() {
        let mut mapper = IndexMapper::new(3);
        mapper.set_indexes_sequence(vec![2, 0, 1]).unwrap();
        assert_eq!(mapper.to_physical(0), Some(2));
        assert_eq!(mapper.to_visual(0), Some(1));
        assert!(mapper.set_indexes_sequence(vec![0, 0, 1]).is_err());
        assert!(mapper.set_indexes_sequence(vec![0, 1]).is_err());
        assert!(mapper.set_indexes_sequence(vec![0, 1, 9]).is_err());
    }

    #[test]
    fn test_move_indexes() {
        let mut mapper = IndexMapper::new(5);
        mapper.move_indexes(&[0, 1], 3).unwrap();
        assert_eq!(mapper.indexes_sequence(), &[2, 3, 4, 0, 1]);

        let mut mapper = IndexMapper::new(5);
        mapper.move_indexes(&[4], 0).unwrap();
        assert_eq!(mapper.indexes_sequence(), &[4, 0, 1, 2, 3]);
    }

    #[test]
    fn test_set_length_keeps_maps_aligned() {
        let mut mapper = IndexMapper::new(2);
        mapper.register_index_map("m", IndexMapType::Hiding, |_| true);
        mapper.set_length(4);
        assert_eq!(mapper.count_visual(), 4);
        assert_eq!(mapper.count_renderable(), 2);
        mapper.set_length(1);
        assert_eq!(mapper.count_physical(), 1);
        assert_eq!(mapper.count_renderable(), 0);
    }
}
