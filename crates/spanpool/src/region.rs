//! Address-ordered region list backed by a slot table.
//!
//! [`RegionList`] stores one [`Region`] record per live allocation in a
//! `Vec` of slots, threaded into a doubly-linked list by explicit `prev` /
//! `next` slot indices. Vacated slots go on a free list and are reused by
//! the next insertion, so splicing a region in or out never moves any other
//! record. A `start → slot` index makes handle lookup O(1); the linked list
//! alone defines address order.

use indexmap::IndexMap;

/// Index of a slot in the region table.
///
/// Caps a pool at `u32::MAX + 1` simultaneously live regions.
pub(crate) type SlotIdx = u32;

/// Index for a new slot appended at position `len`.
///
/// # Panics
///
/// Panics if `len` does not fit in [`SlotIdx`].
fn slot_index(len: usize) -> SlotIdx {
    SlotIdx::try_from(len).expect("region table exceeds u32::MAX slots")
}

/// Bookkeeping for one live allocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Region {
    /// First occupied byte offset.
    pub start: usize,
    /// Occupied length in bytes. Never zero.
    pub len: usize,
    /// Free bytes after this region, up to the next region or buffer end.
    pub trailing_gap: usize,
    /// Previous region in address order.
    pub prev: Option<SlotIdx>,
    /// Next region in address order.
    pub next: Option<SlotIdx>,
}

impl Region {
    /// One past the last occupied byte.
    pub fn end(&self) -> usize {
        self.start + self.len
    }
}

pub(crate) struct RegionList {
    slots: Vec<Option<Region>>,
    free_list: Vec<SlotIdx>,
    head: Option<SlotIdx>,
    by_start: IndexMap<usize, SlotIdx>,
}

impl RegionList {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_list: Vec::new(),
            head: None,
            by_start: IndexMap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Number of live regions.
    pub fn len(&self) -> usize {
        self.by_start.len()
    }

    #[cfg(test)]
    pub fn head(&self) -> Option<SlotIdx> {
        self.head
    }

    /// Slot of the region starting exactly at `start`.
    pub fn find(&self, start: usize) -> Option<SlotIdx> {
        self.by_start.get(&start).copied()
    }

    /// # Panics
    ///
    /// Panics if `idx` does not name an occupied slot.
    pub fn get(&self, idx: SlotIdx) -> &Region {
        self.slots[idx as usize]
            .as_ref()
            .expect("slot index refers to a live region")
    }

    /// # Panics
    ///
    /// Panics if `idx` does not name an occupied slot.
    pub fn get_mut(&mut self, idx: SlotIdx) -> &mut Region {
        self.slots[idx as usize]
            .as_mut()
            .expect("slot index refers to a live region")
    }

    /// Insert a region as the new head of the list.
    pub fn push_front(&mut self, start: usize, len: usize, trailing_gap: usize) -> SlotIdx {
        let next = self.head;
        let idx = self.occupy(Region {
            start,
            len,
            trailing_gap,
            prev: None,
            next,
        });
        if let Some(old_head) = next {
            self.get_mut(old_head).prev = Some(idx);
        }
        self.head = Some(idx);
        idx
    }

    /// Splice a region into the list immediately after `after`.
    pub fn insert_after(
        &mut self,
        after: SlotIdx,
        start: usize,
        len: usize,
        trailing_gap: usize,
    ) -> SlotIdx {
        let next = self.get(after).next;
        let idx = self.occupy(Region {
            start,
            len,
            trailing_gap,
            prev: Some(after),
            next,
        });
        self.get_mut(after).next = Some(idx);
        if let Some(n) = next {
            self.get_mut(n).prev = Some(idx);
        }
        idx
    }

    /// Unlink a region, relink its neighbours to each other and recycle the slot.
    ///
    /// Returns the removed record; its `prev` still names the former
    /// predecessor so the caller can hand the freed bytes to it.
    pub fn unlink(&mut self, idx: SlotIdx) -> Region {
        let region = self.slots[idx as usize]
            .take()
            .expect("slot index refers to a live region");
        match region.prev {
            Some(p) => self.get_mut(p).next = region.next,
            None => self.head = region.next,
        }
        if let Some(n) = region.next {
            self.get_mut(n).prev = region.prev;
        }
        self.by_start.swap_remove(&region.start);
        self.free_list.push(idx);
        region
    }

    /// Iterate over live regions in address order, with their slot indices.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            list: self,
            cursor: self.head,
        }
    }

    /// Slots allocated so far (live + vacant).
    #[cfg(test)]
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    fn occupy(&mut self, region: Region) -> SlotIdx {
        let start = region.start;
        let idx = if let Some(reuse) = self.free_list.pop() {
            self.slots[reuse as usize] = Some(region);
            reuse
        } else {
            let idx = slot_index(self.slots.len());
            self.slots.push(Some(region));
            idx
        };
        self.by_start.insert(start, idx);
        idx
    }
}

/// Address-order iterator over a [`RegionList`].
pub(crate) struct Iter<'a> {
    list: &'a RegionList,
    cursor: Option<SlotIdx>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (SlotIdx, &'a Region);

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.cursor?;
        let region = self.list.get(idx);
        self.cursor = region.next;
        Some((idx, region))
    }
}
