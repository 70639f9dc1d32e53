//! Binary min-heap ordered by a caller-supplied priority function.
//!
//! Unlike `std::collections::BinaryHeap` this keeps its backing storage open
//! for bulk edits: entries can be deleted or rewritten in one pass and the heap
//! is restored with a single O(n) heapify afterwards.

use std::{cmp::Ordering, mem};

#[derive(Clone, Debug)]
pub struct Heap<T> {
    entries: Vec<T>,
    priority: fn(&T) -> f64,
}

impl<T> Heap<T> {
    pub fn new(priority: fn(&T) -> f64) -> Self {
        Self {
            entries: Vec::new(),
            priority,
        }
    }

    pub fn with_capacity(priority: fn(&T) -> f64, capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            priority,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn push(&mut self, entry: T) {
        self.entries.push(entry);
        self.sift_up(self.entries.len() - 1);
    }

    /// Removes the minimum-priority entry. `None` on an empty heap.
    pub fn pop(&mut self) -> Option<T> {
        if self.entries.is_empty() {
            return None;
        }
        let last = self.entries.len() - 1;
        self.entries.swap(0, last);
        let top = self.entries.pop();
        if !self.entries.is_empty() {
            self.sift_down(0);
        }
        top
    }

    pub fn peek(&self) -> Option<&T> {
        self.entries.first()
    }

    /// Bulk insert with a single heapify instead of one sift per entry.
    pub fn push_all(&mut self, entries: impl IntoIterator<Item = T>) {
        self.entries.extend(entries);
        self.heapify();
    }

    /// Removes and returns every entry matching `predicate`.
    pub fn delete_all(&mut self, mut predicate: impl FnMut(&T) -> bool) -> Vec<T> {
        let (removed, kept): (Vec<T>, Vec<T>) = mem::take(&mut self.entries)
            .into_iter()
            .partition(|entry| predicate(entry));
        self.entries = kept;
        self.heapify();
        removed
    }

    /// Rewrites every entry into zero, one or many replacements, then
    /// restores heap order once.
    pub fn replace_all<I>(&mut self, mut transform: impl FnMut(T) -> I)
    where
        I: IntoIterator<Item = T>,
    {
        let old = mem::take(&mut self.entries);
        let mut next = Vec::with_capacity(old.len());
        for entry in old {
            next.extend(transform(entry));
        }
        self.entries = next;
        self.heapify();
    }

    pub fn any_match(&self, predicate: impl FnMut(&T) -> bool) -> bool {
        self.entries.iter().any(predicate)
    }

    /// Keeps only the `n` smallest entries.
    pub fn trim_to_smallest(&mut self, n: usize) {
        if self.entries.len() <= n {
            return;
        }
        let priority = self.priority;
        // an ascending array is already a valid min-heap
        self.entries
            .sort_by(|a, b| priority(a).total_cmp(&priority(b)));
        self.entries.truncate(n);
    }

    /// Entries in heap order, which is not sorted order.
    pub fn values(&self) -> &[T] {
        &self.entries
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.entries.shrink_to_fit();
    }

    pub fn into_sorted_vec(mut self) -> Vec<T> {
        let priority = self.priority;
        self.entries
            .sort_by(|a, b| priority(a).total_cmp(&priority(b)));
        self.entries
    }

    #[inline]
    fn cmp_at(&self, a: usize, b: usize) -> Ordering {
        (self.priority)(&self.entries[a]).total_cmp(&(self.priority)(&self.entries[b]))
    }

    fn heapify(&mut self) {
        for idx in (0..self.entries.len() / 2).rev() {
            self.sift_down(idx);
        }
    }

    fn sift_up(&mut self, mut idx: usize) {
        while idx > 0 {
            let parent = (idx - 1) / 2;
            if self.cmp_at(idx, parent) != Ordering::Less {
                break;
            }
            self.entries.swap(idx, parent);
            idx = parent;
        }
    }

    fn sift_down(&mut self, mut idx: usize) {
        let len = self.entries.len();
        loop {
            let left = 2 * idx + 1;
            if left >= len {
                break;
            }
            let right = left + 1;
            let smallest = if right < len && self.cmp_at(right, left) == Ordering::Less {
                right
            } else {
                left
            };
            if self.cmp_at(smallest, idx) != Ordering::Less {
                break;
            }
            self.entries.swap(idx, smallest);
            idx = smallest;
        }
    }
}
