use crate::error::{Error, Result};

/// Array-backed binary min-heap over any totally ordered element type.
///
/// Invariant: for every index `k > 0`, `items[(k - 1) / 2] <= items[k]`, so the
/// minimum always sits at index 0. Order among equal elements is unspecified.
#[derive(Debug, Clone)]
pub struct MinHeap<T> {
    items: Vec<T>,
}

impl<T: Ord> MinHeap<T> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
        }
    }

    /// Insert `item`, restoring heap order in O(log n).
    pub fn add(&mut self, item: T) {
        self.items.push(item);
        self.sift_up(self.items.len() - 1);
    }

    /// Remove and return the minimum element in O(log n), or `None` when empty.
    pub fn pop(&mut self) -> Option<T> {
        if self.items.is_empty() {
            return None;
        }
        let min = self.items.swap_remove(0);
        if !self.items.is_empty() {
            self.sift_down(0);
        }
        Some(min)
    }

    /// Like [`MinHeap::pop`], but an empty heap is an [`Error::EmptyQueue`].
    pub fn try_pop(&mut self) -> Result<T> {
        self.pop().ok_or(Error::EmptyQueue)
    }

    /// The minimum element without removing it.
    #[inline]
    pub fn peek(&self) -> Option<&T> {
        self.items.first()
    }

    /// Like [`MinHeap::peek`], but an empty heap is an [`Error::EmptyQueue`].
    pub fn try_peek(&self) -> Result<&T> {
        self.peek().ok_or(Error::EmptyQueue)
    }

    /// Current element count, O(1).
    #[inline]
    pub fn size(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Elements in storage order (heap order, not sorted).
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    fn sift_up(&mut self, mut k: usize) {
        while k > 0 {
            let parent = (k - 1) / 2;
            if self.items[k] >= self.items[parent] {
                break;
            }
            self.items.swap(k, parent);
            k = parent;
        }
    }

    fn sift_down(&mut self, mut k: usize) {
        let n = self.items.len();
        loop {
            let left = 2 * k + 1;
            if left >= n {
                break;
            }
            let right = left + 1;
            let child = if right < n && self.items[right] < self.items[left] {
                right
            } else {
                left
            };
            if self.items[k] <= self.items[child] {
                break;
            }
            self.items.swap(k, child);
            k = child;
        }
    }

    #[cfg(test)]
    fn is_heap(&self) -> bool {
        (1..self.items.len()).all(|k| self.items[(k - 1) / 2] <= self.items[k])
    }
}

impl<T: Ord> Default for MinHeap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Ord> Extend<T> for MinHeap<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.add(item);
        }
    }
}

impl<T: Ord> FromIterator<T> for MinHeap<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut heap = Self::new();
        heap.extend(iter);
        heap
    }
}
