//! Priority ordering for component dispatch
//!
//! Vec-based queue ordered from high to low priority. Items with equal priority
//! keep their insertion order, which makes registration order the tie-breaker.

#[derive(Debug, Clone)]
pub struct PriorityQueue<T> {
    items: Vec<(i32, T)>, // (priority, item)
}

impl<T> PriorityQueue<T> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn push(&mut self, priority: i32, item: T) {
        // Insert after every item of higher or equal priority
        let pos = self.items.partition_point(|(p, _)| *p >= priority);
        self.items.insert(pos, (priority, item));
    }

    /// Items only, in dispatch order
    pub fn items(&self) -> impl Iterator<Item = &T> {
        self.items.iter().map(|(_, item)| item)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}

impl<T> Default for PriorityQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
