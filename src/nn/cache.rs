//! # Single-Slot Layer Cache
//!
//! Bridges a layer's `forward` call to its matching `backward` call.

/// Holds at most one value. `set` overwrites, `take` empties the slot.
#[derive(Debug, Clone)]
pub struct Cache<T> {
    slot: Option<T>,
}

impl<T> Cache<T> {
    pub fn new() -> Self {
        Cache { slot: None }
    }

    /// Stores `value`, discarding whatever was cached before.
    pub fn set(&mut self, value: T) {
        self.slot = Some(value);
    }

    /// Removes and returns the cached value, if any.
    pub fn take(&mut self) -> Option<T> {
        self.slot.take()
    }

    /// Borrows the cached value without clearing it.
    pub fn peek(&self) -> Option<&T> {
        self.slot.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.slot.is_none()
    }

    pub fn clear(&mut self) {
        self.slot = None;
    }
}

impl<T> Default for Cache<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_overwrites_and_take_clears() {
        let mut cache = Cache::new();
        assert!(cache.is_empty());
        cache.set(1);
        cache.set(2);
        assert_eq!(cache.peek(), Some(&2));
        assert_eq!(cache.take(), Some(2));
        assert_eq!(cache.take(), None);
    }

    #[test]
    fn clear_empties_slot() {
        let mut cache = Cache::default();
        cache.set("mask");
        cache.clear();
        assert!(cache.is_empty());
    }
}
