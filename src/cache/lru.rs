//! LRU Recency List Module
//!
//! Arena-backed doubly-linked list tracking access order for LRU eviction.
//!
//! Items live in slots of a `Vec`; links are slot indices, so callers can
//! hold a stable handle (the slot index) and promote or unlink it in O(1).
//! - Front = Most recently used
//! - Back = Least recently used

// == List Node ==
#[derive(Debug)]
struct Node<T> {
    item: T,
    prev: Option<usize>,
    next: Option<usize>,
}

// == Recency List ==
/// Tracks access order for LRU eviction strategy.
#[derive(Debug)]
pub struct RecencyList<T> {
    /// Slot arena, None = free slot
    slots: Vec<Option<Node<T>>>,
    /// Free slot indices available for reuse
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    len: usize,
}

impl<T> Default for RecencyList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> RecencyList<T> {
    // == Constructor ==
    /// Creates a new empty recency list.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            head: None,
            tail: None,
            len: 0,
        }
    }

    /// Creates an empty list with room for `capacity` items.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            ..Self::new()
        }
    }

    // == Push Front ==
    /// Inserts an item as most recently used and returns its handle.
    pub fn push_front(&mut self, item: T) -> usize {
        let node = Node {
            item,
            prev: None,
            next: self.head,
        };
        let idx = match self.free.pop() {
            Some(idx) => {
                self.slots[idx] = Some(node);
                idx
            }
            None => {
                self.slots.push(Some(node));
                self.slots.len() - 1
            }
        };

        match self.head {
            Some(old_head) => self.node_mut(old_head).prev = Some(idx),
            None => self.tail = Some(idx),
        }
        self.head = Some(idx);
        self.len += 1;
        idx
    }

    // == Touch ==
    /// Marks a handle as recently used (moves to front).
    pub fn move_to_front(&mut self, idx: usize) {
        if self.head == Some(idx) {
            return;
        }
        self.unlink(idx);

        let old_head = self.head;
        {
            let node = self.node_mut(idx);
            node.prev = None;
            node.next = old_head;
        }
        match old_head {
            Some(head) => self.node_mut(head).prev = Some(idx),
            None => self.tail = Some(idx),
        }
        self.head = Some(idx);
    }

    // == Remove ==
    /// Unlinks a handle and returns its item, freeing the slot.
    ///
    /// Returns None if the handle does not refer to a live slot.
    pub fn remove(&mut self, idx: usize) -> Option<T> {
        if !matches!(self.slots.get(idx), Some(Some(_))) {
            return None;
        }
        self.unlink(idx);
        let node = self.slots[idx].take()?;
        self.free.push(idx);
        self.len -= 1;
        Some(node.item)
    }

    // == Evict Oldest ==
    /// Removes and returns the least recently used item.
    pub fn pop_back(&mut self) -> Option<T> {
        let tail = self.tail?;
        self.remove(tail)
    }

    /// Handle of the most recently used item.
    pub fn front(&self) -> Option<usize> {
        self.head
    }

    /// Handle of the least recently used item.
    pub fn back(&self) -> Option<usize> {
        self.tail
    }

    pub fn get(&self, idx: usize) -> Option<&T> {
        self.slots.get(idx)?.as_ref().map(|node| &node.item)
    }

    pub fn get_mut(&mut self, idx: usize) -> Option<&mut T> {
        self.slots.get_mut(idx)?.as_mut().map(|node| &mut node.item)
    }

    // == Length ==
    /// Returns the number of linked items.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Drops every item and releases all slots.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    // == Iteration ==
    /// Iterates `(handle, item)` pairs from most to least recently used.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            cursor: self.head,
        }
    }

    // == Structural Check ==
    /// Verifies links are symmetric, head/tail are terminal, and the number
    /// of reachable nodes equals both `len` and the occupied slot count.
    pub fn is_well_formed(&self) -> bool {
        let mut count = 0;
        let mut prev = None;
        let mut cursor = self.head;

        while let Some(idx) = cursor {
            let Some(Some(node)) = self.slots.get(idx) else {
                return false;
            };
            if node.prev != prev {
                return false;
            }
            count += 1;
            if count > self.len {
                return false;
            }
            prev = Some(idx);
            cursor = node.next;
        }

        let occupied = self.slots.iter().filter(|slot| slot.is_some()).count();
        prev == self.tail && count == self.len && occupied == self.len
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = {
            let node = self.node(idx);
            (node.prev, node.next)
        };

        match prev {
            Some(p) => self.node_mut(p).next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => self.node_mut(n).prev = prev,
            None => self.tail = prev,
        }
    }

    fn node(&self, idx: usize) -> &Node<T> {
        match &self.slots[idx] {
            Some(node) => node,
            None => unreachable!("recency list handle {idx} points at a free slot"),
        }
    }

    fn node_mut(&mut self, idx: usize) -> &mut Node<T> {
        match &mut self.slots[idx] {
            Some(node) => node,
            None => unreachable!("recency list handle {idx} points at a free slot"),
        }
    }
}

// == Iterator ==
/// Front-to-back iterator over a [`RecencyList`].
pub struct Iter<'a, T> {
    list: &'a RecencyList<T>,
    cursor: Option<usize>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = (usize, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.cursor?;
        let node = self.list.slots.get(idx)?.as_ref()?;
        self.cursor = node.next;
        Some((idx, &node.item))
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn items(list: &RecencyList<&'static str>) -> Vec<&'static str> {
        list.iter().map(|(_, item)| *item).collect()
    }

    #[test]
    fn test_list_new() {
        let list: RecencyList<u32> = RecencyList::new();
        assert!(list.is_empty());
        assert_eq!(list.len(), 0);
        assert_eq!(list.front(), None);
        assert_eq!(list.back(), None);
        assert!(list.is_well_formed());
    }

    #[test]
    fn test_push_front_orders_newest_first() {
        let mut list = RecencyList::new();
        list.push_front("key1");
        list.push_front("key2");
        list.push_front("key3");

        assert_eq!(list.len(), 3);
        assert_eq!(items(&list), vec!["key3", "key2", "key1"]);
        assert!(list.is_well_formed());
    }

    #[test]
    fn test_move_to_front() {
        let mut list = RecencyList::new();
        let a = list.push_front("a");
        list.push_front("b");
        list.push_front("c");

        // 'a' is oldest until touched
        assert_eq!(list.back(), Some(a));
        list.move_to_front(a);

        assert_eq!(list.front(), Some(a));
        assert_eq!(items(&list), vec!["a", "c", "b"]);
        assert!(list.is_well_formed());
    }

    #[test]
    fn test_move_to_front_from_middle() {
        let mut list = RecencyList::new();
        list.push_front("a");
        let b = list.push_front("b");
        list.push_front("c");

        list.move_to_front(b);
        assert_eq!(items(&list), vec!["b", "c", "a"]);
        assert!(list.is_well_formed());
    }

    #[test]
    fn test_move_front_is_noop() {
        let mut list = RecencyList::new();
        list.push_front("a");
        let b = list.push_front("b");

        list.move_to_front(b);
        assert_eq!(items(&list), vec!["b", "a"]);
        assert!(list.is_well_formed());
    }

    #[test]
    fn test_pop_back() {
        let mut list = RecencyList::new();
        list.push_front("key1");
        list.push_front("key2");
        list.push_front("key3");

        assert_eq!(list.pop_back(), Some("key1"));
        assert_eq!(list.pop_back(), Some("key2"));
        assert_eq!(list.len(), 1);
        assert_eq!(list.pop_back(), Some("key3"));
        assert_eq!(list.pop_back(), None);
        assert!(list.is_well_formed());
    }

    #[test]
    fn test_remove_middle() {
        let mut list = RecencyList::new();
        list.push_front("key1");
        let key2 = list.push_front("key2");
        list.push_front("key3");

        assert_eq!(list.remove(key2), Some("key2"));
        assert_eq!(items(&list), vec!["key3", "key1"]);
        assert!(list.is_well_formed());
    }

    #[test]
    fn test_remove_stale_handle() {
        let mut list = RecencyList::new();
        let a = list.push_front("a");

        assert_eq!(list.remove(a), Some("a"));
        assert_eq!(list.remove(a), None);
        assert_eq!(list.remove(99), None);
        assert!(list.is_empty());
        assert!(list.is_well_formed());
    }

    #[test]
    fn test_slots_are_reused() {
        let mut list = RecencyList::new();
        let a = list.push_front("a");
        list.push_front("b");
        list.remove(a);

        let c = list.push_front("c");
        assert_eq!(c, a);
        assert_eq!(list.get(c), Some(&"c"));
        assert_eq!(items(&list), vec!["c", "b"]);
        assert!(list.is_well_formed());
    }

    #[test]
    fn test_get_mut_updates_in_place() {
        let mut list = RecencyList::new();
        let a = list.push_front(1);
        if let Some(item) = list.get_mut(a) {
            *item = 10;
        }
        assert_eq!(list.get(a), Some(&10));
    }

    #[test]
    fn test_clear() {
        let mut list = RecencyList::with_capacity(4);
        list.push_front("a");
        list.push_front("b");
        list.clear();

        assert!(list.is_empty());
        assert_eq!(list.iter().count(), 0);
        assert!(list.is_well_formed());
    }

    #[test]
    fn test_order_after_multiple_touches() {
        let mut list = RecencyList::new();
        let a = list.push_front("a");
        let b = list.push_front("b");
        let c = list.push_front("c");

        // front=[b, c, a]=back after touching a, c, b
        list.move_to_front(a);
        list.move_to_front(c);
        list.move_to_front(b);

        assert_eq!(list.pop_back(), Some("a"));
        assert_eq!(list.pop_back(), Some("c"));
        assert_eq!(list.pop_back(), Some("b"));
    }
}
