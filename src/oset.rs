//! Insertion-ordered set.
//!
//! Keys live in a hash map alongside their `prev`/`next` neighbours, so the
//! map doubles as a doubly linked list. `head`/`tail` play the role of the
//! sentinel node: an empty set has neither, a one-element set has both
//! pointing at the same key.
//!
//! - `insert`, `remove`, `contains` are O(1).
//! - Iteration walks the links, O(n), in first-insertion order.
//! - Re-inserting a present key and removing an absent key are no-ops.
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::Hash;

#[derive(Clone, Debug)]
struct Links<K> {
    prev: Option<K>,
    next: Option<K>,
}

#[derive(Clone)]
pub struct OrderedSet<K> {
    map: HashMap<K, Links<K>>,
    head: Option<K>,
    tail: Option<K>,
}

impl<K> Default for OrderedSet<K> {
    fn default() -> Self {
        Self { map: HashMap::new(), head: None, tail: None }
    }
}

impl<K: Hash + Eq + Clone> OrderedSet<K> {
    pub fn new() -> Self { Self::default() }

    pub fn len(&self) -> usize { self.map.len() }

    pub fn is_empty(&self) -> bool { self.map.is_empty() }

    pub fn contains(&self, key: &K) -> bool { self.map.contains_key(key) }

    /// Append `key` unless already present. Returns `true` if it was added.
    pub fn insert(&mut self, key: K) -> bool {
        if self.map.contains_key(&key) {
            return false;
        }
        let prev = self.tail.replace(key.clone());
        match &prev {
            Some(p) => {
                if let Some(links) = self.map.get_mut(p) {
                    links.next = Some(key.clone());
                }
            }
            None => self.head = Some(key.clone()),
        }
        self.map.insert(key, Links { prev, next: None });
        true
    }

    /// Unlink `key` if present. Returns `true` if it was removed.
    pub fn remove(&mut self, key: &K) -> bool {
        let Some(Links { prev, next }) = self.map.remove(key) else {
            return false;
        };
        match &prev {
            Some(p) => {
                if let Some(links) = self.map.get_mut(p) {
                    links.next = next.clone();
                }
            }
            None => self.head = next.clone(),
        }
        match &next {
            Some(n) => {
                if let Some(links) = self.map.get_mut(n) {
                    links.prev = prev;
                }
            }
            None => self.tail = prev,
        }
        true
    }

    pub fn first(&self) -> Option<&K> { self.head.as_ref() }

    pub fn last(&self) -> Option<&K> { self.tail.as_ref() }

    /// Remove and return the newest (`last == true`) or oldest key.
    pub fn pop(&mut self, last: bool) -> Option<K> {
        let key = if last { self.tail.clone()? } else { self.head.clone()? };
        self.remove(&key);
        Some(key)
    }

    pub fn pop_back(&mut self) -> Option<K> { self.pop(true) }

    pub fn pop_front(&mut self) -> Option<K> { self.pop(false) }

    pub fn iter(&self) -> Iter<'_, K> {
        Iter {
            set: self,
            front: self.head.as_ref(),
            back: self.tail.as_ref(),
            remaining: self.map.len(),
        }
    }
}

pub struct Iter<'a, K> {
    set: &'a OrderedSet<K>,
    front: Option<&'a K>,
    back: Option<&'a K>,
    remaining: usize,
}

impl<'a, K: Hash + Eq> Iterator for Iter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        if self.remaining == 0 {
            return None;
        }
        let key = self.front?;
        self.front = self.set.map.get(key).and_then(|l| l.next.as_ref());
        self.remaining -= 1;
        Some(key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, K: Hash + Eq> DoubleEndedIterator for Iter<'a, K> {
    fn next_back(&mut self) -> Option<&'a K> {
        if self.remaining == 0 {
            return None;
        }
        let key = self.back?;
        self.back = self.set.map.get(key).and_then(|l| l.prev.as_ref());
        self.remaining -= 1;
        Some(key)
    }
}

impl<'a, K: Hash + Eq> ExactSizeIterator for Iter<'a, K> {}

impl<'a, K: Hash + Eq + Clone> IntoIterator for &'a OrderedSet<K> {
    type Item = &'a K;
    type IntoIter = Iter<'a, K>;
    fn into_iter(self) -> Iter<'a, K> { self.iter() }
}

impl<K: Hash + Eq + Clone> Extend<K> for OrderedSet<K> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, keys: I) {
        for key in keys {
            self.insert(key);
        }
    }
}

impl<K: Hash + Eq + Clone> FromIterator<K> for OrderedSet<K> {
    fn from_iter<I: IntoIterator<Item = K>>(keys: I) -> Self {
        let mut out = Self::new();
        out.extend(keys);
        out
    }
}

/// Order-sensitive.
impl<K: Hash + Eq + Clone> PartialEq for OrderedSet<K> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<K: Hash + Eq + Clone> Eq for OrderedSet<K> {}

/// Order-insensitive: a plain set carries no order to compare against.
impl<K: Hash + Eq + Clone> PartialEq<HashSet<K>> for OrderedSet<K> {
    fn eq(&self, other: &HashSet<K>) -> bool {
        self.len() == other.len() && self.iter().all(|k| other.contains(k))
    }
}

impl<K: Hash + Eq + Clone + fmt::Debug> fmt::Debug for OrderedSet<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
