//! Generic keyed storage for named IR instances: `qcir`, `zx`, and
//! `tableau` managers are each just a `Manager<T>`. IDs
//! are the smallest unused nonnegative integer, and one ID at a time is
//! "in focus" — the REPL binary's commands default to operating on it.

use std::collections::BTreeMap;

use crate::error::{Error, Result};

pub struct Manager<T> {
    items: BTreeMap<usize, T>,
    focus: Option<usize>,
}

impl<T> Default for Manager<T> {
    fn default() -> Self {
        Manager { items: BTreeMap::new(), focus: None }
    }
}

impl<T> Manager<T> {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&self) -> usize {
        let mut id = 0;
        while self.items.contains_key(&id) {
            id += 1;
        }
        id
    }

    /// Insert `item` under `id` (or the next free id if `None`), focus it,
    /// and return the id it landed at.
    pub fn add(&mut self, id: Option<usize>, item: T) -> Result<usize> {
        let id = id.unwrap_or_else(|| self.next_id());
        if self.items.contains_key(&id) {
            return Err(Error::Semantics(format!("id {id} is already in use")));
        }
        self.items.insert(id, item);
        self.focus = Some(id);
        Ok(id)
    }

    pub fn remove(&mut self, id: usize) -> Result<T> {
        let item = self.items.remove(&id).ok_or_else(|| Error::OutOfRange(format!("no such id {id}")))?;
        if self.focus == Some(id) {
            self.focus = self.items.keys().next_back().copied();
        }
        Ok(item)
    }

    pub fn checkout(&mut self, id: usize) -> Result<()> {
        if !self.items.contains_key(&id) {
            return Err(Error::OutOfRange(format!("no such id {id}")));
        }
        self.focus = Some(id);
        Ok(())
    }

    pub fn focus(&self) -> Option<usize> {
        self.focus
    }

    pub fn get(&self, id: usize) -> Result<&T> {
        self.items.get(&id).ok_or_else(|| Error::OutOfRange(format!("no such id {id}")))
    }

    pub fn get_mut(&mut self, id: usize) -> Result<&mut T> {
        self.items.get_mut(&id).ok_or_else(|| Error::OutOfRange(format!("no such id {id}")))
    }

    pub fn focused(&self) -> Result<&T> {
        let id = self.focus.ok_or_else(|| Error::Semantics("no instance in focus".to_string()))?;
        self.get(id)
    }

    pub fn focused_mut(&mut self) -> Result<&mut T> {
        let id = self.focus.ok_or_else(|| Error::Semantics("no instance in focus".to_string()))?;
        self.get_mut(id)
    }

    pub fn empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn ids(&self) -> impl Iterator<Item = usize> + '_ {
        self.items.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &T)> {
        self.items.iter().map(|(&id, item)| (id, item))
    }
}

impl<T: Clone> Manager<T> {
    /// Duplicate `id` (or the focused instance if `None`) under a fresh id.
    pub fn copy(&mut self, id: Option<usize>) -> Result<usize> {
        let source = match id {
            Some(id) => id,
            None => self.focus.ok_or_else(|| Error::Semantics("no instance in focus".to_string()))?,
        };
        let item = self.get(source)?.clone();
        self.add(None, item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_fill_the_lowest_free_slot() {
        let mut m: Manager<i32> = Manager::new();
        assert_eq!(m.add(None, 10).unwrap(), 0);
        assert_eq!(m.add(None, 20).unwrap(), 1);
        m.remove(0).unwrap();
        assert_eq!(m.add(None, 30).unwrap(), 0);
    }

    #[test]
    fn adding_focuses_the_new_id() {
        let mut m: Manager<i32> = Manager::new();
        let id = m.add(None, 5).unwrap();
        assert_eq!(m.focus(), Some(id));
    }

    #[test]
    fn copy_duplicates_under_a_fresh_id() {
        let mut m: Manager<Vec<i32>> = Manager::new();
        let a = m.add(None, vec![1, 2, 3]).unwrap();
        let b = m.copy(Some(a)).unwrap();
        assert_ne!(a, b);
        assert_eq!(m.get(a).unwrap(), m.get(b).unwrap());
    }

    #[test]
    fn checkout_unknown_id_errors() {
        let mut m: Manager<i32> = Manager::new();
        assert!(m.checkout(42).is_err());
    }

    #[test]
    fn removing_focused_id_refocuses_to_the_highest_remaining() {
        let mut m: Manager<i32> = Manager::new();
        m.add(None, 1).unwrap();
        let b = m.add(None, 2).unwrap();
        m.remove(b).unwrap();
        assert_eq!(m.focus(), Some(0));
    }
}
