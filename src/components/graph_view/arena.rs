//! Index-stable storage for materialized nodes and edges.
//!
//! Expand/collapse churn would reallocate a plain `Vec` and invalidate
//! renderer references between frames. The arena keeps slot indices stable:
//! removal leaves a tombstone, insertion reuses freed slots, and an id map
//! gives O(1) lookup by key.

use std::collections::HashMap;

/// Items stored in an [`Arena`] expose their stable string key.
pub trait Keyed {
	fn key(&self) -> &str;
}

impl Keyed for super::model::GraphNode {
	fn key(&self) -> &str {
		&self.id
	}
}

impl Keyed for super::model::GraphEdge {
	fn key(&self) -> &str {
		&self.id
	}
}

/// Growable slot container with tombstone removal.
#[derive(Clone, Debug)]
pub struct Arena<T> {
	slots: Vec<Option<T>>,
	index: HashMap<String, usize>,
	free: Vec<usize>,
}

impl<T: Keyed> Arena<T> {
	pub fn new() -> Self {
		Self {
			slots: Vec::new(),
			index: HashMap::new(),
			free: Vec::new(),
		}
	}

	pub fn len(&self) -> usize {
		self.index.len()
	}

	pub fn is_empty(&self) -> bool {
		self.index.is_empty()
	}

	pub fn contains(&self, key: &str) -> bool {
		self.index.contains_key(key)
	}

	/// Insert an item, reusing a freed slot when one exists. An item with the
	/// same key replaces the existing one in place.
	pub fn insert(&mut self, item: T) -> usize {
		if let Some(&slot) = self.index.get(item.key()) {
			self.slots[slot] = Some(item);
			return slot;
		}
		let slot = match self.free.pop() {
			Some(slot) => {
				self.slots[slot] = Some(item);
				slot
			}
			None => {
				self.slots.push(Some(item));
				self.slots.len() - 1
			}
		};
		let key = self.slots[slot].as_ref().map(|i| i.key().to_string());
		if let Some(key) = key {
			self.index.insert(key, slot);
		}
		slot
	}

	pub fn remove(&mut self, key: &str) -> Option<T> {
		let slot = self.index.remove(key)?;
		let item = self.slots[slot].take();
		self.free.push(slot);
		item
	}

	pub fn get(&self, key: &str) -> Option<&T> {
		self.index.get(key).and_then(|&slot| self.slots[slot].as_ref())
	}

	pub fn get_mut(&mut self, key: &str) -> Option<&mut T> {
		let slot = *self.index.get(key)?;
		self.slots[slot].as_mut()
	}

	/// Drop every item failing the predicate, tombstoning its slot.
	pub fn retain(&mut self, mut keep: impl FnMut(&T) -> bool) {
		for slot in 0..self.slots.len() {
			let drop_it = matches!(&self.slots[slot], Some(item) if !keep(item));
			if drop_it {
				if let Some(item) = self.slots[slot].take() {
					self.index.remove(item.key());
					self.free.push(slot);
				}
			}
		}
	}

	pub fn iter(&self) -> impl Iterator<Item = &T> {
		self.slots.iter().filter_map(Option::as_ref)
	}

	pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
		self.slots.iter_mut().filter_map(Option::as_mut)
	}
}

impl<T: Keyed> Default for Arena<T> {
	fn default() -> Self {
		Self::new()
	}
}
