//! Selected products and the manager that keeps them persisted.
//!
//! [`SelectionSet`] holds the pure state transitions. [`SelectionManager`]
//! wraps it with persistence and hands back a [`SelectionUpdate`] after every
//! mutation, which tells the rendering layer which keys are selected now and
//! what changed. The manager never touches view state itself.

use crate::product::{Product, SelectionKey};
use crate::store::{KeyValueStore, SelectionStore};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

/// Ordered set of product snapshots, unique by (name, brand)
///
/// # Example
///
/// ```rust
/// use routine_builder::{Product, SelectionSet, Toggled};
///
/// let foam = Product::new("Foam Wash", "X", "Cleanser");
/// let mut set = SelectionSet::new();
///
/// assert_eq!(set.toggle(&foam), Toggled::Added);
/// assert_eq!(set.len(), 1);
/// assert_eq!(set.toggle(&foam), Toggled::Removed);
/// assert!(set.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectionSet {
    items: Vec<Product>,
}

/// Result of toggling a product
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggled {
    Added,
    Removed,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from stored snapshots, keeping the first entry of any duplicate key
    pub fn from_products(products: Vec<Product>) -> Self {
        let mut set = Self::new();
        for product in products {
            if !set.contains(&product.key()) {
                set.items.push(product);
            }
        }
        set
    }

    fn position(&self, key: &SelectionKey) -> Option<usize> {
        self.items.iter().position(|p| p.has_key(key))
    }

    pub fn contains(&self, key: &SelectionKey) -> bool {
        self.position(key).is_some()
    }

    /// Remove the entry with the product's key, or append a copy of the product
    pub fn toggle(&mut self, product: &Product) -> Toggled {
        match self.position(&product.key()) {
            Some(index) => {
                self.items.remove(index);
                Toggled::Removed
            }
            None => {
                self.items.push(product.clone());
                Toggled::Added
            }
        }
    }

    pub fn remove_by_key(&mut self, key: &SelectionKey) -> Option<Product> {
        self.position(key).map(|index| self.items.remove(index))
    }

    /// Empty the set, returning the keys that were selected
    pub fn clear(&mut self) -> Vec<SelectionKey> {
        self.items.drain(..).map(|p| p.key()).collect()
    }

    pub fn keys(&self) -> HashSet<SelectionKey> {
        self.items.iter().map(Product::key).collect()
    }

    pub fn as_slice(&self) -> &[Product] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Product> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<'a> IntoIterator for &'a SelectionSet {
    type Item = &'a Product;
    type IntoIter = std::slice::Iter<'a, Product>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// What a single mutation did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionChange {
    Added(SelectionKey),
    Removed(SelectionKey),
    Cleared(Vec<SelectionKey>),
    Unchanged,
}

/// Render instruction produced by every mutation
///
/// `selected` is the complete set of keys that must be shown as selected;
/// `change` names what this mutation did so the caller can update the element
/// that triggered it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionUpdate {
    pub change: SelectionChange,
    pub selected: HashSet<SelectionKey>,
}

impl SelectionUpdate {
    pub fn is_selected(&self, key: &SelectionKey) -> bool {
        self.selected.contains(key)
    }
}

/// Owner of the session's selection
///
/// Single writer: every mutation runs to completion, persists the whole set,
/// and returns the [`SelectionUpdate`] the views need to resynchronise.
#[derive(Debug)]
pub struct SelectionManager<S> {
    set: SelectionSet,
    store: SelectionStore<S>,
}

impl<S: KeyValueStore> SelectionManager<S> {
    /// Create a manager seeded from whatever the store holds
    pub fn new(store: S) -> Self {
        let store = SelectionStore::new(store);
        let set = SelectionSet::from_products(store.load());
        debug!(count = set.len(), "restored selection");
        Self { set, store }
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.set
    }

    pub fn store(&self) -> &SelectionStore<S> {
        &self.store
    }

    pub fn toggle(&mut self, product: &Product) -> SelectionUpdate {
        let key = product.key();
        let change = match self.set.toggle(product) {
            Toggled::Added => SelectionChange::Added(key),
            Toggled::Removed => SelectionChange::Removed(key),
        };
        self.commit(change)
    }

    /// Remove the product with this name and brand; absent keys are not an error
    pub fn remove_by_key(&mut self, name: &str, brand: &str) -> SelectionUpdate {
        let key = SelectionKey::new(name, brand);
        let change = match self.set.remove_by_key(&key) {
            Some(_) => SelectionChange::Removed(key),
            None => SelectionChange::Unchanged,
        };
        self.commit(change)
    }

    /// Empty the selection. Callers confirm with the user first.
    pub fn clear(&mut self) -> SelectionUpdate {
        let cleared = self.set.clear();
        self.commit(SelectionChange::Cleared(cleared))
    }

    fn commit(&mut self, change: SelectionChange) -> SelectionUpdate {
        debug!(?change, count = self.set.len(), "selection changed");
        self.store.save(self.set.as_slice());
        SelectionUpdate {
            change,
            selected: self.set.keys(),
        }
    }
}
