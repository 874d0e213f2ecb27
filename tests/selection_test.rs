mod common;

use common::{foam_wash, gel_wash, night_cream};
use routine_builder::{
    Error, KeyValueStore, MemoryStore, Result, SelectionChange, SelectionKey, SelectionManager,
    SelectionSet, Toggled, SELECTION_KEY,
};

/// Store whose writes always fail, as when storage quota is exhausted
struct FullStore;

impl KeyValueStore for FullStore {
    fn get(&self, _key: &str) -> Result<Option<String>> {
        Ok(None)
    }

    fn set(&mut self, _key: &str, _value: &str) -> Result<()> {
        Err(Error::Persistence("quota exceeded".to_string()))
    }
}

#[test]
fn test_toggle_parity() {
    let product = foam_wash();
    for toggles in 1..=6 {
        let mut set = SelectionSet::from_products(vec![night_cream()]);
        let before = set.clone();
        for _ in 0..toggles {
            set.toggle(&product);
        }
        if toggles % 2 == 0 {
            assert_eq!(set, before, "{} toggles should restore the set", toggles);
        } else {
            let matches = set.iter().filter(|p| p.has_key(&product.key())).count();
            assert_eq!(matches, 1, "{} toggles should leave one entry", toggles);
        }
    }
}

#[test]
fn test_toggle_example_from_catalog() {
    let mut set = SelectionSet::new();

    assert_eq!(set.toggle(&foam_wash()), Toggled::Added);
    assert_eq!(set.len(), 1);
    assert_eq!(set.as_slice()[0].name, "Foam Wash");

    assert_eq!(set.toggle(&foam_wash()), Toggled::Removed);
    assert!(set.is_empty());
}

#[test]
fn test_toggle_matches_on_name_and_brand_only() {
    let mut set = SelectionSet::new();
    set.toggle(&foam_wash());

    // Same key, different snapshot: still counts as the same product
    let restyled = foam_wash().with_description("Reformulated");
    assert_eq!(set.toggle(&restyled), Toggled::Removed);

    // Same name, different brand: a different product
    set.toggle(&foam_wash());
    let other_brand = routine_builder::Product::new("Foam Wash", "Z", "Cleanser");
    assert_eq!(set.toggle(&other_brand), Toggled::Added);
    assert_eq!(set.len(), 2);
}

#[test]
fn test_from_products_drops_duplicate_keys() {
    let set = SelectionSet::from_products(vec![
        foam_wash(),
        gel_wash(),
        foam_wash().with_description("duplicate"),
    ]);
    assert_eq!(set.len(), 2);
    assert_eq!(set.as_slice()[0].description(), Some("A gentle foaming cleanser."));
}

#[test]
fn test_manager_persists_every_mutation() {
    let mut manager = SelectionManager::new(MemoryStore::new());

    let update = manager.toggle(&foam_wash());
    assert_eq!(update.change, SelectionChange::Added(foam_wash().key()));
    assert!(update.is_selected(&foam_wash().key()));

    let stored = manager.store().inner().get(SELECTION_KEY).unwrap().unwrap();
    assert!(stored.contains("Foam Wash"));

    manager.toggle(&gel_wash());
    assert_eq!(manager.store().load().len(), 2);
}

#[test]
fn test_remove_by_key_absent_is_noop() {
    let mut manager = SelectionManager::new(MemoryStore::new());
    manager.toggle(&foam_wash());

    let update = manager.remove_by_key("Missing", "Nobody");
    assert_eq!(update.change, SelectionChange::Unchanged);
    assert_eq!(manager.selection().len(), 1);

    let update = manager.remove_by_key("Foam Wash", "X");
    assert_eq!(update.change, SelectionChange::Removed(SelectionKey::new("Foam Wash", "X")));
    assert!(manager.selection().is_empty());
    assert!(manager.store().load().is_empty());
}

#[test]
fn test_clear_always_empties() {
    let mut manager = SelectionManager::new(MemoryStore::new());
    let update = manager.clear();
    assert_eq!(update.change, SelectionChange::Cleared(vec![]));
    assert!(manager.selection().is_empty());

    manager.toggle(&foam_wash());
    manager.toggle(&night_cream());
    let update = manager.clear();

    assert!(manager.selection().is_empty());
    assert!(update.selected.is_empty());
    assert_eq!(
        update.change,
        SelectionChange::Cleared(vec![foam_wash().key(), night_cream().key()])
    );
    assert!(manager.store().load().is_empty());
}

#[test]
fn test_selection_survives_reload() {
    let mut store = MemoryStore::new();
    {
        let mut manager = SelectionManager::new(store.clone());
        manager.toggle(&foam_wash());
        manager.toggle(&night_cream());
        store = manager.store().inner().clone();
    }

    let reloaded = SelectionManager::new(store);
    let names: Vec<_> = reloaded.selection().iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Foam Wash", "Night Cream"]);
}

#[test]
fn test_failed_writes_do_not_break_the_session() {
    let mut manager = SelectionManager::new(FullStore);

    manager.toggle(&foam_wash());
    manager.toggle(&gel_wash());
    assert_eq!(manager.selection().len(), 2);

    manager.remove_by_key("Gel Wash", "Y");
    assert_eq!(manager.selection().len(), 1);
}
