use super::*;

fn letters() -> Registry<&'static str> {
    let mut registry = Registry::new();
    registry.insert(3, "c");
    registry.insert(1, "a");
    registry.insert(2, "b");
    registry
}

#[test]
fn keeps_insertion_order() {
    let registry = letters();
    assert_eq!(registry.ids(), &[3, 1, 2]);
    assert_eq!(registry.iter().copied().collect::<Vec<_>>(), vec!["c", "a", "b"]);
    assert_eq!(registry.position(1), Some(1));
}

#[test]
fn replacing_keeps_position() {
    let mut registry = letters();
    assert_eq!(registry.insert(1, "A"), Some("a"));
    assert_eq!(registry.ids(), &[3, 1, 2]);
    assert_eq!(registry.get(1), Some(&"A"));
}

#[test]
fn remove_drops_from_order() {
    let mut registry = letters();
    assert_eq!(registry.remove(1), Some("a"));
    assert_eq!(registry.remove(1), None);
    assert_eq!(registry.ids(), &[3, 2]);
    assert_eq!(registry.len(), 2);
}

#[test]
fn rekey_moves_entry_in_place() {
    let mut registry = letters();
    assert!(registry.rekey(1, 10));
    assert_eq!(registry.ids(), &[3, 10, 2]);
    assert_eq!(registry.get(10), Some(&"a"));
    assert!(!registry.contains(1));
}

#[test]
fn rekey_refuses_taken_or_missing() {
    let mut registry = letters();
    assert!(!registry.rekey(1, 2));
    assert!(!registry.rekey(9, 20));
    assert_eq!(registry.ids(), &[3, 1, 2]);
}

#[test]
fn sorts_by_entity_key() {
    let mut registry = letters();
    registry.sort_by_key(|letter| *letter);
    assert_eq!(registry.ids(), &[1, 2, 3]);
}

#[test]
fn move_to_shifts_neighbours() {
    let mut registry = letters();
    assert!(registry.move_to(2, 0));
    assert_eq!(registry.ids(), &[2, 3, 1]);
    assert!(registry.move_to(2, 99));
    assert_eq!(registry.ids(), &[3, 1, 2]);
    assert!(!registry.move_to(2, 2));
    assert!(!registry.move_to(9, 0));
}

#[test]
fn clear_empties() {
    let mut registry = letters();
    registry.clear();
    assert!(registry.is_empty());
    assert!(registry.ids().is_empty());
}
