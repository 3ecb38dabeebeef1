use slotmap::SlotMap;
use super::*;

fn make_keys(count: usize) -> Vec<NodeKey> {
    let mut sm = SlotMap::<NodeKey, ()>::with_key();
    (0..count).map(|_| sm.insert(())).collect()
}

#[test]
fn test_new_is_empty() {
    let mapping = NodeMapping::<u32>::new();
    assert!(mapping.is_empty());
    assert_eq!(mapping.len(), 0);
    assert_eq!(mapping.get(1), None);
}

#[test]
fn test_link_then_get() {
    let keys = make_keys(2);
    let mut mapping = NodeMapping::new();

    mapping.notify_link(10u32, keys[0]);
    mapping.notify_link(11u32, keys[1]);

    assert_eq!(mapping.len(), 2);
    assert_eq!(mapping.get(10), Some(keys[0]));
    assert_eq!(mapping.get(11), Some(keys[1]));
}

#[test]
fn test_unlink_removes_entry() {
    let keys = make_keys(1);
    let mut mapping = NodeMapping::new();

    mapping.notify_link(1u32, keys[0]);
    assert_eq!(mapping.notify_unlink(1), Some(keys[0]));
    assert!(mapping.is_empty());
}

#[test]
fn test_unlink_absent_is_noop() {
    let keys = make_keys(1);
    let mut mapping = NodeMapping::new();
    mapping.notify_link(1u32, keys[0]);

    assert_eq!(mapping.notify_unlink(2), None);
    assert_eq!(mapping.len(), 1);
}

#[test]
fn test_relink_after_unlink() {
    let keys = make_keys(2);
    let mut mapping = NodeMapping::new();

    mapping.notify_link(1u32, keys[0]);
    mapping.notify_unlink(1);
    mapping.notify_link(1u32, keys[1]);

    assert_eq!(mapping.get(1), Some(keys[1]));
}

#[test]
#[should_panic(expected = "already linked")]
fn test_duplicate_link_panics() {
    let keys = make_keys(2);
    let mut mapping = NodeMapping::new();

    mapping.notify_link(1u32, keys[0]);
    mapping.notify_link(1u32, keys[1]);
}

#[test]
fn test_iter_visits_every_entry() {
    let keys = make_keys(3);
    let mut mapping = NodeMapping::new();
    for (i, key) in keys.iter().enumerate() {
        mapping.notify_link(i as u32, *key);
    }

    let mut ids: Vec<u32> = mapping.iter().map(|(id, _)| id).collect();
    ids.sort();
    assert_eq!(ids, vec![0, 1, 2]);
}
