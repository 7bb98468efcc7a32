use super::*;
use ropey::Rope;

#[test]
fn test_apply_multiple_changes() {
    let mut rope = Rope::from_str("hello world");
    let set = ChangeSet::new(
        11,
        vec![ChangeSpec::replace(6, 11, "there"), ChangeSpec::insert(0, ">> ")],
    )
    .unwrap();
    set.apply(&mut rope);
    assert_eq!(rope.to_string(), ">> hello there");
    assert_eq!(set.len_after(), 14);
}

#[test]
fn test_rejects_out_of_bounds() {
    let err = ChangeSet::new(3, vec![ChangeSpec::delete(1, 5)]).unwrap_err();
    assert!(matches!(
        err,
        Error::InvalidChange {
            from: 1,
            to: 5,
            len: 3
        }
    ));
}

#[test]
fn test_rejects_overlap_and_inverted() {
    assert!(ChangeSet::new(10, vec![ChangeSpec::delete(0, 4), ChangeSpec::delete(3, 6)]).is_err());
    assert!(ChangeSet::new(10, vec![ChangeSpec::delete(4, 2)]).is_err());
}

#[test]
fn test_noops_are_dropped() {
    let set = ChangeSet::new(5, vec![ChangeSpec::insert(2, "")]).unwrap();
    assert!(set.is_empty());
}

#[test]
fn test_invert_restores_document() {
    let before = Rope::from_str("abcdef");
    let set = ChangeSet::new(
        6,
        vec![ChangeSpec::replace(1, 3, "XYZ"), ChangeSpec::delete(4, 6)],
    )
    .unwrap();

    let mut rope = before.clone();
    set.apply(&mut rope);
    assert_eq!(rope.to_string(), "aXYZd");

    let inverse = set.invert(&before);
    assert_eq!(inverse.len_before(), 5);
    inverse.apply(&mut rope);
    assert_eq!(rope.to_string(), "abcdef");
}

#[test]
fn test_map_pos_around_insert() {
    let set = ChangeSet::new(5, vec![ChangeSpec::insert(2, "xx")]).unwrap();
    assert_eq!(set.map_pos(1, Assoc::Before), 1);
    assert_eq!(set.map_pos(2, Assoc::Before), 2);
    assert_eq!(set.map_pos(2, Assoc::After), 4);
    assert_eq!(set.map_pos(4, Assoc::Before), 6);
}

#[test]
fn test_map_pos_inside_deletion() {
    let set = ChangeSet::new(10, vec![ChangeSpec::delete(2, 6)]).unwrap();
    assert_eq!(set.map_pos(4, Assoc::Before), 2);
    assert_eq!(set.map_pos(6, Assoc::Before), 2);
    assert_eq!(set.map_pos(8, Assoc::Before), 4);
}

#[test]
fn test_serializes_as_delta() {
    let set = ChangeSet::new(1, vec![ChangeSpec::insert(1, "b")]).unwrap();
    let json = serde_json::to_value(&set).unwrap();
    assert_eq!(json["lenBefore"], 1);
    assert_eq!(json["changes"][0]["from"], 1);
    assert_eq!(json["changes"][0]["insert"], "b");
}

#[test]
fn test_unicode_positions_are_chars() {
    let mut rope = Rope::from_str("héllo");
    let set = ChangeSet::new(5, vec![ChangeSpec::replace(1, 2, "e")]).unwrap();
    set.apply(&mut rope);
    assert_eq!(rope.to_string(), "hello");
}
