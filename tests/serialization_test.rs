//! Round trips of nodes and trees through serde

use dagnode::util::testing::{self, sample_tree};
use dagnode::{get_node_by_identity, Attribute, CompositeNode, Node, NodeRecord, Value};
use rstest::rstest;

#[ctor::ctor]
fn init() {
    testing::init_test_setup();
}

// ============================================================
// Tree Round Trip Tests
// ============================================================

#[test]
fn given_four_node_tree_when_round_tripped_then_root_equal() {
    let (a, _, _, _) = sample_tree();

    let json = serde_json::to_string(&a).unwrap();
    let restored: CompositeNode = serde_json::from_str(&json).unwrap();

    assert_eq!(restored, a);
    assert!(!restored.ptr_eq(&a));
    assert_eq!(restored.list_node(), a.list_node());
}

#[test]
fn given_tree_when_round_tripped_then_identities_names_attributes_kept() {
    let (a, b, _, d) = sample_tree();
    b.set_field("note", "plain field");

    let restored: CompositeNode = serde_json::from_str(&serde_json::to_string(&a).unwrap()).unwrap();
    let restored_b = restored.child(0).unwrap();
    let restored_d = restored_b.child(0).unwrap();

    assert_eq!(restored.identity(), a.identity());
    assert_eq!(restored_b.identity(), b.identity());
    assert_eq!(restored_d.name(), d.name());
    assert_eq!(restored_b.list_attributes(), vec!["attributeA", "attributeB"]);
    assert_eq!(restored_b.attribute("attributeB").unwrap().value(), Value::from(3));
    assert_eq!(restored_b.field("note"), Some(Value::from("plain field")));
    assert!(!restored_b.attribute_exists("note"));
}

#[test]
fn given_tree_when_round_tripped_then_parent_links_rebuilt() {
    let (a, _, _, _) = sample_tree();
    let restored: CompositeNode = serde_json::from_str(&serde_json::to_string(&a).unwrap()).unwrap();

    let restored_b = restored.child(0).unwrap();
    let restored_d = restored_b.child(0).unwrap();
    assert!(restored_b.parent().unwrap().ptr_eq(&restored));
    assert!(restored_d.parent().unwrap().ptr_eq(&restored_b));
    assert!(restored.parent().is_none());
}

#[test]
fn given_original_alive_when_restored_then_registry_keeps_original() {
    let (a, _, _, _) = sample_tree();
    let restored: CompositeNode = serde_json::from_str(&serde_json::to_string(&a).unwrap()).unwrap();

    let registered = get_node_by_identity(a.identity()).unwrap();
    assert!(registered.ptr_eq(a.as_node()));
    drop(restored);
    assert!(get_node_by_identity(a.identity()).is_some());
}

#[test]
fn given_original_dropped_when_restored_then_takes_registry_slot() {
    let json = {
        let (a, _, _, _) = sample_tree();
        serde_json::to_string(&a).unwrap()
    };
    let record: NodeRecord = serde_json::from_str(&json).unwrap();
    let identity = record.identity.unwrap();
    assert!(get_node_by_identity(identity).is_none());

    let restored = record.into_composite();
    assert!(get_node_by_identity(identity).unwrap().ptr_eq(restored.as_node()));
}

#[test]
fn given_restored_identity_when_creating_new_node_then_no_collision() {
    let ahead = Node::new().identity().get() + 1000;
    let record = NodeRecord {
        identity: Some(serde_json::from_str(&ahead.to_string()).unwrap()),
        ..NodeRecord::default()
    };
    let restored = record.into_composite();
    let fresh = Node::new();
    assert!(fresh.identity() > restored.identity());
}

// ============================================================
// Plain Node Tests
// ============================================================

#[test]
fn given_plain_node_when_round_tripped_then_equal_by_identity() {
    let node = Node::builder()
        .name("plain")
        .attribute("size", Attribute::new(Some("size"), 4).field("unit", "px"))
        .build();
    let restored: Node = serde_json::from_str(&serde_json::to_string(&node).unwrap()).unwrap();

    assert_eq!(restored, node);
    assert!(!restored.is_composite());
    let size = restored.attribute("size").unwrap();
    assert_eq!(size.name().as_deref(), Some("size"));
    assert_eq!(size.get_field("unit"), Some(Value::from("px")));
    // attribute slots are new objects after a round trip
    assert_ne!(size, node.attribute("size").unwrap());
}

// ============================================================
// Identity Range Tests
// ============================================================

#[rstest]
#[case(u64::MAX)]
#[case(u64::MAX - 1)]
fn given_huge_identity_in_document_when_restored_then_fresh_identity_and_counter_usable(
    #[case] huge: u64,
) {
    let json = format!(r#"{{"identity": {}, "name": "x"}}"#, huge);
    let record: NodeRecord = serde_json::from_str(&json).unwrap();

    let restored = record.into_composite();

    assert_eq!(restored.name(), "x");
    assert_ne!(restored.identity().get(), huge);
    assert!(Node::new().identity() > restored.identity());
}
