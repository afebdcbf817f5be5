use std::collections::HashSet;

use crate::error::InspectError;
use crate::logic::decode::decode_attributes;
use crate::model::identifier::ParsedIdentifier;
use crate::model::tree::{LeafNode, ResourceForest};
use crate::model::value::ResourceInfo;

/// Assemble the navigable forest from one flat resource dump.
///
/// Records are processed in input order: parse the identifier, walk or
/// create one inner node per property value down to the last, then
/// append a leaf named by the last value. Leaves whose identifier is in
/// `expanded` get their attribute batch decoded and attached.
///
/// A malformed identifier aborts the whole batch; the upstream source
/// broke its contract and a partial tree would be misleading.
pub fn build_tree(
    records: &[ResourceInfo],
    expanded: &HashSet<String>,
) -> Result<ResourceForest, InspectError> {
    let mut forest = ResourceForest::new();
    for record in records {
        let parsed = ParsedIdentifier::parse(&record.identifier)?;
        let Some((leaf_name, path)) = parsed.property_values.split_last() else {
            return Err(InspectError::MalformedIdentifier(record.identifier.clone()));
        };
        let mut node = forest.root_for(&parsed.domain);
        for value in path {
            node = node.get_or_create_inner(value);
        }
        let attribute_map = if expanded.contains(&record.identifier) {
            Some(decode_attributes(&record.attributes)?)
        } else {
            None
        };
        node.add_leaf(LeafNode::new(
            leaf_name.clone(),
            record.identifier.clone(),
            attribute_map.is_some(),
            attribute_map,
        ));
    }
    Ok(forest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::tree::TreeNode;
    use crate::model::value::{AttributeValue, WireAttribute, WireValue};

    fn record(identifier: &str) -> ResourceInfo {
        ResourceInfo {
            identifier: identifier.to_string(),
            attributes: Vec::new(),
        }
    }

    fn no_expansion() -> HashSet<String> {
        HashSet::new()
    }

    #[test]
    fn test_empty_batch_builds_empty_forest() {
        let forest = build_tree(&[], &no_expansion()).unwrap();
        assert!(forest.is_empty());
    }

    #[test]
    fn test_single_property_leaf_sits_under_domain_root() {
        let forest =
            build_tree(&[record("java.lang:type=Memory")], &no_expansion()).unwrap();

        assert_eq!(forest.len(), 1);
        let root = forest.get("java.lang").unwrap();
        let children = root.child_nodes();
        assert_eq!(children.len(), 1);
        match &children[0] {
            TreeNode::Leaf(leaf) => {
                assert_eq!(leaf.node_name, "Memory");
                assert_eq!(leaf.object_name, "java.lang:type=Memory");
                assert!(!leaf.expanded);
                assert!(leaf.attribute_map.is_none());
            }
            TreeNode::Inner(_) => panic!("expected a leaf under the domain root"),
        }
    }

    #[test]
    fn test_one_root_per_distinct_domain() {
        let forest = build_tree(
            &[
                record("a:type=X"),
                record("b:type=Y"),
                record("a:type=Z"),
            ],
            &no_expansion(),
        )
        .unwrap();

        assert_eq!(forest.len(), 2);
        assert!(forest.get("a").is_some());
        assert!(forest.get("b").is_some());
    }

    #[test]
    fn test_shared_prefix_merges_into_one_inner_chain() {
        let forest = build_tree(
            &[
                record("d:type=Pool,name=eden,metric=used"),
                record("d:type=Pool,name=eden,metric=max"),
                record("d:type=Pool,name=old,metric=used"),
            ],
            &no_expansion(),
        )
        .unwrap();

        let root = forest.get("d").unwrap();
        let root_children = root.child_nodes();
        assert_eq!(root_children.len(), 1, "one shared Pool inner node");
        let TreeNode::Inner(pool) = root_children[0] else {
            panic!("expected inner node");
        };
        let pool_children = pool.child_nodes();
        assert_eq!(pool_children.len(), 2, "eden and old");
        let names: Vec<&str> = pool_children.iter().map(|c| c.node_name()).collect();
        assert_eq!(names, vec!["eden", "old"]);
    }

    #[test]
    fn test_equal_leaf_names_with_distinct_identifiers_coexist() {
        let forest = build_tree(
            &[
                record("d:type=Foo,name=Bar"),
                record("d:type=Foo,nonsense=Bar"),
            ],
            &no_expansion(),
        )
        .unwrap();

        let root = forest.get("d").unwrap();
        let root_children = root.child_nodes();
        assert_eq!(root_children.len(), 1);
        let TreeNode::Inner(foo) = root_children[0] else {
            panic!("expected inner node");
        };
        let leaves = foo.child_nodes();
        assert_eq!(leaves.len(), 2);
        let object_names: Vec<String> = leaves
            .iter()
            .map(|c| match c {
                TreeNode::Leaf(leaf) => leaf.object_name.clone(),
                TreeNode::Inner(_) => panic!("expected only leaves"),
            })
            .collect();
        assert!(object_names.contains(&"d:type=Foo,name=Bar".to_string()));
        assert!(object_names.contains(&"d:type=Foo,nonsense=Bar".to_string()));
    }

    #[test]
    fn test_expanded_leaf_carries_decoded_attributes() {
        let records = vec![ResourceInfo {
            identifier: "java.lang:type=Memory".to_string(),
            attributes: vec![WireAttribute {
                name: "HeapMemoryUsage".to_string(),
                value: WireValue::long(1024),
            }],
        }];
        let expanded: HashSet<String> =
            [records[0].identifier.clone()].into_iter().collect();

        let forest = build_tree(&records, &expanded).unwrap();
        let root = forest.get("java.lang").unwrap();
        let children = root.child_nodes();
        let TreeNode::Leaf(leaf) = &children[0] else {
            panic!("expected leaf");
        };
        assert!(leaf.expanded);
        let attributes = leaf.attribute_map.as_ref().unwrap();
        assert_eq!(
            attributes.get("HeapMemoryUsage"),
            Some(&AttributeValue::Long(1024))
        );
    }

    #[test]
    fn test_collapsed_leaf_has_no_attribute_map_even_with_payload() {
        let records = vec![ResourceInfo {
            identifier: "d:type=X".to_string(),
            attributes: vec![WireAttribute {
                name: "Ignored".to_string(),
                value: WireValue::long(1),
            }],
        }];

        let forest = build_tree(&records, &no_expansion()).unwrap();
        let children = forest.get("d").unwrap().child_nodes();
        let TreeNode::Leaf(leaf) = &children[0] else {
            panic!("expected leaf");
        };
        assert!(!leaf.expanded);
        assert!(leaf.attribute_map.is_none());
    }

    #[test]
    fn test_malformed_identifier_aborts_whole_batch() {
        let result = build_tree(
            &[record("d:type=Ok"), record("broken-no-colon")],
            &no_expansion(),
        );
        assert!(matches!(
            result,
            Err(InspectError::MalformedIdentifier(_))
        ));
    }

    #[test]
    fn test_memory_example_serialization() {
        let forest =
            build_tree(&[record("java.lang:type=Memory")], &no_expansion()).unwrap();
        let text = serde_json::to_string(&forest).unwrap();
        assert_eq!(
            text,
            r#"{"java.lang":{"nodeName":"java.lang","childNodes":[{"nodeName":"Memory","objectName":"java.lang:type=Memory","expanded":false}]}}"#
        );
    }
}
