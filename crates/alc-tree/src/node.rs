//! The logged value tree and the wrapping/unwrapping protocol.
//!
//! [`Node`] is what logged containers actually store: a logged container
//! variant for mapping, sequence, and set values, or a bare scalar.
//! [`Node::wrap`] converts plain values into their logged equivalents on the
//! way in; [`Node::to_plain`] flattens them back on the way out. Both
//! recurse to unbounded depth, which keeps the nesting invariant: every
//! container-shaped value inside a logged container is itself logged.

use std::fmt;

use alc_types::{Channel, Scalar, Value, ValueKind};

use crate::list::LoggedList;
use crate::map::LoggedMap;
use crate::set::LoggedSet;

/// A value stored inside a logged container.
///
/// Container variants are cheap handles sharing the underlying node; cloning
/// a `Node` aliases it. Scalars are stored by value and never audited.
#[derive(Clone, Debug)]
pub enum Node {
    Map(LoggedMap),
    List(LoggedList),
    Set(LoggedSet),
    Scalar(Scalar),
}

impl Node {
    /// Wrap a plain value under `channel`.
    ///
    /// Mapping, sequence, and set values recursively construct the matching
    /// logged variant; scalars pass through unchanged. This is applied to
    /// every value entering a logged container, at construction and at each
    /// mutation that introduces new values. Total: all inputs are accepted.
    pub fn wrap(channel: Channel, value: Value) -> Node {
        match value {
            Value::Map(entries) => Node::Map(LoggedMap::from_entries(channel, entries)),
            Value::List(items) => Node::List(LoggedList::from_items(channel, items)),
            Value::Set(items) => Node::Set(LoggedSet::from_items(channel, items)),
            Value::Scalar(scalar) => Node::Scalar(scalar),
        }
    }

    /// Recursively flatten back to a plain value, discarding all wrappers.
    pub fn to_plain(&self) -> Value {
        self.to_plain_with(false)
    }

    /// Flatten with control over set rendering: when `sets_as_lists` is
    /// set, set containers flatten to plain sequences instead of sets.
    ///
    /// Terminates on any tree: the public API only accepts plain values, so
    /// wrapping always builds fresh containers and cycles are
    /// unrepresentable.
    pub fn to_plain_with(&self, sets_as_lists: bool) -> Value {
        match self {
            Node::Map(map) => map.to_plain_with(sets_as_lists),
            Node::List(list) => list.to_plain_with(sets_as_lists),
            Node::Set(set) => set.to_plain_with(sets_as_lists),
            Node::Scalar(scalar) => Value::Scalar(scalar.clone()),
        }
    }

    /// The kind of value this node wraps.
    pub fn kind(&self) -> ValueKind {
        match self {
            Node::Map(_) => ValueKind::Mapping,
            Node::List(_) => ValueKind::Sequence,
            Node::Set(_) => ValueKind::Set,
            Node::Scalar(_) => ValueKind::Scalar,
        }
    }

    /// The audit channel of the wrapped container. Scalars have none.
    pub fn channel(&self) -> Option<Channel> {
        match self {
            Node::Map(map) => Some(map.channel()),
            Node::List(list) => Some(list.channel()),
            Node::Set(set) => Some(set.channel()),
            Node::Scalar(_) => None,
        }
    }

    /// Borrow the logged mapping, if this node is one.
    pub fn as_map(&self) -> Option<&LoggedMap> {
        match self {
            Node::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Borrow the logged sequence, if this node is one.
    pub fn as_list(&self) -> Option<&LoggedList> {
        match self {
            Node::List(list) => Some(list),
            _ => None,
        }
    }

    /// Borrow the logged set, if this node is one.
    pub fn as_set(&self) -> Option<&LoggedSet> {
        match self {
            Node::Set(set) => Some(set),
            _ => None,
        }
    }

    /// Borrow the scalar, if this node is one.
    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Node::Scalar(scalar) => Some(scalar),
            _ => None,
        }
    }

    /// Rebuild this subtree with fresh identity, re-deriving every channel
    /// under `channel`. Used by deep copies.
    pub(crate) fn deep_clone(&self, channel: Channel) -> Node {
        match self {
            Node::Map(map) => Node::Map(map.deep_clone_as(channel)),
            Node::List(list) => Node::List(list.deep_clone_as(channel)),
            Node::Set(set) => Node::Set(set.deep_clone_as(channel)),
            Node::Scalar(scalar) => Node::Scalar(scalar.clone()),
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_plain())
    }
}

impl PartialEq<Value> for Node {
    fn eq(&self, other: &Value) -> bool {
        self.to_plain() == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;
    use proptest::prelude::*;
    use std::collections::BTreeSet;

    #[test]
    fn wrap_dispatches_on_kind() {
        let channel = Channel::root("cfg");
        assert!(matches!(
            Node::wrap(channel.clone(), Value::Map(IndexMap::new())),
            Node::Map(_)
        ));
        assert!(matches!(
            Node::wrap(channel.clone(), Value::List(vec![])),
            Node::List(_)
        ));
        assert!(matches!(
            Node::wrap(channel.clone(), Value::Set(BTreeSet::new())),
            Node::Set(_)
        ));
        assert!(matches!(
            Node::wrap(channel, Value::from(1)),
            Node::Scalar(Scalar::Int(1))
        ));
    }

    #[test]
    fn scalars_pass_through_unchanged() {
        let node = Node::wrap(Channel::root("cfg"), Value::from("plain"));
        assert_eq!(node.to_plain(), Value::from("plain"));
        assert!(node.channel().is_none());
    }

    #[test]
    fn nested_containers_are_wrapped_at_every_depth() {
        let data = Value::Map(IndexMap::from([(
            "outer".to_string(),
            Value::List(vec![Value::Map(IndexMap::from([(
                "inner".to_string(),
                Value::from(true),
            )]))]),
        )]));
        let node = Node::wrap(Channel::root("cfg"), data);

        let outer = node.as_map().unwrap().get("outer").unwrap();
        let list = outer.as_list().unwrap();
        assert_eq!(list.channel().as_str(), "cfg.outer");
        let inner = list.get(0).unwrap();
        let map = inner.as_map().unwrap();
        assert_eq!(map.channel().as_str(), "cfg.outer[...]");
    }

    #[test]
    fn flatten_renders_sets_as_lists_on_request() {
        let data = Value::Map(IndexMap::from([(
            "tags".to_string(),
            Value::Set(BTreeSet::from([Scalar::Int(2), Scalar::Int(1)])),
        )]));
        let node = Node::wrap(Channel::root("cfg"), data);

        let plain = node.to_plain_with(true);
        let expected = Value::Map(IndexMap::from([(
            "tags".to_string(),
            Value::List(vec![Value::from(1), Value::from(2)]),
        )]));
        assert_eq!(plain, expected);
    }

    #[test]
    fn nodes_compare_against_plain_values() {
        let node = Node::wrap(
            Channel::root("cfg"),
            Value::List(vec![Value::from(1), Value::from(2)]),
        );
        assert_eq!(node, Value::List(vec![Value::from(1), Value::from(2)]));
        assert_ne!(node, Value::List(vec![Value::from(2)]));
    }

    fn arb_value() -> impl Strategy<Value = Value> {
        let scalar = prop_oneof![
            Just(Value::null()),
            any::<bool>().prop_map(Value::from),
            any::<i64>().prop_map(Value::from),
            any::<f64>().prop_map(Value::from),
            "[a-z]{0,6}".prop_map(Value::from),
        ];
        let scalar_leaf = prop_oneof![
            Just(Scalar::Null),
            any::<bool>().prop_map(Scalar::from),
            any::<i64>().prop_map(Scalar::from),
            "[a-z]{0,6}".prop_map(|s| Scalar::Str(s)),
        ];
        let set = prop::collection::btree_set(scalar_leaf, 0..4).prop_map(Value::Set);
        prop_oneof![scalar, set].prop_recursive(3, 24, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(Value::List),
                prop::collection::vec(("[a-z]{1,4}", inner), 0..4)
                    .prop_map(|pairs| Value::Map(pairs.into_iter().collect())),
            ]
        })
    }

    proptest! {
        // Round-trip: wrapping then flattening recovers the plain tree.
        #[test]
        fn wrap_then_flatten_roundtrips(value in arb_value()) {
            let node = Node::wrap(Channel::root("cfg"), value.clone());
            prop_assert_eq!(node.to_plain(), value);
        }
    }
}
