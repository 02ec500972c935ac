//! The logged mapping container.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use tracing::info;

use alc_types::{Channel, Value};

use crate::error::{Result, TreeError};
use crate::node::Node;

/// A keyed configuration container that logs every mutation.
///
/// Values are wrapped on the way in, so every mapping-, sequence-, or
/// set-shaped entry is itself a logged container, recursively. Lookups,
/// membership tests, and iteration are read-only and never audited; `set`
/// and `remove` emit exactly one informational record each.
///
/// `LoggedMap` is a cheap handle: cloning it aliases the same underlying
/// node. [`copy`](LoggedMap::copy) and [`deep_copy`](LoggedMap::deep_copy)
/// create new logical identities instead, renamed to `<name>(copy)`.
///
/// Single-threaded by design; callers needing thread safety supply external
/// synchronization.
#[derive(Clone)]
pub struct LoggedMap {
    inner: Rc<RefCell<MapInner>>,
}

struct MapInner {
    channel: Channel,
    entries: IndexMap<String, Node>,
}

impl LoggedMap {
    /// Construct from a name and plain entries.
    ///
    /// Every value is wrapped under the child channel `name.key`.
    /// Construction itself is not audited.
    pub fn new(name: impl Into<Channel>, entries: IndexMap<String, Value>) -> Self {
        Self::from_entries(name.into(), entries)
    }

    pub(crate) fn from_entries(channel: Channel, entries: IndexMap<String, Value>) -> Self {
        let entries = entries
            .into_iter()
            .map(|(key, value)| {
                let node = Node::wrap(channel.key(&key), value);
                (key, node)
            })
            .collect();
        Self {
            inner: Rc::new(RefCell::new(MapInner { channel, entries })),
        }
    }

    /// The audit channel (dotted path) of this container.
    pub fn channel(&self) -> Channel {
        self.inner.borrow().channel.clone()
    }

    /// One lookup backs both call forms; only the error shape differs.
    fn lookup(&self, key: &str) -> Option<Node> {
        self.inner.borrow().entries.get(key).cloned()
    }

    /// Key lookup. Errs [`TreeError::KeyNotFound`] when absent.
    pub fn get(&self, key: &str) -> Result<Node> {
        self.lookup(key).ok_or_else(|| TreeError::KeyNotFound {
            key: key.to_string(),
        })
    }

    /// Attribute-style lookup over the same store as [`get`](LoggedMap::get).
    /// Errs [`TreeError::AttributeNotFound`] when absent.
    pub fn attr(&self, attr: &str) -> Result<Node> {
        self.lookup(attr).ok_or_else(|| TreeError::AttributeNotFound {
            attr: attr.to_string(),
        })
    }

    /// Store `value` under `key`, wrapping containers under `name.key`.
    ///
    /// Emits one audit record per call, even when the stored value is
    /// unchanged.
    pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        let mut inner = self.inner.borrow_mut();
        info!(
            channel = %inner.channel,
            "Configuration \"{}\": setting {:?} to {}", inner.channel, key, value
        );
        let node = Node::wrap(inner.channel.key(&key), value);
        inner.entries.insert(key, node);
    }

    /// Remove the entry under `key`. Errs [`TreeError::KeyNotFound`] when
    /// absent; the removal record is emitted first, so a failed removal
    /// still leaves an audit trace of the attempt.
    pub fn remove(&self, key: &str) -> Result<()> {
        let mut inner = self.inner.borrow_mut();
        info!(
            channel = %inner.channel,
            "Configuration \"{}\": removing {:?}", inner.channel, key
        );
        inner
            .entries
            .shift_remove(key)
            .map(|_| ())
            .ok_or_else(|| TreeError::KeyNotFound {
                key: key.to_string(),
            })
    }

    /// Membership test; read-only, not audited.
    pub fn contains_key(&self, key: &str) -> bool {
        self.inner.borrow().entries.contains_key(key)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    /// Returns `true` if the mapping holds no entries.
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().entries.is_empty()
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> Vec<String> {
        self.inner.borrow().entries.keys().cloned().collect()
    }

    /// `(key, value)` pairs in insertion order. The nodes are handles into
    /// the live tree, not snapshots.
    pub fn entries(&self) -> Vec<(String, Node)> {
        self.inner
            .borrow()
            .entries
            .iter()
            .map(|(key, node)| (key.clone(), node.clone()))
            .collect()
    }

    /// Shallow copy: a new container named `<name>(copy)` sharing child
    /// nodes with the original.
    ///
    /// Shared children keep their original channels, and a mutation through
    /// either view is visible through the other.
    pub fn copy(&self) -> LoggedMap {
        let inner = self.inner.borrow();
        LoggedMap {
            inner: Rc::new(RefCell::new(MapInner {
                channel: inner.channel.copied(),
                entries: inner.entries.clone(),
            })),
        }
    }

    /// Deep copy: a fully independent tree named `<name>(copy)`, with every
    /// child channel re-derived under the new name.
    pub fn deep_copy(&self) -> LoggedMap {
        let channel = self.inner.borrow().channel.copied();
        self.deep_clone_as(channel)
    }

    pub(crate) fn deep_clone_as(&self, channel: Channel) -> LoggedMap {
        let inner = self.inner.borrow();
        let entries = inner
            .entries
            .iter()
            .map(|(key, node)| (key.clone(), node.deep_clone(channel.key(key))))
            .collect();
        LoggedMap {
            inner: Rc::new(RefCell::new(MapInner { channel, entries })),
        }
    }

    /// Flatten the whole tree back to plain values.
    pub fn to_plain(&self) -> Value {
        self.to_plain_with(false)
    }

    /// Flatten, rendering sets as sequences when `sets_as_lists` is set.
    pub fn to_plain_with(&self, sets_as_lists: bool) -> Value {
        let inner = self.inner.borrow();
        Value::Map(
            inner
                .entries
                .iter()
                .map(|(key, node)| (key.clone(), node.to_plain_with(sets_as_lists)))
                .collect(),
        )
    }
}

impl fmt::Debug for LoggedMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("LoggedMap")
            .field("channel", &inner.channel)
            .field("entries", &inner.entries)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::Capture;
    use crate::node::Node;
    use tracing::Level;

    fn sample() -> LoggedMap {
        LoggedMap::new(
            "app",
            IndexMap::from([
                (
                    "servers".to_string(),
                    Value::List(vec![Value::from("a"), Value::from("b")]),
                ),
                (
                    "limits".to_string(),
                    Value::Map(IndexMap::from([("max".to_string(), Value::from(5))])),
                ),
            ]),
        )
    }

    #[test]
    fn construction_wraps_nested_containers() {
        let map = sample();
        let servers = map.get("servers").unwrap();
        assert!(matches!(servers, Node::List(_)));
        assert_eq!(servers.channel().unwrap().as_str(), "app.servers");

        let limits = map.get("limits").unwrap();
        assert_eq!(limits.channel().unwrap().as_str(), "app.limits");
    }

    #[test]
    fn construction_is_not_audited() {
        let capture = Capture::default();
        let _guard = capture.install();
        let _map = sample();
        assert_eq!(capture.len(), 0);
    }

    #[test]
    fn get_and_attr_agree_on_present_keys() {
        let map = sample();
        assert_eq!(
            map.get("limits").unwrap().to_plain(),
            map.attr("limits").unwrap().to_plain()
        );
    }

    #[test]
    fn absent_keys_err_by_call_form() {
        let map = sample();
        assert!(matches!(
            map.get("missing"),
            Err(TreeError::KeyNotFound { .. })
        ));
        assert!(matches!(
            map.attr("missing"),
            Err(TreeError::AttributeNotFound { .. })
        ));
    }

    #[test]
    fn set_emits_one_record_with_template() {
        let capture = Capture::default();
        let _guard = capture.install();
        let map = LoggedMap::new("app", IndexMap::new());
        map.set("port", 8080);

        let records = capture.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].level, Level::INFO);
        assert_eq!(records[0].channel, "app");
        assert_eq!(
            records[0].message,
            "Configuration \"app\": setting \"port\" to 8080"
        );
    }

    #[test]
    fn set_logs_even_when_value_is_unchanged() {
        let capture = Capture::default();
        let _guard = capture.install();
        let map = LoggedMap::new("app", IndexMap::new());
        map.set("port", 8080);
        map.set("port", 8080);
        assert_eq!(capture.len(), 2);
    }

    #[test]
    fn set_wraps_container_values() {
        let map = LoggedMap::new("app", IndexMap::new());
        map.set("limits", Value::Map(IndexMap::new()));
        let limits = map.get("limits").unwrap();
        assert_eq!(limits.channel().unwrap().as_str(), "app.limits");
    }

    #[test]
    fn remove_logs_then_fails_on_missing_key() {
        let capture = Capture::default();
        let _guard = capture.install();
        let map = LoggedMap::new("app", IndexMap::new());
        assert!(matches!(
            map.remove("ghost"),
            Err(TreeError::KeyNotFound { .. })
        ));
        assert_eq!(capture.len(), 1);
        assert_eq!(
            capture.records()[0].message,
            "Configuration \"app\": removing \"ghost\""
        );
    }

    #[test]
    fn reads_are_not_audited() {
        let map = sample();
        let capture = Capture::default();
        let _guard = capture.install();
        let _ = map.get("servers");
        let _ = map.contains_key("limits");
        let _ = map.keys();
        let _ = map.len();
        let _ = map.to_plain();
        assert_eq!(capture.len(), 0);
    }

    #[test]
    fn keys_preserve_insertion_order() {
        let map = sample();
        map.set("zeta", 1);
        map.set("alpha", 2);
        assert_eq!(map.keys(), ["servers", "limits", "zeta", "alpha"]);
    }

    #[test]
    fn remove_preserves_order_of_survivors() {
        let map = sample();
        map.set("extra", 1);
        map.remove("limits").unwrap();
        assert_eq!(map.keys(), ["servers", "extra"]);
    }

    #[test]
    fn copy_renames_to_copy_suffix() {
        let map = sample();
        assert_eq!(map.copy().channel().as_str(), "app(copy)");
        assert_eq!(map.deep_copy().channel().as_str(), "app(copy)");
    }

    #[test]
    fn shallow_copy_aliases_children() {
        let map = sample();
        let copied = map.copy();

        let servers = copied.get("servers").unwrap();
        servers.as_list().unwrap().append("c");

        let original = map.get("servers").unwrap();
        assert_eq!(
            original.to_plain(),
            Value::List(vec![Value::from("a"), Value::from("b"), Value::from("c")])
        );
    }

    #[test]
    fn shallow_copy_children_keep_their_channels() {
        let map = sample();
        let copied = map.copy();
        let servers = copied.get("servers").unwrap();
        assert_eq!(servers.channel().unwrap().as_str(), "app.servers");
    }

    #[test]
    fn deep_copy_breaks_aliasing() {
        let map = sample();
        let copied = map.deep_copy();

        copied.get("servers").unwrap().as_list().unwrap().append("c");

        assert_eq!(
            map.get("servers").unwrap().to_plain(),
            Value::List(vec![Value::from("a"), Value::from("b")])
        );
        assert_eq!(copied.get("servers").unwrap().as_list().unwrap().len(), 3);
    }

    #[test]
    fn deep_copy_rederives_child_channels() {
        let map = sample();
        let copied = map.deep_copy();
        let servers = copied.get("servers").unwrap();
        assert_eq!(servers.channel().unwrap().as_str(), "app(copy).servers");
    }

    #[test]
    fn top_level_entries_are_independent_across_shallow_copies() {
        let map = sample();
        let copied = map.copy();
        copied.set("port", 8080);
        assert!(!map.contains_key("port"));
    }

    #[test]
    fn worked_example_from_append_to_flatten() {
        let capture = Capture::default();
        let _guard = capture.install();

        let map = sample();
        map.get("servers").unwrap().as_list().unwrap().append("c");

        let records = capture.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].channel, "app.servers");
        assert_eq!(
            records[0].message,
            "Configuration \"app.servers\": appending \"c\""
        );

        let expected = Value::Map(IndexMap::from([
            (
                "servers".to_string(),
                Value::List(vec![Value::from("a"), Value::from("b"), Value::from("c")]),
            ),
            (
                "limits".to_string(),
                Value::Map(IndexMap::from([("max".to_string(), Value::from(5))])),
            ),
        ]));
        assert_eq!(map.to_plain(), expected);
    }

    #[test]
    fn debug_shows_channel_and_contents() {
        let map = LoggedMap::new("app", IndexMap::from([("k".to_string(), Value::from(1))]));
        let rendered = format!("{map:?}");
        assert!(rendered.contains("app"));
        assert!(rendered.contains('k'));
    }
}
