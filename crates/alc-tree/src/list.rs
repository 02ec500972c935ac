//! The logged sequence container.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use tracing::info;

use alc_types::{Channel, Value};

use crate::error::{Result, TreeError};
use crate::node::Node;

/// An ordered configuration container that logs every mutation.
///
/// Elements share the synthetic child channel `name[...]`, since sequence
/// positions are not stable identifiers. Mutating operations emit one
/// informational record each, then delegate; operations that introduce new
/// values wrap them first, keeping nested containers logged at every depth.
///
/// Like [`LoggedMap`](crate::LoggedMap), this is a cheap handle; cloning
/// aliases the same node.
#[derive(Clone)]
pub struct LoggedList {
    inner: Rc<RefCell<ListInner>>,
}

struct ListInner {
    channel: Channel,
    items: Vec<Node>,
}

impl LoggedList {
    /// Construct from a name and plain elements, wrapping each under
    /// `name[...]`. Construction itself is not audited.
    pub fn new(name: impl Into<Channel>, items: Vec<Value>) -> Self {
        Self::from_items(name.into(), items)
    }

    pub(crate) fn from_items(channel: Channel, items: Vec<Value>) -> Self {
        let element = channel.element();
        let items = items
            .into_iter()
            .map(|value| Node::wrap(element.clone(), value))
            .collect();
        Self {
            inner: Rc::new(RefCell::new(ListInner { channel, items })),
        }
    }

    /// The audit channel (dotted path) of this container.
    pub fn channel(&self) -> Channel {
        self.inner.borrow().channel.clone()
    }

    /// Append `value` to the end of the sequence.
    pub fn append(&self, value: impl Into<Value>) {
        let value = value.into();
        let mut inner = self.inner.borrow_mut();
        info!(
            channel = %inner.channel,
            "Configuration \"{}\": appending {}", inner.channel, value
        );
        let node = Node::wrap(inner.channel.element(), value);
        inner.items.push(node);
    }

    /// Insert `value` at `index`. An index past the end clamps to the end,
    /// matching the underlying ordered-collection semantics.
    pub fn insert(&self, index: usize, value: impl Into<Value>) {
        let value = value.into();
        let mut inner = self.inner.borrow_mut();
        info!(
            channel = %inner.channel,
            "Configuration \"{}\": inserting {} at index {}", inner.channel, value, index
        );
        let node = Node::wrap(inner.channel.element(), value);
        let index = index.min(inner.items.len());
        inner.items.insert(index, node);
    }

    /// Remove the first element whose flattened shape equals `value`. Errs
    /// [`TreeError::ValueNotFound`] when no element matches; the record is
    /// emitted first, so the attempt is still audited.
    pub fn remove(&self, value: &Value) -> Result<()> {
        let mut inner = self.inner.borrow_mut();
        info!(
            channel = %inner.channel,
            "Configuration \"{}\": removing {}", inner.channel, value
        );
        match inner.items.iter().position(|node| node == value) {
            Some(index) => {
                inner.items.remove(index);
                Ok(())
            }
            None => Err(TreeError::ValueNotFound {
                value: value.to_string(),
            }),
        }
    }

    /// Remove and return the element at `index`. Errs
    /// [`TreeError::IndexOutOfRange`] when `index >= len`.
    pub fn pop(&self, index: usize) -> Result<Node> {
        let mut inner = self.inner.borrow_mut();
        info!(
            channel = %inner.channel,
            "Configuration \"{}\": popping from index {}", inner.channel, index
        );
        let len = inner.items.len();
        if index >= len {
            return Err(TreeError::IndexOutOfRange { index, len });
        }
        Ok(inner.items.remove(index))
    }

    /// Remove every element.
    pub fn clear(&self) {
        let mut inner = self.inner.borrow_mut();
        info!(
            channel = %inner.channel,
            "Configuration \"{}\": clearing all values", inner.channel
        );
        inner.items.clear();
    }

    /// Append every value in `values`, wrapping each. One audit record
    /// covers the whole batch.
    pub fn extend<I, T>(&self, values: I)
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        let mut inner = self.inner.borrow_mut();
        let rendered = Value::List(values.clone());
        info!(
            channel = %inner.channel,
            "Configuration \"{}\": extending with {}", inner.channel, rendered
        );
        let element = inner.channel.element();
        inner
            .items
            .extend(values.into_iter().map(|value| Node::wrap(element.clone(), value)));
    }

    /// The element at `index`, if any; read-only, not audited.
    pub fn get(&self, index: usize) -> Option<Node> {
        self.inner.borrow().items.get(index).cloned()
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.inner.borrow().items.len()
    }

    /// Returns `true` if the sequence holds no elements.
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().items.is_empty()
    }

    /// Element handles in order. Handles point into the live tree.
    pub fn items(&self) -> Vec<Node> {
        self.inner.borrow().items.clone()
    }

    /// Shallow copy: a new container named `<name>(copy)` sharing element
    /// nodes with the original. See [`LoggedMap::copy`](crate::LoggedMap::copy)
    /// for the aliasing contract.
    pub fn copy(&self) -> LoggedList {
        let inner = self.inner.borrow();
        LoggedList {
            inner: Rc::new(RefCell::new(ListInner {
                channel: inner.channel.copied(),
                items: inner.items.clone(),
            })),
        }
    }

    /// Deep copy: a fully independent sequence named `<name>(copy)`, with
    /// element channels re-derived under the new name.
    pub fn deep_copy(&self) -> LoggedList {
        let channel = self.inner.borrow().channel.copied();
        self.deep_clone_as(channel)
    }

    pub(crate) fn deep_clone_as(&self, channel: Channel) -> LoggedList {
        let inner = self.inner.borrow();
        let element = channel.element();
        let items = inner
            .items
            .iter()
            .map(|node| node.deep_clone(element.clone()))
            .collect();
        LoggedList {
            inner: Rc::new(RefCell::new(ListInner { channel, items })),
        }
    }

    /// Flatten back to a plain sequence.
    pub fn to_plain(&self) -> Value {
        self.to_plain_with(false)
    }

    /// Flatten, rendering nested sets as sequences when `sets_as_lists` is
    /// set.
    pub fn to_plain_with(&self, sets_as_lists: bool) -> Value {
        let inner = self.inner.borrow();
        Value::List(
            inner
                .items
                .iter()
                .map(|node| node.to_plain_with(sets_as_lists))
                .collect(),
        )
    }
}

impl fmt::Debug for LoggedList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("LoggedList")
            .field("channel", &inner.channel)
            .field("items", &inner.items)
            .finish()
    }
}
