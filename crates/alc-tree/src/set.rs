//! The logged set container.

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::fmt;
use std::rc::Rc;

use tracing::info;

use alc_types::{Channel, Scalar, Value};

use crate::error::{Result, TreeError};
use crate::node::Node;

/// A unique-element configuration container that logs every mutation.
///
/// Set elements must be hashable, so only scalars can enter; attempting to
/// add a container-shaped value errs [`TreeError::NotHashable`]. Elements
/// are kept in a `BTreeSet` for deterministic iteration, though callers
/// should treat the collection as unordered.
///
/// Bulk operations validate every inbound element before touching state, so
/// a failing call never leaves the set partially mutated.
#[derive(Clone)]
pub struct LoggedSet {
    inner: Rc<RefCell<SetInner>>,
}

struct SetInner {
    channel: Channel,
    items: BTreeSet<Scalar>,
}

impl LoggedSet {
    /// Construct from a name and plain elements. Construction itself is not
    /// audited.
    pub fn new(name: impl Into<Channel>, items: BTreeSet<Scalar>) -> Self {
        Self::from_items(name.into(), items)
    }

    // Scalars wrap to themselves, so element wrapping under `name[...]` is
    // the identity here.
    pub(crate) fn from_items(channel: Channel, items: BTreeSet<Scalar>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(SetInner { channel, items })),
        }
    }

    /// The audit channel (dotted path) of this container.
    pub fn channel(&self) -> Channel {
        self.inner.borrow().channel.clone()
    }

    fn require_scalar(value: Value) -> Result<Scalar> {
        value
            .into_scalar()
            .map_err(|value| TreeError::NotHashable { kind: value.kind() })
    }

    /// Insert `value`. Errs [`TreeError::NotHashable`] for container-shaped
    /// values; the record is emitted first, so the attempt is still audited.
    pub fn add(&self, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        let mut inner = self.inner.borrow_mut();
        info!(
            channel = %inner.channel,
            "Configuration \"{}\": adding {}", inner.channel, value
        );
        let scalar = Self::require_scalar(value)?;
        inner.items.insert(scalar);
        Ok(())
    }

    /// Insert every value in `values`. One audit record covers the batch;
    /// all elements are validated before any is inserted.
    pub fn update<I, T>(&self, values: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        let mut inner = self.inner.borrow_mut();
        let rendered = Value::List(values.clone());
        info!(
            channel = %inner.channel,
            "Configuration \"{}\": updating with {}", inner.channel, rendered
        );
        let scalars = values
            .into_iter()
            .map(Self::require_scalar)
            .collect::<Result<Vec<_>>>()?;
        inner.items.extend(scalars);
        Ok(())
    }

    /// Remove every value in `values` that is present.
    pub fn difference_update<I, T>(&self, values: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        let mut inner = self.inner.borrow_mut();
        let rendered = Value::List(values.clone());
        info!(
            channel = %inner.channel,
            "Configuration \"{}\": difference-update with {}",
            inner.channel,
            rendered
        );
        let scalars = values
            .into_iter()
            .map(Self::require_scalar)
            .collect::<Result<BTreeSet<_>>>()?;
        for scalar in &scalars {
            inner.items.remove(scalar);
        }
        Ok(())
    }

    /// Toggle membership for every distinct value in `values`: present
    /// elements are removed, absent ones inserted.
    pub fn symmetric_difference_update<I, T>(&self, values: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        let mut inner = self.inner.borrow_mut();
        let rendered = Value::List(values.clone());
        info!(
            channel = %inner.channel,
            "Configuration \"{}\": symmetric-difference-update with {}",
            inner.channel,
            rendered
        );
        let scalars = values
            .into_iter()
            .map(Self::require_scalar)
            .collect::<Result<BTreeSet<_>>>()?;
        for scalar in scalars {
            if !inner.items.remove(&scalar) {
                inner.items.insert(scalar);
            }
        }
        Ok(())
    }

    /// Remove `value` if present; never fails.
    pub fn discard(&self, value: &Value) {
        let mut inner = self.inner.borrow_mut();
        info!(
            channel = %inner.channel,
            "Configuration \"{}\": discarding {} (if present)", inner.channel, value
        );
        if let Some(scalar) = value.as_scalar() {
            inner.items.remove(scalar);
        }
    }

    /// Remove `value`. Errs [`TreeError::NotHashable`] for container-shaped
    /// values and [`TreeError::ValueNotFound`] when absent.
    pub fn remove(&self, value: &Value) -> Result<()> {
        let mut inner = self.inner.borrow_mut();
        info!(
            channel = %inner.channel,
            "Configuration \"{}\": removing {}", inner.channel, value
        );
        let Some(scalar) = value.as_scalar() else {
            return Err(TreeError::NotHashable { kind: value.kind() });
        };
        if inner.items.remove(scalar) {
            Ok(())
        } else {
            Err(TreeError::ValueNotFound {
                value: value.to_string(),
            })
        }
    }

    /// Remove and return an arbitrary element. Errs
    /// [`TreeError::CollectionEmpty`] on an empty set.
    pub fn pop(&self) -> Result<Scalar> {
        let mut inner = self.inner.borrow_mut();
        info!(
            channel = %inner.channel,
            "Configuration \"{}\": popping", inner.channel
        );
        inner.items.pop_first().ok_or(TreeError::CollectionEmpty)
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

    /// Membership test; read-only, not audited. Container-shaped values are
    /// never members.
    pub fn contains(&self, value: &Value) -> bool {
        value
            .as_scalar()
            .is_some_and(|scalar| self.inner.borrow().items.contains(scalar))
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.inner.borrow().items.len()
    }

    /// Returns `true` if the set holds no elements.
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().items.is_empty()
    }

    /// The elements, in iteration order.
    pub fn items(&self) -> Vec<Scalar> {
        self.inner.borrow().items.iter().cloned().collect()
    }

    /// Copy under the name `<name>(copy)`. Set elements are scalars, so the
    /// copy shares nothing with the original.
    pub fn copy(&self) -> LoggedSet {
        let inner = self.inner.borrow();
        LoggedSet {
            inner: Rc::new(RefCell::new(SetInner {
                channel: inner.channel.copied(),
                items: inner.items.clone(),
            })),
        }
    }

    /// Deep copy; identical to [`copy`](LoggedSet::copy) apart from the
    /// shared method surface, since elements are always scalars.
    pub fn deep_copy(&self) -> LoggedSet {
        self.copy()
    }

    pub(crate) fn deep_clone_as(&self, channel: Channel) -> LoggedSet {
        let inner = self.inner.borrow();
        LoggedSet {
            inner: Rc::new(RefCell::new(SetInner {
                channel,
                items: inner.items.clone(),
            })),
        }
    }

    /// Flatten back to a plain set.
    pub fn to_plain(&self) -> Value {
        self.to_plain_with(false)
    }

    /// Flatten; renders the elements as a plain sequence when
    /// `sets_as_lists` is set.
    pub fn to_plain_with(&self, sets_as_lists: bool) -> Value {
        let inner = self.inner.borrow();
        if sets_as_lists {
            Value::List(
                inner
                    .items
                    .iter()
                    .map(|scalar| Value::Scalar(scalar.clone()))
                    .collect(),
            )
        } else {
            Value::Set(inner.items.clone())
        }
    }
}

impl fmt::Debug for LoggedSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("LoggedSet")
            .field("channel", &inner.channel)
            .field("items", &inner.items)
            .finish()
    }
}
