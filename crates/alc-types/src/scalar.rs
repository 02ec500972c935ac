use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// A non-container primitive value.
///
/// Scalars are stored and returned unwrapped by the logged containers; they
/// are never audited individually. They are also the only values allowed
/// inside a set, so `Scalar` carries lawful `Eq`, `Hash`, and `Ord`
/// implementations: floats compare by `total_cmp` and hash by bit pattern.
/// The practical consequence is that `NaN == NaN` holds here, while
/// `Int(5)` and `Float(5.0)` remain distinct values.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl Scalar {
    /// Returns `true` if this is the null scalar.
    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }

    /// The string contents, if this is a string scalar.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Variant rank used for cross-kind ordering.
    fn rank(&self) -> u8 {
        match self {
            Scalar::Null => 0,
            Scalar::Bool(_) => 1,
            Scalar::Int(_) => 2,
            Scalar::Float(_) => 3,
            Scalar::Str(_) => 4,
        }
    }
}

impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Scalar::Null, Scalar::Null) => true,
            (Scalar::Bool(a), Scalar::Bool(b)) => a == b,
            (Scalar::Int(a), Scalar::Int(b)) => a == b,
            (Scalar::Float(a), Scalar::Float(b)) => a.to_bits() == b.to_bits(),
            (Scalar::Str(a), Scalar::Str(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Scalar {}

impl Hash for Scalar {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        match self {
            Scalar::Null => {}
            Scalar::Bool(b) => b.hash(state),
            Scalar::Int(i) => i.hash(state),
            Scalar::Float(f) => f.to_bits().hash(state),
            Scalar::Str(s) => s.hash(state),
        }
    }
}

impl Ord for Scalar {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Scalar::Null, Scalar::Null) => Ordering::Equal,
            (Scalar::Bool(a), Scalar::Bool(b)) => a.cmp(b),
            (Scalar::Int(a), Scalar::Int(b)) => a.cmp(b),
            (Scalar::Float(a), Scalar::Float(b)) => a.total_cmp(b),
            (Scalar::Str(a), Scalar::Str(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for Scalar {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => write!(f, "null"),
            Scalar::Bool(b) => write!(f, "{b}"),
            Scalar::Int(i) => write!(f, "{i}"),
            Scalar::Float(x) => write!(f, "{x}"),
            Scalar::Str(s) => write!(f, "{s:?}"),
        }
    }
}

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Scalar::Bool(b)
    }
}

impl From<i64> for Scalar {
    fn from(i: i64) -> Self {
        Scalar::Int(i)
    }
}

impl From<i32> for Scalar {
    fn from(i: i32) -> Self {
        Scalar::Int(i64::from(i))
    }
}

impl From<f64> for Scalar {
    fn from(x: f64) -> Self {
        Scalar::Float(x)
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Str(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::Str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn nan_equals_itself() {
        let a = Scalar::Float(f64::NAN);
        let b = Scalar::Float(f64::NAN);
        assert_eq!(a, b);
    }

    #[test]
    fn int_and_float_are_distinct() {
        assert_ne!(Scalar::Int(5), Scalar::Float(5.0));
    }

    #[test]
    fn floats_order_totally() {
        let mut set = BTreeSet::new();
        set.insert(Scalar::Float(2.5));
        set.insert(Scalar::Float(-1.0));
        set.insert(Scalar::Float(f64::NAN));
        assert_eq!(set.len(), 3);
        assert!(set.contains(&Scalar::Float(2.5)));
    }

    #[test]
    fn mixed_kinds_coexist_in_a_set() {
        let mut set = BTreeSet::new();
        set.insert(Scalar::Null);
        set.insert(Scalar::Bool(true));
        set.insert(Scalar::Int(1));
        set.insert(Scalar::Str("one".into()));
        assert_eq!(set.len(), 4);
    }

    #[test]
    fn display_quotes_strings_only() {
        assert_eq!(Scalar::Str("a".into()).to_string(), "\"a\"");
        assert_eq!(Scalar::Int(42).to_string(), "42");
        assert_eq!(Scalar::Null.to_string(), "null");
        assert_eq!(Scalar::Bool(false).to_string(), "false");
    }

    #[test]
    fn serde_untagged_roundtrip() {
        for scalar in [
            Scalar::Null,
            Scalar::Bool(true),
            Scalar::Int(-7),
            Scalar::Float(2.5),
            Scalar::Str("text".into()),
        ] {
            let json = serde_json::to_string(&scalar).unwrap();
            let parsed: Scalar = serde_json::from_str(&json).unwrap();
            assert_eq!(scalar, parsed);
        }
    }
}
