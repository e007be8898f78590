use lasso::{Spur, ThreadedRodeo};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;
use std::sync::atomic::{AtomicU64, Ordering};

/// Global string interner for node/edge IDs — fast comparisons, low memory.
static INTERNER: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);

/// Counter backing `fresh` id generation.
static COUNTER: AtomicU64 = AtomicU64::new(0);

fn fresh_key(prefix: &str) -> Spur {
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    INTERNER.get_or_intern(format!("{prefix}_{n}"))
}

/// A lightweight, interned identifier for nodes on the canvas.
/// Internally a `Spur` index — 4 bytes, Copy, Eq, Hash in O(1).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(Spur);

impl NodeId {
    /// Intern a string as a NodeId, or return the existing id if already interned.
    pub fn intern(s: &str) -> Self {
        NodeId(INTERNER.get_or_intern(s))
    }

    /// Resolve back to a string slice.
    pub fn as_str(&self) -> &'static str {
        INTERNER.resolve(&self.0)
    }

    /// Generate a unique id with a kind prefix (e.g. `node_1`, `group_2`).
    pub fn fresh(prefix: &str) -> Self {
        NodeId(fresh_key(prefix))
    }
}

/// An interned identifier for edges. Kept as a distinct type so node and
/// edge ids can never be confused at a call site.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct EdgeId(Spur);

impl EdgeId {
    pub fn intern(s: &str) -> Self {
        EdgeId(INTERNER.get_or_intern(s))
    }

    pub fn as_str(&self) -> &'static str {
        INTERNER.resolve(&self.0)
    }

    /// Generate a unique `edge_N` id.
    pub fn fresh() -> Self {
        EdgeId(fresh_key("edge"))
    }
}

macro_rules! id_impls {
    ($ty:ident) => {
        impl fmt::Debug for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "@{}", self.as_str())
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "@{}", self.as_str())
            }
        }

        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                Ok($ty::intern(&s))
            }
        }
    };
}

id_impls!(NodeId);
id_impls!(EdgeId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_roundtrip() {
        let a = NodeId::intern("markdown_card");
        let b = NodeId::intern("markdown_card");
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "markdown_card");
    }

    #[test]
    fn fresh_ids_are_unique() {
        let a = NodeId::fresh("node");
        let b = NodeId::fresh("node");
        assert_ne!(a, b);

        let e = EdgeId::fresh();
        let f = EdgeId::fresh();
        assert_ne!(e, f);
    }

    #[test]
    fn node_and_edge_ids_share_the_interner() {
        // Same string, distinct types — still resolves consistently.
        let n = NodeId::intern("shared");
        let e = EdgeId::intern("shared");
        assert_eq!(n.as_str(), e.as_str());
    }
}
