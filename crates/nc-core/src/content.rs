//! Collaborator contract for node content renderers.
//!
//! Concrete renderers (markdown, image sequences, viewports, panels) live
//! outside the engine. They receive the node read-only — geometry and
//! identity stay model-owned.

use crate::model::Node;
use std::collections::HashMap;

/// A content renderer for one node kind.
pub trait NodeContent {
    /// The renderer name matched against `NodeKind::Card { renderer }`.
    fn kind(&self) -> &'static str;

    /// Refresh the visual representation from the node's current state.
    fn update(&mut self, node: &Node);

    /// Serialize the content payload for persistence, if supported.
    fn serialize(&self) -> Option<String> {
        None
    }

    /// Restore the content payload from a persisted string.
    fn deserialize(&mut self, _data: &str) {}
}

type ContentFactory = Box<dyn Fn() -> Box<dyn NodeContent>>;

/// Maps renderer names to factories. The host registers its renderers once
/// and instantiates one per content-bearing node.
#[derive(Default)]
pub struct ContentRegistry {
    factories: HashMap<String, ContentFactory>,
}

impl ContentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, kind: &str, factory: impl Fn() -> Box<dyn NodeContent> + 'static) {
        self.factories.insert(kind.to_string(), Box::new(factory));
    }

    pub fn instantiate(&self, kind: &str) -> Option<Box<dyn NodeContent>> {
        self.factories.get(kind).map(|f| f())
    }

    pub fn supports(&self, kind: &str) -> bool {
        self.factories.contains_key(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NodeKind;

    struct Probe {
        updates: usize,
        data: Option<String>,
    }

    impl NodeContent for Probe {
        fn kind(&self) -> &'static str {
            "probe"
        }
        fn update(&mut self, _node: &Node) {
            self.updates += 1;
        }
        fn serialize(&self) -> Option<String> {
            self.data.clone()
        }
        fn deserialize(&mut self, data: &str) {
            self.data = Some(data.to_string());
        }
    }

    #[test]
    fn registry_instantiates_by_kind() {
        let mut registry = ContentRegistry::new();
        registry.register("probe", || {
            Box::new(Probe {
                updates: 0,
                data: None,
            })
        });

        assert!(registry.supports("probe"));
        assert!(!registry.supports("markdown"));

        let mut content = registry.instantiate("probe").unwrap();
        let node = Node::new(NodeKind::card("probe"), 0.0, 0.0, 100.0, 60.0);
        content.update(&node);
        content.deserialize("payload");
        assert_eq!(content.serialize().as_deref(), Some("payload"));
    }
}
