//! Outbound change notifications.
//!
//! The engine is single-threaded and event-driven: model operations push
//! `GraphEvent`s onto a queue that the host drains after each input event
//! and forwards over whatever synchronous pub/sub transport it owns.

use crate::id::{EdgeId, NodeId};
use crate::model::HandleSide;

/// A change notification published by the model or the interaction layer.
#[derive(Debug, Clone, PartialEq)]
pub enum GraphEvent {
    NodeCreated { id: NodeId },
    NodeUpdated { id: NodeId },
    NodeDeleted { id: NodeId },
    NodeMoved { id: NodeId, x: f32, y: f32 },
    NodeResized { id: NodeId, width: f32, height: f32 },

    EdgeCreated { id: EdgeId },
    EdgeUpdated { id: EdgeId },
    EdgeDeleted { id: EdgeId },
    EdgeSelected { id: EdgeId },

    /// A drawn edge was dropped on empty canvas. The host may offer a
    /// "create node here and connect" flow; the gesture itself cancels.
    EdgeDroppedOnEmpty {
        from: NodeId,
        handle: HandleSide,
        x: f32,
        y: f32,
    },

    SelectionChanged {
        nodes: Vec<NodeId>,
        edges: Vec<EdgeId>,
    },

    /// Clipboard contents changed; carries the copied node count.
    ClipboardChanged { nodes: usize },

    /// A canvas setting was updated by the host.
    SettingUpdated { key: &'static str },
}
