//! NC (NodeCanvas) core: graph data model, view transform, events,
//! settings, and the content collaborator contract.

pub mod content;
pub mod error;
pub mod events;
pub mod id;
pub mod model;
pub mod settings;
pub mod view;

pub use error::GraphError;
pub use events::GraphEvent;
pub use id::{EdgeId, NodeId};
pub use model::{
    Color, Connections, Edge, GraphModel, HandleSide, Node, NodeKind, Point, Rect,
};
pub use settings::{CanvasSettings, HandleOffsets};
pub use view::ViewTransform;
