//! NC (NodeCanvas) interaction layer: normalized input events, the
//! pointer-driven state machine, gesture detection, and the clipboard.

pub mod clipboard;
pub mod commands;
pub mod gesture;
pub mod input;
pub mod interaction;

pub use clipboard::ClipboardManager;
pub use commands::DeferredQueue;
pub use gesture::ShakeDetector;
pub use input::{InputEvent, Modifiers, PointerButton};
pub use interaction::{CanvasEngine, CutMode, InteractionState, Selection};
