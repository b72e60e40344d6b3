//! Generic hierarchical tree view: a retained element surface, per-node
//! renderers, and the engine that owns expand/selection state.

pub mod engine;
pub mod outline;
pub mod renderer;
pub mod surface;

pub use engine::{TreeCallbacks, TreeEngine, TreeEngineBuilder, VisibleRow};
pub use renderer::{NodeEvent, NodeRenderer, Region, RenderCx, RendererConfig};
pub use surface::{Action, ComponentId, ElementId, EventKind, Modifiers, PointerEvent, Surface};
