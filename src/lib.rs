//! Nodecanvas core library
//!
//! A typed port/node dataflow runtime. Nodes own ordered, typed ports; an
//! external scheduler ticks them once per time step; drawing-capable nodes
//! additionally render into a canvas through the [`render::RenderTarget`]
//! boundary. Formula-driven nodes derive their own input ports live from the
//! expression text, preserving port identity and values across edits.
//!
//! The editor UI, the rendering backend, and the graph-level scheduler are
//! external collaborators; this crate defines the model they talk to.

pub mod expr;
pub mod nodes;
pub mod render;

// Re-export commonly used types
pub use nodes::{
    list_ports, set_port_value, Color, Connection, Context, CustomEditor, DisplayLink,
    DisplaySink, Drawable, Node, Port, PortKind, PortSet, PortSnapshot, PortValue, RefreshConfig,
};
pub use render::RenderTarget;
