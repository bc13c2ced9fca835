//! Node system - core port/value model and node implementations

// Core model modules
pub mod connection;
pub mod interface;
pub mod node;
pub mod port;
pub mod value;

// Node implementations
pub mod draw;
pub mod math;

// Re-export core types
pub use connection::{ConnectError, Connection};
pub use interface::{
    list_ports, set_port_value, DisplayLink, DisplaySink, PortSnapshot, RefreshConfig,
};
pub use node::{Context, CustomEditor, Drawable, Node};
pub use port::{Direction, Port, PortError, PortSet};
pub use value::{Color, PortKind, PortValue};
