//! Node contract and capability traits

use super::port::PortSet;
use crate::render::RenderTarget;
use serde::{Deserialize, Serialize};

/// Per-tick context handed through by the external scheduler. Opaque to the
/// core model; nodes may read the frame counter but nothing in this crate
/// interprets it.
#[derive(Debug, Clone, Copy, Default)]
pub struct Context {
    pub frame: u64,
}

/// Opaque custom-editor handle for node state outside the typed-port model.
/// The core never interprets the contents; it is inert data handed to the
/// display layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomEditor {
    pub editor_kind: String,
    pub state: String,
}

impl CustomEditor {
    pub fn text(state: impl Into<String>) -> Self {
        Self {
            editor_kind: "text".to_string(),
            state: state.into(),
        }
    }
}

/// A named computation/drawing unit owning an ordered set of ports.
///
/// An external scheduler invokes [`Node::execute`] once per tick in an order
/// it determines; drawing-capable nodes are then drawn through the
/// [`Drawable`] capability. Nodes must not block, spawn threads, or perform
/// blocking I/O inside the tick operations.
pub trait Node {
    fn name(&self) -> &str;

    fn ports(&self) -> &PortSet;

    fn ports_mut(&mut self) -> &mut PortSet;

    /// Per-tick computation: reads input ports, writes output ports.
    ///
    /// Must be safe to call with unconnected inputs at their defaults, and
    /// must be total: internal failures are absorbed and outputs forced to a
    /// neutral value. Nothing may propagate past the node boundary; the
    /// scheduler always observes a completed tick.
    fn execute(&mut self, _ctx: &mut Context, _time: f32) {}

    /// Drawing capability query; drawing-capable nodes return themselves
    fn as_drawable(&mut self) -> Option<&mut dyn Drawable> {
        None
    }

    /// Optional handle for state not representable as typed ports
    fn create_custom_editor(&self) -> Option<CustomEditor> {
        None
    }

    /// Keys for non-port state serialized as named string key/value pairs
    fn custom_keys(&self) -> Vec<String> {
        Vec::new()
    }

    fn serialize_custom_value(&self, _key: &str) -> Option<String> {
        None
    }

    /// Unknown keys are a no-op, not an error
    fn deserialize_custom_value(&mut self, _key: &str, _value: &str) {}
}

/// Drawing capability.
///
/// Invoked after `execute` (if any) for the same tick. Implementations must
/// wrap every style change in a push/pop pair; leaked style state corrupts
/// all subsequently drawn nodes in the same tick, so this is a hard contract.
pub trait Drawable {
    fn draw(&mut self, target: &mut dyn RenderTarget, ctx: &mut Context, time: f32);
}
