//! Display synchronization layer between nodes and an external display
//!
//! The display layer only ever talks to the model through this protocol:
//! atomic per-port snapshots out, guarded value edits in, plus a periodic
//! refresh that re-reads connected ports (whose values the tick loop keeps
//! changing) without ever overwriting unconnected, display-authored values.

use super::node::Node;
use super::port::{Direction, Port, PortError};
use super::value::{PortKind, PortValue};
use log::error;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Atomic per-port view handed to the display layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortSnapshot {
    pub name: String,
    pub kind: PortKind,
    pub direction: Direction,
    pub value: PortValue,
    pub connected: bool,
}

impl PortSnapshot {
    /// Takes an atomic snapshot of one port
    pub fn of(port: &Port) -> Self {
        let (value, connected) = port.state();
        Self {
            name: port.name().to_string(),
            kind: port.kind(),
            direction: port.direction(),
            value,
            connected,
        }
    }
}

/// Snapshots of all of a node's ports, in display order. Each snapshot is
/// taken atomically per port; the sequence as a whole is not a transaction.
pub fn list_ports(node: &dyn Node) -> Vec<PortSnapshot> {
    node.ports().iter().map(PortSnapshot::of).collect()
}

/// Applies a display-layer edit to the named port.
///
/// Only unconnected Input ports accept edits. A connected port or an Output
/// port is a silent no-op (the display layer may hold a stale disabled
/// state; that is an expected path, not an error). A kind-mismatched value
/// is rejected with no effect and logged loudly.
pub fn set_port_value(node: &dyn Node, name: &str, value: PortValue) {
    let Some(port) = node.ports().port(name) else {
        let err = PortError::UnknownPort(name.to_string());
        error!("rejected edit on node '{}': {}", node.name(), err);
        return;
    };
    if port.direction() == Direction::Output {
        return;
    }
    if let Err(err @ PortError::KindMismatch { .. }) = port.set(value) {
        error!("rejected edit on node '{}': {}", node.name(), err);
    }
}

/// Refresh configuration for the periodic display update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshConfig {
    pub interval_ms: u64,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self { interval_ms: 100 }
    }
}

impl RefreshConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

/// Receiver for refresh pushes
pub trait DisplaySink {
    fn port_changed(&mut self, node: &str, snapshot: &PortSnapshot);
}

struct NodeEntry {
    node_name: String,
    ports: Vec<Port>,
}

/// Poll-and-snapshot link between a node selection and the display layer.
///
/// Holds port handles, not copies, so port identity stays stable across
/// refreshes that do not change a node's port set; an in-progress drag on a
/// numeric control keeps targeting the same cell. The host's timer calls
/// [`DisplayLink::refresh`] on the configured interval.
pub struct DisplayLink {
    config: RefreshConfig,
    entries: Vec<NodeEntry>,
}

impl DisplayLink {
    pub fn new(config: RefreshConfig) -> Self {
        Self {
            config,
            entries: Vec::new(),
        }
    }

    pub fn config(&self) -> RefreshConfig {
        self.config
    }

    /// Rebuilds the control set from a fresh port listing per node. Called
    /// when the selection changes.
    pub fn rebuild(&mut self, selection: &[&dyn Node]) {
        self.entries = selection
            .iter()
            .map(|node| NodeEntry {
                node_name: node.name().to_string(),
                ports: node.ports().iter().cloned().collect(),
            })
            .collect();
    }

    /// Pushes fresh values for every connected port to the sink.
    ///
    /// Unconnected ports are display-authored and are never overwritten by a
    /// refresh.
    pub fn refresh(&self, sink: &mut dyn DisplaySink) {
        for entry in &self.entries {
            for port in &entry.ports {
                let snapshot = PortSnapshot::of(port);
                if snapshot.connected {
                    sink.port_changed(&entry.node_name, &snapshot);
                }
            }
        }
    }
}
