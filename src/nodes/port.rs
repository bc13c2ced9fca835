//! Port types and the per-port value cell
//!
//! Each port owns a single locked value cell holding the value together with
//! the connection flag, so any reader sees a wholly-old or wholly-new value
//! and a connection flag coherent with it. One lock per port; nothing in the
//! model locks at node or graph granularity.

use super::value::{PortKind, PortValue};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use thiserror::Error;

/// Direction of a port (input or output)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Input,
    Output,
}

/// Errors from the port model
#[derive(Debug, Error, PartialEq)]
pub enum PortError {
    #[error("value of kind {found} does not match port '{port}' of kind {expected}")]
    KindMismatch {
        port: String,
        expected: PortKind,
        found: PortKind,
    },
    #[error("no port named '{0}'")]
    UnknownPort(String),
}

#[derive(Debug)]
struct CellState {
    value: PortValue,
    connected: bool,
}

/// A typed, named parameter cell owned by a node.
///
/// Cloning a `Port` produces another handle to the same cell; the display
/// layer holds such handles across refreshes so port identity stays stable
/// while the user is mid-interaction. Identity is the cell, not the struct.
#[derive(Debug, Clone)]
pub struct Port {
    name: String,
    kind: PortKind,
    direction: Direction,
    default: PortValue,
    cell: Arc<RwLock<CellState>>,
}

impl Port {
    pub fn new(
        name: impl Into<String>,
        direction: Direction,
        default: PortValue,
    ) -> Self {
        let kind = default.kind();
        Self {
            name: name.into(),
            kind,
            direction,
            cell: Arc::new(RwLock::new(CellState {
                value: default.clone(),
                connected: false,
            })),
            default,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> PortKind {
        self.kind
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn default(&self) -> &PortValue {
        &self.default
    }

    pub fn is_input(&self) -> bool {
        matches!(self.direction, Direction::Input)
    }

    pub fn is_output(&self) -> bool {
        matches!(self.direction, Direction::Output)
    }

    /// Current value of the port
    pub fn get(&self) -> PortValue {
        self.read().value.clone()
    }

    /// Current value of a Float port; zero for any other kind
    pub fn float_value(&self) -> f32 {
        match self.get() {
            PortValue::Float(v) => v,
            _ => 0.0,
        }
    }

    /// Current value of a Bool port; false for any other kind
    pub fn bool_value(&self) -> bool {
        matches!(self.get(), PortValue::Bool(true))
    }

    /// Current value of a Color port, if it is one
    pub fn color_value(&self) -> Option<crate::nodes::value::Color> {
        match self.get() {
            PortValue::Color(c) => Some(c),
            _ => None,
        }
    }

    /// External edit path.
    ///
    /// Type-checked against the port's kind; a mismatched value is rejected
    /// with no effect. While the port is connected its value is authoritative
    /// from the upstream producer, so the call is silently ignored. Output
    /// ports are written only by their owning node's computation and ignore
    /// this path entirely.
    pub fn set(&self, value: PortValue) -> Result<(), PortError> {
        if value.kind() != self.kind {
            return Err(PortError::KindMismatch {
                port: self.name.clone(),
                expected: self.kind,
                found: value.kind(),
            });
        }
        if self.is_output() {
            return Ok(());
        }
        let mut state = self.write_lock();
        if !state.connected {
            state.value = value;
        }
        Ok(())
    }

    /// Owner/upstream write path: a node writing its own outputs, or a
    /// connection driving a connected input. Bypasses the connection guard
    /// but never the type check; a kind mismatch here is a programmer error
    /// and the write is dropped.
    pub fn write(&self, value: PortValue) {
        if value.kind() != self.kind {
            debug_assert!(
                false,
                "write of {} value to {} port '{}'",
                value.kind(),
                self.kind,
                self.name
            );
            log::error!(
                "dropped write of {} value to {} port '{}'",
                value.kind(),
                self.kind,
                self.name
            );
            return;
        }
        self.write_lock().value = value;
    }

    pub fn is_connected(&self) -> bool {
        self.read().connected
    }

    pub fn set_connected(&self, connected: bool) {
        self.write_lock().connected = connected;
    }

    /// Atomic snapshot of `(value, connected)` under one lock acquisition
    pub fn state(&self) -> (PortValue, bool) {
        let state = self.read();
        (state.value.clone(), state.connected)
    }

    /// Whether two handles refer to the same underlying cell
    pub fn same_cell(&self, other: &Port) -> bool {
        Arc::ptr_eq(&self.cell, &other.cell)
    }

    fn read(&self) -> RwLockReadGuard<'_, CellState> {
        self.cell.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_lock(&self) -> RwLockWriteGuard<'_, CellState> {
        self.cell.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Ordered, name-unique collection of ports owned by a node.
///
/// Insertion order is the display order and is preserved across dynamic
/// add/remove.
#[derive(Debug, Default)]
pub struct PortSet {
    ports: Vec<Port>,
}

impl PortSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an input port and returns a handle to it. If a port with this
    /// name already exists the existing port is returned unchanged, keeping
    /// names unique within the node.
    pub fn add_input(&mut self, name: &str, default: PortValue) -> Port {
        self.add(name, Direction::Input, default)
    }

    /// Adds an output port and returns a handle to it. Same-name behavior as
    /// [`PortSet::add_input`].
    pub fn add_output(&mut self, name: &str, default: PortValue) -> Port {
        self.add(name, Direction::Output, default)
    }

    fn add(&mut self, name: &str, direction: Direction, default: PortValue) -> Port {
        if let Some(existing) = self.port(name) {
            log::warn!("port '{}' already exists; keeping the existing port", name);
            return existing.clone();
        }
        let port = Port::new(name, direction, default);
        self.ports.push(port.clone());
        port
    }

    /// Removes the named port, returning its handle if it existed
    pub fn remove(&mut self, name: &str) -> Option<Port> {
        let index = self.ports.iter().position(|p| p.name() == name)?;
        Some(self.ports.remove(index))
    }

    pub fn port(&self, name: &str) -> Option<&Port> {
        self.ports.iter().find(|p| p.name() == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.port(name).is_some()
    }

    /// All ports in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Port> {
        self.ports.iter()
    }

    pub fn inputs(&self) -> impl Iterator<Item = &Port> {
        self.ports.iter().filter(|p| p.is_input())
    }

    pub fn outputs(&self) -> impl Iterator<Item = &Port> {
        self.ports.iter().filter(|p| p.is_output())
    }

    pub fn len(&self) -> usize {
        self.ports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ports.is_empty()
    }
}
