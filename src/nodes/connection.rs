//! Connections between ports: the upstream write path into inputs

use super::port::{Port, PortError};
use thiserror::Error;

/// Errors from connecting two ports
#[derive(Debug, Error, PartialEq)]
pub enum ConnectError {
    #[error("'{0}' is not an output port")]
    NotAnOutput(String),
    #[error("'{0}' is not an input port")]
    NotAnInput(String),
    #[error("input '{0}' is already connected")]
    AlreadyConnected(String),
    #[error(transparent)]
    Port(#[from] PortError),
}

/// A link from an upstream output port to a downstream input port.
///
/// Connecting marks the input connected, which makes the upstream value
/// authoritative: external edits on the input are ignored for the lifetime
/// of the connection. The host scheduler decides when [`Connection::transfer`]
/// runs relative to node ticks.
#[derive(Debug, Clone)]
pub struct Connection {
    from: Port,
    to: Port,
}

impl Connection {
    /// Connects an output port to an input port of the same kind
    pub fn connect(from: &Port, to: &Port) -> Result<Connection, ConnectError> {
        if !from.is_output() {
            return Err(ConnectError::NotAnOutput(from.name().to_string()));
        }
        if !to.is_input() {
            return Err(ConnectError::NotAnInput(to.name().to_string()));
        }
        if from.kind() != to.kind() {
            return Err(ConnectError::Port(PortError::KindMismatch {
                port: to.name().to_string(),
                expected: to.kind(),
                found: from.kind(),
            }));
        }
        if to.is_connected() {
            return Err(ConnectError::AlreadyConnected(to.name().to_string()));
        }
        to.set_connected(true);
        Ok(Self {
            from: from.clone(),
            to: to.clone(),
        })
    }

    /// Copies the current upstream value into the input port
    pub fn transfer(&self) {
        self.to.write(self.from.get());
    }

    /// Breaks the link; the input becomes externally editable again
    pub fn disconnect(self) {
        self.to.set_connected(false);
    }

    pub fn from(&self) -> &Port {
        &self.from
    }

    pub fn to(&self) -> &Port {
        &self.to
    }
}
