//! Addition node: the plain computational variant of the node contract

use crate::nodes::node::{Context, Node};
use crate::nodes::port::{Port, PortSet};
use crate::nodes::value::PortValue;

/// Adds two Float inputs into the `sum` output
pub struct AddNode {
    name: String,
    ports: PortSet,
    a: Port,
    b: Port,
    sum: Port,
}

impl AddNode {
    pub fn new(name: impl Into<String>) -> Self {
        let mut ports = PortSet::new();
        let a = ports.add_input("a", PortValue::Float(0.0));
        let b = ports.add_input("b", PortValue::Float(0.0));
        let sum = ports.add_output("sum", PortValue::Float(0.0));
        Self {
            name: name.into(),
            ports,
            a,
            b,
            sum,
        }
    }

    pub fn sum_port(&self) -> &Port {
        &self.sum
    }
}

impl Node for AddNode {
    fn name(&self) -> &str {
        &self.name
    }

    fn ports(&self) -> &PortSet {
        &self.ports
    }

    fn ports_mut(&mut self) -> &mut PortSet {
        &mut self.ports
    }

    fn execute(&mut self, _ctx: &mut Context, _time: f32) {
        let a = self.a.get().as_float().unwrap_or(0.0);
        let b = self.b.get().as_float().unwrap_or(0.0);
        self.sum.write(PortValue::Float(a + b));
    }
}
