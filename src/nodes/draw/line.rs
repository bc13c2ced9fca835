//! Line drawing node

use crate::nodes::node::{Context, Drawable, Node};
use crate::nodes::port::{Port, PortSet};
use crate::nodes::value::{Color, PortValue};
use crate::render::{apply_style, RenderTarget};

/// Draws a line from (x1, y1) to (x2, y2)
pub struct LineNode {
    name: String,
    ports: PortSet,
    enabled: Port,
    x1: Port,
    y1: Port,
    x2: Port,
    y2: Port,
    stroke: Port,
    stroke_weight: Port,
}

impl LineNode {
    pub fn new(name: impl Into<String>) -> Self {
        let mut ports = PortSet::new();
        let enabled = ports.add_input("enabled", PortValue::Bool(true));
        let x1 = ports.add_input("x1", PortValue::Float(0.0));
        let y1 = ports.add_input("y1", PortValue::Float(0.0));
        let x2 = ports.add_input("x2", PortValue::Float(100.0));
        let y2 = ports.add_input("y2", PortValue::Float(100.0));
        let stroke = ports.add_input("stroke", PortValue::Color(Color::BLACK));
        let stroke_weight = ports.add_input("strokeWeight", PortValue::Float(1.0));
        Self {
            name: name.into(),
            ports,
            enabled,
            x1,
            y1,
            x2,
            y2,
            stroke,
            stroke_weight,
        }
    }
}

impl Node for LineNode {
    fn name(&self) -> &str {
        &self.name
    }

    fn ports(&self) -> &PortSet {
        &self.ports
    }

    fn ports_mut(&mut self) -> &mut PortSet {
        &mut self.ports
    }

    fn as_drawable(&mut self) -> Option<&mut dyn Drawable> {
        Some(self)
    }
}

impl Drawable for LineNode {
    fn draw(&mut self, target: &mut dyn RenderTarget, _ctx: &mut Context, _time: f32) {
        if !self.enabled.bool_value() {
            return;
        }
        target.push_style();
        apply_style(
            target,
            None,
            self.stroke.color_value(),
            self.stroke_weight.float_value(),
        );
        target.line(
            self.x1.float_value(),
            self.y1.float_value(),
            self.x2.float_value(),
            self.y2.float_value(),
        );
        target.pop_style();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::draw::recorder::{Op, Recorder};

    #[test]
    fn test_line_draws_inside_style_pair() {
        let mut node = LineNode::new("line1");
        node.ports().port("x2").unwrap().set(50.0.into()).unwrap();
        let mut target = Recorder::default();
        node.draw(&mut target, &mut Context::default(), 0.0);

        assert!(target.style_stack_balanced());
        assert_eq!(target.ops.first(), Some(&Op::PushStyle));
        assert_eq!(target.ops.last(), Some(&Op::PopStyle));
        assert!(target.ops.contains(&Op::NoFill));
        assert!(target.ops.contains(&Op::Stroke(Color::BLACK)));
        assert!(target.ops.contains(&Op::Line(0.0, 0.0, 50.0, 100.0)));
    }

    #[test]
    fn test_disabled_line_draws_nothing() {
        let mut node = LineNode::new("line1");
        node.ports().port("enabled").unwrap().set(false.into()).unwrap();
        let mut target = Recorder::default();
        node.draw(&mut target, &mut Context::default(), 0.0);
        assert!(target.ops.is_empty());
    }
}
