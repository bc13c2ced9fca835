//! Rectangle drawing node

use crate::nodes::node::{Context, Drawable, Node};
use crate::nodes::port::{Port, PortSet};
use crate::nodes::value::{Color, PortValue};
use crate::render::{apply_style, RenderTarget};

/// Draws a rectangle at the given position
pub struct RectNode {
    name: String,
    ports: PortSet,
    enabled: Port,
    x: Port,
    y: Port,
    width: Port,
    height: Port,
    fill: Port,
    stroke: Port,
    stroke_weight: Port,
}

impl RectNode {
    pub fn new(name: impl Into<String>) -> Self {
        let mut ports = PortSet::new();
        let enabled = ports.add_input("enabled", PortValue::Bool(true));
        let x = ports.add_input("x", PortValue::Float(0.0));
        let y = ports.add_input("y", PortValue::Float(0.0));
        let width = ports.add_input("width", PortValue::Float(100.0));
        let height = ports.add_input("height", PortValue::Float(100.0));
        let fill = ports.add_input("fill", PortValue::Color(Color::WHITE));
        let stroke = ports.add_input("stroke", PortValue::Color(Color::BLACK));
        let stroke_weight = ports.add_input("strokeWeight", PortValue::Float(1.0));
        Self {
            name: name.into(),
            ports,
            enabled,
            x,
            y,
            width,
            height,
            fill,
            stroke,
            stroke_weight,
        }
    }
}

impl Node for RectNode {
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

impl Drawable for RectNode {
    fn draw(&mut self, target: &mut dyn RenderTarget, _ctx: &mut Context, _time: f32) {
        if !self.enabled.bool_value() {
            return;
        }
        target.push_style();
        apply_style(
            target,
            self.fill.color_value(),
            self.stroke.color_value(),
            self.stroke_weight.float_value(),
        );
        target.rect(
            self.x.float_value(),
            self.y.float_value(),
            self.width.float_value(),
            self.height.float_value(),
        );
        target.pop_style();
    }
}
