//! Rendering boundary for drawing nodes
//!
//! The renderer behind this trait is external; the crate only fixes the
//! style-stack discipline and the primitives its drawing nodes use. Style
//! state (fill, stroke, stroke weight) is mutable and shared across a tick,
//! which is why drawing nodes bracket their changes with push/pop.

use crate::nodes::value::Color;

pub trait RenderTarget {
    fn push_style(&mut self);
    fn pop_style(&mut self);

    fn fill(&mut self, color: Color);
    fn no_fill(&mut self);
    fn stroke(&mut self, color: Color);
    fn no_stroke(&mut self);
    fn stroke_weight(&mut self, weight: f32);

    fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32);
    fn rect(&mut self, x: f32, y: f32, width: f32, height: f32);
}

/// Applies the fill/stroke/weight triple shared by the drawing nodes
pub fn apply_style(
    target: &mut dyn RenderTarget,
    fill: Option<Color>,
    stroke: Option<Color>,
    weight: f32,
) {
    match fill {
        Some(color) => target.fill(color),
        None => target.no_fill(),
    }
    match stroke {
        Some(color) => target.stroke(color),
        None => target.no_stroke(),
    }
    target.stroke_weight(weight);
}
