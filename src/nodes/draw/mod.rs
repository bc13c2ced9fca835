//! Drawing node implementations
//!
//! Every drawing node carries an `enabled` Bool gate and brackets its style
//! changes with push/pop so sibling nodes drawn later in the same tick are
//! unaffected.

pub mod line;
pub mod rect;

pub use line::LineNode;
pub use rect::RectNode;

#[cfg(test)]
pub(crate) mod recorder {
    //! Recording render target used by the drawing-node tests

    use crate::nodes::value::Color;
    use crate::render::RenderTarget;

    #[derive(Debug, Clone, PartialEq)]
    pub enum Op {
        PushStyle,
        PopStyle,
        Fill(Color),
        NoFill,
        Stroke(Color),
        NoStroke,
        StrokeWeight(f32),
        Line(f32, f32, f32, f32),
        Rect(f32, f32, f32, f32),
    }

    #[derive(Debug, Default)]
    pub struct Recorder {
        pub ops: Vec<Op>,
    }

    impl Recorder {
        /// Push/pop pairs must balance over the recorded sequence
        pub fn style_stack_balanced(&self) -> bool {
            let mut depth = 0i32;
            for op in &self.ops {
                match op {
                    Op::PushStyle => depth += 1,
                    Op::PopStyle => {
                        depth -= 1;
                        if depth < 0 {
                            return false;
                        }
                    }
                    _ => {}
                }
            }
            depth == 0
        }
    }

    impl RenderTarget for Recorder {
        fn push_style(&mut self) {
            self.ops.push(Op::PushStyle);
        }
        fn pop_style(&mut self) {
            self.ops.push(Op::PopStyle);
        }
        fn fill(&mut self, color: Color) {
            self.ops.push(Op::Fill(color));
        }
        fn no_fill(&mut self) {
            self.ops.push(Op::NoFill);
        }
        fn stroke(&mut self, color: Color) {
            self.ops.push(Op::Stroke(color));
        }
        fn no_stroke(&mut self) {
            self.ops.push(Op::NoStroke);
        }
        fn stroke_weight(&mut self, weight: f32) {
            self.ops.push(Op::StrokeWeight(weight));
        }
        fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) {
            self.ops.push(Op::Line(x1, y1, x2, y2));
        }
        fn rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
            self.ops.push(Op::Rect(x, y, width, height));
        }
    }
}
