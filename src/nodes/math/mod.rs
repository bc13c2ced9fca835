//! Math node implementations

pub mod add;
pub mod expression;

pub use add::AddNode;
pub use expression::{
    identifiers, reconcile, Diagnostics, ExpressionNode, LogDiagnostics, PortDiff,
    DEFAULT_EXPRESSION,
};
