//! Formula node: derives its own input ports from the expression text
//!
//! The node's input-port set is not fixed at authoring time. On every edit of
//! the formula the free identifiers are reconciled against the existing
//! ports: names that survive the edit keep the identical port (and its
//! current value, and any upstream connection to it), new names get fresh
//! Float inputs, and vanished names lose their ports. A formula that fails
//! to compile leaves the node in the graph, inert, with its output forced to
//! zero.

use crate::expr::{self, Builtins, Expr};
use crate::nodes::node::{Context, CustomEditor, Node};
use crate::nodes::port::{Port, PortSet};
use crate::nodes::value::PortValue;
use log::{debug, warn};
use std::collections::HashMap;

/// Default formula for a freshly created node
pub const DEFAULT_EXPRESSION: &str = "a + b + c";

const EXPRESSION_KEY: &str = "expression";

/// Fire-and-forget sink for formula diagnostics. Reports never affect
/// control flow.
pub trait Diagnostics {
    fn report(&mut self, message: &str);
}

/// Default sink: routes reports to the log facade
pub struct LogDiagnostics;

impl Diagnostics for LogDiagnostics {
    fn report(&mut self, message: &str) {
        warn!("{message}");
    }
}

/// Result of diffing the previous variable names against a new token set
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PortDiff {
    /// Names present before and after, in their previous order
    pub retained: Vec<String>,
    /// New names, in first-occurrence order in the text
    pub added: Vec<String>,
    /// Names that no longer appear, in their previous order
    pub removed: Vec<String>,
}

/// Extracts candidate variable names from expression text.
///
/// Identifiers are maximal runs of alphabetic characters; digits and
/// punctuation terminate a token and are never part of one, so `a1` yields
/// the identifier `a` (followed by a non-identifier `1`). Duplicates are
/// dropped, keeping first-occurrence order.
pub fn identifiers(text: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    let mut current = String::new();
    for c in text.chars().chain(std::iter::once(' ')) {
        if c.is_ascii_alphabetic() {
            current.push(c);
        } else if !current.is_empty() {
            if !names.iter().any(|n| n == &current) {
                names.push(current.clone());
            }
            current.clear();
        }
    }
    names
}

/// Pure reconciliation diff: old names against the new name set.
///
/// Independent of any live node so the algorithm is testable on its own;
/// [`ExpressionNode::set_expression`] applies the result atomically.
pub fn reconcile(old: &[String], new_names: &[String]) -> PortDiff {
    PortDiff {
        retained: old
            .iter()
            .filter(|n| new_names.contains(n))
            .cloned()
            .collect(),
        added: new_names
            .iter()
            .filter(|n| !old.contains(n))
            .cloned()
            .collect(),
        removed: old
            .iter()
            .filter(|n| !new_names.contains(n))
            .cloned()
            .collect(),
    }
}

/// A node computing a user-supplied mathematical formula.
///
/// Output port `result` (Float); one Float input port per free identifier in
/// the formula, synthesized live by reconciliation.
pub struct ExpressionNode {
    name: String,
    ports: PortSet,
    result: Port,
    expression: String,
    compiled: Option<Expr>,
    variables: Vec<String>,
    builtins: &'static Builtins,
    diagnostics: Box<dyn Diagnostics>,
}

impl ExpressionNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_diagnostics(name, Box::new(LogDiagnostics))
    }

    pub fn with_diagnostics(
        name: impl Into<String>,
        diagnostics: Box<dyn Diagnostics>,
    ) -> Self {
        let mut ports = PortSet::new();
        let result = ports.add_output("result", PortValue::Float(0.0));
        let mut node = Self {
            name: name.into(),
            ports,
            result,
            expression: String::new(),
            compiled: None,
            variables: Vec::new(),
            builtins: Builtins::standard(),
            diagnostics,
        };
        node.set_expression(DEFAULT_EXPRESSION);
        node
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// Whether the current formula compiled; a node without a compiled form
    /// stays in the graph and outputs zero until a later edit compiles
    pub fn is_compiled(&self) -> bool {
        self.compiled.is_some()
    }

    /// Bound variable names, in port order
    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    pub fn variable_port(&self, name: &str) -> Option<&Port> {
        self.variables
            .iter()
            .find(|n| n.as_str() == name)
            .and_then(|n| self.ports.port(n))
    }

    pub fn result_port(&self) -> &Port {
        &self.result
    }

    /// The single state transition: reconcile the input-port set against the
    /// new text, then recompile
    pub fn set_expression(&mut self, text: &str) {
        self.expression = text.to_string();

        // A name that collides with a non-variable port (the `result`
        // output) is unsynthesizable: no input port is created for it, and
        // it never enters the variable list, so reconciliation can never
        // remove the port it collides with.
        let names: Vec<String> = identifiers(text)
            .into_iter()
            .filter(|n| !self.builtins.contains(n))
            .filter(|n| {
                let taken =
                    self.ports.contains(n) && !self.variables.iter().any(|v| v == n);
                if taken {
                    warn!(
                        "node '{}': identifier '{}' collides with a non-variable port; \
                         no input port synthesized",
                        self.name, n
                    );
                }
                !taken
            })
            .collect();
        let diff = reconcile(&self.variables, &names);
        debug!(
            "node '{}': rebind retained {} added {} removed {}",
            self.name,
            diff.retained.len(),
            diff.added.len(),
            diff.removed.len()
        );
        for name in &diff.removed {
            self.ports.remove(name);
        }
        for name in &diff.added {
            self.ports.add_input(name, PortValue::Float(0.0));
        }
        let mut variables = diff.retained;
        variables.extend(diff.added);
        self.variables = variables;

        match expr::compile(&self.expression, self.builtins) {
            Ok(compiled) => self.compiled = Some(compiled),
            Err(err) => {
                self.compiled = None;
                self.diagnostics.report(&format!(
                    "expression '{}' failed to compile: {err}",
                    self.expression
                ));
            }
        }
    }
}

impl Node for ExpressionNode {
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
        let Some(compiled) = &self.compiled else {
            self.result.write(PortValue::Float(0.0));
            return;
        };
        let mut vars = HashMap::with_capacity(self.variables.len());
        for name in &self.variables {
            let value = self
                .ports
                .port(name)
                .and_then(|p| p.get().as_float())
                .unwrap_or(0.0);
            vars.insert(name.clone(), value);
        }
        // Any evaluation fault forces the neutral output; the compiled form
        // is kept so the next tick retries.
        let value = compiled.eval(&vars, self.builtins).unwrap_or(0.0);
        self.result.write(PortValue::Float(value));
    }

    fn create_custom_editor(&self) -> Option<CustomEditor> {
        Some(CustomEditor::text(self.expression.clone()))
    }

    fn custom_keys(&self) -> Vec<String> {
        vec![EXPRESSION_KEY.to_string()]
    }

    fn serialize_custom_value(&self, key: &str) -> Option<String> {
        if key == EXPRESSION_KEY {
            Some(self.expression.clone())
        } else {
            None
        }
    }

    fn deserialize_custom_value(&mut self, key: &str, value: &str) {
        if key == EXPRESSION_KEY {
            self.set_expression(value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::connection::Connection;
    use crate::nodes::port::Direction;

    fn input_names(node: &ExpressionNode) -> Vec<String> {
        node.ports()
            .inputs()
            .map(|p| p.name().to_string())
            .collect()
    }

    #[test]
    fn test_identifier_tokenization() {
        assert_eq!(identifiers("a + b + c"), ["a", "b", "c"]);
        // digits terminate a token and are not part of any identifier
        assert_eq!(identifiers("a1 + b"), ["a", "b"]);
        assert_eq!(identifiers("foo*foo - bar"), ["foo", "bar"]);
        assert_eq!(identifiers("3.5 * 2"), Vec::<String>::new());
        assert_eq!(identifiers(""), Vec::<String>::new());
    }

    #[test]
    fn test_reconcile_diff() {
        let old = vec!["a".to_string(), "b".to_string()];
        let new_names = vec!["b".to_string(), "c".to_string()];
        let diff = reconcile(&old, &new_names);
        assert_eq!(diff.retained, ["b"]);
        assert_eq!(diff.added, ["c"]);
        assert_eq!(diff.removed, ["a"]);
    }

    #[test]
    fn test_reconcile_unchanged_set_is_empty_diff() {
        let old = vec!["a".to_string(), "b".to_string()];
        let diff = reconcile(&old, &old.clone());
        assert_eq!(diff.retained, ["a", "b"]);
        assert!(diff.added.is_empty());
        assert!(diff.removed.is_empty());
    }

    #[test]
    fn test_default_expression_ports() {
        let node = ExpressionNode::new("expr1");
        assert_eq!(node.expression(), DEFAULT_EXPRESSION);
        assert!(node.is_compiled());
        assert_eq!(input_names(&node), ["a", "b", "c"]);
        assert!(node.result_port().is_output());
    }

    #[test]
    fn test_variable_set_matches_tokens_minus_reserved() {
        let mut node = ExpressionNode::new("expr1");
        node.set_expression("sin(t) * amp + offset");
        assert_eq!(input_names(&node), ["t", "amp", "offset"]);
        assert!(node.variable_port("sin").is_none());
    }

    #[test]
    fn test_identity_preserved_across_reorder() {
        let mut node = ExpressionNode::new("expr1");
        node.set_expression("a+b");
        let before = node.variable_port("a").unwrap().clone();
        before.set(PortValue::Float(3.0)).unwrap();

        node.set_expression("b+a");
        let after = node.variable_port("a").unwrap();
        assert!(before.same_cell(after));
        assert_eq!(after.get(), PortValue::Float(3.0));
    }

    #[test]
    fn test_shrinking_removes_ports() {
        let mut node = ExpressionNode::new("expr1");
        node.set_expression("a+b");
        node.set_expression("a");
        assert_eq!(input_names(&node), ["a"]);
        assert!(node.variable_port("b").is_none());
    }

    #[test]
    fn test_rebind_same_text_is_noop_on_ports() {
        let mut node = ExpressionNode::new("expr1");
        node.set_expression("a+b");
        let a = node.variable_port("a").unwrap().clone();
        a.set(PortValue::Float(5.0)).unwrap();
        let b = node.variable_port("b").unwrap().clone();

        node.set_expression("a+b");
        assert!(a.same_cell(node.variable_port("a").unwrap()));
        assert!(b.same_cell(node.variable_port("b").unwrap()));
        assert_eq!(a.get(), PortValue::Float(5.0));
    }

    #[test]
    fn test_new_ports_follow_first_occurrence_order() {
        let mut node = ExpressionNode::new("expr1");
        node.set_expression("z + y + z + x");
        assert_eq!(input_names(&node), ["z", "y", "x"]);
    }

    #[test]
    fn test_output_name_is_unsynthesizable() {
        let mut node = ExpressionNode::new("expr1");
        node.set_expression("result + a");

        // no variable port is bound to the output's name
        assert_eq!(node.variables(), ["a"]);
        assert_eq!(input_names(&node), ["a"]);
        assert!(node.variable_port("result").is_none());
        let result = node.ports().port("result").unwrap();
        assert!(result.is_output());
        assert!(result.same_cell(node.result_port()));

        // the formula still compiles, but `result` has no value to read,
        // so evaluation faults and the output is forced neutral
        node.variable_port("a").unwrap().set(2.0.into()).unwrap();
        node.execute(&mut Context::default(), 0.0);
        assert_eq!(node.result_port().get(), PortValue::Float(0.0));
    }

    #[test]
    fn test_shrink_never_removes_the_output_port() {
        let mut node = ExpressionNode::new("expr1");
        node.set_expression("result + a");
        node.set_expression("a");

        let names: Vec<_> = node.ports().iter().map(|p| p.name().to_string()).collect();
        assert_eq!(names, ["result", "a"]);
        assert!(node.ports().port("result").unwrap().is_output());

        node.variable_port("a").unwrap().set(2.0.into()).unwrap();
        node.execute(&mut Context::default(), 0.0);
        assert_eq!(node.result_port().get(), PortValue::Float(2.0));
    }

    #[test]
    fn test_execute_evaluates_formula() {
        let mut node = ExpressionNode::new("expr1");
        node.set_expression("a+b");
        node.variable_port("a").unwrap().set(2.0.into()).unwrap();
        node.variable_port("b").unwrap().set(3.0.into()).unwrap();
        node.execute(&mut Context::default(), 0.0);
        assert_eq!(node.result_port().get(), PortValue::Float(5.0));
    }

    #[test]
    fn test_compile_failure_forces_zero_output() {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut node = ExpressionNode::new("expr1");
        node.set_expression("a+b");
        node.variable_port("a").unwrap().set(2.0.into()).unwrap();
        node.execute(&mut Context::default(), 0.0);
        assert_ne!(node.result_port().get(), PortValue::Float(0.0));

        node.set_expression("a+");
        assert!(!node.is_compiled());
        // ports for still-present names survive the broken edit
        assert_eq!(input_names(&node), ["a"]);
        for _ in 0..3 {
            node.execute(&mut Context::default(), 0.0);
            assert_eq!(node.result_port().get(), PortValue::Float(0.0));
        }
    }

    #[test]
    fn test_upstream_connection_survives_edit() {
        let mut node = ExpressionNode::new("expr1");
        node.set_expression("a+b");
        let upstream = crate::nodes::port::Port::new(
            "out",
            Direction::Output,
            PortValue::Float(0.0),
        );
        upstream.write(PortValue::Float(7.0));
        let a = node.variable_port("a").unwrap().clone();
        let conn = Connection::connect(&upstream, &a).unwrap();
        conn.transfer();

        node.set_expression("b+a+c");
        let a_after = node.variable_port("a").unwrap();
        assert!(a.same_cell(a_after));
        assert!(a_after.is_connected());
        assert_eq!(a_after.get(), PortValue::Float(7.0));
    }

    #[test]
    fn test_custom_state_round_trip() {
        let mut node = ExpressionNode::new("expr1");
        assert_eq!(node.custom_keys(), ["expression"]);
        node.set_expression("x * 2");
        assert_eq!(
            node.serialize_custom_value("expression").as_deref(),
            Some("x * 2")
        );
        assert_eq!(node.serialize_custom_value("nope"), None);

        let mut restored = ExpressionNode::new("expr2");
        restored.deserialize_custom_value("expression", "x * 2");
        assert_eq!(restored.expression(), "x * 2");
        assert_eq!(input_names(&restored), ["x"]);
        // unknown key is a no-op
        restored.deserialize_custom_value("mystery", "whatever");
        assert_eq!(restored.expression(), "x * 2");
    }

    #[test]
    fn test_custom_editor_carries_formula_text() {
        let node = ExpressionNode::new("expr1");
        let editor = node.create_custom_editor().unwrap();
        assert_eq!(editor.editor_kind, "text");
        assert_eq!(editor.state, DEFAULT_EXPRESSION);
    }

    #[test]
    fn test_diagnostics_reported_on_compile_failure() {
        use std::sync::{Arc, Mutex};

        #[derive(Default)]
        struct Capture(Arc<Mutex<Vec<String>>>);
        impl Diagnostics for Capture {
            fn report(&mut self, message: &str) {
                self.0.lock().unwrap().push(message.to_string());
            }
        }

        let reports = Arc::new(Mutex::new(Vec::new()));
        let mut node = ExpressionNode::with_diagnostics(
            "expr1",
            Box::new(Capture(reports.clone())),
        );
        assert!(reports.lock().unwrap().is_empty());
        node.set_expression("a+");
        let reports = reports.lock().unwrap();
        assert_eq!(reports.len(), 1);
        assert!(reports[0].contains("a+"));
    }
}
