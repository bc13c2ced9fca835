//! Statically constructed builtin-function table
//!
//! The names in this table are reserved: the expression binding engine never
//! synthesizes a variable port for them.

use once_cell::sync::Lazy;
use std::collections::HashMap;

type BuiltinFn = fn(&[f32]) -> f32;

/// A callable builtin available to formulas
#[derive(Clone, Copy)]
pub struct Builtin {
    pub name: &'static str,
    pub arity: usize,
    pub call: BuiltinFn,
}

/// Lookup table of builtins, keyed by reserved name
pub struct Builtins {
    by_name: HashMap<&'static str, Builtin>,
}

impl Builtins {
    pub fn new(entries: &[Builtin]) -> Self {
        Self {
            by_name: entries.iter().map(|b| (b.name, *b)).collect(),
        }
    }

    /// The standard math table used by formula nodes
    pub fn standard() -> &'static Builtins {
        &STANDARD
    }

    /// Whether `name` is reserved for a builtin
    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Builtin> {
        self.by_name.get(name)
    }
}

macro_rules! builtin {
    ($name:literal, $arity:literal, |$($arg:ident),*| $body:expr) => {
        Builtin {
            name: $name,
            arity: $arity,
            call: |args: &[f32]| -> f32 {
                let [$($arg),*] = args else { return 0.0 };
                $body
            },
        }
    };
}

static STANDARD: Lazy<Builtins> = Lazy::new(|| {
    Builtins::new(&[
        builtin!("sin", 1, |a| a.sin()),
        builtin!("cos", 1, |a| a.cos()),
        builtin!("tan", 1, |a| a.tan()),
        builtin!("abs", 1, |a| a.abs()),
        builtin!("sqrt", 1, |a| a.sqrt()),
        builtin!("floor", 1, |a| a.floor()),
        builtin!("ceil", 1, |a| a.ceil()),
        builtin!("round", 1, |a| a.round()),
        builtin!("pow", 2, |a, b| a.powf(*b)),
        builtin!("min", 2, |a, b| a.min(*b)),
        builtin!("max", 2, |a, b| a.max(*b)),
        builtin!("atan", 1, |a| a.atan()),
        builtin!("exp", 1, |a| a.exp()),
        builtin!("log", 1, |a| a.ln()),
        builtin!("clamp", 3, |x, lo, hi| x.clamp(*lo, *hi)),
        builtin!("lerp", 3, |a, b, t| a + (b - a) * t),
        // zero-argument constants
        Builtin {
            name: "pi",
            arity: 0,
            call: |_args| std::f32::consts::PI,
        },
        Builtin {
            name: "e",
            arity: 0,
            call: |_args| std::f32::consts::E,
        },
    ])
});
