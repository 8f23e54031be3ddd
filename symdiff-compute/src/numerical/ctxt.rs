use std::collections::HashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A context to use when evaluating an expression, containing the values bound to its variables.
///
/// Named constants such as `e` and `pi` are part of the tree itself and are never looked up here.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Ctxt {
    /// The variables in the context.
    vars: HashMap<char, f64>,
}

impl Ctxt {
    /// Creates a new empty context.
    pub fn new() -> Ctxt {
        Ctxt::default()
    }

    /// Add a variable to the context, replacing any previous value.
    pub fn add_var(&mut self, name: char, value: f64) {
        self.vars.insert(name, value);
    }

    /// Get the value of a variable in the context.
    pub fn get_var(&self, name: char) -> Option<f64> {
        self.vars.get(&name).copied()
    }
}
