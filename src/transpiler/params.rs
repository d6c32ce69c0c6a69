//! Bound-parameter collection.

use crate::ast::Value;
use crate::transpiler::traits::DialectAdapter;

/// Parameters collected while compiling, in emission order.
#[derive(Debug, Default)]
pub struct ParamContext {
    /// Current parameter index (1-based: $1, $2, ...)
    pub index: usize,
    pub params: Vec<Value>,
}

impl ParamContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a value and return the placeholder for it.
    pub fn add_param(&mut self, value: Value, generator: &dyn DialectAdapter) -> String {
        self.index += 1;
        self.params.push(value);
        generator.placeholder(self.index)
    }
}
