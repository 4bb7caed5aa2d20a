//! Operation-scoped variable names.

use crate::naming::{lowercase_first, with_numeric_suffix};

/// A declared operation variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    pub name: String,
    pub type_string: String,
}

/// Hands out unique variable names within a single operation.
///
/// Variables keep their allocation order, which is the order they are
/// declared in the operation header.
#[derive(Debug, Clone, Default)]
pub struct VariableAllocator {
    variables: Vec<Variable>,
}

/// Marker returned by [`VariableAllocator::checkpoint`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint(usize);

impl VariableAllocator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a variable for `proposed` (first letter lower-cased) and returns
    /// its final name. Taken names get a `2`, `3`, ... suffix.
    pub fn allocate(&mut self, proposed: &str, type_string: impl Into<String>) -> String {
        let base = lowercase_first(proposed);
        let name = with_numeric_suffix(&base, |candidate| self.contains(candidate));
        self.variables.push(Variable {
            name: name.clone(),
            type_string: type_string.into(),
        });
        name
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.variables.iter().any(|variable| variable.name == name)
    }

    #[must_use]
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint(self.variables.len())
    }

    /// Forgets every variable allocated since `checkpoint`.
    pub fn rollback(&mut self, checkpoint: Checkpoint) {
        self.variables.truncate(checkpoint.0);
    }

    #[must_use]
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    #[must_use]
    pub fn into_variables(self) -> Vec<Variable> {
        self.variables
    }
}
