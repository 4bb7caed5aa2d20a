//! One standalone operation per root field.

use crate::catalog::TypeCatalog;
use crate::naming::{indent, uppercase_first, with_numeric_suffix};
use crate::schema::Schema;
use crate::selection::{render_head, SelectionBuilder};
use crate::variables::{Variable, VariableAllocator};
use std::collections::HashSet;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Query,
    Mutation,
    Subscription,
}

impl OperationKind {
    /// All kinds, in document order.
    pub const ALL: [Self; 3] = [Self::Query, Self::Mutation, Self::Subscription];

    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Query => "query",
            Self::Mutation => "mutation",
            Self::Subscription => "subscription",
        }
    }

    /// The schema's root type for this kind, or the bare keyword when the
    /// schema declares none (which matches no type).
    #[must_use]
    pub fn root_type_name(self, schema: &Schema) -> String {
        let declared = match self {
            Self::Query => schema.query_type(),
            Self::Mutation => schema.mutation_type(),
            Self::Subscription => schema.subscription_type(),
        };
        declared.unwrap_or(self.keyword()).to_string()
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A fully rendered operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationDef {
    pub kind: OperationKind,
    pub name: String,
    pub variables: Vec<Variable>,
    /// Selection text for the root field, indented one level.
    pub body: String,
}

impl fmt::Display for OperationDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.name)?;
        if !self.variables.is_empty() {
            let declarations: Vec<String> = self
                .variables
                .iter()
                .map(|v| format!("{}${}: {}", indent(1), v.name, v.type_string))
                .collect();
            write!(f, "(\n{}\n)", declarations.join(",\n"))?;
        }
        write!(f, " {{\n{}\n}}", self.body)
    }
}

/// Builds the operations for every field of `kind`'s root type.
///
/// `taken_names` carries operation names already used in the document, so a
/// `user` query and a `user` mutation end up as `User` and `User2`.
pub(crate) fn assemble(
    kind: OperationKind,
    catalog: &TypeCatalog<'_>,
    selections: &mut SelectionBuilder<'_, '_>,
    taken_names: &mut HashSet<String>,
) -> Vec<OperationDef> {
    let root_name = kind.root_type_name(catalog.schema());
    let Some(root) = catalog.object(&root_name) else {
        tracing::debug!(%kind, root = %root_name, "No root type, skipping operations");
        return Vec::new();
    };

    root.fields
        .iter()
        .map(|field| {
            let mut variables = VariableAllocator::new();
            let body = selections
                .build(field, &mut variables, 0)
                .unwrap_or_else(|| {
                    tracing::debug!(
                        %kind,
                        field = %field.name,
                        "No renderable selection, emitting bare field"
                    );
                    render_head(field, &mut variables, 0)
                });

            let name = with_numeric_suffix(&uppercase_first(&field.name), |candidate| {
                taken_names.contains(candidate)
            });
            taken_names.insert(name.clone());

            OperationDef {
                kind,
                name,
                variables: variables.into_variables(),
                body,
            }
        })
        .collect()
}
