//! Depth-bounded rendering of a field and its nested selection set.

use crate::catalog::TypeCatalog;
use crate::fragments::FragmentTable;
use crate::naming::{indent, uppercase_first};
use crate::schema::FieldDef;
use crate::variables::VariableAllocator;
use std::fmt::Write;

/// Renders selections for one generation run.
///
/// The builder borrows the run's fragment table mutably so spreads flag their
/// fragment as used; variables are tracked per operation by the caller.
pub struct SelectionBuilder<'a, 's> {
    catalog: &'a TypeCatalog<'s>,
    fragments: &'a mut FragmentTable,
    max_depth: usize,
}

impl<'a, 's> SelectionBuilder<'a, 's> {
    pub fn new(
        catalog: &'a TypeCatalog<'s>,
        fragments: &'a mut FragmentTable,
        max_depth: usize,
    ) -> Self {
        Self {
            catalog,
            fragments,
            max_depth,
        }
    }

    /// Renders `field` at nesting `level` (0 for root fields).
    ///
    /// Returns `None` when the field contributes nothing: either it sits at or
    /// below the depth bound, or it returns an object whose selection set
    /// would be empty. Fields with a terminal result render as their head.
    /// Variables allocated for a field that ends up dropped are released.
    pub fn build(
        &mut self,
        field: &FieldDef,
        variables: &mut VariableAllocator,
        level: usize,
    ) -> Option<String> {
        if level >= self.max_depth {
            tracing::trace!(field = %field.name, level, "Depth bound reached");
            return None;
        }

        let catalog = self.catalog;
        let base = field.ty.base_name();
        let object = catalog.object(base);

        let checkpoint = variables.checkpoint();
        let head = render_head(field, variables, level);

        let Some(object) = object else {
            return Some(head);
        };

        let spread = self.fragments.mark_used(base).map(str::to_owned);
        let children: Vec<String> = catalog
            .structured_fields(object)
            .filter_map(|child| self.build(child, variables, level + 1))
            .collect();

        if spread.is_none() && children.is_empty() {
            tracing::trace!(field = %field.name, level, "Empty selection set, dropping field");
            variables.rollback(checkpoint);
            return None;
        }

        let mut out = head;
        out.push_str(" {\n");
        if let Some(spread) = spread {
            let _ = writeln!(out, "{}...{spread}", indent(level + 2));
        }
        for child in children {
            out.push_str(&child);
            out.push('\n');
        }
        out.push_str(&indent(level + 1));
        out.push('}');
        Some(out)
    }
}

/// Renders the field name and its argument block, allocating one variable per
/// argument.
///
/// Root arguments propose their own name; nested ones are prefixed with the
/// field name (`friend(id:)` proposes `FriendId`).
pub(crate) fn render_head(
    field: &FieldDef,
    variables: &mut VariableAllocator,
    level: usize,
) -> String {
    let field_indent = indent(level + 1);
    let mut head = format!("{field_indent}{}", field.name);
    if field.arguments.is_empty() {
        return head;
    }

    let arguments: Vec<String> = field
        .arguments
        .iter()
        .map(|arg| {
            let proposed = if level == 0 {
                arg.name.clone()
            } else {
                format!(
                    "{}{}",
                    uppercase_first(&field.name),
                    uppercase_first(&arg.name)
                )
            };
            let variable = variables.allocate(&proposed, arg.ty.to_string());
            format!("{}{}: ${variable}", indent(level + 2), arg.name)
        })
        .collect();

    let _ = write!(head, "(\n{}\n{field_indent})", arguments.join(",\n"));
    head
}
