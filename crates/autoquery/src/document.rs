//! Final document assembly.

use crate::fragments::FragmentTable;
use crate::operations::{OperationDef, OperationKind};

/// Joins used fragments and operations into one document.
///
/// Fragments come first in type declaration order, followed by queries,
/// mutations and subscriptions. Blocks are separated by a blank line and the
/// document ends with a newline unless it is empty.
#[must_use]
pub fn compose(fragments: &FragmentTable, operations: &[OperationDef]) -> String {
    let fragment_blocks = fragments.used().map(ToString::to_string);
    let operation_blocks = OperationKind::ALL.into_iter().flat_map(|kind| {
        operations
            .iter()
            .filter(move |operation| operation.kind == kind)
            .map(ToString::to_string)
    });

    let blocks: Vec<String> = fragment_blocks.chain(operation_blocks).collect();
    if blocks.is_empty() {
        return String::new();
    }

    let mut document = blocks.join("\n\n");
    document.push('\n');
    document
}
