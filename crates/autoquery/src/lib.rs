//! Generate GraphQL operations and fragments from a schema.
//!
//! Every root field of the schema becomes one standalone operation. Object
//! types with scalar or enum fields get a fragment over those fields, and
//! nested object selections spread it instead of repeating the fields.
//! Arguments are lifted into operation variables with unique names.
//!
//! # Examples
//!
//! ```
//! use graphql_autoquery::{generate, GeneratorOptions};
//!
//! let sdl = "type Query { ping: String }";
//! let document = generate(sdl, &GeneratorOptions::default()).unwrap();
//! assert_eq!(document, "query Ping {\n  ping\n}\n");
//! ```
//!
//! ## Working with the structured output
//!
//! ```
//! use graphql_autoquery::{Generator, GeneratorOptions, OperationKind, Schema};
//!
//! let schema = Schema::parse(
//!     "type Query { user(id: ID!): User } type User { id: ID name: String }",
//!     "schema.graphql",
//! )
//! .unwrap();
//! let mut generator = Generator::new(&schema, GeneratorOptions::default()).unwrap();
//! let operations = generator.operations();
//!
//! assert_eq!(operations[0].kind, OperationKind::Query);
//! assert_eq!(operations[0].variables[0].name, "id");
//! assert!(generator.fragments().get("User").unwrap().is_used());
//! ```

mod catalog;
mod document;
mod error;
mod fragments;
mod naming;
mod operations;
mod schema;
mod selection;
mod variables;

pub use catalog::{FieldClass, TypeCatalog};
pub use document::compose;
pub use error::{GenerateError, Result};
pub use fragments::{Fragment, FragmentTable};
pub use operations::{OperationDef, OperationKind};
pub use schema::{ArgumentDef, FieldDef, Schema, SchemaBuilder, TypeDef, TypeKind, TypeRef};
pub use selection::SelectionBuilder;
pub use variables::{Checkpoint, Variable, VariableAllocator};

use std::collections::HashSet;

/// Default nesting bound for selection sets.
pub const DEFAULT_MAX_DEPTH: usize = 2;

/// Options controlling generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorOptions {
    /// Number of field levels rendered per operation, counting the root field.
    /// Fields at this level or deeper are left out. Must be at least 1.
    pub max_depth: usize,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl GeneratorOptions {
    #[must_use]
    pub const fn with_max_depth(max_depth: usize) -> Self {
        Self { max_depth }
    }
}

/// Holds the state of one generation run: the type catalog and the fragment
/// table whose used flags are set as operations are rendered.
#[derive(Debug)]
pub struct Generator<'s> {
    catalog: TypeCatalog<'s>,
    fragments: FragmentTable,
    options: GeneratorOptions,
}

impl<'s> Generator<'s> {
    pub fn new(schema: &'s Schema, options: GeneratorOptions) -> Result<Self> {
        if options.max_depth == 0 {
            return Err(GenerateError::InvalidDepth(options.max_depth));
        }
        let catalog = TypeCatalog::new(schema);
        let fragments = FragmentTable::build(&catalog);
        Ok(Self {
            catalog,
            fragments,
            options,
        })
    }

    #[must_use]
    pub fn fragments(&self) -> &FragmentTable {
        &self.fragments
    }

    /// Renders the operations of every root kind, in document order.
    pub fn operations(&mut self) -> Vec<OperationDef> {
        let mut selections =
            SelectionBuilder::new(&self.catalog, &mut self.fragments, self.options.max_depth);
        let mut taken_names = HashSet::new();

        OperationKind::ALL
            .into_iter()
            .flat_map(|kind| {
                operations::assemble(kind, &self.catalog, &mut selections, &mut taken_names)
            })
            .collect()
    }

    /// Renders the complete document.
    #[must_use]
    pub fn document(mut self) -> String {
        let operations = self.operations();
        compose(&self.fragments, &operations)
    }
}

/// Parses `source` as SDL and generates the document for it.
#[tracing::instrument(skip(source), fields(size = source.len(), max_depth = options.max_depth))]
pub fn generate(source: &str, options: &GeneratorOptions) -> Result<String> {
    let schema = Schema::parse(source, "schema.graphql")?;
    generate_from_schema(&schema, options)
}

/// Generates the document for an already parsed schema.
pub fn generate_from_schema(schema: &Schema, options: &GeneratorOptions) -> Result<String> {
    let generator = Generator::new(schema, *options)?;
    let document = generator.document();
    tracing::info!(size = document.len(), "Generated document");
    Ok(document)
}
