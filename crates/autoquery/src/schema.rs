//! Schema model consumed by the generator.
//!
//! The model is deliberately small: named types with their kind and ordered
//! fields, plus the names of the root operation types. It can be produced from
//! SDL text via [`Schema::parse`] or assembled by hand with [`SchemaBuilder`]
//! (which is how introspection results are converted).

use crate::{GenerateError, Result};
use apollo_compiler::ast::{self, OperationType};
use apollo_compiler::schema::{ExtendedType, FieldDefinition};
use indexmap::IndexMap;
use std::fmt;
use std::path::Path;

/// A reference to an output or input type, possibly wrapped in list and
/// non-null modifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRef {
    Named(String),
    List(Box<TypeRef>),
    NonNull(Box<TypeRef>),
}

impl TypeRef {
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    #[must_use]
    pub fn list(of: TypeRef) -> Self {
        Self::List(Box::new(of))
    }

    #[must_use]
    pub fn non_null(of: TypeRef) -> Self {
        Self::NonNull(Box::new(of))
    }

    /// Strips every list and non-null wrapper and returns the underlying type name.
    #[must_use]
    pub fn base_name(&self) -> &str {
        let mut current = self;
        loop {
            match current {
                Self::Named(name) => return name,
                Self::List(inner) | Self::NonNull(inner) => current = inner,
            }
        }
    }

    fn from_ast(ty: &ast::Type) -> Self {
        match ty {
            ast::Type::Named(name) => Self::named(name.as_str()),
            ast::Type::NonNullNamed(name) => Self::non_null(Self::named(name.as_str())),
            ast::Type::List(inner) => Self::list(Self::from_ast(inner)),
            ast::Type::NonNullList(inner) => Self::non_null(Self::list(Self::from_ast(inner))),
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => f.write_str(name),
            Self::List(inner) => write!(f, "[{inner}]"),
            Self::NonNull(inner) => write!(f, "{inner}!"),
        }
    }
}

/// The kind of a named schema type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Scalar,
    Object,
    Interface,
    Union,
    Enum,
    InputObject,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentDef {
    pub name: String,
    pub ty: TypeRef,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    pub name: String,
    pub arguments: Vec<ArgumentDef>,
    pub ty: TypeRef,
}

impl FieldDef {
    #[must_use]
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            arguments: Vec::new(),
            ty,
        }
    }

    #[must_use]
    pub fn with_argument(mut self, name: impl Into<String>, ty: TypeRef) -> Self {
        self.arguments.push(ArgumentDef {
            name: name.into(),
            ty,
        });
        self
    }

    fn from_definition(definition: &FieldDefinition) -> Self {
        Self {
            name: definition.name.to_string(),
            arguments: definition
                .arguments
                .iter()
                .map(|arg| ArgumentDef {
                    name: arg.name.to_string(),
                    ty: TypeRef::from_ast(&arg.ty),
                })
                .collect(),
            ty: TypeRef::from_ast(&definition.ty),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDef {
    pub name: String,
    pub kind: TypeKind,
    pub fields: Vec<FieldDef>,
}

/// A parsed schema, keyed by type name in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    types: IndexMap<String, TypeDef>,
    query_type: Option<String>,
    mutation_type: Option<String>,
    subscription_type: Option<String>,
}

impl Schema {
    #[must_use]
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    /// Parses and validates SDL source.
    ///
    /// Built-in scalars and introspection types are left out of the model.
    #[tracing::instrument(skip_all, fields(path = %path.as_ref().display(), size = source.len()))]
    pub fn parse(source: &str, path: impl AsRef<Path>) -> Result<Self> {
        let valid = match apollo_compiler::Schema::parse_and_validate(source, path) {
            Ok(valid) => valid,
            Err(with_errors) => {
                tracing::warn!(
                    error_count = with_errors.errors.len(),
                    "Schema failed to parse or validate"
                );
                return Err(GenerateError::SchemaParse(with_errors.errors.to_string()));
            }
        };

        let mut builder = Self::builder();
        for (name, extended) in &valid.types {
            if extended.is_built_in() || name.as_str().starts_with("__") {
                continue;
            }
            let (kind, fields) = match extended {
                ExtendedType::Scalar(_) => (TypeKind::Scalar, Vec::new()),
                ExtendedType::Enum(_) => (TypeKind::Enum, Vec::new()),
                ExtendedType::Union(_) => (TypeKind::Union, Vec::new()),
                ExtendedType::InputObject(_) => (TypeKind::InputObject, Vec::new()),
                ExtendedType::Object(object) => (
                    TypeKind::Object,
                    object
                        .fields
                        .values()
                        .map(|field| FieldDef::from_definition(field))
                        .collect(),
                ),
                ExtendedType::Interface(interface) => (
                    TypeKind::Interface,
                    interface
                        .fields
                        .values()
                        .map(|field| FieldDef::from_definition(field))
                        .collect(),
                ),
            };
            builder = builder.with_type(TypeDef {
                name: name.to_string(),
                kind,
                fields,
            });
        }

        let root = |operation| valid.root_operation(operation).map(ToString::to_string);
        let schema = builder
            .query_type(root(OperationType::Query))
            .mutation_type(root(OperationType::Mutation))
            .subscription_type(root(OperationType::Subscription))
            .build();

        tracing::debug!(types = schema.types.len(), "Schema parsed");
        Ok(schema)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&TypeDef> {
        self.types.get(name)
    }

    /// Kind of the named type, if the schema declares it.
    #[must_use]
    pub fn kind_of(&self, name: &str) -> Option<TypeKind> {
        self.types.get(name).map(|ty| ty.kind)
    }

    pub fn types(&self) -> impl Iterator<Item = &TypeDef> {
        self.types.values()
    }

    #[must_use]
    pub fn contains_type(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    #[must_use]
    pub fn query_type(&self) -> Option<&str> {
        self.query_type.as_deref()
    }

    #[must_use]
    pub fn mutation_type(&self) -> Option<&str> {
        self.mutation_type.as_deref()
    }

    #[must_use]
    pub fn subscription_type(&self) -> Option<&str> {
        self.subscription_type.as_deref()
    }

    /// Whether `name` is one of the declared root operation types.
    #[must_use]
    pub fn is_root_type(&self, name: &str) -> bool {
        [
            self.query_type(),
            self.mutation_type(),
            self.subscription_type(),
        ]
        .into_iter()
        .flatten()
        .any(|root| root == name)
    }
}

/// Incremental construction of a [`Schema`].
///
/// When no root type is set explicitly, types named `Query`, `Mutation` and
/// `Subscription` become the roots, as in SDL without a `schema` block.
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    types: IndexMap<String, TypeDef>,
    query_type: Option<String>,
    mutation_type: Option<String>,
    subscription_type: Option<String>,
    explicit_roots: bool,
}

impl SchemaBuilder {
    #[must_use]
    pub fn with_type(mut self, type_def: TypeDef) -> Self {
        self.types.insert(type_def.name.clone(), type_def);
        self
    }

    #[must_use]
    pub fn object(self, name: impl Into<String>, fields: Vec<FieldDef>) -> Self {
        self.with_type(TypeDef {
            name: name.into(),
            kind: TypeKind::Object,
            fields,
        })
    }

    #[must_use]
    pub fn query_type(mut self, name: Option<String>) -> Self {
        self.query_type = name;
        self.explicit_roots = true;
        self
    }

    #[must_use]
    pub fn mutation_type(mut self, name: Option<String>) -> Self {
        self.mutation_type = name;
        self.explicit_roots = true;
        self
    }

    #[must_use]
    pub fn subscription_type(mut self, name: Option<String>) -> Self {
        self.subscription_type = name;
        self.explicit_roots = true;
        self
    }

    #[must_use]
    pub fn build(self) -> Schema {
        if self.explicit_roots {
            return Schema {
                types: self.types,
                query_type: self.query_type,
                mutation_type: self.mutation_type,
                subscription_type: self.subscription_type,
            };
        }

        let conventional = |name: &str| self.types.contains_key(name).then(|| name.to_string());
        let query_type = conventional("Query");
        let mutation_type = conventional("Mutation");
        let subscription_type = conventional("Subscription");
        Schema {
            types: self.types,
            query_type,
            mutation_type,
            subscription_type,
        }
    }
}
