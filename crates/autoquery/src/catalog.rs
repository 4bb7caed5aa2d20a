//! Projection of a schema onto the object types the generator walks, plus the
//! field classification every other stage relies on.

use crate::schema::{FieldDef, Schema, TypeDef, TypeKind};

/// How a field participates in generated selections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldClass {
    /// No arguments and a terminal result. Covered by fragments.
    Leaf,
    /// Takes arguments or returns an object type, so it is rendered on its own.
    Structured,
}

/// The object types of a schema, in declaration order.
#[derive(Debug, Clone)]
pub struct TypeCatalog<'s> {
    schema: &'s Schema,
    objects: Vec<&'s TypeDef>,
}

impl<'s> TypeCatalog<'s> {
    #[must_use]
    pub fn new(schema: &'s Schema) -> Self {
        let objects = schema
            .types()
            .filter(|ty| ty.kind == TypeKind::Object)
            .collect();
        Self { schema, objects }
    }

    #[must_use]
    pub fn schema(&self) -> &'s Schema {
        self.schema
    }

    pub fn objects(&self) -> impl Iterator<Item = &'s TypeDef> + '_ {
        self.objects.iter().copied()
    }

    /// Looks up an object type by name.
    #[must_use]
    pub fn object(&self, name: &str) -> Option<&'s TypeDef> {
        self.objects.iter().copied().find(|ty| ty.name == name)
    }

    /// Classifies `field` by its arguments and the kind of its base type.
    ///
    /// Only object types carry a selectable body. Scalars, enums, interfaces,
    /// unions and unknown base types are terminal.
    #[must_use]
    pub fn classify(&self, field: &FieldDef) -> FieldClass {
        match self.schema.kind_of(field.ty.base_name()) {
            Some(TypeKind::Object) => FieldClass::Structured,
            _ if !field.arguments.is_empty() => FieldClass::Structured,
            _ => FieldClass::Leaf,
        }
    }

    /// Leaf fields of `ty`, in declaration order.
    pub fn leaf_fields<'t>(&'t self, ty: &'t TypeDef) -> impl Iterator<Item = &'t FieldDef> + 't {
        ty.fields
            .iter()
            .filter(move |field| self.classify(field) == FieldClass::Leaf)
    }

    /// Fields of `ty` that need their own selection.
    pub fn structured_fields<'t>(
        &'t self,
        ty: &'t TypeDef,
    ) -> impl Iterator<Item = &'t FieldDef> + 't {
        ty.fields
            .iter()
            .filter(move |field| self.classify(field) == FieldClass::Structured)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> Schema {
        Schema::parse(
            r"
type Query { user(id: ID!): User search(term: String!): [SearchResult!]! }
type User { id: ID! name: String avatar(size: Int): String friends: [User!]! node: Node }
interface Node { id: ID! }
union SearchResult = User
",
            "schema.graphql",
        )
        .unwrap()
    }

    #[test]
    fn test_catalog_keeps_only_objects() {
        let schema = schema();
        let catalog = TypeCatalog::new(&schema);
        let names: Vec<_> = catalog.objects().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Query", "User"]);
        assert!(catalog.object("Node").is_none());
    }

    #[test]
    fn test_classify_fields() {
        let schema = schema();
        let catalog = TypeCatalog::new(&schema);
        let user = catalog.object("User").unwrap();

        let classes: Vec<_> = user
            .fields
            .iter()
            .map(|f| (f.name.as_str(), catalog.classify(f)))
            .collect();
        assert_eq!(
            classes,
            vec![
                ("id", FieldClass::Leaf),
                ("name", FieldClass::Leaf),
                ("avatar", FieldClass::Structured),
                ("friends", FieldClass::Structured),
                ("node", FieldClass::Leaf),
            ]
        );

        let leaves: Vec<_> = catalog.leaf_fields(user).map(|f| f.name.as_str()).collect();
        assert_eq!(leaves, vec!["id", "name", "node"]);
        let structured: Vec<_> = catalog
            .structured_fields(user)
            .map(|f| f.name.as_str())
            .collect();
        assert_eq!(structured, vec!["avatar", "friends"]);
    }
}
