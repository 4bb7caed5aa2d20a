//! Per-type fragments over leaf fields.

use crate::catalog::TypeCatalog;
use crate::naming::{indent, lowercase_first};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// A fragment candidate for one object type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub name: String,
    pub type_name: String,
    pub fields: Vec<String>,
    used: bool,
}

impl Fragment {
    /// Whether a rendered selection has spread this fragment.
    #[must_use]
    pub const fn is_used(&self) -> bool {
        self.used
    }
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "fragment {} on {} {{", self.name, self.type_name)?;
        for field in &self.fields {
            writeln!(f, "{}{field}", indent(1))?;
        }
        f.write_str("}")
    }
}

/// All fragment candidates of a generation run, keyed by target type.
#[derive(Debug, Clone, Default)]
pub struct FragmentTable {
    fragments: Vec<Fragment>,
    by_type: HashMap<String, usize>,
}

impl FragmentTable {
    /// Registers one fragment for every non-root object type that has at least
    /// one leaf field.
    ///
    /// Names are the lower-camel type name, with `_` appended until the name
    /// matches neither a schema type nor an earlier fragment.
    #[must_use]
    #[tracing::instrument(skip(catalog))]
    pub fn build(catalog: &TypeCatalog<'_>) -> Self {
        let schema = catalog.schema();
        let mut table = Self::default();
        let mut taken: HashSet<String> = HashSet::new();

        for ty in catalog.objects() {
            if schema.is_root_type(&ty.name) {
                continue;
            }

            let fields: Vec<String> = catalog
                .leaf_fields(ty)
                .map(|field| field.name.clone())
                .collect();
            if fields.is_empty() {
                tracing::trace!(type_name = %ty.name, "No leaf fields, skipping fragment");
                continue;
            }

            let mut name = lowercase_first(&ty.name);
            while taken.contains(&name) || schema.contains_type(&name) {
                name.push('_');
            }
            taken.insert(name.clone());

            tracing::debug!(
                type_name = %ty.name,
                fragment = %name,
                leaf_fields = fields.len(),
                "Registered fragment"
            );
            table.by_type.insert(ty.name.clone(), table.fragments.len());
            table.fragments.push(Fragment {
                name,
                type_name: ty.name.clone(),
                fields,
                used: false,
            });
        }

        table
    }

    #[must_use]
    pub fn get(&self, type_name: &str) -> Option<&Fragment> {
        self.by_type.get(type_name).map(|&idx| &self.fragments[idx])
    }

    /// Flags the fragment for `type_name` as used and returns its name.
    pub fn mark_used(&mut self, type_name: &str) -> Option<&str> {
        let idx = *self.by_type.get(type_name)?;
        let fragment = &mut self.fragments[idx];
        fragment.used = true;
        Some(&fragment.name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Fragment> {
        self.fragments.iter()
    }

    /// Fragments referenced by at least one rendered selection, in type order.
    pub fn used(&self) -> impl Iterator<Item = &Fragment> {
        self.fragments.iter().filter(|fragment| fragment.used)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Schema;

    fn table(sdl: &str) -> FragmentTable {
        let schema = Schema::parse(sdl, "schema.graphql").unwrap();
        FragmentTable::build(&TypeCatalog::new(&schema))
    }

    #[test]
    fn test_fragment_per_type_with_leaf_fields() {
        let table = table(
            r"
type Query { user: User }
type User { id: ID name: String posts: [Post!]! }
type Post { author: User }
",
        );

        assert_eq!(table.len(), 1);
        let user = table.get("User").unwrap();
        assert_eq!(user.name, "user");
        assert_eq!(user.fields, vec!["id", "name"]);
        assert!(!user.is_used());
        // Post only has an object field, Query is a root type.
        assert!(table.get("Post").is_none());
        assert!(table.get("Query").is_none());
    }

    #[test]
    fn test_fragment_name_avoids_type_names_and_other_fragments() {
        let table = table(
            r"
type Query { a: user b: User c: UseR }
type user { id: ID }
type User { id: ID }
type UseR { id: ID }
",
        );

        let names: Vec<_> = table.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["user_", "user__", "useR"]);
    }

    #[test]
    fn test_custom_root_types_are_excluded() {
        let table = table(
            r"
schema { query: Root }
type Root { query: Query }
type Query { id: ID }
",
        );

        let fragment = table.get("Query").unwrap();
        assert_eq!(fragment.name, "query");
        assert!(table.get("Root").is_none());
    }

    #[test]
    fn test_mark_used_and_render() {
        let mut table = table(
            r"
type Query { user: User }
type User { id: ID name: String }
",
        );

        assert_eq!(table.mark_used("User"), Some("user"));
        assert_eq!(table.mark_used("Missing"), None);
        let used: Vec<_> = table.used().collect();
        assert_eq!(used.len(), 1);
        assert_eq!(
            used[0].to_string(),
            "fragment user on User {\n  id\n  name\n}"
        );
    }
}
