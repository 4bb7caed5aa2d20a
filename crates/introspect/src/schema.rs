//! Conversion of introspection results into the generator's schema model.

use crate::types::{
    IntrospectionField, IntrospectionResponse, IntrospectionTypeName, IntrospectionTypeRef,
    TypeKind,
};
use crate::{IntrospectionError, Result};
use graphql_autoquery::{ArgumentDef, FieldDef, Schema, TypeDef, TypeRef};

const BUILTIN_SCALARS: &[&str] = &["Int", "Float", "String", "Boolean", "ID"];

/// Builds a [`Schema`] from an introspection response.
///
/// Introspection types (`__*`) and built-in scalars are skipped, matching what
/// SDL parsing produces for the same schema.
#[tracing::instrument(skip(response))]
pub fn introspection_to_schema(response: &IntrospectionResponse) -> Result<Schema> {
    let introspected = response.schema()?;
    let mut builder = Schema::builder();

    for ty in &introspected.types {
        if ty.name.starts_with("__") || BUILTIN_SCALARS.contains(&ty.name.as_str()) {
            continue;
        }

        let kind = named_kind(ty.kind).ok_or_else(|| {
            IntrospectionError::Invalid(format!("type {} has wrapper kind {:?}", ty.name, ty.kind))
        })?;
        let fields = ty
            .fields
            .iter()
            .flatten()
            .map(convert_field)
            .collect::<Result<Vec<_>>>()?;

        builder = builder.with_type(TypeDef {
            name: ty.name.clone(),
            kind,
            fields,
        });
    }

    let root = |ty: Option<&IntrospectionTypeName>| ty.map(|t| t.name.clone());
    let schema = builder
        .query_type(root(introspected.query_type.as_ref()))
        .mutation_type(root(introspected.mutation_type.as_ref()))
        .subscription_type(root(introspected.subscription_type.as_ref()))
        .build();

    tracing::debug!(types = schema.types().count(), "Converted introspection result");
    Ok(schema)
}

fn named_kind(kind: TypeKind) -> Option<graphql_autoquery::TypeKind> {
    use graphql_autoquery::TypeKind as Kind;
    match kind {
        TypeKind::Scalar => Some(Kind::Scalar),
        TypeKind::Object => Some(Kind::Object),
        TypeKind::Interface => Some(Kind::Interface),
        TypeKind::Union => Some(Kind::Union),
        TypeKind::Enum => Some(Kind::Enum),
        TypeKind::InputObject => Some(Kind::InputObject),
        TypeKind::List | TypeKind::NonNull => None,
    }
}

fn convert_field(field: &IntrospectionField) -> Result<FieldDef> {
    let arguments = field
        .args
        .iter()
        .map(|arg| {
            Ok(ArgumentDef {
                name: arg.name.clone(),
                ty: convert_type_ref(&arg.type_ref)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(FieldDef {
        name: field.name.clone(),
        arguments,
        ty: convert_type_ref(&field.type_ref)?,
    })
}

fn convert_type_ref(type_ref: &IntrospectionTypeRef) -> Result<TypeRef> {
    let inner = || {
        type_ref
            .of_type
            .as_deref()
            .ok_or_else(|| {
                IntrospectionError::Invalid(format!("{:?} type without ofType", type_ref.kind))
            })
            .and_then(convert_type_ref)
    };

    match type_ref.kind {
        TypeKind::NonNull => Ok(TypeRef::non_null(inner()?)),
        TypeKind::List => Ok(TypeRef::list(inner()?)),
        _ => type_ref
            .name
            .clone()
            .map(TypeRef::Named)
            .ok_or_else(|| {
                IntrospectionError::Invalid("named type reference without a name".to_string())
            }),
    }
}
