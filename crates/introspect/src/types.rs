//! Serde model of an introspection response.
//!
//! Only the parts the generator consumes are modelled: root type names, and
//! each type's kind, fields, arguments and type references. Everything else in
//! the response (descriptions, directives, deprecation data) is ignored.

use crate::{IntrospectionError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Top-level GraphQL response to the introspection query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntrospectionResponse {
    pub data: Option<IntrospectionData>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ResponseError>,
}

impl IntrospectionResponse {
    /// The `__schema` payload, or an error when the server returned none.
    pub fn schema(&self) -> Result<&IntrospectionSchema> {
        if let Some(data) = &self.data {
            return Ok(&data.schema);
        }
        let messages: Vec<&str> = self.errors.iter().map(|e| e.message.as_str()).collect();
        Err(IntrospectionError::Invalid(if messages.is_empty() {
            "response has no data".to_string()
        } else {
            messages.join("; ")
        }))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseError {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntrospectionData {
    #[serde(rename = "__schema")]
    pub schema: IntrospectionSchema,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntrospectionSchema {
    pub query_type: Option<IntrospectionTypeName>,
    pub mutation_type: Option<IntrospectionTypeName>,
    pub subscription_type: Option<IntrospectionTypeName>,
    pub types: Vec<IntrospectionType>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntrospectionTypeName {
    pub name: String,
}

/// A named type from `__schema.types`.
///
/// `fields` is only populated for objects and interfaces.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntrospectionType {
    pub kind: TypeKind,
    pub name: String,
    #[serde(default)]
    pub fields: Option<Vec<IntrospectionField>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntrospectionField {
    pub name: String,
    #[serde(default)]
    pub args: Vec<IntrospectionInputValue>,
    #[serde(rename = "type")]
    pub type_ref: IntrospectionTypeRef,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntrospectionInputValue {
    pub name: String,
    #[serde(rename = "type")]
    pub type_ref: IntrospectionTypeRef,
}

/// A possibly wrapped type reference (`ofType` chain).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntrospectionTypeRef {
    pub kind: TypeKind,
    pub name: Option<String>,
    pub of_type: Option<Box<IntrospectionTypeRef>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TypeKind {
    Scalar,
    Object,
    Interface,
    Union,
    Enum,
    InputObject,
    List,
    NonNull,
}

impl fmt::Display for IntrospectionTypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.kind, &self.of_type) {
            (TypeKind::NonNull, Some(inner)) => write!(f, "{inner}!"),
            (TypeKind::List, Some(inner)) => write!(f, "[{inner}]"),
            _ => f.write_str(self.name.as_deref().unwrap_or_default()),
        }
    }
}
