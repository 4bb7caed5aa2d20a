//! The introspection query sent to remote endpoints.

use crate::{IntrospectionClient, IntrospectionResponse, Result};

/// Introspection query covering what operation generation needs: root type
/// names and every type's fields, arguments and wrapped type references.
///
/// Type references nest seven `ofType` levels, enough for `[[[String!]!]!]`.
pub const INTROSPECTION_QUERY: &str = r"
query IntrospectionQuery {
  __schema {
    queryType { name }
    mutationType { name }
    subscriptionType { name }
    types {
      kind
      name
      fields(includeDeprecated: true) {
        name
        args {
          name
          type {
            ...TypeRef
          }
        }
        type {
          ...TypeRef
        }
      }
    }
  }
}

fragment TypeRef on __Type {
  kind
  name
  ofType {
    kind
    name
    ofType {
      kind
      name
      ofType {
        kind
        name
        ofType {
          kind
          name
          ofType {
            kind
            name
            ofType {
              kind
              name
              ofType {
                kind
                name
              }
            }
          }
        }
      }
    }
  }
}
";

/// Executes the introspection query against `url` with default client settings.
///
/// # Examples
///
/// ```no_run
/// # use graphql_introspect::execute_introspection;
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let response = execute_introspection("https://api.example.com/graphql").await?;
/// println!("Schema has {} types", response.schema()?.types.len());
/// # Ok(())
/// # }
/// ```
pub async fn execute_introspection(url: &str) -> Result<IntrospectionResponse> {
    IntrospectionClient::new().execute(url).await
}
