//! Schema acquisition over GraphQL introspection.
//!
//! Sends the introspection query to a remote endpoint and converts the result
//! into the [`graphql_autoquery::Schema`] model, so operations can be generated
//! for servers whose SDL is not at hand.
//!
//! # Examples
//!
//! ```no_run
//! use graphql_autoquery::{generate_from_schema, GeneratorOptions};
//! use graphql_introspect::introspect_url;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let schema = introspect_url("https://api.example.com/graphql").await?;
//!     let document = generate_from_schema(&schema, &GeneratorOptions::default())?;
//!     println!("{document}");
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod query;
mod schema;
mod types;

pub use client::IntrospectionClient;
pub use error::{IntrospectionError, Result};
pub use query::{execute_introspection, INTROSPECTION_QUERY};
pub use schema::introspection_to_schema;
pub use types::*;

/// Introspects `url` with default client settings and returns its schema.
#[tracing::instrument]
pub async fn introspect_url(url: &str) -> Result<graphql_autoquery::Schema> {
    tracing::info!("Starting introspection");
    let schema = IntrospectionClient::new().fetch_schema(url).await?;
    tracing::info!(types = schema.types().count(), "Introspection complete");
    Ok(schema)
}
