//! Schema acquisition, generation and output.

use crate::settings::{RemoteSettings, SchemaSource, Settings};
use anyhow::{Context, Result};
use graphql_autoquery::{compose, Generator, GeneratorOptions, Schema};
use graphql_introspect::IntrospectionClient;
use std::fs;
use std::path::Path;

/// Counts reported after a successful run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub operations: usize,
    pub fragments: usize,
}

/// The generated document and what it contains.
#[derive(Debug)]
pub struct Output {
    pub document: String,
    pub summary: Summary,
}

/// Loads the schema and renders the document.
#[tracing::instrument(skip_all, fields(depth = settings.depth))]
pub async fn run(settings: &Settings) -> Result<Output> {
    let schema = load_schema(&settings.source).await?;

    let options = GeneratorOptions::with_max_depth(settings.depth);
    let mut generator = Generator::new(&schema, options)?;
    let operations = generator.operations();
    let fragments = generator.fragments();
    let document = compose(fragments, &operations);

    let summary = Summary {
        operations: operations.len(),
        fragments: fragments.used().count(),
    };
    tracing::info!(
        operations = summary.operations,
        fragments = summary.fragments,
        "Generated document"
    );
    Ok(Output { document, summary })
}

async fn load_schema(source: &SchemaSource) -> Result<Schema> {
    match source {
        SchemaSource::File(path) => read_schema_file(path),
        SchemaSource::Remote(remote) => fetch_schema(remote).await,
    }
}

fn read_schema_file(path: &Path) -> Result<Schema> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("Failed to read schema file {}", path.display()))?;
    let schema = Schema::parse(&source, path)
        .with_context(|| format!("Failed to load schema from {}", path.display()))?;
    Ok(schema)
}

async fn fetch_schema(remote: &RemoteSettings) -> Result<Schema> {
    let client = IntrospectionClient::new()
        .with_headers(remote.headers.iter().cloned())
        .with_timeout(remote.timeout)
        .with_retries(remote.retry);

    client
        .fetch_schema(&remote.url)
        .await
        .with_context(|| format!("Failed to fetch schema from {}", remote.url))
}

/// Writes the document to `path`, creating missing parent directories.
pub fn write_document(path: &Path, document: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    fs::write(path, document).with_context(|| format!("Failed to write to {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const SCHEMA: &str = r"
type Query {
  user(id: ID!): User
  ping: String
}

type Mutation {
  rename(id: ID!, name: String!): User
}

type User {
  id: ID!
  name: String
}
";

    fn settings(source: SchemaSource) -> Settings {
        Settings {
            source,
            depth: 2,
            output: None,
        }
    }

    #[tokio::test]
    async fn test_run_with_schema_file() {
        let dir = tempfile::tempdir().unwrap();
        let schema_path = dir.path().join("schema.graphql");
        fs::write(&schema_path, SCHEMA).unwrap();

        let output = run(&settings(SchemaSource::File(schema_path)))
            .await
            .unwrap();
        assert_eq!(
            output.summary,
            Summary {
                operations: 3,
                fragments: 1
            }
        );
        assert!(output.document.starts_with("fragment user on User {"));
        assert!(output
            .document
            .contains("mutation Rename(\n  $id: ID!,\n  $name: String!\n)"));
    }

    #[tokio::test]
    async fn test_missing_schema_file() {
        let err = run(&settings(SchemaSource::File(PathBuf::from(
            "/nonexistent/schema.graphql",
        ))))
        .await
        .unwrap_err();
        assert!(err.to_string().contains("Failed to read schema file"));
    }

    #[tokio::test]
    async fn test_invalid_schema_file() {
        let dir = tempfile::tempdir().unwrap();
        let schema_path = dir.path().join("schema.graphql");
        fs::write(&schema_path, "type Query {").unwrap();

        let err = run(&settings(SchemaSource::File(schema_path)))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Failed to load schema"));
    }

    #[test]
    fn test_write_document_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("generated").join("operations.graphql");

        write_document(&path, "query Ping {\n  ping\n}\n").unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "query Ping {\n  ping\n}\n"
        );
    }
}
