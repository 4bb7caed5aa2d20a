use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Contents of an `.autoqueryrc` file.
///
/// ```yaml
/// schema: schema.graphql
/// output: generated/operations.graphql
/// depth: 3
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoqueryConfig {
    /// Where the schema comes from. May be left out when it is always passed
    /// on the command line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<SchemaConfig>,

    /// File the document is written to. Stdout when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,

    /// Maximum selection depth.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depth: Option<usize>,
}

impl AutoqueryConfig {
    /// Resolves relative file paths against `dir`, the directory holding the
    /// config file. URLs are left alone.
    #[must_use]
    pub fn relative_to(mut self, dir: &Path) -> Self {
        if let Some(SchemaConfig::Path(path)) = &mut self.schema {
            if !SchemaConfig::is_url(path) && Path::new(path.as_str()).is_relative() {
                *path = dir.join(path.as_str()).to_string_lossy().into_owned();
            }
        }
        if let Some(output) = &mut self.output {
            if output.is_relative() {
                *output = dir.join(&*output);
            }
        }
        self
    }
}

/// Schema source configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SchemaConfig {
    /// SDL file path, or an endpoint URL introspected with default settings
    Path(String),
    /// Introspection of a remote endpoint with request settings
    Introspection(IntrospectionSchemaConfig),
}

/// Configuration for introspecting a remote GraphQL endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntrospectionSchemaConfig {
    pub url: String,

    /// HTTP headers sent with the introspection request (e.g., for authentication)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<HashMap<String, String>>,

    /// Request timeout in seconds (default: 30)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,

    /// Number of retry attempts on failure (default: 0)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry: Option<u32>,
}

impl SchemaConfig {
    /// Whether the schema has to be fetched over HTTP.
    #[must_use]
    pub fn is_remote(&self) -> bool {
        match self {
            Self::Path(path) => Self::is_url(path),
            Self::Introspection(_) => true,
        }
    }

    /// The endpoint URL, or the file path for local schemas.
    #[must_use]
    pub fn location(&self) -> &str {
        match self {
            Self::Path(path) => path,
            Self::Introspection(config) => &config.url,
        }
    }

    #[must_use]
    pub const fn introspection_config(&self) -> Option<&IntrospectionSchemaConfig> {
        match self {
            Self::Introspection(config) => Some(config),
            Self::Path(_) => None,
        }
    }

    pub(crate) fn is_url(location: &str) -> bool {
        location.starts_with("http://") || location.starts_with("https://")
    }
}
