//! Resolution of command-line arguments against the config file.

use anyhow::{Context, Result};
use graphql_autoquery::DEFAULT_MAX_DEPTH;
use graphql_autoquery_config::{AutoqueryConfig, SchemaConfig};
use std::path::PathBuf;
use std::time::Duration;

/// Default timeout in seconds for introspection requests.
const DEFAULT_TIMEOUT: u64 = 30;

/// Where the schema is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaSource {
    File(PathBuf),
    Remote(RemoteSettings),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteSettings {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub timeout: Duration,
    pub retry: u32,
}

/// Settings for one run, after CLI flags are laid over the config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub source: SchemaSource,
    pub depth: usize,
    pub output: Option<PathBuf>,
}

/// Values taken from the command line. `None` means "not given".
#[derive(Debug, Default)]
pub struct Overrides {
    pub schema: Option<String>,
    pub depth: Option<usize>,
    pub output: Option<PathBuf>,
    pub headers: Vec<(String, String)>,
    pub timeout: Option<u64>,
    pub retry: Option<u32>,
}

impl Settings {
    /// Combines CLI overrides with an optional config file.
    ///
    /// A schema given on the command line replaces the configured one
    /// entirely, including its request settings.
    pub fn resolve(overrides: Overrides, config: Option<AutoqueryConfig>) -> Result<Self> {
        let config = config.unwrap_or_default();

        let schema = match overrides.schema {
            Some(location) => SchemaConfig::Path(location),
            None => config.schema.context(
                "No schema given. Pass a schema file or URL, or set `schema` in .autoqueryrc",
            )?,
        };

        let remote = schema.is_remote();
        let source = match schema {
            SchemaConfig::Path(location) if remote => {
                SchemaSource::Remote(RemoteSettings {
                    url: location,
                    headers: overrides.headers,
                    timeout: Duration::from_secs(overrides.timeout.unwrap_or(DEFAULT_TIMEOUT)),
                    retry: overrides.retry.unwrap_or(0),
                })
            }
            SchemaConfig::Path(location) => SchemaSource::File(PathBuf::from(location)),
            SchemaConfig::Introspection(introspection) => {
                let mut headers: Vec<(String, String)> = introspection
                    .headers
                    .unwrap_or_default()
                    .into_iter()
                    .collect();
                headers.sort();

                // CLI headers replace configured ones of the same name
                for (name, value) in overrides.headers {
                    headers.retain(|(n, _)| !n.eq_ignore_ascii_case(&name));
                    headers.push((name, value));
                }

                SchemaSource::Remote(RemoteSettings {
                    url: introspection.url,
                    headers,
                    timeout: Duration::from_secs(
                        overrides
                            .timeout
                            .or(introspection.timeout)
                            .unwrap_or(DEFAULT_TIMEOUT),
                    ),
                    retry: overrides.retry.or(introspection.retry).unwrap_or(0),
                })
            }
        };

        Ok(Self {
            source,
            depth: overrides.depth.or(config.depth).unwrap_or(DEFAULT_MAX_DEPTH),
            output: overrides.output.or(config.output),
        })
    }
}

/// Parses a header string in "Name: Value" format.
pub fn parse_header(header: &str) -> Result<(String, String), String> {
    let (name, value) = header.split_once(':').ok_or_else(|| {
        format!("Invalid header format: '{header}'. Expected 'Header-Name: Header-Value'")
    })?;
    let name = name.trim();
    if name.is_empty() {
        return Err("Header name cannot be empty".to_string());
    }
    Ok((name.to_string(), value.trim().to_string()))
}
