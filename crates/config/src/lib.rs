//! Configuration for `autoquery`.
//!
//! A project may carry a `.autoqueryrc` file (YAML or JSON) naming the schema
//! source, the output file and the selection depth. [`find_config`] discovers
//! it by walking up from a directory; [`load_config`] parses and validates it.

mod config;
mod error;
mod loader;

pub use config::{AutoqueryConfig, IntrospectionSchemaConfig, SchemaConfig};
pub use error::{ConfigError, Result};
pub use loader::{find_config, load_config, load_config_from_str};
