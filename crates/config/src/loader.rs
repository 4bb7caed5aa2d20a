use crate::{AutoqueryConfig, ConfigError, Result, SchemaConfig};
use std::fs;
use std::path::{Path, PathBuf};

/// Config file names to search for, in order of preference
const CONFIG_FILES: &[&str] = &[
    ".autoqueryrc.yml",
    ".autoqueryrc.yaml",
    ".autoqueryrc.json",
    ".autoqueryrc",
    "autoquery.config.yml",
    "autoquery.config.yaml",
    "autoquery.config.json",
];

/// Find a config file by walking up the directory tree from `start_dir`.
#[tracing::instrument(fields(start = %start_dir.display()))]
pub fn find_config(start_dir: &Path) -> Result<Option<PathBuf>> {
    let mut current_dir = start_dir.to_path_buf();
    let mut checked_dirs = 0;

    loop {
        tracing::trace!(dir = %current_dir.display(), "Checking directory for config files");
        for file_name in CONFIG_FILES {
            let config_path = current_dir.join(file_name);
            if config_path.is_file() {
                tracing::info!(path = %config_path.display(), checked_dirs, "Found config file");
                return Ok(Some(config_path));
            }
        }

        checked_dirs += 1;
        if !current_dir.pop() {
            tracing::debug!(checked_dirs, "No config file found");
            break;
        }
    }

    Ok(None)
}

/// Load a config from `path`, detecting the format from the file name.
///
/// Relative paths inside the file are resolved against its directory.
#[tracing::instrument(fields(path = %path.display()))]
pub fn load_config(path: &Path) -> Result<AutoqueryConfig> {
    tracing::debug!("Reading config file");
    let contents = fs::read_to_string(path)?;
    let config = load_config_from_str(&contents, path)?;
    let config = match path.parent() {
        Some(dir) => config.relative_to(dir),
        None => config,
    };
    tracing::info!(
        schema = config.schema.as_ref().map(SchemaConfig::location),
        depth = config.depth,
        "Config loaded successfully"
    );
    Ok(config)
}

/// Load a config from a string.
/// The path is used for error messages and format detection.
#[tracing::instrument(skip(contents), fields(path = %path.display(), size = contents.len()))]
pub fn load_config_from_str(contents: &str, path: &Path) -> Result<AutoqueryConfig> {
    let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or("");
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("");

    tracing::debug!(extension, file_name, "Detecting config format");

    let config = match extension {
        "yml" | "yaml" => parse_yaml(contents, path)?,
        "json" => parse_json(contents, path)?,
        // .autoqueryrc without extension - try YAML first, then JSON
        "" if file_name == ".autoqueryrc" => {
            parse_yaml(contents, path).or_else(|_| parse_json(contents, path))?
        }
        _ => return Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
    };

    validate_config(&config, path)?;
    Ok(config)
}

fn parse_yaml(contents: &str, path: &Path) -> Result<AutoqueryConfig> {
    serde_saphyr::from_str(contents).map_err(|e| ConfigError::Invalid {
        path: path.to_path_buf(),
        message: format!("YAML parse error: {e}"),
    })
}

fn parse_json(contents: &str, path: &Path) -> Result<AutoqueryConfig> {
    serde_json::from_str(contents).map_err(|e| ConfigError::Invalid {
        path: path.to_path_buf(),
        message: format!("JSON parse error: {e}"),
    })
}

fn validate_config(config: &AutoqueryConfig, path: &Path) -> Result<()> {
    let invalid = |message: &str| ConfigError::Invalid {
        path: path.to_path_buf(),
        message: message.to_string(),
    };

    match &config.schema {
        Some(SchemaConfig::Path(schema)) if schema.trim().is_empty() => {
            return Err(invalid("schema path is empty"));
        }
        Some(SchemaConfig::Introspection(introspection)) if introspection.url.trim().is_empty() => {
            return Err(invalid("schema url is empty"));
        }
        _ => {}
    }

    if config.depth == Some(0) {
        return Err(invalid("depth must be at least 1"));
    }

    if config
        .output
        .as_ref()
        .is_some_and(|output| output.as_os_str().is_empty())
    {
        return Err(invalid("output path is empty"));
    }

    tracing::debug!("Config validation passed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(suffix: &str, contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::with_suffix(suffix).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_yaml() {
        let file = write_config(
            ".yml",
            r"
schema: schema.graphql
output: generated/operations.graphql
depth: 3
",
        );

        let config = load_config(file.path()).unwrap();
        let dir = file.path().parent().unwrap();
        assert_eq!(
            config.schema,
            Some(SchemaConfig::Path(
                dir.join("schema.graphql").to_string_lossy().into_owned()
            ))
        );
        assert_eq!(config.output, Some(dir.join("generated/operations.graphql")));
        assert_eq!(config.depth, Some(3));
    }

    #[test]
    fn test_load_json() {
        let file = write_config(".json", r#"{ "schema": "https://api.example.com/graphql" }"#);

        let config = load_config(file.path()).unwrap();
        let schema = config.schema.unwrap();
        assert!(schema.is_remote());
        assert_eq!(schema.location(), "https://api.example.com/graphql");
        assert_eq!(config.depth, None);
    }

    #[test]
    fn test_load_introspection_config() {
        let yaml = r"
schema:
  url: https://api.example.com/graphql
  headers:
    Authorization: Bearer token
  timeout: 60
  retry: 2
";
        let config = load_config_from_str(yaml, Path::new(".autoqueryrc.yml")).unwrap();
        let introspection = config.schema.as_ref().unwrap().introspection_config().unwrap();
        assert_eq!(introspection.url, "https://api.example.com/graphql");
        assert_eq!(
            introspection.headers.as_ref().unwrap().get("Authorization"),
            Some(&"Bearer token".to_string())
        );
        assert_eq!(introspection.timeout, Some(60));
        assert_eq!(introspection.retry, Some(2));
    }

    #[test]
    fn test_extensionless_rc_accepts_yaml_and_json() {
        let path = Path::new(".autoqueryrc");
        let yaml = load_config_from_str("depth: 4", path).unwrap();
        assert_eq!(yaml.depth, Some(4));

        let json = load_config_from_str(r#"{"depth": 5}"#, path).unwrap();
        assert_eq!(json.depth, Some(5));
    }

    #[test]
    fn test_unsupported_format() {
        let result = load_config_from_str("depth = 3", Path::new("autoquery.config.toml"));
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_validation_empty_schema() {
        let result = load_config_from_str(r#"schema: """#, Path::new(".autoqueryrc.yml"));
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn test_validation_zero_depth() {
        let err = load_config_from_str(r#"{"depth": 0}"#, Path::new("autoquery.config.json"))
            .unwrap_err();
        assert!(err.to_string().contains("depth must be at least 1"));
    }

    #[test]
    fn test_parse_error_is_reported() {
        let err = load_config_from_str("{ depth: ", Path::new(".autoqueryrc.json")).unwrap_err();
        assert!(err.to_string().contains("JSON parse error"));
    }

    #[test]
    fn test_find_config_in_parent_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = temp_dir.path().join(".autoqueryrc.yml");
        fs::write(&config_path, "schema: schema.graphql").unwrap();

        let sub_dir = temp_dir.path().join("subdir");
        fs::create_dir(&sub_dir).unwrap();

        assert_eq!(find_config(temp_dir.path()).unwrap(), Some(config_path.clone()));
        assert_eq!(find_config(&sub_dir).unwrap(), Some(config_path));
    }

    #[test]
    fn test_find_config_not_found() {
        let temp_dir = tempfile::tempdir().unwrap();
        assert_eq!(find_config(temp_dir.path()).unwrap(), None);
    }

    #[test]
    fn test_config_file_priority() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::write(temp_dir.path().join(".autoqueryrc.yml"), "depth: 1").unwrap();
        fs::write(
            temp_dir.path().join("autoquery.config.json"),
            r#"{"depth": 2}"#,
        )
        .unwrap();

        let found = find_config(temp_dir.path()).unwrap().unwrap();
        assert_eq!(found.file_name().unwrap(), ".autoqueryrc.yml");
    }
}
