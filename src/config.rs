//! Run configuration loaded from a comma-separated key/value file.
//!
//! ```text
//! # key,value
//! package_name,APP
//! repository_url,deps.txt
//! test_repo_mode,true
//! max_depth,4
//! ```

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::parser::{is_valid_package_name, BareLinePolicy, ParseOptions};

/// Traversal depth used when `max_depth` is not configured.
pub const DEFAULT_MAX_DEPTH: usize = 3;

/// Largest accepted traversal depth.
///
/// Depth-bounded traversal explores paths, not nodes, so its cost grows
/// exponentially with depth on graphs with high fan-out.
pub const MAX_DEPTH_LIMIT: usize = 64;

const REQUIRED_KEYS: [&str; 3] = ["package_name", "repository_url", "test_repo_mode"];

/// Errors that can occur while loading a configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("Failed to read configuration {}: {source}", .path.display())]
    Io {
        /// Path of the configuration file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// One or more required keys are absent.
    #[error("Missing required parameters: {}", .0.join(", "))]
    MissingParameters(Vec<String>),

    /// A key has a value that does not validate.
    #[error("Invalid value '{value}' for '{key}': {reason}")]
    InvalidValue {
        /// Offending key
        key: String,
        /// Offending value
        value: String,
        /// Why it was rejected
        reason: String,
    },
}

/// Result type alias for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Where dependency declarations come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceMode {
    /// `repository_url` is the path of a local declaration file.
    LocalFile,
    /// `repository_url` names a remote registry.
    Remote,
}

impl fmt::Display for SourceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceMode::LocalFile => write!(f, "local file"),
            SourceMode::Remote => write!(f, "remote"),
        }
    }
}

/// Validated run configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Root package to analyze
    pub package_name: String,
    /// Declaration file path, or registry location in remote mode
    pub repository_url: String,
    /// Source of dependency data
    pub source_mode: SourceMode,
    /// Traversal depth bound
    pub max_depth: usize,
    /// Treatment of lines without a separator
    pub bare_lines: BareLinePolicy,
}

impl Config {
    /// Loads and validates a configuration file.
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Parses and validates configuration text.
    ///
    /// # Example
    ///
    /// ```
    /// use loadorder::config::{Config, SourceMode};
    ///
    /// let config = Config::parse(
    ///     "package_name,APP\nrepository_url,deps.txt\ntest_repo_mode,true",
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(config.package_name, "APP");
    /// assert_eq!(config.source_mode, SourceMode::LocalFile);
    /// assert_eq!(config.max_depth, 3);
    /// ```
    pub fn parse(content: &str) -> ConfigResult<Self> {
        let values = read_pairs(content);

        let missing: Vec<String> = REQUIRED_KEYS
            .iter()
            .filter(|key| !values.contains_key(**key))
            .map(|key| key.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(ConfigError::MissingParameters(missing));
        }

        let get = |key: &str| values.get(key).map(String::as_str).unwrap_or_default();

        Ok(Self {
            package_name: validate_package_name(get("package_name"))?,
            repository_url: validate_repository_url(get("repository_url"))?,
            source_mode: validate_source_mode(get("test_repo_mode"))?,
            max_depth: match values.get("max_depth") {
                Some(value) => validate_max_depth(value)?,
                None => DEFAULT_MAX_DEPTH,
            },
            bare_lines: match values.get("bare_lines") {
                Some(value) => value
                    .parse::<BareLinePolicy>()
                    .map_err(|reason| invalid("bare_lines", value, reason))?,
                None => BareLinePolicy::default(),
            },
        })
    }

    /// Returns the declaration file path in local-file mode.
    pub fn local_path(&self) -> Option<&Path> {
        match self.source_mode {
            SourceMode::LocalFile => Some(Path::new(&self.repository_url)),
            SourceMode::Remote => None,
        }
    }

    /// Returns the parser options implied by this configuration.
    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions::with_bare_lines(self.bare_lines)
    }
}

/// Collects `key,value` pairs; later keys override earlier ones.
fn read_pairs(content: &str) -> HashMap<String, String> {
    let mut values = HashMap::new();

    for line in content.lines() {
        let mut fields = line.split(',');
        let (Some(key), Some(value)) = (fields.next(), fields.next()) else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() || key.starts_with('#') {
            continue;
        }
        if !is_known_key(key) {
            debug!(key, "ignoring unknown configuration key");
            continue;
        }
        values.insert(key.to_string(), value.trim().to_string());
    }

    values
}

fn is_known_key(key: &str) -> bool {
    REQUIRED_KEYS.contains(&key) || key == "max_depth" || key == "bare_lines"
}

fn invalid(key: &str, value: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

/// Validates the root package name.
pub fn validate_package_name(value: &str) -> ConfigResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(invalid("package_name", value, "package name cannot be empty"));
    }
    if !is_valid_package_name(value) {
        return Err(invalid(
            "package_name",
            value,
            "package names use uppercase letters A-Z only",
        ));
    }
    Ok(value.to_string())
}

/// Validates the repository location.
pub fn validate_repository_url(value: &str) -> ConfigResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(invalid("repository_url", value, "repository URL cannot be empty"));
    }
    Ok(value.to_string())
}

/// Validates the `test_repo_mode` flag.
pub fn validate_source_mode(value: &str) -> ConfigResult<SourceMode> {
    match value.trim().to_lowercase().as_str() {
        "true" => Ok(SourceMode::LocalFile),
        "false" => Ok(SourceMode::Remote),
        _ => Err(invalid("test_repo_mode", value, "expected 'true' or 'false'")),
    }
}

/// Validates a traversal depth: a positive integer no larger than
/// [`MAX_DEPTH_LIMIT`].
pub fn validate_max_depth(value: &str) -> ConfigResult<usize> {
    let depth: usize = value
        .trim()
        .parse()
        .map_err(|_| invalid("max_depth", value, "expected a positive integer"))?;
    if depth == 0 {
        return Err(invalid("max_depth", value, "expected a positive integer"));
    }
    if depth > MAX_DEPTH_LIMIT {
        return Err(invalid(
            "max_depth",
            value,
            format!("must not exceed {}", MAX_DEPTH_LIMIT),
        ));
    }
    Ok(depth)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
# analysis settings
package_name,APP
repository_url, deps.txt
test_repo_mode,TRUE
package_version,1.0.0
max_depth,5
";

    #[test]
    fn test_parse_full_config() {
        let config = Config::parse(SAMPLE).unwrap();

        assert_eq!(config.package_name, "APP");
        assert_eq!(config.repository_url, "deps.txt");
        assert_eq!(config.source_mode, SourceMode::LocalFile);
        assert_eq!(config.max_depth, 5);
        assert_eq!(config.bare_lines, BareLinePolicy::Declare);
        assert_eq!(config.local_path(), Some(Path::new("deps.txt")));
    }

    #[test]
    fn test_missing_parameters_reported_together() {
        let err = Config::parse("package_name,APP").unwrap_err();

        match err {
            ConfigError::MissingParameters(keys) => {
                assert_eq!(keys, vec!["repository_url", "test_repo_mode"]);
            }
            other => panic!("expected missing parameters, got {other:?}"),
        }
    }

    #[test]
    fn test_short_rows_and_comments_skipped() {
        let config = Config::parse(concat!(
            "package_name\n",
            "#max_depth,9\n",
            "package_name,LIB\n",
            "repository_url,x\n",
            "test_repo_mode,false\n",
        ))
        .unwrap();

        assert_eq!(config.package_name, "LIB");
        assert_eq!(config.max_depth, DEFAULT_MAX_DEPTH);
        assert_eq!(config.source_mode, SourceMode::Remote);
        assert!(config.local_path().is_none());
    }

    #[test]
    fn test_later_key_overrides() {
        let config = Config::parse(
            "package_name,A\npackage_name,B\nrepository_url,x\ntest_repo_mode,true",
        )
        .unwrap();
        assert_eq!(config.package_name, "B");
    }

    #[test]
    fn test_bare_lines_option() {
        let config = Config::parse(
            "package_name,A\nrepository_url,x\ntest_repo_mode,true\nbare_lines,ignore",
        )
        .unwrap();

        assert_eq!(config.bare_lines, BareLinePolicy::Ignore);
        assert_eq!(config.parse_options().bare_lines, BareLinePolicy::Ignore);
    }

    #[test]
    fn test_validate_max_depth() {
        assert_eq!(validate_max_depth("3").unwrap(), 3);
        assert_eq!(validate_max_depth(" 64 ").unwrap(), 64);
        assert!(validate_max_depth("0").is_err());
        assert!(validate_max_depth("-1").is_err());
        assert!(validate_max_depth("deep").is_err());
        assert!(validate_max_depth("65").is_err());
    }

    #[test]
    fn test_validate_source_mode() {
        assert_eq!(validate_source_mode("true").unwrap(), SourceMode::LocalFile);
        assert_eq!(validate_source_mode("False").unwrap(), SourceMode::Remote);
        assert!(validate_source_mode("yes").is_err());
    }

    #[test]
    fn test_validate_package_name() {
        assert_eq!(validate_package_name(" APP ").unwrap(), "APP");
        assert!(validate_package_name("").is_err());
        assert!(validate_package_name("serde").is_err());
    }

    #[test]
    fn test_invalid_value_display() {
        let err = validate_source_mode("maybe").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid value 'maybe' for 'test_repo_mode': expected 'true' or 'false'"
        );
    }

    #[test]
    fn test_empty_repository_url_rejected() {
        let err =
            Config::parse("package_name,A\nrepository_url, \ntest_repo_mode,true").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue { ref key, .. } if key == "repository_url"
        ));
    }
}
