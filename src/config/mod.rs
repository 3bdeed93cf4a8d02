use std::env;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::graph::builder::SelfLoopPolicy;
use crate::graph::layout::LayoutOptions;

pub const CONFIG_FILE_NAME: &str = "prereqmap.toml";
pub const CONFIG_ENV_VAR: &str = "PREREQMAP_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    ConfigNotFound(PathBuf),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config at {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub build: BuildConfig,
    #[serde(default)]
    pub layout: LayoutOptions,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PathsConfig {
    #[serde(default = "default_raw_csv")]
    pub raw_csv: PathBuf,
    #[serde(default = "default_formatted_csv")]
    pub formatted_csv: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            raw_csv: default_raw_csv(),
            formatted_csv: default_formatted_csv(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    #[serde(default = "default_catalog_url")]
    pub url: String,
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            url: default_catalog_url(),
            max_pages: default_max_pages(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BuildConfig {
    #[serde(default)]
    pub self_loops: SelfLoopPolicy,
}

/// Loads configuration from an explicit path, the `PREREQMAP_CONFIG` env
/// var, or a `prereqmap.toml` found by walking up from the current
/// directory. Absent all three, defaults apply.
pub fn load(path: Option<PathBuf>) -> Result<Config> {
    if let Some(path) = path {
        return load_file(&path);
    }

    if let Ok(path) = env::var(CONFIG_ENV_VAR) {
        return load_file(Path::new(&path));
    }

    let cwd = env::current_dir()?;
    for ancestor in cwd.ancestors() {
        let candidate = ancestor.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            return load_file(&candidate);
        }
    }

    Ok(Config::default())
}

fn load_file(path: &Path) -> Result<Config> {
    if !path.is_file() {
        return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
    }

    let contents = std::fs::read_to_string(path)?;
    toml::from_str(&contents).map_err(|source| ConfigError::Toml {
        path: path.to_path_buf(),
        source,
    })
}

fn default_raw_csv() -> PathBuf {
    PathBuf::from("data/raw_courses.csv")
}

fn default_formatted_csv() -> PathBuf {
    PathBuf::from("data/courses.csv")
}

fn default_catalog_url() -> String {
    "https://www.mcgill.ca/study/2024-2025/courses/search".to_string()
}

fn default_max_pages() -> usize {
    200
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::builder::SelfLoopPolicy;

    #[test]
    fn defaults_apply_when_sections_missing() {
        let config: Config = toml::from_str("").expect("parse empty config");
        assert_eq!(config.paths.formatted_csv, default_formatted_csv());
        assert_eq!(config.fetch.max_pages, default_max_pages());
        assert_eq!(config.build.self_loops, SelfLoopPolicy::Warn);
        assert_eq!(config.layout.max_rows, 10);
    }

    #[test]
    fn sections_override_defaults() {
        let config: Config = toml::from_str(
            r#"
[paths]
formatted_csv = "out/formatted.csv"

[fetch]
url = "https://example.edu/courses"
max_pages = 3

[build]
self_loops = "reject"

[layout]
max_rows = 4
x_increment = 100.0
y_increment = 40.0
"#,
        )
        .expect("parse config");
        assert_eq!(
            config.paths.formatted_csv,
            PathBuf::from("out/formatted.csv")
        );
        assert_eq!(config.fetch.url, "https://example.edu/courses");
        assert_eq!(config.fetch.max_pages, 3);
        assert_eq!(config.build.self_loops, SelfLoopPolicy::Reject);
        assert_eq!(config.layout.max_rows, 4);
        assert_eq!(config.layout.y_increment, 40.0);
    }
}
