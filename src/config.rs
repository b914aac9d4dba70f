//! Configuration management for LexiCompare using the prefer crate.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::export::DEFAULT_CSV_FILENAME;
use crate::extract::{ContentExtractor, DEFAULT_MAX_PDF_PAGES};
use crate::services::DEFAULT_WORKERS;
use crate::session::SessionOptions;
use crate::terms::{TermFilter, Tokenizer};

/// File name written by `config init`.
pub const DEFAULT_CONFIG_FILENAME: &str = "lexicompare.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Failed to parse YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Term extraction settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TermsConfig {
    /// Minimum term length in characters.
    #[serde(default = "default_min_length")]
    pub min_length: usize,
    /// Drop purely numeric tokens.
    #[serde(default = "default_true")]
    pub drop_numeric: bool,
}

impl Default for TermsConfig {
    fn default() -> Self {
        Self {
            min_length: default_min_length(),
            drop_numeric: true,
        }
    }
}

/// Comparison settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompareConfig {
    /// Scan the master file too.
    #[serde(default = "default_true")]
    pub include_master: bool,
    /// Files scanned concurrently.
    #[serde(default = "default_workers")]
    pub workers: usize,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            include_master: true,
            workers: default_workers(),
        }
    }
}

/// Export settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// CSV file name used when no path is given. May start with `~`.
    #[serde(default = "default_export_filename")]
    pub filename: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            filename: default_export_filename(),
        }
    }
}

/// Extraction settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractConfig {
    /// PDF pages read per document.
    #[serde(default = "default_max_pdf_pages")]
    pub max_pdf_pages: usize,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            max_pdf_pages: default_max_pdf_pages(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_min_length() -> usize {
    TermFilter::default().min_length
}

fn default_workers() -> usize {
    DEFAULT_WORKERS
}

fn default_export_filename() -> String {
    DEFAULT_CSV_FILENAME.to_string()
}

fn default_max_pdf_pages() -> usize {
    DEFAULT_MAX_PDF_PAGES
}

/// Configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub terms: TermsConfig,
    #[serde(default)]
    pub compare: CompareConfig,
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub extract: ExtractConfig,
    /// Path to the config file this was loaded from (not serialized).
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration using prefer crate for discovery.
    /// Automatically discovers lexicompare config files in standard locations.
    pub async fn load() -> Self {
        match prefer::load("lexicompare").await {
            Ok(pref_config) => {
                if let Some(path) = pref_config.source_path() {
                    match Self::load_from_path(path).await {
                        Ok(config) => config,
                        Err(e) => {
                            tracing::warn!("Ignoring config {}: {}", path.display(), e);
                            Self::default_with_env()
                        }
                    }
                } else {
                    Self::default_with_env()
                }
            }
            Err(_) => {
                // No config file found, use defaults with env overrides
                Self::default_with_env()
            }
        }
    }

    /// Create a default config with environment variable overrides applied.
    pub fn default_with_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Load configuration from a specific file path.
    /// Supports TOML and YAML by extension; anything else is read as JSON.
    pub async fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = tokio::fs::read_to_string(path).await?;
        let mut config = Self::parse(&contents, path)?;
        config.source_path = Some(path.to_path_buf());
        Ok(config.with_env_overrides())
    }

    fn parse(contents: &str, path: &Path) -> Result<Self, ConfigError> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");
        let config = match ext {
            "toml" => toml::from_str(contents)?,
            "yaml" | "yml" => serde_yaml::from_str(contents)?,
            _ => serde_json::from_str(contents)?,
        };
        Ok(config)
    }

    /// Apply `LEXI_WORKERS` and `LEXI_INCLUDE_MASTER` from the environment.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    fn with_overrides_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup("LEXI_WORKERS").filter(|s| !s.is_empty()) {
            match raw.trim().parse::<usize>() {
                Ok(workers) if workers > 0 => {
                    tracing::debug!("Using LEXI_WORKERS from environment: {}", workers);
                    self.compare.workers = workers;
                }
                _ => tracing::warn!("Ignoring invalid LEXI_WORKERS value {:?}", raw),
            }
        }

        if let Some(raw) = lookup("LEXI_INCLUDE_MASTER").filter(|s| !s.is_empty()) {
            match parse_flag(&raw) {
                Some(include) => self.compare.include_master = include,
                None => tracing::warn!("Ignoring invalid LEXI_INCLUDE_MASTER value {:?}", raw),
            }
        }

        self
    }

    /// Get the base directory for resolving relative paths.
    /// Returns the config file's parent directory if available, otherwise None.
    pub fn base_dir(&self) -> Option<PathBuf> {
        self.source_path
            .as_ref()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
    }

    /// Resolve a path that may be relative to `base_dir`, expanding `~`.
    pub fn resolve_path(&self, path_str: &str, base_dir: &Path) -> PathBuf {
        let expanded = shellexpand::tilde(path_str);
        let path = Path::new(expanded.as_ref());

        if path.is_absolute() {
            path.to_path_buf()
        } else {
            base_dir.join(path)
        }
    }

    /// Where the CSV export goes when no path is given.
    pub fn export_path(&self, cwd: &Path) -> PathBuf {
        self.resolve_path(&self.export.filename, cwd)
    }

    pub fn term_filter(&self) -> TermFilter {
        TermFilter {
            min_length: self.terms.min_length,
            drop_numeric: self.terms.drop_numeric,
        }
    }

    pub fn tokenizer(&self) -> Tokenizer {
        Tokenizer::new(self.term_filter())
    }

    pub fn extractor(&self) -> ContentExtractor {
        ContentExtractor::new().with_max_pdf_pages(self.extract.max_pdf_pages)
    }

    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            include_master: self.compare.include_master,
            workers: self.compare.workers.max(1),
        }
    }

    /// Serialize as TOML for `config init`.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
