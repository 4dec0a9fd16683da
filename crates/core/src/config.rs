//! Configuration management for the costbot client.
//!
//! Configuration is layered, later sources winning:
//! - Built-in defaults
//! - Config file (`.costbot/config.yaml` or `COSTBOT_CONFIG`)
//! - Environment variables
//! - Command-line flags (`with_overrides`)
//!
//! Everything is read once at process start; there is no runtime
//! reconfiguration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

/// Foundation model used when nothing else is configured.
pub const DEFAULT_MODEL_ID: &str = "anthropic.claude-3-sonnet-20240229-v1:0";

/// Region used for the model ARN and the service clients by default.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Instruction appended verbatim to every query so that lists render as
/// markdown lists.
pub const DEFAULT_FORMAT_SUFFIX: &str = ".  If there is a list of steps or a list of bullet points, make sure there are two NEWLINE characters before the first point.";

/// Suffix that turns a source object key into its metadata side-car key.
pub const DEFAULT_METADATA_SUFFIX: &str = ".metadata.json";

/// Number of retrieved passages requested per query.
pub const DEFAULT_NUMBER_OF_RESULTS: u32 = 5;

/// Connect and read timeout for remote calls, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Upper bound the service accepts for `numberOfResults`.
const MAX_NUMBER_OF_RESULTS: u32 = 100;

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Directory used to locate `.costbot/config.yaml`
    pub workspace: PathBuf,

    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// Knowledge base backing the generation call
    pub knowledge_base_id: Option<String>,

    /// Foundation model identifier
    pub model_id: String,

    /// Region for the model ARN and the service clients
    pub region: String,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,

    /// Request shaping and transport settings
    pub retrieval: RetrievalSettings,
}

/// Per-request defaults of the generate-with-retrieval call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalSettings {
    /// Result-count cap sent with every query
    pub number_of_results: u32,

    /// Literal suffix appended to the query text
    pub format_suffix: String,

    /// Suffix of the metadata side-car next to each source object
    pub metadata_suffix: String,

    pub connect_timeout_secs: u64,

    pub read_timeout_secs: u64,
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self {
            number_of_results: DEFAULT_NUMBER_OF_RESULTS,
            format_suffix: DEFAULT_FORMAT_SUFFIX.to_string(),
            metadata_suffix: DEFAULT_METADATA_SUFFIX.to_string(),
            connect_timeout_secs: DEFAULT_TIMEOUT_SECS,
            read_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Full configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    knowledge_base: Option<KnowledgeBaseSection>,
    model: Option<ModelSection>,
    retrieval: Option<RetrievalSection>,
    logging: Option<LoggingSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct KnowledgeBaseSection {
    id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ModelSection {
    id: Option<String>,
    region: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RetrievalSection {
    number_of_results: Option<u32>,
    format_suffix: Option<String>,
    metadata_suffix: Option<String>,
    connect_timeout_secs: Option<u64>,
    read_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoggingSection {
    level: Option<String>,
    color: Option<bool>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            workspace: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            config_file: None,
            knowledge_base_id: None,
            model_id: DEFAULT_MODEL_ID.to_string(),
            region: DEFAULT_REGION.to_string(),
            log_level: None,
            verbose: false,
            no_color: false,
            retrieval: RetrievalSettings::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables, the config file and
    /// defaults.
    ///
    /// Environment variables:
    /// - `COSTBOT_WORKSPACE`: Override workspace path
    /// - `COSTBOT_CONFIG`: Path to config file
    /// - `AME_KB_ID`: Knowledge base identifier
    /// - `COSTBOT_MODEL`: Model identifier
    /// - `COSTBOT_REGION`, then `AWS_REGION`, then `AWS_DEFAULT_REGION`
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    ///
    /// # Example
    /// ```no_run
    /// use costbot_core::config::AppConfig;
    ///
    /// let config = AppConfig::load().expect("Failed to load config");
    /// println!("Region: {}", config.region);
    /// ```
    pub fn load() -> AppResult<Self> {
        Self::load_with(None, None)
    }

    /// Like [`AppConfig::load`], with the workspace and config file already
    /// chosen by the caller (e.g. from command-line flags).
    pub fn load_with(workspace: Option<PathBuf>, config_file: Option<PathBuf>) -> AppResult<Self> {
        let mut config = Self::default();

        if let Ok(workspace) = std::env::var("COSTBOT_WORKSPACE") {
            config.workspace = PathBuf::from(workspace);
        }
        if let Some(workspace) = workspace {
            config.workspace = workspace;
        }

        if let Ok(config_file) = std::env::var("COSTBOT_CONFIG") {
            config.config_file = Some(PathBuf::from(config_file));
        }
        if let Some(config_file) = config_file {
            config.config_file = Some(config_file);
        }

        if !config.workspace.exists() {
            return Err(AppError::Config(format!(
                "Workspace directory does not exist: {:?}",
                config.workspace
            )));
        }

        let config_path = match config.config_file {
            Some(ref cf) => cf.clone(),
            None => config.costbot_dir().join("config.yaml"),
        };

        if config_path.exists() {
            config = config.merge_yaml(&config_path)?;
        } else if config.config_file.is_some() {
            return Err(AppError::Config(format!(
                "Config file does not exist: {:?}",
                config_path
            )));
        }

        // Environment variables override YAML config
        if let Ok(kb_id) = std::env::var("AME_KB_ID") {
            config.knowledge_base_id = Some(kb_id);
        }

        if let Ok(model) = std::env::var("COSTBOT_MODEL") {
            config.model_id = model;
        }

        if let Some(region) = ["COSTBOT_REGION", "AWS_REGION", "AWS_DEFAULT_REGION"]
            .iter()
            .find_map(|var| std::env::var(var).ok())
        {
            config.region = region;
        }

        if let Ok(level) = std::env::var("RUST_LOG") {
            config.log_level = Some(level);
        }

        if std::env::var("NO_COLOR").is_ok() {
            config.no_color = true;
        }

        Ok(config)
    }

    /// Merge YAML configuration file into this config.
    fn merge_yaml(&self, path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config_file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        let mut result = self.clone();

        if let Some(id) = config_file.knowledge_base.and_then(|kb| kb.id) {
            result.knowledge_base_id = Some(id);
        }

        if let Some(model) = config_file.model {
            if let Some(id) = model.id {
                result.model_id = id;
            }
            if let Some(region) = model.region {
                result.region = region;
            }
        }

        if let Some(retrieval) = config_file.retrieval {
            let settings = &mut result.retrieval;
            if let Some(n) = retrieval.number_of_results {
                settings.number_of_results = n;
            }
            if let Some(suffix) = retrieval.format_suffix {
                settings.format_suffix = suffix;
            }
            if let Some(suffix) = retrieval.metadata_suffix {
                settings.metadata_suffix = suffix;
            }
            if let Some(secs) = retrieval.connect_timeout_secs {
                settings.connect_timeout_secs = secs;
            }
            if let Some(secs) = retrieval.read_timeout_secs {
                settings.read_timeout_secs = secs;
            }
        }

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
        }

        tracing::debug!("Merged config file {:?}", path);
        Ok(result)
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// Command-line flags take precedence over environment variables and
    /// the config file.
    pub fn with_overrides(
        mut self,
        knowledge_base_id: Option<String>,
        model_id: Option<String>,
        region: Option<String>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(id) = knowledge_base_id {
            self.knowledge_base_id = Some(id);
        }

        if let Some(model_id) = model_id {
            self.model_id = model_id;
        }

        if let Some(region) = region {
            self.region = region;
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            // Verbose mode implies debug logging
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Get the path to the .costbot directory.
    pub fn costbot_dir(&self) -> PathBuf {
        self.workspace.join(".costbot")
    }

    /// The knowledge base id, or a configuration error naming how to set it.
    pub fn require_knowledge_base_id(&self) -> AppResult<&str> {
        self.knowledge_base_id.as_deref().ok_or_else(|| {
            AppError::Config(
                "No knowledge base configured. Set AME_KB_ID or knowledgeBase.id in the config file."
                    .to_string(),
            )
        })
    }

    /// Validate configuration before contacting the service.
    pub fn validate(&self) -> AppResult<()> {
        self.require_knowledge_base_id()?;

        if self.model_id.trim().is_empty() {
            return Err(AppError::Config("Model identifier is empty".to_string()));
        }

        if self.region.trim().is_empty() {
            return Err(AppError::Config("Region identifier is empty".to_string()));
        }

        let n = self.retrieval.number_of_results;
        if n == 0 || n > MAX_NUMBER_OF_RESULTS {
            return Err(AppError::Config(format!(
                "numberOfResults must be between 1 and {}, got {}",
                MAX_NUMBER_OF_RESULTS, n
            )));
        }

        if self.retrieval.connect_timeout_secs == 0 || self.retrieval.read_timeout_secs == 0 {
            return Err(AppError::Config(
                "Connect and read timeouts must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn configured() -> AppConfig {
        AppConfig {
            knowledge_base_id: Some("KB123".to_string()),
            ..AppConfig::default()
        }
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.model_id, DEFAULT_MODEL_ID);
        assert_eq!(config.region, "us-east-1");
        assert_eq!(config.retrieval.number_of_results, 5);
        assert_eq!(config.retrieval.metadata_suffix, ".metadata.json");
        assert_eq!(config.retrieval.connect_timeout_secs, 120);
        assert!(config.knowledge_base_id.is_none());
        assert!(!config.verbose);
    }

    #[test]
    fn test_costbot_dir() {
        let config = AppConfig::default();
        assert!(config.costbot_dir().ends_with(".costbot"));
    }

    #[test]
    fn test_with_overrides() {
        let overridden = AppConfig::default().with_overrides(
            Some("KB999".to_string()),
            Some("anthropic.claude-instant-v1".to_string()),
            Some("eu-west-1".to_string()),
            None,
            true,
            false,
        );

        assert_eq!(overridden.knowledge_base_id.as_deref(), Some("KB999"));
        assert_eq!(overridden.model_id, "anthropic.claude-instant-v1");
        assert_eq!(overridden.region, "eu-west-1");
        assert!(overridden.verbose);
        assert_eq!(overridden.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_merge_yaml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "knowledgeBase:\n  id: KBFILE\nmodel:\n  region: us-west-2\nretrieval:\n  numberOfResults: 8\n  readTimeoutSecs: 30\nlogging:\n  color: false\n"
        )
        .unwrap();

        let merged = AppConfig::default().merge_yaml(file.path()).unwrap();
        assert_eq!(merged.knowledge_base_id.as_deref(), Some("KBFILE"));
        assert_eq!(merged.region, "us-west-2");
        assert_eq!(merged.model_id, DEFAULT_MODEL_ID);
        assert_eq!(merged.retrieval.number_of_results, 8);
        assert_eq!(merged.retrieval.read_timeout_secs, 30);
        assert_eq!(merged.retrieval.connect_timeout_secs, 120);
        assert_eq!(merged.retrieval.format_suffix, DEFAULT_FORMAT_SUFFIX);
        assert!(merged.no_color);
    }

    #[test]
    fn test_merge_yaml_rejects_invalid_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "retrieval: [not, a, map]").unwrap();
        assert!(AppConfig::default().merge_yaml(file.path()).is_err());
    }

    #[test]
    fn test_validate_requires_knowledge_base() {
        assert!(AppConfig::default().validate().is_err());
        assert!(configured().validate().is_ok());
    }

    #[test]
    fn test_validate_result_cap() {
        let mut config = configured();
        config.retrieval.number_of_results = 0;
        assert!(config.validate().is_err());

        config.retrieval.number_of_results = 101;
        assert!(config.validate().is_err());

        config.retrieval.number_of_results = 100;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_timeouts() {
        let mut config = configured();
        config.retrieval.read_timeout_secs = 0;
        assert!(config.validate().is_err());
    }
}
