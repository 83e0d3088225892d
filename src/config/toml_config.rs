use crate::domain::model::{BackendSettings, LlmSettings, TimetableDefaults};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{CatalystError, Result};
use crate::utils::validation::{
    parse_clock_time, validate_non_empty_string, validate_path, validate_positive_number,
    validate_range, validate_url, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CONFIG_FILE: &str = "catalyst.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub backend: BackendSettings,
    pub llm: LlmSettings,
    pub timetable: TimetableDefaults,
    pub catalog: CatalogConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// JSON file replacing the bundled directory data.
    pub path: Option<String>,
}

impl AppConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = Self::substitute_env_vars(content)?;

        toml::from_str(&processed).map_err(|e| CatalystError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Explicit path, then `catalyst.toml` in the working directory, then
    /// built-in defaults. Secrets missing from the file come from the
    /// environment.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let config = match path {
            Some(path) => {
                tracing::info!("📁 Loading configuration from {}", path);
                Self::from_file(path)?
            }
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                tracing::info!("📁 Loading configuration from {}", DEFAULT_CONFIG_FILE);
                Self::from_file(DEFAULT_CONFIG_FILE)?
            }
            None => {
                tracing::debug!("No configuration file, using defaults");
                Self::default()
            }
        };

        Ok(config.with_env_fallbacks(|name| std::env::var(name).ok()))
    }

    /// 替換環境變數 (例如 ${OPENAI_API_KEY})；未設定的變數替換為空字串
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| CatalystError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| {
                tracing::warn!("Environment variable {} is not set", var_name);
                String::new()
            })
        });

        Ok(result.into_owned())
    }

    /// Fills blank secrets from `OPENAI_API_KEY`, `SUPABASE_URL` and
    /// `SUPABASE_SERVICE_ROLE_KEY`.
    pub fn with_env_fallbacks(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let blank = |value: &Option<String>| value.as_deref().map_or(true, |v| v.trim().is_empty());

        if blank(&self.llm.api_key) {
            self.llm.api_key = lookup("OPENAI_API_KEY");
        }
        if blank(&self.backend.url) {
            self.backend.url = lookup("SUPABASE_URL");
        }
        if blank(&self.backend.service_key) {
            self.backend.service_key = lookup("SUPABASE_SERVICE_ROLE_KEY");
        }
        self
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl ConfigProvider for AppConfig {
    fn llm(&self) -> &LlmSettings {
        &self.llm
    }

    fn backend(&self) -> &BackendSettings {
        &self.backend
    }

    fn timetable_defaults(&self) -> &TimetableDefaults {
        &self.timetable
    }

    fn catalog_path(&self) -> Option<&str> {
        self.catalog.path.as_deref()
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("server.host", &self.server.host)?;
        validate_positive_number("server.port", usize::from(self.server.port), 1)?;

        validate_url("llm.base_url", &self.llm.base_url)?;
        validate_non_empty_string("llm.mentor_model", &self.llm.mentor_model)?;
        validate_non_empty_string("llm.recommend_model", &self.llm.recommend_model)?;
        validate_non_empty_string("llm.roadmap_model", &self.llm.roadmap_model)?;
        validate_range("llm.max_retries", self.llm.max_retries, 0, 10)?;
        validate_range("llm.timeout_seconds", self.llm.timeout_seconds, 1, 600)?;

        if let Some(url) = self.backend.url.as_deref().filter(|u| !u.trim().is_empty()) {
            validate_url("backend.url", url)?;
        }
        validate_range("backend.timeout_seconds", self.backend.timeout_seconds, 1, 600)?;

        validate_range("timetable.break_minutes", self.timetable.break_minutes, 0, 120)?;
        validate_range("timetable.session_minutes", self.timetable.session_minutes, 1, 600)?;
        parse_clock_time("timetable.start_time", &self.timetable.start_time)?;

        if let Some(path) = &self.catalog.path {
            validate_path("catalog.path", path)?;
        }

        tracing::debug!("✅ Configuration validation passed");
        Ok(())
    }
}
