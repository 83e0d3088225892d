use crate::domain::model::{BackendSettings, LlmSettings, TimetableDefaults};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{CatalystError, Result};
use crate::utils::validation::{
    parse_clock_time, validate_non_empty_string, validate_range, validate_required_field,
    validate_url, Validate,
};
use std::str::FromStr;

/// Configuration for the serverless runtime, read only from environment
/// variables. The hosted backend is mandatory here since nothing in memory
/// survives between invocations.
#[derive(Debug, Clone, PartialEq)]
pub struct LambdaConfig {
    pub llm: LlmSettings,
    pub backend: BackendSettings,
    pub timetable: TimetableDefaults,
    pub catalog_path: Option<String>,
}

impl LambdaConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let url = lookup("SUPABASE_URL");
        let service_key = lookup("SUPABASE_SERVICE_ROLE_KEY");
        validate_required_field("SUPABASE_URL", &url)?;
        validate_required_field("SUPABASE_SERVICE_ROLE_KEY", &service_key)?;

        let mut llm = LlmSettings {
            api_key: lookup("OPENAI_API_KEY"),
            ..LlmSettings::default()
        };
        if let Some(base_url) = lookup("OPENAI_BASE_URL") {
            llm.base_url = base_url;
        }
        if let Some(model) = lookup("MENTOR_MODEL") {
            llm.mentor_model = model;
        }
        if let Some(model) = lookup("RECOMMEND_MODEL") {
            llm.recommend_model = model;
        }
        if let Some(model) = lookup("ROADMAP_MODEL") {
            llm.roadmap_model = model;
        }
        llm.max_retries = parse_or("LLM_MAX_RETRIES", &lookup, llm.max_retries)?;

        let mut backend = BackendSettings {
            url,
            service_key,
            ..BackendSettings::default()
        };
        backend.timeout_seconds =
            parse_or("BACKEND_TIMEOUT_SECONDS", &lookup, backend.timeout_seconds)?;

        let mut timetable = TimetableDefaults::default();
        timetable.break_minutes = parse_or("BREAK_MINUTES", &lookup, timetable.break_minutes)?;
        timetable.session_minutes =
            parse_or("SESSION_MINUTES", &lookup, timetable.session_minutes)?;
        if let Some(start) = lookup("START_TIME") {
            timetable.start_time = start;
        }

        Ok(Self {
            llm,
            backend,
            timetable,
            catalog_path: lookup("CATALOG_PATH"),
        })
    }
}

fn parse_or<T: FromStr>(
    name: &str,
    lookup: &impl Fn(&str) -> Option<String>,
    default: T,
) -> Result<T> {
    match lookup(name) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| CatalystError::InvalidConfigValueError {
                field: name.to_string(),
                value: raw.clone(),
                reason: "Expected a non-negative integer".to_string(),
            }),
    }
}

impl ConfigProvider for LambdaConfig {
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
        self.catalog_path.as_deref()
    }
}

impl Validate for LambdaConfig {
    fn validate(&self) -> Result<()> {
        let url = validate_required_field("SUPABASE_URL", &self.backend.url)?;
        validate_url("SUPABASE_URL", url)?;
        let key = validate_required_field("SUPABASE_SERVICE_ROLE_KEY", &self.backend.service_key)?;
        validate_non_empty_string("SUPABASE_SERVICE_ROLE_KEY", key)?;

        validate_url("OPENAI_BASE_URL", &self.llm.base_url)?;
        validate_range("LLM_MAX_RETRIES", self.llm.max_retries, 0, 10)?;
        validate_range("BREAK_MINUTES", self.timetable.break_minutes, 0, 120)?;
        validate_range("SESSION_MINUTES", self.timetable.session_minutes, 1, 600)?;
        parse_clock_time("START_TIME", &self.timetable.start_time)?;

        tracing::info!("✅ Lambda configuration validation passed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_reads_environment() {
        let config = LambdaConfig::from_lookup(env(&[
            ("SUPABASE_URL", "https://project.supabase.co"),
            ("SUPABASE_SERVICE_ROLE_KEY", "service"),
            ("OPENAI_API_KEY", "sk-test"),
            ("MENTOR_MODEL", "gpt-4o"),
            ("SESSION_MINUTES", "60"),
        ]))
        .unwrap();

        assert_eq!(config.llm().api_key(), Some("sk-test"));
        assert_eq!(config.llm().mentor_model, "gpt-4o");
        assert_eq!(config.timetable_defaults().session_minutes, 60);
        assert_eq!(config.timetable_defaults().break_minutes, 15);
        assert!(config.catalog_path().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_backend_is_required() {
        let err = LambdaConfig::from_lookup(env(&[("OPENAI_API_KEY", "sk-test")])).unwrap_err();
        assert!(matches!(err, CatalystError::MissingConfigError { field } if field == "SUPABASE_URL"));
    }

    #[test]
    fn test_bad_number_is_rejected() {
        let err = LambdaConfig::from_lookup(env(&[
            ("SUPABASE_URL", "https://project.supabase.co"),
            ("SUPABASE_SERVICE_ROLE_KEY", "service"),
            ("LLM_MAX_RETRIES", "many"),
        ]))
        .unwrap_err();
        assert!(matches!(err, CatalystError::InvalidConfigValueError { .. }));
    }

    #[test]
    fn test_validation_catches_bad_url() {
        let config = LambdaConfig::from_lookup(env(&[
            ("SUPABASE_URL", "not a url"),
            ("SUPABASE_SERVICE_ROLE_KEY", "service"),
        ]))
        .unwrap();
        assert!(config.validate().is_err());
    }
}
