use crate::types::{AppError, AppResult};
use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_CATEGORIES_FILE: &str = "categories.yaml";
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:1337/v1";
pub const DEFAULT_MODEL: &str = "foundation";
pub const DEFAULT_FALLBACK_CATEGORY: &str = "uncategorized";

/// Immutable runtime configuration, built once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub watch: WatchConfig,
    pub llm: LLMConfig,
    pub classification: ClassificationConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone)]
pub struct WatchConfig {
    pub folder: PathBuf,
    /// Explicit category file; defaults to `categories.yaml` inside the folder
    pub categories_file: Option<PathBuf>,
    pub debounce: Duration,
    pub max_stability_checks: u32,
}

#[derive(Debug, Clone)]
pub struct LLMConfig {
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub max_tokens: u32,
    pub temperature: Option<f32>,
    pub stream: bool,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct ClassificationConfig {
    pub max_input_chars: usize,
    pub max_pdf_pages: usize,
    pub fallback_category: String,
    /// Report model answers that match no category as-is instead of falling back
    pub accept_unlisted: bool,
}

#[derive(Debug, Clone, Default)]
pub struct LoggingConfig {
    pub log_dir: Option<PathBuf>,
    pub verbose: bool,
}

impl WatchConfig {
    pub fn categories_path(&self) -> PathBuf {
        self.categories_file
            .clone()
            .unwrap_or_else(|| self.folder.join(DEFAULT_CATEGORIES_FILE))
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            watch: WatchConfig {
                folder: default_watch_folder(),
                categories_file: None,
                debounce: Duration::from_millis(1000),
                max_stability_checks: 10,
            },
            llm: LLMConfig {
                base_url: DEFAULT_BASE_URL.to_string(),
                model: DEFAULT_MODEL.to_string(),
                api_key: None,
                max_tokens: 80,
                temperature: None,
                stream: true,
                timeout: Duration::from_secs(60),
            },
            classification: ClassificationConfig {
                max_input_chars: 8_000,
                max_pdf_pages: 10,
                fallback_category: DEFAULT_FALLBACK_CATEGORY.to_string(),
                accept_unlisted: false,
            },
            logging: LoggingConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(folder) = var("INBOX_WATCH_FOLDER") {
            config.watch.folder = expand_home(&folder);
        }
        if let Some(file) = var("INBOX_CATEGORIES") {
            config.watch.categories_file = Some(expand_home(&file));
        }
        if let Some(ms) = var("INBOX_DEBOUNCE_MS") {
            config.watch.debounce = Duration::from_millis(parse_value("INBOX_DEBOUNCE_MS", &ms)?);
        }
        if let Some(checks) = var("INBOX_MAX_STABILITY_CHECKS") {
            config.watch.max_stability_checks = parse_value("INBOX_MAX_STABILITY_CHECKS", &checks)?;
        }

        if let Some(url) = var("LLM_BASE_URL") {
            config.llm.base_url = url;
        }
        if let Some(model) = var("LLM_MODEL") {
            config.llm.model = model;
        }
        config.llm.api_key = var("LLM_API_KEY");
        if let Some(tokens) = var("LLM_MAX_TOKENS") {
            config.llm.max_tokens = parse_value("LLM_MAX_TOKENS", &tokens)?;
        }
        if let Some(temperature) = var("LLM_TEMPERATURE") {
            config.llm.temperature = Some(parse_value("LLM_TEMPERATURE", &temperature)?);
        }
        if let Some(stream) = var("LLM_STREAM") {
            config.llm.stream = parse_value("LLM_STREAM", &stream)?;
        }
        if let Some(secs) = var("LLM_TIMEOUT_SECS") {
            config.llm.timeout = Duration::from_secs(parse_value("LLM_TIMEOUT_SECS", &secs)?);
        }

        if let Some(chars) = var("INBOX_MAX_INPUT_CHARS") {
            config.classification.max_input_chars = parse_value("INBOX_MAX_INPUT_CHARS", &chars)?;
        }
        if let Some(pages) = var("INBOX_MAX_PDF_PAGES") {
            config.classification.max_pdf_pages = parse_value("INBOX_MAX_PDF_PAGES", &pages)?;
        }
        if let Some(fallback) = var("INBOX_FALLBACK_CATEGORY") {
            config.classification.fallback_category = fallback.trim().to_string();
        }
        if let Some(accept) = var("INBOX_ACCEPT_UNLISTED") {
            config.classification.accept_unlisted = parse_value("INBOX_ACCEPT_UNLISTED", &accept)?;
        }

        config.logging.log_dir = var("INBOX_LOG_DIR").map(|dir| expand_home(&dir));

        Ok(config)
    }

    /// Startup checks that must pass before the watch loop starts
    pub fn validate(&self) -> AppResult<()> {
        let folder = &self.watch.folder;
        if !folder.exists() {
            return Err(AppError::config_at(folder, "watch folder does not exist"));
        }
        if !folder.is_dir() {
            return Err(AppError::config_at(folder, "watch folder is not a directory"));
        }

        reqwest::Url::parse(&self.llm.base_url).map_err(|e| {
            AppError::config(format!("invalid LLM base URL '{}': {}", self.llm.base_url, e))
        })?;

        if self.llm.model.trim().is_empty() {
            return Err(AppError::config("LLM model must not be empty"));
        }
        if self.classification.max_input_chars == 0 {
            return Err(AppError::config("max input chars must be greater than zero"));
        }
        if self.classification.max_pdf_pages == 0 {
            return Err(AppError::config("max PDF pages must be greater than zero"));
        }
        if self.watch.max_stability_checks == 0 {
            return Err(AppError::config("max stability checks must be greater than zero"));
        }
        if self.classification.fallback_category.is_empty() {
            return Err(AppError::config("fallback category must not be empty"));
        }

        Ok(())
    }
}

fn parse_value<T>(key: &str, raw: &str) -> AppResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| AppError::config(format!("{} has invalid value '{}': {}", key, raw, e)))
}

fn default_watch_folder() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join("Desktop").join("Inbox"))
        .unwrap_or_else(|| PathBuf::from("Inbox"))
}

/// Expand a leading `~` to the home directory
pub fn expand_home(raw: &str) -> PathBuf {
    if raw == "~" {
        return dirs::home_dir().unwrap_or_else(|| PathBuf::from(raw));
    }
    match raw.strip_prefix("~/") {
        Some(rest) => match dirs::home_dir() {
            Some(home) => home.join(rest),
            None => PathBuf::from(raw),
        },
        None => Path::new(raw).to_path_buf(),
    }
}
