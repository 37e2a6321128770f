// Command-line overrides layered on top of the environment configuration

use crate::config::{expand_home, AppConfig};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug, Default)]
#[command(name = "inbox-sorter")]
#[command(about = "Watch an inbox folder and classify incoming PDFs with a language model")]
#[command(version)]
pub struct Args {
    /// Folder to watch for new PDFs
    #[arg(short, long)]
    pub watch: Option<PathBuf>,

    /// Category registry file (defaults to <watch>/categories.yaml)
    #[arg(short, long)]
    pub categories: Option<PathBuf>,

    /// Base URL of the OpenAI-compatible endpoint
    #[arg(long)]
    pub base_url: Option<String>,

    /// Model name sent with each request
    #[arg(short, long)]
    pub model: Option<String>,

    /// Request a single JSON completion instead of a streamed one
    #[arg(long)]
    pub no_stream: bool,

    /// Request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Debounce interval in milliseconds
    #[arg(long)]
    pub debounce_ms: Option<u64>,

    /// Report the model's answer even when it names an unknown category
    #[arg(long)]
    pub accept_unlisted: bool,

    /// Also write logs to daily files in this directory
    #[arg(long)]
    pub log_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Flags win over environment values; unset flags leave them alone.
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(folder) = &self.watch {
            config.watch.folder = expand_home(&folder.to_string_lossy());
        }
        if let Some(file) = &self.categories {
            config.watch.categories_file = Some(expand_home(&file.to_string_lossy()));
        }
        if let Some(ms) = self.debounce_ms {
            config.watch.debounce = Duration::from_millis(ms);
        }

        if let Some(url) = &self.base_url {
            config.llm.base_url = url.clone();
        }
        if let Some(model) = &self.model {
            config.llm.model = model.clone();
        }
        if self.no_stream {
            config.llm.stream = false;
        }
        if let Some(secs) = self.timeout {
            config.llm.timeout = Duration::from_secs(secs);
        }

        if self.accept_unlisted {
            config.classification.accept_unlisted = true;
        }

        if let Some(dir) = &self.log_dir {
            config.logging.log_dir = Some(expand_home(&dir.to_string_lossy()));
        }
        if self.verbose {
            config.logging.verbose = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config() {
        let args = Args::try_parse_from([
            "inbox-sorter",
            "--watch",
            "/tmp/inbox",
            "--model",
            "local-7b",
            "--no-stream",
            "--debounce-ms",
            "250",
            "--accept-unlisted",
        ])
        .unwrap();

        let mut config = AppConfig::default();
        args.apply(&mut config);

        assert_eq!(config.watch.folder, PathBuf::from("/tmp/inbox"));
        assert_eq!(config.watch.categories_path(), PathBuf::from("/tmp/inbox/categories.yaml"));
        assert_eq!(config.llm.model, "local-7b");
        assert!(!config.llm.stream);
        assert_eq!(config.watch.debounce, Duration::from_millis(250));
        assert!(config.classification.accept_unlisted);
    }

    #[test]
    fn test_log_dir_expands_home() {
        let args = Args::try_parse_from(["inbox-sorter", "--log-dir", "~/inbox-logs"]).unwrap();
        let mut config = AppConfig::default();
        args.apply(&mut config);

        let log_dir = config.logging.log_dir.unwrap();
        if let Some(home) = dirs::home_dir() {
            assert_eq!(log_dir, home.join("inbox-logs"));
            assert!(!log_dir.starts_with("~"));
        }
    }

    #[test]
    fn test_no_flags_keep_config() {
        let args = Args::try_parse_from(["inbox-sorter"]).unwrap();
        let mut config = AppConfig::default();
        config.llm.model = "from-env".to_string();
        args.apply(&mut config);

        assert_eq!(config.llm.model, "from-env");
        assert!(config.llm.stream);
        assert!(config.logging.log_dir.is_none());
    }
}
