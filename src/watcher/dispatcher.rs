// Per-file dispatch: Idle -> Debouncing -> Processing -> Idle
// Failures become report lines; nothing here stops the watch loop.

use super::stability::{FileStat, FsStat};
use super::WatchedEvent;
use crate::categories::CategoryRegistry;
use crate::classify::{interpret, ClassificationClient, PromptBuilder};
use crate::config::{AppConfig, ClassificationConfig};
use crate::documents::TextExtractor;
use crate::llm::provider::LLMAdapter;
use crate::models::{ClassificationResult, FileOutcome, FileReport};
use crate::types::{AppError, AppResult};
use std::collections::HashMap;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::{debug, info, trace, warn};

const PDF_CONTENT_TYPE: &str = "application/pdf";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchState {
    Idle,
    Debouncing { path: PathBuf, checks: u32 },
    Processing { path: PathBuf },
}

pub struct Dispatcher {
    registry: Arc<CategoryRegistry>,
    extractor: Arc<dyn TextExtractor>,
    client: ClassificationClient,
    prompt_builder: PromptBuilder,
    stat: Arc<dyn FileStat>,
    policy: ClassificationConfig,
    debounce: Duration,
    max_stability_checks: u32,
    state: DispatchState,
    last_seen: HashMap<PathBuf, Instant>,
}

impl Dispatcher {
    pub fn new(
        config: &AppConfig,
        registry: Arc<CategoryRegistry>,
        extractor: Arc<dyn TextExtractor>,
        llm: Arc<dyn LLMAdapter>,
    ) -> Self {
        Self {
            registry,
            extractor,
            client: ClassificationClient::new(llm, &config.llm),
            prompt_builder: PromptBuilder::new(config.classification.max_input_chars),
            stat: Arc::new(FsStat),
            policy: config.classification.clone(),
            debounce: config.watch.debounce,
            max_stability_checks: config.watch.max_stability_checks.max(1),
            state: DispatchState::Idle,
            last_seen: HashMap::new(),
        }
    }

    pub fn with_stat(mut self, stat: Arc<dyn FileStat>) -> Self {
        self.stat = stat;
        self
    }

    pub fn state(&self) -> &DispatchState {
        &self.state
    }

    /// Handle one event. `None` when the event is ignored.
    pub async fn dispatch(&mut self, event: WatchedEvent) -> Option<FileReport> {
        let path = event.path;
        if !is_pdf_candidate(&path) {
            trace!(path = %path.display(), "Ignoring non-PDF event");
            return None;
        }

        let now = Instant::now();
        let debounce = self.debounce;
        self.last_seen.retain(|_, seen| now.duration_since(*seen) < debounce);
        if self.last_seen.contains_key(&path) {
            debug!(path = %path.display(), "Duplicate event within debounce window");
            return None;
        }
        self.last_seen.insert(path.clone(), now);

        let outcome = match self.await_stable(&path).await {
            Ok(()) => {
                self.state = DispatchState::Processing { path: path.clone() };
                match self.run_pipeline(&path).await {
                    Ok(result) => FileOutcome::Classified(result),
                    Err(e) => {
                        warn!(path = %path.display(), error = %e, "Processing failed");
                        FileOutcome::Failed(e)
                    }
                }
            }
            Err(reason) => {
                warn!(path = %path.display(), %reason, "Skipping file");
                FileOutcome::Skipped(reason)
            }
        };

        // Events queued while this file was processed are duplicates
        self.last_seen.insert(path.clone(), Instant::now());
        self.state = DispatchState::Idle;
        Some(FileReport::new(&path, outcome))
    }

    /// Drain events until the channel closes or `shutdown` resolves.
    /// An in-flight file is abandoned on shutdown.
    pub async fn run<F, R>(mut self, mut events: mpsc::Receiver<WatchedEvent>, shutdown: F, mut report: R)
    where
        F: Future<Output = ()>,
        R: FnMut(&FileReport),
    {
        tokio::pin!(shutdown);

        loop {
            let event = tokio::select! {
                _ = &mut shutdown => break,
                event = events.recv() => match event {
                    Some(event) => event,
                    None => break,
                },
            };

            tokio::select! {
                _ = &mut shutdown => break,
                handled = self.dispatch(event) => {
                    if let Some(file_report) = handled {
                        report(&file_report);
                    }
                }
            }
        }

        info!("Watch loop stopped");
    }

    /// Wait until two snapshots one debounce apart agree on a non-empty file
    async fn await_stable(&mut self, path: &Path) -> Result<(), String> {
        let mut previous = self
            .stat
            .snapshot(path)
            .map_err(|e| format!("file is not readable: {}", e))?;

        for check in 1..=self.max_stability_checks {
            self.state = DispatchState::Debouncing {
                path: path.to_path_buf(),
                checks: check,
            };
            tokio::time::sleep(self.debounce).await;

            let current = self
                .stat
                .snapshot(path)
                .map_err(|e| format!("file disappeared while waiting: {}", e))?;
            if current == previous && !current.is_empty() {
                debug!(path = %path.display(), checks = check, bytes = current.len, "File is stable");
                return Ok(());
            }
            previous = current;
        }

        Err(format!(
            "file did not settle after {} checks",
            self.max_stability_checks
        ))
    }

    async fn run_pipeline(&self, path: &Path) -> AppResult<ClassificationResult> {
        let extractor = Arc::clone(&self.extractor);
        let owned = path.to_path_buf();
        let document = tokio::task::spawn_blocking(move || extractor.extract(&owned))
            .await
            .map_err(|e| AppError::extraction(format!("extraction task failed: {}", e)))??;

        if !document.has_text() {
            return Err(AppError::extraction("no extractable text found"));
        }

        let file_name = file_name(path);
        let prompt = self
            .prompt_builder
            .build(&file_name, &document.text, &self.registry);
        if prompt.truncated {
            info!(
                "Truncating input for {} to {} characters",
                file_name,
                self.prompt_builder.max_input_chars()
            );
        }
        debug!(prompt = %prompt.text, "Classification prompt");

        let answer = self.client.classify(&prompt).await?;
        debug!(file = %file_name, answer = %answer, "Model answered");
        Ok(interpret(&answer, &self.registry, &self.policy))
    }
}

/// PDF by content type, and not a hidden or temporary dotfile
pub fn is_pdf_candidate(path: &Path) -> bool {
    // Raw bytes, so names that are not valid UTF-8 still qualify
    let hidden = match path.file_name() {
        Some(name) => name.as_encoded_bytes().first() == Some(&b'.'),
        None => return false,
    };
    if hidden {
        return false;
    }
    mime_guess::from_path(path).first_raw() == Some(PDF_CONTENT_TYPE)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
