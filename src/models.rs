use crate::types::AppError;
use std::fmt;
use std::path::{Path, PathBuf};

/// How a model answer related to the loaded categories
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The answer named a registered category
    Matched,
    /// Unknown answer reported as-is (`accept_unlisted`)
    Unlisted,
    /// Unknown answer replaced by the fallback category
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationResult {
    pub category: String,
    pub raw_answer: String,
    pub resolution: Resolution,
}

#[derive(Debug)]
pub enum FileOutcome {
    Classified(ClassificationResult),
    Failed(AppError),
    /// The file never settled (still growing, empty, or removed)
    Skipped(String),
}

/// One console line per processed file
#[derive(Debug)]
pub struct FileReport {
    pub path: PathBuf,
    pub outcome: FileOutcome,
}

impl FileReport {
    pub fn new(path: &Path, outcome: FileOutcome) -> Self {
        Self {
            path: path.to_path_buf(),
            outcome,
        }
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    pub fn category(&self) -> Option<&str> {
        match &self.outcome {
            FileOutcome::Classified(result) => Some(&result.category),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&AppError> {
        match &self.outcome {
            FileOutcome::Failed(err) => Some(err),
            _ => None,
        }
    }
}

impl fmt::Display for FileReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            FileOutcome::Classified(result) => {
                write!(f, "File categorized: {} -> {}", self.file_name(), result.category)
            }
            FileOutcome::Failed(err) => write!(f, "[ERROR] {}: {}", self.file_name(), err),
            FileOutcome::Skipped(reason) => write!(f, "[SKIP] {}: {}", self.file_name(), reason),
        }
    }
}
