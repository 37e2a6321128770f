// Document text extraction

pub mod pdf;

pub use pdf::*;

use crate::types::AppResult;
use std::path::{Path, PathBuf};

/// Text pulled out of one incoming file. Never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedDocument {
    pub path: PathBuf,
    pub text: String,
    pub pages_read: usize,
    pub total_pages: usize,
}

impl ExtractedDocument {
    pub fn has_text(&self) -> bool {
        !self.text.trim().is_empty()
    }
}

/// Blocking text extraction; the dispatcher runs it on a blocking worker.
pub trait TextExtractor: Send + Sync {
    fn extract(&self, path: &Path) -> AppResult<ExtractedDocument>;
}
