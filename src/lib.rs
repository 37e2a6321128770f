// Inbox Sorter - watches a folder and classifies incoming PDFs with a language model

pub mod config;
pub mod types;
pub mod models;
pub mod categories;
pub mod documents;  // Text extraction (PDF via lopdf)
pub mod classify;   // Prompt construction and answer interpretation
pub mod llm;
pub mod watcher;    // Folder notifications, debounce and dispatch
pub mod cli;
pub mod utils;

// Re-exports for convenience
pub use config::AppConfig;
pub use types::{AppError, AppResult};
