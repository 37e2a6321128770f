// Category registry loaded from a YAML, JSON or TOML file
//
// categories:
//   receipts:
//     subject: "Purchase receipts and invoices"
//   tax returns: "Tax filings and assessments"

use crate::types::{AppError, AppResult};
use config::{Config as ConfigLoader, File, ValueKind};
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info};

const CATEGORIES_KEY: &str = "categories";
const DESCRIPTION_KEY: &str = "subject";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub name: String,
    pub description: String,
}

impl Category {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CategoryRegistry {
    categories: Vec<Category>,
}

impl CategoryRegistry {
    /// Load categories from a YAML, JSON or TOML file (format by extension)
    pub fn load(path: &Path) -> AppResult<Self> {
        if !path.is_file() {
            return Err(AppError::config_at(path, "category file not found"));
        }

        let settings = ConfigLoader::builder()
            .add_source(File::from(path))
            .build()
            .map_err(|e| AppError::config_at(path, format!("malformed category file: {}", e)))?;

        let table = settings.get_table(CATEGORIES_KEY).map_err(|_| {
            AppError::config_at(path, format!("missing '{}' table", CATEGORIES_KEY))
        })?;

        let mut categories = Vec::with_capacity(table.len());
        for (name, value) in table {
            let description = match value.kind {
                ValueKind::String(text) => text,
                ValueKind::Table(entry) => match entry.get(DESCRIPTION_KEY) {
                    Some(subject) => subject.clone().into_string().map_err(|e| {
                        AppError::config_at(path, format!("category '{}': {}", name, e))
                    })?,
                    None => {
                        return Err(AppError::config_at(
                            path,
                            format!("category '{}' has no '{}'", name, DESCRIPTION_KEY),
                        ))
                    }
                },
                _ => {
                    return Err(AppError::config_at(
                        path,
                        format!("category '{}' must be a string or a table", name),
                    ))
                }
            };
            categories.push(Category::new(name.trim(), description.trim()));
        }

        let registry = Self::from_categories(categories)
            .map_err(|e| AppError::config_at(path, e.message()))?;

        info!(count = registry.len(), path = %path.display(), "Loaded categories");
        Ok(registry)
    }

    /// Build a registry from already-parsed categories, keeping their order
    pub fn from_categories(categories: Vec<Category>) -> AppResult<Self> {
        if categories.is_empty() {
            return Err(AppError::config("no categories defined"));
        }

        let mut seen = HashSet::new();
        for category in &categories {
            if category.name.is_empty() {
                return Err(AppError::config("category names must not be empty"));
            }
            if !seen.insert(category.name.to_lowercase()) {
                return Err(AppError::config(format!(
                    "duplicate category '{}'",
                    category.name
                )));
            }
        }

        Ok(Self { categories })
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.categories.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.categories.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.name == name)
    }

    /// Match a model answer against the registry.
    ///
    /// Exact match wins; otherwise the answer is trimmed, stripped of
    /// surrounding quotes and trailing punctuation, and compared
    /// case-insensitively.
    pub fn resolve(&self, answer: &str) -> Option<&Category> {
        if let Some(category) = self.get(answer) {
            return Some(category);
        }

        let normalized = normalize_answer(answer);
        if normalized.is_empty() {
            return None;
        }
        let found = self
            .categories
            .iter()
            .find(|c| c.name.to_lowercase() == normalized);
        if let Some(category) = found {
            debug!(answer, category = %category.name, "Lenient category match");
        }
        found
    }
}

fn normalize_answer(answer: &str) -> String {
    let quotes: &[char] = &['"', '\'', '`', '*', '“', '”'];
    let trailing: &[char] = &['.', ',', '!', ';', ':'];

    answer
        .trim()
        .trim_matches(quotes)
        .trim_end_matches(trailing)
        .trim_matches(quotes)
        .trim()
        .to_lowercase()
}
