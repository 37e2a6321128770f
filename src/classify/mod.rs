// Prompt building and classification

pub mod classifier;
pub mod prompt;

pub use classifier::*;
pub use prompt::*;
