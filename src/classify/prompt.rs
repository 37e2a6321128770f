// Prompt builder
// Output depends only on its inputs.

use crate::categories::CategoryRegistry;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationPrompt {
    pub text: String,
    /// Whether the document text was cut to the input bound
    pub truncated: bool,
    /// Characters in the document before truncation
    pub document_chars: usize,
}

#[derive(Debug, Clone)]
pub struct PromptBuilder {
    max_input_chars: usize,
}

impl PromptBuilder {
    pub fn new(max_input_chars: usize) -> Self {
        Self { max_input_chars }
    }

    pub fn max_input_chars(&self) -> usize {
        self.max_input_chars
    }

    pub fn build(
        &self,
        file_name: &str,
        document_text: &str,
        categories: &CategoryRegistry,
    ) -> ClassificationPrompt {
        let (contents, truncated) = truncate_chars(document_text, self.max_input_chars);

        let mut text = String::new();
        text.push_str("You are classifying a document into ONE folder.\n\n");
        text.push_str(
            "Choose the single best folder name from the list below. Each entry gives a folder \
             name and the kind of content that belongs in it.\n",
        );
        text.push_str("Respond with ONLY the folder name.\n\n");

        text.push_str("Available folders:\n");
        for category in categories.iter() {
            text.push_str(&format!("- {}: {}\n", category.name, category.description));
        }

        text.push_str("\nRules:\n");
        text.push_str("- Output ONLY a folder name\n");
        text.push_str("- No explanations\n");
        text.push_str("- No punctuation\n");
        text.push_str("- If uncertain, choose the closest match\n\n");

        text.push_str(&format!("Filename: {}\n\n", file_name));
        text.push_str("Document contents:\n");
        text.push_str(contents);

        ClassificationPrompt {
            text,
            truncated,
            document_chars: document_text.chars().count(),
        }
    }
}

/// Keep the first `max_chars` characters, never splitting a code point
fn truncate_chars(text: &str, max_chars: usize) -> (&str, bool) {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => (&text[..byte_index], true),
        None => (text, false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::categories::Category;

    fn registry() -> CategoryRegistry {
        CategoryRegistry::from_categories(vec![
            Category::new("receipts", "Purchase receipts and invoices"),
            Category::new("tax returns", "Tax filings"),
        ])
        .unwrap()
    }

    #[test]
    fn test_prompt_contains_categories_and_text() {
        let prompt = PromptBuilder::new(8_000).build(
            "invoice.pdf",
            "Total Due: $42.00, Thank you for your purchase",
            &registry(),
        );

        assert!(prompt.text.contains("Respond with ONLY the folder name"));
        assert!(prompt.text.contains("- receipts: Purchase receipts and invoices"));
        assert!(prompt.text.contains("- tax returns: Tax filings"));
        assert!(prompt.text.contains("Filename: invoice.pdf"));
        assert!(prompt.text.ends_with("Total Due: $42.00, Thank you for your purchase"));
        assert!(!prompt.truncated);

        let receipts = prompt.text.find("- receipts").unwrap();
        let tax = prompt.text.find("- tax returns").unwrap();
        assert!(receipts < tax);
    }

    #[test]
    fn test_length_bounded_by_limit_plus_overhead() {
        let builder = PromptBuilder::new(100);
        let registry = registry();
        let overhead = builder.build("doc.pdf", "", &registry).text.chars().count();

        for size in [0usize, 50, 100, 101, 5_000, 100_000] {
            let document = "x".repeat(size);
            let prompt = builder.build("doc.pdf", &document, &registry);
            assert!(prompt.text.chars().count() <= overhead + 100);
            assert_eq!(prompt.truncated, size > 100);
            assert_eq!(prompt.document_chars, size);
        }
    }

    #[test]
    fn test_keeps_head_of_document() {
        let document = format!("INVOICE #123\n{}", "filler ".repeat(1_000));
        let prompt = PromptBuilder::new(20).build("doc.pdf", &document, &registry());
        assert!(prompt.text.contains("INVOICE #123"));
        assert!(prompt.truncated);
    }

    #[test]
    fn test_truncation_respects_char_boundaries() {
        let (head, truncated) = truncate_chars("héllo wörld", 4);
        assert_eq!(head, "héll");
        assert!(truncated);

        let (whole, truncated) = truncate_chars("äöü", 3);
        assert_eq!(whole, "äöü");
        assert!(!truncated);
    }

    #[test]
    fn test_build_is_deterministic() {
        let builder = PromptBuilder::new(500);
        let registry = registry();
        let first = builder.build("a.pdf", "some document text", &registry);
        let second = builder.build("a.pdf", "some document text", &registry);
        assert_eq!(first, second);
    }
}
