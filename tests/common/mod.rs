#![allow(dead_code)]

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use std::path::{Path, PathBuf};
use std::time::Duration;

use inbox_sorter::config::AppConfig;

pub const CATEGORIES_YAML: &str = r#"
categories:
  receipts:
    subject: Purchase receipts and invoices
  tax returns:
    subject: Income tax filings
  contracts:
    subject: Signed agreements
"#;

pub fn write_categories(dir: &Path) -> PathBuf {
    let path = dir.join("categories.yaml");
    std::fs::write(&path, CATEGORIES_YAML).unwrap();
    path
}

/// Config pointing at `folder` and a local endpoint, with short timings
pub fn test_config(folder: &Path, base_url: &str) -> AppConfig {
    let mut config = AppConfig::default();
    config.watch.folder = folder.to_path_buf();
    config.watch.debounce = Duration::from_millis(50);
    config.watch.max_stability_checks = 10;
    config.llm.base_url = base_url.to_string();
    config.llm.timeout = Duration::from_secs(5);
    config
}

/// Write a single-font PDF with one text line per page
pub fn write_pdf(path: &Path, pages: &[&str]) {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let kids: Vec<Object> = pages
        .iter()
        .map(|text| {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 11.into()]),
                    Operation::new("Td", vec![50.into(), 700.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*text)]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "Resources" => resources_id,
            })
            .into()
        })
        .collect();

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.save(path).unwrap();
}
