//! Commands over files on disk

use pretty_assertions::assert_eq;
use std::path::{Path, PathBuf};
use termcheck_cli::{run, DocumentArgs, GlobalOptions, Invocation, Outcome};
use termcheck_document::{DocumentTree, MemoryDocument};
use termcheck_test_utils::{card_document, records, records_body, template_document};

fn write_glossary(dir: &Path) -> PathBuf {
    let path = dir.join("terms.json");
    let body = records_body(&records(&[
        ("Submit", "Web"),
        ("Confirm", "Web"),
        ("Done", "iOS"),
    ]));
    std::fs::write(&path, body).unwrap();
    path
}

fn write_document(dir: &Path, doc: &MemoryDocument) -> PathBuf {
    let path = dir.join("doc.json");
    std::fs::write(&path, doc.to_json().unwrap()).unwrap();
    path
}

fn globals(glossary: PathBuf) -> GlobalOptions {
    GlobalOptions {
        glossary: Some(glossary),
        ..GlobalOptions::default()
    }
}

async fn output(globals: &GlobalOptions, invocation: Invocation) -> (Outcome, String) {
    let mut buf = Vec::new();
    let outcome = run(globals, invocation, &mut buf).await.unwrap();
    (outcome, String::from_utf8(buf).unwrap())
}

#[tokio::test]
async fn scan_reports_unapproved_text_and_writes_highlights() {
    let dir = tempfile::tempdir().unwrap();
    let globals = globals(write_glossary(dir.path()));
    let document = write_document(dir.path(), &card_document());
    let written = dir.path().join("out.json");

    let (outcome, text) = output(
        &globals,
        Invocation::Scan(DocumentArgs {
            document,
            target: Some("Card".to_string()),
            category: None,
            write: Some(written.clone()),
        }),
    )
    .await;

    assert_eq!(outcome, Outcome::Findings);
    assert!(text.contains("\tCancel\n"));
    assert!(text.ends_with("Scanned 3 text layers, found 1 invalid terms\n"));

    let doc = MemoryDocument::from_json(&std::fs::read_to_string(written).unwrap()).unwrap();
    let cancel = doc.find_by_name("Secondary").unwrap();
    assert!(doc.fill(cancel).is_some());
    let title = doc.find_by_name("Title").unwrap();
    assert!(doc.fill(title).is_none());
}

#[tokio::test]
async fn scan_rejects_text_root() {
    let dir = tempfile::tempdir().unwrap();
    let globals = globals(write_glossary(dir.path()));
    let document = write_document(dir.path(), &card_document());

    let err = run(
        &globals,
        Invocation::Scan(DocumentArgs {
            document,
            target: Some("Title".to_string()),
            category: None,
            write: None,
        }),
        &mut Vec::new(),
    )
    .await
    .unwrap_err();
    assert!(err.to_string().contains("text"));
}

#[tokio::test]
async fn mock_writes_one_clone_per_category_term() {
    let dir = tempfile::tempdir().unwrap();
    let globals = globals(write_glossary(dir.path()));
    let document = write_document(dir.path(), &template_document());
    let written = dir.path().join("mocks.json");

    let (outcome, text) = output(
        &globals,
        Invocation::Mock(DocumentArgs {
            document,
            target: Some("Button".to_string()),
            category: Some("Web".to_string()),
            write: Some(written.clone()),
        }),
    )
    .await;

    assert_eq!(outcome, Outcome::Clean);
    assert!(text.contains("Button - Submit"));
    assert!(text.contains("Button - Confirm"));
    assert!(text.ends_with("Created 2 mocks\n"));

    let doc = MemoryDocument::from_json(&std::fs::read_to_string(written).unwrap()).unwrap();
    let clone = doc.find_by_name("Button - Confirm").unwrap();
    let texts: Vec<String> = doc
        .children(clone)
        .unwrap()
        .into_iter()
        .filter_map(|c| doc.text(c))
        .map(|t| t.characters)
        .collect();
    assert_eq!(texts, vec!["Tap Confirm", "Confirm"]);
}

#[tokio::test]
async fn validate_suggests_within_category() {
    let dir = tempfile::tempdir().unwrap();
    let globals = globals(write_glossary(dir.path()));

    let (outcome, text) = output(
        &globals,
        Invocation::Validate {
            text: "conf".to_string(),
            category: Some("Web".to_string()),
        },
    )
    .await;
    assert_eq!(outcome, Outcome::Findings);
    assert_eq!(
        text,
        "\"conf\" is not an approved term\nDid you mean:\n  Confirm\n"
    );
}

#[tokio::test]
async fn terms_reads_config_for_field_mapping() {
    let dir = tempfile::tempdir().unwrap();
    let glossary = write_glossary(dir.path());
    let config = dir.path().join("termcheck.toml");
    std::fs::write(
        &config,
        r#"
[[sources]]
id = "common"
label = "Common Terms"
base = "appTest"
table = "Common Terms"
"#,
    )
    .unwrap();

    let globals = GlobalOptions {
        config: Some(config),
        glossary: Some(glossary),
        log_json: false,
    };
    let (_, text) = output(&globals, Invocation::Terms { category: None }).await;
    assert_eq!(
        text,
        "Submit\t[Web]\nConfirm\t[Web]\nDone\t[iOS]\n3 terms\n"
    );
}

#[tokio::test]
async fn missing_source_is_an_error() {
    let err = run(
        &GlobalOptions::default(),
        Invocation::Terms { category: None },
        &mut Vec::new(),
    )
    .await
    .unwrap_err();
    assert!(err.to_string().contains("no glossary source"));
}
