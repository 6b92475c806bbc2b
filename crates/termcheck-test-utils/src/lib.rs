//! Testing utilities for termcheck workspace
//!
//! Shared fixtures: glossaries, documents and scripted glossary sources.

#![allow(missing_docs)]

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::collections::VecDeque;
use termcheck_document::{Bounds, MemoryDocument, NodeSpec};
use termcheck_glossary::{GlossaryError, GlossarySource, RawRecord};
use termcheck_model::{Glossary, SourceConfig, Term};

pub fn term(id: &str, text: &str, category: Option<&str>) -> Term {
    let t = Term::new(id, text).unwrap();
    match category {
        Some(c) => t.with_category(c),
        None => t,
    }
}

/// `[Submit, Confirm]` without categories
pub fn submit_confirm_glossary() -> Glossary {
    Glossary::new(vec![term("rec1", "Submit", None), term("rec2", "Confirm", None)])
}

/// Terms spread over `Web` and `iOS`
pub fn platform_glossary() -> Glossary {
    Glossary::new(vec![
        term("rec1", "Submit", Some("Web")),
        term("rec2", "Confirm", Some("Web")),
        term("rec3", "Sign in", Some("Web")),
        term("rec4", "Done", Some("iOS")),
        term("rec5", "Sign In with Apple", Some("iOS")),
    ])
}

pub fn record(id: &str, fields: Value) -> RawRecord {
    RawRecord::new(id, fields.as_object().cloned().unwrap_or_default())
}

/// Records in the default `Content` / `Platform` layout
pub fn records(entries: &[(&str, &str)]) -> Vec<RawRecord> {
    entries
        .iter()
        .enumerate()
        .map(|(i, (content, platform))| {
            record(
                &format!("rec{}", i + 1),
                json!({"Content": content, "Platform": platform}),
            )
        })
        .collect()
}

/// `{ "records": [...] }` body for the given records
pub fn records_body(records: &[RawRecord]) -> String {
    let items: Vec<Value> = records
        .iter()
        .map(|r| json!({"id": r.id, "fields": Value::Object(r.fields.clone())}))
        .collect();
    json!({ "records": items }).to_string()
}

pub fn source_config(id: &str) -> SourceConfig {
    SourceConfig::new(id, "appTest", "Common Terms")
}

/// Page → frame `Card` with leaves `Submit`, `submit` (nested) and `Cancel`
pub fn card_document() -> MemoryDocument {
    MemoryDocument::from_spec(NodeSpec::page("Page").with_children(vec![
        NodeSpec::frame("Card").with_children(vec![
            NodeSpec::text("Title", "Submit"),
            NodeSpec::group("Actions").with_children(vec![
                NodeSpec::text("Primary", "submit"),
                NodeSpec::shape("Divider"),
            ]),
            NodeSpec::text("Secondary", "Cancel"),
        ]),
    ]))
}

/// Page → frame `Button` holding a text site and a label site for `{{Content}}`
pub fn template_document() -> MemoryDocument {
    MemoryDocument::from_spec(NodeSpec::page("Page").with_children(vec![
        NodeSpec::frame("Button")
            .with_bounds(Bounds::new(0.0, 0.0, 120.0, 40.0))
            .with_children(vec![
                NodeSpec::text("Label", "Tap {{Content}}"),
                NodeSpec::text("{{Content}}", "Placeholder"),
            ]),
    ]))
}

/// Source that replays scripted responses, repeating the last one
#[derive(Debug)]
pub struct ScriptedSource {
    responses: Mutex<VecDeque<Result<Vec<RawRecord>, GlossaryError>>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn ok(records: Vec<RawRecord>) -> Self {
        Self::new().then_ok(records)
    }

    pub fn then_ok(self, records: Vec<RawRecord>) -> Self {
        self.responses.lock().push_back(Ok(records));
        self
    }

    pub fn then_err(self, error: GlossaryError) -> Self {
        self.responses.lock().push_back(Err(error));
        self
    }

    /// Source ids requested so far
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }
}

impl Default for ScriptedSource {
    fn default() -> Self {
        Self::new()
    }
}

fn replay(response: &Result<Vec<RawRecord>, GlossaryError>) -> Result<Vec<RawRecord>, GlossaryError> {
    match response {
        Ok(records) => Ok(records.clone()),
        Err(GlossaryError::Fetch { status, body }) => Err(GlossaryError::Fetch {
            status: *status,
            body: body.clone(),
        }),
        Err(GlossaryError::Transport(m)) => Err(GlossaryError::Transport(m.clone())),
        Err(GlossaryError::Format(m)) => Err(GlossaryError::Format(m.clone())),
        Err(GlossaryError::Config(m)) => Err(GlossaryError::Config(m.clone())),
        Err(GlossaryError::Io { path, source }) => Err(GlossaryError::io_error(
            path.clone(),
            std::io::Error::new(source.kind(), source.to_string()),
        )),
    }
}

#[async_trait]
impl GlossarySource for ScriptedSource {
    async fn fetch_all(&self, config: &SourceConfig) -> Result<Vec<RawRecord>, GlossaryError> {
        self.calls.lock().push(config.id.clone());
        let mut responses = self.responses.lock();
        let response = if responses.len() > 1 {
            responses.pop_front()
        } else {
            responses.front().map(replay)
        };
        response.unwrap_or_else(|| Ok(Vec::new()))
    }
}
