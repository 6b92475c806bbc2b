//! End-to-end session flows over the in-memory document

use pretty_assertions::assert_eq;
use termcheck_core::{Session, TermcheckConfig, UiCommand, UiEvent};
use termcheck_document::{DocumentHost, DocumentTree, MemoryDocument, NodeSpec};
use termcheck_glossary::GlossaryError;
use termcheck_model::FieldMapping;
use termcheck_test_utils::{
    card_document, record, records, source_config, template_document, ScriptedSource,
};
use tokio::sync::mpsc::UnboundedReceiver;

fn drain(rx: &mut UnboundedReceiver<UiEvent>) -> Vec<UiEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

fn config() -> TermcheckConfig {
    TermcheckConfig::new().with_source(source_config("common"))
}

#[tokio::test]
async fn scan_reports_exactly_the_unapproved_text() {
    let doc = card_document();
    let card = doc.find_by_name("Card").unwrap();
    doc.select(&[card]);

    let source = ScriptedSource::ok(records(&[("Submit", ""), ("Confirm", "")]));
    let (mut session, mut rx) = Session::new(doc, source, config());
    session.initialize().await;
    drain(&mut rx);

    session.handle(UiCommand::ScanSelected).await;
    let events = drain(&mut rx);
    assert_eq!(
        events,
        vec![
            UiEvent::notice("Found 1 invalid terms: \"Cancel\""),
            UiEvent::ScanComplete {
                invalid_texts: vec!["Cancel".to_string()]
            },
        ]
    );

    let cancel = session.host().find_by_name("Secondary").unwrap();
    assert!(session.host().fill(cancel).is_some());
}

#[tokio::test]
async fn scan_without_selection_is_an_error_event() {
    let source = ScriptedSource::ok(records(&[("Submit", "")]));
    let (mut session, mut rx) = Session::new(card_document(), source, config());
    session.handle(UiCommand::ScanSelected).await;

    assert_eq!(
        drain(&mut rx),
        vec![UiEvent::error("Please select a frame or group to scan")]
    );
}

#[tokio::test]
async fn failed_refresh_keeps_prior_glossary_and_reports_error() {
    let source = ScriptedSource::ok(records(&[("Submit", "Web"), ("Done", "iOS")]))
        .then_err(GlossaryError::format("response has no record sequence"));
    let (mut session, mut rx) = Session::new(MemoryDocument::new(), source, config());

    session.initialize().await;
    assert_eq!(drain(&mut rx).len(), 2);

    session.handle(UiCommand::RefreshGlossary).await;
    let events = drain(&mut rx);
    assert_eq!(events.len(), 1);
    match &events[0] {
        UiEvent::Error { message } => assert!(message.contains("invalid data format")),
        other => panic!("expected error event, got {other:?}"),
    }
    assert_eq!(session.cache().snapshot().len(), 2);
}

#[tokio::test]
async fn category_reset_when_refresh_drops_it() {
    let source = ScriptedSource::ok(records(&[("Submit", "Web"), ("Done", "iOS")]))
        .then_ok(records(&[("Submit", "Web")]));
    let (mut session, mut rx) = Session::new(MemoryDocument::new(), source, config());
    session.initialize().await;
    session
        .handle(UiCommand::CategoryChanged {
            category: "iOS".to_string(),
        })
        .await;
    assert_eq!(session.active_category(), Some("iOS"));
    drain(&mut rx);

    session.handle(UiCommand::RefreshGlossary).await;
    assert_eq!(session.active_category(), None);
    let events = drain(&mut rx);
    assert!(matches!(&events[1], UiEvent::GlossaryUpdated { terms } if terms.len() == 1));
}

#[tokio::test]
async fn generate_mocks_selects_clones() {
    let doc = template_document();
    let template = doc.find_by_name("Button").unwrap();
    doc.select(&[template]);

    let source = ScriptedSource::ok(records(&[("Submit", "Web"), ("Done", "iOS"), ("Back", "Web")]));
    let (mut session, mut rx) = Session::new(doc, source, config());
    session.initialize().await;
    drain(&mut rx);

    session
        .handle(UiCommand::GenerateMocks {
            category: Some("Web".to_string()),
        })
        .await;
    assert_eq!(drain(&mut rx), vec![UiEvent::MocksCreated { count: 2 }]);

    let host = session.host();
    let selection = host.current_selection().await;
    assert_eq!(selection.len(), 2);
    assert_eq!(host.focused(), selection);
    let names: Vec<String> = selection
        .iter()
        .map(|&n| host.info(n).unwrap().name)
        .collect();
    assert_eq!(names, vec!["Button - Submit", "Button - Back"]);

    let texts: Vec<String> = host
        .children(selection[1])
        .unwrap()
        .into_iter()
        .filter_map(|c| host.text(c))
        .map(|t| t.characters)
        .collect();
    assert_eq!(texts, vec!["Tap Back", "Back"]);
}

#[tokio::test]
async fn generate_mocks_uses_source_field_for_token() {
    let doc = MemoryDocument::from_spec(NodeSpec::page("Page").with_children(vec![
        NodeSpec::frame("Sign").with_children(vec![NodeSpec::text("Name", "{{Zone Name}}")]),
    ]));
    let template = doc.find_by_name("Sign").unwrap();
    doc.select(&[template]);

    let zones = source_config("zones")
        .with_label("Zone Names")
        .with_field_mapping(FieldMapping::new("Zone Name", "Area", "Notes"));
    let source = ScriptedSource::ok(vec![
        record("z1", serde_json::json!({"Zone Name": "Lobby", "Area": "North"})),
        record("z2", serde_json::json!({"Zone Name": "Atrium", "Area": "South"})),
    ]);
    let (mut session, mut rx) = Session::new(
        doc,
        source,
        TermcheckConfig::new().with_source(zones),
    );
    session.initialize().await;
    match &drain(&mut rx)[0] {
        UiEvent::CategoriesUpdated {
            active_source_label,
            ..
        } => assert_eq!(active_source_label, "Zone Names"),
        other => panic!("unexpected event {other:?}"),
    }

    session
        .handle(UiCommand::GenerateMocks { category: None })
        .await;
    assert_eq!(drain(&mut rx), vec![UiEvent::MocksCreated { count: 2 }]);
}

#[tokio::test]
async fn generate_without_placeholder_reports_and_leaves_document() {
    let doc = card_document();
    let card = doc.find_by_name("Card").unwrap();
    doc.select(&[card]);
    let before = doc.node_count();

    let source = ScriptedSource::ok(records(&[("Submit", "")]));
    let (mut session, mut rx) = Session::new(doc, source, config());
    session.initialize().await;
    drain(&mut rx);

    session
        .handle(UiCommand::GenerateMocks { category: None })
        .await;
    assert_eq!(
        drain(&mut rx),
        vec![UiEvent::error(
            "No {{Content}} placeholder found in the selected template"
        )]
    );
    assert_eq!(session.host().node_count(), before);
}

#[tokio::test]
async fn source_switch_refreshes_from_new_table() {
    let source = ScriptedSource::ok(records(&[("Submit", "Web")]));
    let config = config().with_source(source_config("zones"));
    let (mut session, mut rx) = Session::new(MemoryDocument::new(), source, config);

    session
        .handle(UiCommand::GlossarySourceChanged {
            source_id: "zones".to_string(),
        })
        .await;
    assert_eq!(session.active_source(), Some("zones"));
    assert_eq!(drain(&mut rx).len(), 2);
}

#[tokio::test]
async fn run_processes_commands_until_closed() {
    let doc = card_document();
    let card = doc.find_by_name("Card").unwrap();
    doc.select(&[card]);

    let source = ScriptedSource::ok(records(&[("Submit", ""), ("Confirm", "")]));
    let (session, mut events) = Session::new(doc, source, config());
    let (tx, commands) = tokio::sync::mpsc::unbounded_channel();

    let handle = tokio::spawn(session.run(commands));
    tx.send(UiCommand::ScanSelected).unwrap();
    drop(tx);
    handle.await.unwrap();

    let kinds: Vec<&str> = drain(&mut events).iter().map(UiEvent::kind).collect();
    assert_eq!(
        kinds,
        vec!["categories-updated", "glossary-updated", "notice", "scan-complete"]
    );
}
