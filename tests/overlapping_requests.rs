//! Overlapping async requests: only the latest attempt may write state.

mod common;

use bmcanvas::{CapabilityError, FileUpload, IngestOutcome, SummaryOutcome};
use common::Harness;
use std::sync::Arc;

const PDF: &str = "application/pdf";

fn spawn_summary(harness: &Harness) -> tokio::task::JoinHandle<SummaryOutcome> {
    let session = Arc::clone(&harness.session);
    tokio::spawn(async move { session.generate_summary().await })
}

fn spawn_attach(harness: &Harness, upload: FileUpload) -> tokio::task::JoinHandle<IngestOutcome> {
    let session = Arc::clone(&harness.session);
    tokio::spawn(async move { session.attach_file(upload).await })
}

fn seeded() -> Harness {
    let harness = Harness::new();
    harness.session.set_concept("Kávézó az egyetem mellett");
    harness.session.add_item("channels", "Webshop");
    harness
}

#[tokio::test]
async fn later_summary_wins_when_earlier_settles_last() {
    let harness = seeded();

    let first = spawn_summary(&harness);
    harness.summarizer.parked.wait_for_calls(1).await;
    let second = spawn_summary(&harness);
    harness.summarizer.parked.wait_for_calls(2).await;

    harness.summarizer.parked.release(1, Ok("Második".to_string()));
    let second = second.await.unwrap();
    assert_eq!(second.summary(), Some("Második"));

    harness.summarizer.parked.release(0, Ok("Első".to_string()));
    assert!(matches!(first.await.unwrap(), SummaryOutcome::Superseded(_)));

    let state = harness.session.summary_state();
    assert_eq!(state.text.as_deref(), Some("Második"));
    assert!(!state.is_pending);
}

#[tokio::test]
async fn later_summary_wins_when_earlier_settles_first() {
    let harness = seeded();

    let first = spawn_summary(&harness);
    harness.summarizer.parked.wait_for_calls(1).await;
    let second = spawn_summary(&harness);
    harness.summarizer.parked.wait_for_calls(2).await;

    harness.summarizer.parked.release(0, Ok("Első".to_string()));
    assert!(matches!(first.await.unwrap(), SummaryOutcome::Superseded(_)));
    assert!(harness.session.summary_state().is_pending);

    harness.summarizer.parked.release(1, Ok("Második".to_string()));
    second.await.unwrap();
    assert_eq!(
        harness.session.summary_state().text.as_deref(),
        Some("Második")
    );
}

#[tokio::test]
async fn stale_failure_does_not_hide_newer_summary() {
    let harness = seeded();

    let first = spawn_summary(&harness);
    harness.summarizer.parked.wait_for_calls(1).await;
    let second = spawn_summary(&harness);
    harness.summarizer.parked.wait_for_calls(2).await;

    harness.summarizer.parked.release(1, Ok("Friss".to_string()));
    second.await.unwrap();
    harness
        .summarizer
        .parked
        .release(0, Err(CapabilityError::Failed("upstream".to_string())));
    first.await.unwrap();

    let state = harness.session.summary_state();
    assert_eq!(state.text.as_deref(), Some("Friss"));
    assert_eq!(state.error, None);
}

#[tokio::test]
async fn pending_summary_blocks_generate_gate() {
    let harness = seeded();
    assert!(harness.session.can_generate_summary());

    let call = spawn_summary(&harness);
    harness.summarizer.parked.wait_for_calls(1).await;
    assert!(!harness.session.can_generate_summary());

    harness.summarizer.parked.release(0, Ok("Kész".to_string()));
    call.await.unwrap();
    assert!(harness.session.can_generate_summary());
}

#[tokio::test]
async fn extraction_placeholder_is_visible_while_in_flight() {
    let harness = seeded();

    let attach = spawn_attach(&harness, FileUpload::from_bytes("terv.pdf", PDF, b"%PDF".to_vec()));
    harness.extractor.parked.wait_for_calls(1).await;

    let doc = harness.session.document().unwrap();
    assert!(doc.is_extracting);
    assert!(doc.content.is_empty());
    assert!(harness.session.is_processing_document());
    assert!(!harness.session.can_download());
    assert!(!harness.session.can_generate_summary());

    let sent = &harness.extractor.requests()[0];
    assert_eq!(sent.mime_type, PDF);
    assert_eq!(sent.base64_content, "JVBERg==");

    harness.extractor.parked.release(0, Ok("Kinyert szöveg".to_string()));
    assert!(attach.await.unwrap().is_ready());
    assert!(harness
        .session
        .full_concept()
        .ends_with("--- Csatolt dokumentum (terv.pdf) ---\nKinyert szöveg"));
}

#[tokio::test]
async fn reselecting_during_extraction_keeps_newest_document() {
    let harness = seeded();

    let first = spawn_attach(&harness, FileUpload::from_bytes("regi.pdf", PDF, b"old".to_vec()));
    harness.extractor.parked.wait_for_calls(1).await;

    let second = harness
        .session
        .attach_file(FileUpload::from_bytes("uj.txt", "text/plain", "Új terv"))
        .await;
    assert!(second.is_ready());

    harness.extractor.parked.release(0, Ok("Régi terv".to_string()));
    assert!(matches!(first.await.unwrap(), IngestOutcome::Superseded(_)));

    let doc = harness.session.document().unwrap();
    assert_eq!(doc.name, "uj.txt");
    assert_eq!(doc.content, "Új terv");
}

#[tokio::test]
async fn removing_during_extraction_ignores_late_result() {
    let harness = seeded();

    let attach = spawn_attach(&harness, FileUpload::from_bytes("terv.pdf", PDF, b"x".to_vec()));
    harness.extractor.parked.wait_for_calls(1).await;

    harness.session.remove_document();
    assert!(harness.session.document().is_none());
    assert!(!harness.session.is_processing_document());

    harness
        .extractor
        .parked
        .release(0, Err(CapabilityError::Failed("late".to_string())));
    assert!(matches!(attach.await.unwrap(), IngestOutcome::Superseded(_)));
    assert!(harness.session.document().is_none());
    assert_eq!(harness.session.document_error(), None);
}

#[tokio::test]
async fn unsupported_selection_leaves_extraction_running() {
    let harness = seeded();

    let attach = spawn_attach(&harness, FileUpload::from_bytes("terv.pdf", PDF, b"x".to_vec()));
    harness.extractor.parked.wait_for_calls(1).await;

    let rejected = harness
        .session
        .attach_file(FileUpload::from_bytes("kep.png", "image/png", b"png".to_vec()))
        .await;
    assert!(matches!(rejected, IngestOutcome::Failed(_)));
    assert!(harness.session.document_error().is_some());

    harness.extractor.parked.release(0, Ok("Szöveg".to_string()));
    assert!(attach.await.unwrap().is_ready());
    assert_eq!(harness.session.document().unwrap().content, "Szöveg");
    assert_eq!(
        harness.session.document_error().as_deref(),
        Some("Nem támogatott fájltípus. Támogatott: .txt, .md, .doc, .docx, .pdf")
    );
}
