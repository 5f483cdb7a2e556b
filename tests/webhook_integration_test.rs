use anyhow::Result;
use httpmock::prelude::*;
use lead_machine::adapters::webhook::{Destination, WebhookForwarder};
use lead_machine::app::handlers;
use lead_machine::app::pipelines::SearchRequest;
use lead_machine::config::toml_config::WebhooksConfig;
use lead_machine::{ApolloClient, LeadError, LeadSession, LocalStorage};
use serde_json::json;
use tempfile::TempDir;

fn webhooks(server: &MockServer) -> WebhooksConfig {
    WebhooksConfig {
        live: server.url("/webhook/csv"),
        test: server.url("/webhook-test/csv"),
        campaign: server.url("/webhook/salesnav"),
        upload: server.url("/webhook/upload"),
        timeout_seconds: 5,
    }
}

async fn session_with_search(server: &MockServer) -> Result<LeadSession> {
    server.mock(|when, then| {
        when.method(POST).path("/api/v1/mixed_people/search");
        then.status(200)
            .json_body(json!({"people": [{"id": "p1", "name": "Ada"}]}));
    });

    let client = ApolloClient::new(
        "test-key",
        server.url("/api/v1/mixed_people/search"),
        server.url("/api/v1/people/match"),
    );
    let mut session = LeadSession::new();
    handlers::fetch_search(
        &mut session,
        client,
        &SearchRequest::new("https://app.apollo.io/#/people?personTitles[]=CEO", 1, 10),
    )
    .await?;
    Ok(session)
}

/// 測試將搜尋結果以 multipart 送到測試 webhook
#[tokio::test]
async fn test_send_table_to_test_webhook() -> Result<()> {
    let server = MockServer::start();
    let mut session = session_with_search(&server).await?;
    session.set_intention("Q3 outreach");

    let hook = server.mock(|when, then| {
        when.method(POST)
            .path("/webhook-test/csv")
            .body_contains("name=\"data\"")
            .body_contains("filename=\"apollo_full_leads.csv\"")
            .body_contains("id,name")
            .body_contains("name=\"intention\"")
            .body_contains("Q3 outreach");
        then.status(200).body("Workflow was started");
    });

    let forwarder = WebhookForwarder::new(webhooks(&server));
    let outcome = handlers::send_table(&session, &forwarder, Destination::Test).await?;

    hook.assert();
    assert!(outcome.success);
    assert_eq!(outcome.status, Some(200));
    assert_eq!(outcome.message, "Workflow was started");
    Ok(())
}

#[tokio::test]
async fn test_live_webhook_requires_intention() -> Result<()> {
    let server = MockServer::start();
    let session = session_with_search(&server).await?;

    let hook = server.mock(|when, then| {
        when.method(POST).path("/webhook/csv");
        then.status(200);
    });

    let forwarder = WebhookForwarder::new(webhooks(&server));
    let result = handlers::send_table(&session, &forwarder, Destination::Live).await;

    assert!(matches!(result, Err(LeadError::ValidationError { .. })));
    hook.assert_hits(0);
    Ok(())
}

#[tokio::test]
async fn test_webhook_failure_is_reported_as_outcome() -> Result<()> {
    let server = MockServer::start();
    let mut session = session_with_search(&server).await?;
    session.set_intention("retry later");

    server.mock(|when, then| {
        when.method(POST).path("/webhook/csv");
        then.status(500).body("workflow crashed");
    });

    let forwarder = WebhookForwarder::new(webhooks(&server));
    let outcome = handlers::send_table(&session, &forwarder, Destination::Live).await?;

    assert!(!outcome.success);
    assert_eq!(outcome.status, Some(500));
    assert!(outcome.message.contains("workflow crashed"));
    Ok(())
}

#[tokio::test]
async fn test_unreachable_webhook_is_reported_as_outcome() -> Result<()> {
    let forwarder = WebhookForwarder::new(WebhooksConfig {
        campaign: "http://127.0.0.1:9/webhook/salesnav".to_string(),
        timeout_seconds: 1,
        ..WebhooksConfig::default()
    });

    let outcome = forwarder
        .send(Destination::Campaign, b"id\n1\n".to_vec(), "enriched_lead.csv", None)
        .await?;

    assert!(!outcome.success);
    assert_eq!(outcome.status, None);
    Ok(())
}

#[tokio::test]
async fn test_send_without_session_data_fails() -> Result<()> {
    let server = MockServer::start();
    let forwarder = WebhookForwarder::new(webhooks(&server));

    let result = handlers::send_table(&LeadSession::new(), &forwarder, Destination::Test).await;

    assert!(matches!(result, Err(LeadError::NoSessionData)));
    Ok(())
}

/// 測試任意檔案上傳 (不需 intention)
#[tokio::test]
async fn test_upload_file_keeps_original_name() -> Result<()> {
    let temp_dir = TempDir::new()?;
    std::fs::write(temp_dir.path().join("prospects.xlsx"), b"binary-ish payload")?;

    let server = MockServer::start();
    let hook = server.mock(|when, then| {
        when.method(POST)
            .path("/webhook/upload")
            .body_contains("name=\"data\"")
            .body_contains("filename=\"prospects.xlsx\"")
            .body_contains("binary-ish payload");
        then.status(200).body("ok");
    });

    let storage = LocalStorage::new(temp_dir.path().to_str().unwrap().to_string());
    let forwarder = WebhookForwarder::new(webhooks(&server));
    let outcome = handlers::upload_file(&storage, &forwarder, "prospects.xlsx", None).await?;

    hook.assert();
    assert!(outcome.success);
    Ok(())
}

#[tokio::test]
async fn test_upload_missing_file_fails_before_sending() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let server = MockServer::start();
    let hook = server.mock(|when, then| {
        when.method(POST);
        then.status(200);
    });

    let storage = LocalStorage::new(temp_dir.path().to_str().unwrap().to_string());
    let forwarder = WebhookForwarder::new(webhooks(&server));
    let result = handlers::upload_file(&storage, &forwarder, "missing.csv", None).await;

    assert!(matches!(result, Err(LeadError::IoError(_))));
    hook.assert_hits(0);
    Ok(())
}
