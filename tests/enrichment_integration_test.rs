use anyhow::Result;
use httpmock::prelude::*;
use lead_machine::app::handlers;
use lead_machine::app::pipelines::MatchRequest;
use lead_machine::core::normalizer::ENRICHMENT_RENAMES;
use lead_machine::{ApolloClient, FetchOutcome, LeadError, LeadSession, LocalStorage, TableKind};
use serde_json::json;
use tempfile::TempDir;

fn client(server: &MockServer) -> ApolloClient {
    ApolloClient::new(
        "test-key",
        server.url("/api/v1/mixed_people/search"),
        server.url("/api/v1/people/match"),
    )
}

/// 測試 people match 結果套用固定欄位並重新命名
#[tokio::test]
async fn test_enrichment_applies_fixed_schema() -> Result<()> {
    let server = MockServer::start();

    let match_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/v1/people/match")
            .header("x-api-key", "test-key")
            .header("Cache-Control", "no-cache")
            .query_param("linkedin_url", "https://www.linkedin.com/in/ada")
            .query_param("reveal_personal_emails", "true")
            .query_param("reveal_phone_number", "false");
        then.status(200).json_body(json!({
            "person": {
                "id": "p1",
                "first_name": "Ada",
                "email": "ada@engines.io",
                "departments": ["engineering", "research"],
                "organization": {
                    "name": "Engines Ltd",
                    "primary_phone": {"number": "+44 1"},
                    "unlisted_field": "dropped"
                },
                "extra_field": "dropped"
            }
        }));
    });

    let mut session = LeadSession::new();
    let request = MatchRequest::linkedin("https://www.linkedin.com/in/ada");

    let outcome = handlers::fetch_enrichment(&mut session, client(&server), request).await?;

    match_mock.assert();
    assert_eq!(
        outcome,
        FetchOutcome::Fetched {
            rows: 1,
            columns: ENRICHMENT_RENAMES.len()
        }
    );

    let table = session.table().expect("table stored");
    assert_eq!(session.kind(), Some(TableKind::Enrichment));
    assert_eq!(table.columns().len(), 53);
    assert_eq!(table.columns()[0], "id");
    assert_eq!(table.get(0, "first_name"), Some(&json!("Ada")));
    assert_eq!(table.get(0, "organization.name"), Some(&json!("Engines Ltd")));
    assert_eq!(
        table.get(0, "organization.primary_phone.number"),
        Some(&json!("+44 1"))
    );
    assert_eq!(table.get(0, "last_name"), Some(&json!(null)));
    assert!(table.column_index("extra_field").is_none());
    assert!(table.column_index("person.extra_field").is_none());
    assert!(table.column_index("organization.unlisted_field").is_none());

    Ok(())
}

#[tokio::test]
async fn test_enrichment_with_phone_reveal_sends_webhook() -> Result<()> {
    let server = MockServer::start();

    let match_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/v1/people/match")
            .query_param("email", "ada@engines.io")
            .query_param("reveal_phone_number", "true")
            .query_param("webhook_url", "https://hooks.example.com/phone");
        then.status(200)
            .json_body(json!({"person": {"id": "p1", "email": "ada@engines.io"}}));
    });

    let request = MatchRequest {
        email: Some("ada@engines.io".to_string()),
        reveal_phone_number: true,
        webhook_url: Some("https://hooks.example.com/phone".to_string()),
        ..MatchRequest::default()
    };

    let mut session = LeadSession::new();
    handlers::fetch_enrichment(&mut session, client(&server), request).await?;

    match_mock.assert();
    Ok(())
}

#[tokio::test]
async fn test_enrichment_phone_reveal_without_webhook_is_rejected() -> Result<()> {
    let server = MockServer::start();

    let match_mock = server.mock(|when, then| {
        when.method(POST);
        then.status(200).json_body(json!({}));
    });

    let request = MatchRequest {
        reveal_phone_number: true,
        ..MatchRequest::linkedin("https://www.linkedin.com/in/ada")
    };

    let mut session = LeadSession::new();
    let result = handlers::fetch_enrichment(&mut session, client(&server), request).await;

    assert!(matches!(result, Err(LeadError::ValidationError { .. })));
    match_mock.assert_hits(0);
    Ok(())
}

#[tokio::test]
async fn test_enrichment_empty_body_is_no_match() -> Result<()> {
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(POST).path("/api/v1/people/match");
        then.status(200).body("");
    });

    let mut session = LeadSession::new();
    let outcome = handlers::fetch_enrichment(
        &mut session,
        client(&server),
        MatchRequest::linkedin("https://www.linkedin.com/in/nobody"),
    )
    .await?;

    assert_eq!(outcome, FetchOutcome::Empty);
    assert!(!session.has_table());
    Ok(())
}

#[tokio::test]
async fn test_enrichment_empty_json_is_no_match() -> Result<()> {
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(POST).path("/api/v1/people/match");
        then.status(200).json_body(json!([]));
    });

    let mut session = LeadSession::new();
    let outcome = handlers::fetch_enrichment(
        &mut session,
        client(&server),
        MatchRequest::linkedin("https://www.linkedin.com/in/nobody"),
    )
    .await?;

    assert_eq!(outcome, FetchOutcome::Empty);
    assert!(!session.has_table());
    Ok(())
}

#[tokio::test]
async fn test_enrichment_upstream_error() -> Result<()> {
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(POST).path("/api/v1/people/match");
        then.status(401).body("invalid api key");
    });

    let mut session = LeadSession::new();
    let result = handlers::fetch_enrichment(
        &mut session,
        client(&server),
        MatchRequest::linkedin("https://www.linkedin.com/in/ada"),
    )
    .await;

    match result {
        Err(e @ LeadError::UpstreamError { .. }) => {
            assert_eq!(e.to_string(), "API Error 401: invalid api key");
        }
        other => panic!("expected upstream error, got {:?}", other),
    }
    Ok(())
}

/// 測試補充後的單筆資料匯出
#[tokio::test]
async fn test_enrichment_export_uses_enriched_file_name() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(POST);
        then.status(200)
            .json_body(json!({"person": {"id": "p1", "departments": ["sales"]}}));
    });

    let mut session = LeadSession::new();
    handlers::fetch_enrichment(
        &mut session,
        client(&server),
        MatchRequest::linkedin("https://www.linkedin.com/in/ada"),
    )
    .await?;

    let storage = LocalStorage::new(temp_dir.path().to_str().unwrap().to_string());
    let path = handlers::export_csv(&session, &storage, None).await?;

    assert!(path.ends_with("enriched_lead.csv"));
    let mut reader = csv::Reader::from_path(&path)?;
    assert_eq!(reader.headers()?.len(), 53);
    let record = reader.records().next().expect("one row")?;
    assert_eq!(&record[0], "p1");
    assert_eq!(&record[19], "[\"sales\"]");

    Ok(())
}
