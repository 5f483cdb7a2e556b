use anyhow::Result;
use httpmock::prelude::*;
use lead_machine::app::handlers;
use lead_machine::core::dashboard::DashboardFilter;
use lead_machine::{DashboardClient, LeadError};
use serde_json::json;

/// 測試儀表板資料載入與統計
#[tokio::test]
async fn test_dashboard_summary_from_full_list() -> Result<()> {
    let server = MockServer::start();

    let report = server.mock(|when, then| {
        when.method(GET).path("/webhook/full-list");
        then.status(200).json_body(json!([
            {"email": "a@x.io", "mode": "live", "status": "Replied", "last email": "2025-03-01T10:15:00Z"},
            {"email": "b@x.io", "mode": "live", "status": "Sent", "last email": "2025-03-01T10:50:00Z"},
            {"email": "c@x.io", "mode": "test", "status": "Replied", "last email": "2025-03-01T14:00:00Z"},
            {"email": "d@x.io", "mode": "test", "status": "Sent", "last email": null}
        ]));
    });

    let client = DashboardClient::new(server.url("/webhook/full-list"));
    let filter = DashboardFilter {
        modes: Some(vec!["live".to_string()]),
        statuses: None,
    };

    let summary = handlers::load_dashboard(&client, &filter).await?;

    report.assert();
    assert_eq!(summary.total, 4);
    assert_eq!(summary.filtered.len(), 2);
    assert_eq!(summary.replied, 1);
    assert_eq!(summary.mode_counts, vec![("live".to_string(), 2)]);
    assert_eq!(
        summary.email_activity,
        Some(vec![("2025-03-01 10:00".to_string(), 2)])
    );
    Ok(())
}

#[tokio::test]
async fn test_dashboard_rejects_non_array_body() -> Result<()> {
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(GET).path("/webhook/full-list");
        then.status(200).json_body(json!({"rows": []}));
    });

    let client = DashboardClient::new(server.url("/webhook/full-list"));
    let result = handlers::load_dashboard(&client, &DashboardFilter::default()).await;

    assert!(matches!(result, Err(LeadError::UnexpectedResponse { .. })));
    Ok(())
}

#[tokio::test]
async fn test_dashboard_upstream_error() -> Result<()> {
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(GET).path("/webhook/full-list");
        then.status(503).body("maintenance");
    });

    let client = DashboardClient::new(server.url("/webhook/full-list"));
    let result = handlers::load_dashboard(&client, &DashboardFilter::default()).await;

    assert!(matches!(
        result,
        Err(LeadError::UpstreamError { status: 503, .. })
    ));
    Ok(())
}
