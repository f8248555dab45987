//! Failure injection tests against a live bracket provider.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode;
use tax_sdk::{TaxClient, TaxClientError};

mod common;

#[tokio::test]
async fn test_retry_on_failure() {
    let call_count = Arc::new(AtomicU32::new(0));
    let cc = call_count.clone();
    let provider = common::start_programmable_provider(move |_| {
        let cc = cc.clone();
        async move {
            if cc.fetch_add(1, Ordering::SeqCst) < 2 {
                (503, r#"{"errors": ["Database not found!"]}"#.into())
            } else {
                (200, common::FEDERAL_BRACKETS.into())
            }
        }
    })
    .await;

    let (api, _shutdown) = common::spawn_api(common::test_config(provider)).await;
    let client = TaxClient::new(&format!("http://{}", api));

    let calc = client.calculate_tax(75000.0, 2024).await.unwrap();
    assert_eq!(calc.total_tax, 10000.0);
    assert_eq!(calc.effective_tax_rate, 0.1333);
    assert_eq!(call_count.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_no_retry_when_disabled() {
    let call_count = Arc::new(AtomicU32::new(0));
    let cc = call_count.clone();
    let provider = common::start_programmable_provider(move |_| {
        let cc = cc.clone();
        async move {
            cc.fetch_add(1, Ordering::SeqCst);
            (500, r#"{"errors": ["boom"]}"#.into())
        }
    })
    .await;

    let mut config = common::test_config(provider);
    config.retries.enabled = false;
    let (api, _shutdown) = common::spawn_api(config).await;
    let client = TaxClient::new(&format!("http://{}", api));

    match client.calculate_tax(75000.0, 2024).await {
        Err(TaxClientError::Api { status, body }) => {
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(body.error, "Could not fetch tax data");
            assert!(body.details.is_none());
        }
        other => panic!("expected API error, got {:?}", other),
    }
    assert_eq!(call_count.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_retries_exhausted() {
    let call_count = Arc::new(AtomicU32::new(0));
    let cc = call_count.clone();
    let provider = common::start_programmable_provider(move |_| {
        let cc = cc.clone();
        async move {
            cc.fetch_add(1, Ordering::SeqCst);
            (502, "{}".into())
        }
    })
    .await;

    let mut config = common::test_config(provider);
    config.retries.max_retries = 2;
    let (api, _shutdown) = common::spawn_api(config).await;
    let client = TaxClient::new(&format!("http://{}", api));

    assert!(matches!(
        client.calculate_tax(75000.0, 2024).await,
        Err(TaxClientError::Api { .. })
    ));
    assert_eq!(call_count.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_provider_year_in_path() {
    let provider = common::start_programmable_provider(|path| async move {
        if path == "/tax-brackets/2022" {
            (200, common::FEDERAL_BRACKETS.into())
        } else {
            (404, r#"{"errors": ["unknown year"]}"#.into())
        }
    })
    .await;

    let (api, _shutdown) = common::spawn_api(common::test_config(provider)).await;
    let client = TaxClient::new(&format!("http://{}", api));

    let calc = client.calculate_tax(150000.0, 2022).await.unwrap();
    assert_eq!(calc.year, 2022);
    assert_eq!(calc.total_tax, 30000.0);
    assert_eq!(calc.breakdown.len(), 3);
}

#[tokio::test]
async fn test_undecodable_body_is_retried() {
    let call_count = Arc::new(AtomicU32::new(0));
    let cc = call_count.clone();
    let provider = common::start_programmable_provider(move |_| {
        let cc = cc.clone();
        async move {
            cc.fetch_add(1, Ordering::SeqCst);
            (200, "<html>maintenance</html>".into())
        }
    })
    .await;

    let (api, _shutdown) = common::spawn_api(common::test_config(provider)).await;
    let client = TaxClient::new(&format!("http://{}", api));

    assert!(client.calculate_tax(75000.0, 2024).await.is_err());
    assert_eq!(call_count.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_malformed_brackets_fail_without_retry() {
    let call_count = Arc::new(AtomicU32::new(0));
    let cc = call_count.clone();
    let provider = common::start_programmable_provider(move |_| {
        let cc = cc.clone();
        async move {
            cc.fetch_add(1, Ordering::SeqCst);
            (200, r#"{"tax_brackets": [{"min": 0, "max": 50000}]}"#.into())
        }
    })
    .await;

    let (api, _shutdown) = common::spawn_api(common::test_config(provider)).await;
    let client = TaxClient::new(&format!("http://{}", api));

    match client.calculate_tax(75000.0, 2024).await {
        Err(TaxClientError::Api { status, body }) => {
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(body.error, "Internal server error.");
        }
        other => panic!("expected API error, got {:?}", other),
    }
    assert_eq!(call_count.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_missing_brackets_field_yields_zero_tax() {
    let provider = common::start_mock_provider(r#"{"year": 2024}"#).await;

    let (api, _shutdown) = common::spawn_api(common::test_config(provider)).await;
    let client = TaxClient::new(&format!("http://{}", api));

    let calc = client.calculate_tax(75000.0, 2024).await.unwrap();
    assert_eq!(calc.total_tax, 0.0);
    assert!(calc.breakdown.is_empty());
}

#[tokio::test]
async fn test_slow_provider_times_out() {
    let provider = common::start_programmable_provider(|_| async {
        tokio::time::sleep(Duration::from_secs(5)).await;
        (200, common::FEDERAL_BRACKETS.into())
    })
    .await;

    let mut config = common::test_config(provider);
    config.tax_api.timeout_secs = 1;
    config.retries.max_retries = 1;
    let (api, _shutdown) = common::spawn_api(config).await;
    let client = TaxClient::new(&format!("http://{}", api));

    let started = std::time::Instant::now();
    let result = client.calculate_tax(75000.0, 2024).await;
    assert!(matches!(result, Err(TaxClientError::Api { status, .. }) if status == StatusCode::INTERNAL_SERVER_ERROR));
    assert!(started.elapsed() < Duration::from_secs(4));
}

#[tokio::test]
async fn test_graceful_shutdown_stops_listener() {
    let provider = common::start_mock_provider(common::FEDERAL_BRACKETS).await;
    let (api, shutdown) = common::spawn_api(common::test_config(provider)).await;
    let client = TaxClient::new(&format!("http://{}", api));

    assert!(client.is_healthy().await);

    shutdown.trigger();
    tokio::time::sleep(Duration::from_millis(200)).await;
    let fresh = TaxClient::new(&format!("http://{}", api));
    assert!(!fresh.is_healthy().await);
}
