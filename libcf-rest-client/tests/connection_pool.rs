// Copyright 2026-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use httpmock::prelude::*;
use libcf_rest_client::{
    HttpMethod, PayloadKind, RestClient, RestLogBuffer, RestRequest, TransportFactory,
};
use std::sync::Arc;
use std::time::Duration;

#[cfg_attr(miri, ignore)]
#[tokio::test]
async fn test_multiple_requests_reuse_client() {
    let server = MockServer::start_async().await;

    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/v2/info");
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"api_version":"2.150.0"}"#);
        })
        .await;

    let client = TransportFactory::new()
        .read_timeout(Duration::from_secs(5))
        .build()
        .unwrap();

    for i in 0..5 {
        let req = RestRequest::new(HttpMethod::Get, server.url("/v2/info"));
        let response = client.send(req).await.unwrap();
        assert_eq!(response.status, 200, "request {i} should have succeeded");
    }

    // Every call went through the same RestClient and its connection pool.
    mock.assert_calls_async(5).await;
}

#[test]
fn test_client_is_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<RestClient>();
}

#[cfg_attr(miri, ignore)]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_requests_succeed() {
    let server = MockServer::start_async().await;

    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/v2/info");
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"api_version":"2.150.0"}"#);
        })
        .await;

    let log = Arc::new(RestLogBuffer::new(16));
    let client = TransportFactory::new()
        .read_timeout(Duration::from_secs(5))
        .log_callback(log.clone())
        .build()
        .unwrap();

    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let client = client.clone();
            let url = server.url("/v2/info");
            tokio::spawn(async move {
                client
                    .exchange(RestRequest::new(HttpMethod::Get, url), PayloadKind::Json)
                    .await
            })
        })
        .collect();

    for task in tasks {
        let info: serde_json::Value = task.await.unwrap().unwrap().into_json().unwrap();
        assert_eq!(info["api_version"], "2.150.0");
    }

    mock.assert_calls_async(8).await;
    assert_eq!(log.len(), 8);
}
