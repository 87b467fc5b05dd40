//! Link-chained pagination against a mock packagecloud server.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use packagecloud_client::{CancellationToken, Client, ClientConfig, ClientError};
use wiremock::matchers::{header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PACKAGES: &str = "/api/v1/repos/ecorp/staging/packages.json";

fn client(server: &MockServer) -> Client {
    Client::new(ClientConfig::new(server.uri(), "secret")).unwrap()
}

fn next_link(server: &MockServer, page: u32) -> String {
    format!(r#"<{}{}?page={}>; rel="next""#, server.uri(), PACKAGES, page)
}

/// Mount page 1 (no `page` param), 2 and 3, chained by `Link` headers.
async fn mount_three_pages(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(PACKAGES))
        .and(query_param_is_missing("page"))
        // "secret:" in base64
        .and(header("authorization", "Basic c2VjcmV0Og=="))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("page-1")
                .insert_header("Link", next_link(server, 2).as_str()),
        )
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(PACKAGES))
        .and(query_param("page", "2"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("page-2")
                .insert_header("Link", next_link(server, 3).as_str()),
        )
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(PACKAGES))
        .and(query_param("page", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_string("page-3"))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_three_linked_pages_are_all_handled_before_return() {
    let server = MockServer::start().await;
    mount_three_pages(&server).await;

    let client = client(&server);
    let handled = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&handled);

    let stats = client
        .paginate(client.resolve(PACKAGES).unwrap(), move |page| {
            // Earlier pages finish last.
            std::thread::sleep(Duration::from_millis(150 - 50 * page.number as u64));
            sink.lock()
                .unwrap()
                .push(String::from_utf8(page.body.to_vec()).unwrap());
            Ok(())
        })
        .await
        .unwrap();

    assert_eq!(stats.pages, 3);
    assert_eq!(stats.bytes, 18);

    let mut handled = handled.lock().unwrap().clone();
    assert_eq!(handled.len(), 3);
    handled.sort();
    assert_eq!(handled, vec!["page-1", "page-2", "page-3"]);
}

#[tokio::test]
async fn test_fetch_failure_stops_and_joins_dispatched_handlers() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(PACKAGES))
        .and(query_param_is_missing("page"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("page-1")
                .insert_header("Link", next_link(&server, 2).as_str()),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(PACKAGES))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(PACKAGES))
        .and(query_param("page", "3"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = client(&server);
    let finished = Arc::new(Mutex::new(0));
    let sink = Arc::clone(&finished);

    let err = client
        .paginate(client.resolve(PACKAGES).unwrap(), move |_| {
            std::thread::sleep(Duration::from_millis(100));
            *sink.lock().unwrap() += 1;
            Ok(())
        })
        .await
        .unwrap_err();

    match err {
        ClientError::Api { status, body } => {
            assert_eq!(status.as_u16(), 500);
            assert_eq!(body, "boom");
        }
        other => panic!("expected Api error, got {:?}", other),
    }
    assert_eq!(*finished.lock().unwrap(), 1);
}

#[tokio::test]
async fn test_handler_error_is_returned_after_all_pages() {
    let server = MockServer::start().await;
    mount_three_pages(&server).await;

    let client = client(&server);
    let err = client
        .paginate(client.resolve(PACKAGES).unwrap(), |page| {
            if page.number == 1 {
                return Err(ClientError::Validation("bad page".into()));
            }
            Ok(())
        })
        .await
        .unwrap_err();

    assert!(err.to_string().contains("bad page"));
}

#[tokio::test]
async fn test_payment_required_while_paginating() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(PACKAGES))
        .respond_with(
            ResponseTemplate::new(402).set_body_string(r#"{"error": ["payment required"]}"#),
        )
        .mount(&server)
        .await;

    let client = client(&server);
    let err = client
        .paginate(client.resolve(PACKAGES).unwrap(), |_| Ok(()))
        .await
        .unwrap_err();
    assert!(err.is_payment_required());
}

#[tokio::test]
async fn test_cancelled_client_issues_no_requests() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let token = CancellationToken::new();
    token.cancel();
    let client = client(&server).with_cancellation(token);

    let err = client
        .paginate(client.resolve(PACKAGES).unwrap(), |_| Ok(()))
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Cancelled));
}

#[tokio::test]
async fn test_cancel_during_slow_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;

    let token = CancellationToken::new();
    let client = client(&server).with_cancellation(token.clone());

    let canceller = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        token.cancel();
    });

    let err = client
        .paginate(client.resolve(PACKAGES).unwrap(), |_| Ok(()))
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Cancelled));
    canceller.await.unwrap();
}

#[tokio::test]
async fn test_request_timeout_is_a_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;

    let config = ClientConfig::new(server.uri(), "secret").with_timeout(Duration::from_millis(200));
    let client = Client::new(config).unwrap();

    let err = client
        .paginate(client.resolve(PACKAGES).unwrap(), |_| Ok(()))
        .await
        .unwrap_err();
    match err {
        ClientError::Transport(e) => assert!(e.is_timeout()),
        other => panic!("expected Transport error, got {:?}", other),
    }
}
