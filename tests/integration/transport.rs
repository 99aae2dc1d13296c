//! Integration tests for transport behaviour

use super::*;
use integrations_postal::{PostalError, TransportError};
use std::time::Duration;

fn redirect_to(location: String) -> ResponseTemplate {
    ResponseTemplate::new(308).insert_header("Location", location.as_str())
}

/// Mounts `hops` redirects in front of the send endpoint and returns the
/// base URL of the first one.
async fn mount_redirect_chain(mock_server: &MockServer, hops: usize) -> String {
    let uri = mock_server.uri();
    for hop in 1..=hops {
        let next = if hop == hops {
            String::new()
        } else {
            format!("/hop{}", hop + 1)
        };
        Mock::given(method("POST"))
            .and(path(format!("/hop{}{}", hop, SEND_PATH)))
            .respond_with(redirect_to(format!("{}{}{}", uri, next, SEND_PATH)))
            .mount(mock_server)
            .await;
    }
    format!("{}/hop1", uri)
}

fn client_with_redirects(base_url: &str, max_redirects: usize) -> PostalClient {
    PostalClient::builder()
        .hostname("postal.example.com")
        .api_key(API_KEY)
        .base_url(base_url)
        .max_redirects(max_redirects)
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_follows_redirects_up_to_limit() {
    let mock_server = setup_mock_server().await;
    let base_url = mount_redirect_chain(&mock_server, 2).await;

    authenticated_send()
        .respond_with(success_response(single_recipient_success()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&base_url);
    let mut request = valid_request(&client);

    assert_eq!(request.send().await.unwrap().id, "m1");
}

#[tokio::test]
async fn test_third_redirect_fails() {
    let mock_server = setup_mock_server().await;
    let base_url = mount_redirect_chain(&mock_server, 3).await;

    authenticated_send()
        .respond_with(success_response(single_recipient_success()))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = client_for(&base_url);
    let mut request = valid_request(&client);

    assert!(matches!(
        request.send().await,
        Err(PostalError::Transport(TransportError::Redirect { .. }))
    ));
    assert!(!request.is_closed());
}

#[tokio::test]
async fn test_redirect_limit_is_configurable() {
    let mock_server = setup_mock_server().await;
    let one_hop = mount_redirect_chain(&mock_server, 1).await;

    authenticated_send()
        .respond_with(success_response(single_recipient_success()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_with_redirects(&one_hop, 1);
    assert!(valid_request(&client).send().await.is_ok());

    let client = client_with_redirects(&one_hop, 0);
    assert!(matches!(
        valid_request(&client).send().await,
        Err(PostalError::Transport(TransportError::Redirect { .. }))
    ));
}

#[tokio::test]
async fn test_connection_refused() {
    let client = client_for("http://127.0.0.1:1");
    let mut request = valid_request(&client);

    let error = request.send().await.unwrap_err();
    assert!(matches!(
        error,
        PostalError::Transport(TransportError::Connection { .. })
    ));
    assert!(!request.is_closed());
}

#[tokio::test]
async fn test_configured_timeout() {
    let mock_server = setup_mock_server().await;

    authenticated_send()
        .respond_with(
            success_response(single_recipient_success()).set_delay(Duration::from_secs(2)),
        )
        .mount(&mock_server)
        .await;

    let client = PostalClient::builder()
        .hostname("postal.example.com")
        .api_key(API_KEY)
        .base_url(mock_server.uri())
        .timeout(Duration::from_millis(100))
        .build()
        .unwrap();
    let mut request = valid_request(&client);

    assert!(matches!(
        request.send().await,
        Err(PostalError::Transport(TransportError::Timeout { .. }))
    ));
}
