//! Integration tests for sending messages

use super::*;
use integrations_postal::PostalError;
use pretty_assertions::assert_eq;
use wiremock::matchers::body_partial_json;

#[tokio::test]
async fn test_send_message_success() {
    let mock_server = setup_mock_server().await;

    authenticated_send()
        .and(body_partial_json(json!({
            "to": ["a@b.com"],
            "cc": [],
            "from": "noreply@example.com",
            "subject": "Hello",
            "plain_body": "Hi there"
        })))
        .respond_with(success_response(single_recipient_success()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server.uri());
    let mut request = valid_request(&client);

    let result = request.send().await.unwrap();

    assert_eq!(result.id, "m1");
    assert_eq!(result.time, 0.25);
    assert_eq!(result.flags, json!({}));
    assert_eq!(result.messages.len(), 1);
    assert_eq!(result.messages[0].address, "a@b.com");
    assert_eq!(result.messages[0].id, 1);
    assert_eq!(result.messages[0].token, "t1");
    assert!(request.is_closed());
}

#[tokio::test]
async fn test_send_message_body_shape() {
    let mock_server = setup_mock_server().await;

    authenticated_send()
        .respond_with(success_response(single_recipient_success()))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server.uri());
    let mut request = client.sender("bounce@example.com");
    request
        .to(["a@b.com", "c@d.com"])
        .unwrap()
        .bcc("hidden@example.com")
        .unwrap()
        .subject("Report")
        .unwrap()
        .html_body("<p>See attached</p>")
        .unwrap()
        .attachment("report.csv", "text/csv", "YSxiCg==")
        .unwrap();

    request.send().await.unwrap();

    let received = mock_server.received_requests().await.unwrap();
    assert_eq!(received.len(), 1);
    let body: Value = serde_json::from_slice(&received[0].body).unwrap();

    assert_eq!(
        body,
        json!({
            "to": ["a@b.com", "c@d.com"],
            "cc": [],
            "bcc": ["hidden@example.com"],
            "from": "bounce@example.com",
            "sender": "bounce@example.com",
            "subject": "Report",
            "html_body": "<p>See attached</p>",
            "attachments": [
                {"contentType": "text/csv", "filename": "report.csv", "base64Data": "YSxiCg=="}
            ]
        })
    );
}

#[tokio::test]
async fn test_send_message_remote_error() {
    let mock_server = setup_mock_server().await;

    authenticated_send()
        .respond_with(success_response(json!({
            "status": "error",
            "time": 0.01,
            "flags": {},
            "data": {"code": "InvalidServerAPIKey", "message": "The API token provided was not valid."}
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server.uri());
    let mut request = valid_request(&client);

    match request.send().await {
        Err(PostalError::Remote { code, message }) => {
            assert_eq!(code, "InvalidServerAPIKey");
            assert_eq!(message, "The API token provided was not valid.");
        }
        other => panic!("Expected Remote error, got {:?}", other),
    }
    assert!(!request.is_closed());
}

#[tokio::test]
async fn test_send_message_error_envelope_on_http_error_status() {
    let mock_server = setup_mock_server().await;

    authenticated_send()
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "status": "error",
            "data": {"code": "InternalError", "message": "boom"}
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server.uri());
    let mut request = valid_request(&client);

    let error = request.send().await.unwrap_err();
    assert_eq!(error.remote_code(), Some("InternalError"));
}

#[tokio::test]
async fn test_send_message_success_envelope_on_http_error_status() {
    let mock_server = setup_mock_server().await;

    authenticated_send()
        .respond_with(ResponseTemplate::new(503).set_body_json(single_recipient_success()))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server.uri());
    let mut request = valid_request(&client);

    assert_eq!(request.send().await.unwrap().id, "m1");
}

#[tokio::test]
async fn test_send_message_invalid_json() {
    let mock_server = setup_mock_server().await;

    authenticated_send()
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server.uri());
    let mut request = valid_request(&client);

    assert!(matches!(
        request.send().await,
        Err(PostalError::Serialization { .. })
    ));
    assert!(!request.is_closed());
}

#[tokio::test]
async fn test_send_message_retry_same_chain_after_remote_error() {
    let mock_server = setup_mock_server().await;

    authenticated_send()
        .respond_with(success_response(json!({
            "status": "error",
            "data": {"code": "NoRecipients", "message": "There are no recipients defined to receive this message"}
        })))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    authenticated_send()
        .respond_with(success_response(single_recipient_success()))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server.uri());
    let mut request = valid_request(&client);

    assert!(request.send().await.is_err());
    assert!(request.send().await.is_ok());
    assert!(matches!(
        request.send().await,
        Err(PostalError::ClosedRequest { .. })
    ));
    assert_eq!(mock_server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_validation_error_makes_no_request() {
    let mock_server = setup_mock_server().await;

    let client = client_for(&mock_server.uri());
    let mut request = client.to("a@b.com");
    request.from("f@example.com").unwrap().subject("s").unwrap();

    assert!(matches!(
        request.send().await,
        Err(PostalError::MissingBody)
    ));
    assert!(mock_server.received_requests().await.unwrap().is_empty());
}
