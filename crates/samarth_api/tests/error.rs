use reqwest::StatusCode;

use samarth_api::error::parse_error_message;

#[test]
fn parse_error_message_extracts_server_error_string() {
    let body = r#"{"error":"Question is required"}"#;
    let message = parse_error_message(StatusCode::BAD_REQUEST, body);
    assert_eq!(message, "Question is required");
}

#[test]
fn parse_error_message_extracts_initialization_failures() {
    let body = r#"{"error":"System not initialized: embeddings unavailable"}"#;
    let message = parse_error_message(StatusCode::SERVICE_UNAVAILABLE, body);
    assert_eq!(message, "System not initialized: embeddings unavailable");
}

#[test]
fn parse_error_message_falls_back_to_raw_body() {
    let body = "upstream proxy failure";
    let message = parse_error_message(StatusCode::BAD_GATEWAY, body);
    assert_eq!(message, "upstream proxy failure");
}

#[test]
fn parse_error_message_falls_back_to_status_line_for_empty_body() {
    let message = parse_error_message(StatusCode::INTERNAL_SERVER_ERROR, "");
    assert_eq!(message, "Internal Server Error");
}

#[test]
fn parse_error_message_ignores_blank_error_fields() {
    let body = r#"{"error":"   "}"#;
    let message = parse_error_message(StatusCode::INTERNAL_SERVER_ERROR, body);
    assert_eq!(message, body);
}
