use applydeck_api::{ApiError, BotClient};
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> BotClient {
    BotClient::new(&server.uri()).expect("mock server uri is valid")
}

#[tokio::test]
async fn status_deserializes_the_full_reply() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "running": true,
            "status": "running",
            "output": ["starting browser", "opened login page"]
        })))
        .mount(&server)
        .await;

    let status = client_for(&server).status().await.expect("status ok");
    assert!(status.running);
    assert_eq!(status.status, "running");
    assert_eq!(status.output.len(), 2);
}

#[tokio::test]
async fn start_reports_already_running_as_a_normal_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/start"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "already_running",
            "message": "Bot is already running"
        })))
        .mount(&server)
        .await;

    let reply = client_for(&server).start().await.expect("start ok");
    assert!(reply.is_already_running());
    assert_eq!(reply.display_message(), "Bot is already running");
}

#[tokio::test]
async fn stop_reports_not_running_as_a_normal_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/stop"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "status": "not_running" })),
        )
        .mount(&server)
        .await;

    let reply = client_for(&server).stop().await.expect("stop ok");
    assert!(reply.is_not_running());
}

#[tokio::test]
async fn logs_skips_malformed_records_instead_of_failing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/logs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "job_title": "Rust Engineer", "status": "success" },
            { "time_taken_sec": "not a number" },
            { "company": "Acme" }
        ])))
        .mount(&server)
        .await;

    let entries = client_for(&server).logs(None).await.expect("logs ok");
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].job_title.as_deref(), Some("Rust Engineer"));
    assert_eq!(entries[1].company.as_deref(), Some("Acme"));
}

#[tokio::test]
async fn logs_passes_the_limit_through() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/logs"))
        .and(query_param("limit", "50"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let entries = client_for(&server).logs(Some(50)).await.expect("logs ok");
    assert!(entries.is_empty());
}

#[tokio::test]
async fn save_config_posts_the_text_verbatim() {
    let server = MockServer::start().await;
    let config_text = "headless: true\nkeywords:\n  - rust\n";
    Mock::given(method("POST"))
        .and(path("/api/config"))
        .and(body_json(json!({ "config_yaml": config_text })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "saved" })))
        .mount(&server)
        .await;

    client_for(&server)
        .save_config(config_text)
        .await
        .expect("save ok");
}

#[tokio::test]
async fn save_config_surfaces_the_server_detail() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/config"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "detail": "Invalid YAML: mapping values are not allowed here"
        })))
        .mount(&server)
        .await;

    let error = client_for(&server)
        .save_config("not: valid: yaml")
        .await
        .expect_err("save must fail");
    match error {
        ApiError::Server { status, message } => {
            assert_eq!(status.as_u16(), 400);
            assert_eq!(message, "Invalid YAML: mapping values are not allowed here");
        }
        other => panic!("expected server error, got {other:?}"),
    }
}

#[tokio::test]
async fn config_read_failure_surfaces_the_error_key() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/config"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "error": "config.yaml not found"
        })))
        .mount(&server)
        .await;

    let error = client_for(&server).config().await.expect_err("must fail");
    assert_eq!(error.to_string(), "config.yaml not found");
}

#[tokio::test]
async fn connection_refused_is_a_transport_error() {
    // Bind then drop a server so the port is free again. An unpooled
    // server is required: pooled servers keep listening after drop.
    let server = MockServer::builder().start().await;
    let uri = server.uri();
    drop(server);

    let error = BotClient::new(&uri)
        .expect("uri is valid")
        .status()
        .await
        .expect_err("must fail");
    assert!(matches!(error, ApiError::Transport(_)));
}
