use mockito::{Matcher, Server};
use modeanalytics::api::{ClientConfig, DeletionConfig, RetryConfig};
use modeanalytics::framework::{
    ConfigureRequest, Context, CreateResourceRequest, DeleteResourceRequest, Provider,
    ReadDataSourceRequest, ReadResourceRequest,
};
use modeanalytics::ModeAnalyticsProvider;
use serde_json::json;
use std::time::Duration;

// base64("token:secret")
const BASIC_AUTH: &str = "Basic dG9rZW46c2VjcmV0";

fn fast_client_config() -> ClientConfig {
    ClientConfig {
        retry: RetryConfig {
            max_attempts: 9,
            backoff: Duration::from_millis(10),
        },
        deletion: DeletionConfig {
            tick: Duration::from_millis(20),
            timeout: Duration::from_millis(500),
        },
        ..ClientConfig::default()
    }
}

async fn configured_provider(server_url: &str) -> ModeAnalyticsProvider {
    let mut provider = ModeAnalyticsProvider::with_client_config(fast_client_config());

    let response = provider
        .configure(
            Context::new(),
            ConfigureRequest {
                config: json!({
                    "mode_host": server_url,
                    "api_token": "token",
                    "api_secret": "secret",
                    "workspace_id": "ws1",
                }),
            },
        )
        .await;
    assert!(!response.diagnostics.has_errors());

    provider
}

#[tokio::test(flavor = "multi_thread")]
async fn group_lifecycle_with_mock_server() {
    let mut server = Server::new_async().await;

    let create = server
        .mock("POST", "/api/ws1/groups")
        .match_header("authorization", BASIC_AUTH)
        .match_header("content-type", "application/json")
        .match_header("accept", "application/hal+json")
        .match_body(Matcher::Json(json!({"user_group": {"name": "analysts"}})))
        .with_body(r#"{"token":"g1","name":"analysts","state":"active"}"#)
        .expect(1)
        .create_async()
        .await;
    let read = server
        .mock("GET", "/api/ws1/groups/g1")
        .match_header("authorization", BASIC_AUTH)
        .with_body(r#"{"token":"g1","name":"analysts","state":"active"}"#)
        .expect(1)
        .create_async()
        .await;

    let provider = configured_provider(&server.url()).await;
    let group = provider.create_resource("modeanalytics_group").unwrap();

    let created = group
        .create(
            Context::new(),
            CreateResourceRequest {
                planned_state: json!({"name": "analysts"}),
            },
        )
        .await;
    assert!(!created.diagnostics.has_errors());
    assert_eq!(created.new_state["group_token"], "g1");

    let refreshed = group
        .read(
            Context::new(),
            ReadResourceRequest {
                current_state: created.new_state.clone(),
            },
        )
        .await;
    assert!(!refreshed.diagnostics.has_errors());
    assert_eq!(refreshed.new_state, Some(created.new_state));

    create.assert_async().await;
    read.assert_async().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn rate_limited_create_is_retried() {
    let mut server = Server::new_async().await;

    let limited = server
        .mock("POST", "/api/ws1/groups")
        .with_status(429)
        .expect(3)
        .create_async()
        .await;
    let accepted = server
        .mock("POST", "/api/ws1/groups")
        .with_body(r#"{"token":"g2","name":"ops","state":"active"}"#)
        .expect(1)
        .create_async()
        .await;

    let provider = configured_provider(&server.url()).await;
    let group = provider.create_resource("modeanalytics_group").unwrap();

    let created = group
        .create(
            Context::new(),
            CreateResourceRequest {
                planned_state: json!({"name": "ops"}),
            },
        )
        .await;

    assert!(!created.diagnostics.has_errors());
    assert_eq!(created.new_state["group_token"], "g2");
    limited.assert_async().await;
    accepted.assert_async().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn collection_delete_confirms_through_listing_after_forbidden() {
    let mut server = Server::new_async().await;

    let delete = server
        .mock("DELETE", "/api/ws1/spaces/c1")
        .with_body("{}")
        .expect(1)
        .create_async()
        .await;
    let forbidden = server
        .mock("GET", "/api/ws1/spaces/c1")
        .with_status(403)
        .expect(1)
        .create_async()
        .await;
    let listing = server
        .mock("GET", "/api/ws1/spaces")
        .match_query(Matcher::UrlEncoded("filter".into(), "all".into()))
        .with_body(r#"{"_embedded":{"spaces":[]}}"#)
        .expect(1)
        .create_async()
        .await;

    let provider = configured_provider(&server.url()).await;
    let collection = provider
        .create_resource("modeanalytics_collection")
        .unwrap();

    let response = collection
        .delete(
            Context::new(),
            DeleteResourceRequest {
                prior_state: json!({"collection_token": "c1", "name": "Finance"}),
            },
        )
        .await;

    assert!(!response.diagnostics.has_errors());
    delete.assert_async().await;
    forbidden.assert_async().await;
    listing.assert_async().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn group_delete_reports_unconfirmed_deletion() {
    let mut server = Server::new_async().await;

    let _delete = server
        .mock("DELETE", "/api/ws1/groups/g1")
        .with_body("{}")
        .create_async()
        .await;
    let _poll = server
        .mock("GET", "/api/ws1/groups/g1")
        .with_status(500)
        .create_async()
        .await;

    let provider = configured_provider(&server.url()).await;
    let group = provider.create_resource("modeanalytics_group").unwrap();

    let response = group
        .delete(
            Context::new(),
            DeleteResourceRequest {
                prior_state: json!({"group_token": "g1", "name": "analysts"}),
            },
        )
        .await;

    assert!(response.diagnostics.has_errors());
    assert!(response.diagnostics.errors[0].detail.contains("/groups/g1"));
}

#[tokio::test(flavor = "multi_thread")]
async fn data_source_read_through_provider() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("GET", "/api/ws1/data_sources/d1")
        .with_body(
            r#"{"id":7,"token":"d1","name":"warehouse","adapter":"jdbc:postgresql","port":5432,
                "custom_attributes":{"sslmode":"require"}}"#,
        )
        .create_async()
        .await;

    let provider = configured_provider(&server.url()).await;
    let data_source = provider
        .create_data_source("modeanalytics_data_source")
        .unwrap();

    let response = data_source
        .read(
            Context::new(),
            ReadDataSourceRequest {
                config: json!({"data_source_token": "d1"}),
            },
        )
        .await;

    assert!(!response.diagnostics.has_errors());
    assert_eq!(response.state["name"], "warehouse");
    assert_eq!(response.state["port"], 5432.0);
    assert_eq!(response.state["custom_attributes"]["sslmode"], "require");
}
