use axum_test::TestServer;
use sea_orm::DatabaseConnection;

use ladle_api::config::ApiConfig;
use ladle_api::router::build_router;
use ladle_api::state::AppState;

/// Router wired to a disconnected database. Only routes that answer
/// before touching the db are exercised here.
fn test_server() -> TestServer {
    let config = ApiConfig {
        database_url: String::new(),
        api_port: 0,
        public_base_url: "http://localhost".to_owned(),
        media_root: std::env::temp_dir().display().to_string(),
    };
    let state = AppState::new(DatabaseConnection::default(), &config);
    TestServer::new(build_router(state)).unwrap()
}

#[tokio::test]
async fn healthz_and_readyz_respond_ok() {
    let server = test_server();
    server.get("/healthz").await.assert_status_ok();
    server.get("/readyz").await.assert_status_ok();
}

#[tokio::test]
async fn garbage_short_link_is_404() {
    let server = test_server();
    // Decoding fails before any repository call.
    let response = server.get("/s/not-a-token").await;
    response.assert_status_not_found();
}

#[tokio::test]
async fn authenticated_routes_reject_anonymous_callers() {
    let server = test_server();

    let response = server.get("/users/me").await;
    response.assert_status_unauthorized();

    let response = server.post("/recipes/7/favorite").await;
    response.assert_status_unauthorized();

    let response = server.get("/recipes/download_shopping_cart").await;
    response.assert_status_unauthorized();

    let response = server.get("/users/subscriptions").await;
    response.assert_status_unauthorized();
}

#[tokio::test]
async fn malformed_identity_headers_are_rejected() {
    let server = test_server();
    let response = server
        .get("/users/me")
        .add_header("x-ladle-user-id", "not-a-number")
        .add_header("x-ladle-user-role", "0")
        .await;
    response.assert_status_unauthorized();
}

#[tokio::test]
async fn unknown_routes_are_404() {
    let server = test_server();
    server.get("/nope").await.assert_status_not_found();
}
