use axum::http::StatusCode;

/// `GET /healthz`: liveness probe, answers as long as the process runs.
pub async fn healthz() -> StatusCode {
    StatusCode::OK
}

/// `GET /readyz`: readiness probe. The api service serves traffic as
/// soon as it binds, so this mirrors liveness.
pub async fn readyz() -> StatusCode {
    StatusCode::OK
}
