//! `/health` plus the orchestrator readiness and liveness checks.
//!
//! Both checks read a shared [`HealthState`] that moves forward only:
//! starting, then serving once the listener is bound, then draining when a
//! shutdown signal arrives.

use std::sync::atomic::{AtomicU8, Ordering};

use actix_web::http::header::CACHE_CONTROL;
use actix_web::{HttpResponse, get, web};
use serde::{Deserialize, Serialize};

const STARTING: u8 = 0;
const SERVING: u8 = 1;
const DRAINING: u8 = 2;

/// Lifecycle phase shared by the check handlers.
#[derive(Debug, Default)]
pub struct HealthState(AtomicU8);

impl HealthState {
    /// A state in the starting phase: alive, not ready.
    pub fn new() -> Self {
        Self::default()
    }

    /// The listener is bound; readiness turns green.
    pub fn mark_ready(&self) {
        // Never move back out of draining.
        if let Err(phase) =
            self.0
                .compare_exchange(STARTING, SERVING, Ordering::AcqRel, Ordering::Acquire)
        {
            tracing::debug!(phase, "readiness left unchanged");
        }
    }

    /// Shutdown has begun; both checks turn red.
    pub fn begin_draining(&self) {
        self.0.store(DRAINING, Ordering::Release);
    }

    fn phase(&self) -> u8 {
        self.0.load(Ordering::Acquire)
    }
}

fn check_response(ok: bool) -> HttpResponse {
    let mut response = if ok {
        HttpResponse::Ok()
    } else {
        HttpResponse::ServiceUnavailable()
    };
    response
        .insert_header((CACHE_CONTROL, "no-store"))
        .finish()
}

/// Body of `GET /health`.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct HealthResponse {
    #[schema(example = "running")]
    pub status: String,
}

/// Coarse status document.
#[utoipa::path(
    get,
    path = "/health",
    tags = ["health"],
    security([]),
    responses((status = 200, description = "Service is running", body = HealthResponse))
)]
#[get("/health")]
pub async fn health() -> web::Json<HealthResponse> {
    web::Json(HealthResponse {
        status: "running".to_owned(),
    })
}

/// Readiness check.
#[utoipa::path(
    get,
    path = "/health/ready",
    tags = ["health"],
    security([]),
    responses(
        (status = 200, description = "Accepting traffic"),
        (status = 503, description = "Starting or draining")
    )
)]
#[get("/health/ready")]
pub async fn ready(state: web::Data<HealthState>) -> HttpResponse {
    check_response(state.phase() == SERVING)
}

/// Liveness check.
#[utoipa::path(
    get,
    path = "/health/live",
    tags = ["health"],
    security([]),
    responses(
        (status = 200, description = "Process is healthy"),
        (status = 503, description = "Draining for shutdown")
    )
)]
#[get("/health/live")]
pub async fn live(state: web::Data<HealthState>) -> HttpResponse {
    check_response(state.phase() != DRAINING)
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    fn starting(_: &HealthState) {}

    fn serving(state: &HealthState) {
        state.mark_ready();
    }

    fn draining(state: &HealthState) {
        state.mark_ready();
        state.begin_draining();
    }

    fn drained_then_marked_ready(state: &HealthState) {
        state.begin_draining();
        state.mark_ready();
    }

    #[rstest]
    #[case::starting(starting, StatusCode::SERVICE_UNAVAILABLE, StatusCode::OK)]
    #[case::serving(serving, StatusCode::OK, StatusCode::OK)]
    #[case::draining(draining, StatusCode::SERVICE_UNAVAILABLE, StatusCode::SERVICE_UNAVAILABLE)]
    #[case::no_resurrection(
        drained_then_marked_ready,
        StatusCode::SERVICE_UNAVAILABLE,
        StatusCode::SERVICE_UNAVAILABLE
    )]
    #[actix_web::test]
    async fn checks_track_the_lifecycle(
        #[case] arrange: fn(&HealthState),
        #[case] readiness: StatusCode,
        #[case] liveness: StatusCode,
    ) {
        let state = web::Data::new(HealthState::new());
        arrange(&state);
        let app = test::init_service(App::new().app_data(state).service(ready).service(live)).await;

        for (uri, expected) in [("/health/ready", readiness), ("/health/live", liveness)] {
            let res = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
            assert_eq!(res.status(), expected, "{uri}");
            assert_eq!(
                res.headers().get(CACHE_CONTROL).and_then(|v| v.to_str().ok()),
                Some("no-store")
            );
        }
    }

    #[actix_web::test]
    async fn health_reports_running() {
        let app = test::init_service(App::new().service(health)).await;
        let req = test::TestRequest::get().uri("/health").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, json!({"status": "running"}));
    }
}
