use axum::middleware;
use axum::routing::{get, patch, post};
use axum::Router;

use crate::interface_adapters::error_filter::translate_errors;
use crate::interface_adapters::handlers::{
    add_comment, create_ticket, get_ticket, transition_ticket, update_checklist_item,
};
use crate::interface_adapters::state::AppState;

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/api/tickets", post(create_ticket))
        .route("/api/tickets/{id}", get(get_ticket))
        .route(
            "/api/tickets/{id}/checklist/{item_id}",
            patch(update_checklist_item),
        )
        .route("/api/tickets/{id}/transitions", post(transition_ticket))
        .route("/api/tickets/{id}/comments", post(add_comment))
        // Single registration point for the error boundary; every route and
        // every framework rejection passes through it.
        .layer(middleware::from_fn(translate_errors))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::test_support::seeded_ticket;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use chrono::{DateTime, Utc};
    use serde_json::Value;
    use tower::ServiceExt;

    fn build_test_app() -> Router {
        app(AppState::new())
    }

    async fn build_test_app_with_ticket(id: u64) -> Router {
        let state = AppState::new();
        {
            let mut tickets = state.tickets.lock().await;
            tickets.insert(id, seeded_ticket(id));
        }
        app(state)
    }

    fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .expect("expected request to build")
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("expected response body");
        serde_json::from_slice(&bytes).expect("expected json body")
    }

    fn assert_error_envelope(payload: &Value) {
        let keys = payload
            .as_object()
            .expect("expected error body to be an object");
        assert_eq!(keys.len(), 6);
        for key in ["statusCode", "timestamp", "path", "method", "message", "error"] {
            assert!(keys.contains_key(key), "missing envelope key {key}");
        }
    }

    #[tokio::test]
    async fn when_ticket_is_missing_then_404_envelope_echoes_method_and_path() {
        let app = build_test_app();
        let before = Utc::now();

        let request = Request::builder()
            .method("GET")
            .uri("/api/tickets/42")
            .body(Body::empty())
            .expect("expected request to build");
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let payload = body_json(response).await;
        let after = Utc::now();

        assert_error_envelope(&payload);
        assert_eq!(payload["statusCode"], 404);
        assert_eq!(payload["path"], "/api/tickets/42");
        assert_eq!(payload["method"], "GET");
        assert_eq!(payload["message"], "Ticket not found");
        assert_eq!(payload["error"], "NotFoundException");

        let timestamp = DateTime::parse_from_rfc3339(
            payload["timestamp"].as_str().expect("expected timestamp"),
        )
        .expect("expected rfc3339 timestamp")
        .with_timezone(&Utc);
        assert!(timestamp >= before && timestamp <= after);
    }

    #[tokio::test]
    async fn when_the_same_failing_request_repeats_then_only_timestamp_differs() {
        let app = build_test_app();

        let first = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/api/tickets/42")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let second = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/api/tickets/42")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let mut first = body_json(first).await;
        let mut second = body_json(second).await;
        first.as_object_mut().unwrap().remove("timestamp");
        second.as_object_mut().unwrap().remove("timestamp");

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn when_ticket_is_created_then_201_body_carries_open_status_and_checklist() {
        let app = build_test_app();

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/tickets",
                r#"{"subject":"VPN down","requester":"alice","checklist":["triage","fix"]}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let payload = body_json(response).await;
        assert_eq!(payload["status"], "open");
        assert_eq!(payload["checklist"]["totalCount"], 2);
        assert_eq!(payload["checklist"]["progress"], 0);
        assert_eq!(payload["transitions"][0]["from"], Value::Null);
        assert_eq!(payload["transitions"][0]["to"], "open");
    }

    #[tokio::test]
    async fn when_created_ticket_is_fetched_then_it_round_trips() {
        let app = build_test_app();

        let created = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/tickets",
                r#"{"subject":"VPN down","requester":"alice"}"#,
            ))
            .await
            .unwrap();
        let created = body_json(created).await;
        let id = created["id"].as_u64().expect("expected numeric id");

        let response = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri(format!("/api/tickets/{id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let payload = body_json(response).await;
        assert_eq!(payload["subject"], "VPN down");
        assert_eq!(payload["requester"], "alice");
    }

    #[tokio::test]
    async fn when_checklist_item_is_completed_then_progress_is_recomputed() {
        let app = build_test_app_with_ticket(7).await;

        let response = app
            .oneshot(json_request(
                "PATCH",
                "/api/tickets/7/checklist/item-1",
                r#"{"completed":true,"actor":"agent-1"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let payload = body_json(response).await;
        assert_eq!(payload["completedCount"], 1);
        assert_eq!(payload["totalCount"], 2);
        assert_eq!(payload["progress"], 50);
        assert_eq!(payload["items"][0]["completedBy"], "agent-1");
    }

    #[tokio::test]
    async fn when_ticket_transitions_then_entry_chains_from_open() {
        let app = build_test_app_with_ticket(7).await;

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/tickets/7/transitions",
                r#"{"to":"in_progress","actor":"agent-1"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let payload = body_json(response).await;
        assert_eq!(payload["from"], "open");
        assert_eq!(payload["to"], "in_progress");
        assert_eq!(payload["transitionedBy"], "agent-1");
    }

    #[tokio::test]
    async fn when_transition_targets_the_current_status_then_returns_409_envelope() {
        let app = build_test_app_with_ticket(7).await;

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/tickets/7/transitions",
                r#"{"to":"open","actor":"agent-1"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CONFLICT);
        let payload = body_json(response).await;
        assert_error_envelope(&payload);
        assert_eq!(payload["error"], "ConflictException");
        assert_eq!(payload["message"], "ticket is already open");
    }

    #[tokio::test]
    async fn when_comment_mentions_a_user_then_response_carries_the_offset() {
        let app = build_test_app_with_ticket(7).await;

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/tickets/7/comments",
                r#"{"author":"bob","body":"@alice please confirm"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let payload = body_json(response).await;
        assert_eq!(payload["mentions"][0]["userId"], "alice");
        assert_eq!(payload["mentions"][0]["position"], 0);
    }

    #[tokio::test]
    async fn when_route_does_not_exist_then_404_envelope_is_synthesized() {
        let app = build_test_app();

        let request = Request::builder()
            .method("GET")
            .uri("/api/unknown")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let payload = body_json(response).await;
        assert_error_envelope(&payload);
        assert_eq!(payload["path"], "/api/unknown");
        assert_eq!(payload["error"], "NotFoundException");
    }

    #[tokio::test]
    async fn when_method_is_not_allowed_then_405_envelope_is_synthesized() {
        let app = build_test_app();

        let request = Request::builder()
            .method("DELETE")
            .uri("/api/tickets")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        let payload = body_json(response).await;
        assert_error_envelope(&payload);
        assert_eq!(payload["method"], "DELETE");
        assert_eq!(payload["error"], "MethodNotAllowedException");
    }

    #[tokio::test]
    async fn when_payload_is_missing_required_fields_then_422_envelope_is_synthesized() {
        let app = build_test_app();

        let response = app
            .oneshot(json_request("POST", "/api/tickets", r#"{}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let payload = body_json(response).await;
        assert_error_envelope(&payload);
        assert_eq!(payload["statusCode"], 422);
        assert_eq!(payload["error"], "UnprocessableEntityException");
    }

    #[tokio::test]
    async fn when_ticket_id_is_not_numeric_then_400_envelope_is_synthesized() {
        let app = build_test_app();

        let request = Request::builder()
            .method("GET")
            .uri("/api/tickets/not-a-number")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let payload = body_json(response).await;
        assert_error_envelope(&payload);
        assert_eq!(payload["error"], "BadRequestException");
    }

    #[tokio::test]
    async fn when_subject_is_blank_then_400_envelope_carries_the_validation_message() {
        let app = build_test_app();

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/tickets",
                r#"{"subject":"  ","requester":"alice"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let payload = body_json(response).await;
        assert_error_envelope(&payload);
        assert_eq!(payload["message"], "subject is required");
        assert_eq!(payload["error"], "BadRequestException");
    }
}
