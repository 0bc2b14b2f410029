// Test code is allowed to panic on failure
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

//! Unit tests for admission-webhook.
//!
//! These tests run without a Kubernetes cluster: requests are fed straight
//! into the handler, or through the axum router as AdmissionReview bodies.

#[path = "../common/mod.rs"]
mod common;

mod scenario_tests {
    //! Widget scenarios: a plain resource with a replica rule.

    use admission_webhook::admission::{
        Error, Operation, Request, Result, ValidatingHandler, Validator, Verdict,
    };
    use axum::http::StatusCode;
    use serde::Deserialize;

    #[derive(Clone, Debug, Default, Deserialize)]
    struct Widget {
        #[allow(dead_code)]
        name: String,
        replicas: i32,
    }

    impl Validator for Widget {
        fn validate_create(&self) -> Result<()> {
            if self.replicas < 0 {
                return Err(Error::invalid("replicas must be >= 0"));
            }
            Ok(())
        }

        fn validate_update(&self, old: &Self) -> Result<()> {
            self.validate_create()?;
            if self.replicas < old.replicas {
                return Err(Error::invalid(format!(
                    "replicas cannot shrink from {} to {}",
                    old.replicas, self.replicas
                )));
            }
            Ok(())
        }

        fn validate_delete(&self) -> Result<()> {
            Ok(())
        }
    }

    fn handler() -> ValidatingHandler {
        ValidatingHandler::for_validator(Widget::default())
    }

    #[test]
    fn test_negative_replicas_denied() {
        let req = Request::new(Operation::Create).with_object(r#"{"name":"x","replicas":-1}"#);
        assert_eq!(
            handler().handle(&req),
            Verdict::denied("replicas must be >= 0")
        );
    }

    #[test]
    fn test_positive_replicas_allowed() {
        let req = Request::new(Operation::Create).with_object(r#"{"name":"x","replicas":3}"#);
        assert_eq!(handler().handle(&req), Verdict::Allowed);
    }

    #[test]
    fn test_malformed_json_errored() {
        let req = Request::new(Operation::Create).with_object(r#"{"name":"x","replicas":"#);
        match handler().handle(&req) {
            Verdict::Errored { code, message } => {
                assert_eq!(code, StatusCode::BAD_REQUEST);
                assert!(!message.is_empty());
            }
            other => panic!("expected errored verdict, got {:?}", other),
        }
    }

    #[test]
    fn test_update_old_and_new_not_swapped() {
        let req = Request::new(Operation::Update)
            .with_object(r#"{"name":"x","replicas":2}"#)
            .with_old_object(r#"{"name":"x","replicas":5}"#);
        assert_eq!(
            handler().handle(&req),
            Verdict::denied("replicas cannot shrink from 5 to 2")
        );

        let req = Request::new(Operation::Update)
            .with_object(r#"{"name":"x","replicas":5}"#)
            .with_old_object(r#"{"name":"x","replicas":2}"#);
        assert_eq!(handler().handle(&req), Verdict::Allowed);
    }

    #[test]
    fn test_delete_without_old_object_errored() {
        // DELETE reads the old object only
        let req = Request::new(Operation::Delete).with_object(r#"{"name":"x","replicas":1}"#);
        assert!(matches!(
            handler().handle(&req),
            Verdict::Errored { code, .. } if code == StatusCode::BAD_REQUEST
        ));
    }

    #[test]
    fn test_fresh_handlers_agree() {
        let req = Request::new(Operation::Create).with_object(r#"{"name":"x","replicas":-4}"#);
        assert_eq!(handler().handle(&req), handler().handle(&req));
    }
}

mod worker_pool_tests {
    use admission_webhook::admission::{Operation, Request, RequestInfo, Verdict};
    use admission_webhook::default_webhooks;
    use admission_webhook::webhooks::WORKER_POOL_PATH;

    use crate::common::fixtures::WorkerPoolBuilder;

    fn request(operation: Operation) -> Request {
        Request::new(operation).with_info(RequestInfo {
            kind: "WorkerPool".to_string(),
            ..Default::default()
        })
    }

    fn raw(builder: WorkerPoolBuilder) -> String {
        builder.to_json().to_string()
    }

    #[test]
    fn test_default_webhooks_registered() {
        let webhooks = default_webhooks().unwrap();
        assert_eq!(webhooks.len(), 1);
        assert_eq!(webhooks[0].path(), WORKER_POOL_PATH);
    }

    #[test]
    fn test_protected_pool_delete_denied() {
        let webhooks = default_webhooks().unwrap();
        let req = request(Operation::Delete)
            .with_old_object(raw(WorkerPoolBuilder::new("batch").protected()));

        let verdict = webhooks[0].handler().handle(&req);
        assert!(matches!(verdict, Verdict::Denied { ref reason } if reason.contains("protected")));
    }

    #[test]
    fn test_pool_scale_to_zero_denied() {
        let webhooks = default_webhooks().unwrap();
        let req = request(Operation::Update)
            .with_object(raw(WorkerPoolBuilder::new("batch").replicas(0)))
            .with_old_object(raw(WorkerPoolBuilder::new("batch").replicas(3)));

        let verdict = webhooks[0].handler().handle(&req);
        assert!(matches!(verdict, Verdict::Denied { ref reason } if reason.contains("Cannot scale down")));
    }
}

mod router_tests {
    use std::sync::Arc;

    use admission_webhook::HealthState;
    use admission_webhook::default_webhooks;
    use admission_webhook::webhooks::{WORKER_POOL_PATH, create_webhook_router};
    use axum::Router;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::common::fixtures::{WorkerPoolBuilder, admission_review};

    fn router(health: Arc<HealthState>) -> Router {
        create_webhook_router(default_webhooks().unwrap(), Some(health))
    }

    async fn post(app: Router, body: Value) -> (StatusCode, Value) {
        let resp = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(WORKER_POOL_PATH)
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_create_allowed() {
        let health = Arc::new(HealthState::new());
        let body = admission_review(
            "uid-1",
            "CREATE",
            Some(WorkerPoolBuilder::new("batch").replicas(3).to_json()),
            None,
            &[],
        );

        let (status, review) = post(router(health.clone()), body).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(review["response"]["uid"], "uid-1");
        assert_eq!(review["response"]["allowed"], true);

        let metrics = health.metrics.encode();
        assert!(metrics.contains(r#"verdict="allowed""#));
    }

    #[tokio::test]
    async fn test_create_denied() {
        let health = Arc::new(HealthState::new());
        let body = admission_review(
            "uid-2",
            "CREATE",
            Some(WorkerPoolBuilder::new("batch").replicas(-1).to_json()),
            None,
            &[],
        );

        let (status, review) = post(router(health.clone()), body).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(review["response"]["uid"], "uid-2");
        assert_eq!(review["response"]["allowed"], false);
        assert_eq!(
            review["response"]["status"]["message"],
            "replicas must be >= 0"
        );
        assert_eq!(review["response"]["status"]["code"], 403);
    }

    #[tokio::test]
    async fn test_type_mismatched_object_errored() {
        let health = Arc::new(HealthState::new());
        let mut object = WorkerPoolBuilder::new("batch").to_json();
        object["spec"]["replicas"] = Value::from("three");
        let body = admission_review("uid-3", "CREATE", Some(object), None, &[]);

        let (status, review) = post(router(health.clone()), body).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(review["response"]["allowed"], false);
        assert_eq!(review["response"]["status"]["code"], 400);

        let metrics = health.metrics.encode();
        assert!(metrics.contains(r#"verdict="errored""#));
    }

    #[tokio::test]
    async fn test_protected_delete_by_admin_allowed() {
        let health = Arc::new(HealthState::new());
        let body = admission_review(
            "uid-4",
            "DELETE",
            None,
            Some(WorkerPoolBuilder::new("batch").protected().to_json()),
            &["system:masters"],
        );

        let (_, review) = post(router(health), body).await;
        assert_eq!(review["response"]["allowed"], true);
    }

    #[tokio::test]
    async fn test_review_without_request_rejected() {
        let health = Arc::new(HealthState::new());
        let body = serde_json::json!({
            "apiVersion": "admission.k8s.io/v1",
            "kind": "AdmissionReview"
        });

        let (status, review) = post(router(health.clone()), body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(review["response"]["allowed"], false);

        let metrics = health.metrics.encode();
        assert!(metrics.contains("admission_invalid_reviews_total"));
    }
}
