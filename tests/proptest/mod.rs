// Test code is allowed to panic on failure
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

//! Property-based tests for admission-webhook.
//!
//! Uses proptest to generate random requests and verify handler invariants.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use admission_webhook::admission::{
    Error, MetaValidator, Object, Operation, Request, Result, ValidatingHandler, Verdict,
};
use admission_webhook::crd::{ImageSpec, WorkerPool, WorkerPoolSpec};
use admission_webhook::webhooks::policies::replicas::MAX_REPLICAS;
use axum::http::StatusCode;
use proptest::prelude::*;
use serde::Deserialize;

#[derive(Clone, Debug, Default, Deserialize)]
struct Widget {
    #[allow(dead_code)]
    name: String,
    replicas: i32,
}

/// Counts validation calls and rejects negative replica counts
#[derive(Default)]
struct CountingValidator {
    calls: AtomicUsize,
}

impl CountingValidator {
    fn check(&self, obj: &dyn Object) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let widget = obj.downcast_ref::<Widget>().unwrap();
        if widget.replicas < 0 {
            return Err(Error::invalid("replicas must be >= 0"));
        }
        Ok(())
    }
}

impl MetaValidator for CountingValidator {
    fn new_object(&self) -> Box<dyn Object> {
        Box::new(Widget::default())
    }

    fn validate_create(&self, obj: &dyn Object, _req: &Request) -> Result<()> {
        self.check(obj)
    }

    fn validate_update(&self, obj: &dyn Object, old: &dyn Object, _req: &Request) -> Result<()> {
        self.check(old)?;
        self.check(obj)
    }

    fn validate_delete(&self, obj: &dyn Object, _req: &Request) -> Result<()> {
        self.check(obj)
    }
}

fn widget_json(name: &str, replicas: i32) -> String {
    serde_json::json!({"name": name, "replicas": replicas}).to_string()
}

/// Strategy for generating operations that are reviewed.
fn reviewed_operation() -> impl Strategy<Value = Operation> {
    prop_oneof![
        Just(Operation::Create),
        Just(Operation::Update),
        Just(Operation::Delete),
    ]
}

/// Strategy for generating payloads that never decode into a Widget.
fn undecodable_payload() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z]{1,10}",
        "\\{\"name\":[0-9]{1,5}\\}",
        Just(String::new()),
        Just("{".to_string()),
    ]
}

proptest! {
    /// Property: the same request through fresh handlers yields the same verdict.
    #[test]
    fn test_verdict_is_idempotent(
        op in reviewed_operation(),
        name in "[a-z]{1,8}",
        replicas in any::<i32>(),
        old_replicas in any::<i32>(),
    ) {
        let req = Request::new(op)
            .with_object(widget_json(&name, replicas))
            .with_old_object(widget_json(&name, old_replicas));

        let first = ValidatingHandler::new(CountingValidator::default()).handle(&req);
        let second = ValidatingHandler::new(CountingValidator::default()).handle(&req);
        prop_assert_eq!(first, second);
    }

    /// Property: a create is allowed exactly when the rule accepts it.
    #[test]
    fn test_create_verdict_matches_rule(name in "[a-z]{1,8}", replicas in any::<i32>()) {
        let handler = ValidatingHandler::new(CountingValidator::default());
        let req = Request::new(Operation::Create).with_object(widget_json(&name, replicas));

        let verdict = handler.handle(&req);
        if replicas >= 0 {
            prop_assert_eq!(verdict, Verdict::Allowed);
        } else {
            prop_assert_eq!(verdict, Verdict::denied("replicas must be >= 0"));
        }
    }

    /// Property: undecodable payloads error with 400 and never reach validation.
    #[test]
    fn test_decode_failure_never_validates(
        op in reviewed_operation(),
        payload in undecodable_payload(),
        valid_first in any::<bool>(),
    ) {
        let spy = Arc::new(CountingValidator::default());
        let handler = ValidatingHandler::new(spy.clone());

        let valid = widget_json("ok", 1);
        // For UPDATE, break either the new or the old object
        let (object, old_object) = if valid_first {
            (valid, payload)
        } else {
            (payload, valid)
        };
        let req = Request::new(op.clone())
            .with_object(object)
            .with_old_object(old_object);

        let verdict = handler.handle(&req);
        let decodes_bad_payload = match op {
            Operation::Create => !valid_first,
            Operation::Update => true,
            Operation::Delete => valid_first,
            Operation::Connect => false,
        };

        if decodes_bad_payload {
            prop_assert!(
                matches!(verdict, Verdict::Errored { code, .. } if code == StatusCode::BAD_REQUEST),
                "expected Errored with 400, got {:?}",
                verdict
            );
            prop_assert_eq!(spy.calls.load(Ordering::SeqCst), 0);
        } else {
            prop_assert_eq!(verdict, Verdict::Allowed);
        }
    }

    /// Property: CONNECT is allowed whatever it carries.
    #[test]
    fn test_connect_always_allowed(payload in ".*") {
        let spy = Arc::new(CountingValidator::default());
        let handler = ValidatingHandler::new(spy.clone());
        let req = Request::new(Operation::Connect)
            .with_object(payload.clone())
            .with_old_object(payload);

        prop_assert_eq!(handler.handle(&req), Verdict::Allowed);
        prop_assert_eq!(spy.calls.load(Ordering::SeqCst), 0);
    }

    /// Property: WorkerPool creates are allowed exactly within replica bounds.
    #[test]
    fn test_worker_pool_replica_bounds(replicas in -50..150i32) {
        let handler = ValidatingHandler::for_validator(WorkerPool::empty());
        let pool = WorkerPool::new("pool", WorkerPoolSpec {
            replicas,
            image: ImageSpec {
                repository: "ghcr.io/example/worker".to_string(),
                ..Default::default()
            },
            ..Default::default()
        });
        let req = Request::new(Operation::Create)
            .with_object(serde_json::to_string(&pool).unwrap());

        let allowed = handler.handle(&req).is_allowed();
        prop_assert_eq!(allowed, (0..=MAX_REPLICAS).contains(&replicas));
    }
}
