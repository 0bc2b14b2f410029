//! Admission requests as seen by the validating handler.

use k8s_openapi::api::authentication::v1::UserInfo;
use kube::Resource;
use kube::core::admission::{AdmissionRequest, Operation};
use serde::Serialize;

use super::object::RawObject;

/// Request metadata passed through to request-aware validators unmodified
#[derive(Clone, Debug, Default)]
pub struct RequestInfo {
    /// Kind of the object under admission (e.g. `WorkerPool`)
    pub kind: String,
    /// Name of the object (may be empty on CREATE with generateName)
    pub name: String,
    /// Namespace of the object, if namespaced
    pub namespace: Option<String>,
    /// Sub-resource being changed, if any
    pub sub_resource: Option<String>,
    /// Identity of the requester
    pub user_info: UserInfo,
    /// Whether the change will be persisted
    pub dry_run: bool,
}

/// A single admission request
#[derive(Clone, Debug)]
pub struct Request {
    pub uid: String,
    pub operation: Operation,
    /// Proposed object. Empty for DELETE.
    pub object: RawObject,
    /// Previous object. Populated only for UPDATE and DELETE.
    pub old_object: RawObject,
    pub info: RequestInfo,
}

impl Request {
    /// Create an empty request for the given operation
    pub fn new(operation: Operation) -> Self {
        Self {
            uid: String::new(),
            operation,
            object: RawObject::default(),
            old_object: RawObject::default(),
            info: RequestInfo::default(),
        }
    }

    pub fn with_uid(mut self, uid: impl Into<String>) -> Self {
        self.uid = uid.into();
        self
    }

    pub fn with_object(mut self, object: impl Into<RawObject>) -> Self {
        self.object = object.into();
        self
    }

    pub fn with_old_object(mut self, old_object: impl Into<RawObject>) -> Self {
        self.old_object = old_object.into();
        self
    }

    pub fn with_info(mut self, info: RequestInfo) -> Self {
        self.info = info;
        self
    }

    pub fn dry_run(&self) -> bool {
        self.info.dry_run
    }
}

impl<K> TryFrom<&AdmissionRequest<K>> for Request
where
    K: Resource + Serialize,
{
    type Error = serde_json::Error;

    /// Re-encode the objects carried by a kube admission request
    fn try_from(req: &AdmissionRequest<K>) -> Result<Self, Self::Error> {
        let encode = |obj: Option<&K>| match obj {
            Some(obj) => RawObject::from_json(obj),
            None => Ok(RawObject::default()),
        };

        Ok(Self {
            uid: req.uid.clone(),
            operation: req.operation.clone(),
            object: encode(req.object.as_ref())?,
            old_object: encode(req.old_object.as_ref())?,
            info: RequestInfo {
                kind: req.kind.kind.clone(),
                name: req.name.clone(),
                namespace: req.namespace.clone(),
                sub_resource: req.sub_resource.clone(),
                user_info: req.user_info.clone(),
                dry_run: req.dry_run,
            },
        })
    }
}
