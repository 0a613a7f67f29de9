use identity_core_core::domains::common::EventSink;
use shared_error::AppError;
use shared_events::PendingEvents;
use std::sync::Arc;

/// [`EventSink`] backed by the commit-deferred [`PendingEvents`] queue:
/// providers enqueue against the same queue for the lifetime of one
/// request, and the caller flushes or discards it once the request's
/// outcome is known. Holds an `Arc` rather than a borrow so it can be
/// handed to several providers constructed for the same request and
/// still satisfy `Arc<dyn EventSink>`'s implicit `'static` bound.
pub struct PendingEventSink {
    pending: Arc<PendingEvents>,
}

impl PendingEventSink {
    pub fn new(pending: Arc<PendingEvents>) -> Self {
        Self { pending }
    }
}

impl EventSink for PendingEventSink {
    fn enqueue(&self, job_name: &str, payload: serde_json::Value) -> Result<(), AppError> {
        self.pending.push(job_name, payload)
    }
}
