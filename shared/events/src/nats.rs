//! NATS-backed `EventBus` plus the commit-deferred enqueue queue that
//! satisfies spec §5's "enqueued jobs from a rolled-back transaction must
//! not be visible" invariant.
//!
//! The teacher's `NatsClient` published events as soon as the call site
//! reached it — fire-and-forget, with no notion of the surrounding
//! transaction. That is wrong for this core: a provider enqueues inside the
//! same transaction as the state change it is reporting, and if that
//! transaction rolls back the event must never have been published. So
//! [`PendingEvents`] collects enqueues in memory for the lifetime of a
//! request/transaction and is only drained to the real bus by the caller
//! after the database transaction commits.

use async_nats::{Client, ConnectOptions};
use async_trait::async_trait;
use futures::stream::StreamExt;
use serde::{de::DeserializeOwned, Serialize};
use shared_error::AppError;
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::{error, info, warn};

use crate::events::EventEnvelope;

/// Sole side-effect surface authentication providers call into (spec
/// §4.9). Takes a pre-serialized value so the trait stays object-safe;
/// use [`EventBusExt::enqueue`] for the typed convenience wrapper.
#[async_trait]
pub trait EventBus: Send + Sync {
    async fn enqueue_value(&self, job_name: &str, payload: serde_json::Value)
        -> Result<(), AppError>;
}

#[async_trait]
pub trait EventBusExt: EventBus {
    async fn enqueue<T: Serialize + Send + Sync>(
        &self,
        job_name: &str,
        payload: T,
    ) -> Result<(), AppError> {
        let value = serde_json::to_value(payload)
            .map_err(|e| AppError::server("server.internal.eventSerialize", e))?;
        self.enqueue_value(job_name, value).await
    }
}

impl<T: EventBus + ?Sized> EventBusExt for T {}

/// In-memory queue of not-yet-published events, scoped to one request or
/// transaction. Call [`PendingEvents::push`] wherever the spec says
/// "enqueue", then [`PendingEvents::flush`] once the enclosing transaction
/// has committed.
#[derive(Default)]
pub struct PendingEvents {
    queue: Mutex<Vec<(String, serde_json::Value)>>,
}

impl PendingEvents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push<T: Serialize>(&self, job_name: &str, payload: T) -> Result<(), AppError> {
        let value = serde_json::to_value(payload)
            .map_err(|e| AppError::server("server.internal.eventSerialize", e))?;
        self.queue
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push((job_name.to_string(), value));
        Ok(())
    }

    /// Publish everything queued so far to `bus`, in enqueue order. Call
    /// this only after the triggering transaction has committed.
    pub async fn flush(&self, bus: &dyn EventBus) -> Result<(), AppError> {
        let drained = std::mem::take(
            &mut *self.queue.lock().unwrap_or_else(|poisoned| poisoned.into_inner()),
        );
        for (job_name, payload) in drained {
            bus.enqueue_value(&job_name, payload).await?;
        }
        Ok(())
    }

    /// Discard everything queued so far without publishing — used when the
    /// caller rolls back the transaction instead of committing it.
    pub fn discard(&self) {
        self.queue.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).clear();
    }
}

/// NATS client wrapper with connection management.
#[derive(Clone)]
pub struct NatsClient {
    client: Client,
}

impl NatsClient {
    /// Connect to NATS with automatic reconnection and exponential backoff.
    pub async fn connect(nats_url: &str) -> Result<Self, AppError> {
        info!("connecting to NATS at {}", nats_url);

        let client = ConnectOptions::new()
            .retry_on_initial_connect()
            .reconnect_delay_callback(|attempt| {
                let delay = Duration::from_millis(2u64.pow(attempt.min(6) as u32) * 100);
                warn!("reconnecting to NATS in {:?}", delay);
                delay
            })
            .connect(nats_url)
            .await
            .map_err(|e| AppError::server("server.internal.natsConnect", e))?;

        info!("connected to NATS");
        Ok(Self { client })
    }

    async fn publish_event<T: Serialize>(
        &self,
        subject: &str,
        event: EventEnvelope<T>,
    ) -> Result<(), AppError> {
        let payload = serde_json::to_vec(&event)
            .map_err(|e| AppError::server("server.internal.eventSerialize", e))?;

        self.client
            .publish(subject.to_string(), payload.into())
            .await
            .map_err(|e| AppError::server("server.internal.natsPublish", e))?;

        info!(event_type = %event.event_type, subject, "published event");
        Ok(())
    }

    /// Subscribe to a subject, dispatching each decoded envelope to
    /// `handler` on a background task. Used by job workers (spec §5) to
    /// drain the bus.
    pub async fn subscribe_event<T, F, Fut>(
        &self,
        subject: &str,
        mut handler: F,
    ) -> Result<(), AppError>
    where
        T: DeserializeOwned + Send + 'static,
        F: FnMut(EventEnvelope<T>) -> Fut + Send + 'static,
        Fut: std::future::Future<Output = ()> + Send + 'static,
    {
        let subject_owned = subject.to_string();
        let mut subscriber = self
            .client
            .subscribe(subject_owned.clone())
            .await
            .map_err(|e| AppError::server("server.internal.natsSubscribe", e))?;

        info!(subject = %subject_owned, "subscribed");

        tokio::spawn(async move {
            while let Some(message) = subscriber.next().await {
                match serde_json::from_slice::<EventEnvelope<T>>(&message.payload) {
                    Ok(event) => handler(event).await,
                    Err(e) => error!("failed to deserialize event from {}: {}", subject_owned, e),
                }
            }
            warn!(subject = %subject_owned, "subscriber ended");
        });

        Ok(())
    }
}

#[async_trait]
impl EventBus for NatsClient {
    async fn enqueue_value(
        &self,
        job_name: &str,
        payload: serde_json::Value,
    ) -> Result<(), AppError> {
        self.publish_event(job_name, EventEnvelope::new(job_name, payload)).await
    }
}

static NATS_CLIENT: OnceCell<NatsClient> = OnceCell::const_new();

pub async fn init_nats_client(nats_url: &str) -> Result<(), AppError> {
    let client = NatsClient::connect(nats_url).await?;
    NATS_CLIENT
        .set(client)
        .map_err(|_| AppError::server_key("server.internal.natsAlreadyInitialized"))?;
    Ok(())
}

pub fn get_nats_client() -> Result<&'static NatsClient, AppError> {
    NATS_CLIENT.get().ok_or_else(|| AppError::server_key("server.internal.natsNotInitialized"))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct RecordingBus {
        published: Mutex<Vec<(String, serde_json::Value)>>,
    }

    #[async_trait]
    impl EventBus for RecordingBus {
        async fn enqueue_value(
            &self,
            job_name: &str,
            payload: serde_json::Value,
        ) -> Result<(), AppError> {
            self.published.lock().unwrap().push((job_name.to_string(), payload));
            Ok(())
        }
    }

    #[tokio::test]
    async fn flush_publishes_in_enqueue_order() {
        let pending = PendingEvents::new();
        pending.push("auth.passwordBased.userRegistered", serde_json::json!({"a": 1})).unwrap();
        pending.push("auth.passwordBased.loginVerified", serde_json::json!({"b": 2})).unwrap();

        let bus = RecordingBus { published: Mutex::new(Vec::new()) };
        pending.flush(&bus).await.unwrap();

        let published = bus.published.lock().unwrap();
        assert_eq!(published[0].0, "auth.passwordBased.userRegistered");
        assert_eq!(published[1].0, "auth.passwordBased.loginVerified");
    }

    #[tokio::test]
    async fn discard_drops_queued_events_on_rollback() {
        let pending = PendingEvents::new();
        pending.push("auth.user.softDeleted", serde_json::json!({})).unwrap();
        pending.discard();

        let bus = RecordingBus { published: Mutex::new(Vec::new()) };
        pending.flush(&bus).await.unwrap();
        assert!(bus.published.lock().unwrap().is_empty());
    }
}
