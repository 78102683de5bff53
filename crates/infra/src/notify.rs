//! Best-effort notifications over the in-process bus.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use worksphere_core::EmployeeId;
use worksphere_events::{Event, EventBus, EventEnvelope, Subscription};

/// A message addressed to one employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub recipient: EmployeeId,
    pub recipient_name: String,
    pub topic: &'static str,
    pub message: String,
    pub occurred_at: DateTime<Utc>,
}

impl Event for Notification {
    fn event_type(&self) -> &'static str {
        self.topic
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
}

/// Notification sink. Delivery is best effort: failures are the
/// implementation's to log, never the caller's to handle.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

impl<N: Notifier + ?Sized> Notifier for std::sync::Arc<N> {
    fn notify(&self, notification: Notification) {
        (**self).notify(notification)
    }
}

/// Publishes notifications as sequenced envelopes on an [`EventBus`].
#[derive(Debug)]
pub struct BusNotifier<B> {
    bus: B,
    sequence: AtomicU64,
}

impl<B> BusNotifier<B> {
    pub fn new(bus: B) -> Self {
        Self {
            bus,
            sequence: AtomicU64::new(0),
        }
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }
}

impl<B> Notifier for BusNotifier<B>
where
    B: EventBus<EventEnvelope<Notification>>,
{
    fn notify(&self, notification: Notification) {
        let seq = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        let recipient = notification.recipient;
        if let Err(err) = self.bus.publish(EventEnvelope::wrap(seq, notification)) {
            warn!(%recipient, error = %err, "notification publish failed");
        }
    }
}

/// Handle to control and join the notification logger.
#[derive(Debug)]
pub struct WorkerHandle {
    shutdown: mpsc::Sender<()>,
    join: Option<thread::JoinHandle<()>>,
}

impl WorkerHandle {
    /// Request shutdown and wait for the worker to stop.
    pub fn shutdown(mut self) {
        let _ = self.shutdown.send(());
        if let Some(j) = self.join.take() {
            let _ = j.join();
        }
    }
}

/// Spawn a thread that logs every notification it receives.
///
/// Stands in for real delivery (mail, push).
pub fn spawn_notification_logger(
    subscription: Subscription<EventEnvelope<Notification>>,
) -> std::io::Result<WorkerHandle> {
    let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();

    let join = thread::Builder::new()
        .name("notification-logger".to_string())
        .spawn(move || logger_loop(subscription, shutdown_rx))?;

    Ok(WorkerHandle {
        shutdown: shutdown_tx,
        join: Some(join),
    })
}

fn logger_loop(sub: Subscription<EventEnvelope<Notification>>, shutdown_rx: mpsc::Receiver<()>) {
    let tick = Duration::from_millis(250);

    loop {
        if shutdown_rx.try_recv().is_ok() {
            break;
        }

        match sub.recv_timeout(tick) {
            Ok(envelope) => {
                let n = envelope.payload();
                info!(
                    sequence = envelope.sequence_number(),
                    topic = n.topic,
                    recipient = %n.recipient,
                    recipient_name = %n.recipient_name,
                    "{}",
                    n.message
                );
            }
            Err(mpsc::RecvTimeoutError::Timeout) => continue,
            Err(mpsc::RecvTimeoutError::Disconnected) => break,
        }
    }
}
