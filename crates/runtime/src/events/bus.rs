//! Typed event bus implementation.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, Weak};

use tokio::sync::broadcast;

use super::types::{Event, EventPayload, EventType};

/// Synchronous event handler. Errors are logged, never propagated.
pub type Handler = Arc<dyn Fn(&Event) -> anyhow::Result<()> + Send + Sync>;

struct HandlerEntry {
    id: u64,
    filter: Option<EventType>,
    handler: Handler,
}

struct BusInner {
    handlers: RwLock<Vec<HandlerEntry>>,
    next_id: AtomicU64,
    stream: broadcast::Sender<Event>,
}

/// Publish/subscribe over [`EventPayload`].
///
/// Handlers run synchronously inside [`EventBus::publish`], in registration
/// order. A handler that errors or panics is logged and the remaining
/// handlers still run. Async consumers can read the same events from
/// [`EventBus::stream`].
#[derive(Clone)]
pub struct EventBus {
    inner: Arc<BusInner>,
}

impl EventBus {
    /// Creates a new event bus with the default stream capacity
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Creates a new event bus whose async stream buffers `capacity` events
    pub fn with_capacity(capacity: usize) -> Self {
        let (stream, _) = broadcast::channel(capacity.max(1));
        Self {
            inner: Arc::new(BusInner {
                handlers: RwLock::new(Vec::new()),
                next_id: AtomicU64::new(1),
                stream,
            }),
        }
    }

    /// Runs `handler` for every event of `event_type`.
    pub fn subscribe<F>(&self, event_type: EventType, handler: F) -> Subscription
    where
        F: Fn(&Event) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.register(Some(event_type), Arc::new(handler))
    }

    /// Runs `handler` for every event.
    pub fn subscribe_all<F>(&self, handler: F) -> Subscription
    where
        F: Fn(&Event) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.register(None, Arc::new(handler))
    }

    /// Receiver of every event published from now on.
    pub fn stream(&self) -> broadcast::Receiver<Event> {
        self.inner.stream.subscribe()
    }

    /// Timestamps `payload` and delivers it.
    pub fn publish(&self, payload: EventPayload) {
        self.publish_event(Event::new(payload));
    }

    pub fn publish_event(&self, event: Event) {
        let event_type = event.event_type();
        // Snapshot so handlers may subscribe or unsubscribe while running.
        let handlers: Vec<(u64, Handler)> = self
            .inner
            .handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|entry| entry.filter.is_none_or(|filter| filter == event_type))
            .map(|entry| (entry.id, Arc::clone(&entry.handler)))
            .collect();

        for (id, handler) in handlers {
            match catch_unwind(AssertUnwindSafe(|| handler(&event))) {
                Ok(Ok(())) => {}
                Ok(Err(err)) => {
                    tracing::warn!(subscription = id, %event_type, error = %err, "event handler failed");
                }
                Err(_) => {
                    tracing::error!(subscription = id, %event_type, "event handler panicked");
                }
            }
        }

        if self.inner.stream.send(event).is_err() {
            // No stream receivers - this is normal, not an error
            tracing::trace!(%event_type, "no stream receivers");
        }
    }

    /// Number of registered handlers.
    pub fn handler_count(&self) -> usize {
        self.inner
            .handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn register(&self, filter: Option<EventType>, handler: Handler) -> Subscription {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        self.inner
            .handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(HandlerEntry {
                id,
                filter,
                handler,
            });
        Subscription {
            id,
            bus: Arc::downgrade(&self.inner),
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle to one registered handler.
///
/// Dropping the handle keeps the handler registered; call
/// [`Subscription::unsubscribe`] to remove it.
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    bus: Weak<BusInner>,
}

impl Subscription {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn unsubscribe(self) {
        if let Some(bus) = self.bus.upgrade() {
            bus.handlers
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .retain(|entry| entry.id != self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use planner_core::{LoadoutId, Side};
    use std::sync::Mutex;

    fn level(level: u8) -> EventPayload {
        EventPayload::LevelChanged {
            loadout: LoadoutId(1),
            level,
        }
    }

    #[test]
    fn handlers_run_in_registration_order_with_filtering() {
        let bus = EventBus::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let log = Arc::clone(&seen);
        bus.subscribe_all(move |event| {
            log.lock().unwrap().push(format!("all:{}", event.event_type()));
            Ok(())
        });
        let log = Arc::clone(&seen);
        bus.subscribe(EventType::ActiveSideChanged, move |_| {
            log.lock().unwrap().push("side".to_string());
            Ok(())
        });

        bus.publish(level(3));
        bus.publish(EventPayload::ActiveSideChanged { side: Side::B });

        assert_eq!(
            *seen.lock().unwrap(),
            ["all:LevelChanged", "all:ActiveSideChanged", "side"]
        );
    }

    #[test]
    fn failing_and_panicking_handlers_do_not_stop_delivery() {
        let bus = EventBus::new();
        let delivered = Arc::new(Mutex::new(0));

        bus.subscribe_all(|_| anyhow::bail!("broken handler"));
        bus.subscribe_all(|_| panic!("handler bug"));
        let counter = Arc::clone(&delivered);
        bus.subscribe_all(move |_| {
            *counter.lock().unwrap() += 1;
            Ok(())
        });

        bus.publish(level(1));
        bus.publish(level(2));
        assert_eq!(*delivered.lock().unwrap(), 2);
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let bus = EventBus::new();
        let count = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&count);
        let subscription = bus.subscribe(EventType::LevelChanged, move |_| {
            *counter.lock().unwrap() += 1;
            Ok(())
        });

        bus.publish(level(1));
        subscription.unsubscribe();
        bus.publish(level(2));

        assert_eq!(*count.lock().unwrap(), 1);
        assert_eq!(bus.handler_count(), 0);
    }

    #[tokio::test]
    async fn stream_receives_published_events() {
        let bus = EventBus::with_capacity(8);
        let mut stream = bus.stream();
        bus.publish(level(7));

        let event = stream.recv().await.expect("event");
        assert_eq!(event.payload, level(7));
    }
}
