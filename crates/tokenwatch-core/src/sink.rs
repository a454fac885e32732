//! Where decoded events go once a sub-range has been scanned.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::event::DomainEvent;

/// Receiver of decoded events.
///
/// `dispatch` must not block: the scan loop calls it inline and only advances
/// its cursor once every event of the sub-range has been handed over.
#[async_trait]
pub trait EventSink: Send + Sync {
    /// Accept one event.
    fn dispatch(&self, event: DomainEvent);

    /// Wait until work started by earlier `dispatch` calls has finished.
    async fn drain(&self) {}
}

#[async_trait]
impl<T: EventSink + ?Sized> EventSink for Arc<T> {
    fn dispatch(&self, event: DomainEvent) {
        (**self).dispatch(event)
    }

    async fn drain(&self) {
        (**self).drain().await
    }
}

/// Sink that keeps every event in memory. Handy for dry runs and tests.
#[derive(Debug, Default)]
pub struct CollectingSink {
    events: Mutex<Vec<DomainEvent>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything dispatched so far, in dispatch order.
    pub fn events(&self) -> Vec<DomainEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.events.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EventSink for CollectingSink {
    fn dispatch(&self, event: DomainEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}
