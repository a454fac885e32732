//! `NotificationDispatcher` — fire-and-forget, paced notification sends.
//!
//! ```text
//! dispatch(event) ──► dedup ──► format ──► tokio::spawn ┐
//!                                                       ▼
//!                         semaphore permit ──► pacer slot ──► Notifier::send
//! ```
//!
//! `dispatch` returns immediately. Each send runs on its own task; a failed
//! send is logged and counted, nothing is retried.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::{Notify, Semaphore};

use tokenwatch_core::config::MonitorConfig;
use tokenwatch_core::event::DomainEvent;
use tokenwatch_core::sink::EventSink;

use crate::dedup::SeenEvents;
use crate::message::{format_message, DEFAULT_EXPLORER_URL};
use crate::notifier::Notifier;
use crate::pacer::SendPacer;

#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    pub explorer_url: String,
    /// Minimum time between two sends.
    pub send_spacing: Duration,
    pub max_in_flight: usize,
    /// Log positions remembered for duplicate suppression.
    pub dedup_window: usize,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            explorer_url: DEFAULT_EXPLORER_URL.into(),
            send_spacing: Duration::from_secs(5),
            max_in_flight: 16,
            dedup_window: 4_096,
        }
    }
}

impl From<&MonitorConfig> for DispatcherConfig {
    fn from(cfg: &MonitorConfig) -> Self {
        Self {
            explorer_url: cfg.explorer_url.clone(),
            send_spacing: cfg.send_spacing(),
            max_in_flight: cfg.max_in_flight_sends,
            dedup_window: cfg.dedup_window,
        }
    }
}

/// Counters since the dispatcher was created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DispatchStats {
    /// Events accepted and handed to a send task.
    pub dispatched: u64,
    pub sent: u64,
    pub failed: u64,
    /// Events dropped because their log position was already dispatched.
    pub duplicates: u64,
}

struct Inner {
    notifier: Arc<dyn Notifier>,
    explorer_url: String,
    pacer: SendPacer,
    permits: Arc<Semaphore>,
    seen: Mutex<SeenEvents>,
    in_flight: AtomicUsize,
    idle: Notify,
    dispatched: AtomicU64,
    sent: AtomicU64,
    failed: AtomicU64,
    duplicates: AtomicU64,
}

impl Inner {
    fn finish(&self) {
        if self.in_flight.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.idle.notify_waiters();
        }
    }
}

/// Formats events and sends them on background tasks. Cheap to clone.
#[derive(Clone)]
pub struct NotificationDispatcher {
    inner: Arc<Inner>,
}

impl NotificationDispatcher {
    pub fn new(notifier: Arc<dyn Notifier>, config: DispatcherConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                notifier,
                explorer_url: config.explorer_url,
                pacer: SendPacer::new(config.send_spacing),
                permits: Arc::new(Semaphore::new(config.max_in_flight.max(1))),
                seen: Mutex::new(SeenEvents::new(config.dedup_window)),
                in_flight: AtomicUsize::new(0),
                idle: Notify::new(),
                dispatched: AtomicU64::new(0),
                sent: AtomicU64::new(0),
                failed: AtomicU64::new(0),
                duplicates: AtomicU64::new(0),
            }),
        }
    }

    /// Queue a notification for `event` and return immediately.
    ///
    /// Must be called from within a tokio runtime.
    pub fn dispatch(&self, event: DomainEvent) {
        let inner = &self.inner;
        // Checked before dedup so an unsent event is not remembered as seen.
        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(e) => {
                inner.failed.fetch_add(1, Ordering::Relaxed);
                tracing::error!(error = %e, position = %event.position, "no runtime to send notification");
                return;
            }
        };

        let fresh = inner
            .seen
            .lock()
            .map(|mut seen| seen.insert(&event.position))
            .unwrap_or(true);
        if !fresh {
            inner.duplicates.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(position = %event.position, "duplicate event dropped");
            return;
        }

        let text = format_message(&event, &inner.explorer_url);
        inner.dispatched.fetch_add(1, Ordering::Relaxed);
        inner.in_flight.fetch_add(1, Ordering::AcqRel);

        let inner = Arc::clone(inner);
        handle.spawn(async move {
            let Ok(_permit) = Arc::clone(&inner.permits).acquire_owned().await else {
                inner.failed.fetch_add(1, Ordering::Relaxed);
                inner.finish();
                return;
            };
            inner.pacer.wait().await;

            match inner.notifier.send(&text).await {
                Ok(()) => {
                    inner.sent.fetch_add(1, Ordering::Relaxed);
                    tracing::info!(
                        notifier = inner.notifier.name(),
                        token = %event.token_address,
                        symbol = %event.symbol,
                        block = event.position.block_number,
                        "notification sent"
                    );
                }
                Err(e) => {
                    inner.failed.fetch_add(1, Ordering::Relaxed);
                    tracing::error!(
                        notifier = inner.notifier.name(),
                        token = %event.token_address,
                        error = %e,
                        "notification failed"
                    );
                }
            }
            inner.finish();
        });
    }

    /// Wait until every send started so far has finished.
    pub async fn drain(&self) {
        loop {
            let idle = self.inner.idle.notified();
            if self.inner.in_flight.load(Ordering::Acquire) == 0 {
                return;
            }
            idle.await;
        }
    }

    /// Sends started but not yet finished.
    pub fn in_flight(&self) -> usize {
        self.inner.in_flight.load(Ordering::Acquire)
    }

    pub fn stats(&self) -> DispatchStats {
        DispatchStats {
            dispatched: self.inner.dispatched.load(Ordering::Relaxed),
            sent: self.inner.sent.load(Ordering::Relaxed),
            failed: self.inner.failed.load(Ordering::Relaxed),
            duplicates: self.inner.duplicates.load(Ordering::Relaxed),
        }
    }
}

#[async_trait]
impl EventSink for NotificationDispatcher {
    fn dispatch(&self, event: DomainEvent) {
        NotificationDispatcher::dispatch(self, event)
    }

    async fn drain(&self) {
        NotificationDispatcher::drain(self).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::U256;
    use tokenwatch_core::error::NotifyError;
    use tokenwatch_core::event::LogPosition;
    use tokio::time::Instant;

    /// Records the send time of every message; fails messages containing "FAIL".
    #[derive(Default)]
    struct Recording {
        sent: Mutex<Vec<(Instant, String)>>,
    }

    #[async_trait]
    impl Notifier for Recording {
        async fn send(&self, text: &str) -> Result<(), NotifyError> {
            self.sent.lock().unwrap().push((Instant::now(), text.to_string()));
            if text.contains("FAIL") {
                return Err(NotifyError::Rejected {
                    status: 400,
                    body: "can't parse entities".into(),
                });
            }
            Ok(())
        }

        fn name(&self) -> &str {
            "recording"
        }
    }

    fn event(n: u64, symbol: &str) -> DomainEvent {
        DomainEvent {
            token_address: format!("0x{n:040x}"),
            name: format!("Token {n}"),
            symbol: symbol.into(),
            total_supply: U256::from(n),
            position: LogPosition {
                block_number: 100 + n,
                tx_hash: format!("0x{n:064x}"),
                log_index: 0,
            },
        }
    }

    fn dispatcher(notifier: Arc<Recording>, spacing_secs: u64) -> NotificationDispatcher {
        NotificationDispatcher::new(
            notifier,
            DispatcherConfig {
                send_spacing: Duration::from_secs(spacing_secs),
                ..Default::default()
            },
        )
    }

    #[tokio::test(start_paused = true)]
    async fn dispatch_does_not_block_and_sends_are_spaced() {
        let notifier = Arc::new(Recording::default());
        let d = dispatcher(notifier.clone(), 5);

        let t0 = Instant::now();
        for n in 0..4 {
            d.dispatch(event(n, "TKN"));
        }
        assert_eq!(Instant::now(), t0);
        assert_eq!(d.stats().dispatched, 4);

        d.drain().await;
        let sent = notifier.sent.lock().unwrap();
        assert_eq!(sent.len(), 4);
        let mut times: Vec<_> = sent.iter().map(|(t, _)| *t).collect();
        times.sort();
        for pair in times.windows(2) {
            assert!(pair[1] - pair[0] >= Duration::from_secs(5));
        }
        assert_eq!(d.stats().sent, 4);
        assert_eq!(d.in_flight(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn duplicates_are_dropped() {
        let notifier = Arc::new(Recording::default());
        let d = dispatcher(notifier.clone(), 0);
        d.dispatch(event(1, "A"));
        d.dispatch(event(1, "A"));
        d.dispatch(event(2, "B"));
        d.drain().await;

        assert_eq!(notifier.sent.lock().unwrap().len(), 2);
        let stats = d.stats();
        assert_eq!(stats.duplicates, 1);
        assert_eq!(stats.dispatched, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn failing_send_does_not_affect_others() {
        let notifier = Arc::new(Recording::default());
        let d = dispatcher(notifier.clone(), 1);
        d.dispatch(event(1, "OK"));
        d.dispatch(event(2, "FAIL"));
        d.dispatch(event(3, "OK"));
        d.drain().await;

        let stats = d.stats();
        assert_eq!(stats.sent, 2);
        assert_eq!(stats.failed, 1);
        assert_eq!(notifier.sent.lock().unwrap().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn message_uses_configured_explorer() {
        let notifier = Arc::new(Recording::default());
        let d = NotificationDispatcher::new(
            notifier.clone(),
            DispatcherConfig {
                explorer_url: "https://fraxscan.com".into(),
                send_spacing: Duration::ZERO,
                ..Default::default()
            },
        );
        d.dispatch(event(7, "SEVEN"));
        d.drain().await;
        let sent = notifier.sent.lock().unwrap();
        assert!(sent[0].1.contains("(https://fraxscan.com/address/0x"));
        assert!(sent[0].1.starts_with("New ETH Token Created:\nName: Token 7\n"));
    }

    #[tokio::test]
    async fn drain_on_idle_dispatcher_returns() {
        let d = dispatcher(Arc::new(Recording::default()), 5);
        d.drain().await;
        assert_eq!(d.stats(), DispatchStats::default());
    }

    #[test]
    fn dispatch_outside_runtime_counts_failure() {
        let d = dispatcher(Arc::new(Recording::default()), 5);
        d.dispatch(event(1, "A"));
        assert_eq!(d.stats().failed, 1);
        assert_eq!(d.in_flight(), 0);
    }

    #[test]
    fn event_failed_outside_runtime_is_not_marked_seen() {
        let notifier = Arc::new(Recording::default());
        let d = dispatcher(notifier.clone(), 0);
        d.dispatch(event(1, "A"));
        assert_eq!(d.stats().failed, 1);

        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            d.dispatch(event(1, "A"));
            d.drain().await;
        });

        let stats = d.stats();
        assert_eq!(stats.duplicates, 0);
        assert_eq!(stats.sent, 1);
        assert_eq!(notifier.sent.lock().unwrap().len(), 1);
    }

    #[test]
    fn config_from_monitor_config() {
        let cfg = MonitorConfig {
            send_spacing_ms: 2_500,
            explorer_url: "https://fraxscan.com".into(),
            ..Default::default()
        };
        let d = DispatcherConfig::from(&cfg);
        assert_eq!(d.send_spacing, Duration::from_millis(2_500));
        assert_eq!(d.explorer_url, "https://fraxscan.com");
        assert_eq!(d.max_in_flight, 16);
    }
}
