//! Send pacing.
//!
//! A single shared schedule hands out send slots at least `spacing` apart:
//! the first caller gets `now`, every later caller gets
//! `max(now, previous_slot + spacing)`. Callers sleep until their slot, so a
//! burst of N sends spreads over `(N - 1) * spacing` no matter how many tasks
//! carry it.

use std::sync::Mutex;
use std::time::Duration;

use tokio::time::Instant;

#[derive(Debug)]
pub struct SendPacer {
    spacing: Duration,
    next_slot: Mutex<Option<Instant>>,
}

impl SendPacer {
    pub fn new(spacing: Duration) -> Self {
        Self {
            spacing,
            next_slot: Mutex::new(None),
        }
    }

    pub fn spacing(&self) -> Duration {
        self.spacing
    }

    /// Reserve the next free slot and return it.
    pub fn reserve(&self) -> Instant {
        let now = Instant::now();
        let mut next = self.next_slot.lock().unwrap_or_else(|e| e.into_inner());
        let slot = match *next {
            Some(at) if at > now => at,
            _ => now,
        };
        *next = Some(slot + self.spacing);
        slot
    }

    /// Reserve a slot and sleep until it arrives.
    pub async fn wait(&self) {
        let slot = self.reserve();
        tokio::time::sleep_until(slot).await;
    }
}
