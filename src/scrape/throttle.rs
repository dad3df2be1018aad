//! Fixed inter-request delay
//!
//! The pipeline issues one request at a time. Before each request the
//! throttle sleeps until at least `delay` has passed since the previous one.
//! The first request is never delayed.

use std::time::{Duration, Instant};

/// Enforces a minimum gap between successive fetches
#[derive(Debug)]
pub struct Throttle {
    delay: Duration,
    last_request: Option<Instant>,
}

impl Throttle {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            last_request: None,
        }
    }

    /// Time left before the next request may start
    pub fn remaining(&self) -> Duration {
        match self.last_request {
            Some(last) => self.delay.saturating_sub(last.elapsed()),
            None => Duration::ZERO,
        }
    }

    /// Waits out the remaining delay and records a new request
    pub async fn wait(&mut self) {
        let remaining = self.remaining();
        if !remaining.is_zero() {
            tracing::trace!("throttling for {:?}", remaining);
            tokio::time::sleep(remaining).await;
        }
        self.last_request = Some(Instant::now());
    }
}
