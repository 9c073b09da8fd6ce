//! Fixed-interval polling
//!
//! Chat messages and notification counts are refreshed on timers rather
//! than pushed. A [`Poller`] owns the timer task; dropping the handle
//! cancels it, so a view that goes away stops its own polling and no
//! update is applied against a dead view.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::warn;

use crate::error::Error;

/// Handle to a background polling task. Aborts the task on drop.
pub struct Poller {
    handle: JoinHandle<()>,
}

impl Poller {
    /// Spawn a polling task that runs `tick` immediately and then once per
    /// `interval`. A failed cycle is logged and the loop continues — the
    /// subscriber simply keeps its previous state.
    ///
    /// Must be called inside a tokio runtime.
    pub fn spawn<F, Fut>(interval: Duration, mut tick: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), Error>> + Send,
    {
        let handle = tokio::spawn(async move {
            let mut timer = tokio::time::interval(interval);
            timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                timer.tick().await;
                if let Err(err) = tick().await {
                    warn!(error = %err, "poll cycle failed");
                }
            }
        });
        Self { handle }
    }

    /// Stop polling. Equivalent to dropping the handle.
    pub fn stop(&self) {
        self.handle.abort();
    }

    /// Whether the polling task is still running
    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn polls_immediately_then_on_interval() {
        let ticks = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&ticks);

        let _poller = Poller::spawn(Duration::from_secs(5), move || {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        });

        // First tick fires without waiting for the interval.
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_secs(11)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_handle_cancels_polling() {
        let ticks = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&ticks);

        let poller = Poller::spawn(Duration::from_secs(5), move || {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        });

        tokio::time::sleep(Duration::from_millis(10)).await;
        drop(poller);

        let before = ticks.load(Ordering::SeqCst);
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), before);
    }

    #[tokio::test(start_paused = true)]
    async fn a_failed_cycle_keeps_the_loop_alive() {
        let ticks = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&ticks);

        let _poller = Poller::spawn(Duration::from_secs(5), move || {
            let counter = Arc::clone(&counter);
            async move {
                let n = counter.fetch_add(1, Ordering::SeqCst);
                if n == 0 {
                    Err(Error::Api {
                        status: 503,
                        message: "transient".to_string(),
                    })
                } else {
                    Ok(())
                }
            }
        });

        tokio::time::sleep(Duration::from_secs(6)).await;
        assert!(ticks.load(Ordering::SeqCst) >= 2);
    }
}
