//! Trailing-edge debounce over tokio time
//!
//! Delays propagation of a rapidly-changing value until the input has been
//! quiet for the full interval. Used to keep keystroke-level search churn
//! away from the backend query layer.

use std::time::Duration;

use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

/// A debounced value
///
/// [`push`](Debounced::push) re-arms the internal timer on every call; the
/// output only updates once the input has remained unchanged for the full
/// interval. There is no leading-edge emission and no maximum-wait ceiling:
/// an input that keeps changing never emits until it pauses.
///
/// Dropping the handle cancels any pending emission, so a value armed just
/// before teardown never lands.
///
/// Must be created inside a tokio runtime; the worker is a spawned task.
pub struct Debounced<T> {
    input: watch::Sender<T>,
    output: watch::Receiver<T>,
}

impl<T> Debounced<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Create a debounced value with the given initial value and interval
    pub fn new(initial: T, interval: Duration) -> Self {
        let (input, mut in_rx) = watch::channel(initial.clone());
        let (out_tx, output) = watch::channel(initial);

        tokio::spawn(async move {
            loop {
                // Wait for the next input change; exit once the handle is gone
                if in_rx.changed().await.is_err() {
                    return;
                }

                // Re-arm until the input stays quiet for the full interval
                loop {
                    let quiet = tokio::time::sleep(interval);
                    tokio::pin!(quiet);

                    tokio::select! {
                        _ = &mut quiet => {
                            let value = in_rx.borrow_and_update().clone();
                            if out_tx.send(value).is_err() {
                                return;
                            }
                            break;
                        }
                        changed = in_rx.changed() => {
                            if changed.is_err() {
                                return;
                            }
                            // Input moved again, timer re-arms
                        }
                    }
                }
            }
        });

        Self { input, output }
    }

    /// Feed a new input value, re-arming the timer
    pub fn push(&self, value: T) {
        // Send only fails when the worker is gone, which means the handle
        // itself is being torn down
        let _ = self.input.send(value);
    }

    /// The most recently emitted (settled) value
    pub fn current(&self) -> T {
        self.output.borrow().clone()
    }

    /// Subscribe to settled values
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.output.clone()
    }

    /// Settled values as a stream
    pub fn stream(&self) -> WatchStream<T> {
        WatchStream::new(self.output.clone())
    }
}
