//! Cancellable debouncer for keystroke-driven input.
//!
//! A [`Debouncer`] owns a background tokio task fed through an unbounded
//! channel. Once the input has been quiet for the configured period, the
//! task forwards the last value it saw to the output channel. Each burst of
//! input produces exactly one output.
//!
//! The task lives exactly as long as the handle: [`Debouncer::cancel`] or
//! dropping the handle aborts it, so nothing is emitted after teardown.
//!
//! # Example
//!
//! ```rust
//! use eventdesk::app::Debouncer;
//! use std::time::Duration;
//! use tokio::sync::mpsc;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let (tx, mut rx) = mpsc::unbounded_channel();
//! let debouncer = Debouncer::spawn(Duration::from_millis(10), tx);
//!
//! debouncer.push("r");
//! debouncer.push("ru");
//! debouncer.push("rust");
//!
//! assert_eq!(rx.recv().await, Some("rust"));
//! # }
//! ```

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Handle to a running debounce task.
#[derive(Debug)]
pub struct Debouncer<T> {
    input: mpsc::UnboundedSender<T>,
    task: JoinHandle<()>,
    quiet: Duration,
}

impl<T: Send + 'static> Debouncer<T> {
    /// Spawns the debounce task on the current tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    #[must_use]
    pub fn spawn(quiet: Duration, output: mpsc::UnboundedSender<T>) -> Self {
        let (input, receiver) = mpsc::unbounded_channel();
        let task = tokio::spawn(run(quiet, receiver, output));

        tracing::debug!(quiet_ms = quiet.as_millis(), "debouncer started");
        Self { input, task, quiet }
    }

    /// Feeds a value. Returns `false` if the debouncer was cancelled.
    pub fn push(&self, value: T) -> bool {
        self.input.send(value).is_ok()
    }

    /// Stops the task. Any value still waiting for its quiet period is dropped.
    pub fn cancel(&self) {
        if !self.task.is_finished() {
            tracing::debug!("debouncer cancelled");
        }
        self.task.abort();
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.task.is_finished()
    }

    #[must_use]
    pub const fn quiet_period(&self) -> Duration {
        self.quiet
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run<T>(
    quiet: Duration,
    mut input: mpsc::UnboundedReceiver<T>,
    output: mpsc::UnboundedSender<T>,
) {
    while let Some(mut latest) = input.recv().await {
        loop {
            match tokio::time::timeout(quiet, input.recv()).await {
                Ok(Some(value)) => latest = value,
                Ok(None) => return,
                Err(_elapsed) => break,
            }
        }

        if output.send(latest).is_err() {
            return;
        }
    }
}
