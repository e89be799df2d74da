//! Quiet-period debouncing for bursty input.
//!
//! A [`Debouncer`] accepts values at any rate and emits only the most recent
//! one once no new value has arrived for the quiet period.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::trace;

/// Handle feeding values into a debouncing task.
///
/// Dropping the handle stops the task; a value still waiting for its quiet
/// period is discarded.
#[derive(Debug)]
pub struct Debouncer<T> {
    input: mpsc::UnboundedSender<T>,
    quiet: Duration,
    task: JoinHandle<()>,
}

/// Start a debouncing task on the current tokio runtime.
///
/// Returns the input handle and the receiver of settled values.
#[must_use]
pub fn debounce<T: Send + 'static>(quiet: Duration) -> (Debouncer<T>, mpsc::UnboundedReceiver<T>) {
    let (input, input_rx) = mpsc::unbounded_channel();
    let (output, output_rx) = mpsc::unbounded_channel();
    let task = tokio::spawn(run(quiet, input_rx, output));
    (Debouncer { input, quiet, task }, output_rx)
}

impl<T> Debouncer<T> {
    /// Submit a value, replacing any value still waiting and restarting the
    /// quiet period.
    ///
    /// Returns `false` if the task has stopped.
    pub fn push(&self, value: T) -> bool {
        self.input.send(value).is_ok()
    }

    /// The quiet period.
    #[must_use]
    pub fn quiet(&self) -> Duration {
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
    let mut pending: Option<T> = None;
    let mut deadline: Option<Instant> = None;

    loop {
        let sleep_until = deadline.unwrap_or_else(|| Instant::now() + Duration::from_secs(3600));

        tokio::select! {
            () = tokio::time::sleep_until(sleep_until), if deadline.is_some() => {
                deadline = None;
                if let Some(value) = pending.take() {
                    trace!("Quiet period elapsed, emitting value");
                    if output.send(value).is_err() {
                        break;
                    }
                }
            }

            received = input.recv() => {
                match received {
                    Some(value) => {
                        pending = Some(value);
                        deadline = Some(Instant::now() + quiet);
                    }
                    None => break,
                }
            }
        }
    }
}
