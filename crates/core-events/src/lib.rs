//! Event channel plumbing between the terminal and the owner thread.
//!
//! Channel policy: a single bounded crossbeam channel sized by
//! [`EVENT_CHANNEL_CAP`] carries raw `crossterm` events from one dedicated
//! poll thread to the owner thread. The capacity absorbs bursty input (key
//! auto-repeat, paste storms); when it fills, the poll thread parks in `send`
//! rather than dropping events — with a single producer and a single consumer
//! latency stays low and edit fidelity is preferred over lossy strategies.
//!
//! The poll thread mutates nothing: it forwards events and exits. All UI
//! state is owned and mutated exclusively by the consumer, so no locks exist
//! anywhere in the pipeline.
//!
//! Shutdown: a [`StopFlag`] (single-writer atomic, set at most once) is
//! checked between blocking reads. A thread already parked inside
//! `crossterm::event::read` cannot be interrupted; it notices the flag on its
//! next wake (any key, resize, or channel disconnect). Callers therefore set
//! the flag and detach rather than join.

use crossbeam_channel::{Receiver, Sender, bounded};
use crossterm::event::Event as TermEvent;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::thread::JoinHandle;

/// Bounded queue capacity for raw terminal events.
pub const EVENT_CHANNEL_CAP: usize = 128;

/// Forwarding telemetry. Relaxed atomics; inspected by tests and periodic
/// debug logging, never used for control flow.
pub static EVENTS_FORWARDED: AtomicU64 = AtomicU64::new(0);
pub static SEND_FAILURES: AtomicU64 = AtomicU64::new(0);

/// Process-wide "should stop" signal: one writer, many readers.
#[derive(Debug, Clone, Default)]
pub struct StopFlag(Arc<AtomicBool>);

impl StopFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request shutdown. Idempotent.
    pub fn request_stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Create the bounded event channel.
pub fn event_channel() -> (Sender<TermEvent>, Receiver<TermEvent>) {
    bounded(EVENT_CHANNEL_CAP)
}

/// Spawn the blocking poll thread. It loops on `crossterm::event::read`,
/// forwarding every event into `tx`, and exits when the stop flag is set,
/// the receiver is gone, or the terminal read fails.
pub fn spawn_poll_thread(tx: Sender<TermEvent>, stop: StopFlag) -> JoinHandle<()> {
    std::thread::Builder::new()
        .name("confab-input".into())
        .spawn(move || {
            tracing::info!(target: "input.poll", "poll_thread_start");
            loop {
                if stop.is_set() {
                    break;
                }
                match crossterm::event::read() {
                    Ok(ev) => {
                        if tx.send(ev).is_err() {
                            SEND_FAILURES.fetch_add(1, Ordering::Relaxed);
                            break;
                        }
                        EVENTS_FORWARDED.fetch_add(1, Ordering::Relaxed);
                    }
                    Err(err) => {
                        tracing::error!(target: "input.poll", error = %err, "poll_read_failed");
                        break;
                    }
                }
            }
            tracing::info!(target: "input.poll", "poll_thread_exit");
        })
        .expect("spawn input poll thread")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stop_flag_starts_clear_and_latches() {
        let flag = StopFlag::new();
        assert!(!flag.is_set());
        flag.request_stop();
        assert!(flag.is_set());
        // Setting twice stays set.
        flag.request_stop();
        assert!(flag.is_set());
    }

    #[test]
    fn stop_flag_clones_share_state() {
        let flag = StopFlag::new();
        let other = flag.clone();
        other.request_stop();
        assert!(flag.is_set());
    }

    #[test]
    fn channel_is_bounded_at_cap() {
        let (tx, _rx) = event_channel();
        assert_eq!(tx.capacity(), Some(EVENT_CHANNEL_CAP));
    }
}
