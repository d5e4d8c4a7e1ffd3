//! Ordered hand-off of [`Command`]s to the dispatch thread.
//!
//! Any number of producer threads (adapter callbacks, the signal thread) call
//! [`CommandQueue::push`]; exactly one consumer, the dispatch loop, calls
//! [`CommandQueue::pop`] and [`CommandQueue::wait`].
//!
//! # Running flag
//!
//! The queue only accepts commands while a session is running.  Pushes made
//! while it is stopped (during startup, between a restart's close and reopen,
//! or after exit) are discarded, so no backlog builds up from a link that is
//! being torn down.

use std::collections::VecDeque;
use std::time::Duration;

use cec_core::Command;
use parking_lot::{Condvar, Mutex};
use tracing::trace;

#[derive(Debug, Default)]
struct QueueState {
    running: bool,
    commands: VecDeque<Command>,
}

/// Mutex-and-condvar protected FIFO of commands.
#[derive(Debug, Default)]
pub struct CommandQueue {
    state: Mutex<QueueState>,
    available: Condvar,
}

impl CommandQueue {
    /// Creates a stopped, empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enters the running state with an empty queue.
    pub fn start(&self) {
        let mut state = self.state.lock();
        state.commands.clear();
        state.running = true;
    }

    /// Leaves the running state, discarding queued commands, and wakes the
    /// consumer.  Returns how many commands were discarded.
    pub fn stop(&self) -> usize {
        let discarded = {
            let mut state = self.state.lock();
            state.running = false;
            let n = state.commands.len();
            state.commands.clear();
            n
        };
        self.available.notify_all();
        discarded
    }

    /// Returns `true` while a session is running.
    pub fn is_running(&self) -> bool {
        self.state.lock().running
    }

    /// Appends `command` and wakes the consumer.
    ///
    /// Returns `false` (and drops the command) if the queue is not running.
    pub fn push(&self, command: Command) -> bool {
        {
            let mut state = self.state.lock();
            if !state.running {
                trace!(%command, "queue stopped, command dropped");
                return false;
            }
            state.commands.push_back(command);
        }
        self.available.notify_one();
        true
    }

    /// Removes the oldest command.  Returns `None` when empty or stopped.
    pub fn pop(&self) -> Option<Command> {
        let mut state = self.state.lock();
        if !state.running {
            return None;
        }
        state.commands.pop_front()
    }

    /// Blocks until a command is pushed, the queue is stopped, or `timeout`
    /// elapses.  Returns whether the queue is still running.
    pub fn wait(&self, timeout: Duration) -> bool {
        let mut state = self.state.lock();
        if state.running && state.commands.is_empty() {
            let _ = self.available.wait_for(&mut state, timeout);
        }
        state.running
    }

    /// Number of queued commands.
    pub fn len(&self) -> usize {
        self.state.lock().commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;
    use std::time::Instant;

    use super::*;

    fn running_queue() -> CommandQueue {
        let q = CommandQueue::new();
        q.start();
        q
    }

    #[test]
    fn test_new_queue_is_stopped_and_empty() {
        let q = CommandQueue::new();
        assert!(!q.is_running());
        assert!(q.is_empty());
    }

    #[test]
    fn test_push_then_pop_is_fifo() {
        // Arrange
        let q = running_queue();

        // Act
        assert!(q.push(Command::Standby));
        assert!(q.push(Command::KeyPress(0x01)));
        assert!(q.push(Command::Activate));

        // Assert
        assert_eq!(q.pop(), Some(Command::Standby));
        assert_eq!(q.pop(), Some(Command::KeyPress(0x01)));
        assert_eq!(q.pop(), Some(Command::Activate));
        assert_eq!(q.pop(), None);
    }

    #[test]
    fn test_push_while_stopped_is_dropped() {
        // Arrange
        let q = CommandQueue::new();

        // Act
        let accepted = q.push(Command::KeyPress(0x00));

        // Assert
        assert!(!accepted);
        assert_eq!(q.len(), 0);
    }

    #[test]
    fn test_stop_discards_pending_commands() {
        // Arrange
        let q = running_queue();
        q.push(Command::Standby);
        q.push(Command::Inactive);

        // Act
        let discarded = q.stop();

        // Assert
        assert_eq!(discarded, 2);
        assert!(q.is_empty());
        assert_eq!(q.pop(), None);
        assert!(!q.push(Command::Exit), "pushes after stop must be dropped");
    }

    #[test]
    fn test_start_clears_commands_left_from_previous_session() {
        let q = running_queue();
        q.push(Command::Standby);
        q.start();
        assert!(q.is_empty());
        assert!(q.is_running());
    }

    #[test]
    fn test_wait_returns_promptly_when_command_pushed() {
        // Arrange
        let q = Arc::new(running_queue());
        let producer = {
            let q = Arc::clone(&q);
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(50));
                q.push(Command::KeyPress(0x44));
            })
        };

        // Act
        let started = Instant::now();
        let still_running = q.wait(Duration::from_secs(5));

        // Assert
        producer.join().unwrap();
        assert!(still_running);
        assert!(started.elapsed() < Duration::from_secs(4), "wait should wake on push");
        assert_eq!(q.pop(), Some(Command::KeyPress(0x44)));
    }

    #[test]
    fn test_wait_times_out_when_idle() {
        let q = running_queue();
        let started = Instant::now();
        assert!(q.wait(Duration::from_millis(30)));
        assert!(started.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn test_wait_reports_stop_from_another_thread() {
        // Arrange
        let q = Arc::new(running_queue());
        let stopper = {
            let q = Arc::clone(&q);
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(50));
                q.stop();
            })
        };

        // Act
        let mut running = true;
        let started = Instant::now();
        while running && started.elapsed() < Duration::from_secs(5) {
            running = q.wait(Duration::from_secs(1));
        }

        // Assert
        stopper.join().unwrap();
        assert!(!running);
    }

    #[test]
    fn test_multi_producer_pushes_preserve_per_thread_order() {
        // Arrange
        const PRODUCERS: u8 = 4;
        const PER_PRODUCER: u8 = 50;
        let q = Arc::new(running_queue());

        // Act: each producer pushes KeyPress(base + i) in program order.
        let handles: Vec<_> = (0..PRODUCERS)
            .map(|p| {
                let q = Arc::clone(&q);
                thread::spawn(move || {
                    for i in 0..PER_PRODUCER {
                        assert!(q.push(Command::KeyPress(p * 60 + i)));
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let mut drained = Vec::new();
        while let Some(cmd) = q.pop() {
            drained.push(cmd);
        }

        // Assert
        assert_eq!(drained.len(), usize::from(PRODUCERS) * usize::from(PER_PRODUCER));
        for p in 0..PRODUCERS {
            let seen: Vec<u8> = drained
                .iter()
                .filter_map(|c| match c {
                    Command::KeyPress(code) if code / 60 == p => Some(code % 60),
                    _ => None,
                })
                .collect();
            let expected: Vec<u8> = (0..PER_PRODUCER).collect();
            assert_eq!(seen, expected, "producer {p} order must be preserved");
        }
    }
}
