//! The dispatch loop: the only place commands are executed.
//!
//! [`Dispatcher::run_session`] pops commands in FIFO order and executes each
//! one with the queue lock released, so producers are never blocked behind a
//! slow shell action.  Because there is exactly one consumer, releasing the
//! lock does not change execution order.
//!
//! `Restart` and `Exit` end the session: the queue is stopped (discarding
//! anything pushed after them) and the caller decides whether to reopen.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use cec_core::{Command, UserControlCode};
use tracing::{debug, error, info, warn};

use super::command_queue::CommandQueue;
use super::key_emitter::KeyEmitter;
use super::ports::{ActionRunner, LineSink};

/// Longest the loop sleeps without re-checking the running flag.
pub const HEARTBEAT: Duration = Duration::from_secs(1);

/// Shell commands run on power/source transitions.  `None` means unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionHooks {
    pub on_standby: Option<String>,
    pub on_activate: Option<String>,
    pub on_deactivate: Option<String>,
}

/// Why a running session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// Reopen the adapter and the socket, then run again.
    Restart,
    /// Shut down.
    Exit,
}

/// Executes commands popped from the queue.
pub struct Dispatcher {
    queue: Arc<CommandQueue>,
    emitter: KeyEmitter,
    actions: Arc<dyn ActionRunner>,
    hooks: ActionHooks,
    make_active: Arc<AtomicBool>,
}

impl Dispatcher {
    pub fn new(
        queue: Arc<CommandQueue>,
        emitter: KeyEmitter,
        actions: Arc<dyn ActionRunner>,
        hooks: ActionHooks,
        make_active: Arc<AtomicBool>,
    ) -> Self {
        Self { queue, emitter, actions, hooks, make_active }
    }

    pub fn emitter(&self) -> &KeyEmitter {
        &self.emitter
    }

    /// Runs until a `Restart` or `Exit` command is executed.
    ///
    /// The queue must already be started.  If it is stopped from outside,
    /// the session ends as [`SessionEnd::Exit`].
    pub fn run_session(&mut self, sink: &dyn LineSink) -> SessionEnd {
        loop {
            if let Some(end) = self.drain(sink) {
                let discarded = self.queue.stop();
                if discarded > 0 {
                    debug!(discarded, "commands discarded at end of session");
                }
                return end;
            }
            if !self.queue.wait(HEARTBEAT) {
                info!("command queue stopped");
                return SessionEnd::Exit;
            }
        }
    }

    /// Executes queued commands until the queue is empty or a command ends
    /// the session.
    pub fn drain(&mut self, sink: &dyn LineSink) -> Option<SessionEnd> {
        while let Some(command) = self.queue.pop() {
            if let Some(end) = self.execute(command, sink) {
                return Some(end);
            }
        }
        None
    }

    /// Executes one command.  Returns `Some` for the session-ending commands.
    pub fn execute(&mut self, command: Command, sink: &dyn LineSink) -> Option<SessionEnd> {
        debug!(%command, "executing");
        match command {
            Command::Standby => {
                match self.hooks.on_standby.clone() {
                    Some(cmd) => self.run_action("standby", &cmd),
                    None => {
                        self.emitter.press_and_release(UserControlCode::Power, sink);
                    }
                }
                None
            }
            Command::Activate => {
                self.make_active.store(true, Ordering::Release);
                if let Some(cmd) = self.hooks.on_activate.clone() {
                    self.run_action("activate", &cmd);
                }
                None
            }
            Command::Inactive => {
                self.make_active.store(false, Ordering::Release);
                if let Some(cmd) = self.hooks.on_deactivate.clone() {
                    self.run_action("deactivate", &cmd);
                }
                None
            }
            Command::KeyPress(code) => {
                if let Err(e) = self.emitter.press(code, sink) {
                    warn!("key press dropped: {e}");
                }
                None
            }
            Command::Restart => Some(SessionEnd::Restart),
            Command::Exit => Some(SessionEnd::Exit),
        }
    }

    fn run_action(&self, label: &str, command: &str) {
        debug!(label, command, "running action");
        if let Err(e) = self.actions.run(label, command) {
            error!("{e}");
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;
    use crate::application::ports::{ActionError, MockActionRunner};
    use crate::infrastructure::lirc_socket::mock::RecordingSink;
    use mockall::predicate::eq;

    fn dispatcher_with(runner: MockActionRunner, hooks: ActionHooks) -> (Dispatcher, Arc<CommandQueue>, Arc<AtomicBool>) {
        let queue = Arc::new(CommandQueue::new());
        queue.start();
        let make_active = Arc::new(AtomicBool::new(false));
        let d = Dispatcher::new(
            Arc::clone(&queue),
            KeyEmitter::new("RPICEC"),
            Arc::new(runner),
            hooks,
            Arc::clone(&make_active),
        );
        (d, queue, make_active)
    }

    fn idle_runner() -> MockActionRunner {
        let mut runner = MockActionRunner::new();
        runner.expect_run().never();
        runner
    }

    #[test]
    fn test_keypress_emits_mapped_line() {
        // Arrange
        let (mut d, _q, _) = dispatcher_with(idle_runner(), ActionHooks::default());
        let sink = RecordingSink::new();

        // Act
        let end = d.execute(Command::key(UserControlCode::Select), &sink);

        // Assert
        assert_eq!(end, None);
        assert_eq!(sink.lines(), vec!["0 0 KEY_OK RPICEC\n"]);
        assert_eq!(d.emitter().last_emitted(), &["KEY_OK"]);
    }

    #[test]
    fn test_out_of_range_keypress_is_dropped() {
        let (mut d, _q, _) = dispatcher_with(idle_runner(), ActionHooks::default());
        let sink = RecordingSink::new();

        assert_eq!(d.execute(Command::KeyPress(0xF0), &sink), None);
        assert!(sink.lines().is_empty());
    }

    #[test]
    fn test_standby_without_action_emits_power_twice() {
        let (mut d, _q, _) = dispatcher_with(idle_runner(), ActionHooks::default());
        let sink = RecordingSink::new();

        d.execute(Command::Standby, &sink);

        assert_eq!(sink.lines(), vec!["40 0 KEY_POWER RPICEC\n", "40 0 KEY_POWER RPICEC\n"]);
    }

    #[test]
    fn test_standby_with_action_runs_it_instead_of_emitting() {
        // Arrange
        let mut runner = MockActionRunner::new();
        runner
            .expect_run()
            .with(eq("standby"), eq("systemctl suspend"))
            .times(1)
            .returning(|_, _| Ok(()));
        let hooks = ActionHooks { on_standby: Some("systemctl suspend".to_string()), ..Default::default() };
        let (mut d, _q, _) = dispatcher_with(runner, hooks);
        let sink = RecordingSink::new();

        // Act
        d.execute(Command::Standby, &sink);

        // Assert
        assert!(sink.lines().is_empty());
    }

    #[test]
    fn test_failed_action_does_not_end_session() {
        let mut runner = MockActionRunner::new();
        runner.expect_run().times(1).returning(|label, command| {
            Err(ActionError::Failed {
                label: label.to_string(),
                command: command.to_string(),
                status: "exit status: 1".to_string(),
            })
        });
        let hooks = ActionHooks { on_activate: Some("false".to_string()), ..Default::default() };
        let (mut d, _q, make_active) = dispatcher_with(runner, hooks);

        let end = d.execute(Command::Activate, &RecordingSink::new());

        assert_eq!(end, None);
        assert!(make_active.load(Ordering::Acquire), "state is recorded even if the action fails");
    }

    #[test]
    fn test_activate_and_inactive_toggle_make_active_flag() {
        // Arrange
        let mut runner = MockActionRunner::new();
        runner
            .expect_run()
            .with(eq("deactivate"), eq("echo off"))
            .times(1)
            .returning(|_, _| Ok(()));
        let hooks = ActionHooks { on_deactivate: Some("echo off".to_string()), ..Default::default() };
        let (mut d, _q, make_active) = dispatcher_with(runner, hooks);
        let sink = RecordingSink::new();

        // Act / Assert
        d.execute(Command::Activate, &sink);
        assert!(make_active.load(Ordering::Acquire));
        d.execute(Command::Inactive, &sink);
        assert!(!make_active.load(Ordering::Acquire));
        assert!(sink.lines().is_empty());
    }

    #[test]
    fn test_restart_and_exit_end_the_session() {
        let (mut d, _q, _) = dispatcher_with(idle_runner(), ActionHooks::default());
        let sink = RecordingSink::new();
        assert_eq!(d.execute(Command::Restart, &sink), Some(SessionEnd::Restart));
        assert_eq!(d.execute(Command::Exit, &sink), Some(SessionEnd::Exit));
    }

    #[test]
    fn test_run_session_executes_in_order_and_stops_queue_on_exit() {
        // Arrange
        let (mut d, q, _) = dispatcher_with(idle_runner(), ActionHooks::default());
        let sink = RecordingSink::new();
        q.push(Command::key(UserControlCode::Up));
        q.push(Command::key(UserControlCode::Down));
        q.push(Command::Exit);
        q.push(Command::key(UserControlCode::Left));

        // Act
        let end = d.run_session(&sink);

        // Assert
        assert_eq!(end, SessionEnd::Exit);
        assert_eq!(sink.lines(), vec!["1 0 KEY_UP RPICEC\n", "2 0 KEY_DOWN RPICEC\n"]);
        assert!(!q.is_running());
        assert!(q.is_empty(), "commands after exit are discarded");
        assert!(!q.push(Command::key(UserControlCode::Right)), "pushes after exit are dropped");
    }

    #[test]
    fn test_run_session_wakes_for_commands_pushed_later() {
        // Arrange
        let (mut d, q, _) = dispatcher_with(idle_runner(), ActionHooks::default());
        let sink = RecordingSink::new();
        let producer = {
            let q = Arc::clone(&q);
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(20));
                q.push(Command::key(UserControlCode::Play));
                q.push(Command::Restart);
            })
        };

        // Act
        let end = d.run_session(&sink);

        // Assert
        producer.join().unwrap();
        assert_eq!(end, SessionEnd::Restart);
        assert_eq!(sink.lines(), vec!["44 0 KEY_PLAY RPICEC\n"]);
    }

    #[test]
    fn test_run_session_returns_exit_when_queue_stopped_externally() {
        let (mut d, q, _) = dispatcher_with(idle_runner(), ActionHooks::default());
        let stopper = {
            let q = Arc::clone(&q);
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(20));
                q.stop();
            })
        };

        let end = d.run_session(&RecordingSink::new());

        stopper.join().unwrap();
        assert_eq!(end, SessionEnd::Exit);
    }
}
