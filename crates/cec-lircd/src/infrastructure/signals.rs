//! Delivery of OS signals to the command queue.
//!
//! # How signals reach the dispatch loop (for beginners)
//!
//! A signal handler runs on whatever thread the kernel interrupts, in the
//! middle of arbitrary code.  It must not take locks or allocate, so it cannot
//! push onto the [`CommandQueue`] directly.  `signal-hook`'s iterator installs
//! a handler that only writes a byte to a self-pipe; a normal thread reads the
//! pipe, maps each signal with [`command_for_signal`], and pushes the result.
//!
//! While no session is running the handled signals keep their default
//! behaviour (terminate the process).  This is done with
//! `register_conditional_default`, armed by a flag that [`SignalBridge::set_running`]
//! clears for the duration of each session.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use cec_core::Command;
use signal_hook::consts::signal::{SIGHUP, SIGINT, SIGPIPE, SIGTERM};
use signal_hook::iterator::{Handle, Signals};
use signal_hook::SigId;
use tracing::{debug, info, warn};

use crate::application::command_queue::CommandQueue;

/// Signals the bridge handles.
pub const HANDLED_SIGNALS: [i32; 4] = [SIGHUP, SIGPIPE, SIGINT, SIGTERM];

/// SIGHUP and SIGPIPE restart the session; every other handled signal exits.
pub fn command_for_signal(signal: i32) -> Command {
    match signal {
        SIGHUP | SIGPIPE => Command::Restart,
        _ => Command::Exit,
    }
}

/// Owns the signal thread.  Dropping it unregisters the handlers.
pub struct SignalBridge {
    defaults: Arc<AtomicBool>,
    default_ids: Vec<SigId>,
    handle: Handle,
    thread: Option<JoinHandle<()>>,
}

impl SignalBridge {
    /// Registers the handlers and starts the thread that forwards signals
    /// to `queue`.  Default actions are armed until [`set_running`](Self::set_running).
    pub fn install(queue: Arc<CommandQueue>) -> io::Result<Self> {
        let defaults = Arc::new(AtomicBool::new(true));
        let mut default_ids = Vec::with_capacity(HANDLED_SIGNALS.len());
        for signal in HANDLED_SIGNALS {
            default_ids.push(signal_hook::flag::register_conditional_default(
                signal,
                Arc::clone(&defaults),
            )?);
        }

        let mut signals = Signals::new(HANDLED_SIGNALS)?;
        let handle = signals.handle();
        let thread = thread::Builder::new().name("signals".to_string()).spawn(move || {
            for signal in signals.forever() {
                let command = command_for_signal(signal);
                info!(signal, %command, "signal received");
                if !queue.push(command) {
                    debug!(signal, "no session running, signal ignored");
                }
            }
            debug!("signal thread exiting");
        })?;

        Ok(Self { defaults, default_ids, handle, thread: Some(thread) })
    }

    /// Disarms the default actions while a session runs and re-arms them
    /// when it ends.
    pub fn set_running(&self, running: bool) {
        self.defaults.store(!running, Ordering::SeqCst);
    }

    /// Returns `true` if the default actions are currently armed.
    pub fn defaults_armed(&self) -> bool {
        self.defaults.load(Ordering::SeqCst)
    }
}

impl Drop for SignalBridge {
    fn drop(&mut self) {
        for id in self.default_ids.drain(..) {
            signal_hook::low_level::unregister(id);
        }
        self.handle.close();
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                warn!("signal thread panicked");
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
