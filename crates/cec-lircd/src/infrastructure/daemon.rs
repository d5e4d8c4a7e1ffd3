//! Lifecycle supervisor: opens the adapter and the socket, runs a session,
//! and reopens everything on restart.
//!
//! # Session lifecycle
//!
//! ```text
//! Daemon::run()
//!  └─ loop
//!       ├─ adapter.open(EventCallbackAdapter)
//!       ├─ adapter.set_target_address()      (if configured)
//!       ├─ BroadcastServer::open + AcceptLoop
//!       ├─ queue.start()                     -- Running
//!       ├─ adapter.make_active()             (if the flag is set)
//!       ├─ Dispatcher::run_session()         -- until Restart or Exit
//!       └─ close socket, close adapter       -- Stopped
//! ```
//!
//! On `Restart` the adapter is closed without giving up active source and the
//! loop goes round again.  On `Exit` the adapter is closed as inactive and
//! [`Daemon::run`] returns.
//!
//! If either open fails, whatever was already opened is closed and the error
//! is returned.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use cec_core::{Command, HdmiAddress};
use parking_lot::Mutex;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::application::callbacks::EventCallbackAdapter;
use crate::application::command_queue::CommandQueue;
use crate::application::dispatch::{ActionHooks, Dispatcher, SessionEnd};
use crate::application::key_emitter::KeyEmitter;
use crate::application::ports::{ActionRunner, AdapterError, AdapterSettings, CecAdapter};
use crate::infrastructure::actions::ShellActionRunner;
use crate::infrastructure::cec_adapter::{clamp_osd_name, default_osd_name};
use crate::infrastructure::lirc_socket::{AcceptLoop, BroadcastServer, LircSocketError};
use crate::infrastructure::signals::SignalBridge;
use crate::infrastructure::storage::config::DaemonConfig;

/// Error type for the supervisor.
#[derive(Debug, Error)]
pub enum DaemonError {
    /// The CEC adapter could not be opened.
    #[error(transparent)]
    Adapter(#[from] AdapterError),
    /// The LIRC socket could not be opened.
    #[error(transparent)]
    Socket(#[from] LircSocketError),
    /// Signal handlers could not be installed.
    #[error("failed to install signal handlers: {0}")]
    Signals(#[source] std::io::Error),
}

/// Everything the supervisor needs to open a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaemonOptions {
    pub socket_path: PathBuf,
    pub settings: AdapterSettings,
    /// Initial value of the shared "make active" flag.
    pub make_active: bool,
    pub target: Option<HdmiAddress>,
    pub hooks: ActionHooks,
    pub source_tag: String,
}

impl DaemonOptions {
    /// Builds options from a loaded config file.  A missing OSD name falls
    /// back to the hostname.
    pub fn from_config(config: &DaemonConfig) -> Self {
        let osd_name = match &config.daemon.osd_name {
            Some(name) => clamp_osd_name(name),
            None => default_osd_name(),
        };
        Self {
            socket_path: config.daemon.socket_path.clone(),
            settings: AdapterSettings { device: config.daemon.device.clone(), osd_name },
            make_active: config.daemon.make_active,
            target: config.daemon.target_address,
            hooks: config.actions.hooks(),
            source_tag: config.daemon.source_tag.clone(),
        }
    }
}

/// Cloneable access to a running [`Daemon`] from other threads.
#[derive(Debug, Clone)]
pub struct DaemonHandle {
    queue: Arc<CommandQueue>,
    endpoint: Arc<Mutex<Option<Arc<BroadcastServer>>>>,
    sessions: Arc<AtomicU64>,
}

impl DaemonHandle {
    /// Queues `command`.  Returns `false` if no session is running.
    pub fn push(&self, command: Command) -> bool {
        self.queue.push(command)
    }

    /// Requests a restart of the current session.
    pub fn restart(&self) -> bool {
        self.push(Command::Restart)
    }

    /// Requests shutdown.
    pub fn stop(&self) -> bool {
        self.push(Command::Exit)
    }

    /// Returns `true` while a session is running.
    pub fn is_running(&self) -> bool {
        self.queue.is_running()
    }

    /// Number of connected LIRC clients, zero between sessions.
    pub fn subscriber_count(&self) -> usize {
        self.endpoint.lock().as_ref().map_or(0, |server| server.subscriber_count())
    }

    /// How many sessions have entered Running so far.
    pub fn sessions_started(&self) -> u64 {
        self.sessions.load(Ordering::Acquire)
    }
}

/// Owns the adapter and the per-session resources.
pub struct Daemon {
    adapter: Box<dyn CecAdapter>,
    options: DaemonOptions,
    queue: Arc<CommandQueue>,
    make_active: Arc<AtomicBool>,
    dispatcher: Dispatcher,
    signals: Option<SignalBridge>,
    endpoint: Arc<Mutex<Option<Arc<BroadcastServer>>>>,
    sessions: Arc<AtomicU64>,
}

impl Daemon {
    /// Creates a daemon that runs configured actions with `sh -c`.
    pub fn new(adapter: Box<dyn CecAdapter>, options: DaemonOptions) -> Self {
        Self::with_actions(adapter, options, Arc::new(ShellActionRunner::new()))
    }

    pub fn with_actions(
        adapter: Box<dyn CecAdapter>,
        options: DaemonOptions,
        actions: Arc<dyn ActionRunner>,
    ) -> Self {
        let queue = Arc::new(CommandQueue::new());
        let make_active = Arc::new(AtomicBool::new(options.make_active));
        let dispatcher = Dispatcher::new(
            Arc::clone(&queue),
            KeyEmitter::new(options.source_tag.clone()),
            actions,
            options.hooks.clone(),
            Arc::clone(&make_active),
        );
        Self {
            adapter,
            options,
            queue,
            make_active,
            dispatcher,
            signals: None,
            endpoint: Arc::new(Mutex::new(None)),
            sessions: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn handle(&self) -> DaemonHandle {
        DaemonHandle {
            queue: Arc::clone(&self.queue),
            endpoint: Arc::clone(&self.endpoint),
            sessions: Arc::clone(&self.sessions),
        }
    }

    /// Routes SIGHUP/SIGPIPE (restart) and SIGINT/SIGTERM (exit) to the
    /// command queue.
    ///
    /// # Errors
    ///
    /// Returns [`DaemonError::Signals`] if registration or the thread spawn
    /// fails.
    pub fn install_signal_handlers(&mut self) -> Result<(), DaemonError> {
        let bridge = SignalBridge::install(Arc::clone(&self.queue)).map_err(DaemonError::Signals)?;
        self.signals = Some(bridge);
        Ok(())
    }

    /// Runs sessions until one ends with `Exit`.
    ///
    /// # Errors
    ///
    /// Returns the open error of the adapter or the socket.  Resources
    /// opened before the failure are closed first.
    pub fn run(&mut self) -> Result<(), DaemonError> {
        loop {
            match self.run_session()? {
                SessionEnd::Restart => info!("restarting"),
                SessionEnd::Exit => {
                    info!("stopped");
                    return Ok(());
                }
            }
        }
    }

    fn run_session(&mut self) -> Result<SessionEnd, DaemonError> {
        let callbacks = Arc::new(EventCallbackAdapter::new(
            Arc::clone(&self.queue),
            Arc::clone(&self.make_active),
        ));
        self.adapter.open(&self.options.settings, callbacks)?;
        info!(osd_name = %self.options.settings.osd_name, "CEC adapter opened");

        if let Some(target) = self.options.target {
            if let Err(e) = self.adapter.set_target_address(target) {
                warn!(%target, "cannot set HDMI target address: {e}");
            }
        }

        let (server, mut accept) = match open_endpoint(&self.options.socket_path) {
            Ok(opened) => opened,
            Err(e) => {
                self.adapter.close(false);
                return Err(e.into());
            }
        };
        *self.endpoint.lock() = Some(Arc::clone(&server));

        self.queue.start();
        self.set_signals_running(true);
        let session = self.sessions.fetch_add(1, Ordering::AcqRel) + 1;
        info!(session, socket = %server.path().display(), "running");

        if self.make_active.load(Ordering::Acquire) {
            if let Err(e) = self.adapter.make_active() {
                warn!("cannot claim active source: {e}");
            }
        }

        let end = self.dispatcher.run_session(server.as_ref());
        debug!(?end, "session ended");

        self.set_signals_running(false);
        accept.shutdown();
        *self.endpoint.lock() = None;
        server.close();
        self.adapter.close(end == SessionEnd::Exit);
        Ok(end)
    }

    fn set_signals_running(&self, running: bool) {
        if let Some(signals) = &self.signals {
            signals.set_running(running);
        }
    }
}

impl Drop for Daemon {
    fn drop(&mut self) {
        self.queue.stop();
        self.adapter.close(true);
    }
}

fn open_endpoint(
    path: &std::path::Path,
) -> Result<(Arc<BroadcastServer>, AcceptLoop), LircSocketError> {
    let server = Arc::new(BroadcastServer::open(path)?);
    match AcceptLoop::spawn(Arc::clone(&server)) {
        Ok(accept) => Ok((server, accept)),
        Err(e) => {
            server.close();
            Err(e)
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
