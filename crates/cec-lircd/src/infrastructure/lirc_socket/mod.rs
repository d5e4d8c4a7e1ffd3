//! The LIRC daemon socket: a Unix stream socket that fans out key lines.
//!
//! LIRC clients connect to `/var/run/lirc/lircd` and read lines until the
//! connection closes.  The server never reads from them.
//!
//! # Threading
//!
//! [`BroadcastServer`] keeps the listener and the subscriber set behind one
//! mutex.  Two threads use it:
//!
//! - the dispatch thread calls [`BroadcastServer::broadcast`] for every key;
//! - the [`AcceptLoop`] thread waits for incoming connections with `poll(2)`
//!   on a duplicate of the listening descriptor, *without* the lock, and
//!   only takes it inside [`BroadcastServer::accept_pending`].
//!
//! # Slow or dead subscribers
//!
//! All subscriber sockets are non-blocking and written with
//! `MSG_NOSIGNAL | MSG_DONTWAIT`.  A send that fails, would block, or is
//! short drops that subscriber.  `MSG_NOSIGNAL` keeps a vanished peer from
//! raising `SIGPIPE`, which the daemon treats as a restart request.

pub mod mock;

use std::fs;
use std::io;
use std::os::fd::{AsFd, AsRawFd};
use std::os::unix::fs::PermissionsExt;
use std::os::unix::net::{UnixListener, UnixStream};
use std::net::Shutdown;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use nix::errno::Errno;
use nix::poll::{poll, PollFd, PollFlags, PollTimeout};
use nix::sys::socket::{send, MsgFlags};
use parking_lot::Mutex;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::application::ports::LineSink;

/// Permissions of the socket file: any local user may subscribe.
pub const SOCKET_MODE: u32 = 0o666;

/// How long the accept thread waits before re-checking its stop flag.
const ACCEPT_POLL_TIMEOUT_MS: u16 = 250;

/// Pause after an accept pass that failed with something other than
/// `WouldBlock`, so a persistent error such as `EMFILE` cannot spin the thread.
const ACCEPT_ERROR_BACKOFF: Duration = Duration::from_millis(100);

/// Size of `sun_path`, including the trailing NUL.
#[cfg(any(target_os = "linux", target_os = "android"))]
const MAX_SOCKET_PATH: usize = 108;
#[cfg(not(any(target_os = "linux", target_os = "android")))]
const MAX_SOCKET_PATH: usize = 104;

/// Error type for the LIRC socket.
#[derive(Debug, Error)]
pub enum LircSocketError {
    /// The socket path could not be prepared or bound.
    #[error("failed to bind LIRC socket at {path}: {source}")]
    Bind {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The bound socket could not be made ready to accept.
    #[error("failed to listen on LIRC socket at {path}: {source}")]
    Listen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The socket file permissions could not be set.
    #[error("failed to set permissions on {path}: {source}")]
    Permissions {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The server has already been closed.
    #[error("LIRC socket is closed")]
    Closed,
    /// The accept thread could not be started.
    #[error("failed to spawn accept thread: {0}")]
    Thread(#[source] io::Error),
}

#[derive(Debug)]
struct Subscriber {
    id: u64,
    stream: UnixStream,
}

#[derive(Debug, Default)]
struct ServerState {
    listener: Option<UnixListener>,
    subscribers: Vec<Subscriber>,
    next_id: u64,
}

/// Listening socket plus the set of connected subscribers.
#[derive(Debug)]
pub struct BroadcastServer {
    path: PathBuf,
    state: Mutex<ServerState>,
}

impl BroadcastServer {
    /// Binds the socket at `path`, replacing any stale socket file.
    ///
    /// # Errors
    ///
    /// - [`LircSocketError::Bind`] if the path is too long, its directory
    ///   cannot be created, or the bind fails.
    /// - [`LircSocketError::Listen`] if the listener cannot be made
    ///   non-blocking.
    /// - [`LircSocketError::Permissions`] if the file mode cannot be set.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, LircSocketError> {
        let path = path.as_ref().to_path_buf();
        let bind_err = |source| LircSocketError::Bind { path: path.clone(), source };

        if path.as_os_str().len() >= MAX_SOCKET_PATH {
            return Err(bind_err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("path longer than {} bytes", MAX_SOCKET_PATH - 1),
            )));
        }

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(bind_err)?;
        }

        match fs::remove_file(&path) {
            Ok(()) => debug!(path = %path.display(), "removed stale socket"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!(path = %path.display(), "could not remove stale socket: {e}"),
        }

        // std binds and listens in one step, with a backlog of SOMAXCONN.
        let listener = UnixListener::bind(&path).map_err(bind_err)?;
        listener
            .set_nonblocking(true)
            .map_err(|source| LircSocketError::Listen { path: path.clone(), source })?;
        fs::set_permissions(&path, fs::Permissions::from_mode(SOCKET_MODE))
            .map_err(|source| LircSocketError::Permissions { path: path.clone(), source })?;

        info!(path = %path.display(), "LIRC socket listening");
        Ok(Self {
            path,
            state: Mutex::new(ServerState { listener: Some(listener), ..Default::default() }),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns `false` once [`close`](Self::close) has run.
    pub fn is_open(&self) -> bool {
        self.state.lock().listener.is_some()
    }

    pub fn subscriber_count(&self) -> usize {
        self.state.lock().subscribers.len()
    }

    /// Accepts every connection waiting in the backlog.
    ///
    /// Returns the number accepted.  On a closed server this is a no-op.
    /// Accept errors are logged and end the pass; they never close the
    /// server.
    pub fn accept_pending(&self) -> usize {
        self.accept_pass().accepted
    }

    fn accept_pass(&self) -> AcceptPass {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        let mut pass = AcceptPass::default();
        let Some(listener) = state.listener.as_ref() else {
            return pass;
        };

        loop {
            match listener.accept() {
                Ok((stream, _addr)) => {
                    if let Err(e) = stream.set_nonblocking(true) {
                        warn!("dropping subscriber, cannot make socket non-blocking: {e}");
                        continue;
                    }
                    state.next_id += 1;
                    let id = state.next_id;
                    state.subscribers.push(Subscriber { id, stream });
                    pass.accepted += 1;
                    info!(subscriber = id, total = state.subscribers.len(), "subscriber connected");
                }
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => break,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    warn!("accept failed: {e}");
                    pass.failed = true;
                    break;
                }
            }
        }
        pass
    }

    /// Sends `line` to every subscriber, dropping those that cannot take it.
    ///
    /// Returns the number of subscribers that received the full line.
    pub fn broadcast(&self, line: &str) -> usize {
        let bytes = line.as_bytes();
        let mut state = self.state.lock();
        if state.subscribers.is_empty() {
            return 0;
        }

        let mut delivered = 0;
        state.subscribers.retain(|sub| match send_line(&sub.stream, bytes) {
            Ok(()) => {
                delivered += 1;
                true
            }
            Err(e) => {
                info!(subscriber = sub.id, "subscriber dropped: {e}");
                false
            }
        });
        delivered
    }

    /// Closes the listener and every subscriber, and removes the socket
    /// file.  Idempotent.
    pub fn close(&self) {
        let (had_listener, subscribers) = {
            let mut state = self.state.lock();
            (state.listener.take().is_some(), std::mem::take(&mut state.subscribers))
        };

        for sub in &subscribers {
            let _ = sub.stream.shutdown(Shutdown::Both);
        }
        if !subscribers.is_empty() {
            debug!(count = subscribers.len(), "subscribers disconnected");
        }

        if had_listener {
            if let Err(e) = fs::remove_file(&self.path) {
                if e.kind() != io::ErrorKind::NotFound {
                    warn!(path = %self.path.display(), "could not remove socket: {e}");
                }
            }
            info!(path = %self.path.display(), "LIRC socket closed");
        }
    }

    /// Duplicates the listening descriptor for the accept thread to poll.
    fn listener_clone(&self) -> Result<UnixListener, LircSocketError> {
        let state = self.state.lock();
        let listener = state.listener.as_ref().ok_or(LircSocketError::Closed)?;
        listener.try_clone().map_err(|source| LircSocketError::Listen {
            path: self.path.clone(),
            source,
        })
    }
}

impl LineSink for BroadcastServer {
    fn broadcast(&self, line: &str) -> usize {
        BroadcastServer::broadcast(self, line)
    }
}

impl Drop for BroadcastServer {
    fn drop(&mut self) {
        self.close();
    }
}

fn send_line(stream: &UnixStream, bytes: &[u8]) -> io::Result<()> {
    let flags = MsgFlags::MSG_NOSIGNAL | MsgFlags::MSG_DONTWAIT;
    let sent = send(stream.as_raw_fd(), bytes, flags).map_err(io::Error::from)?;
    if sent == bytes.len() {
        Ok(())
    } else {
        Err(io::Error::new(
            io::ErrorKind::WriteZero,
            format!("short write ({sent} of {} bytes)", bytes.len()),
        ))
    }
}

// ── Accept thread ─────────────────────────────────────────────────────────────

/// Background thread that accepts subscribers for one [`BroadcastServer`].
#[derive(Debug)]
pub struct AcceptLoop {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl AcceptLoop {
    /// Starts accepting connections for `server`.
    ///
    /// # Errors
    ///
    /// Returns [`LircSocketError::Closed`] if the server is closed, or
    /// [`LircSocketError::Thread`] if the thread cannot be spawned.
    pub fn spawn(server: Arc<BroadcastServer>) -> Result<Self, LircSocketError> {
        let listener = server.listener_clone()?;
        let stop = Arc::new(AtomicBool::new(false));
        let thread_stop = Arc::clone(&stop);

        let handle = thread::Builder::new()
            .name("lirc-accept".to_string())
            .spawn(move || accept_loop(&server, &listener, &thread_stop))
            .map_err(LircSocketError::Thread)?;

        Ok(Self { stop, handle: Some(handle) })
    }

    /// Signals the thread to stop and waits for it.  Idempotent.
    pub fn shutdown(&mut self) {
        self.stop.store(true, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("accept thread panicked");
            }
        }
    }
}

impl Drop for AcceptLoop {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Outcome of one drain of the listen backlog.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct AcceptPass {
    accepted: usize,
    failed: bool,
}

impl AcceptPass {
    /// How long the accept thread sleeps before polling again.
    fn backoff(self) -> Option<Duration> {
        self.failed.then_some(ACCEPT_ERROR_BACKOFF)
    }
}

fn accept_loop(server: &BroadcastServer, listener: &UnixListener, stop: &AtomicBool) {
    debug!("accept thread started");
    while !stop.load(Ordering::Acquire) && server.is_open() {
        let mut fds = [PollFd::new(listener.as_fd(), PollFlags::POLLIN)];
        match poll(&mut fds, PollTimeout::from(ACCEPT_POLL_TIMEOUT_MS)) {
            Ok(0) => {}
            Ok(_) => {
                if let Some(pause) = server.accept_pass().backoff() {
                    thread::sleep(pause);
                }
            }
            Err(Errno::EINTR) => {}
            Err(e) => {
                warn!("poll on LIRC socket failed: {e}");
                thread::sleep(Duration::from_millis(u64::from(ACCEPT_POLL_TIMEOUT_MS)));
            }
        }
    }
    debug!("accept thread stopped");
}

// ── Tests ─────────────────────────────────────────────────────────────────────
