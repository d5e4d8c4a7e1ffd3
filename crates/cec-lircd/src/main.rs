//! `cec-lircd` entry point.
//!
//! Loads the config file, layers command-line flags over it, optionally
//! detaches from the terminal, and runs the [`Daemon`] until SIGINT/SIGTERM.
//!
//! # What happens at startup
//!
//! 1. CLI arguments are parsed with `clap` into a [`Cli`] struct.
//! 2. The TOML config is loaded (defaults if the file does not exist) and
//!    every flag given on the command line overrides its config value.
//! 3. Unless `--foreground` is given, the process daemonizes.
//! 4. `tracing_subscriber` is initialised.  `RUST_LOG` wins; otherwise the
//!    level comes from `--verbose` or the config's `log_level`.
//! 5. Signal handlers are installed and [`Daemon::run`] takes over.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use cec_core::HdmiAddress;
use cec_lircd::application::ports::CecAdapter;
use cec_lircd::infrastructure::cec_adapter::format_device_list;
use cec_lircd::infrastructure::cec_adapter::mock::MockCecAdapter;
use cec_lircd::infrastructure::daemon::{Daemon, DaemonOptions};
use cec_lircd::infrastructure::storage::config::{load_config, DaemonConfig, DEFAULT_CONFIG_PATH};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// HDMI-CEC to LIRC bridge.
///
/// Receives remote control key presses from the TV over HDMI-CEC and
/// publishes them on a LIRC daemon socket.
#[derive(Debug, Parser)]
#[command(name = "cec-lircd", version)]
struct Cli {
    /// Path of the LIRC socket clients connect to.
    #[arg(short = 'd', long = "socket", value_name = "PATH")]
    socket: Option<PathBuf>,

    /// Stay in the foreground instead of daemonizing.
    #[arg(short, long)]
    foreground: bool,

    /// List the detected CEC adapters and exit.
    #[arg(short, long)]
    list: bool,

    /// Log verbosity: 0 = info, 1 = debug, 2 = trace.
    #[arg(short, long, value_name = "N")]
    verbose: Option<u8>,

    /// Do not make this device the active source.
    #[arg(short = 'a', long)]
    no_activate: bool,

    /// CEC adapter port name.  Defaults to the first adapter found.
    #[arg(short, long, value_name = "DEVICE")]
    port: Option<String>,

    /// HDMI input this device is connected to: `tv`, `tv.N`, `av.N` or a
    /// physical address such as `1.0.0.0`.
    #[arg(short = 't', long, value_name = "ADDR")]
    address: Option<HdmiAddress>,

    /// TOML config file.
    #[arg(short, long, value_name = "PATH", default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Shell command run when the TV goes to standby.
    #[arg(long, value_name = "CMD")]
    on_standby: Option<String>,

    /// Shell command run when this device becomes the active source.
    #[arg(long, value_name = "CMD")]
    on_activate: Option<String>,

    /// Shell command run when another device becomes the active source.
    #[arg(long, value_name = "CMD")]
    on_deactivate: Option<String>,
}

impl Cli {
    /// Overrides `config` with every flag that was given.
    fn apply_to(&self, config: &mut DaemonConfig) {
        if let Some(socket) = &self.socket {
            config.daemon.socket_path = socket.clone();
        }
        if self.no_activate {
            config.daemon.make_active = false;
        }
        if let Some(port) = &self.port {
            config.daemon.device = Some(port.clone());
        }
        if let Some(address) = self.address {
            config.daemon.target_address = Some(address);
        }
        if let Some(level) = self.verbose.map(level_for_verbosity) {
            config.daemon.log_level = level.to_string();
        }
        if let Some(cmd) = &self.on_standby {
            config.actions.on_standby = Some(cmd.clone());
        }
        if let Some(cmd) = &self.on_activate {
            config.actions.on_activate = Some(cmd.clone());
        }
        if let Some(cmd) = &self.on_deactivate {
            config.actions.on_deactivate = Some(cmd.clone());
        }
    }
}

fn level_for_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = load_config(&cli.config)
        .with_context(|| format!("cannot load config {}", cli.config.display()))?;
    cli.apply_to(&mut config);

    if cli.list {
        let devices = MockCecAdapter::new().list_devices().context("cannot list CEC adapters")?;
        print!("{}", format_device_list(&devices));
        return Ok(());
    }

    if !cli.foreground {
        nix::unistd::daemon(false, false).context("cannot daemonize")?;
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.daemon.log_level)),
        )
        .init();

    info!(version = env!("CARGO_PKG_VERSION"), "cec-lircd starting");
    warn!("no hardware CEC binding compiled in, using the in-process adapter");

    let options = DaemonOptions::from_config(&config);
    let mut daemon = Daemon::new(Box::new(MockCecAdapter::new()), options);
    daemon.install_signal_handlers()?;
    daemon.run().context("daemon failed")?;

    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
