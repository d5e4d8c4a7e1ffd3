//! Translation of adapter notifications into [`Command`]s.
//!
//! The adapter invokes these hooks on its own threads.  Every hook does a
//! constant amount of work and at most one [`CommandQueue::push`], so the
//! adapter is never held up by the daemon; all side effects happen later on
//! the dispatch thread.

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;

use cec_core::{
    AdapterConfiguration, Alert, CecCommand, Command, DeckControlMode, KeyEvent, LogLevel,
    LogMessage, LogicalAddress, MenuState, Opcode, PlayMode, UserControlCode, MAX_CONTROL_CODE,
};
use tracing::{debug, error, info, trace, warn};

use super::command_queue::CommandQueue;
use super::ports::CecCallbacks;

/// Receives the adapter callbacks and feeds the command queue.
#[derive(Debug)]
pub struct EventCallbackAdapter {
    queue: Arc<CommandQueue>,
    make_active: Arc<AtomicBool>,
    logical_address: AtomicU8,
}

impl EventCallbackAdapter {
    /// `make_active` is shared with the dispatch loop, which flips it on
    /// `Activate` / `Inactive`.
    pub fn new(queue: Arc<CommandQueue>, make_active: Arc<AtomicBool>) -> Self {
        Self {
            queue,
            make_active,
            logical_address: AtomicU8::new(LogicalAddress::Unknown.as_u8()),
        }
    }

    /// The logical address from the last configuration change.
    pub fn logical_address(&self) -> LogicalAddress {
        LogicalAddress::from_u8(self.logical_address.load(Ordering::Acquire))
    }

    fn push(&self, command: Command) {
        if !self.queue.push(command) {
            debug!(%command, "dispatch not running, command dropped");
        }
    }

    /// Maps a bus command to the command the daemon should execute, if any.
    fn translate(&self, command: &CecCommand) -> Option<Command> {
        match command.opcode {
            Opcode::Standby => Some(Command::Standby),
            Opcode::RequestActiveSource => {
                self.make_active.load(Ordering::Acquire).then_some(Command::Activate)
            }
            Opcode::SetMenuLanguage => {
                match command.menu_language(self.logical_address()) {
                    Some(lang) => info!(language = %lang, "TV menu language"),
                    None => debug!(%command, "menu language ignored"),
                }
                None
            }
            Opcode::DeckControl => match command.first_parameter().map(DeckControlMode::from_u8) {
                Some(DeckControlMode::Stop) => Some(Command::key(UserControlCode::Stop)),
                _ => None,
            },
            Opcode::Play => {
                let code = match command.first_parameter().map(PlayMode::from_u8) {
                    Some(PlayMode::PlayStill) => UserControlCode::Pause,
                    _ => UserControlCode::Play,
                };
                Some(Command::key(code))
            }
            Opcode::VendorRemoteButtonUp => {
                trace!(%command, "vendor button released");
                None
            }
            _ => {
                debug!(%command, "unhandled CEC command");
                None
            }
        }
    }
}

impl CecCallbacks for EventCallbackAdapter {
    fn on_log_message(&self, message: &LogMessage) {
        let text = message.message.as_str();
        match message.level {
            LogLevel::Error => error!(target: "cec", time_ms = message.time_ms, "{text}"),
            LogLevel::Warning => warn!(target: "cec", time_ms = message.time_ms, "{text}"),
            LogLevel::Notice => info!(target: "cec", time_ms = message.time_ms, "{text}"),
            LogLevel::Traffic => debug!(target: "cec", time_ms = message.time_ms, "{text}"),
            LogLevel::Debug => trace!(target: "cec", time_ms = message.time_ms, "{text}"),
        }
    }

    fn on_key_press(&self, event: KeyEvent) {
        if event.code > MAX_CONTROL_CODE {
            debug!(code = event.code, "key code outside table, ignored");
            return;
        }
        if !event.is_press_edge() {
            trace!(code = event.code, duration_ms = event.duration_ms, "key held");
            return;
        }
        self.push(Command::KeyPress(event.code));
    }

    fn on_command(&self, command: &CecCommand) {
        if let Some(translated) = self.translate(command) {
            debug!(%command, %translated, "CEC command");
            self.push(translated);
        }
    }

    fn on_configuration_changed(&self, configuration: &AdapterConfiguration) {
        info!(
            logical_address = %configuration.primary_address,
            physical_address = %configuration.physical_address,
            "adapter configuration changed"
        );
        self.logical_address
            .store(configuration.primary_address.as_u8(), Ordering::Release);
    }

    fn on_alert(&self, alert: Alert) {
        if alert.requires_restart() {
            warn!(?alert, "CEC link alert, restarting");
            self.push(Command::Restart);
        } else {
            info!(?alert, "CEC alert");
        }
    }

    fn on_menu_state_changed(&self, state: MenuState) {
        debug!(?state, "menu state changed");
        self.push(Command::key(UserControlCode::ContentsMenu));
    }

    fn on_source_activated(&self, address: LogicalAddress, activated: bool) {
        let ours = self.logical_address();
        if address != ours || ours == LogicalAddress::Unknown {
            trace!(%address, activated, "source change for another device");
            return;
        }
        info!(%address, activated, "source activation changed");
        self.push(if activated { Command::Activate } else { Command::Inactive });
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use cec_core::PhysicalAddress;

    struct Fixture {
        queue: Arc<CommandQueue>,
        make_active: Arc<AtomicBool>,
        adapter: EventCallbackAdapter,
    }

    fn fixture() -> Fixture {
        let queue = Arc::new(CommandQueue::new());
        queue.start();
        let make_active = Arc::new(AtomicBool::new(true));
        let adapter = EventCallbackAdapter::new(Arc::clone(&queue), Arc::clone(&make_active));
        Fixture { queue, make_active, adapter }
    }

    fn drain(queue: &CommandQueue) -> Vec<Command> {
        std::iter::from_fn(|| queue.pop()).collect()
    }

    fn frame(opcode: Opcode, params: &[u8]) -> CecCommand {
        CecCommand::new(LogicalAddress::Tv, LogicalAddress::PlaybackDevice1, opcode, params.to_vec())
    }

    fn configure(adapter: &EventCallbackAdapter, address: LogicalAddress) {
        adapter.on_configuration_changed(&AdapterConfiguration {
            primary_address: address,
            physical_address: PhysicalAddress(0x1000),
            osd_name: "test".to_string(),
        });
    }

    // ── Key presses ───────────────────────────────────────────────────────────

    #[test]
    fn test_key_down_edge_pushes_keypress() {
        let f = fixture();
        f.adapter.on_key_press(KeyEvent::press(0x00));
        assert_eq!(drain(&f.queue), vec![Command::KeyPress(0x00)]);
    }

    #[test]
    fn test_held_key_pushes_nothing() {
        let f = fixture();
        f.adapter.on_key_press(KeyEvent::held(0x00, 500));
        assert!(drain(&f.queue).is_empty());
    }

    #[test]
    fn test_edge_triggered_code_pushes_despite_duration() {
        let f = fixture();
        f.adapter.on_key_press(KeyEvent::held(0x96, 500));
        assert_eq!(drain(&f.queue), vec![Command::KeyPress(0x96)]);
    }

    #[test]
    fn test_out_of_table_code_is_ignored() {
        let f = fixture();
        f.adapter.on_key_press(KeyEvent::press(0xFF));
        assert!(drain(&f.queue).is_empty());
    }

    // ── Bus commands ──────────────────────────────────────────────────────────

    #[test]
    fn test_standby_opcode_pushes_standby() {
        let f = fixture();
        f.adapter.on_command(&frame(Opcode::Standby, &[]));
        assert_eq!(drain(&f.queue), vec![Command::Standby]);
    }

    #[test]
    fn test_active_source_request_honours_make_active_flag() {
        // Arrange
        let f = fixture();

        // Act
        f.adapter.on_command(&frame(Opcode::RequestActiveSource, &[]));
        f.make_active.store(false, Ordering::Release);
        f.adapter.on_command(&frame(Opcode::RequestActiveSource, &[]));

        // Assert
        assert_eq!(drain(&f.queue), vec![Command::Activate]);
    }

    #[test]
    fn test_deck_control_stop_pushes_stop_key() {
        let f = fixture();
        f.adapter.on_command(&frame(Opcode::DeckControl, &[0x03]));
        f.adapter.on_command(&frame(Opcode::DeckControl, &[0x04]));
        assert_eq!(drain(&f.queue), vec![Command::key(UserControlCode::Stop)]);
    }

    #[test]
    fn test_play_modes_map_to_play_and_pause() {
        let f = fixture();
        f.adapter.on_command(&frame(Opcode::Play, &[0x24]));
        f.adapter.on_command(&frame(Opcode::Play, &[0x25]));
        f.adapter.on_command(&frame(Opcode::Play, &[0x05]));
        assert_eq!(
            drain(&f.queue),
            vec![
                Command::key(UserControlCode::Play),
                Command::key(UserControlCode::Pause),
                Command::key(UserControlCode::Play),
            ]
        );
    }

    #[test]
    fn test_informational_opcodes_push_nothing() {
        let f = fixture();
        f.adapter.on_command(&frame(Opcode::SetMenuLanguage, b"deu"));
        f.adapter.on_command(&frame(Opcode::VendorRemoteButtonUp, &[]));
        f.adapter.on_command(&frame(Opcode::GiveOsdName, &[]));
        f.adapter.on_command(&frame(Opcode::Other(0xA7), &[1, 2]));
        assert!(drain(&f.queue).is_empty());
    }

    // ── Alerts ────────────────────────────────────────────────────────────────

    #[test]
    fn test_link_alerts_push_restart() {
        for alert in [
            Alert::ConnectionLost,
            Alert::PermissionError,
            Alert::PortBusy,
            Alert::PhysicalAddressError,
            Alert::TvPollFailed,
        ] {
            let f = fixture();
            f.adapter.on_alert(alert);
            assert_eq!(drain(&f.queue), vec![Command::Restart], "{alert:?}");
        }
    }

    #[test]
    fn test_service_alert_is_logged_only() {
        let f = fixture();
        f.adapter.on_alert(Alert::ServiceDevice);
        f.adapter.on_alert(Alert::Other(9));
        assert!(drain(&f.queue).is_empty());
    }

    // ── Menu / source activation ──────────────────────────────────────────────

    #[test]
    fn test_menu_state_change_pushes_contents_menu_key() {
        let f = fixture();
        f.adapter.on_menu_state_changed(MenuState::Activated);
        assert_eq!(drain(&f.queue), vec![Command::key(UserControlCode::ContentsMenu)]);
    }

    #[test]
    fn test_configuration_change_caches_logical_address() {
        let f = fixture();
        assert_eq!(f.adapter.logical_address(), LogicalAddress::Unknown);
        configure(&f.adapter, LogicalAddress::PlaybackDevice2);
        assert_eq!(f.adapter.logical_address(), LogicalAddress::PlaybackDevice2);
    }

    #[test]
    fn test_source_activation_for_our_address_pushes_activate_or_inactive() {
        // Arrange
        let f = fixture();
        configure(&f.adapter, LogicalAddress::PlaybackDevice1);

        // Act
        f.adapter.on_source_activated(LogicalAddress::PlaybackDevice1, true);
        f.adapter.on_source_activated(LogicalAddress::PlaybackDevice1, false);

        // Assert
        assert_eq!(drain(&f.queue), vec![Command::Activate, Command::Inactive]);
    }

    #[test]
    fn test_source_activation_for_other_address_is_ignored() {
        let f = fixture();
        configure(&f.adapter, LogicalAddress::PlaybackDevice1);
        f.adapter.on_source_activated(LogicalAddress::Tuner1, true);
        assert!(drain(&f.queue).is_empty());
    }

    #[test]
    fn test_source_activation_before_configuration_is_ignored() {
        let f = fixture();
        f.adapter.on_source_activated(LogicalAddress::Unknown, true);
        assert!(drain(&f.queue).is_empty());
    }

    #[test]
    fn test_callbacks_are_dropped_while_queue_stopped() {
        let f = fixture();
        f.queue.stop();
        f.adapter.on_key_press(KeyEvent::press(0x00));
        f.adapter.on_alert(Alert::ConnectionLost);
        assert_eq!(f.queue.len(), 0);
    }

    #[test]
    fn test_log_messages_push_nothing() {
        let f = fixture();
        for level in [LogLevel::Error, LogLevel::Warning, LogLevel::Notice, LogLevel::Traffic, LogLevel::Debug] {
            f.adapter.on_log_message(&LogMessage::new(level, "adapter says hi"));
        }
        assert!(drain(&f.queue).is_empty());
    }
}
