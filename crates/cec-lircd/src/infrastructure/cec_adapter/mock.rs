//! In-process CEC adapter.
//!
//! Allows tests to inject synthetic bus notifications without a physical
//! HDMI-CEC adapter.  Clones share state, so a test can hand one clone to the
//! daemon and keep another to inject events and inspect the lifecycle.
//!
//! Like a real adapter, opening reports a configuration change claiming
//! logical address [`MOCK_LOGICAL_ADDRESS`].

use std::fmt;
use std::sync::Arc;

use cec_core::{
    AdapterConfiguration, Alert, CecCommand, HdmiAddress, KeyEvent, LogicalAddress, MenuState,
    PhysicalAddress,
};
use parking_lot::Mutex;
use tracing::debug;

use super::{AdapterDescriptor, AdapterError, AdapterSettings, CecAdapter, CecCallbacks};

/// Logical address claimed on open.
pub const MOCK_LOGICAL_ADDRESS: LogicalAddress = LogicalAddress::PlaybackDevice1;

/// Physical address claimed on open.
pub const MOCK_PHYSICAL_ADDRESS: PhysicalAddress = PhysicalAddress(0x1000);

#[derive(Default)]
struct MockState {
    callbacks: Option<Arc<dyn CecCallbacks>>,
    settings: Option<AdapterSettings>,
    open_count: u32,
    close_count: u32,
    last_close_made_inactive: Option<bool>,
    make_active_count: u32,
    target: Option<HdmiAddress>,
    fail_open: bool,
}

/// A [`CecAdapter`] driven by test code instead of the bus.
#[derive(Clone, Default)]
pub struct MockCecAdapter {
    state: Arc<Mutex<MockState>>,
}

impl fmt::Debug for MockCecAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.state.lock();
        f.debug_struct("MockCecAdapter")
            .field("open", &s.callbacks.is_some())
            .field("open_count", &s.open_count)
            .field("close_count", &s.close_count)
            .finish()
    }
}

impl MockCecAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes subsequent [`CecAdapter::open`] calls fail.
    pub fn set_fail_open(&self, fail: bool) {
        self.state.lock().fail_open = fail;
    }

    pub fn is_open(&self) -> bool {
        self.state.lock().callbacks.is_some()
    }

    pub fn open_count(&self) -> u32 {
        self.state.lock().open_count
    }

    pub fn close_count(&self) -> u32 {
        self.state.lock().close_count
    }

    /// The `make_inactive` argument of the most recent close.
    pub fn last_close_made_inactive(&self) -> Option<bool> {
        self.state.lock().last_close_made_inactive
    }

    pub fn make_active_count(&self) -> u32 {
        self.state.lock().make_active_count
    }

    pub fn target_address(&self) -> Option<HdmiAddress> {
        self.state.lock().target
    }

    /// Settings passed to the most recent successful open.
    pub fn settings(&self) -> Option<AdapterSettings> {
        self.state.lock().settings.clone()
    }

    /// Runs `f` against the registered callbacks.  The callbacks are
    /// cloned out first so the lock is not held while they run.
    fn deliver(&self, f: impl FnOnce(&dyn CecCallbacks)) -> bool {
        let callbacks = self.state.lock().callbacks.clone();
        match callbacks {
            Some(cb) => {
                f(cb.as_ref());
                true
            }
            None => false,
        }
    }

    /// Delivers a key notification.  Returns `false` if the adapter is closed.
    pub fn inject_key_press(&self, event: KeyEvent) -> bool {
        self.deliver(|cb| cb.on_key_press(event))
    }

    pub fn inject_command(&self, command: &CecCommand) -> bool {
        self.deliver(|cb| cb.on_command(command))
    }

    pub fn inject_alert(&self, alert: Alert) -> bool {
        self.deliver(|cb| cb.on_alert(alert))
    }

    pub fn inject_menu_state(&self, state: MenuState) -> bool {
        self.deliver(|cb| cb.on_menu_state_changed(state))
    }

    pub fn inject_source_activated(&self, address: LogicalAddress, activated: bool) -> bool {
        self.deliver(|cb| cb.on_source_activated(address, activated))
    }
}

impl CecAdapter for MockCecAdapter {
    fn open(
        &mut self,
        settings: &AdapterSettings,
        callbacks: Arc<dyn CecCallbacks>,
    ) -> Result<(), AdapterError> {
        {
            let mut s = self.state.lock();
            if s.fail_open {
                return Err(AdapterError::OpenFailed {
                    device: settings.device.clone().unwrap_or_else(|| "auto".to_string()),
                    reason: "simulated failure".to_string(),
                });
            }
            s.callbacks = Some(Arc::clone(&callbacks));
            s.settings = Some(settings.clone());
            s.open_count += 1;
        }
        debug!(osd_name = %settings.osd_name, "mock CEC adapter opened");

        callbacks.on_configuration_changed(&AdapterConfiguration {
            primary_address: MOCK_LOGICAL_ADDRESS,
            physical_address: MOCK_PHYSICAL_ADDRESS,
            osd_name: settings.osd_name.clone(),
        });
        Ok(())
    }

    fn close(&mut self, make_inactive: bool) {
        let mut s = self.state.lock();
        if s.callbacks.take().is_some() {
            s.close_count += 1;
            s.last_close_made_inactive = Some(make_inactive);
            debug!(make_inactive, "mock CEC adapter closed");
        }
    }

    fn make_active(&mut self) -> Result<(), AdapterError> {
        let mut s = self.state.lock();
        if s.callbacks.is_none() {
            return Err(AdapterError::NotOpen);
        }
        s.make_active_count += 1;
        Ok(())
    }

    fn set_target_address(&mut self, address: HdmiAddress) -> Result<(), AdapterError> {
        let mut s = self.state.lock();
        if s.callbacks.is_none() {
            return Err(AdapterError::NotOpen);
        }
        s.target = Some(address);
        Ok(())
    }

    /// The in-process adapter has no hardware to enumerate.
    fn list_devices(&self) -> Result<Vec<AdapterDescriptor>, AdapterError> {
        Ok(Vec::new())
    }
}
