//! CEC adapter infrastructure.
//!
//! The [`CecAdapter`] trait (in `application::ports`) is the boundary to the
//! vendor CEC library.  This module holds the helpers shared by adapter
//! bindings and the in-process [`mock::MockCecAdapter`], which stands in for
//! the hardware in tests and in builds without a vendor binding.

pub mod mock;

use std::fmt::Write as _;

use tracing::warn;

pub use crate::application::ports::{
    AdapterDescriptor, AdapterError, AdapterSettings, CecAdapter, CecCallbacks,
};

/// OSD name used when the hostname cannot be read.
pub const FALLBACK_OSD_NAME: &str = "RaspberryPI";

/// CEC limits `<Set OSD Name>` to 14 bytes.
pub const MAX_OSD_NAME_LEN: usize = 14;

/// Returns the machine's hostname, truncated to fit an OSD name.
pub fn default_osd_name() -> String {
    let name = match nix::unistd::gethostname() {
        Ok(host) => host.into_string().unwrap_or_else(|raw| raw.to_string_lossy().into_owned()),
        Err(e) => {
            warn!("cannot read hostname, using {FALLBACK_OSD_NAME}: {e}");
            return FALLBACK_OSD_NAME.to_string();
        }
    };
    clamp_osd_name(&name)
}

/// Truncates `name` to [`MAX_OSD_NAME_LEN`] bytes on a char boundary.
/// Empty names become [`FALLBACK_OSD_NAME`].
pub fn clamp_osd_name(name: &str) -> String {
    let name = name.trim();
    if name.is_empty() {
        return FALLBACK_OSD_NAME.to_string();
    }
    let mut end = name.len().min(MAX_OSD_NAME_LEN);
    while !name.is_char_boundary(end) {
        end -= 1;
    }
    name[..end].to_string()
}

/// Formats the `--list` output, one block per adapter.
pub fn format_device_list(devices: &[AdapterDescriptor]) -> String {
    if devices.is_empty() {
        return "no CEC adapters found\n".to_string();
    }
    let mut out = format!("{} CEC adapter(s) found:\n", devices.len());
    for (i, d) in devices.iter().enumerate() {
        let _ = writeln!(out, "device:           {}", i + 1);
        let _ = writeln!(out, "port:             {}", d.port);
        let _ = writeln!(out, "com port:         {}", d.comm_path);
        let _ = writeln!(out, "physical address: {}", d.physical_address);
        let _ = writeln!(out, "vendor:           {}", d.vendor);
        let _ = writeln!(out, "firmware version: {}", d.firmware_version);
        out.push('\n');
    }
    out
}
