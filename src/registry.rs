//! Method registry - the shared transaction-code table.
//!
//! Proxy and stub must agree on the mapping from operation to wire code,
//! so the mapping lives in exactly one place: a compiled-in
//! [`MethodTable`] handed to both sides at construction. Codes are wire
//! constants and must never be renumbered once assigned.
//!
//! # Example
//!
//! ```
//! use camwire::registry::{MethodCode, CAMERA_SERVICE_TABLE};
//!
//! assert_eq!(CAMERA_SERVICE_TABLE.resolve(1), Some(MethodCode::GetDeviceCount));
//! assert_eq!(CAMERA_SERVICE_TABLE.resolve(999), None);
//! assert_eq!(CAMERA_SERVICE_TABLE.name_of(MethodCode::Connect), "Connect");
//! ```

/// Base-interface descriptor query, handled by the fallback path.
///
/// Packs the bytes `_NTF` big-endian; deliberately far outside the
/// registry's code range.
pub const INTERFACE_TRANSACTION: u32 = 0x5f4e_5446;

/// Transaction codes for the camera service interface.
///
/// Wire-compatibility invariant: these values are frozen. New operations
/// append; nothing renumbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum MethodCode {
    /// Number of devices the service knows about.
    GetDeviceCount = 1,
    /// Facing/orientation record for one device.
    GetDeviceInfo = 2,
    /// Open a plain camera session.
    Connect = 3,
    /// Open a pro-mode session.
    ConnectProCallback = 4,
    /// Open a device-level session.
    ConnectDeviceCallback = 5,
    /// Register an availability listener.
    AddListener = 6,
    /// Unregister an availability listener.
    RemoveListener = 7,
}

impl MethodCode {
    /// Wire value of this code.
    pub fn to_wire(self) -> u32 {
        self as u32
    }
}

/// Versioned constant table binding method names to transaction codes.
///
/// Identical on both sides of the channel by construction: the one
/// [`CAMERA_SERVICE_TABLE`] value is passed to the proxy's encoder and
/// the stub's decoder, never duplicated by hand.
#[derive(Debug)]
pub struct MethodTable {
    version: u32,
    entries: &'static [(MethodCode, &'static str)],
}

impl MethodTable {
    /// Table schema version. Bumped when entries are appended.
    pub fn version(&self) -> u32 {
        self.version
    }

    /// Resolve a wire code to a registry entry, `None` when unregistered.
    pub fn resolve(&self, code: u32) -> Option<MethodCode> {
        self.entries
            .iter()
            .find(|(method, _)| method.to_wire() == code)
            .map(|(method, _)| *method)
    }

    /// Symbolic name for a registry entry.
    pub fn name_of(&self, method: MethodCode) -> &'static str {
        self.entries
            .iter()
            .find(|(entry, _)| *entry == method)
            .map(|(_, name)| *name)
            .unwrap_or("<unregistered>")
    }

    /// Look up a wire code by symbolic name.
    pub fn code_by_name(&self, name: &str) -> Option<MethodCode> {
        self.entries
            .iter()
            .find(|(_, entry)| *entry == name)
            .map(|(method, _)| *method)
    }

    /// All registered entries in wire-code order.
    pub fn entries(&self) -> &'static [(MethodCode, &'static str)] {
        self.entries
    }
}

/// The camera service's method table, shared verbatim by proxy and stub.
pub static CAMERA_SERVICE_TABLE: MethodTable = MethodTable {
    version: 1,
    entries: &[
        (MethodCode::GetDeviceCount, "GetDeviceCount"),
        (MethodCode::GetDeviceInfo, "GetDeviceInfo"),
        (MethodCode::Connect, "Connect"),
        (MethodCode::ConnectProCallback, "ConnectProCallback"),
        (MethodCode::ConnectDeviceCallback, "ConnectDeviceCallback"),
        (MethodCode::AddListener, "AddListener"),
        (MethodCode::RemoveListener, "RemoveListener"),
    ],
};
