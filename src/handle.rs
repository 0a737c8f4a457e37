//! Remote-object handles and capability-checked typed wrappers.
//!
//! A [`RemoteHandle`] is an opaque reference to a counterpart object in
//! another process: the transport's addressing id plus the interface
//! descriptor the object claims to implement. Handles are shared by
//! reference; sending one grants the receiver a new reference, never
//! ownership, and the underlying object's lifetime is the transport's
//! concern.
//!
//! [`TypedHandle<I>`] pins a handle to one interface at the type level.
//! Reconstruction from the wire goes through [`TypedHandle::cast`], a
//! fallible conversion that refuses a handle whose descriptor does not
//! match - the `interface_cast` of this protocol, minus the unchecked
//! part.
//!
//! # Example
//!
//! ```
//! use camwire::handle::{Camera, InterfaceId, RemoteHandle, TypedHandle};
//!
//! let raw = RemoteHandle::new(7, Camera::DESCRIPTOR);
//! let camera: TypedHandle<Camera> = TypedHandle::cast(raw).unwrap();
//! assert_eq!(camera.raw().id(), 7);
//!
//! let foreign = RemoteHandle::new(8, "camwire.ISomethingElse");
//! assert!(TypedHandle::<Camera>::cast(foreign).is_none());
//! ```

use std::marker::PhantomData;

/// Opaque cross-process object reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteHandle {
    id: u64,
    descriptor: String,
}

impl RemoteHandle {
    /// Create a handle from a transport address and claimed interface.
    pub fn new(id: u64, descriptor: impl Into<String>) -> Self {
        Self {
            id,
            descriptor: descriptor.into(),
        }
    }

    /// Transport-level object id.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Interface descriptor the remote object claims to implement.
    pub fn descriptor(&self) -> &str {
        &self.descriptor
    }
}

/// Marker trait naming one remote interface.
///
/// Two interfaces must never share a descriptor.
pub trait InterfaceId {
    /// Identity token for this interface.
    const DESCRIPTOR: &'static str;
}

/// A [`RemoteHandle`] whose descriptor is known to match interface `I`.
pub struct TypedHandle<I: InterfaceId> {
    raw: RemoteHandle,
    _marker: PhantomData<fn() -> I>,
}

impl<I: InterfaceId> TypedHandle<I> {
    /// Mint a handle for a local object exposed under interface `I`.
    pub fn new(id: u64) -> Self {
        Self {
            raw: RemoteHandle::new(id, I::DESCRIPTOR),
            _marker: PhantomData,
        }
    }

    /// Capability-checked conversion from an untyped handle.
    ///
    /// Returns `None` when the handle's descriptor does not name `I`.
    pub fn cast(raw: RemoteHandle) -> Option<Self> {
        (raw.descriptor() == I::DESCRIPTOR).then_some(Self {
            raw,
            _marker: PhantomData,
        })
    }

    /// The underlying untyped handle.
    pub fn raw(&self) -> &RemoteHandle {
        &self.raw
    }

    /// Unwrap back into the untyped handle.
    pub fn into_raw(self) -> RemoteHandle {
        self.raw
    }
}

// Manual impls: deriving would put needless bounds on `I`.

impl<I: InterfaceId> Clone for TypedHandle<I> {
    fn clone(&self) -> Self {
        Self {
            raw: self.raw.clone(),
            _marker: PhantomData,
        }
    }
}

impl<I: InterfaceId> std::fmt::Debug for TypedHandle<I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("TypedHandle").field(&self.raw).finish()
    }
}

impl<I: InterfaceId> PartialEq for TypedHandle<I> {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl<I: InterfaceId> Eq for TypedHandle<I> {}

/// Callback interface a plain camera client registers with `connect`.
pub enum CameraClient {}

impl InterfaceId for CameraClient {
    const DESCRIPTOR: &'static str = "camwire.ICameraClient";
}

/// Camera session object returned by `connect`.
pub enum Camera {}

impl InterfaceId for Camera {
    const DESCRIPTOR: &'static str = "camwire.ICamera";
}

/// Callback interface for the pro-mode connect variant.
pub enum ProCameraCallbacks {}

impl InterfaceId for ProCameraCallbacks {
    const DESCRIPTOR: &'static str = "camwire.IProCameraCallbacks";
}

/// Pro-mode session object returned by `connect_pro`.
pub enum ProCameraUser {}

impl InterfaceId for ProCameraUser {
    const DESCRIPTOR: &'static str = "camwire.IProCameraUser";
}

/// Callback interface for the device-level connect variant.
pub enum CameraDeviceCallbacks {}

impl InterfaceId for CameraDeviceCallbacks {
    const DESCRIPTOR: &'static str = "camwire.ICameraDeviceCallbacks";
}

/// Device-level session object returned by `connect_device`.
pub enum CameraDeviceUser {}

impl InterfaceId for CameraDeviceUser {
    const DESCRIPTOR: &'static str = "camwire.ICameraDeviceUser";
}

/// Listener for device availability changes.
pub enum CameraServiceListener {}

impl InterfaceId for CameraServiceListener {
    const DESCRIPTOR: &'static str = "camwire.ICameraServiceListener";
}
