//! Service module - the device-management call surface.
//!
//! The exposed operation set is the [`CameraService`] trait. Two variants
//! implement it by composition rather than inheritance: the local
//! implementation the stub invokes directly, and [`CameraServiceProxy`],
//! which marshals each call over a [`crate::transport::Transport`].
//!
//! Local implementations report recoverable problems as
//! [`Exception`] values; the stub translates them into the reply
//! envelope, and the proxy folds them into per-operation sentinel values
//! without ever reading past the envelope.

mod proxy;
mod stub;

pub use proxy::CameraServiceProxy;
pub use stub::CameraServiceStub;

use crate::error::ParcelError;
use crate::handle::{
    Camera, CameraClient, CameraDeviceCallbacks, CameraDeviceUser, CameraServiceListener,
    ProCameraCallbacks, ProCameraUser, TypedHandle,
};
use crate::parcel::{Exception, Parcel};

/// Identity token of the camera service interface. Written first in every
/// request, validated first on every dispatch.
pub const CAMERA_SERVICE_DESCRIPTOR: &str = "camwire.ICameraService";

/// Status codes returned by the status-shaped operations.
pub mod status {
    /// Operation succeeded.
    pub const OK: i32 = 0;
    /// Sentinel the proxy returns when an application exception
    /// short-circuited a status-returning call (generic I/O-layer code).
    pub const PROTOCOL_ERROR: i32 = -71;
    /// An argument named no known device.
    pub const BAD_VALUE: i32 = -22;
}

/// Which way a device points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum Facing {
    /// Pointing away from the display.
    Back = 0,
    /// Pointing at the user.
    Front = 1,
    /// Externally attached, orientation unconstrained.
    External = 2,
}

impl Facing {
    /// Decode a wire value, `None` for anything outside the enum.
    pub fn from_wire(value: i32) -> Option<Self> {
        match value {
            0 => Some(Facing::Back),
            1 => Some(Facing::Front),
            2 => Some(Facing::External),
            _ => None,
        }
    }
}

/// Static description of one device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceInfo {
    /// Mounting direction.
    pub facing: Facing,
    /// Clockwise mounting rotation in degrees, within [0, 360).
    pub orientation: i32,
}

impl DeviceInfo {
    /// Encode an optional record behind its presence marker.
    ///
    /// `1` precedes a present record's two fields; `0` stands alone and
    /// the reader must not consume anything after it.
    pub fn write_flagged(info: Option<&DeviceInfo>, parcel: &mut Parcel) {
        match info {
            Some(info) => {
                parcel.write_i32(1);
                parcel.write_i32(info.facing as i32);
                parcel.write_i32(info.orientation);
            }
            None => parcel.write_i32(0),
        }
    }

    /// Decode an optional record, checking the presence marker before
    /// touching the inner fields.
    pub fn read_flagged(parcel: &mut Parcel) -> Result<Option<DeviceInfo>, ParcelError> {
        match parcel.read_i32()? {
            0 => Ok(None),
            1 => {
                let facing_raw = parcel.read_i32()?;
                let facing =
                    Facing::from_wire(facing_raw).ok_or(ParcelError::ValueOutOfRange(facing_raw))?;
                let orientation = parcel.read_i32()?;
                if !(0..360).contains(&orientation) {
                    return Err(ParcelError::ValueOutOfRange(orientation));
                }
                Ok(Some(DeviceInfo {
                    facing,
                    orientation,
                }))
            }
            other => Err(ParcelError::BadPresenceMarker(other)),
        }
    }
}

/// Return shape of [`CameraService::device_info`]: a status code plus the
/// presence-flagged record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceInfoReply {
    /// Status code, [`status::OK`] on success.
    pub status: i32,
    /// The record, absent when the status already says there is none.
    pub info: Option<DeviceInfo>,
}

/// Result of a local operation: a native value or an application
/// exception for the envelope.
pub type ServiceResult<T> = Result<T, Exception>;

/// The device-management capability set.
///
/// One method per registry entry. Callback and listener parameters arrive
/// already capability-checked; a wire handle whose descriptor did not
/// match decodes as `None`, and the implementation decides how to fail.
/// The `connect*` methods return a typed session handle, so an
/// implementation that cannot produce one must signal an exception - the
/// stub never writes an unchecked null.
pub trait CameraService: Send + Sync {
    /// Number of devices currently known.
    fn device_count(&self) -> ServiceResult<i32>;

    /// Status plus the facing/orientation record for `device_id`.
    fn device_info(&self, device_id: i32) -> ServiceResult<DeviceInfoReply>;

    /// Open a plain camera session.
    fn connect(
        &self,
        client: Option<TypedHandle<CameraClient>>,
        device_id: i32,
        package_name: &str,
        client_uid: i32,
    ) -> ServiceResult<TypedHandle<Camera>>;

    /// Open a pro-mode session.
    fn connect_pro(
        &self,
        callbacks: Option<TypedHandle<ProCameraCallbacks>>,
        device_id: i32,
        package_name: &str,
        client_uid: i32,
    ) -> ServiceResult<TypedHandle<ProCameraUser>>;

    /// Open a device-level session.
    fn connect_device(
        &self,
        callbacks: Option<TypedHandle<CameraDeviceCallbacks>>,
        device_id: i32,
        package_name: &str,
        client_uid: i32,
    ) -> ServiceResult<TypedHandle<CameraDeviceUser>>;

    /// Register an availability listener; returns a status code.
    fn add_listener(
        &self,
        listener: Option<TypedHandle<CameraServiceListener>>,
    ) -> ServiceResult<i32>;

    /// Unregister an availability listener; returns a status code.
    fn remove_listener(
        &self,
        listener: Option<TypedHandle<CameraServiceListener>>,
    ) -> ServiceResult<i32>;
}
