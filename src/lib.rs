//! # camwire
//!
//! Binder-style RPC proxy/stub pair for a camera device-management
//! service.
//!
//! The crate is the wire protocol and dispatch mechanism only: how a
//! client-side proxy encodes a method call into a byte-oriented
//! transaction, how the server-side stub validates, decodes, and invokes
//! the local implementation, and how results - including transferred
//! object handles, exception envelopes, and presence-flagged records -
//! travel back. Connection establishment, security enforcement, and the
//! real camera operations all live behind the [`Transport`] and
//! [`CameraService`] seams.
//!
//! ## Architecture
//!
//! - **Parcel** (wire codec + exception envelope): ordered,
//!   self-delimiting transaction buffers.
//! - **Registry**: the one method table shared by encoder and decoder.
//! - **Handles**: opaque remote-object references with capability-checked
//!   typed casts.
//! - **Proxy / Stub**: the two composition-selected variants of the
//!   [`CameraService`] capability set.
//!
//! ## Example
//!
//! ```
//! use camwire::registry::CAMERA_SERVICE_TABLE;
//! use camwire::transport::LoopbackTransport;
//! use camwire::{CameraServiceProxy, CameraServiceStub};
//! # use camwire::parcel::Exception;
//! # use camwire::service::{DeviceInfoReply, ServiceResult};
//! # use camwire::handle::*;
//! # use camwire::parcel::ExceptionCode;
//! # struct NoDevices;
//! # impl camwire::CameraService for NoDevices {
//! #     fn device_count(&self) -> ServiceResult<i32> { Ok(0) }
//! #     fn device_info(&self, _: i32) -> ServiceResult<DeviceInfoReply> {
//! #         Err(Exception::bare(ExceptionCode::IllegalArgument))
//! #     }
//! #     fn connect(&self, _: Option<TypedHandle<CameraClient>>, _: i32, _: &str, _: i32)
//! #         -> ServiceResult<TypedHandle<Camera>> { Err(Exception::bare(ExceptionCode::IllegalState)) }
//! #     fn connect_pro(&self, _: Option<TypedHandle<ProCameraCallbacks>>, _: i32, _: &str, _: i32)
//! #         -> ServiceResult<TypedHandle<ProCameraUser>> { Err(Exception::bare(ExceptionCode::IllegalState)) }
//! #     fn connect_device(&self, _: Option<TypedHandle<CameraDeviceCallbacks>>, _: i32, _: &str, _: i32)
//! #         -> ServiceResult<TypedHandle<CameraDeviceUser>> { Err(Exception::bare(ExceptionCode::IllegalState)) }
//! #     fn add_listener(&self, _: Option<TypedHandle<CameraServiceListener>>) -> ServiceResult<i32> { Ok(0) }
//! #     fn remove_listener(&self, _: Option<TypedHandle<CameraServiceListener>>) -> ServiceResult<i32> { Ok(0) }
//! # }
//! use std::sync::Arc;
//!
//! let stub = CameraServiceStub::new(Box::new(NoDevices), &CAMERA_SERVICE_TABLE);
//! let transport = Arc::new(LoopbackTransport::bind(1, stub));
//! let proxy = CameraServiceProxy::new(
//!     transport.endpoint(),
//!     transport.clone(),
//!     &CAMERA_SERVICE_TABLE,
//! );
//!
//! assert_eq!(proxy.device_count().unwrap(), 0);
//! ```

pub mod error;
pub mod handle;
pub mod parcel;
pub mod registry;
pub mod service;
pub mod transport;

pub use error::{CamwireError, ParcelError, Result};
pub use service::{
    CameraService, CameraServiceProxy, CameraServiceStub, DeviceInfo, DeviceInfoReply, Facing,
    CAMERA_SERVICE_DESCRIPTOR,
};
pub use transport::Transport;
