//! Server-side skeleton - decodes transactions and invokes the local
//! implementation.
//!
//! `on_transact` takes the (code, request, reply) triple from the
//! transport. Known codes are validated against the interface identity
//! token before any argument is decoded; a foreign token is a fatal
//! protocol error, never an application exception. Codes outside the
//! method table fall through to the base-interface handler.
//!
//! Recoverable problems raised by the local implementation are translated
//! into the exception envelope; exactly one reply is written per
//! dispatched transaction.

use crate::error::{CamwireError, Result};
use crate::handle::{
    CameraClient, CameraDeviceCallbacks, CameraServiceListener, InterfaceId, ProCameraCallbacks,
    TypedHandle,
};
use crate::parcel::{write_exception, write_no_exception, Exception, Parcel};
use crate::registry::{MethodCode, MethodTable, INTERFACE_TRANSACTION};

use super::{CameraService, DeviceInfo, ServiceResult, CAMERA_SERVICE_DESCRIPTOR};

/// Local-implementation variant of the camera service.
///
/// Composes a [`CameraService`] implementation with the shared method
/// table; the transport hands it every incoming transaction.
pub struct CameraServiceStub {
    service: Box<dyn CameraService>,
    table: &'static MethodTable,
}

impl CameraServiceStub {
    /// Bind a local implementation to the dispatch table.
    ///
    /// `table` must be the same table the proxies encode with.
    pub fn new(service: Box<dyn CameraService>, table: &'static MethodTable) -> Self {
        Self { service, table }
    }

    /// Dispatch one transaction.
    ///
    /// On `Ok(())` the reply parcel holds the envelope plus the method's
    /// declared return shape. `Err` means a protocol violation (foreign
    /// token, malformed request, unregistered code) and the reply must be
    /// discarded by the transport.
    pub fn on_transact(&self, code: u32, data: &mut Parcel, reply: &mut Parcel) -> Result<()> {
        let Some(method) = self.table.resolve(code) else {
            return self.on_fallback(code, reply);
        };

        // Identity first; a mismatch aborts before any argument decode.
        self.enforce_interface(data)?;

        match method {
            MethodCode::GetDeviceCount => {
                self.finish(method, reply, self.service.device_count(), |reply, count| {
                    reply.write_i32(count);
                });
            }
            MethodCode::GetDeviceInfo => {
                let device_id = self.read_i32(data)?;
                self.finish(
                    method,
                    reply,
                    self.service.device_info(device_id),
                    |reply, result| {
                        reply.write_i32(result.status);
                        DeviceInfo::write_flagged(result.info.as_ref(), reply);
                    },
                );
            }
            MethodCode::Connect => {
                let client = self.read_callback::<CameraClient>(data)?;
                let (device_id, package_name, client_uid) = self.read_connect_args(data)?;
                self.finish(
                    method,
                    reply,
                    self.service
                        .connect(client, device_id, &package_name, client_uid),
                    |reply, session| reply.write_handle(Some(session.raw())),
                );
            }
            MethodCode::ConnectProCallback => {
                let callbacks = self.read_callback::<ProCameraCallbacks>(data)?;
                let (device_id, package_name, client_uid) = self.read_connect_args(data)?;
                self.finish(
                    method,
                    reply,
                    self.service
                        .connect_pro(callbacks, device_id, &package_name, client_uid),
                    |reply, session| reply.write_handle(Some(session.raw())),
                );
            }
            MethodCode::ConnectDeviceCallback => {
                let callbacks = self.read_callback::<CameraDeviceCallbacks>(data)?;
                let (device_id, package_name, client_uid) = self.read_connect_args(data)?;
                self.finish(
                    method,
                    reply,
                    self.service
                        .connect_device(callbacks, device_id, &package_name, client_uid),
                    |reply, session| reply.write_handle(Some(session.raw())),
                );
            }
            MethodCode::AddListener => {
                let listener = self.read_callback::<CameraServiceListener>(data)?;
                self.finish(
                    method,
                    reply,
                    self.service.add_listener(listener),
                    |reply, status| reply.write_i32(status),
                );
            }
            MethodCode::RemoveListener => {
                let listener = self.read_callback::<CameraServiceListener>(data)?;
                self.finish(
                    method,
                    reply,
                    self.service.remove_listener(listener),
                    |reply, status| reply.write_i32(status),
                );
            }
        }

        Ok(())
    }

    /// Base-interface bookkeeping for codes outside the method table.
    fn on_fallback(&self, code: u32, reply: &mut Parcel) -> Result<()> {
        if code == INTERFACE_TRANSACTION {
            tracing::debug!("descriptor query on {}", CAMERA_SERVICE_DESCRIPTOR);
            write_no_exception(reply);
            reply.write_string16(CAMERA_SERVICE_DESCRIPTOR);
            return Ok(());
        }

        tracing::warn!("unknown transaction code {}", code);
        Err(CamwireError::UnknownTransaction(code))
    }

    fn enforce_interface(&self, data: &mut Parcel) -> Result<()> {
        let token = data
            .read_interface_token()
            .map_err(CamwireError::MalformedRequest)?;
        if token != CAMERA_SERVICE_DESCRIPTOR {
            return Err(CamwireError::InterfaceMismatch {
                expected: CAMERA_SERVICE_DESCRIPTOR.to_string(),
                got: token,
            });
        }
        Ok(())
    }

    fn read_i32(&self, data: &mut Parcel) -> Result<i32> {
        data.read_i32().map_err(CamwireError::MalformedRequest)
    }

    /// Decode a callback/listener handle. A null marker and a capability
    /// mismatch both decode as absent; the implementation decides how to
    /// fail.
    fn read_callback<I: InterfaceId>(&self, data: &mut Parcel) -> Result<Option<TypedHandle<I>>> {
        let raw = data.read_handle().map_err(CamwireError::MalformedRequest)?;
        Ok(raw.and_then(TypedHandle::cast))
    }

    /// The argument tail shared by the three `connect*` variants.
    fn read_connect_args(&self, data: &mut Parcel) -> Result<(i32, String, i32)> {
        let device_id = self.read_i32(data)?;
        let package_name = data
            .read_string16()
            .map_err(CamwireError::MalformedRequest)?;
        let client_uid = self.read_i32(data)?;
        Ok((device_id, package_name, client_uid))
    }

    /// Encode the envelope plus the return shape, or the exception.
    fn finish<T>(
        &self,
        method: MethodCode,
        reply: &mut Parcel,
        result: ServiceResult<T>,
        encode: impl FnOnce(&mut Parcel, T),
    ) {
        match result {
            Ok(value) => {
                write_no_exception(reply);
                encode(reply, value);
            }
            Err(exception) => self.write_exception_reply(method, reply, &exception),
        }
    }

    fn write_exception_reply(&self, method: MethodCode, reply: &mut Parcel, exception: &Exception) {
        tracing::debug!(
            "{} raised {} ({})",
            self.table.name_of(method),
            exception.code.name(),
            exception.code.to_wire()
        );
        write_exception(reply, exception);
    }
}
