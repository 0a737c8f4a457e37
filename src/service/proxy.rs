//! Client-side proxy - marshals calls into transactions.
//!
//! Each operation allocates a fresh request parcel, writes the interface
//! identity token first, then the arguments in the method's fixed order,
//! issues the blocking transport call, and decodes the reply starting
//! with the exception envelope. An envelope exception folds into the
//! operation's documented sentinel (0 for counts, a protocol-error status
//! for status ops, an absent handle for object ops) and nothing past the
//! envelope is read.
//!
//! Transport failures and malformed replies are real errors and propagate
//! as [`CamwireError`]; application exceptions never do.

use std::sync::Arc;

use crate::error::{CamwireError, Result};
use crate::handle::{
    Camera, CameraClient, CameraDeviceCallbacks, CameraDeviceUser, CameraServiceListener,
    InterfaceId, ProCameraCallbacks, ProCameraUser, RemoteHandle, TypedHandle,
};
use crate::parcel::{read_exception, Parcel};
use crate::registry::{MethodCode, MethodTable};
use crate::transport::Transport;

use super::{status, DeviceInfo, DeviceInfoReply, CAMERA_SERVICE_DESCRIPTOR};

/// Remote-proxy variant of the camera service.
///
/// Holds a handle to the counterpart stub, the transport to reach it,
/// and the shared method table. Cheap to clone would be nice, but each
/// call owns its parcels, so the proxy itself stays single-purpose.
pub struct CameraServiceProxy {
    remote: RemoteHandle,
    transport: Arc<dyn Transport>,
    table: &'static MethodTable,
}

impl CameraServiceProxy {
    /// Wrap a remote service handle.
    ///
    /// `table` must be the same table the stub dispatches with; see
    /// [`crate::registry::CAMERA_SERVICE_TABLE`].
    pub fn new(
        remote: RemoteHandle,
        transport: Arc<dyn Transport>,
        table: &'static MethodTable,
    ) -> Self {
        Self {
            remote,
            transport,
            table,
        }
    }

    /// Fresh request parcel with the identity token already written.
    fn begin_request(&self) -> Parcel {
        let mut data = Parcel::new();
        data.write_interface_token(CAMERA_SERVICE_DESCRIPTOR);
        data
    }

    /// One blocking round trip.
    fn transact(&self, method: MethodCode, data: &Parcel) -> Result<Parcel> {
        self.transport.call(&self.remote, method.to_wire(), data)
    }

    /// Decode the envelope; `true` means the call must short-circuit to
    /// its sentinel value without reading anything further.
    fn reply_has_exception(&self, method: MethodCode, reply: &mut Parcel) -> Result<bool> {
        match read_exception(reply).map_err(CamwireError::MalformedReply)? {
            Some(exception) => {
                tracing::error!(
                    "{} failed with {} ({}): {}",
                    self.table.name_of(method),
                    exception.code.name(),
                    exception.code.to_wire(),
                    exception.message
                );
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Number of devices; 0 when the service signaled an exception.
    pub fn device_count(&self) -> Result<i32> {
        let data = self.begin_request();
        let mut reply = self.transact(MethodCode::GetDeviceCount, &data)?;

        if self.reply_has_exception(MethodCode::GetDeviceCount, &mut reply)? {
            return Ok(0);
        }
        reply.read_i32().map_err(CamwireError::MalformedReply)
    }

    /// Status plus the presence-flagged record for one device.
    ///
    /// On an exception the status is [`status::PROTOCOL_ERROR`] with no
    /// record. The status is read first, then the presence flag, and the
    /// two inner fields only when the flag says so.
    pub fn device_info(&self, device_id: i32) -> Result<DeviceInfoReply> {
        let mut data = self.begin_request();
        data.write_i32(device_id);
        let mut reply = self.transact(MethodCode::GetDeviceInfo, &data)?;

        if self.reply_has_exception(MethodCode::GetDeviceInfo, &mut reply)? {
            return Ok(DeviceInfoReply {
                status: status::PROTOCOL_ERROR,
                info: None,
            });
        }
        let status = reply.read_i32().map_err(CamwireError::MalformedReply)?;
        let info = DeviceInfo::read_flagged(&mut reply).map_err(CamwireError::MalformedReply)?;
        Ok(DeviceInfoReply { status, info })
    }

    /// Open a plain camera session; absent on exception.
    pub fn connect(
        &self,
        client: Option<&TypedHandle<CameraClient>>,
        device_id: i32,
        package_name: &str,
        client_uid: i32,
    ) -> Result<Option<TypedHandle<Camera>>> {
        self.connect_with(MethodCode::Connect, client, device_id, package_name, client_uid)
    }

    /// Open a pro-mode session; absent on exception.
    pub fn connect_pro(
        &self,
        callbacks: Option<&TypedHandle<ProCameraCallbacks>>,
        device_id: i32,
        package_name: &str,
        client_uid: i32,
    ) -> Result<Option<TypedHandle<ProCameraUser>>> {
        self.connect_with(
            MethodCode::ConnectProCallback,
            callbacks,
            device_id,
            package_name,
            client_uid,
        )
    }

    /// Open a device-level session; absent on exception.
    pub fn connect_device(
        &self,
        callbacks: Option<&TypedHandle<CameraDeviceCallbacks>>,
        device_id: i32,
        package_name: &str,
        client_uid: i32,
    ) -> Result<Option<TypedHandle<CameraDeviceUser>>> {
        self.connect_with(
            MethodCode::ConnectDeviceCallback,
            callbacks,
            device_id,
            package_name,
            client_uid,
        )
    }

    /// Shared shape of the three `connect*` variants: only the callback
    /// type sent and the session type reconstructed differ.
    fn connect_with<Cb: InterfaceId, Session: InterfaceId>(
        &self,
        method: MethodCode,
        callbacks: Option<&TypedHandle<Cb>>,
        device_id: i32,
        package_name: &str,
        client_uid: i32,
    ) -> Result<Option<TypedHandle<Session>>> {
        let mut data = self.begin_request();
        data.write_handle(callbacks.map(TypedHandle::raw));
        data.write_i32(device_id);
        data.write_string16(package_name);
        data.write_i32(client_uid);
        let mut reply = self.transact(method, &data)?;

        if self.reply_has_exception(method, &mut reply)? {
            return Ok(None);
        }
        match reply.read_handle().map_err(CamwireError::MalformedReply)? {
            None => Ok(None),
            Some(raw) => {
                let got = raw.descriptor().to_string();
                TypedHandle::cast(raw)
                    .map(Some)
                    .ok_or_else(|| CamwireError::DescriptorMismatch {
                        expected: Session::DESCRIPTOR.to_string(),
                        got,
                    })
            }
        }
    }

    /// Register an availability listener; returns a status code.
    pub fn add_listener(
        &self,
        listener: Option<&TypedHandle<CameraServiceListener>>,
    ) -> Result<i32> {
        self.listener_op(MethodCode::AddListener, listener)
    }

    /// Unregister an availability listener; returns a status code.
    pub fn remove_listener(
        &self,
        listener: Option<&TypedHandle<CameraServiceListener>>,
    ) -> Result<i32> {
        self.listener_op(MethodCode::RemoveListener, listener)
    }

    fn listener_op(
        &self,
        method: MethodCode,
        listener: Option<&TypedHandle<CameraServiceListener>>,
    ) -> Result<i32> {
        let mut data = self.begin_request();
        data.write_handle(listener.map(TypedHandle::raw));
        let mut reply = self.transact(method, &data)?;

        if self.reply_has_exception(method, &mut reply)? {
            return Ok(status::PROTOCOL_ERROR);
        }
        reply.read_i32().map_err(CamwireError::MalformedReply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parcel::{write_exception, write_no_exception, Exception, ExceptionCode};
    use crate::registry::CAMERA_SERVICE_TABLE;

    /// Transport that hands back one canned reply and records the request.
    struct CannedTransport {
        reply: Vec<u8>,
        seen: std::sync::Mutex<Vec<(u32, Vec<u8>)>>,
    }

    impl CannedTransport {
        fn new(reply: &Parcel) -> Arc<Self> {
            Arc::new(Self {
                reply: reply.as_bytes().to_vec(),
                seen: std::sync::Mutex::new(Vec::new()),
            })
        }
    }

    impl Transport for CannedTransport {
        fn call(&self, _target: &RemoteHandle, code: u32, request: &Parcel) -> Result<Parcel> {
            self.seen
                .lock()
                .unwrap()
                .push((code, request.as_bytes().to_vec()));
            Ok(Parcel::from_bytes(&self.reply))
        }
    }

    fn proxy_over(transport: Arc<CannedTransport>) -> CameraServiceProxy {
        let remote = RemoteHandle::new(1, CAMERA_SERVICE_DESCRIPTOR);
        CameraServiceProxy::new(remote, transport, &CAMERA_SERVICE_TABLE)
    }

    #[test]
    fn test_device_count_decodes_reply() {
        let mut reply = Parcel::new();
        write_no_exception(&mut reply);
        reply.write_i32(3);

        let transport = CannedTransport::new(&reply);
        let proxy = proxy_over(transport.clone());

        assert_eq!(proxy.device_count().unwrap(), 3);

        // Request carried the identity token and the right code.
        let seen = transport.seen.lock().unwrap();
        let (code, ref request) = seen[0];
        assert_eq!(code, MethodCode::GetDeviceCount.to_wire());
        let mut request = Parcel::from_bytes(request);
        assert_eq!(
            request.read_interface_token().unwrap(),
            CAMERA_SERVICE_DESCRIPTOR
        );
        assert_eq!(request.remaining(), 0);
    }

    #[test]
    fn test_device_count_exception_returns_zero() {
        // Reply truncated right after the envelope: nothing further may
        // be read, and the sentinel must still come back.
        let mut reply = Parcel::new();
        write_exception(&mut reply, &Exception::bare(ExceptionCode::Security));

        let proxy = proxy_over(CannedTransport::new(&reply));
        assert_eq!(proxy.device_count().unwrap(), 0);
    }

    #[test]
    fn test_unknown_zero_exception_short_circuits_to_sentinel() {
        // A local implementation may legally hand back Unknown(0); the
        // envelope writer clamps it, so the count sentinel comes back
        // instead of the message's length prefix.
        let mut reply = Parcel::new();
        write_exception(
            &mut reply,
            &Exception::new(ExceptionCode::Unknown(0), "boom"),
        );

        let proxy = proxy_over(CannedTransport::new(&reply));
        assert_eq!(proxy.device_count().unwrap(), 0);
    }

    #[test]
    fn test_device_info_exception_returns_protocol_error() {
        let mut reply = Parcel::new();
        write_exception(&mut reply, &Exception::bare(ExceptionCode::IllegalArgument));

        let proxy = proxy_over(CannedTransport::new(&reply));
        let info = proxy.device_info(0).unwrap();
        assert_eq!(info.status, status::PROTOCOL_ERROR);
        assert_eq!(info.info, None);
    }

    #[test]
    fn test_device_info_cleared_flag_skips_garbage() {
        let mut reply = Parcel::new();
        write_no_exception(&mut reply);
        reply.write_i32(status::BAD_VALUE);
        reply.write_i32(0); // record absent
        reply.write_i32(0x5a5a_5a5a); // garbage that must not be decoded

        let proxy = proxy_over(CannedTransport::new(&reply));
        let info = proxy.device_info(42).unwrap();
        assert_eq!(info.status, status::BAD_VALUE);
        assert_eq!(info.info, None);
    }

    #[test]
    fn test_connect_exception_returns_absent_handle() {
        let mut reply = Parcel::new();
        write_exception(&mut reply, &Exception::bare(ExceptionCode::IllegalState));

        let proxy = proxy_over(CannedTransport::new(&reply));
        let session = proxy.connect(None, 0, "com.example.viewer", 10042).unwrap();
        assert!(session.is_none());
    }

    #[test]
    fn test_connect_rejects_wrong_session_descriptor() {
        let mut reply = Parcel::new();
        write_no_exception(&mut reply);
        let imposter = RemoteHandle::new(5, ProCameraUser::DESCRIPTOR);
        reply.write_handle(Some(&imposter));

        let proxy = proxy_over(CannedTransport::new(&reply));
        let err = proxy
            .connect(None, 0, "com.example.viewer", 10042)
            .unwrap_err();
        assert!(matches!(err, CamwireError::DescriptorMismatch { .. }));
    }

    #[test]
    fn test_connect_writes_arguments_in_declared_order() {
        let mut reply = Parcel::new();
        write_no_exception(&mut reply);
        reply.write_handle(None);

        let transport = CannedTransport::new(&reply);
        let proxy = proxy_over(transport.clone());

        let client = TypedHandle::<CameraClient>::new(77);
        proxy
            .connect(Some(&client), 2, "com.example.viewer", 10042)
            .unwrap();

        let seen = transport.seen.lock().unwrap();
        let mut request = Parcel::from_bytes(&seen[0].1);
        assert_eq!(
            request.read_interface_token().unwrap(),
            CAMERA_SERVICE_DESCRIPTOR
        );
        assert_eq!(request.read_handle().unwrap().unwrap().id(), 77);
        assert_eq!(request.read_i32().unwrap(), 2);
        assert_eq!(request.read_string16().unwrap(), "com.example.viewer");
        assert_eq!(request.read_i32().unwrap(), 10042);
    }

    #[test]
    fn test_listener_exception_returns_protocol_error() {
        let mut reply = Parcel::new();
        write_exception(&mut reply, &Exception::bare(ExceptionCode::NullReference));

        let proxy = proxy_over(CannedTransport::new(&reply));
        assert_eq!(proxy.add_listener(None).unwrap(), status::PROTOCOL_ERROR);
    }

    #[test]
    fn test_transport_failure_is_not_downgraded() {
        struct DeadTransport;
        impl Transport for DeadTransport {
            fn call(&self, _: &RemoteHandle, _: u32, _: &Parcel) -> Result<Parcel> {
                Err(CamwireError::Transport("peer gone".to_string()))
            }
        }

        let proxy = CameraServiceProxy::new(
            RemoteHandle::new(1, CAMERA_SERVICE_DESCRIPTOR),
            Arc::new(DeadTransport),
            &CAMERA_SERVICE_TABLE,
        );
        assert!(matches!(
            proxy.device_count().unwrap_err(),
            CamwireError::Transport(_)
        ));
    }
}
