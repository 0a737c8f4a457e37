//! In-memory loopback transport.
//!
//! Binds one [`CameraServiceStub`] under a handle id and completes each
//! call by dispatching directly into it on the calling thread. Used by
//! the round-trip tests and the demo; the production transport lives on
//! the other side of the [`Transport`] trait.

use crate::error::{CamwireError, Result};
use crate::handle::RemoteHandle;
use crate::parcel::Parcel;
use crate::service::{CameraServiceStub, CAMERA_SERVICE_DESCRIPTOR};

use super::Transport;

/// Transport that short-circuits calls to a stub in the same process.
pub struct LoopbackTransport {
    endpoint_id: u64,
    stub: CameraServiceStub,
}

impl LoopbackTransport {
    /// Register `stub` under `endpoint_id`.
    pub fn bind(endpoint_id: u64, stub: CameraServiceStub) -> Self {
        Self { endpoint_id, stub }
    }

    /// Handle addressing the bound stub, for constructing proxies.
    pub fn endpoint(&self) -> RemoteHandle {
        RemoteHandle::new(self.endpoint_id, CAMERA_SERVICE_DESCRIPTOR)
    }
}

impl Transport for LoopbackTransport {
    fn call(&self, target: &RemoteHandle, code: u32, request: &Parcel) -> Result<Parcel> {
        if target.id() != self.endpoint_id {
            return Err(CamwireError::Transport(format!(
                "no object registered at id {}",
                target.id()
            )));
        }

        // The stub gets its own cursor over the request bytes and a fresh
        // reply owned by this call alone.
        let mut data = Parcel::from_bytes(request.as_bytes());
        let mut reply = Parcel::new();
        self.stub.on_transact(code, &mut data, &mut reply)?;
        Ok(Parcel::from_bytes(reply.as_bytes()))
    }
}
