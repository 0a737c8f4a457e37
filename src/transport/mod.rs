//! Transport module - the synchronous call seam.
//!
//! Everything below this trait (connection establishment, security
//! context, threading, reference counting of remote objects) belongs to
//! the transport provider, not to this protocol layer.

mod loopback;

pub use loopback::LoopbackTransport;

use crate::error::Result;
use crate::handle::RemoteHandle;
use crate::parcel::Parcel;

/// Synchronous call primitive consumed by proxies.
///
/// `call` blocks the calling thread until the counterpart object produced
/// a reply or the transport reports a hard failure
/// ([`crate::CamwireError::Transport`]). There is no mid-call abort; any
/// concurrency between independent calls is the implementation's affair.
pub trait Transport: Send + Sync {
    /// Deliver `request` to the object addressed by `target` under the
    /// given transaction code and return its reply parcel, cursor at the
    /// start.
    fn call(&self, target: &RemoteHandle, code: u32, request: &Parcel) -> Result<Parcel>;
}
