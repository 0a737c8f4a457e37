//! Parcel module - the ordered transaction buffer and its codec.
//!
//! A [`Parcel`] is the byte buffer one transaction travels in: the proxy
//! writes a request parcel, the stub reads it and writes a reply parcel,
//! the proxy reads the reply. All fields are self-delimiting (fixed-width
//! big-endian integers, length-prefixed UTF-16 strings, presence-flagged
//! handles) so both sides agree on boundaries without schema negotiation.
//!
//! Every reply parcel starts with the exception envelope; see
//! [`read_exception`] for the decode-before-anything-else rule.

mod codec;
mod exception;

pub use codec::Parcel;
pub use exception::{
    read_exception, write_exception, write_no_exception, Exception, ExceptionCode,
};
