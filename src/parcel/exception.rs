//! Exception envelope - the reserved leading field of every reply.
//!
//! The writer puts either the zero success sentinel or a negative
//! exception code (optionally followed by a message) at the front of the
//! reply parcel. The reader must decode this envelope before interpreting
//! any other reply field: after a nonzero code the rest of the buffer
//! layout is implementation-defined and must not be parsed. This is the
//! single most important invariant of the protocol.
//!
//! # Example
//!
//! ```
//! use camwire::parcel::{read_exception, write_no_exception, Parcel};
//!
//! let mut reply = Parcel::new();
//! write_no_exception(&mut reply);
//! reply.write_i32(3);
//!
//! let mut reply = Parcel::from_bytes(reply.as_bytes());
//! assert!(read_exception(&mut reply).unwrap().is_none());
//! assert_eq!(reply.read_i32().unwrap(), 3);
//! ```

use super::Parcel;
use crate::error::ParcelError;

/// Success sentinel written in place of an exception code.
const NO_EXCEPTION: i32 = 0;

/// Categorized application-level failure carried by a reply envelope.
///
/// The closed set of negative wire codes; anything else nonzero decodes
/// as [`ExceptionCode::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExceptionCode {
    /// Caller lacks permission for the operation.
    Security,
    /// A structured payload failed to reconstruct on the remote side.
    BadPayload,
    /// An argument was outside the operation's domain.
    IllegalArgument,
    /// A required reference was null.
    NullReference,
    /// The remote object was not in a state to serve the call.
    IllegalState,
    /// Unrecognized nonzero wire code.
    Unknown(i32),
}

impl ExceptionCode {
    /// Wire value for this category.
    pub fn to_wire(self) -> i32 {
        match self {
            ExceptionCode::Security => -1,
            ExceptionCode::BadPayload => -2,
            ExceptionCode::IllegalArgument => -3,
            ExceptionCode::NullReference => -4,
            ExceptionCode::IllegalState => -5,
            ExceptionCode::Unknown(code) => code,
        }
    }

    /// Map a nonzero wire value onto the category set.
    pub fn from_wire(code: i32) -> Self {
        match code {
            -1 => ExceptionCode::Security,
            -2 => ExceptionCode::BadPayload,
            -3 => ExceptionCode::IllegalArgument,
            -4 => ExceptionCode::NullReference,
            -5 => ExceptionCode::IllegalState,
            other => ExceptionCode::Unknown(other),
        }
    }

    /// Human-readable category name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            ExceptionCode::Security => "Security",
            ExceptionCode::BadPayload => "BadPayload",
            ExceptionCode::IllegalArgument => "IllegalArgument",
            ExceptionCode::NullReference => "NullReference",
            ExceptionCode::IllegalState => "IllegalState",
            ExceptionCode::Unknown(_) => "Unknown",
        }
    }
}

/// An application exception with its optional message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exception {
    /// Failure category.
    pub code: ExceptionCode,
    /// Human-readable detail; decoders may ignore it.
    pub message: String,
}

impl Exception {
    /// Create an exception with a message.
    pub fn new(code: ExceptionCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Create an exception with no message.
    pub fn bare(code: ExceptionCode) -> Self {
        Self {
            code,
            message: String::new(),
        }
    }
}

/// Write the success envelope. Nothing else precedes the return values.
pub fn write_no_exception(reply: &mut Parcel) {
    reply.write_i32(NO_EXCEPTION);
}

/// Substitute wire code for an [`ExceptionCode::Unknown`] payload that is
/// not a legal negative exception code.
const CLAMPED_UNKNOWN: i32 = -6;

/// Write an exception envelope: the negative code, then the message.
///
/// Exception codes on the wire are strictly negative. An `Unknown`
/// payload of zero would forge the success sentinel and a positive one
/// is outside the contract, so any non-negative payload is clamped to
/// [`CLAMPED_UNKNOWN`] before encoding.
pub fn write_exception(reply: &mut Parcel, exception: &Exception) {
    let code = exception.code.to_wire();
    let code = if code >= 0 { CLAMPED_UNKNOWN } else { code };
    reply.write_i32(code);
    reply.write_string16(&exception.message);
}

/// Decode the envelope at the front of a reply.
///
/// Returns `Ok(None)` on the success sentinel. On a nonzero code the
/// trailing message is read if the buffer still carries one; a reply
/// truncated right after the code still decodes, with an empty message.
/// The caller must not read any further reply field once this returns
/// `Some`.
pub fn read_exception(reply: &mut Parcel) -> Result<Option<Exception>, ParcelError> {
    let code = reply.read_i32()?;
    if code == NO_EXCEPTION {
        return Ok(None);
    }

    // The message is advisory; tolerate its absence or corruption.
    let message = if reply.remaining() >= 4 {
        reply.read_string16().unwrap_or_default()
    } else {
        String::new()
    };

    Ok(Some(Exception {
        code: ExceptionCode::from_wire(code),
        message,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_exception_roundtrip() {
        let mut reply = Parcel::new();
        write_no_exception(&mut reply);
        reply.write_i32(42);

        let mut reply = Parcel::from_bytes(reply.as_bytes());
        assert_eq!(read_exception(&mut reply).unwrap(), None);
        assert_eq!(reply.read_i32().unwrap(), 42);
    }

    #[test]
    fn test_exception_roundtrip_with_message() {
        let mut reply = Parcel::new();
        write_exception(
            &mut reply,
            &Exception::new(ExceptionCode::Security, "caller not permitted"),
        );

        let mut reply = Parcel::from_bytes(reply.as_bytes());
        let exception = read_exception(&mut reply).unwrap().unwrap();
        assert_eq!(exception.code, ExceptionCode::Security);
        assert_eq!(exception.message, "caller not permitted");
    }

    #[test]
    fn test_wire_codes_are_stable() {
        assert_eq!(ExceptionCode::Security.to_wire(), -1);
        assert_eq!(ExceptionCode::BadPayload.to_wire(), -2);
        assert_eq!(ExceptionCode::IllegalArgument.to_wire(), -3);
        assert_eq!(ExceptionCode::NullReference.to_wire(), -4);
        assert_eq!(ExceptionCode::IllegalState.to_wire(), -5);
    }

    #[test]
    fn test_from_wire_roundtrip() {
        for code in [-1, -2, -3, -4, -5] {
            assert_eq!(ExceptionCode::from_wire(code).to_wire(), code);
        }
    }

    #[test]
    fn test_unmatched_code_is_unknown() {
        assert_eq!(ExceptionCode::from_wire(-128), ExceptionCode::Unknown(-128));
        assert_eq!(ExceptionCode::from_wire(7), ExceptionCode::Unknown(7));
        assert_eq!(ExceptionCode::Unknown(-128).name(), "Unknown");
    }

    #[test]
    fn test_unknown_zero_payload_cannot_forge_success() {
        let mut reply = Parcel::new();
        write_exception(
            &mut reply,
            &Exception::new(ExceptionCode::Unknown(0), "boom"),
        );

        let mut reply = Parcel::from_bytes(reply.as_bytes());
        let exception = read_exception(&mut reply)
            .unwrap()
            .expect("must still decode as an exception");
        assert_eq!(exception.code, ExceptionCode::Unknown(CLAMPED_UNKNOWN));
        assert_eq!(exception.message, "boom");
    }

    #[test]
    fn test_unknown_positive_payload_is_clamped() {
        let mut reply = Parcel::new();
        write_exception(&mut reply, &Exception::bare(ExceptionCode::Unknown(7)));

        let mut reply = Parcel::from_bytes(reply.as_bytes());
        let exception = read_exception(&mut reply).unwrap().unwrap();
        assert_eq!(exception.code, ExceptionCode::Unknown(CLAMPED_UNKNOWN));
    }

    #[test]
    fn test_truncated_after_code_still_decodes() {
        // Envelope code only, no message bytes at all.
        let mut reply = Parcel::new();
        reply.write_i32(ExceptionCode::IllegalState.to_wire());

        let mut reply = Parcel::from_bytes(reply.as_bytes());
        let exception = read_exception(&mut reply).unwrap().unwrap();
        assert_eq!(exception.code, ExceptionCode::IllegalState);
        assert_eq!(exception.message, "");
    }

    #[test]
    fn test_garbage_message_is_dropped() {
        let mut raw = Vec::new();
        raw.extend_from_slice(&(-4i32).to_be_bytes());
        raw.extend_from_slice(&i32::MAX.to_be_bytes()); // absurd length prefix

        let mut reply = Parcel::from_bytes(&raw);
        let exception = read_exception(&mut reply).unwrap().unwrap();
        assert_eq!(exception.code, ExceptionCode::NullReference);
        assert_eq!(exception.message, "");
    }

    #[test]
    fn test_empty_reply_is_a_decode_error() {
        let mut reply = Parcel::new();
        assert!(read_exception(&mut reply).is_err());
    }
}
