//! Error types for camwire.
//!
//! Three failure classes cross this layer, and only two of them are Rust
//! errors:
//!
//! - **Transport failures** ([`CamwireError::Transport`]) - the call could
//!   not complete at all.
//! - **Protocol violations** ([`CamwireError::MalformedRequest`],
//!   [`CamwireError::MalformedReply`], [`CamwireError::InterfaceMismatch`],
//!   [`CamwireError::UnknownTransaction`]) - version or implementation bugs,
//!   always fatal to the call, never retried.
//! - **Application exceptions** - expected outcomes carried by the reply's
//!   exception envelope; they never surface as `Err`, the proxy converts
//!   them into each operation's documented sentinel value. See
//!   [`crate::parcel::Exception`].

use thiserror::Error;

/// Decode fault inside a single parcel.
///
/// Wrapped as the source of [`CamwireError::MalformedRequest`] on the stub
/// side and [`CamwireError::MalformedReply`] on the proxy side.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParcelError {
    /// Read past the end of the buffer.
    #[error("read past end of parcel: needed {needed} bytes, {remaining} remaining")]
    UnexpectedEof { needed: usize, remaining: usize },

    /// A length prefix was negative.
    #[error("negative length prefix: {0}")]
    NegativeLength(i32),

    /// String bytes did not form valid UTF-16.
    #[error("invalid UTF-16 string data")]
    InvalidUtf16,

    /// A presence marker was neither 0 nor 1.
    #[error("invalid presence marker: {0}")]
    BadPresenceMarker(i32),

    /// A field carried a value outside its documented domain.
    #[error("field value out of range: {0}")]
    ValueOutOfRange(i32),
}

/// Main error type for all camwire operations.
#[derive(Debug, Error)]
pub enum CamwireError {
    /// The transport could not complete the round trip (peer gone, queue
    /// full). Distinct from any application exception.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The stub could not decode an incoming request buffer.
    #[error("malformed request: {0}")]
    MalformedRequest(#[source] ParcelError),

    /// The proxy could not decode a reply buffer.
    #[error("malformed reply: {0}")]
    MalformedReply(#[source] ParcelError),

    /// The identity token in a request named a foreign interface.
    #[error("interface token mismatch: expected {expected:?}, got {got:?}")]
    InterfaceMismatch { expected: String, got: String },

    /// A returned handle claimed an interface it does not implement.
    #[error("handle descriptor mismatch: expected {expected:?}, got {got:?}")]
    DescriptorMismatch { expected: String, got: String },

    /// Transaction code not in the method registry and not a
    /// base-interface operation.
    #[error("unknown transaction code: {0}")]
    UnknownTransaction(u32),
}

/// Result type alias using CamwireError.
pub type Result<T> = std::result::Result<T, CamwireError>;
