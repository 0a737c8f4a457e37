//! Ordered byte buffer with self-delimiting read/write primitives.
//!
//! Field layout:
//!
//! ```text
//! i32 / u64   fixed-width, Big Endian
//! string      i32 code-unit count + UTF-16 code units (u16 BE each)
//! handle      i32 presence marker (0 = null, 1 = present)
//!             + u64 object id + descriptor string when present
//! ```
//!
//! Reads consume from a cursor and fail hard on any shortfall - a read
//! past the end or a marker outside its domain is a protocol violation,
//! not a recoverable condition.
//!
//! # Example
//!
//! ```
//! use camwire::parcel::Parcel;
//!
//! let mut parcel = Parcel::new();
//! parcel.write_i32(42);
//! parcel.write_string16("hello");
//!
//! let mut parcel = Parcel::from_bytes(parcel.as_bytes());
//! assert_eq!(parcel.read_i32().unwrap(), 42);
//! assert_eq!(parcel.read_string16().unwrap(), "hello");
//! ```

use bytes::BytesMut;

use crate::error::ParcelError;
use crate::handle::RemoteHandle;

/// An ordered transaction buffer.
///
/// Exclusively owned by the single call that created it; a request/reply
/// pair is allocated fresh per call and never reused.
#[derive(Debug, Default, Clone)]
pub struct Parcel {
    buf: BytesMut,
    cursor: usize,
}

impl Parcel {
    /// Create an empty parcel for writing.
    pub fn new() -> Self {
        Self {
            buf: BytesMut::with_capacity(64),
            cursor: 0,
        }
    }

    /// Create a parcel over existing bytes, cursor at the start.
    pub fn from_bytes(data: &[u8]) -> Self {
        Self {
            buf: BytesMut::from(data),
            cursor: 0,
        }
    }

    /// All bytes written so far.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Total byte length of the parcel.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Check if the parcel holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Bytes left to read past the cursor.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.cursor
    }

    /// Consume `n` raw bytes, failing if fewer remain.
    fn take(&mut self, n: usize) -> Result<&[u8], ParcelError> {
        if self.remaining() < n {
            return Err(ParcelError::UnexpectedEof {
                needed: n,
                remaining: self.remaining(),
            });
        }
        let start = self.cursor;
        self.cursor += n;
        Ok(&self.buf[start..self.cursor])
    }

    /// Write a 32-bit signed integer.
    pub fn write_i32(&mut self, value: i32) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    /// Read a 32-bit signed integer.
    pub fn read_i32(&mut self) -> Result<i32, ParcelError> {
        let bytes = self.take(4)?;
        Ok(i32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Write a 64-bit unsigned integer (handle object ids).
    pub fn write_u64(&mut self, value: u64) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    /// Read a 64-bit unsigned integer.
    pub fn read_u64(&mut self) -> Result<u64, ParcelError> {
        let bytes = self.take(8)?;
        let mut raw = [0u8; 8];
        raw.copy_from_slice(bytes);
        Ok(u64::from_be_bytes(raw))
    }

    /// Write a length-prefixed UTF-16 string.
    ///
    /// The prefix counts UTF-16 code units, not bytes.
    ///
    /// # Panics
    ///
    /// Panics in debug builds when the string holds more code units than
    /// the i32 prefix can carry.
    pub fn write_string16(&mut self, value: &str) {
        let units: Vec<u16> = value.encode_utf16().collect();
        debug_assert!(
            units.len() <= i32::MAX as usize,
            "string overflows the code-unit prefix"
        );
        self.write_i32(units.len() as i32);
        for unit in units {
            self.buf.extend_from_slice(&unit.to_be_bytes());
        }
    }

    /// Read a length-prefixed UTF-16 string.
    pub fn read_string16(&mut self) -> Result<String, ParcelError> {
        let len = self.read_i32()?;
        if len < 0 {
            return Err(ParcelError::NegativeLength(len));
        }
        let byte_len = len as usize * 2;
        let bytes = self.take(byte_len)?;
        let units: Vec<u16> = bytes
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        String::from_utf16(&units).map_err(|_| ParcelError::InvalidUtf16)
    }

    /// Write a remote-object handle, null-representable.
    ///
    /// `None` writes only the cleared presence marker; a present handle
    /// writes the marker, the object id, and the interface descriptor the
    /// handle claims to implement.
    pub fn write_handle(&mut self, handle: Option<&RemoteHandle>) {
        match handle {
            Some(handle) => {
                self.write_i32(1);
                self.write_u64(handle.id());
                self.write_string16(handle.descriptor());
            }
            None => self.write_i32(0),
        }
    }

    /// Read a remote-object handle, `None` for the null marker.
    pub fn read_handle(&mut self) -> Result<Option<RemoteHandle>, ParcelError> {
        match self.read_i32()? {
            0 => Ok(None),
            1 => {
                let id = self.read_u64()?;
                let descriptor = self.read_string16()?;
                Ok(Some(RemoteHandle::new(id, descriptor)))
            }
            other => Err(ParcelError::BadPresenceMarker(other)),
        }
    }

    /// Write the interface-identity token. Always the first field of a
    /// request; the stub validates it before decoding anything else.
    pub fn write_interface_token(&mut self, descriptor: &str) {
        self.write_string16(descriptor);
    }

    /// Read the interface-identity token.
    pub fn read_interface_token(&mut self) -> Result<String, ParcelError> {
        self.read_string16()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_i32_roundtrip() {
        let mut parcel = Parcel::new();
        parcel.write_i32(0);
        parcel.write_i32(-71);
        parcel.write_i32(i32::MAX);
        parcel.write_i32(i32::MIN);

        let mut parcel = Parcel::from_bytes(parcel.as_bytes());
        assert_eq!(parcel.read_i32().unwrap(), 0);
        assert_eq!(parcel.read_i32().unwrap(), -71);
        assert_eq!(parcel.read_i32().unwrap(), i32::MAX);
        assert_eq!(parcel.read_i32().unwrap(), i32::MIN);
        assert_eq!(parcel.remaining(), 0);
    }

    #[test]
    fn test_i32_big_endian_layout() {
        let mut parcel = Parcel::new();
        parcel.write_i32(0x01020304);
        assert_eq!(parcel.as_bytes(), &[0x01, 0x02, 0x03, 0x04]);
    }

    #[test]
    fn test_u64_roundtrip() {
        let mut parcel = Parcel::new();
        parcel.write_u64(0xDEADBEEF_CAFEF00D);

        let mut parcel = Parcel::from_bytes(parcel.as_bytes());
        assert_eq!(parcel.read_u64().unwrap(), 0xDEADBEEF_CAFEF00D);
    }

    #[test]
    fn test_string16_roundtrip() {
        let mut parcel = Parcel::new();
        parcel.write_string16("com.example.viewer");
        parcel.write_string16("");
        parcel.write_string16("zażółć 📷");

        let mut parcel = Parcel::from_bytes(parcel.as_bytes());
        assert_eq!(parcel.read_string16().unwrap(), "com.example.viewer");
        assert_eq!(parcel.read_string16().unwrap(), "");
        assert_eq!(parcel.read_string16().unwrap(), "zażółć 📷");
    }

    #[test]
    fn test_string16_length_counts_code_units() {
        // U+1F4F7 encodes as a surrogate pair: 2 code units, 1 char.
        let mut parcel = Parcel::new();
        parcel.write_string16("📷");

        let mut reader = Parcel::from_bytes(parcel.as_bytes());
        assert_eq!(reader.read_i32().unwrap(), 2);
    }

    #[test]
    #[ignore = "allocates gigabytes to overflow the length prefix"]
    #[should_panic(expected = "code-unit prefix")]
    fn test_write_string16_rejects_oversized_string() {
        let huge = "a".repeat(i32::MAX as usize + 1);
        let mut parcel = Parcel::new();
        parcel.write_string16(&huge);
    }

    #[test]
    fn test_string16_negative_length_rejected() {
        let mut parcel = Parcel::new();
        parcel.write_i32(-1);

        let mut parcel = Parcel::from_bytes(parcel.as_bytes());
        assert_eq!(
            parcel.read_string16().unwrap_err(),
            ParcelError::NegativeLength(-1)
        );
    }

    #[test]
    fn test_string16_lone_surrogate_rejected() {
        let mut raw = Vec::new();
        raw.extend_from_slice(&1i32.to_be_bytes()); // one code unit
        raw.extend_from_slice(&0xD800u16.to_be_bytes()); // lone high surrogate

        let mut parcel = Parcel::from_bytes(&raw);
        assert_eq!(
            parcel.read_string16().unwrap_err(),
            ParcelError::InvalidUtf16
        );
    }

    #[test]
    fn test_read_past_end() {
        let mut parcel = Parcel::from_bytes(&[0x00, 0x01]);
        assert_eq!(
            parcel.read_i32().unwrap_err(),
            ParcelError::UnexpectedEof {
                needed: 4,
                remaining: 2
            }
        );
    }

    #[test]
    fn test_empty_parcel_read_fails() {
        let mut parcel = Parcel::new();
        assert!(parcel.is_empty());
        assert!(parcel.read_i32().is_err());
    }

    #[test]
    fn test_handle_null_roundtrip() {
        let mut parcel = Parcel::new();
        parcel.write_handle(None);
        assert_eq!(parcel.len(), 4); // just the cleared marker

        let mut parcel = Parcel::from_bytes(parcel.as_bytes());
        assert_eq!(parcel.read_handle().unwrap(), None);
    }

    #[test]
    fn test_handle_present_roundtrip() {
        let handle = RemoteHandle::new(7, "camwire.ICamera");
        let mut parcel = Parcel::new();
        parcel.write_handle(Some(&handle));

        let mut parcel = Parcel::from_bytes(parcel.as_bytes());
        let decoded = parcel.read_handle().unwrap().unwrap();
        assert_eq!(decoded.id(), 7);
        assert_eq!(decoded.descriptor(), "camwire.ICamera");
    }

    #[test]
    fn test_handle_bad_presence_marker() {
        let mut parcel = Parcel::new();
        parcel.write_i32(2);

        let mut parcel = Parcel::from_bytes(parcel.as_bytes());
        assert_eq!(
            parcel.read_handle().unwrap_err(),
            ParcelError::BadPresenceMarker(2)
        );
    }

    #[test]
    fn test_mixed_fields_preserve_order() {
        let listener = RemoteHandle::new(99, "camwire.ICameraServiceListener");

        let mut parcel = Parcel::new();
        parcel.write_interface_token("camwire.ICameraService");
        parcel.write_handle(Some(&listener));
        parcel.write_i32(1);
        parcel.write_string16("com.example.viewer");
        parcel.write_i32(10042);

        let mut parcel = Parcel::from_bytes(parcel.as_bytes());
        assert_eq!(
            parcel.read_interface_token().unwrap(),
            "camwire.ICameraService"
        );
        assert_eq!(parcel.read_handle().unwrap().unwrap().id(), 99);
        assert_eq!(parcel.read_i32().unwrap(), 1);
        assert_eq!(parcel.read_string16().unwrap(), "com.example.viewer");
        assert_eq!(parcel.read_i32().unwrap(), 10042);
        assert_eq!(parcel.remaining(), 0);
    }
}
