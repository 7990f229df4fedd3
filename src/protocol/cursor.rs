//! Bounds-checked primitive reads and writes.
//!
//! A [`Cursor`] bundles a buffer with the current position; the remaining
//! capacity is always derived from the two, so they cannot drift apart.
//! Every primitive checks capacity before touching the buffer and moves the
//! position only on success, which means a failed write never disturbs bytes
//! already written and a failed read leaves the position where it was.
//!
//! # Wire Format
//!
//! ```text
//! u16           := 2 bytes, big-endian
//! u32           := 4 bytes, big-endian
//! String        := len:u16 bytes[len]     (len == 0 => empty string)
//! FixedBlob(n)  := bytes[n]
//! ```

use super::{Error, FormatError, Result};

/// Largest string the 16-bit length prefix can describe.
pub const MAX_STRING_LEN: usize = u16::MAX as usize;

/// Cursor over a borrowed source buffer.
pub type ReadCursor<'a> = Cursor<&'a [u8]>;

/// Cursor over a borrowed destination buffer.
pub type WriteCursor<'a> = Cursor<&'a mut [u8]>;

/// Position-tracking view over a byte buffer for one encode or decode call.
#[derive(Debug)]
pub struct Cursor<B> {
    buf: B,
    pos: usize,
}

impl<B: AsRef<[u8]>> Cursor<B> {
    /// Start a cursor at the beginning of `buf`.
    #[must_use]
    pub const fn new(buf: B) -> Self {
        Self { buf, pos: 0 }
    }

    /// Bytes consumed or produced so far.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left before the end of the buffer.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.buf.as_ref().len() - self.pos
    }

    /// Release the underlying buffer.
    pub fn into_inner(self) -> B {
        self.buf
    }

    fn check_read(&self, needed: usize) -> Result<()> {
        let remaining = self.remaining();
        if needed > remaining {
            return Err(Error::BufferUnderflow { needed, remaining });
        }
        Ok(())
    }

    fn take(&mut self, len: usize) -> Result<&[u8]> {
        self.check_read(len)?;
        let start = self.pos;
        self.pos += len;
        Ok(&self.buf.as_ref()[start..self.pos])
    }

    /// Read a big-endian `u16`.
    pub fn read_u16(&mut self) -> Result<u16> {
        let bytes = self.take(2)?;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    /// Read a big-endian `u32`.
    pub fn read_u32(&mut self) -> Result<u32> {
        let bytes = self.take(4)?;
        Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Read a length-prefixed string into a freshly owned `String`.
    ///
    /// A zero length yields an empty string rather than an error.
    pub fn read_string(&mut self) -> Result<String> {
        self.check_read(2)?;
        let prefix = &self.buf.as_ref()[self.pos..self.pos + 2];
        let len = usize::from(u16::from_be_bytes([prefix[0], prefix[1]]));
        self.check_read(2 + len)?;

        let mut owned = Vec::new();
        owned
            .try_reserve_exact(len)
            .map_err(|_| Error::AllocationFailure { what: "string" })?;

        let start = self.pos + 2;
        owned.extend_from_slice(&self.buf.as_ref()[start..start + len]);
        let value = String::from_utf8(owned).map_err(|_| FormatError::InvalidUtf8)?;
        self.pos = start + len;
        Ok(value)
    }

    /// Read exactly `len` bytes.
    pub fn read_fixed_blob(&mut self, len: usize) -> Result<Vec<u8>> {
        self.check_read(len)?;
        let mut owned = Vec::new();
        owned
            .try_reserve_exact(len)
            .map_err(|_| Error::AllocationFailure { what: "blob" })?;
        owned.extend_from_slice(self.take(len)?);
        Ok(owned)
    }

    /// Read exactly `N` bytes into an array.
    pub fn read_fixed_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> Cursor<B> {
    fn reserve(&mut self, len: usize) -> Result<&mut [u8]> {
        let remaining = self.remaining();
        if len > remaining {
            return Err(Error::BufferOverflow {
                needed: len,
                remaining,
            });
        }
        let start = self.pos;
        self.pos += len;
        Ok(&mut self.buf.as_mut()[start..self.pos])
    }

    /// The bytes written so far.
    #[must_use]
    pub fn written(&self) -> &[u8] {
        &self.buf.as_ref()[..self.pos]
    }

    /// Write a big-endian `u16`.
    pub fn write_u16(&mut self, value: u16) -> Result<()> {
        self.reserve(2)?.copy_from_slice(&value.to_be_bytes());
        Ok(())
    }

    /// Write a big-endian `u32`.
    pub fn write_u32(&mut self, value: u32) -> Result<()> {
        self.reserve(4)?.copy_from_slice(&value.to_be_bytes());
        Ok(())
    }

    /// Write a string behind its 16-bit length prefix.
    pub fn write_string(&mut self, value: &str) -> Result<()> {
        let len = u16::try_from(value.len()).map_err(|_| FormatError::StringTooLong {
            len: value.len(),
            max: MAX_STRING_LEN,
        })?;
        let out = self.reserve(2 + value.len())?;
        out[..2].copy_from_slice(&len.to_be_bytes());
        out[2..].copy_from_slice(value.as_bytes());
        Ok(())
    }

    /// Write exactly `len` bytes, truncating `bytes` or zero-padding it to fit.
    pub fn write_fixed_blob(&mut self, bytes: &[u8], len: usize) -> Result<()> {
        let out = self.reserve(len)?;
        let copied = bytes.len().min(len);
        out[..copied].copy_from_slice(&bytes[..copied]);
        out[copied..].fill(0);
        Ok(())
    }
}

/// Encoded size of a length-prefixed string.
#[must_use]
pub const fn string_len(value: &str) -> usize {
    2 + value.len()
}
