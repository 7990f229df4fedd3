//! Frame header
//!
//! Every message is preceded by a fixed 10-byte header.

use super::{Cursor, HEADER_SIZE, MessageType, PROTOCOL_VERSION, Result};

/// Frame header (10 bytes on the wire)
///
/// # Wire Format
///
/// ```text
/// 0                   1                   2                   3
/// 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |          Version (2)          |           Flags (2)           |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |       Message Type (2)        |                               |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+                               +
/// |                        Body Length (4)                        |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
///
/// Integers are big-endian. The header codec does not judge version or
/// flags; that policy belongs to [`FrameCodec`](super::FrameCodec).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHeader {
    /// Protocol version of the sender
    pub version: u16,
    /// Header flags (no bits are assigned yet)
    pub flags: u16,
    /// Raw message type tag
    pub msg_type: u16,
    /// Exact byte length of the body that follows
    pub body_length: u32,
}

impl FrameHeader {
    /// Create a header for the current protocol version with no flags.
    #[must_use]
    pub const fn new(msg_type: MessageType, body_length: u32) -> Self {
        Self {
            version: PROTOCOL_VERSION,
            flags: 0,
            msg_type: msg_type.as_u16(),
            body_length,
        }
    }

    /// Replace the version field.
    #[must_use]
    pub const fn with_version(mut self, version: u16) -> Self {
        self.version = version;
        self
    }

    /// Replace the flags field.
    #[must_use]
    pub const fn with_flags(mut self, flags: u16) -> Self {
        self.flags = flags;
        self
    }

    /// Typed message type, if the tag is registered.
    #[must_use]
    pub fn message_type(&self) -> Option<MessageType> {
        MessageType::from_u16(self.msg_type)
    }

    /// Total frame size (header plus body).
    #[must_use]
    pub const fn frame_len(&self) -> usize {
        HEADER_SIZE + self.body_length as usize
    }

    /// Write the header through a cursor.
    pub fn encode<B: AsRef<[u8]> + AsMut<[u8]>>(&self, cursor: &mut Cursor<B>) -> Result<()> {
        cursor.write_u16(self.version)?;
        cursor.write_u16(self.flags)?;
        cursor.write_u16(self.msg_type)?;
        cursor.write_u32(self.body_length)
    }

    /// Read a header through a cursor.
    pub fn decode<B: AsRef<[u8]>>(cursor: &mut Cursor<B>) -> Result<Self> {
        Ok(Self {
            version: cursor.read_u16()?,
            flags: cursor.read_u16()?,
            msg_type: cursor.read_u16()?,
            body_length: cursor.read_u32()?,
        })
    }

    /// Convert to bytes.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut bytes = [0u8; HEADER_SIZE];

        bytes[0..2].copy_from_slice(&self.version.to_be_bytes());
        bytes[2..4].copy_from_slice(&self.flags.to_be_bytes());
        bytes[4..6].copy_from_slice(&self.msg_type.to_be_bytes());
        bytes[6..10].copy_from_slice(&self.body_length.to_be_bytes());

        bytes
    }

    /// Parse from the front of `bytes`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::decode(&mut Cursor::new(bytes))
    }
}

impl Default for FrameHeader {
    fn default() -> Self {
        Self {
            version: PROTOCOL_VERSION,
            flags: 0,
            msg_type: 0,
            body_length: 0,
        }
    }
}
