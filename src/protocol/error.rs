//! Wire codec error types

use thiserror::Error;

use super::BodyKind;

/// Wire codec errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Encode would write past the end of the destination buffer
    #[error("buffer overflow: need {needed} bytes, {remaining} remaining")]
    BufferOverflow {
        /// Bytes the write required
        needed: usize,
        /// Bytes left in the destination
        remaining: usize,
    },

    /// Decode needs more bytes than the source buffer holds
    #[error("buffer underflow: need {needed} bytes, {remaining} remaining")]
    BufferUnderflow {
        /// Bytes the read required
        needed: usize,
        /// Bytes left in the source
        remaining: usize,
    },

    /// Message type tag has no registered codec
    #[error("unsupported message type: {msg_type}")]
    UnsupportedMessageType {
        /// Raw tag from the header
        msg_type: u16,
    },

    /// Structurally invalid field contents
    #[error("format error: {0}")]
    Format(#[from] FormatError),

    /// Memory for a decoded record could not be reserved
    #[error("allocation failure while decoding {what}")]
    AllocationFailure {
        /// What was being allocated
        what: &'static str,
    },

    /// Body shape does not match the one registered for the tag
    #[error("message type {msg_type} carries {expected:?} bodies, got {found:?}")]
    BodyMismatch {
        /// Raw tag of the message
        msg_type: u16,
        /// Body kind registered for the tag
        expected: BodyKind,
        /// Body kind supplied by the caller
        found: BodyKind,
    },

    /// Header body length disagrees with the bytes the body actually used
    #[error("frame length mismatch: header declares {declared} bytes, body used {consumed}")]
    FrameLength {
        /// Length from the frame header
        declared: u32,
        /// Bytes consumed by the body codec
        consumed: usize,
    },

    /// Declared body is larger than the configured limit
    #[error("body too large: {size} bytes (max {max})")]
    BodyTooLarge {
        /// Declared body size
        size: u32,
        /// Maximum allowed
        max: u32,
    },

    /// Header version rejected by a strict codec
    #[error("protocol version mismatch: expected {expected}, got {found}")]
    VersionMismatch {
        /// Version the codec speaks
        expected: u16,
        /// Version found in the header
        found: u16,
    },
}

impl Error {
    /// Whether the connection can survive this error by dropping the one message.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedMessageType { .. }
                | Self::Format(_)
                | Self::BodyMismatch { .. }
        )
    }

    /// Whether retrying the same operation later may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::AllocationFailure { .. })
    }

    /// Whether the input simply ended too early.
    #[must_use]
    pub const fn is_truncation(&self) -> bool {
        matches!(self, Self::BufferUnderflow { .. })
    }
}

/// Malformed field contents
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// Range text contains something that is not an index or `a-b` range
    #[error("invalid range token {token:?}")]
    InvalidToken {
        /// Offending token
        token: String,
    },

    /// Range start is greater than its end
    #[error("inverted range {start}-{end}")]
    InvertedRange {
        /// Range start
        start: u32,
        /// Range end
        end: u32,
    },

    /// Node index above [`MAX_NODE_INDEX`](super::MAX_NODE_INDEX)
    #[error("node index {index} out of range (max {max})")]
    IndexOutOfRange {
        /// Offending index
        index: u32,
        /// Largest accepted index
        max: u32,
    },

    /// String bytes are not UTF-8
    #[error("invalid UTF-8 in string field")]
    InvalidUtf8,

    /// String is longer than its 16-bit length prefix can express
    #[error("string too long: {len} bytes (max {max})")]
    StringTooLong {
        /// String length in bytes
        len: usize,
        /// Maximum encodable length
        max: usize,
    },

    /// Listing has more entries than its 32-bit count can express
    #[error("too many records: {count}")]
    TooManyRecords {
        /// Number of entries in the listing
        count: usize,
    },
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
