//! Body dispatch
//!
//! Routes a message type tag to the codec for its body shape. Every tag in
//! the [`MessageType`] registry resolves to exactly one [`BodyCodec`]; tags
//! outside the registry are rejected without touching the cursor.

use tracing::debug;

use super::{
    Body, BodyKind, BuildInfo, Error, JobDescriptor, JobListing, LastUpdateQuery, Message,
    MessageType, NodeListing, NodeRegistrationStatus, PartitionListing, ReadCursor, Result,
    ReturnCode, WireRecord, WriteCursor,
};

/// Encoder half of a body codec.
pub type EncodeFn = fn(MessageType, &Body, &mut WriteCursor<'_>) -> Result<()>;

/// Decoder half of a body codec.
pub type DecodeFn = fn(&mut ReadCursor<'_>) -> Result<Body>;

/// Encoder and decoder pair for one body shape.
#[derive(Debug, Clone, Copy)]
pub struct BodyCodec {
    /// Body shape handled by this codec
    pub kind: BodyKind,
    /// Write a body of this shape
    pub encode: EncodeFn,
    /// Read a body of this shape
    pub decode: DecodeFn,
}

fn mismatch(msg_type: MessageType, expected: BodyKind, body: &Body) -> Error {
    Error::BodyMismatch {
        msg_type: msg_type.as_u16(),
        expected,
        found: body.kind(),
    }
}

/// Build a codec for a body variant wrapping a [`WireRecord`].
macro_rules! record_codec {
    ($variant:ident, $record:ty) => {
        BodyCodec {
            kind: BodyKind::$variant,
            encode: |msg_type, body, cursor| match body {
                Body::$variant(record) => record.encode(cursor),
                other => Err(mismatch(msg_type, BodyKind::$variant, other)),
            },
            decode: |cursor| Ok(<$record as WireRecord>::decode(cursor)?.into()),
        }
    };
}

static EMPTY: BodyCodec = BodyCodec {
    kind: BodyKind::Empty,
    encode: |msg_type, body, _| match body {
        Body::Empty => Ok(()),
        other => Err(mismatch(msg_type, BodyKind::Empty, other)),
    },
    decode: |_| Ok(Body::Empty),
};

static LAST_UPDATE: BodyCodec = record_codec!(LastUpdate, LastUpdateQuery);
static BUILD_INFO: BodyCodec = record_codec!(BuildInfo, BuildInfo);
static JOB_DESCRIPTOR: BodyCodec = record_codec!(JobDescriptor, JobDescriptor);
static JOB_INFO: BodyCodec = record_codec!(JobInfo, JobListing);
static NODE_INFO: BodyCodec = record_codec!(NodeInfo, NodeListing);
static PARTITION_INFO: BodyCodec = record_codec!(PartitionInfo, PartitionListing);
static RETURN_CODE: BodyCodec = record_codec!(ReturnCode, ReturnCode);
static NODE_REGISTRATION: BodyCodec =
    record_codec!(NodeRegistrationStatus, NodeRegistrationStatus);

impl BodyKind {
    /// Codec for bodies of this shape.
    #[must_use]
    pub fn codec(self) -> &'static BodyCodec {
        match self {
            Self::Empty => &EMPTY,
            Self::LastUpdate => &LAST_UPDATE,
            Self::BuildInfo => &BUILD_INFO,
            Self::JobDescriptor => &JOB_DESCRIPTOR,
            Self::JobInfo => &JOB_INFO,
            Self::NodeInfo => &NODE_INFO,
            Self::PartitionInfo => &PARTITION_INFO,
            Self::ReturnCode => &RETURN_CODE,
            Self::NodeRegistrationStatus => &NODE_REGISTRATION,
        }
    }
}

impl MessageType {
    /// Codec registered for this type's body.
    #[must_use]
    pub fn codec(self) -> &'static BodyCodec {
        self.body_kind().codec()
    }
}

fn lookup(msg_type: u16) -> Result<MessageType> {
    MessageType::from_u16(msg_type).ok_or_else(|| {
        debug!("no codec for message type {msg_type}");
        Error::UnsupportedMessageType { msg_type }
    })
}

/// Write the body of `message`.
pub fn encode_body(message: &Message, cursor: &mut WriteCursor<'_>) -> Result<()> {
    let msg_type = message.message_type();
    (msg_type.codec().encode)(msg_type, message.body(), cursor)
}

/// Write `body` under a raw tag.
///
/// Fails with [`Error::UnsupportedMessageType`] for tags outside the
/// registry and [`Error::BodyMismatch`] when the body has the wrong shape.
pub fn encode_tagged(msg_type: u16, body: &Body, cursor: &mut WriteCursor<'_>) -> Result<()> {
    let msg_type = lookup(msg_type)?;
    (msg_type.codec().encode)(msg_type, body, cursor)
}

/// Read the body registered for a raw tag.
///
/// An unknown tag consumes nothing.
pub fn decode_body(msg_type: u16, cursor: &mut ReadCursor<'_>) -> Result<Body> {
    let msg_type = lookup(msg_type)?;
    (msg_type.codec().decode)(cursor)
}

/// Read a body and pair it with its type.
pub fn decode_message(msg_type: u16, cursor: &mut ReadCursor<'_>) -> Result<Message> {
    let resolved = lookup(msg_type)?;
    let body = (resolved.codec().decode)(cursor)?;
    Ok(Message::from_parts(resolved, body))
}
