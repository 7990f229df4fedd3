//! Typed control messages

use bytes::Bytes;

use super::{
    BodyKind, BuildInfo, Error, FrameCodec, JobDescriptor, JobListing, LastUpdateQuery,
    MessageType, NodeListing, NodeRegistrationStatus, PartitionListing, Result, ReturnCode,
    WireRecord,
};

/// Decoded message body, one variant per [`BodyKind`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Body {
    /// No body bytes
    #[default]
    Empty,
    /// Table query
    LastUpdate(LastUpdateQuery),
    /// Controller build configuration
    BuildInfo(Box<BuildInfo>),
    /// Job submission
    JobDescriptor(Box<JobDescriptor>),
    /// Job table
    JobInfo(JobListing),
    /// Node table
    NodeInfo(NodeListing),
    /// Partition table
    PartitionInfo(PartitionListing),
    /// Status reply
    ReturnCode(ReturnCode),
    /// Node daemon status report
    NodeRegistrationStatus(NodeRegistrationStatus),
}

impl Body {
    /// Shape of this body.
    #[must_use]
    pub const fn kind(&self) -> BodyKind {
        match self {
            Self::Empty => BodyKind::Empty,
            Self::LastUpdate(_) => BodyKind::LastUpdate,
            Self::BuildInfo(_) => BodyKind::BuildInfo,
            Self::JobDescriptor(_) => BodyKind::JobDescriptor,
            Self::JobInfo(_) => BodyKind::JobInfo,
            Self::NodeInfo(_) => BodyKind::NodeInfo,
            Self::PartitionInfo(_) => BodyKind::PartitionInfo,
            Self::ReturnCode(_) => BodyKind::ReturnCode,
            Self::NodeRegistrationStatus(_) => BodyKind::NodeRegistrationStatus,
        }
    }

    /// Exact number of body bytes on the wire.
    #[must_use]
    pub fn encoded_len(&self) -> usize {
        match self {
            Self::Empty => 0,
            Self::LastUpdate(query) => query.encoded_len(),
            Self::BuildInfo(info) => info.encoded_len(),
            Self::JobDescriptor(desc) => desc.encoded_len(),
            Self::JobInfo(listing) => listing.encoded_len(),
            Self::NodeInfo(listing) => listing.encoded_len(),
            Self::PartitionInfo(listing) => listing.encoded_len(),
            Self::ReturnCode(rc) => rc.encoded_len(),
            Self::NodeRegistrationStatus(status) => status.encoded_len(),
        }
    }
}

impl From<LastUpdateQuery> for Body {
    fn from(value: LastUpdateQuery) -> Self {
        Self::LastUpdate(value)
    }
}

impl From<BuildInfo> for Body {
    fn from(value: BuildInfo) -> Self {
        Self::BuildInfo(Box::new(value))
    }
}

impl From<JobDescriptor> for Body {
    fn from(value: JobDescriptor) -> Self {
        Self::JobDescriptor(Box::new(value))
    }
}

impl From<JobListing> for Body {
    fn from(value: JobListing) -> Self {
        Self::JobInfo(value)
    }
}

impl From<NodeListing> for Body {
    fn from(value: NodeListing) -> Self {
        Self::NodeInfo(value)
    }
}

impl From<PartitionListing> for Body {
    fn from(value: PartitionListing) -> Self {
        Self::PartitionInfo(value)
    }
}

impl From<ReturnCode> for Body {
    fn from(value: ReturnCode) -> Self {
        Self::ReturnCode(value)
    }
}

impl From<NodeRegistrationStatus> for Body {
    fn from(value: NodeRegistrationStatus) -> Self {
        Self::NodeRegistrationStatus(value)
    }
}

/// A message type paired with a body of the matching shape.
///
/// The pairing is checked on construction, so every `Message` can be encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Message {
    msg_type: MessageType,
    body: Body,
}

impl Message {
    /// Pair a message type with its body.
    ///
    /// Fails with [`Error::BodyMismatch`] when the body shape differs from
    /// the one registered for `msg_type`.
    pub fn new(msg_type: MessageType, body: impl Into<Body>) -> Result<Self> {
        let body = body.into();
        let expected = msg_type.body_kind();
        let found = body.kind();
        if expected != found {
            return Err(Error::BodyMismatch {
                msg_type: msg_type.as_u16(),
                expected,
                found,
            });
        }
        Ok(Self { msg_type, body })
    }

    /// Build a message whose type carries no body.
    ///
    /// Returns `None` when `msg_type` expects a body.
    #[must_use]
    pub fn empty(msg_type: MessageType) -> Option<Self> {
        msg_type.is_empty_body().then_some(Self {
            msg_type,
            body: Body::Empty,
        })
    }

    /// Build a generic status reply.
    #[must_use]
    pub const fn return_code(code: i32) -> Self {
        Self {
            msg_type: MessageType::ResponseSlurmRc,
            body: Body::ReturnCode(ReturnCode { code }),
        }
    }

    pub(crate) const fn from_parts(msg_type: MessageType, body: Body) -> Self {
        Self { msg_type, body }
    }

    /// Get message type
    #[must_use]
    pub const fn message_type(&self) -> MessageType {
        self.msg_type
    }

    /// Get body
    #[must_use]
    pub const fn body(&self) -> &Body {
        &self.body
    }

    /// Take the body, dropping the type
    #[must_use]
    pub fn into_body(self) -> Body {
        self.body
    }

    /// Encode a complete frame with the default codec
    pub fn encode(&self) -> Result<Bytes> {
        FrameCodec::default().encode(self)
    }

    /// Decode a complete frame with the default codec
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        FrameCodec::default().decode(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_checks_body_shape() {
        let result = Message::new(MessageType::RequestJobInfo, ReturnCode::SUCCESS);
        assert_eq!(
            result,
            Err(Error::BodyMismatch {
                msg_type: 2003,
                expected: BodyKind::LastUpdate,
                found: BodyKind::ReturnCode,
            })
        );

        let msg = Message::new(
            MessageType::RequestJobInfo,
            LastUpdateQuery { last_update: 5 },
        )
        .unwrap();
        assert_eq!(msg.message_type(), MessageType::RequestJobInfo);
        assert_eq!(msg.body().kind(), BodyKind::LastUpdate);
    }

    #[test]
    fn test_empty_only_for_empty_types() {
        assert!(Message::empty(MessageType::RequestReconfigure).is_some());
        assert!(Message::empty(MessageType::ResponseJobInfo).is_none());
    }

    #[test]
    fn test_return_code_message() {
        let msg = Message::return_code(-3);
        assert_eq!(msg.message_type(), MessageType::ResponseSlurmRc);
        assert_eq!(msg.into_body(), Body::ReturnCode(ReturnCode { code: -3 }));
    }

    #[test]
    fn test_body_len_matches_record() {
        let body = Body::from(NodeRegistrationStatus {
            node_name: "node01".into(),
            ..NodeRegistrationStatus::default()
        });
        assert_eq!(body.encoded_len(), 24);
        assert_eq!(Body::Empty.encoded_len(), 0);
    }

    #[test]
    fn test_encode_decode_roundtrip() {
        let msg = Message::new(
            MessageType::ResponseNodeInfo,
            NodeListing::new(3, Vec::new()),
        )
        .unwrap();
        let bytes = msg.encode().unwrap();
        assert_eq!(Message::decode(&bytes).unwrap(), msg);
    }
}
