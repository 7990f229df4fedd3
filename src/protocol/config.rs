//! Frame codec configuration

use super::{MAX_BODY_SIZE, PROTOCOL_VERSION};

/// Policy applied by [`FrameCodec`](super::FrameCodec).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CodecConfig {
    /// Version stamped into outgoing headers
    pub version: u16,
    /// Largest body accepted in either direction
    pub max_body_len: u32,
    /// Reject incoming frames whose version differs from `version`
    pub strict_version: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            version: PROTOCOL_VERSION,
            max_body_len: MAX_BODY_SIZE,
            strict_version: false,
        }
    }
}

impl CodecConfig {
    /// Set the version stamped into outgoing headers.
    #[must_use]
    pub const fn with_version(mut self, version: u16) -> Self {
        self.version = version;
        self
    }

    /// Set the body size limit.
    #[must_use]
    pub const fn with_max_body_len(mut self, max_body_len: u32) -> Self {
        self.max_body_len = max_body_len;
        self
    }

    /// Reject frames from peers speaking another version.
    #[must_use]
    pub const fn with_strict_version(mut self, strict: bool) -> Self {
        self.strict_version = strict;
        self
    }
}
