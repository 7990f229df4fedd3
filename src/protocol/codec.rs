//! Frame codec (header + body)
//!
//! A frame is a 10-byte [`FrameHeader`] followed by exactly `body_length`
//! body bytes. [`FrameCodec`] writes frames into caller buffers or fresh
//! [`Bytes`], and reads them back from complete buffers or from a growing
//! [`BytesMut`] fed by a transport.

use bytes::{Bytes, BytesMut};
use tracing::{debug, trace};

use super::dispatch::{decode_message, encode_body};
use super::{CodecConfig, Cursor, Error, FrameHeader, HEADER_SIZE, Message, Result};

/// Frames messages according to a [`CodecConfig`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameCodec {
    config: CodecConfig,
}

impl FrameCodec {
    /// Create a codec with the given policy.
    #[must_use]
    pub const fn new(config: CodecConfig) -> Self {
        Self { config }
    }

    /// Policy in effect.
    #[must_use]
    pub const fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Exact size of the frame [`encode`](Self::encode) produces.
    #[must_use]
    pub fn frame_len(&self, message: &Message) -> usize {
        HEADER_SIZE + message.body().encoded_len()
    }

    /// Write one frame to the front of `buf`, returning its length.
    ///
    /// # Format
    ///
    /// ```text
    /// [HEADER (10 bytes)] [BODY (body_length bytes)]
    /// ```
    ///
    /// Nothing is written when the frame does not fit.
    pub fn encode_into(&self, message: &Message, buf: &mut [u8]) -> Result<usize> {
        let body_len = self.checked_body_len(message)?;
        let frame_len = HEADER_SIZE + body_len as usize;
        if frame_len > buf.len() {
            return Err(Error::BufferOverflow {
                needed: frame_len,
                remaining: buf.len(),
            });
        }

        let (head, rest) = buf.split_at_mut(HEADER_SIZE);
        let mut body = Cursor::new(&mut rest[..body_len as usize]);
        encode_body(message, &mut body)?;
        let consumed = body.position();
        if consumed != body_len as usize {
            return Err(Error::FrameLength {
                declared: body_len,
                consumed,
            });
        }

        // Header goes in last, once the body length is known to be right
        FrameHeader::new(message.message_type(), body_len)
            .with_version(self.config.version)
            .encode(&mut Cursor::new(head))?;

        trace!(
            msg_type = message.message_type().as_u16(),
            body_len, "encoded frame"
        );
        Ok(frame_len)
    }

    /// Encode one frame into an exactly sized buffer.
    pub fn encode(&self, message: &Message) -> Result<Bytes> {
        let mut buf = vec![0u8; self.frame_len(message)];
        let written = self.encode_into(message, &mut buf)?;
        buf.truncate(written);
        Ok(Bytes::from(buf))
    }

    /// Append one frame to `dst`.
    ///
    /// On error `dst` is left as it was.
    pub fn encode_to(&self, message: &Message, dst: &mut BytesMut) -> Result<()> {
        let start = dst.len();
        dst.resize(start + self.frame_len(message), 0);
        match self.encode_into(message, &mut dst[start..]) {
            Ok(written) => {
                dst.truncate(start + written);
                Ok(())
            }
            Err(err) => {
                dst.truncate(start);
                Err(err)
            }
        }
    }

    /// Decode the frame at the front of `bytes`.
    ///
    /// Bytes past the end of the frame are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The header or body is cut short
    /// - The header is rejected by the configured policy
    /// - The message type is not registered
    /// - The body is malformed or shorter than `body_length`
    pub fn decode(&self, bytes: &[u8]) -> Result<Message> {
        let header = FrameHeader::from_bytes(bytes)?;
        self.check_header(&header)?;

        let body_len = header.body_length as usize;
        let available = bytes.len() - HEADER_SIZE;
        if body_len > available {
            return Err(Error::BufferUnderflow {
                needed: body_len,
                remaining: available,
            });
        }

        let mut body = Cursor::new(&bytes[HEADER_SIZE..HEADER_SIZE + body_len]);
        let message = decode_message(header.msg_type, &mut body)?;
        if body.remaining() != 0 {
            return Err(Error::FrameLength {
                declared: header.body_length,
                consumed: body.position(),
            });
        }

        trace!(msg_type = header.msg_type, body_len, "decoded frame");
        Ok(message)
    }

    /// Decode the next frame from a stream buffer.
    ///
    /// Returns `Ok(None)` until a whole frame is buffered, then splits
    /// exactly that frame off the front of `src`. A frame whose body fails
    /// to decode is still consumed, so the caller may skip it and carry on.
    /// A header rejected by policy is left in place.
    pub fn decode_stream(&self, src: &mut BytesMut) -> Result<Option<Message>> {
        if src.len() < HEADER_SIZE {
            return Ok(None);
        }

        let header = FrameHeader::from_bytes(src)?;
        self.check_header(&header)?;

        let frame_len = header.frame_len();
        if src.len() < frame_len {
            src.reserve(frame_len - src.len());
            return Ok(None);
        }

        let frame = src.split_to(frame_len);
        self.decode(&frame).map(Some)
    }

    fn checked_body_len(&self, message: &Message) -> Result<u32> {
        let max = self.config.max_body_len;
        let len = message.body().encoded_len();
        match u32::try_from(len) {
            Ok(size) if size <= max => Ok(size),
            Ok(size) => Err(Error::BodyTooLarge { size, max }),
            Err(_) => Err(Error::BodyTooLarge {
                size: u32::MAX,
                max,
            }),
        }
    }

    fn check_header(&self, header: &FrameHeader) -> Result<()> {
        if self.config.strict_version && header.version != self.config.version {
            debug!(
                expected = self.config.version,
                found = header.version,
                "rejecting frame version"
            );
            return Err(Error::VersionMismatch {
                expected: self.config.version,
                found: header.version,
            });
        }

        if header.body_length > self.config.max_body_len {
            debug!(
                size = header.body_length,
                max = self.config.max_body_len,
                "rejecting oversized frame"
            );
            return Err(Error::BodyTooLarge {
                size: header.body_length,
                max: self.config.max_body_len,
            });
        }

        Ok(())
    }
}
