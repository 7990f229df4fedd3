//! Slurm control protocol wire format
//!
//! This module provides the byte cursor, node-index bitmaps, record codecs,
//! message type dispatch and frame codec for the controller protocol.

mod bitmap;
mod codec;
mod config;
pub mod cursor;
mod dispatch;
mod error;
mod header;
mod message;
mod records;
mod types;

pub use bitmap::{Iter as NodeBitmapIter, NodeBitmap, node_bitmap_len};
pub use codec::FrameCodec;
pub use config::CodecConfig;
pub use cursor::{Cursor, ReadCursor, WriteCursor};
pub use dispatch::{
    BodyCodec, DecodeFn, EncodeFn, decode_body, decode_message, encode_body, encode_tagged,
};
pub use error::{Error, FormatError, Result};
pub use header::FrameHeader;
pub use message::{Body, Message};
pub use records::{
    BuildInfo, JobDescriptor, JobListing, JobRecord, LastUpdateQuery, Listing, NodeListing,
    NodeRecord, NodeRegistrationStatus, PartitionListing, PartitionRecord, RejectedEntry,
    ReturnCode, WireRecord,
};
pub use types::{BodyKind, MessageType};

/// Protocol version written into outgoing headers
pub const PROTOCOL_VERSION: u16 = 1;

/// Header size in bytes
pub const HEADER_SIZE: usize = 10;

/// Width of the job descriptor partition key
pub const PARTITION_KEY_LEN: usize = 32;

/// Default maximum body size (16 MB)
pub const MAX_BODY_SIZE: u32 = 16 * 1024 * 1024;

/// Highest node index a bitmap accepts
pub const MAX_NODE_INDEX: u32 = 1_048_575;
