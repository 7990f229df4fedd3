//! Slurm control protocol wire format
//!
//! This library marshals the typed records exchanged between the Slurm
//! controller, node daemons and client tools to and from their big-endian
//! wire representation. It covers the bounds-checked byte cursor, the
//! node-index range notation, every record codec, message type dispatch and
//! header framing.
//!
//! # Quick Start
//!
//! ```rust
//! use slurm_wire::{Message, MessageType, NodeRegistrationStatus};
//!
//! // Pair a message type with its body
//! let msg = Message::new(
//!     MessageType::MessageNodeRegistrationStatus,
//!     NodeRegistrationStatus {
//!         timestamp: 1000,
//!         node_name: "node01".into(),
//!         cpus: 4,
//!         real_memory_size: 2048,
//!         temporary_disk_space: 10000,
//!     },
//! )?;
//!
//! // Encode to a frame (10-byte header + body)
//! let bytes = msg.encode()?;
//!
//! // Decode the frame
//! let decoded = Message::decode(&bytes)?;
//! assert_eq!(decoded, msg);
//! # Ok::<(), slurm_wire::Error>(())
//! ```
//!
//! # Features
//!
//! - **Checked cursor** - every read and write is bounds-checked and atomic
//! - **Exhaustive dispatch** - one body shape per message type, checked at construction
//! - **Fallible allocation** - decoding reports allocation failure instead of aborting
//! - **Streaming decode** - frames are split off a `BytesMut` as they complete
//! - **`serde`** (optional) - records serialize with node bitmaps as range text

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod protocol;

pub use protocol::{
    Body, BodyKind, CodecConfig, Error, FormatError, FrameCodec, FrameHeader, HEADER_SIZE,
    MAX_BODY_SIZE, Message, MessageType, NodeBitmap, PROTOCOL_VERSION, Result,
};
pub use protocol::{
    BuildInfo, JobDescriptor, JobListing, JobRecord, LastUpdateQuery, Listing, NodeListing,
    NodeRecord, NodeRegistrationStatus, PartitionListing, PartitionRecord, RejectedEntry,
    ReturnCode, WireRecord,
};
