//! Record codecs
//!
//! Each record type owns the exact field order of its body. Field order is
//! part of the wire contract: reordering breaks every peer.

mod build;
mod job;
mod node;
mod partition;
mod simple;

pub use build::BuildInfo;
pub use job::{JobDescriptor, JobListing, JobRecord};
pub use node::{NodeListing, NodeRecord, NodeRegistrationStatus};
pub use partition::{PartitionListing, PartitionRecord};
pub use simple::{LastUpdateQuery, ReturnCode};

use tracing::debug;

use super::{Cursor, Error, FormatError, Result};

/// A record with a fixed wire layout.
pub trait WireRecord: Sized {
    /// Name used when reporting allocation failures.
    const NAME: &'static str;

    /// Smallest possible encoding (every string empty, every list empty).
    const MIN_ENCODED_LEN: usize;

    /// Exact number of bytes [`encode`](Self::encode) will write.
    fn encoded_len(&self) -> usize;

    /// Write every field in wire order.
    fn encode<B: AsRef<[u8]> + AsMut<[u8]>>(&self, cursor: &mut Cursor<B>) -> Result<()>;

    /// Read a freshly owned record.
    fn decode<B: AsRef<[u8]>>(cursor: &mut Cursor<B>) -> Result<Self>;

    /// Read a record as one entry of a listing.
    ///
    /// The outer error means the cursor stopped inside the record. The inner
    /// error is returned only after every byte of the record was consumed,
    /// so the next entry starts at the cursor.
    fn decode_entry<B: AsRef<[u8]>>(cursor: &mut Cursor<B>) -> Result<Result<Self>> {
        Self::decode(cursor).map(Ok)
    }
}

/// A listing entry whose contents were rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedEntry {
    /// Position of the entry in the listing
    pub index: usize,
    /// Why it was rejected
    pub error: Error,
}

/// A table of homogeneous entries with a snapshot timestamp.
///
/// # Wire Format
///
/// ```text
/// count:u32 last_update:u32 entry*count
/// ```
///
/// Entries follow each other with no framing; the decoder trusts `count`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Listing<T> {
    /// Time the table snapshot was taken
    pub last_update: u32,
    /// Table entries, in wire order
    pub entries: Vec<T>,
}

impl<T> Listing<T> {
    /// Create a listing from its parts.
    #[must_use]
    pub const fn new(last_update: u32, entries: Vec<T>) -> Self {
        Self {
            last_update,
            entries,
        }
    }

    /// Number of entries held.
    #[must_use]
    pub fn record_count(&self) -> usize {
        self.entries.len()
    }
}

impl<T: WireRecord> Listing<T> {
    /// Decode a listing, setting aside entries with malformed contents.
    ///
    /// Truncation still fails the whole listing.
    pub fn decode_partial<B: AsRef<[u8]>>(
        cursor: &mut Cursor<B>,
    ) -> Result<(Self, Vec<RejectedEntry>)> {
        let count = cursor.read_u32()? as usize;
        let last_update = cursor.read_u32()?;

        // Reserve no more than the remaining bytes could possibly describe;
        // an inflated count then fails on the first short read instead.
        let plausible = count.min(cursor.remaining() / T::MIN_ENCODED_LEN.max(1));
        let mut entries = Vec::new();
        entries
            .try_reserve_exact(plausible)
            .map_err(|_| Error::AllocationFailure { what: T::NAME })?;

        let mut rejected = Vec::new();
        for index in 0..count {
            match T::decode_entry(cursor)? {
                Ok(entry) => entries.push(entry),
                Err(error) => rejected.push(RejectedEntry { index, error }),
            }
        }

        Ok((
            Self {
                last_update,
                entries,
            },
            rejected,
        ))
    }
}

impl<T: WireRecord> WireRecord for Listing<T> {
    const NAME: &'static str = "listing";
    const MIN_ENCODED_LEN: usize = 8;

    fn encoded_len(&self) -> usize {
        8 + self.entries.iter().map(T::encoded_len).sum::<usize>()
    }

    fn encode<B: AsRef<[u8]> + AsMut<[u8]>>(&self, cursor: &mut Cursor<B>) -> Result<()> {
        let count = u32::try_from(self.entries.len()).map_err(|_| FormatError::TooManyRecords {
            count: self.entries.len(),
        })?;
        cursor.write_u32(count)?;
        cursor.write_u32(self.last_update)?;
        for entry in &self.entries {
            entry.encode(cursor)?;
        }
        Ok(())
    }

    /// Entries with malformed contents are dropped with a `debug!` line;
    /// use [`Listing::decode_partial`] to see them.
    fn decode<B: AsRef<[u8]>>(cursor: &mut Cursor<B>) -> Result<Self> {
        let (listing, rejected) = Self::decode_partial(cursor)?;
        for RejectedEntry { index, error } in rejected {
            debug!(record = T::NAME, index, %error, "dropping malformed listing entry");
        }
        Ok(listing)
    }
}
