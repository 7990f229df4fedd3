//! Single-field records: table queries and return codes.

use super::WireRecord;
use crate::protocol::{Cursor, Result};

/// Table query carrying the requester's last snapshot time.
///
/// The same body serves build, job, job step, node, partition and
/// accounting queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LastUpdateQuery {
    /// Snapshot time the requester already holds
    pub last_update: u32,
}

impl WireRecord for LastUpdateQuery {
    const NAME: &'static str = "last update query";
    const MIN_ENCODED_LEN: usize = 4;

    fn encoded_len(&self) -> usize {
        4
    }

    fn encode<B: AsRef<[u8]> + AsMut<[u8]>>(&self, cursor: &mut Cursor<B>) -> Result<()> {
        cursor.write_u32(self.last_update)
    }

    fn decode<B: AsRef<[u8]>>(cursor: &mut Cursor<B>) -> Result<Self> {
        Ok(Self {
            last_update: cursor.read_u32()?,
        })
    }
}

/// Generic status reply.
///
/// Travels as the 32-bit two's complement pattern of `code`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReturnCode {
    /// Status code, zero for success
    pub code: i32,
}

impl ReturnCode {
    /// Successful completion.
    pub const SUCCESS: Self = Self { code: 0 };

    /// Whether the code reports success.
    #[must_use]
    pub const fn is_success(self) -> bool {
        self.code == 0
    }
}

impl WireRecord for ReturnCode {
    const NAME: &'static str = "return code";
    const MIN_ENCODED_LEN: usize = 4;

    fn encoded_len(&self) -> usize {
        4
    }

    #[allow(clippy::cast_sign_loss)]
    fn encode<B: AsRef<[u8]> + AsMut<[u8]>>(&self, cursor: &mut Cursor<B>) -> Result<()> {
        cursor.write_u32(self.code as u32)
    }

    #[allow(clippy::cast_possible_wrap)]
    fn decode<B: AsRef<[u8]>>(cursor: &mut Cursor<B>) -> Result<Self> {
        let raw = cursor.read_u32()?;
        Ok(Self { code: raw as i32 })
    }
}
