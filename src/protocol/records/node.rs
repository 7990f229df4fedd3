//! Node table and node daemon registration records.

use super::{Listing, WireRecord};
use crate::protocol::cursor::string_len;
use crate::protocol::{Cursor, Result};

/// One row of the controller's node table.
///
/// # Wire Format
///
/// ```text
/// name:str state:u16 cpus:u32 real_memory:u32 tmp_disk:u32 weight:u32
/// features:str partition:str
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeRecord {
    /// Node name
    pub name: String,
    /// Scheduler node state
    pub state: u16,
    /// Processor count
    pub cpus: u32,
    /// Real memory, in MB
    pub real_memory: u32,
    /// Temporary disk space, in MB
    pub tmp_disk: u32,
    /// Scheduling weight
    pub weight: u32,
    /// Node features
    pub features: String,
    /// Partition the node belongs to
    pub partition: String,
}

impl WireRecord for NodeRecord {
    const NAME: &'static str = "node record";
    const MIN_ENCODED_LEN: usize = 3 * 2 + 2 + 4 * 4;

    fn encoded_len(&self) -> usize {
        2 + 4 * 4 + string_len(&self.name) + string_len(&self.features) + string_len(&self.partition)
    }

    fn encode<B: AsRef<[u8]> + AsMut<[u8]>>(&self, cursor: &mut Cursor<B>) -> Result<()> {
        cursor.write_string(&self.name)?;
        cursor.write_u16(self.state)?;
        cursor.write_u32(self.cpus)?;
        cursor.write_u32(self.real_memory)?;
        cursor.write_u32(self.tmp_disk)?;
        cursor.write_u32(self.weight)?;
        cursor.write_string(&self.features)?;
        cursor.write_string(&self.partition)
    }

    fn decode<B: AsRef<[u8]>>(cursor: &mut Cursor<B>) -> Result<Self> {
        Ok(Self {
            name: cursor.read_string()?,
            state: cursor.read_u16()?,
            cpus: cursor.read_u32()?,
            real_memory: cursor.read_u32()?,
            tmp_disk: cursor.read_u32()?,
            weight: cursor.read_u32()?,
            features: cursor.read_string()?,
            partition: cursor.read_string()?,
        })
    }
}

/// Node table reply.
pub type NodeListing = Listing<NodeRecord>;

/// Status report a node daemon sends when it registers.
///
/// # Wire Format
///
/// ```text
/// timestamp:u32 node_name:str cpus:u32 real_memory_size:u32
/// temporary_disk_space:u32
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeRegistrationStatus {
    /// Time of the report, seconds since the epoch
    pub timestamp: u32,
    /// Reporting node
    pub node_name: String,
    /// Processor count
    pub cpus: u32,
    /// Real memory, in MB
    pub real_memory_size: u32,
    /// Temporary disk space, in MB
    pub temporary_disk_space: u32,
}

impl WireRecord for NodeRegistrationStatus {
    const NAME: &'static str = "node registration status";
    const MIN_ENCODED_LEN: usize = 4 * 4 + 2;

    fn encoded_len(&self) -> usize {
        4 * 4 + string_len(&self.node_name)
    }

    fn encode<B: AsRef<[u8]> + AsMut<[u8]>>(&self, cursor: &mut Cursor<B>) -> Result<()> {
        cursor.write_u32(self.timestamp)?;
        cursor.write_string(&self.node_name)?;
        cursor.write_u32(self.cpus)?;
        cursor.write_u32(self.real_memory_size)?;
        cursor.write_u32(self.temporary_disk_space)
    }

    fn decode<B: AsRef<[u8]>>(cursor: &mut Cursor<B>) -> Result<Self> {
        Ok(Self {
            timestamp: cursor.read_u32()?,
            node_name: cursor.read_string()?,
            cpus: cursor.read_u32()?,
            real_memory_size: cursor.read_u32()?,
            temporary_disk_space: cursor.read_u32()?,
        })
    }
}
