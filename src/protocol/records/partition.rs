//! Partition table records.

use super::{Listing, WireRecord};
use crate::protocol::bitmap::node_bitmap_len;
use crate::protocol::cursor::string_len;
use crate::protocol::{Cursor, NodeBitmap, Result};

/// One row of the controller's partition table.
///
/// # Wire Format
///
/// ```text
/// name:str max_time:u32 max_nodes:u32 total_nodes:u32 total_cpus:u32
/// default_flag:u16 key_required:u16 shared:u16 state_up:u16
/// allow_groups:str nodes:str node_inx:str
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PartitionRecord {
    /// Partition name
    pub name: String,
    /// Longest job time limit, in minutes
    pub max_time: u32,
    /// Most nodes a single job may use
    pub max_nodes: u32,
    /// Nodes in the partition
    pub total_nodes: u32,
    /// Processors in the partition
    pub total_cpus: u32,
    /// Non-zero for the default partition
    pub default_flag: u16,
    /// Non-zero when jobs must present a partition key
    pub key_required: u16,
    /// Node sharing mode
    pub shared: u16,
    /// Non-zero while the partition accepts jobs
    pub state_up: u16,
    /// Groups allowed to submit
    pub allow_groups: String,
    /// Node names
    pub nodes: String,
    /// Node indices
    pub node_bitmap: NodeBitmap,
}

impl WireRecord for PartitionRecord {
    const NAME: &'static str = "partition record";
    const MIN_ENCODED_LEN: usize = 4 * 2 + 4 * 4 + 4 * 2;

    fn encoded_len(&self) -> usize {
        4 * 4
            + 4 * 2
            + string_len(&self.name)
            + string_len(&self.allow_groups)
            + string_len(&self.nodes)
            + node_bitmap_len(&self.node_bitmap)
    }

    fn encode<B: AsRef<[u8]> + AsMut<[u8]>>(&self, cursor: &mut Cursor<B>) -> Result<()> {
        cursor.write_string(&self.name)?;
        cursor.write_u32(self.max_time)?;
        cursor.write_u32(self.max_nodes)?;
        cursor.write_u32(self.total_nodes)?;
        cursor.write_u32(self.total_cpus)?;

        cursor.write_u16(self.default_flag)?;
        cursor.write_u16(self.key_required)?;
        cursor.write_u16(self.shared)?;
        cursor.write_u16(self.state_up)?;

        cursor.write_string(&self.allow_groups)?;
        cursor.write_string(&self.nodes)?;
        cursor.write_node_bitmap(&self.node_bitmap)
    }

    fn decode<B: AsRef<[u8]>>(cursor: &mut Cursor<B>) -> Result<Self> {
        Self::decode_entry(cursor)?
    }

    fn decode_entry<B: AsRef<[u8]>>(cursor: &mut Cursor<B>) -> Result<Result<Self>> {
        let name = cursor.read_string()?;
        let max_time = cursor.read_u32()?;
        let max_nodes = cursor.read_u32()?;
        let total_nodes = cursor.read_u32()?;
        let total_cpus = cursor.read_u32()?;
        let default_flag = cursor.read_u16()?;
        let key_required = cursor.read_u16()?;
        let shared = cursor.read_u16()?;
        let state_up = cursor.read_u16()?;
        let allow_groups = cursor.read_string()?;
        let nodes = cursor.read_string()?;
        let node_inx = cursor.read_string()?;

        Ok(NodeBitmap::expand(&node_inx).map(|node_bitmap| Self {
            name,
            max_time,
            max_nodes,
            total_nodes,
            total_cpus,
            default_flag,
            key_required,
            shared,
            state_up,
            allow_groups,
            nodes,
            node_bitmap,
        }))
    }
}

/// Partition table reply.
pub type PartitionListing = Listing<PartitionRecord>;
