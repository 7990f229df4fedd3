//! Job submission and job table records.

use super::{Listing, WireRecord};
use crate::protocol::bitmap::node_bitmap_len;
use crate::protocol::cursor::string_len;
use crate::protocol::{Cursor, NodeBitmap, PARTITION_KEY_LEN, Result};

/// Job request sent by a submitting client.
///
/// # Wire Format
///
/// ```text
/// contiguous:u16 features:str groups:str job_id:u32 name:str
/// partition_key:bytes[32] min_procs:u32 min_memory:u32 min_tmp_disk:u32
/// partition:str priority:u32 req_nodes:str job_script:str shared:u16
/// time_limit:u32 num_procs:u32 num_nodes:u32 user_id:u32
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct JobDescriptor {
    /// Nodes must be contiguous when non-zero
    pub contiguous: u16,
    /// Required node features
    pub features: String,
    /// Groups of the submitting user
    pub groups: String,
    /// Requested job id, zero to let the controller pick
    pub job_id: u32,
    /// Job name
    pub name: String,
    /// Key authorizing use of a restricted partition
    pub partition_key: [u8; PARTITION_KEY_LEN],
    /// Minimum processors per node
    pub min_procs: u32,
    /// Minimum real memory per node, in MB
    pub min_memory: u32,
    /// Minimum temporary disk per node, in MB
    pub min_tmp_disk: u32,
    /// Target partition
    pub partition: String,
    /// Scheduling priority
    pub priority: u32,
    /// Explicitly requested nodes
    pub req_nodes: String,
    /// Batch script
    pub job_script: String,
    /// Node sharing mode
    pub shared: u16,
    /// Time limit in minutes
    pub time_limit: u32,
    /// Total processors requested
    pub num_procs: u32,
    /// Total nodes requested
    pub num_nodes: u32,
    /// Submitting user id
    pub user_id: u32,
}

impl WireRecord for JobDescriptor {
    const NAME: &'static str = "job descriptor";
    const MIN_ENCODED_LEN: usize = 2 * 2 + 6 * 2 + 9 * 4 + PARTITION_KEY_LEN;

    fn encoded_len(&self) -> usize {
        2 * 2
            + 9 * 4
            + PARTITION_KEY_LEN
            + string_len(&self.features)
            + string_len(&self.groups)
            + string_len(&self.name)
            + string_len(&self.partition)
            + string_len(&self.req_nodes)
            + string_len(&self.job_script)
    }

    fn encode<B: AsRef<[u8]> + AsMut<[u8]>>(&self, cursor: &mut Cursor<B>) -> Result<()> {
        cursor.write_u16(self.contiguous)?;
        cursor.write_string(&self.features)?;
        cursor.write_string(&self.groups)?;
        cursor.write_u32(self.job_id)?;
        cursor.write_string(&self.name)?;
        cursor.write_fixed_blob(&self.partition_key, PARTITION_KEY_LEN)?;

        cursor.write_u32(self.min_procs)?;
        cursor.write_u32(self.min_memory)?;
        cursor.write_u32(self.min_tmp_disk)?;

        cursor.write_string(&self.partition)?;
        cursor.write_u32(self.priority)?;

        cursor.write_string(&self.req_nodes)?;
        cursor.write_string(&self.job_script)?;
        cursor.write_u16(self.shared)?;

        cursor.write_u32(self.time_limit)?;
        cursor.write_u32(self.num_procs)?;
        cursor.write_u32(self.num_nodes)?;
        cursor.write_u32(self.user_id)
    }

    fn decode<B: AsRef<[u8]>>(cursor: &mut Cursor<B>) -> Result<Self> {
        Ok(Self {
            contiguous: cursor.read_u16()?,
            features: cursor.read_string()?,
            groups: cursor.read_string()?,
            job_id: cursor.read_u32()?,
            name: cursor.read_string()?,
            partition_key: cursor.read_fixed_array()?,
            min_procs: cursor.read_u32()?,
            min_memory: cursor.read_u32()?,
            min_tmp_disk: cursor.read_u32()?,
            partition: cursor.read_string()?,
            priority: cursor.read_u32()?,
            req_nodes: cursor.read_string()?,
            job_script: cursor.read_string()?,
            shared: cursor.read_u16()?,
            time_limit: cursor.read_u32()?,
            num_procs: cursor.read_u32()?,
            num_nodes: cursor.read_u32()?,
            user_id: cursor.read_u32()?,
        })
    }
}

/// One row of the controller's job table.
///
/// `node_bitmap` and `req_node_bitmap` travel as range text (`"0-3,7"`).
///
/// # Wire Format
///
/// ```text
/// job_id:u32 user_id:u32 job_state:u16 time_limit:u32 start_time:u32
/// end_time:u32 priority:u32 nodes:str partition:str name:str node_inx:str
/// num_procs:u32 num_nodes:u32 shared:u16 contiguous:u16 min_procs:u32
/// min_memory:u32 min_tmp_disk:u32 req_nodes:str req_node_inx:str
/// features:str job_script:str
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct JobRecord {
    /// Job id
    pub job_id: u32,
    /// Owning user id
    pub user_id: u32,
    /// Scheduler job state
    pub job_state: u16,
    /// Time limit in minutes
    pub time_limit: u32,
    /// Start time, seconds since the epoch
    pub start_time: u32,
    /// End time, seconds since the epoch
    pub end_time: u32,
    /// Scheduling priority
    pub priority: u32,
    /// Allocated node names
    pub nodes: String,
    /// Partition the job runs in
    pub partition: String,
    /// Job name
    pub name: String,
    /// Indices of allocated nodes
    pub node_bitmap: NodeBitmap,
    /// Total processors
    pub num_procs: u32,
    /// Total nodes
    pub num_nodes: u32,
    /// Node sharing mode
    pub shared: u16,
    /// Nodes must be contiguous when non-zero
    pub contiguous: u16,
    /// Minimum processors per node
    pub min_procs: u32,
    /// Minimum real memory per node, in MB
    pub min_memory: u32,
    /// Minimum temporary disk per node, in MB
    pub min_tmp_disk: u32,
    /// Explicitly requested node names
    pub req_nodes: String,
    /// Indices of explicitly requested nodes
    pub req_node_bitmap: NodeBitmap,
    /// Required node features
    pub features: String,
    /// Batch script
    pub job_script: String,
}

impl WireRecord for JobRecord {
    const NAME: &'static str = "job record";
    const MIN_ENCODED_LEN: usize = 11 * 4 + 3 * 2 + 8 * 2;

    fn encoded_len(&self) -> usize {
        11 * 4
            + 3 * 2
            + string_len(&self.nodes)
            + string_len(&self.partition)
            + string_len(&self.name)
            + node_bitmap_len(&self.node_bitmap)
            + string_len(&self.req_nodes)
            + node_bitmap_len(&self.req_node_bitmap)
            + string_len(&self.features)
            + string_len(&self.job_script)
    }

    fn encode<B: AsRef<[u8]> + AsMut<[u8]>>(&self, cursor: &mut Cursor<B>) -> Result<()> {
        cursor.write_u32(self.job_id)?;
        cursor.write_u32(self.user_id)?;
        cursor.write_u16(self.job_state)?;
        cursor.write_u32(self.time_limit)?;

        cursor.write_u32(self.start_time)?;
        cursor.write_u32(self.end_time)?;
        cursor.write_u32(self.priority)?;

        cursor.write_string(&self.nodes)?;
        cursor.write_string(&self.partition)?;
        cursor.write_string(&self.name)?;
        cursor.write_node_bitmap(&self.node_bitmap)?;

        cursor.write_u32(self.num_procs)?;
        cursor.write_u32(self.num_nodes)?;
        cursor.write_u16(self.shared)?;
        cursor.write_u16(self.contiguous)?;

        cursor.write_u32(self.min_procs)?;
        cursor.write_u32(self.min_memory)?;
        cursor.write_u32(self.min_tmp_disk)?;

        cursor.write_string(&self.req_nodes)?;
        cursor.write_node_bitmap(&self.req_node_bitmap)?;
        cursor.write_string(&self.features)?;
        cursor.write_string(&self.job_script)
    }

    fn decode<B: AsRef<[u8]>>(cursor: &mut Cursor<B>) -> Result<Self> {
        Self::decode_entry(cursor)?
    }

    fn decode_entry<B: AsRef<[u8]>>(cursor: &mut Cursor<B>) -> Result<Result<Self>> {
        let job_id = cursor.read_u32()?;
        let user_id = cursor.read_u32()?;
        let job_state = cursor.read_u16()?;
        let time_limit = cursor.read_u32()?;
        let start_time = cursor.read_u32()?;
        let end_time = cursor.read_u32()?;
        let priority = cursor.read_u32()?;
        let nodes = cursor.read_string()?;
        let partition = cursor.read_string()?;
        let name = cursor.read_string()?;
        let node_inx = cursor.read_string()?;
        let num_procs = cursor.read_u32()?;
        let num_nodes = cursor.read_u32()?;
        let shared = cursor.read_u16()?;
        let contiguous = cursor.read_u16()?;
        let min_procs = cursor.read_u32()?;
        let min_memory = cursor.read_u32()?;
        let min_tmp_disk = cursor.read_u32()?;
        let req_nodes = cursor.read_string()?;
        let req_node_inx = cursor.read_string()?;
        let features = cursor.read_string()?;
        let job_script = cursor.read_string()?;

        // Range text is expanded only once the whole record is consumed
        let bitmaps = NodeBitmap::expand(&node_inx)
            .and_then(|node| NodeBitmap::expand(&req_node_inx).map(|req| (node, req)));
        Ok(bitmaps.map(|(node_bitmap, req_node_bitmap)| Self {
            job_id,
            user_id,
            job_state,
            time_limit,
            start_time,
            end_time,
            priority,
            nodes,
            partition,
            name,
            node_bitmap,
            num_procs,
            num_nodes,
            shared,
            contiguous,
            min_procs,
            min_memory,
            min_tmp_disk,
            req_nodes,
            req_node_bitmap,
            features,
            job_script,
        }))
    }
}

/// Job table reply.
pub type JobListing = Listing<JobRecord>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{Error, FormatError};
    use crate::protocol::cursor::string_len;

    fn sample_descriptor() -> JobDescriptor {
        let mut partition_key = [0u8; PARTITION_KEY_LEN];
        partition_key[..6].copy_from_slice(b"secret");
        JobDescriptor {
            contiguous: 1,
            features: "fast,gpu".into(),
            groups: "users".into(),
            job_id: 0,
            name: "train".into(),
            partition_key,
            min_procs: 2,
            min_memory: 1024,
            min_tmp_disk: 512,
            partition: "batch".into(),
            priority: 100,
            req_nodes: "lx[01-04]".into(),
            job_script: "#!/bin/sh\nsrun hostname\n".into(),
            shared: 0,
            time_limit: 60,
            num_procs: 8,
            num_nodes: 4,
            user_id: 1500,
        }
    }

    fn sample_record() -> JobRecord {
        JobRecord {
            job_id: 42,
            user_id: 1500,
            job_state: 1,
            time_limit: 60,
            start_time: 1_000,
            end_time: 4_600,
            priority: 100,
            nodes: "lx[01-04]".into(),
            partition: "batch".into(),
            name: "train".into(),
            node_bitmap: NodeBitmap::expand("0-3").unwrap(),
            num_procs: 8,
            num_nodes: 4,
            shared: 0,
            contiguous: 1,
            min_procs: 2,
            min_memory: 1024,
            min_tmp_disk: 512,
            req_nodes: "lx01".into(),
            req_node_bitmap: NodeBitmap::expand("0").unwrap(),
            features: String::new(),
            job_script: String::new(),
        }
    }

    fn encode<T: WireRecord>(record: &T) -> Vec<u8> {
        let mut buf = vec![0u8; record.encoded_len()];
        let mut cursor = Cursor::new(&mut buf[..]);
        record.encode(&mut cursor).unwrap();
        assert_eq!(cursor.remaining(), 0, "encoded_len disagrees with encode");
        buf
    }

    #[test]
    fn test_descriptor_roundtrip() {
        let desc = sample_descriptor();
        let buf = encode(&desc);
        let decoded = JobDescriptor::decode(&mut Cursor::new(&buf[..])).unwrap();
        assert_eq!(decoded, desc);
    }

    #[test]
    fn test_descriptor_key_is_fixed_width() {
        let desc = JobDescriptor::default();
        let buf = encode(&desc);
        assert_eq!(buf.len(), JobDescriptor::MIN_ENCODED_LEN);
        // contiguous, features, groups, job_id, name precede the key
        let key_at = 2 + 2 + 2 + 4 + 2;
        assert_eq!(&buf[key_at..key_at + PARTITION_KEY_LEN], &[0u8; 32]);
    }

    #[test]
    fn test_job_record_roundtrip() {
        let record = sample_record();
        let buf = encode(&record);
        let decoded = JobRecord::decode(&mut Cursor::new(&buf[..])).unwrap();
        assert_eq!(decoded, record);
        assert!(decoded.req_node_bitmap.contains(0));
        assert_eq!(decoded.node_bitmap.len(), 4);
    }

    #[test]
    fn test_job_listing_roundtrip() {
        let listing = JobListing::new(77, vec![sample_record(), JobRecord::default()]);
        let buf = encode(&listing);
        assert_eq!(&buf[..4], &2u32.to_be_bytes());
        assert_eq!(&buf[4..8], &77u32.to_be_bytes());

        let decoded = JobListing::decode(&mut Cursor::new(&buf[..])).unwrap();
        assert_eq!(decoded, listing);
    }

    #[test]
    fn test_bad_req_node_index_consumes_whole_record() {
        let record = JobRecord {
            req_nodes: "x".into(),
            job_script: "run".into(),
            ..JobRecord::default()
        };
        let mut buf = encode(&record);
        // req_node_inx sits right before features and job_script
        let inx_at = buf.len() - 2 - string_len("run") - 2;
        assert_eq!(&buf[inx_at..inx_at + 2], &[0, 0]);
        buf.splice(inx_at..inx_at + 2, [0u8, 2, b'1', b',']);

        let mut cursor = Cursor::new(&buf[..]);
        let entry = JobRecord::decode_entry(&mut cursor).unwrap();
        assert!(matches!(
            entry,
            Err(Error::Format(FormatError::InvalidToken { .. }))
        ));
        assert_eq!(cursor.remaining(), 0);
    }

    #[test]
    fn test_bad_node_index_text_rejected() {
        let record = JobRecord {
            nodes: "x".into(),
            ..JobRecord::default()
        };
        let mut buf = encode(&record);
        // six u32s and a u16, then nodes ("x"), partition and name
        let inx_at = 6 * 4 + 2 + 3 + 2 + 2;
        assert_eq!(&buf[inx_at..inx_at + 2], &[0, 0]);
        buf.splice(inx_at..inx_at + 2, [0u8, 3, b'9', b'-', b'1']);

        let result = JobRecord::decode(&mut Cursor::new(&buf[..]));
        assert_eq!(
            result,
            Err(Error::Format(FormatError::InvertedRange { start: 9, end: 1 }))
        );
    }
}
