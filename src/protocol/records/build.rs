//! Controller build configuration record.

use super::WireRecord;
use crate::protocol::cursor::string_len;
use crate::protocol::{Cursor, Result};

/// Build and runtime configuration reported by the controller.
///
/// # Wire Format
///
/// ```text
/// last_update:u32 backup_interval:u16 backup_location:str backup_machine:str
/// control_daemon:str control_machine:str controller_timeout:u16 epilog:str
/// fast_schedule:u16 hash_base:u16 heartbeat_interval:u16 init_program:str
/// kill_wait:u16 prioritize:str prolog:str server_daemon:str
/// server_timeout:u16 slurm_conf:str tmp_fs:str
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BuildInfo {
    /// Time the configuration was last changed
    pub last_update: u32,
    /// Seconds between state checkpoints
    pub backup_interval: u16,
    /// Directory holding state checkpoints
    pub backup_location: String,
    /// Host of the backup controller
    pub backup_machine: String,
    /// Path of the controller daemon
    pub control_daemon: String,
    /// Host of the primary controller
    pub control_machine: String,
    /// Seconds before the backup controller takes over
    pub controller_timeout: u16,
    /// Program run on a node after each job
    pub epilog: String,
    /// Non-zero to schedule from configured rather than reported node sizes
    pub fast_schedule: u16,
    /// Base used when hashing node names
    pub hash_base: u16,
    /// Seconds between node daemon pings
    pub heartbeat_interval: u16,
    /// Program run when a node daemon starts
    pub init_program: String,
    /// Seconds between SIGTERM and SIGKILL at job end
    pub kill_wait: u16,
    /// Program that sets initial job priorities
    pub prioritize: String,
    /// Program run on a node before each job
    pub prolog: String,
    /// Path of the node daemon
    pub server_daemon: String,
    /// Seconds before an unresponsive node is marked down
    pub server_timeout: u16,
    /// Path of the configuration file
    pub slurm_conf: String,
    /// File system whose free space is reported as temporary disk
    pub tmp_fs: String,
}

impl BuildInfo {
    fn strings(&self) -> [&str; 11] {
        [
            &self.backup_location,
            &self.backup_machine,
            &self.control_daemon,
            &self.control_machine,
            &self.epilog,
            &self.init_program,
            &self.prioritize,
            &self.prolog,
            &self.server_daemon,
            &self.slurm_conf,
            &self.tmp_fs,
        ]
    }
}

impl WireRecord for BuildInfo {
    const NAME: &'static str = "build info";
    const MIN_ENCODED_LEN: usize = 4 + 7 * 2 + 11 * 2;

    fn encoded_len(&self) -> usize {
        4 + 7 * 2 + self.strings().into_iter().map(string_len).sum::<usize>()
    }

    fn encode<B: AsRef<[u8]> + AsMut<[u8]>>(&self, cursor: &mut Cursor<B>) -> Result<()> {
        cursor.write_u32(self.last_update)?;
        cursor.write_u16(self.backup_interval)?;
        cursor.write_string(&self.backup_location)?;
        cursor.write_string(&self.backup_machine)?;
        cursor.write_string(&self.control_daemon)?;
        cursor.write_string(&self.control_machine)?;
        cursor.write_u16(self.controller_timeout)?;
        cursor.write_string(&self.epilog)?;
        cursor.write_u16(self.fast_schedule)?;
        cursor.write_u16(self.hash_base)?;
        cursor.write_u16(self.heartbeat_interval)?;
        cursor.write_string(&self.init_program)?;
        cursor.write_u16(self.kill_wait)?;
        cursor.write_string(&self.prioritize)?;
        cursor.write_string(&self.prolog)?;
        cursor.write_string(&self.server_daemon)?;
        cursor.write_u16(self.server_timeout)?;
        cursor.write_string(&self.slurm_conf)?;
        cursor.write_string(&self.tmp_fs)
    }

    fn decode<B: AsRef<[u8]>>(cursor: &mut Cursor<B>) -> Result<Self> {
        Ok(Self {
            last_update: cursor.read_u32()?,
            backup_interval: cursor.read_u16()?,
            backup_location: cursor.read_string()?,
            backup_machine: cursor.read_string()?,
            control_daemon: cursor.read_string()?,
            control_machine: cursor.read_string()?,
            controller_timeout: cursor.read_u16()?,
            epilog: cursor.read_string()?,
            fast_schedule: cursor.read_u16()?,
            hash_base: cursor.read_u16()?,
            heartbeat_interval: cursor.read_u16()?,
            init_program: cursor.read_string()?,
            kill_wait: cursor.read_u16()?,
            prioritize: cursor.read_string()?,
            prolog: cursor.read_string()?,
            server_daemon: cursor.read_string()?,
            server_timeout: cursor.read_u16()?,
            slurm_conf: cursor.read_string()?,
            tmp_fs: cursor.read_string()?,
        })
    }
}
