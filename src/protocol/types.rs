//! Message types and body shapes

use std::fmt;

/// Shape of the body a message type carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BodyKind {
    /// No body bytes at all
    Empty,
    /// [`LastUpdateQuery`](super::LastUpdateQuery)
    LastUpdate,
    /// [`BuildInfo`](super::BuildInfo)
    BuildInfo,
    /// [`JobDescriptor`](super::JobDescriptor)
    JobDescriptor,
    /// [`JobListing`](super::JobListing)
    JobInfo,
    /// [`NodeListing`](super::NodeListing)
    NodeInfo,
    /// [`PartitionListing`](super::PartitionListing)
    PartitionInfo,
    /// [`ReturnCode`](super::ReturnCode)
    ReturnCode,
    /// [`NodeRegistrationStatus`](super::NodeRegistrationStatus)
    NodeRegistrationStatus,
}

/// Declares the message type registry: one line per tag, naming its body shape.
macro_rules! message_types {
    ($( $(#[$doc:meta])* $name:ident = $tag:literal => $kind:ident, )+) => {
        /// Control protocol message types
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[repr(u16)]
        pub enum MessageType {
            $( $(#[$doc])* $name = $tag, )+
        }

        impl MessageType {
            /// Every registered message type, in tag order
            pub const ALL: &'static [Self] = &[$(Self::$name),+];

            /// Convert from a raw tag
            #[must_use]
            pub const fn from_u16(value: u16) -> Option<Self> {
                match value {
                    $( $tag => Some(Self::$name), )+
                    _ => None,
                }
            }

            /// Body shape registered for this type
            #[must_use]
            pub const fn body_kind(self) -> BodyKind {
                match self {
                    $( Self::$name => BodyKind::$kind, )+
                }
            }

            /// Variant name
            #[must_use]
            pub const fn name(self) -> &'static str {
                match self {
                    $( Self::$name => stringify!($name), )+
                }
            }
        }
    };
}

message_types! {
    /// Controller asks a node daemon to report its status
    RequestNodeRegistrationStatus = 1001 => Empty,
    /// Node daemon status report
    MessageNodeRegistrationStatus = 1002 => NodeRegistrationStatus,
    /// Re-read configuration
    RequestReconfigure = 1003 => Empty,
    /// Reconfigure acknowledgement
    ResponseReconfigure = 1004 => Empty,

    /// Build configuration query
    RequestBuildInfo = 2001 => LastUpdate,
    /// Build configuration
    ResponseBuildInfo = 2002 => BuildInfo,
    /// Job table query
    RequestJobInfo = 2003 => LastUpdate,
    /// Job table
    ResponseJobInfo = 2004 => JobInfo,
    /// Job step table query
    RequestJobStepInfo = 2005 => LastUpdate,
    /// Job step table (no body defined yet)
    ResponseJobStepInfo = 2006 => Empty,
    /// Node table query
    RequestNodeInfo = 2007 => LastUpdate,
    /// Node table
    ResponseNodeInfo = 2008 => NodeInfo,
    /// Partition table query
    RequestPartitionInfo = 2009 => LastUpdate,
    /// Partition table
    ResponsePartitionInfo = 2010 => PartitionInfo,
    /// Accounting query
    RequestAccountingInfo = 2011 => LastUpdate,
    /// Accounting data (no body defined yet)
    ResponseAccountingInfo = 2012 => Empty,

    /// Interactive resource allocation
    RequestResourceAllocation = 3001 => JobDescriptor,
    /// Allocation result
    ResponseResourceAllocation = 3002 => Empty,
    /// Batch job submission
    RequestSubmitBatchJob = 3003 => JobDescriptor,
    /// Submission result
    ResponseSubmitBatchJob = 3004 => Empty,
    /// Launch a batch script on a node
    RequestBatchJobLaunch = 3005 => Empty,

    /// Cancel a job
    RequestCancelJob = 4001 => Empty,
    /// Cancel acknowledgement
    ResponseCancelJob = 4002 => Empty,
    /// Cancel a job step
    RequestCancelJobStep = 4003 => Empty,
    /// Step cancel acknowledgement
    ResponseCancelJobStep = 4004 => Empty,
    /// Signal a job
    RequestSignalJob = 4005 => Empty,
    /// Signal acknowledgement
    ResponseSignalJob = 4006 => Empty,
    /// Signal a job step
    RequestSignalJobStep = 4007 => Empty,
    /// Step signal acknowledgement
    ResponseSignalJobStep = 4008 => Empty,

    /// Attach to a running job
    RequestJobAttach = 5001 => Empty,
    /// Attach result
    ResponseJobAttach = 5002 => Empty,
    /// Launch tasks on a node
    RequestLaunchTasks = 5003 => Empty,
    /// Job step lookup
    RequestGetJobStepInfo = 5004 => Empty,
    /// Job step lookup result
    ResponseGetJobStepInfo = 5005 => Empty,
    /// Job resource query
    RequestJobResource = 5006 => Empty,
    /// Job resource result
    ResponseJobResource = 5007 => Empty,
    /// Run a job step
    RequestRunJobStep = 5008 => Empty,
    /// Run result
    ResponseRunJobStep = 5009 => Empty,
    /// Credential key request
    RequestGetKey = 5010 => Empty,
    /// Credential key
    ResponseGetKey = 5011 => Empty,

    /// Task exit notification
    MessageTaskExit = 6001 => Empty,
    /// Accounting upload notification
    MessageUploadAccountingInfo = 6002 => Empty,

    /// Generic return code
    ResponseSlurmRc = 8001 => ReturnCode,
}

impl MessageType {
    /// Convert to the raw tag
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self as u16
    }

    /// Check if this message type is a reply to a request
    #[must_use]
    pub fn is_response(self) -> bool {
        self.name().starts_with("Response")
    }

    /// Check if this message type carries no body
    #[must_use]
    pub const fn is_empty_body(self) -> bool {
        matches!(self.body_kind(), BodyKind::Empty)
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name(), self.as_u16())
    }
}
