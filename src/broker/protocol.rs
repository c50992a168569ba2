//! Wire protocol for the lock broker
//!
//! Requests and replies travel as single text frames. A request is
//! `OP RESOURCE [DATA...]`, split on the space character into at most three
//! fields; the data field is the unsplit remainder of the frame and may
//! itself contain spaces.

use std::fmt;

/// A decoded client request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub op: String,
    pub resource: String,
    pub data: String,
}

impl Request {
    /// Decode a raw payload into `(op, resource, data)`.
    ///
    /// Missing fields decode to empty strings. Opcode legality is not
    /// checked here; an unknown opcode is a lock manager concern.
    pub fn parse(payload: &str) -> Self {
        let mut parts = payload.splitn(3, ' ');
        Self {
            op: parts.next().unwrap_or("").to_string(),
            resource: parts.next().unwrap_or("").to_string(),
            data: parts.next().unwrap_or("").to_string(),
        }
    }
}

/// A broker reply; `Display` renders the exact wire string
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    LockGranted,
    WriteOk,
    WriteDenied,
    /// Carries the resource's stored value
    ReadOk(String),
    ReadDenied,
    Unlocked,
    UnlockDenied,
    UnknownOp,
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::LockGranted => write!(f, "LOCK_GRANTED"),
            Reply::WriteOk => write!(f, "WRITE_OK"),
            Reply::WriteDenied => write!(f, "WRITE_DENIED"),
            Reply::ReadOk(value) => write!(f, "READ_OK {}", value),
            Reply::ReadDenied => write!(f, "READ_DENIED"),
            Reply::Unlocked => write!(f, "UNLOCKED"),
            Reply::UnlockDenied => write!(f, "UNLOCK_DENIED"),
            Reply::UnknownOp => write!(f, "ERR UnknownOp"),
        }
    }
}
