//! CLI argument definitions for the lockbroker client

use clap::{Parser, ValueEnum};

use crate::error::{BrokerError, Result};

/// Lock a resource, perform one operation under the lock, and release it
#[derive(Parser, Debug)]
#[command(name = "lockbroker")]
#[command(about = "Client driver for the lockbroker daemon")]
#[command(version)]
pub struct Cli {
    /// Resource name to lock
    #[arg(value_name = "RESOURCE")]
    pub resource: String,

    /// Operation to perform while holding the lock
    #[arg(value_name = "OP", value_enum, ignore_case = true)]
    pub op: Operation,

    /// Data to write (required for write)
    #[arg(value_name = "DATA")]
    pub data: Option<String>,

    /// Seconds to hold the lock before writing
    #[arg(value_name = "SLEEP_SECONDS")]
    pub sleep_seconds: Option<u64>,

    /// Broker host
    #[arg(long, default_value = "127.0.0.1", env = "LOCKBROKER_HOST")]
    pub host: String,

    /// Broker port
    #[arg(long, default_value = "5555", env = "LOCKBROKER_PORT")]
    pub port: u16,
}

/// Operation to perform while holding the lock
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    /// Read the resource's stored value
    Read,
    /// Write data to the resource
    Write,
}

/// What the driver will do between LOCK and UNLOCK
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Plan {
    Read,
    Write { data: String, sleep_seconds: u64 },
}

impl Cli {
    /// Resolve the operation and its arguments
    pub fn plan(&self) -> Result<Plan> {
        match self.op {
            Operation::Read => Ok(Plan::Read),
            Operation::Write => {
                let data = self.data.clone().ok_or_else(|| BrokerError::Usage {
                    message: "WRITE requires a data argument".to_string(),
                })?;
                Ok(Plan::Write {
                    data,
                    sleep_seconds: self.sleep_seconds.unwrap_or(0),
                })
            }
        }
    }
}
