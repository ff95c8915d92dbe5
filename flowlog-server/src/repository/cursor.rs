//! Pagination cursors
//!
//! Cursors are opaque to clients: a URL-safe base64 token wrapping the
//! position of the last entry returned. Run and service listings order
//! entries differently, so each has its own cursor kind and one is never
//! accepted in place of the other.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use flowlog_core::ValidationError;

/// Resume point in a single run: the sequence number of the last entry seen
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RunCursor {
    pub seq: u64,
}

/// Resume point in a service-wide listing, ordered by (timestamp, sequence)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ServiceCursor {
    pub timestamp: u64,
    pub seq: u64,
}

const RUN_PREFIX: &str = "r";
const SERVICE_PREFIX: &str = "s";

impl RunCursor {
    pub fn encode(&self) -> String {
        URL_SAFE_NO_PAD.encode(format!("{}:{}", RUN_PREFIX, self.seq))
    }

    pub fn decode(token: &str) -> Result<Self, ValidationError> {
        let raw = decode_raw(token)?;
        match raw.split(':').collect::<Vec<_>>().as_slice() {
            [RUN_PREFIX, seq] => Ok(Self {
                seq: parse_u64(seq)?,
            }),
            _ => Err(ValidationError::InvalidCursor),
        }
    }
}

impl ServiceCursor {
    pub fn encode(&self) -> String {
        URL_SAFE_NO_PAD.encode(format!(
            "{}:{}:{}",
            SERVICE_PREFIX, self.timestamp, self.seq
        ))
    }

    pub fn decode(token: &str) -> Result<Self, ValidationError> {
        let raw = decode_raw(token)?;
        match raw.split(':').collect::<Vec<_>>().as_slice() {
            [SERVICE_PREFIX, timestamp, seq] => Ok(Self {
                timestamp: parse_u64(timestamp)?,
                seq: parse_u64(seq)?,
            }),
            _ => Err(ValidationError::InvalidCursor),
        }
    }
}

fn decode_raw(token: &str) -> Result<String, ValidationError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(token)
        .map_err(|_| ValidationError::InvalidCursor)?;
    String::from_utf8(bytes).map_err(|_| ValidationError::InvalidCursor)
}

fn parse_u64(s: &str) -> Result<u64, ValidationError> {
    s.parse().map_err(|_| ValidationError::InvalidCursor)
}
